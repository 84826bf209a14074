/// Events flowing through the Elm-architecture event loop.
#[derive(Debug, Clone)]
pub enum AppEvent {
    /// Periodic tick for animations, notification TTLs, etc.
    Tick,
    /// Raw terminal input (keyboard/mouse).
    Input(crossterm::event::Event),
    /// Assistant reply for the in-flight chat send.
    BotReply(String),
    /// The in-flight chat send failed; carries the localized message shown
    /// in the fallback bubble and the toast.
    BotFailed(String),
    /// A resolved action to execute.
    Action(Action),
    /// Notification to display to the user.
    Notification(Notification),
    /// Request to quit the application.
    Quit,
}

/// High-level actions dispatched by the input mapper.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    // Navigation
    FocusChat,
    FocusKnowledge,
    FocusDocuments,
    FocusChatbot,
    FocusPages,
    FocusAnalytics,
    FocusSettings,
    TabNext,
    TabPrev,
    ToggleSidebar,

    // Modals
    ShowHelp,
    CloseHelp,

    // Application
    Quit,
}

/// Which top-level view has focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Focus {
    Chat,
    Knowledge,
    Documents,
    Chatbot,
    Pages,
    Analytics,
    Settings,
}

impl Focus {
    /// In sidebar order: this must match the group iteration order in
    /// [`SidebarGroup::ALL`] because the sidebar selection indexes into it.
    pub const ALL: [Focus; 7] = [
        Focus::Chat,
        Focus::Knowledge,
        Focus::Documents,
        Focus::Chatbot,
        Focus::Pages,
        Focus::Analytics,
        Focus::Settings,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Focus::Chat => "Chat",
            Focus::Knowledge => "Knowledge",
            Focus::Documents => "Documents",
            Focus::Chatbot => "Chatbot",
            Focus::Pages => "Pages",
            Focus::Analytics => "Analytics",
            Focus::Settings => "Settings",
        }
    }

    /// Single-cell glyph shown in the sidebar.
    pub fn icon(self) -> &'static str {
        match self {
            Focus::Chat => "✉",
            Focus::Knowledge => "✎",
            Focus::Documents => "▤",
            Focus::Chatbot => "☺",
            Focus::Pages => "⌂",
            Focus::Analytics => "▣",
            Focus::Settings => "⚙",
        }
    }

    pub fn group(self) -> SidebarGroup {
        match self {
            Focus::Chat => SidebarGroup::Support,
            Focus::Knowledge | Focus::Documents | Focus::Chatbot | Focus::Pages => {
                SidebarGroup::Content
            }
            Focus::Analytics => SidebarGroup::Insights,
            Focus::Settings => SidebarGroup::System,
        }
    }

    pub fn to_action(self) -> Action {
        match self {
            Focus::Chat => Action::FocusChat,
            Focus::Knowledge => Action::FocusKnowledge,
            Focus::Documents => Action::FocusDocuments,
            Focus::Chatbot => Action::FocusChatbot,
            Focus::Pages => Action::FocusPages,
            Focus::Analytics => Action::FocusAnalytics,
            Focus::Settings => Action::FocusSettings,
        }
    }

    pub fn next(self) -> Focus {
        let idx = Focus::ALL.iter().position(|&f| f == self).unwrap_or(0);
        Focus::ALL[(idx + 1) % Focus::ALL.len()]
    }

    pub fn prev(self) -> Focus {
        let idx = Focus::ALL.iter().position(|&f| f == self).unwrap_or(0);
        Focus::ALL[(idx + Focus::ALL.len() - 1) % Focus::ALL.len()]
    }
}

/// Whether keyboard input is routed to the sidebar or the main view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AreaFocus {
    Main,
    Sidebar,
}

/// Sidebar section headers, in render order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SidebarGroup {
    Support,
    Content,
    Insights,
    System,
}

impl SidebarGroup {
    pub const ALL: [SidebarGroup; 4] = [
        SidebarGroup::Support,
        SidebarGroup::Content,
        SidebarGroup::Insights,
        SidebarGroup::System,
    ];

    pub fn label(self) -> &'static str {
        match self {
            SidebarGroup::Support => "SUPPORT",
            SidebarGroup::Content => "CONTENT",
            SidebarGroup::Insights => "INSIGHTS",
            SidebarGroup::System => "SYSTEM",
        }
    }

    pub fn views(self) -> &'static [Focus] {
        match self {
            SidebarGroup::Support => &[Focus::Chat],
            SidebarGroup::Content => &[
                Focus::Knowledge,
                Focus::Documents,
                Focus::Chatbot,
                Focus::Pages,
            ],
            SidebarGroup::Insights => &[Focus::Analytics],
            SidebarGroup::System => &[Focus::Settings],
        }
    }
}

/// Notification level for the overlay system.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    Info,
    Success,
    Warning,
    Error,
}

/// A timed notification shown in the overlay.
#[derive(Debug, Clone)]
pub struct Notification {
    pub id: u64,
    pub message: String,
    pub level: NotificationLevel,
    /// Ticks remaining before auto-dismiss.
    pub ttl_ticks: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_group_order_matches_focus_all() {
        let grouped: Vec<Focus> = SidebarGroup::ALL
            .iter()
            .flat_map(|g| g.views().iter().copied())
            .collect();
        assert_eq!(grouped, Focus::ALL.to_vec());
    }

    #[test]
    fn test_every_focus_belongs_to_its_group() {
        for focus in Focus::ALL {
            assert!(focus.group().views().contains(&focus));
        }
    }

    #[test]
    fn test_next_prev_roundtrip() {
        for focus in Focus::ALL {
            assert_eq!(focus.next().prev(), focus);
        }
    }
}
