use std::io;
use std::time::Duration;

use crossterm::event::{Event, EventStream, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use futures_util::StreamExt;
use ratatui::{
    backend::CrosstermBackend,
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame, Terminal,
};
use tokio::sync::mpsc;

use super::events::{Action, AppEvent, AreaFocus, Focus, Notification, NotificationLevel};
use super::layout::AppLayout;
use super::services::Services;
use super::sidebar::SidebarState;
use super::theme;
use super::views::analytics::AnalyticsState;
use super::views::chat::{ChatInputMode, ChatState};
use super::views::chatbot::ChatbotState;
use super::views::documents::DocumentsState;
use super::views::knowledge::KnowledgeState;
use super::views::pages::PagesState;
use super::views::settings::SettingsState;

/// Central application state (Elm architecture).
pub struct AppState {
    /// Whether the app is still running.
    pub running: bool,
    /// Currently focused top-level view.
    pub focus: Focus,
    /// Whether sidebar or main content has input focus.
    pub area_focus: AreaFocus,
    /// Sidebar navigation state.
    pub sidebar: SidebarState,
    /// Support chat view state.
    pub chat: ChatState,
    /// Knowledge base view state.
    pub knowledge: KnowledgeState,
    /// Reference documents view state.
    pub documents: DocumentsState,
    /// Chatbot settings view state.
    pub chatbot: ChatbotState,
    /// Landing page copy view state.
    pub pages: PagesState,
    /// Chat analytics view state.
    pub analytics: AnalyticsState,
    /// Settings view state.
    pub settings: SettingsState,
    /// Active notifications (max 3 visible).
    pub notifications: Vec<Notification>,
    /// Monotonic counter for notification IDs.
    notification_counter: u64,
    /// Whether the help modal is open.
    pub show_help: bool,
    /// Receiver for backend events.
    event_rx: mpsc::UnboundedReceiver<AppEvent>,
    /// Sender for pushing events from within the app.
    #[allow(dead_code)]
    event_tx: mpsc::UnboundedSender<AppEvent>,
    /// Backend services handle.
    services: Services,
}

impl AppState {
    pub fn new(
        event_rx: mpsc::UnboundedReceiver<AppEvent>,
        event_tx: mpsc::UnboundedSender<AppEvent>,
        services: Services,
    ) -> Self {
        Self {
            running: true,
            focus: Focus::Chat,
            area_focus: AreaFocus::Main,
            sidebar: SidebarState::new(),
            chat: ChatState::new(),
            knowledge: KnowledgeState::new(),
            documents: DocumentsState::new(),
            chatbot: ChatbotState::new(),
            pages: PagesState::new(),
            analytics: AnalyticsState::new(),
            settings: SettingsState::new(),
            notifications: Vec::new(),
            notification_counter: 0,
            show_help: false,
            event_rx,
            event_tx,
            services,
        }
    }

    // ── Elm event loop ──────────────────────────────────────────────────

    /// Main event loop: render → select → update → loop.
    pub async fn run(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
        tick_rate: Duration,
    ) -> io::Result<()> {
        let mut tick_interval = tokio::time::interval(tick_rate);
        let mut event_stream = EventStream::new();

        // The chat view opens focused; start its settings load.
        if self.focus == Focus::Chat {
            self.chat.load(&self.services);
        }

        while self.running {
            // Render
            terminal.draw(|frame| self.render(frame))?;

            // Select next event
            tokio::select! {
                _ = tick_interval.tick() => {
                    self.on_tick();
                }
                Some(event) = self.event_rx.recv() => {
                    self.handle_event(event);
                }
                Some(Ok(crossterm_event)) = event_stream.next() => {
                    self.handle_event(AppEvent::Input(crossterm_event));
                }
            }
        }

        Ok(())
    }

    // ── Event handling ──────────────────────────────────────────────────

    fn handle_event(&mut self, event: AppEvent) {
        match event {
            AppEvent::Input(crossterm_event) => {
                // Priority 1: Help modal
                if self.show_help {
                    if let Some(action) = self.map_help_input(&crossterm_event) {
                        self.handle_action(action);
                    }
                    return;
                }

                // Priority 2: Sidebar input (when focused)
                if self.area_focus == AreaFocus::Sidebar {
                    if self.handle_sidebar_input(&crossterm_event) {
                        return;
                    }
                }

                // Priority 3: Focused view
                let consumed = self.dispatch_view_input(&crossterm_event);
                if consumed {
                    return;
                }

                // Priority 4: Global keybindings
                if let Some(action) = self.map_input_to_action(crossterm_event) {
                    self.handle_action(action);
                }
            }
            AppEvent::Action(action) => self.handle_action(action),
            AppEvent::Tick => self.on_tick(),
            AppEvent::BotReply(reply) => {
                self.chat.on_bot_reply(reply, &self.services);
            }
            AppEvent::BotFailed(message) => {
                self.chat.on_bot_failed(message, &self.services);
            }
            AppEvent::Notification(notification) => {
                self.push_notification(notification.message, notification.level);
            }
            AppEvent::Quit => {
                self.running = false;
            }
        }
    }

    /// Dispatch input to the currently focused view. Returns true if consumed.
    fn dispatch_view_input(&mut self, event: &Event) -> bool {
        match self.focus {
            Focus::Chat => self.chat.handle_input(event, &self.services),
            Focus::Knowledge => self.knowledge.handle_input(event, &self.services),
            Focus::Documents => self.documents.handle_input(event, &self.services),
            Focus::Chatbot => self.chatbot.handle_input(event, &self.services),
            Focus::Pages => self.pages.handle_input(event, &self.services),
            Focus::Analytics => self.analytics.handle_input(event, &self.services),
            Focus::Settings => self.settings.handle_input(event, &self.services),
        }
    }

    /// Handle sidebar-specific input. Returns true if consumed.
    fn handle_sidebar_input(&mut self, event: &Event) -> bool {
        let Event::Key(KeyEvent {
            code,
            modifiers,
            kind: KeyEventKind::Press,
            ..
        }) = event
        else {
            return false;
        };

        match (*modifiers, *code) {
            (KeyModifiers::NONE, KeyCode::Char('j')) | (KeyModifiers::NONE, KeyCode::Down) => {
                self.sidebar.select_next();
                true
            }
            (KeyModifiers::NONE, KeyCode::Char('k')) | (KeyModifiers::NONE, KeyCode::Up) => {
                self.sidebar.select_prev();
                true
            }
            (KeyModifiers::NONE, KeyCode::Enter) | (KeyModifiers::NONE, KeyCode::Char('l')) => {
                let focus = self.sidebar.selected_focus();
                self.handle_action(focus.to_action());
                self.area_focus = AreaFocus::Main;
                true
            }
            (KeyModifiers::NONE, KeyCode::Char('h')) => {
                self.sidebar.user_collapsed = true;
                self.area_focus = AreaFocus::Main;
                true
            }
            (KeyModifiers::NONE, KeyCode::Esc) => {
                self.area_focus = AreaFocus::Main;
                true
            }
            _ => false,
        }
    }

    // ── Input mapping ───────────────────────────────────────────────────

    /// Map help modal input to action.
    fn map_help_input(&self, event: &Event) -> Option<Action> {
        let Event::Key(KeyEvent {
            code,
            kind: KeyEventKind::Press,
            ..
        }) = event
        else {
            return None;
        };
        match code {
            KeyCode::Esc | KeyCode::Char('?') => Some(Action::CloseHelp),
            _ => None,
        }
    }

    fn map_input_to_action(&self, event: Event) -> Option<Action> {
        let Event::Key(KeyEvent {
            code,
            modifiers,
            kind: KeyEventKind::Press,
            ..
        }) = event
        else {
            return None;
        };

        // Global keybindings (always active when no modal/sidebar consumes)
        match (modifiers, code) {
            // Ctrl+B → toggle sidebar
            (KeyModifiers::CONTROL, KeyCode::Char('b')) => Some(Action::ToggleSidebar),
            // Ctrl+C → quit
            (KeyModifiers::CONTROL, KeyCode::Char('c')) => Some(Action::Quit),
            // No modifiers
            (KeyModifiers::NONE | KeyModifiers::SHIFT, _) => match code {
                KeyCode::Char('q') => Some(Action::Quit),
                KeyCode::Char('?') => Some(Action::ShowHelp),
                KeyCode::Tab => Some(Action::TabNext),
                KeyCode::BackTab => Some(Action::TabPrev),
                // Number keys jump straight to a view
                KeyCode::Char('1') => Some(Action::FocusChat),
                KeyCode::Char('2') => Some(Action::FocusKnowledge),
                KeyCode::Char('3') => Some(Action::FocusDocuments),
                KeyCode::Char('4') => Some(Action::FocusChatbot),
                KeyCode::Char('5') => Some(Action::FocusPages),
                KeyCode::Char('6') => Some(Action::FocusAnalytics),
                KeyCode::Char('7') => Some(Action::FocusSettings),
                _ => None,
            },
            _ => None,
        }
    }

    fn handle_action(&mut self, action: Action) {
        match action {
            Action::Quit => self.running = false,
            Action::FocusChat => {
                self.set_focus(Focus::Chat);
                self.chat.load(&self.services);
            }
            Action::FocusKnowledge => {
                self.set_focus(Focus::Knowledge);
                self.knowledge.load(&self.services);
            }
            Action::FocusDocuments => {
                self.set_focus(Focus::Documents);
                self.documents.load(&self.services);
            }
            Action::FocusChatbot => {
                self.set_focus(Focus::Chatbot);
                self.chatbot.load(&self.services);
            }
            Action::FocusPages => {
                self.set_focus(Focus::Pages);
                self.pages.load(&self.services);
            }
            Action::FocusAnalytics => {
                self.set_focus(Focus::Analytics);
                self.analytics.load(&self.services);
            }
            Action::FocusSettings => {
                self.set_focus(Focus::Settings);
                self.settings.load(&self.services);
            }
            Action::TabNext => {
                self.focus = self.focus.next();
                self.sidebar.sync_to_focus(self.focus);
                self.on_focus_changed();
            }
            Action::TabPrev => {
                self.focus = self.focus.prev();
                self.sidebar.sync_to_focus(self.focus);
                self.on_focus_changed();
            }
            Action::ToggleSidebar => {
                self.sidebar.toggle_collapse();
                // If expanding and main was focused, switch to sidebar
                if !self.sidebar.user_collapsed {
                    self.area_focus = AreaFocus::Sidebar;
                    self.sidebar.sync_to_focus(self.focus);
                }
            }
            Action::ShowHelp => self.show_help = true,
            Action::CloseHelp => self.show_help = false,
        }
    }

    /// Set focus and sync sidebar selection.
    fn set_focus(&mut self, focus: Focus) {
        self.focus = focus;
        self.sidebar.sync_to_focus(focus);
        self.area_focus = AreaFocus::Main;
    }

    fn on_focus_changed(&mut self) {
        match self.focus {
            Focus::Chat => self.chat.load(&self.services),
            Focus::Knowledge => self.knowledge.load(&self.services),
            Focus::Documents => self.documents.load(&self.services),
            Focus::Chatbot => self.chatbot.load(&self.services),
            Focus::Pages => self.pages.load(&self.services),
            Focus::Analytics => self.analytics.load(&self.services),
            Focus::Settings => self.settings.load(&self.services),
        }
    }

    /// Whether the focused view is in a state that captures all input.
    fn focused_view_editing(&self) -> bool {
        match self.focus {
            Focus::Knowledge => self.knowledge.has_modal(),
            Focus::Documents => self.documents.has_modal(),
            Focus::Chatbot => self.chatbot.has_modal(),
            Focus::Pages => self.pages.has_modal(),
            Focus::Chat | Focus::Analytics | Focus::Settings => false,
        }
    }

    // ── Notifications ───────────────────────────────────────────────────

    /// Push a notification (dedup by message, max 3).
    pub fn push_notification(&mut self, message: String, level: NotificationLevel) {
        if self.notifications.iter().any(|n| n.message == message) {
            return;
        }

        self.notification_counter += 1;
        self.notifications.push(Notification {
            id: self.notification_counter,
            message,
            level,
            ttl_ticks: 100,
        });

        while self.notifications.len() > 3 {
            self.notifications.remove(0);
        }
    }

    /// Tick: decrement notification TTLs, dismiss expired, poll async data.
    fn on_tick(&mut self) {
        for n in &mut self.notifications {
            n.ttl_ticks = n.ttl_ticks.saturating_sub(1);
        }
        self.notifications.retain(|n| n.ttl_ticks > 0);

        // Poll async view data
        self.chat.poll(&self.services);
        self.knowledge.poll();
        self.documents.poll();
        self.chatbot.poll();
        self.pages.poll();
        self.analytics.poll();
        self.settings.poll();
    }

    // ── Rendering ───────────────────────────────────────────────────────

    fn render(&self, frame: &mut Frame) {
        let area = frame.area();

        let (layout, visibility) = AppLayout::compute(area, self.sidebar.user_collapsed);

        // Render sidebar if visible
        if let Some(sidebar_area) = layout.sidebar {
            self.sidebar
                .render(frame, sidebar_area, visibility, self.focus, self.area_focus);
        }

        // Render main content
        self.render_content(frame, layout.main);

        // Render status bar
        self.render_status_bar(frame, layout.status);

        // Overlays
        self.render_notifications(frame, area);

        if self.show_help {
            self.render_help_modal(frame, area);
        }
    }

    fn render_content(&self, frame: &mut Frame, area: Rect) {
        let lang = self.services.language;
        match self.focus {
            Focus::Chat => self.chat.render(frame, area, lang),
            Focus::Knowledge => self.knowledge.render(frame, area, lang),
            Focus::Documents => self.documents.render(frame, area, lang),
            Focus::Chatbot => self.chatbot.render(frame, area, lang),
            Focus::Pages => self.pages.render(frame, area, lang),
            Focus::Analytics => self.analytics.render(frame, area, lang),
            Focus::Settings => self.settings.render(frame, area),
        }
    }

    fn render_status_bar(&self, frame: &mut Frame, area: Rect) {
        let gateway_status = if self.chat.is_sending() {
            Span::styled("đang gửi…", Style::default().fg(theme::PRIMARY_LIGHT))
        } else {
            Span::styled("sẵn sàng", Style::default().fg(theme::TEXT_MUTED))
        };

        let mode_indicator = if self.focus == Focus::Chat
            && self.chat.input_mode() == ChatInputMode::Insert
        {
            Span::styled(" INSERT ", theme::insert_badge())
        } else if self.focused_view_editing() {
            Span::styled(" EDIT ", theme::insert_badge())
        } else {
            Span::raw("")
        };

        let status = Line::from(vec![
            Span::styled(" HaiDesk ", theme::brand_badge()),
            Span::raw(" "),
            mode_indicator,
            Span::raw(" "),
            Span::styled(
                self.focus.label(),
                Style::default()
                    .fg(theme::PRIMARY_LIGHT)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw(" │ "),
            Span::styled("AI:", theme::key_hint()),
            Span::raw(" "),
            gateway_status,
            Span::raw(" │ "),
            Span::styled("Tab", theme::key_hint()),
            Span::raw(":chuyển "),
            Span::styled("Ctrl+B", theme::key_hint()),
            Span::raw(":menu "),
            Span::styled("?", theme::key_hint()),
            Span::raw(":trợ giúp "),
            Span::styled("q", theme::key_hint()),
            Span::raw(":thoát"),
        ]);

        frame.render_widget(Paragraph::new(status), area);
    }

    fn render_notifications(&self, frame: &mut Frame, area: Rect) {
        if self.notifications.is_empty() {
            return;
        }

        let max_width = 50.min(area.width.saturating_sub(2));
        let height = self.notifications.len() as u16;
        let x = area.width.saturating_sub(max_width + 1);
        let y = 1;

        let notification_area = Rect::new(x, y, max_width, height);

        let lines: Vec<Line> = self
            .notifications
            .iter()
            .map(|n| {
                let (prefix, color) = match n.level {
                    NotificationLevel::Info => ("ℹ", theme::INFO),
                    NotificationLevel::Success => ("✓", theme::SUCCESS),
                    NotificationLevel::Warning => ("⚠", theme::WARNING),
                    NotificationLevel::Error => ("✗", theme::ERROR),
                };
                Line::from(vec![
                    Span::styled(format!(" {prefix} "), Style::default().fg(color).bold()),
                    Span::raw(&n.message),
                ])
            })
            .collect();

        frame.render_widget(Clear, notification_area);
        frame.render_widget(Paragraph::new(lines), notification_area);
    }

    fn render_help_modal(&self, frame: &mut Frame, area: Rect) {
        let modal = centered_rect(60, 80, area);

        let keybindings = vec![
            ("Global:", ""),
            ("q", "Quit"),
            ("?", "Toggle this help"),
            ("Tab / Shift+Tab", "Next / previous view"),
            ("1-7", "Jump to view by number"),
            ("Ctrl+B", "Toggle sidebar"),
            ("Ctrl+C", "Force quit"),
            ("", ""),
            ("Sidebar (when focused):", ""),
            ("j/k", "Navigate up/down"),
            ("Enter / l", "Select view"),
            ("h", "Collapse sidebar"),
            ("Esc", "Focus main content"),
            ("", ""),
            ("Chat:", ""),
            ("i / Enter", "Enter insert mode"),
            ("Esc", "Exit insert mode"),
            ("j/k", "Scroll messages"),
            ("G / g", "Jump to bottom / top"),
            ("n", "New session"),
            ("x", "End session and rate"),
            ("", ""),
            ("Knowledge:", ""),
            ("a / e / d", "Add / edit / delete entry"),
            ("/", "Filter entries"),
            ("s", "Seed sample entries"),
            ("r", "Refresh"),
            ("", ""),
            ("Documents:", ""),
            ("a / e / d", "Add / edit / delete document"),
            ("Ctrl+S", "Save (in editor)"),
            ("r", "Refresh"),
            ("", ""),
            ("Chatbot:", ""),
            ("e / Enter", "Edit settings"),
            ("d", "Stage factory defaults"),
            ("Ctrl+S", "Save (in editor)"),
            ("", ""),
            ("Pages:", ""),
            ("h/l", "Switch section tab"),
            ("e / Enter", "Edit section"),
            ("Ctrl+T", "Translate vi → en (in editor)"),
            ("Ctrl+S", "Save (in editor)"),
            ("", ""),
            ("Analytics / Settings:", ""),
            ("j/k", "Scroll"),
            ("r", "Refresh"),
        ];

        let mut lines = vec![
            Line::raw(""),
            Line::from(Span::styled(
                " Keybindings",
                Style::default()
                    .fg(theme::ACCENT)
                    .add_modifier(Modifier::BOLD),
            )),
            Line::raw(""),
        ];

        for (key, desc) in &keybindings {
            if key.is_empty() {
                lines.push(Line::raw(""));
            } else if desc.is_empty() {
                lines.push(Line::from(Span::styled(
                    format!("  {key}"),
                    Style::default()
                        .fg(theme::ACCENT)
                        .add_modifier(Modifier::BOLD),
                )));
            } else {
                lines.push(Line::from(vec![
                    Span::raw("  "),
                    Span::styled(
                        format!("{:<22}", key),
                        Style::default().fg(theme::PRIMARY_LIGHT).bold(),
                    ),
                    Span::raw(*desc),
                ]));
            }
        }

        lines.push(Line::raw(""));
        lines.push(Line::from(vec![
            Span::raw("  Press "),
            Span::styled("?", Style::default().fg(theme::PRIMARY_LIGHT).bold()),
            Span::raw(" or "),
            Span::styled("Esc", Style::default().fg(theme::PRIMARY_LIGHT).bold()),
            Span::raw(" to close"),
        ]));

        let block = Block::default()
            .title(" Help ")
            .title_alignment(Alignment::Center)
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme::ACCENT));

        frame.render_widget(Clear, modal);
        frame.render_widget(Paragraph::new(lines).block(block), modal);
    }
}

/// Calculate a centered rect using percentage of parent area.
fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let popup_layout = Layout::vertical([
        Constraint::Percentage((100 - percent_y) / 2),
        Constraint::Percentage(percent_y),
        Constraint::Percentage((100 - percent_y) / 2),
    ])
    .split(area);

    Layout::horizontal([
        Constraint::Percentage((100 - percent_x) / 2),
        Constraint::Percentage(percent_x),
        Constraint::Percentage((100 - percent_x) / 2),
    ])
    .split(popup_layout[1])[1]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_focus_next_cycles_7() {
        let mut f = Focus::Chat;
        for _ in 0..7 {
            f = f.next();
        }
        assert_eq!(f, Focus::Chat); // Full cycle
    }

    #[test]
    fn test_focus_prev_cycles_7() {
        let mut f = Focus::Chat;
        for _ in 0..7 {
            f = f.prev();
        }
        assert_eq!(f, Focus::Chat); // Full cycle
    }

    #[test]
    fn test_focus_next_first_step() {
        assert_eq!(Focus::Chat.next(), Focus::Knowledge);
        assert_eq!(Focus::Settings.next(), Focus::Chat);
    }

    #[test]
    fn test_focus_prev_first_step() {
        assert_eq!(Focus::Chat.prev(), Focus::Settings);
        assert_eq!(Focus::Knowledge.prev(), Focus::Chat);
    }

    #[test]
    fn test_focus_all_labels() {
        for f in Focus::ALL {
            assert!(!f.label().is_empty());
        }
    }

    #[test]
    fn test_focus_all_icons() {
        for f in Focus::ALL {
            assert!(!f.icon().is_empty());
        }
    }

    #[test]
    fn test_focus_to_action_roundtrip() {
        // Verify each Focus maps to a unique Action
        let actions: Vec<Action> = Focus::ALL.iter().map(|f| f.to_action()).collect();
        for (i, a) in actions.iter().enumerate() {
            for (j, b) in actions.iter().enumerate() {
                if i != j {
                    assert_ne!(
                        a, b,
                        "Focus::{:?} and Focus::{:?} map to same action",
                        Focus::ALL[i], Focus::ALL[j]
                    );
                }
            }
        }
    }

    #[test]
    fn test_centered_rect() {
        let area = Rect::new(0, 0, 100, 50);
        let centered = centered_rect(50, 50, area);
        assert!(centered.x > 0);
        assert!(centered.y > 0);
        assert!(centered.width > 0);
        assert!(centered.height > 0);
        assert!(centered.x + centered.width <= area.width);
        assert!(centered.y + centered.height <= area.height);
    }
}
