//! Chatbot settings view — the assistant's persona and widget copy.
//!
//! Summary mode shows the stored settings; `e` opens a full-screen editor
//! over a working copy. Nothing persists until Ctrl+S, so Esc always discards
//! and `d` can stage the factory defaults without touching the store.

use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::{
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};
use ratatui_textarea::TextArea;
use tokio::sync::mpsc;

use super::super::theme;

use crate::core::i18n::{pick_localized, Language};
use crate::core::storage::{load_chatbot_settings, save_chatbot_settings, ChatbotSettings, QuickAction};
use crate::tui::events::{AppEvent, Notification, NotificationLevel};
use crate::tui::layout::centered_fixed;
use crate::tui::services::Services;
use crate::tui::widgets::input_buffer::InputBuffer;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum ChatbotMode {
    Summary,
    Editor,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum EditorField {
    Name,
    StatusVi,
    StatusEn,
    System,
    WelcomeVi,
    WelcomeEn,
    PlaceholderVi,
    PlaceholderEn,
    Actions,
}

impl EditorField {
    fn next(self) -> Self {
        match self {
            Self::Name => Self::StatusVi,
            Self::StatusVi => Self::StatusEn,
            Self::StatusEn => Self::System,
            Self::System => Self::WelcomeVi,
            Self::WelcomeVi => Self::WelcomeEn,
            Self::WelcomeEn => Self::PlaceholderVi,
            Self::PlaceholderVi => Self::PlaceholderEn,
            Self::PlaceholderEn => Self::Actions,
            Self::Actions => Self::Name,
        }
    }

    fn prev(self) -> Self {
        match self {
            Self::Name => Self::Actions,
            Self::StatusVi => Self::Name,
            Self::StatusEn => Self::StatusVi,
            Self::System => Self::StatusEn,
            Self::WelcomeVi => Self::System,
            Self::WelcomeEn => Self::WelcomeVi,
            Self::PlaceholderVi => Self::WelcomeEn,
            Self::PlaceholderEn => Self::PlaceholderVi,
            Self::Actions => Self::PlaceholderEn,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum ActionField {
    Icon,
    LabelVi,
    LabelEn,
    Prompt,
}

impl ActionField {
    fn next(self) -> Self {
        match self {
            Self::Icon => Self::LabelVi,
            Self::LabelVi => Self::LabelEn,
            Self::LabelEn => Self::Prompt,
            Self::Prompt => Self::Icon,
        }
    }

    fn prev(self) -> Self {
        match self {
            Self::Icon => Self::Prompt,
            Self::LabelVi => Self::Icon,
            Self::LabelEn => Self::LabelVi,
            Self::Prompt => Self::LabelEn,
        }
    }
}

#[derive(Clone, Debug)]
struct ActionModal {
    focused_field: ActionField,
    /// Index into the draft list when editing; `None` appends.
    editing: Option<usize>,
    error: Option<String>,
}

pub struct ChatbotState {
    settings: Option<ChatbotSettings>,
    loading: bool,
    data_rx: mpsc::UnboundedReceiver<ChatbotSettings>,
    data_tx: mpsc::UnboundedSender<ChatbotSettings>,
    mode: ChatbotMode,
    focused_field: EditorField,
    name_ta: TextArea<'static>,
    status_vi_ta: TextArea<'static>,
    status_en_ta: TextArea<'static>,
    system_ta: TextArea<'static>,
    welcome_vi_ta: TextArea<'static>,
    welcome_en_ta: TextArea<'static>,
    placeholder_vi_ta: TextArea<'static>,
    placeholder_en_ta: TextArea<'static>,
    draft_actions: Vec<QuickAction>,
    action_selected: usize,
    action_modal: Option<ActionModal>,
    action_icon_input: InputBuffer,
    action_label_vi_input: InputBuffer,
    action_label_en_input: InputBuffer,
    action_prompt_input: InputBuffer,
    editor_error: Option<String>,
}

impl ChatbotState {
    pub fn new() -> Self {
        let (data_tx, data_rx) = mpsc::unbounded_channel();
        Self {
            settings: None,
            loading: false,
            data_rx,
            data_tx,
            mode: ChatbotMode::Summary,
            focused_field: EditorField::Name,
            name_ta: create_textarea("Name"),
            status_vi_ta: create_textarea("Status (vi)"),
            status_en_ta: create_textarea("Status (en)"),
            system_ta: create_textarea("System instruction"),
            welcome_vi_ta: create_textarea("Welcome (vi)"),
            welcome_en_ta: create_textarea("Welcome (en)"),
            placeholder_vi_ta: create_textarea("Placeholder (vi)"),
            placeholder_en_ta: create_textarea("Placeholder (en)"),
            draft_actions: Vec::new(),
            action_selected: 0,
            action_modal: None,
            action_icon_input: InputBuffer::new(),
            action_label_vi_input: InputBuffer::new(),
            action_label_en_input: InputBuffer::new(),
            action_prompt_input: InputBuffer::new(),
            editor_error: None,
        }
    }

    pub fn has_modal(&self) -> bool {
        self.mode == ChatbotMode::Editor
    }

    /// Trigger async data load from the store.
    pub fn load(&mut self, services: &Services) {
        if self.loading {
            return;
        }
        self.loading = true;

        let db = services.store.db().clone();
        let tx = self.data_tx.clone();

        tokio::spawn(async move {
            let settings = load_chatbot_settings(&db).await;
            let _ = tx.send(settings);
        });
    }

    /// Poll for async data completion. Call from on_tick.
    pub fn poll(&mut self) {
        while let Ok(settings) = self.data_rx.try_recv() {
            self.settings = Some(settings);
            self.loading = false;
        }
    }

    // ── Editor ──────────────────────────────────────────────────────

    fn open_editor(&mut self, settings: &ChatbotSettings, lang: Language) {
        self.name_ta = create_textarea(pick_localized(lang, "Tên trợ lý", "Assistant name"));
        self.status_vi_ta = create_textarea(pick_localized(lang, "Trạng thái (vi)", "Status (vi)"));
        self.status_en_ta = create_textarea(pick_localized(lang, "Trạng thái (en)", "Status (en)"));
        self.system_ta = create_textarea(pick_localized(
            lang,
            "Chỉ dẫn hệ thống",
            "System instruction",
        ));
        self.welcome_vi_ta = create_textarea(pick_localized(lang, "Lời chào (vi)", "Welcome (vi)"));
        self.welcome_en_ta = create_textarea(pick_localized(lang, "Lời chào (en)", "Welcome (en)"));
        self.placeholder_vi_ta =
            create_textarea(pick_localized(lang, "Khung nhập (vi)", "Placeholder (vi)"));
        self.placeholder_en_ta =
            create_textarea(pick_localized(lang, "Khung nhập (en)", "Placeholder (en)"));

        self.name_ta.insert_str(&settings.assistant_name);
        self.status_vi_ta.insert_str(&settings.status_text_vi);
        self.status_en_ta.insert_str(&settings.status_text_en);
        for (i, line) in settings.system_instruction.lines().enumerate() {
            if i > 0 {
                self.system_ta.insert_newline();
            }
            self.system_ta.insert_str(line);
        }
        self.welcome_vi_ta.insert_str(&settings.welcome_message_vi);
        self.welcome_en_ta.insert_str(&settings.welcome_message_en);
        self.placeholder_vi_ta.insert_str(&settings.placeholder_vi);
        self.placeholder_en_ta.insert_str(&settings.placeholder_en);

        self.draft_actions = settings.quick_actions.clone();
        self.action_selected = 0;
        self.action_modal = None;
        self.focused_field = EditorField::Name;
        self.editor_error = None;
        self.focus_textareas();
        self.mode = ChatbotMode::Editor;
    }

    fn focus_textareas(&mut self) {
        let focused = self.focused_field;
        for (field, ta) in [
            (EditorField::Name, &mut self.name_ta),
            (EditorField::StatusVi, &mut self.status_vi_ta),
            (EditorField::StatusEn, &mut self.status_en_ta),
            (EditorField::System, &mut self.system_ta),
            (EditorField::WelcomeVi, &mut self.welcome_vi_ta),
            (EditorField::WelcomeEn, &mut self.welcome_en_ta),
            (EditorField::PlaceholderVi, &mut self.placeholder_vi_ta),
            (EditorField::PlaceholderEn, &mut self.placeholder_en_ta),
        ] {
            let style = if field == focused {
                Style::default().fg(theme::PRIMARY)
            } else {
                Style::default().fg(theme::TEXT_MUTED)
            };
            if let Some(block) = ta.block() {
                ta.set_block(block.clone().border_style(style));
            }
        }
    }

    /// Collect the editor fields into a settings record.
    fn build_settings(&self) -> ChatbotSettings {
        ChatbotSettings {
            system_instruction: self.system_ta.lines().join("\n").trim().to_string(),
            welcome_message_vi: self.welcome_vi_ta.lines().join(" ").trim().to_string(),
            welcome_message_en: self.welcome_en_ta.lines().join(" ").trim().to_string(),
            assistant_name: self.name_ta.lines().join(" ").trim().to_string(),
            status_text_vi: self.status_vi_ta.lines().join(" ").trim().to_string(),
            status_text_en: self.status_en_ta.lines().join(" ").trim().to_string(),
            quick_actions: self.draft_actions.clone(),
            placeholder_vi: self.placeholder_vi_ta.lines().join(" ").trim().to_string(),
            placeholder_en: self.placeholder_en_ta.lines().join(" ").trim().to_string(),
        }
    }

    fn save_editor(&mut self, services: &Services) {
        let lang = services.language;
        let settings = self.build_settings();

        if let Err(message) = validate_draft(&settings, lang) {
            self.editor_error = Some(message);
            return;
        }

        let db = services.store.db().clone();
        let tx = services.event_tx.clone();
        let data_tx = self.data_tx.clone();

        self.mode = ChatbotMode::Summary;

        tokio::spawn(async move {
            let (message, level) = match save_chatbot_settings(&db, &settings).await {
                Ok(()) => (
                    pick_localized(lang, "Đã lưu cài đặt chatbot!", "Chatbot settings saved!")
                        .to_string(),
                    NotificationLevel::Success,
                ),
                Err(e) => {
                    log::error!("Failed to save chatbot settings: {e}");
                    (
                        pick_localized(
                            lang,
                            "Không thể lưu cài đặt. Vui lòng thử lại.",
                            "Could not save the settings. Please try again.",
                        )
                        .to_string(),
                        NotificationLevel::Error,
                    )
                }
            };
            let _ = tx.send(AppEvent::Notification(Notification {
                id: 0,
                message,
                level,
                ttl_ticks: 100,
            }));

            let fresh = load_chatbot_settings(&db).await;
            let _ = data_tx.send(fresh);
        });
    }

    // ── Quick action modal ──────────────────────────────────────────

    fn open_action_modal(&mut self, editing: Option<usize>) {
        self.action_icon_input.clear();
        self.action_label_vi_input.clear();
        self.action_label_en_input.clear();
        self.action_prompt_input.clear();

        if let Some(idx) = editing {
            let Some(action) = self.draft_actions.get(idx) else {
                return;
            };
            self.action_icon_input.set_text(&action.icon);
            self.action_label_vi_input.set_text(&action.label_vi);
            self.action_label_en_input.set_text(&action.label_en);
            self.action_prompt_input.set_text(&action.prompt);
        }

        self.action_modal = Some(ActionModal {
            focused_field: ActionField::Icon,
            editing,
            error: None,
        });
    }

    /// Apply the modal fields to the draft list. Ids stay stable across
    /// edits; new actions get a fresh uuid.
    fn submit_action_modal(&mut self, lang: Language) {
        let Some(ActionModal { editing, .. }) = self.action_modal else {
            return;
        };

        let label_vi = self.action_label_vi_input.text().trim().to_string();
        let prompt = self.action_prompt_input.text().trim().to_string();
        if label_vi.is_empty() || prompt.is_empty() {
            if let Some(ref mut modal) = self.action_modal {
                modal.error = Some(
                    pick_localized(
                        lang,
                        "Cần nhãn tiếng Việt và câu lệnh.",
                        "Vietnamese label and prompt are required.",
                    )
                    .to_string(),
                );
            }
            return;
        }

        let icon = {
            let icon = self.action_icon_input.text().trim().to_string();
            if icon.is_empty() {
                "HelpCircle".to_string()
            } else {
                icon
            }
        };
        let label_en = self.action_label_en_input.text().trim().to_string();

        match editing {
            Some(idx) => {
                if let Some(action) = self.draft_actions.get_mut(idx) {
                    action.icon = icon;
                    action.label_vi = label_vi;
                    action.label_en = label_en;
                    action.prompt = prompt;
                }
            }
            None => {
                self.draft_actions.push(QuickAction {
                    id: uuid::Uuid::new_v4().to_string(),
                    icon,
                    label_vi,
                    label_en,
                    prompt,
                });
                self.action_selected = self.draft_actions.len() - 1;
            }
        }

        self.action_modal = None;
    }

    fn delete_selected_action(&mut self) {
        if self.action_selected < self.draft_actions.len() {
            self.draft_actions.remove(self.action_selected);
            self.action_selected = self
                .action_selected
                .min(self.draft_actions.len().saturating_sub(1));
        }
    }

    // ── Input ───────────────────────────────────────────────────────

    pub fn handle_input(&mut self, event: &Event, services: &Services) -> bool {
        let Event::Key(key) = event else {
            return false;
        };
        if key.kind != KeyEventKind::Press {
            return false;
        }

        match self.mode {
            ChatbotMode::Summary => self.handle_summary_input(key, services),
            ChatbotMode::Editor => self.handle_editor_input(key, services),
        }
    }

    fn handle_summary_input(&mut self, key: &KeyEvent, services: &Services) -> bool {
        match (key.modifiers, key.code) {
            (KeyModifiers::NONE, KeyCode::Char('e') | KeyCode::Enter) => {
                let settings = self.settings.clone().unwrap_or_default();
                self.open_editor(&settings, services.language);
                true
            }
            (KeyModifiers::NONE, KeyCode::Char('d')) => {
                // Stage factory defaults; nothing persists until Ctrl+S
                self.open_editor(&ChatbotSettings::default(), services.language);
                let _ = services.event_tx.send(AppEvent::Notification(Notification {
                    id: 0,
                    message: pick_localized(
                        services.language,
                        "Đã nạp cài đặt mặc định (chưa lưu).",
                        "Defaults staged (not saved yet).",
                    )
                    .to_string(),
                    level: NotificationLevel::Info,
                    ttl_ticks: 100,
                }));
                true
            }
            (KeyModifiers::NONE, KeyCode::Char('r')) => {
                self.load(services);
                true
            }
            _ => false,
        }
    }

    fn handle_editor_input(&mut self, key: &KeyEvent, services: &Services) -> bool {
        if self.action_modal.is_some() {
            return self.handle_action_modal_input(key, services.language);
        }

        match (key.modifiers, key.code) {
            (KeyModifiers::CONTROL, KeyCode::Char('s')) => {
                self.save_editor(services);
                return true;
            }
            (KeyModifiers::NONE, KeyCode::Esc) => {
                self.mode = ChatbotMode::Summary;
                return true;
            }
            (KeyModifiers::NONE, KeyCode::Tab) => {
                self.focused_field = self.focused_field.next();
                self.focus_textareas();
                return true;
            }
            (KeyModifiers::SHIFT, KeyCode::BackTab) => {
                self.focused_field = self.focused_field.prev();
                self.focus_textareas();
                return true;
            }
            _ => {}
        }

        if self.focused_field == EditorField::Actions {
            match key.code {
                KeyCode::Char('j') | KeyCode::Down => {
                    if !self.draft_actions.is_empty() {
                        self.action_selected =
                            (self.action_selected + 1).min(self.draft_actions.len() - 1);
                    }
                }
                KeyCode::Char('k') | KeyCode::Up => {
                    self.action_selected = self.action_selected.saturating_sub(1);
                }
                KeyCode::Char('a') => self.open_action_modal(None),
                KeyCode::Char('e') | KeyCode::Enter => {
                    if !self.draft_actions.is_empty() {
                        self.open_action_modal(Some(self.action_selected));
                    }
                }
                KeyCode::Char('d') => self.delete_selected_action(),
                _ => {}
            }
            return true;
        }

        // Single-line fields: Enter advances instead of inserting a newline
        let multiline = self.focused_field == EditorField::System;
        if key.code == KeyCode::Enter && !multiline {
            self.focused_field = self.focused_field.next();
            self.focus_textareas();
            return true;
        }

        let ta = match self.focused_field {
            EditorField::Name => &mut self.name_ta,
            EditorField::StatusVi => &mut self.status_vi_ta,
            EditorField::StatusEn => &mut self.status_en_ta,
            EditorField::System => &mut self.system_ta,
            EditorField::WelcomeVi => &mut self.welcome_vi_ta,
            EditorField::WelcomeEn => &mut self.welcome_en_ta,
            EditorField::PlaceholderVi => &mut self.placeholder_vi_ta,
            EditorField::PlaceholderEn => &mut self.placeholder_en_ta,
            // Actions focus returned above
            EditorField::Actions => return true,
        };
        ta.input(*key);

        true
    }

    fn handle_action_modal_input(&mut self, key: &KeyEvent, lang: Language) -> bool {
        let Some(ActionModal { focused_field, .. }) = self.action_modal else {
            return false;
        };

        match (key.modifiers, key.code) {
            (KeyModifiers::NONE, KeyCode::Esc) => {
                self.action_modal = None;
            }
            (KeyModifiers::NONE, KeyCode::Tab) => {
                if let Some(ref mut modal) = self.action_modal {
                    modal.focused_field = focused_field.next();
                }
            }
            (KeyModifiers::SHIFT, KeyCode::BackTab) => {
                if let Some(ref mut modal) = self.action_modal {
                    modal.focused_field = focused_field.prev();
                }
            }
            (KeyModifiers::NONE, KeyCode::Enter) => {
                self.submit_action_modal(lang);
            }
            _ => {
                let buf = match focused_field {
                    ActionField::Icon => &mut self.action_icon_input,
                    ActionField::LabelVi => &mut self.action_label_vi_input,
                    ActionField::LabelEn => &mut self.action_label_en_input,
                    ActionField::Prompt => &mut self.action_prompt_input,
                };
                match key.code {
                    KeyCode::Char(c) => buf.insert_char(c),
                    KeyCode::Backspace => buf.backspace(),
                    KeyCode::Delete => buf.delete(),
                    KeyCode::Left => buf.move_left(),
                    KeyCode::Right => buf.move_right(),
                    KeyCode::Home => buf.move_home(),
                    KeyCode::End => buf.move_end(),
                    _ => {}
                }
            }
        }

        true
    }

    // ── Rendering ───────────────────────────────────────────────────

    pub fn render(&self, frame: &mut Frame, area: Rect, lang: Language) {
        match self.mode {
            ChatbotMode::Summary => self.render_summary(frame, area, lang),
            ChatbotMode::Editor => self.render_editor(frame, area, lang),
        }
    }

    fn render_summary(&self, frame: &mut Frame, area: Rect, lang: Language) {
        let block = Block::default()
            .title(" Chatbot ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme::TEXT_MUTED));

        let inner = block.inner(area);
        frame.render_widget(block, area);

        let Some(ref settings) = self.settings else {
            let loading = Paragraph::new(vec![
                Line::raw(""),
                Line::from(vec![
                    Span::raw("  "),
                    Span::styled(
                        pick_localized(lang, "Đang tải dữ liệu...", "Loading data..."),
                        Style::default().fg(theme::TEXT_MUTED),
                    ),
                ]),
            ]);
            frame.render_widget(loading, inner);
            return;
        };

        let mut lines = vec![Line::raw("")];

        push_section(&mut lines, pick_localized(lang, "Trợ lý", "Assistant"));
        push_kv(&mut lines, pick_localized(lang, "Tên", "Name"), &settings.assistant_name);
        push_kv(&mut lines, pick_localized(lang, "Trạng thái (vi)", "Status (vi)"), &settings.status_text_vi);
        push_kv(&mut lines, pick_localized(lang, "Trạng thái (en)", "Status (en)"), &settings.status_text_en);
        lines.push(Line::raw(""));

        push_section(
            &mut lines,
            pick_localized(lang, "Chỉ dẫn hệ thống", "System instruction"),
        );
        for instruction_line in settings.system_instruction.lines().take(3) {
            lines.push(Line::from(vec![
                Span::raw("    "),
                Span::styled(
                    truncate(instruction_line, 76),
                    Style::default().fg(theme::TEXT),
                ),
            ]));
        }
        lines.push(Line::raw(""));

        push_section(&mut lines, pick_localized(lang, "Lời chào", "Welcome"));
        push_kv(&mut lines, "vi", &truncate(&settings.welcome_message_vi, 64));
        push_kv(&mut lines, "en", &truncate(&settings.welcome_message_en, 64));
        lines.push(Line::raw(""));

        push_section(&mut lines, pick_localized(lang, "Khung nhập", "Placeholder"));
        push_kv(&mut lines, "vi", &settings.placeholder_vi);
        push_kv(&mut lines, "en", &settings.placeholder_en);
        lines.push(Line::raw(""));

        push_section(
            &mut lines,
            &format!(
                "{} ({})",
                pick_localized(lang, "Gợi ý nhanh", "Quick actions"),
                settings.quick_actions.len()
            ),
        );
        if settings.quick_actions.is_empty() {
            lines.push(Line::from(vec![
                Span::raw("    "),
                Span::styled(
                    pick_localized(lang, "Không có gợi ý nào.", "No quick actions."),
                    Style::default().fg(theme::TEXT_DIM),
                ),
            ]));
        }
        for action in &settings.quick_actions {
            lines.push(Line::from(vec![
                Span::raw("    "),
                Span::styled("• ", Style::default().fg(theme::ACCENT)),
                Span::styled(
                    format!("{:<22}", truncate(action.label(lang), 20)),
                    Style::default().fg(theme::TEXT),
                ),
                Span::styled(
                    format!("→ {}", truncate(&action.prompt, 40)),
                    Style::default().fg(theme::TEXT_MUTED),
                ),
            ]));
        }

        lines.push(Line::raw(""));
        lines.push(Line::from(vec![
            Span::raw("  "),
            Span::styled("e", Style::default().fg(theme::TEXT_MUTED)),
            Span::raw(pick_localized(lang, ":sửa ", ":edit ")),
            Span::styled("d", Style::default().fg(theme::TEXT_MUTED)),
            Span::raw(pick_localized(lang, ":mặc định ", ":defaults ")),
            Span::styled("r", Style::default().fg(theme::TEXT_MUTED)),
            Span::raw(pick_localized(lang, ":tải lại", ":reload")),
        ]));

        frame.render_widget(Paragraph::new(lines), inner);
    }

    fn render_editor(&self, frame: &mut Frame, area: Rect, lang: Language) {
        let block = Block::default()
            .title(pick_localized(lang, " Sửa chatbot ", " Edit Chatbot "))
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme::ACCENT));

        let inner = block.inner(area);
        frame.render_widget(block, area);

        let chunks = Layout::vertical([
            Constraint::Length(3), // name + status row
            Constraint::Length(5), // system instruction (multiline)
            Constraint::Length(3), // welcome row
            Constraint::Length(3), // placeholder row
            Constraint::Min(5),    // quick actions
            Constraint::Length(1), // error
            Constraint::Length(1), // footer
        ])
        .split(inner);

        let row1 = Layout::horizontal([
            Constraint::Percentage(34),
            Constraint::Percentage(33),
            Constraint::Percentage(33),
        ])
        .split(chunks[0]);
        frame.render_widget(&self.name_ta, row1[0]);
        frame.render_widget(&self.status_vi_ta, row1[1]);
        frame.render_widget(&self.status_en_ta, row1[2]);

        frame.render_widget(&self.system_ta, chunks[1]);

        let row2 =
            Layout::horizontal([Constraint::Percentage(50), Constraint::Percentage(50)])
                .split(chunks[2]);
        frame.render_widget(&self.welcome_vi_ta, row2[0]);
        frame.render_widget(&self.welcome_en_ta, row2[1]);

        let row3 =
            Layout::horizontal([Constraint::Percentage(50), Constraint::Percentage(50)])
                .split(chunks[3]);
        frame.render_widget(&self.placeholder_vi_ta, row3[0]);
        frame.render_widget(&self.placeholder_en_ta, row3[1]);

        self.render_actions_panel(frame, chunks[4], lang);

        if let Some(ref err) = self.editor_error {
            let error_line = Line::from(vec![
                Span::raw(" "),
                Span::styled(
                    err.clone(),
                    Style::default().fg(theme::ERROR).add_modifier(Modifier::BOLD),
                ),
            ]);
            frame.render_widget(Paragraph::new(error_line), chunks[5]);
        }

        let footer = Line::from(vec![
            Span::raw(" "),
            Span::styled("Tab", Style::default().fg(theme::TEXT_MUTED)),
            Span::raw(":next  "),
            Span::styled("Ctrl+S", Style::default().fg(theme::TEXT_MUTED)),
            Span::raw(pick_localized(lang, ":lưu  ", ":save  ")),
            Span::styled("Esc", Style::default().fg(theme::TEXT_MUTED)),
            Span::raw(pick_localized(lang, ":hủy", ":cancel")),
        ]);
        frame.render_widget(Paragraph::new(footer), chunks[6]);

        if self.action_modal.is_some() {
            self.render_action_modal(frame, area, lang);
        }
    }

    fn render_actions_panel(&self, frame: &mut Frame, area: Rect, lang: Language) {
        let focused = self.focused_field == EditorField::Actions;
        let border = if focused {
            Style::default().fg(theme::PRIMARY)
        } else {
            Style::default().fg(theme::TEXT_MUTED)
        };
        let block = Block::default()
            .title(format!(
                " {} ({}) ",
                pick_localized(lang, "Gợi ý nhanh", "Quick actions"),
                self.draft_actions.len()
            ))
            .borders(Borders::ALL)
            .border_style(border);

        let inner = block.inner(area);
        frame.render_widget(block, area);

        let mut lines = Vec::new();
        if self.draft_actions.is_empty() {
            lines.push(Line::from(vec![
                Span::raw("  "),
                Span::styled(
                    pick_localized(lang, "Chưa có gợi ý nào.", "No quick actions yet."),
                    Style::default().fg(theme::TEXT_DIM),
                ),
            ]));
        }
        for (i, action) in self.draft_actions.iter().enumerate() {
            let is_selected = focused && i == self.action_selected;
            let cursor = if is_selected { "▸ " } else { "  " };
            lines.push(Line::from(vec![
                Span::styled(
                    cursor.to_string(),
                    if is_selected {
                        Style::default().fg(theme::ACCENT)
                    } else {
                        Style::default()
                    },
                ),
                Span::styled(
                    format!("{:<12}", truncate(&action.icon, 12)),
                    Style::default().fg(theme::TEXT_DIM),
                ),
                Span::styled(
                    format!("{:<22}", truncate(&action.label_vi, 20)),
                    if is_selected {
                        Style::default().add_modifier(Modifier::BOLD)
                    } else {
                        Style::default()
                    },
                ),
                Span::styled(
                    format!("→ {}", truncate(&action.prompt, 32)),
                    Style::default().fg(theme::TEXT_MUTED),
                ),
            ]));
        }
        if focused {
            lines.push(Line::raw(""));
            lines.push(Line::from(vec![
                Span::raw("  "),
                Span::styled("a", Style::default().fg(theme::TEXT_MUTED)),
                Span::raw(":thêm "),
                Span::styled("e", Style::default().fg(theme::TEXT_MUTED)),
                Span::raw(":sửa "),
                Span::styled("d", Style::default().fg(theme::TEXT_MUTED)),
                Span::raw(":xóa "),
                Span::styled("j/k", Style::default().fg(theme::TEXT_MUTED)),
                Span::raw(":chọn"),
            ]));
        }

        frame.render_widget(Paragraph::new(lines), inner);
    }

    fn render_action_modal(&self, frame: &mut Frame, area: Rect, lang: Language) {
        let Some(ActionModal {
            focused_field,
            editing,
            ref error,
        }) = self.action_modal
        else {
            return;
        };

        let modal_area = centered_fixed(58, 16, area);
        let title = if editing.is_some() {
            pick_localized(lang, " Sửa gợi ý ", " Edit Quick Action ")
        } else {
            pick_localized(lang, " Thêm gợi ý ", " Add Quick Action ")
        };
        let block = Block::default()
            .title(title)
            .title_alignment(Alignment::Center)
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme::ACCENT));

        let mut lines = vec![Line::raw("")];
        push_text_field(
            &mut lines,
            "Icon:",
            &self.action_icon_input,
            focused_field == ActionField::Icon,
        );
        push_text_field(
            &mut lines,
            pick_localized(lang, "Nhãn (vi):", "Label (vi):"),
            &self.action_label_vi_input,
            focused_field == ActionField::LabelVi,
        );
        push_text_field(
            &mut lines,
            pick_localized(lang, "Nhãn (en):", "Label (en):"),
            &self.action_label_en_input,
            focused_field == ActionField::LabelEn,
        );
        push_text_field(
            &mut lines,
            pick_localized(lang, "Câu lệnh:", "Prompt:"),
            &self.action_prompt_input,
            focused_field == ActionField::Prompt,
        );

        if let Some(err) = error {
            lines.push(Line::from(vec![
                Span::raw("  "),
                Span::styled(
                    err.clone(),
                    Style::default().fg(theme::ERROR).add_modifier(Modifier::BOLD),
                ),
            ]));
        } else {
            lines.push(Line::raw(""));
        }

        lines.push(Line::from(vec![
            Span::raw("  "),
            Span::styled("Tab", Style::default().fg(theme::TEXT_MUTED)),
            Span::raw(":next  "),
            Span::styled("Enter", Style::default().fg(theme::TEXT_MUTED)),
            Span::raw(pick_localized(lang, ":lưu  ", ":save  ")),
            Span::styled("Esc", Style::default().fg(theme::TEXT_MUTED)),
            Span::raw(pick_localized(lang, ":hủy", ":cancel")),
        ]));

        frame.render_widget(Clear, modal_area);
        frame.render_widget(Paragraph::new(lines).block(block), modal_area);
    }
}

/// Required fields before a save is attempted.
fn validate_draft(settings: &ChatbotSettings, lang: Language) -> Result<(), String> {
    if settings.assistant_name.is_empty() {
        return Err(pick_localized(
            lang,
            "Tên trợ lý không được để trống.",
            "Assistant name must not be empty.",
        )
        .to_string());
    }
    if settings.system_instruction.is_empty() {
        return Err(pick_localized(
            lang,
            "Chỉ dẫn hệ thống không được để trống.",
            "System instruction must not be empty.",
        )
        .to_string());
    }
    if settings.welcome_message_vi.is_empty() {
        return Err(pick_localized(
            lang,
            "Lời chào tiếng Việt không được để trống.",
            "Vietnamese welcome message must not be empty.",
        )
        .to_string());
    }
    Ok(())
}

fn create_textarea(title: &'static str) -> TextArea<'static> {
    let mut ta = TextArea::default();
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme::TEXT_MUTED))
        .title(title);
    ta.set_block(block);
    ta.set_cursor_line_style(Style::default());
    ta
}

fn push_section(lines: &mut Vec<Line<'static>>, label: &str) {
    lines.push(Line::from(vec![
        Span::raw("  "),
        Span::styled(
            label.to_string(),
            Style::default()
                .fg(theme::ACCENT)
                .add_modifier(Modifier::BOLD),
        ),
    ]));
}

fn push_kv(lines: &mut Vec<Line<'static>>, key: &str, value: &str) {
    lines.push(Line::from(vec![
        Span::raw("    "),
        Span::styled(
            format!("{key:<16}"),
            Style::default().fg(theme::TEXT_MUTED),
        ),
        Span::styled(value.to_string(), Style::default().fg(theme::TEXT)),
    ]));
}

/// Label + value rows for one text field of the action modal.
fn push_text_field(
    lines: &mut Vec<Line<'static>>,
    label: &str,
    input: &InputBuffer,
    focused: bool,
) {
    let label_style = if focused {
        Style::default()
            .fg(theme::PRIMARY_LIGHT)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(theme::TEXT_MUTED)
    };
    lines.push(Line::from(vec![
        Span::raw("  "),
        Span::styled(label.to_string(), label_style),
    ]));

    let cursor = if focused { "_" } else { "" };
    let text = input.text();
    let value_style = if focused {
        Style::default().fg(theme::TEXT)
    } else {
        Style::default().fg(theme::TEXT_MUTED)
    };
    lines.push(Line::from(vec![
        Span::raw("  "),
        Span::styled(
            if focused { "▸ " } else { "  " },
            Style::default().fg(theme::ACCENT),
        ),
        Span::styled(format!("{text}{cursor}"), value_style),
    ]));
    lines.push(Line::raw(""));
}

/// Char-boundary-safe truncation with an ellipsis.
fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() > max {
        let cut: String = s.chars().take(max.saturating_sub(1)).collect();
        format!("{cut}…")
    } else {
        s.to_string()
    }
}
