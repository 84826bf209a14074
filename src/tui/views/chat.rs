//! Support chat view — the console rendition of the site chat widget.
//!
//! Mirrors the widget lifecycle: chatbot settings load when the view opens,
//! sends are optimistic, a failed turn appends exactly one fallback bubble,
//! and a session can be rated post-hoc from the rating modal.

use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Scrollbar, ScrollbarOrientation, ScrollbarState},
    Frame,
};
use tokio::sync::mpsc;

use super::super::theme;

use crate::core::i18n::{pick_localized, Language};
use crate::core::storage::{
    chat_history, end_session, load_chatbot_settings, save_chat_message, start_session,
    submit_rating, ChatMessage, ChatbotSettings,
};
use crate::tui::events::{AppEvent, Notification, NotificationLevel};
use crate::tui::layout::centered_fixed;
use crate::tui::services::Services;
use crate::tui::widgets::input_buffer::InputBuffer;
use crate::tui::widgets::markdown::markdown_to_lines;

// ============================================================================
// Types
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatInputMode {
    Normal,
    Insert,
}

/// Where the conversation is in its lifecycle. Sends are only accepted in
/// `Ready`; one turn is in flight at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatPhase {
    /// Settings and history are still loading.
    AwaitingSettings,
    Ready,
    /// A send is in flight; the composer is disabled until the reply or
    /// fallback lands.
    Sending,
}

struct DisplayMessage {
    is_bot: bool,
    raw_content: String,
    rendered_lines: Vec<Line<'static>>,
}

impl DisplayMessage {
    fn user(content: &str) -> Self {
        Self {
            is_bot: false,
            raw_content: content.to_string(),
            rendered_lines: markdown_to_lines(content),
        }
    }

    fn bot(content: &str) -> Self {
        Self {
            is_bot: true,
            raw_content: content.to_string(),
            rendered_lines: markdown_to_lines(content),
        }
    }

    fn from_message(msg: &ChatMessage) -> Self {
        if msg.is_bot {
            Self::bot(&msg.content)
        } else {
            Self::user(&msg.content)
        }
    }

    fn role_header(&self, assistant_name: &str, lang: Language) -> Line<'static> {
        let (label, color) = if self.is_bot {
            (assistant_name.to_string(), theme::BOT)
        } else {
            (
                pick_localized(lang, "Bạn", "You").to_string(),
                theme::SUCCESS,
            )
        };
        Line::from(Span::styled(
            format!("── {label} ──"),
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        ))
    }

    fn all_lines(&self, assistant_name: &str, lang: Language) -> Vec<Line<'static>> {
        let mut out = vec![self.role_header(assistant_name, lang)];
        out.extend(self.rendered_lines.clone());
        out.push(Line::raw(""));
        out
    }
}

/// Everything the view needs before it can accept input, fetched in one
/// spawned task.
struct ChatBootstrap {
    settings: ChatbotSettings,
    history: Vec<ChatMessage>,
    /// Empty when the session record could not be created; the chat still
    /// works, turns just persist without a session id.
    session_id: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RatingField {
    Stars,
    Feedback,
}

struct RatingModal {
    stars: u8,
    feedback: InputBuffer,
    focused_field: RatingField,
}

impl RatingModal {
    fn new() -> Self {
        Self {
            stars: 5,
            feedback: InputBuffer::new(),
            focused_field: RatingField::Stars,
        }
    }
}

// ============================================================================
// Chat input rendering
// ============================================================================

fn render_chat_input(
    input: &InputBuffer,
    mode: ChatInputMode,
    sending: bool,
    placeholder: &str,
) -> Paragraph<'static> {
    let (border_color, title) = match mode {
        ChatInputMode::Insert => (theme::ACCENT, " Tin nhắn (Esc để thoát) "),
        ChatInputMode::Normal => (theme::TEXT_MUTED, " Tin nhắn "),
    };

    let text = input.text();
    let cursor = input.cursor_position();

    let display = if text.is_empty() {
        Line::styled(
            placeholder.to_string(),
            Style::default().fg(theme::TEXT_MUTED),
        )
    } else {
        let before = &text[..cursor];
        let cursor_char = text[cursor..]
            .chars()
            .next()
            .map(|c| c.to_string())
            .unwrap_or_else(|| " ".to_string());
        let after_cursor = if cursor < text.len() {
            let char_len = cursor_char.len();
            &text[cursor + char_len..]
        } else {
            ""
        };

        if mode == ChatInputMode::Insert {
            Line::from(vec![
                Span::raw(before.to_string()),
                Span::styled(
                    cursor_char,
                    Style::default().bg(theme::TEXT).fg(theme::BG_BASE),
                ),
                Span::raw(after_cursor.to_string()),
            ])
        } else {
            Line::raw(text.to_string())
        }
    };

    let mut block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border_color))
        .title(title);

    if sending {
        block = block.title_bottom(Line::styled(
            " đang gửi... ",
            Style::default().fg(theme::PRIMARY_LIGHT),
        ));
    }

    Paragraph::new(display).block(block)
}

// ============================================================================
// State
// ============================================================================

pub struct ChatState {
    phase: ChatPhase,
    input_mode: ChatInputMode,
    input: InputBuffer,
    messages: Vec<DisplayMessage>,
    settings: Option<ChatbotSettings>,
    session_id: String,
    /// Turns persisted in this session, reported to `end_session`.
    session_messages: i64,
    scroll_offset: usize,
    auto_scroll: bool,
    loading: bool,
    rating: Option<RatingModal>,
    data_tx: mpsc::UnboundedSender<ChatBootstrap>,
    data_rx: mpsc::UnboundedReceiver<ChatBootstrap>,
}

impl ChatState {
    pub fn new() -> Self {
        let (data_tx, data_rx) = mpsc::unbounded_channel();
        Self {
            phase: ChatPhase::AwaitingSettings,
            input_mode: ChatInputMode::Normal,
            input: InputBuffer::new(),
            messages: Vec::new(),
            settings: None,
            session_id: String::new(),
            session_messages: 0,
            scroll_offset: 0,
            auto_scroll: true,
            loading: false,
            rating: None,
            data_tx,
            data_rx,
        }
    }

    pub fn input_mode(&self) -> ChatInputMode {
        self.input_mode
    }

    pub fn is_sending(&self) -> bool {
        self.phase == ChatPhase::Sending
    }

    // ── Bootstrap ────────────────────────────────────────────────────

    /// Kick off the settings/history/session load. Safe to call on every
    /// focus; subsequent calls are no-ops once loaded.
    pub fn load(&mut self, services: &Services) {
        if self.loading || self.settings.is_some() {
            return;
        }
        self.loading = true;

        let db = services.store.db().clone();
        let operator = services.operator.clone();
        let tx = self.data_tx.clone();

        tokio::spawn(async move {
            let settings = load_chatbot_settings(&db).await;
            let history = chat_history(&db, &operator).await;
            let user_agent = format!("haidesk-console/{}", crate::VERSION);
            let session_id = start_session(&db, &operator, &user_agent).await;
            let _ = tx.send(ChatBootstrap {
                settings,
                history,
                session_id,
            });
        });
    }

    /// Drain the bootstrap channel. Called from the app on every tick.
    pub fn poll(&mut self, services: &Services) {
        while let Ok(bootstrap) = self.data_rx.try_recv() {
            self.apply_bootstrap(bootstrap, services.language);
        }
    }

    fn apply_bootstrap(&mut self, bootstrap: ChatBootstrap, lang: Language) {
        self.loading = false;
        self.session_id = bootstrap.session_id;

        // The welcome bubble is synthetic: always first, never persisted.
        let mut messages = vec![DisplayMessage::bot(bootstrap.settings.welcome_message(lang))];
        messages.extend(bootstrap.history.iter().map(DisplayMessage::from_message));
        self.messages = messages;

        self.settings = Some(bootstrap.settings);
        self.phase = ChatPhase::Ready;
        self.scroll_to_bottom();
    }

    /// Quick actions show only in the untouched state: just the welcome
    /// bubble on screen.
    fn quick_actions_visible(&self) -> bool {
        self.settings
            .as_ref()
            .map(|s| !s.quick_actions.is_empty())
            .unwrap_or(false)
            && self.messages.len() <= 1
    }

    // ── Input handling (two-phase) ───────────────────────────────────

    /// Returns true if the event was consumed (don't pass to global handler).
    pub fn handle_input(&mut self, event: &Event, services: &Services) -> bool {
        let Event::Key(KeyEvent {
            code,
            modifiers,
            kind: KeyEventKind::Press,
            ..
        }) = event
        else {
            return false;
        };

        if self.rating.is_some() {
            return self.handle_rating_input(*code, *modifiers, services);
        }

        match self.input_mode {
            ChatInputMode::Insert => self.handle_insert_input(*code, *modifiers, services),
            ChatInputMode::Normal => self.handle_normal_input(*code, *modifiers, services),
        }
    }

    fn handle_insert_input(
        &mut self,
        code: KeyCode,
        modifiers: KeyModifiers,
        services: &Services,
    ) -> bool {
        // These always fall through to global
        match (modifiers, code) {
            (KeyModifiers::CONTROL, KeyCode::Char('c')) => return false,
            (_, KeyCode::Tab) | (_, KeyCode::BackTab) => return false,
            _ => {}
        }

        match (modifiers, code) {
            (KeyModifiers::NONE, KeyCode::Esc) => {
                self.input_mode = ChatInputMode::Normal;
                true
            }
            (KeyModifiers::NONE, KeyCode::Enter) => {
                if self.phase == ChatPhase::Ready && !self.input.is_empty() {
                    let text = self.input.take();
                    self.send_message(&text, services);
                }
                true
            }
            (KeyModifiers::NONE, KeyCode::Backspace) => {
                self.input.backspace();
                true
            }
            (KeyModifiers::NONE, KeyCode::Delete) => {
                self.input.delete();
                true
            }
            (KeyModifiers::NONE, KeyCode::Left) => {
                self.input.move_left();
                true
            }
            (KeyModifiers::NONE, KeyCode::Right) => {
                self.input.move_right();
                true
            }
            (KeyModifiers::NONE, KeyCode::Home) => {
                self.input.move_home();
                true
            }
            (KeyModifiers::NONE, KeyCode::End) => {
                self.input.move_end();
                true
            }
            (KeyModifiers::CONTROL, KeyCode::Char('u')) => {
                self.input.clear();
                true
            }
            (KeyModifiers::CONTROL, KeyCode::Char('a')) => {
                self.input.move_home();
                true
            }
            (KeyModifiers::CONTROL, KeyCode::Char('e')) => {
                self.input.move_end();
                true
            }
            (_, KeyCode::Char(c)) => {
                self.input.insert_char(c);
                true
            }
            _ => true, // Consume but ignore other keys in insert mode
        }
    }

    fn handle_normal_input(
        &mut self,
        code: KeyCode,
        modifiers: KeyModifiers,
        services: &Services,
    ) -> bool {
        if modifiers != KeyModifiers::NONE && modifiers != KeyModifiers::SHIFT {
            return false;
        }

        match code {
            // Enter insert mode (not while a send is in flight)
            KeyCode::Char('i') | KeyCode::Char('a') | KeyCode::Enter => {
                if self.phase == ChatPhase::Ready {
                    self.input_mode = ChatInputMode::Insert;
                }
                true
            }
            // Scroll
            KeyCode::Char('j') | KeyCode::Down => {
                self.scroll_down(1);
                true
            }
            KeyCode::Char('k') | KeyCode::Up => {
                self.scroll_up(1);
                true
            }
            KeyCode::Char('G') | KeyCode::End => {
                self.scroll_to_bottom();
                true
            }
            KeyCode::Char('g') | KeyCode::Home => {
                self.scroll_to_top();
                true
            }
            KeyCode::PageDown => {
                self.scroll_down(10);
                true
            }
            KeyCode::PageUp => {
                self.scroll_up(10);
                true
            }
            // Session controls
            KeyCode::Char('n') => {
                self.start_new_session(services);
                true
            }
            KeyCode::Char('r') => {
                self.open_rating(services);
                true
            }
            // Quick actions by number, only while they are on screen
            KeyCode::Char(c @ '1'..='9') if self.quick_actions_visible() => {
                let idx = (c as usize) - ('1' as usize);
                let prompt = self
                    .settings
                    .as_ref()
                    .and_then(|s| s.quick_actions.get(idx))
                    .map(|a| a.prompt.clone());
                if let Some(prompt) = prompt {
                    if self.phase == ChatPhase::Ready {
                        self.send_message(&prompt, services);
                    }
                }
                true
            }
            _ => false, // Fall through to global handler
        }
    }

    // ── Sending ──────────────────────────────────────────────────────

    fn send_message(&mut self, text: &str, services: &Services) {
        if self.phase != ChatPhase::Ready {
            return;
        }

        // 1. Optimistic append
        self.messages.push(DisplayMessage::user(text));
        self.phase = ChatPhase::Sending;
        self.scroll_to_bottom();

        // 2. Persist the user turn; failures are logged inside.
        let record = ChatMessage::from_user(text, &services.operator, &self.session_id);
        let db = services.store.db().clone();
        tokio::spawn(async move {
            save_chat_message(&db, &record).await;
        });
        self.session_messages += 1;

        // 3. Relay to the gateway off the event loop
        let assistant = services.assistant.clone();
        let db = services.store.db().clone();
        let tx = services.event_tx.clone();
        let lang = services.language;
        let text = text.to_string();
        tokio::spawn(async move {
            match assistant.send_message(&db, &text).await {
                Ok(reply) => {
                    let _ = tx.send(AppEvent::BotReply(reply));
                }
                Err(e) => {
                    log::error!("Gateway chat failed: {e}");
                    let _ = tx.send(AppEvent::BotFailed(e.user_message(lang).to_string()));
                }
            }
        });
    }

    /// The gateway replied for the in-flight turn.
    pub fn on_bot_reply(&mut self, reply: String, services: &Services) {
        if self.phase != ChatPhase::Sending {
            // A reply for a turn the operator already abandoned (new session).
            return;
        }
        self.messages.push(DisplayMessage::bot(&reply));
        self.phase = ChatPhase::Ready;
        self.scroll_to_bottom();

        let record = ChatMessage::from_bot(&reply, &services.operator, &self.session_id);
        let db = services.store.db().clone();
        tokio::spawn(async move {
            save_chat_message(&db, &record).await;
        });
        self.session_messages += 1;
    }

    /// The in-flight turn failed. One fallback bubble, one toast, and the
    /// composer unlocks; the failed turn is not retried.
    pub fn on_bot_failed(&mut self, message: String, services: &Services) {
        if self.phase != ChatPhase::Sending {
            return;
        }
        self.messages.push(DisplayMessage::bot(&message));
        self.phase = ChatPhase::Ready;
        self.scroll_to_bottom();

        let _ = services.event_tx.send(AppEvent::Notification(Notification {
            id: 0,
            message,
            level: NotificationLevel::Error,
            ttl_ticks: 100,
        }));
    }

    // ── Session lifecycle ────────────────────────────────────────────

    fn start_new_session(&mut self, services: &Services) {
        if self.loading {
            return;
        }

        // Close out the previous session before opening the next.
        if !self.session_id.is_empty() {
            let db = services.store.db().clone();
            let sid = std::mem::take(&mut self.session_id);
            let count = self.session_messages;
            tokio::spawn(async move {
                end_session(&db, &sid, count).await;
            });
        }

        self.session_messages = 0;
        self.messages.clear();
        self.settings = None;
        self.phase = ChatPhase::AwaitingSettings;
        self.input.clear();
        self.input_mode = ChatInputMode::Normal;
        self.scroll_offset = 0;
        self.auto_scroll = true;
        self.load(services);
    }

    fn open_rating(&mut self, services: &Services) {
        if self.session_id.is_empty() {
            let _ = services.event_tx.send(AppEvent::Notification(Notification {
                id: 0,
                message: pick_localized(
                    services.language,
                    "Chưa có phiên hỗ trợ để đánh giá",
                    "No support session to rate yet",
                )
                .to_string(),
                level: NotificationLevel::Warning,
                ttl_ticks: 80,
            }));
            return;
        }
        self.rating = Some(RatingModal::new());
    }

    fn handle_rating_input(
        &mut self,
        code: KeyCode,
        modifiers: KeyModifiers,
        services: &Services,
    ) -> bool {
        let Some(mut modal) = self.rating.take() else {
            return false;
        };

        match (modifiers, code) {
            (KeyModifiers::NONE, KeyCode::Esc) => {
                // Dropped without submitting
                return true;
            }
            (KeyModifiers::NONE, KeyCode::Tab) | (KeyModifiers::SHIFT, KeyCode::BackTab) => {
                modal.focused_field = match modal.focused_field {
                    RatingField::Stars => RatingField::Feedback,
                    RatingField::Feedback => RatingField::Stars,
                };
            }
            (KeyModifiers::NONE, KeyCode::Enter) => {
                self.submit_rating(modal, services);
                return true;
            }
            _ => match modal.focused_field {
                RatingField::Stars => match (modifiers, code) {
                    (KeyModifiers::NONE, KeyCode::Left) => {
                        modal.stars = modal.stars.saturating_sub(1).max(1);
                    }
                    (KeyModifiers::NONE, KeyCode::Right) => {
                        modal.stars = (modal.stars + 1).min(5);
                    }
                    (KeyModifiers::NONE, KeyCode::Char(c @ '1'..='5')) => {
                        modal.stars = (c as u8) - b'0';
                    }
                    _ => {}
                },
                RatingField::Feedback => match (modifiers, code) {
                    (KeyModifiers::NONE, KeyCode::Backspace) => {
                        modal.feedback.backspace();
                    }
                    (KeyModifiers::NONE, KeyCode::Left) => {
                        modal.feedback.move_left();
                    }
                    (KeyModifiers::NONE, KeyCode::Right) => {
                        modal.feedback.move_right();
                    }
                    (_, KeyCode::Char(c)) => {
                        modal.feedback.insert_char(c);
                    }
                    _ => {}
                },
            },
        }

        self.rating = Some(modal);
        true
    }

    fn submit_rating(&mut self, modal: RatingModal, services: &Services) {
        let db = services.store.db().clone();
        let sid = self.session_id.clone();
        let stars = modal.stars;
        let feedback_text = modal.feedback.text().trim().to_string();
        tokio::spawn(async move {
            let feedback = (!feedback_text.is_empty()).then_some(feedback_text.as_str());
            submit_rating(&db, &sid, stars, feedback).await;
        });

        let _ = services.event_tx.send(AppEvent::Notification(Notification {
            id: 0,
            message: pick_localized(
                services.language,
                "Cảm ơn bạn đã đánh giá!",
                "Thanks for your feedback!",
            )
            .to_string(),
            level: NotificationLevel::Success,
            ttl_ticks: 80,
        }));
    }

    // ── Scrolling ────────────────────────────────────────────────────

    fn total_content_lines(&self, lang: Language) -> usize {
        let name = self.assistant_name();
        let mut total: usize = self
            .messages
            .iter()
            .map(|m| m.all_lines(&name, lang).len())
            .sum();
        if self.phase == ChatPhase::Sending {
            total += 3; // typing indicator block
        }
        total
    }

    fn scroll_down(&mut self, n: usize) {
        self.scroll_offset = self.scroll_offset.saturating_add(n);
        self.auto_scroll = false;
    }

    fn scroll_up(&mut self, n: usize) {
        self.scroll_offset = self.scroll_offset.saturating_sub(n);
        self.auto_scroll = false;
    }

    fn scroll_to_bottom(&mut self) {
        self.scroll_offset = usize::MAX;
        self.auto_scroll = true;
    }

    fn scroll_to_top(&mut self) {
        self.scroll_offset = 0;
        self.auto_scroll = false;
    }

    fn assistant_name(&self) -> String {
        self.settings
            .as_ref()
            .map(|s| s.assistant_name.clone())
            .unwrap_or_else(|| "Assistant".to_string())
    }

    // ── Rendering ────────────────────────────────────────────────────

    pub fn render(&self, frame: &mut Frame, area: Rect, lang: Language) {
        let quick_height = if self.quick_actions_visible() {
            let count = self
                .settings
                .as_ref()
                .map(|s| s.quick_actions.len())
                .unwrap_or(0);
            count as u16 + 2
        } else {
            0
        };

        let chunks = Layout::vertical([
            Constraint::Min(1),              // Messages
            Constraint::Length(quick_height), // Quick actions (when visible)
            Constraint::Length(4),            // Mode indicator + input
        ])
        .split(area);

        self.render_messages(frame, chunks[0], lang);
        if quick_height > 0 {
            self.render_quick_actions(frame, chunks[1], lang);
        }
        self.render_input(frame, chunks[2], lang);

        if let Some(modal) = &self.rating {
            self.render_rating_modal(frame, area, modal, lang);
        }
    }

    fn render_messages(&self, frame: &mut Frame, area: Rect, lang: Language) {
        let title = match &self.settings {
            Some(s) => format!(" {} — {} ", s.assistant_name, s.status_text(lang)),
            None => pick_localized(lang, " Hỗ trợ khách hàng ", " Customer Support ").to_string(),
        };
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme::TEXT_MUTED))
            .title(title);

        let inner = block.inner(area);
        frame.render_widget(block, area);

        if self.settings.is_none() {
            let loading = Paragraph::new(Line::styled(
                pick_localized(
                    lang,
                    "  Đang tải phiên hỗ trợ...",
                    "  Loading support session...",
                ),
                Style::default().fg(theme::TEXT_MUTED),
            ));
            frame.render_widget(loading, inner);
            return;
        }

        let name = self.assistant_name();
        let mut all_lines: Vec<Line> = self
            .messages
            .iter()
            .flat_map(|m| m.all_lines(&name, lang))
            .collect();

        if self.phase == ChatPhase::Sending {
            all_lines.push(Line::from(Span::styled(
                format!("── {name} ──"),
                Style::default().fg(theme::BOT).add_modifier(Modifier::BOLD),
            )));
            all_lines.push(Line::styled("▍", Style::default().fg(theme::TEXT_MUTED)));
            all_lines.push(Line::raw(""));
        }

        let visible_height = inner.height as usize;
        let total = all_lines.len();

        let max_scroll = total.saturating_sub(visible_height);
        let effective_scroll = if self.auto_scroll {
            max_scroll
        } else {
            self.scroll_offset.min(max_scroll)
        };

        let visible: Vec<Line> = all_lines
            .into_iter()
            .skip(effective_scroll)
            .take(visible_height)
            .collect();

        let paragraph = Paragraph::new(visible);
        frame.render_widget(paragraph, inner);

        // Scrollbar
        if total > visible_height {
            let mut scrollbar_state = ScrollbarState::new(total)
                .position(effective_scroll)
                .viewport_content_length(visible_height);
            frame.render_stateful_widget(
                Scrollbar::new(ScrollbarOrientation::VerticalRight),
                area,
                &mut scrollbar_state,
            );
        }

        // "New messages below" indicator
        if !self.auto_scroll && effective_scroll < max_scroll {
            let indicator = Line::styled(
                " ↓ tin nhắn mới ",
                Style::default()
                    .fg(theme::BG_BASE)
                    .bg(theme::ACCENT)
                    .add_modifier(Modifier::BOLD),
            );
            let indicator_area = Rect::new(
                inner.x + inner.width.saturating_sub(18),
                inner.y + inner.height.saturating_sub(1),
                18.min(inner.width),
                1,
            );
            frame.render_widget(Paragraph::new(indicator), indicator_area);
        }
    }

    fn render_quick_actions(&self, frame: &mut Frame, area: Rect, lang: Language) {
        let Some(settings) = &self.settings else {
            return;
        };

        let lines: Vec<Line> = settings
            .quick_actions
            .iter()
            .enumerate()
            .map(|(i, action)| {
                Line::from(vec![
                    Span::styled(
                        format!(" {} ", i + 1),
                        Style::default()
                            .fg(theme::BG_BASE)
                            .bg(theme::PRIMARY_LIGHT),
                    ),
                    Span::raw(" "),
                    Span::styled(
                        action.label(lang).to_string(),
                        Style::default().fg(theme::TEXT),
                    ),
                ])
            })
            .collect();

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme::TEXT_DIM))
            .title(pick_localized(lang, " Gợi ý ", " Suggestions "));
        frame.render_widget(Paragraph::new(lines).block(block), area);
    }

    fn render_input(&self, frame: &mut Frame, area: Rect, lang: Language) {
        let mode_line = match self.input_mode {
            ChatInputMode::Insert => Line::from(Span::styled(
                " -- INSERT -- ",
                Style::default().fg(theme::BG_BASE).bg(theme::ACCENT),
            )),
            ChatInputMode::Normal => Line::from(Span::styled(
                " -- NORMAL -- ",
                Style::default().fg(theme::BG_BASE).bg(theme::TEXT_MUTED),
            )),
        };

        let chunks = Layout::vertical([
            Constraint::Length(1), // Mode indicator
            Constraint::Min(1),    // Input box
        ])
        .split(area);

        let placeholder = self
            .settings
            .as_ref()
            .map(|s| s.placeholder(lang).to_string())
            .unwrap_or_else(|| {
                pick_localized(lang, "Nhập câu hỏi của bạn...", "Type your question...")
                    .to_string()
            });

        frame.render_widget(Paragraph::new(mode_line), chunks[0]);
        frame.render_widget(
            render_chat_input(&self.input, self.input_mode, self.is_sending(), &placeholder),
            chunks[1],
        );
    }

    fn render_rating_modal(&self, frame: &mut Frame, area: Rect, modal: &RatingModal, lang: Language) {
        let rect = centered_fixed(46, 9, area);
        frame.render_widget(Clear, rect);

        let stars_pointer = if modal.focused_field == RatingField::Stars {
            "▸ "
        } else {
            "  "
        };
        let feedback_pointer = if modal.focused_field == RatingField::Feedback {
            "▸ "
        } else {
            "  "
        };

        let mut stars = String::new();
        for i in 1..=5u8 {
            stars.push(if i <= modal.stars { '★' } else { '☆' });
        }

        let feedback_text = if modal.feedback.is_empty()
            && modal.focused_field != RatingField::Feedback
        {
            Span::styled(
                pick_localized(lang, "(không bắt buộc)", "(optional)").to_string(),
                Style::default().fg(theme::TEXT_MUTED),
            )
        } else {
            Span::raw(modal.feedback.text().to_string())
        };

        let lines = vec![
            Line::raw(""),
            Line::from(vec![
                Span::raw(stars_pointer),
                Span::styled(
                    pick_localized(lang, "Đánh giá: ", "Rating:  ").to_string(),
                    Style::default().fg(theme::TEXT),
                ),
                Span::styled(
                    stars,
                    Style::default().fg(theme::ACCENT).add_modifier(Modifier::BOLD),
                ),
                Span::styled(
                    format!("  ({}/5)", modal.stars),
                    Style::default().fg(theme::TEXT_MUTED),
                ),
            ]),
            Line::raw(""),
            Line::from(vec![
                Span::raw(feedback_pointer),
                Span::styled(
                    pick_localized(lang, "Góp ý:    ", "Feedback: ").to_string(),
                    Style::default().fg(theme::TEXT),
                ),
                feedback_text,
            ]),
            Line::raw(""),
            Line::styled(
                pick_localized(
                    lang,
                    " Enter gửi · Tab chuyển ô · Esc đóng",
                    " Enter submit · Tab switch · Esc close",
                ),
                Style::default().fg(theme::TEXT_MUTED),
            ),
        ];

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme::ACCENT))
            .title(pick_localized(lang, " Đánh giá phiên hỗ trợ ", " Rate this session "));
        frame.render_widget(Paragraph::new(lines).block(block), rect);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bootstrap_with(history: Vec<ChatMessage>) -> ChatBootstrap {
        ChatBootstrap {
            settings: ChatbotSettings::default(),
            history,
            session_id: "sess_1".to_string(),
        }
    }

    #[test]
    fn test_bootstrap_prepends_welcome_bubble() {
        let mut state = ChatState::new();
        state.apply_bootstrap(bootstrap_with(Vec::new()), Language::Vi);

        assert_eq!(state.phase, ChatPhase::Ready);
        assert_eq!(state.messages.len(), 1);
        assert!(state.messages[0].is_bot);
        assert!(state.messages[0].raw_content.starts_with("Xin chào!"));
    }

    #[test]
    fn test_bootstrap_keeps_history_after_welcome() {
        let history = vec![
            ChatMessage::from_user("câu hỏi cũ", "console", "old"),
            ChatMessage::from_bot("trả lời cũ", "console", "old"),
        ];
        let mut state = ChatState::new();
        state.apply_bootstrap(bootstrap_with(history), Language::Vi);

        assert_eq!(state.messages.len(), 3);
        assert!(!state.messages[1].is_bot);
        assert_eq!(state.messages[1].raw_content, "câu hỏi cũ");
    }

    #[test]
    fn test_quick_actions_only_at_baseline() {
        let mut state = ChatState::new();
        // Not loaded yet
        assert!(!state.quick_actions_visible());

        state.apply_bootstrap(bootstrap_with(Vec::new()), Language::Vi);
        assert!(state.quick_actions_visible());

        state.messages.push(DisplayMessage::user("hỏi gì đó"));
        assert!(!state.quick_actions_visible());
    }

    #[test]
    fn test_welcome_language_follows_display_language() {
        let mut state = ChatState::new();
        state.apply_bootstrap(bootstrap_with(Vec::new()), Language::En);
        assert!(state.messages[0].raw_content.starts_with("Hello!"));
    }

    #[test]
    fn test_role_headers_use_assistant_name() {
        let msg = DisplayMessage::bot("chào");
        let header = msg.role_header("Maritime Assistant", Language::Vi);
        let text: String = header
            .spans
            .iter()
            .map(|s| s.content.clone().into_owned())
            .collect();
        assert_eq!(text, "── Maritime Assistant ──");

        let msg = DisplayMessage::user("hi");
        let header = msg.role_header("Maritime Assistant", Language::Vi);
        let text: String = header
            .spans
            .iter()
            .map(|s| s.content.clone().into_owned())
            .collect();
        assert_eq!(text, "── Bạn ──");
    }

    #[test]
    fn test_scroll_helpers_toggle_auto_scroll() {
        let mut state = ChatState::new();
        state.scroll_to_bottom();
        assert!(state.auto_scroll);

        state.scroll_up(2);
        assert!(!state.auto_scroll);

        state.scroll_to_top();
        assert_eq!(state.scroll_offset, 0);
        assert!(!state.auto_scroll);
    }

    #[test]
    fn test_rating_modal_star_bounds() {
        let mut modal = RatingModal::new();
        assert_eq!(modal.stars, 5);

        modal.stars = (modal.stars + 1).min(5);
        assert_eq!(modal.stars, 5);

        modal.stars = 1;
        modal.stars = modal.stars.saturating_sub(1).max(1);
        assert_eq!(modal.stars, 1);
    }

    #[test]
    fn test_typing_indicator_counted_in_totals() {
        let mut state = ChatState::new();
        state.apply_bootstrap(bootstrap_with(Vec::new()), Language::Vi);
        let baseline = state.total_content_lines(Language::Vi);

        state.phase = ChatPhase::Sending;
        assert_eq!(state.total_content_lines(Language::Vi), baseline + 3);
    }

    // ── Send flow ────────────────────────────────────────────────────

    use std::sync::Arc;

    use crate::config::AppConfig;
    use crate::core::assistant::Assistant;
    use crate::core::gateway::Gateway;
    use crate::core::storage::SupportStore;
    use crate::tests::mocks::{gateway_failing, gateway_replying};

    async fn flow_services(
        gateway: Arc<dyn Gateway>,
    ) -> (
        Services,
        mpsc::UnboundedReceiver<AppEvent>,
        tempfile::TempDir,
    ) {
        let dir = tempfile::TempDir::new().expect("Failed to create temp dir");
        let store = SupportStore::open(dir.path().join("store"))
            .await
            .expect("Failed to open store");
        let (event_tx, event_rx) = mpsc::unbounded_channel();
        let services = Services {
            store,
            gateway: gateway.clone(),
            assistant: Assistant::new(gateway),
            language: Language::Vi,
            operator: "console".to_string(),
            config: AppConfig::default(),
            event_tx,
        };
        (services, event_rx, dir)
    }

    #[tokio::test]
    async fn test_send_is_optimistic_and_reply_lands() {
        let (services, mut event_rx, _dir) =
            flow_services(gateway_replying("Tàu chạy thứ 2 và thứ 5.")).await;
        let mut state = ChatState::new();
        state.apply_bootstrap(bootstrap_with(Vec::new()), Language::Vi);

        state.send_message("Lịch tàu đi Singapore?", &services);

        // User bubble lands before any network round trip
        assert!(state.is_sending());
        assert!(!state.messages.last().unwrap().is_bot);
        assert_eq!(state.messages.last().unwrap().raw_content, "Lịch tàu đi Singapore?");

        let reply = match event_rx.recv().await {
            Some(AppEvent::BotReply(reply)) => reply,
            other => panic!("expected BotReply, got {other:?}"),
        };
        state.on_bot_reply(reply, &services);

        assert_eq!(state.phase, ChatPhase::Ready);
        assert!(state.messages.last().unwrap().is_bot);
        assert_eq!(
            state.messages.last().unwrap().raw_content,
            "Tàu chạy thứ 2 và thứ 5."
        );
        assert_eq!(state.session_messages, 2);
    }

    #[tokio::test]
    async fn test_failed_turn_adds_one_fallback_bubble_and_toast() {
        let (services, mut event_rx, _dir) = flow_services(gateway_failing(503)).await;
        let mut state = ChatState::new();
        state.apply_bootstrap(bootstrap_with(Vec::new()), Language::Vi);

        state.send_message("Cước đi Mỹ bao nhiêu?", &services);
        let before = state.messages.len();

        let message = match event_rx.recv().await {
            Some(AppEvent::BotFailed(message)) => message,
            other => panic!("expected BotFailed, got {other:?}"),
        };
        assert!(message.contains("không khả dụng"));

        state.on_bot_failed(message.clone(), &services);
        assert_eq!(state.messages.len(), before + 1);
        assert_eq!(state.phase, ChatPhase::Ready);

        match event_rx.recv().await {
            Some(AppEvent::Notification(n)) => {
                assert_eq!(n.level, NotificationLevel::Error);
                assert_eq!(n.message, message);
            }
            other => panic!("expected Notification, got {other:?}"),
        }

        // A stale failure for an already-settled turn is dropped
        state.on_bot_failed("muộn".to_string(), &services);
        assert_eq!(state.messages.len(), before + 1);
    }

    #[tokio::test]
    async fn test_sends_blocked_while_turn_in_flight() {
        let (services, _event_rx, _dir) = flow_services(gateway_replying("ok")).await;
        let mut state = ChatState::new();
        state.apply_bootstrap(bootstrap_with(Vec::new()), Language::Vi);

        state.send_message("câu thứ nhất", &services);
        let count = state.messages.len();

        state.send_message("câu thứ hai", &services);
        assert_eq!(state.messages.len(), count);
        assert_eq!(state.session_messages, 1);
    }
}
