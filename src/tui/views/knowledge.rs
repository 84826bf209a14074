//! Knowledge base view — the Q&A entries behind the assistant's retrieval.
//!
//! Selectable list with an add/edit form modal, delete confirmation, and the
//! one-shot sample seeding action. Form validation mirrors the admin rules:
//! question ≥ 5 chars, answer ≥ 10 chars, at least one keyword, a category.

use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::{
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};
use tokio::sync::mpsc;

use super::super::theme;

use crate::core::i18n::{pick_localized, Language};
use crate::core::storage::{
    create_knowledge_item, delete_knowledge_item, list_knowledge_items, seed_knowledge_base,
    update_knowledge_item, KnowledgeItem,
};
use crate::core::validate::KnowledgeDraft;
use crate::tui::events::{AppEvent, Notification, NotificationLevel};
use crate::tui::layout::centered_fixed;
use crate::tui::services::Services;
use crate::tui::widgets::input_buffer::InputBuffer;

/// Categories offered by the entry form. Matches the admin select; stored
/// entries with a category outside this list edit as the catch-all.
pub const CATEGORIES: [&str; 8] = [
    "Lịch tàu",
    "Tracking",
    "Báo giá",
    "Hướng dẫn",
    "Kiến thức",
    "Hỗ trợ",
    "Dịch vụ",
    "Khác",
];

// ── Modal types ─────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum FormField {
    Question,
    Answer,
    Keywords,
    Category,
}

impl FormField {
    fn next(self) -> Self {
        match self {
            Self::Question => Self::Answer,
            Self::Answer => Self::Keywords,
            Self::Keywords => Self::Category,
            Self::Category => Self::Question,
        }
    }

    fn prev(self) -> Self {
        match self {
            Self::Question => Self::Category,
            Self::Answer => Self::Question,
            Self::Keywords => Self::Answer,
            Self::Category => Self::Keywords,
        }
    }
}

#[derive(Clone, Debug)]
enum KnowledgeModal {
    /// Create/edit form; `editing` holds the record id when editing.
    Form {
        focused_field: FormField,
        category_idx: usize,
        editing: Option<String>,
        error: Option<String>,
    },
    ConfirmDelete {
        id: String,
        question: String,
    },
}

// ── Display types ───────────────────────────────────────────────────────────

#[derive(Clone, Debug)]
struct KnowledgeData {
    items: Vec<KnowledgeItem>,
}

// ── State ───────────────────────────────────────────────────────────────────

pub struct KnowledgeState {
    data: Option<KnowledgeData>,
    lines_cache: Vec<Line<'static>>,
    scroll: usize,
    selected: usize,
    loading: bool,
    data_rx: mpsc::UnboundedReceiver<KnowledgeData>,
    data_tx: mpsc::UnboundedSender<KnowledgeData>,
    modal: Option<KnowledgeModal>,
    question_input: InputBuffer,
    answer_input: InputBuffer,
    keywords_input: InputBuffer,
}

impl KnowledgeState {
    pub fn new() -> Self {
        let (data_tx, data_rx) = mpsc::unbounded_channel();
        Self {
            data: None,
            lines_cache: Vec::new(),
            scroll: 0,
            selected: 0,
            loading: false,
            data_rx,
            data_tx,
            modal: None,
            question_input: InputBuffer::new(),
            answer_input: InputBuffer::new(),
            keywords_input: InputBuffer::new(),
        }
    }

    pub fn has_modal(&self) -> bool {
        self.modal.is_some()
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
            let items = match list_knowledge_items(&db).await {
                Ok(items) => items,
                Err(e) => {
                    log::warn!("Failed to load knowledge items: {e}");
                    Vec::new()
                }
            };
            let _ = tx.send(KnowledgeData { items });
        });
    }

    /// Poll for async data completion. Call from on_tick.
    pub fn poll(&mut self) {
        while let Ok(data) = self.data_rx.try_recv() {
            self.selected = self.selected.min(data.items.len().saturating_sub(1));
            self.lines_cache = build_lines(&data, self.selected);
            self.data = Some(data);
            self.loading = false;
        }
    }

    fn item_count(&self) -> usize {
        self.data.as_ref().map(|d| d.items.len()).unwrap_or(0)
    }

    fn rebuild_lines(&mut self) {
        if let Some(ref data) = self.data {
            self.lines_cache = build_lines(data, self.selected);
        }
    }

    // ── Modal openers ───────────────────────────────────────────────

    fn open_add_modal(&mut self) {
        self.question_input.clear();
        self.answer_input.clear();
        self.keywords_input.clear();
        self.modal = Some(KnowledgeModal::Form {
            focused_field: FormField::Question,
            category_idx: 0,
            editing: None,
            error: None,
        });
    }

    fn open_edit_modal(&mut self) {
        let Some(item) = self
            .data
            .as_ref()
            .and_then(|d| d.items.get(self.selected))
            .cloned()
        else {
            return;
        };
        let Some(id) = item.id.clone() else {
            return;
        };

        self.question_input.set_text(&item.question);
        self.answer_input.set_text(&item.answer);
        self.keywords_input.set_text(&item.keywords.join(", "));
        let category_idx = CATEGORIES
            .iter()
            .position(|c| *c == item.category)
            .unwrap_or(CATEGORIES.len() - 1);

        self.modal = Some(KnowledgeModal::Form {
            focused_field: FormField::Question,
            category_idx,
            editing: Some(id),
            error: None,
        });
    }

    fn open_delete_confirm(&mut self) {
        let Some(item) = self.data.as_ref().and_then(|d| d.items.get(self.selected)) else {
            return;
        };
        let Some(id) = item.id.clone() else {
            return;
        };
        self.modal = Some(KnowledgeModal::ConfirmDelete {
            id,
            question: item.question.clone(),
        });
    }

    // ── Input ───────────────────────────────────────────────────────

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

        // Modal consumes all input when open
        if self.modal.is_some() {
            return self.handle_modal_input(*code, *modifiers, services);
        }

        self.handle_list_input(*code, *modifiers, services)
    }

    fn handle_list_input(
        &mut self,
        code: KeyCode,
        modifiers: KeyModifiers,
        services: &Services,
    ) -> bool {
        match (modifiers, code) {
            (KeyModifiers::NONE, KeyCode::Char('j') | KeyCode::Down) => {
                self.select_next();
                true
            }
            (KeyModifiers::NONE, KeyCode::Char('k') | KeyCode::Up) => {
                self.select_prev();
                true
            }
            (KeyModifiers::SHIFT, KeyCode::Char('G')) => {
                let count = self.item_count();
                if count > 0 {
                    self.selected = count - 1;
                    self.rebuild_lines();
                }
                true
            }
            (KeyModifiers::NONE, KeyCode::Char('g')) => {
                self.selected = 0;
                self.rebuild_lines();
                true
            }
            (KeyModifiers::NONE, KeyCode::PageDown) => {
                for _ in 0..10 {
                    self.select_next();
                }
                true
            }
            (KeyModifiers::NONE, KeyCode::PageUp) => {
                for _ in 0..10 {
                    self.select_prev();
                }
                true
            }
            (KeyModifiers::NONE, KeyCode::Char('a')) => {
                self.open_add_modal();
                true
            }
            (KeyModifiers::NONE, KeyCode::Char('e') | KeyCode::Enter) => {
                self.open_edit_modal();
                true
            }
            (KeyModifiers::NONE, KeyCode::Char('d')) => {
                self.open_delete_confirm();
                true
            }
            (KeyModifiers::NONE, KeyCode::Char('s')) => {
                self.run_seed(services);
                true
            }
            (KeyModifiers::NONE, KeyCode::Char('r')) => {
                self.load(services);
                true
            }
            _ => false,
        }
    }

    fn handle_modal_input(
        &mut self,
        code: KeyCode,
        modifiers: KeyModifiers,
        services: &Services,
    ) -> bool {
        let modal = match self.modal {
            Some(ref modal) => modal.clone(),
            None => return false,
        };

        match modal {
            KnowledgeModal::Form {
                focused_field,
                category_idx,
                ..
            } => self.handle_form_input(code, modifiers, focused_field, category_idx, services),
            KnowledgeModal::ConfirmDelete { id, .. } => {
                self.handle_confirm_input(code, &id, services)
            }
        }
    }

    fn handle_form_input(
        &mut self,
        code: KeyCode,
        modifiers: KeyModifiers,
        focused_field: FormField,
        category_idx: usize,
        services: &Services,
    ) -> bool {
        match (modifiers, code) {
            (KeyModifiers::NONE, KeyCode::Esc) => {
                self.modal = None;
                true
            }
            (KeyModifiers::NONE, KeyCode::Tab) => {
                if let Some(KnowledgeModal::Form {
                    focused_field: ref mut f,
                    ..
                }) = self.modal
                {
                    *f = focused_field.next();
                }
                true
            }
            (KeyModifiers::SHIFT, KeyCode::BackTab) => {
                if let Some(KnowledgeModal::Form {
                    focused_field: ref mut f,
                    ..
                }) = self.modal
                {
                    *f = focused_field.prev();
                }
                true
            }
            (KeyModifiers::NONE, KeyCode::Enter) => {
                self.submit_form(services);
                true
            }
            // Category field: left/right to cycle
            (KeyModifiers::NONE, KeyCode::Left) if focused_field == FormField::Category => {
                if let Some(KnowledgeModal::Form {
                    category_idx: ref mut idx,
                    ..
                }) = self.modal
                {
                    *idx = (category_idx + CATEGORIES.len() - 1) % CATEGORIES.len();
                }
                true
            }
            (KeyModifiers::NONE, KeyCode::Right) if focused_field == FormField::Category => {
                if let Some(KnowledgeModal::Form {
                    category_idx: ref mut idx,
                    ..
                }) = self.modal
                {
                    *idx = (category_idx + 1) % CATEGORIES.len();
                }
                true
            }
            // Text input for the focused field
            _ if focused_field != FormField::Category => {
                self.handle_text_input(focused_field, code);
                true
            }
            _ => true, // Consume all input when modal is open
        }
    }

    fn handle_text_input(&mut self, field: FormField, code: KeyCode) {
        let buf = match field {
            FormField::Question => &mut self.question_input,
            FormField::Answer => &mut self.answer_input,
            FormField::Keywords => &mut self.keywords_input,
            FormField::Category => return,
        };

        match code {
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

    fn handle_confirm_input(&mut self, code: KeyCode, id: &str, services: &Services) -> bool {
        match code {
            KeyCode::Char('y') | KeyCode::Enter => {
                self.run_delete(id.to_string(), services);
                self.modal = None;
                true
            }
            KeyCode::Char('n') | KeyCode::Esc => {
                self.modal = None;
                true
            }
            _ => true,
        }
    }

    // ── Operations ──────────────────────────────────────────────────

    fn submit_form(&mut self, services: &Services) {
        let Some(KnowledgeModal::Form {
            category_idx,
            ref editing,
            ..
        }) = self.modal
        else {
            return;
        };
        let editing = editing.clone();
        let lang = services.language;

        let draft = KnowledgeDraft {
            question: self.question_input.text().to_string(),
            answer: self.answer_input.text().to_string(),
            keywords: self.keywords_input.text().to_string(),
            category: CATEGORIES[category_idx].to_string(),
        };

        let keywords = match draft.validate() {
            Ok(keywords) => keywords,
            Err(e) => {
                if let Some(KnowledgeModal::Form { ref mut error, .. }) = self.modal {
                    *error = Some(e.user_message(lang).to_string());
                }
                return;
            }
        };

        let item = KnowledgeItem::new(
            draft.question.trim(),
            draft.answer.trim(),
            keywords,
            draft.category,
        );

        let db = services.store.db().clone();
        let tx = services.event_tx.clone();
        let data_tx = self.data_tx.clone();
        self.modal = None;

        tokio::spawn(async move {
            let result = match &editing {
                Some(id) => update_knowledge_item(&db, id, &item).await.map(|_| ()),
                None => create_knowledge_item(&db, &item).await.map(|_| ()),
            };

            let (message, level) = match result {
                Ok(()) => (
                    if editing.is_some() {
                        pick_localized(lang, "Đã cập nhật câu hỏi!", "Entry updated!")
                    } else {
                        pick_localized(lang, "Đã thêm câu hỏi thành công!", "Entry added!")
                    }
                    .to_string(),
                    NotificationLevel::Success,
                ),
                Err(e) => {
                    log::error!("Failed to save knowledge item: {e}");
                    (
                        pick_localized(
                            lang,
                            "Không thể lưu câu hỏi. Vui lòng thử lại.",
                            "Could not save the entry. Please try again.",
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

            refresh(&db, &data_tx).await;
        });
    }

    fn run_delete(&mut self, id: String, services: &Services) {
        let db = services.store.db().clone();
        let tx = services.event_tx.clone();
        let data_tx = self.data_tx.clone();
        let lang = services.language;

        tokio::spawn(async move {
            let (message, level) = match delete_knowledge_item(&db, &id).await {
                Ok(()) => (
                    pick_localized(lang, "Đã xóa câu hỏi!", "Entry deleted!").to_string(),
                    NotificationLevel::Success,
                ),
                Err(e) => {
                    log::error!("Failed to delete knowledge item {id}: {e}");
                    (
                        pick_localized(
                            lang,
                            "Không thể xóa câu hỏi. Vui lòng thử lại.",
                            "Could not delete the entry. Please try again.",
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

            refresh(&db, &data_tx).await;
        });
    }

    fn run_seed(&mut self, services: &Services) {
        let db = services.store.db().clone();
        let tx = services.event_tx.clone();
        let data_tx = self.data_tx.clone();
        let lang = services.language;

        tokio::spawn(async move {
            let (message, level) = match seed_knowledge_base(&db).await {
                Ok(outcome) => {
                    let level = if outcome.seeded {
                        NotificationLevel::Success
                    } else {
                        NotificationLevel::Info
                    };
                    (outcome.message(), level)
                }
                Err(e) => {
                    log::error!("Failed to seed knowledge base: {e}");
                    (
                        pick_localized(
                            lang,
                            "Không thể thêm dữ liệu mẫu.",
                            "Could not seed the sample data.",
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

            refresh(&db, &data_tx).await;
        });
    }

    fn select_next(&mut self) {
        let count = self.item_count();
        if count > 0 {
            self.selected = (self.selected + 1).min(count - 1);
            self.rebuild_lines();
        }
    }

    fn select_prev(&mut self) {
        self.selected = self.selected.saturating_sub(1);
        self.rebuild_lines();
    }

    // ── Rendering ───────────────────────────────────────────────────

    pub fn render(&self, frame: &mut Frame, area: Rect, lang: Language) {
        let block = Block::default()
            .title(" Knowledge Base ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme::TEXT_MUTED));

        let inner = block.inner(area);
        frame.render_widget(block, area);

        if self.loading && self.data.is_none() {
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
        } else if self.lines_cache.is_empty() {
            let empty = Paragraph::new(vec![
                Line::raw(""),
                Line::from(vec![
                    Span::raw("  "),
                    Span::styled(
                        pick_localized(
                            lang,
                            "Chưa có dữ liệu. Nhấn r để tải lại.",
                            "No data loaded. Press r to refresh.",
                        ),
                        Style::default().fg(theme::TEXT_MUTED),
                    ),
                ]),
            ]);
            frame.render_widget(empty, inner);
        } else {
            // Auto-scroll to keep selected item visible
            let visible_height = inner.height as usize;
            let scroll = if visible_height > 0 {
                // Selected item line is at: header lines (4) + selected
                let selected_line = 4 + self.selected;
                if selected_line >= self.scroll + visible_height {
                    selected_line.saturating_sub(visible_height - 1)
                } else if selected_line < self.scroll {
                    selected_line
                } else {
                    self.scroll
                }
            } else {
                self.scroll
            };

            let content = Paragraph::new(self.lines_cache.clone()).scroll((scroll as u16, 0));
            frame.render_widget(content, inner);
        }

        match &self.modal {
            Some(KnowledgeModal::Form {
                focused_field,
                category_idx,
                editing,
                error,
            }) => self.render_form_modal(
                frame,
                area,
                *focused_field,
                *category_idx,
                editing.is_some(),
                error.as_deref(),
                lang,
            ),
            Some(KnowledgeModal::ConfirmDelete { question, .. }) => {
                render_confirm_modal(frame, area, question, lang);
            }
            None => {}
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn render_form_modal(
        &self,
        frame: &mut Frame,
        area: Rect,
        focused_field: FormField,
        category_idx: usize,
        editing: bool,
        error: Option<&str>,
        lang: Language,
    ) {
        let modal_area = centered_fixed(64, 16, area);
        let title = if editing {
            pick_localized(lang, " Sửa câu hỏi ", " Edit Entry ")
        } else {
            pick_localized(lang, " Thêm câu hỏi ", " Add Entry ")
        };
        let block = Block::default()
            .title(title)
            .title_alignment(Alignment::Center)
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme::ACCENT));

        let mut lines = vec![Line::raw("")];

        push_text_field(
            &mut lines,
            pick_localized(lang, "Câu hỏi:", "Question:"),
            &self.question_input,
            focused_field == FormField::Question,
        );
        push_text_field(
            &mut lines,
            pick_localized(lang, "Câu trả lời:", "Answer:"),
            &self.answer_input,
            focused_field == FormField::Answer,
        );
        push_text_field(
            &mut lines,
            pick_localized(lang, "Từ khóa (phẩy):", "Keywords (comma):"),
            &self.keywords_input,
            focused_field == FormField::Keywords,
        );

        // Category selector
        let cat_focused = focused_field == FormField::Category;
        let cat_style = if cat_focused {
            Style::default()
                .fg(theme::PRIMARY_LIGHT)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(theme::TEXT_MUTED)
        };
        let arrows = if cat_focused {
            format!("  ◀ {} ▶", CATEGORIES[category_idx])
        } else {
            format!("    {}", CATEGORIES[category_idx])
        };
        lines.push(Line::from(vec![
            Span::raw("  "),
            Span::styled(
                pick_localized(lang, "Danh mục:", "Category:").to_string(),
                cat_style,
            ),
            Span::styled(arrows, Style::default().fg(theme::TEXT)),
        ]));
        lines.push(Line::raw(""));

        // Error message
        if let Some(err) = error {
            lines.push(Line::from(vec![
                Span::raw("  "),
                Span::styled(
                    err.to_string(),
                    Style::default().fg(theme::ERROR).add_modifier(Modifier::BOLD),
                ),
            ]));
        } else {
            lines.push(Line::raw(""));
        }

        // Footer
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

/// Label + value rows for one text field of the form modal.
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

fn render_confirm_modal(frame: &mut Frame, area: Rect, question: &str, lang: Language) {
    let modal_area = centered_fixed(52, 7, area);
    let block = Block::default()
        .title(pick_localized(lang, " Xóa câu hỏi? ", " Delete entry? "))
        .title_alignment(Alignment::Center)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme::ERROR));

    let lines = vec![
        Line::raw(""),
        Line::from(vec![
            Span::raw("  "),
            Span::styled(
                truncate(question, 44),
                Style::default().fg(theme::TEXT),
            ),
        ]),
        Line::raw(""),
        Line::from(vec![
            Span::raw("  "),
            Span::styled("y", Style::default().fg(theme::ERROR).add_modifier(Modifier::BOLD)),
            Span::raw(pick_localized(lang, ":xóa  ", ":delete  ")),
            Span::styled("n", Style::default().fg(theme::TEXT_MUTED)),
            Span::raw(pick_localized(lang, ":hủy", ":cancel")),
        ]),
    ];

    frame.render_widget(Clear, modal_area);
    frame.render_widget(Paragraph::new(lines).block(block), modal_area);
}

/// Re-list the collection and push it through the view's data channel.
async fn refresh(
    db: &surrealdb::Surreal<surrealdb::engine::local::Db>,
    data_tx: &mpsc::UnboundedSender<KnowledgeData>,
) {
    let items = match list_knowledge_items(db).await {
        Ok(items) => items,
        Err(e) => {
            log::warn!("Failed to reload knowledge items: {e}");
            return;
        }
    };
    let _ = data_tx.send(KnowledgeData { items });
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

// ── Line builders ───────────────────────────────────────────────────────────

fn build_lines(data: &KnowledgeData, selected: usize) -> Vec<Line<'static>> {
    let mut lines = Vec::with_capacity(data.items.len() + 12);

    lines.push(Line::raw(""));
    lines.push(Line::from(Span::styled(
        "  Câu hỏi & trả lời",
        Style::default()
            .fg(theme::ACCENT)
            .add_modifier(Modifier::BOLD),
    )));
    lines.push(Line::from(Span::styled(
        format!("  {}", "─".repeat(72)),
        Style::default().fg(theme::TEXT_DIM),
    )));

    if data.items.is_empty() {
        lines.push(Line::from(vec![
            Span::raw("  "),
            Span::styled(
                "Chưa có câu hỏi nào. Nhấn a để thêm, s để nạp dữ liệu mẫu.",
                Style::default().fg(theme::TEXT_MUTED),
            ),
        ]));
    } else {
        // Table header
        lines.push(Line::from(vec![
            Span::raw("  "),
            Span::styled(
                format!("  {:<42} {:<12} {}", "Câu hỏi", "Danh mục", "Từ khóa"),
                Style::default()
                    .fg(theme::TEXT_DIM)
                    .add_modifier(Modifier::BOLD),
            ),
        ]));

        for (i, item) in data.items.iter().enumerate() {
            let is_selected = i == selected;
            let cursor = if is_selected { "▸ " } else { "  " };
            let row_style = if is_selected {
                Style::default().add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            };

            lines.push(Line::from(vec![
                Span::styled(
                    cursor.to_string(),
                    if is_selected {
                        Style::default().fg(theme::ACCENT)
                    } else {
                        Style::default()
                    },
                ),
                Span::styled(format!("{:<42}", truncate(&item.question, 40)), row_style),
                Span::styled(
                    format!(" {:<12}", truncate(&item.category, 12)),
                    Style::default().fg(theme::PRIMARY_LIGHT),
                ),
                Span::styled(
                    format!(" {}", item.keywords.len()),
                    Style::default().fg(theme::TEXT_MUTED),
                ),
            ]));
        }
    }

    // Summary
    lines.push(Line::raw(""));
    lines.push(Line::from(Span::styled(
        format!("  {}", "─".repeat(72)),
        Style::default().fg(theme::TEXT_DIM),
    )));
    lines.push(Line::from(vec![
        Span::raw("  "),
        Span::styled("Tổng: ", Style::default().fg(theme::TEXT_MUTED)),
        Span::raw(format!("{} mục", data.items.len())),
    ]));

    // Footer
    lines.push(Line::raw(""));
    lines.push(Line::from(vec![
        Span::raw("  "),
        Span::styled("a", Style::default().fg(theme::TEXT_MUTED)),
        Span::raw(":thêm "),
        Span::styled("e", Style::default().fg(theme::TEXT_MUTED)),
        Span::raw(":sửa "),
        Span::styled("d", Style::default().fg(theme::TEXT_MUTED)),
        Span::raw(":xóa "),
        Span::styled("s", Style::default().fg(theme::TEXT_MUTED)),
        Span::raw(":dữ liệu mẫu "),
        Span::styled("r", Style::default().fg(theme::TEXT_MUTED)),
        Span::raw(":tải lại"),
    ]));
    lines.push(Line::raw(""));

    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_items() -> Vec<KnowledgeItem> {
        vec![
            KnowledgeItem {
                id: Some("k1".to_string()),
                ..KnowledgeItem::new(
                    "Lịch tàu đi Singapore?",
                    "Khởi hành thứ 2 và thứ 5 hàng tuần.",
                    vec!["lịch tàu".to_string(), "singapore".to_string()],
                    "Lịch tàu",
                )
            },
            KnowledgeItem {
                id: Some("k2".to_string()),
                ..KnowledgeItem::new(
                    "Tra cứu container thế nào?",
                    "Dùng số container hoặc số Bill of Lading.",
                    vec!["container".to_string()],
                    "Tracking",
                )
            },
        ]
    }

    #[test]
    fn test_form_field_cycle_roundtrip() {
        for field in [
            FormField::Question,
            FormField::Answer,
            FormField::Keywords,
            FormField::Category,
        ] {
            assert_eq!(field.next().prev(), field);
        }
        assert_eq!(FormField::Category.next(), FormField::Question);
    }

    #[test]
    fn test_build_lines_empty() {
        let data = KnowledgeData { items: Vec::new() };
        let lines = build_lines(&data, 0);
        let text: String = lines
            .iter()
            .flat_map(|l| l.spans.iter())
            .map(|s| s.content.clone().into_owned())
            .collect();
        assert!(text.contains("Chưa có câu hỏi nào"));
    }

    #[test]
    fn test_build_lines_marks_selection() {
        let data = KnowledgeData {
            items: sample_items(),
        };
        let lines = build_lines(&data, 1);
        let text: String = lines
            .iter()
            .flat_map(|l| l.spans.iter())
            .map(|s| s.content.clone().into_owned())
            .collect();
        assert!(text.contains("Lịch tàu đi Singapore?"));
        assert!(text.contains("▸ "));
        assert!(text.contains("Tổng: "));
        assert!(text.contains("2 mục"));
    }

    #[test]
    fn test_open_edit_prefills_buffers() {
        let mut state = KnowledgeState::new();
        state.data = Some(KnowledgeData {
            items: sample_items(),
        });
        state.selected = 0;
        state.open_edit_modal();

        assert_eq!(state.question_input.text(), "Lịch tàu đi Singapore?");
        assert_eq!(state.keywords_input.text(), "lịch tàu, singapore");
        match state.modal {
            Some(KnowledgeModal::Form {
                editing: Some(ref id),
                category_idx,
                ..
            }) => {
                assert_eq!(id, "k1");
                assert_eq!(CATEGORIES[category_idx], "Lịch tàu");
            }
            _ => panic!("expected edit form"),
        }
    }

    #[test]
    fn test_open_edit_unknown_category_falls_back() {
        let mut item = sample_items().remove(0);
        item.category = "Danh mục lạ".to_string();
        let mut state = KnowledgeState::new();
        state.data = Some(KnowledgeData { items: vec![item] });
        state.open_edit_modal();

        match state.modal {
            Some(KnowledgeModal::Form { category_idx, .. }) => {
                assert_eq!(CATEGORIES[category_idx], "Khác");
            }
            _ => panic!("expected edit form"),
        }
    }

    #[test]
    fn test_truncate_is_char_safe() {
        let truncated = truncate("cước phí vận chuyển container đi châu âu", 10);
        assert_eq!(truncated.chars().count(), 10);
        assert!(truncated.ends_with('…'));

        assert_eq!(truncate("ngắn", 10), "ngắn");
    }

    #[test]
    fn test_selection_bounds() {
        let mut state = KnowledgeState::new();
        state.data = Some(KnowledgeData {
            items: sample_items(),
        });

        state.select_prev();
        assert_eq!(state.selected, 0);

        state.select_next();
        state.select_next();
        state.select_next();
        assert_eq!(state.selected, 1);
    }
}
