//! Long-form knowledge documents view.
//!
//! Left pane lists the documents, right pane previews the selected one as
//! rendered markdown. `e` opens a full-screen editor with a multiline content
//! area; Ctrl+S saves through `upsert_document`, which keeps `created_at`
//! stable across edits.

use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::{
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};
use ratatui_textarea::TextArea;
use tokio::sync::mpsc;

use super::super::theme;
use super::knowledge::CATEGORIES;

use crate::core::i18n::{pick_localized, Language};
use crate::core::storage::{
    delete_document, list_documents, new_document_id, upsert_document, KnowledgeDocument,
};
use crate::tui::events::{AppEvent, Notification, NotificationLevel};
use crate::tui::layout::centered_fixed;
use crate::tui::services::Services;
use crate::tui::widgets::markdown::markdown_to_lines;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum EditorField {
    Title,
    Category,
    Content,
}

impl EditorField {
    fn next(self) -> Self {
        match self {
            Self::Title => Self::Category,
            Self::Category => Self::Content,
            Self::Content => Self::Title,
        }
    }

    fn prev(self) -> Self {
        match self {
            Self::Title => Self::Content,
            Self::Category => Self::Title,
            Self::Content => Self::Category,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum DocumentsMode {
    List,
    Editor,
}

#[derive(Clone, Debug)]
struct DocumentsData {
    docs: Vec<KnowledgeDocument>,
}

pub struct DocumentsState {
    data: Option<DocumentsData>,
    lines_cache: Vec<Line<'static>>,
    preview_cache: Vec<Line<'static>>,
    scroll: usize,
    selected: usize,
    loading: bool,
    data_rx: mpsc::UnboundedReceiver<DocumentsData>,
    data_tx: mpsc::UnboundedSender<DocumentsData>,
    mode: DocumentsMode,
    confirm_delete: Option<(String, String)>,
    editor_title: TextArea<'static>,
    editor_content: TextArea<'static>,
    editor_field: EditorField,
    editor_category_idx: usize,
    /// Record id when editing; `None` means a new document.
    editor_editing: Option<String>,
    editor_error: Option<String>,
}

impl DocumentsState {
    pub fn new() -> Self {
        let (data_tx, data_rx) = mpsc::unbounded_channel();
        Self {
            data: None,
            lines_cache: Vec::new(),
            preview_cache: Vec::new(),
            scroll: 0,
            selected: 0,
            loading: false,
            data_rx,
            data_tx,
            mode: DocumentsMode::List,
            confirm_delete: None,
            editor_title: create_textarea("Title"),
            editor_content: create_textarea("Content"),
            editor_field: EditorField::Title,
            editor_category_idx: 0,
            editor_editing: None,
            editor_error: None,
        }
    }

    pub fn has_modal(&self) -> bool {
        self.mode == DocumentsMode::Editor || self.confirm_delete.is_some()
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
            let docs = match list_documents(&db).await {
                Ok(docs) => docs,
                Err(e) => {
                    log::warn!("Failed to load documents: {e}");
                    Vec::new()
                }
            };
            let _ = tx.send(DocumentsData { docs });
        });
    }

    /// Poll for async data completion. Call from on_tick.
    pub fn poll(&mut self) {
        while let Ok(data) = self.data_rx.try_recv() {
            self.selected = self.selected.min(data.docs.len().saturating_sub(1));
            self.data = Some(data);
            self.loading = false;
            self.rebuild_lines();
        }
    }

    fn doc_count(&self) -> usize {
        self.data.as_ref().map(|d| d.docs.len()).unwrap_or(0)
    }

    fn rebuild_lines(&mut self) {
        if let Some(ref data) = self.data {
            self.lines_cache = build_lines(data, self.selected);
            self.preview_cache = data
                .docs
                .get(self.selected)
                .map(|doc| markdown_to_lines(&doc.content))
                .unwrap_or_default();
        }
    }

    // ── Editor ──────────────────────────────────────────────────────

    fn open_editor(&mut self, doc: Option<&KnowledgeDocument>, lang: Language) {
        self.editor_title = create_textarea(pick_localized(lang, "Tiêu đề", "Title"));
        self.editor_content = create_textarea(pick_localized(
            lang,
            "Nội dung (markdown)",
            "Content (markdown)",
        ));
        self.editor_field = EditorField::Title;
        self.editor_error = None;

        if let Some(doc) = doc {
            self.editor_editing = doc.id.clone();
            self.editor_title.insert_str(&doc.title);
            for (i, line) in doc.content.lines().enumerate() {
                if i > 0 {
                    self.editor_content.insert_newline();
                }
                self.editor_content.insert_str(line);
            }
            self.editor_category_idx = CATEGORIES
                .iter()
                .position(|c| *c == doc.category)
                .unwrap_or(CATEGORIES.len() - 1);
        } else {
            self.editor_editing = None;
            self.editor_category_idx = 0;
        }

        self.focus_textareas();
        self.mode = DocumentsMode::Editor;
    }

    fn focus_textareas(&mut self) {
        let muted = Style::default().fg(theme::TEXT_MUTED);
        let active = Style::default().fg(theme::PRIMARY);

        if let Some(block) = self.editor_title.block() {
            let style = if self.editor_field == EditorField::Title {
                active
            } else {
                muted
            };
            self.editor_title.set_block(block.clone().border_style(style));
        }
        if let Some(block) = self.editor_content.block() {
            let style = if self.editor_field == EditorField::Content {
                active
            } else {
                muted
            };
            self.editor_content
                .set_block(block.clone().border_style(style));
        }
    }

    /// Collect the editor fields into a document record.
    fn editor_document(&self) -> KnowledgeDocument {
        KnowledgeDocument {
            id: None,
            title: self.editor_title.lines().join(" ").trim().to_string(),
            content: self.editor_content.lines().join("\n").trim().to_string(),
            category: CATEGORIES[self.editor_category_idx].to_string(),
            created_at: None,
            updated_at: None,
        }
    }

    fn save_editor(&mut self, services: &Services) {
        let doc = self.editor_document();
        let lang = services.language;

        if doc.title.is_empty() {
            self.editor_error = Some(
                pick_localized(lang, "Tiêu đề không được để trống.", "Title must not be empty.")
                    .to_string(),
            );
            return;
        }
        if doc.content.is_empty() {
            self.editor_error = Some(
                pick_localized(
                    lang,
                    "Nội dung không được để trống.",
                    "Content must not be empty.",
                )
                .to_string(),
            );
            return;
        }

        let id = self
            .editor_editing
            .clone()
            .unwrap_or_else(new_document_id);
        let db = services.store.db().clone();
        let tx = services.event_tx.clone();
        let data_tx = self.data_tx.clone();

        self.mode = DocumentsMode::List;

        tokio::spawn(async move {
            let (message, level) = match upsert_document(&db, &id, &doc).await {
                Ok(()) => (
                    pick_localized(lang, "Đã lưu tài liệu!", "Document saved!").to_string(),
                    NotificationLevel::Success,
                ),
                Err(e) => {
                    log::error!("Failed to save document {id}: {e}");
                    (
                        pick_localized(
                            lang,
                            "Không thể lưu tài liệu. Vui lòng thử lại.",
                            "Could not save the document. Please try again.",
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
            let (message, level) = match delete_document(&db, &id).await {
                Ok(()) => (
                    pick_localized(lang, "Đã xóa tài liệu!", "Document deleted!").to_string(),
                    NotificationLevel::Success,
                ),
                Err(e) => {
                    log::error!("Failed to delete document {id}: {e}");
                    (
                        pick_localized(
                            lang,
                            "Không thể xóa tài liệu. Vui lòng thử lại.",
                            "Could not delete the document. Please try again.",
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

    // ── Input ───────────────────────────────────────────────────────

    pub fn handle_input(&mut self, event: &Event, services: &Services) -> bool {
        let Event::Key(key) = event else {
            return false;
        };
        if key.kind != KeyEventKind::Press {
            return false;
        }

        if self.mode == DocumentsMode::Editor {
            return self.handle_editor_input(key, services);
        }

        if let Some((id, _)) = self.confirm_delete.clone() {
            match key.code {
                KeyCode::Char('y') | KeyCode::Enter => {
                    self.run_delete(id, services);
                    self.confirm_delete = None;
                }
                KeyCode::Char('n') | KeyCode::Esc => {
                    self.confirm_delete = None;
                }
                _ => {}
            }
            return true;
        }

        self.handle_list_input(key.code, key.modifiers, services)
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
                let count = self.doc_count();
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
                self.open_editor(None, services.language);
                true
            }
            (KeyModifiers::NONE, KeyCode::Char('e') | KeyCode::Enter) => {
                let doc = self
                    .data
                    .as_ref()
                    .and_then(|d| d.docs.get(self.selected))
                    .cloned();
                if let Some(doc) = doc {
                    self.open_editor(Some(&doc), services.language);
                }
                true
            }
            (KeyModifiers::NONE, KeyCode::Char('d')) => {
                if let Some(doc) = self.data.as_ref().and_then(|d| d.docs.get(self.selected)) {
                    if let Some(id) = doc.id.clone() {
                        self.confirm_delete = Some((id, doc.title.clone()));
                    }
                }
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
        match (key.modifiers, key.code) {
            (KeyModifiers::CONTROL, KeyCode::Char('s')) => {
                self.save_editor(services);
                return true;
            }
            (KeyModifiers::NONE, KeyCode::Esc) => {
                self.mode = DocumentsMode::List;
                return true;
            }
            (KeyModifiers::NONE, KeyCode::Tab) => {
                self.editor_field = self.editor_field.next();
                self.focus_textareas();
                return true;
            }
            (KeyModifiers::SHIFT, KeyCode::BackTab) => {
                self.editor_field = self.editor_field.prev();
                self.focus_textareas();
                return true;
            }
            _ => {}
        }

        match self.editor_field {
            EditorField::Title => match key.code {
                // Single-line field: Enter advances instead of inserting a newline
                KeyCode::Enter => {
                    self.editor_field = self.editor_field.next();
                    self.focus_textareas();
                }
                _ => {
                    self.editor_title.input(*key);
                }
            },
            EditorField::Category => match key.code {
                KeyCode::Left => {
                    self.editor_category_idx =
                        (self.editor_category_idx + CATEGORIES.len() - 1) % CATEGORIES.len();
                }
                KeyCode::Right => {
                    self.editor_category_idx = (self.editor_category_idx + 1) % CATEGORIES.len();
                }
                KeyCode::Enter => {
                    self.editor_field = self.editor_field.next();
                    self.focus_textareas();
                }
                _ => {}
            },
            EditorField::Content => {
                self.editor_content.input(*key);
            }
        }

        true
    }

    fn select_next(&mut self) {
        let count = self.doc_count();
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
        if self.mode == DocumentsMode::Editor {
            self.render_editor(frame, area, lang);
            return;
        }

        // Horizontal split: left list, right markdown preview
        let chunks =
            Layout::horizontal([Constraint::Percentage(45), Constraint::Percentage(55)])
                .split(area);

        self.render_list(frame, chunks[0], lang);
        self.render_preview(frame, chunks[1], lang);

        if let Some((_, ref title)) = self.confirm_delete {
            render_confirm_modal(frame, area, title, lang);
        }
    }

    fn render_list(&self, frame: &mut Frame, area: Rect, lang: Language) {
        let block = Block::default()
            .title(" Documents ")
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
            return;
        }

        if self.lines_cache.is_empty() {
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
            return;
        }

        // Auto-scroll to keep selected item visible
        let visible_height = inner.height as usize;
        let scroll = if visible_height > 0 {
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

    fn render_preview(&self, frame: &mut Frame, area: Rect, lang: Language) {
        let title = self
            .data
            .as_ref()
            .and_then(|d| d.docs.get(self.selected))
            .map(|doc| format!(" {} ", truncate(&doc.title, area.width.saturating_sub(4) as usize)))
            .unwrap_or_else(|| pick_localized(lang, " Xem trước ", " Preview ").to_string());

        let block = Block::default()
            .title(title)
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme::TEXT_DIM));

        let inner = block.inner(area);
        frame.render_widget(block, area);

        if self.preview_cache.is_empty() {
            let empty = Paragraph::new(vec![
                Line::raw(""),
                Line::from(vec![
                    Span::raw("  "),
                    Span::styled(
                        pick_localized(lang, "Không có tài liệu nào.", "No document selected."),
                        Style::default().fg(theme::TEXT_DIM),
                    ),
                ]),
            ]);
            frame.render_widget(empty, inner);
            return;
        }

        let preview = Paragraph::new(self.preview_cache.clone()).wrap(Wrap { trim: false });
        frame.render_widget(preview, inner);
    }

    fn render_editor(&self, frame: &mut Frame, area: Rect, lang: Language) {
        let title = if self.editor_editing.is_some() {
            pick_localized(lang, " Sửa tài liệu ", " Edit Document ")
        } else {
            pick_localized(lang, " Thêm tài liệu ", " New Document ")
        };
        let block = Block::default()
            .title(title)
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme::ACCENT));

        let inner = block.inner(area);
        frame.render_widget(block, area);

        let chunks = Layout::vertical([
            Constraint::Length(3), // Title
            Constraint::Length(1), // Category selector
            Constraint::Min(5),    // Content
            Constraint::Length(1), // Error
            Constraint::Length(1), // Footer
        ])
        .split(inner);

        frame.render_widget(&self.editor_title, chunks[0]);

        let cat_focused = self.editor_field == EditorField::Category;
        let cat_style = if cat_focused {
            Style::default()
                .fg(theme::PRIMARY_LIGHT)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(theme::TEXT_MUTED)
        };
        let arrows = if cat_focused {
            format!("  ◀ {} ▶", CATEGORIES[self.editor_category_idx])
        } else {
            format!("    {}", CATEGORIES[self.editor_category_idx])
        };
        let cat_line = Line::from(vec![
            Span::raw(" "),
            Span::styled(
                pick_localized(lang, "Danh mục:", "Category:").to_string(),
                cat_style,
            ),
            Span::styled(arrows, Style::default().fg(theme::TEXT)),
        ]);
        frame.render_widget(Paragraph::new(cat_line), chunks[1]);

        frame.render_widget(&self.editor_content, chunks[2]);

        if let Some(ref err) = self.editor_error {
            let error_line = Line::from(vec![
                Span::raw(" "),
                Span::styled(
                    err.clone(),
                    Style::default().fg(theme::ERROR).add_modifier(Modifier::BOLD),
                ),
            ]);
            frame.render_widget(Paragraph::new(error_line), chunks[3]);
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
        frame.render_widget(Paragraph::new(footer), chunks[4]);
    }
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

fn render_confirm_modal(frame: &mut Frame, area: Rect, title: &str, lang: Language) {
    let modal_area = centered_fixed(52, 7, area);
    let block = Block::default()
        .title(pick_localized(lang, " Xóa tài liệu? ", " Delete document? "))
        .title_alignment(Alignment::Center)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme::ERROR));

    let lines = vec![
        Line::raw(""),
        Line::from(vec![
            Span::raw("  "),
            Span::styled(truncate(title, 44), Style::default().fg(theme::TEXT)),
        ]),
        Line::raw(""),
        Line::from(vec![
            Span::raw("  "),
            Span::styled(
                "y",
                Style::default().fg(theme::ERROR).add_modifier(Modifier::BOLD),
            ),
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
    data_tx: &mpsc::UnboundedSender<DocumentsData>,
) {
    let docs = match list_documents(db).await {
        Ok(docs) => docs,
        Err(e) => {
            log::warn!("Failed to reload documents: {e}");
            return;
        }
    };
    let _ = data_tx.send(DocumentsData { docs });
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

fn format_updated(doc: &KnowledgeDocument) -> String {
    doc.updated_at
        .map(|dt| dt.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| "—".to_string())
}

// ── Line builders ───────────────────────────────────────────────────────────

fn build_lines(data: &DocumentsData, selected: usize) -> Vec<Line<'static>> {
    let mut lines = Vec::with_capacity(data.docs.len() + 12);

    lines.push(Line::raw(""));
    lines.push(Line::from(Span::styled(
        "  Tài liệu tham khảo",
        Style::default()
            .fg(theme::ACCENT)
            .add_modifier(Modifier::BOLD),
    )));
    lines.push(Line::from(Span::styled(
        format!("  {}", "─".repeat(56)),
        Style::default().fg(theme::TEXT_DIM),
    )));

    if data.docs.is_empty() {
        lines.push(Line::from(vec![
            Span::raw("  "),
            Span::styled(
                "Chưa có tài liệu nào. Nhấn a để thêm.",
                Style::default().fg(theme::TEXT_MUTED),
            ),
        ]));
    } else {
        lines.push(Line::from(vec![
            Span::raw("  "),
            Span::styled(
                format!("  {:<26} {:<12} {}", "Tiêu đề", "Danh mục", "Cập nhật"),
                Style::default()
                    .fg(theme::TEXT_DIM)
                    .add_modifier(Modifier::BOLD),
            ),
        ]));

        for (i, doc) in data.docs.iter().enumerate() {
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
                Span::styled(format!("{:<26}", truncate(&doc.title, 24)), row_style),
                Span::styled(
                    format!(" {:<12}", truncate(&doc.category, 12)),
                    Style::default().fg(theme::PRIMARY_LIGHT),
                ),
                Span::styled(
                    format!(" {}", format_updated(doc)),
                    Style::default().fg(theme::TEXT_MUTED),
                ),
            ]));
        }
    }

    lines.push(Line::raw(""));
    lines.push(Line::from(Span::styled(
        format!("  {}", "─".repeat(56)),
        Style::default().fg(theme::TEXT_DIM),
    )));
    lines.push(Line::from(vec![
        Span::raw("  "),
        Span::styled("Tổng: ", Style::default().fg(theme::TEXT_MUTED)),
        Span::raw(format!("{} tài liệu", data.docs.len())),
    ]));

    lines.push(Line::raw(""));
    lines.push(Line::from(vec![
        Span::raw("  "),
        Span::styled("a", Style::default().fg(theme::TEXT_MUTED)),
        Span::raw(":thêm "),
        Span::styled("e", Style::default().fg(theme::TEXT_MUTED)),
        Span::raw(":sửa "),
        Span::styled("d", Style::default().fg(theme::TEXT_MUTED)),
        Span::raw(":xóa "),
        Span::styled("r", Style::default().fg(theme::TEXT_MUTED)),
        Span::raw(":tải lại"),
    ]));
    lines.push(Line::raw(""));

    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_doc(id: &str, title: &str) -> KnowledgeDocument {
        KnowledgeDocument {
            id: Some(id.to_string()),
            title: title.to_string(),
            content: "# Giới thiệu\n\nHaiAn vận chuyển container nội địa.".to_string(),
            category: "Dịch vụ".to_string(),
            created_at: None,
            updated_at: None,
        }
    }

    #[test]
    fn test_editor_field_cycle_roundtrip() {
        let mut field = EditorField::Title;
        for _ in 0..3 {
            field = field.next();
        }
        assert_eq!(field, EditorField::Title);

        assert_eq!(EditorField::Title.prev(), EditorField::Content);
        assert_eq!(EditorField::Content.prev(), EditorField::Category);
    }

    #[test]
    fn test_open_editor_prefills_fields() {
        let mut state = DocumentsState::new();
        state.open_editor(Some(&sample_doc("d1", "Giới thiệu HaiAn")), Language::Vi);

        assert_eq!(state.editor_editing.as_deref(), Some("d1"));
        let built = state.editor_document();
        assert_eq!(built.title, "Giới thiệu HaiAn");
        assert!(built.content.contains("# Giới thiệu"));
        assert!(built.content.contains("container nội địa"));
        assert_eq!(built.category, "Dịch vụ");
    }

    #[test]
    fn test_open_editor_blank_for_new_document() {
        let mut state = DocumentsState::new();
        state.open_editor(Some(&sample_doc("d1", "Cũ")), Language::Vi);
        state.open_editor(None, Language::Vi);

        assert!(state.editor_editing.is_none());
        let built = state.editor_document();
        assert!(built.title.is_empty());
        assert!(built.content.is_empty());
        assert_eq!(built.category, CATEGORIES[0]);
    }

    #[test]
    fn test_editor_document_preserves_multiline_content() {
        let mut state = DocumentsState::new();
        let mut doc = sample_doc("d1", "Nhiều dòng");
        doc.content = "dòng một\ndòng hai\ndòng ba".to_string();
        state.open_editor(Some(&doc), Language::Vi);

        assert_eq!(state.editor_document().content, "dòng một\ndòng hai\ndòng ba");
    }

    #[test]
    fn test_unknown_category_falls_back_to_catch_all() {
        let mut state = DocumentsState::new();
        let mut doc = sample_doc("d1", "Lạ");
        doc.category = "Một danh mục không tồn tại".to_string();
        state.open_editor(Some(&doc), Language::Vi);

        assert_eq!(state.editor_category_idx, CATEGORIES.len() - 1);
        assert_eq!(state.editor_document().category, "Khác");
    }

    #[test]
    fn test_build_lines_empty_state() {
        let data = DocumentsData { docs: vec![] };
        let lines = build_lines(&data, 0);
        let text: String = lines
            .iter()
            .map(|l| {
                l.spans
                    .iter()
                    .map(|s| s.content.as_ref())
                    .collect::<String>()
            })
            .collect::<Vec<_>>()
            .join("\n");

        assert!(text.contains("Chưa có tài liệu nào"));
        assert!(text.contains("Tổng: 0 tài liệu"));
    }

    #[test]
    fn test_build_lines_marks_selection() {
        let data = DocumentsData {
            docs: vec![sample_doc("d1", "Một"), sample_doc("d2", "Hai")],
        };
        let lines = build_lines(&data, 1);
        let text: String = lines
            .iter()
            .map(|l| {
                l.spans
                    .iter()
                    .map(|s| s.content.as_ref())
                    .collect::<String>()
            })
            .collect::<Vec<_>>()
            .join("\n");

        let marked: Vec<&str> = text.lines().filter(|l| l.starts_with("▸ ")).collect();
        assert_eq!(marked.len(), 1);
        assert!(marked[0].contains("Hai"));
    }

    #[test]
    fn test_selection_stays_in_bounds() {
        let mut state = DocumentsState::new();
        state.data = Some(DocumentsData {
            docs: vec![sample_doc("d1", "Một"), sample_doc("d2", "Hai")],
        });
        state.rebuild_lines();

        state.select_prev();
        assert_eq!(state.selected, 0);
        for _ in 0..10 {
            state.select_next();
        }
        assert_eq!(state.selected, 1);
    }

    #[test]
    fn test_has_modal_in_editor_mode() {
        let mut state = DocumentsState::new();
        assert!(!state.has_modal());
        state.open_editor(None, Language::Vi);
        assert!(state.has_modal());
        state.mode = DocumentsMode::List;
        state.confirm_delete = Some(("d1".to_string(), "Một".to_string()));
        assert!(state.has_modal());
    }
}
