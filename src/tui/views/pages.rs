//! Landing page copy view — hero, services grid, and call-to-action.
//!
//! Three tabs, each with a read-only summary (the hero tab doubles as a
//! preview in the active display language) and a full-screen editor over a
//! working copy. Every editable string exists in a vi/en pair; Ctrl+T batch
//! translates the Vietnamese side through the gateway and fills the English
//! side when results land. Nothing persists until Ctrl+S.

use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use indexmap::IndexMap;
use ratatui::{
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};
use ratatui_textarea::TextArea;
use std::sync::Arc;
use tokio::sync::mpsc;

use super::super::theme;

use crate::core::gateway::translate_fields;
use crate::core::i18n::{pick_localized, Language};
use crate::core::storage::{
    load_hero_settings, load_landing_settings, save_hero_settings, save_landing_settings,
    CtaSettings, HeroFeature, HeroSettings, LandingSettings, ServiceCard, ServicesSettings,
    MAX_HERO_FEATURES, MAX_SERVICE_CARDS,
};
use crate::tui::events::{AppEvent, Notification, NotificationLevel};
use crate::tui::layout::centered_fixed;
use crate::tui::services::Services;
use crate::tui::widgets::input_buffer::InputBuffer;

// ── Tabs ────────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum PagesTab {
    Hero,
    Services,
    Cta,
}

impl PagesTab {
    fn label(self, lang: Language) -> &'static str {
        match self {
            Self::Hero => "Hero",
            Self::Services => pick_localized(lang, "Dịch vụ", "Services"),
            Self::Cta => "CTA",
        }
    }

    fn next(self) -> Self {
        match self {
            Self::Hero => Self::Services,
            Self::Services => Self::Cta,
            Self::Cta => Self::Hero,
        }
    }

    const ALL: [Self; 3] = [Self::Hero, Self::Services, Self::Cta];
}

// ── Data ────────────────────────────────────────────────────────────────────

#[derive(Clone, Debug)]
struct PagesData {
    hero: HeroSettings,
    landing: LandingSettings,
}

/// English translations coming back from a Ctrl+T batch. Scalar keys are the
/// field-pair names; item keys are `text:<id>`, `title:<id>`, `desc:<id>`.
#[derive(Clone, Debug)]
struct TranslatePatch {
    tab: PagesTab,
    fields: IndexMap<String, String>,
}

// ── Editor model ────────────────────────────────────────────────────────────

/// One vi/en pair of single-line inputs in a section editor.
struct FieldPair {
    name: &'static str,
    vi: TextArea<'static>,
    en: TextArea<'static>,
}

/// List entry behind a section editor (hero features or service cards).
#[derive(Clone, Debug)]
enum EditorItem {
    Feature(HeroFeature),
    Card(ServiceCard),
}

impl EditorItem {
    fn id(&self) -> &str {
        match self {
            Self::Feature(f) => &f.id,
            Self::Card(c) => &c.id,
        }
    }

    fn headline(&self) -> &str {
        match self {
            Self::Feature(f) => &f.text_vi,
            Self::Card(c) => &c.title_vi,
        }
    }

    fn icon(&self) -> &str {
        match self {
            Self::Feature(f) => &f.icon,
            Self::Card(c) => &c.icon,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum EditorFocus {
    Field { row: usize, en: bool },
    Items,
}

struct ItemModal {
    /// Index into the editor items when editing; `None` appends.
    editing: Option<usize>,
    labels: Vec<&'static str>,
    inputs: Vec<InputBuffer>,
    focused: usize,
    error: Option<String>,
}

struct SectionEditor {
    tab: PagesTab,
    pairs: Vec<FieldPair>,
    focus: EditorFocus,
    items: Vec<EditorItem>,
    item_selected: usize,
    item_modal: Option<ItemModal>,
    error: Option<String>,
}

impl SectionEditor {
    fn has_items(&self) -> bool {
        self.tab != PagesTab::Cta
    }

    fn item_cap(&self) -> usize {
        match self.tab {
            PagesTab::Hero => MAX_HERO_FEATURES,
            PagesTab::Services => MAX_SERVICE_CARDS,
            PagesTab::Cta => 0,
        }
    }

    fn focus_next(&mut self) {
        self.focus = match self.focus {
            EditorFocus::Field { row, en: false } => EditorFocus::Field { row, en: true },
            EditorFocus::Field { row, en: true } => {
                if row + 1 < self.pairs.len() {
                    EditorFocus::Field {
                        row: row + 1,
                        en: false,
                    }
                } else if self.has_items() {
                    EditorFocus::Items
                } else {
                    EditorFocus::Field { row: 0, en: false }
                }
            }
            EditorFocus::Items => EditorFocus::Field { row: 0, en: false },
        };
        self.style_focus();
    }

    fn focus_prev(&mut self) {
        self.focus = match self.focus {
            EditorFocus::Field { row: 0, en: false } => {
                if self.has_items() {
                    EditorFocus::Items
                } else {
                    EditorFocus::Field {
                        row: self.pairs.len() - 1,
                        en: true,
                    }
                }
            }
            EditorFocus::Field { row, en: false } => EditorFocus::Field { row: row - 1, en: true },
            EditorFocus::Field { row, en: true } => EditorFocus::Field { row, en: false },
            EditorFocus::Items => EditorFocus::Field {
                row: self.pairs.len() - 1,
                en: true,
            },
        };
        self.style_focus();
    }

    fn style_focus(&mut self) {
        let focus = self.focus;
        for (row, pair) in self.pairs.iter_mut().enumerate() {
            for (en, ta) in [(false, &mut pair.vi), (true, &mut pair.en)] {
                let style = if focus == (EditorFocus::Field { row, en }) {
                    Style::default().fg(theme::PRIMARY)
                } else {
                    Style::default().fg(theme::TEXT_MUTED)
                };
                if let Some(block) = ta.block() {
                    ta.set_block(block.clone().border_style(style));
                }
            }
        }
    }

    fn pair_text(&self, row: usize, en: bool) -> String {
        let pair = &self.pairs[row];
        let ta = if en { &pair.en } else { &pair.vi };
        ta.lines().join(" ").trim().to_string()
    }

    /// Fill English fields from a translation batch.
    fn apply_patch(&mut self, patch: &TranslatePatch) {
        for (key, value) in &patch.fields {
            if let Some(id) = key.strip_prefix("text:") {
                for item in &mut self.items {
                    if let EditorItem::Feature(f) = item {
                        if f.id == id {
                            f.text_en = value.clone();
                        }
                    }
                }
            } else if let Some(id) = key.strip_prefix("title:") {
                for item in &mut self.items {
                    if let EditorItem::Card(c) = item {
                        if c.id == id {
                            c.title_en = value.clone();
                        }
                    }
                }
            } else if let Some(id) = key.strip_prefix("desc:") {
                for item in &mut self.items {
                    if let EditorItem::Card(c) = item {
                        if c.id == id {
                            c.description_en = value.clone();
                        }
                    }
                }
            } else if let Some(pair) = self.pairs.iter_mut().find(|p| p.name == key.as_str()) {
                set_ta_text(&mut pair.en, value);
            }
        }
        self.style_focus();
    }

    /// The vi texts Ctrl+T sends out, keyed the way [`apply_patch`] expects
    /// them back.
    fn translate_requests(&self) -> Vec<(String, String)> {
        let mut requests: Vec<(String, String)> = self
            .pairs
            .iter()
            .map(|pair| {
                (
                    pair.name.to_string(),
                    pair.vi.lines().join(" ").trim().to_string(),
                )
            })
            .collect();

        for item in &self.items {
            match item {
                EditorItem::Feature(f) => {
                    requests.push((format!("text:{}", f.id), f.text_vi.clone()));
                }
                EditorItem::Card(c) => {
                    requests.push((format!("title:{}", c.id), c.title_vi.clone()));
                    requests.push((format!("desc:{}", c.id), c.description_vi.clone()));
                }
            }
        }

        requests
    }
}

// ── State ───────────────────────────────────────────────────────────────────

pub struct PagesState {
    tab: PagesTab,
    data: Option<PagesData>,
    loading: bool,
    data_rx: mpsc::UnboundedReceiver<PagesData>,
    data_tx: mpsc::UnboundedSender<PagesData>,
    translate_rx: mpsc::UnboundedReceiver<TranslatePatch>,
    translate_tx: mpsc::UnboundedSender<TranslatePatch>,
    editor: Option<SectionEditor>,
}

impl PagesState {
    pub fn new() -> Self {
        let (data_tx, data_rx) = mpsc::unbounded_channel();
        let (translate_tx, translate_rx) = mpsc::unbounded_channel();
        Self {
            tab: PagesTab::Hero,
            data: None,
            loading: false,
            data_rx,
            data_tx,
            translate_rx,
            translate_tx,
            editor: None,
        }
    }

    pub fn has_modal(&self) -> bool {
        self.editor.is_some()
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
            let hero = load_hero_settings(&db).await;
            let landing = load_landing_settings(&db).await;
            let _ = tx.send(PagesData { hero, landing });
        });
    }

    /// Poll for async data and translation batches. Call from on_tick.
    pub fn poll(&mut self) {
        while let Ok(data) = self.data_rx.try_recv() {
            self.data = Some(data);
            self.loading = false;
        }
        while let Ok(patch) = self.translate_rx.try_recv() {
            if let Some(ref mut editor) = self.editor {
                if editor.tab == patch.tab {
                    editor.apply_patch(&patch);
                }
            }
        }
    }

    // ── Editor construction ─────────────────────────────────────────

    fn open_editor(&mut self, lang: Language) {
        let Some(ref data) = self.data else {
            return;
        };

        let editor = match self.tab {
            PagesTab::Hero => hero_editor(&data.hero, lang),
            PagesTab::Services => services_editor(&data.landing.services, lang),
            PagesTab::Cta => cta_editor(&data.landing.cta, lang),
        };
        self.editor = Some(editor);
    }

    // ── Save ────────────────────────────────────────────────────────

    fn save_editor(&mut self, services: &Services) {
        let Some(ref editor) = self.editor else {
            return;
        };
        let Some(ref data) = self.data else {
            return;
        };
        let lang = services.language;

        // The first pair is the section's required title
        if editor.pair_text(0, false).is_empty() {
            if let Some(ref mut editor) = self.editor {
                editor.error = Some(
                    pick_localized(
                        lang,
                        "Trường tiếng Việt đầu tiên không được để trống.",
                        "The first Vietnamese field must not be empty.",
                    )
                    .to_string(),
                );
            }
            return;
        }

        let payload = match editor.tab {
            PagesTab::Hero => SavePayload::Hero(build_hero(editor)),
            PagesTab::Services => {
                let mut landing = data.landing.clone();
                landing.services = build_services(editor);
                SavePayload::Landing(landing)
            }
            PagesTab::Cta => {
                let mut landing = data.landing.clone();
                landing.cta = build_cta(editor);
                SavePayload::Landing(landing)
            }
        };

        let db = services.store.db().clone();
        let tx = services.event_tx.clone();
        let data_tx = self.data_tx.clone();

        self.editor = None;

        tokio::spawn(async move {
            let result = match &payload {
                SavePayload::Hero(hero) => save_hero_settings(&db, hero).await,
                SavePayload::Landing(landing) => save_landing_settings(&db, landing).await,
            };

            let (message, level) = match result {
                Ok(()) => (
                    pick_localized(lang, "Đã lưu nội dung trang!", "Page content saved!")
                        .to_string(),
                    NotificationLevel::Success,
                ),
                Err(e) => {
                    log::error!("Failed to save page settings: {e}");
                    (
                        pick_localized(
                            lang,
                            "Không thể lưu nội dung. Vui lòng thử lại.",
                            "Could not save the content. Please try again.",
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

            let hero = load_hero_settings(&db).await;
            let landing = load_landing_settings(&db).await;
            let _ = data_tx.send(PagesData { hero, landing });
        });
    }

    // ── Translate ───────────────────────────────────────────────────

    fn run_translate(&mut self, services: &Services) {
        let Some(ref editor) = self.editor else {
            return;
        };
        let lang = services.language;
        let tab = editor.tab;
        let requests = editor.translate_requests();

        let gateway = Arc::clone(&services.gateway);
        let tx = services.event_tx.clone();
        let translate_tx = self.translate_tx.clone();

        tokio::spawn(async move {
            let borrowed: Vec<(&str, &str)> = requests
                .iter()
                .map(|(name, text)| (name.as_str(), text.as_str()))
                .collect();

            let results =
                translate_fields(gateway.as_ref(), &borrowed, Language::Vi, &[Language::En]).await;

            let mut fields = IndexMap::new();
            for (name, translations) in results {
                if let Some(text) = translations.get(&Language::En) {
                    fields.insert(name, text.clone());
                }
            }

            let translated = fields.len();
            let (message, level) = if translated == 0 {
                (
                    pick_localized(
                        lang,
                        "Không dịch được trường nào. Kiểm tra kết nối AI.",
                        "No fields were translated. Check the AI connection.",
                    )
                    .to_string(),
                    NotificationLevel::Warning,
                )
            } else {
                (
                    pick_localized(lang, "Đã dịch xong các trường!", "Fields translated!")
                        .to_string(),
                    NotificationLevel::Success,
                )
            };
            let _ = tx.send(AppEvent::Notification(Notification {
                id: 0,
                message,
                level,
                ttl_ticks: 100,
            }));

            if translated > 0 {
                let _ = translate_tx.send(TranslatePatch { tab, fields });
            }
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

        if self.editor.is_some() {
            return self.handle_editor_input(key, services);
        }

        match (key.modifiers, key.code) {
            (KeyModifiers::NONE, KeyCode::Char('h') | KeyCode::Left) => {
                // Tabs cycle in one direction; three entries make prev == 2×next
                self.tab = self.tab.next().next();
                true
            }
            (KeyModifiers::NONE, KeyCode::Char('l') | KeyCode::Right) => {
                self.tab = self.tab.next();
                true
            }
            (KeyModifiers::NONE, KeyCode::Char('e') | KeyCode::Enter) => {
                self.open_editor(services.language);
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
        if self
            .editor
            .as_ref()
            .map(|e| e.item_modal.is_some())
            .unwrap_or(false)
        {
            return self.handle_item_modal_input(key, services.language);
        }

        match (key.modifiers, key.code) {
            (KeyModifiers::CONTROL, KeyCode::Char('s')) => {
                self.save_editor(services);
                return true;
            }
            (KeyModifiers::CONTROL, KeyCode::Char('t')) => {
                self.run_translate(services);
                return true;
            }
            (KeyModifiers::NONE, KeyCode::Esc) => {
                self.editor = None;
                return true;
            }
            (KeyModifiers::NONE, KeyCode::Tab) => {
                if let Some(ref mut editor) = self.editor {
                    editor.focus_next();
                }
                return true;
            }
            (KeyModifiers::SHIFT, KeyCode::BackTab) => {
                if let Some(ref mut editor) = self.editor {
                    editor.focus_prev();
                }
                return true;
            }
            _ => {}
        }

        let Some(ref mut editor) = self.editor else {
            return false;
        };

        match editor.focus {
            EditorFocus::Items => {
                match key.code {
                    KeyCode::Char('j') | KeyCode::Down => {
                        if !editor.items.is_empty() {
                            editor.item_selected =
                                (editor.item_selected + 1).min(editor.items.len() - 1);
                        }
                    }
                    KeyCode::Char('k') | KeyCode::Up => {
                        editor.item_selected = editor.item_selected.saturating_sub(1);
                    }
                    KeyCode::Char('a') => {
                        if editor.items.len() >= editor.item_cap() {
                            editor.error = Some(format!(
                                "{} {}.",
                                pick_localized(services.language, "Tối đa", "At most"),
                                editor.item_cap()
                            ));
                        } else {
                            open_item_modal(editor, None, services.language);
                        }
                    }
                    KeyCode::Char('e') | KeyCode::Enter => {
                        if !editor.items.is_empty() {
                            let idx = editor.item_selected;
                            open_item_modal(editor, Some(idx), services.language);
                        }
                    }
                    KeyCode::Char('d') => {
                        if editor.item_selected < editor.items.len() {
                            editor.items.remove(editor.item_selected);
                            editor.item_selected = editor
                                .item_selected
                                .min(editor.items.len().saturating_sub(1));
                        }
                    }
                    _ => {}
                }
                true
            }
            EditorFocus::Field { row, en } => {
                // Single-line field: Enter advances instead of inserting a newline
                if key.code == KeyCode::Enter {
                    editor.focus_next();
                } else {
                    let pair = &mut editor.pairs[row];
                    let ta = if en { &mut pair.en } else { &mut pair.vi };
                    ta.input(*key);
                }
                true
            }
        }
    }

    fn handle_item_modal_input(&mut self, key: &KeyEvent, lang: Language) -> bool {
        let Some(ref mut editor) = self.editor else {
            return false;
        };
        let Some(ref mut modal) = editor.item_modal else {
            return false;
        };

        match (key.modifiers, key.code) {
            (KeyModifiers::NONE, KeyCode::Esc) => {
                editor.item_modal = None;
            }
            (KeyModifiers::NONE, KeyCode::Tab) => {
                modal.focused = (modal.focused + 1) % modal.inputs.len();
            }
            (KeyModifiers::SHIFT, KeyCode::BackTab) => {
                modal.focused = (modal.focused + modal.inputs.len() - 1) % modal.inputs.len();
            }
            (KeyModifiers::NONE, KeyCode::Enter) => {
                submit_item_modal(editor, lang);
            }
            _ => {
                let buf = &mut modal.inputs[modal.focused];
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
        if let Some(ref editor) = self.editor {
            render_editor(frame, area, editor, lang);
            return;
        }

        let block = Block::default()
            .title(" Pages ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme::TEXT_MUTED));

        let inner = block.inner(area);
        frame.render_widget(block, area);

        let chunks =
            Layout::vertical([Constraint::Length(2), Constraint::Min(1)]).split(inner);

        self.render_tab_bar(frame, chunks[0], lang);

        let Some(ref data) = self.data else {
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
            frame.render_widget(loading, chunks[1]);
            return;
        };

        match self.tab {
            PagesTab::Hero => render_hero_preview(frame, chunks[1], &data.hero, lang),
            PagesTab::Services => render_services_summary(frame, chunks[1], &data.landing.services, lang),
            PagesTab::Cta => render_cta_summary(frame, chunks[1], &data.landing.cta, lang),
        }
    }

    fn render_tab_bar(&self, frame: &mut Frame, area: Rect, lang: Language) {
        let mut spans = vec![Span::raw(" ")];
        for tab in PagesTab::ALL {
            let style = if tab == self.tab {
                Style::default()
                    .fg(theme::ACCENT)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(theme::TEXT_MUTED)
            };
            spans.push(Span::styled(format!(" {} ", tab.label(lang)), style));
            spans.push(Span::styled("│", Style::default().fg(theme::TEXT_DIM)));
        }
        spans.pop();
        spans.push(Span::styled(
            pick_localized(
                lang,
                "   h/l:chuyển tab  e:sửa  r:tải lại",
                "   h/l:switch tab  e:edit  r:reload",
            ),
            Style::default().fg(theme::TEXT_DIM),
        ));

        frame.render_widget(Paragraph::new(Line::from(spans)), area);
    }
}

enum SavePayload {
    Hero(HeroSettings),
    Landing(LandingSettings),
}

// ── Editor constructors ─────────────────────────────────────────────────────

fn hero_editor(hero: &HeroSettings, lang: Language) -> SectionEditor {
    let mut editor = SectionEditor {
        tab: PagesTab::Hero,
        pairs: vec![
            field_pair("badge", pick_localized(lang, "Huy hiệu", "Badge"), &hero.badge_vi, &hero.badge_en),
            field_pair("title", pick_localized(lang, "Tiêu đề", "Title"), &hero.title_vi, &hero.title_en),
            field_pair(
                "highlight",
                pick_localized(lang, "Tiêu đề nổi bật", "Title highlight"),
                &hero.title_highlight_vi,
                &hero.title_highlight_en,
            ),
            field_pair(
                "description",
                pick_localized(lang, "Mô tả", "Description"),
                &hero.description_vi,
                &hero.description_en,
            ),
        ],
        focus: EditorFocus::Field { row: 0, en: false },
        items: hero.features.iter().cloned().map(EditorItem::Feature).collect(),
        item_selected: 0,
        item_modal: None,
        error: None,
    };
    editor.style_focus();
    editor
}

fn services_editor(services: &ServicesSettings, lang: Language) -> SectionEditor {
    let mut editor = SectionEditor {
        tab: PagesTab::Services,
        pairs: vec![
            field_pair("title", pick_localized(lang, "Tiêu đề", "Title"), &services.title_vi, &services.title_en),
            field_pair(
                "description",
                pick_localized(lang, "Mô tả", "Description"),
                &services.description_vi,
                &services.description_en,
            ),
        ],
        focus: EditorFocus::Field { row: 0, en: false },
        items: services.cards.iter().cloned().map(EditorItem::Card).collect(),
        item_selected: 0,
        item_modal: None,
        error: None,
    };
    editor.style_focus();
    editor
}

fn cta_editor(cta: &CtaSettings, lang: Language) -> SectionEditor {
    let mut editor = SectionEditor {
        tab: PagesTab::Cta,
        pairs: vec![
            field_pair("title", pick_localized(lang, "Tiêu đề", "Title"), &cta.title_vi, &cta.title_en),
            field_pair(
                "description",
                pick_localized(lang, "Mô tả", "Description"),
                &cta.description_vi,
                &cta.description_en,
            ),
            field_pair(
                "languages",
                pick_localized(lang, "Dòng ngôn ngữ", "Languages line"),
                &cta.languages_text_vi,
                &cta.languages_text_en,
            ),
        ],
        focus: EditorFocus::Field { row: 0, en: false },
        items: Vec::new(),
        item_selected: 0,
        item_modal: None,
        error: None,
    };
    editor.style_focus();
    editor
}

fn field_pair(name: &'static str, label: &str, vi: &str, en: &str) -> FieldPair {
    let mut vi_ta = create_textarea_owned(format!("{label} (vi)"));
    vi_ta.insert_str(vi);
    let mut en_ta = create_textarea_owned(format!("{label} (en)"));
    en_ta.insert_str(en);
    FieldPair {
        name,
        vi: vi_ta,
        en: en_ta,
    }
}

fn create_textarea_owned(title: String) -> TextArea<'static> {
    let mut ta = TextArea::default();
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme::TEXT_MUTED))
        .title(title);
    ta.set_block(block);
    ta.set_cursor_line_style(Style::default());
    ta
}

/// Replace a single-line textarea's content.
fn set_ta_text(ta: &mut TextArea<'static>, text: &str) {
    ta.delete_line_by_head();
    ta.delete_line_by_end();
    ta.insert_str(text);
}

// ── Builders back to settings ───────────────────────────────────────────────

fn build_hero(editor: &SectionEditor) -> HeroSettings {
    HeroSettings {
        badge_vi: editor.pair_text(0, false),
        badge_en: editor.pair_text(0, true),
        title_vi: editor.pair_text(1, false),
        title_en: editor.pair_text(1, true),
        title_highlight_vi: editor.pair_text(2, false),
        title_highlight_en: editor.pair_text(2, true),
        description_vi: editor.pair_text(3, false),
        description_en: editor.pair_text(3, true),
        features: editor
            .items
            .iter()
            .filter_map(|item| match item {
                EditorItem::Feature(f) => Some(f.clone()),
                EditorItem::Card(_) => None,
            })
            .collect(),
    }
}

fn build_services(editor: &SectionEditor) -> ServicesSettings {
    ServicesSettings {
        title_vi: editor.pair_text(0, false),
        title_en: editor.pair_text(0, true),
        description_vi: editor.pair_text(1, false),
        description_en: editor.pair_text(1, true),
        cards: editor
            .items
            .iter()
            .filter_map(|item| match item {
                EditorItem::Card(c) => Some(c.clone()),
                EditorItem::Feature(_) => None,
            })
            .collect(),
    }
}

fn build_cta(editor: &SectionEditor) -> CtaSettings {
    CtaSettings {
        title_vi: editor.pair_text(0, false),
        title_en: editor.pair_text(0, true),
        description_vi: editor.pair_text(1, false),
        description_en: editor.pair_text(1, true),
        languages_text_vi: editor.pair_text(2, false),
        languages_text_en: editor.pair_text(2, true),
    }
}

// ── Item modal ──────────────────────────────────────────────────────────────

fn open_item_modal(editor: &mut SectionEditor, editing: Option<usize>, lang: Language) {
    let labels: Vec<&'static str> = match editor.tab {
        PagesTab::Hero => vec![
            "Icon:",
            pick_localized(lang, "Nội dung (vi):", "Text (vi):"),
            pick_localized(lang, "Nội dung (en):", "Text (en):"),
        ],
        PagesTab::Services => vec![
            "Icon:",
            pick_localized(lang, "Tiêu đề (vi):", "Title (vi):"),
            pick_localized(lang, "Tiêu đề (en):", "Title (en):"),
            pick_localized(lang, "Mô tả (vi):", "Description (vi):"),
            pick_localized(lang, "Mô tả (en):", "Description (en):"),
        ],
        PagesTab::Cta => return,
    };

    let mut inputs: Vec<InputBuffer> = labels.iter().map(|_| InputBuffer::new()).collect();

    if let Some(idx) = editing {
        match editor.items.get(idx) {
            Some(EditorItem::Feature(f)) => {
                inputs[0].set_text(&f.icon);
                inputs[1].set_text(&f.text_vi);
                inputs[2].set_text(&f.text_en);
            }
            Some(EditorItem::Card(c)) => {
                inputs[0].set_text(&c.icon);
                inputs[1].set_text(&c.title_vi);
                inputs[2].set_text(&c.title_en);
                inputs[3].set_text(&c.description_vi);
                inputs[4].set_text(&c.description_en);
            }
            None => return,
        }
    }

    editor.item_modal = Some(ItemModal {
        editing,
        labels,
        inputs,
        focused: 0,
        error: None,
    });
}

fn submit_item_modal(editor: &mut SectionEditor, lang: Language) {
    let Some(ref modal) = editor.item_modal else {
        return;
    };

    // Field 1 is the required vi headline for both item kinds
    if modal.inputs[1].text().trim().is_empty() {
        let message = pick_localized(
            lang,
            "Nội dung tiếng Việt không được để trống.",
            "The Vietnamese text must not be empty.",
        )
        .to_string();
        if let Some(ref mut modal) = editor.item_modal {
            modal.error = Some(message);
        }
        return;
    }

    let icon = {
        let icon = modal.inputs[0].text().trim().to_string();
        if icon.is_empty() {
            "Sparkles".to_string()
        } else {
            icon
        }
    };
    let values: Vec<String> = modal
        .inputs
        .iter()
        .map(|buf| buf.text().trim().to_string())
        .collect();
    let editing = modal.editing;

    let keep_id = editing
        .and_then(|idx| editor.items.get(idx))
        .map(|item| item.id().to_string());
    let id = keep_id.unwrap_or_else(|| uuid::Uuid::new_v4().to_string());

    let item = match editor.tab {
        PagesTab::Hero => EditorItem::Feature(HeroFeature {
            id,
            icon,
            text_vi: values[1].clone(),
            text_en: values[2].clone(),
        }),
        PagesTab::Services => EditorItem::Card(ServiceCard {
            id,
            icon,
            title_vi: values[1].clone(),
            title_en: values[2].clone(),
            description_vi: values[3].clone(),
            description_en: values[4].clone(),
        }),
        PagesTab::Cta => return,
    };

    match editing {
        Some(idx) => {
            if idx < editor.items.len() {
                editor.items[idx] = item;
            }
        }
        None => {
            editor.items.push(item);
            editor.item_selected = editor.items.len() - 1;
        }
    }

    editor.item_modal = None;
    editor.error = None;
}

// ── Rendering helpers ───────────────────────────────────────────────────────

fn render_hero_preview(frame: &mut Frame, area: Rect, hero: &HeroSettings, lang: Language) {
    let mut lines = vec![Line::raw("")];

    lines.push(Line::from(vec![
        Span::raw("  "),
        Span::styled(
            format!(" {} ", pick_localized(lang, &hero.badge_vi, &hero.badge_en)),
            Style::default()
                .fg(theme::BG_BASE)
                .bg(theme::ACCENT)
                .add_modifier(Modifier::BOLD),
        ),
    ]));
    lines.push(Line::raw(""));

    lines.push(Line::from(vec![
        Span::raw("  "),
        Span::styled(
            pick_localized(lang, &hero.title_vi, &hero.title_en).to_string(),
            Style::default()
                .fg(theme::TEXT)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw(" "),
        Span::styled(
            pick_localized(lang, &hero.title_highlight_vi, &hero.title_highlight_en).to_string(),
            Style::default()
                .fg(theme::PRIMARY_LIGHT)
                .add_modifier(Modifier::BOLD),
        ),
    ]));
    lines.push(Line::raw(""));

    lines.push(Line::from(vec![
        Span::raw("  "),
        Span::styled(
            pick_localized(lang, &hero.description_vi, &hero.description_en).to_string(),
            Style::default().fg(theme::TEXT_MUTED),
        ),
    ]));
    lines.push(Line::raw(""));

    for feature in &hero.features {
        lines.push(Line::from(vec![
            Span::raw("  "),
            Span::styled("✓ ", Style::default().fg(theme::SUCCESS)),
            Span::styled(
                feature.text(lang).to_string(),
                Style::default().fg(theme::TEXT),
            ),
            Span::styled(
                format!("  ({})", feature.icon),
                Style::default().fg(theme::TEXT_DIM),
            ),
        ]));
    }

    lines.push(Line::raw(""));
    lines.push(Line::from(vec![
        Span::raw("  "),
        Span::styled(
            format!(
                "{}/{} {}",
                hero.features.len(),
                MAX_HERO_FEATURES,
                pick_localized(lang, "mục nổi bật", "feature bullets"),
            ),
            Style::default().fg(theme::TEXT_DIM),
        ),
    ]));

    frame.render_widget(
        Paragraph::new(lines).wrap(Wrap { trim: false }),
        area,
    );
}

fn render_services_summary(
    frame: &mut Frame,
    area: Rect,
    services: &ServicesSettings,
    lang: Language,
) {
    let mut lines = vec![Line::raw("")];

    lines.push(Line::from(vec![
        Span::raw("  "),
        Span::styled(
            pick_localized(lang, &services.title_vi, &services.title_en).to_string(),
            Style::default()
                .fg(theme::ACCENT)
                .add_modifier(Modifier::BOLD),
        ),
    ]));
    lines.push(Line::from(vec![
        Span::raw("  "),
        Span::styled(
            pick_localized(lang, &services.description_vi, &services.description_en).to_string(),
            Style::default().fg(theme::TEXT_MUTED),
        ),
    ]));
    lines.push(Line::raw(""));

    for card in &services.cards {
        lines.push(Line::from(vec![
            Span::raw("  "),
            Span::styled(
                format!("{:<12}", truncate(&card.icon, 12)),
                Style::default().fg(theme::TEXT_DIM),
            ),
            Span::styled(
                format!("{:<26}", truncate(card.title(lang), 24)),
                Style::default()
                    .fg(theme::TEXT)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                truncate(card.description(lang), 40),
                Style::default().fg(theme::TEXT_MUTED),
            ),
        ]));
    }

    lines.push(Line::raw(""));
    lines.push(Line::from(vec![
        Span::raw("  "),
        Span::styled(
            format!(
                "{}/{} {}",
                services.cards.len(),
                MAX_SERVICE_CARDS,
                pick_localized(lang, "thẻ dịch vụ", "service cards"),
            ),
            Style::default().fg(theme::TEXT_DIM),
        ),
    ]));

    frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }), area);
}

fn render_cta_summary(frame: &mut Frame, area: Rect, cta: &CtaSettings, lang: Language) {
    let mut lines = vec![Line::raw("")];

    lines.push(Line::from(vec![
        Span::raw("  "),
        Span::styled(
            pick_localized(lang, &cta.title_vi, &cta.title_en).to_string(),
            Style::default()
                .fg(theme::ACCENT)
                .add_modifier(Modifier::BOLD),
        ),
    ]));
    lines.push(Line::from(vec![
        Span::raw("  "),
        Span::styled(
            pick_localized(lang, &cta.description_vi, &cta.description_en).to_string(),
            Style::default().fg(theme::TEXT_MUTED),
        ),
    ]));
    lines.push(Line::raw(""));
    lines.push(Line::from(vec![
        Span::raw("  "),
        Span::styled("🌐 ", Style::default()),
        Span::styled(
            pick_localized(lang, &cta.languages_text_vi, &cta.languages_text_en).to_string(),
            Style::default().fg(theme::TEXT),
        ),
    ]));

    frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }), area);
}

fn render_editor(frame: &mut Frame, area: Rect, editor: &SectionEditor, lang: Language) {
    let title = match editor.tab {
        PagesTab::Hero => pick_localized(lang, " Sửa Hero ", " Edit Hero "),
        PagesTab::Services => pick_localized(lang, " Sửa Dịch vụ ", " Edit Services "),
        PagesTab::Cta => pick_localized(lang, " Sửa CTA ", " Edit CTA "),
    };
    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme::ACCENT));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let mut constraints: Vec<Constraint> =
        editor.pairs.iter().map(|_| Constraint::Length(3)).collect();
    if editor.has_items() {
        constraints.push(Constraint::Min(5));
    }
    constraints.push(Constraint::Length(1)); // error
    constraints.push(Constraint::Length(1)); // footer
    let chunks = Layout::vertical(constraints).split(inner);

    for (i, pair) in editor.pairs.iter().enumerate() {
        let row =
            Layout::horizontal([Constraint::Percentage(50), Constraint::Percentage(50)])
                .split(chunks[i]);
        frame.render_widget(&pair.vi, row[0]);
        frame.render_widget(&pair.en, row[1]);
    }

    let mut next = editor.pairs.len();
    if editor.has_items() {
        render_items_panel(frame, chunks[next], editor, lang);
        next += 1;
    }

    if let Some(ref err) = editor.error {
        let error_line = Line::from(vec![
            Span::raw(" "),
            Span::styled(
                err.clone(),
                Style::default().fg(theme::ERROR).add_modifier(Modifier::BOLD),
            ),
        ]);
        frame.render_widget(Paragraph::new(error_line), chunks[next]);
    }
    next += 1;

    let footer = Line::from(vec![
        Span::raw(" "),
        Span::styled("Tab", Style::default().fg(theme::TEXT_MUTED)),
        Span::raw(":next  "),
        Span::styled("Ctrl+T", Style::default().fg(theme::TEXT_MUTED)),
        Span::raw(pick_localized(lang, ":dịch  ", ":translate  ")),
        Span::styled("Ctrl+S", Style::default().fg(theme::TEXT_MUTED)),
        Span::raw(pick_localized(lang, ":lưu  ", ":save  ")),
        Span::styled("Esc", Style::default().fg(theme::TEXT_MUTED)),
        Span::raw(pick_localized(lang, ":hủy", ":cancel")),
    ]);
    frame.render_widget(Paragraph::new(footer), chunks[next]);

    if editor.item_modal.is_some() {
        render_item_modal(frame, area, editor, lang);
    }
}

fn render_items_panel(frame: &mut Frame, area: Rect, editor: &SectionEditor, lang: Language) {
    let focused = editor.focus == EditorFocus::Items;
    let border = if focused {
        Style::default().fg(theme::PRIMARY)
    } else {
        Style::default().fg(theme::TEXT_MUTED)
    };
    let panel_title = match editor.tab {
        PagesTab::Hero => pick_localized(lang, "Mục nổi bật", "Features"),
        PagesTab::Services => pick_localized(lang, "Thẻ dịch vụ", "Cards"),
        PagesTab::Cta => "",
    };
    let block = Block::default()
        .title(format!(
            " {} ({}/{}) ",
            panel_title,
            editor.items.len(),
            editor.item_cap()
        ))
        .borders(Borders::ALL)
        .border_style(border);

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let mut lines = Vec::new();
    if editor.items.is_empty() {
        lines.push(Line::from(vec![
            Span::raw("  "),
            Span::styled(
                pick_localized(lang, "Chưa có mục nào.", "No entries yet."),
                Style::default().fg(theme::TEXT_DIM),
            ),
        ]));
    }
    for (i, item) in editor.items.iter().enumerate() {
        let is_selected = focused && i == editor.item_selected;
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
                format!("{:<12}", truncate(item.icon(), 12)),
                Style::default().fg(theme::TEXT_DIM),
            ),
            Span::styled(
                truncate(item.headline(), 48),
                if is_selected {
                    Style::default().add_modifier(Modifier::BOLD)
                } else {
                    Style::default()
                },
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

fn render_item_modal(frame: &mut Frame, area: Rect, editor: &SectionEditor, lang: Language) {
    let Some(ref modal) = editor.item_modal else {
        return;
    };

    let height = (modal.inputs.len() as u16) * 3 + 5;
    let modal_area = centered_fixed(58, height, area);
    let title = if modal.editing.is_some() {
        pick_localized(lang, " Sửa mục ", " Edit Entry ")
    } else {
        pick_localized(lang, " Thêm mục ", " Add Entry ")
    };
    let block = Block::default()
        .title(title)
        .title_alignment(Alignment::Center)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme::ACCENT));

    let mut lines = vec![Line::raw("")];
    for (i, (label, input)) in modal.labels.iter().zip(modal.inputs.iter()).enumerate() {
        push_text_field(&mut lines, label, input, i == modal.focused);
    }

    if let Some(ref err) = modal.error {
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

/// Label + value rows for one text field of the item modal.
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tab_cycle_roundtrip() {
        let mut tab = PagesTab::Hero;
        for _ in 0..3 {
            tab = tab.next();
        }
        assert_eq!(tab, PagesTab::Hero);
    }

    #[test]
    fn test_hero_editor_roundtrip() {
        let hero = HeroSettings::default();
        let editor = hero_editor(&hero, Language::Vi);
        let built = build_hero(&editor);

        assert_eq!(built.badge_vi, hero.badge_vi);
        assert_eq!(built.title_en, hero.title_en);
        assert_eq!(built.title_highlight_vi, hero.title_highlight_vi);
        assert_eq!(built.description_en, hero.description_en);
        assert_eq!(built.features.len(), hero.features.len());
    }

    #[test]
    fn test_cta_editor_roundtrip() {
        let cta = CtaSettings::default();
        let editor = cta_editor(&cta, Language::En);
        let built = build_cta(&editor);

        assert_eq!(built.title_vi, cta.title_vi);
        assert_eq!(built.languages_text_en, cta.languages_text_en);
    }

    #[test]
    fn test_focus_cycle_covers_fields_and_items() {
        let mut editor = services_editor(&ServicesSettings::default(), Language::Vi);
        assert_eq!(editor.focus, EditorFocus::Field { row: 0, en: false });

        // 2 pairs → 4 field stops, then items, then wrap
        for _ in 0..4 {
            editor.focus_next();
        }
        assert_eq!(editor.focus, EditorFocus::Items);
        editor.focus_next();
        assert_eq!(editor.focus, EditorFocus::Field { row: 0, en: false });

        editor.focus_prev();
        assert_eq!(editor.focus, EditorFocus::Items);
    }

    #[test]
    fn test_cta_focus_cycle_skips_items() {
        let mut editor = cta_editor(&CtaSettings::default(), Language::Vi);
        // 3 pairs → 6 field stops and no items stop
        for _ in 0..6 {
            editor.focus_next();
        }
        assert_eq!(editor.focus, EditorFocus::Field { row: 0, en: false });
    }

    #[test]
    fn test_submit_item_modal_appends_feature_with_fresh_id() {
        let mut editor = hero_editor(&HeroSettings::default(), Language::Vi);
        let before = editor.items.len();

        open_item_modal(&mut editor, None, Language::Vi);
        editor.item_modal.as_mut().unwrap().inputs[1].set_text("Báo giá nhanh");
        submit_item_modal(&mut editor, Language::Vi);

        assert_eq!(editor.items.len(), before + 1);
        match editor.items.last().unwrap() {
            EditorItem::Feature(f) => {
                assert!(!f.id.is_empty());
                assert_eq!(f.icon, "Sparkles");
                assert_eq!(f.text_vi, "Báo giá nhanh");
            }
            other => panic!("expected feature, got {other:?}"),
        }
    }

    #[test]
    fn test_submit_item_modal_keeps_card_id_on_edit() {
        let services = ServicesSettings::default();
        let mut editor = services_editor(&services, Language::Vi);
        let original_id = services.cards[0].id.clone();

        open_item_modal(&mut editor, Some(0), Language::Vi);
        editor.item_modal.as_mut().unwrap().inputs[1].set_text("Lịch tàu cập nhật");
        submit_item_modal(&mut editor, Language::Vi);

        match &editor.items[0] {
            EditorItem::Card(c) => {
                assert_eq!(c.id, original_id);
                assert_eq!(c.title_vi, "Lịch tàu cập nhật");
            }
            other => panic!("expected card, got {other:?}"),
        }
    }

    #[test]
    fn test_submit_item_modal_requires_vi_text() {
        let mut editor = hero_editor(&HeroSettings::default(), Language::Vi);
        let before = editor.items.len();

        open_item_modal(&mut editor, None, Language::Vi);
        submit_item_modal(&mut editor, Language::Vi);

        assert_eq!(editor.items.len(), before);
        assert!(editor
            .item_modal
            .as_ref()
            .and_then(|m| m.error.as_ref())
            .is_some());
    }

    #[test]
    fn test_apply_patch_fills_english_side() {
        let mut hero = HeroSettings::default();
        hero.features.truncate(1);
        let mut editor = hero_editor(&hero, Language::Vi);
        let feature_id = hero.features[0].id.clone();

        let mut fields = IndexMap::new();
        fields.insert("badge".to_string(), "Smart support".to_string());
        fields.insert(format!("text:{feature_id}"), "Instant replies".to_string());
        let patch = TranslatePatch {
            tab: PagesTab::Hero,
            fields,
        };
        editor.apply_patch(&patch);

        assert_eq!(editor.pair_text(0, true), "Smart support");
        match &editor.items[0] {
            EditorItem::Feature(f) => assert_eq!(f.text_en, "Instant replies"),
            other => panic!("expected feature, got {other:?}"),
        }
    }

    #[test]
    fn test_translate_requests_cover_pairs_and_items() {
        let editor = services_editor(&ServicesSettings::default(), Language::Vi);
        let requests = editor.translate_requests();
        let names: Vec<&str> = requests.iter().map(|(n, _)| n.as_str()).collect();

        assert!(names.contains(&"title"));
        assert!(names.contains(&"description"));
        // Each card contributes a title and a description request
        let card_count = ServicesSettings::default().cards.len();
        assert_eq!(names.len(), 2 + card_count * 2);
    }

    #[test]
    fn test_default_features_fill_the_cap() {
        let hero = HeroSettings::default();
        let editor = hero_editor(&hero, Language::Vi);
        assert_eq!(editor.items.len(), MAX_HERO_FEATURES);
        assert_eq!(editor.item_cap(), MAX_HERO_FEATURES);
        assert_eq!(
            services_editor(&ServicesSettings::default(), Language::Vi).item_cap(),
            MAX_SERVICE_CARDS
        );
    }
}
