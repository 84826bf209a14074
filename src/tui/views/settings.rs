//! Settings view — gateway endpoints, console config, and store status.
//!
//! Read-only scrollable view. The config snapshot is captured synchronously;
//! collection counts load asynchronously from the store. Press `r` to refresh.

use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use tokio::sync::mpsc;

use super::super::theme;

use crate::core::storage::{count_knowledge_items, list_documents};
use crate::tui::services::Services;

// ── Display types ────────────────────────────────────────────────────────────

#[derive(Clone, Debug)]
struct SettingsData {
    // Gateway
    base_url: String,
    chat_url: String,
    translate_url: String,
    request_timeout_secs: u64,
    token_configured: bool,
    // Console
    language_label: String,
    operator: String,
    tick_rate_ms: u64,
    mouse_enabled: bool,
    config_file: String,
    // Store
    data_dir: String,
    store_dir: String,
    knowledge_items: usize,
    documents: usize,
}

// ── State ────────────────────────────────────────────────────────────────────

pub struct SettingsState {
    data: Option<SettingsData>,
    lines_cache: Vec<Line<'static>>,
    scroll: usize,
    loading: bool,
    data_rx: mpsc::UnboundedReceiver<SettingsData>,
    data_tx: mpsc::UnboundedSender<SettingsData>,
}

impl SettingsState {
    pub fn new() -> Self {
        let (data_tx, data_rx) = mpsc::unbounded_channel();
        Self {
            data: None,
            lines_cache: Vec::new(),
            scroll: 0,
            loading: false,
            data_rx,
            data_tx,
        }
    }

    /// Trigger async data load. The config snapshot is taken here; only the
    /// collection counts go through the store.
    pub fn load(&mut self, services: &Services) {
        if self.loading {
            return;
        }
        self.loading = true;

        let db = services.store.db().clone();
        let tx = self.data_tx.clone();

        let config = &services.config;
        let gateway = &config.gateway;
        let chat_url = gateway
            .chat_url()
            .map(|u| u.to_string())
            .unwrap_or_else(|_| gateway.chat_path.clone());
        let translate_url = gateway
            .translate_url()
            .map(|u| u.to_string())
            .unwrap_or_else(|_| gateway.translate_path.clone());

        let lang = services.language;
        let data_dir = config.data_dir();
        let mut snapshot = SettingsData {
            base_url: gateway.base_url.clone(),
            chat_url,
            translate_url,
            request_timeout_secs: gateway.request_timeout_secs,
            token_configured: gateway.api_token.is_some(),
            language_label: format!("{} {} ({})", lang.flag(), lang.native_name(), lang.code()),
            operator: services.operator.clone(),
            tick_rate_ms: config.tui.tick_rate_ms,
            mouse_enabled: config.tui.mouse_enabled,
            config_file: dirs::config_dir()
                .map(|d| d.join("haidesk/config.toml").display().to_string())
                .unwrap_or_else(|| "config.toml".to_string()),
            data_dir: data_dir.display().to_string(),
            store_dir: data_dir.join("store").display().to_string(),
            knowledge_items: 0,
            documents: 0,
        };

        tokio::spawn(async move {
            snapshot.knowledge_items = match count_knowledge_items(&db).await {
                Ok(n) => n,
                Err(e) => {
                    log::warn!("Failed to count knowledge items: {e}");
                    0
                }
            };
            snapshot.documents = match list_documents(&db).await {
                Ok(docs) => docs.len(),
                Err(e) => {
                    log::warn!("Failed to list documents: {e}");
                    0
                }
            };
            let _ = tx.send(snapshot);
        });
    }

    /// Poll for async data completion. Call from on_tick.
    pub fn poll(&mut self) {
        if let Ok(data) = self.data_rx.try_recv() {
            self.lines_cache = build_lines(&data);
            self.data = Some(data);
            self.loading = false;
        }
    }

    // ── Input ────────────────────────────────────────────────────────────

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

        match (*modifiers, *code) {
            (KeyModifiers::NONE, KeyCode::Char('j') | KeyCode::Down) => {
                self.scroll_down(1);
                true
            }
            (KeyModifiers::NONE, KeyCode::Char('k') | KeyCode::Up) => {
                self.scroll_up(1);
                true
            }
            (KeyModifiers::SHIFT, KeyCode::Char('G')) => {
                self.scroll = self.lines_cache.len().saturating_sub(1);
                true
            }
            (KeyModifiers::NONE, KeyCode::Char('g')) => {
                self.scroll = 0;
                true
            }
            (KeyModifiers::NONE, KeyCode::PageDown) => {
                self.scroll_down(15);
                true
            }
            (KeyModifiers::NONE, KeyCode::PageUp) => {
                self.scroll_up(15);
                true
            }
            (KeyModifiers::NONE, KeyCode::Char('r')) => {
                self.load(services);
                true
            }
            _ => false,
        }
    }

    fn scroll_down(&mut self, n: usize) {
        self.scroll = self
            .scroll
            .saturating_add(n)
            .min(self.lines_cache.len().saturating_sub(1));
    }

    fn scroll_up(&mut self, n: usize) {
        self.scroll = self.scroll.saturating_sub(n);
    }

    // ── Rendering ────────────────────────────────────────────────────────

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default()
            .title(" Settings ")
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
                        "Đang đọc cấu hình...",
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
                        "Chưa có dữ liệu. Nhấn r để tải lại.",
                        Style::default().fg(theme::TEXT_MUTED),
                    ),
                ]),
            ]);
            frame.render_widget(empty, inner);
            return;
        }

        let content = Paragraph::new(self.lines_cache.clone()).scroll((self.scroll as u16, 0));
        frame.render_widget(content, inner);
    }
}

// ── Line builders ────────────────────────────────────────────────────────────

fn build_lines(data: &SettingsData) -> Vec<Line<'static>> {
    let mut lines = Vec::with_capacity(40);

    // ── Gateway ──
    lines.extend(section_header("Cổng AI"));
    lines.push(kv_row("Máy chủ", &data.base_url));
    lines.push(kv_row("Endpoint chat", &data.chat_url));
    lines.push(kv_row("Endpoint dịch", &data.translate_url));
    lines.push(kv_row(
        "Timeout",
        &format!("{}s", data.request_timeout_secs),
    ));
    // The token itself never renders, only whether one is configured.
    lines.push(kv_row(
        "API token",
        if data.token_configured {
            "•••• (đã cấu hình)"
        } else {
            "chưa cấu hình"
        },
    ));

    // ── Console ──
    lines.extend(section_header("Bảng điều khiển"));
    lines.push(kv_row("Ngôn ngữ", &data.language_label));
    lines.push(kv_row("Người vận hành", &data.operator));
    lines.push(kv_row("Tick", &format!("{}ms", data.tick_rate_ms)));
    lines.push(kv_row(
        "Chuột",
        if data.mouse_enabled { "bật" } else { "tắt" },
    ));
    lines.push(kv_row("File cấu hình", &data.config_file));

    // ── Store ──
    lines.extend(section_header("Lưu trữ"));
    lines.push(kv_row("Thư mục dữ liệu", &data.data_dir));
    lines.push(kv_row("CSDL nhúng", &data.store_dir));
    lines.push(kv_row(
        "Mục hỏi đáp",
        &format!("{} mục", data.knowledge_items),
    ));
    lines.push(kv_row(
        "Tài liệu",
        &format!("{} tài liệu", data.documents),
    ));

    // ── Footer ──
    lines.push(Line::raw(""));
    lines.push(Line::from(vec![
        Span::raw("  "),
        Span::styled("j/k", Style::default().fg(theme::TEXT_MUTED)),
        Span::raw(":cuộn "),
        Span::styled("G/g", Style::default().fg(theme::TEXT_MUTED)),
        Span::raw(":cuối/đầu "),
        Span::styled("r", Style::default().fg(theme::TEXT_MUTED)),
        Span::raw(":tải lại"),
    ]));
    lines.push(Line::raw(""));

    lines
}

fn section_header(title: &str) -> Vec<Line<'static>> {
    vec![
        Line::raw(""),
        Line::from(Span::styled(
            format!("  {title}"),
            Style::default()
                .fg(theme::ACCENT)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            format!("  {}", "─".repeat(50)),
            Style::default().fg(theme::TEXT_DIM),
        )),
    ]
}

fn kv_row(key: &str, value: &str) -> Line<'static> {
    Line::from(vec![
        Span::raw("  "),
        Span::styled(
            format!("{:<18}", key),
            Style::default().fg(theme::TEXT_MUTED),
        ),
        Span::styled(value.to_string(), Style::default().fg(theme::TEXT)),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_data() -> SettingsData {
        SettingsData {
            base_url: "http://localhost:8787".to_string(),
            chat_url: "http://localhost:8787/chat".to_string(),
            translate_url: "http://localhost:8787/translate".to_string(),
            request_timeout_secs: 300,
            token_configured: false,
            language_label: "🇻🇳 Tiếng Việt (vi)".to_string(),
            operator: "console".to_string(),
            tick_rate_ms: 100,
            mouse_enabled: false,
            config_file: "/home/op/.config/haidesk/config.toml".to_string(),
            data_dir: "/home/op/.local/share/haidesk".to_string(),
            store_dir: "/home/op/.local/share/haidesk/store".to_string(),
            knowledge_items: 12,
            documents: 3,
        }
    }

    fn rendered(lines: &[Line<'_>]) -> String {
        lines
            .iter()
            .map(|l| {
                l.spans
                    .iter()
                    .map(|s| s.content.as_ref())
                    .collect::<String>()
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn test_settings_state_new() {
        let state = SettingsState::new();
        assert!(state.data.is_none());
        assert!(state.lines_cache.is_empty());
        assert_eq!(state.scroll, 0);
        assert!(!state.loading);
    }

    #[test]
    fn test_build_lines_sections_and_values() {
        let text = rendered(&build_lines(&sample_data()));
        assert!(text.contains("Cổng AI"));
        assert!(text.contains("Bảng điều khiển"));
        assert!(text.contains("Lưu trữ"));
        assert!(text.contains("http://localhost:8787/chat"));
        assert!(text.contains("Tiếng Việt"));
        assert!(text.contains("12 mục"));
        assert!(text.contains("3 tài liệu"));
    }

    #[test]
    fn test_token_is_masked() {
        let mut data = sample_data();
        assert!(rendered(&build_lines(&data)).contains("chưa cấu hình"));

        data.token_configured = true;
        let text = rendered(&build_lines(&data));
        assert!(text.contains("••••"));
        assert!(!text.contains("chưa cấu hình"));
    }

    #[test]
    fn test_scroll_bounds() {
        let mut state = SettingsState::new();
        // Empty lines — scroll should stay at 0
        state.scroll_down(10);
        assert_eq!(state.scroll, 0);
        state.scroll_up(10);
        assert_eq!(state.scroll, 0);

        // Simulate some cached lines
        state.lines_cache = vec![Line::raw(""); 30];
        state.scroll_down(5);
        assert_eq!(state.scroll, 5);
        state.scroll_down(100);
        assert_eq!(state.scroll, 29); // clamped to len-1
        state.scroll_up(100);
        assert_eq!(state.scroll, 0);
    }

    #[test]
    fn test_section_header() {
        let lines = section_header("Thử nghiệm");
        assert_eq!(lines.len(), 3);
    }

    #[test]
    fn test_kv_row() {
        let line = kv_row("Khóa", "Giá trị");
        let text: String = line.spans.iter().map(|s| s.content.to_string()).collect();
        assert!(text.contains("Khóa"));
        assert!(text.contains("Giá trị"));
    }
}
