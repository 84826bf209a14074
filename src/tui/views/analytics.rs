//! Chat analytics view — session totals, rating breakdown, daily volume.
//!
//! Read-only report over the transcript store: overview counters, a star
//! distribution with scaled bars, the zero-filled daily buckets for the last
//! thirty days, and the most recent sessions with their post-hoc ratings.

use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use tokio::sync::mpsc;

use super::super::theme;

use crate::core::i18n::{pick_localized, Language};
use crate::core::storage::{chat_analytics, list_sessions, ChatAnalytics, ChatSession};
use crate::tui::services::Services;

/// Window the daily buckets cover.
const ANALYTICS_WINDOW_DAYS: i64 = 30;

/// Recent sessions shown in the table.
const RECENT_SESSION_ROWS: usize = 15;

#[derive(Clone, Debug)]
struct AnalyticsData {
    analytics: ChatAnalytics,
    sessions: Vec<ChatSession>,
}

pub struct AnalyticsState {
    data: Option<AnalyticsData>,
    lines_cache: Vec<Line<'static>>,
    scroll: usize,
    loading: bool,
    data_rx: mpsc::UnboundedReceiver<AnalyticsData>,
    data_tx: mpsc::UnboundedSender<AnalyticsData>,
}

impl AnalyticsState {
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

    /// Trigger async data load from the store.
    pub fn load(&mut self, services: &Services) {
        if self.loading {
            return;
        }
        self.loading = true;

        let db = services.store.db().clone();
        let tx = self.data_tx.clone();

        tokio::spawn(async move {
            let analytics = match chat_analytics(&db, ANALYTICS_WINDOW_DAYS).await {
                Ok(analytics) => analytics,
                Err(e) => {
                    log::warn!("Failed to aggregate chat analytics: {e}");
                    empty_analytics()
                }
            };
            let sessions = match list_sessions(&db).await {
                Ok(sessions) => sessions,
                Err(e) => {
                    log::warn!("Failed to list chat sessions: {e}");
                    Vec::new()
                }
            };
            let _ = tx.send(AnalyticsData {
                analytics,
                sessions,
            });
        });
    }

    /// Poll for async data completion. Call from on_tick.
    pub fn poll(&mut self) {
        while let Ok(data) = self.data_rx.try_recv() {
            self.lines_cache = build_lines(&data);
            self.data = Some(data);
            self.loading = false;
        }
    }

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

        let max_scroll = self.lines_cache.len().saturating_sub(1);
        match (*modifiers, *code) {
            (KeyModifiers::NONE, KeyCode::Char('j') | KeyCode::Down) => {
                self.scroll = (self.scroll + 1).min(max_scroll);
                true
            }
            (KeyModifiers::NONE, KeyCode::Char('k') | KeyCode::Up) => {
                self.scroll = self.scroll.saturating_sub(1);
                true
            }
            (KeyModifiers::NONE, KeyCode::PageDown) => {
                self.scroll = (self.scroll + 10).min(max_scroll);
                true
            }
            (KeyModifiers::NONE, KeyCode::PageUp) => {
                self.scroll = self.scroll.saturating_sub(10);
                true
            }
            (KeyModifiers::NONE, KeyCode::Char('g')) => {
                self.scroll = 0;
                true
            }
            (KeyModifiers::SHIFT, KeyCode::Char('G')) => {
                self.scroll = max_scroll;
                true
            }
            (KeyModifiers::NONE, KeyCode::Char('r')) => {
                self.load(services);
                true
            }
            _ => false,
        }
    }

    pub fn render(&self, frame: &mut Frame, area: Rect, lang: Language) {
        let block = Block::default()
            .title(" Analytics ")
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
                        pick_localized(lang, "Đang tổng hợp dữ liệu...", "Aggregating data..."),
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

        let content = Paragraph::new(self.lines_cache.clone()).scroll((self.scroll as u16, 0));
        frame.render_widget(content, inner);
    }
}

fn empty_analytics() -> ChatAnalytics {
    ChatAnalytics {
        total_sessions: 0,
        total_messages: 0,
        average_rating: 0.0,
        average_messages_per_session: 0.0,
        rating_distribution: [0; 5],
        daily: Vec::new(),
    }
}

/// `★★★★☆` style display for a 1 to 5 rating.
fn stars(rating: u8) -> String {
    let filled = rating.min(5) as usize;
    format!("{}{}", "★".repeat(filled), "☆".repeat(5 - filled))
}

fn star_color(star: usize) -> Color {
    match star {
        4 | 5 => theme::SUCCESS,
        3 => theme::WARNING,
        _ => theme::ERROR,
    }
}

fn format_started(session: &ChatSession) -> String {
    session
        .started_at
        .map(|dt| dt.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| "—".to_string())
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

fn build_lines(data: &AnalyticsData) -> Vec<Line<'static>> {
    let analytics = &data.analytics;
    let mut lines = Vec::with_capacity(analytics.daily.len() + data.sessions.len() + 32);

    lines.push(Line::raw(""));

    // Overview
    lines.push(Line::from(Span::styled(
        "  TỔNG QUAN",
        Style::default()
            .fg(theme::ACCENT)
            .add_modifier(Modifier::BOLD),
    )));
    lines.push(Line::raw(""));
    push_stat(
        &mut lines,
        "Phiên chat:",
        analytics.total_sessions.to_string(),
    );
    push_stat(
        &mut lines,
        "Tin nhắn:",
        analytics.total_messages.to_string(),
    );
    push_stat(
        &mut lines,
        "TB tin/phiên:",
        format!("{:.1}", analytics.average_messages_per_session),
    );
    let rating_count: usize = analytics.rating_distribution.iter().sum();
    if rating_count > 0 {
        push_stat(
            &mut lines,
            "Đánh giá TB:",
            format!("{:.1} ★ ({rating_count})", analytics.average_rating),
        );
    } else {
        push_stat(&mut lines, "Đánh giá TB:", "chưa có".to_string());
    }

    // Rating distribution, five stars first
    lines.push(Line::raw(""));
    lines.push(Line::from(Span::styled(
        "  ĐÁNH GIÁ",
        Style::default()
            .fg(theme::ACCENT)
            .add_modifier(Modifier::BOLD),
    )));
    lines.push(Line::raw(""));

    let max_count = analytics
        .rating_distribution
        .iter()
        .copied()
        .max()
        .unwrap_or(0);
    for star in (1..=5usize).rev() {
        let count = analytics.rating_distribution[star - 1];
        let bar_width = 30usize;
        let filled = if max_count > 0 {
            (count as f64 / max_count as f64 * bar_width as f64).round() as usize
        } else {
            0
        };
        let empty = bar_width.saturating_sub(filled);

        lines.push(Line::from(vec![
            Span::raw("  "),
            Span::styled(
                format!("{star}★ "),
                Style::default().fg(theme::TEXT_MUTED),
            ),
            Span::styled("█".repeat(filled), Style::default().fg(star_color(star))),
            Span::styled("░".repeat(empty), Style::default().fg(theme::TEXT_DIM)),
            Span::styled(format!(" {count}"), Style::default().fg(theme::TEXT)),
        ]));
    }

    // Daily volume over the window
    lines.push(Line::raw(""));
    lines.push(Line::from(Span::styled(
        format!("  {} NGÀY QUA", ANALYTICS_WINDOW_DAYS),
        Style::default()
            .fg(theme::ACCENT)
            .add_modifier(Modifier::BOLD),
    )));
    lines.push(Line::raw(""));

    let max_messages = analytics
        .daily
        .iter()
        .map(|d| d.messages)
        .max()
        .unwrap_or(0);
    for day in &analytics.daily {
        let bar_width = 20usize;
        let filled = if max_messages > 0 {
            (day.messages as f64 / max_messages as f64 * bar_width as f64).round() as usize
        } else {
            0
        };
        let empty = bar_width.saturating_sub(filled);

        lines.push(Line::from(vec![
            Span::raw("  "),
            Span::styled(
                day.date.format("%m-%d").to_string(),
                Style::default().fg(theme::TEXT_MUTED),
            ),
            Span::raw("  "),
            Span::styled("█".repeat(filled), Style::default().fg(theme::PRIMARY_LIGHT)),
            Span::styled("░".repeat(empty), Style::default().fg(theme::TEXT_DIM)),
            Span::styled(
                format!(" {} tin / {} phiên", day.messages, day.sessions),
                Style::default().fg(theme::TEXT_MUTED),
            ),
        ]));
    }
    if analytics.daily.is_empty() {
        lines.push(Line::from(vec![
            Span::raw("  "),
            Span::styled(
                "Chưa có hoạt động nào.",
                Style::default().fg(theme::TEXT_DIM),
            ),
        ]));
    }

    // Recent sessions
    lines.push(Line::raw(""));
    lines.push(Line::from(Span::styled(
        "  PHIÊN GẦN ĐÂY",
        Style::default()
            .fg(theme::ACCENT)
            .add_modifier(Modifier::BOLD),
    )));
    lines.push(Line::raw(""));

    if data.sessions.is_empty() {
        lines.push(Line::from(vec![
            Span::raw("  "),
            Span::styled("Chưa có phiên nào.", Style::default().fg(theme::TEXT_DIM)),
        ]));
    } else {
        lines.push(Line::from(vec![
            Span::raw("  "),
            Span::styled(
                format!("{:<18} {:>6}  {:<7} {}", "Bắt đầu", "Tin", "Sao", "Góp ý"),
                Style::default()
                    .fg(theme::TEXT_DIM)
                    .add_modifier(Modifier::BOLD),
            ),
        ]));

        for session in data.sessions.iter().take(RECENT_SESSION_ROWS) {
            let rating_cell = session
                .rating
                .map(stars)
                .unwrap_or_else(|| "—".to_string());
            let feedback = session
                .feedback
                .as_deref()
                .map(|f| truncate(f, 28))
                .unwrap_or_default();

            lines.push(Line::from(vec![
                Span::raw("  "),
                Span::styled(
                    format!("{:<18}", format_started(session)),
                    Style::default().fg(theme::TEXT),
                ),
                Span::styled(
                    format!(" {:>6} ", session.message_count),
                    Style::default().fg(theme::TEXT_MUTED),
                ),
                Span::styled(
                    format!(" {:<7}", rating_cell),
                    Style::default().fg(theme::WARNING),
                ),
                Span::styled(format!(" {feedback}"), Style::default().fg(theme::TEXT_DIM)),
            ]));
        }
    }

    // Footer
    lines.push(Line::raw(""));
    lines.push(Line::from(vec![
        Span::raw("  "),
        Span::styled("j/k", Style::default().fg(theme::TEXT_MUTED)),
        Span::raw(":cuộn "),
        Span::styled("r", Style::default().fg(theme::TEXT_MUTED)),
        Span::raw(":tải lại"),
    ]));
    lines.push(Line::raw(""));

    lines
}

fn push_stat(lines: &mut Vec<Line<'static>>, label: &str, value: String) {
    lines.push(Line::from(vec![
        Span::raw("  "),
        Span::styled(
            format!("{label:<16}"),
            Style::default().fg(theme::TEXT_MUTED),
        ),
        Span::styled(value, Style::default().fg(theme::TEXT)),
    ]));
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    use crate::core::storage::DailyStats;

    fn sample_data() -> AnalyticsData {
        AnalyticsData {
            analytics: ChatAnalytics {
                total_sessions: 4,
                total_messages: 22,
                average_rating: 4.5,
                average_messages_per_session: 5.5,
                rating_distribution: [0, 0, 1, 0, 3],
                daily: vec![
                    DailyStats {
                        date: NaiveDate::from_ymd_opt(2026, 8, 24).unwrap(),
                        sessions: 1,
                        messages: 6,
                    },
                    DailyStats {
                        date: NaiveDate::from_ymd_opt(2026, 8, 25).unwrap(),
                        sessions: 3,
                        messages: 16,
                    },
                ],
            },
            sessions: vec![ChatSession {
                id: Some("s1".to_string()),
                started_at: None,
                ended_at: None,
                message_count: 6,
                rating: Some(5),
                feedback: Some("Rất hữu ích".to_string()),
                user_id: Some("console".to_string()),
                user_agent: None,
            }],
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
    fn test_stars_display() {
        assert_eq!(stars(5), "★★★★★");
        assert_eq!(stars(3), "★★★☆☆");
        assert_eq!(stars(0), "☆☆☆☆☆");
    }

    #[test]
    fn test_build_lines_overview_counts() {
        let text = rendered(&build_lines(&sample_data()));
        assert!(text.contains("Phiên chat:"));
        assert!(text.contains('4'));
        assert!(text.contains("22"));
        assert!(text.contains("4.5 ★ (4)"));
    }

    #[test]
    fn test_build_lines_rating_bars_scale_to_max() {
        let text = rendered(&build_lines(&sample_data()));
        // Three five-star ratings own the full bar; the single three-star
        // rating gets a third of it.
        let five_star_row = text
            .lines()
            .find(|l| l.trim_start().starts_with("5★"))
            .unwrap();
        assert!(five_star_row.contains(&"█".repeat(30)));
        let three_star_row = text
            .lines()
            .find(|l| l.trim_start().starts_with("3★"))
            .unwrap();
        assert!(three_star_row.contains(&"█".repeat(10)));
        assert!(!three_star_row.contains(&"█".repeat(11)));
    }

    #[test]
    fn test_build_lines_without_ratings() {
        let mut data = sample_data();
        data.analytics.rating_distribution = [0; 5];
        let text = rendered(&build_lines(&data));
        assert!(text.contains("chưa có"));
    }

    #[test]
    fn test_build_lines_daily_rows() {
        let text = rendered(&build_lines(&sample_data()));
        assert!(text.contains("08-24"));
        assert!(text.contains("6 tin / 1 phiên"));
        assert!(text.contains("16 tin / 3 phiên"));
    }

    #[test]
    fn test_build_lines_recent_sessions_capped() {
        let mut data = sample_data();
        data.sessions = (0..40)
            .map(|i| ChatSession {
                id: Some(format!("s{i}")),
                started_at: None,
                ended_at: None,
                message_count: i,
                rating: None,
                feedback: None,
                user_id: None,
                user_agent: None,
            })
            .collect();
        let text = rendered(&build_lines(&data));
        // 40 sessions but only the first 15 rendered; each unrated row shows
        // one dash in the start column and one in the star column.
        assert_eq!(text.matches('—').count(), 2 * RECENT_SESSION_ROWS);
        assert!(!text.contains("s0"));
    }

    #[test]
    fn test_session_row_shows_rating_and_feedback() {
        let text = rendered(&build_lines(&sample_data()));
        assert!(text.contains("★★★★★"));
        assert!(text.contains("Rất hữu ích"));
    }
}
