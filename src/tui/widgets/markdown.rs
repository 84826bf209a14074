//! Markdown → ratatui Lines renderer.
//!
//! Converts markdown text to `Vec<Line<'static>>` for the chat thread and
//! the document preview pane. Reuses syntect resources from `core::logging`
//! to avoid double-loading.

use pulldown_cmark::{CodeBlockKind, Event, Parser, Tag, TagEnd};
use ratatui::{
    style::{Color, Modifier, Style},
    text::{Line, Span},
};

use crate::tui::theme;
use syntect::easy::HighlightLines;
use syntect::util::LinesWithEndings;

use crate::core::logging::{get_syntax_set, get_theme_set};

/// Background for highlighted code blocks (base16-ocean surface).
const CODE_BG: Color = Color::Rgb(43, 48, 59);

/// Convert markdown text to ratatui Lines with syntax highlighting.
pub fn markdown_to_lines(md: &str) -> Vec<Line<'static>> {
    let parser = Parser::new(md);
    let mut lines: Vec<Line<'static>> = Vec::new();

    // Current line being built
    let mut spans: Vec<Span<'static>> = Vec::new();
    // Style stack for nested formatting
    let mut style_stack: Vec<Style> = vec![Style::default()];

    let mut in_code_block = false;
    let mut code_lang = String::new();
    let mut code_buffer = String::new();
    let mut list_depth: usize = 0;
    let mut quote_depth: usize = 0;
    let mut in_heading = false;

    for event in parser {
        match event {
            // ── Headings ─────────────────────────────────────────
            Event::Start(Tag::Heading { level, .. }) => {
                flush_line(&mut spans, &mut lines, quote_depth);
                let style = match level {
                    pulldown_cmark::HeadingLevel::H1 => theme::title(),
                    pulldown_cmark::HeadingLevel::H2 => theme::heading(),
                    pulldown_cmark::HeadingLevel::H3 => Style::default().fg(theme::SUCCESS),
                    _ => Style::default().fg(theme::TEXT).add_modifier(Modifier::BOLD),
                };
                style_stack.push(style);
                in_heading = true;
            }
            Event::End(TagEnd::Heading(_)) => {
                style_stack.pop();
                flush_line(&mut spans, &mut lines, quote_depth);
                in_heading = false;
            }

            // ── Bold / Italic ────────────────────────────────────
            Event::Start(Tag::Strong) => {
                let base = current_style(&style_stack);
                style_stack.push(base.add_modifier(Modifier::BOLD));
            }
            Event::End(TagEnd::Strong) => {
                style_stack.pop();
            }
            Event::Start(Tag::Emphasis) => {
                let base = current_style(&style_stack);
                style_stack.push(base.add_modifier(Modifier::ITALIC));
            }
            Event::End(TagEnd::Emphasis) => {
                style_stack.pop();
            }

            // ── Inline code ──────────────────────────────────────
            Event::Code(code) => {
                spans.push(Span::styled(
                    format!(" {} ", code),
                    Style::default().fg(theme::TEXT).bg(theme::BG_SURFACE),
                ));
            }

            // ── Fenced code blocks ───────────────────────────────
            Event::Start(Tag::CodeBlock(kind)) => {
                flush_line(&mut spans, &mut lines, quote_depth);
                in_code_block = true;
                code_lang = match kind {
                    CodeBlockKind::Fenced(lang) => lang.to_string(),
                    CodeBlockKind::Indented => String::new(),
                };
                code_buffer.clear();
            }
            Event::End(TagEnd::CodeBlock) => {
                if !code_buffer.is_empty() {
                    render_code_block(&code_buffer, &code_lang, &mut lines);
                }
                in_code_block = false;
            }

            // ── Lists ────────────────────────────────────────────
            Event::Start(Tag::List(_)) => {
                list_depth += 1;
            }
            Event::End(TagEnd::List(_)) => {
                list_depth = list_depth.saturating_sub(1);
                if list_depth == 0 {
                    // Blank line after top-level list
                    lines.push(Line::raw(""));
                }
            }
            Event::Start(Tag::Item) => {
                flush_line(&mut spans, &mut lines, quote_depth);
                let indent = "  ".repeat(list_depth.saturating_sub(1));
                spans.push(Span::styled(
                    format!("{indent}• "),
                    Style::default().fg(theme::PRIMARY_LIGHT),
                ));
            }
            Event::End(TagEnd::Item) => {
                flush_line(&mut spans, &mut lines, quote_depth);
            }

            // ── Links ────────────────────────────────────────────
            Event::Start(Tag::Link { .. }) => {
                let style = Style::default()
                    .fg(theme::INFO)
                    .add_modifier(Modifier::UNDERLINED);
                style_stack.push(style);
            }
            Event::End(TagEnd::Link) => {
                style_stack.pop();
            }

            // ── Paragraphs ───────────────────────────────────────
            Event::Start(Tag::Paragraph) => {}
            Event::End(TagEnd::Paragraph) => {
                flush_line(&mut spans, &mut lines, quote_depth);
                if !in_heading && quote_depth == 0 {
                    lines.push(Line::raw(""));
                }
            }

            // ── Text content ─────────────────────────────────────
            Event::Text(text) => {
                if in_code_block {
                    code_buffer.push_str(&text);
                } else {
                    let style = current_style(&style_stack);
                    spans.push(Span::styled(text.to_string(), style));
                }
            }

            // ── Breaks ───────────────────────────────────────────
            Event::SoftBreak => {
                if !in_code_block {
                    spans.push(Span::raw(" "));
                }
            }
            Event::HardBreak => {
                flush_line(&mut spans, &mut lines, quote_depth);
            }

            // ── Horizontal rule ──────────────────────────────────
            Event::Rule => {
                flush_line(&mut spans, &mut lines, quote_depth);
                lines.push(Line::styled(
                    "─".repeat(40),
                    Style::default().fg(theme::TEXT_DIM),
                ));
                lines.push(Line::raw(""));
            }

            // ── Block quote ──────────────────────────────────────
            Event::Start(Tag::BlockQuote) => {
                flush_line(&mut spans, &mut lines, quote_depth);
                quote_depth += 1;
                let base = current_style(&style_stack);
                style_stack.push(base.fg(theme::TEXT_MUTED).add_modifier(Modifier::ITALIC));
            }
            Event::End(TagEnd::BlockQuote) => {
                flush_line(&mut spans, &mut lines, quote_depth);
                quote_depth = quote_depth.saturating_sub(1);
                style_stack.pop();
            }

            _ => {}
        }
    }

    // Flush any remaining spans
    flush_line(&mut spans, &mut lines, quote_depth);

    // Trim trailing empty lines
    while lines.last().is_some_and(|l| l.spans.is_empty() || l.to_string().is_empty()) {
        lines.pop();
    }

    lines
}

fn current_style(stack: &[Style]) -> Style {
    stack.last().copied().unwrap_or_default()
}

/// Complete the line under construction, prefixing one quote bar per
/// nesting level so multi-line quotes keep their gutter.
fn flush_line(spans: &mut Vec<Span<'static>>, lines: &mut Vec<Line<'static>>, quote_depth: usize) {
    if spans.is_empty() {
        return;
    }
    let mut full: Vec<Span<'static>> = Vec::with_capacity(spans.len() + quote_depth);
    for _ in 0..quote_depth {
        full.push(Span::styled("│ ", Style::default().fg(theme::TEXT_DIM)));
    }
    full.append(spans);
    lines.push(Line::from(full));
}

/// Render a code block with syntect highlighting.
fn render_code_block(code: &str, lang: &str, lines: &mut Vec<Line<'static>>) {
    let ss = get_syntax_set();
    let ts = get_theme_set();

    let syntax = if lang.is_empty() {
        ss.find_syntax_plain_text()
    } else {
        ss.find_syntax_by_token(lang)
            .unwrap_or_else(|| ss.find_syntax_plain_text())
    };

    let theme = &ts.themes["base16-ocean.dark"];
    let mut highlighter = HighlightLines::new(syntax, theme);

    for line_str in LinesWithEndings::from(code) {
        match highlighter.highlight_line(line_str, ss) {
            Ok(ranges) => {
                let spans: Vec<Span<'static>> = ranges
                    .into_iter()
                    .map(|(style, text)| {
                        let fg = style.foreground;
                        Span::styled(
                            text.trim_end_matches('\n').to_string(),
                            Style::default().fg(Color::Rgb(fg.r, fg.g, fg.b)).bg(CODE_BG),
                        )
                    })
                    .collect();
                lines.push(Line::from(spans));
            }
            Err(_) => {
                lines.push(Line::styled(
                    line_str.trim_end_matches('\n').to_string(),
                    Style::default().fg(theme::TEXT).bg(CODE_BG),
                ));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_text() {
        let lines = markdown_to_lines("Xin chào quý khách");
        assert_eq!(lines.len(), 1);
        assert!(lines[0].to_string().contains("Xin chào quý khách"));
    }

    #[test]
    fn test_bold_text() {
        let lines = markdown_to_lines("**giờ làm việc**");
        assert!(!lines.is_empty());
        assert!(lines[0]
            .spans
            .iter()
            .any(|s| s.style.add_modifier.contains(Modifier::BOLD)));
    }

    #[test]
    fn test_italic_text() {
        let lines = markdown_to_lines("*lưu ý*");
        assert!(!lines.is_empty());
        assert!(lines[0]
            .spans
            .iter()
            .any(|s| s.style.add_modifier.contains(Modifier::ITALIC)));
    }

    #[test]
    fn test_headings() {
        let lines = markdown_to_lines("# Bảng giá\n## Nội địa\n### Ghi chú");
        assert!(lines.len() >= 3);
        assert!(lines[0]
            .spans
            .iter()
            .any(|s| s.style.fg == Some(theme::ACCENT)));
        assert!(lines[1]
            .spans
            .iter()
            .any(|s| s.style.fg == Some(theme::PRIMARY_LIGHT)));
        assert!(lines[2]
            .spans
            .iter()
            .any(|s| s.style.fg == Some(theme::SUCCESS)));
    }

    #[test]
    fn test_inline_code() {
        let lines = markdown_to_lines("Mã vận đơn dạng `HD-123456`");
        assert!(!lines.is_empty());
        assert!(lines[0]
            .spans
            .iter()
            .any(|s| s.style.bg == Some(theme::BG_SURFACE)));
    }

    #[test]
    fn test_code_block() {
        let md = "```json\n{\"status\": \"delivered\"}\n```";
        let lines = markdown_to_lines(md);
        assert!(!lines.is_empty());
        assert!(lines
            .iter()
            .any(|l| l.spans.iter().any(|s| s.style.bg == Some(CODE_BG))));
    }

    #[test]
    fn test_list() {
        let md = "- chuyển phát nhanh\n- hàng nguyên container\n- khai báo hải quan";
        let lines = markdown_to_lines(md);
        assert!(lines.len() >= 3);
        let text: String = lines
            .iter()
            .map(|l| l.to_string())
            .collect::<Vec<_>>()
            .join("\n");
        assert!(text.contains("•"));
    }

    #[test]
    fn test_block_quote_gutter_on_every_line() {
        let md = "> dòng một\n>\n> dòng hai";
        let lines = markdown_to_lines(md);
        let quoted: Vec<String> = lines
            .iter()
            .map(|l| l.to_string())
            .filter(|s| !s.trim().is_empty())
            .collect();
        assert!(quoted.len() >= 2);
        for line in quoted {
            assert!(line.starts_with("│ "), "missing gutter on {line:?}");
        }
    }

    #[test]
    fn test_empty_input() {
        let lines = markdown_to_lines("");
        assert!(lines.is_empty());
    }
}
