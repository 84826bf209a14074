//! Logging and terminal output.
//!
//! Provides:
//! - JSON file logs with daily rotation and gzip of old files
//! - A TUI-safe initializer (no stdout layer while ratatui owns the terminal)
//! - Beautiful startup/shutdown error reporting (miette)
//! - Terminal capability detection for color and unicode fallbacks
//! - Shared syntect resources for the chat markdown renderer

use std::fs;
use std::io;
use std::path::PathBuf;
use std::sync::OnceLock;

use console::{style, Term};
use flate2::write::GzEncoder;
use flate2::Compression;
use miette::Diagnostic;
use supports_color::Stream;
use syntect::highlighting::ThemeSet;
use syntect::parsing::SyntaxSet;
use thiserror::Error;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

// ============================================================================
// Static Resources (Lazy Loaded)
// ============================================================================

static SYNTAX_SET: OnceLock<SyntaxSet> = OnceLock::new();
static THEME_SET: OnceLock<ThemeSet> = OnceLock::new();
static TERMINAL_CAPS: OnceLock<TerminalCapabilities> = OnceLock::new();

/// Syntax definitions shared with the chat markdown renderer.
pub fn get_syntax_set() -> &'static SyntaxSet {
    SYNTAX_SET.get_or_init(SyntaxSet::load_defaults_newlines)
}

/// Highlighting themes shared with the chat markdown renderer.
pub fn get_theme_set() -> &'static ThemeSet {
    THEME_SET.get_or_init(ThemeSet::load_defaults)
}

fn get_terminal_caps() -> &'static TerminalCapabilities {
    TERMINAL_CAPS.get_or_init(TerminalCapabilities::detect)
}

// ============================================================================
// Terminal Capability Detection
// ============================================================================

/// Terminal color support levels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorLevel {
    /// 24-bit TrueColor (16.7M colors)
    TrueColor,
    /// 256-color palette
    Ansi256,
    /// 16 ANSI colors
    Ansi16,
    /// No color support
    NoColor,
}

/// Detected terminal capabilities
#[derive(Debug, Clone)]
pub struct TerminalCapabilities {
    pub color_level: ColorLevel,
    pub supports_unicode: bool,
    pub is_interactive: bool,
    pub width: u16,
}

impl TerminalCapabilities {
    /// Detect terminal capabilities from environment
    pub fn detect() -> Self {
        use is_terminal::IsTerminal;

        let color_level = match supports_color::on(Stream::Stdout) {
            Some(support) if support.has_16m => ColorLevel::TrueColor,
            Some(support) if support.has_256 => ColorLevel::Ansi256,
            Some(support) if support.has_basic => ColorLevel::Ansi16,
            _ => ColorLevel::NoColor,
        };

        let is_interactive = io::stdout().is_terminal();
        let width = Term::stdout().size().1;

        // Unicode support heuristic
        let supports_unicode = std::env::var("TERM")
            .map(|t| !t.contains("dumb"))
            .unwrap_or(true)
            && std::env::var("LANG")
                .map(|l| l.contains("UTF-8") || l.contains("utf8"))
                .unwrap_or(true);

        Self {
            color_level,
            supports_unicode,
            is_interactive,
            width,
        }
    }

    /// Check if colors should be used
    pub fn should_colorize(&self) -> bool {
        self.is_interactive && self.color_level != ColorLevel::NoColor
    }
}

// ============================================================================
// Logging Initialization
// ============================================================================

/// Initialize the logging system for TUI mode.
///
/// Sets up a daily-rolling JSON file logger in the app data directory and
/// redirects standard `log` crate events to `tracing`. There is no stdout
/// layer — ratatui owns the terminal while the app runs.
///
/// Returns a `WorkerGuard` which must be kept alive for the duration of the
/// application to ensure buffered logs are flushed on shutdown.
pub fn init_tui() -> WorkerGuard {
    // Logs live in the data directory, not the source tree, so dev file
    // watchers never see them.
    let log_dir = dirs::data_dir()
        .map(|d| d.join("haidesk").join("logs"))
        .unwrap_or_else(|| PathBuf::from("logs"));

    if !log_dir.exists() {
        if let Err(e) = fs::create_dir_all(&log_dir) {
            eprintln!("Failed to create logs directory: {}", e);
        }
    }

    let file_appender = tracing_appender::rolling::daily(&log_dir, "haidesk.log");
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    // JSON format for easy parsing/ingestion
    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(non_blocking)
        .json()
        .with_file(true)
        .with_line_number(true)
        .with_thread_ids(true)
        .with_target(true)
        .with_filter(env_filter);

    tracing_subscriber::registry().with(file_layer).init();

    // Redirect standard `log` macros to `tracing`
    if let Err(e) = tracing_log::LogTracer::init() {
        eprintln!("Failed to initialize LogTracer: {}", e);
    }

    init_miette();

    // Compress old logs in the background (after init so log macros work)
    let log_dir_clone = log_dir.clone();
    std::thread::spawn(move || {
        compress_old_logs(log_dir_clone);
    });

    log::info!(
        "Logging initialized. Writing to: {:?} (daily rolling)",
        log_dir.join("haidesk.log")
    );

    guard
}

/// Compress old log files in the background
fn compress_old_logs(log_dir: PathBuf) {
    let now = chrono::Local::now();
    let today_suffix = now.format("%Y-%m-%d").to_string();

    if let Ok(entries) = fs::read_dir(&log_dir) {
        for entry in entries.flatten() {
            let path = entry.path();
            if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
                // Rolling format: prefix.YYYY-MM-DD. Compress anything that
                // is not today's log and not already compressed.
                let should_compress = name.starts_with("haidesk.log.")
                    && !name.ends_with(&today_suffix)
                    && !name.ends_with(".gz");

                if should_compress {
                    if let Err(e) = compress_file(&path) {
                        log::warn!("Failed to compress old log {:?}: {}", path, e);
                    } else {
                        log::info!("Compressed old log: {:?}", path);
                    }
                }
            }
        }
    }
}

fn compress_file(path: &std::path::Path) -> std::io::Result<()> {
    let file = fs::File::open(path)?;
    let mut reader = std::io::BufReader::new(file);

    let mut gz_path_name = path
        .file_name()
        .ok_or_else(|| std::io::Error::new(std::io::ErrorKind::Other, "No filename"))?
        .to_os_string();
    gz_path_name.push(".gz");
    let parent_dir = path
        .parent()
        .ok_or_else(|| std::io::Error::new(std::io::ErrorKind::Other, "No parent directory"))?;
    let gz_path = parent_dir.join(gz_path_name);

    // Skip if already exists
    if gz_path.exists() {
        return Ok(());
    }

    let output = fs::File::create(&gz_path)?;
    let mut encoder = GzEncoder::new(output, Compression::default());

    std::io::copy(&mut reader, &mut encoder)?;
    encoder.finish()?;

    fs::remove_file(path)?;

    Ok(())
}

/// Initialize miette for beautiful error reporting
fn init_miette() {
    let caps = get_terminal_caps();

    miette::set_hook(Box::new(move |_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(caps.color_level == ColorLevel::TrueColor)
                .unicode(caps.supports_unicode)
                .context_lines(3)
                .tab_width(4)
                .break_words(true)
                .color(caps.should_colorize())
                .build(),
        )
    }))
    .ok(); // Ignore if already set
}

// ============================================================================
// Diagnostic Error Types (miette integration)
// ============================================================================

/// Support store failed to open at startup.
#[derive(Debug, Error, Diagnostic)]
#[error("Failed to open the support store at {path}: {reason}")]
#[diagnostic(
    code("HAIDESK::STORE_OPEN"),
    help("Check directory permissions, or point [data].data_dir in config.toml at a writable location")
)]
pub struct StoreOpenError {
    pub path: String,
    pub reason: String,
}

impl StoreOpenError {
    pub fn new(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            reason: reason.into(),
        }
    }
}

/// Gateway endpoint configuration is unusable.
#[derive(Debug, Error, Diagnostic)]
#[error("Invalid gateway endpoint {url}: {reason}")]
#[diagnostic(
    code("HAIDESK::GATEWAY_CONFIG"),
    help("Set [gateway].base_url in config.toml (or HAIDESK_GATEWAY__BASE_URL) to a full http(s) URL")
)]
pub struct GatewayConfigError {
    pub url: String,
    pub reason: String,
}

impl GatewayConfigError {
    pub fn new(url: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            reason: reason.into(),
        }
    }
}

// ============================================================================
// Console Output Utilities
// ============================================================================

/// Print an error message (for use outside the TUI, e.g. fatal exits)
pub fn print_error(message: &str) {
    let caps = get_terminal_caps();
    let prefix = if caps.supports_unicode { "✗" } else { "[x]" };
    println!("{} {}", style(prefix).red(), style(message).red().bold());
}

/// Print an info message (for use outside the TUI)
pub fn print_info(message: &str) {
    let caps = get_terminal_caps();
    let prefix = if caps.supports_unicode { "ℹ" } else { "(i)" };
    println!("{} {}", style(prefix).blue(), style(message).blue());
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_terminal_caps_detection() {
        let caps = TerminalCapabilities::detect();
        // Just verify it doesn't panic
        assert!(caps.width > 0);
    }

    #[test]
    fn test_syntax_set_has_common_languages() {
        let ss = get_syntax_set();
        assert!(ss.find_syntax_by_extension("rs").is_some());
        assert!(ss.find_syntax_by_extension("json").is_some());
    }

    #[test]
    fn test_theme_set_has_default_theme() {
        let ts = get_theme_set();
        assert!(ts.themes.contains_key("base16-ocean.dark"));
    }

    #[test]
    fn test_store_open_error_display() {
        let err = StoreOpenError::new("/tmp/store", "permission denied");
        let msg = err.to_string();
        assert!(msg.contains("/tmp/store"));
        assert!(msg.contains("permission denied"));
    }

    #[test]
    fn test_gateway_config_error_display() {
        let err = GatewayConfigError::new("not a url", "relative URL without a base");
        assert!(err.to_string().contains("not a url"));
    }
}
