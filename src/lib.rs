/// HaiDesk - support desk console for the HaiAn shipping site
///
/// Core library providing the knowledge base, chatbot settings, chat
/// transcript storage, and the AI gateway client behind the support chat.

pub mod config;
pub mod core;
pub mod tui;

#[cfg(test)]
mod tests;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
