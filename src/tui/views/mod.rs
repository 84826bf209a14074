pub mod analytics;
pub mod chat;
pub mod chatbot;
pub mod documents;
pub mod knowledge;
pub mod pages;
pub mod settings;
