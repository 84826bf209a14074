pub mod assistant;
pub mod gateway;
pub mod i18n;
pub mod knowledge;
pub mod logging;
pub mod merge;
pub mod storage;
pub mod validate;
