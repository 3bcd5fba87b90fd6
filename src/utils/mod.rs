// 工具模块

pub mod error;

pub mod i18n;

pub mod language;

pub mod logging;

pub use error::{AppError, AppResult};
pub use language::Language;
pub use logging::init_logging;
