//! Общие типы модели данных и ошибки.

pub mod error;
pub mod types;
