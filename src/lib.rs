#![forbid(unsafe_code)]
#![deny(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

//! Арбитраж результатов сканирования с живой камеры.
//!
//! Пиксели декодирует внешний детектор; здесь решается, какой из его
//! кандидатов принять, как его нормализовать и в какое состояние перевести
//! сессию (Armed / Locked / Stopped). Плюс управление подсветкой и пауза
//! по видимости.

// Публичные модули
pub mod config;      // ReaderConfig (serde/JSON)
pub mod core;        // типы модели данных и ошибки
pub mod device;      // трейты коллабораторов: камера, фонарик, поверхность, наблюдатель
pub mod filter;      // белый список символик
pub mod illumination; // валидация + scoped-мутация подсветки
pub mod logger;      // stderr-логгер для демо
pub mod normalize;   // таблица алиасов (EAN-13 → UPC-E)
pub mod prelude;     // удобные re-export'ы
pub mod reader;      // фасад BarcodeReader
pub mod session;     // машина состояний

pub use crate::config::{ConfigError, ReaderConfig};
pub use crate::core::error::{ErrorKind, HardwareError, IlluminationError, ReaderError, SetupError};
pub use crate::core::types::{
    Detection, IlluminationMode, NormalizedResult, ScanMode, SessionState, Symbology, VideoGravity,
};
pub use crate::reader::BarcodeReader;
