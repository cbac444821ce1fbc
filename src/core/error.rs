// src/core/error.rs
//
// Ошибки ридера. Setup — фатальна до пересоздания ридера,
// ошибки подсветки — восстановимые и на сканирование не влияют.

use std::fmt;

use crate::core::types::IlluminationMode;

/// Не удалось сконфигурировать источник кадров.
#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
pub enum SetupError {
    #[error("no capture device: {0}")]
    NoCaptureDevice(String),
    #[error("cannot attach video input: {0}")]
    InputUnavailable(String),
    /// Конфиг не прошёл [`ReaderConfig::validate`](crate::config::ReaderConfig::validate).
    #[error("invalid reader config: {0}")]
    InvalidConfig(String),
}

/// Сбой железа внутри окна конфигурации.
#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
#[error("{message}")]
pub struct HardwareError {
    pub message: String,
}

impl HardwareError {
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Отказ при смене режима подсветки.
#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
pub enum IlluminationError {
    #[error("the capture device has no illumination hardware")]
    NoIlluminationHardware,
    #[error("the device does not support illumination mode `{0}`")]
    UnsupportedIlluminationMode(IlluminationMode),
    #[error("failed to apply illumination mode `{mode}`")]
    HardwareConfiguration {
        mode: IlluminationMode,
        #[source]
        source: HardwareError,
    },
    #[error("another illumination change is in progress")]
    Busy,
}

/// Всё, что может уйти хосту через `HostObserver::on_error`.
#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
pub enum ReaderError {
    #[error(transparent)]
    Setup(#[from] SetupError),
    #[error(transparent)]
    Illumination(#[from] IlluminationError),
}

/// Плоская классификация ошибок для хоста.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum ErrorKind {
    SetupFailure,
    NoIlluminationHardware,
    UnsupportedIlluminationMode,
    HardwareConfigurationError,
    IlluminationBusy,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

impl IlluminationError {
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            IlluminationError::NoIlluminationHardware => ErrorKind::NoIlluminationHardware,
            IlluminationError::UnsupportedIlluminationMode(_) => ErrorKind::UnsupportedIlluminationMode,
            IlluminationError::HardwareConfiguration { .. } => ErrorKind::HardwareConfigurationError,
            IlluminationError::Busy => ErrorKind::IlluminationBusy,
        }
    }
}

impl ReaderError {
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            ReaderError::Setup(_) => ErrorKind::SetupFailure,
            ReaderError::Illumination(e) => e.kind(),
        }
    }

    /// Сообщение для хоста: включает причину из цепочки `source`, если она есть.
    #[must_use]
    pub fn message(&self) -> String {
        use std::error::Error as _;
        let mut msg = self.to_string();
        let mut cause = self.source();
        while let Some(c) = cause {
            msg.push_str(": ");
            msg.push_str(&c.to_string());
            cause = c.source();
        }
        msg
    }
}
