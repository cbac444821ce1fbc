//! Внешние коллабораторы ридера: источник кадров, железо подсветки,
//! поверхность превью и наблюдатель хоста.
//!
//! Ядро не делает I/O само — все вызовы железа идут через эти трейты.
//! Хост обязан маршалить асинхронные колбэки железа в один контекст
//! до вызова в ридер.

use crate::core::error::{ErrorKind, HardwareError, SetupError};
use crate::core::types::{IlluminationMode, NormalizedResult, VideoGravity};
use crate::filter::CodeTypeFilter;

/// Источник батчей детекций (камера + внешний детектор).
pub trait FrameSource {
    /// Непрозрачный хэндл живого превью; ядро его не разглядывает.
    type Preview;

    /// Найти устройство и подключить поток; детектору сообщается набор символик.
    fn configure(&mut self, symbologies: &CodeTypeFilter) -> Result<Self::Preview, SetupError>;

    fn start_delivery(&mut self);

    fn stop_delivery(&mut self);
}

/// Железо подсветки.
///
/// Мутация допустима только между `lock_for_configuration` и
/// `unlock_for_configuration`; см. [`crate::illumination::ConfigurationLock`].
pub trait IlluminationHardware {
    fn has_illumination(&self) -> bool;

    fn supports_mode(&self, mode: IlluminationMode) -> bool;

    fn lock_for_configuration(&mut self) -> Result<(), HardwareError>;

    fn apply_mode(&mut self, mode: IlluminationMode) -> Result<(), HardwareError>;

    fn unlock_for_configuration(&mut self);
}

/// Поверхность, на которой хост показывает превью и кнопку фонарика.
pub trait PresentationSurface {
    type Preview;

    fn attach_preview(&mut self, preview: Self::Preview, gravity: VideoGravity);

    fn set_illumination_control_visible(&mut self, visible: bool);

    fn hide_focus_indicator(&mut self);
}

/// Единственный канал результатов и ошибок к хосту.
///
/// Методы берут `&self`: из колбэка можно звать обратно в ридер (например, `stop()`).
pub trait HostObserver {
    fn on_result(&self, result: &NormalizedResult);

    fn on_error(&self, kind: ErrorKind, message: &str);
}

/// Железо без фонарика (фронтальная камера, эмулятор).
#[derive(Clone, Copy, Debug, Default)]
pub struct NoIllumination;

impl IlluminationHardware for NoIllumination {
    fn has_illumination(&self) -> bool {
        false
    }

    fn supports_mode(&self, _mode: IlluminationMode) -> bool {
        false
    }

    fn lock_for_configuration(&mut self) -> Result<(), HardwareError> {
        Err(HardwareError::new("no illumination hardware"))
    }

    fn apply_mode(&mut self, _mode: IlluminationMode) -> Result<(), HardwareError> {
        Err(HardwareError::new("no illumination hardware"))
    }

    fn unlock_for_configuration(&mut self) {}
}
