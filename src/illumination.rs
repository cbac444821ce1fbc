//! Управление подсветкой.
//!
//! Два шага: чистая валидация (есть ли фонарик, поддержан ли режим) и
//! мутация внутри scoped-окна конфигурации. Окно закрывается в `Drop`,
//! так что unlock происходит на любом выходе, включая ошибку посередине.
//! Кэша «уже в этом режиме» нет — каждый вызов проверяет и захватывает заново.

use log::{debug, warn};

use crate::core::error::{HardwareError, IlluminationError};
use crate::core::types::IlluminationMode;
use crate::device::IlluminationHardware;

/// Чистая проверка предусловий, по порядку: железо есть, режим поддержан.
///
/// # Errors
///
/// [`IlluminationError::NoIlluminationHardware`] или
/// [`IlluminationError::UnsupportedIlluminationMode`], первая сработавшая проверка.
pub fn validate(
    has_illumination: bool,
    mode_supported: bool,
    mode: IlluminationMode,
) -> Result<(), IlluminationError> {
    if !has_illumination {
        return Err(IlluminationError::NoIlluminationHardware);
    }
    if !mode_supported {
        return Err(IlluminationError::UnsupportedIlluminationMode(mode));
    }
    Ok(())
}

/// Эксклюзивное окно конфигурации железа. Пока живёт — железо залочено.
pub struct ConfigurationLock<'a, H: IlluminationHardware + ?Sized> {
    hw: &'a mut H,
}

impl<'a, H: IlluminationHardware + ?Sized> ConfigurationLock<'a, H> {
    /// Захватить окно. При ошибке захвата unlock не вызывается.
    ///
    /// # Errors
    ///
    /// Ошибка `lock_for_configuration` как есть.
    pub fn acquire(hw: &'a mut H) -> Result<Self, HardwareError> {
        hw.lock_for_configuration()?;
        Ok(Self { hw })
    }

    /// # Errors
    ///
    /// Ошибка железа при применении режима.
    pub fn apply_mode(&mut self, mode: IlluminationMode) -> Result<(), HardwareError> {
        self.hw.apply_mode(mode)
    }
}

impl<H: IlluminationHardware + ?Sized> Drop for ConfigurationLock<'_, H> {
    fn drop(&mut self) {
        self.hw.unlock_for_configuration();
    }
}

pub struct IlluminationController<H> {
    hw: H,
    applied: IlluminationMode,
}

impl<H: IlluminationHardware> IlluminationController<H> {
    #[must_use]
    pub fn new(hw: H) -> Self {
        Self {
            hw,
            applied: IlluminationMode::Off,
        }
    }

    /// Последний успешно применённый режим.
    #[inline]
    #[must_use]
    pub fn applied_mode(&self) -> IlluminationMode {
        self.applied
    }

    #[inline]
    #[must_use]
    pub fn hardware(&self) -> &H {
        &self.hw
    }

    #[inline]
    #[must_use]
    pub fn hardware_mut(&mut self) -> &mut H {
        &mut self.hw
    }

    /// Проверить и применить режим. Применённый режим меняется только при успехе.
    ///
    /// # Errors
    ///
    /// Ошибки [`validate`] (железо не тронуто) и
    /// [`IlluminationError::HardwareConfiguration`] при сбое захвата или мутации.
    pub fn set_mode(&mut self, mode: IlluminationMode) -> Result<(), IlluminationError> {
        validate(self.hw.has_illumination(), self.hw.supports_mode(mode), mode)?;
        self.apply(mode)
    }

    /// Сброс в `Off` при старте/остановке ридера. Это не запрос хоста, поэтому
    /// отсутствие фонарика — не ошибка; сбой самой мутации — ошибка.
    ///
    /// # Errors
    ///
    /// [`IlluminationError::HardwareConfiguration`].
    pub fn reset(&mut self) -> Result<(), IlluminationError> {
        let off = IlluminationMode::Off;
        if validate(self.hw.has_illumination(), self.hw.supports_mode(off), off).is_err() {
            debug!("illumination reset skipped: hardware cannot switch off");
            return Ok(());
        }
        self.apply(off)
    }

    fn apply(&mut self, mode: IlluminationMode) -> Result<(), IlluminationError> {
        let wrap = |source| IlluminationError::HardwareConfiguration { mode, source };

        let mut lock = ConfigurationLock::acquire(&mut self.hw).map_err(wrap)?;
        if let Err(e) = lock.apply_mode(mode) {
            warn!("illumination {mode} failed: {e}");
            return Err(wrap(e));
        }
        drop(lock);

        debug!("illumination {} -> {mode}", self.applied);
        self.applied = mode;
        Ok(())
    }
}
