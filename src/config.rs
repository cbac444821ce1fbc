//! Конфигурация ридера (serde, JSON).

use serde::{Deserialize, Serialize};

use crate::core::types::{ScanMode, Symbology, VideoGravity};
use crate::filter::CodeTypeFilter;
use crate::normalize::{AliasRule, ResultNormalizer};

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid reader config: {0}")]
    Json(#[from] serde_json::Error),
    #[error("reader config lists no symbologies")]
    NoSymbologies,
}

/// Все поля необязательны; отсутствующие берутся из [`ReaderConfig::default`].
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReaderConfig {
    pub scan_mode: ScanMode,
    /// Белый список символик.
    pub symbologies: Vec<Symbology>,
    /// Таблица алиасов нормализатора. Пустой список — чистое тождество.
    pub aliases: Vec<AliasRule>,
    pub video_gravity: VideoGravity,
    /// Запускать сессию сразу после успешной настройки источника кадров.
    pub start_on_setup: bool,
}

impl Default for ReaderConfig {
    fn default() -> Self {
        Self {
            scan_mode: ScanMode::OneShot,
            symbologies: Symbology::ALL.to_vec(),
            aliases: vec![AliasRule::ean13_leading_zero_as_upce()],
            video_gravity: VideoGravity::ResizeAspectFill,
            start_on_setup: true,
        }
    }
}

impl ReaderConfig {
    /// Разобрать и провалидировать.
    ///
    /// # Errors
    ///
    /// [`ConfigError::Json`] для битого JSON или неизвестной символики,
    /// [`ConfigError::NoSymbologies`] для пустого белого списка.
    pub fn from_json(s: &str) -> Result<Self, ConfigError> {
        let cfg: Self = serde_json::from_str(s)?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Пустой белый список запрещён: такой ридер молча игнорировал бы все кадры.
    /// [`BarcodeReader::new`](crate::reader::BarcodeReader::new) тоже вызывает эту проверку.
    ///
    /// # Errors
    ///
    /// [`ConfigError::NoSymbologies`].
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.symbologies.is_empty() {
            return Err(ConfigError::NoSymbologies);
        }
        Ok(())
    }

    #[must_use]
    pub fn filter(&self) -> CodeTypeFilter {
        self.symbologies.iter().copied().collect()
    }

    #[must_use]
    pub fn normalizer(&self) -> ResultNormalizer {
        ResultNormalizer::from_rules(self.aliases.iter().cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_object_is_default() {
        let cfg = ReaderConfig::from_json("{}").unwrap();
        assert_eq!(cfg, ReaderConfig::default());
        assert_eq!(cfg.filter(), CodeTypeFilter::all());
        assert_eq!(cfg.normalizer(), ResultNormalizer::default());
    }

    #[test]
    fn partial_config() {
        let cfg = ReaderConfig::from_json(
            r#"{
                "scan_mode": "continuous",
                "symbologies": ["qr", "ean13"],
                "aliases": [],
                "video_gravity": "resize_aspect",
                "start_on_setup": false
            }"#,
        )
        .unwrap();
        assert_eq!(cfg.scan_mode, ScanMode::Continuous);
        assert!(cfg.filter().accepts(Symbology::Qr));
        assert!(!cfg.filter().accepts(Symbology::Code128));
        assert!(cfg.normalizer().rules().is_empty());
        assert_eq!(cfg.video_gravity, VideoGravity::ResizeAspect);
        assert!(!cfg.start_on_setup);
    }

    #[test]
    fn rejects_empty_whitelist_and_garbage() {
        assert!(matches!(
            ReaderConfig::from_json(r#"{"symbologies": []}"#),
            Err(ConfigError::NoSymbologies)
        ));
        assert!(matches!(
            ReaderConfig::from_json(r#"{"symbologies": ["maxicode"]}"#),
            Err(ConfigError::Json(_))
        ));
    }
}
