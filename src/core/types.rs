// src/core/types.rs
//
// Общие типы модели данных, независимые от конкретного детектора и платформы.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Символика (схема кодирования) распознанного кода.
///
/// Порядок вариантов фиксирован: дискриминант используется как индекс бита
/// в [`crate::filter::CodeTypeFilter`].
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Symbology {
    Upce,
    Code39,
    Code39Mod43,
    Code93,
    Code128,
    Ean8,
    Ean13,
    Aztec,
    Pdf417,
    Itf14,
    DataMatrix,
    Interleaved2of5,
    Qr,
}

impl Symbology {
    /// Все поддерживаемые символики, в порядке дискриминантов.
    pub const ALL: [Symbology; 13] = [
        Symbology::Upce,
        Symbology::Code39,
        Symbology::Code39Mod43,
        Symbology::Code93,
        Symbology::Code128,
        Symbology::Ean8,
        Symbology::Ean13,
        Symbology::Aztec,
        Symbology::Pdf417,
        Symbology::Itf14,
        Symbology::DataMatrix,
        Symbology::Interleaved2of5,
        Symbology::Qr,
    ];

    /// Канонический тег символики (reverse-DNS), который получает хост.
    #[must_use]
    pub const fn tag(self) -> &'static str {
        match self {
            Symbology::Upce => "org.gs1.UPC-E",
            Symbology::Code39 => "org.iso.Code39",
            Symbology::Code39Mod43 => "org.iso.Code39Mod43",
            Symbology::Code93 => "com.intermec.Code93",
            Symbology::Code128 => "org.iso.Code128",
            Symbology::Ean8 => "org.gs1.EAN-8",
            Symbology::Ean13 => "org.gs1.EAN-13",
            Symbology::Aztec => "org.iso.Aztec",
            Symbology::Pdf417 => "org.iso.PDF417",
            Symbology::Itf14 => "org.gs1.ITF14",
            Symbology::DataMatrix => "org.iso.DataMatrix",
            Symbology::Interleaved2of5 => "org.ansi.Interleaved2of5",
            Symbology::Qr => "org.iso.QRCode",
        }
    }

    /// Короткое имя (то же, что в конфиге).
    #[must_use]
    pub const fn short_name(self) -> &'static str {
        match self {
            Symbology::Upce => "upce",
            Symbology::Code39 => "code39",
            Symbology::Code39Mod43 => "code39mod43",
            Symbology::Code93 => "code93",
            Symbology::Code128 => "code128",
            Symbology::Ean8 => "ean8",
            Symbology::Ean13 => "ean13",
            Symbology::Aztec => "aztec",
            Symbology::Pdf417 => "pdf417",
            Symbology::Itf14 => "itf14",
            Symbology::DataMatrix => "datamatrix",
            Symbology::Interleaved2of5 => "interleaved2of5",
            Symbology::Qr => "qr",
        }
    }

    #[inline]
    pub(crate) const fn bit(self) -> u16 {
        1 << (self as u16)
    }
}

impl fmt::Display for Symbology {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.short_name())
    }
}

/// Символика не распознана ни по тегу, ни по короткому имени.
#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
#[error("unknown symbology: {0:?}")]
pub struct UnknownSymbology(pub String);

impl FromStr for Symbology {
    type Err = UnknownSymbology;

    /// Принимает и канонический тег (`org.gs1.EAN-13`), и короткое имя (`ean13`),
    /// без учёта регистра.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Symbology::ALL
            .into_iter()
            .find(|sym| sym.tag().eq_ignore_ascii_case(s) || sym.short_name().eq_ignore_ascii_case(s))
            .ok_or_else(|| UnknownSymbology(s.to_owned()))
    }
}

/// Один сырой кандидат из кадра, как его отдал внешний детектор.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Detection {
    pub symbology: Symbology,
    pub text: String,
}

impl Detection {
    #[inline]
    #[must_use]
    pub fn new(symbology: Symbology, text: impl Into<String>) -> Self {
        Self {
            symbology,
            text: text.into(),
        }
    }
}

/// Публичный результат декодирования, который уходит хосту.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct NormalizedResult {
    pub text: String,
    pub symbology_tag: String,
}

impl NormalizedResult {
    #[inline]
    #[must_use]
    pub fn new(text: impl Into<String>, symbology_tag: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            symbology_tag: symbology_tag.into(),
        }
    }
}

/// Состояние сессии сканирования.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum SessionState {
    /// Кадры оцениваются.
    Armed,
    /// Результат принят в one-shot режиме, дальнейшие детекции игнорируются.
    Locked,
    /// Кадры не поступают (камера неактивна).
    Stopped,
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SessionState::Armed => "armed",
            SessionState::Locked => "locked",
            SessionState::Stopped => "stopped",
        })
    }
}

/// Режим сессии: один результат до явного рестарта или поток результатов.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScanMode {
    #[default]
    OneShot,
    Continuous,
}

/// Режим подсветки (фонарика).
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IlluminationMode {
    #[default]
    Off,
    On,
    Auto,
}

impl fmt::Display for IlluminationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            IlluminationMode::Off => "off",
            IlluminationMode::On => "on",
            IlluminationMode::Auto => "auto",
        })
    }
}

/// Как растягивать превью внутри поверхности.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VideoGravity {
    Resize,
    ResizeAspect,
    #[default]
    ResizeAspectFill,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tags_and_short_names_parse_back() {
        for sym in Symbology::ALL {
            assert_eq!(sym.tag().parse::<Symbology>(), Ok(sym));
            assert_eq!(sym.short_name().parse::<Symbology>(), Ok(sym));
        }
    }

    #[test]
    fn parse_is_case_insensitive() {
        assert_eq!("EAN13".parse::<Symbology>(), Ok(Symbology::Ean13));
        assert_eq!("org.gs1.upc-e".parse::<Symbology>(), Ok(Symbology::Upce));
        assert!("maxicode".parse::<Symbology>().is_err());
    }

    #[test]
    fn bits_are_distinct() {
        let mut seen = 0u16;
        for sym in Symbology::ALL {
            assert_eq!(seen & sym.bit(), 0, "{sym} collides");
            seen |= sym.bit();
        }
    }

    #[test]
    fn serde_uses_short_names() {
        let json = serde_json::to_string(&Symbology::DataMatrix).unwrap();
        assert_eq!(json, "\"datamatrix\"");
        let mode: ScanMode = serde_json::from_str("\"continuous\"").unwrap();
        assert_eq!(mode, ScanMode::Continuous);
    }
}
