//! `use ultracode_reader::prelude::*;` — всё, что нужно хосту для интеграции.

pub use crate::config::ReaderConfig;
pub use crate::core::error::{ErrorKind, HardwareError, IlluminationError, ReaderError, SetupError};
pub use crate::core::types::{
    Detection, IlluminationMode, NormalizedResult, ScanMode, SessionState, Symbology, VideoGravity,
};
pub use crate::device::{FrameSource, HostObserver, IlluminationHardware, NoIllumination, PresentationSurface};
pub use crate::filter::CodeTypeFilter;
pub use crate::normalize::{AliasRule, ResultNormalizer};
pub use crate::reader::BarcodeReader;
pub use crate::session::{FrameOutcome, IgnoreReason, ScanSession};
