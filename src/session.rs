//! Сессия сканирования: Armed / Locked / Stopped.
//!
//! Единственный источник решения «принят ли кадр». Сама сессия I/O не делает:
//! она возвращает [`Transition`] / [`FrameOutcome`], а ридер превращает их
//! в вызовы источника кадров, подсветки и поверхности.
//!
//! В one-shot режиме блокировка ставится на первый принятый результат, а не
//! по значению: серия кадров одного и того же кода после принятия тоже глушится.

use log::{debug, info, trace};

use crate::core::types::{Detection, NormalizedResult, ScanMode, SessionState};
use crate::filter::CodeTypeFilter;
use crate::normalize::ResultNormalizer;

/// Смена состояния, вызванная `start`/`stop`.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct Transition {
    pub from: SessionState,
    pub to: SessionState,
}

/// Почему кадр проигнорирован.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum IgnoreReason {
    NotArmed(SessionState),
    Hidden,
    NoQualifyingDetection,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum FrameOutcome {
    Ignored(IgnoreReason),
    Accepted {
        result: NormalizedResult,
        /// `true` в one-shot: сессия уже в `Stopped`, доставку кадров надо прекратить.
        stop_requested: bool,
    },
}

impl FrameOutcome {
    #[must_use]
    pub fn result(&self) -> Option<&NormalizedResult> {
        match self {
            FrameOutcome::Accepted { result, .. } => Some(result),
            FrameOutcome::Ignored(_) => None,
        }
    }
}

#[derive(Clone, Debug)]
pub struct ScanSession {
    filter: CodeTypeFilter,
    normalizer: ResultNormalizer,
    mode: ScanMode,
    state: SessionState,
    visible: bool,
    accepted: u64,
}

impl ScanSession {
    #[must_use]
    pub fn new(filter: CodeTypeFilter, normalizer: ResultNormalizer, mode: ScanMode) -> Self {
        Self {
            filter,
            normalizer,
            mode,
            state: SessionState::Stopped,
            visible: true,
            accepted: 0,
        }
    }

    #[inline]
    #[must_use]
    pub fn state(&self) -> SessionState {
        self.state
    }

    #[inline]
    #[must_use]
    pub fn scan_mode(&self) -> ScanMode {
        self.mode
    }

    /// Действует со следующего кадра; текущее состояние не трогает.
    pub fn set_scan_mode(&mut self, mode: ScanMode) {
        self.mode = mode;
    }

    #[inline]
    #[must_use]
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    #[inline]
    #[must_use]
    pub fn filter(&self) -> &CodeTypeFilter {
        &self.filter
    }

    /// Сколько результатов выдано с момента создания.
    #[inline]
    #[must_use]
    pub fn accepted_count(&self) -> u64 {
        self.accepted
    }

    /// Видимость только гейтит `on_frame`, состояние не меняет.
    pub fn set_visible(&mut self, visible: bool) {
        if self.visible != visible {
            debug!("visibility {} -> {visible}", self.visible);
        }
        self.visible = visible;
    }

    /// Из любого состояния в `Armed`; снимает блокировку.
    pub fn start(&mut self) -> Transition {
        self.enter(SessionState::Armed)
    }

    /// Из любого состояния в `Stopped`. Повторный вызов безопасен.
    pub fn stop(&mut self) -> Transition {
        self.enter(SessionState::Stopped)
    }

    pub fn on_frame(&mut self, batch: &[Detection]) -> FrameOutcome {
        if self.state != SessionState::Armed {
            trace!("frame ignored: session {}", self.state);
            return FrameOutcome::Ignored(IgnoreReason::NotArmed(self.state));
        }
        if !self.visible {
            trace!("frame ignored: surface hidden");
            return FrameOutcome::Ignored(IgnoreReason::Hidden);
        }
        let Some(detection) = self.filter.first_accepted(batch) else {
            trace!("frame ignored: {} candidate(s), none supported", batch.len());
            return FrameOutcome::Ignored(IgnoreReason::NoQualifyingDetection);
        };

        let result = self.normalizer.normalize(detection);
        self.accepted += 1;
        info!("accepted {} {:?}", result.symbology_tag, result.text);

        let stop_requested = match self.mode {
            ScanMode::OneShot => {
                self.enter(SessionState::Locked);
                self.enter(SessionState::Stopped);
                true
            }
            ScanMode::Continuous => false,
        };
        FrameOutcome::Accepted { result, stop_requested }
    }

    fn enter(&mut self, to: SessionState) -> Transition {
        let from = self.state;
        if from != to {
            debug!("session {from} -> {to}");
        }
        self.state = to;
        Transition { from, to }
    }
}

impl Default for ScanSession {
    fn default() -> Self {
        Self::new(CodeTypeFilter::all(), ResultNormalizer::default(), ScanMode::OneShot)
    }
}
