// tests/common/mod.rs
//
// Фейки коллабораторов: всё, что с ними делают, пишется в общий журнал.

#![allow(dead_code)]

use std::cell::RefCell;
use std::rc::Rc;

use ultracode_reader::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Call {
    Configure,
    AttachPreview(u32, VideoGravity),
    StartDelivery,
    StopDelivery,
    Lock,
    Apply(IlluminationMode),
    Unlock,
    TorchControl(bool),
    HideFocus,
}

pub type Journal = Rc<RefCell<Vec<Call>>>;

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

pub fn calls(journal: &Journal) -> Vec<Call> {
    journal.borrow().clone()
}

pub fn clear(journal: &Journal) {
    journal.borrow_mut().clear();
}

pub const PREVIEW: u32 = 7;

pub struct FakeSource {
    pub journal: Journal,
    pub fail: Option<SetupError>,
}

impl FrameSource for FakeSource {
    type Preview = u32;

    fn configure(&mut self, _symbologies: &CodeTypeFilter) -> Result<u32, SetupError> {
        self.journal.borrow_mut().push(Call::Configure);
        match &self.fail {
            Some(e) => Err(e.clone()),
            None => Ok(PREVIEW),
        }
    }

    fn start_delivery(&mut self) {
        self.journal.borrow_mut().push(Call::StartDelivery);
    }

    fn stop_delivery(&mut self) {
        self.journal.borrow_mut().push(Call::StopDelivery);
    }
}

pub struct FakeTorch {
    pub journal: Journal,
    pub present: bool,
    pub supported: Vec<IlluminationMode>,
    pub fail_apply: bool,
}

impl FakeTorch {
    pub fn on_off(journal: &Journal) -> Self {
        Self {
            journal: Rc::clone(journal),
            present: true,
            supported: vec![IlluminationMode::Off, IlluminationMode::On],
            fail_apply: false,
        }
    }

    pub fn absent(journal: &Journal) -> Self {
        Self {
            present: false,
            supported: Vec::new(),
            ..Self::on_off(journal)
        }
    }
}

impl IlluminationHardware for FakeTorch {
    fn has_illumination(&self) -> bool {
        self.present
    }

    fn supports_mode(&self, mode: IlluminationMode) -> bool {
        self.supported.contains(&mode)
    }

    fn lock_for_configuration(&mut self) -> Result<(), HardwareError> {
        self.journal.borrow_mut().push(Call::Lock);
        Ok(())
    }

    fn apply_mode(&mut self, mode: IlluminationMode) -> Result<(), HardwareError> {
        if self.fail_apply {
            return Err(HardwareError::new("torch is unavailable while recording"));
        }
        self.journal.borrow_mut().push(Call::Apply(mode));
        Ok(())
    }

    fn unlock_for_configuration(&mut self) {
        self.journal.borrow_mut().push(Call::Unlock);
    }
}

pub struct FakeSurface {
    pub journal: Journal,
}

impl PresentationSurface for FakeSurface {
    type Preview = u32;

    fn attach_preview(&mut self, preview: u32, gravity: VideoGravity) {
        self.journal.borrow_mut().push(Call::AttachPreview(preview, gravity));
    }

    fn set_illumination_control_visible(&mut self, visible: bool) {
        self.journal.borrow_mut().push(Call::TorchControl(visible));
    }

    fn hide_focus_indicator(&mut self) {
        self.journal.borrow_mut().push(Call::HideFocus);
    }
}

#[derive(Default)]
pub struct RecordingObserver {
    pub results: RefCell<Vec<NormalizedResult>>,
    pub errors: RefCell<Vec<(ErrorKind, String)>>,
}

impl RecordingObserver {
    pub fn results(&self) -> Vec<NormalizedResult> {
        self.results.borrow().clone()
    }

    pub fn error_kinds(&self) -> Vec<ErrorKind> {
        self.errors.borrow().iter().map(|(k, _)| *k).collect()
    }
}

impl HostObserver for RecordingObserver {
    fn on_result(&self, result: &NormalizedResult) {
        self.results.borrow_mut().push(result.clone());
    }

    fn on_error(&self, kind: ErrorKind, message: &str) {
        self.errors.borrow_mut().push((kind, message.to_owned()));
    }
}

pub type TestReader = BarcodeReader<FakeSource, FakeTorch, FakeSurface>;

/// Ридер на фейках с фонариком Off/On и рабочим источником кадров.
pub fn fake_reader(config: &ReaderConfig) -> (TestReader, Journal) {
    let journal = Journal::default();
    let torch = FakeTorch::on_off(&journal);
    (reader_with(config, None, torch, &journal), journal)
}

pub fn reader_with(
    config: &ReaderConfig,
    fail: Option<SetupError>,
    torch: FakeTorch,
    journal: &Journal,
) -> TestReader {
    init_logging();
    let source = FakeSource {
        journal: Rc::clone(journal),
        fail,
    };
    let surface = FakeSurface {
        journal: Rc::clone(journal),
    };
    BarcodeReader::new(config, source, torch, surface)
}

pub fn qr(text: &str) -> Vec<Detection> {
    vec![Detection::new(Symbology::Qr, text)]
}
