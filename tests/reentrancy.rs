// tests/reentrancy.rs
//
// Вызовы обратно в ридер из колбэков: stop() из on_result и повторный запрос
// подсветки изнутри окна конфигурации.

mod common;

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use common::*;
use ultracode_reader::prelude::*;

/// Наблюдатель, который останавливает ридер на первом результате.
struct StopOnResult {
    reader: Weak<TestReader>,
    seen: RecordingObserver,
}

impl HostObserver for StopOnResult {
    fn on_result(&self, result: &NormalizedResult) {
        self.seen.on_result(result);
        if let Some(reader) = self.reader.upgrade() {
            reader.stop();
        }
    }

    fn on_error(&self, kind: ErrorKind, message: &str) {
        self.seen.on_error(kind, message);
    }
}

#[test]
fn stop_from_result_callback_in_continuous_mode() {
    let config = ReaderConfig {
        scan_mode: ScanMode::Continuous,
        ..ReaderConfig::default()
    };
    let (reader, journal) = fake_reader(&config);
    let reader = Rc::new(reader);
    let observer = Rc::new(StopOnResult {
        reader: Rc::downgrade(&reader),
        seen: RecordingObserver::default(),
    });
    reader.set_observer(observer.clone());
    clear(&journal);

    reader.on_frame(&qr("one"));
    assert_eq!(reader.state(), SessionState::Stopped);
    assert!(calls(&journal).contains(&Call::StopDelivery));

    reader.on_frame(&qr("two"));
    assert_eq!(observer.seen.results().len(), 1);
}

#[test]
fn stop_from_result_callback_in_one_shot_mode() {
    let (reader, _journal) = fake_reader(&ReaderConfig::default());
    let reader = Rc::new(reader);
    let observer = Rc::new(StopOnResult {
        reader: Rc::downgrade(&reader),
        seen: RecordingObserver::default(),
    });
    reader.set_observer(observer.clone());

    reader.on_frame(&qr("one"));
    assert_eq!(reader.state(), SessionState::Stopped);
    assert!(observer.seen.errors.borrow().is_empty());
}

type ReentrantReader = BarcodeReader<FakeSource, ReentrantTorch, FakeSurface>;

/// Фонарик, который во время применения режима снова просит подсветку у ридера.
struct ReentrantTorch {
    reader: Rc<RefCell<Weak<ReentrantReader>>>,
    nested: Rc<RefCell<Vec<Result<(), IlluminationError>>>>,
}

impl IlluminationHardware for ReentrantTorch {
    fn has_illumination(&self) -> bool {
        true
    }

    fn supports_mode(&self, _mode: IlluminationMode) -> bool {
        true
    }

    fn lock_for_configuration(&mut self) -> Result<(), HardwareError> {
        Ok(())
    }

    fn apply_mode(&mut self, mode: IlluminationMode) -> Result<(), HardwareError> {
        let reader = self.reader.borrow().upgrade();
        if let (Some(reader), IlluminationMode::On) = (reader, mode) {
            let res = reader.request_illumination(IlluminationMode::Auto);
            self.nested.borrow_mut().push(res);
        }
        Ok(())
    }

    fn unlock_for_configuration(&mut self) {}
}

#[test]
fn nested_illumination_request_is_rejected_not_interleaved() {
    init_logging();
    let journal = Journal::default();
    let slot = Rc::new(RefCell::new(Weak::new()));
    let nested = Rc::new(RefCell::new(Vec::new()));

    let torch = ReentrantTorch {
        reader: Rc::clone(&slot),
        nested: Rc::clone(&nested),
    };
    let reader: Rc<ReentrantReader> = Rc::new(BarcodeReader::new(
        &ReaderConfig::default(),
        FakeSource {
            journal: Rc::clone(&journal),
            fail: None,
        },
        torch,
        FakeSurface {
            journal: Rc::clone(&journal),
        },
    ));
    *slot.borrow_mut() = Rc::downgrade(&reader);

    let observer = Rc::new(RecordingObserver::default());
    reader.set_observer(observer.clone());

    assert_eq!(reader.request_illumination(IlluminationMode::On), Ok(()));
    assert_eq!(*nested.borrow(), vec![Err(IlluminationError::Busy)]);
    assert_eq!(observer.error_kinds(), vec![ErrorKind::IlluminationBusy]);
    assert_eq!(reader.illumination_mode(), IlluminationMode::On);
    assert_eq!(reader.state(), SessionState::Armed);
}
