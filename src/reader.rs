// src/reader.rs
//
// Фасад: собирает сессию, подсветку и коллабораторов хоста в один объект
// с жизненным циклом start/stop и единственным каналом результатов/ошибок.
//
// Модель однопоточная: всё внутри `RefCell`, ридер `!Sync`. Ни один borrow
// не удерживается во время вызова наблюдателя, поэтому из `on_result` можно
// звать `stop()`, `start()` и даже менять наблюдателя.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use log::{debug, warn};

use crate::config::ReaderConfig;
use crate::core::error::{IlluminationError, ReaderError, SetupError};
use crate::core::types::{Detection, IlluminationMode, NormalizedResult, ScanMode, SessionState};
use crate::device::{FrameSource, HostObserver, IlluminationHardware, PresentationSurface};
use crate::illumination::IlluminationController;
use crate::session::{FrameOutcome, ScanSession};

pub struct BarcodeReader<F, H, S>
where
    F: FrameSource,
    H: IlluminationHardware,
    S: PresentationSurface<Preview = F::Preview>,
{
    session: RefCell<ScanSession>,
    illumination: RefCell<IlluminationController<H>>,
    frames: RefCell<F>,
    surface: RefCell<S>,
    observer: RefCell<Option<Rc<dyn HostObserver>>>,
    /// Ошибка настройки, случившаяся до появления наблюдателя. Отдаётся один раз.
    pending_error: Cell<Option<ReaderError>>,
    setup_error: Option<SetupError>,
}

impl<F, H, S> BarcodeReader<F, H, S>
where
    F: FrameSource,
    H: IlluminationHardware,
    S: PresentationSurface<Preview = F::Preview>,
{
    /// Конструктор не падает: невалидный конфиг или ошибка настройки источника
    /// кадров запоминается и уходит первому наблюдателю в
    /// [`BarcodeReader::set_observer`]. Источник с невалидным конфигом не трогается.
    #[must_use]
    pub fn new(config: &ReaderConfig, mut frames: F, hardware: H, mut surface: S) -> Self {
        let filter = config.filter();
        let setup = config
            .validate()
            .map_err(|e| SetupError::InvalidConfig(e.to_string()))
            .and_then(|()| frames.configure(&filter));

        let setup_error = match setup {
            Ok(preview) => {
                debug!("frame source configured, gravity {:?}", config.video_gravity);
                surface.attach_preview(preview, config.video_gravity);
                None
            }
            Err(e) => {
                warn!("reader setup failed: {e}");
                Some(e)
            }
        };

        let reader = Self {
            session: RefCell::new(ScanSession::new(filter, config.normalizer(), config.scan_mode)),
            illumination: RefCell::new(IlluminationController::new(hardware)),
            frames: RefCell::new(frames),
            surface: RefCell::new(surface),
            observer: RefCell::new(None),
            pending_error: Cell::new(setup_error.clone().map(ReaderError::from)),
            setup_error,
        };

        if reader.setup_error.is_none() && config.start_on_setup {
            reader.arm();
        }
        reader
    }

    /// Подключить наблюдателя. Отложенная ошибка настройки доставляется
    /// только первому подключённому, потом слот пуст.
    pub fn set_observer(&self, observer: Rc<dyn HostObserver>) {
        *self.observer.borrow_mut() = Some(Rc::clone(&observer));
        if let Some(err) = self.pending_error.take() {
            debug!("replaying deferred setup error");
            observer.on_error(err.kind(), &err.message());
        }
    }

    pub fn clear_observer(&self) -> Option<Rc<dyn HostObserver>> {
        self.observer.borrow_mut().take()
    }

    /// Ошибка настройки, если она была. Сессия без источника кадров не стартует.
    #[must_use]
    pub fn setup_error(&self) -> Option<&SetupError> {
        self.setup_error.as_ref()
    }

    #[must_use]
    pub fn state(&self) -> SessionState {
        self.session.borrow().state()
    }

    #[must_use]
    pub fn scan_mode(&self) -> ScanMode {
        self.session.borrow().scan_mode()
    }

    pub fn set_scan_mode(&self, mode: ScanMode) {
        self.session.borrow_mut().set_scan_mode(mode);
    }

    #[must_use]
    pub fn is_visible(&self) -> bool {
        self.session.borrow().is_visible()
    }

    /// Поверхность ушла с экрана / вернулась. Состояние сессии не меняется.
    pub fn set_visible(&self, visible: bool) {
        self.session.borrow_mut().set_visible(visible);
    }

    #[must_use]
    pub fn accepted_count(&self) -> u64 {
        self.session.borrow().accepted_count()
    }

    /// Последний успешно применённый режим подсветки.
    #[must_use]
    pub fn illumination_mode(&self) -> IlluminationMode {
        self.illumination.borrow().applied_mode()
    }

    /// Вооружить сессию: подсветка в `Off`, доставка кадров, кнопка фонарика.
    ///
    /// # Errors
    ///
    /// [`ReaderError::Setup`], если настройка при создании не удалась; сессия
    /// тогда остаётся в `Stopped`. Сбой сброса подсветки сюда не попадает, он
    /// уходит наблюдателю.
    pub fn start(&self) -> Result<(), ReaderError> {
        if let Some(e) = &self.setup_error {
            return Err(e.clone().into());
        }
        self.arm();
        Ok(())
    }

    /// В `Stopped` из любого состояния. Можно звать в любой момент, в том числе
    /// из `HostObserver::on_result`.
    pub fn stop(&self) {
        self.session.borrow_mut().stop();
        self.halt();
    }

    /// Батч детекций одного кадра. Возвращает решение сессии.
    pub fn on_frame(&self, batch: &[Detection]) -> FrameOutcome {
        let outcome = self.session.borrow_mut().on_frame(batch);
        if let FrameOutcome::Accepted { result, stop_requested } = &outcome {
            if *stop_requested {
                self.halt();
            }
            self.notify_result(result);
        }
        outcome
    }

    /// Запрос хоста на смену подсветки. Ошибка возвращается и одновременно
    /// уходит наблюдателю; сканирование она не затрагивает.
    ///
    /// # Errors
    ///
    /// Ошибки [`IlluminationController::set_mode`], а также
    /// [`IlluminationError::Busy`] для запроса изнутри идущей смены режима.
    pub fn request_illumination(&self, mode: IlluminationMode) -> Result<(), IlluminationError> {
        let res = self.with_illumination(|c| c.set_mode(mode));
        if let Err(e) = &res {
            self.report(e.clone().into());
        }
        res
    }

    // Только после успешной настройки.
    fn arm(&self) {
        let reset = self.with_illumination(IlluminationController::reset);
        let has_torch = self
            .illumination
            .try_borrow()
            .is_ok_and(|c| c.hardware().has_illumination());

        self.session.borrow_mut().start();
        self.frames.borrow_mut().start_delivery();
        self.surface.borrow_mut().set_illumination_control_visible(has_torch);

        if let Err(e) = reset {
            self.report(e.into());
        }
    }

    // Побочные эффекты входа в Stopped; сессия уже переведена.
    fn halt(&self) {
        let reset = self.with_illumination(IlluminationController::reset);
        self.frames.borrow_mut().stop_delivery();
        {
            let mut surface = self.surface.borrow_mut();
            surface.set_illumination_control_visible(false);
            surface.hide_focus_indicator();
        }
        if let Err(e) = reset {
            self.report(e.into());
        }
    }

    fn with_illumination<T>(
        &self,
        f: impl FnOnce(&mut IlluminationController<H>) -> Result<T, IlluminationError>,
    ) -> Result<T, IlluminationError> {
        let mut ctl = self
            .illumination
            .try_borrow_mut()
            .map_err(|_| IlluminationError::Busy)?;
        f(&mut *ctl)
    }

    fn observer(&self) -> Option<Rc<dyn HostObserver>> {
        self.observer.borrow().clone()
    }

    fn notify_result(&self, result: &NormalizedResult) {
        match self.observer() {
            Some(o) => o.on_result(result),
            None => debug!("no observer attached, result {:?} dropped", result.text),
        }
    }

    fn report(&self, err: ReaderError) {
        let message = err.message();
        warn!("{}: {message}", err.kind());
        match self.observer() {
            Some(o) => o.on_error(err.kind(), &message),
            None => debug!("no observer attached, error dropped"),
        }
    }
}

impl<F, H, S> Drop for BarcodeReader<F, H, S>
where
    F: FrameSource,
    H: IlluminationHardware,
    S: PresentationSurface<Preview = F::Preview>,
{
    fn drop(&mut self) {
        // наблюдателю ничего не уходит, только лог
        if let Err(e) = self.illumination.get_mut().reset() {
            warn!("illumination reset on drop failed: {e}");
        }
        let session = self.session.get_mut();
        if session.state() != SessionState::Stopped {
            session.stop();
            self.frames.get_mut().stop_delivery();
            let surface = self.surface.get_mut();
            surface.set_illumination_control_visible(false);
            surface.hide_focus_indicator();
        }
    }
}
