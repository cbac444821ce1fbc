//! Логгер для демо-бинарей.
//!
//! Пишет `[elapsed LEVEL module] message` в stderr. Уровень задаётся числом
//! флагов `-v`; подробность поднимается только для модулей ридера, чужие
//! таргеты всегда режутся на `Warn`. Библиотека сама логгер не ставит,
//! только `log`-макросы; хост подключает свой.

use std::io::Write;
use std::sync::OnceLock;
use std::time::Instant;

use log::{Level, LevelFilter, Log, Metadata, Record};

const CRATE_TARGET: &str = env!("CARGO_CRATE_NAME");

/// `0` → `Warn`, `1` → `Info`, `2` → `Debug`, дальше `Trace`.
#[must_use]
pub fn level_for_verbosity(verbosity: u8) -> LevelFilter {
    match verbosity {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}

fn is_own_target(target: &str) -> bool {
    target
        .strip_prefix(CRATE_TARGET)
        .is_some_and(|rest| rest.is_empty() || rest.starts_with("::"))
}

struct StderrLogger {
    level: LevelFilter,
    started: Instant,
}

impl StderrLogger {
    fn threshold(&self, target: &str) -> LevelFilter {
        if is_own_target(target) {
            self.level
        } else {
            self.level.min(LevelFilter::Warn)
        }
    }
}

impl Log for StderrLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.threshold(metadata.target())
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let target = record.target();
        let module = target
            .strip_prefix(CRATE_TARGET)
            .map_or(target, |rest| rest.trim_start_matches("::"));
        let module = if module.is_empty() { "reader" } else { module };
        let elapsed = self.started.elapsed().as_secs_f64();
        let _ = writeln!(
            std::io::stderr(),
            "[{:7.3}s {:>5} {}] {}",
            elapsed,
            record.level(),
            module,
            record.args()
        );
        if record.level() == Level::Error {
            self.flush();
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

static LOGGER: OnceLock<StderrLogger> = OnceLock::new();

/// Поставить логгер по числу флагов `-v`. Повторный вызов — no-op.
///
/// # Errors
///
/// [`log::SetLoggerError`], если другой логгер уже установлен.
pub fn init_verbose(verbosity: u8) -> Result<(), log::SetLoggerError> {
    init_with_level(level_for_verbosity(verbosity))
}

/// Поставить логгер с заданным уровнем для модулей ридера. Повторный вызов — no-op.
///
/// # Errors
///
/// [`log::SetLoggerError`], если другой логгер уже установлен.
pub fn init_with_level(level: LevelFilter) -> Result<(), log::SetLoggerError> {
    if LOGGER.get().is_none() {
        let logger = LOGGER.get_or_init(|| StderrLogger {
            level,
            started: Instant::now(),
        });
        log::set_logger(logger)?;
        log::set_max_level(level);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verbosity_steps() {
        assert_eq!(level_for_verbosity(0), LevelFilter::Warn);
        assert_eq!(level_for_verbosity(1), LevelFilter::Info);
        assert_eq!(level_for_verbosity(2), LevelFilter::Debug);
        assert_eq!(level_for_verbosity(7), LevelFilter::Trace);
    }

    #[test]
    fn foreign_targets_are_capped_at_warn() {
        let logger = StderrLogger {
            level: LevelFilter::Trace,
            started: Instant::now(),
        };
        assert_eq!(logger.threshold("ultracode_reader::session"), LevelFilter::Trace);
        assert_eq!(logger.threshold("ultracode_reader"), LevelFilter::Trace);
        assert_eq!(logger.threshold("ultracode_reader_extra"), LevelFilter::Warn);
        assert_eq!(logger.threshold("serde_json"), LevelFilter::Warn);

        let quiet = StderrLogger {
            level: LevelFilter::Error,
            started: Instant::now(),
        };
        assert_eq!(quiet.threshold("serde_json"), LevelFilter::Error);
    }
}
