// Прогон записанного лога детекций через BarcodeReader.
//
// Формат скрипта (по строке):
//   <symbology> <text>   — детекция текущего кадра (символика: тег или короткое имя)
//   ---                  — конец кадра
//   !hide / !show        — поверхность ушла с экрана / вернулась
//   !torch <off|on|auto> — запрос подсветки
//   !start / !stop       — жизненный цикл
// Пустые строки и `#`-комментарии пропускаются.

use std::cell::Cell;
use std::env;
use std::fs;
use std::io::{self, Read};
use std::rc::Rc;

use ultracode_reader::logger;
use ultracode_reader::prelude::*;

struct ReplaySource;

impl FrameSource for ReplaySource {
    type Preview = &'static str;

    fn configure(&mut self, symbologies: &CodeTypeFilter) -> Result<Self::Preview, SetupError> {
        let names: Vec<_> = symbologies.symbologies().map(|s| s.short_name()).collect();
        println!("[source] configured: {}", names.join(","));
        Ok("replay-preview")
    }

    fn start_delivery(&mut self) {
        println!("[source] delivery started");
    }

    fn stop_delivery(&mut self) {
        println!("[source] delivery stopped");
    }
}

#[derive(Default)]
struct ConsoleTorch {
    locked: bool,
}

impl IlluminationHardware for ConsoleTorch {
    fn has_illumination(&self) -> bool {
        true
    }

    fn supports_mode(&self, mode: IlluminationMode) -> bool {
        mode != IlluminationMode::Auto
    }

    fn lock_for_configuration(&mut self) -> Result<(), HardwareError> {
        if self.locked {
            return Err(HardwareError::new("already locked"));
        }
        self.locked = true;
        Ok(())
    }

    fn apply_mode(&mut self, mode: IlluminationMode) -> Result<(), HardwareError> {
        println!("[torch] {mode}");
        Ok(())
    }

    fn unlock_for_configuration(&mut self) {
        self.locked = false;
    }
}

struct ConsoleSurface;

impl PresentationSurface for ConsoleSurface {
    type Preview = &'static str;

    fn attach_preview(&mut self, preview: Self::Preview, gravity: VideoGravity) {
        println!("[surface] preview {preview} ({gravity:?})");
    }

    fn set_illumination_control_visible(&mut self, visible: bool) {
        println!("[surface] torch button {}", if visible { "shown" } else { "hidden" });
    }

    fn hide_focus_indicator(&mut self) {
        println!("[surface] focus hidden");
    }
}

#[derive(Default)]
struct PrintObserver {
    results: Cell<usize>,
}

impl HostObserver for PrintObserver {
    fn on_result(&self, result: &NormalizedResult) {
        self.results.set(self.results.get() + 1);
        println!("{}: {}", result.symbology_tag, result.text);
    }

    fn on_error(&self, kind: ErrorKind, message: &str) {
        eprintln!("Ошибка {kind}: {message}");
    }
}

fn main() {
    let mut script_path: Option<String> = None;
    let mut config_path: Option<String> = None;
    let mut continuous = false;
    let mut no_torch = false;
    let mut verbosity: u8 = 0;

    // --script log.txt  --config reader.json  --continuous  --no-torch  -v/-vv/-vvv
    let mut args = env::args().skip(1);
    while let Some(a) = args.next() {
        match a.as_str() {
            "--script" => script_path = args.next(),
            "--config" => config_path = args.next(),
            "--continuous" => continuous = true,
            "--no-torch" => no_torch = true,
            // -v, -vv, -vvv или повтор флага
            v if v.len() > 1 && v.starts_with('-') && v[1..].bytes().all(|b| b == b'v') => {
                let n = u8::try_from(v.len() - 1).unwrap_or(u8::MAX);
                verbosity = verbosity.saturating_add(n);
            }
            "--help" | "-h" => {
                print_help();
                return;
            }
            other => {
                eprintln!("Неизвестный аргумент: {other}");
                print_help();
                std::process::exit(2);
            }
        }
    }

    if let Err(e) = logger::init_verbose(verbosity) {
        eprintln!("Логгер не установлен: {e}");
    }

    let mut config = match config_path.as_deref().map(load_config).transpose() {
        Ok(cfg) => cfg.unwrap_or_default(),
        Err(e) => {
            eprintln!("Ошибка конфига: {e}");
            std::process::exit(1);
        }
    };
    if continuous {
        config.scan_mode = ScanMode::Continuous;
    }

    let script = match read_script(script_path.as_deref()) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Ошибка чтения скрипта: {e}");
            std::process::exit(1);
        }
    };

    let observer = Rc::new(PrintObserver::default());
    let accepted = if no_torch {
        let reader = BarcodeReader::new(&config, ReplaySource, NoIllumination, ConsoleSurface);
        reader.set_observer(observer.clone());
        replay(&reader, &script)
    } else {
        let reader = BarcodeReader::new(&config, ReplaySource, ConsoleTorch::default(), ConsoleSurface);
        reader.set_observer(observer.clone());
        replay(&reader, &script)
    };

    if observer.results.get() == 0 {
        println!("Ничего не распознано :(");
    } else {
        println!("Принято результатов: {accepted}");
    }
}

fn replay<H: IlluminationHardware>(
    reader: &BarcodeReader<ReplaySource, H, ConsoleSurface>,
    script: &str,
) -> u64 {
    let mut frame: Vec<Detection> = Vec::new();

    for (no, line) in script.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        if line == "---" {
            reader.on_frame(&frame);
            frame.clear();
            continue;
        }
        if let Some(cmd) = line.strip_prefix('!') {
            run_command(reader, cmd, no + 1);
            continue;
        }

        let (sym, text) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
        match sym.parse::<Symbology>() {
            Ok(symbology) => frame.push(Detection::new(symbology, text.trim())),
            Err(e) => eprintln!("строка {}: {e}", no + 1),
        }
    }
    if !frame.is_empty() {
        reader.on_frame(&frame);
    }
    reader.accepted_count()
}

fn run_command<H: IlluminationHardware>(
    reader: &BarcodeReader<ReplaySource, H, ConsoleSurface>,
    cmd: &str,
    line_no: usize,
) {
    let mut parts = cmd.split_whitespace();
    match (parts.next(), parts.next()) {
        (Some("hide"), None) => reader.set_visible(false),
        (Some("show"), None) => reader.set_visible(true),
        (Some("start"), None) => {
            if let Err(e) = reader.start() {
                eprintln!("строка {line_no}: {e}");
            }
        }
        (Some("stop"), None) => reader.stop(),
        (Some("torch"), Some(mode)) => {
            let mode = match mode {
                "off" => IlluminationMode::Off,
                "on" => IlluminationMode::On,
                "auto" => IlluminationMode::Auto,
                other => {
                    eprintln!("строка {line_no}: неизвестный режим подсветки {other}");
                    return;
                }
            };
            // ошибка уже ушла наблюдателю
            let _ = reader.request_illumination(mode);
        }
        _ => eprintln!("строка {line_no}: неизвестная команда !{cmd}"),
    }
}

fn load_config(path: &str) -> Result<ReaderConfig, String> {
    let text = fs::read_to_string(path).map_err(|e| format!("{path}: {e}"))?;
    ReaderConfig::from_json(&text).map_err(|e| format!("{path}: {e}"))
}

fn read_script(path: Option<&str>) -> io::Result<String> {
    match path {
        Some(p) => fs::read_to_string(p),
        None => {
            let mut buf = String::new();
            io::stdin().read_to_string(&mut buf)?;
            Ok(buf)
        }
    }
}

fn print_help() {
    eprintln!(
        "Usage: scan_replay [--script FILE] [--config reader.json] [--continuous] [--no-torch] [-v|-vv|-vvv]\n\
         Без --script скрипт читается из stdin.\n\
         Формат: `<symbology> <text>` на строку, `---` — конец кадра,\n\
         команды: !hide !show !start !stop !torch <off|on|auto>"
    );
}
