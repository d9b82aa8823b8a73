//! Prefix-tagged run logging.
//!
//! Controlled by environment variables:
//! - `HADRONIC_LOGGING`: enables/disables logging (`true`/`false`)
//! - `HADRONIC_LOG_TO_FILE`: send log lines to a file instead of stdout (`true`/`false`)
//! - `HADRONIC_LOG_FILE`: path of the log file (default `hadronic.log`)
//!
//! To see log lines in tests, run: `HADRONIC_LOGGING=true cargo test -- --nocapture`

use std::env;
use std::fs::OpenOptions;
use std::io::Write;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;
use once_cell::sync::Lazy;

static ENABLE_LOGGING: AtomicBool = AtomicBool::new(false);
static LOG_TO_FILE: AtomicBool = AtomicBool::new(false);
static LOG_FILE: Lazy<Mutex<Option<std::fs::File>>> = Lazy::new(|| Mutex::new(None));

const DEFAULT_LOG_FILE: &str = "hadronic.log";

/// Initializes logging from the `HADRONIC_LOGGING*` environment variables.
pub fn init_logging() {
    match env::var("HADRONIC_LOGGING") {
        Ok(value) => match value.as_str() {
            "true" => {
                ENABLE_LOGGING.store(true, Ordering::SeqCst);
                if env::var("HADRONIC_LOG_TO_FILE").unwrap_or_else(|_| "false".to_string()) == "true" {
                    let path = env::var("HADRONIC_LOG_FILE").unwrap_or_else(|_| DEFAULT_LOG_FILE.to_string());
                    match OpenOptions::new().create(true).append(true).open(&path) {
                        Ok(file) => {
                            LOG_TO_FILE.store(true, Ordering::SeqCst);
                            if let Ok(mut guard) = LOG_FILE.lock() {
                                *guard = Some(file);
                            }
                        }
                        Err(e) => eprintln!("Failed to open log file {}: {}, logging to stdout", path, e),
                    }
                }
            }
            "false" => ENABLE_LOGGING.store(false, Ordering::SeqCst),
            _ => panic!("\nError: HADRONIC_LOGGING environment variable must be 'true' or 'false'\n\nTo run the driver, use one of:\n  HADRONIC_LOGGING=true cargo run\n  HADRONIC_LOGGING=false cargo run\n"),
        },
        Err(_) => ENABLE_LOGGING.store(false, Ordering::SeqCst),
    }
}

/// Returns whether `log` currently emits anything.
pub fn is_enabled() -> bool {
    ENABLE_LOGGING.load(Ordering::SeqCst)
}

pub fn log(prefix: &str, message: &str) {
    if !is_enabled() {
        return;
    }
    let log_message = format!("  [{}]   {}\n", prefix, message);

    if LOG_TO_FILE.load(Ordering::SeqCst) {
        if let Ok(mut guard) = LOG_FILE.lock() {
            if let Some(file) = guard.as_mut() {
                if let Err(e) = file.write_all(log_message.as_bytes()) {
                    eprintln!("Failed to write to log file: {}", e);
                }
                if let Err(e) = file.flush() {
                    eprintln!("Failed to flush log file: {}", e);
                }
            }
        }
    } else {
        print!("{}", log_message);
    }
}
