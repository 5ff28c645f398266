/// Daily log file under the logs directory
///
/// Lines are appended to `holderwatch_<YYYY-MM-DD>.log`. Until
/// `init_file_logging` runs (tests, debug tools) file output is a no-op.
use chrono::Local;
use once_cell::sync::Lazy;
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use super::config::get_logger_config;
use crate::paths::get_logs_directory;

struct LogFile {
    date: String,
    writer: BufWriter<File>,
}

static LOG_FILE: Lazy<Mutex<Option<LogFile>>> = Lazy::new(|| Mutex::new(None));

pub fn log_file_name(date: &str) -> String {
    format!("holderwatch_{}.log", date)
}

fn open_log_file(dir: &Path, date: &str) -> std::io::Result<LogFile> {
    std::fs::create_dir_all(dir)?;
    let path: PathBuf = dir.join(log_file_name(date));
    let file = OpenOptions::new().create(true).append(true).open(path)?;
    Ok(LogFile {
        date: date.to_string(),
        writer: BufWriter::new(file),
    })
}

pub fn init_file_logging() {
    if !get_logger_config().file_logging {
        return;
    }

    let date = Local::now().format("%Y-%m-%d").to_string();
    match open_log_file(&get_logs_directory(), &date) {
        Ok(log_file) => {
            if let Ok(mut slot) = LOG_FILE.lock() {
                *slot = Some(log_file);
            }
        }
        Err(e) => eprintln!("Failed to open log file: {}", e),
    }
}

/// Append one line, rolling over to a new file when the date changes
pub fn write_to_file(line: &str) {
    let Ok(mut slot) = LOG_FILE.lock() else {
        return;
    };
    let Some(current) = slot.as_mut() else {
        return;
    };

    let today = Local::now().format("%Y-%m-%d").to_string();
    if current.date != today {
        let _ = current.writer.flush();
        match open_log_file(&get_logs_directory(), &today) {
            Ok(next) => *current = next,
            Err(e) => {
                eprintln!("Failed to roll log file: {}", e);
                return;
            }
        }
    }

    let _ = writeln!(current.writer, "{}", line);
}

pub fn flush_file_logging() {
    if let Ok(mut slot) = LOG_FILE.lock() {
        if let Some(current) = slot.as_mut() {
            let _ = current.writer.flush();
        }
    }
}
