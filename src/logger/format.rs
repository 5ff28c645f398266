//! Console and file line formatting
//!
//! Console lines are colored and wrapped at word boundaries; file lines
//! are plain with a full timestamp. A closed stdout pipe ends the process
//! quietly.

use super::file::write_to_file;
use super::tags::LogTag;
use chrono::Local;
use colored::*;
use std::io::{stdout, ErrorKind, Write};

/// Column widths for alignment
const TAG_WIDTH: usize = 10;
const LOG_TYPE_WIDTH: usize = 7;
const TIME_WIDTH: usize = 9;
const PREFIX_WIDTH: usize = TIME_WIDTH + TAG_WIDTH + LOG_TYPE_WIDTH + 6;

/// Maximum console line length before wrapping
const MAX_LINE_LENGTH: usize = 145;

/// Narrowest message column, whatever the prefix
const MIN_MESSAGE_WIDTH: usize = 50;

/// Format and output a log message
pub fn format_and_log(tag: LogTag, log_type: &str, message: &str) {
    let now = Local::now();
    let time = now.format("%H:%M:%S ").to_string().dimmed();
    let timestamp = now.format("%Y-%m-%d %H:%M:%S").to_string();
    let tag_plain = tag.to_plain_string();

    let base_line = format!("{}[{}] [{}] ", time, format_tag(&tag), format_log_type(log_type));
    let width = MAX_LINE_LENGTH
        .saturating_sub(PREFIX_WIDTH)
        .max(MIN_MESSAGE_WIDTH);
    let continuation = " ".repeat(PREFIX_WIDTH);

    for (i, chunk) in wrap_text(message, width).iter().enumerate() {
        if i == 0 {
            print_stdout_safe(&format!("{}{}", base_line, chunk));
        } else {
            print_stdout_safe(&format!("{}{}", continuation, chunk));
        }
        write_to_file(&format!("{} [{}] [{}] {}", timestamp, tag_plain, log_type, chunk));
    }
}

/// Format a tag with appropriate color
fn format_tag(tag: &LogTag) -> ColoredString {
    let label = format!("{:<width$}", tag.to_plain_string(), width = TAG_WIDTH);
    match tag {
        LogTag::System => label.bright_yellow().bold(),
        LogTag::Holders => label.bright_green().bold(),
        LogTag::Sources => label.bright_cyan().bold(),
        LogTag::Cache => label.bright_blue().bold(),
        LogTag::RateLimit => label.bright_magenta().bold(),
        LogTag::Config => label.bright_white().bold(),
        LogTag::Webserver => label.bright_purple().bold(),
        LogTag::Test => label.blue().bold(),
        LogTag::Other(_) => label.white().bold(),
    }
}

/// Format log type with appropriate color
fn format_log_type(log_type: &str) -> ColoredString {
    let label = format!("{:<width$}", log_type, width = LOG_TYPE_WIDTH);
    match log_type.to_uppercase().as_str() {
        "ERROR" => label.bright_red().bold(),
        "WARNING" => label.bright_yellow().bold(),
        "DEBUG" | "VERBOSE" => label.dimmed(),
        _ => label.white().bold(),
    }
}

/// Print to stdout but ignore broken pipe errors
fn print_stdout_safe(message: &str) {
    if let Err(e) = writeln!(stdout(), "{}", message) {
        if e.kind() == ErrorKind::BrokenPipe {
            std::process::exit(0);
        }
        let _ = writeln!(std::io::stderr(), "Logger stdout error: {}", e);
    }
    if let Err(e) = stdout().flush() {
        if e.kind() == ErrorKind::BrokenPipe {
            std::process::exit(0);
        }
    }
}

/// Remove ANSI color codes from text
fn strip_ansi_codes(text: &str) -> String {
    let mut result = String::new();
    let mut in_escape = false;

    for ch in text.chars() {
        if ch == '\x1b' {
            in_escape = true;
        } else if in_escape && ch == 'm' {
            in_escape = false;
        } else if !in_escape {
            result.push(ch);
        }
    }
    result
}

/// Wrap text at word boundaries, respecting existing newlines
fn wrap_text(text: &str, max_width: usize) -> Vec<String> {
    let mut result = Vec::new();

    for line in text.split('\n') {
        let line_display_length = strip_ansi_codes(line).len();

        if line_display_length <= max_width {
            result.push(line.to_string());
        } else {
            let mut current_line = String::new();

            for word in line.split_whitespace() {
                let word_display_length = strip_ansi_codes(word).len();
                let current_display_length = strip_ansi_codes(&current_line).len();

                if word_display_length > max_width {
                    if !current_line.is_empty() {
                        result.push(current_line);
                        current_line = String::new();
                    }

                    let word_chunks = break_long_word(word, max_width);
                    for chunk in word_chunks {
                        result.push(chunk);
                    }
                } else if current_line.is_empty() {
                    current_line = word.to_string();
                } else if current_display_length + word_display_length + 1 <= max_width {
                    current_line.push(' ');
                    current_line.push_str(word);
                } else {
                    result.push(current_line);
                    current_line = word.to_string();
                }
            }

            if !current_line.is_empty() {
                result.push(current_line);
            }
        }
    }

    if result.is_empty() {
        result.push(String::new());
    }

    result
}

/// Characters a long token (URL, JSON) may be split after
const BREAK_CHARS: &[char] = &['/', '?', '&', '=', ':', '.', '-', '_', ',', '{', '}', '[', ']'];

/// Break a very long word into chunks of at most `max_width` chars,
/// preferring to split right after a separator in the second half
fn break_long_word(word: &str, max_width: usize) -> Vec<String> {
    let max_width = max_width.max(1);
    let chars: Vec<char> = word.chars().collect();
    let mut chunks = Vec::new();
    let mut start = 0;

    while start < chars.len() {
        let hard_end = (start + max_width).min(chars.len());
        if hard_end == chars.len() {
            chunks.push(chars[start..].iter().collect());
            break;
        }

        let end = (start + max_width / 2..hard_end)
            .rev()
            .find(|&i| BREAK_CHARS.contains(&chars[i]))
            .map(|i| i + 1)
            .unwrap_or(hard_end);
        chunks.push(chars[start..end].iter().collect());
        start = end;
    }

    chunks
}
