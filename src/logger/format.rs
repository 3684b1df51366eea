//! Log formatting and output with ANSI colors and text wrapping
//!
//! Log lines go to stderr so that table/JSON output on stdout stays clean
//! when piped.

use super::tags::LogTag;
use chrono::Local;
use colored::*;
use std::io::{stderr, ErrorKind, Write};

const LOG_SHOW_TIME: bool = true;

/// Log format widths for alignment
const TAG_WIDTH: usize = 9;
const LOG_TYPE_WIDTH: usize = 8;
const BRACKET_SPACE_WIDTH: usize = 3;
const TOTAL_PREFIX_WIDTH: usize = TAG_WIDTH + LOG_TYPE_WIDTH + BRACKET_SPACE_WIDTH * 2;

/// Maximum line length before wrapping
const MAX_LINE_LENGTH: usize = 145;

/// Format and output a log message
pub fn format_and_log(tag: LogTag, log_type: &str, message: &str) {
    let prefix = if LOG_SHOW_TIME {
        format!("{} ", Local::now().format("%H:%M:%S"))
            .dimmed()
            .to_string()
    } else {
        String::new()
    };

    let base_line = format!(
        "{}[{}] [{}] ",
        prefix,
        format_tag(&tag),
        format_log_type(log_type)
    );

    let base_length = strip_ansi_codes(&base_line)
        .len()
        .max(TOTAL_PREFIX_WIDTH);
    let available_space = if MAX_LINE_LENGTH > base_length {
        MAX_LINE_LENGTH - base_length
    } else {
        50
    };

    let chunks = wrap_text(message, available_space);
    print_stderr_safe(&format!("{}{}", base_line, chunks[0]));

    if chunks.len() > 1 {
        let continuation_prefix = " ".repeat(base_length);
        for chunk in &chunks[1..] {
            print_stderr_safe(&format!("{}{}", continuation_prefix, chunk));
        }
    }
}

fn format_tag(tag: &LogTag) -> ColoredString {
    let label = format!("{:<width$}", tag.to_plain_string(), width = TAG_WIDTH);
    match tag {
        LogTag::System => label.bright_yellow().bold(),
        LogTag::Config => label.bright_white().bold(),
        LogTag::Tokens => label.bright_cyan().bold(),
        LogTag::Scoring => label.bright_green().bold(),
        LogTag::Dedup => label.bright_red().bold(),
        LogTag::Ranking => label.bright_magenta().bold(),
        LogTag::Filtering => label.bright_yellow().bold(),
        LogTag::Search => label.bright_blue().bold(),
        LogTag::Session => label.bright_purple().bold(),
        LogTag::Test => label.bright_blue().bold(),
        LogTag::Other(_) => label.white().bold(),
    }
}

fn format_log_type(log_type: &str) -> ColoredString {
    let padded = format!("{:<width$}", log_type, width = LOG_TYPE_WIDTH);
    match log_type.to_uppercase().as_str() {
        "ERROR" => padded.bright_red().bold(),
        "WARNING" => padded.bright_yellow().bold(),
        "DEBUG" | "VERBOSE" => padded.dimmed(),
        _ => padded.white().bold(),
    }
}

/// Write to stderr, exiting quietly on a closed pipe
fn print_stderr_safe(message: &str) {
    let mut handle = stderr();
    if let Err(e) = writeln!(handle, "{}", message) {
        if e.kind() == ErrorKind::BrokenPipe {
            std::process::exit(0);
        }
    }
    let _ = handle.flush();
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
        if line.chars().count() <= max_width {
            result.push(line.to_string());
            continue;
        }

        let mut current_line = String::new();
        for word in line.split_whitespace() {
            let word_len = word.chars().count();
            let current_len = current_line.chars().count();

            if word_len > max_width {
                if !current_line.is_empty() {
                    result.push(std::mem::take(&mut current_line));
                }
                result.extend(break_long_word(word, max_width));
            } else if current_line.is_empty() {
                current_line = word.to_string();
            } else if current_len + word_len + 1 <= max_width {
                current_line.push(' ');
                current_line.push_str(word);
            } else {
                result.push(std::mem::replace(&mut current_line, word.to_string()));
            }
        }

        if !current_line.is_empty() {
            result.push(current_line);
        }
    }

    if result.is_empty() {
        result.push(String::new());
    }

    result
}

/// Break a very long word (addresses, URLs) into fixed-width chunks
fn break_long_word(word: &str, max_width: usize) -> Vec<String> {
    let width = max_width.max(1);
    let chars: Vec<char> = word.chars().collect();
    chars
        .chunks(width)
        .map(|chunk| chunk.iter().collect())
        .collect()
}
