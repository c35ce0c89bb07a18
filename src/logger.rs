//! Structured logging system with visual formatting.
//!
//! Output is drawn with Unicode box characters so that a day or year report
//! reads as one connected block in the terminal. The logger can be switched
//! off at runtime (library consumers and noisy tests do this) and can be
//! redirected to a file, in which case ANSI colour codes are stripped.

use std::io::Write;
use std::sync::OnceLock;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{Sender, channel};

static LOGGING_ENABLED: AtomicBool = AtomicBool::new(true);

// Channel for routing output to file when --log-file is active
static LOG_CHANNEL: OnceLock<Option<Sender<LogMessage>>> = OnceLock::new();

enum LogMessage {
    Formatted(String),
    Shutdown,
}

/// Main logging interface providing structured output formatting.
///
/// ## Logging Conventions
///
/// - **`log_block_start!`** opens a new conceptual block (a computed day, a
///   year summary, a configuration report). Prints an empty `┃` spacer and
///   then `┣ message`.
/// - **`log_decorated!`** continues a block with `┣ message`.
/// - **`log_indented!`** prints nested detail lines as `┃   message`; interval
///   tables and qualifying dates use it.
/// - **`log_pipe!`** inserts a lone `┃` spacer, typically before a semantic
///   level message.
/// - **`log_version!`** / **`log_end!`** print the header and the final `╹`.
/// - **`log_info!`**, **`log_warning!`**, **`log_debug!`** carry a coloured
///   `[LEVEL]` tag; **`log_error_exit!`** closes the block with a red `[ERROR]`.
pub struct Log;

impl Log {
    /// Enable or disable logging.
    pub fn set_enabled(enabled: bool) {
        LOGGING_ENABLED.store(enabled, Ordering::SeqCst);
    }

    /// Check if logging is currently enabled.
    pub fn is_enabled() -> bool {
        LOGGING_ENABLED.load(Ordering::SeqCst)
    }

    /// Start file logging to the specified path.
    ///
    /// Everything written through the macros after this call goes to the file
    /// until the returned guard is dropped.
    pub fn start_file_logging(file_path: String) -> anyhow::Result<LoggerGuard> {
        let (tx, rx) = channel();

        LOG_CHANNEL
            .set(Some(tx.clone()))
            .map_err(|_| anyhow::anyhow!("Logger channel already initialized"))?;

        let handle = std::thread::spawn(move || {
            let mut file = std::fs::File::create(&file_path)?;

            loop {
                match rx.recv() {
                    Ok(LogMessage::Formatted(text)) => {
                        file.write_all(text.as_bytes())?;
                    }
                    Ok(LogMessage::Shutdown) | Err(_) => {
                        file.flush()?;
                        break;
                    }
                }
            }

            Ok::<(), anyhow::Error>(())
        });

        Ok(LoggerGuard {
            tx,
            handle: Some(handle),
        })
    }
}

/// Guard for file logging that flushes and joins the writer thread on drop.
pub struct LoggerGuard {
    tx: Sender<LogMessage>,
    handle: Option<std::thread::JoinHandle<anyhow::Result<()>>>,
}

impl Drop for LoggerGuard {
    fn drop(&mut self) {
        let _ = self.tx.send(LogMessage::Shutdown);
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

/// Remove `ESC [ ... m` colour sequences.
fn strip_ansi_codes(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch == '\x1b' && chars.peek() == Some(&'[') {
            chars.next();
            for ch in chars.by_ref() {
                if ch == 'm' {
                    break;
                }
            }
        } else {
            result.push(ch);
        }
    }

    result
}

// Public function that routes output (needed by macros)
pub fn write_output(text: &str) {
    if let Some(Some(tx)) = LOG_CHANNEL.get() {
        let _ = tx.send(LogMessage::Formatted(strip_ansi_codes(text)));
    } else {
        print!("{text}");
        let _ = std::io::stdout().flush();
    }
}

// # Logging Macros

/// Shared body of every logging macro: checks the switch, renders the
/// message and wraps it in the given line template (`{}` marks the message).
#[doc(hidden)]
#[macro_export]
macro_rules! __log_line {
    ($template:literal, $fmt:literal $($arg:tt)*) => {{
        use $crate::logger::Log;
        if Log::is_enabled() {
            let message = format!($fmt $($arg)*);
            $crate::logger::write_output(&format!($template, message));
        }
    }};
    ($template:literal, $expr:expr) => {{
        use $crate::logger::Log;
        if Log::is_enabled() {
            let expr = $expr;
            $crate::logger::write_output(&format!($template, expr));
        }
    }};
}

/// Log a decorated message, typically as part of an existing block.
#[macro_export]
macro_rules! log_decorated {
    ($($arg:tt)+) => {
        $crate::__log_line!("┣ {}\n", $($arg)+)
    };
}

/// Log an indented message for sub-items or details within a block.
#[macro_export]
macro_rules! log_indented {
    ($($arg:tt)+) => {
        $crate::__log_line!("┃   {}\n", $($arg)+)
    };
}

/// Log a visual pipe separator for vertical spacing.
#[macro_export]
macro_rules! log_pipe {
    () => {
        $crate::__log_line!("┃{}\n", "")
    };
}

/// Log a block start message, initiating a new conceptual block of information.
#[macro_export]
macro_rules! log_block_start {
    ($($arg:tt)+) => {
        $crate::__log_line!("┃\n┣ {}\n", $($arg)+)
    };
}

/// Log the application version header.
#[macro_export]
macro_rules! log_version {
    () => {
        $crate::__log_line!("┏ stargazer v{} ━━╸\n", env!("CARGO_PKG_VERSION"))
    };
}

/// Log the final termination marker.
#[macro_export]
macro_rules! log_end {
    () => {
        $crate::__log_line!("╹{}\n", "")
    };
}

/// Log a warning message with pipe prefix and yellow-colored text.
#[macro_export]
macro_rules! log_warning {
    ($($arg:tt)+) => {
        $crate::__log_line!("┣[\x1b[33mWARNING\x1b[0m] {}\n", $($arg)+)
    };
}

/// Log an error that terminates the current flow, closing the block with `┗`.
#[macro_export]
macro_rules! log_error_exit {
    ($($arg:tt)+) => {
        $crate::__log_line!("┃\n┗[\x1b[31mERROR\x1b[0m] {}\n", $($arg)+)
    };
}

/// Log an informational message with pipe prefix and green-colored text.
#[macro_export]
macro_rules! log_info {
    ($($arg:tt)+) => {
        $crate::__log_line!("┣[\x1b[32mINFO\x1b[0m] {}\n", $($arg)+)
    };
}

/// Log a debug/operational message with pipe prefix and green-colored text.
#[macro_export]
macro_rules! log_debug {
    ($($arg:tt)+) => {
        $crate::__log_line!("┣[\x1b[32mDEBUG\x1b[0m] {}\n", $($arg)+)
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_ansi_codes() {
        assert_eq!(
            strip_ansi_codes("┣[\x1b[33mWARNING\x1b[0m] low moon"),
            "┣[WARNING] low moon"
        );
        assert_eq!(strip_ansi_codes("plain text"), "plain text");
    }

    #[test]
    fn test_strip_keeps_lone_escape() {
        assert_eq!(strip_ansi_codes("a\x1bb"), "a\x1bb");
    }
}
