// An indenting, file-or-console logger built on the `log` crate's
// facade.
//
// Logging is compiled out unless built with the `logging` Cargo
// feature. With the feature off, `init()` never calls
// `log::set_logger`, so every `log::info!`/`log()` call in the crate
// hits `log`'s own built-in no-op -- there is nothing for this module
// to special-case. With the feature on, `init()` installs
// `IndentingLogger`, which writes to a file (or to stderr for the `-`
// sentinel) and prefixes each line with two spaces per indentation
// level.
use std::fs::File;
use std::io::Write;
use std::sync::Mutex;

use crate::error::SolverError;
use crate::utils;

const NUM_SPACES_PER_INDENTATION_LEVEL: usize = 2;

enum Sink {
    Stderr,
    File(File),
}

impl Write for Sink {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        match self {
            Sink::Stderr => std::io::stderr().write(buf),
            Sink::File(f) => f.write(buf),
        }
    }

    fn flush(&mut self) -> std::io::Result<()> {
        match self {
            Sink::Stderr => std::io::stderr().flush(),
            Sink::File(f) => f.flush(),
        }
    }
}

struct IndentingLogger {
    state: Mutex<LoggerState>,
}

struct LoggerState {
    sink: Option<Sink>,
    indentation_level: usize,
}

impl IndentingLogger {
    fn new() -> Self {
        IndentingLogger {
            state: Mutex::new(LoggerState {
                sink: None,
                indentation_level: 0,
            }),
        }
    }

    fn set_log_filepath(&self, log_filepath: &str) -> Result<(), SolverError> {
        let sink = if log_filepath == "-" {
            Sink::Stderr
        } else {
            let file = File::create(log_filepath)
                .map_err(|e| SolverError::InputFile(format!("{}: {e}", utils::quoted(log_filepath))))?;
            Sink::File(file)
        };

        self.state.lock().unwrap().sink = Some(sink);
        Ok(())
    }

    fn increment_indentation_level(&self) {
        self.state.lock().unwrap().indentation_level += 1;
    }

    fn decrement_indentation_level(&self) {
        let mut state = self.state.lock().unwrap();
        debug_assert!(state.indentation_level > 0);
        state.indentation_level -= 1;
    }

    fn log(&self, message: &str) {
        let mut state = self.state.lock().unwrap();

        let Some(sink) = state.sink.as_mut() else {
            return;
        };

        let num_spaces = state.indentation_level * NUM_SPACES_PER_INDENTATION_LEVEL;
        let indentation = " ".repeat(num_spaces);

        for line in utils::split_into_lines(message) {
            let _ = writeln!(sink, "{indentation}{line}");
        }
    }
}

impl log::Log for IndentingLogger {
    fn enabled(&self, _metadata: &log::Metadata) -> bool {
        true
    }

    fn log(&self, record: &log::Record) {
        self.log(&record.args().to_string());
    }

    fn flush(&self) {
        if let Some(sink) = self.state.lock().unwrap().sink.as_mut() {
            let _ = sink.flush();
        }
    }
}

lazy_static::lazy_static! {
    static ref LOGGER: IndentingLogger = IndentingLogger::new();
}

/// Install the crate's logger as the global `log` logger. A no-op
/// unless built with the `logging` feature.
pub fn init() {
    #[cfg(feature = "logging")]
    {
        let _ = log::set_logger(&*LOGGER).map(|()| log::set_max_level(log::LevelFilter::Trace));
    }
}

/// Direct the log to `log_filepath`, or to standard error if it is
/// `"-"`. Returns an error if the file cannot be created.
pub fn set_log_filepath(log_filepath: &str) -> Result<(), SolverError> {
    LOGGER.set_log_filepath(log_filepath)
}

pub fn increment_indentation_level() {
    LOGGER.increment_indentation_level();
}

pub fn decrement_indentation_level() {
    LOGGER.decrement_indentation_level();
}

/// Log `message`, which may contain several lines separated by `\n`.
/// Each line is written with the current indentation.
///
/// This goes through the `log` facade rather than `LOGGER` directly, so
/// it is a genuine no-op -- not just an empty sink -- unless `init()`
/// has registered `LOGGER` as the active logger.
pub fn log(message: &str) {
    log::info!("{message}");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn logging_to_a_fresh_logger_before_set_log_filepath_is_a_silent_no_op() {
        let logger = IndentingLogger::new();
        logger.log("hello");
    }

    #[test]
    fn indentation_levels_can_be_incremented_and_decremented() {
        let logger = IndentingLogger::new();
        logger.increment_indentation_level();
        logger.increment_indentation_level();
        logger.decrement_indentation_level();
        assert_eq!(logger.state.lock().unwrap().indentation_level, 1);
    }

    #[test]
    fn set_log_filepath_rejects_an_unwritable_path() {
        let logger = IndentingLogger::new();
        let result = logger.set_log_filepath("/this/directory/does/not/exist/out.log");
        assert!(result.is_err());
    }
}
