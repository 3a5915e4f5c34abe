use std::sync::Mutex;

use anyhow::anyhow;

/// Sink for human-readable scan diagnostics.
///
/// Components take `impl Logger` as a parameter instead of writing to a
/// global; tests capture output with [`VecLogger`].
pub trait Logger: Clone {
    fn log(&self, message: impl Into<String>);
    fn warn(&self, message: impl Into<String>) {
        self.log(format!("WARN: {}", message.into()));
    }
    fn error(&self, message: impl Into<String>) {
        self.log(format!("ERROR: {}", message.into()));
    }
}

impl<T: Logger> Logger for &T {
    fn log(&self, message: impl Into<String>) {
        (*self).log(message);
    }
}

/// Formats and logs only when the expression is cheap enough to always
/// evaluate; use for per-phase summaries, not per-file chatter.
#[macro_export]
macro_rules! logf {
    ($logger:expr, $($arg:tt)*) => {
        $crate::Logger::log(&$logger, format!($($arg)*))
    };
}

/// Logger that prints to stdout with seconds-since-start timestamps.
pub struct StdioLogger {
    zero_time: std::time::Instant,
}

impl Logger for &StdioLogger {
    fn log(&self, message: impl Into<String>) {
        let delta_time = std::time::Instant::now().duration_since(self.zero_time);
        println!("[{:>8.03}s] {}", delta_time.as_secs_f64(), message.into());
    }
}

impl StdioLogger {
    pub fn new() -> Self {
        Self {
            zero_time: std::time::Instant::now(),
        }
    }
}

impl Default for StdioLogger {
    fn default() -> Self {
        Self::new()
    }
}

/// Logger that discards everything. The library default when the caller
/// passes no logger of their own.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullLogger;

impl Logger for NullLogger {
    fn log(&self, _message: impl Into<String>) {}
}

/// Logger that accumulates messages in memory for assertions.
pub struct VecLogger {
    logs: Mutex<Vec<String>>,
}

impl Logger for &VecLogger {
    fn log(&self, message: impl Into<String>) {
        self.logs
            .lock()
            .expect("locking the logger array should not fail!")
            .push(message.into());
    }
}

impl VecLogger {
    pub fn new() -> Self {
        Self {
            logs: Mutex::new(Vec::new()),
        }
    }

    pub fn get_logs(self) -> Result<Vec<String>, anyhow::Error> {
        self.logs
            .try_lock()
            .map_err(|err| anyhow!("error unlocking VecLogger logs: {err}"))
            .map(|mut x| x.drain(0..).collect::<Vec<_>>())
    }
}

impl Default for VecLogger {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn vec_logger_captures_in_order() {
        let logger = VecLogger::new();
        {
            let l = &logger;
            l.log("first");
            l.warn("second");
            logf!(l, "third {}", 3);
        }
        assert_eq!(
            logger.get_logs().unwrap(),
            vec!["first", "WARN: second", "third 3"]
        );
    }
}
