use chrono::Local;
use log::{Level, LevelFilter, Metadata, Record};
use std::io::Write;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Timestamped log lines on stderr, counting warnings for the final report
#[derive(Clone)]
pub struct ConsoleLogger {
    level: LevelFilter,
    warnings: Arc<AtomicUsize>,
}

impl ConsoleLogger {
    /// `verbosity` 0 shows info and above, 1 debug, 2 or more trace
    pub fn new(verbosity: u8) -> Self {
        let level = match verbosity {
            0 => LevelFilter::Info,
            1 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        };
        Self {
            level,
            warnings: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn init(self) -> Result<(), log::SetLoggerError> {
        let level = self.level;
        log::set_boxed_logger(Box::new(self))?;
        log::set_max_level(level);
        Ok(())
    }

    pub fn warning_count(&self) -> usize {
        self.warnings.load(Ordering::Relaxed)
    }
}

impl log::Log for ConsoleLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        if record.level() == Level::Warn {
            self.warnings.fetch_add(1, Ordering::Relaxed);
        }

        let mut stderr = std::io::stderr().lock();
        let _ = writeln!(
            stderr,
            "{} {:<5} {}",
            Local::now().format("%H:%M:%S%.3f"),
            record.level(),
            record.args()
        );
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use log::Log;

    #[test]
    fn test_verbosity_levels() {
        assert_eq!(ConsoleLogger::new(0).level, LevelFilter::Info);
        assert_eq!(ConsoleLogger::new(1).level, LevelFilter::Debug);
        assert_eq!(ConsoleLogger::new(5).level, LevelFilter::Trace);
    }

    #[test]
    fn test_warnings_are_counted_across_clones() {
        let logger = ConsoleLogger::new(0);
        let installed = logger.clone();
        installed.log(
            &Record::builder()
                .level(Level::Warn)
                .args(format_args!("careful"))
                .build(),
        );
        installed.log(
            &Record::builder()
                .level(Level::Debug)
                .args(format_args!("hidden"))
                .build(),
        );
        assert_eq!(logger.warning_count(), 1);
    }
}
