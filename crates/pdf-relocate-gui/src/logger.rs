use chrono::{DateTime, Local};
use log::{Level, LevelFilter, Metadata, Record};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard};

#[derive(Clone)]
pub struct LogEntry {
    pub timestamp: DateTime<Local>,
    pub level: Level,
    pub message: String,
}

/// In-memory logger feeding the log panel
///
/// Keeps at most `max_entries`, dropping the oldest first.
#[derive(Clone)]
pub struct AppLogger {
    entries: Arc<Mutex<VecDeque<LogEntry>>>,
    max_entries: usize,
    level: LevelFilter,
}

impl AppLogger {
    pub fn new(max_entries: usize) -> Self {
        Self {
            entries: Arc::new(Mutex::new(VecDeque::new())),
            max_entries,
            level: LevelFilter::Info,
        }
    }

    pub fn init(self) -> Result<(), log::SetLoggerError> {
        let level = self.level;
        log::set_boxed_logger(Box::new(self))?;
        log::set_max_level(level);
        Ok(())
    }

    // A panic while logging must not take the log panel down with it
    fn lock(&self) -> MutexGuard<'_, VecDeque<LogEntry>> {
        self.entries.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn entries(&self) -> Vec<LogEntry> {
        self.lock().iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn clear(&self) {
        self.lock().clear();
    }
}

impl log::Log for AppLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }

        let mut entries = self.lock();
        entries.push_back(LogEntry {
            timestamp: Local::now(),
            level: record.level(),
            message: format!("{}", record.args()),
        });
        while entries.len() > self.max_entries {
            entries.pop_front();
        }
    }

    fn flush(&self) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use log::Log;

    fn emit(logger: &AppLogger, level: Level, message: &str) {
        logger.log(
            &Record::builder()
                .level(level)
                .args(format_args!("{}", message))
                .build(),
        );
    }

    #[test]
    fn test_keeps_most_recent_entries() {
        let logger = AppLogger::new(3);
        for i in 0..5 {
            emit(&logger, Level::Info, &format!("entry {}", i));
        }

        let messages: Vec<String> = logger.entries().into_iter().map(|e| e.message).collect();
        assert_eq!(messages, vec!["entry 2", "entry 3", "entry 4"]);
    }

    #[test]
    fn test_filters_debug_and_clears() {
        let logger = AppLogger::new(10);
        emit(&logger, Level::Debug, "hidden");
        emit(&logger, Level::Warn, "shown");
        assert_eq!(logger.len(), 1);
        assert_eq!(logger.entries()[0].level, Level::Warn);

        logger.clear();
        assert_eq!(logger.len(), 0);
    }
}
