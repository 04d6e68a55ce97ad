use std::sync::{Arc, Mutex};

use chrono::Utc;
use hex_conservative::DisplayHex;
use log::{LevelFilter, Log, Metadata, Record, SetLoggerError};

pub(crate) const MAX_LOG_ITEMS: usize = 10_000;

/// Keeps the most recent log lines in memory so a wallet can attach them to a bug report.
#[derive(Clone)]
pub struct PayReqLogger {
    pub session_id: String,
    level: LevelFilter,
    memory_logs: Arc<Mutex<Vec<String>>>,
}

impl PayReqLogger {
    pub fn new(level: LevelFilter, session_id: Option<String>) -> Self {
        Self {
            session_id: session_id.unwrap_or_else(gen_session_id),
            level,
            memory_logs: Arc::new(Mutex::new(vec![])),
        }
    }

    /// Installs a logger as the global `log` backend and returns a handle to its buffer.
    pub fn init(level: LevelFilter) -> Result<PayReqLogger, SetLoggerError> {
        let logger = PayReqLogger::new(level, None);
        log::set_boxed_logger(Box::new(logger.clone()))?;
        log::set_max_level(level);
        Ok(logger)
    }

    /// Buffered log lines, oldest first.
    pub fn get_logs(&self) -> Vec<String> {
        match self.memory_logs.lock() {
            Ok(logs) => logs.clone(),
            Err(_) => vec![],
        }
    }

    fn push(&self, line: String) {
        if let Ok(mut memory_logs) = self.memory_logs.lock() {
            memory_logs.push(line);
            if memory_logs.len() > MAX_LOG_ITEMS {
                let overflow = memory_logs.len() - MAX_LOG_ITEMS;
                memory_logs.drain(..overflow);
            }
        }
    }
}

impl Default for PayReqLogger {
    fn default() -> Self {
        Self::new(LevelFilter::Debug, None)
    }
}

fn gen_session_id() -> String {
    let mut entropy = [0u8; 2];
    // an all zero id only makes sessions harder to tell apart
    let _ = getrandom::getrandom(&mut entropy);
    entropy.to_lower_hex_string()
}

impl Log for PayReqLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }

        let line = format!(
            "{} {} {:<5} [{}:{}] {}",
            self.session_id,
            Utc::now().format("%Y-%m-%d %H:%M:%S%.3f"),
            record.level(),
            record.module_path().unwrap_or_default(),
            record.line().unwrap_or_default(),
            record.args()
        );
        self.push(line);
    }

    fn flush(&self) {}
}

#[cfg(test)]
mod test {
    use super::*;
    use log::Level;

    fn record(logger: &PayReqLogger, level: Level, message: &str) {
        logger.log(
            &Record::builder()
                .args(format_args!("{message}"))
                .level(level)
                .module_path(Some("payreq_core::test"))
                .line(Some(7))
                .build(),
        );
    }

    #[test]
    fn test_session_id() {
        let logger = PayReqLogger::default();
        assert_eq!(logger.session_id.len(), 4);

        let logger = PayReqLogger::new(LevelFilter::Info, Some("abcd".to_string()));
        assert_eq!(logger.session_id, "abcd");
    }

    #[test]
    fn test_log_line_format() {
        let logger = PayReqLogger::new(LevelFilter::Debug, Some("beef".to_string()));
        record(&logger, Level::Debug, "decoded invoice");

        let logs = logger.get_logs();
        assert_eq!(logs.len(), 1);
        assert!(logs[0].starts_with("beef "));
        assert!(logs[0].ends_with("DEBUG [payreq_core::test:7] decoded invoice"));
    }

    #[test]
    fn test_level_filter() {
        let logger = PayReqLogger::new(LevelFilter::Warn, None);
        record(&logger, Level::Debug, "skipped");
        record(&logger, Level::Warn, "kept");

        let logs = logger.get_logs();
        assert_eq!(logs.len(), 1);
        assert!(logs[0].ends_with("kept"));
    }

    #[test]
    fn test_buffer_is_capped() {
        let logger = PayReqLogger::new(LevelFilter::Trace, None);
        for i in 0..MAX_LOG_ITEMS + 5 {
            record(&logger, Level::Trace, &i.to_string());
        }

        let logs = logger.get_logs();
        assert_eq!(logs.len(), MAX_LOG_ITEMS);
        assert!(logs[0].ends_with(" 5"));
        assert!(logs[MAX_LOG_ITEMS - 1].ends_with(&format!(" {}", MAX_LOG_ITEMS + 4)));
    }
}
