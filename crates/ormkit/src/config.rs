use std::time::Duration;

use crate::decode::DecoderKind;

/// Default cap on the SQL text included in log events.
pub const DEFAULT_MAX_SQL_LENGTH: usize = 1000;

/// Configuration for [`Db`](crate::Db).
#[derive(Debug, Clone)]
pub struct DbConfig {
    /// Row decoding strategy.
    pub decoder: DecoderKind,
    /// Query timeout duration.
    pub query_timeout: Option<Duration>,
    /// Slow query threshold for alerting.
    pub slow_query_threshold: Option<Duration>,
    /// Whether to log every statement at debug level.
    pub log_sql: bool,
    /// Maximum SQL length in log events (`None` = no truncation).
    pub max_sql_length: Option<usize>,
}

impl Default for DbConfig {
    fn default() -> Self {
        Self {
            decoder: DecoderKind::Safe,
            query_timeout: None,
            slow_query_threshold: None,
            log_sql: true,
            max_sql_length: Some(DEFAULT_MAX_SQL_LENGTH),
        }
    }
}

impl DbConfig {
    /// Create a new configuration with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the row decoding strategy.
    pub fn decoder(mut self, decoder: DecoderKind) -> Self {
        self.decoder = decoder;
        self
    }

    /// Decode rows by writing directly at recorded field offsets.
    pub fn offset_decoder(mut self) -> Self {
        self.decoder = DecoderKind::Offset;
        self
    }

    /// Set query timeout.
    pub fn timeout(mut self, duration: Duration) -> Self {
        self.query_timeout = Some(duration);
        self
    }

    /// Set slow query threshold.
    pub fn slow_threshold(mut self, duration: Duration) -> Self {
        self.slow_query_threshold = Some(duration);
        self
    }

    /// Disable per-statement debug logging.
    pub fn no_logging(mut self) -> Self {
        self.log_sql = false;
        self
    }

    /// Set the maximum SQL length in log events.
    pub fn max_sql_length(mut self, len: usize) -> Self {
        self.max_sql_length = Some(len);
        self
    }

    /// Log SQL text in full.
    pub fn full_sql(mut self) -> Self {
        self.max_sql_length = None;
        self
    }

    /// Truncate `sql` for logging.
    pub(crate) fn truncate_sql<'a>(&self, sql: &'a str) -> std::borrow::Cow<'a, str> {
        match self.max_sql_length {
            Some(max) if sql.len() > max => {
                let mut end = max;
                while !sql.is_char_boundary(end) {
                    end -= 1;
                }
                format!("{}...", &sql[..end]).into()
            }
            _ => sql.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = DbConfig::default();
        assert_eq!(config.decoder, DecoderKind::Safe);
        assert!(config.query_timeout.is_none());
        assert!(config.log_sql);
        assert_eq!(config.max_sql_length, Some(DEFAULT_MAX_SQL_LENGTH));
    }

    #[test]
    fn builder_methods() {
        let config = DbConfig::new()
            .offset_decoder()
            .timeout(Duration::from_secs(5))
            .slow_threshold(Duration::from_millis(200))
            .no_logging();
        assert_eq!(config.decoder, DecoderKind::Offset);
        assert_eq!(config.query_timeout, Some(Duration::from_secs(5)));
        assert_eq!(config.slow_query_threshold, Some(Duration::from_millis(200)));
        assert!(!config.log_sql);
    }

    #[test]
    fn truncate_sql_respects_char_boundaries() {
        let config = DbConfig::new().max_sql_length(5);
        assert_eq!(config.truncate_sql("SELECT 1;"), "SELEC...");
        assert_eq!(config.truncate_sql("abc"), "abc");
        // `é` is two bytes; byte 5 falls inside it
        assert_eq!(config.truncate_sql("abcdé"), "abcd...");
        assert_eq!(DbConfig::new().full_sql().truncate_sql("SELECT 1;"), "SELECT 1;");
    }
}
