//! Statement logging through `tracing`.

use crate::config::FluentConfig;
use crate::value::Value;
use tracing::Level;

/// Emits executed statements as `tracing` events on the `pgfluent.sql` target.
///
/// Used by [`Fluent`](crate::Fluent) when debug mode is on; available on its own
/// for callers running statements through their own executor.
#[derive(Debug, Clone)]
pub struct SqlLogger {
    /// Tracing event level to emit at.
    pub level: Level,
    /// Truncate long SQL strings (in bytes). `None` means no truncation.
    pub max_sql_length: Option<usize>,
}

impl Default for SqlLogger {
    fn default() -> Self {
        Self {
            level: Level::DEBUG,
            max_sql_length: Some(200),
        }
    }
}

impl SqlLogger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Level and truncation taken from a [`FluentConfig`].
    pub fn from_config(config: &FluentConfig) -> Self {
        Self {
            level: config.log_level.into(),
            max_sql_length: (config.max_sql_length > 0).then_some(config.max_sql_length),
        }
    }

    pub fn level(mut self, level: Level) -> Self {
        self.level = level;
        self
    }

    pub fn max_sql_length(mut self, len: usize) -> Self {
        self.max_sql_length = Some(len);
        self
    }

    pub fn no_truncate(mut self) -> Self {
        self.max_sql_length = None;
        self
    }

    fn truncate_sql(&self, sql: &str) -> String {
        match self.max_sql_length {
            Some(max) if sql.len() > max => format!("{}...", truncate_bytes(sql, max)),
            _ => sql.to_string(),
        }
    }

    /// Log one statement. `kind` names the operation (`select`, `insert`, `update`).
    pub fn log(&self, kind: &str, sql: &str, args: &[Value], rows: Option<u64>) {
        macro_rules! emit_at_level {
            ($level:expr, $($field:tt)*) => {
                match $level {
                    Level::ERROR => tracing::error!($($field)*),
                    Level::WARN  => tracing::warn!($($field)*),
                    Level::INFO  => tracing::info!($($field)*),
                    Level::DEBUG => tracing::debug!($($field)*),
                    Level::TRACE => tracing::trace!($($field)*),
                }
            };
        }

        let sql = self.truncate_sql(sql);
        emit_at_level!(
            self.level,
            target: "pgfluent.sql",
            kind,
            param_count = args.len(),
            rows,
            sql = %sql,
            args = ?args,
        );
    }
}

fn truncate_bytes(sql: &str, max_bytes: usize) -> &str {
    if sql.len() <= max_bytes {
        return sql;
    }
    let mut end = max_bytes;
    while end > 0 && !sql.is_char_boundary(end) {
        end -= 1;
    }
    &sql[..end]
}
