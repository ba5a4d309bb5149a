//! Statement builder: clause state in, `$n`-parameterized SQL plus arguments out.
//!
//! One [`StatementBuilder`] describes one logical statement. Terminal operations
//! (`build_select`, `build_insert`, `build_update`) consume it, so clause state can
//! never leak into a second statement.
//!
//! # Clause order
//!
//! SELECT text is emitted in a fixed order that differs from conventional SQL:
//!
//! ```text
//! SELECT <cols> FROM <table> [INNER JOIN ...] [LEFT JOIN ...] [GROUP BY ...]
//!     [ORDER BY ...] [WHERE ... AND ...] [OFFSET $n] [LIMIT $n]
//! ```
//!
//! Generated statements are compared byte-for-byte by callers, so this order is
//! part of the output contract. PostgreSQL itself rejects GROUP BY or ORDER BY
//! ahead of WHERE: a statement that combines predicates with grouping or ordering
//! builds fine but fails to prepare.
//!
//! # Identifiers
//!
//! Only values are parameterized. Table names, column names, join columns and
//! operators are pasted into the SQL text as given: never pass untrusted input
//! as an identifier or operator.
//!
//! # Example
//!
//! ```
//! use pgfluent::{StatementBuilder, Value};
//!
//! let stmt = StatementBuilder::new("test")
//!     .filter("id", "=", 1)
//!     .order_by(&["id"])
//!     .limit(5)
//!     .build_select(&["id", "name"])
//!     .unwrap();
//!
//! assert_eq!(stmt.sql(), "SELECT id,name FROM test ORDER BY id WHERE id = $1 LIMIT $2");
//! assert_eq!(stmt.args(), &[Value::Int(1), Value::Int(5)]);
//! ```

mod assemble;

#[cfg(test)]
mod tests;

use crate::error::{FluentError, FluentResult};
use crate::value::Value;
use assemble::Assembler;
use std::fmt;
use tokio_postgres::types::ToSql;

/// `JOIN <table> ON <left> = <right>`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Join {
    pub table: String,
    pub left: String,
    pub right: String,
}

/// `<column> <operator> $n`
#[derive(Debug, Clone, PartialEq)]
pub struct Filter {
    pub column: String,
    pub operator: String,
    pub value: Value,
}

/// `<column> IS [NOT] NULL`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NullFilter {
    pub column: String,
    pub is_null: bool,
}

/// Clause state for one statement.
#[derive(Debug, Clone, Default)]
#[must_use]
pub struct StatementBuilder {
    table: String,
    joins: Vec<Join>,
    left_joins: Vec<Join>,
    filters: Vec<Filter>,
    null_filters: Vec<NullFilter>,
    group_by: Vec<String>,
    order_by: Vec<String>,
    limit: Option<i64>,
    offset: Option<i64>,
    returning: Option<String>,
    /// First validation failure, reported by the terminal operation.
    build_error: Option<String>,
}

impl StatementBuilder {
    /// Start a statement on `table` (may carry an alias, e.g. `"users u"`).
    pub fn new(table: &str) -> Self {
        Self {
            table: table.to_string(),
            ..Default::default()
        }
    }

    // ==================== JOIN ====================

    /// Add `INNER JOIN table ON left = right`.
    pub fn join(mut self, table: &str, left: &str, right: &str) -> Self {
        if let Some(join) = self.validated_join("join", table, left, right) {
            self.joins.push(join);
        }
        self
    }

    /// Add `LEFT JOIN table ON left = right`.
    pub fn left_join(mut self, table: &str, left: &str, right: &str) -> Self {
        if let Some(join) = self.validated_join("left join", table, left, right) {
            self.left_joins.push(join);
        }
        self
    }

    // ==================== WHERE ====================

    /// Add `column operator $n`; the value is bound as-is.
    pub fn filter(mut self, column: &str, operator: &str, value: impl Into<Value>) -> Self {
        if column.trim().is_empty() || operator.trim().is_empty() {
            self.record_error(format!(
                "filter needs a column and an operator, got ({column:?}, {operator:?})"
            ));
            return self;
        }
        self.filters.push(Filter {
            column: column.to_string(),
            operator: operator.to_string(),
            value: value.into(),
        });
        self
    }

    /// Add `column IS NULL` (or `IS NOT NULL` when `is_null` is false).
    pub fn where_null(mut self, column: &str, is_null: bool) -> Self {
        if column.trim().is_empty() {
            self.record_error("null filter needs a column".to_string());
            return self;
        }
        self.null_filters.push(NullFilter {
            column: column.to_string(),
            is_null,
        });
        self
    }

    // ==================== Grouping / ordering / paging ====================

    /// Replace the GROUP BY columns.
    pub fn group_by(mut self, columns: &[&str]) -> Self {
        self.group_by = columns.iter().map(|c| c.to_string()).collect();
        self
    }

    /// Replace the ORDER BY columns (each may carry `ASC`/`DESC`).
    pub fn order_by(mut self, columns: &[&str]) -> Self {
        self.order_by = columns.iter().map(|c| c.to_string()).collect();
        self
    }

    /// Set LIMIT; only emitted when greater than zero.
    pub fn limit(mut self, limit: i64) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Set OFFSET; only emitted when greater than zero.
    pub fn offset(mut self, offset: i64) -> Self {
        self.offset = Some(offset);
        self
    }

    /// Append `RETURNING column` to INSERT statements.
    pub fn returning(mut self, column: &str) -> Self {
        self.returning = Some(column.to_string());
        self
    }

    // ==================== Accessors ====================

    pub fn table(&self) -> &str {
        &self.table
    }

    pub fn filters(&self) -> &[Filter] {
        &self.filters
    }

    pub fn null_filters(&self) -> &[NullFilter] {
        &self.null_filters
    }

    /// Whether the statement would carry a WHERE clause.
    pub fn has_predicates(&self) -> bool {
        !self.filters.is_empty() || !self.null_filters.is_empty()
    }

    // ==================== Terminals ====================

    /// Build `SELECT <columns> FROM <table> ...`.
    pub fn build_select(self, columns: &[&str]) -> FluentResult<SqlStatement> {
        self.validate()?;
        if columns.is_empty() {
            return Err(FluentError::malformed("SELECT needs at least one column"));
        }

        let mut asm = Assembler::new(format!("SELECT {} FROM {}", columns.join(","), self.table));
        asm.push_joins("INNER JOIN", &self.joins);
        asm.push_joins("LEFT JOIN", &self.left_joins);
        asm.push_list("GROUP BY", &self.group_by);
        asm.push_list("ORDER BY", &self.order_by);
        asm.push_filters(self.filters);
        asm.push_null_filters(&self.null_filters);
        asm.push_offset(self.offset);
        asm.push_limit(self.limit);
        Ok(asm.finish())
    }

    /// Build `INSERT INTO <table> (<columns>) VALUES ($1, ..., $n)`.
    ///
    /// Filters, ordering and paging do not apply to INSERT and are ignored.
    pub fn build_insert(self, columns: &[&str], args: Vec<Value>) -> FluentResult<SqlStatement> {
        self.validate()?;
        validate_payload("INSERT", columns, &args)?;

        let mut asm = Assembler::new(format!(
            "INSERT INTO {} ({})",
            self.table,
            columns.join(",")
        ));
        asm.push_values(args);
        if let Some(column) = &self.returning {
            asm.push_returning(column);
        }
        Ok(asm.finish())
    }

    /// Build `UPDATE <table> SET col = $1, ...` followed by any WHERE predicates.
    ///
    /// An UPDATE without filters touches every row; that is left to the caller.
    pub fn build_update(self, columns: &[&str], args: Vec<Value>) -> FluentResult<SqlStatement> {
        self.validate()?;
        validate_payload("UPDATE", columns, &args)?;

        let mut asm = Assembler::new(format!("UPDATE {} SET", self.table));
        asm.push_set(columns, args);
        asm.push_filters(self.filters);
        asm.push_null_filters(&self.null_filters);
        Ok(asm.finish())
    }

    // ==================== Internals ====================

    fn validated_join(&mut self, kind: &str, table: &str, left: &str, right: &str) -> Option<Join> {
        if [table, left, right].iter().any(|part| part.trim().is_empty()) {
            self.record_error(format!(
                "{kind} needs a table and two columns, got ({table:?}, {left:?}, {right:?})"
            ));
            return None;
        }
        Some(Join {
            table: table.to_string(),
            left: left.to_string(),
            right: right.to_string(),
        })
    }

    fn record_error(&mut self, message: String) {
        #[cfg(feature = "tracing")]
        tracing::debug!(target: "pgfluent.builder", table = %self.table, "{message}");
        if self.build_error.is_none() {
            self.build_error = Some(message);
        }
    }

    fn validate(&self) -> FluentResult<()> {
        if let Some(message) = &self.build_error {
            return Err(FluentError::malformed(message.clone()));
        }
        if self.table.trim().is_empty() {
            return Err(FluentError::malformed("table name is empty"));
        }
        Ok(())
    }
}

fn validate_payload(kind: &str, columns: &[&str], args: &[Value]) -> FluentResult<()> {
    if columns.is_empty() {
        return Err(FluentError::malformed(format!(
            "{kind} needs at least one column, the payload has no set fields"
        )));
    }
    if columns.len() != args.len() {
        return Err(FluentError::malformed(format!(
            "{kind} has {} columns but {} arguments",
            columns.len(),
            args.len()
        )));
    }
    Ok(())
}

/// A finished statement: SQL text and positional arguments (`args[i]` binds `$i+1`).
#[derive(Debug, Clone, PartialEq)]
pub struct SqlStatement {
    sql: String,
    args: Vec<Value>,
}

impl SqlStatement {
    /// Wrap hand-written SQL and its arguments.
    pub fn new(sql: impl Into<String>, args: Vec<Value>) -> Self {
        Self {
            sql: sql.into(),
            args,
        }
    }

    pub fn sql(&self) -> &str {
        &self.sql
    }

    pub fn args(&self) -> &[Value] {
        &self.args
    }

    /// Arguments as driver parameters.
    pub fn params(&self) -> Vec<&(dyn ToSql + Sync)> {
        self.args.iter().map(|v| v as &(dyn ToSql + Sync)).collect()
    }

    pub fn into_parts(self) -> (String, Vec<Value>) {
        (self.sql, self.args)
    }
}

impl fmt::Display for SqlStatement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.sql)
    }
}
