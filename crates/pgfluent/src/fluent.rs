//! Chainable façade: builder, executor and mapper wired together.

use crate::builder::{SqlStatement, StatementBuilder};
use crate::client::Executor;
use crate::config::FluentConfig;
use crate::error::{FluentError, FluentResult};
use crate::mapper::{RowMap, Tagged, extract_columns, scan_all, scan_one};
use crate::value::Value;

#[cfg(feature = "tracing")]
use crate::log::SqlLogger;

/// Entry point holding an [`Executor`] and the configuration.
///
/// Every [`table`](Self::table) call starts a fresh statement, so one `Fluent` can be
/// shared by concurrent callers.
///
/// ```ignore
/// let db = Fluent::new(PoolExecutor::new(pool)).debug(true);
///
/// let mut users: Vec<User> = Vec::new();
/// db.table("users")
///     .filter("is_active", "=", true)
///     .order_by(&["id"])
///     .limit(10)
///     .get(&["id", "name"])
///     .all(&mut users)
///     .await?;
/// ```
#[derive(Clone)]
pub struct Fluent<E> {
    executor: E,
    config: FluentConfig,
    #[cfg(feature = "tracing")]
    logger: SqlLogger,
}

impl<E: Executor> Fluent<E> {
    pub fn new(executor: E) -> Self {
        Self::with_config(executor, FluentConfig::default())
    }

    pub fn with_config(executor: E, config: FluentConfig) -> Self {
        Self {
            executor,
            #[cfg(feature = "tracing")]
            logger: SqlLogger::from_config(&config),
            config,
        }
    }

    /// Log every executed statement and its arguments.
    pub fn debug(mut self, status: bool) -> Self {
        self.config.debug = status;
        self
    }

    pub fn is_debug(&self) -> bool {
        self.config.debug
    }

    pub fn config(&self) -> &FluentConfig {
        &self.config
    }

    pub fn executor(&self) -> &E {
        &self.executor
    }

    /// Start a statement on `table`.
    pub fn table(&self, table: &str) -> Query<'_, E> {
        Query {
            db: self,
            builder: StatementBuilder::new(table),
        }
    }

    async fn run_execute(&self, kind: &str, stmt: &SqlStatement) -> FluentResult<u64> {
        let result = self.executor.execute(stmt.sql(), stmt.args()).await;
        self.log(kind, stmt, result.as_ref().ok().copied());
        result
    }

    async fn run_query(&self, kind: &str, stmt: &SqlStatement) -> FluentResult<Vec<RowMap>> {
        let result = self.executor.query(stmt.sql(), stmt.args()).await;
        self.log(kind, stmt, result.as_ref().ok().map(|rows| rows.len() as u64));
        result
    }

    #[cfg(feature = "tracing")]
    fn log(&self, kind: &str, stmt: &SqlStatement, rows: Option<u64>) {
        if self.config.debug {
            self.logger.log(kind, stmt.sql(), stmt.args(), rows);
        }
    }

    #[cfg(not(feature = "tracing"))]
    fn log(&self, _kind: &str, _stmt: &SqlStatement, _rows: Option<u64>) {}
}

/// Clause state for one statement started by [`Fluent::table`].
#[must_use]
pub struct Query<'f, E> {
    db: &'f Fluent<E>,
    builder: StatementBuilder,
}

impl<'f, E: Executor> Query<'f, E> {
    pub fn join(mut self, table: &str, left: &str, right: &str) -> Self {
        self.builder = self.builder.join(table, left, right);
        self
    }

    pub fn left_join(mut self, table: &str, left: &str, right: &str) -> Self {
        self.builder = self.builder.left_join(table, left, right);
        self
    }

    pub fn filter(mut self, column: &str, operator: &str, value: impl Into<Value>) -> Self {
        self.builder = self.builder.filter(column, operator, value);
        self
    }

    pub fn where_null(mut self, column: &str, is_null: bool) -> Self {
        self.builder = self.builder.where_null(column, is_null);
        self
    }

    pub fn order_by(mut self, columns: &[&str]) -> Self {
        self.builder = self.builder.order_by(columns);
        self
    }

    pub fn group_by(mut self, columns: &[&str]) -> Self {
        self.builder = self.builder.group_by(columns);
        self
    }

    pub fn limit(mut self, limit: i64) -> Self {
        self.builder = self.builder.limit(limit);
        self
    }

    pub fn offset(mut self, offset: i64) -> Self {
        self.builder = self.builder.offset(offset);
        self
    }

    pub fn returning(mut self, column: &str) -> Self {
        self.builder = self.builder.returning(column);
        self
    }

    /// Select `columns`; rows are fetched by the returned [`Select`].
    pub fn get(self, columns: &[&str]) -> Select<'f, E> {
        Select {
            db: self.db,
            builder: self.builder,
            columns: columns.iter().map(|c| c.to_string()).collect(),
        }
    }

    /// The INSERT statement for the set fields of `source`.
    pub fn to_insert<T: Tagged>(self, source: &T) -> FluentResult<SqlStatement> {
        let (columns, args) = extract_columns(source);
        self.builder.build_insert(&columns, args)
    }

    /// The UPDATE statement for the set fields of `source`, limited by the filters.
    pub fn to_update<T: Tagged>(self, source: &T) -> FluentResult<SqlStatement> {
        let (columns, args) = extract_columns(source);
        self.builder.build_update(&columns, args)
    }

    /// Insert the set fields of `source`; returns the affected row count.
    pub async fn insert<T: Tagged>(self, source: &T) -> FluentResult<u64> {
        let db = self.db;
        let stmt = self.to_insert(source)?;
        db.run_execute("insert", &stmt).await
    }

    /// Insert the set fields of `source` and return `column` of the new row.
    pub async fn insert_returning<T: Tagged>(self, source: &T, column: &str) -> FluentResult<Value> {
        let db = self.db;
        let stmt = self.returning(column).to_insert(source)?;
        let rows = db.run_query("insert", &stmt).await?;
        let row = rows
            .into_iter()
            .next()
            .ok_or_else(|| FluentError::not_found("INSERT returned no row"))?;
        returned_value(row, column)
    }

    /// Update the rows matching the filters with the set fields of `source`.
    ///
    /// Without filters every row of the table is updated.
    pub async fn update<T: Tagged>(self, source: &T) -> FluentResult<u64> {
        let db = self.db;
        let stmt = self.to_update(source)?;
        db.run_execute("update", &stmt).await
    }
}

// The server reports the bare column name for `RETURNING t.id`.
fn returned_value(mut row: RowMap, column: &str) -> FluentResult<Value> {
    if let Some(value) = row.remove(column) {
        return Ok(value);
    }
    let bare = column.rsplit('.').next().unwrap_or(column);
    row.remove(bare).ok_or_else(|| {
        FluentError::not_found(format!("returned row has no column {column:?}"))
    })
}

/// A built SELECT waiting to be fetched.
#[must_use]
pub struct Select<'f, E> {
    db: &'f Fluent<E>,
    builder: StatementBuilder,
    columns: Vec<String>,
}

impl<E: Executor> Select<'_, E> {
    /// The statement that would be executed.
    pub fn statement(&self) -> FluentResult<SqlStatement> {
        self.builder.clone().build_select(&self.column_refs())
    }

    fn column_refs(&self) -> Vec<&str> {
        self.columns.iter().map(String::as_str).collect()
    }

    /// Fetch the decoded rows without mapping them.
    pub async fn rows(self) -> FluentResult<Vec<RowMap>> {
        let stmt = self.statement()?;
        self.db.run_query("select", &stmt).await
    }

    /// Map the returned rows onto `target`, in order.
    ///
    /// No rows leaves `target` untouched and is not an error. With several rows the
    /// later ones overwrite what the earlier ones set.
    pub async fn one<T: Tagged>(self, target: &mut T) -> FluentResult<()> {
        let rows = self.rows().await?;
        rows.iter().try_for_each(|row| scan_one(target, row))
    }

    /// Append one element per returned row to `targets`.
    ///
    /// All or nothing: if any row fails to map, `targets` is left as it was.
    pub async fn all<T: Tagged + Default>(self, targets: &mut Vec<T>) -> FluentResult<()> {
        let rows = self.rows().await?;
        let mut mapped = Vec::with_capacity(rows.len());
        for row in &rows {
            scan_all(&mut mapped, row)?;
        }
        targets.extend(mapped);
        Ok(())
    }

    /// [`one`](Self::one) into a fresh `T::default()`.
    ///
    /// Fails with [`FluentError::NotFound`] when no row comes back.
    pub async fn fetch_one<T: Tagged + Default>(self) -> FluentResult<T> {
        let rows = self.rows().await?;
        if rows.is_empty() {
            return Err(FluentError::not_found("SELECT returned no rows"));
        }
        let mut target = T::default();
        rows.iter().try_for_each(|row| scan_one(&mut target, row))?;
        Ok(target)
    }

    /// [`all`](Self::all) into a fresh vector.
    pub async fn fetch_all<T: Tagged + Default>(self) -> FluentResult<Vec<T>> {
        let mut targets = Vec::new();
        self.all(&mut targets).await?;
        Ok(targets)
    }
}
