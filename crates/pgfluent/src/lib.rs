//! # pgfluent
//!
//! A fluent, parameterized PostgreSQL statement builder with tagged struct mapping.
//!
//! ## Features
//!
//! - **Chainable statements**: table, joins, filters, null checks, grouping, ordering and
//!   paging turn into one `$n`-parameterized statement plus its argument list
//! - **Tagged structs**: `#[derive(Tagged)]` maps fields to columns in both directions
//! - **Pluggable execution**: any `tokio_postgres` client, transaction or pool behind
//!   the [`Executor`] trait
//! - **Statement logging**: debug mode emits every statement through `tracing`
//!
//! ## Building statements
//!
//! ```
//! use pgfluent::StatementBuilder;
//!
//! let stmt = StatementBuilder::new("test")
//!     .filter("id", "=", 1)
//!     .where_null("deleted_at", true)
//!     .build_update(&["name"], vec!["gerald".into()])
//!     .unwrap();
//!
//! assert_eq!(
//!     stmt.sql(),
//!     "UPDATE test SET name = $1 WHERE id = $2 AND deleted_at IS NULL"
//! );
//! ```
//!
//! ## Running them
//!
//! ```ignore
//! use pgfluent::{Fluent, PoolExecutor, Tagged, create_pool};
//!
//! #[derive(Debug, Default, Tagged)]
//! struct Test {
//!     #[fluent(column = "id")]
//!     id: i64,
//!     #[fluent(column = "name")]
//!     name: String,
//!     #[fluent(column = "total")]
//!     total: f64,
//! }
//!
//! let db = Fluent::new(PoolExecutor::new(create_pool(&url)?)).debug(true);
//!
//! db.table("test").insert(&Test { name: "gerald".into(), total: 12.0, ..Default::default() }).await?;
//!
//! let rows: Vec<Test> = db
//!     .table("test")
//!     .filter("total", ">", 10.0)
//!     .order_by(&["id"])
//!     .get(&["id", "name", "total"])
//!     .fetch_all()
//!     .await?;
//! ```
//!
//! Identifiers (tables, columns, operators) are written into the SQL text as given;
//! only values are bound as parameters.

pub mod builder;
pub mod client;
pub mod config;
pub mod decode;
pub mod error;
pub mod fluent;
pub mod mapper;
pub mod value;

#[cfg(feature = "tracing")]
mod log;

#[cfg(feature = "pool")]
pub mod pool;

pub use builder::{SqlStatement, StatementBuilder};
pub use client::{Executor, PgExecutor};
pub use config::{DatabaseConfig, FluentConfig, LogLevel};
pub use decode::{ColumnDecoder, PgDecoder};
pub use error::{FluentError, FluentResult};
pub use fluent::{Fluent, Query, Select};
pub use mapper::{
    Column, FieldDescriptor, FieldKind, RowMap, Tagged, extract_columns, extract_fields,
    scan_all, scan_nested, scan_one,
};
pub use value::Value;

#[cfg(feature = "tracing")]
pub use log::SqlLogger;

#[cfg(feature = "pool")]
pub use client::PoolExecutor;

#[cfg(feature = "pool")]
pub use pool::{create_pool, create_pool_from_config, create_pool_with_config};

#[cfg(feature = "derive")]
pub use pgfluent_derive::Tagged;
