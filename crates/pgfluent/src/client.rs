//! Execution seam between the façade and the database.

use crate::decode::{ColumnDecoder, PgDecoder};
use crate::error::{FluentError, FluentResult};
use crate::mapper::RowMap;
use crate::value::Value;
use tokio_postgres::types::ToSql;

/// Runs finished statements.
///
/// Implementations prepare the statement, then run it, and report failures tagged
/// with the phase that failed ([`FluentError::Prepare`], [`FluentError::Execute`],
/// [`FluentError::Query`]). Nothing is retried.
pub trait Executor: Send + Sync {
    /// Run a statement that returns no rows and report the affected row count.
    fn execute(
        &self,
        sql: &str,
        args: &[Value],
    ) -> impl std::future::Future<Output = FluentResult<u64>> + Send;

    /// Run a statement and decode every returned row.
    fn query(
        &self,
        sql: &str,
        args: &[Value],
    ) -> impl std::future::Future<Output = FluentResult<Vec<RowMap>>> + Send;
}

impl<E: Executor> Executor for &E {
    fn execute(
        &self,
        sql: &str,
        args: &[Value],
    ) -> impl std::future::Future<Output = FluentResult<u64>> + Send {
        (**self).execute(sql, args)
    }

    fn query(
        &self,
        sql: &str,
        args: &[Value],
    ) -> impl std::future::Future<Output = FluentResult<Vec<RowMap>>> + Send {
        (**self).query(sql, args)
    }
}

fn params(args: &[Value]) -> Vec<&(dyn ToSql + Sync)> {
    args.iter().map(|v| v as &(dyn ToSql + Sync)).collect()
}

/// [`Executor`] over a borrowed `tokio_postgres` client or transaction.
///
/// ```ignore
/// let tx = client.transaction().await?;
/// let db = Fluent::new(PgExecutor::new(&tx));
/// db.table("accounts").update(&account).await?;
/// tx.commit().await?;
/// ```
pub struct PgExecutor<'c, C, D = PgDecoder> {
    client: &'c C,
    decoder: D,
}

impl<'c, C> PgExecutor<'c, C, PgDecoder> {
    pub fn new(client: &'c C) -> Self {
        Self {
            client,
            decoder: PgDecoder,
        }
    }
}

impl<'c, C, D> PgExecutor<'c, C, D> {
    /// Use a custom column decoder.
    pub fn with_decoder<D2: ColumnDecoder>(self, decoder: D2) -> PgExecutor<'c, C, D2> {
        PgExecutor {
            client: self.client,
            decoder,
        }
    }

    pub fn client(&self) -> &'c C {
        self.client
    }
}

impl<C, D> Executor for PgExecutor<'_, C, D>
where
    C: tokio_postgres::GenericClient + Sync,
    D: ColumnDecoder,
{
    async fn execute(&self, sql: &str, args: &[Value]) -> FluentResult<u64> {
        let stmt = self.client.prepare(sql).await.map_err(FluentError::Prepare)?;
        self.client
            .execute(&stmt, &params(args))
            .await
            .map_err(FluentError::Execute)
    }

    async fn query(&self, sql: &str, args: &[Value]) -> FluentResult<Vec<RowMap>> {
        let stmt = self.client.prepare(sql).await.map_err(FluentError::Prepare)?;
        let rows = self
            .client
            .query(&stmt, &params(args))
            .await
            .map_err(FluentError::Query)?;
        rows.iter().map(|row| self.decoder.decode_row(row)).collect()
    }
}

#[cfg(feature = "pool")]
pub use pooled::PoolExecutor;

#[cfg(feature = "pool")]
mod pooled {
    use super::*;
    use deadpool_postgres::Pool;

    /// [`Executor`] that checks a connection out of a pool for every statement.
    ///
    /// Statements are prepared through the connection's statement cache.
    #[derive(Clone)]
    pub struct PoolExecutor<D = PgDecoder> {
        pool: Pool,
        decoder: D,
    }

    impl PoolExecutor<PgDecoder> {
        pub fn new(pool: Pool) -> Self {
            Self {
                pool,
                decoder: PgDecoder,
            }
        }
    }

    impl<D> PoolExecutor<D> {
        /// Use a custom column decoder.
        pub fn with_decoder<D2: ColumnDecoder>(self, decoder: D2) -> PoolExecutor<D2> {
            PoolExecutor {
                pool: self.pool,
                decoder,
            }
        }

        pub fn pool(&self) -> &Pool {
            &self.pool
        }
    }

    impl<D: ColumnDecoder> Executor for PoolExecutor<D> {
        async fn execute(&self, sql: &str, args: &[Value]) -> FluentResult<u64> {
            let client = self.pool.get().await?;
            let stmt = client
                .prepare_cached(sql)
                .await
                .map_err(FluentError::Prepare)?;
            client
                .execute(&stmt, &params(args))
                .await
                .map_err(FluentError::Execute)
        }

        async fn query(&self, sql: &str, args: &[Value]) -> FluentResult<Vec<RowMap>> {
            let client = self.pool.get().await?;
            let stmt = client
                .prepare_cached(sql)
                .await
                .map_err(FluentError::Prepare)?;
            let rows = client
                .query(&stmt, &params(args))
                .await
                .map_err(FluentError::Query)?;
            rows.iter().map(|row| self.decoder.decode_row(row)).collect()
        }
    }
}
