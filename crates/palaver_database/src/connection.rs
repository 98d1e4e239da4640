//! Database connection utilities.

use crate::{DatabaseConfig, DatabaseResult};
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool, PooledConnection};
use tracing::{debug, instrument};

/// Pool of PostgreSQL connections.
pub type PgPool = Pool<ConnectionManager<PgConnection>>;

/// Connection checked out of a [`PgPool`].
pub type PgPooledConnection = PooledConnection<ConnectionManager<PgConnection>>;

/// Establish a connection to the PostgreSQL database.
///
/// Uses `DATABASE_URL` if set, otherwise composes the URL from
/// `DATABASE_USER`, `DATABASE_PASSWORD`, `DATABASE_HOST` (default
/// "localhost"), `DATABASE_PORT` (default 5432) and `DATABASE_NAME`
/// (default "palaver").
///
/// # Errors
///
/// Returns an error if credentials are missing or the connection fails.
pub fn establish_connection() -> DatabaseResult<PgConnection> {
    connect(&DatabaseConfig::default().with_env_overrides())
}

/// Establish a single connection using explicit settings.
pub fn connect(config: &DatabaseConfig) -> DatabaseResult<PgConnection> {
    let database_url = config.database_url()?;
    debug!(host = %config.host, name = %config.name, "Connecting to PostgreSQL");
    PgConnection::establish(&database_url).map_err(Into::into)
}

/// Build a connection pool using explicit settings.
///
/// The pool opens its first connection eagerly, so an unreachable database
/// is reported here rather than on first use.
#[instrument(skip(config), fields(max_size = config.pool_max_size))]
pub fn create_pool(config: &DatabaseConfig) -> DatabaseResult<PgPool> {
    let manager = ConnectionManager::<PgConnection>::new(config.database_url()?);
    Pool::builder()
        .max_size(config.pool_max_size)
        .build(manager)
        .map_err(Into::into)
}
