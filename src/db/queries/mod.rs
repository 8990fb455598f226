//! Single-statement data operations.
//!
//! [`Queries`] wraps one PostgreSQL connection and exposes one method per
//! parameterized statement. The connection is either a pooled connection
//! ([`PoolQueries`], for non-scripted reads and writes) or an open
//! transaction ([`TxQueries`], handed to transaction bodies by
//! [`Store::run_atomic`](super::Store::run_atomic)).
//!
//! Every method maps driver errors through [`classify`](super::classify).

mod accounts;
mod entries;
mod sessions;
mod transfers;
mod users;
mod verify_emails;

use std::ops::DerefMut;

use sqlx::pool::PoolConnection;
use sqlx::{PgConnection, Postgres, Transaction};

/// Querier bound to an open transaction.
pub type TxQueries = Queries<Transaction<'static, Postgres>>;

/// Querier bound to a connection checked out of the pool.
pub type PoolQueries = Queries<PoolConnection<Postgres>>;

/// A set of statements executed against one connection `C`.
pub struct Queries<C> {
    conn: C,
}

impl<C> Queries<C>
where
    C: DerefMut<Target = PgConnection> + Send,
{
    pub fn new(conn: C) -> Self {
        Self { conn }
    }

    /// Raw access to the underlying connection, for ad-hoc statements.
    pub fn conn(&mut self) -> &mut PgConnection {
        &mut self.conn
    }

    pub fn into_inner(self) -> C {
        self.conn
    }
}
