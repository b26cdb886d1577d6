//! Search adapters.

mod postgres;

pub use postgres::PostgresSearchIndex;
