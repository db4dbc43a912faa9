//! Database layer backing the local store

mod connection;
mod kv_store;
mod migrations;

pub use connection::Database;
pub use kv_store::LibSqlStore;
