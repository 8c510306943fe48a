// SQLite module - rusqlite behind a single async-friendly handle
//
// - config: options and opening the connection
// - params: parameter conversion between crate and rusqlite values
// - query: result extraction and building
// - connection: the connection handle and statement execution

pub mod config;
pub mod connection;
pub mod params;
pub mod query;

pub use config::SqliteOptions;
pub use connection::SqliteConnection;
pub use params::Params;
pub use query::build_result_set;
