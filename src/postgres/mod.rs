// PostgreSQL module - a single tokio-postgres client
//
// - config: options and establishing the connection
// - params: parameter conversion between crate values and tokio-postgres types
// - query: result extraction and building
// - connection: the client handle and statement execution

pub mod config;
pub mod connection;
pub mod params;
pub mod query;

pub use config::PostgresOptions;
pub use connection::PostgresConnection;
pub use params::Params;
pub use query::build_result_set;
