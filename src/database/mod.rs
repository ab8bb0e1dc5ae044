pub mod connection;
pub mod events;
pub mod identities;
pub mod maps;
pub mod models;
pub mod reviews;
pub mod rosters;
pub mod scrims;
pub mod setup;
pub mod teams;

pub use connection::{create_memory_pool, create_pool, get_connection, DbConn, DbPool};
pub use models::*;
