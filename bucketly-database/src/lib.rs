pub mod cache;
pub mod database;
pub mod error;
pub mod impls;
pub mod model;
pub mod realtime;

pub use cache::CacheService;
pub use database::{Database, MIGRATOR};
pub use error::{BackendErrorKind, classify_error};
