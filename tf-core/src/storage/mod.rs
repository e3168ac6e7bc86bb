mod in_memory;
mod traits;

#[cfg(feature = "db")]
mod database;

pub use in_memory::InMemoryStorage;
pub use traits::{Storage, TitleFilter};

#[cfg(feature = "db")]
pub use database::DatabaseStorage;
