pub mod cache;
pub mod postgres;
pub mod users;

mod macros;

pub use cache::{create_redis_client, Cache, CacheKey, CacheWriterHandle};
pub use postgres::create_pool;
pub use users::{InMemoryUserStore, PgUserStore, UserStore};
