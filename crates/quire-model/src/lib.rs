pub mod comment;
pub mod gateway;
pub mod id;
pub mod memory;
pub mod post;
pub mod postgres;
pub mod relation;
pub mod user;

pub use self::comment::{Comment, InsertComment};
pub use self::gateway::Gateway;
pub use self::memory::MemoryGateway;
pub use self::post::Post;
pub use self::postgres::PgGateway;
pub use self::relation::{Relation, RelationKey};
pub use self::user::User;

pub static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!();
