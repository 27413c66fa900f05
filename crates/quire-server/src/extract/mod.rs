mod json;
mod query;
mod session_user;

pub use self::json::Json;
pub use self::query::Query;
pub use self::session_user::SessionUser;
