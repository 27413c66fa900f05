pub mod comments;
pub mod posts;
pub mod relations;
pub mod users;
