use serde::{Deserialize, Serialize};

/// Short summary of an actor attached to things they authored.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Author {
    pub id: i64,
    pub name: String,
    pub display_name: Option<String>,
    pub avatar_url: Option<String>,
}

/// Public profile of an actor with its derived counters.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Profile {
    pub id: i64,
    pub name: String,
    pub display_name: Option<String>,
    pub avatar_url: Option<String>,

    pub followers: u64,
    pub following: u64,
    pub posts: u64,
}
