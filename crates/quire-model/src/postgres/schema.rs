use quire_api_types::RelationKind;
use sea_query::Iden;

#[derive(Debug, Clone, Copy, Iden)]
pub enum Users {
    Table,
    Id,
    Created,
    Name,
    DisplayName,
    AvatarUrl,
}

#[derive(Debug, Clone, Copy, Iden)]
pub enum Posts {
    Table,
    Id,
    Created,
    AuthorId,
    Slug,
    Title,
}

#[derive(Debug, Clone, Copy, Iden)]
pub enum Comments {
    Table,
    Id,
    Created,
    PostId,
    AuthorId,
    Content,
    ParentId,
}

/// Every relation kind is stored in its own table with the
/// same set of [`RelationColumn`]s.
#[derive(Debug, Clone, Copy, Iden)]
pub enum RelationTable {
    PostLikes,
    PostBookmarks,
    Followers,
}

impl From<RelationKind> for RelationTable {
    fn from(value: RelationKind) -> Self {
        match value {
            RelationKind::Like => Self::PostLikes,
            RelationKind::Bookmark => Self::PostBookmarks,
            RelationKind::Follow => Self::Followers,
        }
    }
}

#[derive(Debug, Clone, Copy, Iden)]
pub enum RelationColumn {
    Id,
    Created,
    SourceId,
    TargetId,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_relation_table_names() {
        assert_eq!(RelationTable::PostLikes.to_string(), "post_likes");
        assert_eq!(RelationTable::PostBookmarks.to_string(), "post_bookmarks");
        assert_eq!(RelationTable::Followers.to_string(), "followers");
        assert_eq!(Users::Table.to_string(), "users");
        assert_eq!(Comments::ParentId.to_string(), "parent_id");
    }
}
