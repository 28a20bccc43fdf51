use chrono::NaiveDateTime;
use diesel::prelude::*;

/// Insertable row marking that a user liked a post.
#[derive(Debug, Insertable)]
#[diesel(table_name = crate::schema::likes)]
pub struct NewLike {
    pub post_id: i32,
    pub user_id: String,
    pub created_at: NaiveDateTime,
}

/// Insertable row marking that a user saved a post for later reading.
#[derive(Debug, Insertable)]
#[diesel(table_name = crate::schema::reading_list)]
pub struct NewReadingListEntry {
    pub post_id: i32,
    pub user_id: String,
    pub created_at: NaiveDateTime,
}
