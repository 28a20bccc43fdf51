use diesel::prelude::*;

use crate::domain::comment::{Comment, NewComment};
use crate::domain::types::{CommentId, PostId};
use crate::models::comment::{Comment as DbComment, NewComment as DbNewComment};
use crate::repository::errors::RepositoryResult;
use crate::repository::{CommentReader, CommentWriter, DieselRepository};

impl CommentReader for DieselRepository {
    fn list_comments(&self, post_id: PostId) -> RepositoryResult<Vec<Comment>> {
        use crate::schema::comments;

        let mut conn = self.conn()?;

        let items = comments::table
            .filter(comments::post_id.eq(post_id.get()))
            .order(comments::created_at.asc())
            .load::<DbComment>(&mut conn)?
            .into_iter()
            .map(TryInto::try_into)
            .collect::<Result<Vec<Comment>, _>>()?;

        Ok(items)
    }

    fn get_comment_by_id(&self, id: CommentId) -> RepositoryResult<Option<Comment>> {
        use crate::schema::comments;

        let mut conn = self.conn()?;

        let comment = comments::table
            .filter(comments::id.eq(id.get()))
            .first::<DbComment>(&mut conn)
            .optional()?;

        Ok(comment.map(TryInto::try_into).transpose()?)
    }
}

impl CommentWriter for DieselRepository {
    fn create_comment(&self, comment: &NewComment) -> RepositoryResult<Comment> {
        use crate::schema::comments;

        let mut conn = self.conn()?;

        let db_comment: DbNewComment = comment.clone().into();
        let created = diesel::insert_into(comments::table)
            .values(db_comment)
            .get_result::<DbComment>(&mut conn)?;

        Ok(created.try_into()?)
    }

    fn delete_comment(&self, id: CommentId) -> RepositoryResult<usize> {
        use crate::schema::comments;

        let mut conn = self.conn()?;

        // replies cascade through the parent_id foreign key
        let affected =
            diesel::delete(comments::table.filter(comments::id.eq(id.get()))).execute(&mut conn)?;

        Ok(affected)
    }
}
