use chrono::NaiveDateTime;
use db::schema::{comments, users};
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::{delete as diesel_delete, insert_into};
use errors::*;
use users::models::User;
use utils::{now, serialize_date};

#[derive(Debug, Queryable)]
struct CommentRow {
    id: i32,
    content_id: i32,
    user_id: i32,
    body: String,
    created_at: NaiveDateTime,
    updated_at: NaiveDateTime,
}

/// A comment with its author loaded.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: i32,
    #[serde(skip_serializing)]
    pub content_id: i32,
    pub body: String,
    #[serde(serialize_with = "serialize_date")]
    pub created_at: NaiveDateTime,
    #[serde(serialize_with = "serialize_date")]
    pub updated_at: NaiveDateTime,
    pub author: User,
}

fn with_author((row, author): (CommentRow, User)) -> Comment {
    Comment {
        id: row.id,
        content_id: row.content_id,
        body: row.body,
        created_at: row.created_at,
        updated_at: row.updated_at,
        author,
    }
}

#[derive(Insertable)]
#[table_name = "comments"]
struct NewComment<'a> {
    content_id: i32,
    user_id: i32,
    body: &'a str,
    created_at: NaiveDateTime,
    updated_at: NaiveDateTime,
}

pub fn add(content_id: i32, author_id: i32, body: &str, conn: &PgConnection) -> Result<Comment> {
    let at = now();
    let new_comment = NewComment {
        content_id,
        user_id: author_id,
        body,
        created_at: at,
        updated_at: at,
    };
    let row = insert_into(comments::table)
        .values(&new_comment)
        .get_result::<CommentRow>(conn)?;
    let author = users::table.find(row.user_id).first::<User>(conn)?;
    Ok(with_author((row, author)))
}

/// Comments on `content_id`, oldest first.
pub fn for_content(content_id: i32, conn: &PgConnection) -> Result<Vec<Comment>> {
    let data = comments::table
        .inner_join(users::table)
        .filter(comments::content_id.eq(content_id))
        .order((comments::created_at.asc(), comments::id.asc()))
        .load::<(CommentRow, User)>(conn)?;
    Ok(data.into_iter().map(with_author).collect())
}

pub fn find(id: i32, conn: &PgConnection) -> Result<Option<Comment>> {
    let data = comments::table
        .inner_join(users::table)
        .filter(comments::id.eq(id))
        .first::<(CommentRow, User)>(conn)
        .optional()?;
    Ok(data.map(with_author))
}

/// Hard delete.
pub fn delete(comment: &Comment, conn: &PgConnection) -> Result<()> {
    diesel_delete(comments::table.find(comment.id)).execute(conn)?;
    Ok(())
}
