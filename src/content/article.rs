use content::{ContentFields, Kind};
use db::schema::articles;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::{insert_into, update};
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ArticleFields {
    pub description: String,
    pub body: String,
}

impl ContentFields for ArticleFields {
    const KIND: Kind = Kind::Article;

    fn insert(&self, content_id: i32, conn: &PgConnection) -> QueryResult<()> {
        use db::schema::articles::dsl;
        insert_into(articles::table)
            .values((
                dsl::content_id.eq(content_id),
                dsl::description.eq(&self.description),
                dsl::body.eq(&self.body),
            ))
            .execute(conn)?;
        Ok(())
    }

    fn update(&self, content_id: i32, conn: &PgConnection) -> QueryResult<()> {
        use db::schema::articles::dsl;
        update(articles::table.find(content_id))
            .set((
                dsl::description.eq(&self.description),
                dsl::body.eq(&self.body),
            ))
            .execute(conn)?;
        Ok(())
    }

    fn load(ids: &[i32], conn: &PgConnection) -> QueryResult<HashMap<i32, ArticleFields>> {
        let rows = articles::table
            .filter(articles::content_id.eq_any(ids))
            .load::<(i32, String, String)>(conn)?;
        Ok(rows
            .into_iter()
            .map(|(id, description, body)| (id, ArticleFields { description, body }))
            .collect())
    }
}
