use chrono::NaiveDateTime;
use content::{ContentFields, Kind};
use db::schema::media;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::{insert_into, update};
use std::collections::HashMap;
use utils::serialize_date;

/// Show-style entry: studio, episode count, type label ("TV", "OVA",
/// "movie", ...), poster and first airing date.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaFields {
    pub description: String,
    pub studio: String,
    pub episodes: i32,
    #[serde(rename = "type")]
    pub media_type: String,
    pub poster: Option<String>,
    #[serde(serialize_with = "serialize_date")]
    pub airing_date: NaiveDateTime,
}

type MediaRow = (i32, String, String, i32, String, Option<String>, NaiveDateTime);

impl ContentFields for MediaFields {
    const KIND: Kind = Kind::Media;

    fn insert(&self, content_id: i32, conn: &PgConnection) -> QueryResult<()> {
        use db::schema::media::dsl;
        insert_into(media::table)
            .values((
                dsl::content_id.eq(content_id),
                dsl::description.eq(&self.description),
                dsl::studio.eq(&self.studio),
                dsl::episodes.eq(self.episodes),
                dsl::media_type.eq(&self.media_type),
                dsl::poster.eq(&self.poster),
                dsl::airing_date.eq(self.airing_date),
            ))
            .execute(conn)?;
        Ok(())
    }

    fn update(&self, content_id: i32, conn: &PgConnection) -> QueryResult<()> {
        use db::schema::media::dsl;
        update(media::table.find(content_id))
            .set((
                dsl::description.eq(&self.description),
                dsl::studio.eq(&self.studio),
                dsl::episodes.eq(self.episodes),
                dsl::media_type.eq(&self.media_type),
                dsl::poster.eq(&self.poster),
                dsl::airing_date.eq(self.airing_date),
            ))
            .execute(conn)?;
        Ok(())
    }

    fn load(ids: &[i32], conn: &PgConnection) -> QueryResult<HashMap<i32, MediaFields>> {
        let rows = media::table
            .filter(media::content_id.eq_any(ids))
            .load::<MediaRow>(conn)?;
        Ok(rows
            .into_iter()
            .map(
                |(id, description, studio, episodes, media_type, poster, airing_date)| {
                    let fields = MediaFields {
                        description,
                        studio,
                        episodes,
                        media_type,
                        poster,
                        airing_date,
                    };
                    (id, fields)
                },
            )
            .collect())
    }
}
