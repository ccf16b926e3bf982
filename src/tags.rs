//! The global tag dictionary. Tags are created on first use and never
//! removed, even once nothing links to them.

use chrono::NaiveDateTime;
use db::schema::{content_tags, tags};
use diesel::{delete, insert_into};
use diesel::pg::PgConnection;
use diesel::prelude::*;
use errors::*;
use std::collections::HashSet;
use utils::{now, serialize_date};

#[derive(Debug, Clone, PartialEq, Eq, Hash, Queryable, Identifiable, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Tag {
    #[serde(skip_serializing)]
    pub id: i32,
    pub tag: String,
    #[serde(serialize_with = "serialize_date")]
    pub created_at: NaiveDateTime,
}

#[derive(Insertable)]
#[table_name = "tags"]
struct NewTag<'a> {
    tag: &'a str,
    created_at: NaiveDateTime,
}

#[derive(Insertable)]
#[table_name = "content_tags"]
struct TagLink {
    content_id: i32,
    tag_id: i32,
}

/// Distinct tag strings in order of first appearance. Matching is exact.
pub fn unique<S: AsRef<str>>(raw: &[S]) -> Vec<&str> {
    let mut seen = HashSet::new();
    raw.iter()
        .map(|t| t.as_ref())
        .filter(|t| seen.insert(*t))
        .collect()
}

/// Looks up every tag in `raw`, creating the missing ones.
///
/// A concurrent writer creating the same tag is not an error: the insert
/// skips the conflicting row and the read that follows returns the
/// committed winner.
pub fn resolve<S: AsRef<str>>(raw: &[S], connection: &PgConnection) -> Result<Vec<Tag>> {
    let wanted = unique(raw);
    if wanted.is_empty() {
        return Ok(Vec::new());
    }

    // sorted so concurrent writers take row locks in the same order
    let mut ordered = wanted.clone();
    ordered.sort();
    let created_at = now();
    let new_tags = ordered
        .iter()
        .map(|&tag| NewTag { tag, created_at })
        .collect::<Vec<_>>();

    insert_into(tags::table)
        .values(&new_tags)
        .on_conflict(tags::tag)
        .do_nothing()
        .execute(connection)?;

    let mut found = tags::table
        .filter(tags::tag.eq_any(ordered))
        .load::<Tag>(connection)?;
    found.sort_by_key(|t| wanted.iter().position(|w| *w == t.tag));
    Ok(found)
}

/// Links `content_id` to each tag; links that already exist are kept.
pub fn link(content_id: i32, tags: &[Tag], connection: &PgConnection) -> Result<()> {
    if tags.is_empty() {
        return Ok(());
    }
    let links = tags
        .iter()
        .map(|t| TagLink {
            content_id,
            tag_id: t.id,
        })
        .collect::<Vec<_>>();
    insert_into(content_tags::table)
        .values(&links)
        .on_conflict_do_nothing()
        .execute(connection)?;
    Ok(())
}

/// Drops every tag link of `content_id`.
pub fn unlink_all(content_id: i32, connection: &PgConnection) -> Result<()> {
    delete(content_tags::table.filter(content_tags::content_id.eq(content_id)))
        .execute(connection)?;
    Ok(())
}

pub fn load_by_name(name: &str, connection: &PgConnection) -> Result<Option<Tag>> {
    let tag = tags::table
        .filter(tags::tag.eq(name))
        .first::<Tag>(connection)
        .optional()?;
    Ok(tag)
}

pub fn load_all(connection: &PgConnection) -> Result<Vec<Tag>> {
    Ok(tags::table.order(tags::tag.asc()).load::<Tag>(connection)?)
}
