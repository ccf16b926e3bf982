//! Articles and media share one `contents` row shape (slug, title, author,
//! timestamps, tags, favorites, comments); each kind keeps its own fields in
//! a side table keyed by the content id.

use chrono::NaiveDateTime;
use diesel::pg::PgConnection;
use diesel::QueryResult;
use slug::slugify;
use std::collections::HashMap;
use tags::Tag;
use users::models::User;
use utils::serialize_date;

pub mod article;
pub mod media;
mod store;

pub use self::article::ArticleFields;
pub use self::media::MediaFields;
pub use self::store::ContentStore;

pub type Article = Content<ArticleFields>;
pub type Media = Content<MediaFields>;
pub type ArticleStore = ContentStore<ArticleFields>;
pub type MediaStore = ContentStore<MediaFields>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    Article,
    Media,
}

impl Kind {
    /// Value of the `contents.kind` column.
    pub fn as_str(&self) -> &'static str {
        match *self {
            Kind::Article => "article",
            Kind::Media => "media",
        }
    }
}

/// The kind-specific half of a content item. Implementors own one side
/// table and know how to write and batch-read it.
pub trait ContentFields: Sized {
    const KIND: Kind;

    fn insert(&self, content_id: i32, conn: &PgConnection) -> QueryResult<()>;

    fn update(&self, content_id: i32, conn: &PgConnection) -> QueryResult<()>;

    fn load(ids: &[i32], conn: &PgConnection) -> QueryResult<HashMap<i32, Self>>;
}

/// A fully loaded content item: author, tags and favoriting users included.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Content<F> {
    #[serde(skip_serializing)]
    pub id: i32,
    pub slug: String,
    pub title: String,
    #[serde(flatten)]
    pub fields: F,
    pub author: User,
    #[serde(rename = "tagList", serialize_with = "serialize_tag_list")]
    pub tags: Vec<Tag>,
    #[serde(skip_serializing)]
    pub favorited_by: Vec<User>,
    #[serde(serialize_with = "serialize_date")]
    pub created_at: NaiveDateTime,
    #[serde(serialize_with = "serialize_date")]
    pub updated_at: NaiveDateTime,
}

impl<F> Content<F> {
    pub fn author_id(&self) -> i32 {
        self.author.id
    }

    /// Changes the title and re-derives the slug from it.
    pub fn set_title<T: Into<String>>(&mut self, title: T) {
        self.title = title.into();
        self.slug = slugify(&self.title);
    }

    pub fn tag_list(&self) -> Vec<&str> {
        self.tags.iter().map(|t| t.tag.as_str()).collect()
    }

    pub fn favorites_count(&self) -> usize {
        self.favorited_by.len()
    }

    pub fn is_favorited_by(&self, user_id: i32) -> bool {
        self.favorited_by.iter().any(|u| u.id == user_id)
    }
}

fn serialize_tag_list<S>(tags: &[Tag], serializer: S) -> Result<S::Ok, S::Error>
where
    S: ::serde::Serializer,
{
    serializer.collect_seq(tags.iter().map(|t| &t.tag))
}

/// Input to `ContentStore::create`. The slug is derived from the title.
#[derive(Debug, Clone)]
pub struct NewContent<F> {
    pub author_id: i32,
    pub title: String,
    pub fields: F,
}

impl<F> NewContent<F> {
    pub fn new<T: Into<String>>(author_id: i32, title: T, fields: F) -> NewContent<F> {
        NewContent {
            author_id,
            title: title.into(),
            fields,
        }
    }

    pub fn slug(&self) -> String {
        slugify(&self.title)
    }
}
