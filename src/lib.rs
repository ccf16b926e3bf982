//! Relational store behind the kitsu content API: articles and media
//! entries, their tags, comments and favorites, and the follow graph
//! between users. Every operation runs on a caller-supplied PostgreSQL
//! connection checked out of the pool in `db`.

extern crate chrono;
#[macro_use]
extern crate diesel;
#[macro_use]
extern crate diesel_migrations;
extern crate dotenv;
#[macro_use]
extern crate error_chain;
extern crate r2d2;
extern crate r2d2_diesel;
extern crate serde;
#[macro_use]
extern crate serde_derive;
#[cfg(test)]
#[macro_use]
extern crate serde_json;
extern crate slug;
#[macro_use]
extern crate tracing;

pub mod comment;
pub mod config;
pub mod content;
pub mod db;
pub mod errors;
pub mod profile;
pub mod tags;
pub mod types;
pub mod users;
mod utils;

pub use comment::Comment;
pub use config::Config;
pub use content::{
    Article, ArticleFields, ArticleStore, Content, ContentFields, ContentStore, Kind, Media,
    MediaFields, MediaStore, NewContent,
};
pub use errors::{Error, ErrorKind, Result};
pub use profile::Profile;
pub use tags::Tag;
pub use types::{Listing, Page};
pub use users::{NewUser, User, UserChanges};
