#![allow(dead_code)]

use chrono::NaiveDate;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use dotenv::dotenv;
use kitsu_store::db;
use kitsu_store::{ArticleFields, MediaFields, NewContent, NewUser, User};
use std::env;
use std::sync::Once;

static MIGRATIONS: Once = Once::new();

pub const NO_TAGS: &[&str] = &[];

pub fn database_url() -> String {
    dotenv().ok();
    env::var("DATABASE_URL").expect("DATABASE_URL must be set to run database tests")
}

/// A plain connection with the schema in place. Writes on it are real.
pub fn establish() -> PgConnection {
    let conn = PgConnection::establish(&database_url()).expect("failed to connect");
    MIGRATIONS.call_once(|| db::run_migrations(&conn).expect("migrations failed"));
    conn
}

/// A connection inside a transaction that is never committed.
pub fn connection() -> PgConnection {
    let conn = establish();
    conn.begin_test_transaction()
        .expect("failed to open test transaction");
    conn
}

pub fn create_user(name: &str, conn: &PgConnection) -> User {
    let email = format!("{}@realworld.io", name);
    let bio = format!("{} bio", name);
    NewUser {
        username: name,
        email: &email,
        password_hash: "not-a-real-hash",
        bio: Some(&bio),
        image: None,
    }.insert(conn)
        .expect("failed to insert user")
}

pub fn new_article(author: &User, title: &str) -> NewContent<ArticleFields> {
    NewContent::new(
        author.id,
        title,
        ArticleFields {
            description: format!("about {}", title),
            body: format!("body of {}", title),
        },
    )
}

pub fn new_media(author: &User, title: &str) -> NewContent<MediaFields> {
    NewContent::new(
        author.id,
        title,
        MediaFields {
            description: format!("about {}", title),
            studio: "Sunrise".to_owned(),
            episodes: 26,
            media_type: "TV".to_owned(),
            poster: None,
            airing_date: NaiveDate::from_ymd_opt(1998, 4, 3)
                .and_then(|d| d.and_hms_opt(0, 0, 0))
                .expect("valid date"),
        },
    )
}

pub fn sorted(mut names: Vec<&str>) -> Vec<&str> {
    names.sort();
    names
}
