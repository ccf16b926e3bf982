extern crate chrono;
extern crate diesel;
extern crate dotenv;
extern crate kitsu_store;

mod common;

use common::{connection, create_user, new_article, NO_TAGS};
use kitsu_store::profile::{self, ANONYMOUS};
use kitsu_store::{ArticleStore, MediaStore, Page};

#[test]
#[ignore = "requires database"]
fn follow_then_unfollow() {
    let conn = connection();
    let celebrity = create_user("sg_celebrity", &conn);
    let fan = create_user("sg_fan", &conn);

    assert!(!profile::is_follower(celebrity.id, fan.id, &conn).unwrap());
    profile::add_follower(&celebrity, fan.id, &conn).unwrap();
    assert!(profile::is_follower(celebrity.id, fan.id, &conn).unwrap());
    // edges are directed
    assert!(!profile::is_follower(fan.id, celebrity.id, &conn).unwrap());

    assert!(profile::remove_follower(&celebrity, fan.id, &conn).unwrap());
    assert!(!profile::remove_follower(&celebrity, fan.id, &conn).unwrap());
    assert!(!profile::is_follower(celebrity.id, fan.id, &conn).unwrap());
}

#[test]
#[ignore = "requires database"]
fn following_yourself_is_rejected() {
    let conn = connection();
    let narcissus = create_user("sg_narcissus", &conn);

    let err = profile::add_follower(&narcissus, narcissus.id, &conn).unwrap_err();
    assert!(!err.is_conflict());
    assert!(!profile::is_follower(narcissus.id, narcissus.id, &conn).unwrap());
}

#[test]
#[ignore = "requires database"]
fn following_twice_is_a_conflict() {
    let conn = connection();
    let celebrity = create_user("sg_twice_celebrity", &conn);
    let fan = create_user("sg_twice_fan", &conn);

    profile::add_follower(&celebrity, fan.id, &conn).unwrap();
    let err = profile::add_follower(&celebrity, fan.id, &conn).unwrap_err();
    assert!(err.is_conflict(), "unexpected error: {}", err);
    assert!(profile::is_follower(celebrity.id, fan.id, &conn).unwrap());
}

#[test]
#[ignore = "requires database"]
fn anonymous_follows_nobody() {
    let conn = connection();
    let celebrity = create_user("sg_anon_celebrity", &conn);

    assert!(!profile::is_follower(celebrity.id, ANONYMOUS, &conn).unwrap());
    let seen = profile::load(&celebrity, ANONYMOUS, &conn).unwrap();
    assert_eq!(seen.username, "sg_anon_celebrity");
    assert!(!seen.following);
}

#[test]
#[ignore = "requires database"]
fn profile_reflects_the_viewer() {
    let conn = connection();
    let celebrity = create_user("sg_profile_celebrity", &conn);
    let fan = create_user("sg_profile_fan", &conn);
    let stranger = create_user("sg_profile_stranger", &conn);
    profile::add_follower(&celebrity, fan.id, &conn).unwrap();

    let by_fan = profile::load(&celebrity, fan.id, &conn).unwrap();
    let by_stranger = profile::load(&celebrity, stranger.id, &conn).unwrap();
    assert!(by_fan.following);
    assert!(!by_stranger.following);
    assert_eq!(
        by_fan.bio.as_ref().map(|b| b.to_string()),
        Some("sg_profile_celebrity bio".to_owned())
    );
}

#[test]
#[ignore = "requires database"]
fn followers_and_followings_are_listed() {
    let conn = connection();
    let celebrity = create_user("sg_list_celebrity", &conn);
    let other = create_user("sg_list_other", &conn);
    let fan_b = create_user("sg_list_fan_b", &conn);
    let fan_a = create_user("sg_list_fan_a", &conn);
    profile::add_follower(&celebrity, fan_b.id, &conn).unwrap();
    profile::add_follower(&celebrity, fan_a.id, &conn).unwrap();
    profile::add_follower(&other, fan_a.id, &conn).unwrap();

    let followers = profile::followers(celebrity.id, &conn).unwrap();
    let names = followers
        .iter()
        .map(|u| u.username.as_str())
        .collect::<Vec<_>>();
    assert_eq!(names, vec!["sg_list_fan_a", "sg_list_fan_b"]);

    let mut expected = vec![celebrity.id, other.id];
    expected.sort();
    assert_eq!(profile::followings(fan_a.id, &conn).unwrap(), expected);
    assert!(profile::followings(celebrity.id, &conn).unwrap().is_empty());

    // deleted users drop out of follower lists
    fan_b.delete(&conn).unwrap();
    assert_eq!(profile::followers(celebrity.id, &conn).unwrap().len(), 1);
}

#[test]
#[ignore = "requires database"]
fn feed_follows_the_follow_graph() {
    let conn = connection();
    let store = ArticleStore::new();
    let reader = create_user("sg_feed_reader", &conn);
    let writer = create_user("sg_feed_writer", &conn);
    let ignored = create_user("sg_feed_ignored", &conn);
    store
        .create(&new_article(&writer, "Followed Piece"), NO_TAGS, &conn)
        .unwrap();
    store
        .create(&new_article(&ignored, "Unfollowed Piece"), NO_TAGS, &conn)
        .unwrap();

    profile::add_follower(&writer, reader.id, &conn).unwrap();
    let feed = store.list_feed(reader.id, Page::new(0, 20), &conn).unwrap();
    assert_eq!(feed.total_count, 1);
    assert_eq!(feed.len(), 1);
    assert_eq!(feed.items[0].slug, "followed-piece");
    assert_eq!(feed.items[0].author.id, writer.id);

    profile::remove_follower(&writer, reader.id, &conn).unwrap();
    let feed = store.list_feed(reader.id, Page::new(0, 20), &conn).unwrap();
    assert!(feed.is_empty());
    assert_eq!(feed.total_count, 0);
}

#[test]
#[ignore = "requires database"]
fn feed_is_scoped_to_its_kind() {
    let conn = connection();
    let reader = create_user("sg_kind_reader", &conn);
    let writer = create_user("sg_kind_writer", &conn);
    ArticleStore::new()
        .create(&new_article(&writer, "Only An Article"), NO_TAGS, &conn)
        .unwrap();
    profile::add_follower(&writer, reader.id, &conn).unwrap();

    let media_feed = MediaStore::new()
        .list_feed(reader.id, Page::new(0, 20), &conn)
        .unwrap();
    assert_eq!(media_feed.total_count, 0);

    let article_feed = ArticleStore::new()
        .list_feed(reader.id, Page::new(0, 1), &conn)
        .unwrap();
    assert_eq!(article_feed.total_count, 1);
}

#[test]
#[ignore = "requires database"]
fn deleted_authors_leave_the_feed() {
    let conn = connection();
    let store = ArticleStore::new();
    let reader = create_user("sg_gone_reader", &conn);
    let writer = create_user("sg_gone_writer", &conn);
    store
        .create(&new_article(&writer, "Vanishing Author"), NO_TAGS, &conn)
        .unwrap();
    profile::add_follower(&writer, reader.id, &conn).unwrap();
    assert_eq!(profile::followings(reader.id, &conn).unwrap(), vec![writer.id]);

    writer.delete(&conn).unwrap();

    assert!(profile::followings(reader.id, &conn).unwrap().is_empty());
    let feed = store.list_feed(reader.id, Page::new(0, 20), &conn).unwrap();
    assert!(feed.is_empty());
    assert_eq!(feed.total_count, 0);
}
