extern crate chrono;
extern crate diesel;
extern crate dotenv;
extern crate kitsu_store;

mod common;

use common::{connection, create_user};
use kitsu_store::{NewUser, User, UserChanges};

#[test]
#[ignore = "requires database"]
fn users_are_found_by_id_name_and_email() {
    let conn = connection();
    let user = create_user("us_lookup", &conn);

    let by_id = User::load_by_id(user.id, &conn).unwrap().unwrap();
    let by_name = User::load_by_name("us_lookup", &conn).unwrap().unwrap();
    let by_email = User::load_by_email("us_lookup@realworld.io", &conn)
        .unwrap()
        .unwrap();
    assert_eq!(by_id, user);
    assert_eq!(by_name, user);
    assert_eq!(by_email, user);

    assert!(User::load_by_name("us_nobody", &conn).unwrap().is_none());
    let err = User::require_by_name("us_nobody", &conn).unwrap_err();
    assert!(err.is_not_found());
}

#[test]
#[ignore = "requires database"]
fn update_applies_only_given_fields() {
    let conn = connection();
    let user = create_user("us_editable", &conn);

    let changes = UserChanges {
        bio: Some("I like tea".to_owned()),
        ..UserChanges::default()
    };
    let updated = user.update(&changes, &conn).unwrap();

    assert_eq!(updated.id, user.id);
    assert_eq!(updated.bio, Some("I like tea".to_owned()));
    assert_eq!(updated.username, user.username);
    assert_eq!(updated.email, user.email);
    assert!(updated.updated_at >= user.updated_at);
}

#[test]
#[ignore = "requires database"]
fn deleted_users_disappear() {
    let conn = connection();
    let user = create_user("us_leaving", &conn);
    user.delete(&conn).unwrap();

    assert!(User::load_by_id(user.id, &conn).unwrap().is_none());
    assert!(User::load_by_name("us_leaving", &conn).unwrap().is_none());
    let err = user.update(&UserChanges::default(), &conn).unwrap_err();
    assert!(err.is_not_found());
}

#[test]
#[ignore = "requires database"]
fn taken_username_is_a_conflict() {
    let conn = connection();
    create_user("us_taken", &conn);

    let err = NewUser {
        username: "us_taken",
        email: "someone-else@realworld.io",
        password_hash: "not-a-real-hash",
        bio: None,
        image: None,
    }.insert(&conn)
        .unwrap_err();
    assert!(err.is_conflict(), "unexpected error: {}", err);
}
