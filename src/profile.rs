//! Follow edges between users and the profile view built on them.

use db::schema::{follows, users};
use diesel::dsl::exists;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::{delete, insert_into, select};
use errors::*;
use std::borrow::Cow;
use users::models::User;
use utils::now;

/// Identity of an unauthenticated caller.
pub const ANONYMOUS: i32 = 0;

#[derive(Debug, Serialize)]
pub struct Profile<'a> {
    pub username: Cow<'a, str>,
    pub bio: Option<Cow<'a, str>>,
    pub image: Option<Cow<'a, str>>,
    pub following: bool,
}

impl<'a> Profile<'a> {
    pub fn into_owned(self) -> Profile<'static> {
        Profile {
            username: Cow::Owned(self.username.into_owned()),
            bio: self.bio.map(|v| Cow::Owned(v.into_owned())),
            image: self.image.map(|v| Cow::Owned(v.into_owned())),
            following: self.following,
        }
    }
}

/// Makes `follower_id` follow `user`. Following yourself or following
/// twice is rejected.
pub fn add_follower(user: &User, follower: i32, connection: &PgConnection) -> Result<()> {
    use db::schema::follows::dsl::*;

    if user.id == follower {
        bail!(ErrorKind::SelfFollow(follower));
    }

    let inserted = insert_into(follows)
        .values((
            follower_id.eq(follower),
            following_id.eq(user.id),
            created_at.eq(now()),
        ))
        .on_conflict_do_nothing()
        .execute(connection)?;

    if inserted == 0 {
        bail!(ErrorKind::Conflict(
            "follow",
            format!("{} -> {}", follower, user.id)
        ));
    }
    Ok(())
}

/// Removes the edge if present. Returns whether an edge was removed.
pub fn remove_follower(user: &User, follower: i32, connection: &PgConnection) -> Result<bool> {
    use db::schema::follows::dsl::*;

    let removed = delete(
        follows
            .filter(follower_id.eq(follower))
            .filter(following_id.eq(user.id)),
    ).execute(connection)?;
    Ok(removed > 0)
}

pub fn is_follower(user_id: i32, follower: i32, connection: &PgConnection) -> Result<bool> {
    use db::schema::follows::dsl::*;

    if follower == ANONYMOUS {
        return Ok(false);
    }

    let query = select(exists(
        follows
            .filter(follower_id.eq(follower))
            .filter(following_id.eq(user_id)),
    ));
    Ok(query.get_result::<bool>(connection)?)
}

/// Ids of every live user `follower` follows.
pub fn followings(follower: i32, connection: &PgConnection) -> Result<Vec<i32>> {
    let live_users = users::table
        .filter(users::deleted_at.is_null())
        .select(users::id);
    let ids = follows::table
        .filter(follows::follower_id.eq(follower))
        .filter(follows::following_id.eq_any(live_users))
        .select(follows::following_id)
        .order(follows::following_id.asc())
        .load::<i32>(connection)?;
    Ok(ids)
}

/// Live users following `user_id`, in username order.
pub fn followers(user_id: i32, connection: &PgConnection) -> Result<Vec<User>> {
    let follower_ids = follows::table
        .filter(follows::following_id.eq(user_id))
        .select(follows::follower_id);

    let found = users::table
        .filter(users::id.eq_any(follower_ids))
        .filter(users::deleted_at.is_null())
        .order(users::username.asc())
        .load::<User>(connection)?;
    Ok(found)
}

/// Profile of `user` as seen by `viewer` (which may be `ANONYMOUS`).
pub fn load<'a>(user: &'a User, viewer: i32, connection: &PgConnection) -> Result<Profile<'a>> {
    let following = is_follower(user.id, viewer, connection)?;
    Ok(user.profile(following))
}
