use chrono::NaiveDateTime;
use db::schema::users;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::{insert_into, update as diesel_update};
use errors::*;
use profile::Profile;
use std::borrow::Cow;
use utils::{now, serialize_date};

#[derive(Debug, Clone, PartialEq, Queryable, Identifiable, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(skip_serializing)]
    pub id: i32,
    pub username: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub bio: Option<String>,
    pub image: Option<String>,
    #[serde(serialize_with = "serialize_date")]
    pub created_at: NaiveDateTime,
    #[serde(serialize_with = "serialize_date")]
    pub updated_at: NaiveDateTime,
    #[serde(skip_serializing)]
    pub deleted_at: Option<NaiveDateTime>,
}

impl User {
    pub fn load_by_id(user_id: i32, connection: &PgConnection) -> Result<Option<User>> {
        use db::schema::users::dsl::*;
        let user = users
            .filter(id.eq(user_id))
            .filter(deleted_at.is_null())
            .first::<User>(connection)
            .optional()?;
        Ok(user)
    }

    pub fn load_by_name(name: &str, connection: &PgConnection) -> Result<Option<User>> {
        use db::schema::users::dsl::*;
        let user = users
            .filter(username.eq(name))
            .filter(deleted_at.is_null())
            .first::<User>(connection)
            .optional()?;
        Ok(user)
    }

    pub fn load_by_email(address: &str, connection: &PgConnection) -> Result<Option<User>> {
        use db::schema::users::dsl::*;
        let user = users
            .filter(email.eq(address))
            .filter(deleted_at.is_null())
            .first::<User>(connection)
            .optional()?;
        Ok(user)
    }

    /// Like `load_by_name`, but a miss is `NotFound`.
    pub fn require_by_name(name: &str, connection: &PgConnection) -> Result<User> {
        match User::load_by_name(name, connection)? {
            Some(user) => Ok(user),
            None => bail!(ErrorKind::NotFound("user", name.to_owned())),
        }
    }

    /// Applies `changes` and returns the stored row. A taken username or
    /// email is a `Conflict`.
    pub fn update(&self, changes: &UserChanges, connection: &PgConnection) -> Result<User> {
        use db::schema::users::dsl::*;
        let key = changes.username.as_ref().unwrap_or(&self.username);
        let updated = diesel_update(users.filter(id.eq(self.id)).filter(deleted_at.is_null()))
            .set((changes, updated_at.eq(now())))
            .get_result::<User>(connection)
            .optional()
            .map_err(|e| conflict_or_fault(e, "user", key))?;
        match updated {
            Some(user) => Ok(user),
            None => bail!(ErrorKind::NotFound("user", self.username.clone())),
        }
    }

    /// Soft delete; authored content, comments and edges stay in place.
    pub fn delete(&self, connection: &PgConnection) -> Result<()> {
        use db::schema::users::dsl::*;
        diesel_update(users.filter(id.eq(self.id)))
            .set(deleted_at.eq(Some(now())))
            .execute(connection)?;
        Ok(())
    }

    pub fn profile(&self, following: bool) -> Profile {
        Profile {
            username: Cow::Borrowed(&self.username),
            bio: self.bio.as_ref().map(|s| Cow::Borrowed(s.as_str())),
            image: self.image.as_ref().map(|s| Cow::Borrowed(s.as_str())),
            following,
        }
    }
}

/// The password hash is produced by the auth layer; this crate only
/// stores it.
#[derive(Debug, Insertable)]
#[table_name = "users"]
pub struct NewUser<'a> {
    pub username: &'a str,
    pub email: &'a str,
    pub password_hash: &'a str,
    pub bio: Option<&'a str>,
    pub image: Option<&'a str>,
}

impl<'a> NewUser<'a> {
    pub fn insert(&self, connection: &PgConnection) -> Result<User> {
        insert_into(users::table)
            .values(self)
            .get_result::<User>(connection)
            .map_err(|e| conflict_or_fault(e, "user", self.username))
    }
}

#[derive(Debug, Default, AsChangeset)]
#[table_name = "users"]
pub struct UserChanges {
    pub username: Option<String>,
    pub email: Option<String>,
    pub password_hash: Option<String>,
    pub bio: Option<String>,
    pub image: Option<String>,
}
