use diesel::result::{DatabaseErrorKind, Error as DieselError};
use diesel_migrations::RunMigrationsError;

error_chain! {
    foreign_links {
        R2D2(r2d2::Error);
        Diesel(DieselError);
        Migration(RunMigrationsError);
    }

    errors {
        NotFound(entity: &'static str, key: String) {
            description("entity not found")
            display("{} not found: {}", entity, key)
        }

        Conflict(entity: &'static str, key: String) {
            description("entity already exists")
            display("{} already exists: {}", entity, key)
        }

        SelfFollow(user_id: i32) {
            description("a user cannot follow itself")
            display("user {} cannot follow itself", user_id)
        }

        MissingConfig(var: &'static str) {
            description("missing configuration value")
            display("missing configuration value: {}", var)
        }

        InvalidConfig(var: &'static str, value: String) {
            description("invalid configuration value")
            display("invalid value for {}: {:?}", var, value)
        }
    }
}

impl Error {
    pub fn is_not_found(&self) -> bool {
        match self.kind() {
            ErrorKind::NotFound(..) => true,
            _ => false,
        }
    }

    pub fn is_conflict(&self) -> bool {
        match self.kind() {
            ErrorKind::Conflict(..) => true,
            _ => false,
        }
    }
}

/// Maps a unique-constraint violation to `Conflict`; every other database
/// error stays a storage fault.
pub(crate) fn conflict_or_fault(err: DieselError, entity: &'static str, key: &str) -> Error {
    match err {
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
            ErrorKind::Conflict(entity, key.to_owned()).into()
        }
        other => other.into(),
    }
}
