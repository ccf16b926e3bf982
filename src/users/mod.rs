pub mod models;

pub use self::models::{NewUser, User, UserChanges};
