pub use super::desks::Entity as Desks;
pub use super::users::Entity as Users;
