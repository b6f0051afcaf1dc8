pub mod desk;
pub mod user;
