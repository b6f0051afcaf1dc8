pub mod prelude;

pub mod desks;
pub mod users;
