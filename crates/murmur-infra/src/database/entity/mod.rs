//! SeaORM entities and their conversions to/from domain types.

pub mod follow;
pub mod post;
pub mod session;
pub mod user;
