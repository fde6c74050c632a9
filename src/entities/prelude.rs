//! `SeaORM` Entity prelude

pub use super::orders::Entity as Orders;
pub use super::ratings::Entity as Ratings;
pub use super::reservations::Entity as Reservations;
