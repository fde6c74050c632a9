pub mod admin;
pub mod common;
pub mod order;
pub mod rating;
pub mod reservation;
