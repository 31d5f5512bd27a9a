//! Route handlers

pub mod health;
pub mod items;
pub mod orders;
pub mod users;
