pub mod admin;
pub mod auth;
pub mod court;
pub mod health;
pub mod room;
