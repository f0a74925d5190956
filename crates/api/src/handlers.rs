pub mod admin;
pub mod auth;
pub mod court;
pub mod room;
