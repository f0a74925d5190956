pub mod court;
pub mod participant;
pub mod room;
pub mod user;
