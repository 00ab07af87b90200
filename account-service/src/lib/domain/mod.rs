pub mod account;
pub mod authorization;
pub mod content;
pub mod media;
pub mod notification;
