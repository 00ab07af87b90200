pub mod notifications;
pub mod repositories;
pub mod uploads;
