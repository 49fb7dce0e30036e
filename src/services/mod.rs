pub mod media_store;
pub mod uploads;
