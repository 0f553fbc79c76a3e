//! Browser services used by the page

pub mod config;
pub mod events;
pub mod geolocation;
pub mod page;
pub mod registration;
pub mod storage;
pub mod wake_lock;
