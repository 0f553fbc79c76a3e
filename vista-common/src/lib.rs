//! Common stuff shared between the vista frontend and its service worker
#![warn(missing_docs)]
#![deny(clippy::pedantic)]
#![deny(clippy::nursery)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::use_self)]
// Nothing here is shared between threads.
#![allow(clippy::future_not_send)]

pub mod config;
pub mod controller;
pub mod feed;
pub mod format;
pub mod i18n;
pub mod offline;
pub mod position;
pub mod preferences;
pub mod version;
pub mod view;
