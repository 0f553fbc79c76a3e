//! Yew components for the page

pub mod forms;
pub mod readout;
pub mod settings;
pub mod status;
