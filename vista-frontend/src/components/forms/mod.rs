//! Form controls for the settings panel

pub mod checkbox;
pub mod radio_group;
pub mod slider;
