//! raypoint - controller pointer rays for tracked VR devices.
//!
//! The library half of the executable: configuration, session scripts and
//! the headless session driver.

pub mod config;
pub mod script;
pub mod session;
