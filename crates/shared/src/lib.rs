//! Records, ids and wire payloads shared by the console crates.

pub mod domain;
pub mod error;
pub mod protocol;
