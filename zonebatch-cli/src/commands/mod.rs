//! Subcommand handlers

pub mod dns;
pub mod firewall;
pub mod profile;
pub mod verify;
pub mod worker;
pub mod zones;
