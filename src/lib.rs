//! Configuration file manager for a weather-station daemon.
//!
//! Installs a new `weewx.conf` from a distribution template, upgrades an
//! existing one into a newer template, reconfigures station settings, and
//! switches report skins on and off.
//!
//! The public API is organised into layers:
//!
//! - **[`config`]**: read, merge, and write `configobj` files
//! - **[`station`]**: resolve station information and apply it to a file
//! - **[`skins`]**: report skin status and the enable/disable state machine
//! - **[`options`]**: turn the command line into one validated operation
//! - **[`commands`]**: the engine that runs an operation end to end
#![deny(clippy::or_fun_call)]
#![deny(clippy::bool_to_int_with_if)]

pub mod cli;
pub mod commands;
pub mod config;
pub mod drivers;
pub mod error;
pub mod logging;
pub mod options;
pub mod skins;
pub mod station;
