//! `thermostat_store` - SQLite-backed thermostat schedule store
//!
//! Stores schedule entries (day, hour, temperature) in a single SQLite
//! table and exposes typed CRUD over it, plus the `thermo` CLI front end.
//!
//! # Architecture
//!
//! - [`cli`] - Command-line interface using clap
//! - [`model`] - Data types (ScheduleEntry, EntryFields)
//! - [`storage`] - `SQLite` database layer
//! - [`config`] - Configuration management
//! - [`error`] - Error types and handling
//! - [`logging`] - tracing initialization

#![forbid(unsafe_code)]
#![warn(clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod cli;
pub mod config;
pub mod error;
pub mod logging;
pub mod model;
pub mod storage;

pub use error::{ErrorCode, Result, StructuredError, ThermoError};
pub use model::{EntryFields, ScheduleEntry};
pub use storage::{OpenOptions, ScheduleStore};
