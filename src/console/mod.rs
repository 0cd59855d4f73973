//! Console and playground controller.
//!
//! This module drives the bridge from user actions and keeps what the
//! console displays:
//!
//! - `console` - the controller with its busy flag and event handling
//! - `transcript` - the append-only transcript and its raw and rendered views

pub mod console;
pub mod transcript;
