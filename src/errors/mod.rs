//! Error types shared by the bridge, the console and the binary.
//!
//! Every failure is an `Error` wrapping an `ErrorImpl` variant. The bridge
//! turns errors into `stderr` events using their `Display` text, the binary
//! prints them with a name and an optional tip.

pub mod errors;
