//! Compiler worker bridge.
//!
//! The bridge owns a background worker thread and the compiler module's
//! lifecycle:
//!
//! - `messages` - the request and event protocol, serializable as JSON
//! - `module` - the contract between the bridge and a compiler module
//! - `native` - a loader running the compiler as a native executable
//! - `bridge` - the worker thread, its single-flight state machine and the
//!   foreground handle
//!
//! Every request ends in a `done` event, whether the module loaded,
//! reported errors, failed or panicked.

pub mod bridge;
pub mod messages;
pub mod module;
pub mod native;
