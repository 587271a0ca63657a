//! Shared utilities for Switchboard binaries.

pub mod logger;
pub mod time;
