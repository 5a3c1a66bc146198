//! Shared utilities for the aizuchi chat workspace.
//!
//! Cross-cutting helpers used by both the room-broker server and the
//! session-controller client: logger setup and time utilities.

pub mod logger;
pub mod time;
