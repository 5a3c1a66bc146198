//! Room broker library for the aizuchi chat application.
//!
//! This library implements the server side of a two-party, room-scoped chat:
//! authoritative room membership, per-room message routing over WebSocket,
//! and room teardown on close or disconnect.

// layers
pub mod domain;
pub mod infrastructure;
pub mod ui;
pub mod usecase;
