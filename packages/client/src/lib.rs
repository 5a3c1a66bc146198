//! Chat client for two-party rooms.
//!
//! The [`controller::SessionController`] owns the local session state
//! (which room is open, under which role) and produces the wire events;
//! [`session`] drives the WebSocket connection and terminal I/O around it.

pub mod controller;
pub mod error;
pub mod formatter;
pub mod runner;
pub mod session;
pub mod ui;
