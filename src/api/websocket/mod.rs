//! WebSocket module for the live event log
//!
//! Provides the WebSocket endpoint at `/v1/ws`. A client receives a
//! `connected` message, the full history, then every new entry as it is
//! appended ("snapshot then subscribe", with no gap between the two).

pub mod events;
pub mod handler;

pub use handler::ws_handler;
