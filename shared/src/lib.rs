//! Shared types for the restaurant ordering platform
//!
//! Wire types used by the server and by its clients (customer menu,
//! owner dashboard): entity models, request/response DTOs and the
//! notification events pushed over the WebSocket channel.

pub mod client;
pub mod message;
pub mod models;
pub mod util;

// Re-exports
pub use message::Notification;
pub use serde::{Deserialize, Serialize};
