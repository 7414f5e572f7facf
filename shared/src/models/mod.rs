//! Data models
//!
//! Shared between the server and the web clients (via API).
//! All ids are strings; JSON field names are camelCase.

pub mod category;
pub mod contact;
pub mod menu_item;
pub mod order;
pub mod restaurant;
pub mod transaction;
pub mod user;

// Re-exports
pub use category::*;
pub use contact::*;
pub use menu_item::*;
pub use order::*;
pub use restaurant::*;
pub use transaction::*;
pub use user::*;
