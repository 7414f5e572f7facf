//! 实时通知消息类型定义
//!
//! Events pushed from the server to every connected dashboard whenever an
//! order, a menu item or a profile changes. Serialized as JSON objects with a
//! `type` tag, for example `{"type":"NEW_ORDER","order":{...}}`.
//!
//! There is no acknowledgement, ordering across publishers or replay: a
//! client that reconnects re-fetches state through the REST endpoints.

use serde::{Deserialize, Serialize};

use crate::models::{MenuItem, Order, User};

/// Notification event (tagged union)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Notification {
    #[serde(rename = "NEW_ORDER")]
    NewOrder { order: Order },

    #[serde(rename = "ORDER_UPDATED")]
    OrderUpdated { order: Order },

    #[serde(rename = "ORDER_STATUS_CHANGED")]
    OrderStatusChanged { order: Order },

    #[serde(rename = "ITEM_ADDED")]
    ItemAdded { item: MenuItem },

    #[serde(rename = "ITEM_UPDATED")]
    ItemUpdated { item: MenuItem },

    #[serde(rename = "ITEM_DELETED")]
    ItemDeleted {
        #[serde(rename = "itemId")]
        item_id: String,
    },

    #[serde(rename = "profileUpdated")]
    ProfileUpdated { user: User },
}

impl Notification {
    /// Wire tag of the event
    pub fn kind(&self) -> &'static str {
        match self {
            Notification::NewOrder { .. } => "NEW_ORDER",
            Notification::OrderUpdated { .. } => "ORDER_UPDATED",
            Notification::OrderStatusChanged { .. } => "ORDER_STATUS_CHANGED",
            Notification::ItemAdded { .. } => "ITEM_ADDED",
            Notification::ItemUpdated { .. } => "ITEM_UPDATED",
            Notification::ItemDeleted { .. } => "ITEM_DELETED",
            Notification::ProfileUpdated { .. } => "profileUpdated",
        }
    }
}
