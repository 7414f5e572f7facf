//! Restaurant Model

use serde::{Deserialize, Serialize};

/// Restaurant owned by exactly one owner account
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Restaurant {
    pub id: String,
    pub name: String,
    pub category: String,
    pub owner_id: String,
    /// Stored image file name (`<id>.<ext>`), if one was uploaded
    #[serde(default)]
    pub image: Option<String>,
    pub created_at: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RestaurantCreate {
    pub name: Option<String>,
    pub category: Option<String>,
}
