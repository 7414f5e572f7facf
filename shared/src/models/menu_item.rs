//! Menu Item Model

use serde::{Deserialize, Serialize};

/// Menu item owned by a restaurant owner
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuItem {
    pub id: String,
    pub item_name: String,
    pub carbs_price: f64,
    pub protein_type: String,
    pub proteins_price: f64,
    pub base_fat: f64,
    /// Stored image file name (`<id>.<ext>`), empty when no image was uploaded
    #[serde(default)]
    pub item_picture: Option<String>,
    pub owner_id: String,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Menu item enriched with its image, inlined as base64
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuItemView {
    #[serde(flatten)]
    pub item: MenuItem,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub image_extension: Option<String>,
}

/// Text fields of a menu item form (multipart), all optional on the wire
#[derive(Debug, Clone, Default)]
pub struct MenuItemFields {
    pub item_name: Option<String>,
    pub carbs_price: Option<String>,
    pub protein_type: Option<String>,
    pub proteins_price: Option<String>,
    pub base_fat: Option<String>,
}

impl MenuItemFields {
    /// Assign a form field by its wire name. Unknown names are ignored.
    pub fn set(&mut self, name: &str, value: String) -> bool {
        let slot = match name {
            "itemName" => &mut self.item_name,
            "carbsPrice" => &mut self.carbs_price,
            "proteinType" => &mut self.protein_type,
            "proteinsPrice" => &mut self.proteins_price,
            "baseFat" => &mut self.base_fat,
            _ => return false,
        };
        *slot = Some(value);
        true
    }

    pub fn is_empty(&self) -> bool {
        self.item_name.is_none()
            && self.carbs_price.is_none()
            && self.protein_type.is_none()
            && self.proteins_price.is_none()
            && self.base_fat.is_none()
    }
}
