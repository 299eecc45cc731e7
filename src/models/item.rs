use garde::Validate;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Product category of a try-on item.
///
/// Unknown category strings deserialize to `Other` and are treated like a
/// single necklace by the prompt policy table.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, EnumString, Display, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ItemType {
    Necklace,
    Earring,
    Set,
    Clothing,
    #[serde(other)]
    Other,
}

/// A catalog entry or ad-hoc upload to place on the customer photo.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct TryOnItem {
    #[serde(default)]
    #[garde(skip)]
    pub id: serde_json::Value,

    #[garde(length(min = 1, max = 200))]
    pub name: String,

    #[serde(rename = "type")]
    #[garde(skip)]
    pub item_type: ItemType,

    /// Product photo as a data URI or http(s) URL.
    #[garde(length(min = 1))]
    pub src: String,
}

impl TryOnItem {
    pub fn new(name: impl Into<String>, item_type: ItemType, src: impl Into<String>) -> Self {
        Self {
            id: serde_json::Value::Null,
            name: name.into(),
            item_type,
            src: src.into(),
        }
    }
}
