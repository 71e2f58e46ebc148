//! Wishlist reward record.

use crate::model::{new_record_id, Record, RecordId};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WishlistItem {
    pub id: RecordId,
    pub name: String,
    /// Price in points.
    pub cost: u64,
    /// One-way: once redeemed the cost is spent and never refunded.
    #[serde(default)]
    pub redeemed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

impl WishlistItem {
    pub fn from_draft(draft: WishlistDraft) -> Self {
        Self {
            id: new_record_id(),
            name: draft.name,
            cost: draft.cost,
            redeemed: false,
            image: draft.image,
        }
    }

    pub fn apply(&mut self, patch: WishlistPatch) {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(cost) = patch.cost {
            self.cost = cost;
        }
        if let Some(image) = patch.image {
            self.image = image;
        }
    }
}

impl Record for WishlistItem {
    fn id(&self) -> &str {
        &self.id
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WishlistDraft {
    pub name: String,
    pub cost: u64,
    pub image: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WishlistPatch {
    pub name: Option<String>,
    pub cost: Option<u64>,
    pub image: Option<Option<String>>,
}
