//! Wishlist operations and point redemption.

use super::GameState;
use crate::events::EngineEvent;
use crate::model::wishlist::{WishlistDraft, WishlistItem, WishlistPatch};
use crate::model::RecordId;
use crate::store::StoreResult;
use log::info;

/// Result of a redemption attempt. Only `Redeemed` mutates state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Redemption {
    Redeemed { cost: u64 },
    InsufficientFunds { shortfall: u64 },
    AlreadyRedeemed,
}

impl GameState {
    pub fn add_wishlist_item(&mut self, draft: WishlistDraft) -> RecordId {
        let item = WishlistItem::from_draft(draft);
        let id = item.id.clone();
        self.wishlist.push(item);
        id
    }

    pub fn update_wishlist_item(&mut self, id: &str, patch: WishlistPatch) -> StoreResult<()> {
        self.wishlist.require_mut(id)?.apply(patch);
        Ok(())
    }

    pub fn remove_wishlist_item(&mut self, id: &str) -> StoreResult<()> {
        self.wishlist.remove(id).map(|_| ())
    }

    /// Spends `cost` points on an item when the balance covers it.
    pub fn redeem(&mut self, id: &str) -> StoreResult<Redemption> {
        let item = self.wishlist.require(id)?;
        if item.redeemed {
            return Ok(Redemption::AlreadyRedeemed);
        }

        let cost = item.cost;
        if !self.ledger.can_afford(cost) {
            let shortfall = cost - self.ledger.points();
            info!("event=redeem module=state status=skip reason=insufficient_funds id={id} shortfall={shortfall}");
            self.push_event(EngineEvent::InsufficientFunds {
                id: id.to_string(),
                shortfall,
            });
            return Ok(Redemption::InsufficientFunds { shortfall });
        }

        self.debit(cost);
        self.wishlist.require_mut(id)?.redeemed = true;
        self.push_event(EngineEvent::ItemRedeemed {
            id: id.to_string(),
            cost,
        });
        Ok(Redemption::Redeemed { cost })
    }
}
