//! Economy domain — shop stock, purchases, and the daily shipment restock.
//!
//! All cross-domain communication goes through `crate::shared::*` events and
//! resources. No other domain module is imported here.

use bevy::prelude::*;
use crate::shared::*;

pub mod restock;
pub mod stock;

use restock::{handle_restock_request, restock_hotkey};
use stock::{handle_buy, handle_sell, shop_hotkeys, BuyRequestEvent, SellRequestEvent};

// ─────────────────────────────────────────────────────────────────────────────
// Plugin
// ─────────────────────────────────────────────────────────────────────────────

pub struct EconomyPlugin;

impl Plugin for EconomyPlugin {
    fn build(&self, app: &mut App) {
        // ── Internal Events ────────────────────────────────────────────────
        app.add_event::<BuyRequestEvent>()
            .add_event::<SellRequestEvent>();

        // ── Systems: Playing state ─────────────────────────────────────────
        app.add_systems(
            Update,
            (
                // Hotkeys feed the event queues below.
                restock_hotkey,
                shop_hotkeys,
                // Restock requests can come from any domain (hotkey, UI).
                handle_restock_request,
                // Purchases and produce sales.
                handle_buy,
                handle_sell,
            )
                .run_if(in_state(GameState::Playing)),
        );

        info!("[Economy] EconomyPlugin registered.");
    }
}
