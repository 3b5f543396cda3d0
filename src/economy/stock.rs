use bevy::prelude::*;

use crate::shared::*;

// ─────────────────────────────────────────────────────────────────────────────
// Shop purchases & produce sales
//
// Buying moves one unit from the stock ledger into the player inventory
// and deducts coins; selling moves produce the other way. Both are
// event-driven so the UI layer never touches the ledger directly.
// ─────────────────────────────────────────────────────────────────────────────

/// Fired when the player confirms buying the selected item.
#[derive(Event, Debug, Clone)]
pub struct BuyRequestEvent {
    pub item: ItemName,
    pub quantity: f64,
}

/// Fired when the player confirms selling produce from inventory.
#[derive(Event, Debug, Clone)]
pub struct SellRequestEvent {
    pub item: ItemName,
    pub quantity: f64,
}

/// B buys one of the selected item, V sells one. Selection comes from the
/// player hotbar.
pub fn shop_hotkeys(
    keyboard: Res<ButtonInput<KeyCode>>,
    player_state: Res<PlayerState>,
    mut buy_writer: EventWriter<BuyRequestEvent>,
    mut sell_writer: EventWriter<SellRequestEvent>,
) {
    let Some(selected) = player_state.selected_item.clone() else {
        return;
    };

    if keyboard.just_pressed(KeyCode::KeyB) {
        buy_writer.send(BuyRequestEvent {
            item: selected.clone(),
            quantity: 1.0,
        });
    }
    if keyboard.just_pressed(KeyCode::KeyV) {
        sell_writer.send(SellRequestEvent {
            item: selected,
            quantity: 1.0,
        });
    }
}

/// Processes BuyRequestEvents — the core purchase flow.
pub fn handle_buy(
    mut buy_events: EventReader<BuyRequestEvent>,
    item_registry: Res<ItemRegistry>,
    mut stock: ResMut<StockLedger>,
    mut inventory: ResMut<Inventory>,
    mut player_state: ResMut<PlayerState>,
    mut sfx_writer: EventWriter<PlaySfxEvent>,
    mut popover_writer: EventWriter<PopoverEvent>,
) {
    for ev in buy_events.read() {
        let Some(def) = item_registry.get(&ev.item) else {
            warn!("[Economy] Buy failed — unknown item '{}'", ev.item);
            continue;
        };

        if def.kind == ItemKind::Produce {
            // Produce is sold to the shop, never bought from it.
            continue;
        }

        if stock.count(&ev.item) < ev.quantity {
            popover_writer.send(PopoverEvent {
                anchor: None,
                message: format!("{} is out of stock", ev.item),
                duration_secs: 1.5,
            });
            sfx_writer.send(PlaySfxEvent {
                sfx_id: "ui_deny".to_string(),
            });
            continue;
        }

        let cost = def.price * ev.quantity;
        if player_state.coins < cost {
            info!(
                "[Economy] Cannot afford {} × '{}' (need {}, have {})",
                ev.quantity, ev.item, cost, player_state.coins
            );
            sfx_writer.send(PlaySfxEvent {
                sfx_id: "ui_deny".to_string(),
            });
            continue;
        }

        // All checks passed — commit the transaction.
        let remaining = stock.count(&ev.item) - ev.quantity;
        stock.set(&ev.item, remaining);
        inventory.add(&ev.item, ev.quantity);
        player_state.coins -= cost;

        sfx_writer.send(PlaySfxEvent {
            sfx_id: "purchase".to_string(),
        });
        info!(
            "[Economy] Bought {} × '{}' for {} coins. Balance: {}",
            ev.quantity, ev.item, cost, player_state.coins
        );
    }
}

/// Processes SellRequestEvents — only produce can be sold back.
pub fn handle_sell(
    mut sell_events: EventReader<SellRequestEvent>,
    item_registry: Res<ItemRegistry>,
    mut inventory: ResMut<Inventory>,
    mut player_state: ResMut<PlayerState>,
    mut sfx_writer: EventWriter<PlaySfxEvent>,
) {
    for ev in sell_events.read() {
        let Some(def) = item_registry.get(&ev.item) else {
            warn!("[Economy] Sell failed — unknown item '{}'", ev.item);
            continue;
        };

        if def.kind != ItemKind::Produce {
            continue;
        }

        if !inventory.remove(&ev.item, ev.quantity) {
            info!(
                "[Economy] Sell failed — not enough '{}' (have {}, want {})",
                ev.item,
                inventory.count(&ev.item),
                ev.quantity
            );
            continue;
        }

        let earned = def.price * ev.quantity;
        player_state.coins += earned;

        sfx_writer.send(PlaySfxEvent {
            sfx_id: "sell".to_string(),
        });
        info!(
            "[Economy] Sold {} × '{}' for {} coins. Balance: {}",
            ev.quantity, ev.item, earned, player_state.coins
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inventory_remove_refuses_overdraft() {
        let mut inv = Inventory::default();
        inv.add("Hay", 2.0);
        assert!(!inv.remove("Hay", 3.0));
        assert_eq!(inv.count("Hay"), 2.0);
        assert!(inv.remove("Hay", 2.0));
        assert_eq!(inv.count("Hay"), 0.0);
    }

    #[test]
    fn test_stock_ledger_set_overwrites() {
        let mut stock = StockLedger::default();
        stock.set("Hay", 10.0);
        stock.set("Hay", 3.0);
        assert_eq!(stock.count("Hay"), 3.0);
        assert_eq!(stock.count("missing"), 0.0);
    }
}
