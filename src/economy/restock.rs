use bevy::prelude::*;
use std::fmt;

use crate::shared::*;

// ─────────────────────────────────────────────────────────────────────────────
// Shipment restock
//
// The shop's stock is replenished once per in-game day by a shipment. The
// reducer is pure: given the current stock ledger, the shipment record, and
// the current wall-clock time, it either returns the fully restocked state
// or fails without touching anything.
//
// Restock is an absolute reset — every item in SHIPMENT_STOCK is SET to its
// table quantity, overwriting whatever was there, including values above
// the baseline. Confirmed intended behavior, not a top-up.
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RestockError {
    /// The 24h cooldown since the last restock has not elapsed.
    AlreadyRestockedToday,
}

impl fmt::Display for RestockError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RestockError::AlreadyRestockedToday => write!(f, "Already restocked today"),
        }
    }
}

impl std::error::Error for RestockError {}

/// Pure restock reducer.
///
/// Succeeds only when at least `RESTOCK_COOLDOWN_MS` has passed since
/// `shipments.restocked_at_ms`. On success, every entry of
/// `SHIPMENT_STOCK` is set to its fixed quantity and the shipment record
/// is stamped with `now_ms`. On failure the inputs are untouched.
pub fn shipment_restock(
    stock: &StockLedger,
    shipments: &Shipments,
    now_ms: u64,
) -> Result<(StockLedger, Shipments), RestockError> {
    if now_ms.saturating_sub(shipments.restocked_at_ms) < RESTOCK_COOLDOWN_MS {
        return Err(RestockError::AlreadyRestockedToday);
    }

    let mut restocked = stock.clone();
    for (item, quantity) in SHIPMENT_STOCK {
        restocked.set(item, *quantity);
    }

    Ok((
        restocked,
        Shipments {
            restocked_at_ms: now_ms,
        },
    ))
}

// ─────────────────────────────────────────────────────────────────────────────
// Systems
// ─────────────────────────────────────────────────────────────────────────────

/// Pressing R asks for a restock. The shop clerk would normally do this;
/// here it is a hotkey.
pub fn restock_hotkey(
    keyboard: Res<ButtonInput<KeyCode>>,
    mut restock_writer: EventWriter<RestockRequestEvent>,
) {
    if keyboard.just_pressed(KeyCode::KeyR) {
        restock_writer.send(RestockRequestEvent);
    }
}

/// Applies restock requests against the shared stock/shipment resources.
/// The cooldown error is surfaced to the player as a popover; the ledger
/// is left untouched in that case.
pub fn handle_restock_request(
    mut restock_events: EventReader<RestockRequestEvent>,
    clock: Res<GameClock>,
    mut stock: ResMut<StockLedger>,
    mut shipments: ResMut<Shipments>,
    mut popover_writer: EventWriter<PopoverEvent>,
    mut sfx_writer: EventWriter<PlaySfxEvent>,
) {
    for _ in restock_events.read() {
        let now_ms = clock.now_ms();
        match shipment_restock(&stock, &shipments, now_ms) {
            Ok((new_stock, new_shipments)) => {
                *stock = new_stock;
                *shipments = new_shipments;
                sfx_writer.send(PlaySfxEvent {
                    sfx_id: "restock".to_string(),
                });
                info!(
                    "[Economy] Shipment restocked: {} listings reset at {}ms",
                    SHIPMENT_STOCK.len(),
                    now_ms
                );
            }
            Err(err) => {
                popover_writer.send(PopoverEvent {
                    anchor: None,
                    message: err.to_string(),
                    duration_secs: 1.5,
                });
                sfx_writer.send(PlaySfxEvent {
                    sfx_id: "ui_deny".to_string(),
                });
                warn!("[Economy] Restock refused: {}", err);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_restock_resets_stock_to_table_values() {
        let mut stock = StockLedger::default();
        stock.set("Sunflower Seed", 5.0);
        let shipments = Shipments {
            // 2023-04-04 00:00:00 UTC
            restocked_at_ms: 1_680_566_400_000,
        };
        let now_ms = 1_680_566_400_000 + 2 * MS_PER_DAY;

        let (new_stock, new_shipments) =
            shipment_restock(&stock, &shipments, now_ms).expect("cooldown elapsed");

        assert_eq!(
            new_stock.count("Sunflower Seed"),
            shipment_quantity("Sunflower Seed").unwrap()
        );
        assert_eq!(new_shipments.restocked_at_ms, now_ms);
    }

    #[test]
    fn test_restock_is_absolute_reset_downward() {
        let mut stock = StockLedger::default();
        // Above-baseline stock gets clobbered back to the table value.
        stock.set("Hay", 999.0);
        let shipments = Shipments { restocked_at_ms: 0 };

        let (new_stock, _) =
            shipment_restock(&stock, &shipments, MS_PER_DAY).expect("cooldown elapsed");

        assert_eq!(new_stock.count("Hay"), shipment_quantity("Hay").unwrap());
    }

    #[test]
    fn test_restock_fails_within_cooldown() {
        let stock = StockLedger::default();
        let now_ms = 1_700_000_000_000;
        let shipments = Shipments {
            restocked_at_ms: now_ms,
        };

        let err = shipment_restock(&stock, &shipments, now_ms).unwrap_err();
        assert_eq!(err, RestockError::AlreadyRestockedToday);
        assert_eq!(err.to_string(), "Already restocked today");
    }

    #[test]
    fn test_restock_boundary_exactly_24h() {
        let stock = StockLedger::default();
        let shipments = Shipments {
            restocked_at_ms: 1_000,
        };

        // One millisecond short: refused.
        assert!(shipment_restock(&stock, &shipments, 1_000 + RESTOCK_COOLDOWN_MS - 1).is_err());
        // Exactly the cooldown: allowed.
        assert!(shipment_restock(&stock, &shipments, 1_000 + RESTOCK_COOLDOWN_MS).is_ok());
    }

    #[test]
    fn test_restock_preserves_unlisted_stock() {
        let mut stock = StockLedger::default();
        stock.set("Egg", 7.0);
        let shipments = Shipments { restocked_at_ms: 0 };

        let (new_stock, _) =
            shipment_restock(&stock, &shipments, MS_PER_DAY).expect("cooldown elapsed");

        // Items outside the shipment table are left alone.
        assert_eq!(new_stock.count("Egg"), 7.0);
    }
}
