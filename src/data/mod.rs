//! Data layer — populates all registries at game startup.
//!
//! This plugin runs in OnEnter(GameState::Loading), fills the registries
//! (AnimalRegistry, ItemRegistry) and the shop stock from the hard-coded
//! game-design data defined in submodules, then transitions the game into
//! GameState::MainMenu.
//!
//! No other domain needs to seed these resources. All domain plugins can
//! safely read them once GameState has advanced past Loading.

mod animals;
mod items;
mod shipments;

use bevy::prelude::*;
use crate::shared::*;

pub struct DataPlugin;

impl Plugin for DataPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(OnEnter(GameState::Loading), load_all_data);
    }
}

/// Single system that populates every registry and then transitions to
/// MainMenu. ItemRegistry entries are referenced by string name from the
/// species tables, so there is no hard ordering dependency here.
fn load_all_data(
    mut animal_registry: ResMut<AnimalRegistry>,
    mut item_registry: ResMut<ItemRegistry>,
    mut stock: ResMut<StockLedger>,
    mut inventory: ResMut<Inventory>,
    mut next_state: ResMut<NextState<GameState>>,
) {
    info!("DataPlugin: populating registries…");

    items::populate_items(&mut item_registry);
    info!("  Items loaded: {}", item_registry.items.len());

    animals::populate_species(&mut animal_registry);
    info!("  Species loaded: {}", animal_registry.species.len());

    shipments::seed_initial_stock(&mut stock);
    info!("  Shop stock seeded: {} listings", stock.stock.len());

    shipments::seed_starting_inventory(&mut inventory);
    info!("  Starting inventory: {} item kinds", inventory.items.len());

    info!("DataPlugin: all registries populated. Transitioning to MainMenu.");
    next_state.set(GameState::MainMenu);
}
