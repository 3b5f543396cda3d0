//! Shared components, resources, events, and states for Cluckstead.
//!
//! This is the type contract. Every domain plugin imports from here.
//! No domain imports from any other domain directly.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::{SystemTime, UNIX_EPOCH};

// ═══════════════════════════════════════════════════════════════════════
// GAME STATE — top-level state machine
// ═══════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, States, Default)]
pub enum GameState {
    #[default]
    Loading,
    MainMenu,
    Playing,
    Paused,
}

// ═══════════════════════════════════════════════════════════════════════
// GAME CLOCK
//
// Authoritative timestamps (restock cooldown, animal wake times) are
// wall-clock milliseconds since the Unix epoch, matching the server-owned
// farm state the client mirrors. Headless tests freeze the clock instead
// of sleeping through cooldowns.
// ═══════════════════════════════════════════════════════════════════════

#[derive(Resource, Debug, Clone, Default)]
pub struct GameClock {
    /// When set, `now_ms()` returns this value instead of the real time.
    pub frozen_now_ms: Option<u64>,
}

impl GameClock {
    pub fn now_ms(&self) -> u64 {
        match self.frozen_now_ms {
            Some(ms) => ms,
            None => wall_clock_ms(),
        }
    }

    /// Freezes the clock at `ms`. Used by tests and debug tooling.
    pub fn freeze(&mut self, ms: u64) {
        self.frozen_now_ms = Some(ms);
    }
}

pub fn wall_clock_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

// ═══════════════════════════════════════════════════════════════════════
// ITEMS & INVENTORY
// ═══════════════════════════════════════════════════════════════════════

pub type ItemName = String;

/// Player-held items. Quantities are non-negative decimals; the shop and
/// care reducers deal in fractional boost-adjusted amounts.
#[derive(Resource, Debug, Clone, Default, Serialize, Deserialize)]
pub struct Inventory {
    pub items: HashMap<ItemName, f64>,
}

impl Inventory {
    pub fn count(&self, item: &str) -> f64 {
        self.items.get(item).copied().unwrap_or(0.0)
    }

    pub fn has(&self, item: &str, quantity: f64) -> bool {
        self.count(item) >= quantity
    }

    pub fn add(&mut self, item: &str, quantity: f64) {
        *self.items.entry(item.to_string()).or_insert(0.0) += quantity;
    }

    /// Removes `quantity` of `item`. Returns false (and removes nothing)
    /// if the inventory holds less than that.
    pub fn remove(&mut self, item: &str, quantity: f64) -> bool {
        let Some(held) = self.items.get_mut(item) else {
            return false;
        };
        if *held < quantity {
            return false;
        }
        *held -= quantity;
        if *held <= 0.0 {
            self.items.remove(item);
        }
        true
    }
}

/// Player-global state: coins and the currently selected hotbar item.
/// `selected_item` drives every animal interaction guard.
#[derive(Resource, Debug, Clone, Default, Serialize, Deserialize)]
pub struct PlayerState {
    pub coins: f64,
    pub selected_item: Option<ItemName>,
}

// ═══════════════════════════════════════════════════════════════════════
// SHOP STOCK & SHIPMENTS
// ═══════════════════════════════════════════════════════════════════════

/// The shop's purchasable stock. Mutated only by purchases and the
/// shipment restock reducer.
#[derive(Resource, Debug, Clone, Default, Serialize, Deserialize)]
pub struct StockLedger {
    pub stock: HashMap<ItemName, f64>,
}

impl StockLedger {
    pub fn count(&self, item: &str) -> f64 {
        self.stock.get(item).copied().unwrap_or(0.0)
    }

    pub fn set(&mut self, item: &str, quantity: f64) {
        self.stock.insert(item.to_string(), quantity);
    }
}

/// Timestamp of the last successful shipment restock. Owned by the global
/// game state; mutated exclusively by the restock reducer.
#[derive(Resource, Debug, Clone, Default, Serialize, Deserialize)]
pub struct Shipments {
    pub restocked_at_ms: u64,
}

// ═══════════════════════════════════════════════════════════════════════
// ANIMALS — authoritative records
// ═══════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AnimalSpecies {
    Chicken,
    Cow,
    Sheep,
}

impl AnimalSpecies {
    pub fn display_name(self) -> &'static str {
        match self {
            AnimalSpecies::Chicken => "Chicken",
            AnimalSpecies::Cow => "Cow",
            AnimalSpecies::Sheep => "Sheep",
        }
    }
}

/// Authoritative lifecycle status. The per-entity presentation machine in
/// the animals domain mirrors this with lag; only `Sick` forces an
/// unconditional reconciliation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum AnimalStatus {
    #[default]
    Idle,
    Ready,
    Sleeping,
    Sick,
    NeedsLove,
    Loved,
}

/// One farm animal's authoritative care record. Mutated only by the care
/// reducers in the animals domain; everything else reads it.
#[derive(Component, Debug, Clone, Serialize, Deserialize)]
pub struct Animal {
    pub id: u32,
    pub name: String,
    pub species: AnimalSpecies,
    pub experience: f64,
    pub status: AnimalStatus,
    /// When a sleeping animal wakes (epoch ms). Meaningless unless Sleeping.
    pub awake_at_ms: u64,
    /// When a loved animal settles back to idle (epoch ms).
    pub loved_until_ms: u64,
    /// Produce yield factor: claim grants base_yield * (1 + multiplier).
    pub multiplier: f64,
    /// The affection item this animal requests while it needs love.
    pub item: ItemName,
}

// ═══════════════════════════════════════════════════════════════════════
// DATA REGISTRIES — populated by the data domain at Loading
// ═══════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone)]
pub struct SpeciesDef {
    pub species: AnimalSpecies,
    pub produce: ItemName,
    pub base_yield: f64,
    /// How long the animal sleeps after its produce is claimed.
    pub rest_duration_ms: u64,
    /// Food units consumed per feed (before boosts).
    pub required_food_qty: f64,
    /// Cumulative experience needed to reach level 1, 2, … Level 0 is free.
    pub level_thresholds: Vec<f64>,
    /// Favorite food per level; cycles when the level exceeds the list.
    pub favorite_foods: Vec<ItemName>,
    /// Base experience granted per unit feed of each food.
    pub food_experience: HashMap<ItemName, f64>,
    /// Multiplier applied when the fed food is the current favorite.
    pub favorite_bonus: f64,
    /// Affection items the animal may request, in rotation.
    pub love_items: Vec<ItemName>,
    pub love_experience: f64,
}

impl SpeciesDef {
    /// Level is the number of thresholds at or below `experience`.
    pub fn level(&self, experience: f64) -> usize {
        self.level_thresholds
            .iter()
            .take_while(|t| experience >= **t)
            .count()
    }

    /// The species- and experience-dependent favorite food.
    pub fn favorite_food(&self, experience: f64) -> &str {
        let idx = self.level(experience) % self.favorite_foods.len();
        &self.favorite_foods[idx]
    }

    /// Experience granted for feeding one required-quantity serving of `food`.
    pub fn food_xp(&self, food: &str, experience: f64) -> f64 {
        let base = self.food_experience.get(food).copied().unwrap_or(0.0);
        if self.favorite_food(experience) == food {
            base * self.favorite_bonus
        } else {
            base
        }
    }
}

#[derive(Resource, Debug, Clone, Default)]
pub struct AnimalRegistry {
    pub species: HashMap<AnimalSpecies, SpeciesDef>,
}

impl AnimalRegistry {
    pub fn get(&self, species: AnimalSpecies) -> Option<&SpeciesDef> {
        self.species.get(&species)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ItemKind {
    Food,
    Medicine,
    LoveItem,
    Produce,
    Seed,
}

#[derive(Debug, Clone)]
pub struct ItemDef {
    pub id: ItemName,
    pub kind: ItemKind,
    /// Shop price in coins. Produce is sold, not bought; its price is the
    /// sell value.
    pub price: f64,
}

#[derive(Resource, Debug, Clone, Default)]
pub struct ItemRegistry {
    pub items: HashMap<ItemName, ItemDef>,
}

impl ItemRegistry {
    pub fn get(&self, id: &str) -> Option<&ItemDef> {
        self.items.get(id)
    }

    pub fn is_animal_food(&self, id: &str) -> bool {
        self.get(id).map_or(false, |def| def.kind == ItemKind::Food)
    }
}

/// Farm-wide boosts that adjust data-driven lookups. Kept as a resource so
/// the required-quantity computation stays a pure function of its inputs.
#[derive(Resource, Debug, Clone, Serialize, Deserialize)]
pub struct FarmBoosts {
    /// Multiplier on the food quantity a feed consumes (1.0 = no boost).
    pub food_quantity_factor: f64,
}

impl Default for FarmBoosts {
    fn default() -> Self {
        Self {
            food_quantity_factor: 1.0,
        }
    }
}

/// Boost-adjusted food units one feed of this species consumes.
pub fn required_food_qty(def: &SpeciesDef, boosts: &FarmBoosts) -> f64 {
    def.required_food_qty * boosts.food_quantity_factor
}

// ═══════════════════════════════════════════════════════════════════════
// SHIPMENT TABLE
// ═══════════════════════════════════════════════════════════════════════

/// Fixed replenishment table: a successful restock sets each listed item's
/// stock to exactly this quantity — an absolute reset, down as well as up.
/// Exposed so consumers can read expected post-restock values.
pub const SHIPMENT_STOCK: &[(&str, f64)] = &[
    ("Sunflower Seed", 100.0),
    ("Potato Seed", 50.0),
    ("Pumpkin Seed", 30.0),
    ("Carrot Seed", 20.0),
    ("Hay", 60.0),
    ("Kernel Blend", 40.0),
    ("NutriBarley", 25.0),
    ("Mixed Grain", 25.0),
    ("Barn Delight", 5.0),
    ("Petting Hand", 3.0),
    ("Brush", 3.0),
    ("Music Box", 1.0),
];

/// Replenishment quantity for `item`, if the shipment carries it.
pub fn shipment_quantity(item: &str) -> Option<f64> {
    SHIPMENT_STOCK
        .iter()
        .find(|(name, _)| *name == item)
        .map(|(_, qty)| *qty)
}

// ═══════════════════════════════════════════════════════════════════════
// CROSS-DOMAIN EVENTS
// ═══════════════════════════════════════════════════════════════════════

/// Sent by the UI/interaction layer to request a shipment restock.
#[derive(Event, Debug, Clone)]
pub struct RestockRequestEvent;

/// Feed request against one animal entity. The care reducer validates and
/// applies it; the interaction layer has already guarded the common cases.
#[derive(Event, Debug, Clone)]
pub struct FeedAnimalEvent {
    pub target: Entity,
    pub food: ItemName,
}

/// Affection request. Only meaningful while the animal needs love and the
/// requested item is supplied.
#[derive(Event, Debug, Clone)]
pub struct LoveAnimalEvent {
    pub target: Entity,
    pub item: ItemName,
}

/// Medicine request against a sick animal.
#[derive(Event, Debug, Clone)]
pub struct CureAnimalEvent {
    pub target: Entity,
}

/// Produce claim against a ready animal.
#[derive(Event, Debug, Clone)]
pub struct ClaimProduceEvent {
    pub target: Entity,
}

// ═══════════════════════════════════════════════════════════════════════
// QUICK SELECT
// ═══════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum QuickSelectMode {
    #[default]
    Feed,
    Cure,
    Love,
}

/// The quick-select panel: opened by the interaction layer with a target
/// animal and a list of options, rendered and resolved by the UI domain.
#[derive(Resource, Debug, Clone, Default)]
pub struct QuickSelect {
    pub open_for: Option<Entity>,
    pub mode: QuickSelectMode,
    pub options: Vec<ItemName>,
}

impl QuickSelect {
    pub fn open(&mut self, target: Entity, mode: QuickSelectMode, options: Vec<ItemName>) {
        self.open_for = Some(target);
        self.mode = mode;
        self.options = options;
    }

    pub fn close(&mut self) {
        self.open_for = None;
        self.options.clear();
    }

    pub fn is_open(&self) -> bool {
        self.open_for.is_some()
    }
}

/// One-shot sound effect request, consumed by the UI domain.
#[derive(Event, Debug, Clone)]
pub struct PlaySfxEvent {
    pub sfx_id: String,
}

/// Short-lived notice anchored near a world entity (or screen-centered
/// when no anchor is given). Consumed by the UI domain.
#[derive(Event, Debug, Clone)]
pub struct PopoverEvent {
    pub anchor: Option<Entity>,
    pub message: String,
    pub duration_secs: f32,
}

// ═══════════════════════════════════════════════════════════════════════
// PLAYER
// ═══════════════════════════════════════════════════════════════════════

/// Marker for the player avatar entity.
#[derive(Component, Debug, Clone, Copy)]
pub struct Player;

// ═══════════════════════════════════════════════════════════════════════
// CONSTANTS
// ═══════════════════════════════════════════════════════════════════════

pub const TILE_SIZE: f32 = 16.0;
pub const PIXEL_SCALE: f32 = 3.0; // render scale (16px × 3 = 48px on screen)
pub const SCREEN_WIDTH: f32 = 960.0;
pub const SCREEN_HEIGHT: f32 = 540.0;

pub const MS_PER_DAY: u64 = 24 * 60 * 60 * 1000;

/// Minimum elapsed time between successive shipment restocks.
pub const RESTOCK_COOLDOWN_MS: u64 = MS_PER_DAY;

/// The one medicine item. Curing always consumes exactly one.
pub const MEDICINE_ITEM: &str = "Barn Delight";

/// How long transient emotion states (happy/sad) linger before settling.
pub const EMOTION_SETTLE_SECS: f32 = 1.6;

/// How long the loved state lingers before reverting to idle.
pub const LOVED_DURATION_MS: u64 = 3000;

/// Cadence of the sleep/wake poll. Waking is timer-driven, not instant.
pub const SLEEP_POLL_SECS: f32 = 1.0;

/// Player-to-animal interaction range in world pixels (≈2 tiles).
pub const INTERACT_RANGE: f32 = 32.0;
