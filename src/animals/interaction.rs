use bevy::prelude::*;

use super::machine::{AnimalMachine, MachineState};
use super::WakesInDisplay;
use crate::shared::*;

// ─────────────────────────────────────────────────────────────────────────────
// Animal interaction
//
// The player presses Space near an animal. We resolve the closest animal
// in range and walk the guard ladder, in priority order:
//
//   loved      → ignore (already animating)
//   needsLove  → love with the requested item, or open affection select
//   sick       → cure with medicine, open select, or "No medicine" notice
//   sleeping   → toggle the wakes-in bubble
//   ready      → run the produce-drop beat sequence, then claim
//   otherwise  → feed the selected food, or open the food quick-select
//
// Every authoritative dispatch goes through the care reducers; the mirror
// event into the presentation machine is sent by the reducer itself, so
// ordering is guaranteed.
// ─────────────────────────────────────────────────────────────────────────────

/// Timed presentation beats between "produce dropped" and "produce
/// collected". A component so teardown cancels it with the entity.
#[derive(Component, Debug)]
pub struct ProduceDropSequence {
    pub stage: u8,
    pub timer: Timer,
}

impl ProduceDropSequence {
    fn new() -> Self {
        Self {
            stage: 0,
            timer: Timer::from_seconds(0.5, TimerMode::Once),
        }
    }
}

#[allow(clippy::too_many_arguments)]
pub fn handle_animal_interact(
    keyboard: Res<ButtonInput<KeyCode>>,
    player_query: Query<&Transform, With<Player>>,
    mut animal_query: Query<(
        Entity,
        &Animal,
        &AnimalMachine,
        &Transform,
        &mut WakesInDisplay,
        Option<&ProduceDropSequence>,
    )>,
    registry: Res<AnimalRegistry>,
    item_registry: Res<ItemRegistry>,
    boosts: Res<FarmBoosts>,
    inventory: Res<Inventory>,
    player_state: Res<PlayerState>,
    mut quick_select: ResMut<QuickSelect>,
    mut commands: Commands,
    mut feed_writer: EventWriter<FeedAnimalEvent>,
    mut love_writer: EventWriter<LoveAnimalEvent>,
    mut cure_writer: EventWriter<CureAnimalEvent>,
    mut popover_writer: EventWriter<PopoverEvent>,
    mut sfx_writer: EventWriter<PlaySfxEvent>,
) {
    if !keyboard.just_pressed(KeyCode::Space) {
        return;
    }
    // The quick-select panel swallows input while open.
    if quick_select.is_open() {
        return;
    }

    let Ok(player_transform) = player_query.get_single() else {
        return;
    };
    let player_pos = player_transform.translation.truncate();

    // Closest animal in range wins; one interaction per key press.
    let mut closest: Option<(f32, Entity)> = None;
    for (entity, _, _, transform, _, _) in animal_query.iter() {
        let dist = player_pos.distance(transform.translation.truncate());
        if dist <= INTERACT_RANGE && closest.map_or(true, |(d, _)| dist < d) {
            closest = Some((dist, entity));
        }
    }
    let Some((_, target)) = closest else {
        return;
    };

    let Ok((entity, animal, machine, _, mut wakes_in, drop_seq)) = animal_query.get_mut(target)
    else {
        return;
    };
    let Some(def) = registry.get(animal.species) else {
        return;
    };
    let selected = player_state.selected_item.as_deref();

    match machine.state {
        // Mid-animation; clicks do nothing.
        MachineState::Initial | MachineState::Loved | MachineState::Happy | MachineState::Sad => {}

        MachineState::NeedsLove => {
            let requested = animal.item.as_str();
            if selected == Some(requested) && inventory.has(requested, 1.0) {
                love_writer.send(LoveAnimalEvent {
                    target: entity,
                    item: requested.to_string(),
                });
            } else {
                // Offer exactly the item the animal is asking for.
                quick_select.open(
                    entity,
                    QuickSelectMode::Love,
                    vec![requested.to_string()],
                );
            }
        }

        MachineState::Sick => {
            let has_medicine = inventory.has(MEDICINE_ITEM, 1.0);
            if selected == Some(MEDICINE_ITEM) && has_medicine {
                cure_writer.send(CureAnimalEvent { target: entity });
                quick_select.close();
            } else if has_medicine {
                quick_select.open(entity, QuickSelectMode::Cure, vec![MEDICINE_ITEM.to_string()]);
            } else {
                popover_writer.send(PopoverEvent {
                    anchor: Some(entity),
                    message: "No medicine".to_string(),
                    duration_secs: 1.0,
                });
            }
        }

        MachineState::Sleeping => {
            wakes_in.visible = !wakes_in.visible;
        }

        MachineState::Ready => {
            // Already animating the drop.
            if drop_seq.is_some() {
                return;
            }
            sfx_writer.send(PlaySfxEvent {
                sfx_id: "produce_drop".to_string(),
            });
            commands.entity(entity).insert(ProduceDropSequence::new());
        }

        MachineState::Idle => {
            let quantity = required_food_qty(def, &boosts);
            let favorite = def.favorite_food(animal.experience);
            let has_favorite = inventory.has(favorite, quantity);
            let favorite_selected = selected == Some(favorite);

            if has_favorite && !favorite_selected {
                open_food_select(&mut quick_select, entity, def, &item_registry, &inventory, quantity);
                return;
            }

            let Some(food) = selected.filter(|s| item_registry.is_animal_food(s)) else {
                open_food_select(&mut quick_select, entity, def, &item_registry, &inventory, quantity);
                return;
            };

            if inventory.count(food) < quantity {
                popover_writer.send(PopoverEvent {
                    anchor: Some(entity),
                    message: "Not enough food".to_string(),
                    duration_secs: 1.0,
                });
                return;
            }

            feed_writer.send(FeedAnimalEvent {
                target: entity,
                food: food.to_string(),
            });
            quick_select.close();
        }
    }
}

/// Lists every food the player can afford to feed right now.
fn open_food_select(
    quick_select: &mut QuickSelect,
    target: Entity,
    def: &SpeciesDef,
    item_registry: &ItemRegistry,
    inventory: &Inventory,
    quantity: f64,
) {
    let mut options: Vec<ItemName> = def
        .food_experience
        .keys()
        .filter(|food| item_registry.is_animal_food(food) && inventory.has(food, quantity))
        .cloned()
        .collect();
    options.sort();
    quick_select.open(target, QuickSelectMode::Feed, options);
}

/// Ticks the produce-drop beat sequence and dispatches the claim at the
/// final beat. Stages: drop (0.5s) → collect sfx (0.9s) → claim.
pub fn tick_produce_sequences(
    mut commands: Commands,
    time: Res<Time>,
    mut query: Query<(Entity, &mut ProduceDropSequence)>,
    mut claim_writer: EventWriter<ClaimProduceEvent>,
    mut sfx_writer: EventWriter<PlaySfxEvent>,
) {
    for (entity, mut seq) in query.iter_mut() {
        seq.timer.tick(time.delta());
        if !seq.timer.just_finished() {
            continue;
        }
        match seq.stage {
            0 => {
                sfx_writer.send(PlaySfxEvent {
                    sfx_id: "collect".to_string(),
                });
                seq.stage = 1;
                seq.timer = Timer::from_seconds(0.9, TimerMode::Once);
            }
            _ => {
                claim_writer.send(ClaimProduceEvent { target: entity });
                commands.entity(entity).remove::<ProduceDropSequence>();
            }
        }
    }
}
