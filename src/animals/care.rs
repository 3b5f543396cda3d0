use bevy::prelude::*;
use rand::Rng;

use super::machine::{MachineEvent, MirrorEvent};
use super::spawn_floating_text;
use crate::shared::*;

// ─────────────────────────────────────────────────────────────────────────────
// Authoritative care reducers
//
// These systems are the only writers of the Animal record. Each one
// validates its request, mutates the record, and then emits the mirror
// event for the presentation machine. The plugin chains the machine
// systems after these, so a mirror event always sees the post-mutation
// record.
//
// Invalid requests (wrong status, missing items) are ignored with a log
// line — the interaction layer guards them, so reaching one here means a
// race between the guard and the reducer, which is harmless.
// ─────────────────────────────────────────────────────────────────────────────

/// Chance that a waking animal comes up sick instead of wanting love.
const WAKE_SICKNESS_CHANCE: f64 = 0.15;

pub fn handle_feed(
    mut commands: Commands,
    mut feed_events: EventReader<FeedAnimalEvent>,
    registry: Res<AnimalRegistry>,
    boosts: Res<FarmBoosts>,
    mut inventory: ResMut<Inventory>,
    mut animal_query: Query<(&mut Animal, &Transform)>,
    mut mirror_writer: EventWriter<MirrorEvent>,
    mut sfx_writer: EventWriter<PlaySfxEvent>,
) {
    for ev in feed_events.read() {
        let Ok((mut animal, transform)) = animal_query.get_mut(ev.target) else {
            continue;
        };
        if animal.status != AnimalStatus::Idle {
            continue;
        }
        let Some(def) = registry.get(animal.species) else {
            warn!("[Animals] No species def for {:?}", animal.species);
            continue;
        };

        let quantity = required_food_qty(def, &boosts);
        if !inventory.remove(&ev.food, quantity) {
            info!(
                "[Animals] Feed ignored — not enough '{}' (need {})",
                ev.food, quantity
            );
            continue;
        }

        let favorite = def.favorite_food(animal.experience) == ev.food;
        let gained = def.food_xp(&ev.food, animal.experience);
        let level_before = def.level(animal.experience);
        animal.experience += gained;
        let level_after = def.level(animal.experience);

        // Crossing a level threshold makes the produce ready to claim.
        if level_after > level_before {
            animal.status = AnimalStatus::Ready;
            sfx_writer.send(PlaySfxEvent {
                sfx_id: "level_up".to_string(),
            });
            spawn_floating_text(
                &mut commands,
                transform.translation + Vec3::new(0.0, 22.0, 2.0),
                &format!("Level {}!", level_after),
                Color::srgb(1.0, 0.85, 0.2),
            );
            info!(
                "[Animals] {} ({}) reached level {}",
                animal.name,
                animal.species.display_name(),
                level_after
            );
        }

        let xp_color = if favorite {
            Color::srgb(0.44, 0.89, 0.35)
        } else {
            Color::srgb(1.0, 1.0, 1.0)
        };
        spawn_floating_text(
            &mut commands,
            transform.translation + Vec3::new(0.0, 14.0, 2.0),
            &format!("+{:.0} XP", gained),
            xp_color,
        );

        sfx_writer.send(PlaySfxEvent {
            sfx_id: "feed_animal".to_string(),
        });
        mirror_writer.send(MirrorEvent {
            target: ev.target,
            event: MachineEvent::Feed { favorite },
        });
    }
}

pub fn handle_love(
    mut love_events: EventReader<LoveAnimalEvent>,
    registry: Res<AnimalRegistry>,
    clock: Res<GameClock>,
    mut inventory: ResMut<Inventory>,
    mut animal_query: Query<&mut Animal>,
    mut mirror_writer: EventWriter<MirrorEvent>,
    mut sfx_writer: EventWriter<PlaySfxEvent>,
) {
    for ev in love_events.read() {
        let Ok(mut animal) = animal_query.get_mut(ev.target) else {
            continue;
        };
        if animal.status != AnimalStatus::NeedsLove || ev.item != animal.item {
            continue;
        }
        let Some(def) = registry.get(animal.species) else {
            continue;
        };
        if !inventory.remove(&ev.item, 1.0) {
            info!("[Animals] Love ignored — no '{}' in inventory", ev.item);
            continue;
        }

        animal.experience += def.love_experience;
        animal.status = AnimalStatus::Loved;
        animal.loved_until_ms = clock.now_ms() + LOVED_DURATION_MS;

        sfx_writer.send(PlaySfxEvent {
            sfx_id: "feed_animal".to_string(),
        });
        mirror_writer.send(MirrorEvent {
            target: ev.target,
            event: MachineEvent::Love,
        });
        info!("[Animals] {} was loved with '{}'", animal.name, ev.item);
    }
}

pub fn handle_cure(
    mut cure_events: EventReader<CureAnimalEvent>,
    mut inventory: ResMut<Inventory>,
    mut animal_query: Query<&mut Animal>,
    mut mirror_writer: EventWriter<MirrorEvent>,
    mut sfx_writer: EventWriter<PlaySfxEvent>,
) {
    for ev in cure_events.read() {
        let Ok(mut animal) = animal_query.get_mut(ev.target) else {
            continue;
        };
        if animal.status != AnimalStatus::Sick {
            continue;
        }
        if !inventory.remove(MEDICINE_ITEM, 1.0) {
            info!("[Animals] Cure ignored — no {} in inventory", MEDICINE_ITEM);
            continue;
        }

        animal.status = AnimalStatus::Idle;

        sfx_writer.send(PlaySfxEvent {
            sfx_id: "cure_animal".to_string(),
        });
        mirror_writer.send(MirrorEvent {
            target: ev.target,
            event: MachineEvent::Cure,
        });
        info!("[Animals] {} was cured", animal.name);
    }
}

pub fn handle_claim_produce(
    mut commands: Commands,
    mut claim_events: EventReader<ClaimProduceEvent>,
    registry: Res<AnimalRegistry>,
    clock: Res<GameClock>,
    mut inventory: ResMut<Inventory>,
    mut animal_query: Query<(&mut Animal, &Transform)>,
    mut mirror_writer: EventWriter<MirrorEvent>,
    mut sfx_writer: EventWriter<PlaySfxEvent>,
) {
    for ev in claim_events.read() {
        let Ok((mut animal, transform)) = animal_query.get_mut(ev.target) else {
            continue;
        };
        if animal.status != AnimalStatus::Ready {
            continue;
        }
        let Some(def) = registry.get(animal.species) else {
            continue;
        };

        let yield_amount = def.base_yield * (1.0 + animal.multiplier);
        inventory.add(&def.produce, yield_amount);

        // Rest cycle: sleep until awake_at, then request affection.
        animal.status = AnimalStatus::Sleeping;
        animal.awake_at_ms = clock.now_ms() + def.rest_duration_ms;

        // Pick the affection item it will ask for on waking.
        let mut rng = rand::thread_rng();
        let idx = rng.gen_range(0..def.love_items.len());
        animal.item = def.love_items[idx].clone();

        spawn_floating_text(
            &mut commands,
            transform.translation + Vec3::new(0.0, 14.0, 2.0),
            &format!("Got {} x{:.1}!", def.produce, yield_amount),
            Color::srgb(0.9, 0.8, 0.2),
        );
        sfx_writer.send(PlaySfxEvent {
            sfx_id: "collect".to_string(),
        });
        mirror_writer.send(MirrorEvent {
            target: ev.target,
            event: MachineEvent::ClaimProduce,
        });
        info!(
            "[Animals] Claimed {} x{:.1} from {}; asleep until {}ms",
            def.produce, yield_amount, animal.name, animal.awake_at_ms
        );
    }
}

/// Repeating timer driving the authoritative time-based transitions.
#[derive(Resource, Debug)]
pub struct CareTickTimer(pub Timer);

impl Default for CareTickTimer {
    fn default() -> Self {
        Self(Timer::from_seconds(SLEEP_POLL_SECS, TimerMode::Repeating))
    }
}

/// Moves the authoritative record past its timed states:
///   - Sleeping animals wake once `awake_at` passes; most want affection,
///     some wake up sick. Sickness here is the external signal the
///     presentation machine force-syncs on.
///   - Loved animals settle back to Idle when the affection glow expires.
pub fn tick_timed_statuses(
    time: Res<Time>,
    clock: Res<GameClock>,
    mut tick: ResMut<CareTickTimer>,
    mut animal_query: Query<&mut Animal>,
) {
    tick.0.tick(time.delta());
    if !tick.0.just_finished() {
        return;
    }

    let now_ms = clock.now_ms();
    let mut rng = rand::thread_rng();

    for mut animal in animal_query.iter_mut() {
        match animal.status {
            AnimalStatus::Sleeping if now_ms >= animal.awake_at_ms => {
                if rng.gen_bool(WAKE_SICKNESS_CHANCE) {
                    animal.status = AnimalStatus::Sick;
                    info!("[Animals] {} woke up sick", animal.name);
                } else {
                    animal.status = AnimalStatus::NeedsLove;
                    info!(
                        "[Animals] {} woke up and wants its {}",
                        animal.name, animal.item
                    );
                }
            }
            AnimalStatus::Loved if now_ms >= animal.loved_until_ms => {
                animal.status = AnimalStatus::Idle;
            }
            _ => {}
        }
    }
}
