use bevy::prelude::*;
use rand::Rng;

use super::interaction::ProduceDropSequence;
use super::machine::{AnimalMachine, MachineState};
use super::{FloatingFeedback, WakesInDisplay};
use crate::shared::*;

// ─────────────────────────────────────────────────────────────────────────────
// Floating feedback text (XP gains, "Got Egg!", etc.)
// ─────────────────────────────────────────────────────────────────────────────

/// Convenience function called from other submodules to spawn a floating
/// text entity that drifts upward and fades out.
pub fn spawn_floating_text(commands: &mut Commands, position: Vec3, text: &str, color: Color) {
    commands.spawn((
        FloatingFeedback {
            lifetime: Timer::from_seconds(1.2, TimerMode::Once),
            velocity: Vec2::new(0.0, 18.0),
        },
        Text2d::new(text.to_string()),
        TextFont {
            font_size: 8.0,
            ..default()
        },
        TextColor(color),
        Transform::from_translation(position),
        GlobalTransform::default(),
        Visibility::default(),
    ));
}

pub fn update_floating_feedback(
    mut commands: Commands,
    time: Res<Time>,
    mut query: Query<(Entity, &mut Transform, &mut FloatingFeedback, &mut TextColor)>,
) {
    for (entity, mut transform, mut feedback, mut color) in query.iter_mut() {
        feedback.lifetime.tick(time.delta());

        let dt = time.delta_secs();
        transform.translation.x += feedback.velocity.x * dt;
        transform.translation.y += feedback.velocity.y * dt;

        let fraction_remaining =
            1.0 - feedback.lifetime.elapsed_secs() / feedback.lifetime.duration().as_secs_f32();
        let current = color.0;
        color.0 = current.with_alpha(fraction_remaining.max(0.0));

        if feedback.lifetime.just_finished() {
            commands.entity(entity).despawn_recursive();
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Sprite tint by machine state
//
// The rect sprite is the animal's body; the machine state drives its tint
// the way the original swaps sprite sheets (idle / sleeping / sick /
// ready images).
// ─────────────────────────────────────────────────────────────────────────────

pub fn update_animal_sprites(mut query: Query<(&Animal, &AnimalMachine, &mut Sprite)>) {
    for (animal, machine, mut sprite) in query.iter_mut() {
        let base = super::animal_visual(animal.species).color;
        sprite.color = match machine.state {
            MachineState::Sick => base.mix(&Color::srgb(0.35, 0.7, 0.3), 0.5),
            MachineState::Sleeping => base.darker(0.25),
            MachineState::Ready => base.lighter(0.15),
            _ => base,
        };
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Satellite entities: emotion icons and request bubbles
//
// Small Text2d entities that follow their owner animal. Each frame we
// compute the desired glyph from the machine state, then update, spawn,
// or despawn to match — the same owner-tracking scheme as the floating
// product indicators this is derived from.
// ─────────────────────────────────────────────────────────────────────────────

/// Glyph shown above the animal for the transient/expressive states.
/// Idle, needsLove, and sick show a request bubble instead.
fn emotion_glyph(state: MachineState) -> Option<(&'static str, Color)> {
    match state {
        MachineState::Ready => Some(("!", Color::srgb(1.0, 0.85, 0.2))),
        MachineState::Happy => Some((":)", Color::srgb(0.44, 0.89, 0.35))),
        MachineState::Sad => Some((":(", Color::srgb(0.6, 0.6, 0.7))),
        MachineState::Loved => Some(("<3", Color::srgb(1.0, 0.4, 0.7))),
        MachineState::Sleeping => Some(("Zzz", Color::srgb(0.7, 0.7, 1.0))),
        _ => None,
    }
}

/// What the animal is asking for, shown while idle / sick / needing love.
fn request_text(animal: &Animal, machine: &AnimalMachine, registry: &AnimalRegistry) -> Option<String> {
    match machine.state {
        MachineState::Idle => {
            let def = registry.get(animal.species)?;
            Some(def.favorite_food(animal.experience).to_string())
        }
        MachineState::Sick => Some(MEDICINE_ITEM.to_string()),
        MachineState::NeedsLove => Some(animal.item.clone()),
        _ => None,
    }
}

#[derive(Component, Debug)]
pub struct EmotionIcon {
    pub owner: Entity,
}

#[derive(Component, Debug)]
pub struct RequestBubble {
    pub owner: Entity,
}

pub fn update_emotion_icons(
    mut commands: Commands,
    animal_query: Query<(Entity, &AnimalMachine, &Transform)>,
    mut icon_query: Query<
        (Entity, &mut Transform, &mut Text2d, &mut TextColor, &EmotionIcon),
        Without<AnimalMachine>,
    >,
) {
    let mut icons_present: std::collections::HashSet<Entity> = std::collections::HashSet::new();

    for (icon_entity, mut icon_transform, mut text, mut color, icon) in icon_query.iter_mut() {
        let Ok((_, machine, owner_transform)) = animal_query.get(icon.owner) else {
            commands.entity(icon_entity).despawn_recursive();
            continue;
        };
        match emotion_glyph(machine.state) {
            Some((glyph, glyph_color)) => {
                icon_transform.translation =
                    owner_transform.translation + Vec3::new(0.0, 14.0, 2.0);
                if text.0 != glyph {
                    text.0 = glyph.to_string();
                }
                color.0 = glyph_color;
                icons_present.insert(icon.owner);
            }
            None => {
                commands.entity(icon_entity).despawn_recursive();
            }
        }
    }

    for (entity, machine, transform) in animal_query.iter() {
        if icons_present.contains(&entity) {
            continue;
        }
        let Some((glyph, color)) = emotion_glyph(machine.state) else {
            continue;
        };
        commands.spawn((
            EmotionIcon { owner: entity },
            Text2d::new(glyph.to_string()),
            TextFont {
                font_size: 8.0,
                ..default()
            },
            TextColor(color),
            Transform::from_translation(transform.translation + Vec3::new(0.0, 14.0, 2.0)),
            GlobalTransform::default(),
            Visibility::default(),
        ));
    }
}

pub fn update_request_bubbles(
    mut commands: Commands,
    registry: Res<AnimalRegistry>,
    animal_query: Query<(Entity, &Animal, &AnimalMachine, &Transform)>,
    mut bubble_query: Query<
        (Entity, &mut Transform, &mut Text2d, &RequestBubble),
        Without<AnimalMachine>,
    >,
) {
    let mut bubbles_present: std::collections::HashSet<Entity> = std::collections::HashSet::new();

    for (bubble_entity, mut bubble_transform, mut text, bubble) in bubble_query.iter_mut() {
        let Ok((_, animal, machine, owner_transform)) = animal_query.get(bubble.owner) else {
            commands.entity(bubble_entity).despawn_recursive();
            continue;
        };
        match request_text(animal, machine, &registry) {
            Some(request) => {
                bubble_transform.translation =
                    owner_transform.translation + Vec3::new(18.0, 10.0, 2.0);
                if text.0 != request {
                    text.0 = request;
                }
                bubbles_present.insert(bubble.owner);
            }
            None => {
                commands.entity(bubble_entity).despawn_recursive();
            }
        }
    }

    for (entity, animal, machine, transform) in animal_query.iter() {
        if bubbles_present.contains(&entity) {
            continue;
        }
        let Some(request) = request_text(animal, machine, &registry) else {
            continue;
        };
        commands.spawn((
            RequestBubble { owner: entity },
            Text2d::new(request),
            TextFont {
                font_size: 6.0,
                ..default()
            },
            TextColor(Color::srgb(0.95, 0.95, 0.95)),
            Transform::from_translation(transform.translation + Vec3::new(18.0, 10.0, 2.0)),
            GlobalTransform::default(),
            Visibility::default(),
        ));
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Wakes-in tooltip
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Component, Debug)]
pub struct WakesInBubble {
    pub owner: Entity,
}

fn format_wakes_in(awake_at_ms: u64, now_ms: u64) -> String {
    let remaining_ms = awake_at_ms.saturating_sub(now_ms);
    let total_minutes = remaining_ms / 60_000;
    let hours = total_minutes / 60;
    let minutes = total_minutes % 60;
    if hours > 0 {
        format!("Wakes in {}h {}m", hours, minutes)
    } else {
        format!("Wakes in {}m", minutes.max(1))
    }
}

/// Shows the countdown while the player has toggled it on a sleeping
/// animal; hides itself again once the animal wakes.
pub fn update_wakes_in_bubbles(
    mut commands: Commands,
    clock: Res<GameClock>,
    mut animal_query: Query<(Entity, &Animal, &AnimalMachine, &Transform, &mut WakesInDisplay)>,
    mut bubble_query: Query<
        (Entity, &mut Transform, &mut Text2d, &WakesInBubble),
        Without<AnimalMachine>,
    >,
) {
    let now_ms = clock.now_ms();

    // Waking clears the toggle so the tooltip doesn't linger.
    for (_, _, machine, _, mut wakes_in) in animal_query.iter_mut() {
        if machine.state != MachineState::Sleeping && wakes_in.visible {
            wakes_in.visible = false;
        }
    }

    let mut bubbles_present: std::collections::HashSet<Entity> = std::collections::HashSet::new();

    for (bubble_entity, mut bubble_transform, mut text, bubble) in bubble_query.iter_mut() {
        let Ok((_, animal, _, owner_transform, wakes_in)) = animal_query.get(bubble.owner) else {
            commands.entity(bubble_entity).despawn_recursive();
            continue;
        };
        if !wakes_in.visible {
            commands.entity(bubble_entity).despawn_recursive();
            continue;
        }
        bubble_transform.translation = owner_transform.translation + Vec3::new(0.0, 24.0, 2.0);
        text.0 = format_wakes_in(animal.awake_at_ms, now_ms);
        bubbles_present.insert(bubble.owner);
    }

    for (entity, animal, _, transform, wakes_in) in animal_query.iter() {
        if !wakes_in.visible || bubbles_present.contains(&entity) {
            continue;
        }
        commands.spawn((
            WakesInBubble { owner: entity },
            Text2d::new(format_wakes_in(animal.awake_at_ms, now_ms)),
            TextFont {
                font_size: 6.0,
                ..default()
            },
            TextColor(Color::srgb(0.8, 0.85, 1.0)),
            Transform::from_translation(transform.translation + Vec3::new(0.0, 24.0, 2.0)),
            GlobalTransform::default(),
            Visibility::default(),
        ));
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Produce-drop scatter
// ─────────────────────────────────────────────────────────────────────────────

/// When a drop sequence starts, scatter a few produce dots around the
/// animal. They ride the floating-feedback lifecycle for fade-out.
pub fn spawn_produce_drops(
    mut commands: Commands,
    query: Query<(&Animal, &Transform), Added<ProduceDropSequence>>,
) {
    let mut rng = rand::thread_rng();
    for (animal, transform) in query.iter() {
        let drops = 2 + (animal.multiplier * 4.0) as usize;
        for _ in 0..drops {
            let dx = rng.gen_range(-10.0..10.0);
            let dy = rng.gen_range(-4.0..4.0);
            commands.spawn((
                FloatingFeedback {
                    lifetime: Timer::from_seconds(1.4, TimerMode::Once),
                    velocity: Vec2::new(dx * 0.5, -12.0),
                },
                Text2d::new("o".to_string()),
                TextFont {
                    font_size: 7.0,
                    ..default()
                },
                TextColor(Color::srgb(1.0, 0.95, 0.7)),
                Transform::from_translation(
                    transform.translation + Vec3::new(dx, 10.0 + dy, 2.0),
                ),
                GlobalTransform::default(),
                Visibility::default(),
            ));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_wakes_in() {
        assert_eq!(format_wakes_in(3 * 60 * 60_000 + 5 * 60_000, 0), "Wakes in 3h 5m");
        assert_eq!(format_wakes_in(10 * 60_000, 0), "Wakes in 10m");
        // Already past: clamps to the minimum display.
        assert_eq!(format_wakes_in(0, 1_000), "Wakes in 1m");
    }

    #[test]
    fn test_emotion_glyph_only_for_expressive_states() {
        assert!(emotion_glyph(MachineState::Idle).is_none());
        assert!(emotion_glyph(MachineState::NeedsLove).is_none());
        assert!(emotion_glyph(MachineState::Sick).is_none());
        assert!(emotion_glyph(MachineState::Initial).is_none());
        assert!(emotion_glyph(MachineState::Ready).is_some());
        assert!(emotion_glyph(MachineState::Sleeping).is_some());
    }
}
