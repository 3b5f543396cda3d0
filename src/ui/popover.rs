use bevy::prelude::*;
use crate::shared::*;

// ═══════════════════════════════════════════════════════════════════════
// INFO POPOVERS
//
// Short-lived notices: "Not enough food", "No medicine", "Already
// restocked today". Anchored popovers follow their anchor entity and die
// with it — the timer is a component, so teardown cancels it instead of
// leaking a callback.
// ═══════════════════════════════════════════════════════════════════════

#[derive(Component, Debug)]
pub struct Popover {
    pub lifetime: Timer,
    pub anchor: Option<Entity>,
}

/// Where unanchored notices appear (world space, above the farm).
const SCREEN_NOTICE_POS: Vec3 = Vec3::new(0.0, 120.0, 5.0);

pub fn handle_popover_events(
    mut commands: Commands,
    mut events: EventReader<PopoverEvent>,
    anchor_query: Query<&Transform>,
    existing: Query<(Entity, &Popover)>,
) {
    for event in events.read() {
        // One popover per anchor: replace instead of stacking.
        for (entity, popover) in existing.iter() {
            if popover.anchor == event.anchor {
                commands.entity(entity).despawn_recursive();
            }
        }

        let position = match event.anchor {
            Some(anchor) => match anchor_query.get(anchor) {
                Ok(transform) => transform.translation + Vec3::new(0.0, 20.0, 5.0),
                Err(_) => continue, // anchor already gone
            },
            None => SCREEN_NOTICE_POS,
        };

        commands.spawn((
            Popover {
                lifetime: Timer::from_seconds(event.duration_secs, TimerMode::Once),
                anchor: event.anchor,
            },
            Text2d::new(event.message.clone()),
            TextFont {
                font_size: 8.0,
                ..default()
            },
            TextColor(Color::srgb(1.0, 0.9, 0.9)),
            Transform::from_translation(position),
            GlobalTransform::default(),
            Visibility::default(),
        ));
    }
}

pub fn update_popovers(
    mut commands: Commands,
    time: Res<Time>,
    anchor_query: Query<&Transform, Without<Popover>>,
    mut popover_query: Query<(Entity, &mut Popover, &mut Transform, &mut TextColor)>,
) {
    for (entity, mut popover, mut transform, mut color) in popover_query.iter_mut() {
        // Follow the anchor; vanish with it.
        if let Some(anchor) = popover.anchor {
            match anchor_query.get(anchor) {
                Ok(anchor_transform) => {
                    transform.translation = anchor_transform.translation + Vec3::new(0.0, 20.0, 5.0);
                }
                Err(_) => {
                    commands.entity(entity).despawn_recursive();
                    continue;
                }
            }
        }

        popover.lifetime.tick(time.delta());

        let fraction_remaining = 1.0
            - popover.lifetime.elapsed_secs() / popover.lifetime.duration().as_secs_f32();
        let current = color.0;
        color.0 = current.with_alpha(fraction_remaining.clamp(0.0, 1.0));

        if popover.lifetime.just_finished() {
            commands.entity(entity).despawn_recursive();
        }
    }
}
