//! Player domain — the avatar, its movement, and item selection.
//!
//! The selected item is what every animal interaction guard keys off:
//! feeding checks for a food, curing for medicine, loving for the
//! requested affection item.

use bevy::prelude::*;
use crate::shared::*;

/// Hotbar slots, selected with the number keys. 0 clears the selection.
pub const HOTBAR_ITEMS: &[&str] = &[
    "Hay",
    "Kernel Blend",
    "NutriBarley",
    "Mixed Grain",
    "Barn Delight",
    "Petting Hand",
    "Brush",
    "Music Box",
];

const PLAYER_SPEED: f32 = 90.0;

pub fn spawn_player(mut commands: Commands, existing: Query<(), With<Player>>) {
    if !existing.is_empty() {
        return;
    }
    commands.spawn((
        Player,
        Sprite {
            color: Color::srgb(0.3, 0.5, 0.9),
            custom_size: Some(Vec2::new(12.0, 16.0)),
            ..default()
        },
        Transform::from_xyz(0.0, -64.0, 2.0),
        GlobalTransform::default(),
        Visibility::default(),
    ));
    info!("[Player] Spawned player avatar.");
}

pub fn handle_player_movement(
    time: Res<Time>,
    keyboard: Res<ButtonInput<KeyCode>>,
    mut query: Query<&mut Transform, With<Player>>,
) {
    let Ok(mut transform) = query.get_single_mut() else {
        return;
    };

    let mut dir = Vec2::ZERO;
    if keyboard.pressed(KeyCode::KeyW) || keyboard.pressed(KeyCode::ArrowUp) {
        dir.y += 1.0;
    }
    if keyboard.pressed(KeyCode::KeyS) || keyboard.pressed(KeyCode::ArrowDown) {
        dir.y -= 1.0;
    }
    if keyboard.pressed(KeyCode::KeyA) || keyboard.pressed(KeyCode::ArrowLeft) {
        dir.x -= 1.0;
    }
    if keyboard.pressed(KeyCode::KeyD) || keyboard.pressed(KeyCode::ArrowRight) {
        dir.x += 1.0;
    }

    if dir != Vec2::ZERO {
        let step = dir.normalize() * PLAYER_SPEED * time.delta_secs();
        transform.translation.x += step.x;
        transform.translation.y += step.y;
    }
}

/// Number keys pick a hotbar item; 0 empties the hand.
pub fn handle_item_selection(
    keyboard: Res<ButtonInput<KeyCode>>,
    mut player_state: ResMut<PlayerState>,
) {
    const DIGITS: [KeyCode; 8] = [
        KeyCode::Digit1,
        KeyCode::Digit2,
        KeyCode::Digit3,
        KeyCode::Digit4,
        KeyCode::Digit5,
        KeyCode::Digit6,
        KeyCode::Digit7,
        KeyCode::Digit8,
    ];

    for (i, key) in DIGITS.iter().enumerate() {
        if keyboard.just_pressed(*key) {
            player_state.selected_item = Some(HOTBAR_ITEMS[i].to_string());
            info!("[Player] Selected '{}'", HOTBAR_ITEMS[i]);
        }
    }
    if keyboard.just_pressed(KeyCode::Digit0) {
        player_state.selected_item = None;
    }
}

pub struct PlayerPlugin;

impl Plugin for PlayerPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(OnEnter(GameState::Playing), spawn_player)
            .add_systems(
                Update,
                (handle_player_movement, handle_item_selection)
                    .run_if(in_state(GameState::Playing)),
            );
    }
}
