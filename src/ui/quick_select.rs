use bevy::prelude::*;
use crate::shared::*;

// ═══════════════════════════════════════════════════════════════════════
// QUICK SELECT PANEL
//
// Opened by the animal interaction layer with a target entity and a list
// of options (foods, the medicine, or the requested affection item). The
// player picks with the number keys; the panel dispatches the matching
// care event and closes. Escape closes without choosing.
// ═══════════════════════════════════════════════════════════════════════

/// Marker for the panel root node.
#[derive(Component)]
pub struct QuickSelectPanel;

/// Rebuilds the panel UI whenever the QuickSelect resource changes.
pub fn render_quick_select(
    mut commands: Commands,
    quick_select: Res<QuickSelect>,
    panel_query: Query<Entity, With<QuickSelectPanel>>,
) {
    if !quick_select.is_changed() {
        return;
    }

    for entity in panel_query.iter() {
        commands.entity(entity).despawn_recursive();
    }

    if !quick_select.is_open() {
        return;
    }

    let title = match quick_select.mode {
        QuickSelectMode::Feed => "Feed:",
        QuickSelectMode::Cure => "Cure:",
        QuickSelectMode::Love => "Give:",
    };

    let empty_message = match quick_select.mode {
        QuickSelectMode::Feed => "No food to feed",
        QuickSelectMode::Cure => "No medicine",
        QuickSelectMode::Love => "Item required",
    };

    commands
        .spawn((
            QuickSelectPanel,
            Node {
                position_type: PositionType::Absolute,
                bottom: Val::Px(48.0),
                left: Val::Percent(50.0),
                width: Val::Px(280.0),
                margin: UiRect {
                    left: Val::Px(-140.0),
                    ..default()
                },
                flex_direction: FlexDirection::Column,
                row_gap: Val::Px(2.0),
                padding: UiRect::all(Val::Px(8.0)),
                ..default()
            },
            BackgroundColor(Color::srgba(0.0, 0.0, 0.0, 0.75)),
        ))
        .with_children(|parent| {
            parent.spawn((
                Text::new(title),
                TextFont {
                    font_size: 13.0,
                    ..default()
                },
                TextColor(Color::srgb(1.0, 0.9, 0.5)),
            ));

            if quick_select.options.is_empty() {
                parent.spawn((
                    Text::new(empty_message),
                    TextFont {
                        font_size: 12.0,
                        ..default()
                    },
                    TextColor(Color::srgb(0.8, 0.6, 0.6)),
                ));
            }

            for (i, option) in quick_select.options.iter().enumerate() {
                parent.spawn((
                    Text::new(format!("[{}] {}", i + 1, option)),
                    TextFont {
                        font_size: 12.0,
                        ..default()
                    },
                    TextColor(Color::WHITE),
                ));
            }
        });
}

/// Resolves number-key choices while the panel is open.
pub fn handle_quick_select_input(
    keyboard: Res<ButtonInput<KeyCode>>,
    mut quick_select: ResMut<QuickSelect>,
    mut feed_writer: EventWriter<FeedAnimalEvent>,
    mut cure_writer: EventWriter<CureAnimalEvent>,
    mut love_writer: EventWriter<LoveAnimalEvent>,
    mut sfx_writer: EventWriter<PlaySfxEvent>,
) {
    let Some(target) = quick_select.open_for else {
        return;
    };

    if keyboard.just_pressed(KeyCode::Escape) {
        quick_select.close();
        return;
    }

    const DIGITS: [KeyCode; 9] = [
        KeyCode::Digit1,
        KeyCode::Digit2,
        KeyCode::Digit3,
        KeyCode::Digit4,
        KeyCode::Digit5,
        KeyCode::Digit6,
        KeyCode::Digit7,
        KeyCode::Digit8,
        KeyCode::Digit9,
    ];

    let mut chosen: Option<ItemName> = None;
    for (i, key) in DIGITS.iter().enumerate() {
        if keyboard.just_pressed(*key) {
            chosen = quick_select.options.get(i).cloned();
            break;
        }
    }
    let Some(item) = chosen else {
        return;
    };

    match quick_select.mode {
        QuickSelectMode::Feed => {
            feed_writer.send(FeedAnimalEvent {
                target,
                food: item,
            });
        }
        QuickSelectMode::Cure => {
            cure_writer.send(CureAnimalEvent { target });
        }
        QuickSelectMode::Love => {
            love_writer.send(LoveAnimalEvent { target, item });
        }
    }

    sfx_writer.send(PlaySfxEvent {
        sfx_id: "menu_select".to_string(),
    });
    quick_select.close();
}
