//! UI domain — main menu, HUD, quick-select panel, popovers, and audio.
//!
//! Reads shared resources and events; never mutates animal or economy
//! state directly (the quick-select panel dispatches care events like any
//! other caller).

use bevy::prelude::*;
use crate::shared::*;

pub mod audio;
pub mod popover;
pub mod quick_select;

use audio::handle_play_sfx;
use popover::{handle_popover_events, update_popovers};
use quick_select::{handle_quick_select_input, render_quick_select};

// ═══════════════════════════════════════════════════════════════════════
// MAIN MENU
// ═══════════════════════════════════════════════════════════════════════

#[derive(Component)]
struct MainMenuRoot;

fn spawn_main_menu(mut commands: Commands) {
    commands
        .spawn((
            MainMenuRoot,
            Node {
                width: Val::Percent(100.0),
                height: Val::Percent(100.0),
                flex_direction: FlexDirection::Column,
                align_items: AlignItems::Center,
                justify_content: JustifyContent::Center,
                row_gap: Val::Px(12.0),
                ..default()
            },
        ))
        .with_children(|parent| {
            parent.spawn((
                Text::new("CLUCKSTEAD"),
                TextFont {
                    font_size: 36.0,
                    ..default()
                },
                TextColor(Color::srgb(1.0, 0.9, 0.4)),
            ));
            parent.spawn((
                Text::new("Press Enter to start"),
                TextFont {
                    font_size: 14.0,
                    ..default()
                },
                TextColor(Color::WHITE),
            ));
        });
}

fn main_menu_input(
    keyboard: Res<ButtonInput<KeyCode>>,
    mut next_state: ResMut<NextState<GameState>>,
    mut sfx_writer: EventWriter<PlaySfxEvent>,
) {
    if keyboard.just_pressed(KeyCode::Enter) {
        sfx_writer.send(PlaySfxEvent {
            sfx_id: "menu_select".to_string(),
        });
        next_state.set(GameState::Playing);
    }
}

fn despawn_main_menu(mut commands: Commands, query: Query<Entity, With<MainMenuRoot>>) {
    for entity in query.iter() {
        commands.entity(entity).despawn_recursive();
    }
}

// ═══════════════════════════════════════════════════════════════════════
// HUD
// ═══════════════════════════════════════════════════════════════════════

#[derive(Component)]
struct HudText;

fn spawn_hud(mut commands: Commands, existing: Query<(), With<HudText>>) {
    if !existing.is_empty() {
        return;
    }
    commands.spawn((
        HudText,
        Text::new(String::new()),
        TextFont {
            font_size: 12.0,
            ..default()
        },
        TextColor(Color::WHITE),
        Node {
            position_type: PositionType::Absolute,
            top: Val::Px(8.0),
            left: Val::Px(8.0),
            ..default()
        },
    ));
}

fn update_hud(
    player_state: Res<PlayerState>,
    inventory: Res<Inventory>,
    stock: Res<StockLedger>,
    mut query: Query<&mut Text, With<HudText>>,
) {
    let Ok(mut text) = query.get_single_mut() else {
        return;
    };

    let selected_line = match player_state.selected_item.as_deref() {
        Some(item) => format!(
            "Holding: {} (x{:.0} owned, shop has {:.0})",
            item,
            inventory.count(item),
            stock.count(item)
        ),
        None => "Holding: nothing".to_string(),
    };

    text.0 = format!(
        "Coins: {:.0}\n{}\n[1-8] select  [0] empty hand  [Space] interact  [B]uy  [V] sell  [R]estock",
        player_state.coins, selected_line
    );
}

// ═══════════════════════════════════════════════════════════════════════
// PAUSE
// ═══════════════════════════════════════════════════════════════════════

#[derive(Component)]
struct PauseOverlay;

/// Escape pauses — unless the quick-select panel is open, in which case
/// Escape belongs to the panel.
fn pause_toggle(
    keyboard: Res<ButtonInput<KeyCode>>,
    quick_select: Res<QuickSelect>,
    state: Res<State<GameState>>,
    mut next_state: ResMut<NextState<GameState>>,
) {
    if quick_select.is_open() {
        return;
    }
    if keyboard.just_pressed(KeyCode::Escape) {
        match state.get() {
            GameState::Playing => next_state.set(GameState::Paused),
            GameState::Paused => next_state.set(GameState::Playing),
            _ => {}
        }
    }
}

fn spawn_pause_overlay(mut commands: Commands) {
    commands.spawn((
        PauseOverlay,
        Text::new("PAUSED — Esc to resume"),
        TextFont {
            font_size: 20.0,
            ..default()
        },
        TextColor(Color::srgb(1.0, 1.0, 0.8)),
        Node {
            position_type: PositionType::Absolute,
            top: Val::Percent(45.0),
            left: Val::Percent(50.0),
            margin: UiRect {
                left: Val::Px(-120.0),
                ..default()
            },
            ..default()
        },
    ));
}

fn despawn_pause_overlay(mut commands: Commands, query: Query<Entity, With<PauseOverlay>>) {
    for entity in query.iter() {
        commands.entity(entity).despawn_recursive();
    }
}

// ═══════════════════════════════════════════════════════════════════════
// PLUGIN
// ═══════════════════════════════════════════════════════════════════════

pub struct UiPlugin;

impl Plugin for UiPlugin {
    fn build(&self, app: &mut App) {
        app
            // ── main menu ────────────────────────────────────────────────
            .add_systems(OnEnter(GameState::MainMenu), spawn_main_menu)
            .add_systems(OnExit(GameState::MainMenu), despawn_main_menu)
            .add_systems(
                Update,
                main_menu_input.run_if(in_state(GameState::MainMenu)),
            )
            // ── HUD & gameplay panels ────────────────────────────────────
            .add_systems(OnEnter(GameState::Playing), spawn_hud)
            .add_systems(
                Update,
                (
                    update_hud,
                    // pause_toggle must see the panel state from before
                    // handle_quick_select_input possibly closes it.
                    pause_toggle.before(handle_quick_select_input),
                    handle_quick_select_input,
                    render_quick_select,
                    handle_popover_events,
                    update_popovers,
                )
                    .run_if(in_state(GameState::Playing)),
            )
            // ── pause ────────────────────────────────────────────────────
            .add_systems(OnEnter(GameState::Paused), spawn_pause_overlay)
            .add_systems(OnExit(GameState::Paused), despawn_pause_overlay)
            .add_systems(Update, pause_toggle.run_if(in_state(GameState::Paused)))
            // ── audio (any state) ────────────────────────────────────────
            .add_systems(Update, handle_play_sfx);

        info!("[UI] UiPlugin registered.");
    }
}
