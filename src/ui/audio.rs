use bevy::prelude::*;
use crate::shared::*;

// ═══════════════════════════════════════════════════════════════════════
// SFX PATH MAPPING
// ═══════════════════════════════════════════════════════════════════════

/// Maps SFX IDs (sent by other domains) to actual audio file paths.
fn sfx_path(sfx_id: &str) -> Option<&'static str> {
    match sfx_id {
        "feed_animal" => Some("audio/sfx/sfx_sounds_interaction5.ogg"),
        "produce_drop" => Some("audio/sfx/sfx_sounds_impact1.ogg"),
        "collect" => Some("audio/sfx/sfx_coin_single1.ogg"),
        "level_up" => Some("audio/sfx/sfx_sounds_fanfare1.ogg"),
        "cure_animal" => Some("audio/sfx/sfx_sounds_powerup1.ogg"),
        "purchase" => Some("audio/sfx/sfx_coin_cluster1.ogg"),
        "sell" => Some("audio/sfx/sfx_coin_double1.ogg"),
        "restock" => Some("audio/sfx/sfx_sounds_interaction9.ogg"),
        "menu_move" => Some("audio/sfx/sfx_menu_move1.ogg"),
        "menu_select" => Some("audio/sfx/sfx_menu_select1.ogg"),
        "ui_deny" => Some("audio/sfx/sfx_sounds_error1.ogg"),
        _ => None,
    }
}

// ═══════════════════════════════════════════════════════════════════════
// SYSTEMS
// ═══════════════════════════════════════════════════════════════════════

/// Listen for PlaySfxEvent and spawn one-shot audio sources that auto-despawn.
pub fn handle_play_sfx(
    mut events: EventReader<PlaySfxEvent>,
    mut commands: Commands,
    asset_server: Res<AssetServer>,
) {
    for event in events.read() {
        if let Some(path) = sfx_path(&event.sfx_id) {
            commands.spawn((
                AudioPlayer::new(asset_server.load(path)),
                PlaybackSettings::DESPAWN,
            ));
        }
    }
}
