use bevy::prelude::*;
use crate::shared::*;

// ─────────────────────────────────────────────────────────────────────────────
// Sub-modules
// ─────────────────────────────────────────────────────────────────────────────
pub mod machine;
mod spawning;
mod movement;
mod care;
mod interaction;
mod rendering;

pub use spawning::*;
pub use movement::*;
pub use care::*;
pub use interaction::*;
pub use rendering::*;

use machine::{
    apply_mirror_events, force_sync_sick, init_machines, poll_sleeping_machines,
    settle_transient_states, MirrorEvent, SleepPollTimer,
};

// ─────────────────────────────────────────────────────────────────────────────
// ECS components (internal to the animals domain)
// ─────────────────────────────────────────────────────────────────────────────

/// Wander AI timer: fires every 2-4 seconds to pick a new stroll target.
#[derive(Component, Debug, Clone)]
pub struct WanderAi {
    pub timer: Timer,
    /// Target world-space position we are walking toward (None = resting).
    pub target: Option<Vec2>,
    /// Pen boundaries in world space.
    pub pen_min: Vec2,
    pub pen_max: Vec2,
    /// Movement speed in pixels/sec.
    pub speed: f32,
}

/// Whether the player has toggled the wakes-in tooltip for this animal.
#[derive(Component, Debug, Clone, Default)]
pub struct WakesInDisplay {
    pub visible: bool,
}

/// Floating text spawned on feeding, claiming, and level-ups.
#[derive(Component, Debug, Clone)]
pub struct FloatingFeedback {
    pub lifetime: Timer,
    pub velocity: Vec2,
}

// ─────────────────────────────────────────────────────────────────────────────
// Plugin
// ─────────────────────────────────────────────────────────────────────────────

pub struct AnimalPlugin;

impl Plugin for AnimalPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<SleepPollTimer>()
            .init_resource::<CareTickTimer>()
            .add_event::<MirrorEvent>()
            // ── startup ──────────────────────────────────────────────────────
            .add_systems(OnEnter(GameState::Playing), spawn_starter_herd)
            // ── interaction + authoritative reducers + machine mirror ────────
            //
            // Chained: the care reducers must finish before the mirrored
            // events reach the machines, so a machine never sees a stale
            // record. force_sync_sick runs last of all — sickness always
            // wins over whatever the other systems just did.
            .add_systems(
                Update,
                (
                    handle_animal_interact,
                    tick_produce_sequences,
                    (handle_feed, handle_love, handle_cure, handle_claim_produce),
                    tick_timed_statuses,
                    init_machines,
                    apply_mirror_events,
                    settle_transient_states,
                    poll_sleeping_machines,
                    force_sync_sick,
                )
                    .chain()
                    .run_if(in_state(GameState::Playing)),
            )
            // ── presentation ─────────────────────────────────────────────────
            .add_systems(
                Update,
                (
                    handle_animal_wander,
                    update_animal_sprites,
                    update_emotion_icons,
                    update_request_bubbles,
                    update_wakes_in_bubbles,
                    spawn_produce_drops,
                    update_floating_feedback,
                )
                    .run_if(in_state(GameState::Playing)),
            );
    }
}
