use bevy::prelude::*;
use rand::Rng;

use super::machine::{AnimalMachine, MachineState};
use super::WanderAi;

// ─────────────────────────────────────────────────────────────────────────────
// Wander AI
//
// Purely presentational: idle animals stroll around their pen. Animals
// that are sleeping, sick, or mid-animation stand still so their state
// reads clearly.
// ─────────────────────────────────────────────────────────────────────────────

fn may_wander(state: MachineState) -> bool {
    matches!(state, MachineState::Idle | MachineState::NeedsLove)
}

pub fn handle_animal_wander(
    time: Res<Time>,
    mut query: Query<(&AnimalMachine, &mut WanderAi, &mut Transform)>,
) {
    let mut rng = rand::thread_rng();
    let dt = time.delta_secs();

    for (machine, mut wander, mut transform) in query.iter_mut() {
        if !may_wander(machine.state) {
            wander.target = None;
            continue;
        }

        wander.timer.tick(time.delta());
        if wander.timer.just_finished() {
            // Pick a new stroll target inside the pen, or rest.
            if rng.gen_bool(0.6) {
                let x = rng.gen_range(wander.pen_min.x..wander.pen_max.x);
                let y = rng.gen_range(wander.pen_min.y..wander.pen_max.y);
                wander.target = Some(Vec2::new(x, y));
            } else {
                wander.target = None;
            }
            let next = rng.gen_range(2.0..4.0);
            wander.timer = Timer::from_seconds(next, TimerMode::Once);
        }

        if let Some(target) = wander.target {
            let pos = transform.translation.truncate();
            let delta = target - pos;
            if delta.length() < 1.0 {
                wander.target = None;
            } else {
                let step = delta.normalize() * wander.speed * dt;
                transform.translation.x += step.x;
                transform.translation.y += step.y;
            }
        }
    }
}
