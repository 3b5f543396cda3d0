use bevy::prelude::*;

use crate::shared::*;

// ─────────────────────────────────────────────────────────────────────────────
// Per-animal presentation state machine
//
// Each spawned animal owns one AnimalMachine component: a small finite
// state machine that sequences sprite and emotion changes. It mirrors the
// authoritative Animal record with lag — transitions are driven by mirror
// events emitted after each care reducer completes, plus two timed paths
// (transient-emotion settling and the sleep/wake poll).
//
// Reconciliation policy: the machine is a function of the most recent
// authoritative record plus locally observed events. The single forced
// reconciliation point is sickness — if the record says Sick and the
// machine does not, the machine jumps to Sick unconditionally, overriding
// any in-flight transient state. Everything else self-corrects on the
// next mirrored event or poll tick.
//
// Invalid (state, event) pairs are no-ops, never errors; the interaction
// layer guards them before dispatch.
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MachineState {
    /// Freshly spawned; syncs from the authoritative record on first tick.
    Initial,
    Idle,
    NeedsLove,
    Ready,
    Sleeping,
    Sick,
    Loved,
    /// Transient post-feed emotion (favorite food). Settles on a timer.
    Happy,
    /// Transient post-feed emotion (non-favorite food). Settles on a timer.
    Sad,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MachineEvent {
    Feed { favorite: bool },
    Love,
    Sick,
    Cure,
    ClaimProduce,
}

/// Mirror of an authoritative mutation, dispatched into the target
/// animal's machine after the care reducer has completed. Ordering is
/// enforced in the plugin: reducers run before this event is consumed, so
/// the machine never mirrors stale data.
#[derive(Event, Debug, Clone)]
pub struct MirrorEvent {
    pub target: Entity,
    pub event: MachineEvent,
}

#[derive(Component, Debug, Clone)]
pub struct AnimalMachine {
    pub state: MachineState,
    /// Settle timer for transient states (Happy/Sad/Loved). None otherwise.
    pub settle: Option<Timer>,
}

impl Default for AnimalMachine {
    fn default() -> Self {
        Self {
            state: MachineState::Initial,
            settle: None,
        }
    }
}

/// Pure transition function. Unknown (state, event) pairs return the
/// current state unchanged.
pub fn transition(current: MachineState, event: MachineEvent, animal: &Animal) -> MachineState {
    use MachineEvent as E;
    use MachineState as S;

    match (current, event) {
        // Sickness wins every tie-break, from any state. Idempotent.
        (S::Sick, E::Sick) => S::Sick,
        (_, E::Sick) => S::Sick,

        // Feeding shows an emotion before settling.
        (S::Idle | S::Happy | S::Sad, E::Feed { favorite }) => {
            if favorite {
                S::Happy
            } else {
                S::Sad
            }
        }

        (S::NeedsLove, E::Love) => S::Loved,

        (S::Sick, E::Cure) => S::Idle,

        // Claiming sends the animal to rest when the record says so.
        (S::Ready, E::ClaimProduce) => {
            if animal.status == AnimalStatus::Sleeping {
                S::Sleeping
            } else {
                S::Idle
            }
        }

        // Everything else is a guarded no-op.
        (state, _) => state,
    }
}

/// Maps an authoritative status to the machine state it settles at.
pub fn settled_state(status: AnimalStatus) -> MachineState {
    match status {
        AnimalStatus::Idle => MachineState::Idle,
        AnimalStatus::Ready => MachineState::Ready,
        AnimalStatus::Sleeping => MachineState::Sleeping,
        AnimalStatus::Sick => MachineState::Sick,
        AnimalStatus::NeedsLove => MachineState::NeedsLove,
        AnimalStatus::Loved => MachineState::Loved,
    }
}

fn settle_timer_for(state: MachineState) -> Option<Timer> {
    match state {
        MachineState::Happy | MachineState::Sad => {
            Some(Timer::from_seconds(EMOTION_SETTLE_SECS, TimerMode::Once))
        }
        MachineState::Loved => Some(Timer::from_seconds(
            LOVED_DURATION_MS as f32 / 1000.0,
            TimerMode::Once,
        )),
        _ => None,
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Systems
// ─────────────────────────────────────────────────────────────────────────────

/// Machines spawn in Initial and adopt the authoritative status on their
/// first tick. Nothing is rendered for Initial machines.
pub fn init_machines(mut query: Query<(&Animal, &mut AnimalMachine)>) {
    for (animal, mut machine) in query.iter_mut() {
        if machine.state == MachineState::Initial {
            machine.state = settled_state(animal.status);
        }
    }
}

/// Applies mirrored care events to their target machines.
pub fn apply_mirror_events(
    mut mirror_events: EventReader<MirrorEvent>,
    mut query: Query<(&Animal, &mut AnimalMachine)>,
) {
    for ev in mirror_events.read() {
        let Ok((animal, mut machine)) = query.get_mut(ev.target) else {
            continue;
        };
        let next = transition(machine.state, ev.event, animal);
        if next != machine.state {
            machine.settle = settle_timer_for(next);
            machine.state = next;
        }
    }
}

/// The one forced reconciliation with the authoritative record: a sick
/// animal must look sick immediately, whatever the machine was doing.
pub fn force_sync_sick(mut query: Query<(&Animal, &mut AnimalMachine)>) {
    for (animal, mut machine) in query.iter_mut() {
        if animal.status == AnimalStatus::Sick && machine.state != MachineState::Sick {
            machine.state = transition(machine.state, MachineEvent::Sick, animal);
            machine.settle = None;
        }
    }
}

/// Ticks settle timers: Happy/Sad rest at the authoritative status
/// (Ready if a level was just reached, Idle otherwise); Loved reverts to
/// Idle after its delay.
pub fn settle_transient_states(time: Res<Time>, mut query: Query<(&Animal, &mut AnimalMachine)>) {
    for (animal, mut machine) in query.iter_mut() {
        let Some(timer) = machine.settle.as_mut() else {
            continue;
        };
        timer.tick(time.delta());
        if !timer.just_finished() {
            continue;
        }
        machine.settle = None;
        machine.state = match machine.state {
            MachineState::Happy | MachineState::Sad => {
                if animal.status == AnimalStatus::Ready {
                    MachineState::Ready
                } else {
                    MachineState::Idle
                }
            }
            MachineState::Loved => MachineState::Idle,
            other => other,
        };
    }
}

/// Repeating timer driving the sleep/wake re-evaluation. Waking is
/// polled, not instantaneous.
#[derive(Resource, Debug)]
pub struct SleepPollTimer(pub Timer);

impl Default for SleepPollTimer {
    fn default() -> Self {
        Self(Timer::from_seconds(SLEEP_POLL_SECS, TimerMode::Repeating))
    }
}

/// Once the wall clock passes `awake_at`, a sleeping machine settles to
/// whatever the (already woken) authoritative record says. Runs after the
/// authoritative wake system, so the record is never stale here.
pub fn poll_sleeping_machines(
    time: Res<Time>,
    clock: Res<GameClock>,
    mut poll: ResMut<SleepPollTimer>,
    mut query: Query<(&Animal, &mut AnimalMachine)>,
) {
    poll.0.tick(time.delta());
    if !poll.0.just_finished() {
        return;
    }

    let now_ms = clock.now_ms();
    for (animal, mut machine) in query.iter_mut() {
        if machine.state == MachineState::Sleeping && now_ms >= animal.awake_at_ms {
            machine.state = settled_state(animal.status);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_animal(status: AnimalStatus) -> Animal {
        Animal {
            id: 1,
            name: "Penny".to_string(),
            species: AnimalSpecies::Chicken,
            experience: 0.0,
            status,
            awake_at_ms: 0,
            loved_until_ms: 0,
            multiplier: 0.0,
            item: "Petting Hand".to_string(),
        }
    }

    #[test]
    fn test_sick_wins_from_every_state() {
        let animal = test_animal(AnimalStatus::Sick);
        for state in [
            MachineState::Initial,
            MachineState::Idle,
            MachineState::NeedsLove,
            MachineState::Ready,
            MachineState::Sleeping,
            MachineState::Loved,
            MachineState::Happy,
            MachineState::Sad,
        ] {
            assert_eq!(
                transition(state, MachineEvent::Sick, &animal),
                MachineState::Sick,
                "SICK from {:?} must reach Sick",
                state
            );
        }
        // Second SICK while already sick is a no-op.
        assert_eq!(
            transition(MachineState::Sick, MachineEvent::Sick, &animal),
            MachineState::Sick
        );
    }

    #[test]
    fn test_love_only_valid_from_needs_love() {
        let animal = test_animal(AnimalStatus::NeedsLove);
        assert_eq!(
            transition(MachineState::NeedsLove, MachineEvent::Love, &animal),
            MachineState::Loved
        );
        // No table entry for LOVE anywhere else: state unchanged.
        for state in [
            MachineState::Idle,
            MachineState::Ready,
            MachineState::Sleeping,
            MachineState::Sick,
            MachineState::Loved,
        ] {
            assert_eq!(transition(state, MachineEvent::Love, &animal), state);
        }
    }

    #[test]
    fn test_cure_then_resick_round_trip() {
        let mut animal = test_animal(AnimalStatus::Sick);
        let cured = transition(MachineState::Sick, MachineEvent::Cure, &animal);
        assert_eq!(cured, MachineState::Idle);

        // Authoritative state says sick again — machine re-enters Sick.
        animal.status = AnimalStatus::Sick;
        assert_eq!(
            transition(cured, MachineEvent::Sick, &animal),
            MachineState::Sick
        );
    }

    #[test]
    fn test_feed_emotion_depends_on_favorite() {
        let animal = test_animal(AnimalStatus::Idle);
        assert_eq!(
            transition(
                MachineState::Idle,
                MachineEvent::Feed { favorite: true },
                &animal
            ),
            MachineState::Happy
        );
        assert_eq!(
            transition(
                MachineState::Idle,
                MachineEvent::Feed { favorite: false },
                &animal
            ),
            MachineState::Sad
        );
    }

    #[test]
    fn test_claim_rests_or_idles_by_record() {
        let sleeping = test_animal(AnimalStatus::Sleeping);
        assert_eq!(
            transition(MachineState::Ready, MachineEvent::ClaimProduce, &sleeping),
            MachineState::Sleeping
        );
        let idle = test_animal(AnimalStatus::Idle);
        assert_eq!(
            transition(MachineState::Ready, MachineEvent::ClaimProduce, &idle),
            MachineState::Idle
        );
        // Claim outside Ready is a guarded no-op.
        assert_eq!(
            transition(MachineState::Idle, MachineEvent::ClaimProduce, &idle),
            MachineState::Idle
        );
    }

    #[test]
    fn test_settled_state_mapping_is_total() {
        assert_eq!(settled_state(AnimalStatus::Idle), MachineState::Idle);
        assert_eq!(settled_state(AnimalStatus::Ready), MachineState::Ready);
        assert_eq!(settled_state(AnimalStatus::Sleeping), MachineState::Sleeping);
        assert_eq!(settled_state(AnimalStatus::Sick), MachineState::Sick);
        assert_eq!(settled_state(AnimalStatus::NeedsLove), MachineState::NeedsLove);
        assert_eq!(settled_state(AnimalStatus::Loved), MachineState::Loved);
    }
}
