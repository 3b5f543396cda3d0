use bevy::prelude::*;
use rand::Rng;

use super::machine::AnimalMachine;
use super::{WakesInDisplay, WanderAi};
use crate::shared::*;

// ─────────────────────────────────────────────────────────────────────────────
// Herd spawning
//
// No sprite atlases — animals are tinted rects sized per species, with
// satellite Text2d entities (emotion icons, request bubbles) layered on by
// the rendering systems.
// ─────────────────────────────────────────────────────────────────────────────

pub struct AnimalVisual {
    pub color: Color,
    pub width: f32,
    pub height: f32,
}

pub fn animal_visual(species: AnimalSpecies) -> AnimalVisual {
    match species {
        AnimalSpecies::Chicken => AnimalVisual {
            color: Color::srgb(0.9, 0.85, 0.3),
            width: 12.0,
            height: 12.0,
        },
        AnimalSpecies::Cow => AnimalVisual {
            color: Color::srgb(0.85, 0.85, 0.85),
            width: 20.0,
            height: 16.0,
        },
        AnimalSpecies::Sheep => AnimalVisual {
            color: Color::srgb(0.95, 0.95, 0.9),
            width: 18.0,
            height: 14.0,
        },
    }
}

/// Pen boundaries per species: chickens get the coop yard, cows and sheep
/// share the barn pen.
pub fn pen_bounds_for(species: AnimalSpecies) -> (Vec2, Vec2) {
    match species {
        AnimalSpecies::Chicken => (Vec2::new(-96.0, -192.0), Vec2::new(96.0, -96.0)),
        AnimalSpecies::Cow | AnimalSpecies::Sheep => {
            (Vec2::new(-192.0, -192.0), Vec2::new(-32.0, -64.0))
        }
    }
}

fn generate_animal_name(species: AnimalSpecies, rng: &mut impl Rng) -> String {
    let pool: &[&str] = match species {
        AnimalSpecies::Chicken => &["Penny", "Goldie", "Clucky", "Nugget", "Dottie"],
        AnimalSpecies::Cow => &["Bessie", "Daisy", "Rosie", "Mocha", "Cream"],
        AnimalSpecies::Sheep => &["Fluffkins", "Woolie", "Cotton", "Misty", "Pearl"],
    };
    pool[rng.gen_range(0..pool.len())].to_string()
}

/// Spawns the starter herd on entering Playing: three chickens, a cow,
/// and a sheep, all idle with a fresh machine in Initial.
pub fn spawn_starter_herd(
    mut commands: Commands,
    registry: Res<AnimalRegistry>,
    existing: Query<(), With<Animal>>,
) {
    // Re-entering Playing (from Paused) must not duplicate the herd.
    if !existing.is_empty() {
        return;
    }

    let mut rng = rand::thread_rng();
    let herd = [
        AnimalSpecies::Chicken,
        AnimalSpecies::Chicken,
        AnimalSpecies::Chicken,
        AnimalSpecies::Cow,
        AnimalSpecies::Sheep,
    ];

    for (i, &species) in herd.iter().enumerate() {
        let Some(def) = registry.get(species) else {
            warn!("[Animals] Cannot spawn {:?} — no species def", species);
            continue;
        };

        let (pen_min, pen_max) = pen_bounds_for(species);
        let x = rng.gen_range(pen_min.x..pen_max.x);
        let y = rng.gen_range(pen_min.y..pen_max.y);
        let visual = animal_visual(species);

        let item = def.love_items[rng.gen_range(0..def.love_items.len())].clone();
        let animal = Animal {
            id: i as u32 + 1,
            name: generate_animal_name(species, &mut rng),
            species,
            experience: 0.0,
            status: AnimalStatus::Idle,
            awake_at_ms: 0,
            loved_until_ms: 0,
            multiplier: rng.gen_range(0.0..0.3),
            item,
        };

        info!(
            "[Animals] Spawned {} the {} (#{})",
            animal.name,
            species.display_name(),
            animal.id
        );

        commands.spawn((
            animal,
            AnimalMachine::default(),
            WakesInDisplay::default(),
            WanderAi {
                timer: Timer::from_seconds(rng.gen_range(2.0..4.0), TimerMode::Once),
                target: None,
                pen_min,
                pen_max,
                speed: 20.0,
            },
            Sprite {
                color: visual.color,
                custom_size: Some(Vec2::new(visual.width, visual.height)),
                ..default()
            },
            Transform::from_xyz(x, y, 1.0),
            GlobalTransform::default(),
            Visibility::default(),
        ));
    }
}
