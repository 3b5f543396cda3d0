use std::collections::HashMap;

use crate::shared::*;

/// Fills the AnimalRegistry with the three species' care tables.
///
/// The favorite-food list is indexed by level (cycling past the end), so
/// an animal's favorite changes as it gains experience — the same
/// species × experience lookup the interaction layer and feed reducer
/// both depend on.
pub fn populate_species(registry: &mut AnimalRegistry) {
    registry.species.insert(
        AnimalSpecies::Chicken,
        SpeciesDef {
            species: AnimalSpecies::Chicken,
            produce: "Egg".to_string(),
            base_yield: 1.0,
            rest_duration_ms: 8 * 60 * 60 * 1000, // 8h
            required_food_qty: 1.0,
            level_thresholds: vec![
                20.0, 60.0, 120.0, 200.0, 300.0, 420.0, 560.0, 720.0, 900.0, 1100.0,
            ],
            favorite_foods: vec![
                "Kernel Blend".to_string(),
                "Hay".to_string(),
                "NutriBarley".to_string(),
                "Mixed Grain".to_string(),
            ],
            food_experience: food_table(&[
                ("Hay", 10.0),
                ("Kernel Blend", 15.0),
                ("NutriBarley", 10.0),
                ("Mixed Grain", 12.0),
            ]),
            favorite_bonus: 2.0,
            love_items: vec![
                "Petting Hand".to_string(),
                "Brush".to_string(),
                "Music Box".to_string(),
            ],
            love_experience: 25.0,
        },
    );

    registry.species.insert(
        AnimalSpecies::Cow,
        SpeciesDef {
            species: AnimalSpecies::Cow,
            produce: "Milk".to_string(),
            base_yield: 1.0,
            rest_duration_ms: 12 * 60 * 60 * 1000, // 12h
            required_food_qty: 5.0,
            level_thresholds: vec![
                50.0, 150.0, 300.0, 500.0, 750.0, 1050.0, 1400.0, 1800.0, 2250.0, 2750.0,
            ],
            favorite_foods: vec![
                "Hay".to_string(),
                "NutriBarley".to_string(),
                "Kernel Blend".to_string(),
                "Mixed Grain".to_string(),
            ],
            food_experience: food_table(&[
                ("Hay", 12.0),
                ("Kernel Blend", 10.0),
                ("NutriBarley", 15.0),
                ("Mixed Grain", 14.0),
            ]),
            favorite_bonus: 2.0,
            love_items: vec![
                "Brush".to_string(),
                "Petting Hand".to_string(),
                "Music Box".to_string(),
            ],
            love_experience: 40.0,
        },
    );

    registry.species.insert(
        AnimalSpecies::Sheep,
        SpeciesDef {
            species: AnimalSpecies::Sheep,
            produce: "Wool".to_string(),
            base_yield: 1.0,
            rest_duration_ms: 24 * 60 * 60 * 1000, // 24h
            required_food_qty: 3.0,
            level_thresholds: vec![
                35.0, 105.0, 210.0, 350.0, 525.0, 735.0, 980.0, 1260.0, 1575.0, 1925.0,
            ],
            favorite_foods: vec![
                "NutriBarley".to_string(),
                "Mixed Grain".to_string(),
                "Hay".to_string(),
                "Kernel Blend".to_string(),
            ],
            food_experience: food_table(&[
                ("Hay", 10.0),
                ("Kernel Blend", 12.0),
                ("NutriBarley", 14.0),
                ("Mixed Grain", 13.0),
            ]),
            favorite_bonus: 2.0,
            love_items: vec![
                "Brush".to_string(),
                "Music Box".to_string(),
                "Petting Hand".to_string(),
            ],
            love_experience: 35.0,
        },
    );
}

fn food_table(entries: &[(&str, f64)]) -> HashMap<ItemName, f64> {
    entries
        .iter()
        .map(|(name, xp)| (name.to_string(), *xp))
        .collect()
}
