use crate::shared::*;

/// Fills the ItemRegistry with every item the game references: animal
/// foods, medicine, affection items, animal produce, and the seed packets
/// the shop carries for flavor.
pub fn populate_items(registry: &mut ItemRegistry) {
    let defs = [
        // ── Animal foods ─────────────────────────────────────────────────
        ItemDef {
            id: "Hay".to_string(),
            kind: ItemKind::Food,
            price: 2.0,
        },
        ItemDef {
            id: "Kernel Blend".to_string(),
            kind: ItemKind::Food,
            price: 4.0,
        },
        ItemDef {
            id: "NutriBarley".to_string(),
            kind: ItemKind::Food,
            price: 6.0,
        },
        ItemDef {
            id: "Mixed Grain".to_string(),
            kind: ItemKind::Food,
            price: 8.0,
        },
        // ── Medicine ─────────────────────────────────────────────────────
        ItemDef {
            id: MEDICINE_ITEM.to_string(),
            kind: ItemKind::Medicine,
            price: 25.0,
        },
        // ── Affection items ──────────────────────────────────────────────
        ItemDef {
            id: "Petting Hand".to_string(),
            kind: ItemKind::LoveItem,
            price: 10.0,
        },
        ItemDef {
            id: "Brush".to_string(),
            kind: ItemKind::LoveItem,
            price: 15.0,
        },
        ItemDef {
            id: "Music Box".to_string(),
            kind: ItemKind::LoveItem,
            price: 40.0,
        },
        // ── Produce (sold, never bought) ─────────────────────────────────
        ItemDef {
            id: "Egg".to_string(),
            kind: ItemKind::Produce,
            price: 12.0,
        },
        ItemDef {
            id: "Milk".to_string(),
            kind: ItemKind::Produce,
            price: 30.0,
        },
        ItemDef {
            id: "Wool".to_string(),
            kind: ItemKind::Produce,
            price: 45.0,
        },
        // ── Seed packets (shop stock flavor; planting is out of scope) ───
        ItemDef {
            id: "Sunflower Seed".to_string(),
            kind: ItemKind::Seed,
            price: 1.0,
        },
        ItemDef {
            id: "Potato Seed".to_string(),
            kind: ItemKind::Seed,
            price: 2.0,
        },
        ItemDef {
            id: "Pumpkin Seed".to_string(),
            kind: ItemKind::Seed,
            price: 3.0,
        },
        ItemDef {
            id: "Carrot Seed".to_string(),
            kind: ItemKind::Seed,
            price: 2.0,
        },
    ];

    for def in defs {
        registry.items.insert(def.id.clone(), def);
    }
}
