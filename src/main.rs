mod shared;
mod data;
mod player;
mod animals;
mod economy;
mod ui;

use bevy::prelude::*;
use bevy::window::{PresentMode, WindowResolution};

use shared::*;

fn main() {
    App::new()
        .add_plugins(
            DefaultPlugins
                .set(WindowPlugin {
                    primary_window: Some(Window {
                        title: "Cluckstead".into(),
                        resolution: WindowResolution::new(SCREEN_WIDTH, SCREEN_HEIGHT),
                        present_mode: PresentMode::AutoVsync,
                        resizable: true,
                        ..default()
                    }),
                    ..default()
                })
                .set(ImagePlugin::default_nearest()),
        )
        // Game state
        .init_state::<GameState>()
        // Shared resources
        .init_resource::<GameClock>()
        .init_resource::<PlayerState>()
        .init_resource::<Inventory>()
        .init_resource::<StockLedger>()
        .init_resource::<Shipments>()
        .init_resource::<FarmBoosts>()
        .init_resource::<QuickSelect>()
        .init_resource::<ItemRegistry>()
        .init_resource::<AnimalRegistry>()
        // Events
        .add_event::<RestockRequestEvent>()
        .add_event::<FeedAnimalEvent>()
        .add_event::<LoveAnimalEvent>()
        .add_event::<CureAnimalEvent>()
        .add_event::<ClaimProduceEvent>()
        .add_event::<PlaySfxEvent>()
        .add_event::<PopoverEvent>()
        // Domain plugins
        .add_plugins(player::PlayerPlugin)
        .add_plugins(animals::AnimalPlugin)
        .add_plugins(economy::EconomyPlugin)
        .add_plugins(ui::UiPlugin)
        // Data loading
        .add_plugins(data::DataPlugin)
        // Camera
        .add_systems(Startup, setup_camera)
        .run();
}

fn setup_camera(mut commands: Commands) {
    commands.spawn((
        Camera2d,
        Transform::from_scale(Vec3::splat(1.0 / PIXEL_SCALE)),
    ));
}
