use bevy::{prelude::*, window::WindowResolution};

use star_catcher::animation::AnimationPlugin;
use star_catcher::collision::CollisionPlugin;
use star_catcher::config::{CONFIG_PATH, ConfigPlugin};
use star_catcher::game::{BACKGROUND_COLOR, GameSchedulePlugin, WORLD_HEIGHT, WORLD_WIDTH};
use star_catcher::physics::{DebugDrawPlugin, PhysicsPlugin};
use star_catcher::scene::ScenePlugin;
use star_catcher::score::ScorePlugin;
use star_catcher::ui::UiPlugin;

fn main() {
    let config = ConfigPlugin::load(CONFIG_PATH);
    let title = config.config.window.title.clone();

    App::new()
        .add_plugins(
            DefaultPlugins
                .set(WindowPlugin {
                    primary_window: Some(Window {
                        resolution: WindowResolution::new(WORLD_WIDTH as u32, WORLD_HEIGHT as u32),
                        resizable: false,
                        title,
                        ..default()
                    }),
                    ..default()
                })
                .set(ImagePlugin::default_nearest()),
        )
        .insert_resource(ClearColor(BACKGROUND_COLOR))
        .add_plugins((
            config,
            GameSchedulePlugin,
            ScorePlugin,
            AnimationPlugin,
            PhysicsPlugin,
            DebugDrawPlugin,
            ScenePlugin,
            CollisionPlugin,
            UiPlugin,
        ))
        .run();
}
