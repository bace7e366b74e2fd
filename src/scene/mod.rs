//! Scene plugin - the level's lifecycle: preload assets, create the level,
//! then steer the player every frame.

use bevy::prelude::*;
use bevy_rapier2d::prelude::*;
use rand::Rng;

use crate::animation::{AnimationClip, AnimationKey, AnimationLibrary, Animator};
use crate::game::{
    BOMB_TEXTURE, Background, CursorKeys, DUDE_FRAME_COUNT, DUDE_FRAME_SIZE, DUDE_TEXTURE,
    GameSet, JUMP_VELOCITY, PLATFORM_SIZE, PLATFORM_TEXTURE, PLATFORMS, PLAYER_BOUNCE,
    PLAYER_SIZE, PLAYER_START, Platform, Player, RUN_SPEED, SKY_TEXTURE, STAR_BOUNCE_MAX,
    STAR_BOUNCE_MIN, STAR_COUNT, STAR_SIZE, STAR_START_X, STAR_START_Y, STAR_STEP_X,
    STAR_TEXTURE, SceneAssets, Session, SpawnRng, Star, WORLD_HEIGHT, WORLD_WIDTH, Z_BACKGROUND,
    Z_PLATFORM, Z_PLAYER, Z_STAR, to_world, to_world_velocity,
};
use crate::physics::{
    CollisionRules, Grounded, Layer, bounce, frictionless, spawn_world_bounds,
};

/// Frame shown while the player stands still.
const TURN_FRAME: usize = 4;

/// Plugin for the level's lifecycle systems.
pub struct ScenePlugin;

impl Plugin for ScenePlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<Session>()
            .init_resource::<CursorKeys>()
            .init_resource::<SpawnRng>()
            .add_systems(PreStartup, preload)
            .add_systems(Startup, (register_animations, create))
            .add_systems(
                Update,
                (read_cursor_keys, update_player)
                    .chain()
                    .in_set(GameSet::Input),
            );
    }
}

/// Horizontal intent derived from the cursor keys. Left wins over right.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Movement {
    Left,
    Right,
    Idle,
}

impl Movement {
    pub fn from_keys(keys: &CursorKeys) -> Self {
        if keys.left {
            Movement::Left
        } else if keys.right {
            Movement::Right
        } else {
            Movement::Idle
        }
    }

    pub fn velocity_x(self) -> f32 {
        match self {
            Movement::Left => -RUN_SPEED,
            Movement::Right => RUN_SPEED,
            Movement::Idle => 0.0,
        }
    }

    pub fn animation(self) -> AnimationKey {
        match self {
            Movement::Left => AnimationKey::Left,
            Movement::Right => AnimationKey::Right,
            Movement::Idle => AnimationKey::Turn,
        }
    }
}

/// Declares the textures and the player's sprite-sheet layout.
fn preload(
    mut commands: Commands,
    asset_server: Res<AssetServer>,
    mut layouts: ResMut<Assets<TextureAtlasLayout>>,
) {
    let layout = TextureAtlasLayout::from_grid(DUDE_FRAME_SIZE, DUDE_FRAME_COUNT, 1, None, None);
    commands.insert_resource(SceneAssets {
        sky: asset_server.load(SKY_TEXTURE),
        platform: asset_server.load(PLATFORM_TEXTURE),
        star: asset_server.load(STAR_TEXTURE),
        bomb: asset_server.load(BOMB_TEXTURE),
        dude: asset_server.load(DUDE_TEXTURE),
        dude_layout: layouts.add(layout),
    });
}

pub fn register_animations(mut library: ResMut<AnimationLibrary>) {
    library.insert(
        AnimationKey::Left,
        AnimationClip {
            first: 0,
            last: 3,
            fps: 10.0,
            repeat: true,
        },
    );
    library.insert(
        AnimationKey::Turn,
        AnimationClip {
            first: TURN_FRAME,
            last: TURN_FRAME,
            fps: 20.0,
            repeat: false,
        },
    );
    library.insert(
        AnimationKey::Right,
        AnimationClip {
            first: 5,
            last: 8,
            fps: 10.0,
            repeat: true,
        },
    );
}

/// Solid pairs plus the two contacts the collision handlers listen for.
/// The player and bombs also stop at the edges of the field.
pub fn register_colliders(rules: &mut CollisionRules) {
    rules
        .collider(Layer::Player, Layer::Platforms)
        .collider(Layer::Stars, Layer::Platforms)
        .collider(Layer::Bombs, Layer::Platforms)
        .overlap(Layer::Player, Layer::Stars)
        .collider(Layer::Player, Layer::Bombs)
        .collider(Layer::Player, Layer::WorldBounds)
        .collider(Layer::Bombs, Layer::WorldBounds);
}

/// Builds the fixed level: sky, platforms, player, and the first star wave.
fn create(
    mut commands: Commands,
    assets: Res<SceneAssets>,
    mut rules: ResMut<CollisionRules>,
    mut rng: ResMut<SpawnRng>,
) {
    register_colliders(&mut rules);
    spawn_world_bounds(&mut commands, &rules);

    commands.spawn((
        Sprite {
            image: assets.sky.clone(),
            custom_size: Some(Vec2::new(WORLD_WIDTH, WORLD_HEIGHT)),
            ..default()
        },
        Transform::from_translation(Vec3::new(0.0, 0.0, Z_BACKGROUND)),
        Background,
    ));

    for (center, scale) in PLATFORMS {
        spawn_platform(&mut commands, &assets, &rules, center, scale);
    }

    spawn_player(&mut commands, &assets, &rules);

    for index in 0..STAR_COUNT {
        spawn_star(&mut commands, &assets, &rules, index, &mut rng);
    }

    info!(
        platforms = PLATFORMS.len(),
        stars = STAR_COUNT,
        "level created"
    );
}

pub fn spawn_platform(
    commands: &mut Commands,
    assets: &SceneAssets,
    rules: &CollisionRules,
    center: Vec2,
    scale: f32,
) -> Entity {
    let size = PLATFORM_SIZE * scale;
    commands
        .spawn((
            Sprite {
                image: assets.platform.clone(),
                custom_size: Some(size),
                ..default()
            },
            Transform::from_translation(to_world(center).extend(Z_PLATFORM)),
            RigidBody::Fixed,
            Collider::cuboid(size.x / 2.0, size.y / 2.0),
            rules.layer(Layer::Platforms),
            Platform,
        ))
        .id()
}

pub fn spawn_player(commands: &mut Commands, assets: &SceneAssets, rules: &CollisionRules) -> Entity {
    let mut sprite = Sprite::from_atlas_image(
        assets.dude.clone(),
        TextureAtlas {
            layout: assets.dude_layout.clone(),
            index: TURN_FRAME,
        },
    );
    sprite.custom_size = Some(PLAYER_SIZE);
    commands
        .spawn((
            sprite,
            Transform::from_translation(to_world(PLAYER_START).extend(Z_PLAYER)),
            RigidBody::Dynamic,
            Collider::cuboid(PLAYER_SIZE.x / 2.0, PLAYER_SIZE.y / 2.0),
            Velocity::zero(),
            LockedAxes::ROTATION_LOCKED,
            bounce(PLAYER_BOUNCE),
            frictionless(),
            ActiveEvents::COLLISION_EVENTS,
            Grounded::default(),
            rules.layer(Layer::Player),
            Animator::new(TURN_FRAME),
            Player,
        ))
        .id()
}

/// Stars sit along the top edge, evenly spaced, each with its own vertical bounce.
pub fn star_position(index: usize) -> Vec2 {
    Vec2::new(STAR_START_X + STAR_STEP_X * index as f32, STAR_START_Y)
}

pub fn spawn_star(
    commands: &mut Commands,
    assets: &SceneAssets,
    rules: &CollisionRules,
    index: usize,
    rng: &mut SpawnRng,
) -> Entity {
    let position = star_position(index);
    let bounce_y = rng.random_range(STAR_BOUNCE_MIN..STAR_BOUNCE_MAX);
    commands
        .spawn((
            Sprite {
                image: assets.star.clone(),
                custom_size: Some(STAR_SIZE),
                ..default()
            },
            Transform::from_translation(to_world(position).extend(Z_STAR)),
            Visibility::Inherited,
            RigidBody::Dynamic,
            Collider::cuboid(STAR_SIZE.x / 2.0, STAR_SIZE.y / 2.0),
            Velocity::zero(),
            LockedAxes::ROTATION_LOCKED,
            bounce(bounce_y),
            rules.layer(Layer::Stars),
            Star,
        ))
        .id()
}

fn read_cursor_keys(keyboard_input: Res<ButtonInput<KeyCode>>, mut keys: ResMut<CursorKeys>) {
    let next = CursorKeys::from_input(&keyboard_input);
    keys.set_if_neq(next);
}

/// Per-frame steering. Does nothing once the session is over.
fn update_player(
    session: Res<Session>,
    keys: Res<CursorKeys>,
    library: Res<AnimationLibrary>,
    mut player: Query<(&mut Velocity, &Grounded, &mut Animator), With<Player>>,
) {
    if session.is_game_over() {
        return;
    }
    let Ok((mut velocity, grounded, mut animator)) = player.single_mut() else {
        return;
    };

    let movement = Movement::from_keys(&keys);
    velocity.linvel.x = movement.velocity_x();
    animator.play(&library, movement.animation(), true);

    if keys.up && grounded.0 {
        velocity.linvel.y = to_world_velocity(Vec2::new(0.0, JUMP_VELOCITY)).y;
    }
}
