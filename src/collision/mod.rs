//! Collision plugin - what happens when the player touches a star or a bomb.
//!
//! Rapier reports contacts as `CollisionEvent::Started(a, b, _)` with no
//! promise about which side is the player, so both handlers normalise the
//! pair first.

use bevy::prelude::*;
use bevy_rapier2d::prelude::*;
use rand::Rng;
use std::ops::Range;

use crate::animation::{AnimationKey, AnimationLibrary, Animator};
use crate::game::{
    BOMB_FALL_SPEED, BOMB_MAX_SPEED_X, BOMB_SIZE, BOMB_SPAWN_Y, Bomb, GameSet, HIT_TINT, Player,
    SCORE_PER_STAR, STAR_START_Y, SceneAssets, Session, SpawnRng, Star, WORLD_WIDTH, Z_BOMB,
    from_world, to_world, to_world_velocity,
};
use crate::physics::{CollisionRules, Layer, bounce, frictionless};
use crate::score::ScoreStore;

/// Plugin for the contact handlers.
pub struct CollisionPlugin;

impl Plugin for CollisionPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            Update,
            (collect_stars, hit_bombs).chain().in_set(GameSet::Collision),
        );
    }
}

type StarQuery<'w, 's> = Query<
    'w,
    's,
    (
        Entity,
        &'static mut Transform,
        &'static mut Velocity,
        &'static mut Visibility,
    ),
    (With<Star>, Without<Player>),
>;
type PlayerQuery<'w, 's> = Query<'w, 's, &'static Transform, (With<Player>, Without<Star>)>;

/// Contacts that just started, as `(player, other)`.
fn player_contacts<'a>(
    events: impl Iterator<Item = &'a CollisionEvent> + 'a,
    is_player: impl Fn(Entity) -> bool + 'a,
) -> impl Iterator<Item = (Entity, Entity)> + 'a {
    events.filter_map(move |event| match *event {
        CollisionEvent::Started(a, b, _) if is_player(a) => Some((a, b)),
        CollisionEvent::Started(a, b, _) if is_player(b) => Some((b, a)),
        _ => None,
    })
}

/// Bombs spawn on the half of the field the player is not on.
pub fn bomb_spawn_range(player_x: f32) -> Range<f32> {
    let middle = WORLD_WIDTH / 2.0;
    if player_x < middle {
        middle..WORLD_WIDTH
    } else {
        0.0..middle
    }
}

/// Random bomb start for a player standing at `player_x`, in play-field coordinates.
pub fn bomb_launch(player_x: f32, rng: &mut impl Rng) -> (Vec2, Vec2) {
    let x = rng.random_range(bomb_spawn_range(player_x));
    let vx = rng.random_range(-BOMB_MAX_SPEED_X..BOMB_MAX_SPEED_X);
    (
        Vec2::new(x, BOMB_SPAWN_Y),
        Vec2::new(vx, BOMB_FALL_SPEED),
    )
}

pub fn spawn_bomb(
    commands: &mut Commands,
    assets: &SceneAssets,
    rules: &CollisionRules,
    position: Vec2,
    velocity: Vec2,
) -> Entity {
    commands
        .spawn((
            Sprite {
                image: assets.bomb.clone(),
                custom_size: Some(BOMB_SIZE),
                ..default()
            },
            Transform::from_translation(to_world(position).extend(Z_BOMB)),
            RigidBody::Dynamic,
            Collider::cuboid(BOMB_SIZE.x / 2.0, BOMB_SIZE.y / 2.0),
            Velocity::linear(to_world_velocity(velocity)),
            GravityScale(0.0),
            LockedAxes::ROTATION_LOCKED,
            bounce(1.0),
            frictionless(),
            rules.layer(Layer::Bombs),
            Bomb,
        ))
        .id()
}

/// Takes a star out of play without despawning it.
fn disable_star(commands: &mut Commands, star: Entity, visibility: &mut Visibility) {
    *visibility = Visibility::Hidden;
    commands
        .entity(star)
        .insert((RigidBodyDisabled, ColliderDisabled));
}

/// Puts a star back at the top of its column, at rest.
fn enable_star(
    commands: &mut Commands,
    star: Entity,
    transform: &mut Transform,
    velocity: &mut Velocity,
    visibility: &mut Visibility,
) {
    let x = from_world(transform.translation.truncate()).x;
    let top = to_world(Vec2::new(x, STAR_START_Y));
    transform.translation.x = top.x;
    transform.translation.y = top.y;
    *velocity = Velocity::zero();
    *visibility = Visibility::Inherited;
    commands
        .entity(star)
        .remove::<(RigidBodyDisabled, ColliderDisabled)>();
}

/// Player overlapped a star: hide it, score it, and start a new wave when none are left.
fn collect_stars(
    mut commands: Commands,
    mut events: MessageReader<CollisionEvent>,
    mut stars: StarQuery,
    players: PlayerQuery,
    mut score: ResMut<ScoreStore>,
    mut rng: ResMut<SpawnRng>,
    assets: Res<SceneAssets>,
    rules: Res<CollisionRules>,
) {
    for (player, star) in player_contacts(events.read(), |entity| players.contains(entity)) {
        let Ok(player_transform) = players.get(player) else {
            continue;
        };
        let Ok((_, _, _, mut visibility)) = stars.get_mut(star) else {
            continue;
        };
        // Visibility flips immediately; the disable markers land with the commands.
        if *visibility == Visibility::Hidden {
            continue;
        }

        disable_star(&mut commands, star, &mut visibility);
        score.add(SCORE_PER_STAR);

        if stars
            .iter()
            .any(|(_, _, _, visibility)| *visibility != Visibility::Hidden)
        {
            continue;
        }

        for (entity, mut transform, mut velocity, mut visibility) in stars.iter_mut() {
            enable_star(
                &mut commands,
                entity,
                &mut transform,
                &mut velocity,
                &mut visibility,
            );
        }

        let player_x = from_world(player_transform.translation.truncate()).x;
        let (position, velocity) = bomb_launch(player_x, &mut rng.0);
        spawn_bomb(&mut commands, &assets, &rules, position, velocity);
        info!(
            x = position.x,
            vx = velocity.x,
            score = score.value(),
            "wave cleared, bomb spawned"
        );
    }
}

/// Player touched a bomb: freeze the world and end the session.
fn hit_bombs(
    mut events: MessageReader<CollisionEvent>,
    mut contexts: Query<&mut RapierConfiguration>,
    mut session: ResMut<Session>,
    score: Res<ScoreStore>,
    library: Res<AnimationLibrary>,
    bombs: Query<(), With<Bomb>>,
    mut players: Query<(&mut Sprite, &mut Animator), With<Player>>,
) {
    let contacts: Vec<(Entity, Entity)> =
        player_contacts(events.read(), |entity| players.contains(entity)).collect();
    for (player, bomb) in contacts {
        if session.is_game_over() {
            return;
        }
        if !bombs.contains(bomb) {
            continue;
        }
        let Ok(mut rapier) = contexts.single_mut() else {
            warn!("no physics context to pause");
            return;
        };
        let Ok((mut sprite, mut animator)) = players.get_mut(player) else {
            continue;
        };

        hit_bomb(
            &mut rapier,
            &mut session,
            &library,
            &mut sprite,
            &mut animator,
        );
        info!(final_score = score.value(), "game over");
    }
}

/// Pauses physics, tints the player, shows the idle frame, and ends the session.
pub fn hit_bomb(
    rapier: &mut RapierConfiguration,
    session: &mut Session,
    library: &AnimationLibrary,
    sprite: &mut Sprite,
    animator: &mut Animator,
) {
    rapier.physics_pipeline_active = false;
    sprite.color = HIT_TINT;
    animator.play(library, AnimationKey::Turn, false);
    session.end();
}
