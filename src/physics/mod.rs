//! Physics plugin - bevy_rapier2d set up for the 800x600 play field.
//!
//! World units are pixels. Gravity and the per-frame step cap come from
//! [`GameConfig`]. Which kinds of entity touch is declared once through
//! [`CollisionRules`] and turned into rapier groups: a solid pair shares
//! collision and solver groups, an overlap pair shares collision groups only,
//! so rapier reports the contact without pushing the bodies apart.

mod debug;

use bevy::prelude::*;
use bevy_rapier2d::prelude::*;

use crate::config::GameConfig;
use crate::game::{GameSet, WORLD_HEIGHT, WORLD_WIDTH};

pub use debug::DebugDrawPlugin;

pub const PIXELS_PER_METER: f32 = 100.0;

const BOUNDS_THICKNESS: f32 = 64.0;
/// Smallest upward share of a contact normal that still counts as floor.
const FLOOR_NORMAL_MIN: f32 = 0.7;

/// Plugin for rapier and the play-field physics helpers.
pub struct PhysicsPlugin;

impl Plugin for PhysicsPlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins(RapierPhysicsPlugin::<NoUserData>::pixels_per_meter(
            PIXELS_PER_METER,
        ))
        .init_resource::<CollisionRules>()
        .add_systems(
            Update,
            (configure_world, detect_ground).in_set(GameSet::Physics),
        );
    }
}

/// Kinds of collider, one rapier group each.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Layer {
    Player,
    Stars,
    Bombs,
    Platforms,
    WorldBounds,
}

impl Layer {
    pub fn group(self) -> Group {
        match self {
            Layer::Player => Group::GROUP_1,
            Layer::Stars => Group::GROUP_2,
            Layer::Bombs => Group::GROUP_3,
            Layer::Platforms => Group::GROUP_4,
            Layer::WorldBounds => Group::GROUP_5,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Interaction {
    /// Both bodies are pushed apart.
    Collide,
    /// Contact is reported, nothing is pushed.
    Overlap,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CollisionRule {
    pub a: Layer,
    pub b: Layer,
    pub interaction: Interaction,
}

/// Registered layer pairs. Layers with no rule between them pass through each other.
#[derive(Resource, Debug, Default)]
pub struct CollisionRules {
    rules: Vec<CollisionRule>,
}

impl CollisionRules {
    pub fn collider(&mut self, a: Layer, b: Layer) -> &mut Self {
        self.push(a, b, Interaction::Collide)
    }

    pub fn overlap(&mut self, a: Layer, b: Layer) -> &mut Self {
        self.push(a, b, Interaction::Overlap)
    }

    fn push(&mut self, a: Layer, b: Layer, interaction: Interaction) -> &mut Self {
        self.rules.push(CollisionRule { a, b, interaction });
        self
    }

    pub fn iter(&self) -> impl Iterator<Item = &CollisionRule> {
        self.rules.iter()
    }

    /// Rapier groups for a collider on `layer`.
    pub fn groups(&self, layer: Layer) -> (CollisionGroups, SolverGroups) {
        let mut detect = Group::NONE;
        let mut solve = Group::NONE;
        for rule in &self.rules {
            let other = if rule.a == layer {
                rule.b
            } else if rule.b == layer {
                rule.a
            } else {
                continue;
            };
            detect |= other.group();
            if rule.interaction == Interaction::Collide {
                solve |= other.group();
            }
        }
        (
            CollisionGroups::new(layer.group(), detect),
            SolverGroups::new(layer.group(), solve),
        )
    }

    /// Components that put a collider on `layer`.
    pub fn layer(&self, layer: Layer) -> (Layer, CollisionGroups, SolverGroups) {
        let (collision, solver) = self.groups(layer);
        (layer, collision, solver)
    }
}

/// Invisible wall around the play field.
#[derive(Component)]
pub struct WorldBounds;

/// Set while the body rests on something below it, as of the last physics step.
#[derive(Component, Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Grounded(pub bool);

/// Restitution that wins against whatever the body hits.
pub fn bounce(coefficient: f32) -> Restitution {
    Restitution {
        coefficient,
        combine_rule: CoefficientCombineRule::Max,
    }
}

/// Friction that never slows a body sliding along a surface.
pub fn frictionless() -> Friction {
    Friction {
        coefficient: 0.0,
        combine_rule: CoefficientCombineRule::Min,
    }
}

/// Walls just outside the four edges of the play field.
pub fn spawn_world_bounds(commands: &mut Commands, rules: &CollisionRules) {
    let half = Vec2::new(WORLD_WIDTH, WORLD_HEIGHT) / 2.0;
    let t = BOUNDS_THICKNESS / 2.0;
    let horizontal = Vec2::new(half.x + BOUNDS_THICKNESS, t);
    let vertical = Vec2::new(t, half.y + BOUNDS_THICKNESS);
    let walls = [
        (Vec2::new(0.0, half.y + t), horizontal),
        (Vec2::new(0.0, -half.y - t), horizontal),
        (Vec2::new(-half.x - t, 0.0), vertical),
        (Vec2::new(half.x + t, 0.0), vertical),
    ];
    for (center, half_extents) in walls {
        commands.spawn((
            Transform::from_translation(center.extend(0.0)),
            RigidBody::Fixed,
            Collider::cuboid(half_extents.x, half_extents.y),
            rules.layer(Layer::WorldBounds),
            WorldBounds,
        ));
    }
}

fn configure_world(
    config: Res<GameConfig>,
    mut contexts: Query<&mut RapierConfiguration, Added<RapierConfiguration>>,
    timestep: Option<ResMut<TimestepMode>>,
) {
    let Ok(mut rapier) = contexts.single_mut() else {
        return;
    };
    rapier.gravity = Vec2::new(0.0, -config.physics.gravity);

    let max_dt = config.physics.max_step.max(0.001);
    if let Some(mut timestep) = timestep {
        *timestep = TimestepMode::Variable {
            max_dt,
            time_scale: 1.0,
            substeps: 1,
        };
    }
    info!(
        gravity = config.physics.gravity,
        max_step = max_dt,
        "physics configured"
    );
}

fn detect_ground(
    rapier: ReadRapierContext,
    solvers: Query<&SolverGroups>,
    mut bodies: Query<(Entity, &SolverGroups, &mut Grounded)>,
) {
    let Ok(context) = rapier.single() else {
        return;
    };
    for (entity, own, mut grounded) in bodies.iter_mut() {
        let solid = |other: Entity| {
            solvers
                .get(other)
                .is_ok_and(|groups| pushes_apart(own, groups))
        };
        grounded.set_if_neq(Grounded(resting_on_surface(&context, entity, solid)));
    }
}

/// Whether rapier resolves contacts between colliders with these solver groups.
pub fn pushes_apart(a: &SolverGroups, b: &SolverGroups) -> bool {
    a.memberships.intersects(b.filters) && b.memberships.intersects(a.filters)
}

/// True when a contact with a `solid` collider pushes `entity` upwards.
pub fn resting_on_surface(
    context: &RapierContext,
    entity: Entity,
    solid: impl Fn(Entity) -> bool,
) -> bool {
    context.contact_pairs_with(entity).any(|pair| {
        let (other, sign) = if pair.collider1() == Some(entity) {
            // Manifold normals point from the first collider towards the second.
            (pair.collider2(), -1.0)
        } else {
            (pair.collider1(), 1.0)
        };
        other.is_some_and(&solid)
            && pair.manifolds().any(|manifold| {
                manifold.num_solver_contacts() > 0 && manifold.normal().y * sign > FLOOR_NORMAL_MIN
            })
    })
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::game::GameSchedulePlugin;
    use bevy::{ecs::system::RunSystemOnce, time::TimeUpdateStrategy};
    use std::time::Duration;

    /// Headless app stepping rapier at a fixed 60 Hz.
    pub(crate) fn physics_app() -> App {
        let mut app = App::new();
        app.add_plugins((MinimalPlugins, TransformPlugin))
            .insert_resource(TimeUpdateStrategy::ManualDuration(Duration::from_secs_f64(
                1.0 / 60.0,
            )))
            .insert_resource(GameConfig::default())
            .add_plugins((GameSchedulePlugin, PhysicsPlugin));
        app
    }

    pub(crate) fn run_frames(app: &mut App, frames: usize) {
        for _ in 0..frames {
            app.update();
        }
    }

    fn box_rules() -> CollisionRules {
        let mut rules = CollisionRules::default();
        rules
            .collider(Layer::Player, Layer::Platforms)
            .overlap(Layer::Player, Layer::Stars)
            .collider(Layer::Player, Layer::WorldBounds);
        rules
    }

    #[test]
    fn solid_pairs_share_solver_groups() {
        let rules = box_rules();
        let (collision, solver) = rules.groups(Layer::Player);

        assert_eq!(collision.memberships, Group::GROUP_1);
        assert_eq!(
            collision.filters,
            Group::GROUP_4 | Group::GROUP_2 | Group::GROUP_5
        );
        assert_eq!(solver.memberships, Group::GROUP_1);
        assert_eq!(solver.filters, Group::GROUP_4 | Group::GROUP_5);
    }

    #[test]
    fn overlap_pairs_are_detected_but_not_solved() {
        let rules = box_rules();
        let (star_collision, star_solver) = rules.groups(Layer::Stars);
        let (player_collision, player_solver) = rules.groups(Layer::Player);

        assert!(star_collision.filters.contains(player_collision.memberships));
        assert!(player_collision.filters.contains(star_collision.memberships));
        assert!(!star_solver.filters.contains(player_solver.memberships));
        assert!(!player_solver.filters.contains(star_solver.memberships));
    }

    #[test]
    fn only_solid_pairs_push_apart() {
        let rules = box_rules();
        let (_, player) = rules.groups(Layer::Player);
        let (_, platforms) = rules.groups(Layer::Platforms);
        let (_, stars) = rules.groups(Layer::Stars);
        assert!(pushes_apart(&player, &platforms));
        assert!(!pushes_apart(&player, &stars));
    }

    #[test]
    fn unregistered_layers_ignore_each_other() {
        let rules = box_rules();
        let (bombs, _) = rules.groups(Layer::Bombs);
        assert_eq!(bombs.memberships, Group::GROUP_3);
        assert_eq!(bombs.filters, Group::NONE);
        let (stars, _) = rules.groups(Layer::Stars);
        assert!(!stars.filters.contains(Group::GROUP_4));
    }

    #[test]
    fn world_bounds_enclose_the_field() {
        let mut app = App::new();
        let rules = box_rules();
        app.world_mut()
            .run_system_once(move |mut commands: Commands| spawn_world_bounds(&mut commands, &rules))
            .expect("spawn bounds");

        let world = app.world_mut();
        let walls: Vec<Vec3> = world
            .query_filtered::<&Transform, With<WorldBounds>>()
            .iter(world)
            .map(|transform| transform.translation)
            .collect();
        assert_eq!(walls.len(), 4);
        assert!(walls.iter().any(|wall| wall.y == -332.0));
        assert!(walls.iter().any(|wall| wall.x == 432.0));
    }

    #[test]
    fn bounce_and_friction_override_the_surface() {
        assert_eq!(bounce(0.2).combine_rule, CoefficientCombineRule::Max);
        assert_eq!(frictionless().coefficient, 0.0);
        assert_eq!(frictionless().combine_rule, CoefficientCombineRule::Min);
    }

    #[test]
    fn falling_body_lands_and_freezes_when_paused() {
        let mut app = physics_app();
        let rules = box_rules();
        let ground = app
            .world_mut()
            .spawn((
                Transform::from_xyz(0.0, -268.0, 0.0),
                RigidBody::Fixed,
                Collider::cuboid(400.0, 32.0),
                rules.layer(Layer::Platforms),
            ))
            .id();
        let player = app
            .world_mut()
            .spawn((
                Transform::from_xyz(-300.0, -150.0, 2.0),
                RigidBody::Dynamic,
                Collider::cuboid(16.0, 24.0),
                Velocity::zero(),
                LockedAxes::ROTATION_LOCKED,
                bounce(0.2),
                rules.layer(Layer::Player),
                Grounded::default(),
            ))
            .id();

        run_frames(&mut app, 240);

        let gravity = app
            .world_mut()
            .query::<&RapierConfiguration>()
            .single(app.world())
            .expect("rapier context")
            .gravity;
        assert_eq!(gravity, Vec2::new(0.0, -300.0));

        let transform = app.world().get::<Transform>(player).expect("player");
        assert!(
            (transform.translation.y - -212.0).abs() < 2.0,
            "rests on the ground, got {}",
            transform.translation.y
        );
        assert_eq!(transform.translation.z, 2.0);
        assert_eq!(app.world().get::<Grounded>(player), Some(&Grounded(true)));
        assert!(app.world().get_entity(ground).is_ok());

        for mut rapier in app
            .world_mut()
            .query::<&mut RapierConfiguration>()
            .iter_mut(app.world_mut())
        {
            rapier.physics_pipeline_active = false;
        }
        app.world_mut()
            .get_mut::<Velocity>(player)
            .expect("player velocity")
            .linvel = Vec2::new(160.0, 330.0);
        let frozen = app.world().get::<Transform>(player).expect("player").translation;
        run_frames(&mut app, 10);
        assert_eq!(
            app.world().get::<Transform>(player).expect("player").translation,
            frozen
        );
    }

    #[test]
    fn airborne_body_is_not_grounded() {
        let mut app = physics_app();
        let rules = box_rules();
        let player = app
            .world_mut()
            .spawn((
                Transform::from_xyz(0.0, 200.0, 0.0),
                RigidBody::Dynamic,
                Collider::cuboid(16.0, 24.0),
                rules.layer(Layer::Player),
                Grounded(true),
            ))
            .id();

        run_frames(&mut app, 5);

        assert_eq!(app.world().get::<Grounded>(player), Some(&Grounded(false)));
    }
}
