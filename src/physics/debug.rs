//! Collider outlines drawn with an immediate-mode painter when `physics.debug` is on.

use bevy::prelude::*;
use bevy_rapier2d::prelude::*;
use bevy_vector_shapes::prelude::*;

use crate::config::GameConfig;
use crate::game::{GameSet, Z_DEBUG};

const DYNAMIC_COLOR: Color = Color::srgba(1.0, 0.0, 1.0, 1.0);
const STATIC_COLOR: Color = Color::srgba(0.0, 0.0, 1.0, 1.0);
const OUTLINE_THICKNESS: f32 = 1.0;

/// Plugin for the physics debug overlay.
pub struct DebugDrawPlugin;

impl Plugin for DebugDrawPlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins(Shape2dPlugin::default()).add_systems(
            Update,
            draw_colliders
                .run_if(debug_enabled)
                .in_set(GameSet::Presentation),
        );
    }
}

fn debug_enabled(config: Res<GameConfig>) -> bool {
    config.physics.debug
}

/// Outline color for a body, or `None` for kinds the overlay skips.
fn outline_color(body: &RigidBody) -> Option<Color> {
    match body {
        RigidBody::Fixed => Some(STATIC_COLOR),
        RigidBody::Dynamic => Some(DYNAMIC_COLOR),
        _ => None,
    }
}

fn draw_colliders(
    mut painter: ShapePainter,
    colliders: Query<(&Collider, &GlobalTransform, &RigidBody), Without<ColliderDisabled>>,
) {
    painter.hollow = true;
    painter.thickness = OUTLINE_THICKNESS;

    for (collider, transform, body) in colliders.iter() {
        let (Some(cuboid), Some(color)) = (collider.as_cuboid(), outline_color(body)) else {
            continue;
        };
        painter.color = color;
        painter.transform =
            Transform::from_translation(transform.translation().truncate().extend(Z_DEBUG));
        painter.rect(cuboid.half_extents() * 2.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_and_dynamic_bodies_get_distinct_outlines() {
        assert_eq!(outline_color(&RigidBody::Fixed), Some(STATIC_COLOR));
        assert_eq!(outline_color(&RigidBody::Dynamic), Some(DYNAMIC_COLOR));
        assert_eq!(outline_color(&RigidBody::KinematicVelocityBased), None);
    }
}
