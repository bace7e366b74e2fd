//! Level layout, movement tuning, and rendering layers.
//!
//! Positions are play-field coordinates: origin at the top-left corner of the
//! 800x600 surface, y growing downwards.

use bevy::prelude::*;

// Play field
pub const WORLD_WIDTH: f32 = 800.0;
pub const WORLD_HEIGHT: f32 = 600.0;

// Player
pub const PLAYER_START: Vec2 = Vec2::new(100.0, 450.0);
pub const PLAYER_SIZE: Vec2 = Vec2::new(32.0, 48.0);
pub const PLAYER_BOUNCE: f32 = 0.2;
pub const RUN_SPEED: f32 = 160.0;
pub const JUMP_VELOCITY: f32 = -330.0;

// Platforms: (center, scale). The platform texture is 400x32.
pub const PLATFORM_SIZE: Vec2 = Vec2::new(400.0, 32.0);
pub const PLATFORMS: [(Vec2, f32); 4] = [
    (Vec2::new(400.0, 568.0), 2.0),
    (Vec2::new(600.0, 400.0), 1.0),
    (Vec2::new(50.0, 250.0), 1.0),
    (Vec2::new(750.0, 220.0), 1.0),
];

// Stars
pub const STAR_COUNT: usize = 12;
pub const STAR_START_X: f32 = 12.0;
pub const STAR_START_Y: f32 = 0.0;
pub const STAR_STEP_X: f32 = 70.0;
pub const STAR_SIZE: Vec2 = Vec2::new(24.0, 22.0);
pub const STAR_BOUNCE_MIN: f32 = 0.4;
pub const STAR_BOUNCE_MAX: f32 = 0.8;
pub const SCORE_PER_STAR: u32 = 10;

// Bombs
pub const BOMB_SIZE: Vec2 = Vec2::new(14.0, 14.0);
pub const BOMB_SPAWN_Y: f32 = 16.0;
pub const BOMB_MAX_SPEED_X: f32 = 200.0;
pub const BOMB_FALL_SPEED: f32 = 20.0;

// Textures under assets/
pub const SKY_TEXTURE: &str = "sky.png";
pub const PLATFORM_TEXTURE: &str = "platform.png";
pub const STAR_TEXTURE: &str = "star.png";
pub const BOMB_TEXTURE: &str = "bomb.png";
pub const DUDE_TEXTURE: &str = "dude.png";

// Sprite sheet
pub const DUDE_FRAME_SIZE: UVec2 = UVec2::new(32, 48);
pub const DUDE_FRAME_COUNT: u32 = 9;

// Colors
pub const BACKGROUND_COLOR: Color = Color::srgba(0.04, 0.04, 0.04, 1.0);
pub const HIT_TINT: Color = Color::srgb(1.0, 0.0, 0.0);
pub const SCORE_TEXT_COLOR: Color = Color::srgb(0.95, 0.95, 0.95);

// Z-index constants for rendering layers
pub const Z_BACKGROUND: f32 = 0.0;
pub const Z_PLATFORM: f32 = 1.0;
pub const Z_STAR: f32 = 1.5;
pub const Z_BOMB: f32 = 1.8;
pub const Z_PLAYER: f32 = 2.0;
pub const Z_DEBUG: f32 = 10.0;

/// Converts a play-field point to Bevy world space (origin centred, y up).
pub fn to_world(point: Vec2) -> Vec2 {
    Vec2::new(point.x - WORLD_WIDTH / 2.0, WORLD_HEIGHT / 2.0 - point.y)
}

/// Inverse of [`to_world`].
pub fn from_world(point: Vec2) -> Vec2 {
    Vec2::new(point.x + WORLD_WIDTH / 2.0, WORLD_HEIGHT / 2.0 - point.y)
}

/// Play-field velocities grow downwards; world velocities grow upwards.
pub fn to_world_velocity(velocity: Vec2) -> Vec2 {
    Vec2::new(velocity.x, -velocity.y)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn play_field_corners_map_to_world_corners() {
        assert_eq!(to_world(Vec2::ZERO), Vec2::new(-400.0, 300.0));
        assert_eq!(to_world(Vec2::new(800.0, 600.0)), Vec2::new(400.0, -300.0));
        let ledge = Vec2::new(600.0, 400.0);
        assert_eq!(from_world(to_world(ledge)), ledge);
    }

    #[test]
    fn jump_points_up_in_world_space() {
        assert_eq!(
            to_world_velocity(Vec2::new(-160.0, JUMP_VELOCITY)),
            Vec2::new(-160.0, 330.0)
        );
    }
}
