//! ECS marker components for the level's entities.

use bevy::prelude::*;

/// The player-controlled sprite.
#[derive(Component)]
pub struct Player;

/// A collectible star. Stars are hidden and disabled when collected, never despawned.
#[derive(Component)]
pub struct Star;

/// A bouncing bomb spawned at the end of every star wave.
#[derive(Component)]
pub struct Bomb;

/// A static ledge.
#[derive(Component)]
pub struct Platform;

/// The full-screen sky image.
#[derive(Component)]
pub struct Background;

/// Component to mark the score display UI element.
#[derive(Component)]
pub struct ScoreText;
