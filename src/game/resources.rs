//! Game resources (singleton state).

use bevy::prelude::*;
use rand::{SeedableRng, rngs::StdRng};

/// Session phase. `GameOver` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum SessionPhase {
    #[default]
    Playing,
    GameOver,
}

/// Per-run session state.
#[derive(Resource, Debug, Default)]
pub struct Session {
    phase: SessionPhase,
}

impl Session {
    pub fn is_game_over(&self) -> bool {
        self.phase == SessionPhase::GameOver
    }

    /// Moves the session to `GameOver`. Returns false if it already was.
    pub fn end(&mut self) -> bool {
        if self.is_game_over() {
            return false;
        }
        self.phase = SessionPhase::GameOver;
        true
    }
}

/// Snapshot of the arrow keys, refreshed at the start of every frame.
#[derive(Resource, Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CursorKeys {
    pub left: bool,
    pub right: bool,
    pub up: bool,
}

impl CursorKeys {
    pub fn from_input(keyboard_input: &ButtonInput<KeyCode>) -> Self {
        CursorKeys {
            left: keyboard_input.pressed(KeyCode::ArrowLeft),
            right: keyboard_input.pressed(KeyCode::ArrowRight),
            up: keyboard_input.pressed(KeyCode::ArrowUp),
        }
    }
}

/// Random source for star bounce and bomb spawns. Seeded when `seed` is configured.
#[derive(Resource, Deref, DerefMut)]
pub struct SpawnRng(pub StdRng);

impl SpawnRng {
    pub fn seeded(seed: u64) -> Self {
        SpawnRng(StdRng::seed_from_u64(seed))
    }
}

impl Default for SpawnRng {
    fn default() -> Self {
        SpawnRng(StdRng::from_os_rng())
    }
}

/// Texture handles declared by the scene's preload step.
#[derive(Resource, Default, Clone)]
pub struct SceneAssets {
    pub sky: Handle<Image>,
    pub platform: Handle<Image>,
    pub star: Handle<Image>,
    pub bomb: Handle<Image>,
    pub dude: Handle<Image>,
    pub dude_layout: Handle<TextureAtlasLayout>,
}
