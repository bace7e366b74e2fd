//! Core game module containing shared components, resources, and constants.

mod components;
mod constants;
mod resources;

pub use components::*;
pub use constants::*;
pub use resources::*;

use bevy::prelude::*;

/// Per-frame ordering of the game's systems. Rapier steps in `PostUpdate`,
/// so every set here sees the results of the previous frame's step.
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GameSet {
    /// Read back contact state from the last physics step.
    Physics,
    /// Poll input and steer the player.
    Input,
    /// React to contacts raised by the physics step.
    Collision,
    /// Animation and UI.
    Presentation,
}

/// Chains the [`GameSet`]s in `Update`.
pub struct GameSchedulePlugin;

impl Plugin for GameSchedulePlugin {
    fn build(&self, app: &mut App) {
        app.configure_sets(
            Update,
            (
                GameSet::Physics,
                GameSet::Input,
                GameSet::Collision,
                GameSet::Presentation,
            )
                .chain(),
        );
    }
}
