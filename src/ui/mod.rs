//! UI plugin - camera and the score overlay bound to the score store.

use bevy::prelude::*;

use crate::game::{GameSet, SCORE_TEXT_COLOR, ScoreText};
use crate::score::ScoreStore;

const OVERLAY_MARGIN: f32 = 16.0;
const SCORE_FONT_SIZE: f32 = 32.0;

/// Plugin for the camera and HUD.
pub struct UiPlugin;

impl Plugin for UiPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, setup_system).add_systems(
            Update,
            update_score_text
                .run_if(resource_changed::<ScoreStore>)
                .in_set(GameSet::Presentation),
        );
    }
}

pub fn score_label(score: u32) -> String {
    format!("Score: {score}")
}

/// Camera plus the bottom-left score text.
fn setup_system(mut commands: Commands, score: Res<ScoreStore>) {
    commands.spawn(Camera2d);

    commands.spawn((
        Text::new(score_label(score.value())),
        TextFont {
            font_size: SCORE_FONT_SIZE,
            ..default()
        },
        TextColor(SCORE_TEXT_COLOR),
        Node {
            position_type: PositionType::Absolute,
            bottom: Val::Px(OVERLAY_MARGIN),
            left: Val::Px(OVERLAY_MARGIN),
            ..default()
        },
        ScoreText,
    ));
}

/// Re-renders the overlay. Runs only on frames where the store was written.
fn update_score_text(score: Res<ScoreStore>, mut query: Query<&mut Text, With<ScoreText>>) {
    if let Ok(mut text) = query.single_mut() {
        **text = score_label(score.value());
    }
}
