//! Animation plugin - named sprite-sheet clips and a per-entity player.

use bevy::prelude::*;
use std::collections::HashMap;
use std::time::Duration;

use crate::game::GameSet;

/// Plugin for sprite-sheet animation playback.
pub struct AnimationPlugin;

impl Plugin for AnimationPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<AnimationLibrary>().add_systems(
            Update,
            advance_animations.in_set(GameSet::Presentation),
        );
    }
}

/// Clips used by the player sprite.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AnimationKey {
    Left,
    Turn,
    Right,
}

/// An inclusive frame range played at a fixed rate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnimationClip {
    pub first: usize,
    pub last: usize,
    pub fps: f32,
    pub repeat: bool,
}

impl AnimationClip {
    pub fn frame_duration(&self) -> Duration {
        Duration::from_nanos((1_000_000_000.0 / f64::from(self.fps.max(f32::EPSILON))).round() as u64)
    }
}

/// Registered clips, keyed by name.
#[derive(Resource, Debug, Default)]
pub struct AnimationLibrary {
    clips: HashMap<AnimationKey, AnimationClip>,
}

impl AnimationLibrary {
    pub fn insert(&mut self, key: AnimationKey, clip: AnimationClip) {
        self.clips.insert(key, clip);
    }

    pub fn get(&self, key: AnimationKey) -> Option<&AnimationClip> {
        self.clips.get(&key)
    }
}

/// Playback state for one sprite.
#[derive(Component, Debug)]
pub struct Animator {
    current: Option<AnimationKey>,
    frame: usize,
    timer: Timer,
}

impl Animator {
    /// Starts with a still frame and no clip.
    pub fn new(frame: usize) -> Self {
        Animator {
            current: None,
            frame,
            timer: Timer::default(),
        }
    }

    pub fn current(&self) -> Option<AnimationKey> {
        self.current
    }

    pub fn frame(&self) -> usize {
        self.frame
    }

    /// Switches to `key`. With `ignore_if_playing`, replaying the running clip is a no-op.
    /// Unknown keys are ignored.
    pub fn play(&mut self, library: &AnimationLibrary, key: AnimationKey, ignore_if_playing: bool) {
        if ignore_if_playing && self.current == Some(key) {
            return;
        }
        let Some(clip) = library.get(key) else {
            warn!("animation {key:?} is not registered");
            return;
        };
        self.current = Some(key);
        self.frame = clip.first;
        self.timer = Timer::new(clip.frame_duration(), TimerMode::Repeating);
    }

    /// Advances the running clip by `delta` and returns the frame to show.
    pub fn advance(&mut self, library: &AnimationLibrary, delta: Duration) -> usize {
        let Some(clip) = self.current.and_then(|key| library.get(key)) else {
            return self.frame;
        };
        self.timer.tick(delta);
        for _ in 0..self.timer.times_finished_this_tick() {
            if self.frame < clip.last {
                self.frame += 1;
            } else if clip.repeat {
                self.frame = clip.first;
            }
        }
        self.frame
    }
}

fn advance_animations(
    time: Res<Time>,
    library: Res<AnimationLibrary>,
    mut sprites: Query<(&mut Animator, &mut Sprite)>,
) {
    for (mut animator, mut sprite) in sprites.iter_mut() {
        let frame = animator.advance(&library, time.delta());
        if let Some(atlas) = sprite.texture_atlas.as_mut()
            && atlas.index != frame
        {
            atlas.index = frame;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn library() -> AnimationLibrary {
        let mut library = AnimationLibrary::default();
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
                first: 4,
                last: 4,
                fps: 20.0,
                repeat: false,
            },
        );
        library
    }

    #[test]
    fn looping_clip_wraps_to_first_frame() {
        let library = library();
        let mut animator = Animator::new(4);
        animator.play(&library, AnimationKey::Left, true);
        assert_eq!(animator.frame(), 0);

        let step = Duration::from_millis(100);
        let frames: Vec<usize> = (0..5).map(|_| animator.advance(&library, step)).collect();

        assert_eq!(frames, vec![1, 2, 3, 0, 1]);
    }

    #[test]
    fn replaying_running_clip_keeps_its_frame_when_ignored() {
        let library = library();
        let mut animator = Animator::new(4);
        animator.play(&library, AnimationKey::Left, true);
        animator.advance(&library, Duration::from_millis(250));
        assert_eq!(animator.frame(), 2);

        animator.play(&library, AnimationKey::Left, true);
        assert_eq!(animator.frame(), 2);

        animator.play(&library, AnimationKey::Left, false);
        assert_eq!(animator.frame(), 0);
    }

    #[test]
    fn single_frame_clip_holds() {
        let library = library();
        let mut animator = Animator::new(0);
        animator.play(&library, AnimationKey::Turn, true);

        assert_eq!(animator.advance(&library, Duration::from_secs(3)), 4);
        assert_eq!(animator.current(), Some(AnimationKey::Turn));
    }

    #[test]
    fn unknown_clip_is_ignored() {
        let library = library();
        let mut animator = Animator::new(4);
        animator.play(&library, AnimationKey::Right, true);

        assert_eq!(animator.current(), None);
        assert_eq!(animator.advance(&library, Duration::from_secs(1)), 4);
    }
}
