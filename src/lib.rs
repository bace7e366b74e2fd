//! Star Catcher: a single-level arcade platformer. Run and jump across the
//! ledges, collect every star, and avoid the bombs each cleared wave adds.

pub mod animation;
pub mod collision;
pub mod config;
pub mod game;
pub mod physics;
pub mod scene;
pub mod score;
pub mod ui;
