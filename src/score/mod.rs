//! Score plugin - the observable score store shared by gameplay and the overlay.
//!
//! Writes go through [`Observable::set`], which calls every subscriber in
//! registration order before returning. The store is also a resource, so UI
//! systems can react to it with Bevy change detection.

use bevy::prelude::*;

/// Plugin that owns the score store.
pub struct ScorePlugin;

impl Plugin for ScorePlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<ScoreStore>()
            .add_systems(Startup, log_score_changes);
    }
}

/// Handle returned by [`Observable::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubscriberId(u64);

type Subscriber<T> = Box<dyn Fn(&T) + Send + Sync>;

/// A value plus the callbacks to notify when it is written.
pub struct Observable<T> {
    value: T,
    subscribers: Vec<(SubscriberId, Subscriber<T>)>,
    next_id: u64,
}

impl<T> Observable<T> {
    pub fn new(value: T) -> Self {
        Observable {
            value,
            subscribers: Vec::new(),
            next_id: 0,
        }
    }

    pub fn get(&self) -> &T {
        &self.value
    }

    /// Stores `value` and notifies subscribers, even if it equals the old value.
    pub fn set(&mut self, value: T) {
        self.value = value;
        for (_, subscriber) in &self.subscribers {
            subscriber(&self.value);
        }
    }

    pub fn subscribe(&mut self, subscriber: impl Fn(&T) + Send + Sync + 'static) -> SubscriberId {
        let id = SubscriberId(self.next_id);
        self.next_id += 1;
        self.subscribers.push((id, Box::new(subscriber)));
        id
    }

    /// Removes a subscriber. Returns false if the id was unknown.
    pub fn unsubscribe(&mut self, id: SubscriberId) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|(sub_id, _)| *sub_id != id);
        self.subscribers.len() != before
    }
}

impl<T: Default> Default for Observable<T> {
    fn default() -> Self {
        Observable::new(T::default())
    }
}

/// Session score. Starts at zero, only grows.
#[derive(Resource, Default, Deref, DerefMut)]
pub struct ScoreStore(pub Observable<u32>);

impl ScoreStore {
    pub fn value(&self) -> u32 {
        *self.0.get()
    }

    pub fn add(&mut self, points: u32) {
        let next = self.value().saturating_add(points);
        self.0.set(next);
    }
}

fn log_score_changes(mut score: ResMut<ScoreStore>) {
    score.subscribe(|value| debug!("score changed to {value}"));
}
