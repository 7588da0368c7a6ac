//! Id-ordered owner of every live track.

use std::collections::BTreeMap;

use crate::tracker::clock::FrameTime;
use crate::tracker::rect::BoundingBox;
use crate::tracker::track::{Track, TrackId};

/// Ordered mapping from id to track state.
///
/// Ids are handed out in increasing order and never reused, so ascending
/// id order is also insertion order.
#[derive(Debug, Default)]
pub struct TrackStore {
    tracks: BTreeMap<TrackId, Track>,
    last_id: u64,
}

impl TrackStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn next_track_id(&mut self) -> TrackId {
        self.last_id += 1;
        TrackId(self.last_id)
    }

    /// Create a `Tracked` track from an unmatched detection.
    pub fn spawn(&mut self, bbox: BoundingBox, now: FrameTime) -> TrackId {
        let id = self.next_track_id();
        self.tracks.insert(id, Track::new(id, bbox, now));
        id
    }

    pub fn get(&self, id: TrackId) -> Option<&Track> {
        self.tracks.get(&id)
    }

    pub fn get_mut(&mut self, id: TrackId) -> Option<&mut Track> {
        self.tracks.get_mut(&id)
    }

    pub fn remove(&mut self, id: TrackId) -> Option<Track> {
        self.tracks.remove(&id)
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    pub fn contains(&self, id: TrackId) -> bool {
        self.tracks.contains_key(&id)
    }

    /// Tracks in ascending id order.
    pub fn iter(&self) -> impl Iterator<Item = &Track> {
        self.tracks.values()
    }

    pub fn ids(&self) -> Vec<TrackId> {
        self.tracks.keys().copied().collect()
    }

    /// Number of ids ever issued by this store.
    pub fn issued(&self) -> u64 {
        self.last_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bbox(x: f32) -> BoundingBox {
        BoundingBox::new(x, 0.0, x + 10.0, 10.0)
    }

    #[test]
    fn test_ids_are_never_reused() {
        let now = FrameTime::now();
        let mut store = TrackStore::new();

        let a = store.spawn(bbox(0.0), now);
        let b = store.spawn(bbox(50.0), now);
        store.remove(a);
        let c = store.spawn(bbox(100.0), now);

        assert_eq!((a, b, c), (TrackId(1), TrackId(2), TrackId(3)));
        assert_eq!(store.issued(), 3);
        assert!(!store.contains(a));
    }

    #[test]
    fn test_iteration_is_id_ordered() {
        let now = FrameTime::now();
        let mut store = TrackStore::new();
        for x in [300.0, 100.0, 200.0] {
            store.spawn(bbox(x), now);
        }
        let ids: Vec<u64> = store.iter().map(|t| t.id.0).collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }
}
