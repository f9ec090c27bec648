use std::collections::HashMap;

use crate::types::{Track, TrackPosition};

/// In-process index of `song_id -> position within its album`.
///
/// Filled lazily one album at a time: the first lookup of a song fetches its
/// album's full track list and records every song on it.
#[derive(Debug, Default)]
pub struct TrackPositionManager {
    positions: HashMap<String, TrackPosition>,
}

impl TrackPositionManager {
    /// Empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the 1-based position of every track of an album.
    pub fn add_album(&mut self, tracks: &[Track]) -> &mut Self {
        let count = tracks.len() as u32;
        for (index, track) in tracks.iter().enumerate() {
            self.positions.insert(
                track.song_id.clone(),
                TrackPosition {
                    track: index as u32 + 1,
                    count,
                },
            );
        }
        self
    }

    /// Cached position of a song, if its album was fetched already.
    pub fn get(&self, song_id: &str) -> Option<TrackPosition> {
        self.positions.get(song_id).copied()
    }

    /// Whether the song's album has been recorded.
    pub fn has(&self, song_id: &str) -> bool {
        self.positions.contains_key(song_id)
    }

    /// Number of songs with a known position.
    pub fn count(&self) -> usize {
        self.positions.len()
    }

    /// Position of `track`, fetching its album through `fetch_album` on a miss.
    ///
    /// Songs missing from their album's track list resolve to `0/0`.
    pub fn resolve<F>(&mut self, track: &Track, fetch_album: F) -> TrackPosition
    where
        F: FnOnce(&str) -> Vec<Track>,
    {
        if !self.has(&track.song_id) {
            let album = fetch_album(&track.album_id);
            self.add_album(&album);
        }

        self.get(&track.song_id).unwrap_or_default()
    }
}
