//! Fixed, ordered playlists.
//!
//! A [`Playlist`] is immutable for the lifetime of a controller: entries are
//! neither added nor removed while playback runs. Navigation wraps at both
//! ends, so every entry is always reachable.

use crate::error::{Result, TransportError};
use serde::{Deserialize, Serialize};

/// One track in a playlist.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaylistEntry {
    /// Name shown to the user.
    pub display_name: String,
    /// URI of the audio content (local path or http(s) URL).
    pub media_uri: String,
    /// URI of the artwork shown while this entry is bound.
    pub artwork_uri: String,
}

impl PlaylistEntry {
    /// Construct an entry from its three display/source fields.
    pub fn new(
        display_name: impl Into<String>,
        media_uri: impl Into<String>,
        artwork_uri: impl Into<String>,
    ) -> Self {
        Self {
            display_name: display_name.into(),
            media_uri: media_uri.into(),
            artwork_uri: artwork_uri.into(),
        }
    }
}

/// Non-empty, ordered collection of playlist entries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Playlist {
    entries: Vec<PlaylistEntry>,
}

impl Playlist {
    /// Build a playlist from a list of entries.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError::EmptyPlaylist`] when `entries` is empty.
    pub fn new(entries: Vec<PlaylistEntry>) -> Result<Self> {
        if entries.is_empty() {
            return Err(TransportError::EmptyPlaylist);
        }
        Ok(Self { entries })
    }

    /// Number of entries. Always at least one.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// A playlist is never empty; provided for API symmetry.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Entry at `index`, or `None` when out of range.
    pub fn get(&self, index: usize) -> Option<&PlaylistEntry> {
        self.entries.get(index)
    }

    /// Iterate over all entries in order.
    pub fn iter(&self) -> impl Iterator<Item = &PlaylistEntry> {
        self.entries.iter()
    }

    /// The index one step away from `index`, wrapping at both ends.
    pub fn step(&self, index: usize, forward: bool) -> usize {
        let len = self.entries.len();
        if forward {
            (index + 1) % len
        } else {
            (index + len - 1) % len
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn playlist(n: usize) -> Playlist {
        let entries = (0..n)
            .map(|i| {
                PlaylistEntry::new(
                    format!("Track {}", i),
                    format!("https://example.com/{}.mp3", i),
                    format!("https://example.com/{}.jpg", i),
                )
            })
            .collect();
        Playlist::new(entries).unwrap()
    }

    #[test]
    fn rejects_empty_playlist() {
        assert!(matches!(
            Playlist::new(Vec::new()),
            Err(TransportError::EmptyPlaylist)
        ));
    }

    #[test]
    fn step_wraps_forward_and_backward() {
        let list = playlist(3);
        assert_eq!(list.step(0, true), 1);
        assert_eq!(list.step(2, true), 0);
        assert_eq!(list.step(0, false), 2);
        assert_eq!(list.step(1, false), 0);
    }

    #[test]
    fn step_cycles_through_every_entry() {
        let list = playlist(4);
        let mut index = 0;
        let mut seen = vec![index];
        for _ in 0..list.len() - 1 {
            index = list.step(index, true);
            seen.push(index);
        }
        seen.sort_unstable();
        assert_eq!(seen, vec![0, 1, 2, 3]);
        assert_eq!(list.step(index, true), 0);
    }

    #[test]
    fn step_backward_inverts_forward() {
        let list = playlist(5);
        for i in 0..list.len() {
            let forward = list.step(i, true);
            assert_eq!(list.step(forward, false), i);
        }
    }

    #[test]
    fn single_entry_steps_to_itself() {
        let list = playlist(1);
        assert_eq!(list.step(0, true), 0);
        assert_eq!(list.step(0, false), 0);
    }
}
