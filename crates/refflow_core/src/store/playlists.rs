//! Playlist manager.

use super::errors::{StoreError, StoreResult};
use crate::models::{EventId, Playlist, PlaylistId};

/// Ordered collection of playlists with at most one active.
#[derive(Debug, Clone, Default)]
pub struct PlaylistManager {
    playlists: Vec<Playlist>,
}

impl PlaylistManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn playlists(&self) -> &[Playlist] {
        &self.playlists
    }

    pub fn get(&self, id: PlaylistId) -> Option<&Playlist> {
        self.playlists.iter().find(|p| p.id == id)
    }

    fn get_mut(&mut self, id: PlaylistId) -> StoreResult<&mut Playlist> {
        self.playlists
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or(StoreError::PlaylistNotFound(id))
    }

    /// The active playlist, if any.
    pub fn active(&self) -> Option<&Playlist> {
        self.playlists.iter().find(|p| p.is_active)
    }

    /// Append a new, inactive, empty playlist.
    pub(crate) fn create(&mut self, id: PlaylistId, name: &str) -> StoreResult<&Playlist> {
        let name = name.trim();
        if name.is_empty() {
            return Err(StoreError::invalid_input("Playlist name cannot be empty"));
        }

        self.playlists.push(Playlist::new(id, name));
        Ok(&self.playlists[self.playlists.len() - 1])
    }

    pub(crate) fn insert(&mut self, playlist: Playlist) {
        self.playlists.push(playlist);
    }

    /// Make `id` the only active playlist.
    pub(crate) fn set_active(&mut self, id: PlaylistId) -> StoreResult<()> {
        if self.get(id).is_none() {
            return Err(StoreError::PlaylistNotFound(id));
        }
        for playlist in &mut self.playlists {
            playlist.is_active = playlist.id == id;
        }
        Ok(())
    }

    /// Append `event_id`. Does not deduplicate; callers check first.
    pub(crate) fn add_event(&mut self, id: PlaylistId, event_id: EventId) -> StoreResult<()> {
        self.get_mut(id)?.event_ids.push(event_id);
        Ok(())
    }

    /// Remove the first occurrence of `event_id`. Returns whether it was present.
    pub(crate) fn remove_event(&mut self, id: PlaylistId, event_id: EventId) -> StoreResult<bool> {
        let playlist = self.get_mut(id)?;
        match playlist.event_ids.iter().position(|e| *e == event_id) {
            Some(index) => {
                playlist.event_ids.remove(index);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Move the entry at `from` so it ends up at `to`.
    pub(crate) fn reorder(&mut self, id: PlaylistId, from: usize, to: usize) -> StoreResult<()> {
        let playlist = self.get_mut(id)?;
        let len = playlist.event_ids.len();
        if from >= len {
            return Err(StoreError::index_out_of_range(from, len));
        }
        if to >= len {
            return Err(StoreError::index_out_of_range(to, len));
        }

        let moved = playlist.event_ids.remove(from);
        playlist.event_ids.insert(to, moved);
        Ok(())
    }

    /// Remove a playlist. Referenced events are untouched.
    pub(crate) fn delete(&mut self, id: PlaylistId) -> StoreResult<Playlist> {
        let index = self
            .playlists
            .iter()
            .position(|p| p.id == id)
            .ok_or(StoreError::PlaylistNotFound(id))?;
        Ok(self.playlists.remove(index))
    }

    /// Drop every reference to `event_id` from every playlist.
    pub(crate) fn purge_event(&mut self, event_id: EventId) -> usize {
        let mut removed = 0;
        for playlist in &mut self.playlists {
            let before = playlist.event_ids.len();
            playlist.event_ids.retain(|e| *e != event_id);
            removed += before - playlist.event_ids.len();
        }
        removed
    }
}
