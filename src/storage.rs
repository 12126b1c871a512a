//! Persistent storage for favorite slots.
//!
//! The durable shape is one JSON array of three nullable entity ids,
//! read once at startup and rewritten in full on every favorite-hold.
//! A write failure degrades the device to in-memory favorites instead
//! of stopping it; the next hold retries.

use std::fs;
use std::path::PathBuf;

use crate::config::FAV_SLOTS;
use crate::error::Error;

/// Favorite slots as stored and as held in view state.
pub type Favorites = [Option<String>; FAV_SLOTS];

/// Durable favorites capability.
pub trait FavStore {
    /// Read the slots saved by a previous run. A store that has never
    /// been written reads as all-empty.
    fn load(&self) -> Result<Favorites, Error>;

    /// Persist the full favorites array.
    fn save(&mut self, favs: &Favorites) -> Result<(), Error>;
}

/// File-backed store.
pub struct JsonFavStore {
    path: PathBuf,
}

impl JsonFavStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl FavStore for JsonFavStore {
    fn load(&self) -> Result<Favorites, Error> {
        if !self.path.exists() {
            return Ok(Favorites::default());
        }
        let data = fs::read(&self.path)?;
        Ok(serde_json::from_slice(&data)?)
    }

    fn save(&mut self, favs: &Favorites) -> Result<(), Error> {
        let data = serde_json::to_vec_pretty(favs)?;
        fs::write(&self.path, data)?;
        Ok(())
    }
}
