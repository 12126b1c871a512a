//! The single mutable view aggregate.
//!
//! Constructed once at startup from the initial catalog and favorites,
//! then mutated exclusively by the dispatcher. Everything the renderer
//! draws comes from here.

use crate::config::{IDLE_TIMEOUT_SECS, PAGE_SIZE};
use crate::event::Weather;
use crate::power_logic::display_awake;
use crate::remote::entity::{EntityState, Item};
use crate::storage::Favorites;
use crate::ui::input_logic::page_of;

pub struct ViewState {
    /// Seconds since the last physical input.
    pub idle_secs: u32,
    /// Index of the selected catalog item.
    pub idx: usize,
    /// Favorite slots, as entity ids.
    pub favs: Favorites,
    /// Ordered catalog; insertion order is display order.
    pub catalog: Vec<Item>,
    /// Bottom bar overlay; `None` shows the weather strip.
    pub notification: Option<String>,
    /// True while the active control is held past the threshold.
    pub hold: bool,
    /// Latest weather payload.
    pub weather: Weather,
}

impl ViewState {
    pub fn new(catalog: Vec<Item>, favs: Favorites) -> Self {
        Self {
            idle_secs: 0,
            idx: 0,
            favs,
            catalog,
            notification: None,
            hold: false,
            weather: Weather::default(),
        }
    }

    /// Whether the display is currently sleeping.
    pub fn asleep(&self) -> bool {
        !display_awake(self.idle_secs, IDLE_TIMEOUT_SECS)
    }

    /// The selected item, unless the catalog is empty.
    pub fn selected(&self) -> Option<&Item> {
        self.catalog.get(self.idx)
    }

    /// The catalog slice on the selected item's page.
    pub fn visible(&self) -> &[Item] {
        let start = page_of(self.idx) * PAGE_SIZE;
        let end = (start + PAGE_SIZE).min(self.catalog.len());
        if start >= end {
            &[]
        } else {
            &self.catalog[start..end]
        }
    }

    /// Look an item up by identifier.
    pub fn find(&self, id: &str) -> Option<&Item> {
        self.catalog.iter().find(|item| item.id() == id)
    }

    /// Replace one entity's state in place. Returns false when the id is
    /// no longer in the catalog (a refresh raced a reload).
    pub fn apply_state(&mut self, state: EntityState) -> bool {
        for item in &mut self.catalog {
            if let Item::Entity(e) = item {
                if e.entity_id == state.entity_id {
                    *e = state;
                    return true;
                }
            }
        }
        false
    }

    /// Install a reloaded catalog.
    ///
    /// Selection follows the previously selected item's identifier when it
    /// survived the reload; otherwise it clamps to the new bounds.
    pub fn replace_catalog(&mut self, items: Vec<Item>) {
        let selected_id = self.selected().map(|item| item.id().to_owned());
        self.catalog = items;

        if let Some(id) = selected_id {
            if let Some(pos) = self.catalog.iter().position(|item| item.id() == id) {
                self.idx = pos;
                return;
            }
        }
        self.idx = self.idx.min(self.catalog.len().saturating_sub(1));
    }

    /// Entity ids the refresher should watch: the visible page plus any
    /// favorites that resolve in the catalog, deduplicated.
    pub fn refresh_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.visible().iter().map(|i| i.id().to_owned()).collect();
        for fav in self.favs.iter().flatten() {
            if self.find(fav).is_some() && !ids.iter().any(|id| id == fav) {
                ids.push(fav.clone());
            }
        }
        ids
    }
}
