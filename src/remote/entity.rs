//! Entity model and catalog construction.
//!
//! The catalog mixes two item shapes behind one interface:
//!
//! - **Entity** - a full `GET /states` object with live state (lights,
//!   switches, groups, and scripts that have a state entry).
//! - **Action** - a parameterless script discovered in `GET /services`
//!   that has no state entry; it can only be invoked, not observed.
//!
//! Which shape an item gets is decided once, at catalog build time.

use std::collections::BTreeSet;

use serde::Deserialize;
use serde_json::Value;

/// Broad entity categories the UI knows how to draw and toggle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ItemKind {
    Script,
    Light,
    Switch,
    Group,
    Other,
}

impl ItemKind {
    /// Classify by the entity id's domain prefix.
    pub fn from_domain(domain: &str) -> Self {
        match domain {
            "script" => ItemKind::Script,
            "light" => ItemKind::Light,
            "switch" => ItemKind::Switch,
            "group" => ItemKind::Group,
            _ => ItemKind::Other,
        }
    }
}

/// One object from `GET /states`, kept with its raw attribute map so a
/// refresh can be compared structurally against the cached value.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct EntityState {
    pub entity_id: String,
    pub state: String,
    #[serde(default)]
    pub attributes: serde_json::Map<String, Value>,
}

impl EntityState {
    /// Domain prefix of the entity id (`light.bedroom` -> `light`).
    pub fn domain(&self) -> &str {
        self.entity_id.split('.').next().unwrap_or("")
    }

    /// Human-readable name: the `friendly_name` attribute with underscores
    /// rendered as spaces, or empty when absent.
    pub fn friendly_name(&self) -> String {
        self.attributes
            .get("friendly_name")
            .and_then(Value::as_str)
            .map(|s| s.replace('_', " "))
            .unwrap_or_default()
    }
}

/// A selectable catalog item.
#[derive(Clone, Debug, PartialEq)]
pub enum Item {
    /// Rich shape: a state object refreshed from the service.
    Entity(EntityState),
    /// Bare shape: an invokable script with no state entry. The id uses
    /// entity-id form (`script.<service>`) so favorites work uniformly.
    Action { id: String },
}

impl Item {
    /// Stable identifier, usable as a favorite reference.
    pub fn id(&self) -> &str {
        match self {
            Item::Entity(e) => &e.entity_id,
            Item::Action { id } => id,
        }
    }

    /// Display label for list rows.
    pub fn label(&self) -> String {
        match self {
            Item::Entity(e) => e.friendly_name(),
            Item::Action { id } => id
                .strip_prefix("script.")
                .unwrap_or(id)
                .replace('_', " "),
        }
    }

    pub fn kind(&self) -> ItemKind {
        match self {
            Item::Entity(e) => ItemKind::from_domain(e.domain()),
            Item::Action { .. } => ItemKind::Script,
        }
    }

    /// Live state, when the item has one.
    pub fn state(&self) -> Option<&str> {
        match self {
            Item::Entity(e) => Some(&e.state),
            Item::Action { .. } => None,
        }
    }
}

/// Extract the names of scripts that take no parameters from a
/// `GET /services` document.
///
/// Scripts with input fields cannot be fired from a one-button UI, so
/// they never enter the catalog.
pub fn scripts_without_fields(services: &Value) -> BTreeSet<String> {
    let mut names = BTreeSet::new();
    let Some(domains) = services.as_array() else {
        return names;
    };
    for domain in domains {
        if domain.get("domain").and_then(Value::as_str) != Some("script") {
            continue;
        }
        let Some(services) = domain.get("services").and_then(Value::as_object) else {
            continue;
        };
        for (name, svc) in services {
            let has_fields = svc
                .get("fields")
                .and_then(Value::as_object)
                .is_some_and(|fields| !fields.is_empty());
            if !has_fields {
                names.insert(name.clone());
            }
        }
    }
    names
}

/// Build the display catalog from a full state list.
///
/// Keeps the `/states` response order (insertion order = display order):
/// parameterless scripts and all light/switch/group entities. Scripts known
/// from `/services` but absent from `/states` are appended at the end as
/// bare Action items.
pub fn build_catalog(states: Vec<EntityState>, bare_scripts: &BTreeSet<String>) -> Vec<Item> {
    let mut seen_scripts = BTreeSet::new();
    let mut items = Vec::new();

    for state in states {
        if let Some(script) = state.entity_id.strip_prefix("script.") {
            if bare_scripts.contains(script) {
                seen_scripts.insert(script.to_owned());
                items.push(Item::Entity(state));
            }
            continue;
        }
        if matches!(state.domain(), "light" | "switch" | "group") {
            items.push(Item::Entity(state));
        }
    }

    for script in bare_scripts {
        if !seen_scripts.contains(script) {
            items.push(Item::Action {
                id: format!("script.{script}"),
            });
        }
    }

    items
}
