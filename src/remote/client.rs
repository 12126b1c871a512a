//! REST client for the Home Assistant state service.
//!
//! Thin wrapper over `reqwest` carrying the base URL and the long-lived
//! bearer token. Every method maps one endpoint; callers decide whether a
//! failure is fatal (startup) or becomes a `RemoteError` event (pollers).

use serde_json::{json, Value};

use crate::config::WEATHER_ENTITY_ID;
use crate::error::Error;
use crate::event::{DayForecast, Weather};
use crate::remote::entity::{build_catalog, scripts_without_fields, EntityState, Item, ItemKind};

/// Shared HTTP client for the state service. Cheap to clone.
#[derive(Clone)]
pub struct HaClient {
    http: reqwest::Client,
    base: String,
    token: String,
}

impl HaClient {
    /// `base` is the API root, e.g. `http://192.168.1.4:8123/api/`.
    pub fn new(base: impl Into<String>, token: impl Into<String>) -> Self {
        let mut base = base.into();
        if !base.ends_with('/') {
            base.push('/');
        }
        Self {
            http: reqwest::Client::new(),
            base,
            token: token.into(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base, path)
    }

    /// `GET /states` - the full entity list.
    pub async fn states(&self) -> Result<Vec<EntityState>, Error> {
        let states = self
            .http
            .get(self.url("states"))
            .bearer_auth(&self.token)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(states)
    }

    /// `GET /states/{id}` - refresh a single entity.
    pub async fn state(&self, id: &str) -> Result<EntityState, Error> {
        let state = self
            .http
            .get(self.url(&format!("states/{id}")))
            .bearer_auth(&self.token)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(state)
    }

    /// `GET /services` - service discovery document.
    pub async fn services(&self) -> Result<Value, Error> {
        let doc = self
            .http
            .get(self.url("services"))
            .bearer_auth(&self.token)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(doc)
    }

    /// `POST /services/{domain}/{service}` with a JSON body.
    pub async fn call_service(&self, domain: &str, service: &str, body: Value) -> Result<(), Error> {
        self.http
            .post(self.url(&format!("services/{domain}/{service}")))
            .bearer_auth(&self.token)
            .json(&body)
            .send()
            .await?
            .error_for_status()?;
        Ok(())
    }

    /// Fetch and decode the weather entity.
    pub async fn weather(&self) -> Result<Weather, Error> {
        let doc: Value = self
            .http
            .get(self.url(&format!("states/{WEATHER_ENTITY_ID}")))
            .bearer_auth(&self.token)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        decode_weather(&doc)
    }

    /// Full catalog load: service discovery + state list.
    pub async fn load_catalog(&self) -> Result<Vec<Item>, Error> {
        let bare_scripts = scripts_without_fields(&self.services().await?);
        let states = self.states().await?;
        Ok(build_catalog(states, &bare_scripts))
    }

    /// Toggle or invoke one item.
    ///
    /// A group that is currently "on" is turned off outright; toggling it
    /// would switch the remaining members on instead. Entity toggles return
    /// the freshly fetched state so the view can update without waiting for
    /// the next refresh pass; bare actions have no state to report.
    pub async fn toggle(&self, item: &Item) -> Result<Option<EntityState>, Error> {
        match item {
            Item::Entity(e) => {
                let service = if item.kind() == ItemKind::Group && e.state == "on" {
                    "turn_off"
                } else {
                    "toggle"
                };
                self.call_service(
                    "homeassistant",
                    service,
                    json!({ "entity_id": e.entity_id }),
                )
                .await?;
                Ok(Some(self.state(&e.entity_id).await?))
            }
            Item::Action { id } => {
                let service = id.strip_prefix("script.").unwrap_or(id);
                self.call_service("script", service, json!({})).await?;
                Ok(None)
            }
        }
    }
}

/// Decode the weather entity payload into the rendered shape.
///
/// Current temperature comes from the attributes; today and tomorrow come
/// from the first two forecast entries.
pub fn decode_weather(doc: &Value) -> Result<Weather, Error> {
    let attr = doc
        .get("attributes")
        .ok_or(Error::Payload("weather entity has no attributes"))?;
    let now = attr
        .get("temperature")
        .and_then(Value::as_f64)
        .ok_or(Error::Payload("weather attributes lack a temperature"))?;

    let day = |idx: usize| -> Result<DayForecast, Error> {
        let entry = attr
            .get("forecast")
            .and_then(Value::as_array)
            .and_then(|days| days.get(idx))
            .ok_or(Error::Payload("forecast has fewer than two days"))?;
        Ok(DayForecast {
            low: entry
                .get("templow")
                .and_then(Value::as_f64)
                .ok_or(Error::Payload("forecast entry lacks templow"))?,
            high: entry
                .get("temperature")
                .and_then(Value::as_f64)
                .ok_or(Error::Payload("forecast entry lacks temperature"))?,
            condition: entry
                .get("condition")
                .and_then(Value::as_str)
                .ok_or(Error::Payload("forecast entry lacks condition"))?
                .to_owned(),
        })
    };

    Ok(Weather {
        now,
        today: day(0)?,
        tomorrow: day(1)?,
    })
}
