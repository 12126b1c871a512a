//! hatctl binary - desktop (SDL) shell for the OLED HAT controller.
//!
//! Wires the library to the simulator backend: the window is the display
//! panel, the keyboard is the button pad (arrows + Enter for the joystick,
//! 1/2/3 for the shortcut keys). A hardware build replaces `sim::window`
//! with adapters implementing the same `Surface` and `ButtonPad` traits.

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tokio::sync::watch;
use tracing::warn;
use tracing_subscriber::EnvFilter;

use hatctl::dispatch::{self, Dispatcher};
use hatctl::event::event_queue;
use hatctl::remote::client::HaClient;
use hatctl::remote::poll::{catalog_task, state_refresh_task, tick_task, weather_task, RefreshPlan};
use hatctl::remote::HaRemote;
use hatctl::sim;
use hatctl::storage::{FavStore, Favorites, JsonFavStore};
use hatctl::ui::buttons::{poll_task, TieBreak};
use hatctl::ui::display::render;
use hatctl::view::ViewState;

/// OLED HAT Home Assistant control.
#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// State service API root, e.g. http://192.168.1.4:8123/api/
    api: String,
    /// Long-lived access token (obtainable on the profile page).
    token: String,
    /// Favorites file.
    #[arg(long, default_value = "favs.json")]
    favorites: PathBuf,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();
    let cli = Cli::parse();

    // Current-thread runtime: the SDL window is not Send, so rendering and
    // input polling stay on this thread via a LocalSet.
    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    let local = tokio::task::LocalSet::new();
    local.block_on(&rt, run(cli))
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let client = HaClient::new(cli.api.as_str(), cli.token.as_str());
    let catalog = client
        .load_catalog()
        .await
        .context("initial catalog load failed")?;

    let store = JsonFavStore::new(&cli.favorites);
    let favs = store.load().unwrap_or_else(|e| {
        warn!(error = %e, "favorites not readable, starting empty");
        Favorites::default()
    });

    let (tx, rx) = event_queue();
    let (plan_tx, plan_rx) = watch::channel(RefreshPlan::default());
    let remote = HaRemote::new(client.clone(), tx.clone());
    let dispatcher = Dispatcher::new(ViewState::new(catalog, favs), remote, store, tx.clone());

    let (mut surface, pad) = sim::window();

    // First frame before any event arrives, so the display is not blank
    // for the first tick; seed the refresher's plan the same way.
    render(&dispatcher.view, &mut surface);
    dispatch::publish_plan(&dispatcher.view, &plan_tx);

    tokio::task::spawn_local(poll_task(pad, TieBreak::PreferLast, tx.clone()));
    tokio::spawn(tick_task(tx.clone()));
    tokio::spawn(weather_task(client.clone(), tx.clone()));
    tokio::spawn(state_refresh_task(client.clone(), plan_rx, tx.clone()));
    tokio::spawn(catalog_task(client, tx.clone()));

    dispatch::run(dispatcher, rx, tx, surface, plan_tx).await;
    Ok(())
}
