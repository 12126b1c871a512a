//! Integration tests for hatctl's host-testable lifecycle paths:
//! favorites persistence across a restart, the notification self-clear
//! timer, and the input pipeline from pad samples to view mutation.

use std::time::Duration;

use hatctl::dispatch::Dispatcher;
use hatctl::event::{event_queue, Event, StickDir};
use hatctl::remote::entity::Item;
use hatctl::remote::Remote;
use hatctl::storage::{FavStore, Favorites, JsonFavStore};
use hatctl::ui::buttons::{Control, PadScanner, PadState, TieBreak};
use hatctl::view::ViewState;

/// Remote that swallows toggles; these tests never reach the network.
struct NullRemote;

impl Remote for NullRemote {
    fn toggle(&self, _item: &Item) {}
}

/// Store that accepts writes and forgets them.
struct NullStore;

impl FavStore for NullStore {
    fn load(&self) -> Result<Favorites, hatctl::Error> {
        Ok(Favorites::default())
    }

    fn save(&mut self, _favs: &Favorites) -> Result<(), hatctl::Error> {
        Ok(())
    }
}

fn catalog(n: usize) -> Vec<Item> {
    (0..n)
        .map(|i| Item::Action {
            id: format!("script.item_{i}"),
        })
        .collect()
}

#[test]
fn favorites_survive_a_restart() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("favs.json");

    let store = JsonFavStore::new(&path);
    // A store that has never been written reads as empty.
    assert_eq!(store.load().unwrap(), Favorites::default());

    let (tx, _rx) = event_queue();
    let mut dispatcher = Dispatcher::new(
        ViewState::new(catalog(4), Favorites::default()),
        NullRemote,
        store,
        tx,
    );
    dispatcher.view.idx = 2;
    let follow_up = dispatcher.dispatch(Event::KeyAction {
        slot: 1,
        duration: Duration::from_millis(600),
    });
    assert!(matches!(follow_up, Some(Event::SetNotification(Some(_)))));

    // Restart: a fresh store against the same path sees the binding.
    let reloaded = JsonFavStore::new(&path).load().unwrap();
    assert_eq!(reloaded[1].as_deref(), Some("script.item_2"));
    assert_eq!(reloaded[0], None);
    assert_eq!(reloaded[2], None);
}

#[tokio::test(start_paused = true)]
async fn notification_self_clears_exactly_once() {
    let (tx, mut rx) = event_queue();
    let mut dispatcher = Dispatcher::new(
        ViewState::new(catalog(1), Favorites::default()),
        NullRemote,
        NullStore,
        tx,
    );

    dispatcher.dispatch(Event::SetNotification(Some("saved".to_owned())));
    assert_eq!(dispatcher.view.notification.as_deref(), Some("saved"));

    // The paused clock auto-advances to the 2 s clear timer.
    let clear = rx.recv().await.unwrap();
    assert_eq!(clear, Event::SetNotification(None));
    dispatcher.dispatch(clear);
    assert!(dispatcher.view.notification.is_none());

    // No second clear is in flight.
    let followup = tokio::time::timeout(Duration::from_secs(30), rx.recv()).await;
    assert!(followup.is_err());
}

#[tokio::test(start_paused = true)]
async fn superseding_a_notification_yields_a_single_clear() {
    let (tx, mut rx) = event_queue();
    let mut dispatcher = Dispatcher::new(
        ViewState::new(catalog(1), Favorites::default()),
        NullRemote,
        NullStore,
        tx,
    );

    dispatcher.dispatch(Event::SetNotification(Some("first".to_owned())));
    dispatcher.dispatch(Event::SetNotification(Some("second".to_owned())));
    assert_eq!(dispatcher.view.notification.as_deref(), Some("second"));

    let clear = rx.recv().await.unwrap();
    assert_eq!(clear, Event::SetNotification(None));

    // The superseded timer was aborted, so nothing else arrives.
    let followup = tokio::time::timeout(Duration::from_secs(30), rx.recv()).await;
    assert!(followup.is_err());
}

#[test]
fn joystick_taps_travel_the_full_pipeline() {
    let (tx, _rx) = event_queue();
    let mut dispatcher = Dispatcher::new(
        ViewState::new(catalog(7), Favorites::default()),
        NullRemote,
        NullStore,
        tx,
    );
    dispatcher.view.idle_secs = 42;

    // One short Down tap, as the sampler would see it.
    let mut scanner = PadScanner::new(TieBreak::PreferLast);
    let mut events = Vec::new();
    events.extend(scanner.step(PadState::IDLE.with(Control::Down, true)));
    for _ in 0..2 {
        events.extend(scanner.step(PadState::IDLE.with(Control::Down, true)));
    }
    events.extend(scanner.step(PadState::IDLE));

    for event in events {
        if let Some(follow_up) = dispatcher.dispatch(event) {
            dispatcher.dispatch(follow_up);
        }
    }

    assert_eq!(dispatcher.view.idx, 1);
    assert_eq!(dispatcher.view.idle_secs, 0);
}

#[test]
fn sleeping_device_ignores_navigation_until_woken() {
    let (tx, _rx) = event_queue();
    let mut dispatcher = Dispatcher::new(
        ViewState::new(catalog(5), Favorites::default()),
        NullRemote,
        NullStore,
        tx,
    );

    for _ in 0..301 {
        dispatcher.dispatch(Event::TimerTick);
    }
    assert!(dispatcher.view.asleep());

    // The tap's edge event is ignored, but its reset wakes the device.
    dispatcher.dispatch(Event::StickAction {
        dir: StickDir::Down,
        duration: Duration::from_millis(60),
    });
    assert_eq!(dispatcher.view.idx, 0);
    dispatcher.dispatch(Event::TimeoutReset);
    assert!(!dispatcher.view.asleep());

    dispatcher.dispatch(Event::StickAction {
        dir: StickDir::Down,
        duration: Duration::from_millis(60),
    });
    assert_eq!(dispatcher.view.idx, 1);
}
