//! Client-side routes and the route-change notifications pages subscribe to.

use std::fmt;

use shared::domain::{RoomId, SpeakerId, TalkId};
use tokio::sync::{broadcast, watch};
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Dashboard,
    Login,
    Register,
    CreateUser,
    Speakers,
    NewSpeaker,
    EditSpeaker(SpeakerId),
    Talks,
    NewTalk,
    EditTalk(TalkId),
    Rooms,
    NewRoom,
    EditRoom(RoomId),
}

impl Route {
    pub fn path(&self) -> String {
        match self {
            Self::Dashboard => "/".to_string(),
            Self::Login => "/login".to_string(),
            Self::Register => "/register".to_string(),
            Self::CreateUser => "/create-user".to_string(),
            Self::Speakers => "/speakers".to_string(),
            Self::NewSpeaker => "/speakers/new".to_string(),
            Self::EditSpeaker(id) => format!("/speakers/{id}/edit"),
            Self::Talks => "/talks".to_string(),
            Self::NewTalk => "/talks/new".to_string(),
            Self::EditTalk(id) => format!("/talks/{id}/edit"),
            Self::Rooms => "/rooms".to_string(),
            Self::NewRoom => "/rooms/new".to_string(),
            Self::EditRoom(id) => format!("/rooms/{id}/edit"),
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteEvent {
    ChangeStart(Route),
    ChangeComplete(Route),
}

pub trait Navigator: Send + Sync {
    fn push(&self, route: Route);
}

/// Broadcasts route changes and remembers the current route.
#[derive(Debug)]
pub struct NavigationHub {
    events: broadcast::Sender<RouteEvent>,
    current: watch::Sender<Option<Route>>,
}

impl NavigationHub {
    pub fn new() -> Self {
        let (events, _) = broadcast::channel(16);
        let (current, _) = watch::channel(None);
        Self { events, current }
    }

    pub fn subscribe(&self) -> RouteSubscription {
        RouteSubscription {
            events: self.events.subscribe(),
        }
    }

    pub fn current(&self) -> Option<Route> {
        self.current.borrow().clone()
    }

    /// Number of live subscriptions.
    pub fn receiver_count(&self) -> usize {
        self.events.receiver_count()
    }
}

impl Default for NavigationHub {
    fn default() -> Self {
        Self::new()
    }
}

impl Navigator for NavigationHub {
    fn push(&self, route: Route) {
        debug!(route = %route, "route change");
        // No subscribers is not an error.
        let _ = self.events.send(RouteEvent::ChangeStart(route.clone()));
        self.current.send_replace(Some(route.clone()));
        let _ = self.events.send(RouteEvent::ChangeComplete(route));
    }
}

/// Route-change listener; dropping it unsubscribes.
#[derive(Debug)]
pub struct RouteSubscription {
    events: broadcast::Receiver<RouteEvent>,
}

impl RouteSubscription {
    /// Drains pending events without waiting.
    pub fn drain(&mut self) -> Vec<RouteEvent> {
        let mut events = Vec::new();
        loop {
            match self.events.try_recv() {
                Ok(event) => events.push(event),
                Err(broadcast::error::TryRecvError::Lagged(skipped)) => {
                    debug!(skipped, "route subscription lagged");
                }
                Err(_) => break,
            }
        }
        events
    }
}
