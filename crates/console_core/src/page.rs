//! A mounted page: its store slice plus the route listener that resets it.

use crate::{
    navigation::{NavigationHub, RouteEvent, RouteSubscription},
    store::{Extras, FormState},
};

#[derive(Debug)]
pub struct Page<X: Extras> {
    pub store: FormState<X>,
    subscription: RouteSubscription,
}

impl<X: Extras> Page<X> {
    /// Mounts with a fresh store and subscribes to route changes.
    pub fn mount(hub: &NavigationHub) -> Self {
        Self {
            store: FormState::new(),
            subscription: hub.subscribe(),
        }
    }

    /// Applies queued route events; a completed change resets the store.
    /// Returns whether a reset happened.
    pub fn sync_navigation(&mut self) -> bool {
        let completed = self
            .subscription
            .drain()
            .into_iter()
            .any(|event| matches!(event, RouteEvent::ChangeComplete(_)));
        if completed {
            self.store.set_initial_state();
        }
        completed
    }

    /// Unsubscribes and hands back the final store.
    pub fn unmount(self) -> FormState<X> {
        self.store
    }
}
