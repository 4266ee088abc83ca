use std::sync::Arc;

use parking_lot::Mutex;
use tracing::{debug, warn};

use super::signal::{Signal, Subscription};
use crate::storage::{SlotStore, StoreError, get_json, set_json};

pub const LEFT_SIDEBAR_SLOT: &str = "leftSidebarOpen";
pub const RIGHT_SIDEBAR_SLOT: &str = "rightSidebarOpen";

/// Terminal width in columns below which both sidebars are hidden.
pub const SIDEBAR_BREAKPOINT: u16 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Left,
    Right,
}

impl Side {
    fn slot(self) -> &'static str {
        match self {
            Side::Left => LEFT_SIDEBAR_SLOT,
            Side::Right => RIGHT_SIDEBAR_SLOT,
        }
    }
}

struct SidebarState {
    left: bool,
    right: bool,
    auto_closed: bool,
}

impl SidebarState {
    fn get(&self, side: Side) -> bool {
        match side {
            Side::Left => self.left,
            Side::Right => self.right,
        }
    }

    fn get_mut(&mut self, side: Side) -> &mut bool {
        match side {
            Side::Left => &mut self.left,
            Side::Right => &mut self.right,
        }
    }

    /// Force both closed below the breakpoint; restore the stored
    /// preferences when the width comes back.
    fn apply_width(&mut self, width: u16, store: &dyn SlotStore) {
        if width < SIDEBAR_BREAKPOINT {
            self.left = false;
            self.right = false;
            self.auto_closed = true;
        } else if self.auto_closed {
            self.left = stored(store, Side::Left);
            self.right = stored(store, Side::Right);
            self.auto_closed = false;
        }
    }
}

fn stored(store: &dyn SlotStore, side: Side) -> bool {
    get_json(store, side.slot()).unwrap_or(true)
}

pub struct SidebarStore {
    state: Arc<Mutex<SidebarState>>,
    store: Arc<dyn SlotStore>,
    _subscription: Subscription,
}

impl SidebarStore {
    pub fn new(store: Arc<dyn SlotStore>, viewport_width: &Signal<u16>) -> Self {
        let mut initial = SidebarState {
            left: stored(store.as_ref(), Side::Left),
            right: stored(store.as_ref(), Side::Right),
            auto_closed: false,
        };
        initial.apply_width(viewport_width.get(), store.as_ref());

        let state = Arc::new(Mutex::new(initial));
        let watched = Arc::clone(&state);
        let slots = Arc::clone(&store);
        let subscription = viewport_width.subscribe(move |width| {
            debug!(width, "viewport resized");
            watched.lock().apply_width(*width, slots.as_ref());
        });

        Self {
            state,
            store,
            _subscription: subscription,
        }
    }

    pub fn is_open(&self, side: Side) -> bool {
        self.state.lock().get(side)
    }

    /// Whether the sidebars are currently hidden by the width breakpoint.
    pub fn is_auto_closed(&self) -> bool {
        self.state.lock().auto_closed
    }

    pub fn toggle(&self, side: Side) -> Result<bool, StoreError> {
        let open = {
            let mut state = self.state.lock();
            let open = state.get_mut(side);
            *open = !*open;
            *open
        };
        self.persist(side, open)?;
        Ok(open)
    }

    pub fn close(&self, side: Side) -> Result<(), StoreError> {
        *self.state.lock().get_mut(side) = false;
        self.persist(side, false)
    }

    fn persist(&self, side: Side, open: bool) -> Result<(), StoreError> {
        set_json(self.store.as_ref(), side.slot(), &open).inspect_err(|err| {
            warn!(?side, error = %err, "failed to persist sidebar state");
        })
    }
}
