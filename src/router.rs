//! Router - current location and navigation requests

use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard};

use crate::core::paths::app;

/// Locations kept in `history`, oldest dropped first
const HISTORY_LIMIT: usize = 64;
/// Undrained redirects kept in the queue, oldest dropped first
const PENDING_LIMIT: usize = 32;

/// Navigation collaborator the stores issue redirects through
pub trait Navigator: Send + Sync {
    fn go_to_route(&self, route: &str);
    fn current_route(&self) -> String;
}

#[derive(Debug)]
struct RouterState {
    location: String,
    history: Vec<String>,
    pending: VecDeque<String>,
}

/// In-process router. `go_to_route` moves the location immediately and
/// queues the route so the app controller can feed it back to the stores.
/// Callers outside the app controller should poll `take_pending`; the queue
/// and the history are bounded either way.
#[derive(Debug)]
pub struct Router {
    state: Mutex<RouterState>,
}

impl Default for Router {
    fn default() -> Self { Self::new(app::ROOT) }
}

impl Router {
    pub fn new(location: &str) -> Self {
        Self {
            state: Mutex::new(RouterState {
                location: location.to_string(),
                history: vec![location.to_string()],
                pending: VecDeque::new(),
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, RouterState> {
        self.state.lock().unwrap_or_else(|p| p.into_inner())
    }

    /// Location change reported by the window (back/forward, link click)
    pub fn set_location(&self, location: &str) {
        let mut s = self.lock();
        if s.location != location {
            s.location = location.to_string();
            s.history.push(location.to_string());
            if s.history.len() > HISTORY_LIMIT {
                let excess = s.history.len() - HISTORY_LIMIT;
                s.history.drain(..excess);
            }
        }
    }

    /// Next redirect issued through `go_to_route`, oldest first
    pub fn take_pending(&self) -> Option<String> { self.lock().pending.pop_front() }

    pub fn clear_pending(&self) { self.lock().pending.clear(); }

    pub fn history(&self) -> Vec<String> { self.lock().history.clone() }
}

impl Navigator for Router {
    fn go_to_route(&self, route: &str) {
        tracing::info!(route, "navigate");
        self.set_location(route);
        let mut s = self.lock();
        if s.pending.len() >= PENDING_LIMIT {
            if let Some(dropped) = s.pending.pop_front() {
                tracing::debug!(route = %dropped, "pending redirect dropped");
            }
        }
        s.pending.push_back(route.to_string());
    }

    fn current_route(&self) -> String { self.lock().location.clone() }
}
