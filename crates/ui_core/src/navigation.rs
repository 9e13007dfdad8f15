//! Application-owned navigation: a history entry stack with push / replace /
//! back / forward, and native route-change observation.
//!
//! The hosting shell owns exactly one router. Observers are notified after
//! the underlying history mutation completes, in subscription order, so no
//! observer ever sees a pre-mutation path.

use std::sync::Arc;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryEntry {
    pub path: String,
    pub title: String,
}

impl HistoryEntry {
    pub fn new(path: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            title: title.into(),
        }
    }
}

/// How the current entry came to be current. `Pop` covers both back and
/// forward traversal, the popstate analogue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavigationKind {
    Push,
    Replace,
    Pop,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteChange {
    pub kind: NavigationKind,
    pub path: String,
    pub title: String,
}

pub trait NavigationObserver: Send + Sync {
    fn route_changed(&self, change: &RouteChange);
}

pub type ObserverId = u64;

pub struct Router {
    entries: Vec<HistoryEntry>,
    index: usize,
    observers: Vec<(ObserverId, Arc<dyn NavigationObserver>)>,
    next_observer_id: ObserverId,
}

impl Router {
    pub fn new(initial: HistoryEntry) -> Self {
        Self {
            entries: vec![initial],
            index: 0,
            observers: Vec::new(),
            next_observer_id: 0,
        }
    }

    pub fn current(&self) -> &HistoryEntry {
        &self.entries[self.index]
    }

    pub fn can_go_back(&self) -> bool {
        self.index > 0
    }

    pub fn can_go_forward(&self) -> bool {
        self.index + 1 < self.entries.len()
    }

    pub fn entry_count(&self) -> usize {
        self.entries.len()
    }

    /// Pushes a new entry, discarding any forward entries.
    pub fn push(&mut self, entry: HistoryEntry) {
        self.entries.truncate(self.index + 1);
        self.entries.push(entry);
        self.index += 1;
        self.notify(NavigationKind::Push);
    }

    /// Replaces the current entry in place.
    pub fn replace(&mut self, entry: HistoryEntry) {
        self.entries[self.index] = entry;
        self.notify(NavigationKind::Replace);
    }

    pub fn back(&mut self) -> bool {
        if !self.can_go_back() {
            return false;
        }
        self.index -= 1;
        self.notify(NavigationKind::Pop);
        true
    }

    pub fn forward(&mut self) -> bool {
        if !self.can_go_forward() {
            return false;
        }
        self.index += 1;
        self.notify(NavigationKind::Pop);
        true
    }

    pub fn subscribe(&mut self, observer: Arc<dyn NavigationObserver>) -> ObserverId {
        let id = self.next_observer_id;
        self.next_observer_id += 1;
        self.observers.push((id, observer));
        id
    }

    pub fn unsubscribe(&mut self, id: ObserverId) -> bool {
        let before = self.observers.len();
        self.observers.retain(|(observer_id, _)| *observer_id != id);
        self.observers.len() != before
    }

    pub fn observer_count(&self) -> usize {
        self.observers.len()
    }

    fn notify(&self, kind: NavigationKind) {
        let current = self.current();
        let change = RouteChange {
            kind,
            path: current.path.clone(),
            title: current.title.clone(),
        };
        for (_, observer) in &self.observers {
            observer.route_changed(&change);
        }
    }
}
