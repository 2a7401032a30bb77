//! Selection notifications and their synchronous dispatch.

use std::fmt;

use serde::Serialize;

use crate::domain::path::TreePath;

/// Notification emitted by the selection manager once per logical operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", content = "delta")]
pub enum SelectionEvent {
    /// Everything was deselected by `clear`.
    #[serde(rename = "selection-cleared")]
    Cleared,
    /// The selected set changed.
    #[serde(rename = "selection-changed")]
    Changed,
    /// Paths newly absorbed into an existing range, in row order.
    #[serde(rename = "selection-extended")]
    Extended(Vec<TreePath>),
}

impl SelectionEvent {
    /// Stable event name.
    pub fn name(&self) -> &'static str {
        match self {
            SelectionEvent::Cleared => "selection-cleared",
            SelectionEvent::Changed => "selection-changed",
            SelectionEvent::Extended(_) => "selection-extended",
        }
    }
}

impl fmt::Display for SelectionEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SelectionEvent::Extended(delta) => {
                write!(f, "{} [", self.name())?;
                for (position, path) in delta.iter().enumerate() {
                    if position > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{path}")?;
                }
                f.write_str("]")
            }
            _ => f.write_str(self.name()),
        }
    }
}

/// Handle returned by [`EventBus::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Listener = Box<dyn FnMut(&SelectionEvent)>;

/// Ordered list of listeners invoked synchronously on every emitted event.
///
/// Listeners must not call back into the selection manager that owns the bus.
#[derive(Default)]
pub struct EventBus {
    listeners: Vec<(SubscriptionId, Listener)>,
    next_id: u64,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a listener; it receives events in emission order.
    pub fn subscribe(&mut self, listener: impl FnMut(&SelectionEvent) + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Drop a listener. Returns `false` when the id was unknown.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(existing, _)| *existing != id);
        self.listeners.len() != before
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    pub fn emit(&mut self, event: &SelectionEvent) {
        tracing::trace!(event = %event, listeners = self.listeners.len(), "emit selection event");
        for (_, listener) in &mut self.listeners {
            listener(event);
        }
    }
}

impl fmt::Debug for EventBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventBus")
            .field("listeners", &self.listeners.len())
            .field("next_id", &self.next_id)
            .finish()
    }
}
