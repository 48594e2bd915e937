//! Store connection lifecycle notifications.
//!
//! After startup these events are informational: an `Error` or
//! `Disconnected` never stops the service. Only the initial connection
//! attempt is fatal, and that is reported through its `Result`, not here.

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectionEvent {
    Connected,
    Error(String),
    Disconnected,
}

pub trait ConnectionObserver: Send + Sync + 'static {
    fn on_event(&self, event: &ConnectionEvent);
}

impl<F> ConnectionObserver for F
where
    F: Fn(&ConnectionEvent) + Send + Sync + 'static,
{
    fn on_event(&self, event: &ConnectionEvent) {
        self(event)
    }
}
