//! Turns raw driver monitoring signals into `ConnectionEvent`s.
//!
//! The link counts as up while at least one server answers heartbeats.
//! A single member failing is an `Error`; `Disconnected` fires only when the
//! last reachable server is lost.

use std::collections::HashSet;
use std::sync::{Arc, Mutex, MutexGuard};

use invoices_types::ports::connection::{ConnectionEvent, ConnectionObserver};

/// What the driver's server monitor reported, keyed by server address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkSignal {
    HeartbeatSucceeded { server: String },
    HeartbeatFailed { server: String, message: String },
    ServerClosed { server: String },
    TopologyClosed,
}

/// Tracks the set of reachable servers so that `Connected` and
/// `Disconnected` fire on empty/non-empty transitions only.
#[derive(Debug, Default)]
pub struct LinkState {
    reachable: Mutex<HashSet<String>>,
}

impl LinkState {
    pub fn new() -> Self {
        Self::default()
    }

    fn reachable(&self) -> MutexGuard<'_, HashSet<String>> {
        self.reachable.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn is_connected(&self) -> bool {
        !self.reachable().is_empty()
    }

    pub fn observe(&self, signal: LinkSignal) -> Vec<ConnectionEvent> {
        let mut reachable = self.reachable();
        let was_up = !reachable.is_empty();
        let mut events = Vec::new();
        match signal {
            LinkSignal::HeartbeatSucceeded { server } => {
                reachable.insert(server);
            }
            LinkSignal::HeartbeatFailed { server, message } => {
                events.push(ConnectionEvent::Error(format!("{server}: {message}")));
                reachable.remove(&server);
            }
            LinkSignal::ServerClosed { server } => {
                reachable.remove(&server);
            }
            LinkSignal::TopologyClosed => reachable.clear(),
        }
        match (was_up, reachable.is_empty()) {
            (false, false) => events.push(ConnectionEvent::Connected),
            (true, true) => events.push(ConnectionEvent::Disconnected),
            _ => {}
        }
        events
    }
}

/// Feeds signals through a `LinkState` and hands the resulting events to the
/// registered observer.
pub struct LinkMonitor {
    state: LinkState,
    observer: Arc<dyn ConnectionObserver>,
}

impl LinkMonitor {
    pub fn new(observer: Arc<dyn ConnectionObserver>) -> Self {
        Self {
            state: LinkState::new(),
            observer,
        }
    }

    pub fn signal(&self, signal: LinkSignal) {
        for event in self.state.observe(signal) {
            self.observer.on_event(&event);
        }
    }

    pub fn is_connected(&self) -> bool {
        self.state.is_connected()
    }
}

/// Default observer: logs every lifecycle event.
#[derive(Debug, Default, Clone, Copy)]
pub struct LoggingObserver;

impl ConnectionObserver for LoggingObserver {
    fn on_event(&self, event: &ConnectionEvent) {
        match event {
            ConnectionEvent::Connected => tracing::info!("document store connected"),
            ConnectionEvent::Error(message) => {
                tracing::error!(error = %message, "document store connection error")
            }
            ConnectionEvent::Disconnected => tracing::warn!("document store disconnected"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn up(server: &str) -> LinkSignal {
        LinkSignal::HeartbeatSucceeded {
            server: server.into(),
        }
    }

    fn down(server: &str, message: &str) -> LinkSignal {
        LinkSignal::HeartbeatFailed {
            server: server.into(),
            message: message.into(),
        }
    }

    #[test]
    fn connected_fires_once_per_transition() {
        let state = LinkState::new();
        assert_eq!(state.observe(up("a:27017")), vec![ConnectionEvent::Connected]);
        assert!(state.observe(up("a:27017")).is_empty());
        assert!(state.observe(up("b:27017")).is_empty());
        assert!(state.is_connected());
    }

    #[test]
    fn failure_of_only_server_reports_error_then_disconnect() {
        let state = LinkState::new();
        state.observe(up("a:27017"));
        assert_eq!(
            state.observe(down("a:27017", "timed out")),
            vec![
                ConnectionEvent::Error("a:27017: timed out".into()),
                ConnectionEvent::Disconnected
            ]
        );
        // already down: only the error repeats
        assert_eq!(
            state.observe(down("a:27017", "timed out")),
            vec![ConnectionEvent::Error("a:27017: timed out".into())]
        );
        assert_eq!(state.observe(up("a:27017")), vec![ConnectionEvent::Connected]);
    }

    #[test]
    fn one_member_down_keeps_link_up() {
        let state = LinkState::new();
        let mut events = Vec::new();
        for _ in 0..2 {
            events.extend(state.observe(up("a:27017")));
            events.extend(state.observe(down("b:27017", "refused")));
        }
        assert_eq!(
            events,
            vec![
                ConnectionEvent::Connected,
                ConnectionEvent::Error("b:27017: refused".into()),
                ConnectionEvent::Error("b:27017: refused".into()),
            ]
        );
        assert!(state.is_connected());
    }

    #[test]
    fn removing_a_member_only_disconnects_when_none_remain() {
        let state = LinkState::new();
        state.observe(up("a:27017"));
        state.observe(up("b:27017"));
        assert!(state
            .observe(LinkSignal::ServerClosed {
                server: "b:27017".into()
            })
            .is_empty());
        assert_eq!(
            state.observe(LinkSignal::ServerClosed {
                server: "a:27017".into()
            }),
            vec![ConnectionEvent::Disconnected]
        );
    }

    #[test]
    fn topology_close_only_disconnects_a_live_link() {
        let state = LinkState::new();
        assert!(state.observe(LinkSignal::TopologyClosed).is_empty());
        state.observe(up("a:27017"));
        state.observe(up("b:27017"));
        assert_eq!(
            state.observe(LinkSignal::TopologyClosed),
            vec![ConnectionEvent::Disconnected]
        );
        assert!(!state.is_connected());
    }

    #[test]
    fn monitor_forwards_events_to_observer() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();
        let monitor = LinkMonitor::new(Arc::new(move |e: &ConnectionEvent| {
            sink.lock().unwrap().push(e.clone());
        }));

        monitor.signal(up("a:27017"));
        monitor.signal(LinkSignal::TopologyClosed);
        assert!(!monitor.is_connected());
        assert_eq!(
            *seen.lock().unwrap(),
            vec![ConnectionEvent::Connected, ConnectionEvent::Disconnected]
        );
    }
}
