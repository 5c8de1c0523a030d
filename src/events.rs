use crate::error::{KeyphraseError, Result};
use crate::logger::log_event_dispatched;
use serde::Deserialize;
use serde_json::Value;
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    Connected,
    Disconnected,
    TabUpdated,
    ActiveKeyChanged,
    Locked,
    Unlocked,
    InitialState,
}

impl EventKind {
    pub const ALL: [EventKind; 7] = [
        EventKind::Connected,
        EventKind::Disconnected,
        EventKind::TabUpdated,
        EventKind::ActiveKeyChanged,
        EventKind::Locked,
        EventKind::Unlocked,
        EventKind::InitialState,
    ];

    /// Name the signer extension dispatches the event under.
    pub fn name(self) -> &'static str {
        match self {
            EventKind::Connected => "signer:connected",
            EventKind::Disconnected => "signer:disconnected",
            EventKind::TabUpdated => "signer:tabUpdated",
            EventKind::ActiveKeyChanged => "signer:activeKeyChanged",
            EventKind::Locked => "signer:locked",
            EventKind::Unlocked => "signer:unlocked",
            EventKind::InitialState => "signer:initialState",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.name() == name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SignerEvent {
    Connected {
        active_key: String,
    },
    Disconnected,
    TabUpdated {
        is_connected: bool,
        active_key: Option<String>,
    },
    ActiveKeyChanged {
        active_key: String,
    },
    Locked,
    Unlocked {
        active_key: Option<String>,
    },
    InitialState {
        is_connected: bool,
        is_unlocked: bool,
        active_key: Option<String>,
    },
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SignerDetail {
    is_connected: Option<bool>,
    is_unlocked: Option<bool>,
    active_key: Option<String>,
}

impl SignerEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            SignerEvent::Connected { .. } => EventKind::Connected,
            SignerEvent::Disconnected => EventKind::Disconnected,
            SignerEvent::TabUpdated { .. } => EventKind::TabUpdated,
            SignerEvent::ActiveKeyChanged { .. } => EventKind::ActiveKeyChanged,
            SignerEvent::Locked => EventKind::Locked,
            SignerEvent::Unlocked { .. } => EventKind::Unlocked,
            SignerEvent::InitialState { .. } => EventKind::InitialState,
        }
    }

    /// Build the typed event from the raw name and `detail` payload.
    pub fn from_raw(name: &str, detail: &Value) -> Result<Self> {
        let kind =
            EventKind::from_name(name).ok_or_else(|| KeyphraseError::UnknownEvent(name.to_string()))?;
        let detail: SignerDetail = if detail.is_null() {
            SignerDetail::default()
        } else {
            serde_json::from_value(detail.clone()).map_err(|e| {
                KeyphraseError::InvalidEventPayload {
                    event: name.to_string(),
                    reason: e.to_string(),
                }
            })?
        };
        let missing = |field: &str| KeyphraseError::InvalidEventPayload {
            event: name.to_string(),
            reason: format!("missing {}", field),
        };

        let event = match kind {
            EventKind::Connected => SignerEvent::Connected {
                active_key: detail.active_key.ok_or_else(|| missing("activeKey"))?,
            },
            EventKind::Disconnected => SignerEvent::Disconnected,
            EventKind::TabUpdated => SignerEvent::TabUpdated {
                is_connected: detail.is_connected.ok_or_else(|| missing("isConnected"))?,
                active_key: detail.active_key,
            },
            EventKind::ActiveKeyChanged => SignerEvent::ActiveKeyChanged {
                active_key: detail.active_key.ok_or_else(|| missing("activeKey"))?,
            },
            EventKind::Locked => SignerEvent::Locked,
            EventKind::Unlocked => SignerEvent::Unlocked {
                active_key: detail.active_key,
            },
            EventKind::InitialState => SignerEvent::InitialState {
                is_connected: detail.is_connected.ok_or_else(|| missing("isConnected"))?,
                is_unlocked: detail.is_unlocked.ok_or_else(|| missing("isUnlocked"))?,
                active_key: detail.active_key,
            },
        };
        Ok(event)
    }
}

pub type SignerEventHandler = Box<dyn Fn(&SignerEvent) + Send + Sync>;

/// Handlers registered per event kind, called in registration order.
#[derive(Default)]
pub struct EventDispatcher {
    handlers: HashMap<EventKind, Vec<SignerEventHandler>>,
}

impl EventDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on<F>(&mut self, kind: EventKind, handler: F)
    where
        F: Fn(&SignerEvent) + Send + Sync + 'static,
    {
        self.handlers.entry(kind).or_default().push(Box::new(handler));
    }

    pub fn off(&mut self, kind: EventKind) -> usize {
        self.handlers.remove(&kind).map_or(0, |handlers| handlers.len())
    }

    pub fn handler_count(&self, kind: EventKind) -> usize {
        self.handlers.get(&kind).map_or(0, Vec::len)
    }

    /// Run every handler for the event's kind and return how many ran.
    pub fn dispatch(&self, event: &SignerEvent) -> usize {
        let kind = event.kind();
        let handlers = match self.handlers.get(&kind) {
            Some(handlers) => handlers,
            None => {
                log_event_dispatched(kind.name(), 0);
                return 0;
            }
        };
        for handler in handlers {
            handler(event);
        }
        log_event_dispatched(kind.name(), handlers.len());
        handlers.len()
    }
}
