//! Typed publish/subscribe between the engine and its host.
//!
//! Each event is a zero-sized marker type implementing [`EngineEvent`], which
//! fixes the payload type handlers receive. Handlers run synchronously, in
//! registration order, during the command that triggered the event. A
//! panicking handler is not caught and stops the remaining handlers.

use geomeasure_core::models::{GeoPoint, Measurement};
use geomeasure_core::units::{AreaUnit, DistanceUnit};
use serde::{Deserialize, Serialize};
use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::fmt;

use crate::session::SessionSnapshot;

/// An event the engine can emit
pub trait EngineEvent: 'static {
    /// Data handed to every handler; always an owned copy of engine state
    type Payload: Clone + fmt::Debug + 'static;

    /// Wire name used by hosts that dispatch on strings
    const NAME: &'static str;
}

macro_rules! engine_event {
    ($(#[$meta:meta])* $name:ident, $wire:literal, $payload:ty) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq)]
        pub struct $name;

        impl EngineEvent for $name {
            type Payload = $payload;
            const NAME: &'static str = $wire;
        }
    };
}

engine_event!(
    /// A drawing session started
    DrawStart, "drawstart", SessionSnapshot
);
engine_event!(
    /// The draft or the cursor preview changed
    DrawUpdate, "drawupdate", SessionSnapshot
);
engine_event!(
    /// A draft was finished and stored
    DrawEnd, "drawend", DrawEndPayload
);
engine_event!(
    /// A draft was discarded without being stored
    DrawCancel, "drawcancel", DrawCancelPayload
);
engine_event!(
    /// A measurement entered the collection
    MeasurementAdd, "measurementadd", Measurement
);
engine_event!(
    /// A measurement left the collection
    MeasurementRemove, "measurementremove", Measurement
);
engine_event!(
    /// The measurement mode changed
    ModeChange, "modechange", SessionSnapshot
);
engine_event!(
    /// The display units changed
    UnitChange, "unitchange", UnitSelection
);
engine_event!(
    /// The collection was emptied; carries what was removed
    Clear, "clear", Vec<Measurement>
);

/// Wire names of every event, in the order hosts usually subscribe
pub const EVENT_NAMES: [&str; 9] = [
    DrawStart::NAME,
    DrawUpdate::NAME,
    DrawEnd::NAME,
    DrawCancel::NAME,
    MeasurementAdd::NAME,
    MeasurementRemove::NAME,
    ModeChange::NAME,
    UnitChange::NAME,
    Clear::NAME,
];

/// Payload of [`DrawEnd`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DrawEndPayload {
    /// Session state after the transition (idle, empty draft)
    pub session: SessionSnapshot,
    /// The measurement as stored, with its final id
    pub measurement: Measurement,
}

/// Why a draft was discarded
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CancelReason {
    /// The host asked for it
    Requested,
    /// Finish was requested before the mode's minimum point count
    TooFewPoints { required: usize, actual: usize },
    /// The area ring crosses itself and the policy rejects that
    SelfIntersecting,
    /// The mode was switched mid-draft
    ModeChanged,
}

/// Payload of [`DrawCancel`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DrawCancelPayload {
    /// Session state after the transition (idle, empty draft)
    pub session: SessionSnapshot,
    pub discarded_points: Vec<GeoPoint>,
    pub reason: CancelReason,
}

/// Currently selected display units
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct UnitSelection {
    pub distance: DistanceUnit,
    pub area: AreaUnit,
}

/// Handle returned by [`NotificationHub::on`], used to unsubscribe
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct HandlerId(u64);

type Handler<P> = Box<dyn FnMut(&P)>;

struct Registration {
    id: HandlerId,
    /// Always a `Handler<E::Payload>` for the event this list is keyed by
    handler: Box<dyn Any>,
}

/// Registry of event handlers keyed by event type
#[derive(Default)]
pub struct NotificationHub {
    handlers: HashMap<TypeId, Vec<Registration>>,
    next_id: u64,
}

impl NotificationHub {
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribe to `E`; handlers for the same event run in subscription order
    pub fn on<E: EngineEvent>(&mut self, handler: impl FnMut(&E::Payload) + 'static) -> HandlerId {
        let id = HandlerId(self.next_id);
        self.next_id += 1;

        let handler: Handler<E::Payload> = Box::new(handler);
        self.handlers
            .entry(TypeId::of::<E>())
            .or_default()
            .push(Registration { id, handler: Box::new(handler) });

        tracing::trace!("Subscribed handler {:?} to {}", id, E::NAME);
        id
    }

    /// Unsubscribe a handler from `E`; returns false if it was not subscribed
    pub fn off<E: EngineEvent>(&mut self, id: HandlerId) -> bool {
        let Some(registrations) = self.handlers.get_mut(&TypeId::of::<E>()) else {
            return false;
        };

        let before = registrations.len();
        registrations.retain(|registration| registration.id != id);
        registrations.len() != before
    }

    /// Invoke every handler of `E` with `payload`
    pub fn emit<E: EngineEvent>(&mut self, payload: &E::Payload) {
        let Some(registrations) = self.handlers.get_mut(&TypeId::of::<E>()) else {
            return;
        };

        tracing::trace!("Emitting {} to {} handler(s)", E::NAME, registrations.len());
        for registration in registrations.iter_mut() {
            if let Some(handler) = registration.handler.downcast_mut::<Handler<E::Payload>>() {
                handler(payload);
            }
        }
    }

    /// Number of handlers subscribed to `E`
    pub fn handler_count<E: EngineEvent>(&self) -> usize {
        self.handlers.get(&TypeId::of::<E>()).map_or(0, Vec::len)
    }
}

impl fmt::Debug for NotificationHub {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let subscribed: usize = self.handlers.values().map(Vec::len).sum();
        f.debug_struct("NotificationHub").field("handlers", &subscribed).finish()
    }
}
