//! Typed events, broadcasters and listeners (spec.md §4.1).
//!
//! Grounded on `original_source/include/lldb/API/SBBroadcaster.h` and
//! `source/API/SBEvent.cpp`: a broadcaster has a stable name and an
//! event-type bitmask; listeners register interest in a subset of those
//! bits and receive matching events in FIFO order. The teacher already
//! wires `crossbeam_channel` pairs by hand in `main.rs`/`process/mod.rs`
//! (`inferior_tx`/`inferior_rx`, `tui_tx`/`tui_rx`, the shutdown
//! channels); this module is that pattern made generic and reusable.

use std::collections::HashSet;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crossbeam_channel::{Receiver, Sender, unbounded};

use crate::process::ProcessState;
use crate::stoppoint::StoppointId;
use crate::thread::ThreadId;

bitflags::bitflags! {
    /// Bits a [`Listener`] can subscribe to on a [`Broadcaster`].
    #[derive(Copy, Clone, Debug, PartialEq, Eq)]
    pub struct EventMask: u32 {
        const STATE_CHANGED = 0b0001;
        const INTERRUPT      = 0b0010;
        const STDOUT         = 0b0100;
        const STDERR         = 0b1000;
    }
}

/// Payload carried by an [`Event`] (spec.md §4.1: "a tagged union of
/// the concrete event kinds").
#[derive(Clone, Debug)]
pub enum EventPayload {
    /// A process public-state transition.
    StateChanged {
        new_state: ProcessState,
        /// True when the client-visible stop was preceded by one or
        /// more auto-resumed (not surfaced) stops.
        restarted: bool,
        /// True when this stop was produced by an explicit `halt()`.
        interrupted: bool,
        thread: Option<ThreadId>,
        stop_reason: Option<StopReasonSummary>,
    },
    /// Bytes captured from the inferior's stdout/stderr.
    Bytes(Vec<u8>),
    /// The line editor/prompt should be reset (e.g. after an
    /// asynchronous stop while the user was mid-command).
    PromptReset,
    /// A thread the listener was tracking has exited.
    ThreadExited(ThreadId),
    /// Sent exactly once to every waiter when the owning broadcaster
    /// (and its process) is torn down.
    Exit,
}

/// A compact summary of why a thread stopped, echoed in
/// [`EventPayload::StateChanged`] so clients don't need a second call.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StopReasonSummary {
    Breakpoint(StoppointId),
    Watchpoint(StoppointId),
    StepComplete,
    Signaled(i32),
    Exited(i32),
}

#[derive(Clone, Debug)]
pub struct Event {
    pub broadcaster_name: &'static str,
    pub type_bit: EventMask,
    pub payload: EventPayload,
}

#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct ListenerId(u32);

static NEXT_LISTENER_ID: AtomicU32 = AtomicU32::new(1);

#[derive(Clone)]
struct Registered {
    id: ListenerId,
    mask: EventMask,
    tx: Sender<Event>,
    /// Event-type bits with a pending, not-yet-delivered `unique` event;
    /// used to de-duplicate `broadcast(.., unique = true)` calls.
    pending_unique: HashSet<u32>,
}

/// A named source of events. Multiple [`Listener`]s may subscribe with
/// independent masks; each receives its own copy of every matching
/// event (spec.md §9: "events are shared only if `unique`
/// de-duplication is requested; otherwise each listener receives an
/// independent copy").
///
/// Cheap to clone: every clone shares the same listener table, which is
/// what lets the private-state thread ([`crate::process`]) hold its own
/// handle to the same broadcaster the owning [`crate::process::Process`]
/// was constructed with.
#[derive(Clone)]
pub struct Broadcaster {
    name: &'static str,
    listeners: Arc<Mutex<Vec<Registered>>>,
}

impl Broadcaster {
    pub fn new(name: &'static str) -> Self {
        Broadcaster {
            name,
            listeners: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Register a new listener subscribed to `mask`'s bits.
    pub fn new_listener(&self, mask: EventMask) -> Listener {
        let id = ListenerId(NEXT_LISTENER_ID.fetch_add(1, Ordering::Relaxed));
        let (tx, rx) = unbounded();
        self.listeners.lock().unwrap().push(Registered {
            id,
            mask,
            tx,
            pending_unique: HashSet::new(),
        });
        Listener {
            id,
            mask,
            rx,
            listeners: self.listeners.clone(),
        }
    }

    pub fn remove_listener(&self, listener: &Listener) {
        self.listeners.lock().unwrap().retain(|r| r.id != listener.id);
    }

    /// Enqueue `payload` with `type_bit` to every listener whose mask
    /// includes it. `unique` suppresses enqueueing a second event of
    /// the same type bit while one is already pending for a given
    /// listener.
    pub fn broadcast(&self, type_bit: EventMask, payload: EventPayload, unique: bool) {
        let event = Event {
            broadcaster_name: self.name,
            type_bit,
            payload,
        };
        let mut listeners = self.listeners.lock().unwrap();
        for reg in listeners.iter_mut() {
            if !reg.mask.intersects(type_bit) {
                continue;
            }
            if unique {
                let bits = type_bit.bits();
                if reg.pending_unique.contains(&bits) {
                    continue;
                }
                reg.pending_unique.insert(bits);
            }
            // A full channel only happens if a listener leaked/died;
            // dropping the event is preferable to blocking the
            // broadcaster (every other listener must still see it).
            let _ = reg.tx.send(event.clone());
        }
    }

    /// Wake every registered listener with exactly one [`EventPayload::Exit`],
    /// used when the owning process is destroyed (spec.md §4.1).
    pub fn broadcast_exit(&self) {
        let listeners = self.listeners.lock().unwrap();
        for reg in listeners.iter() {
            let _ = reg.tx.send(Event {
                broadcaster_name: self.name,
                type_bit: EventMask::all(),
                payload: EventPayload::Exit,
            });
        }
    }

}

/// A handle through which a client receives events from one or more
/// broadcasters it has registered interest with.
pub struct Listener {
    id: ListenerId,
    mask: EventMask,
    rx: Receiver<Event>,
    listeners: Arc<Mutex<Vec<Registered>>>,
}

impl Listener {
    pub fn id(&self) -> ListenerId {
        self.id
    }

    pub fn mask(&self) -> EventMask {
        self.mask
    }

    /// Block up to `timeout` for the next matching event. Clears this
    /// event's `unique` pending-flag so a subsequent `broadcast(..,
    /// unique = true)` of the same type is not suppressed forever.
    pub fn wait(&self, timeout: Duration) -> Option<Event> {
        let event = self.rx.recv_timeout(timeout).ok()?;
        self.clear_pending(event.type_bit);
        Some(event)
    }

    /// Non-blocking poll.
    pub fn try_recv(&self) -> Option<Event> {
        let event = self.rx.try_recv().ok()?;
        self.clear_pending(event.type_bit);
        Some(event)
    }

    fn clear_pending(&self, type_bit: EventMask) {
        let mut listeners = self.listeners.lock().unwrap();
        if let Some(reg) = listeners.iter_mut().find(|r| r.id == self.id) {
            reg.pending_unique.remove(&type_bit.bits());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn listener_receives_events_matching_its_mask_in_fifo_order() {
        let b = Broadcaster::new("process");
        let listener = b.new_listener(EventMask::STATE_CHANGED);

        b.broadcast(
            EventMask::STDOUT,
            EventPayload::Bytes(b"ignored".to_vec()),
            false,
        );
        b.broadcast(
            EventMask::STATE_CHANGED,
            EventPayload::StateChanged {
                new_state: ProcessState::Stopped,
                restarted: false,
                interrupted: false,
                thread: None,
                stop_reason: None,
            },
            false,
        );
        b.broadcast(
            EventMask::STATE_CHANGED,
            EventPayload::StateChanged {
                new_state: ProcessState::Running,
                restarted: false,
                interrupted: false,
                thread: None,
                stop_reason: None,
            },
            false,
        );

        let first = listener.wait(Duration::from_millis(50)).expect("first event");
        assert!(matches!(
            first.payload,
            EventPayload::StateChanged {
                new_state: ProcessState::Stopped,
                ..
            }
        ));
        let second = listener.wait(Duration::from_millis(50)).expect("second event");
        assert!(matches!(
            second.payload,
            EventPayload::StateChanged {
                new_state: ProcessState::Running,
                ..
            }
        ));
        assert!(listener.try_recv().is_none());
    }

    #[test]
    fn unique_events_are_not_duplicated_while_pending() {
        let b = Broadcaster::new("process");
        let listener = b.new_listener(EventMask::INTERRUPT);

        for _ in 0..5 {
            b.broadcast(EventMask::INTERRUPT, EventPayload::PromptReset, true);
        }
        assert!(listener.wait(Duration::from_millis(50)).is_some());
        assert!(listener.try_recv().is_none());
    }

    #[test]
    fn destroying_broadcaster_wakes_every_waiter() {
        let b = Broadcaster::new("process");
        let l1 = b.new_listener(EventMask::all());
        let l2 = b.new_listener(EventMask::all());

        b.broadcast_exit();

        assert!(matches!(
            l1.wait(Duration::from_millis(50)).unwrap().payload,
            EventPayload::Exit
        ));
        assert!(matches!(
            l2.wait(Duration::from_millis(50)).unwrap().payload,
            EventPayload::Exit
        ));
    }
}
