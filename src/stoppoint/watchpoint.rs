//! Hardware watchpoints (spec.md §3 `WatchpointLocation`, §4.2).
//!
//! x86_64 gives four debug-address registers (`DR0`-`DR3`) and one
//! control register (`DR7`), so at most four watchpoints can be live at
//! once; this module tracks that slot allocation the way the teacher's
//! `register_info.rs` tracks the `dr0..dr7` debug register set.

use std::collections::HashMap;

use crate::address::Address;
use crate::error::{DebugError, Result};
use crate::stoppoint::{StoppointState, WatchpointId};

pub const MAX_HARDWARE_WATCHPOINTS: usize = 4;

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum WatchKind {
    Write,
    ReadWrite,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum WatchSize {
    One = 1,
    Two = 2,
    Four = 4,
    Eight = 8,
}

#[derive(Clone, Debug)]
pub struct WatchpointLocation {
    id: WatchpointId,
    address: Address,
    kind: WatchKind,
    size: WatchSize,
    state: StoppointState,
    /// Which of `DR0..DR3` this watchpoint currently occupies, `None`
    /// while disabled.
    slot: Option<u8>,
    /// Most recent value read at `address`, used to report old/new
    /// values on a data watchpoint hit (spec.md §3 edge cases).
    previous_value: Option<Vec<u8>>,
}

impl WatchpointLocation {
    fn new(address: Address, kind: WatchKind, size: WatchSize) -> Self {
        WatchpointLocation {
            id: WatchpointId::next(),
            address,
            kind,
            size,
            state: StoppointState::Disabled,
            slot: None,
            previous_value: None,
        }
    }

    pub fn id(&self) -> WatchpointId {
        self.id
    }

    pub fn address(&self) -> Address {
        self.address
    }

    pub fn kind(&self) -> WatchKind {
        self.kind
    }

    pub fn size(&self) -> WatchSize {
        self.size
    }

    pub fn is_enabled(&self) -> bool {
        matches!(self.state, StoppointState::Enabled)
    }

    pub fn slot(&self) -> Option<u8> {
        self.slot
    }

    pub fn previous_value(&self) -> Option<&[u8]> {
        self.previous_value.as_deref()
    }

    pub fn update_previous_value(&mut self, value: Vec<u8>) {
        self.previous_value = Some(value);
    }
}

/// Owns every [`WatchpointLocation`] for one process and arbitrates the
/// four hardware slots.
#[derive(Default)]
pub struct WatchpointList {
    watchpoints: HashMap<WatchpointId, WatchpointLocation>,
    /// `slots[i]` is the watchpoint currently occupying `DR{i}`.
    slots: [Option<WatchpointId>; MAX_HARDWARE_WATCHPOINTS],
}

impl WatchpointList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn create(&mut self, address: Address, kind: WatchKind, size: WatchSize) -> WatchpointId {
        let wp = WatchpointLocation::new(address, kind, size);
        let id = wp.id();
        self.watchpoints.insert(id, wp);
        id
    }

    pub fn get(&self, id: WatchpointId) -> Result<&WatchpointLocation> {
        self.watchpoints
            .get(&id)
            .ok_or_else(|| DebugError::NotSupported(format!("no such watchpoint {:?}", id)))
    }

    pub fn get_mut(&mut self, id: WatchpointId) -> Result<&mut WatchpointLocation> {
        self.watchpoints
            .get_mut(&id)
            .ok_or_else(|| DebugError::NotSupported(format!("no such watchpoint {:?}", id)))
    }

    pub fn at_address(&self, address: Address) -> Option<&WatchpointLocation> {
        self.watchpoints.values().find(|w| w.address == address)
    }

    pub fn iter(&self) -> impl Iterator<Item = &WatchpointLocation> {
        self.watchpoints.values()
    }

    /// Reserve a free `DR0..DR3` slot for `id`. Returns
    /// [`DebugError::NotSupported`] once all four are taken (spec.md
    /// §4.2 edge case: "creating a fifth concurrent hardware
    /// watchpoint").
    pub fn allocate_slot(&mut self, id: WatchpointId) -> Result<u8> {
        let free = self
            .slots
            .iter()
            .position(|s| s.is_none())
            .ok_or_else(|| {
                DebugError::NotSupported(
                    "no free hardware watchpoint slots (maximum of 4 in use)".into(),
                )
            })?;
        self.slots[free] = Some(id);
        let wp = self.get_mut(id)?;
        wp.slot = Some(free as u8);
        wp.state = StoppointState::Enabled;
        Ok(free as u8)
    }

    pub fn release_slot(&mut self, id: WatchpointId) -> Result<()> {
        let wp = self.get_mut(id)?;
        if let Some(slot) = wp.slot.take() {
            self.slots[slot as usize] = None;
        }
        wp.state = StoppointState::Disabled;
        Ok(())
    }

    pub fn remove(&mut self, id: WatchpointId) -> Result<()> {
        self.release_slot(id)?;
        self.watchpoints.remove(&id);
        Ok(())
    }

    /// Which watchpoint (if any) owns `slot`, used to translate a `DR6`
    /// hit-status bit back into a [`WatchpointId`] after a trap.
    pub fn watchpoint_in_slot(&self, slot: u8) -> Option<WatchpointId> {
        self.slots.get(slot as usize).copied().flatten()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn allocating_a_fifth_slot_fails() {
        let mut list = WatchpointList::new();
        let mut ids = Vec::new();
        for i in 0..4 {
            let id = list.create(Address::absolute(0x1000 + i), WatchKind::Write, WatchSize::Four);
            list.allocate_slot(id).unwrap();
            ids.push(id);
        }
        let fifth = list.create(Address::absolute(0x9999), WatchKind::Write, WatchSize::Four);
        assert!(list.allocate_slot(fifth).is_err());

        list.release_slot(ids[0]).unwrap();
        assert!(list.allocate_slot(fifth).is_ok());
    }

    #[test]
    fn watchpoint_in_slot_round_trips() {
        let mut list = WatchpointList::new();
        let id = list.create(Address::absolute(0x2000), WatchKind::ReadWrite, WatchSize::Eight);
        let slot = list.allocate_slot(id).unwrap();
        assert_eq!(list.watchpoint_in_slot(slot), Some(id));
    }
}
