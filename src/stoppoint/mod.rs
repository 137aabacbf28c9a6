//! Breakpoint/watchpoint identifiers and the address-keyed site table
//! (spec.md §4.2, §3 `BreakpointSite`/`WatchpointLocation`).

pub mod breakpoint_site;
pub mod watchpoint;

use std::sync::atomic::{AtomicI32, Ordering};

use crate::address::Address;

/// This is the `int3` instruction on x86_64, the opcode a software
/// breakpoint site traps execution with.
pub const INTERRUPT_INSTRUCTION: u8 = 0xCC;

fn next_id(counter: &AtomicI32) -> i32 {
    counter.fetch_add(1, Ordering::Relaxed)
}

static NEXT_BREAKPOINT_ID: AtomicI32 = AtomicI32::new(1);
static NEXT_LOCATION_ID: AtomicI32 = AtomicI32::new(1);
static NEXT_SITE_ID: AtomicI32 = AtomicI32::new(1);
static NEXT_WATCHPOINT_ID: AtomicI32 = AtomicI32::new(1);

/// Identity of a user-facing breakpoint (may resolve to several
/// [`LocationId`]s, e.g. one per inlined copy of a function).
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct BreakpointId(pub i32);

impl BreakpointId {
    pub fn next() -> Self {
        BreakpointId(next_id(&NEXT_BREAKPOINT_ID))
    }
}

/// Identity of one resolved location of a [`BreakpointId`].
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct LocationId(pub i32);

impl LocationId {
    pub fn next() -> Self {
        LocationId(next_id(&NEXT_LOCATION_ID))
    }
}

/// Identity of an address-keyed [`breakpoint_site::BreakpointSite`].
/// Kept as a single opaque id (rather than the `(BreakpointId,
/// LocationId)` pair) since a site is addressed by the user via `break`/
/// `delete`/`enable`/`disable` commands the same simple way the teacher
/// already modeled with its single `StoppointId`.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct StoppointId(pub i32);

impl StoppointId {
    pub fn next() -> Self {
        StoppointId(next_id(&NEXT_SITE_ID))
    }
}

impl TryFrom<Vec<String>> for StoppointId {
    type Error = anyhow::Error;

    fn try_from(v: Vec<String>) -> Result<Self, Self::Error> {
        if v.len() != 1 {
            return Err(anyhow::anyhow!("wrong number of arguments: {:?}", v));
        }
        let id = v[0].parse::<i32>()?;
        Ok(StoppointId(id))
    }
}

/// Identity of a [`watchpoint::WatchpointLocation`].
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct WatchpointId(pub i32);

impl WatchpointId {
    pub fn next() -> Self {
        WatchpointId(next_id(&NEXT_WATCHPOINT_ID))
    }
}

impl TryFrom<Vec<String>> for WatchpointId {
    type Error = anyhow::Error;

    fn try_from(v: Vec<String>) -> Result<Self, Self::Error> {
        if v.len() != 1 {
            return Err(anyhow::anyhow!("wrong number of arguments: {:?}", v));
        }
        let id = v[0].parse::<i32>()?;
        Ok(WatchpointId(id))
    }
}

/// Address parsed off the command line (`break 0x1000`). Kept distinct
/// from [`Address`] since it has no section context: the debugger's
/// command layer only ever knows a raw numeric load address.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct VirtualAddress {
    address: u64,
}

impl VirtualAddress {
    pub fn new(address: u64) -> Self {
        VirtualAddress { address }
    }

    pub fn addr(&self) -> u64 {
        self.address
    }

    pub fn to_address(self) -> Address {
        Address::absolute(self.address)
    }
}

impl TryFrom<Vec<String>> for VirtualAddress {
    type Error = anyhow::Error;

    fn try_from(v: Vec<String>) -> Result<Self, Self::Error> {
        if v.len() != 1 {
            return Err(anyhow::anyhow!("wrong number of arguments: {:?}", v));
        }
        let s = &v[0];
        let address = if let Some(hex) = s.strip_prefix("0x") {
            u64::from_str_radix(hex, 16)?
        } else {
            s.parse::<u64>()?
        };
        Ok(VirtualAddress { address })
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum StoppointState {
    Enabled,
    Disabled,
    /// Mid-enable/disable: memory is being written. Prevents a second
    /// concurrent enable/disable on the same site (spec.md §5: "the
    /// site marked in a changing sub-state to prevent duplicate
    /// operations").
    Changing,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum SiteKind {
    Software,
    Hardware,
}
