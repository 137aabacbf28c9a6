//! Address-keyed breakpoint sites and the breakpoints that own them
//! (spec.md §4.2).
//!
//! The teacher's `BreakpointSite` was a single struct doubling as both
//! the user-facing breakpoint and the thing patched into memory. Once a
//! breakpoint can resolve to more than one address (inlined copies of a
//! function, recursive `break` on a line reached from two call sites)
//! those two concerns split: a [`BreakpointSite`] is the address-keyed
//! site identity, shared by every [`BreakpointLocation`] that resolves
//! to the same address; a location is owned by exactly one
//! [`BreakpointId`].

use std::collections::HashMap;

use crate::address::Address;
use crate::backend::NativeBackend;
use crate::error::{DebugError, Result};
use crate::stoppoint::{
    BreakpointId, LocationId, SiteKind, StoppointId, StoppointState, INTERRUPT_INSTRUCTION,
};

/// One (breakpoint, address) pairing owning a share of a
/// [`BreakpointSite`]. Disabling a location disables the site only once
/// every owning location has disabled it (spec.md §4.2: "reference
/// counted; the underlying trap is removed only when the last owner
/// releases it").
#[derive(Copy, Clone, Debug)]
pub struct BreakpointLocation {
    pub id: LocationId,
    pub owner: BreakpointId,
    pub site: StoppointId,
    pub address: Address,
    enabled: bool,
}

impl BreakpointLocation {
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }
}

/// The address-keyed trap itself: at most one per address, shared by
/// every [`BreakpointLocation`] resolving there.
#[derive(Clone, Debug)]
pub struct BreakpointSite {
    id: StoppointId,
    address: Address,
    kind: SiteKind,
    state: StoppointState,
    /// Byte overwritten with `int3` while the site is installed; `None`
    /// when the site has never been installed in memory.
    saved_byte: Option<u8>,
    /// Locations currently holding this site enabled.
    owners: Vec<LocationId>,
}

impl BreakpointSite {
    fn new(address: Address, kind: SiteKind) -> Self {
        BreakpointSite {
            id: StoppointId::next(),
            address,
            kind,
            state: StoppointState::Disabled,
            saved_byte: None,
            owners: Vec::new(),
        }
    }

    pub fn id(&self) -> StoppointId {
        self.id
    }

    pub fn address(&self) -> Address {
        self.address
    }

    pub fn kind(&self) -> SiteKind {
        self.kind
    }

    pub fn is_enabled(&self) -> bool {
        matches!(self.state, StoppointState::Enabled)
    }

    pub fn ref_count(&self) -> usize {
        self.owners.len()
    }

    /// Patch `int3` into the inferior's memory at this site's address,
    /// saving the byte it replaces. No-op (but still ref-counted) if
    /// already installed. Uses `Changing` as a re-entrancy guard so a
    /// second concurrent `install` on the same site is rejected rather
    /// than clobbering `saved_byte` twice (spec.md §5).
    fn install(&mut self, backend: &mut dyn NativeBackend) -> Result<()> {
        if self.saved_byte.is_some() {
            return Ok(());
        }
        if backend.pid().is_none() {
            // No inferior exists yet (breakpoint set before `run`); record
            // the user's intent and let `Process::launch` re-drive this
            // once the inferior is attached.
            self.state = StoppointState::Enabled;
            return Ok(());
        }
        self.state = StoppointState::Changing;
        let original = match backend.read_memory(self.address, 1) {
            Ok(bytes) => bytes,
            Err(e) => {
                self.state = StoppointState::Disabled;
                return Err(e);
            }
        };
        let original_byte = original[0];
        if let Err(e) = backend.write_memory(self.address, &[INTERRUPT_INSTRUCTION]) {
            self.state = StoppointState::Disabled;
            return Err(e);
        }
        self.saved_byte = Some(original_byte);
        self.state = StoppointState::Enabled;
        Ok(())
    }

    /// Restore the original byte. No-op if not installed.
    fn uninstall(&mut self, backend: &mut dyn NativeBackend) -> Result<()> {
        let Some(original_byte) = self.saved_byte else {
            return Ok(());
        };
        self.state = StoppointState::Changing;
        if let Err(e) = backend.write_memory(self.address, &[original_byte]) {
            self.state = StoppointState::Enabled;
            return Err(e);
        }
        self.saved_byte = None;
        self.state = StoppointState::Disabled;
        Ok(())
    }

    /// Register `location` as holding this site enabled, installing the
    /// trap on the 0→1 transition.
    fn add_owner(&mut self, location: LocationId, backend: &mut dyn NativeBackend) -> Result<()> {
        if !self.owners.contains(&location) {
            self.owners.push(location);
        }
        self.install(backend)
    }

    /// Remove `location` from the owner set, uninstalling the trap once
    /// the last owner has released it.
    fn remove_owner(
        &mut self,
        location: LocationId,
        backend: &mut dyn NativeBackend,
    ) -> Result<()> {
        self.owners.retain(|l| *l != location);
        if self.owners.is_empty() {
            self.uninstall(backend)?;
        }
        Ok(())
    }

    /// The byte the inferior's code actually reads at this address,
    /// transparently masking the `int3` patch (spec.md §4.2, consumed
    /// by `Memory::read`).
    pub fn original_byte(&self) -> Option<u8> {
        self.saved_byte
    }

    /// Update the byte shadowed underneath an installed trap, for a
    /// write that landed on this address without disabling the site
    /// (spec.md §4.3).
    fn set_shadowed_byte(&mut self, new_original: u8) {
        if self.saved_byte.is_some() {
            self.saved_byte = Some(new_original);
        }
    }
}

/// A user-facing breakpoint: one or more [`BreakpointLocation`]s sharing
/// a `BreakpointId`. Created disabled; enabling it enables every
/// location.
#[derive(Clone, Debug)]
pub struct Breakpoint {
    id: BreakpointId,
    enabled: bool,
    /// False once the first hit has auto-disabled this breakpoint
    /// (one-shot/temporary breakpoints, spec.md §3 edge cases).
    one_shot: bool,
    locations: Vec<LocationId>,
}

impl Breakpoint {
    pub fn id(&self) -> BreakpointId {
        self.id
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn is_one_shot(&self) -> bool {
        self.one_shot
    }

    pub fn locations(&self) -> &[LocationId] {
        &self.locations
    }
}

/// Owns every [`Breakpoint`], [`BreakpointLocation`] and
/// [`BreakpointSite`] for one process (spec.md §4.2).
#[derive(Default)]
pub struct BreakpointSiteList {
    breakpoints: HashMap<BreakpointId, Breakpoint>,
    locations: HashMap<LocationId, BreakpointLocation>,
    sites: HashMap<StoppointId, BreakpointSite>,
    by_address: HashMap<Address, StoppointId>,
}

impl BreakpointSiteList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new breakpoint with a single location at `address`,
    /// disabled. Reuses an existing site at that address if one exists
    /// (spec.md §4.2: "two breakpoints resolving to the same address
    /// share one site").
    pub fn create(&mut self, address: Address, kind: SiteKind) -> BreakpointId {
        let breakpoint_id = BreakpointId::next();
        let location_id = self.create_location(breakpoint_id, address, kind);
        self.breakpoints.insert(
            breakpoint_id,
            Breakpoint {
                id: breakpoint_id,
                enabled: false,
                one_shot: false,
                locations: vec![location_id],
            },
        );
        breakpoint_id
    }

    fn create_location(
        &mut self,
        owner: BreakpointId,
        address: Address,
        kind: SiteKind,
    ) -> LocationId {
        let site_id = *self
            .by_address
            .entry(address)
            .or_insert_with(|| {
                let site = BreakpointSite::new(address, kind);
                let id = site.id();
                self.sites.insert(id, site);
                id
            });
        let location_id = LocationId::next();
        self.locations.insert(
            location_id,
            BreakpointLocation {
                id: location_id,
                owner,
                site: site_id,
                address,
                enabled: false,
            },
        );
        location_id
    }

    pub fn breakpoint(&self, id: BreakpointId) -> Result<&Breakpoint> {
        self.breakpoints
            .get(&id)
            .ok_or_else(|| DebugError::UnknownBreakpoint(StoppointId(id.0)))
    }

    /// Ids of every breakpoint currently marked enabled, whether or not
    /// its trap has actually been installed yet (spec.md §4.6: `launch`
    /// re-drives these once the inferior exists).
    pub fn enabled_breakpoint_ids(&self) -> Vec<BreakpointId> {
        self.breakpoints
            .values()
            .filter(|b| b.enabled)
            .map(|b| b.id)
            .collect()
    }

    pub fn site_at(&self, address: Address) -> Option<&BreakpointSite> {
        self.by_address.get(&address).and_then(|id| self.sites.get(id))
    }

    pub fn site(&self, id: StoppointId) -> Option<&BreakpointSite> {
        self.sites.get(&id)
    }

    pub fn iter_sites(&self) -> impl Iterator<Item = &BreakpointSite> {
        self.sites.values()
    }

    pub fn enable(&mut self, id: BreakpointId, backend: &mut dyn NativeBackend) -> Result<()> {
        let location_ids = self.breakpoint(id)?.locations.clone();
        for loc_id in &location_ids {
            let (site_id, address) = {
                let loc = self.locations.get_mut(loc_id).expect("location exists");
                loc.enabled = true;
                (loc.site, loc.address)
            };
            let _ = address;
            if let Some(site) = self.sites.get_mut(&site_id) {
                site.add_owner(*loc_id, backend)?;
            }
        }
        self.breakpoints.get_mut(&id).expect("just read").enabled = true;
        Ok(())
    }

    pub fn disable(&mut self, id: BreakpointId, backend: &mut dyn NativeBackend) -> Result<()> {
        let location_ids = self.breakpoint(id)?.locations.clone();
        for loc_id in &location_ids {
            let site_id = {
                let loc = self.locations.get_mut(loc_id).expect("location exists");
                loc.enabled = false;
                loc.site
            };
            if let Some(site) = self.sites.get_mut(&site_id) {
                site.remove_owner(*loc_id, backend)?;
            }
        }
        self.breakpoints.get_mut(&id).expect("just read").enabled = false;
        Ok(())
    }

    /// Update the byte a still-installed site will restore on disable,
    /// used by [`crate::memory::Memory::write`] when a write lands on a
    /// breakpointed address.
    pub fn set_shadowed_byte(&mut self, site_id: StoppointId, new_original: u8) {
        if let Some(site) = self.sites.get_mut(&site_id) {
            site.set_shadowed_byte(new_original);
        }
    }

    pub fn remove(&mut self, id: BreakpointId, backend: &mut dyn NativeBackend) -> Result<()> {
        self.disable(id, backend)?;
        let breakpoint = self
            .breakpoints
            .remove(&id)
            .ok_or_else(|| DebugError::UnknownBreakpoint(StoppointId(id.0)))?;
        for loc_id in breakpoint.locations {
            if let Some(loc) = self.locations.remove(&loc_id) {
                let site_has_no_remaining_owner = self
                    .sites
                    .get(&loc.site)
                    .map(|s| s.owners.is_empty())
                    .unwrap_or(true);
                if site_has_no_remaining_owner {
                    self.sites.remove(&loc.site);
                    self.by_address.remove(&loc.address);
                }
            }
        }
        Ok(())
    }

    /// The site at `address`, if an enabled one exists, masking the
    /// `int3` byte it replaced in memory (used by `Memory::read` and by
    /// the stop handler to recognize a trap belongs to a known
    /// breakpoint rather than a foreign `int3`).
    pub fn resolve_trap(&self, address: Address) -> Option<StoppointId> {
        self.site_at(address)
            .filter(|s| s.is_enabled())
            .map(|s| s.id())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{BackendStopEvent, LaunchInfo};
    use crate::thread::ObservedThread;
    use std::cell::RefCell;
    use std::collections::HashMap as StdHashMap;

    /// Minimal in-memory stand-in for a real backend, just enough to
    /// exercise site install/uninstall without an actual inferior.
    struct FakeBackend {
        memory: RefCell<StdHashMap<u64, u8>>,
    }

    impl FakeBackend {
        fn new() -> Self {
            let mut memory = StdHashMap::new();
            for off in 0..0x10000u64 {
                memory.insert(off, 0x90);
            }
            FakeBackend {
                memory: RefCell::new(memory),
            }
        }
    }

    impl NativeBackend for FakeBackend {
        fn do_launch(
            &mut self,
            _executable: &std::path::Path,
            _info: &LaunchInfo,
        ) -> Result<nix::unistd::Pid> {
            unimplemented!()
        }
        fn do_attach_pid(&mut self, _pid: nix::unistd::Pid) -> Result<()> {
            unimplemented!()
        }
        fn do_resume(&mut self, _actions: &[crate::backend::ResumeAction]) -> Result<()> {
            unimplemented!()
        }
        fn do_halt(&mut self) -> Result<bool> {
            unimplemented!()
        }
        fn do_detach(&mut self) -> Result<()> {
            unimplemented!()
        }
        fn do_destroy(&mut self) -> Result<()> {
            unimplemented!()
        }
        fn do_signal(&mut self, _signo: i32) -> Result<()> {
            unimplemented!()
        }
        fn wait_for_stop(&mut self) -> Result<Option<BackendStopEvent>> {
            unimplemented!()
        }
        fn read_memory(&self, addr: Address, len: usize) -> Result<Vec<u8>> {
            let memory = self.memory.borrow();
            Ok((0..len as u64)
                .map(|i| *memory.get(&(addr.offset() + i)).unwrap_or(&0))
                .collect())
        }
        fn write_memory(&self, addr: Address, bytes: &[u8]) -> Result<()> {
            let mut memory = self.memory.borrow_mut();
            for (i, b) in bytes.iter().enumerate() {
                memory.insert(addr.offset() + i as u64, *b);
            }
            Ok(())
        }
        fn update_thread_list(&self) -> Result<Vec<ObservedThread>> {
            Ok(Vec::new())
        }
        fn pid(&self) -> Option<nix::unistd::Pid> {
            None
        }
    }

    fn new_backend() -> FakeBackend {
        FakeBackend::new()
    }

    #[test]
    fn two_breakpoints_at_same_address_share_one_site() {
        let mut list = BreakpointSiteList::new();
        let addr = Address::absolute(0x1000);
        let bp1 = list.create(addr, SiteKind::Software);
        let bp2 = list.create(addr, SiteKind::Software);

        let site1 = list.breakpoint(bp1).unwrap().locations[0];
        let site2 = list.breakpoint(bp2).unwrap().locations[0];
        assert_eq!(
            list.locations.get(&site1).unwrap().site,
            list.locations.get(&site2).unwrap().site
        );
    }

    #[test]
    fn removing_last_owner_drops_the_site() {
        let mut list = BreakpointSiteList::new();
        let addr = Address::absolute(0x2000);
        let bp = list.create(addr, SiteKind::Software);
        let mut backend = new_backend();

        list.enable(bp, &mut backend).unwrap();
        assert!(list.site_at(addr).is_some());
        list.remove(bp, &mut backend).unwrap();
        assert!(list.site_at(addr).is_none());
    }
}
