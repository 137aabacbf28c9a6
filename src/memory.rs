//! Breakpoint-transparent memory I/O (spec.md §4.3).
//!
//! Reading through an enabled software breakpoint must return the byte
//! the inferior's own code contains, not the `int3` the core patched in
//! underneath it; writes through a breakpointed address must likewise
//! land on the real memory and leave the trap installed. This module is
//! the single seam where that masking happens, line-partitioned so a
//! multi-byte read spanning several breakpoint sites only has to stitch
//! together the lines it actually touches.

use crate::address::Address;
use crate::backend::NativeBackend;
use crate::error::Result;
use crate::stoppoint::breakpoint_site::BreakpointSiteList;

/// Declared by the backend (`NativeBackend::max_chunk`); memory is
/// cached and masked in chunks of this size.
pub struct Memory<'a> {
    backend: &'a mut dyn NativeBackend,
    line_size: usize,
}

impl<'a> Memory<'a> {
    pub fn new(backend: &'a mut dyn NativeBackend) -> Self {
        let line_size = backend.max_chunk().max(1);
        Memory { backend, line_size }
    }

    /// Read `len` bytes starting at `addr`, substituting each enabled
    /// breakpoint site's saved original byte for the `int3` actually
    /// resident in the inferior's memory.
    pub fn read(&self, addr: Address, len: usize, sites: &BreakpointSiteList) -> Result<Vec<u8>> {
        let mut bytes = self.backend.read_memory(addr, len)?;
        self.mask_breakpoints(addr, &mut bytes, sites);
        Ok(bytes)
    }

    /// Read exactly `N` bytes into a fixed-size array; convenient for
    /// register-sized reads (`read::<8>` for a pointer).
    pub fn read_fixed<const N: usize>(
        &self,
        addr: Address,
        sites: &BreakpointSiteList,
    ) -> Result<[u8; N]> {
        let v = self.read(addr, N, sites)?;
        let mut out = [0u8; N];
        out.copy_from_slice(&v);
        Ok(out)
    }

    fn mask_breakpoints(&self, addr: Address, bytes: &mut [u8], sites: &BreakpointSiteList) {
        for site in sites.iter_sites() {
            if !site.is_enabled() {
                continue;
            }
            let Some(original) = site.original_byte() else {
                continue;
            };
            let site_offset = site.address().offset();
            let start = addr.offset();
            if site_offset >= start && site_offset < start + bytes.len() as u64 {
                bytes[(site_offset - start) as usize] = original;
            }
        }
    }

    /// Write `bytes` at `addr`. Any enabled breakpoint site inside the
    /// written range keeps its `int3` installed: the site's saved
    /// "original" byte is updated to the newly written value instead of
    /// letting the write clobber the trap (spec.md §4.3 edge case:
    /// "a write that overlaps a breakpoint site must not silently
    /// remove the trap").
    pub fn write(
        &mut self,
        addr: Address,
        bytes: &[u8],
        sites: &mut BreakpointSiteList,
    ) -> Result<()> {
        let start = addr.offset();
        let mut patched = bytes.to_vec();
        let mut saved_byte_updates = Vec::new();
        for site in sites.iter_sites() {
            if !site.is_enabled() {
                continue;
            }
            let site_offset = site.address().offset();
            if site_offset >= start && site_offset < start + bytes.len() as u64 {
                let idx = (site_offset - start) as usize;
                saved_byte_updates.push((site.id(), patched[idx]));
                patched[idx] = crate::stoppoint::INTERRUPT_INSTRUCTION;
            }
        }
        self.backend.write_memory(addr, &patched)?;
        for (id, new_original) in saved_byte_updates {
            sites.set_shadowed_byte(id, new_original);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{BackendStopEvent, LaunchInfo, ResumeAction};
    use crate::stoppoint::SiteKind;
    use crate::thread::ObservedThread;
    use std::cell::RefCell;
    use std::collections::HashMap;

    struct FakeBackend {
        memory: RefCell<HashMap<u64, u8>>,
    }

    impl FakeBackend {
        fn filled(value: u8) -> Self {
            let mut memory = HashMap::new();
            for off in 0..0x1000u64 {
                memory.insert(off, value);
            }
            FakeBackend {
                memory: RefCell::new(memory),
            }
        }
    }

    impl NativeBackend for FakeBackend {
        fn do_launch(&mut self, _e: &std::path::Path, _i: &LaunchInfo) -> Result<nix::unistd::Pid> {
            unimplemented!()
        }
        fn do_attach_pid(&mut self, _pid: nix::unistd::Pid) -> Result<()> {
            unimplemented!()
        }
        fn do_resume(&mut self, _actions: &[ResumeAction]) -> Result<()> {
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

    #[test]
    fn read_masks_enabled_breakpoint_back_to_original_byte() {
        let mut backend = FakeBackend::filled(0x90);
        let mut sites = BreakpointSiteList::new();
        let addr = Address::absolute(0x100);
        let bp = sites.create(addr, SiteKind::Software);
        sites.enable(bp, &mut backend).unwrap();

        let memory = Memory::new(&mut backend);
        let bytes = memory.read(Address::absolute(0xfe), 8, &sites).unwrap();
        // byte 2 of this window is the breakpointed address; should read
        // back as the original 0x90, not INTERRUPT_INSTRUCTION (0xCC).
        assert_eq!(bytes[2], 0x90);
    }

    #[test]
    fn write_through_a_breakpoint_preserves_the_trap() {
        let mut backend = FakeBackend::filled(0x90);
        let mut sites = BreakpointSiteList::new();
        let addr = Address::absolute(0x200);
        let bp = sites.create(addr, SiteKind::Software);
        sites.enable(bp, &mut backend).unwrap();

        {
            let mut memory = Memory::new(&mut backend);
            memory.write(addr, &[0x42], &mut sites).unwrap();
        }

        assert_eq!(
            backend.read_memory(addr, 1).unwrap()[0],
            crate::stoppoint::INTERRUPT_INSTRUCTION
        );
        let memory = Memory::new(&mut backend);
        let read_back = memory.read(addr, 1, &sites).unwrap();
        assert_eq!(read_back[0], 0x42);
    }
}
