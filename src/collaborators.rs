//! External collaborator contracts (spec.md §6).
//!
//! The engine treats symbol resolution, dynamic-loader bookkeeping,
//! stack unwinding and CLI/scripting front ends as out of scope; this
//! module defines only the narrow traits the core calls into so those
//! concerns can be implemented and swapped independently, grounded on
//! how `original_source/include/lldb/Target/Process.h` keeps the
//! dynamic loader and unwinder as collaborators `Process` calls into
//! rather than owns, and on `original_source/source/Symbol/UnwindPlan.cpp`
//! for the shape of what an unwinder hands back per frame.

use crate::address::{Address, Section};
use crate::error::Result;
use crate::signals::UnixSignalTable;

/// The static image(s) making up the debuggee: section layout and
/// symbol-free name/address facts the core needs (e.g. to locate an
/// entry point). Everything else (DWARF, line tables, expression
/// evaluation) lives entirely outside the core.
pub trait Target: Send + Sync {
    /// All sections across every loaded module, in load order.
    fn sections(&self) -> Vec<&Section>;

    /// Resolve a bare numeric address (as the user typed it) into a
    /// section-qualified [`Address`], if it falls inside a known
    /// section.
    fn resolve(&self, raw_address: u64) -> Option<Address>;

    /// The executable's designated entry point, if known.
    fn entry_point(&self) -> Option<Address>;
}

/// A target double good enough for unit tests: one absolute,
/// section-free address space.
pub struct StaticTarget;

impl Target for StaticTarget {
    fn sections(&self) -> Vec<&Section> {
        Vec::new()
    }

    fn resolve(&self, raw_address: u64) -> Option<Address> {
        Some(Address::absolute(raw_address))
    }

    fn entry_point(&self) -> Option<Address> {
        None
    }
}

/// Notified as modules are mapped/unmapped so section load addresses
/// can be kept current (spec.md §6: "the core never parses auxiliary
/// vectors or `/proc/<pid>/maps` itself").
pub trait DynamicLoaderPlugin: Send {
    /// Called once per stop; implementations typically diff the
    /// inferior's loaded-module list and call `Section::set_load_base`
    /// on anything that changed.
    fn refresh(&mut self, backend_pid: Option<nix::unistd::Pid>) -> Result<()>;
}

/// A loader that never reports any modules; used when a caller has no
/// dynamic loading to track (statically linked inferiors, tests).
pub struct NullDynamicLoader;

impl DynamicLoaderPlugin for NullDynamicLoader {
    fn refresh(&mut self, _backend_pid: Option<nix::unistd::Pid>) -> Result<()> {
        Ok(())
    }
}

/// One unwound stack frame's essentials; anything richer (inlined
/// frames, variable locations) is a symbol-layer concern.
#[derive(Copy, Clone, Debug)]
pub struct UnwoundFrame {
    pub pc: u64,
    pub cfa: u64,
}

/// Produces a call stack from a register snapshot. The core calls this
/// only to decide things like "did this step land back in the caller",
/// never to render a backtrace itself.
pub trait UnwinderPlugin: Send {
    fn unwind(&self, pc: u64, sp: u64, fp: u64) -> Result<Vec<UnwoundFrame>>;
}

/// A frame-pointer-only unwinder: good enough for the core's own
/// "did we return to the caller" checks on `x86_64` with frame pointers
/// retained, without depending on a DWARF CFI reader.
pub struct FramePointerUnwinder;

impl UnwinderPlugin for FramePointerUnwinder {
    fn unwind(&self, pc: u64, sp: u64, fp: u64) -> Result<Vec<UnwoundFrame>> {
        let mut frames = vec![UnwoundFrame { pc, cfa: sp }];
        if fp != 0 {
            frames.push(UnwoundFrame { pc: 0, cfa: fp });
        }
        Ok(frames)
    }
}

/// Re-exported so callers only need `collaborators::SignalTable` rather
/// than reaching into `crate::signals` directly.
pub type SignalTable = UnixSignalTable;
