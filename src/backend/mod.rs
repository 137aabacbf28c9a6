//! Platform-plugin abstraction (spec.md §4.5).
//!
//! The teacher talks to `nix::ptrace`/`nix::sys::wait` directly inside
//! `Process`. Per the re-architecture note in spec.md §9 ("deep
//! inheritance / plug-in interface... replace with a single explicit
//! trait per plug-in family"), that OS-specific code is lifted behind
//! [`NativeBackend`] so `Process` is written once against a trait object
//! and a new platform only has to add a new implementation of it.

pub mod ptrace_linux;

use nix::sys::signal::Signal;
use nix::unistd::Pid;

use crate::address::Address;
use crate::error::Result;
use crate::stoppoint::breakpoint_site::BreakpointSite;
use crate::stoppoint::watchpoint::WatchpointLocation;
use crate::thread::ObservedThread;

/// Arguments needed to launch a fresh inferior (spec.md §4.5
/// `do_launch`).
#[derive(Clone, Debug, Default)]
pub struct LaunchInfo {
    pub args: Vec<String>,
    pub env: Option<Vec<(String, String)>>,
    pub cwd: Option<std::path::PathBuf>,
    pub aslr: Aslr,
    pub stdio: StdioMode,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Default)]
pub enum Aslr {
    #[default]
    Enabled,
    Disabled,
}

/// How the inferior's stdio is wired up. The teacher always allocates a
/// PTY (`process/mod.rs::launch_executable`); `Inherit` is useful for
/// tests that want to let output flow straight to the test harness.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Default)]
pub enum StdioMode {
    #[default]
    Pty,
    Inherit,
}

/// A capability the backend may or may not implement; lets the core
/// fall back to its own software implementation (spec.md §4.5:
/// "`enable_breakpoint_site` ... may fall back to the core's
/// software-breakpoint implementation by returning a distinguished
/// 'unsupported' status").
#[derive(Debug)]
pub enum BackendSupport<T> {
    Handled(T),
    Unsupported,
}

/// Outcome of a resume request for one thread (spec.md §4.5
/// `will_resume`/`do_resume`, consuming `pending_run_action`).
#[derive(Copy, Clone, Debug)]
pub struct ResumeAction {
    pub tid: crate::thread::ThreadId,
    pub kind: crate::thread::RunActionKind,
    pub inject_signal: Option<Signal>,
}

/// A single low-level stop reported by the backend's listener thread,
/// translated by `Process`'s private-state thread into thread state/
/// stop-reason updates (spec.md §4.6 "Stop handling").
#[derive(Clone, Debug)]
pub enum BackendStopEvent {
    Stopped {
        tid: crate::thread::ThreadId,
        signal: i32,
    },
    Exited {
        tid: crate::thread::ThreadId,
        exit_code: i32,
    },
    Signaled {
        tid: crate::thread::ThreadId,
        signal: i32,
    },
}

/// The OS-specific half of process control. One implementation per
/// platform; `jdb-core` ships [`ptrace_linux::PtraceBackend`].
pub trait NativeBackend: Send {
    fn can_debug(&self) -> bool {
        cfg!(target_os = "linux")
    }

    // -- lifecycle -----------------------------------------------------
    fn do_launch(&mut self, executable: &std::path::Path, info: &LaunchInfo) -> Result<Pid>;
    fn do_attach_pid(&mut self, pid: Pid) -> Result<()>;
    fn do_resume(&mut self, actions: &[ResumeAction]) -> Result<()>;
    /// Returns true iff the halt actually caused a stop (spec.md §4.5:
    /// "must emit exactly one stop event iff the halt actually stopped
    /// the inferior").
    fn do_halt(&mut self) -> Result<bool>;
    fn do_detach(&mut self) -> Result<()>;
    fn do_destroy(&mut self) -> Result<()>;
    fn do_signal(&mut self, signo: i32) -> Result<()>;

    /// Block for the next low-level stop. Called from the
    /// private-state thread; `None` means the backend has no more
    /// events to deliver (the inferior is gone).
    fn wait_for_stop(&mut self) -> Result<Option<BackendStopEvent>>;

    // -- memory ----------------------------------------------------------
    fn max_chunk(&self) -> usize {
        4096
    }
    fn read_memory(&self, addr: Address, len: usize) -> Result<Vec<u8>>;
    fn write_memory(&self, addr: Address, bytes: &[u8]) -> Result<()>;
    fn allocate_memory(&mut self, _size: usize, _perms: MemoryPerms) -> Result<Address> {
        Err(crate::error::DebugError::NotSupported(
            "allocate_memory".into(),
        ))
    }
    fn deallocate_memory(&mut self, _addr: Address) -> Result<()> {
        Err(crate::error::DebugError::NotSupported(
            "deallocate_memory".into(),
        ))
    }

    // -- breakpoints / watchpoints ---------------------------------------
    fn enable_breakpoint(&mut self, _site: &BreakpointSite) -> Result<BackendSupport<()>> {
        Ok(BackendSupport::Unsupported)
    }
    fn disable_breakpoint(&mut self, _site: &BreakpointSite) -> Result<BackendSupport<()>> {
        Ok(BackendSupport::Unsupported)
    }
    fn enable_watchpoint(&mut self, _loc: &WatchpointLocation) -> Result<BackendSupport<()>> {
        Ok(BackendSupport::Unsupported)
    }
    fn disable_watchpoint(&mut self, _loc: &WatchpointLocation) -> Result<BackendSupport<()>> {
        Ok(BackendSupport::Unsupported)
    }
    /// Which hardware watchpoint slot (if any) last trapped, per the
    /// status register DR7's enable bits index into (spec.md §4.5: the
    /// core must be able to attribute a watchpoint stop to the specific
    /// watchpoint that fired, not just "some enabled watchpoint").
    /// Backends with no hardware watchpoint support simply never trap
    /// this way, so the default is always correct for them.
    fn triggered_watchpoint_slot(&self) -> Result<Option<u8>> {
        Ok(None)
    }

    // -- threads -----------------------------------------------------------
    fn update_thread_list(&self) -> Result<Vec<ObservedThread>>;
    fn refresh_state_after_stop(&mut self) -> Result<()> {
        Ok(())
    }

    // -- misc --------------------------------------------------------------
    fn get_image_info_address(&self) -> Option<Address> {
        None
    }
    /// Drain bytes captured from the inferior's stdout (merged with
    /// stderr when the backend only allocated a single PTY) since the
    /// last call.
    fn take_stdout(&mut self) -> Vec<u8> {
        Vec::new()
    }
    fn stdin_put(&mut self, _bytes: &[u8]) -> Result<()> {
        Err(crate::error::DebugError::NotSupported("stdin_put".into()))
    }

    fn pid(&self) -> Option<Pid>;
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct MemoryPerms {
    pub read: bool,
    pub write: bool,
    pub exec: bool,
}
