//! Per-inferior-thread state and the process-wide thread list
//! (spec.md §3 `Thread`, §4.7 `Thread List`).

use std::collections::HashMap;

use nix::sys::signal::Signal;
use nix::unistd::Pid;

use crate::backend::NativeBackend;
use crate::error::{DebugError, Result};
use crate::registers::RegisterSnapshot;
use crate::stoppoint::StoppointId;

/// Thread id as the native OS reports it (on Linux, an LWP id; equal to
/// the process pid for the sole thread of a single-threaded inferior).
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Ord, PartialOrd)]
pub struct ThreadId(pub i32);

impl From<Pid> for ThreadId {
    fn from(pid: Pid) -> Self {
        ThreadId(pid.as_raw())
    }
}

impl ThreadId {
    pub fn as_pid(&self) -> Pid {
        Pid::from_raw(self.0)
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum ThreadState {
    Stopped,
    Running,
    Stepping,
    Crashed,
    Exited,
    Suspended,
    Detached,
    Unloaded,
}

/// Why a thread most recently stopped.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum StopReason {
    Breakpoint(StoppointId),
    Watchpoint(StoppointId),
    StepComplete,
    Signaled(i32),
    Exited(i32),
    /// Stopped for a reason the backend reported but the core did not
    /// attribute to a known site (e.g. an externally sent signal).
    Signal(i32),
}

/// Per-thread intent for the next resume (spec.md §3 `Thread`,
/// "Run action"). Consumed on each resume and reset to `Resume`.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum RunActionKind {
    Resume,
    Step,
    Suspend,
}

#[derive(Copy, Clone, Debug)]
pub struct PendingRunAction {
    pub kind: RunActionKind,
    pub inject_signal: Option<Signal>,
    pub pc_override: Option<u64>,
}

impl Default for PendingRunAction {
    fn default() -> Self {
        PendingRunAction {
            kind: RunActionKind::Resume,
            inject_signal: None,
            pc_override: None,
        }
    }
}

pub struct Thread {
    tid: ThreadId,
    index_id: u32,
    state: ThreadState,
    stop_info: Option<StopReason>,
    registers: Option<RegisterSnapshot>,
    pending_run_action: PendingRunAction,
    dispatch_queue_name: Option<String>,
    name: Option<String>,
    /// Expedited PC reported alongside the last stop, so a PC read
    /// doesn't require a full register round-trip (spec.md §4.7).
    expedited_pc: Option<u64>,
}

impl Thread {
    fn new(tid: ThreadId, index_id: u32) -> Self {
        Thread {
            tid,
            index_id,
            state: ThreadState::Stopped,
            stop_info: None,
            registers: None,
            pending_run_action: PendingRunAction::default(),
            dispatch_queue_name: None,
            name: None,
            expedited_pc: None,
        }
    }

    pub fn tid(&self) -> ThreadId {
        self.tid
    }

    pub fn index_id(&self) -> u32 {
        self.index_id
    }

    pub fn state(&self) -> ThreadState {
        self.state
    }

    pub fn set_state(&mut self, state: ThreadState) {
        self.state = state;
    }

    pub fn stop_reason(&self) -> Option<StopReason> {
        self.stop_info
    }

    pub fn set_stop_reason(&mut self, reason: Option<StopReason>) {
        self.stop_info = reason;
    }

    pub fn registers(&self) -> Option<&RegisterSnapshot> {
        self.registers.as_ref()
    }

    pub fn registers_mut(&mut self) -> Option<&mut RegisterSnapshot> {
        self.registers.as_mut()
    }

    pub fn set_registers(&mut self, snapshot: RegisterSnapshot) {
        self.registers = Some(snapshot);
    }

    pub fn pending_run_action(&self) -> PendingRunAction {
        self.pending_run_action
    }

    pub fn set_pending_run_action(&mut self, action: PendingRunAction) {
        self.pending_run_action = action;
    }

    /// Consume and reset the pending run action to the default
    /// `Resume` (spec.md §4.6: "resets every thread's
    /// `pending_run_action` to `resume`").
    pub fn take_pending_run_action(&mut self) -> PendingRunAction {
        std::mem::take(&mut self.pending_run_action)
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn set_name(&mut self, name: Option<String>) {
        self.name = name;
    }

    pub fn dispatch_queue_name(&self) -> Option<&str> {
        self.dispatch_queue_name.as_deref()
    }

    pub fn expedited_pc(&self) -> Option<u64> {
        self.expedited_pc
    }
}

/// Snapshot-synchronised set of live threads (spec.md §4.7).
pub struct ThreadList {
    threads: HashMap<ThreadId, Thread>,
    stop_id: u64,
    next_index_id: u32,
}

impl ThreadList {
    pub fn new() -> Self {
        ThreadList {
            threads: HashMap::new(),
            stop_id: 0,
            next_index_id: 1,
        }
    }

    pub fn stop_id(&self) -> u64 {
        self.stop_id
    }

    pub fn get(&self, tid: ThreadId) -> Option<&Thread> {
        self.threads.get(&tid)
    }

    pub fn get_mut(&mut self, tid: ThreadId) -> Option<&mut Thread> {
        self.threads.get_mut(&tid)
    }

    pub fn expect(&self, tid: ThreadId) -> Result<&Thread> {
        self.get(tid)
            .ok_or(DebugError::UnknownThread(tid.0))
    }

    pub fn expect_mut(&mut self, tid: ThreadId) -> Result<&mut Thread> {
        self.get_mut(tid)
            .ok_or(DebugError::UnknownThread(tid.0))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Thread> {
        self.threads.values()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Thread> {
        self.threads.values_mut()
    }

    pub fn len(&self) -> usize {
        self.threads.len()
    }

    pub fn is_empty(&self) -> bool {
        self.threads.is_empty()
    }

    /// The first thread observed; a reasonable "current thread" default
    /// for single-threaded inferiors and for callers that haven't
    /// picked a thread explicitly.
    pub fn first(&self) -> Option<&Thread> {
        self.threads.values().min_by_key(|t| t.index_id())
    }

    /// Re-query the backend for the live tid set if the process has
    /// stopped since the list was last refreshed, reusing existing
    /// [`Thread`] objects whose tid is still present, creating new ones,
    /// and dropping tids no longer reported (spec.md §4.7).
    pub fn update_if_needed(
        &mut self,
        backend: &dyn NativeBackend,
        process_stop_id: u64,
    ) -> Result<()> {
        if self.stop_id == process_stop_id {
            return Ok(());
        }

        let live = backend.update_thread_list()?;
        let live_ids: std::collections::HashSet<ThreadId> = live.iter().map(|t| t.tid).collect();

        self.threads.retain(|tid, _| live_ids.contains(tid));

        for observed in live {
            if !self.threads.contains_key(&observed.tid) {
                let index_id = self.next_index_id;
                self.next_index_id += 1;
                self.threads
                    .insert(observed.tid, Thread::new(observed.tid, index_id));
            }
            let thread = self.threads.get_mut(&observed.tid).expect("just inserted");
            thread.set_state(ThreadState::Stopped);
            thread.expedited_pc = observed.expedited_pc;
        }

        self.stop_id = process_stop_id;
        Ok(())
    }
}

impl Default for ThreadList {
    fn default() -> Self {
        Self::new()
    }
}

/// What the backend reports for a single live thread when asked to
/// enumerate them (spec.md §4.7: "expected to include an expedited
/// register subset (at minimum PC)").
pub struct ObservedThread {
    pub tid: ThreadId,
    pub expedited_pc: Option<u64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pending_run_action_defaults_to_resume() {
        let mut thread = Thread::new(ThreadId(100), 1);
        thread.set_pending_run_action(PendingRunAction {
            kind: RunActionKind::Step,
            inject_signal: None,
            pc_override: None,
        });
        let taken = thread.take_pending_run_action();
        assert_eq!(taken.kind, RunActionKind::Step);
        assert_eq!(thread.pending_run_action().kind, RunActionKind::Resume);
    }
}
