//! The inferior-control engine's top-level orchestrator (spec.md §4.6).
//!
//! Grounded on the teacher's `Process`/`Inferior` pair, generalized from
//! "one hardcoded ptrace-controlled child" into an owner of a
//! [`NativeBackend`] trait object plus the [`ThreadList`],
//! [`BreakpointSiteList`] and [`WatchpointList`] that used to be
//! scattered across `Process`, `Inferior` and `stoppoint`.

use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;

use crossbeam_channel::{Receiver, Sender};
use nix::sys::signal::Signal;
use nix::unistd::Pid;
use tracing::trace;

use crate::address::Address;
use crate::backend::ptrace_linux::PtraceBackend;
use crate::backend::{
    BackendStopEvent, LaunchInfo, MemoryPerms, NativeBackend, ResumeAction, StdioMode,
};
use crate::collaborators::{DynamicLoaderPlugin, NullDynamicLoader, StaticTarget, Target};
use crate::debugger::{BreakpointCommand, WatchpointCommand};
use crate::error::{DebugError, Result};
use crate::event::{Broadcaster, EventMask, EventPayload, Listener, StopReasonSummary};
use crate::memory::Memory;
use crate::options::{LaunchType, Options};
use crate::register_info::{Register, RegisterValue};
use crate::registers::{RegisterContext, read_all_registers};
use crate::signals::UnixSignalTable;
use crate::stoppoint::breakpoint_site::{BreakpointSite, BreakpointSiteList};
use crate::stoppoint::watchpoint::WatchpointList;
use crate::stoppoint::{BreakpointId, SiteKind, StoppointId};
use crate::thread::{RunActionKind, StopReason, Thread, ThreadId, ThreadList, ThreadState};

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum ProcessState {
    /// Debugger hasn't attached to or launched the inferior process, so
    /// we don't know its state yet.
    Unknown,
    /// The inferior process is stopped, awaiting a nudge from the
    /// debugger.
    Stopped,
    Running,
    /// The inferior process exited normally.
    Exited,
    /// The inferior process terminated, either by signal or force.
    Terminated,
}

/// A queued broadcast, fanned out to every listener by the dedicated
/// background thread rather than inline on whichever thread drove the
/// state transition that produced it. This is the literal "event
/// queue" spec.md §1/§4.6 describes: fan-out to a potentially large
/// and potentially slow set of listeners must never be allowed to
/// block the thread advancing the state machine.
struct QueuedBroadcast {
    mask: EventMask,
    payload: EventPayload,
    unique: bool,
}

/// The primary struct containing information about the process being
/// debugged.
///
/// `private_state` is this struct's own authoritative, synchronously
/// updated notion of where the inferior is — every method here that
/// needs to make a decision (`resume`'s "are we even attached",
/// `halt`'s "is it worth halting") reads it directly and never blocks.
/// `public_state` is the same value, committed to an `Arc<Mutex<_>>` in
/// the same call that sets `private_state` so a client observing it
/// (the TUI, tests) never sees a state `private_state` has not already
/// been in (spec.md §8 "state-machine monotonicity") and never races
/// the commit itself. The two remain distinct cells — rather than one
/// shared `Arc<Mutex<ProcessState>>` — because `public_state` is the
/// only half any other thread may ever touch; `private_state` stays a
/// plain field only the thread driving `Process`'s public API reads,
/// matching the constraint that every Linux `ptrace` request must come
/// from the thread that attached. What *is* handed off to a dedicated
/// background thread is the event queue: broadcasting to listeners is
/// decoupled from the state commit via `broadcast_tx`/the spawned
/// thread draining it, so a slow or misbehaving listener can never
/// stall `resume`/`wait_for_stop`.
pub struct Process {
    cli_options: Options,
    private_state: ProcessState,
    public_state: Arc<Mutex<ProcessState>>,
    broadcast_tx: Sender<QueuedBroadcast>,
    state_thread: Option<JoinHandle<()>>,
    backend: Box<dyn NativeBackend>,
    threads: ThreadList,
    breakpoints: BreakpointSiteList,
    watchpoints: WatchpointList,
    signals: UnixSignalTable,
    target: Box<dyn Target>,
    dynamic_loader: Box<dyn DynamicLoaderPlugin>,
    events: Broadcaster,
    /// Captured stdout/stderr from the inferior process. Kept here
    /// rather than on the backend so the TUI's log pane still has
    /// something to show after the inferior has exited.
    inferior_output: Vec<String>,
    /// Forwarded a copy of every inferior output line as it arrives;
    /// kept for constructor compatibility with the `main.rs` event loop.
    inferior_tx: Sender<String>,
    shutdown_rx: Receiver<()>,
    stop_id: u64,
    last_exit_code: Option<i32>,
    /// Set by [`Self::halt`] just before it requests the stop; consumed
    /// by the next surfaced stop event so that event (and only that
    /// one) carries `interrupted: true` (spec.md §8 scenario 4/5).
    pending_interrupt: bool,
}

impl Process {
    pub fn new(cli_options: Options, inferior_tx: Sender<String>, shutdown_rx: Receiver<()>) -> Self {
        let public_state = Arc::new(Mutex::new(ProcessState::Unknown));
        let events = Broadcaster::new("process");
        let (broadcast_tx, broadcast_rx) = crossbeam_channel::unbounded::<QueuedBroadcast>();
        let state_thread = std::thread::spawn({
            let events = events.clone();
            move || {
                while let Ok(queued) = broadcast_rx.recv() {
                    events.broadcast(queued.mask, queued.payload, queued.unique);
                }
            }
        });

        Process {
            cli_options,
            private_state: ProcessState::Unknown,
            public_state,
            broadcast_tx,
            state_thread: Some(state_thread),
            backend: Box::new(PtraceBackend::new()),
            threads: ThreadList::new(),
            breakpoints: BreakpointSiteList::new(),
            watchpoints: WatchpointList::new(),
            signals: UnixSignalTable::new(),
            target: Box::new(StaticTarget),
            dynamic_loader: Box::new(NullDynamicLoader),
            events,
            inferior_output: Vec::new(),
            inferior_tx,
            shutdown_rx,
            stop_id: 0,
            last_exit_code: None,
            pending_interrupt: false,
        }
    }

    pub fn new_listener(&self, mask: EventMask) -> Listener {
        self.events.new_listener(mask)
    }

    /// The publicly-visible state. Always equal to `private_state` at
    /// the moment either was last set — the two are committed together
    /// — but exposed through its own `Arc<Mutex<_>>` cell because it's
    /// the half other threads are allowed to read.
    pub fn state(&self) -> ProcessState {
        *self.public_state.lock().unwrap()
    }

    /// Move to `new_state` immediately, on both cells.
    fn set_state(&mut self, new_state: ProcessState) {
        self.private_state = new_state;
        *self.public_state.lock().unwrap() = new_state;
    }

    /// Like [`Self::set_state`], but also hands a broadcast to the
    /// background thread so listener fan-out never blocks this call.
    fn set_state_and_broadcast(
        &mut self,
        new_state: ProcessState,
        mask: EventMask,
        payload: EventPayload,
        unique: bool,
    ) {
        self.set_state(new_state);
        let _ = self.broadcast_tx.send(QueuedBroadcast { mask, payload, unique });
    }

    pub fn pid(&self) -> Option<Pid> {
        self.backend.pid()
    }

    fn expect_pid(&self) -> Result<Pid> {
        self.pid()
            .ok_or_else(|| DebugError::invalid_state("no inferior attached"))
    }

    /// Launch (or attach to) the inferior per `--pid`/`--name`/bare
    /// executable, matching whichever `launch_type` the CLI resolved
    /// (spec.md §4.6).
    pub fn attach(&mut self, args: Vec<String>) -> Result<()> {
        match self.cli_options.launch_type() {
            LaunchType::Launch => self.launch(args),
            LaunchType::AttachPid(pid) => self.attach_pid(Pid::from_raw(pid)),
            LaunchType::AttachName(name) => self.attach_name(&name),
        }
    }

    /// Spawn a fresh inferior for the configured executable.
    pub fn launch(&mut self, args: Vec<String>) -> Result<()> {
        trace!(executable = ?self.cli_options.executable, "spawning inferior");
        self.inferior_output.clear();

        let info = LaunchInfo {
            args,
            env: None,
            cwd: None,
            aslr: self.cli_options.aslr(),
            stdio: StdioMode::Pty,
        };
        self.backend
            .do_launch(self.cli_options.executable.as_path(), &info)?;
        self.set_state(ProcessState::Running);

        // The traceme-induced SIGTRAP at exec is the first stop; consume
        // it before handing control back so every stop the caller sees
        // from here on is a real one.
        self.wait_for_stop()?;

        // Now that the inferior exists, actually install any breakpoint
        // that was created (and marked enabled) before it did.
        for id in self.breakpoints.enabled_breakpoint_ids() {
            self.breakpoints.enable(id, self.backend.as_mut())?;
        }

        Ok(())
    }

    pub fn attach_pid(&mut self, pid: Pid) -> Result<()> {
        self.inferior_output.clear();
        self.backend.do_attach_pid(pid)?;
        self.set_state(ProcessState::Running);
        self.wait_for_stop()?;
        Ok(())
    }

    /// Resolve `name` against every numeric entry under `/proc` and
    /// attach to the first whose `comm` matches exactly (spec.md §4.6
    /// `attach_name`; Open Question resolved in favor of an exact name
    /// match rather than a substring one).
    pub fn attach_name(&mut self, name: &str) -> Result<()> {
        let pid = find_pid_by_name(name)
            .ok_or_else(|| DebugError::invalid_state(format!("no process named {name:?}")))?;
        self.attach_pid(pid)
    }

    pub fn resume(&mut self) -> Result<()> {
        if !matches!(
            self.private_state,
            ProcessState::Stopped | ProcessState::Running
        ) {
            return Err(DebugError::invalid_state(
                "inferior process not being debugged",
            ));
        }

        self.step_over_any_breakpoint_at_pc()?;

        let actions: Vec<ResumeAction> = self
            .threads
            .iter_mut()
            .map(|t| {
                let pending = t.take_pending_run_action();
                ResumeAction {
                    tid: t.tid(),
                    kind: pending.kind,
                    inject_signal: pending.inject_signal,
                }
            })
            .collect();

        self.backend.do_resume(&actions)?;
        self.set_state_and_broadcast(
            ProcessState::Running,
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
        Ok(())
    }

    /// If the thread about to be resumed is sitting exactly on an
    /// enabled breakpoint's address, temporarily pull the trap, single
    /// step past it, and reinstall it before the real resume proceeds
    /// (otherwise the inferior would immediately re-trap on its own
    /// `int3`, spec.md §4.6 "step over breakpoint").
    fn step_over_any_breakpoint_at_pc(&mut self) -> Result<()> {
        let Some(thread) = self.threads.first() else {
            return Ok(());
        };
        let Some(pc) = thread.registers().map(|r| r.pc()) else {
            return Ok(());
        };
        let tid = thread.tid();
        let addr = Address::absolute(pc);

        let Some(site_id) = self
            .breakpoints
            .site_at(addr)
            .filter(|s| s.is_enabled())
            .map(|s| s.id())
        else {
            return Ok(());
        };

        self.patch_site_byte(site_id, true)?;
        self.backend.do_resume(&[ResumeAction {
            tid,
            kind: RunActionKind::Step,
            inject_signal: None,
        }])?;
        self.wait_for_stop()?;
        self.patch_site_byte(site_id, false)?;
        Ok(())
    }

    /// Temporarily swap the byte at an installed site between its
    /// original value (`to_original = true`) and `int3`, without
    /// touching the site's logical enabled/owner bookkeeping.
    fn patch_site_byte(&mut self, id: StoppointId, to_original: bool) -> Result<()> {
        let Some(site) = self.breakpoints.site(id) else {
            return Ok(());
        };
        if !site.is_enabled() {
            return Ok(());
        }
        let addr = site.address();
        let byte = if to_original {
            match site.original_byte() {
                Some(b) => b,
                None => return Ok(()),
            }
        } else {
            crate::stoppoint::INTERRUPT_INSTRUCTION
        };
        self.backend.write_memory(addr, &[byte])
    }

    /// Block for the next backend stop, update thread/register state,
    /// and auto-resume past stops the signal table marks pass-through
    /// (spec.md §4.6, §3 `UnixSignals`). Returns once a client-visible
    /// stop (or exit) has occurred.
    pub fn wait_for_stop(&mut self) -> Result<()> {
        let mut restarted = false;
        loop {
            let Some(event) = self.backend.wait_for_stop()? else {
                self.set_state(ProcessState::Exited);
                return Ok(());
            };

            match event {
                BackendStopEvent::Exited { tid, exit_code } => {
                    self.last_exit_code = Some(exit_code);
                    let interrupted = std::mem::take(&mut self.pending_interrupt);
                    self.set_state_and_broadcast(
                        ProcessState::Exited,
                        EventMask::STATE_CHANGED,
                        EventPayload::StateChanged {
                            new_state: ProcessState::Exited,
                            restarted,
                            interrupted,
                            thread: Some(tid),
                            stop_reason: Some(StopReasonSummary::Exited(exit_code)),
                        },
                        false,
                    );
                    return Ok(());
                }
                BackendStopEvent::Signaled { tid, signal } => {
                    let interrupted = std::mem::take(&mut self.pending_interrupt);
                    self.set_state_and_broadcast(
                        ProcessState::Terminated,
                        EventMask::STATE_CHANGED,
                        EventPayload::StateChanged {
                            new_state: ProcessState::Terminated,
                            restarted,
                            interrupted,
                            thread: Some(tid),
                            stop_reason: Some(StopReasonSummary::Signaled(signal)),
                        },
                        false,
                    );
                    return Ok(());
                }
                BackendStopEvent::Stopped { tid, signal } => {
                    self.private_state = ProcessState::Stopped;
                    self.stop_id += 1;
                    self.threads.update_if_needed(self.backend.as_ref(), self.stop_id)?;
                    self.refresh_registers(tid)?;
                    self.dynamic_loader.refresh(self.backend.pid())?;

                    let stop_reason = self.classify_stop(tid, signal);
                    if let Some(t) = self.threads.get_mut(tid) {
                        t.set_stop_reason(Some(stop_reason));
                        t.set_state(ThreadState::Stopped);
                    }

                    let disposition = self.signals.disposition(signal);
                    if !disposition.should_stop && signal != Signal::SIGTRAP as i32 {
                        // Pass-through signal: quietly resume and keep
                        // waiting rather than surfacing this stop.
                        restarted = true;
                        let inject = if disposition.should_suppress {
                            None
                        } else {
                            Signal::try_from(signal).ok()
                        };
                        self.backend.do_resume(&[ResumeAction {
                            tid,
                            kind: RunActionKind::Resume,
                            inject_signal: inject,
                        }])?;
                        continue;
                    }

                    let summary = summarize(stop_reason);
                    let interrupted = std::mem::take(&mut self.pending_interrupt);
                    self.set_state_and_broadcast(
                        ProcessState::Stopped,
                        EventMask::STATE_CHANGED,
                        EventPayload::StateChanged {
                            new_state: ProcessState::Stopped,
                            restarted,
                            interrupted,
                            thread: Some(tid),
                            stop_reason: summary,
                        },
                        false,
                    );
                    return Ok(());
                }
            }
        }
    }

    fn refresh_registers(&mut self, tid: ThreadId) -> Result<()> {
        let snapshot =
            read_all_registers(tid.as_pid()).map_err(|e| DebugError::backend(e.to_string()))?;
        if let Some(t) = self.threads.get_mut(tid) {
            t.set_registers(snapshot);
        }
        Ok(())
    }

    /// Attribute a `SIGTRAP` stop to a known breakpoint/watchpoint site
    /// if the (rewound) PC lines up with one, else a step-complete or
    /// bare signal.
    fn classify_stop(&mut self, tid: ThreadId, signal: i32) -> StopReason {
        if signal != Signal::SIGTRAP as i32 {
            return StopReason::Signal(signal);
        }

        let Some(thread) = self.threads.get_mut(tid) else {
            return StopReason::Signal(signal);
        };
        let Some(regs) = thread.registers_mut() else {
            return StopReason::StepComplete;
        };
        let pc = regs.pc();
        // x86_64 `int3` leaves PC one past the trap; rewind to the
        // site's own address before looking it up.
        let trap_addr = Address::absolute(pc.wrapping_sub(1));
        if let Some(site_id) = self.breakpoints.resolve_trap(trap_addr) {
            let _ = regs.set_pc(pc.wrapping_sub(1));
            return StopReason::Breakpoint(site_id);
        }
        // A watchpoint trap doesn't move the PC at all; the only way to
        // tell which (if any) debug register actually fired is to ask
        // the backend which hardware slot DR6 reports, then map that
        // slot back to the watchpoint occupying it.
        if let Ok(Some(slot)) = self.backend.triggered_watchpoint_slot()
            && let Some(wp_id) = self.watchpoints.watchpoint_in_slot(slot)
        {
            return StopReason::Watchpoint(StoppointId(wp_id.0));
        }
        StopReason::StepComplete
    }

    /// Request an asynchronous stop of a running inferior and block
    /// until it lands (spec.md §4.6 `halt`).
    pub fn halt(&mut self) -> Result<()> {
        if !matches!(self.private_state, ProcessState::Running) {
            return Ok(());
        }
        let actually_stopped = self.backend.do_halt()?;
        if !actually_stopped {
            return Ok(());
        }
        self.pending_interrupt = true;

        // `wait_for_stop` blocks on the backend's own blocking `waitpid`,
        // which has no timeout knob; there's nothing to bound here beyond
        // what the backend itself offers (spec.md §4.5 `do_halt`).
        self.wait_for_stop()?;

        self.events
            .broadcast(EventMask::INTERRUPT, EventPayload::PromptReset, true);
        Ok(())
    }

    pub fn detach(&mut self) -> Result<()> {
        self.backend.do_detach()?;
        self.set_state(ProcessState::Unknown);
        Ok(())
    }

    pub fn destroy(&mut self) -> Result<()> {
        if !matches!(
            self.private_state,
            ProcessState::Running | ProcessState::Stopped
        ) {
            return Ok(());
        }

        self.backend.do_destroy()?;
        self.set_state(ProcessState::Exited);
        self.events.broadcast_exit();
        Ok(())
    }

    pub fn signal(&mut self, signo: i32) -> Result<()> {
        self.backend.do_signal(signo)
    }

    /// Mutable access to the per-signal stop/notify/suppress table
    /// (spec.md §3 `UnixSignals`), so a client can configure a signal
    /// as pass-through before resuming.
    pub fn signal_table_mut(&mut self) -> &mut UnixSignalTable {
        &mut self.signals
    }

    pub fn read_memory(&mut self, addr: Address, len: usize) -> Result<Vec<u8>> {
        let memory = Memory::new(self.backend.as_mut());
        memory.read(addr, len, &self.breakpoints)
    }

    pub fn write_memory(&mut self, addr: Address, bytes: &[u8]) -> Result<()> {
        let mut memory = Memory::new(self.backend.as_mut());
        memory.write(addr, bytes, &mut self.breakpoints)
    }

    pub fn read_register(&self, register: Register) -> Option<RegisterValue> {
        self.threads
            .first()
            .and_then(|t| t.registers())
            .and_then(|snapshot| RegisterContext::read(snapshot, register).ok())
    }

    pub fn write_register(&mut self, register: Register, value: RegisterValue) -> Result<()> {
        let tid = self
            .threads
            .first()
            .map(|t| t.tid())
            .ok_or_else(|| DebugError::invalid_state("no current thread"))?;
        let thread = self.threads.expect_mut(tid)?;
        let snapshot = thread
            .registers_mut()
            .ok_or_else(|| DebugError::invalid_state("no register snapshot for current thread"))?;
        RegisterContext::write(snapshot, register, value)
    }

    pub fn receive_inferior_logging(&mut self, output: String) {
        output.lines().for_each(|l| {
            if !l.is_empty() {
                self.inferior_output.push(l.to_string());
            }
        });
    }

    /// Pull any bytes the backend's stdout reader has buffered since the
    /// last call into `inferior_output`, forwarding a copy over
    /// `inferior_tx` and to any `STDOUT`-masked listener.
    pub fn drain_inferior_output(&mut self) {
        let bytes = self.backend.take_stdout();
        if bytes.is_empty() {
            return;
        }
        let text = String::from_utf8_lossy(&bytes).into_owned();
        self.receive_inferior_logging(text.clone());
        let _ = self.inferior_tx.send(text);
        self.events
            .broadcast(EventMask::STDOUT, EventPayload::Bytes(bytes), false);
    }

    /// Whether the caller's shutdown channel has fired, for a main loop
    /// wanting to tear the inferior down promptly.
    pub fn shutdown_requested(&self) -> bool {
        self.shutdown_rx.try_recv().is_ok()
    }

    pub fn last_n_log_lines(&self, n: usize) -> &[String] {
        let len = self.inferior_output.len().saturating_sub(n);
        &self.inferior_output[len..]
    }

    pub fn breakpoint_command(&mut self, command: BreakpointCommand) -> Result<()> {
        match command {
            BreakpointCommand::Create(address) => {
                let id = self
                    .breakpoints
                    .create(address.to_address(), SiteKind::Software);
                self.breakpoints.enable(id, self.backend.as_mut())?;
            }
            BreakpointCommand::Delete(id) => {
                self.breakpoints.remove(id, self.backend.as_mut())?;
            }
            BreakpointCommand::Enable(id) => {
                self.breakpoints.enable(id, self.backend.as_mut())?;
            }
            BreakpointCommand::Disable(id) => {
                self.breakpoints.disable(id, self.backend.as_mut())?;
            }
        }
        Ok(())
    }

    pub fn watchpoint_command(&mut self, command: WatchpointCommand) -> Result<()> {
        match command {
            WatchpointCommand::Create(address, kind, size) => {
                let id = self.watchpoints.create(address.to_address(), kind, size);
                self.watchpoints.allocate_slot(id)?;
                if self.backend.pid().is_some() {
                    let location = self.watchpoints.get(id)?;
                    if let crate::backend::BackendSupport::Unsupported =
                        self.backend.enable_watchpoint(location)?
                    {
                        return Err(DebugError::NotSupported(
                            "backend cannot program hardware watchpoints".into(),
                        ));
                    }
                }
            }
            WatchpointCommand::Delete(id) => {
                if self.backend.pid().is_some() {
                    let location = self.watchpoints.get(id)?;
                    self.backend.disable_watchpoint(location)?;
                }
                self.watchpoints.remove(id)?;
            }
        }
        Ok(())
    }

    /// Every thread the backend has last reported (spec.md §6
    /// `get_thread_list`).
    pub fn get_thread_list(&self) -> impl Iterator<Item = &Thread> {
        self.threads.iter()
    }

    /// The stop reason last recorded for `thread`, if any (spec.md §6
    /// `get_stop_info`).
    pub fn get_stop_info(&self, thread: ThreadId) -> Option<StopReason> {
        self.threads.get(thread).and_then(|t| t.stop_reason())
    }

    /// Reserve `size` bytes of executable-debuggee memory through the
    /// backend (spec.md §6 `allocate_memory`).
    pub fn allocate_memory(&mut self, size: usize, perms: MemoryPerms) -> Result<Address> {
        self.backend.allocate_memory(size, perms)
    }

    /// Release memory previously handed back by [`Self::allocate_memory`]
    /// (spec.md §6 `deallocate_memory`).
    pub fn deallocate_memory(&mut self, addr: Address) -> Result<()> {
        self.backend.deallocate_memory(addr)
    }

    /// Every breakpoint site currently tracked, installed or not
    /// (spec.md §6 `list_sites`).
    pub fn list_sites(&self) -> impl Iterator<Item = &BreakpointSite> {
        self.breakpoints.iter_sites()
    }

    /// Request that `thread`'s next [`Self::resume`] single-step it
    /// instead of letting it run free (spec.md §8 scenario 3: "request
    /// a step action on the stopped thread and resume"). Takes effect
    /// on the next call to `resume`; has no effect on its own.
    pub fn request_step(&mut self, thread: ThreadId) -> Result<()> {
        let t = self
            .threads
            .get_mut(thread)
            .ok_or_else(|| DebugError::invalid_state("no such thread"))?;
        t.set_pending_run_action(crate::thread::PendingRunAction {
            kind: RunActionKind::Step,
        });
        Ok(())
    }
}

fn summarize(reason: StopReason) -> Option<StopReasonSummary> {
    Some(match reason {
        StopReason::Breakpoint(id) => StopReasonSummary::Breakpoint(id),
        StopReason::Watchpoint(id) => StopReasonSummary::Watchpoint(id),
        StopReason::StepComplete => StopReasonSummary::StepComplete,
        StopReason::Signaled(s) => StopReasonSummary::Signaled(s),
        StopReason::Exited(c) => StopReasonSummary::Exited(c),
        StopReason::Signal(s) => StopReasonSummary::Signaled(s),
    })
}

/// Resolve `name` against every numeric entry under `/proc`, matching
/// on `comm` (spec.md §4.6 `attach_name`).
fn find_pid_by_name(name: &str) -> Option<Pid> {
    let entries = std::fs::read_dir("/proc").ok()?;
    for entry in entries.flatten() {
        let pid_str = entry.file_name();
        let Some(pid_str) = pid_str.to_str() else {
            continue;
        };
        let Ok(pid) = pid_str.parse::<i32>() else {
            continue;
        };
        let comm_path = entry.path().join("comm");
        if let Ok(comm) = std::fs::read_to_string(comm_path)
            && comm.trim() == name
        {
            return Some(Pid::from_raw(pid));
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossbeam_channel::unbounded;

    fn test_options() -> Options {
        Options {
            executable: "/bin/true".into(),
            pid: None,
            name: None,
            wait_for_launch: false,
            no_aslr: false,
            history_file: None,
        }
    }

    #[test]
    fn fresh_process_starts_unknown_with_no_pid() {
        let (tx, _rx) = unbounded();
        let (_shutdown_tx, shutdown_rx) = unbounded();
        let process = Process::new(test_options(), tx, shutdown_rx);
        assert_eq!(process.state(), ProcessState::Unknown);
        assert!(process.pid().is_none());
    }

    #[test]
    fn resume_before_attaching_is_an_error() {
        let (tx, _rx) = unbounded();
        let (_shutdown_tx, shutdown_rx) = unbounded();
        let mut process = Process::new(test_options(), tx, shutdown_rx);
        assert!(process.resume().is_err());
    }
}
