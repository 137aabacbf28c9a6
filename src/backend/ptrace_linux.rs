//! Linux `ptrace(2)` implementation of [`NativeBackend`].
//!
//! Grounded on the teacher's `process/mod.rs::launch_executable` (the
//! fork + PTY + `ptrace::traceme` + `execvp` dance) and
//! `process/inferior.rs::read_inferior_logging` (the `mio`-polled PTY
//! reader thread), both folded into one struct instead of being split
//! across `Process`/`Inferior`.

use std::collections::VecDeque;
use std::ffi::{CStr, CString};
use std::fs::File;
use std::io::{Read, Write};
use std::os::fd::{AsRawFd, OwnedFd, RawFd};
use std::os::unix::ffi::OsStrExt;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use memoffset::offset_of;
use mio::unix::SourceFd;
use mio::{Events, Interest, Poll, Token};
use nix::libc;
use nix::pty::{Winsize, openpty};
use nix::sys::ptrace;
use nix::sys::ptrace::{read_user, write_user};
use nix::sys::signal::{Signal, kill};
use nix::sys::wait::{WaitStatus, waitpid};
use nix::unistd::{ForkResult, Pid, close, dup, dup2_stderr, dup2_stdin, dup2_stdout, execvp, fork, setsid};
use tracing::{error, trace};

use crate::address::Address;
use crate::backend::{Aslr, BackendStopEvent, BackendSupport, LaunchInfo, NativeBackend, ResumeAction};
use crate::error::{DebugError, Result};
use crate::stoppoint::watchpoint::{WatchKind, WatchSize, WatchpointLocation};
use crate::thread::{ObservedThread, RunActionKind, ThreadId};

const DEBUGREG_OFFSET: usize = offset_of!(libc::user, u_debugreg);
const DR7_SLOT: usize = 7;
const DR6_SLOT: usize = 6;

fn debugreg_offset(slot: usize) -> usize {
    DEBUGREG_OFFSET + slot * 8
}

/// DR7's R/W field for a given watch kind, per Intel SDM vol. 3B §17.2.4:
/// `01` = break on write, `11` = break on read or write (there is no
/// break-on-read-only encoding).
fn dr7_rw_bits(kind: WatchKind) -> u64 {
    match kind {
        WatchKind::Write => 0b01,
        WatchKind::ReadWrite => 0b11,
    }
}

/// DR7's length field. The encoding is not linear: 2 bytes is `01`, 8
/// bytes is `10`, 4 bytes is `11`.
fn dr7_len_bits(size: WatchSize) -> u64 {
    match size {
        WatchSize::One => 0b00,
        WatchSize::Two => 0b01,
        WatchSize::Eight => 0b10,
        WatchSize::Four => 0b11,
    }
}

const STDOUT_TOKEN: Token = Token(0);

struct InferiorIo {
    master_fd: RawFd,
    writer: File,
    stdout_buf: Arc<Mutex<VecDeque<u8>>>,
    shutdown: Arc<AtomicBool>,
    reader_thread: Option<JoinHandle<()>>,
}

impl Drop for InferiorIo {
    fn drop(&mut self) {
        self.shutdown.store(true, Ordering::SeqCst);
        if let Some(handle) = self.reader_thread.take() {
            let _ = handle.join();
        }
    }
}

/// One ptrace-controlled inferior. Created unattached; [`do_launch`] or
/// [`do_attach_pid`] fills in `pid`/`io`.
pub struct PtraceBackend {
    pid: Option<Pid>,
    io: Option<InferiorIo>,
}

impl PtraceBackend {
    pub fn new() -> Self {
        PtraceBackend { pid: None, io: None }
    }

    fn pid_or_err(&self) -> Result<Pid> {
        self.pid
            .ok_or_else(|| DebugError::invalid_state("no inferior attached"))
    }

    /// The PTY master fd, for a TUI to `ioctl(TIOCSWINSZ)` on resize.
    pub fn pty_master_fd(&self) -> Option<RawFd> {
        self.io.as_ref().map(|io| io.master_fd)
    }
}

impl Default for PtraceBackend {
    fn default() -> Self {
        Self::new()
    }
}

fn spawn_stdout_reader(reader_fd: OwnedFd) -> (Arc<Mutex<VecDeque<u8>>>, Arc<AtomicBool>, JoinHandle<()>) {
    let buf = Arc::new(Mutex::new(VecDeque::new()));
    let shutdown = Arc::new(AtomicBool::new(false));
    let buf_clone = buf.clone();
    let shutdown_clone = shutdown.clone();

    let handle = thread::spawn(move || {
        let mut poll = match Poll::new() {
            Ok(p) => p,
            Err(e) => {
                error!(?e, "failed to create mio poll for inferior stdout");
                return;
            }
        };
        let mut events = Events::with_capacity(128);
        let mut source_fd = SourceFd(&reader_fd.as_raw_fd());
        if let Err(e) = poll
            .registry()
            .register(&mut source_fd, STDOUT_TOKEN, Interest::READABLE)
        {
            error!(?e, "failed to register inferior stdout fd");
            return;
        }

        let mut file = File::from(reader_fd);
        let mut chunk = [0u8; 4096];

        while !shutdown_clone.load(Ordering::SeqCst) {
            if let Err(e) = poll.poll(&mut events, Some(Duration::from_millis(42))) {
                error!(?e, "poll on inferior stdout failed");
                break;
            }
            for event in events.iter() {
                if event.token() != STDOUT_TOKEN || !event.is_readable() {
                    continue;
                }
                match file.read(&mut chunk) {
                    Ok(0) => {
                        trace!("inferior stdout reached EOF");
                        return;
                    }
                    Ok(n) => {
                        buf_clone.lock().unwrap().extend(&chunk[..n]);
                    }
                    Err(e) if e.kind() == std::io::ErrorKind::WouldBlock => {}
                    Err(e) => {
                        error!(?e, "error reading inferior stdout");
                    }
                }
            }
        }
    });

    (buf, shutdown, handle)
}

impl NativeBackend for PtraceBackend {
    fn do_launch(&mut self, executable: &Path, info: &LaunchInfo) -> Result<Pid> {
        let pty = openpty(
            Some(&Winsize {
                ws_row: 24,
                ws_col: 80,
                ws_xpixel: 0,
                ws_ypixel: 0,
            }),
            None,
        )
        .map_err(DebugError::from)?;

        match unsafe { fork() }.map_err(DebugError::from)? {
            ForkResult::Parent { child } => {
                let _ = close(pty.slave);

                let rfd = dup(pty.master.try_clone().map_err(DebugError::from)?).map_err(DebugError::from)?;
                let wfd = dup(pty.master.try_clone().map_err(DebugError::from)?).map_err(DebugError::from)?;
                let writer = File::from(wfd);

                let (stdout_buf, shutdown, reader_thread) = spawn_stdout_reader(rfd);

                self.pid = Some(child);
                self.io = Some(InferiorIo {
                    master_fd: pty.master.as_raw_fd(),
                    writer,
                    stdout_buf,
                    shutdown,
                    reader_thread: Some(reader_thread),
                });

                // First stop is the traceme-induced SIGTRAP at exec; the
                // caller (`Process::launch`) consumes it via `wait_for_stop`.
                Ok(child)
            }
            ForkResult::Child => {
                let _ = setsid();
                unsafe { libc::ioctl(pty.slave.as_raw_fd(), libc::TIOCSCTTY, 0) };

                if matches!(info.stdio, crate::backend::StdioMode::Pty) {
                    let _ = dup2_stdin(pty.slave.try_clone().expect("dup slave"));
                    let _ = dup2_stdout(pty.slave.try_clone().expect("dup slave"));
                    let _ = dup2_stderr(pty.slave.try_clone().expect("dup slave"));
                }
                let _ = close(pty.slave.try_clone().expect("dup slave"));
                let _ = close(pty.master);

                if info.aslr == Aslr::Disabled {
                    unsafe {
                        let current = libc::personality(0xffffffff);
                        libc::personality((current as libc::c_ulong | 0x0040000) as libc::c_ulong);
                    }
                }

                let _ = ptrace::traceme();

                let filename = match CString::new(executable.as_os_str().as_bytes()) {
                    Ok(c) => c,
                    Err(_) => std::process::exit(127),
                };
                let mut cstr_storage = Vec::with_capacity(info.args.len() + 1);
                cstr_storage.push(filename.clone());
                for arg in &info.args {
                    if let Ok(c) = CString::new(arg.as_str()) {
                        cstr_storage.push(c);
                    }
                }
                let cstr_args: Vec<&CStr> = cstr_storage.iter().map(|s| s.as_c_str()).collect();
                let _ = execvp(filename.as_c_str(), &cstr_args);
                std::process::exit(127);
            }
        }
    }

    fn do_attach_pid(&mut self, pid: Pid) -> Result<()> {
        ptrace::attach(pid).map_err(DebugError::from)?;
        self.pid = Some(pid);
        self.io = None;
        Ok(())
    }

    fn do_resume(&mut self, actions: &[ResumeAction]) -> Result<()> {
        let pid = self.pid_or_err()?;
        // Single-threaded Linux ptrace target: the one action that
        // matters is whichever thread matches our pid.
        let action = actions
            .iter()
            .find(|a| a.tid == ThreadId::from(pid))
            .or_else(|| actions.first());

        let signal = action.and_then(|a| a.inject_signal);
        match action.map(|a| a.kind) {
            Some(RunActionKind::Step) => ptrace::step(pid, signal).map_err(DebugError::from)?,
            Some(RunActionKind::Suspend) => {}
            _ => ptrace::cont(pid, signal).map_err(DebugError::from)?,
        }
        Ok(())
    }

    fn do_halt(&mut self) -> Result<bool> {
        let pid = self.pid_or_err()?;
        kill(pid, Signal::SIGSTOP).map_err(DebugError::from)?;
        Ok(true)
    }

    fn do_detach(&mut self) -> Result<()> {
        let pid = self.pid_or_err()?;
        ptrace::detach(pid, None).map_err(DebugError::from)?;
        self.pid = None;
        self.io = None;
        Ok(())
    }

    fn do_destroy(&mut self) -> Result<()> {
        let pid = self.pid_or_err()?;
        let _ = kill(pid, Signal::SIGSTOP);
        let _ = waitpid(pid, None);
        let _ = ptrace::detach(pid, None);
        let _ = kill(pid, Signal::SIGCONT);
        let _ = kill(pid, Signal::SIGKILL);
        let _ = waitpid(pid, None);
        self.pid = None;
        self.io = None;
        Ok(())
    }

    fn do_signal(&mut self, signo: i32) -> Result<()> {
        let pid = self.pid_or_err()?;
        let signal = Signal::try_from(signo)
            .map_err(|_| DebugError::backend(format!("invalid signal number {signo}")))?;
        kill(pid, signal).map_err(DebugError::from)?;
        Ok(())
    }

    fn wait_for_stop(&mut self) -> Result<Option<BackendStopEvent>> {
        let Some(pid) = self.pid else {
            return Ok(None);
        };
        let status = waitpid(pid, None).map_err(DebugError::from)?;
        let tid = ThreadId::from(pid);
        Ok(Some(match status {
            WaitStatus::Exited(_, code) => BackendStopEvent::Exited { tid, exit_code: code },
            WaitStatus::Signaled(_, signal, _) => BackendStopEvent::Signaled {
                tid,
                signal: signal as i32,
            },
            WaitStatus::Stopped(_, signal) => BackendStopEvent::Stopped {
                tid,
                signal: signal as i32,
            },
            WaitStatus::PtraceEvent(_, signal, _) => BackendStopEvent::Stopped {
                tid,
                signal: signal as i32,
            },
            _ => BackendStopEvent::Stopped { tid, signal: Signal::SIGTRAP as i32 },
        }))
    }

    fn max_chunk(&self) -> usize {
        // One ptrace PEEKTEXT/POKETEXT call transfers a machine word;
        // callers loop over this in word-sized strides.
        std::mem::size_of::<usize>()
    }

    fn read_memory(&self, addr: Address, len: usize) -> Result<Vec<u8>> {
        let pid = self.pid_or_err()?;
        let word_size = std::mem::size_of::<i64>();
        let mut out = Vec::with_capacity(len);
        let base = addr.offset();
        let mut offset = 0usize;
        while offset < len {
            let word_addr = base + offset as u64;
            let word = ptrace::read(pid, word_addr as *mut _).map_err(|e| DebugError::Memory {
                address: addr,
                offset_reached: offset,
                message: e.to_string(),
            })?;
            let bytes = word.to_ne_bytes();
            let take = word_size.min(len - offset);
            out.extend_from_slice(&bytes[..take]);
            offset += take;
        }
        Ok(out)
    }

    fn write_memory(&self, addr: Address, bytes: &[u8]) -> Result<()> {
        let pid = self.pid_or_err()?;
        let word_size = std::mem::size_of::<i64>();
        let base = addr.offset();
        let mut offset = 0usize;
        while offset < bytes.len() {
            let word_addr = base + offset as u64;
            let remaining = bytes.len() - offset;
            let word = if remaining >= word_size {
                i64::from_ne_bytes(bytes[offset..offset + word_size].try_into().unwrap())
            } else {
                // Partial final word: merge with the existing bytes so
                // we don't clobber memory past the requested range.
                let existing = ptrace::read(pid, word_addr as *mut _).map_err(|e| DebugError::Memory {
                    address: addr,
                    offset_reached: offset,
                    message: e.to_string(),
                })?;
                let mut merged = existing.to_ne_bytes();
                merged[..remaining].copy_from_slice(&bytes[offset..]);
                i64::from_ne_bytes(merged)
            };
            ptrace::write(pid, word_addr as *mut _, word).map_err(|e| DebugError::Memory {
                address: addr,
                offset_reached: offset,
                message: e.to_string(),
            })?;
            offset += word_size.min(remaining);
        }
        Ok(())
    }

    fn enable_watchpoint(&mut self, loc: &WatchpointLocation) -> Result<BackendSupport<()>> {
        let pid = self.pid_or_err()?;
        let slot = loc
            .slot()
            .ok_or_else(|| DebugError::invalid_state("watchpoint has no allocated debug register slot"))?;

        write_user(
            pid,
            debugreg_offset(slot as usize) as _,
            loc.address().offset() as i64,
        )
        .map_err(DebugError::from)?;

        let dr7 = read_user(pid, debugreg_offset(DR7_SLOT) as _).map_err(DebugError::from)? as u64;
        let slot = slot as u64;
        // Clear this slot's enable/rw/len bits before re-setting them so
        // re-enabling a previously-used slot doesn't OR stale bits in.
        let mut dr7 = dr7 & !(0b11 << (16 + slot * 4)) & !(1 << (slot * 2));
        dr7 |= 1 << (slot * 2);
        dr7 |= dr7_rw_bits(loc.kind()) << (16 + slot * 4);
        dr7 |= dr7_len_bits(loc.size()) << (16 + slot * 4 + 2);
        write_user(pid, debugreg_offset(DR7_SLOT) as _, dr7 as i64).map_err(DebugError::from)?;

        Ok(BackendSupport::Handled(()))
    }

    fn disable_watchpoint(&mut self, loc: &WatchpointLocation) -> Result<BackendSupport<()>> {
        let pid = self.pid_or_err()?;
        let Some(slot) = loc.slot() else {
            return Ok(BackendSupport::Handled(()));
        };
        let slot = slot as u64;
        let dr7 = read_user(pid, debugreg_offset(DR7_SLOT) as _).map_err(DebugError::from)? as u64;
        let dr7 = dr7 & !(1 << (slot * 2));
        write_user(pid, debugreg_offset(DR7_SLOT) as _, dr7 as i64).map_err(DebugError::from)?;
        Ok(BackendSupport::Handled(()))
    }

    fn triggered_watchpoint_slot(&self) -> Result<Option<u8>> {
        let Some(pid) = self.pid else {
            return Ok(None);
        };
        let dr6 = read_user(pid, debugreg_offset(DR6_SLOT) as _).map_err(DebugError::from)? as u64;
        for slot in 0..4u8 {
            if dr6 & (1 << slot) != 0 {
                // Clear the status bits we consumed so the next trap
                // doesn't report this slot again.
                let cleared = dr6 & !0b1111;
                let _ = write_user(pid, debugreg_offset(DR6_SLOT) as _, cleared as i64);
                return Ok(Some(slot));
            }
        }
        Ok(None)
    }

    fn update_thread_list(&self) -> Result<Vec<ObservedThread>> {
        // No userspace thread enumeration support yet (spec.md §4.7
        // Non-goals: "multi-threaded inferiors beyond the minimum
        // needed to exercise the `ThreadList` API"); report the single
        // ptrace-attached tid.
        let Some(pid) = self.pid else {
            return Ok(Vec::new());
        };
        let tid = ThreadId::from(pid);
        let expedited_pc = ptrace::getregs(pid).ok().map(|regs| regs.rip);
        Ok(vec![ObservedThread { tid, expedited_pc }])
    }

    fn take_stdout(&mut self) -> Vec<u8> {
        let Some(io) = self.io.as_ref() else {
            return Vec::new();
        };
        let mut buf = io.stdout_buf.lock().unwrap();
        buf.drain(..).collect()
    }

    fn stdin_put(&mut self, bytes: &[u8]) -> Result<()> {
        let io = self
            .io
            .as_mut()
            .ok_or_else(|| DebugError::invalid_state("no PTY attached to write stdin to"))?;
        io.writer.write_all(bytes).map_err(DebugError::from)
    }

    fn pid(&self) -> Option<Pid> {
        self.pid
    }
}
