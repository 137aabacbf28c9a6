//! Unix signal disposition table (spec.md §3, §6: "Signal table").
//!
//! LLDB keeps a mutable per-signal disposition table
//! (`UnixSignals`, referenced throughout
//! `original_source/source/Plugins/Process/gdb-remote/ProcessGDBRemote.cpp`)
//! driving whether a delivered signal stops the process, is reported to
//! the user, or is suppressed (not re-delivered to the inferior). This
//! is a direct port of that table's semantics onto `nix::sys::signal::Signal`.

use std::collections::HashMap;

use nix::sys::signal::Signal;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SignalDisposition {
    pub should_stop: bool,
    pub should_notify: bool,
    pub should_suppress: bool,
    pub name: &'static str,
}

impl SignalDisposition {
    const fn stopping(name: &'static str) -> Self {
        SignalDisposition {
            should_stop: true,
            should_notify: true,
            should_suppress: false,
            name,
        }
    }

    const fn passthrough(name: &'static str) -> Self {
        SignalDisposition {
            should_stop: false,
            should_notify: false,
            should_suppress: false,
            name,
        }
    }
}

/// A mutable mapping from signal number to disposition. Defaults mirror
/// how a native debugger typically wants to treat the common POSIX
/// signals: traps and faults stop the inferior and are reported,
/// `SIGCHLD`/`SIGWINCH`/`SIGCONT` are passed straight through.
#[derive(Clone, Debug)]
pub struct UnixSignalTable {
    dispositions: HashMap<i32, SignalDisposition>,
}

impl UnixSignalTable {
    pub fn new() -> Self {
        let mut dispositions = HashMap::new();
        dispositions.insert(Signal::SIGTRAP as i32, SignalDisposition::stopping("SIGTRAP"));
        dispositions.insert(Signal::SIGSTOP as i32, SignalDisposition::stopping("SIGSTOP"));
        dispositions.insert(Signal::SIGSEGV as i32, SignalDisposition::stopping("SIGSEGV"));
        dispositions.insert(Signal::SIGBUS as i32, SignalDisposition::stopping("SIGBUS"));
        dispositions.insert(Signal::SIGILL as i32, SignalDisposition::stopping("SIGILL"));
        dispositions.insert(Signal::SIGABRT as i32, SignalDisposition::stopping("SIGABRT"));
        dispositions.insert(Signal::SIGFPE as i32, SignalDisposition::stopping("SIGFPE"));
        dispositions.insert(Signal::SIGCHLD as i32, SignalDisposition::passthrough("SIGCHLD"));
        dispositions.insert(Signal::SIGWINCH as i32, SignalDisposition::passthrough("SIGWINCH"));
        dispositions.insert(Signal::SIGCONT as i32, SignalDisposition::passthrough("SIGCONT"));
        dispositions.insert(Signal::SIGINT as i32, SignalDisposition::stopping("SIGINT"));
        UnixSignalTable { dispositions }
    }

    /// Look up a signal's disposition, defaulting to "stop and notify"
    /// for any signal not already known (the conservative choice: a
    /// novel signal should surface rather than be silently swallowed).
    pub fn disposition(&self, signo: i32) -> SignalDisposition {
        self.dispositions
            .get(&signo)
            .copied()
            .unwrap_or(SignalDisposition {
                should_stop: true,
                should_notify: true,
                should_suppress: false,
                name: "UNKNOWN",
            })
    }

    pub fn set_should_stop(&mut self, signo: i32, should_stop: bool) {
        self.entry(signo).should_stop = should_stop;
    }

    pub fn set_should_notify(&mut self, signo: i32, should_notify: bool) {
        self.entry(signo).should_notify = should_notify;
    }

    pub fn set_should_suppress(&mut self, signo: i32, should_suppress: bool) {
        self.entry(signo).should_suppress = should_suppress;
    }

    fn entry(&mut self, signo: i32) -> &mut SignalDisposition {
        self.dispositions
            .entry(signo)
            .or_insert(SignalDisposition {
                should_stop: true,
                should_notify: true,
                should_suppress: false,
                name: "UNKNOWN",
            })
    }
}

impl Default for UnixSignalTable {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sigtrap_stops_and_notifies_by_default() {
        let table = UnixSignalTable::new();
        let d = table.disposition(Signal::SIGTRAP as i32);
        assert!(d.should_stop);
        assert!(d.should_notify);
        assert!(!d.should_suppress);
    }

    #[test]
    fn configuring_a_signal_to_be_suppressed_sticks() {
        let mut table = UnixSignalTable::new();
        let sig17 = 17;
        table.set_should_stop(sig17, false);
        table.set_should_suppress(sig17, true);

        let d = table.disposition(sig17);
        assert!(!d.should_stop);
        assert!(d.should_suppress);
    }

    #[test]
    fn unknown_signal_defaults_to_stop_and_notify() {
        let table = UnixSignalTable::new();
        let d = table.disposition(9999);
        assert!(d.should_stop);
        assert!(d.should_notify);
    }
}
