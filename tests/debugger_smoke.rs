#![cfg(target_os = "linux")]

mod fixtures;

use std::time::Duration;

use anyhow::Result;
use crossbeam_channel::unbounded;
use jdb::options::Options;
use jdb::process::{Process, ProcessState};
use jdb::register_info::Register;

/// Wrapper around the `Process` instance. The key insight is implementing the
/// `Drop` trait which will guarantee the proper shutdown of the `Process`.
struct ProcessGuard {
    process: Option<Process>,
    shutdown_tx: Option<crossbeam_channel::Sender<()>>,
}

impl ProcessGuard {
    fn new(process: Process, shutdown_tx: crossbeam_channel::Sender<()>) -> Self {
        Self {
            process: Some(process),
            shutdown_tx: Some(shutdown_tx),
        }
    }

    fn get_mut(&mut self) -> &mut Process {
        self.process
            .as_mut()
            .expect("process should still be available")
    }
}

impl Drop for ProcessGuard {
    fn drop(&mut self) {
        if let Some(mut process) = self.process.take() {
            let _ = process.destroy();
        }
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

fn fixture_options(executable: std::path::PathBuf) -> Options {
    Options {
        executable,
        pid: None,
        name: None,
        wait_for_launch: false,
        no_aslr: true,
        history_file: None,
    }
}

/// End-to-end smoke test: launch the fixture, observe the post-exec stop,
/// read registers, and resume until exit.
#[test]
fn attach_read_and_resume_inferior() -> Result<()> {
    let fixture = fixtures::hello_fixture_path();

    let (inferior_tx, inferior_rx) = unbounded();
    let (shutdown_tx, shutdown_rx) = unbounded();
    let mut process_guard = ProcessGuard::new(
        Process::new(fixture_options(fixture), inferior_tx, shutdown_rx),
        shutdown_tx,
    );
    let process = process_guard.get_mut();

    // `launch` blocks through the traceme-induced exec stop, so the
    // inferior is already halted at its entry point by the time this
    // returns.
    process.attach(Vec::new()).expect("attach should succeed");
    assert!(process.pid().is_some(), "pid should be available after attach");
    assert_eq!(process.state(), ProcessState::Stopped);

    // Registers should be readable while stopped.
    assert!(process.read_register(Register::RIP).is_some());
    assert!(process.read_register(Register::RSP).is_some());

    // Run forward to the fixture's own `raise(SIGSTOP)`.
    process.resume().expect("resume should succeed");
    process.wait_for_stop().expect("wait should succeed");
    assert_eq!(process.state(), ProcessState::Stopped);

    // Pull the buffered stdout through to the log channel and confirm
    // the fixture's greeting made it across, both to the forwarding
    // channel and to the process's own log buffer.
    process.drain_inferior_output();
    let msg = inferior_rx.recv_timeout(Duration::from_secs(5))?;
    assert!(msg.contains("HELLO_FROM_INFERIOR"));
    let logs = process.last_n_log_lines(4);
    assert!(
        logs.iter().any(|l| l.contains("HELLO_FROM_INFERIOR")),
        "log lines did not include expected greeting: {logs:?}"
    );

    // Resume past the SIGSTOP and wait for the fixture to exit.
    process.resume().expect("resume should succeed");
    process.wait_for_stop().expect("wait should succeed");
    assert_eq!(process.state(), ProcessState::Exited);

    // Clean teardown.
    Ok(())
}
