//! Fixture for the signal-disposition scenarios (spec.md §8, scenarios 4
//! and 5): stops itself so the debugger can attach and configure a
//! custom signal disposition, then idles so the debugger has time to
//! deliver a signal and issue an explicit halt.

use std::time::Duration;

fn main() {
    unsafe {
        libc::raise(libc::SIGSTOP);
    }
    loop {
        std::thread::sleep(Duration::from_millis(50));
    }
}
