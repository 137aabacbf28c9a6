//! Fixture for the watchpoint-on-write scenario (spec.md §8, scenario 6):
//! prints the address of a watched word, stops itself, then writes to
//! it once resumed.

static mut WATCHED: u32 = 0;

fn main() {
    let addr = std::ptr::addr_of!(WATCHED) as usize;
    println!("WATCH_ADDR={addr:#x}");

    unsafe {
        libc::raise(libc::SIGSTOP);
    }

    unsafe {
        std::ptr::addr_of_mut!(WATCHED).write_volatile(0x2a);
    }
    println!("WATCH_DONE");
}
