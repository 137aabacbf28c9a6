//! Fixture for the breakpoint-hit scenario (spec.md §8, scenario 1):
//! prints the address of a known function, stops itself so the parent
//! can read that address, then calls the function once resumed.

#[no_mangle]
pub extern "C" fn target_fn() {
    println!("TARGET_FN_CALLED");
}

fn main() {
    let addr = (target_fn as fn()) as usize;
    println!("TARGET_FN_ADDR={addr:#x}");

    unsafe {
        libc::raise(libc::SIGSTOP);
    }

    target_fn();
}
