#![no_std]

extern crate alloc;

pub use registry::ThreadRecord;
pub use thread::ThreadHandle;

pub mod registry;
pub mod thread;

/// Sets up the shared thread registry. Runs once; later calls are no-ops.
pub fn init() {
    registry::init();
}
