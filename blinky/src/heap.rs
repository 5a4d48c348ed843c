//! Global allocator for the bare target. The wrapper crates use `alloc`
//! for error messages and the registry map, so even this small firmware
//! carries a heap: a fixed static arena claimed on first allocation.

use core::ptr::addr_of;

use spin::Mutex;
use talc::{ClaimOnOom, Span, Talc, Talck};

const HEAP_SIZE: usize = 16 * 1024;

static mut ARENA: [u8; HEAP_SIZE] = [0; HEAP_SIZE];

#[global_allocator]
static HEAP: Talck<Mutex<()>, ClaimOnOom> =
    Talc::new(unsafe { ClaimOnOom::new(Span::from_array(addr_of!(ARENA).cast_mut())) }).lock();
