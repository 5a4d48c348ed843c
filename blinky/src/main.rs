//! Bring-up for one blinking LED: initialize the board and the kernel,
//! spawn the blink thread through a [`ThreadHandle`], hand control to the
//! scheduler.

#![cfg_attr(target_arch = "arm", no_std)]
#![cfg_attr(target_arch = "arm", no_main)]

mod bsp;
#[cfg(target_arch = "arm")]
mod heap;
#[cfg(not(target_arch = "arm"))]
mod logger;

use core::ffi::c_void;

use errors::Result;
use rtos_hal::kernel;
use rtos_hal::task::ThreadAttrs;
use tasks::ThreadHandle;

/// Blink half-period in kernel ticks.
const BLINK_TICKS: u32 = 100;

/// The first and only application thread.
extern "C" fn blink(_argument: *mut c_void) {
    loop {
        bsp::led_on();
        let _ = kernel::delay(BLINK_TICKS);
        bsp::led_off();
        let _ = kernel::delay(BLINK_TICKS);
    }
}

fn bring_up() -> Result<ThreadHandle> {
    bsp::init();
    kernel::init()?;
    tasks::init();
    ThreadHandle::spawn(
        blink,
        core::ptr::null_mut(),
        &ThreadAttrs {
            name: Some("blink"),
            stack_size: 512,
            ..ThreadAttrs::default()
        },
    )
}

/// Called from the C startup code once the runtime is set up.
#[cfg(target_arch = "arm")]
#[unsafe(no_mangle)]
extern "C" fn main() -> i32 {
    let blink = bring_up();
    if blink.is_ok() {
        // Only returns if the scheduler refuses to start; the handle stays
        // alive above so the blinker is never torn down.
        let _ = kernel::start();
    }
    loop {
        core::hint::spin_loop();
    }
}

#[cfg(target_arch = "arm")]
#[panic_handler]
fn panic(_info: &core::panic::PanicInfo) -> ! {
    loop {
        core::hint::spin_loop();
    }
}

#[cfg(not(target_arch = "arm"))]
fn main() {
    logger::init();
    let blink = bring_up().expect("bring-up failed");
    kernel::start().expect("hosted kernel failed to start");
    log::info!("blinking on the hosted kernel, thread {:?}", blink.id());

    std::thread::sleep(std::time::Duration::from_secs(1));
    drop(blink);
    log::info!("blink thread retired");
}
