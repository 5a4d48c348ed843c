#![cfg_attr(target_arch = "arm", no_std)]

extern crate alloc;

pub mod kernel;
pub mod task;

#[cfg(target_arch = "arm")]
#[path = "platform/cmsis/mod.rs"]
pub mod platform;

#[cfg(not(target_arch = "arm"))]
#[path = "platform/hosted/mod.rs"]
pub mod platform;
