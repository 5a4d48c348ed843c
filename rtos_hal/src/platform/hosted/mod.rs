//! Hosted backend. Simulates the kernel thread contract on std threads so
//! the wrapper crates can be tested (and demoed) on a desktop target.
//!
//! A std thread cannot be destroyed from outside, so `terminate` marks the
//! simulated thread dead and the victim parks forever at its next `delay`.
//! The simulator additionally records per-id termination requests and lets
//! tests inject a creation failure; the injection flag is thread-local so
//! parallel tests cannot steal each other's failures.

use std::cell::Cell;
use std::collections::BTreeMap;
use std::ffi::c_void;
use std::sync::{LazyLock, Mutex};
use std::thread;
use std::time::Duration;

use errors::{Errno, Result};

use crate::task::{ThreadAttrs, ThreadEntry, ThreadId};

static KERNEL: LazyLock<Mutex<SimKernel>> = LazyLock::new(|| Mutex::new(SimKernel::new()));

thread_local! {
    static FAIL_NEXT_CREATE: Cell<bool> = const { Cell::new(false) };
    /// Raw id of the simulated thread running on this std thread, 0 outside.
    static CURRENT: Cell<usize> = const { Cell::new(0) };
}

struct SimKernel {
    started: bool,
    next_id: usize,
    threads: BTreeMap<usize, SimThread>,
}

struct SimThread {
    name: Option<&'static str>,
    finished: bool,
    terminated: bool,
    terminate_requests: usize,
}

impl SimKernel {
    fn new() -> Self {
        Self {
            started: false,
            next_id: 1,
            threads: BTreeMap::new(),
        }
    }
}

fn kernel() -> std::sync::MutexGuard<'static, SimKernel> {
    KERNEL.lock().unwrap()
}

pub fn init() -> Result<()> {
    kernel().started = false;
    Ok(())
}

pub fn start() -> Result<()> {
    kernel().started = true;
    log::debug!("hosted kernel started");
    Ok(())
}

pub fn create(entry: ThreadEntry, argument: *mut c_void, attrs: &ThreadAttrs) -> Result<ThreadId> {
    if FAIL_NEXT_CREATE.replace(false) {
        return Err(Errno::NoMemory.with_message("injected creation failure"));
    }

    let raw = {
        let mut kernel = kernel();
        let raw = kernel.next_id;
        kernel.next_id += 1;
        kernel.threads.insert(
            raw,
            SimThread {
                name: attrs.name,
                finished: false,
                terminated: false,
                terminate_requests: 0,
            },
        );
        raw
    };

    // Raw pointers are not Send; the simulated thread carries the address.
    let argument = argument as usize;
    let mut builder = thread::Builder::new();
    if let Some(name) = attrs.name {
        builder = builder.name(name.into());
    }
    builder
        .spawn(move || {
            CURRENT.set(raw);
            entry(argument as *mut c_void);
            if let Some(thread) = kernel().threads.get_mut(&raw) {
                thread.finished = true;
            }
        })
        .map_err(|error| Errno::NoMemory.with_message(error.to_string()))?;

    log::trace!("created simulated thread {raw}");
    Ok(ThreadId::from_raw(raw))
}

pub fn terminate(id: ThreadId) -> Result<()> {
    let mut kernel = kernel();
    let Some(thread) = kernel.threads.get_mut(&id.as_raw()) else {
        return Err(Errno::BadParam.with_message("unknown thread id"));
    };
    thread.terminate_requests += 1;
    if thread.finished || thread.terminated {
        return Err(Errno::Resource.with_message("thread is not running"));
    }
    thread.terminated = true;
    log::trace!("terminated simulated thread {}", id.as_raw());
    Ok(())
}

pub fn delay(ticks: u32) -> Result<()> {
    thread::sleep(Duration::from_millis(u64::from(ticks)));
    let me = CURRENT.get();
    if me != 0 {
        while kernel().threads.get(&me).is_some_and(|t| t.terminated) {
            // Dead from the kernel's point of view; never run user code again.
            thread::park();
        }
    }
    Ok(())
}

/// How many termination requests the kernel has seen for `id`, counting the
/// ones it rejected.
pub fn terminate_requests(id: ThreadId) -> usize {
    kernel()
        .threads
        .get(&id.as_raw())
        .map_or(0, |t| t.terminate_requests)
}

/// Whether `id` names a simulated thread that is still schedulable.
pub fn is_running(id: ThreadId) -> bool {
    kernel()
        .threads
        .get(&id.as_raw())
        .is_some_and(|t| !t.finished && !t.terminated)
}

pub fn thread_name(id: ThreadId) -> Option<&'static str> {
    kernel().threads.get(&id.as_raw()).and_then(|t| t.name)
}

/// Makes the next `create` on the calling thread fail.
pub fn fail_next_create() {
    FAIL_NEXT_CREATE.set(true);
}

#[cfg(test)]
mod tests {
    use std::ptr;

    use super::*;

    extern "C" fn nop_entry(_argument: *mut c_void) {}

    extern "C" fn spin_entry(_argument: *mut c_void) {
        loop {
            delay(5).unwrap();
        }
    }

    fn wait_until(mut cond: impl FnMut() -> bool) {
        for _ in 0..500 {
            if cond() {
                return;
            }
            thread::sleep(Duration::from_millis(10));
        }
        panic!("condition not reached");
    }

    #[test]
    fn create_and_terminate() {
        let id = create(spin_entry, ptr::null_mut(), &ThreadAttrs::default()).unwrap();
        assert!(is_running(id));
        terminate(id).unwrap();
        assert!(!is_running(id));
        assert_eq!(terminate_requests(id), 1);
    }

    #[test]
    fn terminate_twice_fails() {
        let id = create(spin_entry, ptr::null_mut(), &ThreadAttrs::default()).unwrap();
        terminate(id).unwrap();
        assert_eq!(
            terminate(id).unwrap_err().errno(),
            errors::Errno::Resource
        );
        assert_eq!(terminate_requests(id), 2);
    }

    #[test]
    fn terminate_finished_thread_fails() {
        let id = create(nop_entry, ptr::null_mut(), &ThreadAttrs::default()).unwrap();
        wait_until(|| !is_running(id));
        assert_eq!(
            terminate(id).unwrap_err().errno(),
            errors::Errno::Resource
        );
    }

    #[test]
    fn terminate_unknown_id_fails() {
        let bogus = ThreadId::from_raw(usize::MAX);
        assert_eq!(
            terminate(bogus).unwrap_err().errno(),
            errors::Errno::BadParam
        );
    }

    #[test]
    fn injected_creation_failure() {
        fail_next_create();
        let error = create(nop_entry, ptr::null_mut(), &ThreadAttrs::default()).unwrap_err();
        assert_eq!(error.errno(), errors::Errno::NoMemory);
        // The flag is one-shot.
        let id = create(nop_entry, ptr::null_mut(), &ThreadAttrs::default()).unwrap();
        wait_until(|| !is_running(id));
    }

    #[test]
    fn names_are_kept() {
        let attrs = ThreadAttrs {
            name: Some("named"),
            ..ThreadAttrs::default()
        };
        let id = create(spin_entry, ptr::null_mut(), &attrs).unwrap();
        assert_eq!(thread_name(id), Some("named"));
        terminate(id).unwrap();
    }
}
