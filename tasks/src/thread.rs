//! The thread-lifecycle wrapper: constructing a [`ThreadHandle`] creates a
//! kernel thread, dropping it requests the kernel terminate that thread.

use core::ffi::c_void;

use errors::Result;
use rtos_hal::kernel;
use rtos_hal::task::{ThreadAttrs, ThreadEntry, ThreadId};

use crate::registry::{self, ThreadRecord};

/// Owns exactly one kernel thread's identity.
///
/// The identity is assigned once, at [`spawn`](Self::spawn), and the handle
/// is discoverable through the registry until it is dropped. Dropping the
/// handle removes the registry entry and issues one termination request;
/// a termination failure is logged and swallowed so teardown never fails
/// the owning scope.
#[derive(Debug)]
pub struct ThreadHandle {
    id: ThreadId,
    entry: ThreadEntry,
    name: Option<&'static str>,
}

impl ThreadHandle {
    /// Asks the kernel for a new thread running `entry` and registers the
    /// wrapper under the returned identity.
    ///
    /// `argument` is handed to `entry` at its first invocation. The entry
    /// reference kept on the handle is for identification only and is never
    /// re-invoked. On kernel failure nothing is registered and the error is
    /// returned to the caller.
    pub fn spawn(
        entry: ThreadEntry,
        argument: *mut c_void,
        attrs: &ThreadAttrs,
    ) -> Result<Self> {
        registry::init();
        let id = kernel::create(entry, argument, attrs)?;
        if let Err(error) = registry::insert(ThreadRecord {
            id,
            entry,
            name: attrs.name,
        }) {
            // A live id colliding with a registered one means the registry
            // is corrupt; do not leak an unregistered running thread.
            if let Err(terminate_error) = kernel::terminate(id) {
                log::warn!("terminate {:?}: {}", id, terminate_error);
            }
            return Err(error);
        }
        Ok(Self {
            id,
            entry,
            name: attrs.name,
        })
    }

    pub fn id(&self) -> ThreadId {
        self.id
    }

    pub fn entry(&self) -> ThreadEntry {
        self.entry
    }

    pub fn name(&self) -> Option<&'static str> {
        self.name
    }
}

impl Drop for ThreadHandle {
    fn drop(&mut self) {
        // Deregister first so no lookup can name a thread that is being
        // torn down.
        registry::remove(self.id);
        if let Err(error) = kernel::terminate(self.id) {
            // The thread may have exited on its own; teardown goes on.
            log::warn!("terminate {:?}: {}", self.id, error);
        }
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use core::ptr;
    use core::sync::atomic::{AtomicBool, Ordering};
    use std::boxed::Box;
    use std::thread;
    use std::time::Duration;

    use rtos_hal::platform::{fail_next_create, is_running, terminate_requests};

    use super::*;

    extern "C" fn blink(_argument: *mut c_void) {
        loop {
            let _ = kernel::delay(5);
        }
    }

    extern "C" fn short_lived(_argument: *mut c_void) {}

    extern "C" fn set_flag(argument: *mut c_void) {
        let flag = unsafe { &*(argument as *const AtomicBool) };
        flag.store(true, Ordering::SeqCst);
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
    fn identities_are_unique_and_resolvable() {
        let a = ThreadHandle::spawn(blink, ptr::null_mut(), &ThreadAttrs::default()).unwrap();
        let b = ThreadHandle::spawn(blink, ptr::null_mut(), &ThreadAttrs::default()).unwrap();
        assert_ne!(a.id(), b.id());

        let record_a = registry::find(a.id()).unwrap();
        let record_b = registry::find(b.id()).unwrap();
        assert_eq!(record_a.id, a.id());
        assert_eq!(record_b.id, b.id());
        assert_eq!(record_a.entry, a.entry());
    }

    #[test]
    fn lifecycle_binding() {
        let handle = ThreadHandle::spawn(blink, ptr::null_mut(), &ThreadAttrs::default()).unwrap();
        let id = handle.id();
        assert!(is_running(id));
        assert!(registry::contains(id));
        assert_eq!(terminate_requests(id), 0);

        drop(handle);
        assert_eq!(terminate_requests(id), 1);
        assert!(!is_running(id));
    }

    #[test]
    fn teardown_after_thread_exited_is_quiet() {
        let handle =
            ThreadHandle::spawn(short_lived, ptr::null_mut(), &ThreadAttrs::default()).unwrap();
        let id = handle.id();
        wait_until(|| !is_running(id));

        // The kernel rejects the request; drop must swallow that.
        drop(handle);
        assert_eq!(terminate_requests(id), 1);
        assert!(!registry::contains(id));
    }

    #[test]
    fn creation_failure_reaches_the_caller() {
        fail_next_create();
        let error =
            ThreadHandle::spawn(blink, ptr::null_mut(), &ThreadAttrs::default()).unwrap_err();
        assert_eq!(error.errno(), errors::Errno::NoMemory);
    }

    #[test]
    fn no_resurrection_after_drop() {
        let handle = ThreadHandle::spawn(blink, ptr::null_mut(), &ThreadAttrs::default()).unwrap();
        let id = handle.id();
        drop(handle);

        assert_eq!(registry::find(id), None);
        assert!(!is_running(id));
    }

    #[test]
    fn named_thread_with_small_stack() {
        let attrs = ThreadAttrs {
            name: Some("blink-task"),
            stack_size: 512,
            ..ThreadAttrs::default()
        };
        let handle = ThreadHandle::spawn(blink, ptr::null_mut(), &attrs).unwrap();
        assert_eq!(handle.name(), Some("blink-task"));
        assert_eq!(registry::find(handle.id()).unwrap().name, Some("blink-task"));
    }

    #[test]
    fn argument_reaches_the_entry_function() {
        let flag: &'static AtomicBool = Box::leak(Box::new(AtomicBool::new(false)));
        let _handle = ThreadHandle::spawn(
            set_flag,
            flag as *const AtomicBool as *mut c_void,
            &ThreadAttrs::default(),
        )
        .unwrap();
        wait_until(|| flag.load(Ordering::SeqCst));
    }
}
