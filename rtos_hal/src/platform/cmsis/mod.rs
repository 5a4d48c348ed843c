//! CMSIS-RTOS2 backend. Thin shim over the C kernel: every call maps to one
//! `os*` function, statuses become [`Errno`] values.

use core::ffi::{c_char, c_void};
use core::ptr;

use alloc::ffi::CString;

use errors::{Errno, Result};

use crate::task::{Placement, ThreadAttrs, ThreadEntry, ThreadId};

type OsStatus = i32;

const OS_OK: OsStatus = 0;

/// `osThreadAttr_t`.
#[repr(C)]
struct OsThreadAttr {
    name: *const c_char,
    attr_bits: u32,
    cb_mem: *mut c_void,
    cb_size: u32,
    stack_mem: *mut c_void,
    stack_size: u32,
    priority: i32,
    tz_module: u32,
    reserved: u32,
}

unsafe extern "C" {
    fn osKernelInitialize() -> OsStatus;
    fn osKernelStart() -> OsStatus;
    fn osThreadNew(
        func: ThreadEntry,
        argument: *mut c_void,
        attr: *const OsThreadAttr,
    ) -> *mut c_void;
    fn osThreadTerminate(thread_id: *mut c_void) -> OsStatus;
    fn osDelay(ticks: u32) -> OsStatus;
}

fn check(status: OsStatus, what: &str) -> Result<()> {
    if status == OS_OK {
        Ok(())
    } else {
        Err(Errno::from_os_status(status).with_message(what))
    }
}

pub fn init() -> Result<()> {
    check(unsafe { osKernelInitialize() }, "osKernelInitialize failed")
}

/// Hands control to the scheduler. On hardware this call only returns if the
/// kernel refuses to start, so the result is always an error.
pub fn start() -> Result<()> {
    let status = unsafe { osKernelStart() };
    check(status, "osKernelStart returned")
}

pub fn create(entry: ThreadEntry, argument: *mut c_void, attrs: &ThreadAttrs) -> Result<ThreadId> {
    let name = match attrs.name {
        // The kernel keeps the name pointer for the thread's lifetime, so
        // the copy is leaked rather than freed after the call.
        Some(name) => CString::new(name)
            .map_err(|_| Errno::BadParam.with_message("thread name contains NUL"))?
            .into_raw() as *const c_char,
        None => ptr::null(),
    };
    let (stack_mem, stack_size) = match attrs.placement {
        Placement::Dynamic => (ptr::null_mut(), attrs.stack_size as u32),
        Placement::Static { stack, len } => (stack as *mut c_void, len as u32),
    };
    let attr = OsThreadAttr {
        name,
        attr_bits: 0,
        cb_mem: ptr::null_mut(),
        cb_size: 0,
        stack_mem,
        stack_size,
        priority: attrs.priority.as_os_priority(),
        tz_module: 0,
        reserved: 0,
    };

    let id = unsafe { osThreadNew(entry, argument, &attr) };
    if id.is_null() {
        return Err(Errno::NoMemory.with_message("osThreadNew returned a null id"));
    }
    Ok(ThreadId::from_raw(id as usize))
}

pub fn terminate(id: ThreadId) -> Result<()> {
    let status = unsafe { osThreadTerminate(id.as_raw() as *mut c_void) };
    check(status, "osThreadTerminate failed")
}

pub fn delay(ticks: u32) -> Result<()> {
    check(unsafe { osDelay(ticks) }, "osDelay failed")
}
