#![no_std]

extern crate alloc;

use core::fmt::{Debug, Display};

use alloc::string::String;

pub type Result<T> = core::result::Result<T, Error>;

impl Errno {
    pub fn with_message<S: Into<String>>(&self, message: S) -> Error {
        Error {
            errno: *self,
            message: message.into(),
        }
    }

    pub fn no_message(&self) -> Error {
        Error {
            errno: *self,
            message: String::new(),
        }
    }
}

pub struct Error {
    errno: Errno,
    message: String,
}

impl Error {
    pub fn errno(&self) -> Errno {
        self.errno
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl From<Error> for i32 {
    fn from(error: Error) -> Self {
        error.errno as i32
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{:?}: {}", self.errno, self.message)
    }
}

impl Debug for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{:?}: {}", self.errno, self.message)
    }
}

impl core::error::Error for Error {}

/// Kernel and wrapper error codes.
///
/// The first block mirrors the status space of a CMSIS-RTOS2 kernel, the
/// rest are wrapper-level conditions.
#[repr(i32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Errno {
    Failed = 1,
    Timeout = 2,
    Resource = 3,
    BadParam = 4,
    NoMemory = 5,
    Isr = 6,
    BadHandle = 7,
    AlreadyRegistered = 8,
    NotSupported = 9,
}

impl Errno {
    /// Maps a raw CMSIS-RTOS2 `osStatus_t` onto an [`Errno`].
    ///
    /// `osOK` (0) is not an error and must be filtered out by the caller;
    /// unknown negative codes collapse to [`Errno::Failed`].
    pub fn from_os_status(status: i32) -> Self {
        match status {
            -2 => Self::Timeout,
            -3 => Self::Resource,
            -4 => Self::BadParam,
            -5 => Self::NoMemory,
            -6 => Self::Isr,
            _ => Self::Failed,
        }
    }
}
