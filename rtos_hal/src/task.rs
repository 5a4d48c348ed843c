use core::ffi::c_void;

/// Entry function the kernel runs on the new thread's own stack once it is
/// first scheduled. The argument is the opaque value passed at creation.
pub type ThreadEntry = extern "C" fn(*mut c_void);

/// Opaque thread identity issued by the kernel, unique per live thread.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ThreadId(usize);

impl ThreadId {
    pub const fn from_raw(raw: usize) -> Self {
        Self(raw)
    }

    pub const fn as_raw(&self) -> usize {
        self.0
    }
}

/// Scheduling priority, mirroring the CMSIS-RTOS2 priority ladder.
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Priority {
    Low,
    BelowNormal,
    #[default]
    Normal,
    AboveNormal,
    High,
    Realtime,
}

impl Priority {
    /// The raw `osPriority_t` value.
    pub fn as_os_priority(&self) -> i32 {
        match self {
            Self::Low => 8,
            Self::BelowNormal => 16,
            Self::Normal => 24,
            Self::AboveNormal => 32,
            Self::High => 40,
            Self::Realtime => 48,
        }
    }
}

/// Where the thread's stack lives.
#[derive(Default, Debug, Clone, Copy)]
pub enum Placement {
    /// The kernel allocates the stack from its own pools.
    #[default]
    Dynamic,
    /// Caller-provided stack memory; must outlive the thread.
    Static { stack: *mut u8, len: usize },
}

/// Thread creation options. Every field may be left at its default.
#[derive(Default, Debug, Clone, Copy)]
pub struct ThreadAttrs {
    /// Display name, for diagnostics.
    pub name: Option<&'static str>,
    /// Stack size in bytes; 0 means the kernel default.
    pub stack_size: usize,
    pub priority: Priority,
    pub placement: Placement,
}
