//! The kernel thread contract: `create` and `terminate`, plus the bring-up
//! calls around them. Which backend provides it is decided per target in
//! `lib.rs`.

pub use crate::platform::{create, delay, init, start, terminate};
