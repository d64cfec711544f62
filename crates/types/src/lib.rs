//! Core value types shared by every Feedview crate.
//!
//! - [`ViewId`]: opaque identity of one mounted video view (a registrant)
//! - [`Viewport`]: vertical viewport geometry and the safe-zone math
//! - [`Platform`]: deployment target of the hosting client

mod identifiers;
mod platform;
mod viewport;

pub use identifiers::{ViewId, ViewIdAllocator};
pub use platform::Platform;
pub use viewport::{Viewport, DEFAULT_SAFE_ZONE_RATIO};
