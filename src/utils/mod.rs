//! Utility helpers: generational handles and logging timers.

pub mod allocator;
pub mod logging;

pub use allocator::{Arena, ArenaId, EntityId, GenerationalId, GroupId};
pub use logging::{ScopedTimer, warn_if_frame_budget_exceeded};
