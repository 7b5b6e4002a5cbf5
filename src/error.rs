//! Error types for the engine.
//!
//! Almost every runtime operation is a silent no-op on bad input; errors are
//! reserved for construction, configuration, and explicit handle lookups.

use thiserror::Error;

use crate::utils::allocator::{EntityId, GroupId};

#[derive(Debug, Clone, PartialEq, Error)]
pub enum EngineError {
    /// Width or height was zero, negative, or not finite.
    #[error("invalid entity size {width}x{height}: both dimensions must be positive and finite")]
    InvalidSize { width: f32, height: f32 },
    /// Position or velocity component was not finite.
    #[error("invalid {field}: ({x}, {y}) is not finite")]
    NonFinite { field: &'static str, x: f32, y: f32 },
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("entity {0:?} does not exist")]
    UnknownEntity(EntityId),
    #[error("group {0:?} does not exist")]
    UnknownGroup(GroupId),
}

pub type EngineResult<T> = std::result::Result<T, EngineError>;
