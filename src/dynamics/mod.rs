//! Time stepping: the frame clock and position integration.

pub mod clock;
pub mod integrator;

pub use clock::FrameClock;
pub use integrator::{clamp_delta, Integrator};
