use crate::core::entity::Entity;

/// Clamps a raw frame delta into `[0, max_delta_time]`; `NaN` becomes `0`.
pub fn clamp_delta(dt: f32, max_delta_time: f32) -> f32 {
    if dt.is_nan() {
        return 0.0;
    }
    dt.clamp(0.0, max_delta_time)
}

/// Explicit Euler position integration with a bounded step.
#[derive(Debug, Clone, Copy)]
pub struct Integrator {
    pub max_delta_time: f32,
}

impl Integrator {
    pub fn new(max_delta_time: f32) -> Self {
        Self { max_delta_time }
    }

    pub fn clamp(&self, dt: f32) -> f32 {
        clamp_delta(dt, self.max_delta_time)
    }

    /// Returns the step actually applied.
    pub fn integrate_position(&self, entity: &mut Entity, dt: f32) -> f32 {
        let dt = self.clamp(dt);
        entity.position += entity.velocity * dt;
        dt
    }
}
