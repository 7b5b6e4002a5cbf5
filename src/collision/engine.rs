use crate::config::{ImmovablePairPolicy, PhysicsConfig};
use crate::core::entity::Entity;

use super::narrowphase::{self, Resolution};
use super::registry::ColliderRegistry;

/// Collision and overlap bookkeeping plus the resolution policy.
///
/// The world drives it: [`PhysicsWorld::update_entity`](crate::PhysicsWorld::update_entity)
/// runs per-entity resolution and [`PhysicsWorld::update`](crate::PhysicsWorld::update)
/// runs the overlap pass.
pub struct PhysicsEngine {
    pub registry: ColliderRegistry,
    config: PhysicsConfig,
}

impl PhysicsEngine {
    pub fn new(config: PhysicsConfig) -> Self {
        Self {
            registry: ColliderRegistry::new(),
            config,
        }
    }

    pub fn config(&self) -> &PhysicsConfig {
        &self.config
    }

    /// Pushes the pushable side of an intersecting pair out of the other.
    ///
    /// `a` is the entity being updated. When only `b` is pushable it is the one
    /// that moves; when neither is, the configured policy decides.
    pub fn collide(&self, a: &mut Entity, b: &mut Entity) -> Option<Resolution> {
        if a.id == b.id || !a.aabb().intersects(&b.aabb()) {
            return None;
        }

        let divisor = self.config.vertical_bias_divisor;
        if !a.pushable && b.pushable {
            return Some(narrowphase::resolve(b, a, divisor));
        }
        if !a.pushable && !b.pushable && self.config.immovable_pairs == ImmovablePairPolicy::Ignore {
            return None;
        }
        Some(narrowphase::resolve(a, b, divisor))
    }
}

impl Default for PhysicsEngine {
    fn default() -> Self {
        Self::new(PhysicsConfig::default())
    }
}
