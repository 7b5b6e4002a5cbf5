use std::time::Instant;

use log::trace;

use super::PhysicsWorld;
use crate::{
    group::Node,
    utils::{
        allocator::{EntityId, GroupId},
        logging::{warn_if_frame_budget_exceeded, ScopedTimer},
    },
};

impl PhysicsWorld {
    /// Starts a frame with a host-supplied delta; returns the clamped delta.
    pub fn begin_frame(&mut self, dt: f32) -> f32 {
        let dt = self.clock.advance(dt);
        trace!("frame {} (dt {:.4})", self.clock.frame(), dt);
        dt
    }

    /// Starts a frame timed by the wall clock.
    pub fn begin_frame_at(&mut self, now: Instant) -> f32 {
        let dt = self.clock.advance_from(now);
        trace!("frame {} (dt {:.4})", self.clock.frame(), dt);
        dt
    }

    /// Updates every entity reachable from `node` that has not been updated
    /// in the current frame yet, using the frame's delta. Returns how many
    /// were updated.
    pub fn update_group(&mut self, node: impl Into<Node>) -> usize {
        let ids: Vec<EntityId> = self.members(node, None).collect();
        self.update_once(ids)
    }

    /// Runs the overlap pass and reports a blown frame budget.
    pub fn end_frame(&mut self) -> usize {
        let fired = self.update();
        warn_if_frame_budget_exceeded(self.clock.frame_elapsed(), self.config().frame_budget_ms);
        fired
    }

    /// One full frame: every live entity is updated once, then overlaps are
    /// evaluated. Returns how many overlap callbacks fired.
    pub fn step(&mut self, dt: f32) -> usize {
        self.begin_frame(dt);
        {
            let _timer = ScopedTimer::new("physics::entities");
            let ids: Vec<EntityId> = self.entities.ids().collect();
            self.update_once(ids);
        }
        self.end_frame()
    }

    /// Updates only the entities reachable from `groups`, then evaluates overlaps.
    pub fn step_groups(&mut self, dt: f32, groups: &[GroupId]) -> usize {
        self.begin_frame(dt);
        {
            let _timer = ScopedTimer::new("physics::entities");
            for group in groups {
                self.update_group(*group);
            }
        }
        self.end_frame()
    }

    fn update_once(&mut self, ids: Vec<EntityId>) -> usize {
        let frame = self.clock.frame();
        let dt = self.clock.delta_time();
        let mut updated = 0;
        for id in ids {
            let fresh = self
                .entities
                .get(id)
                .is_some_and(|entity| entity.last_frame != Some(frame));
            if fresh && self.update_entity(id, dt) {
                updated += 1;
            }
        }
        updated
    }
}
