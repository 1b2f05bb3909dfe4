// Copyright 2024 the Xilem Authors
// SPDX-License-Identifier: Apache-2.0

use std::time::Duration;

use kurbo::Rect;
use tracing::trace;

use crate::anim::AnimationSpec;
use crate::core::NodeId;
use crate::geometry::lerp_rect;

/// An in-flight interpolation of one node's frame.
#[derive(Debug, Clone)]
pub struct FrameAnimation {
    node: NodeId,
    from: Rect,
    to: Rect,
    spec: AnimationSpec,
    elapsed: Duration,
}

impl FrameAnimation {
    /// Animate the frame of `node` from `from` to `to`.
    pub fn new(node: NodeId, from: Rect, to: Rect, spec: AnimationSpec) -> Self {
        Self {
            node,
            from,
            to,
            spec,
            elapsed: Duration::ZERO,
        }
    }

    /// The animated node.
    pub fn node(&self) -> NodeId {
        self.node
    }

    /// The frame the animation started from.
    pub fn from(&self) -> Rect {
        self.from
    }

    /// The frame the animation ends on.
    pub fn target(&self) -> Rect {
        self.to
    }

    /// Time since registration.
    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    /// The interpolated frame at the current elapsed time.
    pub fn sample(&self) -> Rect {
        let t = self.spec.progress(self.elapsed);
        if t == 0. {
            self.from
        } else if t == 1. {
            self.to
        } else {
            lerp_rect(self.from, self.to, t)
        }
    }

    /// Whether the target frame has been reached.
    pub fn is_finished(&self) -> bool {
        self.elapsed >= self.spec.total()
    }
}

/// The set of in-flight frame animations, at most one per node.
#[derive(Debug, Default)]
pub struct AnimationScheduler {
    executors: Vec<FrameAnimation>,
}

impl AnimationScheduler {
    /// Create an empty scheduler.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an executor, replacing the one in flight for the same node, if any.
    pub fn register(&mut self, animation: FrameAnimation) {
        trace!(
            "animating {} from {:?} to {:?}",
            animation.node, animation.from, animation.to
        );
        match self
            .executors
            .iter_mut()
            .find(|existing| existing.node == animation.node)
        {
            Some(existing) => *existing = animation,
            None => self.executors.push(animation),
        }
    }

    /// Advance every executor by `dt`.
    ///
    /// Returns the frame each animated node must render with this tick. Executors that
    /// reach their target during this tick report it exactly and are dropped afterwards.
    pub fn tick(&mut self, dt: Duration) -> Vec<(NodeId, Rect)> {
        let mut frames = Vec::with_capacity(self.executors.len());
        for animation in &mut self.executors {
            animation.elapsed += dt;
            frames.push((animation.node, animation.sample()));
        }
        self.executors.retain(|animation| !animation.is_finished());
        frames
    }

    /// Drop the executor of `node`.
    pub fn cancel(&mut self, node: NodeId) {
        self.executors.retain(|animation| animation.node != node);
    }

    /// The executor in flight for `node`.
    pub fn get(&self, node: NodeId) -> Option<&FrameAnimation> {
        self.executors.iter().find(|animation| animation.node == node)
    }

    /// Whether any executor is in flight.
    pub fn is_active(&self) -> bool {
        !self.executors.is_empty()
    }

    /// Number of executors in flight.
    pub fn len(&self) -> usize {
        self.executors.len()
    }

    /// Whether no executor is in flight.
    pub fn is_empty(&self) -> bool {
        self.executors.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use float_cmp::assert_approx_eq;

    use super::*;
    use crate::anim::Curve;

    fn linear(millis: u64) -> AnimationSpec {
        AnimationSpec::new(Curve::Linear, Duration::from_millis(millis))
    }

    #[test]
    fn boundaries_are_exact() {
        let from = Rect::new(0., 0., 10., 10.);
        let to = Rect::new(0., 0., 50., 50.);
        let mut animation = FrameAnimation::new(NodeId::next(), from, to, linear(200));
        assert_eq!(animation.sample(), from);
        animation.elapsed = Duration::from_millis(100);
        assert_eq!(animation.sample().size(), kurbo::Size::new(30., 30.));
        animation.elapsed = Duration::from_millis(200);
        assert_eq!(animation.sample(), to);
    }

    #[test]
    fn intermediate_values_lie_between_endpoints() {
        let from = Rect::from_origin_size((5., 40.), (10., 80.));
        let to = Rect::from_origin_size((25., 0.), (50., 20.));
        for curve in [Curve::Linear, Curve::Quadratic, Curve::Smoothstep, Curve::Parametric] {
            let mut animation = FrameAnimation::new(
                NodeId::next(),
                from,
                to,
                AnimationSpec::new(curve, Duration::from_millis(100)),
            );
            for _ in 0..9 {
                animation.elapsed += Duration::from_millis(10);
                let frame = animation.sample();
                assert!((5. ..=25.).contains(&frame.x0));
                assert!((0. ..=40.).contains(&frame.y0));
                assert!((10. ..=50.).contains(&frame.width()));
                assert!((20. ..=80.).contains(&frame.height()));
            }
        }
    }

    #[test]
    fn completed_executors_are_pruned_after_their_last_tick() {
        let node = NodeId::next();
        let to = Rect::new(0., 0., 50., 50.);
        let mut scheduler = AnimationScheduler::new();
        scheduler.register(FrameAnimation::new(
            node,
            Rect::new(0., 0., 10., 10.),
            to,
            linear(200),
        ));
        let frames = scheduler.tick(Duration::from_millis(100));
        assert_eq!(frames.len(), 1);
        assert_approx_eq!(f64, frames[0].1.width(), 30.);
        assert!(scheduler.is_active());

        let frames = scheduler.tick(Duration::from_millis(150));
        assert_eq!(frames, vec![(node, to)]);
        assert!(scheduler.is_empty());
        assert!(scheduler.tick(Duration::from_millis(16)).is_empty());
    }

    #[test]
    fn registering_replaces_the_executor_in_flight() {
        let node = NodeId::next();
        let mut scheduler = AnimationScheduler::new();
        let start = Rect::new(0., 0., 10., 10.);
        scheduler.register(FrameAnimation::new(
            node,
            start,
            Rect::new(0., 0., 20., 20.),
            linear(100),
        ));
        scheduler.register(FrameAnimation::new(
            node,
            start,
            Rect::new(0., 0., 90., 90.),
            linear(100),
        ));
        assert_eq!(scheduler.len(), 1);
        assert_eq!(
            scheduler.get(node).map(FrameAnimation::target),
            Some(Rect::new(0., 0., 90., 90.))
        );
        scheduler.cancel(node);
        assert!(scheduler.get(node).is_none());
    }

    #[test]
    fn delay_holds_the_old_frame() {
        let from = Rect::new(0., 0., 10., 10.);
        let mut scheduler = AnimationScheduler::new();
        scheduler.register(FrameAnimation::new(
            NodeId::next(),
            from,
            Rect::new(100., 0., 110., 10.),
            linear(100).with_delay(Duration::from_millis(50)),
        ));
        let frames = scheduler.tick(Duration::from_millis(40));
        assert_eq!(frames[0].1, from);
    }
}
