//! Side-hit attribution.
//!
//! A single forward pass over the clip. Each bounce frame with both a ball
//! position and a net reference line increments exactly one side counter;
//! counters never decrease, so the value shown on a frame is always the
//! count so far.

use crate::detections::MatchDetections;
use crate::geometry::compute_reference_line;
use courtside_core::Vec2;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Court half a bounce landed in, relative to the net line in image space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    /// Ball above the net line in the image (far half).
    Top,
    /// Ball on or below the net line (near half).
    Bottom,
}

impl Side {
    /// Strictly above the line is `Top`; on the line counts as `Bottom`.
    #[inline]
    pub fn of(ball_y: f32, reference_line: f32) -> Self {
        if ball_y < reference_line {
            Self::Top
        } else {
            Self::Bottom
        }
    }
}

/// Running ground-hit counts per side.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SideCounters {
    pub top: u32,
    pub bottom: u32,
}

impl SideCounters {
    #[inline]
    pub fn total(&self) -> u32 {
        self.top + self.bottom
    }

    #[inline]
    pub fn get(&self, side: Side) -> u32 {
        match side {
            Side::Top => self.top,
            Side::Bottom => self.bottom,
        }
    }

    #[inline]
    fn increment(&mut self, side: Side) {
        match side {
            Side::Top => self.top += 1,
            Side::Bottom => self.bottom += 1,
        }
    }
}

/// An attributed bounce.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BounceEvent {
    pub frame: usize,
    pub side: Side,
    pub ball: Vec2,
    pub reference_line: f32,
}

/// Why a bounce frame was not attributed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    NoBall,
    NoReferenceLine,
}

/// A bounce frame that left the counters unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedBounce {
    pub frame: usize,
    pub reason: SkipReason,
}

/// Outcome of one attribution step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameAttribution {
    pub frame: usize,
    pub reference_line: Option<f32>,
    /// Counters after this frame, the values overlaid on it.
    pub counters: SideCounters,
    pub event: Option<BounceEvent>,
}

/// Forward-pass attribution state, owned by the caller driving the pass.
#[derive(Debug, Default)]
pub struct HitAttributor {
    counters: SideCounters,
    next_frame: usize,
    events: Vec<BounceEvent>,
    skipped: Vec<SkippedBounce>,
}

impl HitAttributor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current counters.
    #[inline]
    pub fn counters(&self) -> SideCounters {
        self.counters
    }

    /// Attribute frame `frame`, the next frame of the pass.
    ///
    /// Frames must be stepped in increasing order, each at most once; a frame
    /// index already passed is reported with unchanged counters.
    pub fn step(&mut self, frame: usize, detections: &MatchDetections) -> FrameAttribution {
        let reference_line = compute_reference_line(detections.keypoints(frame));

        if frame < self.next_frame {
            debug!(frame, next = self.next_frame, "Frame already attributed");
            return FrameAttribution {
                frame,
                reference_line,
                counters: self.counters,
                event: None,
            };
        }
        self.next_frame = frame + 1;

        let event = if detections.is_bounce(frame) {
            self.attribute_bounce(frame, detections.ball(frame), reference_line)
        } else {
            None
        };

        FrameAttribution {
            frame,
            reference_line,
            counters: self.counters,
            event,
        }
    }

    fn attribute_bounce(
        &mut self,
        frame: usize,
        ball: Option<Vec2>,
        reference_line: Option<f32>,
    ) -> Option<BounceEvent> {
        let skip = |reason| SkippedBounce { frame, reason };
        let ball = match ball {
            Some(ball) if ball.is_finite() => ball,
            _ => {
                self.skipped.push(skip(SkipReason::NoBall));
                debug!(frame, "Bounce without ball position, not attributed");
                return None;
            }
        };
        let Some(line) = reference_line else {
            self.skipped.push(skip(SkipReason::NoReferenceLine));
            debug!(frame, "Bounce without net reference line, not attributed");
            return None;
        };

        let side = Side::of(ball.y, line);
        self.counters.increment(side);
        let event = BounceEvent {
            frame,
            side,
            ball,
            reference_line: line,
        };
        self.events.push(event);
        debug!(
            frame,
            ?side,
            ball_y = ball.y,
            line_y = line,
            top = self.counters.top,
            bottom = self.counters.bottom,
            "Bounce attributed"
        );
        Some(event)
    }

    /// Finish the pass.
    pub fn finish(self) -> AttributionSummary {
        info!(
            top = self.counters.top,
            bottom = self.counters.bottom,
            skipped = self.skipped.len(),
            "Side-hit attribution complete"
        );
        AttributionSummary {
            counters: self.counters,
            events: self.events,
            skipped: self.skipped,
        }
    }

    /// Run the whole pass over `frame_count` frames without rendering.
    pub fn run(frame_count: usize, detections: &MatchDetections) -> AttributionSummary {
        let mut attributor = Self::new();
        for i in 0..frame_count {
            attributor.step(i, detections);
        }
        attributor.finish()
    }
}

/// Final state of a forward pass.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AttributionSummary {
    pub counters: SideCounters,
    pub events: Vec<BounceEvent>,
    pub skipped: Vec<SkippedBounce>,
}

impl AttributionSummary {
    /// Attributed bounce frames on one side, ascending.
    pub fn frames_on(&self, side: Side) -> Vec<usize> {
        self.events
            .iter()
            .filter(|e| e.side == side)
            .map(|e| e.frame)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detections::KeypointSet;
    use proptest::prelude::*;

    fn net_keypoints(line_y: f32) -> KeypointSet {
        (0..14)
            .map(|i| Vec2::new(i as f32 * 10.0, if i == 6 || i == 11 { line_y } else { 0.0 }))
            .collect()
    }

    fn clip(frames: usize, line_y: f32) -> MatchDetections {
        MatchDetections {
            ball_track: vec![None; frames],
            keypoints: vec![Some(net_keypoints(line_y)); frames],
            homographies: vec![None; frames],
            ..Default::default()
        }
    }

    #[test]
    fn test_side_tie_goes_bottom() {
        assert_eq!(Side::of(349.9, 350.0), Side::Top);
        assert_eq!(Side::of(350.0, 350.0), Side::Bottom);
        assert_eq!(Side::of(350.1, 350.0), Side::Bottom);
    }

    #[test]
    fn test_bounce_above_line_counts_top() {
        let mut d = clip(10, 350.0);
        d.ball_track[4] = Some(Vec2::new(600.0, 300.0));
        d.bounces.insert(4);

        let mut attributor = HitAttributor::new();
        let per_frame: Vec<SideCounters> =
            (0..10).map(|i| attributor.step(i, &d).counters).collect();

        for (i, c) in per_frame.iter().enumerate() {
            let expected = if i < 4 {
                SideCounters::default()
            } else {
                SideCounters { top: 1, bottom: 0 }
            };
            assert_eq!(*c, expected, "frame {i}");
        }
        let summary = attributor.finish();
        assert_eq!(summary.frames_on(Side::Top), vec![4]);
        assert!(summary.skipped.is_empty());
    }

    #[test]
    fn test_bounce_below_line_counts_bottom() {
        let mut d = clip(3, 350.0);
        d.ball_track[1] = Some(Vec2::new(600.0, 500.0));
        d.bounces.insert(1);
        let summary = HitAttributor::run(3, &d);
        assert_eq!(summary.counters, SideCounters { top: 0, bottom: 1 });
    }

    #[test]
    fn test_missing_ball_leaves_counters() {
        let mut d = clip(3, 350.0);
        d.bounces.insert(1);
        let summary = HitAttributor::run(3, &d);
        assert_eq!(summary.counters, SideCounters::default());
        assert_eq!(
            summary.skipped,
            vec![SkippedBounce {
                frame: 1,
                reason: SkipReason::NoBall
            }]
        );
    }

    #[test]
    fn test_missing_line_leaves_counters() {
        let mut d = clip(3, 350.0);
        d.keypoints[1] = Some(vec![Vec2::ZERO; 5]);
        d.ball_track[1] = Some(Vec2::new(1.0, 1.0));
        d.bounces.insert(1);
        let mut attributor = HitAttributor::new();
        let step = (0..3).map(|i| attributor.step(i, &d)).nth(1).unwrap();
        assert_eq!(step.reference_line, None);
        assert_eq!(step.event, None);
        assert_eq!(attributor.counters(), SideCounters::default());
    }

    #[test]
    fn test_non_bounce_frames_never_count() {
        let mut d = clip(5, 350.0);
        for i in 0..5 {
            d.ball_track[i] = Some(Vec2::new(0.0, 10.0));
        }
        assert_eq!(HitAttributor::run(5, &d).counters.total(), 0);
    }

    #[test]
    fn test_repeated_step_does_not_double_count() {
        let mut d = clip(3, 350.0);
        d.ball_track[1] = Some(Vec2::new(0.0, 10.0));
        d.bounces.insert(1);
        let mut attributor = HitAttributor::new();
        attributor.step(0, &d);
        attributor.step(1, &d);
        let again = attributor.step(1, &d);
        assert_eq!(again.event, None);
        assert_eq!(attributor.counters().top, 1);
    }

    fn arb_clip() -> impl Strategy<Value = MatchDetections> {
        let frame = (
            prop::option::of((0.0f32..1280.0, 0.0f32..720.0)),
            prop::option::of(200.0f32..500.0),
            any::<bool>(),
        );
        prop::collection::vec(frame, 0..80).prop_map(|frames| {
            let mut d = MatchDetections::default();
            for (i, (ball, line, bounce)) in frames.into_iter().enumerate() {
                d.ball_track.push(ball.map(|(x, y)| Vec2::new(x, y)));
                d.keypoints.push(line.map(net_keypoints));
                d.homographies.push(None);
                if bounce {
                    d.bounces.insert(i);
                }
            }
            d
        })
    }

    proptest! {
        #[test]
        fn counters_are_monotonic_and_step_by_one(d in arb_clip()) {
            let mut attributor = HitAttributor::new();
            let mut prev = SideCounters::default();
            for i in 0..d.ball_track.len() {
                let step = attributor.step(i, &d);
                let c = step.counters;
                prop_assert!(c.top >= prev.top && c.bottom >= prev.bottom);
                prop_assert!(c.total() - prev.total() <= 1);

                let attributable = d.is_bounce(i)
                    && d.ball(i).is_some()
                    && step.reference_line.is_some();
                prop_assert_eq!(c.total() - prev.total(), attributable as u32);
                prop_assert_eq!(step.event.is_some(), attributable);
                prev = c;
            }
        }

        #[test]
        fn pass_is_deterministic(d in arb_clip()) {
            let n = d.ball_track.len();
            prop_assert_eq!(HitAttributor::run(n, &d), HitAttributor::run(n, &d));
        }
    }
}
