use image::RgbaImage;
use std::collections::HashMap;
use std::time::{Duration, Instant};

use table_capture::{crop_rect, Frame, Rect};

#[derive(Debug)]
struct RegionWatch {
    watch_start: Option<Instant>,
    duration: Duration,
    baseline: Option<RgbaImage>,
    animating: bool,
}

impl RegionWatch {
    fn idle() -> Self {
        Self {
            watch_start: None,
            duration: Duration::ZERO,
            baseline: None,
            animating: false,
        }
    }
}

/// Per-region debounce automaton deciding whether a region's content is
/// mid-animation.
///
/// A region is flagged animating only while its content has changed
/// within the watch window; the window runs from the original watch
/// start and is never extended by further changes. Consumers skip phase
/// evaluation for any region currently flagged animating.
#[derive(Debug, Default)]
pub struct SettleDetector {
    regions: HashMap<String, RegionWatch>,
}

impl SettleDetector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Arm the watch timer for `name` from the frame's capture time,
    /// unless a watch is already running. The duration is refreshed
    /// either way.
    pub fn watch(&mut self, name: &str, frame: &Frame, duration: Duration) {
        let entry = self
            .regions
            .entry(name.to_string())
            .or_insert_with(RegionWatch::idle);
        entry.duration = duration;
        if entry.watch_start.is_none() {
            entry.watch_start = Some(frame.captured_at);
        }
    }

    /// Compare the region's current content against the stored baseline
    /// and update the animation flag.
    pub fn poll(&mut self, name: &str, frame: &Frame, rect: &Rect) {
        let content = crop_rect(&frame.pixels, rect);
        let entry = self
            .regions
            .entry(name.to_string())
            .or_insert_with(RegionWatch::idle);

        let Some(baseline) = &entry.baseline else {
            // First observation: the content becomes the baseline.
            entry.baseline = Some(content);
            entry.animating = false;
            return;
        };

        let Some(start) = entry.watch_start else {
            entry.baseline = Some(content);
            entry.animating = false;
            return;
        };

        let elapsed = frame.captured_at.saturating_duration_since(start);
        if elapsed < entry.duration {
            if content.as_raw() != baseline.as_raw() {
                // Content moved inside the window: flag it and track the
                // new content, but keep the timer on the original start.
                entry.baseline = Some(content);
                entry.animating = true;
            }
        } else {
            // Window elapsed: freeze the baseline and disarm until the
            // next watch() call re-arms the timer.
            entry.watch_start = None;
            entry.baseline = Some(content);
            entry.animating = false;
        }
    }

    /// Whether the region is currently flagged as mid-animation.
    /// Unknown regions are treated as settled.
    pub fn is_animating(&self, name: &str) -> bool {
        self.regions.get(name).is_some_and(|r| r.animating)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    const REGION: &str = "board";
    const RECT: Rect = Rect { x: 0, y: 0, width: 4, height: 4 };

    fn frame_at(shade: u8, at: Instant) -> Frame {
        Frame::with_timestamp(RgbaImage::from_pixel(4, 4, Rgba([shade, shade, shade, 255])), at)
    }

    fn tick(detector: &mut SettleDetector, frame: &Frame, duration: Duration) {
        detector.watch(REGION, frame, duration);
        detector.poll(REGION, frame, &RECT);
    }

    #[test]
    fn test_first_observation_is_settled() {
        let mut detector = SettleDetector::new();
        tick(&mut detector, &frame_at(10, Instant::now()), Duration::from_secs(1));
        assert!(!detector.is_animating(REGION));
    }

    #[test]
    fn test_stable_content_never_animates() {
        let mut detector = SettleDetector::new();
        let t0 = Instant::now();
        let duration = Duration::from_millis(1000);
        for offset in [0, 200, 400, 900, 1100] {
            tick(&mut detector, &frame_at(10, t0 + Duration::from_millis(offset)), duration);
            assert!(!detector.is_animating(REGION));
        }
    }

    #[test]
    fn test_change_flags_animation_until_window_elapses() {
        let mut detector = SettleDetector::new();
        let t0 = Instant::now();
        let duration = Duration::from_millis(1000);

        tick(&mut detector, &frame_at(10, t0), duration);
        assert!(!detector.is_animating(REGION));

        // Content changes inside the window: animating immediately.
        tick(&mut detector, &frame_at(50, t0 + Duration::from_millis(100)), duration);
        assert!(detector.is_animating(REGION));

        // Holds steady afterwards, but the window has not elapsed yet.
        tick(&mut detector, &frame_at(50, t0 + Duration::from_millis(600)), duration);
        assert!(detector.is_animating(REGION));
        tick(&mut detector, &frame_at(50, t0 + Duration::from_millis(999)), duration);
        assert!(detector.is_animating(REGION));

        // Settled only once the full duration from the watch start passed.
        tick(&mut detector, &frame_at(50, t0 + Duration::from_millis(1000)), duration);
        assert!(!detector.is_animating(REGION));
    }

    #[test]
    fn test_timer_not_reset_by_late_change() {
        let mut detector = SettleDetector::new();
        let t0 = Instant::now();
        let duration = Duration::from_millis(1000);

        tick(&mut detector, &frame_at(10, t0), duration);
        // A change just before expiry still flags animation...
        tick(&mut detector, &frame_at(80, t0 + Duration::from_millis(950)), duration);
        assert!(detector.is_animating(REGION));
        // ...but the window stays relative to the original watch start,
        // so 50ms later the region is settled.
        tick(&mut detector, &frame_at(80, t0 + Duration::from_millis(1000)), duration);
        assert!(!detector.is_animating(REGION));
    }

    #[test]
    fn test_window_rearms_after_expiry() {
        let mut detector = SettleDetector::new();
        let t0 = Instant::now();
        let duration = Duration::from_millis(1000);

        tick(&mut detector, &frame_at(10, t0), duration);
        tick(&mut detector, &frame_at(10, t0 + Duration::from_millis(1000)), duration);
        assert!(!detector.is_animating(REGION));

        // The next tick re-arms the timer; a change within the new
        // window animates again.
        tick(&mut detector, &frame_at(30, t0 + Duration::from_millis(1100)), duration);
        assert!(detector.is_animating(REGION));
    }

    #[test]
    fn test_unknown_region_is_settled() {
        let detector = SettleDetector::new();
        assert!(!detector.is_animating("nothing"));
    }
}
