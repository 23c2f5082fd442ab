//! Opacity decay for temporary-pen strokes.
//!
//! The controller is polled once per render tick. After a period without
//! temporary-pen activity it interpolates every temporary path's live alpha
//! toward zero and, once nothing is visible any more, empties the temporary
//! collection.

use crate::store::{Collection, PathStore};

/// Idle time before temporary strokes start fading, in milliseconds.
pub const INACTIVITY_THRESHOLD_MS: u64 = 1500;
/// Duration of the fade itself, in milliseconds.
pub const FADE_DURATION_MS: u64 = 1500;
/// Alpha at or below which a path counts as faded out.
pub const VISIBILITY_EPSILON: f64 = 1.0;

/// What a tick did.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FadeTick {
    /// Nothing to do.
    Idle,
    /// Fading is in progress.
    Fading { progress: f64 },
    /// The temporary collection faded out and was emptied.
    Cleared { removed: usize },
}

/// Timed state machine governing the temporary collection.
#[derive(Debug, Clone)]
pub struct FadeController {
    last_activity_ms: Option<u64>,
    is_fading: bool,
    fade_start_ms: u64,
    inactivity_ms: u64,
    duration_ms: u64,
}

impl Default for FadeController {
    fn default() -> Self {
        Self::new(INACTIVITY_THRESHOLD_MS, FADE_DURATION_MS)
    }
}

impl FadeController {
    pub fn new(inactivity_ms: u64, duration_ms: u64) -> Self {
        Self {
            last_activity_ms: None,
            is_fading: false,
            fade_start_ms: 0,
            inactivity_ms,
            duration_ms,
        }
    }

    pub fn is_fading(&self) -> bool {
        self.is_fading
    }

    pub fn last_activity_ms(&self) -> Option<u64> {
        self.last_activity_ms
    }

    pub fn fade_start_ms(&self) -> Option<u64> {
        self.is_fading.then_some(self.fade_start_ms)
    }

    /// Mark temporary-pen activity at `now_ms`.
    pub fn touch(&mut self, now_ms: u64) {
        self.last_activity_ms = Some(now_ms);
    }

    /// Stop fading and restore every temporary path to its original opacity.
    pub fn cancel(&mut self, store: &mut PathStore) {
        self.is_fading = false;
        store.for_each_mut(Collection::Temporary, |path| path.restore_alpha());
    }

    /// Activity while drawing: refresh the timestamp and cancel a running fade.
    pub fn record_activity(&mut self, now_ms: u64, store: &mut PathStore) {
        self.touch(now_ms);
        if self.is_fading {
            self.cancel(store);
        }
    }

    /// Back to the initial state: not fading, no recorded activity.
    pub fn reset(&mut self) {
        self.is_fading = false;
        self.last_activity_ms = None;
    }

    /// Fade progress in `0..=1` at `now_ms`.
    pub fn progress(&self, now_ms: u64) -> f64 {
        if self.duration_ms == 0 {
            return 1.0;
        }
        let elapsed = now_ms.saturating_sub(self.fade_start_ms) as f64;
        (elapsed / self.duration_ms as f64).clamp(0.0, 1.0)
    }

    fn should_start(&self, now_ms: u64, store: &PathStore, drawing: bool) -> bool {
        if self.is_fading || drawing || store.is_empty(Collection::Temporary) {
            return false;
        }
        self.last_activity_ms
            .is_some_and(|last| now_ms.saturating_sub(last) > self.inactivity_ms)
    }

    /// Advance the state machine by one render tick.
    ///
    /// `drawing` is true while a stroke is in progress; fading never starts
    /// during a stroke.
    pub fn tick(&mut self, now_ms: u64, store: &mut PathStore, drawing: bool) -> FadeTick {
        if self.should_start(now_ms, store, drawing) {
            log::debug!("Temporary strokes start fading");
            self.is_fading = true;
            self.fade_start_ms = now_ms;
        }
        if !self.is_fading {
            return FadeTick::Idle;
        }

        let progress = self.progress(now_ms);
        let mut all_faded = true;
        store.for_each_mut(Collection::Temporary, |path| {
            path.apply_fade(progress);
            if path.effective_alpha() > VISIBILITY_EPSILON {
                all_faded = false;
            }
        });

        if all_faded || progress >= 1.0 {
            let removed = store.detach_all(Collection::Temporary);
            self.reset();
            log::debug!("Cleared {} faded temporary stroke(s)", removed);
            return FadeTick::Cleared { removed };
        }
        FadeTick::Fading { progress }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::path::{Path, PathTool, Rgba};
    use kurbo::Point;

    fn store_with_temp(alpha: u8) -> PathStore {
        let mut store = PathStore::new();
        store.insert(
            Path::new(
                vec![Point::ZERO, Point::new(10.0, 0.0)],
                Rgba::black().with_alpha(alpha),
                5.0,
                PathTool::TempPen,
            ),
            Collection::Temporary,
        );
        store
    }

    fn alphas(store: &PathStore) -> Vec<f64> {
        store
            .iter(Collection::Temporary)
            .map(|p| p.effective_alpha())
            .collect()
    }

    #[test]
    fn test_starts_after_inactivity() {
        let mut store = store_with_temp(255);
        let mut fade = FadeController::default();
        let now = 10_000;
        fade.touch(now - 2000);

        let tick = fade.tick(now, &mut store, false);
        assert!(fade.is_fading());
        assert_eq!(fade.fade_start_ms(), Some(now));
        assert_eq!(tick, FadeTick::Fading { progress: 0.0 });
    }

    #[test]
    fn test_does_not_start_before_threshold() {
        let mut store = store_with_temp(255);
        let mut fade = FadeController::default();
        fade.touch(1000);
        assert_eq!(fade.tick(2500, &mut store, false), FadeTick::Idle);
        assert!(!fade.is_fading());
    }

    #[test]
    fn test_does_not_start_without_activity() {
        let mut store = store_with_temp(255);
        let mut fade = FadeController::default();
        assert_eq!(fade.tick(1_000_000, &mut store, false), FadeTick::Idle);
    }

    #[test]
    fn test_does_not_start_while_drawing() {
        let mut store = store_with_temp(255);
        let mut fade = FadeController::default();
        fade.touch(0);
        assert_eq!(fade.tick(5000, &mut store, true), FadeTick::Idle);
    }

    #[test]
    fn test_does_not_start_when_empty() {
        let mut store = PathStore::new();
        let mut fade = FadeController::default();
        fade.touch(0);
        assert_eq!(fade.tick(5000, &mut store, false), FadeTick::Idle);
    }

    #[test]
    fn test_alpha_is_monotonic_until_cleared() {
        let mut store = store_with_temp(255);
        let mut fade = FadeController::default();
        fade.touch(0);
        fade.tick(2000, &mut store, false);

        let mut last = 255.0;
        let mut now = 2000;
        loop {
            now += 16;
            match fade.tick(now, &mut store, false) {
                FadeTick::Fading { .. } => {
                    let alpha = alphas(&store)[0];
                    assert!(alpha <= last);
                    last = alpha;
                }
                FadeTick::Cleared { removed } => {
                    assert_eq!(removed, 1);
                    break;
                }
                FadeTick::Idle => panic!("fade stopped unexpectedly"),
            }
        }
        assert!(store.is_empty(Collection::Temporary));
        assert!(!fade.is_fading());
        assert_eq!(fade.last_activity_ms(), None);
    }

    #[test]
    fn test_progress_halfway() {
        let mut store = store_with_temp(200);
        let mut fade = FadeController::default();
        fade.touch(0);
        fade.tick(2000, &mut store, false);
        fade.tick(2750, &mut store, false);
        assert!((alphas(&store)[0] - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_low_alpha_clears_early() {
        // 2 * (1 - progress) <= 1 once progress reaches one half
        let mut store = store_with_temp(2);
        let mut fade = FadeController::default();
        fade.touch(0);
        fade.tick(2000, &mut store, false);
        assert_eq!(
            fade.tick(2750, &mut store, false),
            FadeTick::Cleared { removed: 1 }
        );
    }

    #[test]
    fn test_record_activity_cancels_fade() {
        let mut store = store_with_temp(255);
        let mut fade = FadeController::default();
        fade.touch(0);
        fade.tick(2000, &mut store, false);
        fade.tick(2500, &mut store, false);
        assert!(alphas(&store)[0] < 255.0);

        fade.record_activity(2600, &mut store);
        assert!(!fade.is_fading());
        assert_eq!(alphas(&store), vec![255.0]);
        assert_eq!(fade.last_activity_ms(), Some(2600));
    }
}
