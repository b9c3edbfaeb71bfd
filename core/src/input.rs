//! Directional intents from keys and from the pointer stream
//!
//! Pointer samples live on a 1024x1024 logical space. A sample far enough
//! from the centre becomes a move along its dominant axis; a sample inside
//! the dead zone becomes nothing. Pointer intents are rate limited by a
//! `Debouncer`; key presses are not.

use crate::maze_gen::Direction;
use crate::{DEAD_ZONE, INPUT_CENTER, MOVE_DELAY_MS};

/// One raw sample of the external pointer stream
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PointerSample {
    pub x: f64,
    pub y: f64,
    /// Reset request; starts a new maze
    pub button: bool,
}

fn abs(value: f64) -> f64 {
    if value < 0.0 {
        -value
    } else {
        value
    }
}

/// Map a raw pointer coordinate to a direction
///
/// Ties between the axes (equal magnitude) go to the horizontal branch. The
/// vertical axis is inverted: samples below the centre (larger y) mean Up.
pub fn normalize(x: f64, y: f64) -> Option<Direction> {
    let delta_x = x - INPUT_CENTER;
    let delta_y = y - INPUT_CENTER;

    if abs(delta_x) <= DEAD_ZONE && abs(delta_y) <= DEAD_ZONE {
        return None;
    }

    if abs(delta_x) >= abs(delta_y) {
        Some(if delta_x > 0.0 { Direction::Right } else { Direction::Left })
    } else {
        Some(if delta_y > 0.0 { Direction::Up } else { Direction::Down })
    }
}

/// Map a keyboard key name to a direction; anything but the arrows is ignored
pub fn direction_from_key(key: &str) -> Option<Direction> {
    match key {
        "ArrowUp" => Some(Direction::Up),
        "ArrowRight" => Some(Direction::Right),
        "ArrowDown" => Some(Direction::Down),
        "ArrowLeft" => Some(Direction::Left),
        _ => None,
    }
}

/// Minimum-interval gate over a millisecond clock supplied by the caller
#[derive(Clone, Debug)]
pub struct Debouncer {
    interval_ms: u64,
    last_accepted: Option<u64>,
}

impl Debouncer {
    pub fn new(interval_ms: u64) -> Self {
        Self {
            interval_ms,
            last_accepted: None,
        }
    }

    /// Accept an intent at `now_ms` unless one was accepted less than the
    /// interval ago. Only accepted intents restart the interval.
    pub fn accept(&mut self, now_ms: u64) -> bool {
        if let Some(last) = self.last_accepted {
            if now_ms.saturating_sub(last) < self.interval_ms {
                return false;
            }
        }
        self.last_accepted = Some(now_ms);
        true
    }

    pub fn interval_ms(&self) -> u64 {
        self.interval_ms
    }
}

impl Default for Debouncer {
    fn default() -> Self {
        Self::new(MOVE_DELAY_MS)
    }
}

/// What one pointer sample asks the game to do
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PointerOutcome {
    /// Direction accepted for processing, after dead zone and debounce
    pub intent: Option<Direction>,
    /// Start a new maze, applied after `intent`
    pub reset: bool,
}

/// Dead zone, dominant axis, and debounce for the pointer stream
#[derive(Clone, Debug, Default)]
pub struct InputNormalizer {
    debouncer: Debouncer,
}

impl InputNormalizer {
    pub fn new(move_delay_ms: u64) -> Self {
        Self {
            debouncer: Debouncer::new(move_delay_ms),
        }
    }

    /// Turn a sample received at `now_ms` into an outcome
    ///
    /// Samples inside the dead zone do not touch the debounce clock. The
    /// reset flag passes through regardless of dead zone or debounce.
    pub fn process(&mut self, sample: PointerSample, now_ms: u64) -> PointerOutcome {
        let intent = normalize(sample.x, sample.y).filter(|_| self.debouncer.accept(now_ms));
        PointerOutcome {
            intent,
            reset: sample.button,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(x: f64, y: f64) -> PointerSample {
        PointerSample { x, y, button: false }
    }

    #[test]
    fn test_dead_zone() {
        assert_eq!(normalize(511.0, 512.0), None);
        assert_eq!(normalize(511.5, 511.5), None);
        // boundary of the dead zone is still dead
        assert_eq!(normalize(561.5, 461.5), None);
    }

    #[test]
    fn test_directions() {
        assert_eq!(normalize(600.0, 511.0), Some(Direction::Right));
        assert_eq!(normalize(400.0, 511.0), Some(Direction::Left));
        assert_eq!(normalize(511.0, 600.0), Some(Direction::Up));
        assert_eq!(normalize(511.0, 400.0), Some(Direction::Down));
    }

    #[test]
    fn test_extremes() {
        assert_eq!(normalize(1023.0, 511.5), Some(Direction::Right));
        assert_eq!(normalize(0.0, 511.5), Some(Direction::Left));
        assert_eq!(normalize(511.5, 1023.0), Some(Direction::Up));
        assert_eq!(normalize(511.5, 0.0), Some(Direction::Down));
    }

    #[test]
    fn test_one_axis_outside_dead_zone() {
        // only y leaves the dead zone, but it also dominates
        assert_eq!(normalize(540.0, 600.0), Some(Direction::Up));
    }

    #[test]
    fn test_tie_goes_horizontal() {
        assert_eq!(normalize(611.5, 611.5), Some(Direction::Right));
        assert_eq!(normalize(411.5, 611.5), Some(Direction::Left));
        assert_eq!(normalize(411.5, 411.5), Some(Direction::Left));
    }

    #[test]
    fn test_key_mapping() {
        assert_eq!(direction_from_key("ArrowUp"), Some(Direction::Up));
        assert_eq!(direction_from_key("ArrowRight"), Some(Direction::Right));
        assert_eq!(direction_from_key("ArrowDown"), Some(Direction::Down));
        assert_eq!(direction_from_key("ArrowLeft"), Some(Direction::Left));
        assert_eq!(direction_from_key("w"), None);
        assert_eq!(direction_from_key("arrowup"), None);
        assert_eq!(direction_from_key(""), None);
    }

    #[test]
    fn test_debounce_10ms_apart() {
        let mut normalizer = InputNormalizer::default();
        let first = normalizer.process(sample(600.0, 511.0), 1_000);
        let second = normalizer.process(sample(600.0, 511.0), 1_010);
        assert_eq!(first.intent, Some(Direction::Right));
        assert_eq!(second.intent, None);
    }

    #[test]
    fn test_debounce_150ms_apart() {
        let mut normalizer = InputNormalizer::default();
        let first = normalizer.process(sample(600.0, 511.0), 1_000);
        let second = normalizer.process(sample(400.0, 511.0), 1_150);
        assert_eq!(first.intent, Some(Direction::Right));
        assert_eq!(second.intent, Some(Direction::Left));
    }

    #[test]
    fn test_debounce_exact_interval_accepted() {
        let mut debouncer = Debouncer::new(100);
        assert!(debouncer.accept(0));
        assert!(!debouncer.accept(99));
        assert!(debouncer.accept(100));
    }

    #[test]
    fn test_rejected_intent_does_not_restart_interval() {
        let mut debouncer = Debouncer::new(100);
        assert!(debouncer.accept(1_000));
        assert!(!debouncer.accept(1_060));
        // measured from the accepted intent at 1000, not the rejected one
        assert!(debouncer.accept(1_100));
    }

    #[test]
    fn test_dead_zone_does_not_consume_debounce() {
        let mut normalizer = InputNormalizer::default();
        let idle = normalizer.process(sample(511.0, 511.0), 1_000);
        let moved = normalizer.process(sample(700.0, 511.0), 1_005);
        assert_eq!(idle.intent, None);
        assert_eq!(moved.intent, Some(Direction::Right));
    }

    #[test]
    fn test_reset_ignores_dead_zone_and_debounce() {
        let mut normalizer = InputNormalizer::default();
        normalizer.process(sample(600.0, 511.0), 1_000);

        let in_dead_zone = normalizer.process(PointerSample { x: 511.0, y: 511.0, button: true }, 1_001);
        assert_eq!(in_dead_zone, PointerOutcome { intent: None, reset: true });

        let debounced = normalizer.process(PointerSample { x: 900.0, y: 511.0, button: true }, 1_002);
        assert_eq!(debounced, PointerOutcome { intent: None, reset: true });
    }

    #[test]
    fn test_first_sample_accepted_at_time_zero() {
        let mut normalizer = InputNormalizer::new(100);
        assert_eq!(normalizer.process(sample(511.0, 0.0), 0).intent, Some(Direction::Down));
    }
}
