//! Periodic game clock
//!
//! One tokio task per game. Restarting aborts the previous task, so a new
//! maze always gets a full first period, and the task ends on its own the
//! first time the tick callback reports the game is over.

use std::sync::{Mutex, PoisonError};
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};

#[derive(Debug, Default)]
pub struct GameTimer {
    handle: Mutex<Option<JoinHandle<()>>>,
}

impl GameTimer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cancel any running clock and start a new one
    ///
    /// `on_tick` runs once per `period`; returning false stops the clock.
    pub fn restart<F>(&self, period: Duration, mut on_tick: F)
    where
        F: FnMut() -> bool + Send + 'static,
    {
        let task = tokio::spawn(async move {
            let mut interval = interval_at(Instant::now() + period, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                interval.tick().await;
                if !on_tick() {
                    tracing::debug!("Game clock stopped");
                    break;
                }
            }
        });

        let previous = self.slot().replace(task);
        if let Some(previous) = previous {
            previous.abort();
        }
    }

    /// Cancel the clock; no tick fires after this returns
    pub fn stop(&self) {
        if let Some(handle) = self.slot().take() {
            handle.abort();
        }
    }

    pub fn is_running(&self) -> bool {
        self.slot().as_ref().is_some_and(|handle| !handle.is_finished())
    }

    fn slot(&self) -> std::sync::MutexGuard<'_, Option<JoinHandle<()>>> {
        self.handle.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Drop for GameTimer {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    const SECOND: Duration = Duration::from_secs(1);

    fn counter() -> (Arc<AtomicU32>, Arc<AtomicU32>) {
        let count = Arc::new(AtomicU32::new(0));
        (Arc::clone(&count), count)
    }

    #[tokio::test(start_paused = true)]
    async fn test_ticks_once_per_period() {
        let timer = GameTimer::new();
        let (count, seen) = counter();
        timer.restart(SECOND, move || {
            count.fetch_add(1, Ordering::SeqCst);
            true
        });

        tokio::time::sleep(Duration::from_millis(3_500)).await;
        assert_eq!(seen.load(Ordering::SeqCst), 3);
        assert!(timer.is_running());
    }

    #[tokio::test(start_paused = true)]
    async fn test_callback_can_stop_clock() {
        let timer = GameTimer::new();
        let (count, seen) = counter();
        timer.restart(SECOND, move || count.fetch_add(1, Ordering::SeqCst) + 1 < 2);

        tokio::time::sleep(Duration::from_secs(10)).await;
        assert_eq!(seen.load(Ordering::SeqCst), 2);
        assert!(!timer.is_running());
    }

    #[tokio::test(start_paused = true)]
    async fn test_stop_cancels_pending_ticks() {
        let timer = GameTimer::new();
        let (count, seen) = counter();
        timer.restart(SECOND, move || {
            count.fetch_add(1, Ordering::SeqCst);
            true
        });

        tokio::time::sleep(Duration::from_millis(1_500)).await;
        timer.stop();
        tokio::time::sleep(Duration::from_secs(5)).await;
        assert_eq!(seen.load(Ordering::SeqCst), 1);
        assert!(!timer.is_running());
    }

    #[tokio::test(start_paused = true)]
    async fn test_restart_replaces_previous_clock() {
        let timer = GameTimer::new();
        let (old_count, old_seen) = counter();
        timer.restart(SECOND, move || {
            old_count.fetch_add(1, Ordering::SeqCst);
            true
        });
        tokio::time::sleep(Duration::from_millis(1_500)).await;

        let (new_count, new_seen) = counter();
        timer.restart(SECOND, move || {
            new_count.fetch_add(1, Ordering::SeqCst);
            true
        });
        tokio::time::sleep(Duration::from_millis(900)).await;
        // the new clock starts a full period after the restart
        assert_eq!(new_seen.load(Ordering::SeqCst), 0);

        tokio::time::sleep(Duration::from_secs(2)).await;
        assert_eq!(old_seen.load(Ordering::SeqCst), 1);
        assert_eq!(new_seen.load(Ordering::SeqCst), 2);
    }
}
