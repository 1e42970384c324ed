//! Millisecond timers driven by an external clock.
//!
//! Nothing here reads wall-clock time. The owner calls `advance` with the
//! elapsed milliseconds of a tick and simply stops calling it while the game
//! is frozen, so a paused timer keeps its exact elapsed progress.

use crate::entities::EntityId;

/// A looping timer that fires every `interval_ms`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PeriodicTimer {
    interval_ms: u64,
    elapsed_ms: u64,
}

impl PeriodicTimer {
    pub fn new(interval_ms: u64) -> Self {
        Self {
            interval_ms: interval_ms.max(1),
            elapsed_ms: 0,
        }
    }

    /// Advance by `dt_ms` and return how many times the timer fired.
    pub fn advance(&mut self, dt_ms: u64) -> u32 {
        self.elapsed_ms += dt_ms;
        let fires = self.elapsed_ms / self.interval_ms;
        self.elapsed_ms %= self.interval_ms;
        fires as u32
    }

    pub fn interval_ms(&self) -> u64 {
        self.interval_ms
    }

    pub fn elapsed_ms(&self) -> u64 {
        self.elapsed_ms
    }

    /// Milliseconds until the next firing.
    pub fn remaining_ms(&self) -> u64 {
        self.interval_ms - self.elapsed_ms
    }

    /// Fraction of the current interval already elapsed, in `[0, 1)`.
    pub fn fraction(&self) -> f64 {
        self.elapsed_ms as f64 / self.interval_ms as f64
    }

    pub fn reset(&mut self) {
        self.elapsed_ms = 0;
    }
}

/// One-shot effects that end after a delay.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Expiry {
    /// Remove a finite-lifetime entity (powerup or projectile).
    Despawn(EntityId),
    /// Drop one layer of powerup shield.
    ShieldFade,
    /// End the double-mining buff and restore the captured mining power.
    DoubleMiningEnd,
}

#[derive(Debug, Clone)]
struct Scheduled {
    remaining_ms: u64,
    seq: u64,
    expiry: Expiry,
}

/// Pending one-shot expiries keyed by remaining duration.
#[derive(Debug, Clone, Default)]
pub struct ExpiryQueue {
    pending: Vec<Scheduled>,
    next_seq: u64,
}

impl ExpiryQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn schedule(&mut self, delay_ms: u64, expiry: Expiry) {
        self.pending.push(Scheduled {
            remaining_ms: delay_ms,
            seq: self.next_seq,
            expiry,
        });
        self.next_seq += 1;
    }

    /// Advance every pending entry by `dt_ms` and return those that came due,
    /// earliest deadline first, ties broken by scheduling order.
    pub fn advance(&mut self, dt_ms: u64) -> Vec<Expiry> {
        let mut due = Vec::new();
        self.pending.retain_mut(|entry| {
            if entry.remaining_ms <= dt_ms {
                due.push((entry.remaining_ms, entry.seq, entry.expiry));
                false
            } else {
                entry.remaining_ms -= dt_ms;
                true
            }
        });
        due.sort_by_key(|&(remaining, seq, _)| (remaining, seq));
        due.into_iter().map(|(_, _, expiry)| expiry).collect()
    }

    /// Remaining time of the earliest pending entry matching `expiry`.
    pub fn remaining_for(&self, expiry: Expiry) -> Option<u64> {
        self.pending
            .iter()
            .filter(|entry| entry.expiry == expiry)
            .map(|entry| entry.remaining_ms)
            .min()
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn clear(&mut self) {
        self.pending.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_periodic_fires_on_interval() {
        let mut timer = PeriodicTimer::new(2_000);
        assert_eq!(timer.advance(1_999), 0);
        assert_eq!(timer.advance(1), 1);
        assert_eq!(timer.elapsed_ms(), 0);
    }

    #[test]
    fn test_periodic_large_step_fires_multiple_times() {
        let mut timer = PeriodicTimer::new(2_000);
        assert_eq!(timer.advance(5_000), 2);
        assert_eq!(timer.remaining_ms(), 1_000);
    }

    #[test]
    fn test_frozen_timer_keeps_fraction() {
        let mut timer = PeriodicTimer::new(15_000);
        timer.advance(12_000);
        assert!((timer.fraction() - 0.8).abs() < f64::EPSILON);
        // Freezing means the owner stops advancing; resuming needs exactly the rest.
        assert_eq!(timer.advance(2_999), 0);
        assert_eq!(timer.advance(1), 1);
    }

    #[test]
    fn test_zero_interval_clamped() {
        let mut timer = PeriodicTimer::new(0);
        assert_eq!(timer.interval_ms(), 1);
        assert_eq!(timer.advance(3), 3);
    }

    #[test]
    fn test_expiry_queue_orders_by_deadline() {
        let mut queue = ExpiryQueue::new();
        queue.schedule(500, Expiry::ShieldFade);
        queue.schedule(200, Expiry::DoubleMiningEnd);
        queue.schedule(900, Expiry::ShieldFade);

        assert!(queue.advance(100).is_empty());
        let due = queue.advance(400);
        assert_eq!(due, vec![Expiry::DoubleMiningEnd, Expiry::ShieldFade]);
        assert_eq!(queue.len(), 1);
        assert_eq!(queue.remaining_for(Expiry::ShieldFade), Some(400));
    }

    #[test]
    fn test_expiry_ties_keep_schedule_order() {
        let mut queue = ExpiryQueue::new();
        let a = EntityId::from_raw(7);
        let b = EntityId::from_raw(3);
        queue.schedule(100, Expiry::Despawn(a));
        queue.schedule(100, Expiry::Despawn(b));
        assert_eq!(
            queue.advance(100),
            vec![Expiry::Despawn(a), Expiry::Despawn(b)]
        );
        assert!(queue.is_empty());
    }
}
