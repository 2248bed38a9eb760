use std::ops::Range;

use rand::Rng;
use rand::seq::SliceRandom;

/// Order in which pieces return home, plus the equal time slice each one
/// gets. Built once after scattering and never rebuilt.
#[derive(Clone, Debug, PartialEq)]
pub struct SolvingSchedule {
    order: Vec<usize>,
    piece_move_duration: f64,
}

impl SolvingSchedule {
    /// Uniform random permutation of `0..piece_count` (Fisher-Yates).
    pub fn new<R: Rng + ?Sized>(piece_count: usize, total_duration: f64, rng: &mut R) -> Self {
        let mut order: Vec<usize> = (0..piece_count).collect();
        order.shuffle(rng);
        Self::from_order(order, total_duration)
    }

    /// Schedule with a caller-chosen order. `order` must be a permutation.
    pub fn from_order(order: Vec<usize>, total_duration: f64) -> Self {
        let piece_move_duration = total_duration / order.len().max(1) as f64;
        SolvingSchedule {
            order,
            piece_move_duration,
        }
    }

    pub fn order(&self) -> &[usize] {
        &self.order
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn piece_move_duration(&self) -> f64 {
        self.piece_move_duration
    }

    /// Piece index solved at schedule position `k`.
    pub fn piece_at(&self, k: usize) -> Option<usize> {
        self.order.get(k).copied()
    }

    /// Schedule position of `piece`.
    pub fn position_of(&self, piece: usize) -> Option<usize> {
        self.order.iter().position(|&p| p == piece)
    }

    /// Active window of schedule position `k`, in ms from animation start.
    pub fn window(&self, k: usize) -> Range<f64> {
        let d = self.piece_move_duration;
        k as f64 * d..(k + 1) as f64 * d
    }

    /// Linear progress of schedule position `k` at `elapsed`, clamped to
    /// `[0, 1]`.
    pub fn progress(&self, k: usize, elapsed: f64) -> f64 {
        let piece_elapsed = elapsed - self.window(k).start;
        (piece_elapsed / self.piece_move_duration).clamp(0.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    #[test]
    fn order_is_a_permutation() {
        let mut rng = SmallRng::seed_from_u64(42);
        for n in [1usize, 2, 9, 64, 257] {
            let s = SolvingSchedule::new(n, 20_000.0, &mut rng);
            let mut seen = s.order().to_vec();
            seen.sort_unstable();
            assert_eq!(seen, (0..n).collect::<Vec<_>>());
        }
    }

    #[test]
    fn budget_is_split_evenly() {
        let s = SolvingSchedule::from_order(vec![2, 0, 3, 1], 4000.0);
        assert_eq!(s.piece_move_duration(), 1000.0);
        assert_eq!(s.window(2), 2000.0..3000.0);
        assert_eq!(s.piece_at(0), Some(2));
        assert_eq!(s.position_of(1), Some(3));
        assert_eq!(s.piece_at(4), None);
    }

    #[test]
    fn progress_clamps_outside_window() {
        let s = SolvingSchedule::from_order(vec![0, 1, 2, 3], 4000.0);
        assert_eq!(s.progress(2, 2500.0), 0.5);
        assert_eq!(s.progress(3, 2500.0), 0.0);
        assert_eq!(s.progress(0, 2500.0), 1.0);
    }

    #[test]
    fn shuffles_are_not_all_identity() {
        let mut rng = SmallRng::seed_from_u64(5);
        let identity: Vec<usize> = (0..16).collect();
        let moved = (0..10)
            .map(|_| SolvingSchedule::new(16, 1.0, &mut rng))
            .filter(|s| s.order() != identity.as_slice())
            .count();
        assert!(moved > 0);
    }
}
