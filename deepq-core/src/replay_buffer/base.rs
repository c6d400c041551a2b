//! Fixed-capacity ring of transitions.
use super::ReplayBufferConfig;
use crate::{error::DqnError, Env, Transition};
use anyhow::Result;
use log::info;
use rand::{rngs::StdRng, seq::index, Rng, SeedableRng};

/// A fixed-capacity store of [`Transition`]s with uniform sampling.
///
/// Insertion writes at `next_index`, which wraps modulo the capacity. The
/// buffer becomes full the first time the cursor wraps back to zero; from
/// then on every insertion silently overwrites the oldest transition.
pub struct ReplayBuffer {
    capacity: usize,

    /// Slot written by the next insertion.
    next_index: usize,

    full: bool,

    transitions: Vec<Transition>,

    rng: StdRng,
}

impl ReplayBuffer {
    /// Creates an empty buffer.
    pub fn build(config: &ReplayBufferConfig) -> Self {
        Self {
            capacity: config.capacity,
            next_index: 0,
            full: false,
            transitions: Vec::with_capacity(config.capacity),
            rng: StdRng::seed_from_u64(config.seed),
        }
    }

    /// Stores a transition, overwriting the slot at the cursor when full.
    pub fn insert(&mut self, transition: Transition) {
        if self.full {
            self.transitions[self.next_index] = transition;
        } else {
            self.transitions.push(transition);
        }
        self.next_index = (self.next_index + 1) % self.capacity;
        if self.next_index == 0 {
            self.full = true;
        }
    }

    /// Draws `batch_size` distinct transitions uniformly at random.
    ///
    /// Fails with [`DqnError::InsufficientTransitions`] if `batch_size`
    /// exceeds [`ReplayBuffer::len`].
    pub fn sample(&mut self, batch_size: usize) -> Result<Vec<Transition>> {
        let size = self.len();
        if batch_size > size {
            return Err(DqnError::InsufficientTransitions {
                requested: batch_size,
                available: size,
            }
            .into());
        }

        Ok(index::sample(&mut self.rng, size, batch_size)
            .into_iter()
            .map(|ix| self.transitions[ix].clone())
            .collect())
    }

    /// Fills the buffer with transitions of uniformly random actions.
    ///
    /// At least `n_transitions` transitions are inserted; the episode in
    /// progress when the threshold is reached runs to its end. Returns the
    /// number of inserted transitions.
    pub fn burn_in<E: Env, R: Rng>(
        &mut self,
        env: &mut E,
        n_transitions: usize,
        rng: &mut R,
    ) -> Result<usize> {
        let n_actions = env.n_actions();
        let mut n = 0;

        while n < n_transitions {
            let mut state = env.reset()?;
            loop {
                let step = env.step(rng.gen_range(0..n_actions))?;
                let done = step.is_done();
                let next_state = step.obs.clone();
                self.insert(Transition::from_step(state, step));
                n += 1;
                if done {
                    break;
                }
                state = next_state;
            }
        }

        info!(
            "Burn-in inserted {} transitions (next_index = {}, capacity = {})",
            n, self.next_index, self.capacity
        );
        Ok(n)
    }

    /// Number of stored transitions: the capacity once full, else the cursor.
    pub fn len(&self) -> usize {
        if self.full {
            self.capacity
        } else {
            self.next_index
        }
    }

    /// Returns `true` if nothing has been stored.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns `true` once the cursor has wrapped.
    pub fn is_full(&self) -> bool {
        self.full
    }

    /// Maximum number of transitions.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Slot written by the next insertion.
    pub fn next_index(&self) -> usize {
        self.next_index
    }

    /// Iterates over the stored transitions in slot order.
    pub fn iter(&self) -> std::slice::Iter<'_, Transition> {
        self.transitions.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dummy::{CountingEnv, CountingEnvConfig};
    use std::collections::HashSet;

    fn transition(i: usize) -> Transition {
        Transition::new(vec![i as f32], 0, i as f32, vec![i as f32 + 1.0], false)
    }

    fn buffer(capacity: usize) -> ReplayBuffer {
        ReplayBuffer::build(&ReplayBufferConfig::default().capacity(capacity))
    }

    #[test]
    fn test_ring_keeps_last_capacity_transitions() {
        let mut buf = buffer(5);
        for i in 0..4 {
            buf.insert(transition(i));
        }
        assert_eq!(buf.len(), 4);
        assert!(!buf.is_full());

        for i in 4..12 {
            buf.insert(transition(i));
        }
        assert_eq!(buf.len(), 5);
        assert!(buf.is_full());
        assert_eq!(buf.next_index(), 12 % 5);

        let mut rewards = buf.iter().map(|t| t.reward() as usize).collect::<Vec<_>>();
        rewards.sort();
        assert_eq!(rewards, vec![7, 8, 9, 10, 11]);
    }

    #[test]
    fn test_full_after_exactly_capacity_inserts() {
        let mut buf = buffer(3);
        for i in 0..3 {
            buf.insert(transition(i));
        }
        assert!(buf.is_full());
        assert_eq!(buf.next_index(), 0);
        assert_eq!(buf.len(), 3);
    }

    #[test]
    fn test_sample_distinct() -> Result<()> {
        let mut buf = buffer(100);
        for i in 0..50 {
            buf.insert(transition(i));
        }
        for _ in 0..20 {
            let batch = buf.sample(50)?;
            let rewards = batch
                .iter()
                .map(|t| t.reward() as usize)
                .collect::<HashSet<_>>();
            assert_eq!(rewards.len(), 50);
            assert!(rewards.iter().all(|r| *r < 50));
        }
        Ok(())
    }

    #[test]
    fn test_sample_after_wrap_draws_latest() -> Result<()> {
        let mut buf = buffer(16);
        for i in 0..40 {
            buf.insert(transition(i));
        }
        let batch = buf.sample(16)?;
        let rewards = batch
            .iter()
            .map(|t| t.reward() as usize)
            .collect::<HashSet<_>>();
        assert_eq!(rewards, (24..40).collect::<HashSet<_>>());

        for _ in 0..20 {
            let batch = buf.sample(10)?;
            let rewards = batch
                .iter()
                .map(|t| t.reward() as usize)
                .collect::<HashSet<_>>();
            assert_eq!(rewards.len(), 10);
            assert!(rewards.iter().all(|r| (24..40).contains(r)));
        }
        Ok(())
    }

    #[test]
    fn test_sample_more_than_stored_fails() {
        let mut buf = buffer(10);
        for i in 0..3 {
            buf.insert(transition(i));
        }
        let err = buf.sample(4).unwrap_err();
        assert_eq!(
            err.downcast_ref::<DqnError>(),
            Some(&DqnError::InsufficientTransitions {
                requested: 4,
                available: 3
            })
        );
    }

    #[test]
    fn test_burn_in_finishes_episode() -> Result<()> {
        let mut env = CountingEnv::build(&CountingEnvConfig::default().episode_len(4), 0)?;
        let mut buf = buffer(100);
        let mut rng = StdRng::seed_from_u64(0);

        let n = buf.burn_in(&mut env, 10, &mut rng)?;
        assert_eq!(n, 12);
        assert_eq!(buf.len(), 12);
        assert_eq!(buf.iter().filter(|t| t.is_done()).count(), 3);
        Ok(())
    }
}
