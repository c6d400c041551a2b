//! Temporal-difference targets.
use crate::{error::DqnError, record::Record, QFunction, Transition};
use anyhow::Result;

/// Struct-of-arrays form of a batch of [`Transition`]s.
///
/// The next state of a transition that ended its episode is replaced by a
/// zero vector; its prediction is never used.
#[derive(Debug, Clone, PartialEq)]
pub struct TransitionBatch {
    /// Current states.
    pub states: Vec<Vec<f32>>,

    /// Actions taken.
    pub actions: Vec<usize>,

    /// Rewards.
    pub rewards: Vec<f32>,

    /// Next states.
    pub next_states: Vec<Vec<f32>>,

    /// Episode-end flags.
    pub dones: Vec<bool>,
}

impl TransitionBatch {
    /// Assembles a batch.
    ///
    /// Fails on an empty slice or if the states do not share one length.
    pub fn from_transitions(transitions: &[Transition]) -> Result<Self> {
        let dim = match transitions.first() {
            Some(t) => t.state().len(),
            None => return Err(DqnError::EmptyBatch.into()),
        };

        let n = transitions.len();
        let mut batch = Self {
            states: Vec::with_capacity(n),
            actions: Vec::with_capacity(n),
            rewards: Vec::with_capacity(n),
            next_states: Vec::with_capacity(n),
            dones: Vec::with_capacity(n),
        };

        for t in transitions {
            if t.state().len() != dim || (!t.is_done() && t.next_state().len() != dim) {
                return Err(DqnError::ShapeMismatch(format!(
                    "expected states of length {}, got {} and {}",
                    dim,
                    t.state().len(),
                    t.next_state().len()
                ))
                .into());
            }
            batch.states.push(t.state().to_vec());
            batch.actions.push(t.action());
            batch.rewards.push(t.reward());
            batch.next_states.push(match t.is_done() {
                true => vec![0.0; dim],
                false => t.next_state().to_vec(),
            });
            batch.dones.push(t.is_done());
        }

        Ok(batch)
    }

    /// Number of transitions.
    pub fn len(&self) -> usize {
        self.actions.len()
    }

    /// Returns `true` if the batch has no transition.
    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }
}

/// Computes bootstrapped regression targets.
///
/// For row `i` with action `a`, the target equals the prediction `P[i]`
/// except for column `a`, which becomes `r` if the episode ended and
/// `r + gamma * max(P'[i])` otherwise.
#[derive(Debug, Clone, PartialEq)]
pub struct TdTarget {
    gamma: f32,
}

impl TdTarget {
    /// Constructs with the discount factor.
    pub fn new(gamma: f32) -> Self {
        Self { gamma }
    }

    /// Discount factor.
    pub fn gamma(&self) -> f32 {
        self.gamma
    }

    /// Targets from the predictions for the current states `p` and the next
    /// states `p_next`.
    pub fn targets(
        &self,
        batch: &TransitionBatch,
        p: &[Vec<f32>],
        p_next: &[Vec<f32>],
    ) -> Result<Vec<Vec<f32>>> {
        if p.len() != batch.len() || p_next.len() != batch.len() {
            return Err(DqnError::ShapeMismatch(format!(
                "{} transitions, {} and {} prediction rows",
                batch.len(),
                p.len(),
                p_next.len()
            ))
            .into());
        }

        let mut y = p.to_vec();
        for (i, row) in y.iter_mut().enumerate() {
            let a = batch.actions[i];
            if a >= row.len() {
                return Err(DqnError::ShapeMismatch(format!(
                    "action {} with {} action values",
                    a,
                    row.len()
                ))
                .into());
            }
            row[a] = match batch.dones[i] {
                true => batch.rewards[i],
                false => {
                    let max_next = p_next[i].iter().copied().fold(f32::NEG_INFINITY, f32::max);
                    batch.rewards[i] + self.gamma * max_next
                }
            };
        }

        Ok(y)
    }

    /// Predicts, computes the targets and fits `q` on them in one call.
    ///
    /// The whole batch is a single mini-batch of the fit.
    pub fn fit<Q: QFunction + ?Sized>(&self, q: &mut Q, transitions: &[Transition]) -> Result<Record> {
        let batch = TransitionBatch::from_transitions(transitions)?;
        let p = q.predict(&batch.states)?;
        let p_next = q.predict(&batch.next_states)?;
        let y = self.targets(&batch, &p, &p_next)?;
        q.fit(&batch.states, &y, batch.len())
    }
}
