//! Train a [`QFunction`].
mod config;
use crate::{
    record::{
        AggregateRecorder, Record,
        RecordValue::{DateTime, Scalar},
    },
    DefaultEvaluator, Env, EpsilonGreedy, EpsilonSchedule, Evaluator, PerformanceLog, QFunction,
    ReplayBuffer, RunContext, TdTarget, Transition,
};
use anyhow::Result;
use chrono::Local;
pub use config::TrainerConfig;
use log::{debug, info, trace};
use rand::{rngs::StdRng, SeedableRng};

/// Reason an episode of the training loop ended.
///
/// At most one reason applies to a step; they are checked in the order of
/// the variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EpisodeEnd {
    /// The iteration is a multiple of the evaluation interval.
    Evaluated,

    /// The iteration is a multiple of the checkpoint interval.
    Checkpointed,

    /// The environment reported the end of the episode.
    Terminated,

    /// The iteration budget is exhausted.
    BudgetExhausted,
}

#[cfg_attr(doc, aquamarine::aquamarine)]
/// Manages the training loop of deep Q-learning.
///
/// # Training loop
///
/// The loop runs episodes until the iteration counter reaches
/// `max_iteration`. Each iteration of an episode is one environment step:
///
/// 1. Compute the exploration rate `eps` of the current iteration with
///    [`EpsilonSchedule`].
/// 2. Predict the action values of the current observation and select an
///    action with [`EpsilonGreedy`].
/// 3. Step the environment and make a [`Transition`].
/// 4. `iteration += 1`
/// 5. With experience replay, insert the transition into the [`ReplayBuffer`],
///    sample `batch_size` transitions and fit the approximator on their
///    [`TdTarget`]s. Without it, append the transition to the episode batch.
/// 6. Check, in this order, whether the episode ends ([`EpisodeEnd`]):
///     1. `iteration % interval_iteration == 0`: evaluate the greedy policy
///        and append `(iteration, mean_return)` to the [`PerformanceLog`].
///     2. `iteration % (max_iteration / 3) == 0`: save a checkpoint.
///     3. The environment reported the end of the episode.
///     4. `iteration == max_iteration`.
/// 7. Without experience replay, the ended episode batch is fitted as a
///    whole, even if the episode was cut short by an evaluation or a
///    checkpoint.
///
/// When the budget is exhausted, the [`PerformanceLog`] is written to
/// [`RunContext::performance_log_path`].
///
/// # Interaction of objects
///
/// ```mermaid
/// graph LR
///     A[QFunction]-->|action values|B[EpsilonGreedy]
///     B -->|action|C[Env]
///     C -->|Transition|D[ReplayBuffer]
///     D -->|Vec&lt;Transition&gt;|E[TdTarget]
///     E -->|fit|A
/// ```
///
/// Evaluation runs on a separate environment instance owned by
/// [`DefaultEvaluator`], and burn-in on a third one, so the state of the
/// training environment is never disturbed.
pub struct Trainer<E: Env> {
    env: E,
    evaluator: DefaultEvaluator<E>,

    /// `None` without experience replay.
    buffer: Option<ReplayBuffer>,

    batch_size: usize,
    schedule: EpsilonSchedule,
    explorer: EpsilonGreedy,
    target: TdTarget,
    max_iteration: usize,
    interval_iteration: usize,
    checkpoint_interval: usize,
    run: RunContext,

    /// Environment steps taken so far.
    iteration: usize,
}

impl<E: Env> Trainer<E> {
    /// Constructs a trainer.
    ///
    /// The configuration is validated before any environment is built. With
    /// experience replay, the buffer is filled with burn-in transitions.
    pub fn build(config: TrainerConfig, env_config: &E::Config, run: RunContext) -> Result<Self> {
        config.validate()?;

        let env_seed = |offset: u64| config.seed.wrapping_add(offset) as i64;
        let env = E::build(env_config, env_seed(0))?;
        let evaluator = DefaultEvaluator::new(env_config, env_seed(1), config.test_size)?;

        let (buffer, batch_size) = match (config.use_replay_memory, &config.replay_buffer) {
            (true, Some(buffer_config)) => {
                let mut buffer = ReplayBuffer::build(buffer_config);
                let mut env = E::build(env_config, env_seed(2))?;
                let mut rng = StdRng::seed_from_u64(config.seed);
                buffer.burn_in(&mut env, buffer_config.burn_in, &mut rng)?;
                (Some(buffer), buffer_config.batch_size)
            }
            _ => (None, 0),
        };

        Ok(Self {
            env,
            evaluator,
            buffer,
            batch_size,
            schedule: EpsilonSchedule::new(
                config.epsilon,
                config.epsilon_decay,
                config.epsilon_min,
            ),
            explorer: EpsilonGreedy::new(config.seed),
            target: TdTarget::new(config.gamma),
            max_iteration: config.max_iteration,
            interval_iteration: config.interval_iteration,
            checkpoint_interval: config.checkpoint_interval(),
            run,
            iteration: 0,
        })
    }

    /// Environment steps taken so far.
    pub fn iteration(&self) -> usize {
        self.iteration
    }

    /// The replay buffer, if experience replay is enabled.
    pub fn buffer(&self) -> Option<&ReplayBuffer> {
        self.buffer.as_ref()
    }

    fn exit_check<Q: QFunction + ?Sized>(
        &mut self,
        q: &Q,
        done: bool,
        recorder: &mut dyn AggregateRecorder,
        performance: &mut PerformanceLog,
    ) -> Result<Option<EpisodeEnd>> {
        if self.iteration % self.interval_iteration == 0 {
            let mean_return = self.evaluator.evaluate(q)?;
            performance.push(self.iteration, mean_return);
            info!(
                "Evaluation at iteration {}: mean return = {}",
                self.iteration, mean_return
            );
            recorder.flush(self.iteration as i64);
            recorder.write(Record::from_slice(&[
                ("iteration", Scalar(self.iteration as f32)),
                ("mean_return", Scalar(mean_return)),
                ("datetime", DateTime(Local::now())),
            ]));
            Ok(Some(EpisodeEnd::Evaluated))
        } else if self.iteration % self.checkpoint_interval == 0 {
            let path = q.save_checkpoint(&self.run, self.iteration)?;
            info!("Saved the model in {:?}", path);
            Ok(Some(EpisodeEnd::Checkpointed))
        } else if done {
            Ok(Some(EpisodeEnd::Terminated))
        } else if self.iteration == self.max_iteration {
            Ok(Some(EpisodeEnd::BudgetExhausted))
        } else {
            Ok(None)
        }
    }

    /// Runs one episode and returns the reason it ended.
    fn run_episode<Q: QFunction + ?Sized>(
        &mut self,
        q: &mut Q,
        recorder: &mut dyn AggregateRecorder,
        performance: &mut PerformanceLog,
    ) -> Result<EpisodeEnd> {
        let mut obs = self.env.reset()?;
        let mut episode = Vec::<Transition>::new();
        let mut r_episode = 0f32;

        let end = loop {
            let eps = self.schedule.eps(self.iteration);
            let act = self.explorer.action(&q.predict_one(&obs)?, eps)?;
            let step = self.env.step(act)?;
            let done = step.is_done();
            let next_obs = step.obs.clone();
            r_episode += step.reward;
            trace!(
                "iteration {}: act = {}, reward = {}, done = {}",
                self.iteration,
                act,
                step.reward,
                done
            );
            let transition = Transition::from_step(obs, step);
            self.iteration += 1;

            let mut record = Record::from_scalar("epsilon", eps as f32);
            match self.buffer.as_mut() {
                Some(buffer) => {
                    buffer.insert(transition);
                    let batch = buffer.sample(self.batch_size)?;
                    record.merge_inplace(self.target.fit(q, &batch)?);
                }
                None => episode.push(transition),
            }
            recorder.store(record);

            if let Some(end) = self.exit_check(q, done, recorder, performance)? {
                break end;
            }
            obs = next_obs;
        };

        if !episode.is_empty() {
            let record = self.target.fit(q, &episode)?;
            recorder.store(record);
        }

        debug!(
            "Episode ended at iteration {} ({:?}): return = {}, steps = {}",
            self.iteration,
            end,
            r_episode,
            episode.len()
        );
        Ok(end)
    }

    /// Trains `q` until the iteration budget is exhausted.
    ///
    /// Returns the performance log, which has also been written to
    /// [`RunContext::performance_log_path`]. Nothing is written if the run
    /// fails.
    pub fn train<Q: QFunction + ?Sized>(
        &mut self,
        q: &mut Q,
        recorder: &mut dyn AggregateRecorder,
    ) -> Result<PerformanceLog> {
        self.run.create_model_dir()?;
        let mut performance = PerformanceLog::new();

        while self.iteration < self.max_iteration {
            self.run_episode(q, recorder, &mut performance)?;
        }

        let path = self.run.performance_log_path();
        performance.save(&path)?;
        info!(
            "Finished {} iterations, saved the performance log in {:?}",
            self.iteration, path
        );

        Ok(performance)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        dummy::{CountingEnv, CountingEnvConfig, LinearQ},
        record::{BufferedRecorder, NullRecorder},
        ReplayBufferConfig,
    };
    use tempdir::TempDir;

    fn non_replay(max_iteration: usize, interval_iteration: usize) -> TrainerConfig {
        TrainerConfig::default()
            .max_iteration(max_iteration)
            .interval_iteration(interval_iteration)
            .test_size(2)
            .use_replay_memory(false)
            .replay_buffer(None)
    }

    fn build(
        config: TrainerConfig,
        episode_len: usize,
        dir: &TempDir,
    ) -> Result<Trainer<CountingEnv>> {
        let env_config = CountingEnvConfig::default().episode_len(episode_len);
        Trainer::build(config, &env_config, RunContext::new("test", dir.path()))
    }

    #[test]
    fn test_checkpoint_cadence() -> Result<()> {
        let dir = TempDir::new("trainer")?;
        let mut trainer = build(non_replay(90, 1000), 7, &dir)?;
        let mut q = LinearQ::new(1, 2, 0.01);
        let performance = trainer.train(&mut q, &mut NullRecorder::new())?;

        assert_eq!(q.checkpoints(), &[30, 60, 90]);
        assert!(performance.is_empty());
        assert_eq!(trainer.iteration(), 90);
        Ok(())
    }

    #[test]
    fn test_evaluation_cadence() -> Result<()> {
        let dir = TempDir::new("trainer")?;
        let mut trainer = build(non_replay(100, 10), 7, &dir)?;
        let mut q = LinearQ::new(1, 2, 0.01);
        let performance = trainer.train(&mut q, &mut NullRecorder::new())?;

        let iterations = performance.iter().map(|(i, _)| *i).collect::<Vec<_>>();
        assert_eq!(iterations, (1..=10).map(|i| 10 * i).collect::<Vec<_>>());
        // Checkpoints do not coincide with evaluations.
        assert_eq!(q.checkpoints(), &[33, 66, 99]);
        // Every evaluation episode of CountingEnv yields the episode length.
        assert!(performance.iter().all(|(_, r)| *r == 7.0));

        let saved = PerformanceLog::load(dir.path().join("test.json"))?;
        assert_eq!(saved, performance);
        Ok(())
    }

    #[test]
    fn test_evaluation_suppresses_checkpoint() -> Result<()> {
        let dir = TempDir::new("trainer")?;
        let mut trainer = build(non_replay(90, 10), 7, &dir)?;
        let mut q = LinearQ::new(1, 2, 0.01);
        trainer.train(&mut q, &mut NullRecorder::new())?;
        assert!(q.checkpoints().is_empty());
        Ok(())
    }

    #[test]
    fn test_non_replay_fits_truncated_episodes() -> Result<()> {
        let dir = TempDir::new("trainer")?;
        let mut trainer = build(non_replay(30, 1000), 7, &dir)?;
        let mut q = LinearQ::new(1, 2, 0.01);
        trainer.train(&mut q, &mut NullRecorder::new())?;

        assert_eq!(q.checkpoints(), &[10, 20, 30]);
        assert_eq!(q.fit_sizes(), &[7, 3, 7, 3, 7, 3]);
        Ok(())
    }

    #[test]
    fn test_replay_fits_every_step() -> Result<()> {
        let dir = TempDir::new("trainer")?;
        let buffer = ReplayBufferConfig::default()
            .capacity(16)
            .burn_in(8)
            .batch_size(4);
        let config = TrainerConfig::default()
            .max_iteration(20)
            .interval_iteration(1000)
            .test_size(1)
            .replay_buffer(Some(buffer));
        let mut trainer = build(config, 7, &dir)?;
        assert_eq!(trainer.buffer().map(|b| b.len()), Some(14));

        let mut q = LinearQ::new(1, 2, 0.01);
        trainer.train(&mut q, &mut NullRecorder::new())?;

        assert_eq!(q.fit_sizes(), &[4; 20]);
        let buffer = trainer.buffer().unwrap();
        assert!(buffer.is_full());
        assert_eq!(buffer.next_index(), (14 + 20) % 16);
        Ok(())
    }

    #[test]
    fn test_records_flushed_at_evaluation() -> Result<()> {
        let dir = TempDir::new("trainer")?;
        let mut trainer = build(non_replay(30, 10), 7, &dir)?;
        let mut q = LinearQ::new(1, 2, 0.01);
        let mut recorder = BufferedRecorder::new();
        trainer.train(&mut q, &mut recorder)?;

        let evaluations = recorder
            .iter()
            .filter_map(|r| r.get_scalar("mean_return").ok())
            .count();
        assert_eq!(evaluations, 3);
        assert!(recorder
            .iter()
            .filter(|r| r.get_scalar("mean_return").is_ok())
            .all(|r| r.get_datetime("datetime").is_ok()));
        assert!(recorder
            .iter()
            .any(|r| r.get_scalar("epsilon_mean").is_ok()));
        Ok(())
    }

    #[test]
    fn test_extreme_seeds() -> Result<()> {
        let dir = TempDir::new("trainer")?;
        for seed in [i64::MAX as u64, u64::MAX] {
            let mut trainer = build(non_replay(20, 10).seed(seed), 7, &dir)?;
            let mut q = LinearQ::new(1, 2, 0.01);
            let performance = trainer.train(&mut q, &mut NullRecorder::new())?;
            assert_eq!(performance.len(), 2);
        }
        Ok(())
    }

    #[test]
    fn test_invalid_config_rejected_before_build() -> Result<()> {
        let dir = TempDir::new("trainer")?;
        assert!(build(non_replay(2, 10), 7, &dir).is_err());
        Ok(())
    }
}
