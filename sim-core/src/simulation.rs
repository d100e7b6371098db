use crate::{
    aggregation,
    config::Config,
    error::Result,
    particle::Renderable,
    store::{ClusterStats, ParticleStore},
    types::ParticleId,
};
use log::info;
use rand::{SeedableRng, rngs::StdRng};

/// Owns everything one run of the simulation needs.
///
/// A driver (the viewer, a test, a benchmark) calls [`Simulation::step`] at
/// its own cadence and reads [`Simulation::snapshot`] between steps. A tick
/// is never observable half-done.
#[derive(Debug)]
pub struct Simulation {
    store: ParticleStore,
    cfg: Config,
    rng: StdRng,
    seed: u64,
    tick: u64,
}

impl Simulation {
    /// Validates `cfg` and builds the initial particle state from `seed`.
    ///
    /// ### Returns
    /// - `Ok(Simulation)` ready to be stepped.
    /// - `Err(ConfigError)` if `cfg` fails [`Config::validate`].
    pub fn new(cfg: Config, seed: u64) -> Result<Self> {
        cfg.validate()?;
        let mut rng = StdRng::seed_from_u64(seed);
        let store = ParticleStore::initialize(&cfg, &mut rng);
        info!("simulation seeded with {seed}");
        Ok(Self {
            store,
            cfg,
            rng,
            seed,
            tick: 0,
        })
    }

    /// Runs one tick and returns the ids that attached during it.
    pub fn step(&mut self) -> Vec<ParticleId> {
        let new_ids = aggregation::advance(&mut self.store, &self.cfg, &mut self.rng);
        self.tick += 1;
        new_ids
    }

    /// Runs `n` ticks back to back. Returns how many particles attached.
    pub fn run_ticks(&mut self, n: u64) -> usize {
        (0..n).map(|_| self.step().len()).sum()
    }

    /// Starts over with a fresh state built from `cfg` and `seed`.
    ///
    /// On error the current state is kept untouched.
    pub fn reset(&mut self, cfg: Config, seed: u64) -> Result<()> {
        *self = Self::new(cfg, seed)?;
        Ok(())
    }

    pub fn snapshot(&self) -> impl Iterator<Item = Renderable> + '_ {
        self.store.renderables()
    }

    pub fn stats(&self) -> ClusterStats {
        self.store.stats()
    }

    pub fn store(&self) -> &ParticleStore {
        &self.store
    }

    pub fn config(&self) -> &Config {
        &self.cfg
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn tick(&self) -> u64 {
        self.tick
    }

    /// `true` once no free particle is left.
    pub fn is_settled(&self) -> bool {
        self.store.particles.iter().all(|p| p.attached)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ConfigError;

    fn small_cfg() -> Config {
        Config {
            particle_count: 40,
            ..Config::default()
        }
    }

    #[test]
    fn new_rejects_invalid_config() {
        let cfg = Config {
            seed_count: 0,
            ..Config::default()
        };
        assert_eq!(Simulation::new(cfg, 1).unwrap_err(), ConfigError::NoSeed);
    }

    #[test]
    fn step_counts_ticks() {
        let mut sim = Simulation::new(small_cfg(), 11).unwrap();
        assert_eq!(sim.tick(), 0);
        sim.step();
        sim.run_ticks(9);
        assert_eq!(sim.tick(), 10);
    }

    #[test]
    fn run_ticks_reports_attachments() {
        let mut sim = Simulation::new(small_cfg(), 12).unwrap();
        let attached_before = sim.stats().attached;
        let n = sim.run_ticks(200);
        assert_eq!(sim.stats().attached, attached_before + n);
    }

    #[test]
    fn reset_restarts_from_tick_zero() {
        let mut sim = Simulation::new(small_cfg(), 13).unwrap();
        sim.run_ticks(5);

        sim.reset(small_cfg(), 14).unwrap();

        assert_eq!(sim.tick(), 0);
        assert_eq!(sim.seed(), 14);
        assert_eq!(sim.stats().attached, 1);
        assert_eq!(sim.store().len(), 41);
    }

    #[test]
    fn failed_reset_keeps_running_state() {
        let mut sim = Simulation::new(small_cfg(), 15).unwrap();
        sim.run_ticks(3);

        let bad = Config {
            boundary: -1.0,
            ..small_cfg()
        };
        assert!(sim.reset(bad, 16).is_err());
        assert_eq!(sim.tick(), 3);
        assert_eq!(sim.seed(), 15);
    }

    #[test]
    fn equal_seeds_give_identical_runs() {
        let mut a = Simulation::new(small_cfg(), 21).unwrap();
        let mut b = Simulation::new(small_cfg(), 21).unwrap();
        a.run_ticks(50);
        b.run_ticks(50);
        assert_eq!(a.store(), b.store());
    }

    #[test]
    fn snapshot_matches_store() {
        let sim = Simulation::new(small_cfg(), 22).unwrap();
        assert_eq!(sim.snapshot().count(), sim.store().len());
        assert!(!sim.is_settled());
    }
}
