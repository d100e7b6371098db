use crate::{
    config::Config,
    particle::{Particle, Renderable},
    types::ParticleId,
};
use glam::Vec3;
use log::info;
use rand::Rng;

/// Owned list of every particle in the simulation.
///
/// Particles are created once and never removed; the only change over the
/// lifetime of the store is free particles moving and turning attached.
#[derive(Clone, Debug, PartialEq)]
pub struct ParticleStore {
    pub particles: Vec<Particle>,
}

/// Summary numbers for status displays.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ClusterStats {
    pub attached: usize,
    pub free: usize,
    /// Largest `|pos| + radius` over attached particles.
    pub cluster_radius: f32,
}

/// Samples a point uniformly from the cube `[-half, half]³`.
///
/// Returns `Vec3::ZERO` without drawing from `rng` when `half` is not
/// positive.
pub fn random_in_cube(half: f32, rng: &mut impl Rng) -> Vec3 {
    if half <= 0.0 {
        return Vec3::ZERO;
    }
    let x = rng.random_range(-half..=half);
    let y = rng.random_range(-half..=half);
    let z = rng.random_range(-half..=half);
    Vec3::new(x, y, z)
}

impl ParticleStore {
    pub fn from_particles(particles: Vec<Particle>) -> Self {
        Self { particles }
    }

    /// Builds the starting state: `cfg.seed_count` attached seeds followed by
    /// `cfg.particle_count` free particles.
    ///
    /// The first seed sits at the origin; any further seeds are scattered in
    /// the spawn cube. Seeds get [`Config::seed_radius`], free particles get
    /// `cfg.base_radius` and a small random velocity of at most
    /// `cfg.initial_speed` per axis.
    ///
    /// ### Parameters
    /// - `cfg` - Simulation parameters.
    /// - `rng` - Random source; a seeded generator gives a reproducible state.
    pub fn initialize(cfg: &Config, rng: &mut impl Rng) -> Self {
        let mut particles = Vec::with_capacity(cfg.seed_count + cfg.particle_count);

        for i in 0..cfg.seed_count {
            let pos = if i == 0 {
                Vec3::ZERO
            } else {
                random_in_cube(cfg.spawn_half_extent, rng)
            };
            particles.push(Particle::new_seed(pos, cfg.seed_radius()));
        }

        for _ in 0..cfg.particle_count {
            let pos = random_in_cube(cfg.spawn_half_extent, rng);
            let vel = random_in_cube(cfg.initial_speed, rng);
            particles.push(Particle::new_free(pos, vel, cfg.base_radius));
        }

        info!(
            "initialized {} seed(s) and {} free particle(s)",
            cfg.seed_count, cfg.particle_count
        );

        Self { particles }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.particles.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    pub fn attached_count(&self) -> usize {
        self.particles.iter().filter(|p| p.attached).count()
    }

    pub fn free_count(&self) -> usize {
        self.particles.iter().filter(|p| !p.attached).count()
    }

    /// Finds the attached particle closest to `pos`.
    ///
    /// This is a linear scan over the whole store. It is the place to plug
    /// in a grid or k-d tree once particle counts reach the thousands; any
    /// replacement must still return a true nearest particle. Which of
    /// several equally distant particles wins is unspecified.
    ///
    /// ### Returns
    /// `Some((id, distance_squared))`, or `None` if nothing is attached.
    pub fn find_nearest_attached(&self, pos: Vec3) -> Option<(ParticleId, f32)> {
        let mut best = None;
        let mut best_d2 = f32::INFINITY;
        for (id, p) in self.particles.iter().enumerate() {
            if !p.attached {
                continue;
            }
            let d2 = (p.pos - pos).length_squared();
            if d2 < best_d2 {
                best_d2 = d2;
                best = Some(id);
            }
        }
        best.map(|id| (id, best_d2))
    }

    /// Read-only snapshot of every particle for drawing.
    pub fn renderables(&self) -> impl Iterator<Item = Renderable> + '_ {
        self.particles.iter().map(Particle::renderable)
    }

    pub fn stats(&self) -> ClusterStats {
        let mut stats = ClusterStats {
            attached: 0,
            free: 0,
            cluster_radius: 0.0,
        };
        for p in &self.particles {
            if p.attached {
                stats.attached += 1;
                stats.cluster_radius = stats.cluster_radius.max(p.pos.length() + p.radius);
            } else {
                stats.free += 1;
            }
        }
        stats
    }
}
