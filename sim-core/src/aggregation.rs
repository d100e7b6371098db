//! Per-tick update for diffusion-limited aggregation.
//!
//! Every free particle goes through, in order:
//! 1. [`brownian_perturbation`] — random kick added to its velocity.
//! 2. [`integrate`] — position advances by one unit step of velocity.
//! 3. [`reflect_boundary`] — inelastic bounce off the containing cube.
//! 4. [`ParticleStore::find_nearest_attached`] — brute-force lookup of
//!    the closest cluster member.
//! 5. [`attract`] — pull toward that member when within range.
//! 6. [`try_attach`] — freeze into the cluster when close enough. Only
//!    particles inside the attraction range are tested.
//!
//! Particles are processed one after another against the live store, so a
//! particle that attaches early in a tick is already part of the cluster for
//! the particles processed after it.

use crate::{
    config::Config,
    particle::Particle,
    store::{ParticleStore, random_in_cube},
    types::ParticleId,
};
use glam::Vec3;
use log::debug;
use rand::Rng;

/// Adds an independent uniform value from `[-amplitude, amplitude]` to each
/// velocity component. A non-positive amplitude leaves the particle alone
/// and draws nothing from `rng`.
pub fn brownian_perturbation(p: &mut Particle, amplitude: f32, rng: &mut impl Rng) {
    p.vel += random_in_cube(amplitude, rng);
}

/// Moves the particle by its velocity (unit time step).
#[inline]
pub fn integrate(p: &mut Particle) {
    p.pos += p.vel;
}

/// Clamps each coordinate into `[-boundary, boundary]`.
///
/// On every axis that was outside, the matching velocity component becomes
/// `v * -damping`. Axes are handled independently, so a particle pushed past
/// a corner bounces on each violated axis.
pub fn reflect_boundary(p: &mut Particle, boundary: f32, damping: f32) {
    for axis in 0..3 {
        if p.pos[axis] < -boundary {
            p.pos[axis] = -boundary;
            p.vel[axis] *= -damping;
        }
        if p.pos[axis] > boundary {
            p.pos[axis] = boundary;
            p.vel[axis] *= -damping;
        }
    }
}

/// Accelerates the particle toward `target` by `force`.
///
/// If the particle sits exactly on `target` there is no direction to pull
/// in and the velocity is left unchanged.
pub fn attract(p: &mut Particle, target: Vec3, force: f32) {
    let dir = (target - p.pos).normalize_or_zero();
    p.vel += dir * force;
}

/// Attaches `p` if it is within `cfg.attach_factor` of the combined radii
/// of itself and `nearest`.
///
/// ### Parameters
/// - `p` - Free particle under test.
/// - `nearest` - Closest attached particle.
/// - `distance` - Euclidean distance between the two centers.
/// - `cfg` - Provides the attachment factor and the growth increment.
///
/// ### Returns
/// `true` if the particle attached on this call.
pub fn try_attach(p: &mut Particle, nearest: &Particle, distance: f32, cfg: &Config) -> bool {
    if p.attached {
        return false;
    }
    if distance < cfg.attach_factor * (nearest.radius + p.radius) {
        p.attach(cfg.growth_rate);
        true
    } else {
        false
    }
}

/// Advances every free particle by one tick.
///
/// Attached particles are skipped entirely. See the module docs for the
/// order of operations.
///
/// ### Parameters
/// - `store` - Simulation state, mutated in place.
/// - `cfg` - Simulation parameters.
/// - `rng` - Source of Brownian noise; a seeded generator makes the tick
///   reproducible.
///
/// ### Returns
/// Ids of the particles that attached during this tick, in processing order.
pub fn advance(store: &mut ParticleStore, cfg: &Config, rng: &mut impl Rng) -> Vec<ParticleId> {
    let mut newly_attached = Vec::new();

    for id in 0..store.particles.len() {
        let mut p = store.particles[id];
        if p.attached {
            continue;
        }

        brownian_perturbation(&mut p, cfg.brownian_amplitude, rng);
        integrate(&mut p);
        reflect_boundary(&mut p, cfg.boundary, cfg.bounce_damping);

        // `p` is still free in the store, so it can never be its own nearest.
        if let Some((nearest_id, d2)) = store.find_nearest_attached(p.pos) {
            let nearest = store.particles[nearest_id];
            let distance = d2.sqrt();

            if distance < cfg.attraction_range {
                attract(&mut p, nearest.pos, cfg.attraction_force);

                if try_attach(&mut p, &nearest, distance, cfg) {
                    debug!(
                        "particle {id} attached to {nearest_id} at distance {distance:.4}, radius now {:.4}",
                        p.radius
                    );
                    newly_attached.push(id);
                }
            }
        }

        store.particles[id] = p;
    }

    newly_attached
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{SeedableRng, rngs::StdRng};

    fn quiet_cfg() -> Config {
        Config {
            brownian_amplitude: 0.0,
            ..Config::default()
        }
    }

    #[test]
    fn brownian_perturbation_stays_within_amplitude() {
        let mut rng = StdRng::seed_from_u64(5);
        let mut p = Particle::new_free(Vec3::ZERO, Vec3::ZERO, 0.02);

        brownian_perturbation(&mut p, 0.01, &mut rng);

        assert!(p.vel.abs().max_element() <= 0.01);
        assert_eq!(p.pos, Vec3::ZERO, "only velocity is perturbed");
    }

    #[test]
    fn brownian_perturbation_with_zero_amplitude_is_noop() {
        let mut rng = StdRng::seed_from_u64(5);
        let mut p = Particle::new_free(Vec3::ZERO, Vec3::new(0.1, 0.2, 0.3), 0.02);
        brownian_perturbation(&mut p, 0.0, &mut rng);
        assert_eq!(p.vel, Vec3::new(0.1, 0.2, 0.3));
    }

    #[test]
    fn integrate_adds_velocity_to_position() {
        let mut p = Particle::new_free(Vec3::new(0.5, 0.0, -0.5), Vec3::new(0.25, 0.5, 0.25), 0.02);
        integrate(&mut p);
        assert_eq!(p.pos, Vec3::new(0.75, 0.5, -0.25));
    }

    #[test]
    fn reflect_boundary_clamps_and_damps_single_axis() {
        let mut p = Particle::new_free(Vec3::new(1.25, 0.0, 0.0), Vec3::new(0.5, 0.25, 0.0), 0.02);
        reflect_boundary(&mut p, 1.0, 0.5);
        assert_eq!(p.pos, Vec3::new(1.0, 0.0, 0.0));
        assert_eq!(p.vel, Vec3::new(-0.25, 0.25, 0.0));
    }

    #[test]
    fn reflect_boundary_handles_corner_per_axis() {
        let mut p = Particle::new_free(
            Vec3::new(-2.0, 3.0, 0.0),
            Vec3::new(-0.5, 1.0, 0.125),
            0.02,
        );
        reflect_boundary(&mut p, 1.0, 0.5);
        assert_eq!(p.pos, Vec3::new(-1.0, 1.0, 0.0));
        assert_eq!(p.vel, Vec3::new(0.25, -0.5, 0.125));
    }

    #[test]
    fn reflect_boundary_leaves_inside_particles_alone() {
        let mut p = Particle::new_free(Vec3::splat(0.5), Vec3::splat(0.1), 0.02);
        reflect_boundary(&mut p, 1.0, 0.5);
        assert_eq!(p.pos, Vec3::splat(0.5));
        assert_eq!(p.vel, Vec3::splat(0.1));
    }

    #[test]
    fn attract_pulls_toward_target() {
        let mut p = Particle::new_free(Vec3::new(2.0, 0.0, 0.0), Vec3::ZERO, 0.02);
        attract(&mut p, Vec3::ZERO, 0.5);
        assert_eq!(p.vel, Vec3::new(-0.5, 0.0, 0.0));
    }

    #[test]
    fn attract_at_zero_distance_adds_nothing() {
        let mut p = Particle::new_free(Vec3::ONE, Vec3::new(0.1, 0.0, 0.0), 0.02);
        attract(&mut p, Vec3::ONE, 0.5);
        assert_eq!(p.vel, Vec3::new(0.1, 0.0, 0.0));
        assert!(p.vel.is_finite());
    }

    #[test]
    fn try_attach_respects_threshold() {
        let cfg = Config::default();
        let seed = Particle::new_seed(Vec3::ZERO, 0.04);
        let threshold = cfg.attach_factor * (0.04 + 0.02);

        let mut far = Particle::new_free(Vec3::X, Vec3::X, 0.02);
        assert!(!try_attach(&mut far, &seed, threshold * 1.01, &cfg));
        assert!(!far.attached);

        let mut near = Particle::new_free(Vec3::X, Vec3::X, 0.02);
        assert!(try_attach(&mut near, &seed, threshold * 0.99, &cfg));
        assert!(near.attached);
        assert_eq!(near.vel, Vec3::ZERO);
        assert_eq!(near.radius, 0.02 + cfg.growth_rate);
    }

    #[test]
    fn advance_skips_attached_particles() {
        let cfg = Config::default();
        let mut store = ParticleStore::from_particles(vec![Particle::new_seed(
            Vec3::new(0.3, 0.2, 0.1),
            0.04,
        )]);
        let before = store.clone();

        let new_ids = advance(&mut store, &cfg, &mut StdRng::seed_from_u64(0));

        assert!(new_ids.is_empty());
        assert_eq!(store, before);
    }

    #[test]
    fn advance_reflects_particle_past_boundary() {
        let cfg = quiet_cfg();
        let b = cfg.boundary;
        let mut store = ParticleStore::from_particles(vec![
            Particle::new_seed(Vec3::ZERO, cfg.seed_radius()),
            Particle::new_free(Vec3::new(b + 0.01, 0.0, 0.0), Vec3::new(0.1, 0.0, 0.0), cfg.base_radius),
        ]);

        advance(&mut store, &cfg, &mut StdRng::seed_from_u64(0));

        let p = &store.particles[1];
        assert_eq!(p.pos.x, b);
        assert_eq!(p.vel.x, -0.05);
        assert!(!p.attached);
    }

    #[test]
    fn advance_attaches_particle_touching_seed() {
        let cfg = quiet_cfg();
        let mut store = ParticleStore::from_particles(vec![
            Particle::new_seed(Vec3::ZERO, cfg.seed_radius()),
            Particle::new_free(Vec3::new(0.03, 0.0, 0.0), Vec3::ZERO, cfg.base_radius),
        ]);

        let new_ids = advance(&mut store, &cfg, &mut StdRng::seed_from_u64(0));

        assert_eq!(new_ids, vec![1]);
        let p = &store.particles[1];
        assert!(p.attached);
        assert_eq!(p.vel, Vec3::ZERO);
        assert_eq!(p.radius, cfg.base_radius + cfg.growth_rate);
        assert_eq!(p.pos, Vec3::new(0.03, 0.0, 0.0));
    }

    #[test]
    fn particle_outside_attraction_range_never_attaches() {
        let cfg = Config {
            attraction_range: 0.0,
            ..quiet_cfg()
        };
        let mut store = ParticleStore::from_particles(vec![
            Particle::new_seed(Vec3::ZERO, cfg.seed_radius()),
            Particle::new_free(Vec3::new(0.03, 0.0, 0.0), Vec3::ZERO, cfg.base_radius),
        ]);

        let new_ids = advance(&mut store, &cfg, &mut StdRng::seed_from_u64(0));

        assert!(new_ids.is_empty());
        let p = &store.particles[1];
        assert!(!p.attached);
        assert_eq!(p.radius, cfg.base_radius);
        assert_eq!(p.vel, Vec3::ZERO);
    }

    #[test]
    fn particle_attached_this_tick_counts_for_later_particles() {
        let cfg = quiet_cfg();
        // Particle 1 touches the seed. Particle 2 is out of the seed's reach
        // but touches particle 1 once it has joined the cluster.
        let mut store = ParticleStore::from_particles(vec![
            Particle::new_seed(Vec3::ZERO, cfg.seed_radius()),
            Particle::new_free(Vec3::new(0.05, 0.0, 0.0), Vec3::ZERO, cfg.base_radius),
            Particle::new_free(Vec3::new(0.09, 0.0, 0.0), Vec3::ZERO, cfg.base_radius),
        ]);

        let new_ids = advance(&mut store, &cfg, &mut StdRng::seed_from_u64(0));

        assert_eq!(new_ids, vec![1, 2]);
        assert!(store.particles.iter().all(|p| p.attached));
    }

    #[test]
    fn free_particle_out_of_range_feels_no_pull() {
        let cfg = quiet_cfg();
        let mut store = ParticleStore::from_particles(vec![
            Particle::new_seed(Vec3::ZERO, cfg.seed_radius()),
            Particle::new_free(Vec3::new(0.5, 0.0, 0.0), Vec3::ZERO, cfg.base_radius),
        ]);

        advance(&mut store, &cfg, &mut StdRng::seed_from_u64(0));

        assert_eq!(store.particles[1].vel, Vec3::ZERO);
        assert_eq!(store.particles[1].pos, Vec3::new(0.5, 0.0, 0.0));
    }

    #[test]
    fn advance_without_cluster_only_moves() {
        let cfg = quiet_cfg();
        let mut store = ParticleStore::from_particles(vec![Particle::new_free(
            Vec3::ZERO,
            Vec3::new(0.25, 0.0, 0.0),
            cfg.base_radius,
        )]);

        let new_ids = advance(&mut store, &cfg, &mut StdRng::seed_from_u64(0));

        assert!(new_ids.is_empty());
        assert_eq!(store.particles[0].pos, Vec3::new(0.25, 0.0, 0.0));
    }
}
