use crate::error::{ConfigError, Result};

/// Tunable parameters of the aggregation simulation.
///
/// All distances are in world units; the cluster grows inside the cube
/// `[-boundary, boundary]³`. Velocities are per tick, there is no separate
/// time step scaling.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Config {
    /// Number of free particles created at initialization.
    pub particle_count: usize,
    /// Number of attached seed particles. The first sits at the origin.
    pub seed_count: usize,

    /// Radius of a free particle.
    pub base_radius: f32,
    /// Seed radius as a multiple of `base_radius`.
    pub seed_radius_factor: f32,

    /// Distance below which a free particle is pulled toward the cluster.
    pub attraction_range: f32,
    /// Velocity added per tick toward the nearest attached particle.
    pub attraction_force: f32,
    /// Radius increment applied when a particle attaches.
    pub growth_rate: f32,
    /// Attach when `distance < attach_factor * (r_nearest + r_self)`.
    pub attach_factor: f32,

    /// Per-axis amplitude of the random velocity kick applied every tick.
    pub brownian_amplitude: f32,
    /// Per-axis amplitude of the random velocity given at initialization.
    pub initial_speed: f32,

    /// Half-width of the containing cube.
    pub boundary: f32,
    /// Half-width of the cube free particles are spawned in.
    pub spawn_half_extent: f32,
    /// Bounce rule is `v *= -bounce_damping`.
    pub bounce_damping: f32,

    /// Target seconds between ticks. Only read by the driver.
    pub tick_interval: f64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            particle_count: 200,
            seed_count: 1,
            base_radius: 0.02,
            seed_radius_factor: 2.0,
            attraction_range: 0.15,
            attraction_force: 0.0005,
            growth_rate: 0.005,
            attach_factor: 0.9,
            brownian_amplitude: 0.05,
            initial_speed: 0.001,
            boundary: 1.0,
            spawn_half_extent: 1.0,
            bounce_damping: 0.5,
            tick_interval: 1.0 / 60.0,
        }
    }
}

impl Config {
    /// Radius of a freshly created seed particle.
    #[inline]
    pub fn seed_radius(&self) -> f32 {
        self.base_radius * self.seed_radius_factor
    }

    /// Checks that every parameter can drive a meaningful simulation.
    ///
    /// ### Returns
    /// - `Ok(())` if the configuration is usable.
    /// - `Err(ConfigError)` naming the first offending parameter.
    pub fn validate(&self) -> Result<()> {
        if self.seed_count == 0 {
            return Err(ConfigError::NoSeed);
        }

        positive("base_radius", self.base_radius as f64)?;
        positive("seed_radius_factor", self.seed_radius_factor as f64)?;
        positive("boundary", self.boundary as f64)?;
        positive("spawn_half_extent", self.spawn_half_extent as f64)?;
        positive("attach_factor", self.attach_factor as f64)?;
        positive("tick_interval", self.tick_interval)?;

        if self.spawn_half_extent > self.boundary {
            return Err(ConfigError::SpawnOutsideBoundary {
                spawn: self.spawn_half_extent as f64,
                boundary: self.boundary as f64,
            });
        }

        non_negative("attraction_range", self.attraction_range as f64)?;
        non_negative("attraction_force", self.attraction_force as f64)?;
        non_negative("growth_rate", self.growth_rate as f64)?;
        non_negative("brownian_amplitude", self.brownian_amplitude as f64)?;
        non_negative("initial_speed", self.initial_speed as f64)?;

        finite("bounce_damping", self.bounce_damping as f64)?;
        if !(0.0..=1.0).contains(&self.bounce_damping) {
            return Err(ConfigError::OutOfRange {
                name: "bounce_damping",
                value: self.bounce_damping as f64,
                min: 0.0,
                max: 1.0,
            });
        }

        Ok(())
    }
}

fn finite(name: &'static str, value: f64) -> Result<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::NotFinite { name, value })
    }
}

fn positive(name: &'static str, value: f64) -> Result<()> {
    finite(name, value)?;
    if value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::NotPositive { name, value })
    }
}

fn non_negative(name: &'static str, value: f64) -> Result<()> {
    finite(name, value)?;
    if value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::Negative { name, value })
    }
}
