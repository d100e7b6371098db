use glam::Vec3;

/// A single particle, either drifting freely or frozen into the cluster.
///
/// Once `attached` is set it never clears again, `vel` stays zero and
/// `pos` no longer changes.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Particle {
    pub pos: Vec3,
    pub vel: Vec3,
    pub radius: f32,
    pub attached: bool,
}

impl Particle {
    pub fn new_free(pos: Vec3, vel: Vec3, radius: f32) -> Self {
        Self {
            pos,
            vel,
            radius,
            attached: false,
        }
    }

    pub fn new_seed(pos: Vec3, radius: f32) -> Self {
        Self {
            pos,
            vel: Vec3::ZERO,
            radius,
            attached: true,
        }
    }

    /// Freezes the particle into the cluster and grows it by `growth`.
    ///
    /// Calling this on an already attached particle does nothing, so the
    /// radius grows exactly once per particle.
    pub fn attach(&mut self, growth: f32) {
        if self.attached {
            return;
        }
        self.attached = true;
        self.radius += growth;
        self.vel = Vec3::ZERO;
    }

    #[inline]
    pub fn renderable(&self) -> Renderable {
        Renderable {
            pos: self.pos,
            radius: self.radius,
            attached: self.attached,
        }
    }
}

/// Read-only view of a particle handed to the renderer.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Renderable {
    pub pos: Vec3,
    pub radius: f32,
    pub attached: bool,
}
