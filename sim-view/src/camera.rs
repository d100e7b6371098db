//! Orbit camera projecting the 3-D scene onto the 2-D egui canvas.

use glam::{Mat4, Vec3};

/// Perspective camera orbiting the origin.
///
/// The eye sits on a sphere of radius `distance` around the origin, placed
/// by `yaw` (around +Y) and `pitch` (elevation), and always looks at the
/// origin with +Y up.
#[derive(Clone, Copy, Debug)]
pub struct OrbitCamera {
    pub yaw: f32,
    pub pitch: f32,
    pub distance: f32,
    /// Vertical field of view in radians.
    pub fov_y: f32,
}

/// A point after projection to screen space.
#[derive(Clone, Copy, Debug)]
pub struct Projected {
    pub pos: egui::Pos2,
    /// Clip-space `w`, larger is further from the eye.
    pub depth: f32,
    /// On-screen radius in pixels of a sphere with the given world radius.
    pub radius: f32,
}

const NEAR: f32 = 0.1;
const FAR: f32 = 100.0;
const MIN_DISTANCE: f32 = 0.5;
const MAX_DISTANCE: f32 = 20.0;
const PITCH_LIMIT: f32 = 1.5;

impl Default for OrbitCamera {
    /// Eye at `(2, 2, 2)` looking at the origin with a 45° field of view.
    fn default() -> Self {
        Self::looking_from(Vec3::new(2.0, 2.0, 2.0))
    }
}

impl OrbitCamera {
    /// Places the camera at `eye`, looking at the origin.
    pub fn looking_from(eye: Vec3) -> Self {
        let distance = eye.length();
        let yaw = eye.x.atan2(eye.z);
        let pitch = (eye.y / distance).asin();
        Self {
            yaw,
            pitch,
            distance,
            fov_y: 45f32.to_radians(),
        }
    }

    pub fn eye(&self) -> Vec3 {
        let horizontal = self.distance * self.pitch.cos();
        Vec3::new(
            horizontal * self.yaw.sin(),
            self.distance * self.pitch.sin(),
            horizontal * self.yaw.cos(),
        )
    }

    /// Rotates around the origin; pitch is kept short of the poles.
    pub fn orbit(&mut self, d_yaw: f32, d_pitch: f32) {
        self.yaw += d_yaw;
        self.pitch = (self.pitch + d_pitch).clamp(-PITCH_LIMIT, PITCH_LIMIT);
    }

    /// Moves the eye toward (`factor < 1`) or away from the origin.
    pub fn zoom(&mut self, factor: f32) {
        self.distance = (self.distance * factor).clamp(MIN_DISTANCE, MAX_DISTANCE);
    }

    fn view_proj(&self, aspect: f32) -> Mat4 {
        let view = Mat4::look_at_rh(self.eye(), Vec3::ZERO, Vec3::Y);
        let proj = Mat4::perspective_rh_gl(self.fov_y, aspect, NEAR, FAR);
        proj * view
    }

    /// Projects a world-space sphere into `rect`.
    ///
    /// ### Returns
    /// `None` if the center lies behind the eye or outside the depth range.
    pub fn project(&self, world: Vec3, world_radius: f32, rect: egui::Rect) -> Option<Projected> {
        let aspect = (rect.width() / rect.height().max(1.0)).max(f32::EPSILON);
        let clip = self.view_proj(aspect) * world.extend(1.0);
        if clip.w <= NEAR || clip.w >= FAR {
            return None;
        }
        let ndc = clip.truncate() / clip.w;
        let center = rect.center();
        let half_h = rect.height() * 0.5;
        let focal = 1.0 / (self.fov_y * 0.5).tan();

        Some(Projected {
            pos: egui::pos2(
                center.x + ndc.x * rect.width() * 0.5,
                center.y - ndc.y * half_h,
            ),
            depth: clip.w,
            radius: world_radius * focal / clip.w * half_h,
        })
    }
}
