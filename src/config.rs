//! Configuration for the spaceship simulation.
//!
//! Everything is fixed at startup; the only way to change the ship's state
//! afterwards is a respawn through [`crate::rigid_body::RigidBody::reset`].

use cgmath::{EuclideanSpace, InnerSpace, Point3, Vector3};

use crate::error::{Result, SimError};
use crate::rigid_body::{inertia, RigidBody, RigidBodyDesc};

#[derive(Debug, Clone, PartialEq)]
pub struct WindowConfig {
    pub width: u32,
    pub height: u32,
    pub title: String,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: 1080,
            height: 720,
            title: "Rocket Science".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ShipConfig {
    pub mass: f32,
    pub spawn_position: Point3<f32>,
    /// Body-space principal moments; `None` uses a solid sphere of `scale`.
    pub inertia_diagonal: Option<Vector3<f32>>,
    pub starting_direction: Vector3<f32>,
    /// Thrust magnitude while the engine key is held.
    pub engine_force: f32,
    /// Magnitude of each force in a turning couple.
    pub turn_force: f32,
    /// Distance from the center of mass to where turning forces act.
    pub lever_arm: f32,
    pub scale: f32,
}

impl Default for ShipConfig {
    fn default() -> Self {
        Self {
            mass: 1.0,
            spawn_position: Point3::new(0.0, 2.3, 0.0),
            inertia_diagonal: None,
            starting_direction: Vector3::unit_x(),
            engine_force: 10.0,
            turn_force: 2.0,
            lever_arm: 1.0,
            scale: 1.5,
        }
    }
}

impl ShipConfig {
    pub fn body_desc(&self) -> RigidBodyDesc {
        let inertia_diagonal = self
            .inertia_diagonal
            .unwrap_or_else(|| inertia::solid_sphere(self.mass.max(0.0), self.scale));
        RigidBodyDesc::new(self.mass, self.spawn_position)
            .with_inertia_diagonal(inertia_diagonal)
            .with_starting_direction(self.starting_direction)
    }

    pub fn build_body(&self) -> RigidBody {
        self.body_desc().build()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CameraConfig {
    pub fov_y_degrees: f32,
    pub near: f32,
    pub far: f32,
    /// Distance from the followed ship.
    pub radius: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            fov_y_degrees: 60.0,
            near: 0.1,
            far: 60.0,
            radius: 6.0,
        }
    }
}

/// Main configuration for a simulation run.
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationConfig {
    pub window: WindowConfig,
    pub ship: ShipConfig,
    pub camera: CameraConfig,
    /// Gravity magnitude along world -y. Zero is deep space.
    pub gravity: f32,
    /// Longest frame time fed to the integrator, in seconds.
    pub max_frame_time: f32,
    /// FPS averaging window in seconds.
    pub fps_interval: f64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            window: WindowConfig::default(),
            ship: ShipConfig::default(),
            camera: CameraConfig::default(),
            gravity: 0.0,
            max_frame_time: 0.1,
            fps_interval: 1.0,
        }
    }
}

impl SimulationConfig {
    #[must_use]
    pub fn with_gravity(mut self, gravity: f32) -> Self {
        self.gravity = gravity;
        self
    }

    #[must_use]
    pub fn with_ship(mut self, ship: ShipConfig) -> Self {
        self.ship = ship;
        self
    }

    #[must_use]
    pub fn with_camera(mut self, camera: CameraConfig) -> Self {
        self.camera = camera;
        self
    }

    #[must_use]
    pub fn with_window(mut self, window: WindowConfig) -> Self {
        self.window = window;
        self
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<()> {
        if self.window.width == 0 || self.window.height == 0 {
            return Err(SimError::invalid_config(format!(
                "window size {}x{} must be positive",
                self.window.width, self.window.height
            )));
        }

        let camera = &self.camera;
        if !(camera.fov_y_degrees > 0.0 && camera.fov_y_degrees < 180.0) {
            return Err(SimError::invalid_config(format!(
                "field of view {} must be within (0, 180) degrees",
                camera.fov_y_degrees
            )));
        }
        if !(camera.near > 0.0) || !camera.far.is_finite() || camera.far <= camera.near {
            return Err(SimError::invalid_config(format!(
                "clip range {}..{} must satisfy 0 < near < far",
                camera.near, camera.far
            )));
        }
        require_finite("camera radius", camera.radius)?;

        let ship = &self.ship;
        require_finite("ship mass", ship.mass)?;
        require_finite("engine force", ship.engine_force)?;
        require_finite("turn force", ship.turn_force)?;
        require_finite("lever arm", ship.lever_arm)?;
        require_finite("ship scale", ship.scale)?;
        for (name, v) in [
            ("spawn position", ship.spawn_position.to_vec()),
            ("starting direction", ship.starting_direction),
        ] {
            if !(v.x.is_finite() && v.y.is_finite() && v.z.is_finite()) {
                return Err(SimError::invalid_config(format!("{name} {v:?} is not finite")));
            }
        }
        if ship.starting_direction.magnitude2() == 0.0 {
            return Err(SimError::invalid_config("starting direction must be non-zero"));
        }

        require_finite("gravity", self.gravity)?;
        if !(self.max_frame_time > 0.0) {
            return Err(SimError::invalid_config(format!(
                "max frame time {} must be positive",
                self.max_frame_time
            )));
        }
        if !self.fps_interval.is_finite() {
            return Err(SimError::invalid_config("fps interval must be finite"));
        }

        Ok(())
    }
}

fn require_finite(name: &str, value: f32) -> Result<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(SimError::invalid_config(format!("{name} {value} is not finite")))
    }
}
