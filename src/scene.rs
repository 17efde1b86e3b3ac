use std::time::Instant;

use cgmath::{One, Point3, Quaternion};
use log::{debug, info};
use winit::keyboard::KeyCode;

use crate::camera::FollowCamera;
use crate::config::SimulationConfig;
use crate::controls::{ShipAction, ShipControls};
use crate::frame_timer::{FrameTick, FrameTimer};
use crate::mesh::Mesh;
use crate::virtual_object::VirtualObject;

const SHIP: usize = 0;

/// Static spheres placed around the spawn point so motion is visible.
const BEACONS: [[f32; 3]; 5] = [
    [0.0, 0.0, 0.0],
    [12.0, 2.0, 0.0],
    [-12.0, 2.0, 0.0],
    [0.0, 2.0, 12.0],
    [0.0, 2.0, -12.0],
];

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum KeyBinding {
    Ship(ShipAction),
    Respawn,
    Quit,
}

pub fn key_binding(key: KeyCode) -> Option<KeyBinding> {
    let binding = match key {
        KeyCode::KeyW | KeyCode::KeyS | KeyCode::ArrowUp => KeyBinding::Ship(ShipAction::Thrust),
        KeyCode::ArrowLeft | KeyCode::KeyA => KeyBinding::Ship(ShipAction::YawLeft),
        KeyCode::ArrowRight | KeyCode::KeyD => KeyBinding::Ship(ShipAction::YawRight),
        KeyCode::KeyQ => KeyBinding::Ship(ShipAction::PitchUp),
        KeyCode::KeyE => KeyBinding::Ship(ShipAction::PitchDown),
        KeyCode::KeyR => KeyBinding::Respawn,
        KeyCode::Escape => KeyBinding::Quit,
        _ => return None,
    };
    Some(binding)
}

/// Everything simulated and drawn, independent of the window.
pub struct Scene {
    objects: Vec<VirtualObject>,
    controls: ShipControls,
    camera: FollowCamera,
    timer: FrameTimer,
    gravity: f32,
    spawn_position: Point3<f32>,
    title: String,
}

impl Scene {
    pub fn new(config: &SimulationConfig) -> Self {
        let ship = &config.ship;
        let mut objects = vec![VirtualObject::from_body(0, ship.build_body(), ship.scale)
            .with_mesh(Mesh::rocket([0.55, 0.58, 0.62], [0.85, 0.15, 0.1]))];
        for (index, [x, y, z]) in BEACONS.iter().copied().enumerate() {
            let beacon = VirtualObject::new(index as u32 + 1, Point3::new(x, y, z), 0.0, true, 0.5)
                .with_mesh(Mesh::uv_sphere(1.0, 12, 18, [0.95, 0.75, 0.2]));
            objects.push(beacon);
        }

        let view = &config.camera;
        let mut camera = FollowCamera::new(
            view.fov_y_degrees,
            config.window.width,
            config.window.height,
            view.near,
            view.far,
            view.radius,
        );
        camera.set_center(ship.spawn_position);

        Scene {
            objects,
            controls: ShipControls::new(ship.engine_force, ship.turn_force, ship.lever_arm),
            camera,
            timer: FrameTimer::new(config.fps_interval, config.max_frame_time),
            gravity: config.gravity,
            spawn_position: ship.spawn_position,
            title: config.window.title.clone(),
        }
    }

    /// Advances the simulation to `now`: applies held controls, steps every
    /// object and re-centers the camera on the ship.
    pub fn update(&mut self, now: Instant) -> FrameTick {
        let tick = self.timer.tick(now);

        self.controls.apply(self.objects[SHIP].body_mut());
        for object in &mut self.objects {
            object.step(tick.delta, self.gravity);
        }
        self.camera.set_center(self.ship().body().position());

        if tick.fps.is_some() {
            self.ship().body().log_state();
        }
        tick
    }

    /// Returns `false` when the key asks to quit.
    pub fn handle_key(&mut self, key: KeyCode, pressed: bool) -> bool {
        match key_binding(key) {
            Some(KeyBinding::Ship(action)) => self.controls.set(action, pressed),
            Some(KeyBinding::Respawn) => {
                if pressed {
                    self.respawn();
                }
            }
            Some(KeyBinding::Quit) => return !pressed,
            None => debug!("unbound key {:?}", key),
        }
        true
    }

    pub fn respawn(&mut self) {
        info!("respawning ship at {:?}", self.spawn_position);
        let ship = &mut self.objects[SHIP];
        ship.body_mut().reset(self.spawn_position, Quaternion::one());
        ship.update_model_matrix();
        self.camera.set_center(self.spawn_position);
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.camera.resize(width, height);
    }

    pub fn ship(&self) -> &VirtualObject {
        &self.objects[SHIP]
    }

    pub fn objects(&self) -> &[VirtualObject] {
        &self.objects
    }

    pub fn camera(&self) -> &FollowCamera {
        &self.camera
    }

    pub fn title(&self) -> &str {
        &self.title
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use cgmath::MetricSpace;
    use std::time::Duration;

    fn run_frames(scene: &mut Scene, start: Instant, frames: u64) -> Instant {
        let mut now = start;
        for _ in 0..frames {
            now += Duration::from_millis(16);
            scene.update(now);
        }
        now
    }

    #[test]
    fn ship_is_first_and_beacons_are_static() {
        let scene = Scene::new(&SimulationConfig::default());
        assert_eq!(scene.objects().len(), 1 + BEACONS.len());
        assert!(!scene.ship().body().is_immovable());
        assert!(scene.objects()[1..].iter().all(|o| o.body().is_immovable()));
        assert!(scene.objects().iter().all(|o| !o.mesh().indices.is_empty()));
    }

    #[test]
    fn thrust_moves_ship_and_camera_follows() {
        let mut scene = Scene::new(&SimulationConfig::default());
        let start = Instant::now();
        scene.update(start);

        assert!(scene.handle_key(KeyCode::KeyS, true));
        let now = run_frames(&mut scene, start, 30);
        assert!(scene.handle_key(KeyCode::KeyS, false));
        let x_after_thrust = scene.ship().body().position().x;
        assert!(x_after_thrust > 0.0);

        run_frames(&mut scene, now, 10);
        assert!(scene.ship().body().position().x > x_after_thrust);

        let center = scene.ship().body().position();
        assert_abs_diff_eq!(scene.camera().eye().distance(center), 6.0, epsilon = 1e-4);
        for beacon in &scene.objects()[1..] {
            assert_eq!(beacon.body().velocity(), cgmath::Vector3::new(0.0, 0.0, 0.0));
        }
    }

    #[test]
    fn respawn_and_quit_keys() {
        let mut scene = Scene::new(&SimulationConfig::default());
        let start = Instant::now();
        scene.update(start);
        scene.handle_key(KeyCode::ArrowUp, true);
        run_frames(&mut scene, start, 10);
        scene.handle_key(KeyCode::ArrowUp, false);

        assert!(scene.handle_key(KeyCode::KeyR, true));
        let body = scene.ship().body();
        assert_eq!(body.position(), Point3::new(0.0, 2.3, 0.0));
        assert_eq!(body.velocity(), cgmath::Vector3::new(0.0, 0.0, 0.0));

        assert!(scene.handle_key(KeyCode::Escape, false));
        assert!(!scene.handle_key(KeyCode::Escape, true));
        assert_eq!(key_binding(KeyCode::KeyZ), None);
    }
}
