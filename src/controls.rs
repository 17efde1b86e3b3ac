use cgmath::{InnerSpace, Vector3};

use crate::force_actor::ForceActor;
use crate::rigid_body::RigidBody;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ShipAction {
    Thrust,
    YawLeft,
    YawRight,
    PitchUp,
    PitchDown,
}

/// Held ship actions, turned into forces once per frame.
#[derive(Copy, Clone, Debug)]
pub struct ShipControls {
    engine_force: f32,
    turn_force: f32,
    lever_arm: f32,
    thrust: bool,
    yaw_left: bool,
    yaw_right: bool,
    pitch_up: bool,
    pitch_down: bool,
}

impl ShipControls {
    pub fn new(engine_force: f32, turn_force: f32, lever_arm: f32) -> Self {
        ShipControls {
            engine_force,
            turn_force,
            lever_arm,
            thrust: false,
            yaw_left: false,
            yaw_right: false,
            pitch_up: false,
            pitch_down: false,
        }
    }

    pub fn set(&mut self, action: ShipAction, pressed: bool) {
        match action {
            ShipAction::Thrust => self.thrust = pressed,
            ShipAction::YawLeft => self.yaw_left = pressed,
            ShipAction::YawRight => self.yaw_right = pressed,
            ShipAction::PitchUp => self.pitch_up = pressed,
            ShipAction::PitchDown => self.pitch_down = pressed,
        }
    }

    pub fn is_active(&self, action: ShipAction) -> bool {
        match action {
            ShipAction::Thrust => self.thrust,
            ShipAction::YawLeft => self.yaw_left,
            ShipAction::YawRight => self.yaw_right,
            ShipAction::PitchUp => self.pitch_up,
            ShipAction::PitchDown => self.pitch_down,
        }
    }

    pub fn release_all(&mut self) {
        *self = ShipControls::new(self.engine_force, self.turn_force, self.lever_arm);
    }

    /// Adds this frame's forces to `body`.
    ///
    /// Thrust pushes along the body's forward axis through the center of
    /// mass. Turning uses a couple at nose and tail so it only adds torque.
    pub fn apply(&self, body: &mut RigidBody) {
        let rotation = body.rotation_mat();
        let forward = body.starting_direction();

        if self.thrust {
            body.add_force(ForceActor::at_center(
                rotation * forward * self.engine_force,
            ));
        }

        let up = reference_up(forward);
        let side = forward.cross(up).normalize();
        let yaw = axis_input(self.yaw_left, self.yaw_right);
        if yaw != 0.0 {
            // Nose pushed to the left (-side) turns the ship left.
            add_couple(body, forward * self.lever_arm, -side * (yaw * self.turn_force));
        }
        let pitch = axis_input(self.pitch_up, self.pitch_down);
        if pitch != 0.0 {
            add_couple(body, forward * self.lever_arm, up * (pitch * self.turn_force));
        }
    }
}

/// World up, or +z for a ship whose forward axis lies along world up.
fn reference_up(forward: Vector3<f32>) -> Vector3<f32> {
    let up = Vector3::unit_y();
    if forward.cross(up).magnitude2() > 1e-6 * forward.magnitude2() {
        up
    } else {
        Vector3::unit_z()
    }
}

fn axis_input(positive: bool, negative: bool) -> f32 {
    match (positive, negative) {
        (true, false) => 1.0,
        (false, true) => -1.0,
        _ => 0.0,
    }
}

/// Equal and opposite forces at `nose` and `-nose`, both given in body axes.
fn add_couple(body: &mut RigidBody, nose: Vector3<f32>, local_force: Vector3<f32>) {
    let world_force = body.rotation_mat() * local_force;
    body.add_force(ForceActor::new(nose, world_force));
    body.add_force(ForceActor::new(-nose, -world_force));
}
