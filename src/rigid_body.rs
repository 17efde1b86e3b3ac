use cgmath::{
    EuclideanSpace, InnerSpace, Matrix, Matrix3, One, Point3, Quaternion, SquareMatrix, Vector3,
    Zero,
};
use log::{debug, warn};

use crate::force_actor::ForceActor;

/// World-space direction gravity pulls in. `iterate` scales it by the
/// scalar gravity magnitude and the body mass.
pub const GRAVITY_DIRECTION: Vector3<f32> = Vector3 {
    x: 0.0,
    y: -1.0,
    z: 0.0,
};

/// Principal moments at or below this are treated as degenerate.
const MIN_INERTIA: f32 = 1e-6;

/// Principal moments of inertia for common shapes, expressed as the diagonal
/// of the body-space inertia tensor.
pub mod inertia {
    use cgmath::Vector3;

    pub fn solid_sphere(mass: f32, radius: f32) -> Vector3<f32> {
        let i = 0.4 * mass * radius * radius;
        Vector3::new(i, i, i)
    }

    /// `half_extents` are the half side lengths along the body axes.
    pub fn solid_box(mass: f32, half_extents: Vector3<f32>) -> Vector3<f32> {
        let Vector3 { x, y, z } = half_extents;
        let k = mass / 3.0;
        Vector3::new(k * (y * y + z * z), k * (x * x + z * z), k * (x * x + y * y))
    }
}

/// Construction options for a [`RigidBody`].
#[derive(Copy, Clone, Debug)]
pub struct RigidBodyDesc {
    pub mass: f32,
    pub position: Point3<f32>,
    /// Body-space principal moments. `None` means a unit solid sphere.
    pub inertia_diagonal: Option<Vector3<f32>>,
    pub starting_direction: Vector3<f32>,
}

impl RigidBodyDesc {
    pub fn new(mass: f32, position: Point3<f32>) -> RigidBodyDesc {
        RigidBodyDesc {
            mass,
            position,
            inertia_diagonal: None,
            starting_direction: Vector3::unit_x(),
        }
    }

    pub fn with_inertia_diagonal(mut self, inertia_diagonal: Vector3<f32>) -> Self {
        self.inertia_diagonal = Some(inertia_diagonal);
        self
    }

    pub fn with_starting_direction(mut self, starting_direction: Vector3<f32>) -> Self {
        self.starting_direction = starting_direction;
        self
    }

    pub fn build(self) -> RigidBody {
        let inertia_diagonal = self
            .inertia_diagonal
            .unwrap_or_else(|| default_inertia(self.mass));
        let mut body = RigidBody {
            mass: self.mass,
            inverse_mass: inverse_mass_of(self.mass),
            position: self.position,
            velocity: Vector3::zero(),
            rotation_quat: Quaternion::one(),
            rotation_mat: Matrix3::identity(),
            inertia_tensor_body: Matrix3::from_diagonal(inertia_diagonal),
            inertia_from_mass: self.inertia_diagonal.is_none(),
            inverse_inertia_body: Matrix3::zero(),
            inverse_inertia_world: Matrix3::zero(),
            starting_direction: self.starting_direction,
            angular_velocity: Vector3::zero(),
            angular_momentum: Vector3::zero(),
            linear_momentum: Vector3::zero(),
            torque: Vector3::zero(),
            force: Vector3::zero(),
            forces: Vec::new(),
        };
        body.refresh_inverse_inertia_body();
        body.update_inverse_inertia_tensor();
        body
    }
}

/// A single unconstrained rigid body integrated with momentum as state.
///
/// Forces are one-shot: everything added with [`RigidBody::add_force`] is
/// consumed by the next [`RigidBody::iterate`] call. A continuous thrust has
/// to be re-added every frame.
#[derive(Clone, Debug)]
pub struct RigidBody {
    mass: f32,
    inverse_mass: f32,

    // Linear
    position: Point3<f32>,
    velocity: Vector3<f32>,
    linear_momentum: Vector3<f32>,

    // Angular
    rotation_quat: Quaternion<f32>,
    rotation_mat: Matrix3<f32>,
    inertia_tensor_body: Matrix3<f32>,
    /// Set while the inertia is the unit sphere derived from `mass`.
    inertia_from_mass: bool,
    inverse_inertia_body: Matrix3<f32>,
    inverse_inertia_world: Matrix3<f32>,
    angular_velocity: Vector3<f32>,
    angular_momentum: Vector3<f32>,

    starting_direction: Vector3<f32>,

    // Per-step accumulators
    torque: Vector3<f32>,
    force: Vector3<f32>,
    forces: Vec<ForceActor>,
}

impl Default for RigidBody {
    fn default() -> Self {
        RigidBody::new(1.0, Point3::new(0.0, 0.0, 0.0))
    }
}

/// Result of one momentum integration, applied only when every part is finite.
struct Momenta {
    linear: Vector3<f32>,
    angular: Vector3<f32>,
    velocity: Vector3<f32>,
    angular_velocity: Vector3<f32>,
}

impl Momenta {
    fn is_finite(&self) -> bool {
        is_finite(self.linear)
            && is_finite(self.angular)
            && is_finite(self.velocity)
            && is_finite(self.angular_velocity)
    }
}

fn default_inertia(mass: f32) -> Vector3<f32> {
    inertia::solid_sphere(mass.max(0.0), 1.0)
}

fn inverse_mass_of(mass: f32) -> f32 {
    if mass > 0.0 && mass.is_finite() {
        1.0 / mass
    } else {
        0.0
    }
}

impl RigidBody {
    /// Body at rest with identity orientation and the inertia of a unit
    /// solid sphere. A mass of zero or less makes the body immovable.
    pub fn new(mass: f32, position: Point3<f32>) -> RigidBody {
        RigidBodyDesc::new(mass, position).build()
    }

    /// Advances the body by `duration` seconds.
    ///
    /// Forces and torques are gathered from the pending force list, momenta
    /// are integrated, then position and orientation. The rotation matrix and
    /// world-space inverse inertia are rebuilt for the new orientation and
    /// the force list is cleared.
    pub fn iterate(&mut self, duration: f32, gravity: f32) {
        if !duration.is_finite() || !gravity.is_finite() {
            warn!(
                "skipping rigid body step with duration {} and gravity {}",
                duration, gravity
            );
            self.clear_forces();
            return;
        }
        let duration = duration.max(0.0);

        self.calculate_force();
        self.calculate_torque();
        let Some(momenta) = self.integrated_momenta(duration, gravity) else {
            warn!(
                "skipping rigid body step: force {:?} and torque {:?} overflow the momenta",
                self.force, self.torque
            );
            self.clear_forces();
            return;
        };
        let position = self.position + momenta.velocity * duration;
        if !is_finite(position.to_vec()) {
            warn!("skipping rigid body step: position overflows to {:?}", position);
            self.clear_forces();
            return;
        }

        self.commit_momenta(momenta);
        self.position = position;
        self.integrate_orientation(duration);

        self.update_rot_matrix();
        self.update_inverse_inertia_tensor();
        self.clear_forces();
    }

    /// Sums every pending force vector into the force accumulator.
    pub fn calculate_force(&mut self) {
        self.force = self
            .forces
            .iter()
            .fold(Vector3::zero(), |sum, actor| sum + actor.force());
    }

    /// Sums `(R * point) x force` over the pending forces into the torque
    /// accumulator, using the current orientation.
    pub fn calculate_torque(&mut self) {
        let rotation = self.rotation_mat;
        self.torque = self.forces.iter().fold(Vector3::zero(), |sum, actor| {
            sum + (rotation * actor.application_point()).cross(actor.force())
        });
    }

    /// Semi-implicit Euler step of both momenta, then derives linear and
    /// angular velocity from them.
    ///
    /// Returns `false` and leaves the body untouched when the result is not
    /// finite.
    pub fn update_momenta(&mut self, duration: f32, gravity: f32) -> bool {
        match self.integrated_momenta(duration, gravity) {
            Some(momenta) => {
                self.commit_momenta(momenta);
                true
            }
            None => {
                warn!(
                    "momenta overflow with force {:?} and torque {:?}, keeping previous state",
                    self.force, self.torque
                );
                false
            }
        }
    }

    fn integrated_momenta(&self, duration: f32, gravity: f32) -> Option<Momenta> {
        let (linear, angular) = if self.is_immovable() {
            (Vector3::zero(), Vector3::zero())
        } else {
            let weight = GRAVITY_DIRECTION * (gravity * self.mass);
            (
                self.linear_momentum + (self.force + weight) * duration,
                self.angular_momentum + self.torque * duration,
            )
        };
        let momenta = Momenta {
            linear,
            angular,
            velocity: linear * self.inverse_mass,
            angular_velocity: self.inverse_inertia_world * angular,
        };
        momenta.is_finite().then_some(momenta)
    }

    fn commit_momenta(&mut self, momenta: Momenta) {
        self.linear_momentum = momenta.linear;
        self.angular_momentum = momenta.angular;
        self.velocity = momenta.velocity;
        self.angular_velocity = momenta.angular_velocity;
    }

    pub fn update_rot_matrix(&mut self) {
        self.rotation_mat = Matrix3::from(self.rotation_quat);
    }

    /// `I_world^-1 = R * I_body^-1 * R^T` for the current rotation matrix.
    pub fn update_inverse_inertia_tensor(&mut self) {
        self.inverse_inertia_world =
            self.rotation_mat * self.inverse_inertia_body * self.rotation_mat.transpose();
    }

    /// Queues a force for the next step. Non-finite forces are dropped.
    pub fn add_force(&mut self, actor: ForceActor) {
        if !is_finite(actor.application_point()) || !is_finite(actor.force()) {
            warn!("ignoring non-finite force {:?}", actor);
            return;
        }
        self.forces.push(actor);
    }

    /// Places the body at `new_position` with orientation `rotation`, at rest
    /// and with no pending forces.
    pub fn reset(&mut self, new_position: Point3<f32>, rotation: Quaternion<f32>) {
        self.position = new_position;
        self.rotation_quat = normalized_or_identity(rotation);

        self.velocity = Vector3::zero();
        self.angular_velocity = Vector3::zero();
        self.linear_momentum = Vector3::zero();
        self.angular_momentum = Vector3::zero();
        self.clear_forces();

        self.update_rot_matrix();
        self.update_inverse_inertia_tensor();
    }

    /// Dumps the kinematic state at debug level.
    pub fn log_state(&self) {
        debug!(
            "position {:?}, velocity {:?}",
            self.position, self.velocity
        );
        debug!(
            "linear momentum {:?}, angular momentum {:?}, angular velocity {:?}",
            self.linear_momentum, self.angular_momentum, self.angular_velocity
        );
        debug!(
            "force {:?}, torque {:?}, pending forces {}",
            self.force,
            self.torque,
            self.forces.len()
        );
        debug!("rotation {:?}", self.rotation_quat);
    }

    fn integrate_orientation(&mut self, duration: f32) {
        let spin = Quaternion::from_sv(0.0, self.angular_velocity) * self.rotation_quat * 0.5;
        let advanced = self.rotation_quat + spin * duration;
        let norm = advanced.magnitude();
        if norm.is_finite() && norm > f32::EPSILON {
            self.rotation_quat = advanced / norm;
        } else {
            warn!(
                "orientation update produced a degenerate quaternion {:?}, keeping {:?}",
                advanced, self.rotation_quat
            );
        }
    }

    fn clear_forces(&mut self) {
        self.force = Vector3::zero();
        self.torque = Vector3::zero();
        self.forces.clear();
    }

    fn refresh_inverse_inertia_body(&mut self) {
        let diagonal = Vector3::new(
            self.inertia_tensor_body.x.x,
            self.inertia_tensor_body.y.y,
            self.inertia_tensor_body.z.z,
        );
        let usable = |moment: f32| moment.is_finite() && moment > MIN_INERTIA;
        self.inverse_inertia_body = if self.is_immovable()
            || !(usable(diagonal.x) && usable(diagonal.y) && usable(diagonal.z))
        {
            Matrix3::zero()
        } else {
            Matrix3::from_diagonal(Vector3::new(
                1.0 / diagonal.x,
                1.0 / diagonal.y,
                1.0 / diagonal.z,
            ))
        };
    }

    pub fn is_immovable(&self) -> bool {
        self.inverse_mass == 0.0
    }

    /// Starting direction rotated into world space.
    pub fn forward(&self) -> Vector3<f32> {
        self.rotation_mat * self.starting_direction
    }

    pub fn mass(&self) -> f32 {
        self.mass
    }

    pub fn inverse_mass(&self) -> f32 {
        self.inverse_mass
    }

    /// Changes the mass and everything derived from it. Momentum is kept, so
    /// velocities are re-derived for the new mass.
    ///
    /// A body still using the default unit-sphere inertia gets it rebuilt for
    /// the new mass. An inertia set explicitly is left as given.
    pub fn set_mass(&mut self, mass: f32) {
        self.mass = mass;
        self.inverse_mass = inverse_mass_of(mass);
        if self.inertia_from_mass {
            self.inertia_tensor_body = Matrix3::from_diagonal(default_inertia(mass));
        }
        self.refresh_inverse_inertia_body();
        self.update_inverse_inertia_tensor();
        if self.is_immovable() {
            self.linear_momentum = Vector3::zero();
            self.angular_momentum = Vector3::zero();
        }
        self.velocity = self.linear_momentum * self.inverse_mass;
        self.angular_velocity = self.inverse_inertia_world * self.angular_momentum;
    }

    pub fn position(&self) -> Point3<f32> {
        self.position
    }

    pub fn set_position(&mut self, position: Point3<f32>) {
        self.position = position;
    }

    pub fn velocity(&self) -> Vector3<f32> {
        self.velocity
    }

    pub fn rotation_quat(&self) -> Quaternion<f32> {
        self.rotation_quat
    }

    /// Sets the orientation. The quaternion is normalized and the cached
    /// rotation matrix and world inverse inertia follow it.
    pub fn set_rotation_quat(&mut self, rotation: Quaternion<f32>) {
        self.rotation_quat = normalized_or_identity(rotation);
        self.update_rot_matrix();
        self.update_inverse_inertia_tensor();
        self.angular_velocity = self.inverse_inertia_world * self.angular_momentum;
    }

    pub fn rotation_mat(&self) -> Matrix3<f32> {
        self.rotation_mat
    }

    pub fn inertia_tensor_body(&self) -> Matrix3<f32> {
        self.inertia_tensor_body
    }

    pub fn set_inertia_diagonal(&mut self, inertia_diagonal: Vector3<f32>) {
        self.inertia_tensor_body = Matrix3::from_diagonal(inertia_diagonal);
        self.inertia_from_mass = false;
        self.refresh_inverse_inertia_body();
        self.update_inverse_inertia_tensor();
        self.angular_velocity = self.inverse_inertia_world * self.angular_momentum;
    }

    pub fn inverse_inertia_tensor_body(&self) -> Matrix3<f32> {
        self.inverse_inertia_body
    }

    pub fn inverse_inertia_tensor_world(&self) -> Matrix3<f32> {
        self.inverse_inertia_world
    }

    pub fn angular_velocity(&self) -> Vector3<f32> {
        self.angular_velocity
    }

    pub fn angular_momentum(&self) -> Vector3<f32> {
        self.angular_momentum
    }

    pub fn linear_momentum(&self) -> Vector3<f32> {
        self.linear_momentum
    }

    pub fn force(&self) -> Vector3<f32> {
        self.force
    }

    pub fn torque(&self) -> Vector3<f32> {
        self.torque
    }

    pub fn pending_forces(&self) -> &[ForceActor] {
        &self.forces
    }

    pub fn starting_direction(&self) -> Vector3<f32> {
        self.starting_direction
    }

    pub fn set_starting_direction(&mut self, starting_direction: Vector3<f32>) {
        self.starting_direction = starting_direction;
    }
}

fn is_finite(v: Vector3<f32>) -> bool {
    v.x.is_finite() && v.y.is_finite() && v.z.is_finite()
}

fn normalized_or_identity(rotation: Quaternion<f32>) -> Quaternion<f32> {
    let norm = rotation.magnitude();
    if norm.is_finite() && norm > f32::EPSILON {
        rotation / norm
    } else {
        warn!("degenerate orientation {:?}, using identity", rotation);
        Quaternion::one()
    }
}
