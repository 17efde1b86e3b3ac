use cgmath::{Vector3, Zero};

/// A single force acting on a rigid body for one simulation step.
///
/// The application point is an offset from the center of mass in body
/// (model) space. The force vector is used as given; callers that think in
/// body axes rotate it into world space before handing it over.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ForceActor {
    application_point: Vector3<f32>,
    force: Vector3<f32>,
}

impl ForceActor {
    pub fn new(application_point: Vector3<f32>, force: Vector3<f32>) -> ForceActor {
        ForceActor {
            application_point,
            force,
        }
    }

    /// Force applied at the center of mass. Contributes no torque.
    pub fn at_center(force: Vector3<f32>) -> ForceActor {
        ForceActor::new(Vector3::zero(), force)
    }

    pub fn application_point(&self) -> Vector3<f32> {
        self.application_point
    }

    pub fn force(&self) -> Vector3<f32> {
        self.force
    }
}
