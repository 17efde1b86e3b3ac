use cgmath::{EuclideanSpace, Matrix4, Point3, SquareMatrix};

use crate::mesh::Mesh;
use crate::rigid_body::{inertia, RigidBody, RigidBodyDesc};

/// Pairs a rigid body with the mesh it is drawn as and the transform it is
/// drawn with. The body is only read when the transform is rebuilt.
#[derive(Clone, Debug)]
pub struct VirtualObject {
    id: u32,
    body: RigidBody,
    mesh: Mesh,
    scale: f32,
    model_matrix: Matrix4<f32>,
}

impl VirtualObject {
    /// A static object gets zero mass and never moves. `size` is the radius
    /// used for the body's inertia and the mesh scale.
    pub fn new(id: u32, position: Point3<f32>, mass: f32, is_static: bool, size: f32) -> Self {
        let mass = if is_static { 0.0 } else { mass };
        let body = RigidBodyDesc::new(mass, position)
            .with_inertia_diagonal(inertia::solid_sphere(mass.max(0.0), size))
            .build();
        VirtualObject::from_body(id, body, size)
    }

    pub fn from_body(id: u32, body: RigidBody, scale: f32) -> Self {
        let mut object = VirtualObject {
            id,
            body,
            mesh: Mesh::default(),
            scale,
            model_matrix: Matrix4::identity(),
        };
        object.update_model_matrix();
        object
    }

    #[must_use]
    pub fn with_mesh(mut self, mesh: Mesh) -> Self {
        self.mesh = mesh;
        self
    }

    /// Rebuilds the model matrix as translation * rotation * scale.
    pub fn update_model_matrix(&mut self) {
        self.model_matrix = Matrix4::from_translation(self.body.position().to_vec())
            * Matrix4::from(self.body.rotation_mat())
            * Matrix4::from_scale(self.scale);
    }

    pub fn step(&mut self, duration: f32, gravity: f32) {
        self.body.iterate(duration, gravity);
        self.update_model_matrix();
    }

    pub fn id(&self) -> u32 {
        self.id
    }

    pub fn mesh(&self) -> &Mesh {
        &self.mesh
    }

    pub fn body(&self) -> &RigidBody {
        &self.body
    }

    pub fn body_mut(&mut self) -> &mut RigidBody {
        &mut self.body
    }

    pub fn model_matrix(&self) -> Matrix4<f32> {
        self.model_matrix
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::force_actor::ForceActor;
    use approx::assert_abs_diff_eq;
    use cgmath::{Deg, Quaternion, Rotation3, Vector3, Vector4};

    #[test]
    fn model_matrix_places_mesh_at_body() {
        let mut object = VirtualObject::new(1, Point3::new(1.0, 2.0, 3.0), 1.0, false, 2.0);
        object
            .body_mut()
            .reset(Point3::new(1.0, 2.0, 3.0), Quaternion::from_angle_z(Deg(90.0)));
        object.update_model_matrix();

        let model = object.model_matrix();
        assert_abs_diff_eq!(model.w.x, 1.0);
        assert_abs_diff_eq!(model.w.y, 2.0);
        assert_abs_diff_eq!(model.w.z, 3.0);

        // Local +x is rotated onto world +y and scaled by the size.
        let tip = model * Vector4::new(1.0, 0.0, 0.0, 1.0);
        assert_abs_diff_eq!(tip.x, 1.0, epsilon = 1e-5);
        assert_abs_diff_eq!(tip.y, 4.0, epsilon = 1e-5);
        assert_abs_diff_eq!(tip.z, 3.0, epsilon = 1e-5);
    }

    #[test]
    fn step_moves_dynamic_and_holds_static() {
        let mut ship = VirtualObject::new(0, Point3::new(0.0, 0.0, 0.0), 1.0, false, 1.0);
        let mut beacon = VirtualObject::new(1, Point3::new(0.0, 0.0, 0.0), 1.0, true, 1.0);
        assert!(beacon.body().is_immovable());

        for object in [&mut ship, &mut beacon] {
            object
                .body_mut()
                .add_force(ForceActor::at_center(Vector3::new(0.0, 0.0, 4.0)));
            object.step(0.5, 0.0);
        }

        assert_abs_diff_eq!(ship.model_matrix().w.z, 1.0, epsilon = 1e-5);
        assert_abs_diff_eq!(beacon.model_matrix().w.z, 0.0);
    }
}
