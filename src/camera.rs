use cgmath::{Deg, EuclideanSpace, InnerSpace, Matrix4, Point3, Vector3};

/// cgmath produces OpenGL clip space (z in -1..1); wgpu expects 0..1.
#[rustfmt::skip]
pub const OPENGL_TO_WGPU_MATRIX: Matrix4<f32> = Matrix4::new(
    1.0, 0.0, 0.0, 0.0,
    0.0, 1.0, 0.0, 0.0,
    0.0, 0.0, 0.5, 0.0,
    0.0, 0.0, 0.5, 1.0,
);

/// Perspective camera orbiting a moving center at a fixed distance.
#[derive(Copy, Clone, Debug)]
pub struct FollowCamera {
    center: Point3<f32>,
    offset_direction: Vector3<f32>,
    radius: f32,
    aspect: f32,
    fov_y: Deg<f32>,
    near: f32,
    far: f32,
}

impl FollowCamera {
    pub fn new(fov_y_degrees: f32, width: u32, height: u32, near: f32, far: f32, radius: f32) -> Self {
        FollowCamera {
            center: Point3::origin(),
            offset_direction: Vector3::new(-0.6, 0.5, 1.0).normalize(),
            radius,
            aspect: aspect_ratio(width, height),
            fov_y: Deg(fov_y_degrees),
            near,
            far,
        }
    }

    pub fn set_center(&mut self, center: Point3<f32>) {
        self.center = center;
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.aspect = aspect_ratio(width, height);
    }

    pub fn eye(&self) -> Point3<f32> {
        self.center + self.offset_direction * self.radius
    }

    pub fn build_view_projection_matrix(&self) -> Matrix4<f32> {
        let view = Matrix4::look_at_rh(self.eye(), self.center, Vector3::unit_y());
        let projection = cgmath::perspective(self.fov_y, self.aspect, self.near, self.far);
        OPENGL_TO_WGPU_MATRIX * projection * view
    }
}

fn aspect_ratio(width: u32, height: u32) -> f32 {
    width.max(1) as f32 / height.max(1) as f32
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use cgmath::{MetricSpace, Vector4};

    fn clip(camera: &FollowCamera, point: Point3<f32>) -> Vector4<f32> {
        let clip = camera.build_view_projection_matrix() * point.to_homogeneous();
        clip / clip.w
    }

    #[test]
    fn center_projects_to_screen_middle() {
        let mut camera = FollowCamera::new(60.0, 1080, 720, 0.1, 60.0, 6.0);
        camera.set_center(Point3::new(3.0, -2.0, 10.0));

        let ndc = clip(&camera, Point3::new(3.0, -2.0, 10.0));
        assert_abs_diff_eq!(ndc.x, 0.0, epsilon = 1e-5);
        assert_abs_diff_eq!(ndc.y, 0.0, epsilon = 1e-5);
        assert!(ndc.z > 0.0 && ndc.z < 1.0);
        assert_abs_diff_eq!(camera.eye().distance(camera.center), 6.0, epsilon = 1e-5);
    }

    #[test]
    fn resize_tolerates_zero_height() {
        let mut camera = FollowCamera::new(60.0, 800, 600, 0.1, 60.0, 6.0);
        camera.resize(800, 0);
        assert_eq!(camera.aspect, 800.0);
    }
}
