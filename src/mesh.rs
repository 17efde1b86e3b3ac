use std::f32::consts::PI;

#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub color: [f32; 3],
}

impl Vertex {
    const ATTRIBUTES: [wgpu::VertexAttribute; 3] =
        wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x3, 2 => Float32x3];

    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBUTES,
        }
    }
}

/// Indexed triangle list, counter-clockwise when seen from outside.
#[derive(Clone, Debug, Default)]
pub struct Mesh {
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u16>,
}

impl Mesh {
    pub fn uv_sphere(radius: f32, stacks: u16, slices: u16, color: [f32; 3]) -> Mesh {
        let mut mesh = Mesh::default();
        for stack in 0..=stacks {
            let phi = PI * f32::from(stack) / f32::from(stacks);
            for slice in 0..=slices {
                let theta = 2.0 * PI * f32::from(slice) / f32::from(slices);
                let normal = [phi.sin() * theta.cos(), phi.cos(), phi.sin() * theta.sin()];
                mesh.vertices.push(Vertex {
                    position: normal.map(|c| c * radius),
                    normal,
                    color,
                });
            }
        }

        let row = slices + 1;
        for stack in 0..stacks {
            for slice in 0..slices {
                let a = stack * row + slice;
                let b = a + row;
                if stack != 0 {
                    mesh.indices.extend_from_slice(&[a, a + 1, b]);
                }
                if stack != stacks - 1 {
                    mesh.indices.extend_from_slice(&[a + 1, b + 1, b]);
                }
            }
        }
        mesh
    }

    /// Rocket pointing along +x: flat tail cap, cylindrical hull, conical nose.
    pub fn rocket(hull_color: [f32; 3], nose_color: [f32; 3]) -> Mesh {
        const RADIUS: f32 = 0.25;
        let profile = [(-1.0, 0.0), (-1.0, RADIUS), (0.4, RADIUS), (1.0, 0.0)];
        let colors = [hull_color, hull_color, nose_color];
        lathe(&profile, &colors, 24)
    }
}

/// Revolves a profile of `(x, radius)` points about the x axis. Each pair of
/// neighbouring points becomes a band with its own flat-shaded ring.
fn lathe(profile: &[(f32, f32)], colors: &[[f32; 3]], segments: u16) -> Mesh {
    let mut mesh = Mesh::default();
    for (band, pair) in profile.windows(2).enumerate() {
        let (x0, r0) = pair[0];
        let (x1, r1) = pair[1];
        let color = colors[band];

        // Outward normal of the band in the (x, radial) plane.
        let (dx, dr) = (x1 - x0, r1 - r0);
        let length = (dx * dx + dr * dr).sqrt();
        let (nx, nr) = (-dr / length, dx / length);

        let base = mesh.vertices.len() as u16;
        for (x, r) in [(x0, r0), (x1, r1)] {
            for segment in 0..=segments {
                let theta = 2.0 * PI * f32::from(segment) / f32::from(segments);
                let (sin, cos) = theta.sin_cos();
                mesh.vertices.push(Vertex {
                    position: [x, r * cos, r * sin],
                    normal: [nx, nr * cos, nr * sin],
                    color,
                });
            }
        }

        for segment in 0..segments {
            let a = base + segment;
            let b = a + segments + 1;
            if r0 > 0.0 {
                mesh.indices.extend_from_slice(&[a, a + 1, b]);
            }
            if r1 > 0.0 {
                mesh.indices.extend_from_slice(&[a + 1, b + 1, b]);
            }
        }
    }
    mesh
}
