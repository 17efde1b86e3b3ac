use approx::assert_abs_diff_eq;
use cgmath::{Deg, InnerSpace, Point3, Quaternion, Rotation3, Vector3};
use rocket_science::config::ShipConfig;
use rocket_science::controls::{ShipAction, ShipControls};
use rocket_science::{ForceActor, RigidBody};

const FRAME: f32 = 1.0 / 60.0;

fn ship() -> RigidBody {
    ShipConfig::default().build_body()
}

#[test]
fn burn_then_coast_keeps_momentum() {
    let mut body = ship();
    let mut controls = ShipControls::new(10.0, 2.0, 1.0);

    controls.set(ShipAction::Thrust, true);
    for _ in 0..60 {
        controls.apply(&mut body);
        body.iterate(FRAME, 0.0);
    }
    // One second at 10 N on 1 kg.
    assert_abs_diff_eq!(body.velocity().x, 10.0, epsilon = 1e-3);

    controls.set(ShipAction::Thrust, false);
    let x = body.position().x;
    for _ in 0..60 {
        controls.apply(&mut body);
        body.iterate(FRAME, 0.0);
    }
    assert_abs_diff_eq!(body.velocity().x, 10.0, epsilon = 1e-3);
    assert_abs_diff_eq!(body.position().x - x, 10.0, epsilon = 1e-2);
}

#[test]
fn turn_then_burn_changes_heading() {
    let mut body = ship();
    let mut controls = ShipControls::new(10.0, 2.0, 1.0);

    controls.set(ShipAction::YawRight, true);
    for _ in 0..30 {
        controls.apply(&mut body);
        body.iterate(FRAME, 0.0);
    }
    controls.set(ShipAction::YawRight, false);
    let spin = body.angular_velocity();
    assert!(spin.y < 0.0);

    // Without torque the spin persists.
    for _ in 0..30 {
        controls.apply(&mut body);
        body.iterate(FRAME, 0.0);
    }
    assert_abs_diff_eq!(body.angular_velocity().y, spin.y, epsilon = 1e-4);

    controls.set(ShipAction::Thrust, true);
    controls.apply(&mut body);
    body.iterate(FRAME, 0.0);
    let heading = body.velocity().normalize();
    assert_abs_diff_eq!(heading.dot(body.forward()), 1.0, epsilon = 0.05);
    // Turned right of +x, which is towards +z.
    assert!(heading.z > 0.0);
    assert_abs_diff_eq!(body.rotation_quat().magnitude(), 1.0, epsilon = 1e-4);
}

#[test]
fn spinning_body_conserves_angular_momentum() {
    let mut body = ship();
    body.set_inertia_diagonal(Vector3::new(0.5, 1.0, 2.0));
    body.reset(Point3::new(0.0, 0.0, 0.0), Quaternion::from_angle_x(Deg(20.0)));
    body.add_force(ForceActor::new(Vector3::unit_x(), Vector3::new(0.0, 3.0, 1.0)));
    body.iterate(FRAME, 0.0);
    let momentum = body.angular_momentum();
    let initial_spin = body.angular_velocity();

    for _ in 0..600 {
        body.iterate(FRAME, 0.0);
        assert_abs_diff_eq!((body.angular_momentum() - momentum).magnitude(), 0.0, epsilon = 1e-5);
    }
    // The world-space spin changes with orientation for an asymmetric body.
    assert!((body.angular_velocity() - initial_spin).magnitude() > 1e-4);
}
