//! Rigid-body spaceship simulation.
//!
//! [`rigid_body::RigidBody`] is the physics core: momentum-based integration
//! of one unconstrained body with quaternion orientation. The remaining
//! modules drive it from a winit/wgpu window.

pub mod camera;
pub mod config;
pub mod controls;
pub mod error;
pub mod force_actor;
pub mod frame_timer;
pub mod mesh;
pub mod rigid_body;
pub mod scene;
pub mod virtual_object;
pub mod wgpu_window;

pub use error::{Result, SimError};
pub use force_actor::ForceActor;
pub use rigid_body::{RigidBody, RigidBodyDesc, GRAVITY_DIRECTION};
