//! A free-fly camera for OpenGL-style renderers.
//!
//! [`camera::Camera`] turns directional move requests, look deltas and zoom deltas into a pose
//! and exposes it as view and projection matrices. The [`light`] module holds the attenuation
//! and color bookkeeping that shading code feeds alongside the camera matrices.

pub mod camera;
pub mod config;
pub mod input;
pub mod light;
pub mod math;
