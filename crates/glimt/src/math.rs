//! Math type re-exports.
//!
//! We re-export [glam](https://docs.rs/glam) types so users don't need to
//! depend on it directly. All matrices are column-major and the coordinate
//! system is right-handed with -Z as the forward axis.

pub use glam::{EulerRot, Mat2, Mat3, Mat4, Quat, Vec2, Vec3, Vec4};
