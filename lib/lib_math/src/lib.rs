//! Math types shared by the platform layer.
//!
//! Vectors, matrices and quaternions come straight from `glam`. [`Rect`] and
//! [`Color`] are the value types every draw call is expressed in; both are
//! `#[repr(C)]` and plain-old-data so they can be copied into GPU buffers as-is.

mod color;
mod rect;
pub use color::*;
pub use rect::*;

pub use glam::{
    IVec2, Mat2, Mat3, Mat4, Quat, UVec2, Vec2, Vec3, Vec4, ivec2, mat2, mat3, mat4, quat, uvec2,
    vec2, vec3, vec4,
};
