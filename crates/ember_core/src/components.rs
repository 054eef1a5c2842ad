//! # Shared Components
//!
//! Component types shared across subsystems. `Transform` is owned by the
//! rendering side of an application and merely borrowed (by component-type
//! handle) by physics; `Renderable` is the read-only descriptor the renderer
//! consumes alongside it.

use bytemuck::{Pod, Zeroable};

use crate::math::{Vec2, Vec3};

/// World-space placement of an entity.
///
/// The position field is the sole channel through which rendering observes
/// simulation results.
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
#[repr(C)]
pub struct Transform {
    /// Position in world space.
    pub position: Vec3,
    /// Euler rotation in radians.
    pub rotation: Vec3,
    /// Per-axis scale.
    pub scale: Vec3,
}

impl Transform {
    /// Identity transform: zero position/rotation, unit scale.
    #[inline]
    #[must_use]
    pub const fn identity() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Vec3::ZERO,
            scale: Vec3::ONE,
        }
    }

    /// Identity transform at the given position.
    #[inline]
    #[must_use]
    pub const fn at(position: Vec3) -> Self {
        Self {
            position,
            rotation: Vec3::ZERO,
            scale: Vec3::ONE,
        }
    }
}

/// An RGBA color.
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
#[repr(C)]
pub struct Color {
    /// Red channel (0.0 - 1.0).
    pub r: f32,
    /// Green channel (0.0 - 1.0).
    pub g: f32,
    /// Blue channel (0.0 - 1.0).
    pub b: f32,
    /// Alpha channel (0.0 - 1.0).
    pub a: f32,
}

impl Color {
    /// Opaque white.
    pub const WHITE: Self = Self::new(1.0, 1.0, 1.0, 1.0);

    /// Creates a color from channel values.
    #[inline]
    #[must_use]
    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }
}

/// Shape of a renderable entity.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[repr(u32)]
pub enum ShapeKind {
    /// A triangle.
    #[default]
    Triangle = 0,
    /// An axis-aligned quad.
    Quad = 1,
    /// A circle.
    Circle = 2,
}

impl ShapeKind {
    /// Converts from the stored discriminant.
    #[inline]
    #[must_use]
    pub const fn from_u32(value: u32) -> Self {
        match value {
            1 => Self::Quad,
            2 => Self::Circle,
            _ => Self::Triangle,
        }
    }
}

/// Descriptor consumed by the rendering pass.
///
/// Rendering is a pure read-only pass over `Transform` + this descriptor; the
/// simulation core never inspects it.
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
#[repr(C)]
pub struct Renderable {
    /// Shape discriminant; see [`Renderable::kind`].
    kind: u32,
    /// Fill color.
    pub color: Color,
    /// Non-zero when the entity should be drawn.
    pub visible: u32,
    /// Draw layer; higher layers draw on top.
    pub layer: u32,
    /// Shape extent: circle radius in x, quad width/height in x/y.
    pub extent: Vec2,
}

impl Renderable {
    /// Creates a visible circle descriptor.
    #[inline]
    #[must_use]
    pub const fn circle(radius: f32, color: Color) -> Self {
        Self {
            kind: ShapeKind::Circle as u32,
            color,
            visible: 1,
            layer: 0,
            extent: Vec2::new(radius, radius),
        }
    }

    /// The shape kind.
    #[inline]
    #[must_use]
    pub const fn kind(&self) -> ShapeKind {
        ShapeKind::from_u32(self.kind)
    }

    /// Sets the shape kind.
    #[inline]
    pub fn set_kind(&mut self, kind: ShapeKind) {
        self.kind = kind as u32;
    }
}
