// Copyright (c) 2026 The renderstate contributors
// Licensed under the Apache License, Version 2.0
// <LICENSE-APACHE or
// https://www.apache.org/licenses/LICENSE-2.0> or the MIT
// license <LICENSE-MIT or https://opensource.org/licenses/MIT>,
// at your option. All files in the project carrying such
// notice may not be copied, modified, or distributed except
// according to those terms.

//! The values last applied to the device.
//!
//! Every field holds the *derived* value that was passed to a primitive of the
//! [`RenderDevice`](crate::device::RenderDevice), not the high-level value it came from. The
//! default of each snapshot is the state of a freshly created device.

use crate::{
    device::{CulledWinding, StencilSlot},
    pipeline::{
        color_blend::{AttachmentBlend, ColorComponents},
        depth_stencil::{CompareOp, StencilOps},
    },
};

/// Blend and multisample values last applied to the device.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BlendSnapshot {
    /// Argument of the last `set_blend_enable`.
    pub enable: bool,

    /// Argument of the last `set_blend_constants`.
    pub constants: [f32; 4],

    /// Argument of the last `set_blend_funcs_equations`.
    pub blend: AttachmentBlend,

    /// Argument of the last `set_alpha_to_coverage_enable`.
    pub alpha_to_coverage: bool,

    /// Argument of the last `set_color_write_mask`.
    pub color_write_mask: ColorComponents,

    /// Argument of the last `set_dither_enable`.
    pub dither: bool,

    /// Argument of the last `set_sample_mask`.
    pub sample_mask: u32,
}

impl Default for BlendSnapshot {
    #[inline]
    fn default() -> Self {
        Self {
            enable: false,
            constants: [0.0; 4],
            blend: AttachmentBlend::replace(),
            alpha_to_coverage: false,
            color_write_mask: ColorComponents::all(),
            dither: true,
            sample_mask: u32::MAX,
        }
    }
}

/// Rasterizer values last applied to the device.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RasterSnapshot {
    /// Argument of the last `set_cull_mode`.
    pub culled_winding: CulledWinding,

    /// Constant factor of the last `set_depth_bias`, in depth buffer units.
    pub depth_bias_constant_factor: f32,

    /// Slope factor of the last `set_depth_bias`.
    pub depth_bias_slope_factor: f32,
}

impl Default for RasterSnapshot {
    #[inline]
    fn default() -> Self {
        Self {
            culled_winding: CulledWinding::None,
            depth_bias_constant_factor: 0.0,
            depth_bias_slope_factor: 0.0,
        }
    }
}

/// Depth and stencil values last applied to the device.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DepthStencilSnapshot {
    /// Enable argument of the last `set_depth_test`.
    pub depth_test_enable: bool,

    /// Comparison argument of the last `set_depth_test`.
    pub depth_compare_op: CompareOp,

    /// Argument of the last `set_depth_write_enable`.
    pub depth_write_enable: bool,

    /// Argument of the last `set_stencil_test_enable`.
    pub stencil_test_enable: bool,

    /// What was applied for the front face.
    pub front: StencilFaceSnapshot,

    /// What was applied for the back face.
    pub back: StencilFaceSnapshot,
}

impl Default for DepthStencilSnapshot {
    #[inline]
    fn default() -> Self {
        Self {
            depth_test_enable: false,
            depth_compare_op: CompareOp::Less,
            depth_write_enable: true,
            stencil_test_enable: false,
            front: StencilFaceSnapshot::new(StencilSlot::CounterClockwise),
            back: StencilFaceSnapshot::new(StencilSlot::Clockwise),
        }
    }
}

/// The stencil values applied for one logical face, each with the slot that received it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StencilFaceSnapshot {
    /// Arguments of the last `set_stencil_func` for this face.
    pub func: Applied<StencilFunc>,

    /// Argument of the last `set_stencil_write_mask` for this face.
    pub write_mask: Applied<u32>,

    /// Argument of the last `set_stencil_ops` for this face.
    pub ops: Applied<StencilOps>,
}

impl StencilFaceSnapshot {
    fn new(slot: StencilSlot) -> Self {
        Self {
            func: Applied::new(slot, StencilFunc::default()),
            write_mask: Applied::new(slot, u32::MAX),
            ops: Applied::new(slot, StencilOps::default()),
        }
    }
}

/// A value together with the physical stencil slot it was applied to.
///
/// Two `Applied` values are only equal if both the value and the slot match, so a value that
/// moves to the other slot after a front face change is never considered up to date.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Applied<T> {
    /// The slot that received the value.
    pub slot: StencilSlot,

    /// The value.
    pub value: T,
}

impl<T> Applied<T> {
    /// Pairs `value` with `slot`.
    #[inline]
    pub fn new(slot: StencilSlot, value: T) -> Self {
        Self { slot, value }
    }
}

/// The arguments of `set_stencil_func`, after clamping to the stencil buffer depth.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct StencilFunc {
    /// The comparison.
    pub compare_op: CompareOp,

    /// The reference value.
    pub reference: u32,

    /// The compare mask.
    pub compare_mask: u32,
}

impl Default for StencilFunc {
    #[inline]
    fn default() -> Self {
        Self {
            compare_op: CompareOp::Always,
            reference: 0,
            compare_mask: u32::MAX,
        }
    }
}

/// Compares floats by their bit pattern, so that re-applying `NaN` is a no-op.
#[inline]
pub(super) fn same_bits(a: &[f32], b: &[f32]) -> bool {
    a.len() == b.len() && a.iter().zip(b).all(|(a, b)| a.to_bits() == b.to_bits())
}
