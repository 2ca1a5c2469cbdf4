// Copyright (c) 2026 The renderstate contributors
// Licensed under the Apache License, Version 2.0
// <LICENSE-APACHE or
// https://www.apache.org/licenses/LICENSE-2.0> or the MIT
// license <LICENSE-MIT or https://opensource.org/licenses/MIT>,
// at your option. All files in the project carrying such
// notice may not be copied, modified, or distributed except
// according to those terms.

//! Configures the operation of the depth and stencil tests.
//!
//! The depth test passes or fails depending on how the depth value of each fragment compares
//! to the existing depth value in the depth buffer at that fragment's location.
//!
//! The stencil test passes or fails depending on how a reference value compares to the existing
//! value in the stencil buffer at each fragment's location. Depending on the outcome of the
//! depth and stencil tests, the value of the stencil buffer at that location can be updated.
//! Front-facing and back-facing triangles have their own stencil parameters.

use crate::macros::vulkan_enum;

/// The state describing how the depth and stencil tests should behave.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DepthStencilState {
    /// Whether the depth test is performed.
    ///
    /// The default value is `false`.
    pub depth_test_enable: bool,

    /// Comparison operation to use between the depth value of each incoming fragment and the depth
    /// value currently in the depth buffer.
    ///
    /// The default value is [`CompareOp::Less`].
    pub depth_compare_op: CompareOp,

    /// Sets whether the value in the depth buffer will be updated when the depth test succeeds.
    ///
    /// The default value is `true`.
    pub depth_write_enable: bool,

    /// Whether the stencil test is performed. Without a stencil buffer the test is never
    /// performed.
    ///
    /// The default value is `false`.
    pub stencil_test_enable: bool,

    /// The stencil parameters for front-facing triangles.
    pub front: StencilOpState,

    /// The stencil parameters for back-facing triangles, lines and points.
    pub back: StencilOpState,
}

impl Default for DepthStencilState {
    #[inline]
    fn default() -> Self {
        Self {
            depth_test_enable: false,
            depth_compare_op: CompareOp::Less,
            depth_write_enable: true,
            stencil_test_enable: false,
            front: StencilOpState::default(),
            back: StencilOpState::default(),
        }
    }
}

/// Stencil parameters for one face.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StencilOpState {
    /// The stencil operations.
    pub ops: StencilOps,

    /// Comparison operation between the masked reference and the masked stored value.
    ///
    /// The default value is [`CompareOp::Always`].
    pub compare_op: CompareOp,

    /// A mask applied to both the reference and the stored value before comparing them.
    ///
    /// The default value is `u32::MAX`.
    pub compare_mask: u32,

    /// The bits of the stencil buffer that can be written.
    ///
    /// The default value is `u32::MAX`.
    pub write_mask: u32,

    /// The reference value used by the comparison and by [`StencilOp::Replace`].
    ///
    /// The default value is `0`.
    pub reference: u32,
}

impl Default for StencilOpState {
    #[inline]
    fn default() -> Self {
        Self {
            ops: StencilOps::default(),
            compare_op: CompareOp::Always,
            compare_mask: u32::MAX,
            write_mask: u32::MAX,
            reference: 0,
        }
    }
}

/// What to do with the stored stencil value depending on the outcome of the tests.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct StencilOps {
    /// The operation to perform when the stencil test failed.
    pub fail_op: StencilOp,

    /// The operation to perform when both the depth test and the stencil test passed.
    pub pass_op: StencilOp,

    /// The operation to perform when the stencil test passed but the depth test failed.
    pub depth_fail_op: StencilOp,
}

impl Default for StencilOps {
    #[inline]
    fn default() -> Self {
        Self {
            fail_op: StencilOp::Keep,
            pass_op: StencilOp::Keep,
            depth_fail_op: StencilOp::Keep,
        }
    }
}

vulkan_enum! {
    /// Operation to perform after the depth and stencil tests.
    StencilOp = StencilOp(i32);

    /// Keeps the stored value.
    Keep = KEEP,

    /// Sets the stored value to 0.
    Zero = ZERO,

    /// Sets the stored value to the reference.
    Replace = REPLACE,

    /// Increments the stored value, clamping at the maximum.
    IncrementAndClamp = INCREMENT_AND_CLAMP,

    /// Decrements the stored value, clamping at 0.
    DecrementAndClamp = DECREMENT_AND_CLAMP,

    /// Inverts the bits of the stored value.
    Invert = INVERT,

    /// Increments the stored value, wrapping to 0 past the maximum.
    IncrementAndWrap = INCREMENT_AND_WRAP,

    /// Decrements the stored value, wrapping to the maximum below 0.
    DecrementAndWrap = DECREMENT_AND_WRAP,
}

vulkan_enum! {
    /// Specifies how two values should be compared to decide whether a test passes or fails.
    ///
    /// Used for both depth testing and stencil testing.
    CompareOp = CompareOp(i32);

    /// The test never passes.
    Never = NEVER,

    /// The test passes if `value < reference_value`.
    Less = LESS,

    /// The test passes if `value == reference_value`.
    Equal = EQUAL,

    /// The test passes if `value <= reference_value`.
    LessOrEqual = LESS_OR_EQUAL,

    /// The test passes if `value > reference_value`.
    Greater = GREATER,

    /// The test passes if `value != reference_value`.
    NotEqual = NOT_EQUAL,

    /// The test passes if `value >= reference_value`.
    GreaterOrEqual = GREATER_OR_EQUAL,

    /// The test always passes.
    Always = ALWAYS,
}

/// Returns the largest value a stencil buffer of `stencil_bits` bits can hold, or `None` if there
/// is no stencil buffer.
#[inline]
pub fn max_stencil_value(stencil_bits: u32) -> Option<u32> {
    match stencil_bits {
        0 => None,
        bits if bits >= u32::BITS => Some(u32::MAX),
        bits => Some((1 << bits) - 1),
    }
}
