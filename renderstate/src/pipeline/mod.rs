// Copyright (c) 2026 The renderstate contributors
// Licensed under the Apache License, Version 2.0
// <LICENSE-APACHE or
// https://www.apache.org/licenses/LICENSE-2.0> or the MIT
// license <LICENSE-MIT or https://opensource.org/licenses/MIT>,
// at your option. All files in the project carrying such
// notice may not be copied, modified, or distributed except
// according to those terms.

//! The high-level, declarative description of the fixed-function pipeline state.
//!
//! A [`PipelineState`] is owned by whoever owns the authoritative configuration. That owner also
//! keeps track of which top-level fields it modified since the last synchronization, and hands
//! both to [`StateCache::sync_state`](crate::cache::StateCache::sync_state) as a
//! [`PipelineChanges`] set.

use self::{
    color_blend::ColorBlendState, depth_stencil::DepthStencilState,
    multisample::MultisampleState, rasterization::RasterizationState,
};
use crate::{framebuffer::FramebufferState, macros::state_bitflags};

pub mod color_blend;
pub mod depth_stencil;
pub mod multisample;
pub mod rasterization;

/// The complete fixed-function state that the cache synchronizes with the device.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PipelineState {
    /// How the fragment color is combined with the color attachment.
    pub color_blend: ColorBlendState,

    /// Alpha to coverage and the sample coverage mask.
    pub multisample: MultisampleState,

    /// Face culling and depth bias.
    pub rasterization: RasterizationState,

    /// The depth and stencil tests.
    pub depth_stencil: DepthStencilState,

    /// The currently bound draw framebuffer.
    pub framebuffer: FramebufferState,
}

state_bitflags! {
    /// The top-level fields of a [`PipelineState`] that changed since the previous call to
    /// [`sync_state`](crate::cache::StateCache::sync_state).
    PipelineChanges = u32;

    /// [`ColorBlendState::blend_enable`].
    BLEND_ENABLED = 0,

    /// The blend factors of [`ColorBlendState::blend`].
    BLEND_FUNCS = 1,

    /// The blend operations of [`ColorBlendState::blend`].
    BLEND_EQUATIONS = 2,

    /// [`ColorBlendState::blend_constants`].
    BLEND_CONSTANTS = 3,

    /// [`ColorBlendState::color_write_mask`].
    COLOR_MASK = 4,

    /// [`ColorBlendState::dither_enable`].
    DITHER_ENABLED = 5,

    /// [`MultisampleState::alpha_to_coverage_enable`].
    SAMPLE_ALPHA_TO_COVERAGE_ENABLED = 6,

    /// [`MultisampleState::sample_coverage`].
    SAMPLE_COVERAGE = 7,

    /// [`MultisampleState::sample_mask`].
    SAMPLE_MASK = 8,

    /// [`RasterizationState::cull_face_enable`].
    CULL_FACE_ENABLED = 9,

    /// [`RasterizationState::cull_mode`].
    CULL_FACE = 10,

    /// [`RasterizationState::front_face`].
    FRONT_FACE = 11,

    /// [`RasterizationState::depth_bias_enable`].
    DEPTH_BIAS_ENABLED = 12,

    /// [`RasterizationState::depth_bias`].
    DEPTH_BIAS = 13,

    /// [`DepthStencilState::depth_test_enable`].
    DEPTH_TEST_ENABLED = 14,

    /// [`DepthStencilState::depth_compare_op`].
    DEPTH_FUNC = 15,

    /// [`DepthStencilState::depth_write_enable`].
    DEPTH_MASK = 16,

    /// [`DepthStencilState::stencil_test_enable`].
    STENCIL_TEST_ENABLED = 17,

    /// The compare op, reference and compare mask of [`DepthStencilState::front`].
    STENCIL_FUNCS_FRONT = 18,

    /// The compare op, reference and compare mask of [`DepthStencilState::back`].
    STENCIL_FUNCS_BACK = 19,

    /// The stencil operations of [`DepthStencilState::front`].
    STENCIL_OPS_FRONT = 20,

    /// The stencil operations of [`DepthStencilState::back`].
    STENCIL_OPS_BACK = 21,

    /// The write mask of [`DepthStencilState::front`].
    STENCIL_WRITEMASK_FRONT = 22,

    /// The write mask of [`DepthStencilState::back`].
    STENCIL_WRITEMASK_BACK = 23,

    /// [`PipelineState::framebuffer`]: a different framebuffer was bound, or the attachments of
    /// the bound one changed.
    DRAW_FRAMEBUFFER = 24,
}
