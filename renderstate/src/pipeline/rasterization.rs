// Copyright (c) 2026 The renderstate contributors
// Licensed under the Apache License, Version 2.0
// <LICENSE-APACHE or
// https://www.apache.org/licenses/LICENSE-2.0> or the MIT
// license <LICENSE-MIT or https://opensource.org/licenses/MIT>,
// at your option. All files in the project carrying such
// notice may not be copied, modified, or distributed except
// according to those terms.

//! Face culling and depth bias.

use crate::macros::vulkan_enum;

/// The state describing how the rasterization stage should behave.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct RasterizationState {
    /// Whether faces are culled at all.
    ///
    /// The default value is `false`.
    pub cull_face_enable: bool,

    /// Specifies which faces are culled when `cull_face_enable` is `true`.
    ///
    /// The default value is [`CullMode::Back`].
    pub cull_mode: CullMode,

    /// Specifies which triangle orientation is considered to be the front of the triangle.
    ///
    /// The default value is [`FrontFace::CounterClockwise`].
    pub front_face: FrontFace,

    /// Whether the depth bias is added to the depth of each fragment.
    ///
    /// The default value is `false`.
    pub depth_bias_enable: bool,

    /// The depth bias parameters, used when `depth_bias_enable` is `true`.
    pub depth_bias: DepthBias,
}

/// The values to use for depth biasing.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct DepthBias {
    /// Specifies a constant factor to be added to every depth value, in units of the smallest
    /// difference the depth buffer can represent.
    ///
    /// The default value is `0.0`.
    pub constant_factor: f32,

    /// A scalar factor to multiply with a fragment's slope in depth bias calculations.
    ///
    /// The default value is `0.0`.
    pub slope_factor: f32,
}

vulkan_enum! {
    /// Specifies the culling mode.
    ///
    /// This setting works in pair with `front_face`. The `front_face` setting tells the GPU whether
    /// clockwise or counter-clockwise correspond to the front and the back of each triangle. Then
    /// `cull_mode` lets you specify whether front faces should be discarded, back faces should be
    /// discarded, or both.
    CullMode = CullModeFlags(u32);

    /// The faces facing the front of the screen (ie. facing the user) will be removed.
    Front = FRONT,

    /// The faces facing the back of the screen will be removed.
    Back = BACK,

    /// All faces will be removed.
    FrontAndBack = FRONT_AND_BACK,
}

impl Default for CullMode {
    #[inline]
    fn default() -> CullMode {
        CullMode::Back
    }
}

vulkan_enum! {
    /// Specifies which triangle orientation corresponds to the front or the triangle.
    FrontFace = FrontFace(i32);

    /// Triangles whose vertices are oriented counter-clockwise on the screen will be considered
    /// as facing their front. Otherwise they will be considered as facing their back.
    CounterClockwise = COUNTER_CLOCKWISE,

    /// Triangles whose vertices are oriented clockwise on the screen will be considered
    /// as facing their front. Otherwise they will be considered as facing their back.
    Clockwise = CLOCKWISE,
}

impl Default for FrontFace {
    #[inline]
    fn default() -> FrontFace {
        FrontFace::CounterClockwise
    }
}
