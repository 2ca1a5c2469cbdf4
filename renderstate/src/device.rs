// Copyright (c) 2026 The renderstate contributors
// Licensed under the Apache License, Version 2.0
// <LICENSE-APACHE or
// https://www.apache.org/licenses/LICENSE-2.0> or the MIT
// license <LICENSE-MIT or https://opensource.org/licenses/MIT>,
// at your option. All files in the project carrying such
// notice may not be copied, modified, or distributed except
// according to those terms.

//! The low-level device driven by the cache.
//!
//! A [`RenderDevice`] is write-only: it exposes one primitive "set" operation per group of
//! render parameters that are always applied together, each taking final values. High-level
//! concepts such as "front face" or "cull mode" do not cross this boundary; they are resolved by
//! the cache into what the device natively understands.
//!
//! # Stencil face slots
//!
//! Many devices do not have a notion of front-facing and back-facing stencil parameters.
//! Instead they have one parameter set for triangles wound clockwise on screen and one for
//! triangles wound counter-clockwise, see [`StencilSlot`]. Which logical face ends up in which
//! slot depends on the current front face winding, and is computed by [`physical_slot`].

use crate::{
    pipeline::{
        color_blend::{AttachmentBlend, ColorComponents},
        depth_stencil::{CompareOp, StencilOps},
        rasterization::{CullMode, FrontFace},
    },
    DeviceError,
};

/// The primitive operations of a stateful, write-only graphics device.
///
/// Every method returns an error if the device failed to apply the value, in which case the
/// device state for that parameter group is unspecified. Devices report configurations they
/// cannot represent with [`DeviceError::Unsupported`].
pub trait RenderDevice {
    /// Enables or disables blending.
    fn set_blend_enable(&mut self, enable: bool) -> Result<(), DeviceError>;

    /// Sets the blend constant color register.
    fn set_blend_constants(&mut self, constants: [f32; 4]) -> Result<(), DeviceError>;

    /// Sets the color and alpha blend factors and operations.
    fn set_blend_funcs_equations(&mut self, blend: AttachmentBlend) -> Result<(), DeviceError>;

    /// Enables or disables alpha to coverage.
    fn set_alpha_to_coverage_enable(&mut self, enable: bool) -> Result<(), DeviceError>;

    /// Sets which color channels are written.
    fn set_color_write_mask(&mut self, mask: ColorComponents) -> Result<(), DeviceError>;

    /// Enables or disables dithering.
    fn set_dither_enable(&mut self, enable: bool) -> Result<(), DeviceError>;

    /// Sets the multisample mask.
    fn set_sample_mask(&mut self, mask: u32) -> Result<(), DeviceError>;

    /// Sets which triangle winding is discarded.
    fn set_cull_mode(&mut self, cull: CulledWinding) -> Result<(), DeviceError>;

    /// Sets the depth bias. `constant_factor` is already expressed in the units of the attached
    /// depth buffer.
    fn set_depth_bias(&mut self, constant_factor: f32, slope_factor: f32)
    -> Result<(), DeviceError>;

    /// Enables or disables depth writes.
    fn set_depth_write_enable(&mut self, enable: bool) -> Result<(), DeviceError>;

    /// Enables or disables the depth test, and sets its comparison.
    fn set_depth_test(&mut self, enable: bool, compare_op: CompareOp) -> Result<(), DeviceError>;

    /// Enables or disables the stencil test.
    fn set_stencil_test_enable(&mut self, enable: bool) -> Result<(), DeviceError>;

    /// Sets the stencil comparison, reference and compare mask of a slot.
    fn set_stencil_func(
        &mut self,
        slot: StencilSlot,
        compare_op: CompareOp,
        reference: u32,
        compare_mask: u32,
    ) -> Result<(), DeviceError>;

    /// Sets the stencil write mask of a slot.
    fn set_stencil_write_mask(&mut self, slot: StencilSlot, write_mask: u32)
    -> Result<(), DeviceError>;

    /// Sets the stencil operations of a slot.
    fn set_stencil_ops(&mut self, slot: StencilSlot, ops: StencilOps) -> Result<(), DeviceError>;
}

impl<D> RenderDevice for &mut D
where
    D: RenderDevice + ?Sized,
{
    #[inline]
    fn set_blend_enable(&mut self, enable: bool) -> Result<(), DeviceError> {
        (**self).set_blend_enable(enable)
    }

    #[inline]
    fn set_blend_constants(&mut self, constants: [f32; 4]) -> Result<(), DeviceError> {
        (**self).set_blend_constants(constants)
    }

    #[inline]
    fn set_blend_funcs_equations(&mut self, blend: AttachmentBlend) -> Result<(), DeviceError> {
        (**self).set_blend_funcs_equations(blend)
    }

    #[inline]
    fn set_alpha_to_coverage_enable(&mut self, enable: bool) -> Result<(), DeviceError> {
        (**self).set_alpha_to_coverage_enable(enable)
    }

    #[inline]
    fn set_color_write_mask(&mut self, mask: ColorComponents) -> Result<(), DeviceError> {
        (**self).set_color_write_mask(mask)
    }

    #[inline]
    fn set_dither_enable(&mut self, enable: bool) -> Result<(), DeviceError> {
        (**self).set_dither_enable(enable)
    }

    #[inline]
    fn set_sample_mask(&mut self, mask: u32) -> Result<(), DeviceError> {
        (**self).set_sample_mask(mask)
    }

    #[inline]
    fn set_cull_mode(&mut self, cull: CulledWinding) -> Result<(), DeviceError> {
        (**self).set_cull_mode(cull)
    }

    #[inline]
    fn set_depth_bias(
        &mut self,
        constant_factor: f32,
        slope_factor: f32,
    ) -> Result<(), DeviceError> {
        (**self).set_depth_bias(constant_factor, slope_factor)
    }

    #[inline]
    fn set_depth_write_enable(&mut self, enable: bool) -> Result<(), DeviceError> {
        (**self).set_depth_write_enable(enable)
    }

    #[inline]
    fn set_depth_test(&mut self, enable: bool, compare_op: CompareOp) -> Result<(), DeviceError> {
        (**self).set_depth_test(enable, compare_op)
    }

    #[inline]
    fn set_stencil_test_enable(&mut self, enable: bool) -> Result<(), DeviceError> {
        (**self).set_stencil_test_enable(enable)
    }

    #[inline]
    fn set_stencil_func(
        &mut self,
        slot: StencilSlot,
        compare_op: CompareOp,
        reference: u32,
        compare_mask: u32,
    ) -> Result<(), DeviceError> {
        (**self).set_stencil_func(slot, compare_op, reference, compare_mask)
    }

    #[inline]
    fn set_stencil_write_mask(
        &mut self,
        slot: StencilSlot,
        write_mask: u32,
    ) -> Result<(), DeviceError> {
        (**self).set_stencil_write_mask(slot, write_mask)
    }

    #[inline]
    fn set_stencil_ops(&mut self, slot: StencilSlot, ops: StencilOps) -> Result<(), DeviceError> {
        (**self).set_stencil_ops(slot, ops)
    }
}

/// A logical stencil face, as seen by the high-level state.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StencilFace {
    /// Front-facing triangles.
    Front,

    /// Back-facing triangles.
    Back,
}

/// A physical stencil parameter slot of the device.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StencilSlot {
    /// Parameters used for triangles wound clockwise on screen.
    Clockwise,

    /// Parameters used for triangles wound counter-clockwise on screen.
    CounterClockwise,
}

impl StencilSlot {
    /// Returns the other slot.
    #[inline]
    pub fn opposite(self) -> Self {
        match self {
            StencilSlot::Clockwise => StencilSlot::CounterClockwise,
            StencilSlot::CounterClockwise => StencilSlot::Clockwise,
        }
    }
}

/// Returns the physical slot that receives the stencil parameters of `face` when triangles
/// wound as `front_face` are front-facing.
#[inline]
pub fn physical_slot(face: StencilFace, front_face: FrontFace) -> StencilSlot {
    let front_slot = match front_face {
        FrontFace::Clockwise => StencilSlot::Clockwise,
        FrontFace::CounterClockwise => StencilSlot::CounterClockwise,
    };

    match face {
        StencilFace::Front => front_slot,
        StencilFace::Back => front_slot.opposite(),
    }
}

/// The triangle winding discarded by the rasterizer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CulledWinding {
    /// Nothing is culled.
    None,

    /// Triangles wound clockwise on screen are culled.
    Clockwise,

    /// Triangles wound counter-clockwise on screen are culled.
    CounterClockwise,

    /// All triangles are culled.
    All,
}

/// Combines the culling state into the single winding the device should cull.
#[inline]
pub fn culled_winding(
    cull_face_enable: bool,
    cull_mode: CullMode,
    front_face: FrontFace,
) -> CulledWinding {
    if !cull_face_enable {
        return CulledWinding::None;
    }

    let face = match cull_mode {
        CullMode::Front => StencilFace::Front,
        CullMode::Back => StencilFace::Back,
        CullMode::FrontAndBack => return CulledWinding::All,
    };

    match physical_slot(face, front_face) {
        StencilSlot::Clockwise => CulledWinding::Clockwise,
        StencilSlot::CounterClockwise => CulledWinding::CounterClockwise,
    }
}

#[cfg(test)]
mod tests {
    use super::{culled_winding, physical_slot, CulledWinding, StencilFace, StencilSlot};
    use crate::pipeline::rasterization::{CullMode, FrontFace};

    #[test]
    fn slots_follow_front_face() {
        assert_eq!(
            physical_slot(StencilFace::Front, FrontFace::CounterClockwise),
            StencilSlot::CounterClockwise
        );
        assert_eq!(
            physical_slot(StencilFace::Back, FrontFace::CounterClockwise),
            StencilSlot::Clockwise
        );
        assert_eq!(
            physical_slot(StencilFace::Front, FrontFace::Clockwise),
            StencilSlot::Clockwise
        );
        assert_eq!(
            physical_slot(StencilFace::Back, FrontFace::Clockwise),
            StencilSlot::CounterClockwise
        );
    }

    #[test]
    fn faces_never_share_a_slot() {
        for front_face in [FrontFace::Clockwise, FrontFace::CounterClockwise] {
            assert_ne!(
                physical_slot(StencilFace::Front, front_face),
                physical_slot(StencilFace::Back, front_face)
            );
        }
    }

    #[test]
    fn culled_windings() {
        assert_eq!(
            culled_winding(false, CullMode::FrontAndBack, FrontFace::Clockwise),
            CulledWinding::None
        );
        assert_eq!(
            culled_winding(true, CullMode::Back, FrontFace::CounterClockwise),
            CulledWinding::Clockwise
        );
        assert_eq!(
            culled_winding(true, CullMode::Back, FrontFace::Clockwise),
            CulledWinding::CounterClockwise
        );
        assert_eq!(
            culled_winding(true, CullMode::Front, FrontFace::CounterClockwise),
            CulledWinding::CounterClockwise
        );
        assert_eq!(
            culled_winding(true, CullMode::FrontAndBack, FrontFace::CounterClockwise),
            CulledWinding::All
        );
    }
}
