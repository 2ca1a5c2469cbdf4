// Copyright (c) 2026 The renderstate contributors
// Licensed under the Apache License, Version 2.0
// <LICENSE-APACHE or
// https://www.apache.org/licenses/LICENSE-2.0> or the MIT
// license <LICENSE-MIT or https://opensource.org/licenses/MIT>,
// at your option. All files in the project carrying such
// notice may not be copied, modified, or distributed except
// according to those terms.

use super::{snapshot::same_bits, StateCache};
use crate::{
    device::RenderDevice,
    pipeline::{
        color_blend::{AttachmentBlend, ColorComponents},
        PipelineState,
    },
    DeviceError,
};
use log::trace;

impl<D> StateCache<D>
where
    D: RenderDevice,
{
    pub(super) fn apply_blend_enabled(
        &mut self,
        state: &PipelineState,
        force: bool,
    ) -> Result<(), DeviceError> {
        let enable = state.color_blend.blend_enable || self.zero_color_mask_workaround(state);

        if force || self.blend.enable != enable {
            trace!("set_blend_enable({})", enable);
            self.device.set_blend_enable(enable)?;
            self.blend.enable = enable;
        }

        Ok(())
    }

    pub(super) fn apply_blend_constants(
        &mut self,
        state: &PipelineState,
        force: bool,
    ) -> Result<(), DeviceError> {
        let color_blend = &state.color_blend;

        // There is a single constant register, so the color factors see the alpha everywhere.
        let constants = if color_blend.blend.color_reads_constant_alpha() {
            [color_blend.blend_constants[3]; 4]
        } else {
            color_blend.blend_constants
        };

        if force || !same_bits(&self.blend.constants, &constants) {
            trace!("set_blend_constants({:?})", constants);
            self.device.set_blend_constants(constants)?;
            self.blend.constants = constants;
        }

        Ok(())
    }

    pub(super) fn apply_blend_funcs_equations(
        &mut self,
        state: &PipelineState,
        force: bool,
    ) -> Result<(), DeviceError> {
        let blend = if self.zero_color_mask_workaround(state) {
            AttachmentBlend::ignore_source()
        } else {
            state.color_blend.blend
        };

        if force || self.blend.blend != blend {
            trace!("set_blend_funcs_equations({:?})", blend);
            self.device.set_blend_funcs_equations(blend)?;
            self.blend.blend = blend;
        }

        Ok(())
    }

    pub(super) fn apply_alpha_to_coverage(
        &mut self,
        state: &PipelineState,
        force: bool,
    ) -> Result<(), DeviceError> {
        let enable = state.multisample.alpha_to_coverage_enable;

        if force || self.blend.alpha_to_coverage != enable {
            trace!("set_alpha_to_coverage_enable({})", enable);
            self.device.set_alpha_to_coverage_enable(enable)?;
            self.blend.alpha_to_coverage = enable;
        }

        Ok(())
    }

    pub(super) fn apply_color_mask(
        &mut self,
        state: &PipelineState,
        force: bool,
    ) -> Result<(), DeviceError> {
        let mask = if self.zero_color_mask_workaround(state) {
            ColorComponents::G
        } else {
            requested_color_mask(state)
        };

        if force || self.blend.color_write_mask != mask {
            trace!("set_color_write_mask({:?})", mask);
            self.device.set_color_write_mask(mask)?;
            self.blend.color_write_mask = mask;
        }

        Ok(())
    }

    pub(super) fn apply_dither(
        &mut self,
        state: &PipelineState,
        force: bool,
    ) -> Result<(), DeviceError> {
        let enable = state.color_blend.dither_enable;

        if force || self.blend.dither != enable {
            trace!("set_dither_enable({})", enable);
            self.device.set_dither_enable(enable)?;
            self.blend.dither = enable;
        }

        Ok(())
    }

    pub(super) fn apply_sample_mask(
        &mut self,
        state: &PipelineState,
        force: bool,
    ) -> Result<(), DeviceError> {
        let mask = state
            .multisample
            .effective_sample_mask(state.framebuffer.samples);

        if force || self.blend.sample_mask != mask {
            trace!("set_sample_mask({:#x})", mask);
            self.device.set_sample_mask(mask)?;
            self.blend.sample_mask = mask;
        }

        Ok(())
    }

    // Devices that reject an empty color mask write green instead, with a blend that keeps the
    // destination.
    fn zero_color_mask_workaround(&self, state: &PipelineState) -> bool {
        !self.zero_color_mask_allowed && requested_color_mask(state).is_empty()
    }
}

// The requested mask, restricted to the channels the color attachment has.
fn requested_color_mask(state: &PipelineState) -> ColorComponents {
    state.color_blend.color_write_mask & state.framebuffer.color_channels()
}
