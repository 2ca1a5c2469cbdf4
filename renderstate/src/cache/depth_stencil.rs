// Copyright (c) 2026 The renderstate contributors
// Licensed under the Apache License, Version 2.0
// <LICENSE-APACHE or
// https://www.apache.org/licenses/LICENSE-2.0> or the MIT
// license <LICENSE-MIT or https://opensource.org/licenses/MIT>,
// at your option. All files in the project carrying such
// notice may not be copied, modified, or distributed except
// according to those terms.

use super::{
    snapshot::{Applied, StencilFaceSnapshot, StencilFunc},
    StateCache,
};
use crate::{
    device::{physical_slot, RenderDevice, StencilFace},
    pipeline::{
        depth_stencil::{max_stencil_value, StencilOpState},
        PipelineState,
    },
    DeviceError,
};
use log::trace;

impl<D> StateCache<D>
where
    D: RenderDevice,
{
    pub(super) fn apply_depth_mask(
        &mut self,
        state: &PipelineState,
        force: bool,
    ) -> Result<(), DeviceError> {
        let enable = state.depth_stencil.depth_write_enable;

        if force || self.depth_stencil.depth_write_enable != enable {
            trace!("set_depth_write_enable({})", enable);
            self.device.set_depth_write_enable(enable)?;
            self.depth_stencil.depth_write_enable = enable;
        }

        Ok(())
    }

    pub(super) fn apply_depth_func(
        &mut self,
        state: &PipelineState,
        force: bool,
    ) -> Result<(), DeviceError> {
        let enable = state.depth_stencil.depth_test_enable;
        let compare_op = state.depth_stencil.depth_compare_op;
        let snapshot = &self.depth_stencil;

        if force
            || snapshot.depth_test_enable != enable
            || snapshot.depth_compare_op != compare_op
        {
            trace!("set_depth_test({}, {:?})", enable, compare_op);
            self.device.set_depth_test(enable, compare_op)?;
            self.depth_stencil.depth_test_enable = enable;
            self.depth_stencil.depth_compare_op = compare_op;
        }

        Ok(())
    }

    pub(super) fn apply_stencil_test_enabled(
        &mut self,
        state: &PipelineState,
        force: bool,
    ) -> Result<(), DeviceError> {
        // Without a stencil buffer there is nothing to test against.
        let enable = state.depth_stencil.stencil_test_enable && self.stencil_size > 0;

        if force || self.depth_stencil.stencil_test_enable != enable {
            trace!("set_stencil_test_enable({})", enable);
            self.device.set_stencil_test_enable(enable)?;
            self.depth_stencil.stencil_test_enable = enable;
        }

        Ok(())
    }

    pub(super) fn apply_stencil_funcs(
        &mut self,
        state: &PipelineState,
        face: StencilFace,
        force: bool,
    ) -> Result<(), DeviceError> {
        let requested = stencil_op_state(state, face);
        let func = Applied::new(
            physical_slot(face, state.rasterization.front_face),
            StencilFunc {
                compare_op: requested.compare_op,
                reference: self.clamp_to_stencil(requested.reference),
                compare_mask: self.clamp_to_stencil(requested.compare_mask),
            },
        );

        if force || self.face_snapshot(face).func != func {
            trace!("set_stencil_func({:?}, {:?})", func.slot, func.value);
            self.device.set_stencil_func(
                func.slot,
                func.value.compare_op,
                func.value.reference,
                func.value.compare_mask,
            )?;
            self.face_snapshot_mut(face).func = func;
        }

        Ok(())
    }

    pub(super) fn apply_stencil_write_mask(
        &mut self,
        state: &PipelineState,
        face: StencilFace,
        force: bool,
    ) -> Result<(), DeviceError> {
        let requested = stencil_op_state(state, face);
        let write_mask = Applied::new(
            physical_slot(face, state.rasterization.front_face),
            self.clamp_to_stencil(requested.write_mask),
        );

        if force || self.face_snapshot(face).write_mask != write_mask {
            trace!(
                "set_stencil_write_mask({:?}, {:#x})",
                write_mask.slot,
                write_mask.value,
            );
            self.device
                .set_stencil_write_mask(write_mask.slot, write_mask.value)?;
            self.face_snapshot_mut(face).write_mask = write_mask;
        }

        Ok(())
    }

    pub(super) fn apply_stencil_ops(
        &mut self,
        state: &PipelineState,
        face: StencilFace,
        force: bool,
    ) -> Result<(), DeviceError> {
        let ops = Applied::new(
            physical_slot(face, state.rasterization.front_face),
            stencil_op_state(state, face).ops,
        );

        if force || self.face_snapshot(face).ops != ops {
            trace!("set_stencil_ops({:?}, {:?})", ops.slot, ops.value);
            self.device.set_stencil_ops(ops.slot, ops.value)?;
            self.face_snapshot_mut(face).ops = ops;
        }

        Ok(())
    }

    // References and masks have no meaning above the stencil buffer depth. Without a stencil
    // buffer, values are applied unchanged.
    fn clamp_to_stencil(&self, value: u32) -> u32 {
        match max_stencil_value(self.stencil_size) {
            Some(max) => value.min(max),
            None => value,
        }
    }

    fn face_snapshot(&self, face: StencilFace) -> &StencilFaceSnapshot {
        match face {
            StencilFace::Front => &self.depth_stencil.front,
            StencilFace::Back => &self.depth_stencil.back,
        }
    }

    fn face_snapshot_mut(&mut self, face: StencilFace) -> &mut StencilFaceSnapshot {
        match face {
            StencilFace::Front => &mut self.depth_stencil.front,
            StencilFace::Back => &mut self.depth_stencil.back,
        }
    }
}

fn stencil_op_state(state: &PipelineState, face: StencilFace) -> &StencilOpState {
    match face {
        StencilFace::Front => &state.depth_stencil.front,
        StencilFace::Back => &state.depth_stencil.back,
    }
}
