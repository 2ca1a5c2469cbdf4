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
    device::{culled_winding, RenderDevice},
    pipeline::PipelineState,
    DeviceError,
};
use log::trace;

impl<D> StateCache<D>
where
    D: RenderDevice,
{
    pub(super) fn apply_cull_mode(
        &mut self,
        state: &PipelineState,
        force: bool,
    ) -> Result<(), DeviceError> {
        let rasterization = &state.rasterization;
        let cull = culled_winding(
            rasterization.cull_face_enable,
            rasterization.cull_mode,
            rasterization.front_face,
        );

        if force || self.raster.culled_winding != cull {
            trace!("set_cull_mode({:?})", cull);
            self.device.set_cull_mode(cull)?;
            self.raster.culled_winding = cull;
        }

        Ok(())
    }

    pub(super) fn apply_depth_bias(
        &mut self,
        state: &PipelineState,
        force: bool,
    ) -> Result<(), DeviceError> {
        let rasterization = &state.rasterization;

        let (constant_factor, slope_factor) = if rasterization.depth_bias_enable {
            let bias = rasterization.depth_bias;
            let unit = depth_unit(self.depth_size);

            (bias.constant_factor * unit, bias.slope_factor)
        } else {
            (0.0, 0.0)
        };

        let applied = [
            self.raster.depth_bias_constant_factor,
            self.raster.depth_bias_slope_factor,
        ];

        if force || !same_bits(&applied, &[constant_factor, slope_factor]) {
            trace!("set_depth_bias({}, {})", constant_factor, slope_factor);
            self.device.set_depth_bias(constant_factor, slope_factor)?;
            self.raster.depth_bias_constant_factor = constant_factor;
            self.raster.depth_bias_slope_factor = slope_factor;
        }

        Ok(())
    }
}

/// The smallest difference a depth buffer of `depth_size` bits can represent, `2^-depth_size`.
fn depth_unit(depth_size: u32) -> f32 {
    let exponent = i32::try_from(depth_size).unwrap_or(i32::MAX);

    2f32.powi(-exponent)
}

#[cfg(test)]
mod tests {
    use super::depth_unit;

    #[test]
    fn depth_units() {
        assert_eq!(depth_unit(0), 1.0);
        assert_eq!(depth_unit(1), 0.5);
        assert_eq!(depth_unit(16), 1.0 / 65536.0);
        assert_eq!(depth_unit(24), 1.0 / 16_777_216.0);
    }
}
