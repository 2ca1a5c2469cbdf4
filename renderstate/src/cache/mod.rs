// Copyright (c) 2026 The renderstate contributors
// Licensed under the Apache License, Version 2.0
// <LICENSE-APACHE or
// https://www.apache.org/licenses/LICENSE-2.0> or the MIT
// license <LICENSE-MIT or https://opensource.org/licenses/MIT>,
// at your option. All files in the project carrying such
// notice may not be copied, modified, or distributed except
// according to those terms.

//! Keeps track of what was applied to a device, so that unchanged state is not applied again.
//!
//! The cache groups the device parameters into [`DirtyBit`]s, each of which is applied with a
//! single primitive call. When [`StateCache::sync_state`] is called, the changed fields of the
//! [`PipelineState`] are translated into dirty bits, and every dirty bit is then applied in
//! declaration order:
//!
//! 1. The final value is derived from the pipeline state and the cached framebuffer properties.
//! 2. It is compared with the value in the snapshot. If they are equal, nothing is done.
//! 3. Otherwise the primitive is called, and only if it succeeds are the snapshot updated and the
//!    bit cleared.
//!
//! If a primitive fails, the sync stops and returns the error. The failed bit and every bit after
//! it remain dirty, so calling `sync_state` again retries exactly what was not applied.
//!
//! # Forced resync
//!
//! After the device state was changed behind the cache's back, for example by executing foreign
//! commands, the snapshots no longer describe the device. [`StateCache::invalidate`] marks every
//! bit as dirty and *forced*: forced bits skip the comparison and are always applied. The
//! `force_set_*_state` methods do the same for one group and apply it immediately.

use self::{
    dirty::{DirtyBit, DirtyBits},
    snapshot::{BlendSnapshot, DepthStencilSnapshot, RasterSnapshot},
};
use crate::{
    device::{RenderDevice, StencilFace},
    pipeline::{PipelineChanges, PipelineState},
    DeviceError, NonExhaustive,
};
use log::{debug, warn};

mod blend;
mod depth_stencil;
pub mod dirty;
mod raster;
pub mod snapshot;

/// Synchronizes a [`PipelineState`] with a [`RenderDevice`], issuing only the primitive calls
/// whose value changed.
///
/// > **Important**: Changing the device state without going through the cache makes the cache
/// > out of date. When you do so, you need to call `invalidate()`.
#[derive(Debug)]
pub struct StateCache<D> {
    device: D,
    zero_color_mask_allowed: bool,

    blend: BlendSnapshot,
    raster: RasterSnapshot,
    depth_stencil: DepthStencilSnapshot,

    // Bit depths of the attachments of the bound framebuffer.
    depth_size: u32,
    stencil_size: u32,
    depth_stencil_initialized: bool,

    dirty: DirtyBits,
    // Subset of `dirty` whose next application skips the comparison.
    forced: DirtyBits,
}

impl<D> StateCache<D> {
    /// Builds a new `StateCache` for a device that is in its initial state.
    pub fn new(device: D, create_info: StateCacheCreateInfo) -> Self {
        let StateCacheCreateInfo {
            zero_color_mask_allowed,
            _ne: _,
        } = create_info;

        StateCache {
            device,
            zero_color_mask_allowed,
            blend: BlendSnapshot::default(),
            raster: RasterSnapshot::default(),
            depth_stencil: DepthStencilSnapshot::default(),
            depth_size: 0,
            stencil_size: 0,
            depth_stencil_initialized: false,
            dirty: DirtyBits::empty(),
            forced: DirtyBits::empty(),
        }
    }

    /// Returns the device.
    #[inline]
    pub fn device(&self) -> &D {
        &self.device
    }

    /// Returns the device.
    ///
    /// Any state set directly on the device must be followed by a call to `invalidate()`.
    #[inline]
    pub fn device_mut(&mut self) -> &mut D {
        &mut self.device
    }

    /// Destroys the cache and returns the device.
    #[inline]
    pub fn into_device(self) -> D {
        self.device
    }

    /// Returns the bits that are waiting to be applied.
    #[inline]
    pub fn dirty_bits(&self) -> DirtyBits {
        self.dirty
    }

    /// Returns the bits that will be applied without comparing with the snapshot.
    #[inline]
    pub fn forced_bits(&self) -> DirtyBits {
        self.forced
    }

    /// Returns the blend values last applied to the device.
    #[inline]
    pub fn blend_snapshot(&self) -> &BlendSnapshot {
        &self.blend
    }

    /// Returns the rasterizer values last applied to the device.
    #[inline]
    pub fn raster_snapshot(&self) -> &RasterSnapshot {
        &self.raster
    }

    /// Returns the depth and stencil values last applied to the device.
    #[inline]
    pub fn depth_stencil_snapshot(&self) -> &DepthStencilSnapshot {
        &self.depth_stencil
    }

    /// Returns the cached bit depth of the depth buffer.
    #[inline]
    pub fn depth_size(&self) -> u32 {
        self.depth_size
    }

    /// Returns the cached bit depth of the stencil buffer.
    #[inline]
    pub fn stencil_size(&self) -> u32 {
        self.stencil_size
    }

    /// Marks every bit as dirty and forced, without applying anything.
    ///
    /// The next `sync_state` re-applies the whole state. You **must** call this after the device
    /// state was modified without going through the cache.
    pub fn invalidate(&mut self) {
        debug!("state cache invalidated");

        self.dirty = DirtyBits::all();
        self.forced = DirtyBits::all();
    }

    /// Forgets every pending change, without applying anything.
    #[inline]
    pub fn reset_dirty_bits(&mut self) {
        self.dirty.clear();
        self.forced.clear();
    }

    /// Stores the bit depth of the depth buffer. If `initialized` is `false` or the depth
    /// differs from the cached one, the depth bias is marked dirty, since its constant factor is
    /// expressed in depth buffer units.
    pub fn update_depth_size_if_changed(&mut self, initialized: bool, depth_size: u32) {
        if !initialized || self.depth_size != depth_size {
            debug!("depth buffer size: {} -> {} bits", self.depth_size, depth_size);

            self.depth_size = depth_size;
            self.dirty.insert(DirtyBit::DepthBias);
        }
    }

    /// Stores the bit depth of the stencil buffer. If `initialized` is `false` or the depth
    /// differs from the cached one, every value that depends on it is marked dirty: the stencil
    /// test enable, and the clamped references and masks of both faces.
    pub fn update_stencil_size_if_changed(&mut self, initialized: bool, stencil_size: u32) {
        if !initialized || self.stencil_size != stencil_size {
            debug!(
                "stencil buffer size: {} -> {} bits",
                self.stencil_size, stencil_size,
            );

            self.stencil_size = stencil_size;
            self.dirty |= DirtyBits::from_bits(&[
                DirtyBit::StencilTestEnabled,
                DirtyBit::StencilFuncsFront,
                DirtyBit::StencilFuncsBack,
                DirtyBit::StencilWriteMaskFront,
                DirtyBit::StencilWriteMaskBack,
            ]);
        }
    }

    // Translates the changed fields of the pipeline state into dirty bits.
    fn mark_changes(&mut self, state: &PipelineState, changes: PipelineChanges) {
        // With the zero color mask workaround the color mask also drives blending.
        let color_mask_bits = if self.zero_color_mask_allowed {
            DirtyBits::from(DirtyBit::ColorMask)
        } else {
            DirtyBits::from_bits(&[
                DirtyBit::ColorMask,
                DirtyBit::BlendEnabled,
                DirtyBit::BlendFuncsEquations,
            ])
        };

        let mapping = [
            (
                PipelineChanges::BLEND_ENABLED,
                DirtyBits::from_bits(&[DirtyBit::BlendEnabled, DirtyBit::ColorMask]),
            ),
            (
                PipelineChanges::BLEND_FUNCS,
                DirtyBits::from_bits(&[DirtyBit::BlendFuncsEquations, DirtyBit::BlendConstants]),
            ),
            (
                PipelineChanges::BLEND_EQUATIONS,
                DirtyBit::BlendFuncsEquations.into(),
            ),
            (
                PipelineChanges::BLEND_CONSTANTS,
                DirtyBit::BlendConstants.into(),
            ),
            (PipelineChanges::COLOR_MASK, color_mask_bits),
            (PipelineChanges::DITHER_ENABLED, DirtyBit::Dither.into()),
            (
                PipelineChanges::SAMPLE_ALPHA_TO_COVERAGE_ENABLED,
                DirtyBit::SampleAlphaToCoverage.into(),
            ),
            (PipelineChanges::SAMPLE_COVERAGE, DirtyBit::SampleMask.into()),
            (PipelineChanges::SAMPLE_MASK, DirtyBit::SampleMask.into()),
            (PipelineChanges::CULL_FACE_ENABLED, DirtyBit::CullMode.into()),
            (PipelineChanges::CULL_FACE, DirtyBit::CullMode.into()),
            (
                PipelineChanges::FRONT_FACE,
                DirtyBits::STENCIL_FACES | DirtyBit::CullMode,
            ),
            (PipelineChanges::DEPTH_BIAS_ENABLED, DirtyBit::DepthBias.into()),
            (PipelineChanges::DEPTH_BIAS, DirtyBit::DepthBias.into()),
            (PipelineChanges::DEPTH_TEST_ENABLED, DirtyBit::DepthFunc.into()),
            (PipelineChanges::DEPTH_FUNC, DirtyBit::DepthFunc.into()),
            (PipelineChanges::DEPTH_MASK, DirtyBit::DepthMask.into()),
            (
                PipelineChanges::STENCIL_TEST_ENABLED,
                DirtyBit::StencilTestEnabled.into(),
            ),
            (
                PipelineChanges::STENCIL_FUNCS_FRONT,
                DirtyBit::StencilFuncsFront.into(),
            ),
            (
                PipelineChanges::STENCIL_FUNCS_BACK,
                DirtyBit::StencilFuncsBack.into(),
            ),
            (
                PipelineChanges::STENCIL_OPS_FRONT,
                DirtyBit::StencilOpsFront.into(),
            ),
            (
                PipelineChanges::STENCIL_OPS_BACK,
                DirtyBit::StencilOpsBack.into(),
            ),
            (
                PipelineChanges::STENCIL_WRITEMASK_FRONT,
                DirtyBit::StencilWriteMaskFront.into(),
            ),
            (
                PipelineChanges::STENCIL_WRITEMASK_BACK,
                DirtyBit::StencilWriteMaskBack.into(),
            ),
            (
                PipelineChanges::DRAW_FRAMEBUFFER,
                color_mask_bits | DirtyBit::SampleMask,
            ),
        ];

        for (change, bits) in mapping {
            if changes.intersects(change) {
                self.dirty |= bits;
            }
        }

        if changes.intersects(PipelineChanges::DRAW_FRAMEBUFFER) {
            let initialized = self.depth_stencil_initialized;
            self.update_depth_size_if_changed(initialized, state.framebuffer.depth_bits);
            self.update_stencil_size_if_changed(initialized, state.framebuffer.stencil_bits);
            self.depth_stencil_initialized = true;
        }
    }
}

impl<D> StateCache<D>
where
    D: RenderDevice,
{
    /// Applies the fields of `state` listed in `changes`, as well as everything still pending
    /// from previous calls.
    ///
    /// Returns the first error reported by the device. In that case the state that was not
    /// applied stays pending, and calling `sync_state` again with empty `changes` retries it.
    pub fn sync_state(
        &mut self,
        state: &PipelineState,
        changes: PipelineChanges,
    ) -> Result<(), DeviceError> {
        self.mark_changes(state, changes);
        self.apply(state, DirtyBits::all())
    }

    /// Applies every blend and multisample value of `state`, whether or not it matches the
    /// snapshot.
    pub fn force_set_blend_state(&mut self, state: &PipelineState) -> Result<(), DeviceError> {
        self.force_apply(state, DirtyBits::BLEND)
    }

    /// Applies every rasterizer value of `state`, whether or not it matches the snapshot.
    pub fn force_set_raster_state(&mut self, state: &PipelineState) -> Result<(), DeviceError> {
        self.force_apply(state, DirtyBits::RASTER)
    }

    /// Applies every depth and stencil value of `state`, whether or not it matches the snapshot.
    pub fn force_set_depth_stencil_state(
        &mut self,
        state: &PipelineState,
    ) -> Result<(), DeviceError> {
        self.force_apply(state, DirtyBits::DEPTH_STENCIL)
    }

    fn force_apply(&mut self, state: &PipelineState, group: DirtyBits) -> Result<(), DeviceError> {
        debug!("forcing resync of {:?}", group);

        self.dirty |= group;
        self.forced |= group;
        self.apply(state, group)
    }

    // Applies the dirty bits that are in `mask`, in order.
    fn apply(&mut self, state: &PipelineState, mask: DirtyBits) -> Result<(), DeviceError> {
        for bit in (self.dirty & mask).iter() {
            let force = self.forced.contains(bit.into());

            if let Err(err) = self.apply_bit(state, bit, force) {
                warn!(
                    "failed to apply {:?}, {:?} left pending: {}",
                    bit,
                    self.dirty & mask,
                    err,
                );
                return Err(err);
            }

            self.dirty.remove(bit);
            self.forced.remove(bit);
        }

        Ok(())
    }

    fn apply_bit(
        &mut self,
        state: &PipelineState,
        bit: DirtyBit,
        force: bool,
    ) -> Result<(), DeviceError> {
        use StencilFace::{Back, Front};

        match bit {
            DirtyBit::BlendEnabled => self.apply_blend_enabled(state, force),
            DirtyBit::BlendConstants => self.apply_blend_constants(state, force),
            DirtyBit::BlendFuncsEquations => self.apply_blend_funcs_equations(state, force),
            DirtyBit::SampleAlphaToCoverage => self.apply_alpha_to_coverage(state, force),
            DirtyBit::ColorMask => self.apply_color_mask(state, force),
            DirtyBit::Dither => self.apply_dither(state, force),
            DirtyBit::SampleMask => self.apply_sample_mask(state, force),
            DirtyBit::CullMode => self.apply_cull_mode(state, force),
            DirtyBit::DepthBias => self.apply_depth_bias(state, force),
            DirtyBit::DepthMask => self.apply_depth_mask(state, force),
            DirtyBit::DepthFunc => self.apply_depth_func(state, force),
            DirtyBit::StencilTestEnabled => self.apply_stencil_test_enabled(state, force),
            DirtyBit::StencilFuncsFront => self.apply_stencil_funcs(state, Front, force),
            DirtyBit::StencilFuncsBack => self.apply_stencil_funcs(state, Back, force),
            DirtyBit::StencilWriteMaskFront => self.apply_stencil_write_mask(state, Front, force),
            DirtyBit::StencilWriteMaskBack => self.apply_stencil_write_mask(state, Back, force),
            DirtyBit::StencilOpsFront => self.apply_stencil_ops(state, Front, force),
            DirtyBit::StencilOpsBack => self.apply_stencil_ops(state, Back, force),
        }
    }
}

/// Parameters to create a new `StateCache`.
#[derive(Clone, Debug)]
pub struct StateCacheCreateInfo {
    /// Whether the device accepts a color write mask with no channel at all.
    ///
    /// If `false`, an empty color mask is replaced by a mask that writes only the green channel,
    /// and blending is forced on with factors that leave the destination untouched.
    ///
    /// The default value is `true`.
    pub zero_color_mask_allowed: bool,

    /// Keeps the struct constructible only through `Default`, so fields can be added later.
    pub _ne: NonExhaustive,
}

impl Default for StateCacheCreateInfo {
    #[inline]
    fn default() -> Self {
        Self {
            zero_color_mask_allowed: true,
            _ne: NonExhaustive(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{
        dirty::{DirtyBit, DirtyBits},
        snapshot::Applied,
        StateCache, StateCacheCreateInfo,
    };
    use crate::{
        device::{CulledWinding, StencilSlot},
        pipeline::{
            color_blend::{AttachmentBlend, BlendFactor, ColorComponents},
            depth_stencil::{CompareOp, StencilOp, StencilOps},
            multisample::SampleCoverage,
            rasterization::{CullMode, DepthBias, FrontFace},
            PipelineChanges, PipelineState,
        },
        tests::{assert_calls, recording_cache, DeviceCall as Call, RecordingDevice},
        DeviceError,
    };

    const CW: StencilSlot = StencilSlot::Clockwise;
    const CCW: StencilSlot = StencilSlot::CounterClockwise;

    #[test]
    fn unchanged_state_issues_no_calls() {
        let mut cache = recording_cache!();
        let mut state = PipelineState::default();
        state.framebuffer.stencil_bits = 0;

        cache.sync_state(&state, PipelineChanges::all()).unwrap();
        assert_calls!(cache, []);
        assert!(cache.dirty_bits().is_empty());
    }

    #[test]
    fn blend_enable_without_alpha_channel() {
        let mut cache = recording_cache!();
        let mut state = PipelineState::default();
        let rgb = ColorComponents::R | ColorComponents::G | ColorComponents::B;
        state.color_blend.blend_enable = true;
        state.framebuffer.color_attachment = Some(rgb);

        cache
            .sync_state(&state, PipelineChanges::BLEND_ENABLED)
            .unwrap();
        assert_calls!(cache, [Call::BlendEnable(true), Call::ColorWriteMask(rgb)]);

        cache
            .sync_state(&state, PipelineChanges::BLEND_ENABLED)
            .unwrap();
        assert_calls!(cache, []);
    }

    #[test]
    fn every_changed_value_costs_one_call() {
        let mut cache = recording_cache!();
        let mut state = PipelineState::default();

        let color_blend = &mut state.color_blend;
        color_blend.blend_enable = true;
        color_blend.blend = AttachmentBlend::alpha();
        color_blend.blend_constants = [1.0; 4];
        color_blend.color_write_mask = ColorComponents::R;
        color_blend.dither_enable = false;

        state.multisample.alpha_to_coverage_enable = true;
        state.multisample.sample_mask = Some(0b1);

        state.rasterization.cull_face_enable = true;
        state.rasterization.depth_bias_enable = true;
        state.rasterization.depth_bias = DepthBias {
            constant_factor: 1.0,
            slope_factor: 1.0,
        };

        let depth_stencil = &mut state.depth_stencil;
        depth_stencil.depth_test_enable = true;
        depth_stencil.depth_write_enable = false;
        depth_stencil.stencil_test_enable = true;
        for face in [&mut depth_stencil.front, &mut depth_stencil.back] {
            face.compare_op = CompareOp::Equal;
            face.reference = 1;
            face.write_mask = 0x0f;
            face.ops.pass_op = StencilOp::Replace;
        }

        cache.sync_state(&state, PipelineChanges::all()).unwrap();

        let calls = cache.device_mut().take_calls();
        assert_eq!(calls.len(), DirtyBit::ALL.len());
        assert!(cache.dirty_bits().is_empty());
    }

    #[test]
    fn first_framebuffer_clamps_stencil_values() {
        let mut cache = recording_cache!();
        let mut state = PipelineState::default();
        state.depth_stencil.front.reference = 300;

        cache
            .sync_state(
                &state,
                PipelineChanges::DRAW_FRAMEBUFFER | PipelineChanges::STENCIL_FUNCS_FRONT,
            )
            .unwrap();
        assert_calls!(
            cache,
            [
                Call::StencilFunc(CCW, CompareOp::Always, 0xff, 0xff),
                Call::StencilFunc(CW, CompareOp::Always, 0, 0xff),
                Call::StencilWriteMask(CCW, 0xff),
                Call::StencilWriteMask(CW, 0xff),
            ]
        );
        assert_eq!(cache.depth_size(), 24);
        assert_eq!(cache.stencil_size(), 8);

        cache
            .sync_state(&state, PipelineChanges::DRAW_FRAMEBUFFER)
            .unwrap();
        assert_calls!(cache, []);
    }

    #[test]
    fn stencil_test_requires_stencil_buffer() {
        let mut cache = recording_cache!();
        let mut state = PipelineState::default();
        state.framebuffer.stencil_bits = 0;
        state.depth_stencil.stencil_test_enable = true;

        cache
            .sync_state(
                &state,
                PipelineChanges::STENCIL_TEST_ENABLED | PipelineChanges::DRAW_FRAMEBUFFER,
            )
            .unwrap();
        assert_calls!(cache, []);
        assert!(!cache.depth_stencil_snapshot().stencil_test_enable);

        state.framebuffer.stencil_bits = 8;
        cache
            .sync_state(&state, PipelineChanges::DRAW_FRAMEBUFFER)
            .unwrap();
        assert_calls!(
            cache,
            [
                Call::StencilTestEnable(true),
                Call::StencilFunc(CCW, CompareOp::Always, 0, 0xff),
                Call::StencilFunc(CW, CompareOp::Always, 0, 0xff),
                Call::StencilWriteMask(CCW, 0xff),
                Call::StencilWriteMask(CW, 0xff),
            ]
        );
    }

    #[test]
    fn front_face_round_trip_swaps_stencil_slots() {
        let mut cache = recording_cache!();
        let mut state = PipelineState::default();
        let replace = StencilOps {
            pass_op: StencilOp::Replace,
            ..StencilOps::default()
        };
        state.depth_stencil.front.ops = replace;

        cache
            .sync_state(&state, PipelineChanges::STENCIL_OPS_FRONT)
            .unwrap();
        assert_calls!(cache, [Call::StencilOps(CCW, replace)]);

        state.rasterization.front_face = FrontFace::Clockwise;
        cache
            .sync_state(&state, PipelineChanges::FRONT_FACE)
            .unwrap();
        assert_calls!(
            cache,
            [
                Call::StencilFunc(CW, CompareOp::Always, 0, u32::MAX),
                Call::StencilFunc(CCW, CompareOp::Always, 0, u32::MAX),
                Call::StencilWriteMask(CW, u32::MAX),
                Call::StencilWriteMask(CCW, u32::MAX),
                Call::StencilOps(CW, replace),
                Call::StencilOps(CCW, StencilOps::default()),
            ]
        );

        state.rasterization.front_face = FrontFace::CounterClockwise;
        cache
            .sync_state(&state, PipelineChanges::FRONT_FACE)
            .unwrap();
        assert_calls!(
            cache,
            [
                Call::StencilFunc(CCW, CompareOp::Always, 0, u32::MAX),
                Call::StencilFunc(CW, CompareOp::Always, 0, u32::MAX),
                Call::StencilWriteMask(CCW, u32::MAX),
                Call::StencilWriteMask(CW, u32::MAX),
                Call::StencilOps(CCW, replace),
                Call::StencilOps(CW, StencilOps::default()),
            ]
        );
        assert_eq!(
            cache.depth_stencil_snapshot().front.ops,
            Applied::new(CCW, replace)
        );

        cache
            .sync_state(&state, PipelineChanges::FRONT_FACE)
            .unwrap();
        assert_calls!(cache, []);
    }

    #[test]
    fn cull_mode_follows_front_face() {
        let mut cache = recording_cache!();
        let mut state = PipelineState::default();
        state.rasterization.cull_face_enable = true;

        cache
            .sync_state(&state, PipelineChanges::CULL_FACE_ENABLED)
            .unwrap();
        assert_calls!(cache, [Call::CullMode(CulledWinding::Clockwise)]);

        state.rasterization.front_face = FrontFace::Clockwise;
        cache
            .sync_state(&state, PipelineChanges::FRONT_FACE)
            .unwrap();
        let calls = cache.device_mut().take_calls();
        assert_eq!(calls[0], Call::CullMode(CulledWinding::CounterClockwise));
        assert_eq!(calls.len(), 7);

        state.rasterization.cull_mode = CullMode::FrontAndBack;
        cache
            .sync_state(&state, PipelineChanges::CULL_FACE)
            .unwrap();
        assert_calls!(cache, [Call::CullMode(CulledWinding::All)]);

        state.rasterization.cull_face_enable = false;
        cache
            .sync_state(&state, PipelineChanges::CULL_FACE_ENABLED)
            .unwrap();
        assert_calls!(cache, [Call::CullMode(CulledWinding::None)]);
    }

    #[test]
    fn invalidate_reapplies_everything() {
        let mut cache = recording_cache!();
        let state = PipelineState::default();

        cache.invalidate();
        assert_eq!(cache.dirty_bits(), DirtyBits::all());
        assert_eq!(cache.forced_bits(), DirtyBits::all());

        cache.sync_state(&state, PipelineChanges::empty()).unwrap();
        assert_calls!(
            cache,
            [
                Call::BlendEnable(false),
                Call::BlendConstants([0.0; 4]),
                Call::BlendFuncsEquations(AttachmentBlend::replace()),
                Call::AlphaToCoverageEnable(false),
                Call::ColorWriteMask(ColorComponents::all()),
                Call::DitherEnable(true),
                Call::SampleMask(u32::MAX),
                Call::CullMode(CulledWinding::None),
                Call::DepthBias(0.0, 0.0),
                Call::DepthWriteEnable(true),
                Call::DepthTest(false, CompareOp::Less),
                Call::StencilTestEnable(false),
                Call::StencilFunc(CCW, CompareOp::Always, 0, u32::MAX),
                Call::StencilFunc(CW, CompareOp::Always, 0, u32::MAX),
                Call::StencilWriteMask(CCW, u32::MAX),
                Call::StencilWriteMask(CW, u32::MAX),
                Call::StencilOps(CCW, StencilOps::default()),
                Call::StencilOps(CW, StencilOps::default()),
            ]
        );
        assert!(cache.forced_bits().is_empty());

        cache.sync_state(&state, PipelineChanges::empty()).unwrap();
        assert_calls!(cache, []);
    }

    #[test]
    fn force_set_applies_one_group() {
        let mut cache = recording_cache!();
        let state = PipelineState::default();
        cache.update_depth_size_if_changed(false, 24);

        cache.force_set_depth_stencil_state(&state).unwrap();
        assert_calls!(
            cache,
            [
                Call::DepthWriteEnable(true),
                Call::DepthTest(false, CompareOp::Less),
                Call::StencilTestEnable(false),
                Call::StencilFunc(CCW, CompareOp::Always, 0, u32::MAX),
                Call::StencilFunc(CW, CompareOp::Always, 0, u32::MAX),
                Call::StencilWriteMask(CCW, u32::MAX),
                Call::StencilWriteMask(CW, u32::MAX),
                Call::StencilOps(CCW, StencilOps::default()),
                Call::StencilOps(CW, StencilOps::default()),
            ]
        );
        assert_eq!(cache.dirty_bits(), DirtyBit::DepthBias.into());

        cache.force_set_blend_state(&state).unwrap();
        assert_calls!(
            cache,
            [
                Call::BlendEnable(false),
                Call::BlendConstants([0.0; 4]),
                Call::BlendFuncsEquations(AttachmentBlend::replace()),
                Call::AlphaToCoverageEnable(false),
                Call::ColorWriteMask(ColorComponents::all()),
                Call::DitherEnable(true),
                Call::SampleMask(u32::MAX),
            ]
        );

        cache.force_set_raster_state(&state).unwrap();
        assert_calls!(
            cache,
            [
                Call::CullMode(CulledWinding::None),
                Call::DepthBias(0.0, 0.0),
            ]
        );
        assert!(cache.dirty_bits().is_empty());
        assert!(cache.forced_bits().is_empty());
    }

    #[test]
    fn failed_call_leaves_the_rest_pending() {
        let mut cache = recording_cache!();
        let mut state = PipelineState::default();
        state.color_blend.blend_enable = true;
        state.depth_stencil.depth_write_enable = false;
        state.depth_stencil.front.compare_op = CompareOp::Equal;
        state.depth_stencil.back.ops.fail_op = StencilOp::Zero;

        cache
            .device_mut()
            .fail_when(|call| matches!(call, Call::StencilFunc(..)));

        let err = cache
            .sync_state(
                &state,
                PipelineChanges::BLEND_ENABLED
                    | PipelineChanges::DEPTH_MASK
                    | PipelineChanges::STENCIL_FUNCS_FRONT
                    | PipelineChanges::STENCIL_OPS_BACK,
            )
            .unwrap_err();
        assert!(matches!(err, DeviceError::Unsupported { .. }));
        assert_calls!(
            cache,
            [Call::BlendEnable(true), Call::DepthWriteEnable(false)]
        );
        assert_eq!(
            cache.dirty_bits(),
            DirtyBits::from_bits(&[DirtyBit::StencilFuncsFront, DirtyBit::StencilOpsBack]),
        );
        assert_eq!(
            cache.depth_stencil_snapshot().front.func.value.compare_op,
            CompareOp::Always,
        );

        cache.device_mut().stop_failing();
        cache.sync_state(&state, PipelineChanges::empty()).unwrap();
        assert_calls!(
            cache,
            [
                Call::StencilFunc(CCW, CompareOp::Equal, 0, u32::MAX),
                Call::StencilOps(
                    CW,
                    StencilOps {
                        fail_op: StencilOp::Zero,
                        ..StencilOps::default()
                    }
                ),
            ]
        );
        assert!(cache.dirty_bits().is_empty());
    }

    #[test]
    fn failed_forced_resync_stays_forced() {
        let mut cache = recording_cache!();
        let state = PipelineState::default();

        cache.invalidate();
        cache
            .device_mut()
            .fail_when(|call| matches!(call, Call::BlendConstants(_)));

        assert!(cache.sync_state(&state, PipelineChanges::empty()).is_err());
        assert_calls!(cache, [Call::BlendEnable(false)]);
        assert_eq!(
            cache.forced_bits(),
            DirtyBits::all() - DirtyBit::BlendEnabled.into(),
        );

        cache.device_mut().stop_failing();
        cache.sync_state(&state, PipelineChanges::empty()).unwrap();
        let calls = cache.device_mut().take_calls();
        assert_eq!(calls.len(), DirtyBit::ALL.len() - 1);
        assert_eq!(calls[0], Call::BlendConstants([0.0; 4]));
    }

    #[test]
    fn reset_dirty_bits_applies_nothing() {
        let mut cache = recording_cache!();
        let mut state = PipelineState::default();
        state.depth_stencil.depth_write_enable = false;

        cache.invalidate();
        cache.update_stencil_size_if_changed(false, 8);
        cache.reset_dirty_bits();
        assert!(cache.dirty_bits().is_empty());
        assert!(cache.forced_bits().is_empty());

        cache.sync_state(&state, PipelineChanges::empty()).unwrap();
        assert_calls!(cache, []);
        assert!(cache.depth_stencil_snapshot().depth_write_enable);
    }

    #[test]
    fn depth_size_rescales_bias() {
        let mut cache = recording_cache!();
        let mut state = PipelineState::default();
        state.framebuffer.stencil_bits = 0;
        state.framebuffer.depth_bits = 16;
        state.rasterization.depth_bias_enable = true;
        state.rasterization.depth_bias = DepthBias {
            constant_factor: 2.0,
            slope_factor: 1.5,
        };

        cache
            .sync_state(
                &state,
                PipelineChanges::DEPTH_BIAS_ENABLED
                    | PipelineChanges::DEPTH_BIAS
                    | PipelineChanges::DRAW_FRAMEBUFFER,
            )
            .unwrap();
        assert_calls!(cache, [Call::DepthBias(2.0 / 65536.0, 1.5)]);

        state.framebuffer.depth_bits = 24;
        cache
            .sync_state(&state, PipelineChanges::DRAW_FRAMEBUFFER)
            .unwrap();
        assert_calls!(cache, [Call::DepthBias(2.0 / 16_777_216.0, 1.5)]);

        cache
            .sync_state(&state, PipelineChanges::DRAW_FRAMEBUFFER)
            .unwrap();
        assert_calls!(cache, []);

        state.rasterization.depth_bias_enable = false;
        cache
            .sync_state(&state, PipelineChanges::DEPTH_BIAS_ENABLED)
            .unwrap();
        assert_calls!(cache, [Call::DepthBias(0.0, 0.0)]);
    }

    #[test]
    fn zero_color_mask_is_passed_through_when_allowed() {
        let mut cache = recording_cache!();
        let mut state = PipelineState::default();
        state.color_blend.color_write_mask = ColorComponents::empty();

        cache
            .sync_state(&state, PipelineChanges::COLOR_MASK)
            .unwrap();
        assert_calls!(cache, [Call::ColorWriteMask(ColorComponents::empty())]);
    }

    #[test]
    fn zero_color_mask_workaround() {
        let mut cache = recording_cache!(zero_color_mask_allowed: false);
        let mut state = PipelineState::default();
        state.framebuffer.stencil_bits = 0;
        state.color_blend.color_write_mask = ColorComponents::empty();

        let workaround = [
            Call::BlendEnable(true),
            Call::BlendFuncsEquations(AttachmentBlend::ignore_source()),
            Call::ColorWriteMask(ColorComponents::G),
        ];
        let restored = [
            Call::BlendEnable(false),
            Call::BlendFuncsEquations(AttachmentBlend::replace()),
            Call::ColorWriteMask(ColorComponents::all()),
        ];

        cache
            .sync_state(&state, PipelineChanges::COLOR_MASK)
            .unwrap();
        assert_eq!(cache.device_mut().take_calls(), workaround);

        state.color_blend.color_write_mask = ColorComponents::all();
        cache
            .sync_state(&state, PipelineChanges::COLOR_MASK)
            .unwrap();
        assert_eq!(cache.device_mut().take_calls(), restored);

        // A framebuffer without color attachment has nothing to write either.
        state.framebuffer.color_attachment = None;
        cache
            .sync_state(&state, PipelineChanges::DRAW_FRAMEBUFFER)
            .unwrap();
        assert_eq!(cache.device_mut().take_calls(), workaround);
    }

    #[test]
    fn constant_alpha_is_replicated() {
        let mut cache = recording_cache!();
        let mut state = PipelineState::default();
        state.color_blend.blend.src_color_blend_factor = BlendFactor::ConstantAlpha;
        state.color_blend.blend_constants = [0.1, 0.2, 0.3, 0.4];

        cache
            .sync_state(
                &state,
                PipelineChanges::BLEND_FUNCS | PipelineChanges::BLEND_CONSTANTS,
            )
            .unwrap();
        assert_calls!(
            cache,
            [
                Call::BlendConstants([0.4; 4]),
                Call::BlendFuncsEquations(state.color_blend.blend),
            ]
        );

        state.color_blend.blend.src_color_blend_factor = BlendFactor::ConstantColor;
        cache
            .sync_state(&state, PipelineChanges::BLEND_FUNCS)
            .unwrap();
        assert_calls!(
            cache,
            [
                Call::BlendConstants([0.1, 0.2, 0.3, 0.4]),
                Call::BlendFuncsEquations(state.color_blend.blend),
            ]
        );
    }

    #[test]
    fn nan_blend_constants_are_applied_once() {
        let mut cache = recording_cache!();
        let mut state = PipelineState::default();
        state.color_blend.blend_constants = [f32::NAN; 4];

        cache
            .sync_state(&state, PipelineChanges::BLEND_CONSTANTS)
            .unwrap();
        assert_eq!(cache.device_mut().take_calls().len(), 1);

        cache
            .sync_state(&state, PipelineChanges::BLEND_CONSTANTS)
            .unwrap();
        assert_calls!(cache, []);
    }

    #[test]
    fn sample_mask_from_coverage() {
        let mut cache = recording_cache!();
        let mut state = PipelineState::default();
        state.framebuffer.samples = 4;
        state.multisample.sample_coverage = Some(SampleCoverage {
            value: 0.5,
            invert: false,
        });

        cache
            .sync_state(&state, PipelineChanges::SAMPLE_COVERAGE)
            .unwrap();
        assert_calls!(cache, [Call::SampleMask(0b1010)]);

        state.multisample.sample_mask = Some(0b0110);
        cache
            .sync_state(&state, PipelineChanges::SAMPLE_MASK)
            .unwrap();
        assert_calls!(cache, [Call::SampleMask(0b0010)]);
    }

    #[test]
    fn sample_count_change_reapplies_sample_mask() {
        let mut cache = recording_cache!();
        let mut state = PipelineState::default();
        state.framebuffer.samples = 4;
        state.multisample.sample_coverage = Some(SampleCoverage {
            value: 0.5,
            invert: false,
        });

        cache
            .sync_state(
                &state,
                PipelineChanges::DRAW_FRAMEBUFFER | PipelineChanges::SAMPLE_COVERAGE,
            )
            .unwrap();
        assert!(cache
            .device_mut()
            .take_calls()
            .contains(&Call::SampleMask(0b1010)));

        state.framebuffer.samples = 8;
        cache
            .sync_state(&state, PipelineChanges::DRAW_FRAMEBUFFER)
            .unwrap();
        assert_calls!(cache, [Call::SampleMask(0b1010_1010)]);
    }

    #[test]
    fn smaller_stencil_buffer_reclamps_values() {
        let mut cache = recording_cache!();
        let mut state = PipelineState::default();
        state.depth_stencil.front.reference = 200;

        cache
            .sync_state(
                &state,
                PipelineChanges::DRAW_FRAMEBUFFER | PipelineChanges::STENCIL_FUNCS_FRONT,
            )
            .unwrap();
        assert_calls!(
            cache,
            [
                Call::StencilFunc(CCW, CompareOp::Always, 200, 0xff),
                Call::StencilFunc(CW, CompareOp::Always, 0, 0xff),
                Call::StencilWriteMask(CCW, 0xff),
                Call::StencilWriteMask(CW, 0xff),
            ]
        );

        state.framebuffer.stencil_bits = 4;
        cache
            .sync_state(&state, PipelineChanges::DRAW_FRAMEBUFFER)
            .unwrap();
        assert_calls!(
            cache,
            [
                Call::StencilFunc(CCW, CompareOp::Always, 15, 15),
                Call::StencilFunc(CW, CompareOp::Always, 0, 15),
                Call::StencilWriteMask(CCW, 15),
                Call::StencilWriteMask(CW, 15),
            ]
        );
        assert_eq!(cache.stencil_size(), 4);
    }

    #[test]
    fn depth_test_is_one_call() {
        let mut cache = recording_cache!();
        let mut state = PipelineState::default();
        state.depth_stencil.depth_test_enable = true;
        state.depth_stencil.depth_compare_op = CompareOp::GreaterOrEqual;

        cache
            .sync_state(
                &state,
                PipelineChanges::DEPTH_TEST_ENABLED | PipelineChanges::DEPTH_FUNC,
            )
            .unwrap();
        assert_calls!(cache, [Call::DepthTest(true, CompareOp::GreaterOrEqual)]);
    }

    #[test]
    fn borrowed_device() {
        let mut device = RecordingDevice::default();
        let mut state = PipelineState::default();
        state.color_blend.dither_enable = false;

        let mut cache = StateCache::new(&mut device, StateCacheCreateInfo::default());
        cache
            .sync_state(&state, PipelineChanges::DITHER_ENABLED)
            .unwrap();
        drop(cache);

        assert_eq!(device.take_calls(), [Call::DitherEnable(false)]);
    }
}
