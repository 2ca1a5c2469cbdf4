// Copyright (c) 2026 The renderstate contributors
// Licensed under the Apache License, Version 2.0
// <LICENSE-APACHE or
// https://www.apache.org/licenses/LICENSE-2.0> or the MIT
// license <LICENSE-MIT or https://opensource.org/licenses/MIT>,
// at your option. All files in the project carrying such
// notice may not be copied, modified, or distributed except
// according to those terms.

//! The groups of device parameters tracked by the cache, and sets of them.
//!
//! Each [`DirtyBit`] is applied with one primitive call. A [`DirtyBits`] set holds the pending
//! ones and always iterates them in application order.

use crate::macros::state_bitflags;

/// A group of device parameters that is always applied with a single primitive call.
///
/// The declaration order is the order in which dirty groups are applied.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum DirtyBit {
    // Blend
    /// Blending enabled.
    BlendEnabled,
    /// Blend constant color.
    BlendConstants,
    /// Blend factors and operations.
    BlendFuncsEquations,
    /// Alpha to coverage.
    SampleAlphaToCoverage,
    /// Color write mask.
    ColorMask,
    /// Dithering.
    Dither,
    /// Multisample mask.
    SampleMask,

    // Rasterizer
    /// Culled winding.
    CullMode,
    /// Depth bias.
    DepthBias,

    // Depth stencil
    /// Depth writes.
    DepthMask,
    /// Depth test enable and comparison.
    DepthFunc,
    /// Stencil test enable.
    StencilTestEnabled,
    /// Stencil comparison, reference and compare mask of the front face.
    StencilFuncsFront,
    /// Stencil comparison, reference and compare mask of the back face.
    StencilFuncsBack,
    /// Stencil write mask of the front face.
    StencilWriteMaskFront,
    /// Stencil write mask of the back face.
    StencilWriteMaskBack,
    /// Stencil operations of the front face.
    StencilOpsFront,
    /// Stencil operations of the back face.
    StencilOpsBack,
}

impl DirtyBit {
    /// Every dirty bit, in application order.
    pub const ALL: [DirtyBit; 18] = [
        DirtyBit::BlendEnabled,
        DirtyBit::BlendConstants,
        DirtyBit::BlendFuncsEquations,
        DirtyBit::SampleAlphaToCoverage,
        DirtyBit::ColorMask,
        DirtyBit::Dither,
        DirtyBit::SampleMask,
        DirtyBit::CullMode,
        DirtyBit::DepthBias,
        DirtyBit::DepthMask,
        DirtyBit::DepthFunc,
        DirtyBit::StencilTestEnabled,
        DirtyBit::StencilFuncsFront,
        DirtyBit::StencilFuncsBack,
        DirtyBit::StencilWriteMaskFront,
        DirtyBit::StencilWriteMaskBack,
        DirtyBit::StencilOpsFront,
        DirtyBit::StencilOpsBack,
    ];

    /// Returns the state group this bit belongs to.
    #[inline]
    pub const fn group(self) -> StateGroup {
        match self {
            DirtyBit::BlendEnabled
            | DirtyBit::BlendConstants
            | DirtyBit::BlendFuncsEquations
            | DirtyBit::SampleAlphaToCoverage
            | DirtyBit::ColorMask
            | DirtyBit::Dither
            | DirtyBit::SampleMask => StateGroup::Blend,
            DirtyBit::CullMode | DirtyBit::DepthBias => StateGroup::Raster,
            DirtyBit::DepthMask
            | DirtyBit::DepthFunc
            | DirtyBit::StencilTestEnabled
            | DirtyBit::StencilFuncsFront
            | DirtyBit::StencilFuncsBack
            | DirtyBit::StencilWriteMaskFront
            | DirtyBit::StencilWriteMaskBack
            | DirtyBit::StencilOpsFront
            | DirtyBit::StencilOpsBack => StateGroup::DepthStencil,
        }
    }

    #[inline]
    const fn mask(self) -> u32 {
        1 << self as u8
    }
}

/// The three independent groups of state tracked by the cache.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StateGroup {
    /// Blending, color mask, dithering and multisample coverage.
    Blend,
    /// Culling and depth bias.
    Raster,
    /// Depth and stencil tests.
    DepthStencil,
}

state_bitflags! {
    /// A set of [`DirtyBit`]s.
    DirtyBits impl {
        /// Every blend bit.
        pub const BLEND: Self = Self::of_group(StateGroup::Blend);

        /// Every rasterizer bit.
        pub const RASTER: Self = Self::of_group(StateGroup::Raster);

        /// Every depth/stencil bit.
        pub const DEPTH_STENCIL: Self = Self::of_group(StateGroup::DepthStencil);

        /// The bits whose value depends on which slot each stencil face maps to.
        pub const STENCIL_FACES: Self = Self::from_bits(&[
            DirtyBit::StencilFuncsFront,
            DirtyBit::StencilFuncsBack,
            DirtyBit::StencilWriteMaskFront,
            DirtyBit::StencilWriteMaskBack,
            DirtyBit::StencilOpsFront,
            DirtyBit::StencilOpsBack,
        ]);

        /// Returns the set of the given bits.
        pub const fn from_bits(bits: &[DirtyBit]) -> Self {
            let mut val = 0;
            let mut i = 0;

            while i < bits.len() {
                val |= bits[i].mask();
                i += 1;
            }

            Self(val)
        }

        /// Returns the set of every bit of `group`.
        pub const fn of_group(group: StateGroup) -> Self {
            let mut val = 0;
            let mut i = 0;

            while i < DirtyBit::ALL.len() {
                let bit = DirtyBit::ALL[i];

                if bit.group() as u8 == group as u8 {
                    val |= bit.mask();
                }

                i += 1;
            }

            Self(val)
        }

        /// Sets `bit`.
        #[inline]
        pub fn insert(&mut self, bit: DirtyBit) {
            self.0 |= bit.mask();
        }

        /// Clears `bit`.
        #[inline]
        pub fn remove(&mut self, bit: DirtyBit) {
            self.0 &= !bit.mask();
        }

        /// Clears every bit.
        #[inline]
        pub fn clear(&mut self) {
            self.0 = 0;
        }

        /// Iterates over the set bits in application order.
        #[inline]
        pub fn iter(self) -> impl Iterator<Item = DirtyBit> {
            DirtyBit::ALL
                .into_iter()
                .filter(move |&bit| self.contains(bit.into()))
        }
    }
    = u32;

    /// [`DirtyBit::BlendEnabled`].
    BLEND_ENABLED = 0,
    /// [`DirtyBit::BlendConstants`].
    BLEND_CONSTANTS = 1,
    /// [`DirtyBit::BlendFuncsEquations`].
    BLEND_FUNCS_EQUATIONS = 2,
    /// [`DirtyBit::SampleAlphaToCoverage`].
    SAMPLE_ALPHA_TO_COVERAGE = 3,
    /// [`DirtyBit::ColorMask`].
    COLOR_MASK = 4,
    /// [`DirtyBit::Dither`].
    DITHER = 5,
    /// [`DirtyBit::SampleMask`].
    SAMPLE_MASK = 6,
    /// [`DirtyBit::CullMode`].
    CULL_MODE = 7,
    /// [`DirtyBit::DepthBias`].
    DEPTH_BIAS = 8,
    /// [`DirtyBit::DepthMask`].
    DEPTH_MASK = 9,
    /// [`DirtyBit::DepthFunc`].
    DEPTH_FUNC = 10,
    /// [`DirtyBit::StencilTestEnabled`].
    STENCIL_TEST_ENABLED = 11,
    /// [`DirtyBit::StencilFuncsFront`].
    STENCIL_FUNCS_FRONT = 12,
    /// [`DirtyBit::StencilFuncsBack`].
    STENCIL_FUNCS_BACK = 13,
    /// [`DirtyBit::StencilWriteMaskFront`].
    STENCIL_WRITE_MASK_FRONT = 14,
    /// [`DirtyBit::StencilWriteMaskBack`].
    STENCIL_WRITE_MASK_BACK = 15,
    /// [`DirtyBit::StencilOpsFront`].
    STENCIL_OPS_FRONT = 16,
    /// [`DirtyBit::StencilOpsBack`].
    STENCIL_OPS_BACK = 17,
}

impl From<DirtyBit> for DirtyBits {
    #[inline]
    fn from(val: DirtyBit) -> Self {
        Self(val.mask())
    }
}

impl FromIterator<DirtyBit> for DirtyBits {
    fn from_iter<T: IntoIterator<Item = DirtyBit>>(iter: T) -> Self {
        let mut bits = DirtyBits::empty();

        for bit in iter {
            bits.insert(bit);
        }

        bits
    }
}

impl std::ops::BitOr<DirtyBit> for DirtyBits {
    type Output = Self;

    #[inline]
    fn bitor(self, rhs: DirtyBit) -> Self {
        self.union(rhs.into())
    }
}

impl std::ops::BitOrAssign<DirtyBit> for DirtyBits {
    #[inline]
    fn bitor_assign(&mut self, rhs: DirtyBit) {
        self.insert(rhs);
    }
}
