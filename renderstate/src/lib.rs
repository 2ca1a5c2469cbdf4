// Copyright (c) 2026 The renderstate contributors
// Licensed under the Apache License, Version 2.0
// <LICENSE-APACHE or
// https://www.apache.org/licenses/LICENSE-2.0> or the MIT
// license <LICENSE-MIT or https://opensource.org/licenses/MIT>,
// at your option. All files in the project carrying such
// notice may not be copied, modified, or distributed except
// according to those terms.

//! Dirty-tracked render state cache for write-only graphics devices.
//!
//! # Brief summary
//!
//! - A [`PipelineState`](crate::pipeline::PipelineState) is the authoritative, high-level
//!   description of the fixed-function state: blending, multisample coverage, rasterization and
//!   the depth/stencil tests, together with a description of the bound
//!   [framebuffer](crate::framebuffer::FramebufferState). It is owned by the caller.
//!
//! - A [`RenderDevice`](crate::device::RenderDevice) is the low-level device. It only exposes
//!   primitive "set" operations that take final values, and its state can never be queried
//!   back.
//!
//! - A [`StateCache`](crate::cache::StateCache) sits between the two. It remembers what was last
//!   applied to the device and, every time [`sync_state`](crate::cache::StateCache::sync_state)
//!   is called with the set of [`PipelineChanges`](crate::pipeline::PipelineChanges) since the
//!   previous call, issues only the primitive calls whose derived value actually differs.
//!
//! ```
//! use renderstate::{
//!     cache::{StateCache, StateCacheCreateInfo},
//!     pipeline::{PipelineChanges, PipelineState},
//! };
//! # use renderstate::{device::*, pipeline::{color_blend::*, depth_stencil::*}, DeviceError};
//! # struct NullDevice;
//! # impl RenderDevice for NullDevice {
//! #     fn set_blend_enable(&mut self, _: bool) -> Result<(), DeviceError> { Ok(()) }
//! #     fn set_blend_constants(&mut self, _: [f32; 4]) -> Result<(), DeviceError> { Ok(()) }
//! #     fn set_blend_funcs_equations(&mut self, _: AttachmentBlend) -> Result<(), DeviceError> { Ok(()) }
//! #     fn set_alpha_to_coverage_enable(&mut self, _: bool) -> Result<(), DeviceError> { Ok(()) }
//! #     fn set_color_write_mask(&mut self, _: ColorComponents) -> Result<(), DeviceError> { Ok(()) }
//! #     fn set_dither_enable(&mut self, _: bool) -> Result<(), DeviceError> { Ok(()) }
//! #     fn set_sample_mask(&mut self, _: u32) -> Result<(), DeviceError> { Ok(()) }
//! #     fn set_cull_mode(&mut self, _: CulledWinding) -> Result<(), DeviceError> { Ok(()) }
//! #     fn set_depth_bias(&mut self, _: f32, _: f32) -> Result<(), DeviceError> { Ok(()) }
//! #     fn set_depth_write_enable(&mut self, _: bool) -> Result<(), DeviceError> { Ok(()) }
//! #     fn set_depth_test(&mut self, _: bool, _: CompareOp) -> Result<(), DeviceError> { Ok(()) }
//! #     fn set_stencil_test_enable(&mut self, _: bool) -> Result<(), DeviceError> { Ok(()) }
//! #     fn set_stencil_func(&mut self, _: StencilSlot, _: CompareOp, _: u32, _: u32) -> Result<(), DeviceError> { Ok(()) }
//! #     fn set_stencil_write_mask(&mut self, _: StencilSlot, _: u32) -> Result<(), DeviceError> { Ok(()) }
//! #     fn set_stencil_ops(&mut self, _: StencilSlot, _: StencilOps) -> Result<(), DeviceError> { Ok(()) }
//! # }
//! # fn main() -> Result<(), DeviceError> {
//! # let device = NullDevice;
//! let mut cache = StateCache::new(device, StateCacheCreateInfo::default());
//!
//! let mut state = PipelineState::default();
//! state.color_blend.blend_enable = true;
//!
//! cache.sync_state(&state, PipelineChanges::BLEND_ENABLED)?;
//! // Nothing changed, so this issues no device call at all.
//! cache.sync_state(&state, PipelineChanges::empty())?;
//! # Ok(())
//! # }
//! ```
//!
//! The cache is single-threaded: it owns its device and every operation runs to completion on
//! the calling thread.

use std::{borrow::Cow, error::Error, fmt};

mod macros;
pub mod cache;
pub mod device;
pub mod framebuffer;
pub mod pipeline;

pub use crate::cache::{StateCache, StateCacheCreateInfo};

/// Error returned by the primitive operations of a [`RenderDevice`](crate::device::RenderDevice),
/// and propagated unchanged by the [`StateCache`](crate::cache::StateCache).
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DeviceError {
    /// The device cannot represent the requested combination of values.
    Unsupported {
        /// Describes what was requested.
        problem: Cow<'static, str>,
    },

    /// A host memory allocation has failed.
    OutOfHostMemory,

    /// A device memory allocation has failed.
    OutOfDeviceMemory,

    /// The logical or physical device has been lost.
    DeviceLost,

    /// A Vulkan result code with no dedicated variant.
    Unnamed(ash::vk::Result),
}

impl DeviceError {
    /// Shorthand for an [`Unsupported`](DeviceError::Unsupported) error.
    #[inline]
    pub fn unsupported(problem: impl Into<Cow<'static, str>>) -> Self {
        DeviceError::Unsupported {
            problem: problem.into(),
        }
    }
}

impl Error for DeviceError {}

impl fmt::Display for DeviceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeviceError::Unsupported { problem } => {
                write!(f, "the device does not support this configuration: {}", problem)
            }
            DeviceError::OutOfHostMemory => write!(f, "a host memory allocation has failed"),
            DeviceError::OutOfDeviceMemory => write!(f, "a device memory allocation has failed"),
            DeviceError::DeviceLost => write!(f, "the logical or physical device has been lost"),
            DeviceError::Unnamed(result) => write!(f, "unnamed device error: {:?}", result),
        }
    }
}

impl From<ash::vk::Result> for DeviceError {
    fn from(val: ash::vk::Result) -> Self {
        match val {
            ash::vk::Result::ERROR_OUT_OF_HOST_MEMORY => DeviceError::OutOfHostMemory,
            ash::vk::Result::ERROR_OUT_OF_DEVICE_MEMORY => DeviceError::OutOfDeviceMemory,
            ash::vk::Result::ERROR_DEVICE_LOST => DeviceError::DeviceLost,
            ash::vk::Result::ERROR_FEATURE_NOT_PRESENT => {
                DeviceError::unsupported("a required feature is not present")
            }
            ash::vk::Result::ERROR_FORMAT_NOT_SUPPORTED => {
                DeviceError::unsupported("the requested format is not supported")
            }
            result => DeviceError::Unnamed(result),
        }
    }
}

/// A helper type for non-exhaustive structs.
///
/// This type cannot be constructed outside this crate. Structures that have a field of this type
/// can therefore not be constructed with struct literal syntax outside this crate, only updated
/// from a `Default` value.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct NonExhaustive(pub(crate) ());
