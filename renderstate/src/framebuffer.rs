// Copyright (c) 2026 The renderstate contributors
// Licensed under the Apache License, Version 2.0
// <LICENSE-APACHE or
// https://www.apache.org/licenses/LICENSE-2.0> or the MIT
// license <LICENSE-MIT or https://opensource.org/licenses/MIT>,
// at your option. All files in the project carrying such
// notice may not be copied, modified, or distributed except
// according to those terms.

//! What the cache needs to know about the bound draw framebuffer.

use crate::pipeline::color_blend::ColorComponents;

/// Description of the attachments of the bound draw framebuffer.
///
/// Only the properties that influence fixed-function state are tracked: which color channels
/// exist, how many samples each pixel has, and the precision of the depth and stencil buffers.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FramebufferState {
    /// The channels of the first color attachment, or `None` if there is no color attachment.
    ///
    /// The default value is `Some(ColorComponents::all())`.
    pub color_attachment: Option<ColorComponents>,

    /// The number of samples per pixel. `0` means the framebuffer is not multisampled.
    ///
    /// The default value is `0`.
    pub samples: u32,

    /// The number of bits of the depth buffer, `0` if there is none.
    ///
    /// The default value is `24`.
    pub depth_bits: u32,

    /// The number of bits of the stencil buffer, `0` if there is none.
    ///
    /// The default value is `8`.
    pub stencil_bits: u32,
}

impl FramebufferState {
    /// Returns the color channels that can actually be written.
    #[inline]
    pub fn color_channels(&self) -> ColorComponents {
        self.color_attachment.unwrap_or(ColorComponents::empty())
    }
}

impl Default for FramebufferState {
    #[inline]
    fn default() -> Self {
        Self {
            color_attachment: Some(ColorComponents::all()),
            samples: 0,
            depth_bits: 24,
            stencil_bits: 8,
        }
    }
}
