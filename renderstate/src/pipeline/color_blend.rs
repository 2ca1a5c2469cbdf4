// Copyright (c) 2026 The renderstate contributors
// Licensed under the Apache License, Version 2.0
// <LICENSE-APACHE or
// https://www.apache.org/licenses/LICENSE-2.0> or the MIT
// license <LICENSE-MIT or https://opensource.org/licenses/MIT>,
// at your option. All files in the project carrying such
// notice may not be copied, modified, or distributed except
// according to those terms.

//! Configures how the color output of the fragment shader is written to the attachment.
//!
//! The blend equation combines the `source` (output of the fragment shader) and the
//! `destination` (value currently in the color attachment). Each of them is first multiplied
//! by a [`BlendFactor`], then the two products are combined with a [`BlendOp`]. Color and alpha
//! components have their own factors and operation.

use crate::macros::{vulkan_bitflags, vulkan_enum};

/// Describes how the color output of the fragment shader is written to the color attachment.
#[derive(Clone, Debug, PartialEq)]
pub struct ColorBlendState {
    /// Whether blending is enabled. If `false`, the source color is written as-is.
    ///
    /// The default value is `false`.
    pub blend_enable: bool,

    /// The blend factors and operations used when blending is enabled.
    ///
    /// The default value is [`AttachmentBlend::replace()`].
    pub blend: AttachmentBlend,

    /// The color components that can be written. Components that the color attachment does not
    /// have are never written, whatever this mask says.
    ///
    /// The default value is [`ColorComponents::all()`].
    pub color_write_mask: ColorComponents,

    /// The constant color to use for the `Constant*` blend factors.
    ///
    /// The default value is `[0.0; 4]`.
    pub blend_constants: [f32; 4],

    /// Whether the color is dithered before being written.
    ///
    /// The default value is `true`.
    pub dither_enable: bool,
}

impl Default for ColorBlendState {
    #[inline]
    fn default() -> Self {
        Self {
            blend_enable: false,
            blend: AttachmentBlend::replace(),
            color_write_mask: ColorComponents::all(),
            blend_constants: [0.0; 4],
            dither_enable: true,
        }
    }
}

/// Describes how the blending system should behave for the color attachment.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct AttachmentBlend {
    /// The operation to apply to the source color component before applying `color_op`.
    pub src_color_blend_factor: BlendFactor,

    /// The operation to apply to the destination color component before applying `color_op`.
    pub dst_color_blend_factor: BlendFactor,

    /// The operation to apply between the color components of the source and destination pixels,
    /// to produce the final pixel value.
    pub color_blend_op: BlendOp,

    /// The operation to apply to the source alpha component before applying `alpha_op`.
    pub src_alpha_blend_factor: BlendFactor,

    /// The operation to apply to the destination alpha component before applying `alpha_op`.
    pub dst_alpha_blend_factor: BlendFactor,

    /// The operation to apply between the alpha component of the source and destination pixels,
    /// to produce the final pixel value.
    pub alpha_blend_op: BlendOp,
}

impl AttachmentBlend {
    /// Builds an `AttachmentBlend` where the output of the fragment shader replaces the
    /// destination. This is the state of a freshly created device.
    #[inline]
    pub fn replace() -> Self {
        Self {
            src_color_blend_factor: BlendFactor::One,
            dst_color_blend_factor: BlendFactor::Zero,
            color_blend_op: BlendOp::Add,
            src_alpha_blend_factor: BlendFactor::One,
            dst_alpha_blend_factor: BlendFactor::Zero,
            alpha_blend_op: BlendOp::Add,
        }
    }

    /// Builds an `AttachmentBlend` where the output of the fragment shader is ignored and the
    /// destination is untouched.
    #[inline]
    pub fn ignore_source() -> Self {
        Self {
            src_color_blend_factor: BlendFactor::Zero,
            dst_color_blend_factor: BlendFactor::One,
            color_blend_op: BlendOp::Add,
            src_alpha_blend_factor: BlendFactor::Zero,
            dst_alpha_blend_factor: BlendFactor::One,
            alpha_blend_op: BlendOp::Add,
        }
    }

    /// Builds an `AttachmentBlend` where the output will be merged with the existing value
    /// based on the alpha of the source.
    #[inline]
    pub fn alpha() -> Self {
        Self {
            src_color_blend_factor: BlendFactor::SrcAlpha,
            dst_color_blend_factor: BlendFactor::OneMinusSrcAlpha,
            color_blend_op: BlendOp::Add,
            src_alpha_blend_factor: BlendFactor::SrcAlpha,
            dst_alpha_blend_factor: BlendFactor::OneMinusSrcAlpha,
            alpha_blend_op: BlendOp::Add,
        }
    }

    /// Builds an `AttachmentBlend` where the colors are added, and alpha is set to the maximum of
    /// the two.
    #[inline]
    pub fn additive() -> Self {
        Self {
            src_color_blend_factor: BlendFactor::One,
            dst_color_blend_factor: BlendFactor::One,
            color_blend_op: BlendOp::Add,
            src_alpha_blend_factor: BlendFactor::One,
            dst_alpha_blend_factor: BlendFactor::One,
            alpha_blend_op: BlendOp::Max,
        }
    }

    /// Returns whether one of the color factors reads the alpha of the blend constants.
    ///
    /// Devices with a single blend constant register can then only honor the alpha channel,
    /// so the constant is sent with its alpha replicated into every channel.
    #[inline]
    pub fn color_reads_constant_alpha(&self) -> bool {
        self.src_color_blend_factor.is_constant_alpha()
            || self.dst_color_blend_factor.is_constant_alpha()
    }
}

impl Default for AttachmentBlend {
    /// Returns [`AttachmentBlend::replace()`].
    #[inline]
    fn default() -> Self {
        Self::replace()
    }
}

vulkan_enum! {
    /// The operation that takes `source` (output from the fragment shader), `destination` (value
    /// currently in the framebuffer attachment) and `blend_constant` input values,
    /// and produces new inputs to be fed to `BlendOp`.
    BlendFactor impl {
        /// Returns whether this factor reads the alpha of the blend constants.
        #[inline]
        pub fn is_constant_alpha(self) -> bool {
            matches!(self, BlendFactor::ConstantAlpha | BlendFactor::OneMinusConstantAlpha)
        }
    }
    = BlendFactor(i32);

    /// Always `0`.
    Zero = ZERO,

    /// Always `1`.
    One = ONE,

    /// `source` component-wise.
    SrcColor = SRC_COLOR,

    /// `1 - source` component-wise.
    OneMinusSrcColor = ONE_MINUS_SRC_COLOR,

    /// `destination` component-wise.
    DstColor = DST_COLOR,

    /// `1 - destination` component-wise.
    OneMinusDstColor = ONE_MINUS_DST_COLOR,

    /// `source.a` for all components.
    SrcAlpha = SRC_ALPHA,

    /// `1 - source.a` for all components.
    OneMinusSrcAlpha = ONE_MINUS_SRC_ALPHA,

    /// `destination.a` for all components.
    DstAlpha = DST_ALPHA,

    /// `1 - destination.a` for all components.
    OneMinusDstAlpha = ONE_MINUS_DST_ALPHA,

    /// `blend_constants` component-wise.
    ConstantColor = CONSTANT_COLOR,

    /// `1 - blend_constants` component-wise.
    OneMinusConstantColor = ONE_MINUS_CONSTANT_COLOR,

    /// `blend_constants.a` for all components.
    ConstantAlpha = CONSTANT_ALPHA,

    /// `1 - blend_constants.a` for all components.
    OneMinusConstantAlpha = ONE_MINUS_CONSTANT_ALPHA,

    /// For the alpha component, always `1`. For the color components,
    /// `min(source.a, 1 - destination.a)` for all components.
    SrcAlphaSaturate = SRC_ALPHA_SATURATE,
}

vulkan_enum! {
    /// The arithmetic operation that is applied between the `source` and `destination` component
    /// values, after the appropriate `BlendFactor` is applied to both.
    BlendOp = BlendOp(i32);

    /// `source + destination`.
    Add = ADD,

    /// `source - destination`.
    Subtract = SUBTRACT,

    /// `destination - source`.
    ReverseSubtract = REVERSE_SUBTRACT,

    /// `min(source, destination)`.
    Min = MIN,

    /// `max(source, destination)`.
    Max = MAX,
}

vulkan_bitflags! {
    /// A mask specifying color components that can be written to a framebuffer attachment.
    ColorComponents = ColorComponentFlags(u32);

    /// The red component.
    R = R,

    /// The green component.
    G = G,

    /// The blue component.
    B = B,

    /// The alpha component.
    A = A,
}

#[cfg(test)]
mod tests {
    use super::{AttachmentBlend, BlendFactor, BlendOp, ColorComponents};

    #[test]
    fn enums_convert_to_vulkan() {
        assert_eq!(
            ash::vk::BlendFactor::from(BlendFactor::OneMinusConstantAlpha),
            ash::vk::BlendFactor::ONE_MINUS_CONSTANT_ALPHA
        );
        assert_eq!(ash::vk::BlendOp::from(BlendOp::Max), ash::vk::BlendOp::MAX);
        assert_eq!(
            BlendFactor::try_from(ash::vk::BlendFactor::SRC_ALPHA),
            Ok(BlendFactor::SrcAlpha)
        );
        assert_eq!(
            BlendFactor::try_from(ash::vk::BlendFactor::SRC1_COLOR),
            Err(())
        );
    }

    #[test]
    fn color_components_set_operations() {
        let rgb = ColorComponents::R | ColorComponents::G | ColorComponents::B;
        assert_eq!(rgb.count(), 3);
        assert!(ColorComponents::all().contains(rgb));
        assert_eq!(!rgb, ColorComponents::A);
        assert_eq!(rgb - ColorComponents::G, ColorComponents::R | ColorComponents::B);
        assert_eq!(format!("{:?}", ColorComponents::empty()), "empty()");
        assert_eq!(format!("{:?}", ColorComponents::R | ColorComponents::A), "R | A");
        assert_eq!(
            ash::vk::ColorComponentFlags::from(rgb),
            ash::vk::ColorComponentFlags::R
                | ash::vk::ColorComponentFlags::G
                | ash::vk::ColorComponentFlags::B
        );
    }

    #[test]
    fn constant_alpha_detection() {
        assert!(!AttachmentBlend::alpha().color_reads_constant_alpha());

        let blend = AttachmentBlend {
            dst_color_blend_factor: BlendFactor::OneMinusConstantAlpha,
            ..AttachmentBlend::replace()
        };
        assert!(blend.color_reads_constant_alpha());

        // Only the color factors matter.
        let blend = AttachmentBlend {
            src_alpha_blend_factor: BlendFactor::ConstantAlpha,
            ..AttachmentBlend::replace()
        };
        assert!(!blend.color_reads_constant_alpha());

        // Constant color factors read the RGB constants, not the alpha.
        let blend = AttachmentBlend {
            src_color_blend_factor: BlendFactor::ConstantColor,
            dst_color_blend_factor: BlendFactor::OneMinusConstantColor,
            ..AttachmentBlend::replace()
        };
        assert!(!blend.color_reads_constant_alpha());
        assert!(BlendFactor::ConstantAlpha.is_constant_alpha());
        assert!(!BlendFactor::ConstantColor.is_constant_alpha());
    }
}
