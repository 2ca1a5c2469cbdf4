// Copyright (c) 2026 The renderstate contributors
// Licensed under the Apache License, Version 2.0
// <LICENSE-APACHE or
// https://www.apache.org/licenses/LICENSE-2.0> or the MIT
// license <LICENSE-MIT or https://opensource.org/licenses/MIT>,
// at your option. All files in the project carrying such
// notice may not be copied, modified, or distributed except
// according to those terms.

//! Controls which samples of a multisampled framebuffer pixel a fragment can write to.

/// State of the multisample coverage.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct MultisampleState {
    /// Controls whether the alpha value of the fragment will be used in an implementation-defined
    /// way to determine which samples get disabled or not. For example if the alpha value is 0.5,
    /// then about half of the samples will be discarded.
    ///
    /// The default value is `false`.
    pub alpha_to_coverage_enable: bool,

    /// If `Some`, a fraction of the samples is masked out, as described in [`SampleCoverage`].
    ///
    /// The default value is `None`.
    pub sample_coverage: Option<SampleCoverage>,

    /// If `Some`, an explicit mask that is combined with the coverage mask. Bit `i` controls
    /// sample `i`.
    ///
    /// The default value is `None`.
    pub sample_mask: Option<u32>,
}

impl MultisampleState {
    /// Computes the final sample mask for a framebuffer with `samples` samples per pixel.
    ///
    /// Without sample coverage every sample is enabled. With sample coverage, a number of bits
    /// proportional to the coverage value is enabled, spread evenly over the sample count. The
    /// result is then restricted to the explicit sample mask, if any.
    pub fn effective_sample_mask(&self, samples: u32) -> u32 {
        let coverage_mask = match self.sample_coverage {
            Some(coverage) => coverage.mask(samples),
            None => u32::MAX,
        };

        coverage_mask & self.sample_mask.unwrap_or(u32::MAX)
    }
}

/// Masks out a fraction of the samples of each pixel.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SampleCoverage {
    /// The fraction of samples to keep, between 0.0 and 1.0.
    pub value: f32,

    /// If `true`, the computed mask is inverted.
    pub invert: bool,
}

impl SampleCoverage {
    /// Returns the coverage mask for a pixel with `samples` samples.
    pub fn mask(self, samples: u32) -> u32 {
        let mut mask = 0u32;

        if self.value != 0.0 {
            let mut threshold = 0.5;

            for i in 0..samples.min(u32::BITS) {
                mask <<= 1;

                if (i + 1) as f32 * self.value >= threshold {
                    threshold += 1.0;
                    mask |= 1;
                }
            }
        }

        if self.invert {
            !mask
        } else {
            mask
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{MultisampleState, SampleCoverage};

    #[test]
    fn no_coverage_enables_everything() {
        let state = MultisampleState::default();
        assert_eq!(state.effective_sample_mask(4), u32::MAX);
    }

    #[test]
    fn coverage_spreads_over_samples() {
        let full = SampleCoverage {
            value: 1.0,
            invert: false,
        };
        assert_eq!(full.mask(4), 0b1111);

        let half = SampleCoverage {
            value: 0.5,
            invert: false,
        };
        assert_eq!(half.mask(4), 0b1010);

        let none = SampleCoverage {
            value: 0.0,
            invert: false,
        };
        assert_eq!(none.mask(4), 0);
    }

    #[test]
    fn coverage_invert() {
        let coverage = SampleCoverage {
            value: 0.0,
            invert: true,
        };
        assert_eq!(coverage.mask(4), u32::MAX);
    }

    #[test]
    fn explicit_mask_restricts_coverage() {
        let state = MultisampleState {
            sample_coverage: Some(SampleCoverage {
                value: 1.0,
                invert: false,
            }),
            sample_mask: Some(0b0110),
            ..Default::default()
        };
        assert_eq!(state.effective_sample_mask(4), 0b0110);
    }

    #[test]
    fn single_sampled_framebuffer_has_no_coverage_bits() {
        let state = MultisampleState {
            sample_coverage: Some(SampleCoverage {
                value: 1.0,
                invert: false,
            }),
            ..Default::default()
        };
        assert_eq!(state.effective_sample_mask(0), 0);
    }
}
