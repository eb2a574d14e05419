// SPDX-License-Identifier: GPL-3.0-only

//! Vintage color filters
//!
//! A filter is a declarative list of color effects applied in order. Each
//! effect uses the standard filter-effects color matrix for its operation,
//! so a filter renders the same way on the live preview and in a capture.

use image::RgbaImage;

/// A single composable color effect
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Effect {
    /// Sepia tone, amount 0.0..=1.0
    Sepia(f32),
    /// Desaturate, amount 0.0..=1.0
    Grayscale(f32),
    /// Saturation multiplier, 1.0 = unchanged
    Saturate(f32),
    /// Contrast multiplier around mid gray, 1.0 = unchanged
    Contrast(f32),
    /// Hue rotation in degrees
    HueRotate(f32),
}

impl Effect {
    /// Apply to a normalized RGB triple, clamping the result
    pub fn apply(&self, [r, g, b]: [f32; 3]) -> [f32; 3] {
        let out = match *self {
            Effect::Contrast(c) => [(r - 0.5) * c + 0.5, (g - 0.5) * c + 0.5, (b - 0.5) * c + 0.5],
            _ => {
                let m = self.matrix();
                [
                    m[0][0] * r + m[0][1] * g + m[0][2] * b,
                    m[1][0] * r + m[1][1] * g + m[1][2] * b,
                    m[2][0] * r + m[2][1] * g + m[2][2] * b,
                ]
            }
        };
        out.map(|v| v.clamp(0.0, 1.0))
    }

    fn matrix(&self) -> [[f32; 3]; 3] {
        match *self {
            Effect::Sepia(amount) => {
                let a = 1.0 - amount.clamp(0.0, 1.0);
                [
                    [0.393 + 0.607 * a, 0.769 - 0.769 * a, 0.189 - 0.189 * a],
                    [0.349 - 0.349 * a, 0.686 + 0.314 * a, 0.168 - 0.168 * a],
                    [0.272 - 0.272 * a, 0.534 - 0.534 * a, 0.131 + 0.869 * a],
                ]
            }
            Effect::Grayscale(amount) => {
                let a = 1.0 - amount.clamp(0.0, 1.0);
                [
                    [0.2126 + 0.7874 * a, 0.7152 - 0.7152 * a, 0.0722 - 0.0722 * a],
                    [0.2126 - 0.2126 * a, 0.7152 + 0.2848 * a, 0.0722 - 0.0722 * a],
                    [0.2126 - 0.2126 * a, 0.7152 - 0.7152 * a, 0.0722 + 0.9278 * a],
                ]
            }
            Effect::Saturate(s) => [
                [0.213 + 0.787 * s, 0.715 - 0.715 * s, 0.072 - 0.072 * s],
                [0.213 - 0.213 * s, 0.715 + 0.285 * s, 0.072 - 0.072 * s],
                [0.213 - 0.213 * s, 0.715 - 0.715 * s, 0.072 + 0.928 * s],
            ],
            Effect::HueRotate(degrees) => {
                let (sin, cos) = degrees.to_radians().sin_cos();
                [
                    [
                        0.213 + cos * 0.787 - sin * 0.213,
                        0.715 - cos * 0.715 - sin * 0.715,
                        0.072 - cos * 0.072 + sin * 0.928,
                    ],
                    [
                        0.213 - cos * 0.213 + sin * 0.143,
                        0.715 + cos * 0.285 + sin * 0.140,
                        0.072 - cos * 0.072 - sin * 0.283,
                    ],
                    [
                        0.213 - cos * 0.213 - sin * 0.787,
                        0.715 - cos * 0.715 + sin * 0.715,
                        0.072 + cos * 0.928 + sin * 0.072,
                    ],
                ]
            }
            Effect::Contrast(_) => [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]],
        }
    }
}

/// A named filter: effects applied left to right
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FilterDef {
    /// Label shown on the camera screen
    pub name: &'static str,
    pub effects: &'static [Effect],
}

/// The filter dial, in cycling order
pub const FILTERS: [FilterDef; 5] = [
    FilterDef {
        name: "ORIGINAL",
        effects: &[],
    },
    FilterDef {
        name: "SEPIA",
        effects: &[Effect::Sepia(0.8)],
    },
    FilterDef {
        name: "MONO",
        effects: &[Effect::Grayscale(1.0)],
    },
    FilterDef {
        name: "VIVID",
        effects: &[Effect::Saturate(2.0), Effect::Contrast(1.2)],
    },
    FilterDef {
        name: "DREAM",
        effects: &[Effect::HueRotate(90.0)],
    },
];

impl FilterDef {
    pub fn is_identity(&self) -> bool {
        self.effects.is_empty()
    }

    /// Filter one 8-bit RGB pixel
    pub fn apply_pixel(&self, rgb: [u8; 3]) -> [u8; 3] {
        if self.is_identity() {
            return rgb;
        }
        let mut value = rgb.map(|c| c as f32 / 255.0);
        for effect in self.effects {
            value = effect.apply(value);
        }
        value.map(|c| (c * 255.0).round() as u8)
    }

    /// Filter an RGBA raster in place; alpha is left untouched
    pub fn apply_in_place(&self, image: &mut RgbaImage) {
        if self.is_identity() {
            return;
        }
        for pixel in image.pixels_mut() {
            let [r, g, b] = self.apply_pixel([pixel[0], pixel[1], pixel[2]]);
            pixel[0] = r;
            pixel[1] = g;
            pixel[2] = b;
        }
    }
}

/// Current position of the filter dial and the mirror switch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FilterState {
    pub index: usize,
    pub mirror: bool,
}

impl Default for FilterState {
    fn default() -> Self {
        Self {
            index: 0,
            mirror: true,
        }
    }
}

impl FilterState {
    pub fn filter(&self) -> &'static FilterDef {
        &FILTERS[self.index % FILTERS.len()]
    }

    /// Advance the dial, wrapping after the last filter
    pub fn cycle(&mut self) {
        self.index = (self.index + 1) % FILTERS.len();
    }

    pub fn toggle_mirror(&mut self) {
        self.mirror = !self.mirror;
    }
}
