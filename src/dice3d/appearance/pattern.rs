//! Pattern textures rasterized on the CPU.

use bevy::asset::RenderAssetUsages;
use bevy::image::{ImageAddressMode, ImageSampler, ImageSamplerDescriptor};
use bevy::prelude::*;
use bevy::render::render_resource::{Extent3d, TextureDimension, TextureFormat};
use image::{Rgba, RgbaImage};

use super::color::DieColor;
use crate::dice3d::types::DiePattern;

/// Width and height of every pattern texture
pub const PATTERN_TEXTURE_SIZE: u32 = 128;

/// Stripes tile this many times across the die's UV range
pub const STRIPE_REPEAT: f32 = 2.0;

const STRIPE_SPACING: i32 = 42;
const STRIPE_WIDTH: f32 = 22.0;
const ACCENT_WIDTH: f32 = 6.0;
const ACCENT_SHIFT: i32 = 14;

const GRADIENT_MID: DieColor = DieColor::rgb(0x44, 0x44, 0x44);

/// Rasterize `pattern` over `base`. Solid patterns have no texture.
pub fn rasterize_pattern(pattern: DiePattern, base: DieColor) -> Option<RgbaImage> {
    match pattern {
        DiePattern::Solid => None,
        DiePattern::Stripes => Some(stripe_image(base)),
        DiePattern::Gradient => Some(gradient_image(base)),
    }
}

/// Whether textures for this pattern tile across the surface.
pub fn repeats(pattern: DiePattern) -> bool {
    pattern == DiePattern::Stripes
}

fn filled(base: DieColor) -> RgbaImage {
    RgbaImage::from_pixel(
        PATTERN_TEXTURE_SIZE,
        PATTERN_TEXTURE_SIZE,
        Rgba(base.to_rgba8()),
    )
}

/// Paint every pixel whose center lies within `width / 2` of the diagonal
/// line `x - y = offset`.
fn paint_diagonal(image: &mut RgbaImage, offset: i32, width: f32, color: DieColor) {
    let half = width / 2.0;
    let pixel = Rgba(color.to_rgba8());
    for y in 0..image.height() {
        for x in 0..image.width() {
            let distance = (x as f32 - y as f32 - offset as f32).abs() / std::f32::consts::SQRT_2;
            if distance <= half {
                image.put_pixel(x, y, pixel);
            }
        }
    }
}

fn stripe_image(base: DieColor) -> RgbaImage {
    let size = PATTERN_TEXTURE_SIZE as i32;
    let mut image = filled(base);
    let mut offset = -size;
    while offset < size * 2 {
        paint_diagonal(&mut image, offset, STRIPE_WIDTH, DieColor::WHITE);
        paint_diagonal(&mut image, offset + ACCENT_SHIFT, ACCENT_WIDTH, DieColor::BLACK);
        offset += STRIPE_SPACING;
    }
    image
}

/// Color of the vertical gradient at `t` in `[0, 1]`.
pub fn gradient_color(base: DieColor, t: f32) -> DieColor {
    let stops = [(0.0, base), (0.5, GRADIENT_MID), (1.0, DieColor::BLACK)];
    let t = t.clamp(0.0, 1.0);
    let (start, end) = stops
        .windows(2)
        .map(|w| (w[0], w[1]))
        .find(|(a, b)| t >= a.0 && t <= b.0)
        .unwrap_or((stops[0], stops[2]));
    let span = end.0 - start.0;
    let local = if span > 0.0 { (t - start.0) / span } else { 0.0 };
    start.1.lerp(end.1, local)
}

fn gradient_image(base: DieColor) -> RgbaImage {
    let last = (PATTERN_TEXTURE_SIZE - 1) as f32;
    RgbaImage::from_fn(PATTERN_TEXTURE_SIZE, PATTERN_TEXTURE_SIZE, |_, y| {
        Rgba(gradient_color(base, y as f32 / last).to_rgba8())
    })
}

/// Upload an RGBA image as an sRGB Bevy texture.
pub fn to_bevy_image(raster: &RgbaImage, repeat: bool) -> Image {
    let size = Extent3d {
        width: raster.width(),
        height: raster.height(),
        depth_or_array_layers: 1,
    };
    let mut image = Image::new(
        size,
        TextureDimension::D2,
        raster.as_raw().clone(),
        TextureFormat::Rgba8UnormSrgb,
        RenderAssetUsages::default(),
    );
    if repeat {
        image.sampler = ImageSampler::Descriptor(ImageSamplerDescriptor {
            address_mode_u: ImageAddressMode::Repeat,
            address_mode_v: ImageAddressMode::Repeat,
            ..default()
        });
    }
    image
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pixel(image: &RgbaImage, x: u32, y: u32) -> [u8; 4] {
        image.get_pixel(x, y).0
    }

    #[test]
    fn test_solid_has_no_texture() {
        assert!(rasterize_pattern(DiePattern::Solid, DieColor::WHITE).is_none());
    }

    #[test]
    fn test_stripes_layers() {
        let base = DieColor::rgb(200, 30, 30);
        let image = rasterize_pattern(DiePattern::Stripes, base).unwrap();
        assert_eq!(image.dimensions(), (128, 128));
        // On the x - y = -2 band center, clear of the accents at 12 and -30
        assert_eq!(pixel(&image, 20, 22), [255, 255, 255, 255]);
        // On the accent for the band at -2 (x - y = 12)
        assert_eq!(pixel(&image, 32, 20), [0, 0, 0, 255]);
        // Gap between the accent at 12 and the band at 40
        assert_eq!(pixel(&image, 40, 20), [200, 30, 30, 255]);
    }

    #[test]
    fn test_gradient_stops() {
        let base = DieColor::rgb(0xf5, 0x9e, 0x0b);
        let image = rasterize_pattern(DiePattern::Gradient, base).unwrap();
        assert_eq!(pixel(&image, 0, 0), [0xf5, 0x9e, 0x0b, 255]);
        assert_eq!(pixel(&image, 64, 127), [0, 0, 0, 255]);
        // Rows are uniform
        assert_eq!(pixel(&image, 0, 40), pixel(&image, 127, 40));
        assert_eq!(gradient_color(base, 0.5), DieColor::rgb(0x44, 0x44, 0x44));
        assert_eq!(gradient_color(DieColor::WHITE, 0.25), DieColor::rgb(162, 162, 162));
    }

    #[test]
    fn test_repeat_sampler_only_for_stripes() {
        assert!(repeats(DiePattern::Stripes));
        assert!(!repeats(DiePattern::Gradient));
    }
}
