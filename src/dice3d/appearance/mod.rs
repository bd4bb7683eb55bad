//! Turns a die definition into surface, edge and sparkle materials.

pub mod color;
pub mod pattern;
pub mod sparkle;

use std::collections::HashMap;

use bevy::math::Affine2;
use bevy::prelude::*;

use crate::dice3d::types::{DieDefinition, DiePattern};

pub use color::{edge_color, DieColor};
pub use pattern::{rasterize_pattern, to_bevy_image, PATTERN_TEXTURE_SIZE, STRIPE_REPEAT};
pub use sparkle::SparkleCloud;

/// Sheen has no direct counterpart; it shows as emissive of this strength
const SHEEN_EMISSIVE_SCALE: f32 = 0.15;

/// Fully resolved surface parameters for one die.
#[derive(Clone, Debug, PartialEq)]
pub struct SurfaceMaterial {
    /// White when a pattern texture supplies the color
    pub base_color: DieColor,
    pub textured: bool,
    /// UV scale applied to the pattern texture
    pub texture_repeat: f32,
    pub roughness: f32,
    pub metalness: f32,
    pub reflectivity: f32,
    pub transmission: f32,
    pub ior: f32,
    pub thickness: f32,
    /// 0 disables attenuation
    pub attenuation_distance: f32,
    pub attenuation_color: DieColor,
    pub opacity: f32,
    pub clearcoat: f32,
    pub clearcoat_roughness: f32,
    pub sheen: f32,
    pub sheen_color: DieColor,
    pub transparent: bool,
}

impl SurfaceMaterial {
    /// Fill in every parameter from the definition's overrides or defaults.
    ///
    /// `textured` says whether a pattern texture is actually available; a
    /// patterned die whose texture failed renders in its plain color.
    pub fn resolve(definition: &DieDefinition, textured: bool) -> Self {
        let color = DieColor::parse_or_gray(&definition.color_hex);
        let textured = textured && definition.pattern != DiePattern::Solid;
        let overrides = definition.appearance.clone().unwrap_or_default();
        let color_or = |value: Option<String>| {
            value
                .as_deref()
                .map(DieColor::parse_or_gray)
                .unwrap_or(color)
        };

        let opacity = overrides.opacity.unwrap_or(1.0).clamp(0.0, 1.0);
        let transmission = overrides.transmission.unwrap_or(0.0).clamp(0.0, 1.0);

        Self {
            base_color: if textured { DieColor::WHITE } else { color },
            textured,
            texture_repeat: if pattern::repeats(definition.pattern) {
                STRIPE_REPEAT
            } else {
                1.0
            },
            roughness: overrides.roughness.unwrap_or(0.55),
            metalness: overrides.metalness.unwrap_or(0.15),
            reflectivity: overrides.reflectivity.unwrap_or(0.5),
            transmission,
            ior: overrides.ior.unwrap_or(1.3),
            thickness: overrides.thickness.unwrap_or(0.2),
            attenuation_distance: overrides.attenuation_distance.unwrap_or(0.0),
            attenuation_color: color_or(overrides.attenuation_color),
            opacity,
            clearcoat: overrides.clearcoat.unwrap_or(0.1),
            clearcoat_roughness: overrides.clearcoat_roughness.unwrap_or(0.3),
            sheen: overrides.sheen.unwrap_or(0.0),
            sheen_color: color_or(overrides.sheen_color),
            transparent: opacity < 1.0 || transmission > 0.0,
        }
    }

    pub fn to_standard_material(&self, texture: Option<Handle<Image>>) -> StandardMaterial {
        let texture = if self.textured { texture } else { None };
        let attenuation_distance = if self.attenuation_distance > 0.0 {
            self.attenuation_distance
        } else {
            f32::INFINITY
        };

        StandardMaterial {
            base_color: self.base_color.to_bevy().with_alpha(self.opacity),
            base_color_texture: texture,
            uv_transform: Affine2::from_scale(Vec2::splat(self.texture_repeat)),
            emissive: self.sheen_color.to_linear() * (self.sheen * SHEEN_EMISSIVE_SCALE),
            perceptual_roughness: self.roughness.clamp(0.089, 1.0),
            metallic: self.metalness.clamp(0.0, 1.0),
            reflectance: self.reflectivity.clamp(0.0, 1.0),
            specular_transmission: self.transmission,
            thickness: self.thickness,
            ior: self.ior,
            attenuation_distance,
            attenuation_color: self.attenuation_color.to_bevy(),
            clearcoat: self.clearcoat,
            clearcoat_perceptual_roughness: self.clearcoat_roughness.clamp(0.089, 1.0),
            alpha_mode: if self.transparent {
                AlphaMode::Blend
            } else {
                AlphaMode::Opaque
            },
            ..default()
        }
    }
}

/// Flat, unlit material for the wireframe overlay.
pub fn edge_material(body: DieColor) -> StandardMaterial {
    StandardMaterial {
        base_color: edge_color(body).to_bevy(),
        unlit: true,
        ..default()
    }
}

/// Pattern textures keyed by pattern and color.
#[derive(Resource, Default)]
pub struct TextureCache {
    entries: HashMap<(DiePattern, DieColor), Handle<Image>>,
}

impl TextureCache {
    pub fn get_or_create(
        &mut self,
        pattern: DiePattern,
        color: DieColor,
        images: &mut Assets<Image>,
    ) -> Option<Handle<Image>> {
        if let Some(handle) = self.entries.get(&(pattern, color)) {
            return Some(handle.clone());
        }
        let raster = rasterize_pattern(pattern, color)?;
        debug!("Rasterized {} texture for {}", pattern.name(), color);
        let handle = images.add(to_bevy_image(&raster, pattern::repeats(pattern)));
        self.entries.insert((pattern, color), handle.clone());
        Some(handle)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
