//! Surface appearance of scene parts.

use glam::Vec3;

/// How a part reacts to the scene lights.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Shading {
    /// Ambient plus directional diffuse, with a roughness-scaled highlight.
    Lit,
    /// Flat colour, unaffected by lights (stars, eyes).
    Unlit,
}

/// Colour and shading model of a part. Colours are linear RGB.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Material {
    pub color: Vec3,
    pub roughness: f32,
    pub shading: Shading,
}

impl Material {
    /// Lit material from an sRGB hex colour such as `0xe0c878`.
    pub fn lit(hex: u32, roughness: f32) -> Self {
        Self {
            color: srgb_hex_to_linear(hex),
            roughness: roughness.clamp(0.0, 1.0),
            shading: Shading::Lit,
        }
    }

    /// Unlit material from an sRGB hex colour.
    pub fn unlit(hex: u32) -> Self {
        Self {
            color: srgb_hex_to_linear(hex),
            roughness: 1.0,
            shading: Shading::Unlit,
        }
    }
}

/// Convert one sRGB-encoded channel in `[0, 1]` to linear.
pub fn srgb_to_linear(c: f32) -> f32 {
    if c <= 0.04045 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

/// Decode a `0xRRGGBB` sRGB colour into linear RGB.
pub fn srgb_hex_to_linear(hex: u32) -> Vec3 {
    let r = ((hex >> 16) & 0xff) as f32 / 255.0;
    let g = ((hex >> 8) & 0xff) as f32 / 255.0;
    let b = (hex & 0xff) as f32 / 255.0;
    Vec3::new(srgb_to_linear(r), srgb_to_linear(g), srgb_to_linear(b))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_extremes() {
        assert_eq!(srgb_hex_to_linear(0x000000), Vec3::ZERO);
        assert!((srgb_hex_to_linear(0xffffff) - Vec3::ONE).length() < 1e-6);
    }

    #[test]
    fn test_channel_order() {
        let c = srgb_hex_to_linear(0xff0000);
        assert!(c.x > 0.99 && c.y == 0.0 && c.z == 0.0);
    }

    #[test]
    fn test_midtone_darkens() {
        // sRGB 0.5 is about 0.214 linear.
        let l = srgb_to_linear(0.5);
        assert!((l - 0.214).abs() < 0.001);
    }

    #[test]
    fn test_roughness_clamped() {
        assert_eq!(Material::lit(0xffffff, 2.0).roughness, 1.0);
        assert_eq!(Material::unlit(0xffffff).shading, Shading::Unlit);
    }
}
