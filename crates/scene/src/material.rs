//! Surface appearance descriptors.

/// Linear RGB colour with components in `0.0..=1.0`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Color {
    pub const BLACK: Color = Color::new(0.0, 0.0, 0.0);
    pub const WHITE: Color = Color::new(1.0, 1.0, 1.0);

    /// Create a colour from float components.
    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    /// Create a colour from a packed `0xRRGGBB` value.
    pub fn from_hex(hex: u32) -> Self {
        Self {
            r: ((hex >> 16) & 0xff) as f32 / 255.0,
            g: ((hex >> 8) & 0xff) as f32 / 255.0,
            b: (hex & 0xff) as f32 / 255.0,
        }
    }

    /// Pack into an opaque `0xAARRGGBB` pixel, clamping each channel.
    pub fn to_argb(self) -> u32 {
        let channel = |c: f32| (c.clamp(0.0, 1.0) * 255.0 + 0.5) as u32;
        0xff00_0000 | (channel(self.r) << 16) | (channel(self.g) << 8) | channel(self.b)
    }
}

/// How a drawable's surface is coloured.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Material {
    /// Colour derived from the view-space surface normal (`n * 0.5 + 0.5`)
    Normal,
    /// Unlit flat colour
    Basic { color: Color },
}

impl Material {
    /// Flat colour material from a packed `0xRRGGBB` value.
    pub fn basic(hex: u32) -> Self {
        Material::Basic {
            color: Color::from_hex(hex),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_hex() {
        assert_eq!(Color::from_hex(0x00ff00), Color::new(0.0, 1.0, 0.0));
        assert_eq!(Color::from_hex(0xffffff), Color::WHITE);
        assert_eq!(Color::from_hex(0x000000), Color::BLACK);
    }

    #[test]
    fn test_to_argb_round_trips_hex() {
        for hex in [0x00ff00, 0x123456, 0xabcdef] {
            assert_eq!(Color::from_hex(hex).to_argb(), 0xff00_0000 | hex);
        }
    }

    #[test]
    fn test_to_argb_clamps() {
        assert_eq!(Color::new(2.0, -1.0, 0.5).to_argb(), 0xffff_0080);
    }

    #[test]
    fn test_basic_material() {
        assert_eq!(
            Material::basic(0x00ff00),
            Material::Basic {
                color: Color::new(0.0, 1.0, 0.0)
            }
        );
    }
}
