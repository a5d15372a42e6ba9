//! Colour type and hardware word conversion.

use std::fmt;

/// An RGBA colour value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Colour {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Colour {
    /// Create a new colour from RGBA components.
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Create a new opaque colour from RGB components.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Fully transparent colour.
    pub const TRANSPARENT: Self = Self::new(0, 0, 0, 0);

    /// Black.
    pub const BLACK: Self = Self::rgb(0, 0, 0);

    /// White.
    pub const WHITE: Self = Self::rgb(255, 255, 255);

    /// Convert to a BGR555 hardware word.
    ///
    /// Each channel is reduced to its upper 5 bits and packed as
    /// `0BBBBBGG GGGRRRRR`. Bit 15 is always zero; alpha is ignored.
    pub const fn to_bgr555(self) -> u16 {
        let r = (self.r >> 3) as u16;
        let g = (self.g >> 3) as u16;
        let b = (self.b >> 3) as u16;
        (b << 10) | (g << 5) | r
    }

    /// Check if the colour is fully transparent.
    pub fn is_transparent(self) -> bool {
        self.a == 0
    }

    /// Check if the colour is fully opaque.
    pub fn is_opaque(self) -> bool {
        self.a == 255
    }
}

impl fmt::Display for Colour {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.a == 255 {
            write!(f, "#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
        } else {
            write!(f, "#{:02X}{:02X}{:02X}{:02X}", self.r, self.g, self.b, self.a)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bgr555_extremes() {
        assert_eq!(Colour::WHITE.to_bgr555(), 0x7FFF);
        assert_eq!(Colour::BLACK.to_bgr555(), 0x0000);
    }

    #[test]
    fn test_bgr555_channel_packing() {
        // r=8 -> 1, g=16 -> 2, b=24 -> 3
        let c = Colour::rgb(8, 16, 24);
        assert_eq!(c.to_bgr555(), (3 << 10) | (2 << 5) | 1);
    }

    #[test]
    fn test_bgr555_drops_low_bits() {
        // Values within the same 8-wide bucket collapse to one word
        assert_eq!(
            Colour::rgb(248, 0, 0).to_bgr555(),
            Colour::rgb(255, 7, 7).to_bgr555()
        );
    }

    #[test]
    fn test_bgr555_bit_15_clear() {
        for c in [Colour::WHITE, Colour::rgb(255, 128, 64), Colour::rgb(0, 0, 255)] {
            assert_eq!(c.to_bgr555() & 0x8000, 0);
        }
    }

    #[test]
    fn test_bgr555_ignores_alpha() {
        let opaque = Colour::rgb(100, 150, 200);
        let translucent = Colour::new(100, 150, 200, 31);
        assert_eq!(opaque.to_bgr555(), translucent.to_bgr555());
    }

    #[test]
    fn test_display() {
        insta::assert_snapshot!(Colour::rgb(255, 0, 77).to_string(), @"#FF004D");
        assert_eq!(format!("{}", Colour::new(255, 0, 0, 128)), "#FF000080");
    }

    #[test]
    fn test_constants() {
        assert_eq!(Colour::BLACK, Colour::rgb(0, 0, 0));
        assert_eq!(Colour::WHITE, Colour::rgb(255, 255, 255));
        assert!(Colour::TRANSPARENT.is_transparent());
        assert!(Colour::BLACK.is_opaque());
    }
}
