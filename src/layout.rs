//! Pixel layout and access mode descriptors, plus the byte-level
//! conversions adapters apply when a view is opened or closed.
//!
//! Every view is 32 bits per pixel; the layout determines only how an
//! adapter interprets and re-encodes those bytes at the open/close boundary,
//! never the addressing math. Pixels are packed `0xAARRGGBB` words.

use rgb::alt::ARGB;

/// Interpretation of a view's 32-bit pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[non_exhaustive]
#[repr(u8)]
pub enum PixelLayout {
    /// Straight (unassociated) alpha, `0xAARRGGBB`.
    StraightAlpha32 = 0,
    /// Premultiplied (associated) alpha, `0xAARRGGBB` with color channels
    /// scaled by alpha.
    PremultipliedAlpha32 = 1,
    /// No alpha: the high byte is meaningless and reads back as `0xFF`.
    NoAlpha32 = 2,
}

impl PixelLayout {
    /// Whether this layout carries a meaningful alpha channel.
    #[inline]
    pub const fn has_alpha(self) -> bool {
        !matches!(self, Self::NoAlpha32)
    }

    /// Whether color channels are stored premultiplied by alpha.
    #[inline]
    pub const fn is_premultiplied(self) -> bool {
        matches!(self, Self::PremultipliedAlpha32)
    }
}

/// Access mode requested when opening a view.
///
/// `ReadOnly` is permissive at the call surface: `set_pixel`/`fill` remain
/// callable and their effects are visible through the open view, but the
/// working region is discarded at close instead of committed. Only
/// `ReadWrite` grants write back to the source.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum AccessMode {
    /// Changes are discarded at close.
    ReadOnly = 0,
    /// Changes are committed to the source at close.
    ReadWrite = 1,
}

impl AccessMode {
    /// Whether a grant in this mode commits at close.
    #[inline]
    pub const fn is_writable(self) -> bool {
        matches!(self, Self::ReadWrite)
    }
}

/// True when all four bytes of `color` are numerically equal.
///
/// Such colors are eligible for the memset-style bulk fill path: the byte
/// pattern is position-independent, so a contiguous region can be filled
/// without regard to pixel boundaries.
#[inline]
pub const fn uniform_byte_pattern(color: u32) -> bool {
    (color & 0xFF).wrapping_mul(0x0101_0101) == color
}

#[inline]
const fn unpack(pixel: u32) -> ARGB<u8> {
    ARGB {
        a: (pixel >> 24) as u8,
        r: (pixel >> 16) as u8,
        g: (pixel >> 8) as u8,
        b: pixel as u8,
    }
}

#[inline]
const fn pack(px: ARGB<u8>) -> u32 {
    ((px.a as u32) << 24) | ((px.r as u32) << 16) | ((px.g as u32) << 8) | (px.b as u32)
}

/// Rounded `c * a / 255`.
#[inline]
const fn premul(c: u8, a: u8) -> u8 {
    ((c as u16 * a as u16 + 127) / 255) as u8
}

/// Saturating `c * 255 / a`; alpha 0 maps to 0.
#[inline]
const fn unpremul(c: u8, a: u8) -> u8 {
    if a == 0 {
        return 0;
    }
    let v = (c as u16 * 255 + (a as u16) / 2) / a as u16;
    if v > 255 { 255 } else { v as u8 }
}

/// Convert one native straight-alpha pixel to the working `layout`.
pub const fn to_working(pixel: u32, layout: PixelLayout) -> u32 {
    match layout {
        PixelLayout::StraightAlpha32 => pixel,
        PixelLayout::PremultipliedAlpha32 => {
            let px = unpack(pixel);
            pack(ARGB {
                a: px.a,
                r: premul(px.r, px.a),
                g: premul(px.g, px.a),
                b: premul(px.b, px.a),
            })
        }
        PixelLayout::NoAlpha32 => pixel | 0xFF00_0000,
    }
}

/// Convert one working-`layout` pixel back to native straight alpha.
pub const fn to_native(pixel: u32, layout: PixelLayout) -> u32 {
    match layout {
        PixelLayout::StraightAlpha32 => pixel,
        PixelLayout::PremultipliedAlpha32 => {
            let px = unpack(pixel);
            pack(ARGB {
                a: px.a,
                r: unpremul(px.r, px.a),
                g: unpremul(px.g, px.a),
                b: unpremul(px.b, px.a),
            })
        }
        PixelLayout::NoAlpha32 => pixel | 0xFF00_0000,
    }
}

/// Convert a run of native pixels to the working layout in place.
pub fn convert_to_working(pixels: &mut [u32], layout: PixelLayout) {
    if matches!(layout, PixelLayout::StraightAlpha32) {
        return;
    }
    for px in pixels {
        *px = to_working(*px, layout);
    }
}

/// Convert a run of working pixels back to native layout in place.
pub fn convert_to_native(pixels: &mut [u32], layout: PixelLayout) {
    if matches!(layout, PixelLayout::StraightAlpha32) {
        return;
    }
    for px in pixels {
        *px = to_native(*px, layout);
    }
}
