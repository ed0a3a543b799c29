//! Error taxonomy for view and copy operations.

use core::fmt;

/// Errors from opening, closing, and operating on pixel views.
///
/// All failures are local and synchronous: nothing is retried and nothing is
/// swallowed, except the documented no-op cases in the region copier
/// (non-overlapping or degenerate geometry) and the sparse-overlay skip in
/// [`PixelView::load_linear`](crate::PixelView::load_linear).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[non_exhaustive]
pub enum AccessError {
    /// A view is already open on this buffer source.
    AlreadyLocked,
    /// No view is open on this buffer source.
    NotLocked,
    /// Coordinate or linear index outside the view's addressable range,
    /// or a requested rectangle the source cannot service.
    OutOfBounds,
    /// The source's native pixel depth is not 32 bits per pixel, or two
    /// buffers in a whole-buffer copy differ in pixel format.
    UnsupportedFormat,
    /// Region copy source and destination share the same backing buffer.
    SameBuffer,
    /// Bulk array load length does not match the view's pixel count, or a
    /// whole-buffer copy was attempted between differently sized buffers.
    LengthMismatch,
}

impl fmt::Display for AccessError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AlreadyLocked => write!(f, "a view is already open on this buffer"),
            Self::NotLocked => write!(f, "no view is open on this buffer"),
            Self::OutOfBounds => write!(f, "coordinate or index outside the addressable range"),
            Self::UnsupportedFormat => write!(f, "pixel format is not 32 bits per pixel"),
            Self::SameBuffer => write!(f, "copy source and destination share a backing buffer"),
            Self::LengthMismatch => write!(f, "length does not match the view's pixel count"),
        }
    }
}

impl core::error::Error for AccessError {}
