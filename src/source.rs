//! The buffer source adapter contract and the working region it grants.
//!
//! A buffer source is the storage collaborator behind a [`PixelView`]:
//! anything that can report its dimensions and pixel depth, grant one
//! exclusive working region over a rectangle of its memory, and accept that
//! region back. Allocation, file formats, and rendering live entirely on the
//! adapter's side of this trait.
//!
//! [`PixelView`]: crate::PixelView

use alloc::vec::Vec;
use core::fmt;

use crate::error::AccessError;
use crate::layout::{AccessMode, PixelLayout};
use crate::rect::Rect;

/// Contract implemented by each backing-buffer type.
///
/// Methods take `&self`: a [`PixelView`](crate::PixelView) keeps a shared
/// reference to its source for its whole lifetime (it must reach the source
/// again at close), so adapters track the single open flag and their pixel
/// store with interior mutability. The flag is a programming-error guard for
/// one logical owner per buffer, not a concurrency primitive; genuinely
/// concurrent callers must provide their own external mutual exclusion.
pub trait BufferSource {
    /// Buffer width in pixels.
    fn width(&self) -> u32;

    /// Buffer height in pixels.
    fn height(&self) -> u32;

    /// Native pixel depth in bits per pixel. Must report 32 to be eligible
    /// for views.
    fn native_depth(&self) -> u32;

    /// Full-buffer bounds as a rectangle at the origin.
    fn bounds(&self) -> Rect {
        Rect::of_size(self.width() as i32, self.height() as i32)
    }

    /// Grant exclusive access to `rect`, converted to the requested layout.
    ///
    /// # Errors
    ///
    /// - [`AccessError::AlreadyLocked`] if a view is already open.
    /// - [`AccessError::OutOfBounds`] if `rect` is empty or not contained in
    ///   the buffer's bounds.
    fn open_view(
        &self,
        rect: Rect,
        mode: AccessMode,
        layout: PixelLayout,
    ) -> Result<ViewGrant, AccessError>;

    /// Take a grant back, committing it for ReadWrite grants (converting the
    /// working layout to the native representation) and discarding it for
    /// ReadOnly grants, then clear the open flag.
    ///
    /// # Errors
    ///
    /// Returns [`AccessError::NotLocked`] when no view is open. Adapters
    /// should reject a grant they could not have issued (mismatched stride
    /// or out-of-bounds rect) with [`AccessError::OutOfBounds`] instead of
    /// committing it, leaving the open flag set for the real grant.
    fn close_view(&self, grant: ViewGrant) -> Result<(), AccessError>;
}

/// The exclusive working region granted by [`BufferSource::open_view`].
///
/// Row-major pixels in the grant's working layout. The window is
/// `stride * height` pixels long; `stride` may exceed `width` when the
/// backing store pads rows, and the padding cells between `width` and
/// `stride` are addressable (their contents are unspecified but stable
/// while the grant is open). Pixel `(x, y)` lives at `y * stride + x`.
pub struct ViewGrant {
    data: Vec<u32>,
    width: u32,
    height: u32,
    stride: usize,
    rect: Rect,
    mode: AccessMode,
    layout: PixelLayout,
}

impl ViewGrant {
    /// Assemble a grant. Called by adapters from `open_view`.
    ///
    /// # Panics
    ///
    /// Panics if `stride < width` or `data.len() != stride * height`;
    /// grant geometry violations are adapter bugs.
    pub fn new(
        data: Vec<u32>,
        width: u32,
        height: u32,
        stride: usize,
        rect: Rect,
        mode: AccessMode,
        layout: PixelLayout,
    ) -> Self {
        assert!(
            stride >= width as usize,
            "stride {stride} smaller than width {width}"
        );
        assert_eq!(
            data.len(),
            stride * height as usize,
            "grant data length does not cover stride * height"
        );
        Self {
            data,
            width,
            height,
            stride,
            rect,
            mode,
            layout,
        }
    }

    /// Width of the opened rectangle in pixels.
    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height of the opened rectangle in pixels.
    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Distance in pixels between the starts of consecutive rows.
    #[inline]
    pub fn stride(&self) -> usize {
        self.stride
    }

    /// The opened rectangle in the backing buffer's coordinate space.
    #[inline]
    pub fn rect(&self) -> Rect {
        self.rect
    }

    /// Access mode the grant was opened in.
    #[inline]
    pub fn mode(&self) -> AccessMode {
        self.mode
    }

    /// Working pixel layout.
    #[inline]
    pub fn layout(&self) -> PixelLayout {
        self.layout
    }

    /// The whole working window, `stride * height` pixels.
    #[inline]
    pub fn data(&self) -> &[u32] {
        &self.data
    }

    /// Mutable access to the whole working window.
    #[inline]
    pub fn data_mut(&mut self) -> &mut [u32] {
        &mut self.data
    }

    /// Pixels of row `y`, exactly `width` long (padding excluded).
    ///
    /// # Panics
    ///
    /// Panics if `y >= height`.
    #[inline]
    pub fn row(&self, y: u32) -> &[u32] {
        assert!(
            y < self.height,
            "row index {y} out of bounds (height: {})",
            self.height
        );
        let start = y as usize * self.stride;
        &self.data[start..start + self.width as usize]
    }

    /// Mutable pixels of row `y`, exactly `width` long.
    ///
    /// # Panics
    ///
    /// Panics if `y >= height`.
    #[inline]
    pub fn row_mut(&mut self, y: u32) -> &mut [u32] {
        assert!(
            y < self.height,
            "row index {y} out of bounds (height: {})",
            self.height
        );
        let start = y as usize * self.stride;
        &mut self.data[start..start + self.width as usize]
    }

    /// Consume the grant and return the working window.
    pub fn into_data(self) -> Vec<u32> {
        self.data
    }
}

impl fmt::Debug for ViewGrant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "ViewGrant({}x{}, stride {}, {:?} {:?})",
            self.width, self.height, self.stride, self.mode, self.layout
        )
    }
}
