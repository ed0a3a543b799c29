//! Exclusive, bounds-checked access windows over a buffer source.
//!
//! A [`PixelView`] is the only valid accessor of its source's pixels from
//! open to close. All address arithmetic is confined to this module: pixel
//! `(x, y)` lives at linear offset `y * stride + x` within the working
//! window, and every public accessor validates its coordinates before
//! touching memory.

use alloc::vec::Vec;

use crate::error::AccessError;
use crate::layout::{self, AccessMode, PixelLayout};
use crate::rect::Rect;
use crate::source::{BufferSource, ViewGrant};

/// One open access window onto a buffer source.
///
/// Created by [`PixelView::open`], which acquires the source's single view
/// slot; dropped or explicitly [`close`](PixelView::close)d, which releases
/// it. Release is guaranteed on every exit path: an early return or panic
/// unwinding through the owning scope still runs `Drop`, which commits the
/// window (for ReadWrite views) and clears the source's open flag, so a
/// buffer is never left permanently locked.
pub struct PixelView<'s> {
    source: &'s dyn BufferSource,
    grant: Option<ViewGrant>,
    width: i32,
    height: i32,
    stride: usize,
    mode: AccessMode,
    layout: PixelLayout,
}

impl<'s> PixelView<'s> {
    /// Open a view over `rect` of `source` (the full buffer when `None`),
    /// in the given access mode and working layout (straight alpha when
    /// `None`).
    ///
    /// # Errors
    ///
    /// - [`AccessError::UnsupportedFormat`] when the source's native depth
    ///   is not 32 bits per pixel.
    /// - [`AccessError::AlreadyLocked`] when the source already has an open
    ///   view.
    /// - [`AccessError::OutOfBounds`] when `rect` is empty or exceeds the
    ///   source's bounds.
    pub fn open(
        source: &'s dyn BufferSource,
        rect: Option<Rect>,
        mode: AccessMode,
        layout: Option<PixelLayout>,
    ) -> Result<Self, AccessError> {
        if source.native_depth() != 32 {
            return Err(AccessError::UnsupportedFormat);
        }
        let rect = rect.unwrap_or_else(|| source.bounds());
        let layout = layout.unwrap_or(PixelLayout::StraightAlpha32);
        let grant = source.open_view(rect, mode, layout)?;
        let width = grant.width() as i32;
        let height = grant.height() as i32;
        let stride = grant.stride();
        Ok(Self {
            source,
            grant: Some(grant),
            width,
            height,
            stride,
            mode,
            layout,
        })
    }

    /// Close the view, committing changes for ReadWrite views and releasing
    /// the source's view slot. Prefer this over dropping when the caller
    /// needs to observe adapter errors.
    ///
    /// # Errors
    ///
    /// Propagates the adapter's [`close_view`](BufferSource::close_view)
    /// error.
    pub fn close(mut self) -> Result<(), AccessError> {
        match self.grant.take() {
            Some(grant) => self.source.close_view(grant),
            None => Err(AccessError::NotLocked),
        }
    }

    /// Width of the opened rectangle in pixels.
    #[inline]
    pub fn width(&self) -> i32 {
        self.width
    }

    /// Height of the opened rectangle in pixels.
    #[inline]
    pub fn height(&self) -> i32 {
        self.height
    }

    /// Distance in pixels between the starts of consecutive rows. May
    /// exceed [`width`](Self::width) when the backing store pads rows.
    #[inline]
    pub fn stride(&self) -> usize {
        self.stride
    }

    /// Access mode the view was opened in.
    #[inline]
    pub fn mode(&self) -> AccessMode {
        self.mode
    }

    /// Working pixel layout.
    #[inline]
    pub fn layout(&self) -> PixelLayout {
        self.layout
    }

    /// View bounds in view space: `(0, 0, width, height)`.
    #[inline]
    pub fn bounds(&self) -> Rect {
        Rect::of_size(self.width, self.height)
    }

    pub(crate) fn source_ref(&self) -> &'s dyn BufferSource {
        self.source
    }

    fn grant_ref(&self) -> Result<&ViewGrant, AccessError> {
        self.grant.as_ref().ok_or(AccessError::NotLocked)
    }

    fn grant_mut(&mut self) -> Result<&mut ViewGrant, AccessError> {
        self.grant.as_mut().ok_or(AccessError::NotLocked)
    }

    #[inline]
    fn check_coords(&self, x: i32, y: i32) -> Result<usize, AccessError> {
        if x < 0 || x >= self.width || y < 0 || y >= self.height {
            return Err(AccessError::OutOfBounds);
        }
        Ok(y as usize * self.stride + x as usize)
    }

    /// Raw 32-bit pixel at `(x, y)`.
    ///
    /// # Errors
    ///
    /// [`AccessError::OutOfBounds`] when `x` or `y` falls outside
    /// `[0, width)` / `[0, height)`.
    pub fn pixel(&self, x: i32, y: i32) -> Result<u32, AccessError> {
        let offset = self.check_coords(x, y)?;
        Ok(self.grant_ref()?.data()[offset])
    }

    /// Raw pixel at a flat linear index over the whole working window,
    /// row padding included.
    ///
    /// # Errors
    ///
    /// [`AccessError::OutOfBounds`] when `index >= height * stride`.
    pub fn pixel_at(&self, index: usize) -> Result<u32, AccessError> {
        let grant = self.grant_ref()?;
        grant
            .data()
            .get(index)
            .copied()
            .ok_or(AccessError::OutOfBounds)
    }

    /// Write the pixel at `(x, y)`. The write is immediate within the
    /// window and reaches the backing buffer when the view closes.
    ///
    /// # Errors
    ///
    /// Same bounds contract as [`pixel`](Self::pixel).
    pub fn set_pixel(&mut self, x: i32, y: i32, color: u32) -> Result<(), AccessError> {
        let offset = self.check_coords(x, y)?;
        self.grant_mut()?.data_mut()[offset] = color;
        Ok(())
    }

    /// Write the pixel at a flat linear index (see
    /// [`pixel_at`](Self::pixel_at)).
    ///
    /// # Errors
    ///
    /// [`AccessError::OutOfBounds`] when `index >= height * stride`.
    pub fn set_pixel_at(&mut self, index: usize, color: u32) -> Result<(), AccessError> {
        let slot = self
            .grant_mut()?
            .data_mut()
            .get_mut(index)
            .ok_or(AccessError::OutOfBounds)?;
        *slot = color;
        Ok(())
    }

    /// Set every pixel in the view's rectangle to `color`.
    ///
    /// Colors whose four bytes are all equal take the memset-style path
    /// over the whole contiguous window when `stride == width`; everything
    /// else is a batched per-row 32-bit fill. Both paths produce identical
    /// contents.
    pub fn fill(&mut self, color: u32) {
        let width = self.width as usize;
        let height = self.height;
        let Ok(grant) = self.grant_mut() else {
            return;
        };
        if layout::uniform_byte_pattern(color) && grant.stride() == width {
            grant.data_mut().fill(color);
            return;
        }
        for y in 0..height {
            grant.row_mut(y as u32).fill(color);
        }
    }

    /// Fill `rect ∩ bounds` with `color`. An empty intersection is a no-op.
    pub fn fill_region(&mut self, rect: Rect, color: u32) {
        let clipped = rect.intersect(&self.bounds());
        if clipped.is_empty() {
            return;
        }
        let stride = self.stride;
        let Ok(grant) = self.grant_mut() else {
            return;
        };
        let data = grant.data_mut();
        for y in clipped.y..clipped.bottom() {
            let start = y as usize * stride + clipped.x as usize;
            data[start..start + clipped.width as usize].fill(color);
        }
    }

    /// Bulk-load a row-major flat sequence of exactly `width * height`
    /// pixels. With `skip_zero`, entries equal to 0 leave the destination
    /// pixel untouched (sparse overlay onto existing content).
    ///
    /// # Errors
    ///
    /// [`AccessError::LengthMismatch`] when `values.len()` differs from the
    /// view's pixel count; nothing is written in that case.
    pub fn load_linear(&mut self, values: &[u32], skip_zero: bool) -> Result<(), AccessError> {
        let w = self.width as usize;
        let h = self.height as usize;
        if values.len() != w * h {
            return Err(AccessError::LengthMismatch);
        }
        let grant = self.grant_mut()?;
        for y in 0..h {
            let src = &values[y * w..(y + 1) * w];
            let dst = grant.row_mut(y as u32);
            if skip_zero {
                for (d, &s) in dst.iter_mut().zip(src) {
                    if s != 0 {
                        *d = s;
                    }
                }
            } else {
                dst.copy_from_slice(src);
            }
        }
        Ok(())
    }

    /// Materialize the opened rectangle as a flat row-major sequence of
    /// exactly `width * height` pixels, compacting any row padding away.
    pub fn to_linear(&self) -> Vec<u32> {
        let Ok(grant) = self.grant_ref() else {
            return Vec::new();
        };
        let w = self.width as usize;
        let h = self.height as usize;
        let mut out = Vec::with_capacity(w * h);
        for y in 0..h {
            out.extend_from_slice(grant.row(y as u32));
        }
        out
    }

    /// Pixels of view row `y`, exactly `width` long.
    ///
    /// # Errors
    ///
    /// [`AccessError::OutOfBounds`] when `y` is outside `[0, height)`.
    pub fn row(&self, y: i32) -> Result<&[u32], AccessError> {
        if y < 0 || y >= self.height {
            return Err(AccessError::OutOfBounds);
        }
        Ok(self.grant_ref()?.row(y as u32))
    }

    pub(crate) fn write_span(&mut self, x: i32, y: i32, pixels: &[u32]) {
        debug_assert!(self.bounds().contains(x, y));
        debug_assert!(x as usize + pixels.len() <= self.width as usize);
        let stride = self.stride;
        if let Ok(grant) = self.grant_mut() {
            let start = y as usize * stride + x as usize;
            grant.data_mut()[start..start + pixels.len()].copy_from_slice(pixels);
        }
    }
}

impl Drop for PixelView<'_> {
    fn drop(&mut self) {
        if let Some(grant) = self.grant.take() {
            // Guaranteed release: commit (or discard, for ReadOnly) and
            // clear the source's open flag on every exit path.
            let _ = self.source.close_view(grant);
        }
    }
}

impl core::fmt::Debug for PixelView<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(
            f,
            "PixelView({}x{}, stride {}, {:?} {:?})",
            self.width, self.height, self.stride, self.mode, self.layout
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemorySource;
    use alloc::vec;

    fn open_full(src: &MemorySource) -> PixelView<'_> {
        PixelView::open(src, None, AccessMode::ReadWrite, None).unwrap()
    }

    /// Source whose native depth is not 32 bits per pixel.
    struct Depth24;

    impl BufferSource for Depth24 {
        fn width(&self) -> u32 {
            4
        }
        fn height(&self) -> u32 {
            4
        }
        fn native_depth(&self) -> u32 {
            24
        }
        fn open_view(
            &self,
            _rect: Rect,
            _mode: AccessMode,
            _layout: PixelLayout,
        ) -> Result<ViewGrant, AccessError> {
            Err(AccessError::UnsupportedFormat)
        }
        fn close_view(&self, _grant: ViewGrant) -> Result<(), AccessError> {
            Err(AccessError::NotLocked)
        }
    }

    // --- open/close lifecycle ---

    #[test]
    fn open_defaults_to_full_bounds() {
        let src = MemorySource::with_stride(5, 3, 8);
        let view = open_full(&src);
        assert_eq!(view.width(), 5);
        assert_eq!(view.height(), 3);
        assert_eq!(view.stride(), 8);
        assert_eq!(view.layout(), PixelLayout::StraightAlpha32);
        assert_eq!(view.bounds(), Rect::of_size(5, 3));
        view.close().unwrap();
    }

    #[test]
    fn second_open_fails_already_locked() {
        let src = MemorySource::new(4, 4);
        let view = open_full(&src);
        assert_eq!(
            PixelView::open(&src, None, AccessMode::ReadOnly, None).unwrap_err(),
            AccessError::AlreadyLocked
        );
        view.close().unwrap();
        // Released: open succeeds again.
        open_full(&src).close().unwrap();
    }

    #[test]
    fn non_32bpp_source_is_rejected() {
        let src = Depth24;
        assert_eq!(
            PixelView::open(&src, None, AccessMode::ReadOnly, None).unwrap_err(),
            AccessError::UnsupportedFormat
        );
    }

    #[test]
    fn drop_releases_and_commits() {
        let src = MemorySource::new(2, 2);
        {
            let mut view = open_full(&src);
            view.set_pixel(1, 1, 0xFF00_FF00).unwrap();
            // No explicit close: Drop must commit and unlock.
        }
        assert!(!src.is_locked());
        let view = PixelView::open(&src, None, AccessMode::ReadOnly, None).unwrap();
        assert_eq!(view.pixel(1, 1).unwrap(), 0xFF00_FF00);
    }

    #[test]
    fn drop_releases_on_unwind() {
        let src = MemorySource::new(2, 2);
        let result = std::panic::catch_unwind(core::panic::AssertUnwindSafe(|| {
            let _view = open_full(&src);
            panic!("operation failed mid-view");
        }));
        assert!(result.is_err());
        assert!(!src.is_locked());
    }

    #[test]
    fn readonly_view_discards_writes() {
        let src = MemorySource::new(2, 1);
        let mut view = PixelView::open(&src, None, AccessMode::ReadOnly, None).unwrap();
        view.set_pixel(0, 0, 0xAAAA_AAAA).unwrap();
        // Visible while open...
        assert_eq!(view.pixel(0, 0).unwrap(), 0xAAAA_AAAA);
        view.close().unwrap();
        // ...but not committed.
        let view = PixelView::open(&src, None, AccessMode::ReadOnly, None).unwrap();
        assert_eq!(view.pixel(0, 0).unwrap(), 0);
    }

    // --- get/set and bounds ---

    #[test]
    fn set_get_roundtrip_every_pixel() {
        let src = MemorySource::with_stride(4, 3, 6);
        let mut view = open_full(&src);
        for y in 0..3 {
            for x in 0..4 {
                let c = 0xFF00_0000 | (x as u32) << 8 | y as u32;
                view.set_pixel(x, y, c).unwrap();
                assert_eq!(view.pixel(x, y).unwrap(), c);
            }
        }
    }

    #[test]
    fn edge_coordinates() {
        let src = MemorySource::new(4, 3);
        let mut view = open_full(&src);
        // Last valid pixel succeeds.
        view.set_pixel(3, 2, 1).unwrap();
        assert_eq!(view.pixel(3, 2).unwrap(), 1);
        // One past the max fails on either axis.
        assert_eq!(view.pixel(4, 0).unwrap_err(), AccessError::OutOfBounds);
        assert_eq!(view.pixel(0, 3).unwrap_err(), AccessError::OutOfBounds);
        assert_eq!(view.set_pixel(4, 2, 0).unwrap_err(), AccessError::OutOfBounds);
        assert_eq!(view.set_pixel(-1, 0, 0).unwrap_err(), AccessError::OutOfBounds);
        assert_eq!(view.pixel(0, -1).unwrap_err(), AccessError::OutOfBounds);
    }

    #[test]
    fn linear_index_covers_padding() {
        let src = MemorySource::with_stride(3, 2, 5);
        let mut view = open_full(&src);
        // Flat window is height * stride = 10 cells; padding is addressable.
        view.set_pixel_at(3, 0x1111_1111).unwrap();
        assert_eq!(view.pixel_at(3).unwrap(), 0x1111_1111);
        view.set_pixel_at(9, 0x2222_2222).unwrap();
        assert_eq!(view.pixel_at(9).unwrap(), 0x2222_2222);
        assert_eq!(view.pixel_at(10).unwrap_err(), AccessError::OutOfBounds);
        assert_eq!(
            view.set_pixel_at(10, 0).unwrap_err(),
            AccessError::OutOfBounds
        );
        // Linear offset y * stride + x matches the 2-D accessor.
        view.set_pixel(2, 1, 0x3333_3333).unwrap();
        assert_eq!(view.pixel_at(5 + 2).unwrap(), 0x3333_3333);
    }

    // --- fill ---

    #[test]
    fn fill_uniform_and_non_uniform_colors() {
        for color in [0xFFFF_FFFFu32, 0x0000_0000, 0xABAB_ABAB, 0xFF11_2233] {
            // Tight stride: uniform colors take the contiguous path.
            let tight = MemorySource::new(4, 4);
            let mut view = open_full(&tight);
            view.fill(color);
            for y in 0..4 {
                for x in 0..4 {
                    assert_eq!(view.pixel(x, y).unwrap(), color, "tight ({x}, {y})");
                }
            }
            drop(view);

            // Padded stride: must go row by row.
            let padded = MemorySource::with_stride(4, 4, 7);
            let mut view = open_full(&padded);
            view.fill(color);
            for y in 0..4 {
                for x in 0..4 {
                    assert_eq!(view.pixel(x, y).unwrap(), color, "padded ({x}, {y})");
                }
            }
        }
    }

    #[test]
    fn fill_commits_through_close() {
        let src = MemorySource::new(2, 2);
        let mut view = open_full(&src);
        view.fill(0xDEAD_BEEF);
        view.close().unwrap();
        assert!(src.to_image().buf().iter().all(|&p| p == 0xDEAD_BEEF));
    }

    #[test]
    fn fill_region_clips_to_bounds() {
        let src = MemorySource::new(4, 4);
        let mut view = open_full(&src);
        view.fill_region(Rect::new(2, 2, 10, 10), 7);
        for y in 0..4 {
            for x in 0..4 {
                let expect = if x >= 2 && y >= 2 { 7 } else { 0 };
                assert_eq!(view.pixel(x, y).unwrap(), expect, "pixel ({x}, {y})");
            }
        }
    }

    #[test]
    fn fill_region_outside_bounds_is_noop() {
        let src = MemorySource::new(4, 4);
        let mut view = open_full(&src);
        view.fill_region(Rect::new(-10, -10, 5, 5), 7);
        view.fill_region(Rect::new(4, 0, 2, 2), 7);
        view.fill_region(Rect::new(0, 0, 0, 4), 7);
        assert!(view.to_linear().iter().all(|&p| p == 0));
    }

    // --- bulk load and materialize ---

    #[test]
    fn load_linear_length_must_match() {
        let src = MemorySource::new(3, 2);
        let mut view = open_full(&src);
        assert_eq!(
            view.load_linear(&[0u32; 5], false).unwrap_err(),
            AccessError::LengthMismatch
        );
        assert_eq!(
            view.load_linear(&[0u32; 7], false).unwrap_err(),
            AccessError::LengthMismatch
        );
        view.load_linear(&[1u32; 6], false).unwrap();
        assert_eq!(view.pixel(2, 1).unwrap(), 1);
    }

    #[test]
    fn load_linear_skip_zero_overlays() {
        let src = MemorySource::new(3, 1);
        let mut view = open_full(&src);
        view.load_linear(&[10, 20, 30], false).unwrap();
        view.load_linear(&[0, 99, 0], true).unwrap();
        assert_eq!(view.to_linear(), vec![10, 99, 30]);
        // Without skip_zero the zeros clear.
        view.load_linear(&[0, 99, 0], false).unwrap();
        assert_eq!(view.to_linear(), vec![0, 99, 0]);
    }

    #[test]
    fn to_linear_compacts_padded_rows() {
        let src = MemorySource::with_stride(3, 2, 5);
        let mut view = open_full(&src);
        view.load_linear(&[1, 2, 3, 4, 5, 6], false).unwrap();
        let flat = view.to_linear();
        assert_eq!(flat.len(), 6);
        assert_eq!(flat, vec![1, 2, 3, 4, 5, 6]);
    }

    #[test]
    fn linear_roundtrip_reproduces_content() {
        let src = MemorySource::with_stride(4, 3, 6);
        let mut view = open_full(&src);
        for i in 0..12usize {
            view.set_pixel(i as i32 % 4, i as i32 / 4, 0x1000 + i as u32)
                .unwrap();
        }
        let flat = view.to_linear();
        view.close().unwrap();

        let other = MemorySource::new(4, 3);
        let mut fresh = open_full(&other);
        fresh.load_linear(&flat, false).unwrap();
        assert_eq!(fresh.to_linear(), flat);
    }
}
