//! Region copies between independently strided buffers.
//!
//! The copier reconciles two rectangles given in their own coordinate
//! spaces, clips them against both buffers' bounds, and transfers the
//! surviving pixels row by row. Exploratory geometry that overlaps nothing
//! is a silent no-op; only aliasing (source and destination sharing one
//! backing buffer) is an error.

use imgref::ImgRef;

use crate::error::AccessError;
use crate::layout::AccessMode;
use crate::rect::Rect;
use crate::source::BufferSource;
use crate::view::PixelView;

/// One region-copy request: rectangles in the source's and destination's
/// own coordinate spaces. Either may have a negative origin or extend past
/// its buffer; clipping reconciles both sides.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CopySpec {
    /// Region to read, in source coordinates.
    pub source_rect: Rect,
    /// Region to write, in destination coordinates.
    pub dest_rect: Rect,
}

impl CopySpec {
    /// Create a copy request.
    #[inline]
    pub const fn new(source_rect: Rect, dest_rect: Rect) -> Self {
        Self {
            source_rect,
            dest_rect,
        }
    }
}

/// The surviving index ranges of a copy: pixel `(i, j)` transfers from
/// `(source_rect.x + i, source_rect.y + j)` to
/// `(dest_rect.x + i, dest_rect.y + j)` for `i` in `[i0, i1)`, `j` in
/// `[j0, j1)`.
struct MappedSpans {
    i0: i32,
    i1: i32,
    j0: i32,
    j1: i32,
}

/// Reconcile the copy geometry against both buffers' bounds.
///
/// A pixel transfers only when it is simultaneously in-bounds on the source
/// and destination side. Because the rectangles are axis-aligned and share
/// the translation `source origin → dest origin`, that per-pixel test
/// decomposes into one valid column range and one valid row range, so every
/// surviving row is a single contiguous span. Returns `None` when nothing
/// survives.
fn mapped_spans(spec: &CopySpec, src_bounds: Rect, dst_bounds: Rect) -> Option<MappedSpans> {
    let sr = spec.source_rect;
    let dr = spec.dest_rect;
    let copy_w = sr.width.min(dr.width);
    let copy_h = sr.height.min(dr.height);
    if copy_w <= 0 || copy_h <= 0 {
        return None;
    }
    // Saturating subtraction: rectangles near the i32 limits clip to
    // nothing rather than overflowing.
    let i0 = 0
        .max(src_bounds.x.saturating_sub(sr.x))
        .max(dst_bounds.x.saturating_sub(dr.x));
    let i1 = copy_w
        .min(src_bounds.right().saturating_sub(sr.x))
        .min(dst_bounds.right().saturating_sub(dr.x));
    let j0 = 0
        .max(src_bounds.y.saturating_sub(sr.y))
        .max(dst_bounds.y.saturating_sub(dr.y));
    let j1 = copy_h
        .min(src_bounds.bottom().saturating_sub(sr.y))
        .min(dst_bounds.bottom().saturating_sub(dr.y));
    if i0 >= i1 || j0 >= j1 {
        return None;
    }
    Some(MappedSpans { i0, i1, j0, j1 })
}

fn same_backing(a: &dyn BufferSource, b: &dyn BufferSource) -> bool {
    core::ptr::addr_eq(a as *const dyn BufferSource, b as *const dyn BufferSource)
}

/// Copy `spec.source_rect` of `source` into `spec.dest_rect` of the open
/// view `dest`.
///
/// Pixels transfer only where both sides are in-bounds; out-of-range
/// geometry (negative origins, off-canvas rectangles, degenerate sizes)
/// silently narrows the transfer, down to a no-op. A ReadOnly view of
/// `source` is opened for the duration of the copy.
///
/// # Errors
///
/// - [`AccessError::SameBuffer`] when `source` is the buffer underlying
///   `dest`, regardless of the rectangles.
/// - [`AccessError::AlreadyLocked`] when `source` has an open view.
/// - [`AccessError::UnsupportedFormat`] when `source` is not 32 bits per
///   pixel.
pub fn copy_region(
    source: &dyn BufferSource,
    dest: &mut PixelView<'_>,
    spec: CopySpec,
) -> Result<(), AccessError> {
    if same_backing(source, dest.source_ref()) {
        return Err(AccessError::SameBuffer);
    }
    let Some(spans) = mapped_spans(&spec, source.bounds(), dest.bounds()) else {
        return Ok(());
    };
    let sr = spec.source_rect;
    let dr = spec.dest_rect;
    let src_view = PixelView::open(source, None, AccessMode::ReadOnly, None)?;
    for j in spans.j0..spans.j1 {
        let row = src_view.row(sr.y + j)?;
        let span = &row[(sr.x + spans.i0) as usize..(sr.x + spans.i1) as usize];
        dest.write_span(dr.x + spans.i0, dr.y + j, span);
    }
    src_view.close()
}

/// Copy from an external readable buffer into the open view `dest`.
///
/// Same clipping semantics as [`copy_region`]; the source is a borrowed
/// [`ImgRef`] rather than a buffer source, so no lock is involved and
/// aliasing is impossible.
pub fn copy_image_region(dest: &mut PixelView<'_>, src: ImgRef<'_, u32>, spec: CopySpec) {
    let src_bounds = Rect::of_size(src.width() as i32, src.height() as i32);
    let Some(spans) = mapped_spans(&spec, src_bounds, dest.bounds()) else {
        return;
    };
    let sr = spec.source_rect;
    let dr = spec.dest_rect;
    let stride = src.stride();
    for j in spans.j0..spans.j1 {
        let start = (sr.y + j) as usize * stride + (sr.x + spans.i0) as usize;
        let span = &src.buf()[start..start + (spans.i1 - spans.i0) as usize];
        dest.write_span(dr.x + spans.i0, dr.y + j, span);
    }
}

/// Whole-buffer copy between two equally sized 32-bit buffers.
///
/// # Errors
///
/// - [`AccessError::SameBuffer`] when both arguments are the same buffer.
/// - [`AccessError::UnsupportedFormat`] when either buffer is not 32 bits
///   per pixel.
/// - [`AccessError::LengthMismatch`] when dimensions differ.
/// - Lock errors from either buffer propagate.
pub fn duplicate(source: &dyn BufferSource, dest: &dyn BufferSource) -> Result<(), AccessError> {
    if same_backing(source, dest) {
        return Err(AccessError::SameBuffer);
    }
    if source.native_depth() != 32 || dest.native_depth() != 32 {
        return Err(AccessError::UnsupportedFormat);
    }
    if source.width() != dest.width() || source.height() != dest.height() {
        return Err(AccessError::LengthMismatch);
    }
    let src_view = PixelView::open(source, None, AccessMode::ReadOnly, None)?;
    let mut dst_view = PixelView::open(dest, None, AccessMode::ReadWrite, None)?;
    for y in 0..src_view.height() {
        let row = src_view.row(y)?;
        dst_view.write_span(0, y, row);
    }
    src_view.close()?;
    dst_view.close()
}

/// Clear a whole buffer to a solid color.
///
/// # Errors
///
/// Propagates open/close errors from the buffer.
pub fn clear(buffer: &dyn BufferSource, color: u32) -> Result<(), AccessError> {
    let mut view = PixelView::open(buffer, None, AccessMode::ReadWrite, None)?;
    view.fill(color);
    view.close()
}

/// Region copy where the destination is a buffer source rather than an
/// already-open view; the destination view is opened and closed internally.
///
/// # Errors
///
/// Same as [`copy_region`], plus open/close errors from `dest`.
pub fn copy_region_between(
    source: &dyn BufferSource,
    dest: &dyn BufferSource,
    spec: CopySpec,
) -> Result<(), AccessError> {
    let mut dst_view = PixelView::open(dest, None, AccessMode::ReadWrite, None)?;
    copy_region(source, &mut dst_view, spec)?;
    dst_view.close()
}
