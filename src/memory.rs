//! In-memory buffer source.
//!
//! The library treats storage as an external collaborator behind
//! [`BufferSource`]; this module ships the one concrete adapter most callers
//! and all the tests use: a heap-allocated, row-major `0xAARRGGBB` buffer
//! with an explicit (possibly padded) pixel stride.

use alloc::vec;
use alloc::vec::Vec;
use core::cell::{Cell, RefCell};
use core::fmt;

use imgref::ImgVec;

use crate::error::AccessError;
use crate::layout::{self, AccessMode, PixelLayout};
use crate::rect::Rect;
use crate::source::{BufferSource, ViewGrant};

/// Heap-backed 32-bit pixel buffer.
///
/// Native representation is straight alpha (`0xAARRGGBB`). Rows may be
/// padded: `stride` pixels separate consecutive row starts. The single
/// open-view flag lives in a [`Cell`], so opening and closing views needs
/// only a shared reference.
pub struct MemorySource {
    pixels: RefCell<Vec<u32>>,
    width: u32,
    height: u32,
    stride: usize,
    open: Cell<bool>,
}

impl MemorySource {
    /// Allocate a zeroed buffer with tightly packed rows.
    pub fn new(width: u32, height: u32) -> Self {
        Self::with_stride(width, height, width as usize)
    }

    /// Allocate a zeroed buffer whose rows start `stride` pixels apart.
    ///
    /// # Panics
    ///
    /// Panics if `stride < width`.
    pub fn with_stride(width: u32, height: u32, stride: usize) -> Self {
        assert!(
            stride >= width as usize,
            "stride {stride} smaller than width {width}"
        );
        Self {
            pixels: RefCell::new(vec![0u32; stride * height as usize]),
            width,
            height,
            stride,
            open: Cell::new(false),
        }
    }

    /// Adopt an existing image, keeping its stride.
    pub fn from_image(img: ImgVec<u32>) -> Self {
        let width = img.width() as u32;
        let height = img.height() as u32;
        let stride = img.stride();
        let mut buf = img.into_buf();
        // imgref permits the last row to stop at `width`; normalize to a
        // full stride * height window.
        buf.resize(stride * height as usize, 0);
        Self {
            pixels: RefCell::new(buf),
            width,
            height,
            stride,
            open: Cell::new(false),
        }
    }

    /// Row stride in pixels.
    #[inline]
    pub fn stride(&self) -> usize {
        self.stride
    }

    /// Whether a view is currently open.
    #[inline]
    pub fn is_locked(&self) -> bool {
        self.open.get()
    }

    /// Snapshot the buffer as an [`ImgVec`].
    pub fn to_image(&self) -> ImgVec<u32> {
        ImgVec::new_stride(
            self.pixels.borrow().clone(),
            self.width as usize,
            self.height as usize,
            self.stride,
        )
    }

    /// Consume the source and return the backing image.
    pub fn into_image(self) -> ImgVec<u32> {
        ImgVec::new_stride(
            self.pixels.into_inner(),
            self.width as usize,
            self.height as usize,
            self.stride,
        )
    }
}

impl fmt::Debug for MemorySource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "MemorySource({}x{}, stride {}, {})",
            self.width,
            self.height,
            self.stride,
            if self.open.get() { "locked" } else { "unlocked" }
        )
    }
}

impl BufferSource for MemorySource {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn native_depth(&self) -> u32 {
        32
    }

    fn open_view(
        &self,
        rect: Rect,
        mode: AccessMode,
        layout: PixelLayout,
    ) -> Result<ViewGrant, AccessError> {
        if self.open.get() {
            return Err(AccessError::AlreadyLocked);
        }
        if rect.is_empty() || !self.bounds().contains_rect(&rect) {
            return Err(AccessError::OutOfBounds);
        }
        let w = rect.width as usize;
        let h = rect.height as usize;
        let mut data = vec![0u32; self.stride * h];
        {
            let pixels = self.pixels.borrow();
            for y in 0..h {
                let src = (rect.y as usize + y) * self.stride + rect.x as usize;
                data[y * self.stride..y * self.stride + w]
                    .copy_from_slice(&pixels[src..src + w]);
            }
        }
        layout::convert_to_working(&mut data, layout);
        self.open.set(true);
        Ok(ViewGrant::new(
            data,
            rect.width as u32,
            rect.height as u32,
            self.stride,
            rect,
            mode,
            layout,
        ))
    }

    fn close_view(&self, grant: ViewGrant) -> Result<(), AccessError> {
        if !self.open.get() {
            return Err(AccessError::NotLocked);
        }
        // A grant this source could not have issued (wrong stride, or a
        // rect outside our bounds) must not be written back; the real
        // grant is still outstanding, so the open flag stays set.
        if grant.stride() != self.stride || !self.bounds().contains_rect(&grant.rect()) {
            return Err(AccessError::OutOfBounds);
        }
        if grant.mode().is_writable() {
            let mut grant = grant;
            let rect = grant.rect();
            let w = grant.width() as usize;
            let layout = grant.layout();
            layout::convert_to_native(grant.data_mut(), layout);
            let mut pixels = self.pixels.borrow_mut();
            for y in 0..grant.height() {
                let dst = (rect.y as usize + y as usize) * self.stride + rect.x as usize;
                pixels[dst..dst + w].copy_from_slice(grant.row(y));
            }
        }
        self.open.set(false);
        Ok(())
    }
}
