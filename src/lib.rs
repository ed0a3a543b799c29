//! Exclusive, bounds-checked access windows over packed 32-bit pixel buffers.
//!
//! The crate is built around four pieces:
//!
//! - [`Rect`] — axis-aligned integer rectangles and clip math
//! - [`PixelView`] — one exclusive, time-bounded window onto a buffer's
//!   pixels: stride-aware get/set, bulk fill, bulk load/materialize
//! - [`copy_region`] / [`CopySpec`] — clipped region copies between two
//!   independently strided buffers, including negative-origin and
//!   off-canvas rectangles
//! - [`BufferSource`] — the contract a backing-image type implements to be
//!   usable by views; [`MemorySource`] is the bundled in-memory adapter
//!
//! A buffer source hands out at most one view at a time
//! ([`AccessError::AlreadyLocked`] otherwise); the view releases its window
//! on close or drop, so a buffer is never left locked behind an early
//! return. Pixels are packed `0xAARRGGBB` words; [`PixelLayout`] selects how
//! an adapter interprets them at the open/close boundary.
//!
//! Single-threaded by design: the open flag guards against two logical
//! owners of one buffer, not against true concurrent access.

#![no_std]
#![forbid(unsafe_code)]

extern crate alloc;

#[cfg(test)]
extern crate std;

mod copy;
mod error;
mod layout;
mod memory;
mod rect;
mod source;
mod view;

pub use copy::{CopySpec, clear, copy_image_region, copy_region, copy_region_between, duplicate};
pub use error::AccessError;
pub use layout::{
    AccessMode, PixelLayout, convert_to_native, convert_to_working, to_native, to_working,
    uniform_byte_pattern,
};
pub use memory::MemorySource;
pub use rect::Rect;
pub use source::{BufferSource, ViewGrant};
pub use view::PixelView;

// Re-exports for adapter implementors and users.
pub use imgref::{Img, ImgRef, ImgVec};
pub use rgb;
