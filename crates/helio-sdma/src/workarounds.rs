//! Hardware-bug workaround policies.
//!
//! Pure predicates and extent adjusters shared by the packet encoders:
//! the 16K dimension-limit splits, the linear-surface out-of-bounds read
//! guard, unaligned-tail coalescing, the depth-axis alignment table for
//! thick tile modes, and the GFX6 partial-window iteration forced by an
//! address-shift bug in its DMA engine.

use tracing::warn;

use crate::device::{ArrayMode, DeviceInfo, MicroTileMode};
use crate::geometry::{align_up, PerImageInfo};
use crate::pkt::MAX_DIM;
use crate::surface::{Extent3D, Image, Offset3D};

/// How many pixels the engine reads at a time from a linear surface when
/// the other side is tiled. `None` means the micro tile mode has no
/// known read granularity and the tiled path must not be used.
pub fn linear_read_granularity(micro_mode: MicroTileMode, bpp: u32) -> Option<u32> {
    match micro_mode {
        MicroTileMode::Display => Some(if bpp == 1 {
            64 / (8 * bpp)
        } else {
            128 / (8 * bpp)
        }),
        MicroTileMode::Thin | MicroTileMode::Depth => Some(if bpp <= 2 {
            64 / (8 * bpp)
        } else if bpp <= 8 {
            128 / (8 * bpp)
        } else {
            256 / (8 * bpp)
        }),
        _ => None,
    }
}

/// The engine can read (or fault on) pages outside the linear surface:
/// reads start at `tiled_x` rounded down to the read granularity, so a
/// window beginning at linear x == 0 with a misaligned tiled x reaches
/// *before* the surface. Returns whether the whole window stays inside
/// the linear allocation.
pub fn linear_window_in_bounds(
    dev: &DeviceInfo,
    til_image: &Image,
    til_info: &PerImageInfo,
    lin_image: &Image,
    lin_info: &PerImageInfo,
    copy_width: u32,
    copy_height: u32,
    copy_depth: u32,
    bpp: u32,
) -> bool {
    let til_tile_index = til_image.surface.legacy().tiling_index[til_info.mip_level as usize];
    let til_micro_mode = dev.tile_mode(til_tile_index).micro_tile_mode_new();

    let granularity = match linear_read_granularity(til_micro_mode, bpp) {
        Some(g) => i64::from(g),
        None => return false,
    };

    let level_offset = lin_image.surface.legacy().level[lin_info.mip_level as usize].offset as i64;
    let bpp = i64::from(bpp);
    let pitch = i64::from(lin_info.pitch);
    let slice_pitch = i64::from(lin_info.slice_pitch);
    let off = lin_info.offset;

    let mut start = level_offset
        + bpp
            * (i64::from(off.z) * slice_pitch
                + i64::from(off.y) * pitch
                + i64::from(off.x));
    start -= bpp * (i64::from(til_info.offset.x) % granularity);

    let mut end = level_offset
        + bpp
            * ((i64::from(off.z) + i64::from(copy_depth) - 1) * slice_pitch
                + (i64::from(off.y) + i64::from(copy_height) - 1) * pitch
                + (i64::from(off.x) + i64::from(copy_width)));

    let tail = (i64::from(til_info.offset.x) + i64::from(copy_width)) % granularity;
    if tail != 0 {
        end += granularity - tail;
    }

    start >= 0 && end <= lin_image.surface.surf_size as i64
}

/// Widens an unaligned copy that ends exactly at both surfaces' edge to
/// the next aligned boundary, when both rows have enough backing pitch.
/// The extra pixels are never visible.
pub fn coalesced_tail_width(
    copy_width: u32,
    xalign: u32,
    lin_off_x: u32,
    lin_width: u32,
    lin_pitch: u32,
    til_off_x: u32,
    til_width: u32,
    til_pitch: u32,
) -> u32 {
    if copy_width % xalign != 0
        && lin_off_x + copy_width == lin_width
        && til_off_x + copy_width == til_width
        && lin_off_x + align_up(copy_width, xalign) <= lin_pitch
        && til_off_x + align_up(copy_width, xalign) <= til_pitch
    {
        align_up(copy_width, xalign)
    } else {
        copy_width
    }
}

/// Partitioning of a copy whose width or height hits the 16K packet
/// field limit: each maxed axis is halved and transferred twice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LimitSplit {
    pub num_x: u32,
    pub num_y: u32,
    pub width: u32,
    pub height: u32,
}

pub fn limit_split(extent: Extent3D) -> LimitSplit {
    let mut split = LimitSplit {
        num_x: 1,
        num_y: 1,
        width: extent.width,
        height: extent.height,
    };
    if extent.width == MAX_DIM {
        split.num_x += 1;
        split.width /= 2;
    }
    if extent.height == MAX_DIM {
        split.num_y += 1;
        split.height /= 2;
    }
    split
}

/// Depth-axis granularity required by the tiled-to-tiled packet, per
/// array mode. Thick modes pack 4 or 8 slices per tile.
pub fn z_alignment(mode: ArrayMode) -> u32 {
    match mode {
        ArrayMode::Tiled1DThick
        | ArrayMode::Tiled2DThick
        | ArrayMode::PrtTiledThick
        | ArrayMode::Prt2DTiledThick
        | ArrayMode::Tiled3DThick
        | ArrayMode::Prt3DTiledThick => 4,
        ArrayMode::Tiled2DXThick | ArrayMode::Tiled3DXThick => 8,
        _ => 1,
    }
}

/// The GFX6 engine corrupts the last line of a copy whose bottom edge
/// lands exactly on the 16K row limit. Drops that line; `None` means
/// the whole region degenerated away and nothing should be emitted.
pub fn clamp_last_line(offsets_y: &[u32], extent: Extent3D) -> Option<Extent3D> {
    let mut out = extent;
    if offsets_y.iter().any(|&y| y + extent.height == MAX_DIM) {
        warn!("dma engine bug workaround: not copying last line of 16k image");
        out.height -= 1;
        if out.height == 0 {
            return None;
        }
    }
    Some(out)
}

/// Copy widths that are a multiple of this value trip a shift bug in
/// the GFX6 engine and must be broken up.
pub fn bad_mod_value(bpp: u32) -> u32 {
    0x4000 >> bpp.ilog2()
}

/// Next window of the GFX6 partial-width iteration: take the whole
/// remaining width unless it is a bad multiple, in which case leave 8
/// pixels for the following window.
pub fn next_partial_window(
    extent: Extent3D,
    offset: Offset3D,
    bpp: u32,
    total_width_copied: u32,
) -> (Extent3D, Offset3D) {
    let mut next_extent = extent;
    let mut next_offset = offset;

    let remaining = extent.width - total_width_copied;
    next_extent.width = if remaining % bad_mod_value(bpp) != 0 {
        remaining
    } else {
        remaining - 8
    };
    next_offset.x = offset.x + total_width_copied;
    (next_extent, next_offset)
}
