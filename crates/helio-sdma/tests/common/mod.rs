//! Shared fixtures: a device with deterministic tile-mode registers and
//! image/buffer builders for each surface layout.

// Each test binary uses a different subset of the fixtures.
#![allow(dead_code)]

use helio_sdma::device::{Device, DeviceInfo, GfxLevel, StagingAllocator};
use helio_sdma::surface::{
    Buffer, Format, Gfx9Surface, Image, ImageType, LegacyLevel, LegacySurface, Surface,
    SurfaceLayout, SurfMode,
};

pub const STAGING_VA: u64 = 0x9000_0000;

/// Hands out the same fixed staging range every time; the tests only
/// look at the addresses written into the packets.
pub struct FixedStaging;

impl StagingAllocator for FixedStaging {
    fn alloc(&self, size: u64, _align: u64) -> Buffer {
        Buffer {
            va: STAGING_VA,
            offset: 0,
            size,
        }
    }
}

fn tile_word(micro: u32, array_mode: u32, pipe_config: u32, micro_new: u32) -> u32 {
    micro | (array_mode << 2) | (pipe_config << 6) | (micro_new << 22)
}

fn macro_word(bank_w: u32, bank_h: u32, aspect: u32, nbanks: u32) -> u32 {
    bank_w | (bank_h << 2) | (aspect << 4) | (nbanks << 6)
}

/// Indices 8 and 9 are both 2D-tiled thin with thin micro tiling; two
/// indices exist so tests can force a tiling mismatch.
pub fn device(level: GfxLevel) -> Device {
    let mut tiles = [0u32; 32];
    tiles[8] = tile_word(1, 4, 2, 1);
    tiles[9] = tile_word(1, 4, 2, 1);
    let mut macros = [0u32; 16];
    macros[4] = macro_word(0, 1, 1, 2);
    Device::new(
        DeviceInfo {
            gfx_level: level,
            si_tile_mode_array: tiles,
            macrotile_mode_array: macros,
        },
        Box::new(FixedStaging),
    )
}

pub fn format_for_bpe(bpe: u32) -> Format {
    match bpe {
        1 => Format::R8Unorm,
        2 => Format::R8g8Unorm,
        4 => Format::R8g8b8a8Unorm,
        8 => Format::R16g16b16a16Sfloat,
        _ => Format::R32g32b32a32Sfloat,
    }
}

fn legacy_image(
    width: u32,
    height: u32,
    bpe: u32,
    va: u64,
    mode: SurfMode,
    tiling_index: u8,
) -> Image {
    let pitch = width;
    let slice_size_dw = pitch * height * bpe / 4;
    Image {
        ty: ImageType::Type2D,
        format: format_for_bpe(bpe),
        width,
        height,
        depth: 1,
        levels: 1,
        va,
        surface: Surface {
            blk_w: 1,
            blk_h: 1,
            bpe,
            is_linear: matches!(mode, SurfMode::LinearGeneral | SurfMode::LinearAligned),
            tile_swizzle: 0,
            surf_size: u64::from(width) * u64::from(height) * u64::from(bpe),
            layout: SurfaceLayout::Legacy(LegacySurface {
                level: vec![LegacyLevel {
                    offset: 0,
                    nblk_x: pitch,
                    slice_size_dw,
                    mode,
                }],
                stencil_level: vec![],
                tiling_index: vec![tiling_index],
                stencil_tiling_index: vec![],
                macro_tile_index: 4,
                tile_split: 64,
            }),
        },
    }
}

pub fn linear_image(width: u32, height: u32, bpe: u32, va: u64) -> Image {
    legacy_image(width, height, bpe, va, SurfMode::LinearAligned, 0)
}

pub fn tiled_image(width: u32, height: u32, bpe: u32, va: u64, tiling_index: u8) -> Image {
    legacy_image(width, height, bpe, va, SurfMode::Tiled2D, tiling_index)
}

pub fn gfx9_image(width: u32, height: u32, bpe: u32, va: u64, is_linear: bool) -> Image {
    Image {
        ty: ImageType::Type2D,
        format: format_for_bpe(bpe),
        width,
        height,
        depth: 1,
        levels: 1,
        va,
        surface: Surface {
            blk_w: 1,
            blk_h: 1,
            bpe,
            is_linear,
            tile_swizzle: 0,
            surf_size: u64::from(width) * u64::from(height) * u64::from(bpe),
            layout: SurfaceLayout::Gfx9(Gfx9Surface {
                swizzle_mode: if is_linear { 0 } else { 9 },
                epitch: width - 1,
                surf_pitch: width,
                surf_slice_size: u64::from(width) * u64::from(height) * u64::from(bpe),
                offset: vec![0],
            }),
        },
    }
}

pub fn buffer(va: u64, size: u64) -> Buffer {
    Buffer {
        va,
        offset: 0,
        size,
    }
}
