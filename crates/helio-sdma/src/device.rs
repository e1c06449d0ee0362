//! Device description and the per-generation dispatch seam.

use crate::encoders::{for_gfx_level, TransferFns};
use crate::surface::Buffer;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum GfxLevel {
    Gfx6,
    Gfx7,
    Gfx8,
    Gfx9,
}

/// Macro-tile array modes, as stored in the tile-mode registers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArrayMode {
    LinearGeneral = 0,
    LinearAligned = 1,
    Tiled1DThin = 2,
    Tiled1DThick = 3,
    Tiled2DThin = 4,
    PrtTiledThin = 5,
    Prt2DTiledThin = 6,
    Tiled2DThick = 7,
    Tiled2DXThick = 8,
    PrtTiledThick = 9,
    Prt2DTiledThick = 10,
    Prt3DTiledThin = 11,
    Tiled3DThin = 12,
    Tiled3DThick = 13,
    Tiled3DXThick = 14,
    Prt3DTiledThick = 15,
}

impl ArrayMode {
    pub fn from_raw(raw: u32) -> ArrayMode {
        match raw & 0xf {
            0 => ArrayMode::LinearGeneral,
            1 => ArrayMode::LinearAligned,
            2 => ArrayMode::Tiled1DThin,
            3 => ArrayMode::Tiled1DThick,
            4 => ArrayMode::Tiled2DThin,
            5 => ArrayMode::PrtTiledThin,
            6 => ArrayMode::Prt2DTiledThin,
            7 => ArrayMode::Tiled2DThick,
            8 => ArrayMode::Tiled2DXThick,
            9 => ArrayMode::PrtTiledThick,
            10 => ArrayMode::Prt2DTiledThick,
            11 => ArrayMode::Prt3DTiledThin,
            12 => ArrayMode::Tiled3DThin,
            13 => ArrayMode::Tiled3DThick,
            14 => ArrayMode::Tiled3DXThick,
            _ => ArrayMode::Prt3DTiledThick,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MicroTileMode {
    Display,
    Thin,
    Depth,
    Rotated,
    Thick,
    Unknown,
}

impl MicroTileMode {
    pub fn from_raw(raw: u32) -> MicroTileMode {
        match raw {
            0 => MicroTileMode::Display,
            1 => MicroTileMode::Thin,
            2 => MicroTileMode::Depth,
            3 => MicroTileMode::Rotated,
            4 => MicroTileMode::Thick,
            _ => MicroTileMode::Unknown,
        }
    }
}

/// One word of the tile-mode register array.
#[derive(Debug, Clone, Copy)]
pub struct TileMode(pub u32);

impl TileMode {
    pub fn micro_tile_mode(self) -> MicroTileMode {
        MicroTileMode::from_raw(self.micro_tile_mode_raw())
    }

    pub fn micro_tile_mode_raw(self) -> u32 {
        self.0 & 0x3
    }

    pub fn array_mode(self) -> ArrayMode {
        ArrayMode::from_raw((self.0 >> 2) & 0xf)
    }

    pub fn pipe_config(self) -> u32 {
        (self.0 >> 6) & 0x1f
    }

    /// GFX8+ field; aliases the low micro-tile-mode bits on older parts.
    pub fn micro_tile_mode_new(self) -> MicroTileMode {
        MicroTileMode::from_raw(self.micro_tile_mode_new_raw())
    }

    pub fn micro_tile_mode_new_raw(self) -> u32 {
        (self.0 >> 22) & 0x7
    }
}

/// One word of the macro-tile mode register array.
#[derive(Debug, Clone, Copy)]
pub struct MacroTileMode(pub u32);

impl MacroTileMode {
    pub fn bank_width(self) -> u32 {
        self.0 & 0x3
    }

    pub fn bank_height(self) -> u32 {
        (self.0 >> 2) & 0x3
    }

    pub fn macro_tile_aspect(self) -> u32 {
        (self.0 >> 4) & 0x3
    }

    pub fn num_banks(self) -> u32 {
        (self.0 >> 6) & 0x3
    }
}

/// Static hardware description the encoders read tiling parameters from.
#[derive(Debug, Clone)]
pub struct DeviceInfo {
    pub gfx_level: GfxLevel,
    pub si_tile_mode_array: [u32; 32],
    pub macrotile_mode_array: [u32; 16],
}

impl DeviceInfo {
    pub fn tile_mode(&self, index: u8) -> TileMode {
        TileMode(self.si_tile_mode_array[index as usize])
    }

    pub fn macrotile_mode(&self, index: u8) -> MacroTileMode {
        MacroTileMode(self.macrotile_mode_array[index as usize])
    }
}

/// Allocates GPU-visible scratch memory for the tiled-copy scanline
/// fallback. Implemented by the winsys layer.
pub trait StagingAllocator {
    fn alloc(&self, size: u64, align: u64) -> Buffer;
}

pub struct Device {
    pub info: DeviceInfo,
    fns: &'static dyn TransferFns,
    staging: Box<dyn StagingAllocator>,
}

impl Device {
    /// Builds a device, selecting the packet-encoder table for its
    /// generation. Selection is exhaustive over [`GfxLevel`], so every
    /// device carries a fully populated table.
    pub fn new(info: DeviceInfo, staging: Box<dyn StagingAllocator>) -> Self {
        let fns = for_gfx_level(info.gfx_level);
        Self { info, fns, staging }
    }

    #[inline]
    pub fn transfer_fns(&self) -> &'static dyn TransferFns {
        self.fns
    }

    pub(crate) fn alloc_staging(&self, size: u64, align: u64) -> Buffer {
        self.staging.alloc(size, align)
    }
}
