//! Surface descriptors and transfer request types.
//!
//! These are snapshots of the allocator's layout decisions: the packet
//! encoders only read them. Legacy generations (GFX6-8) carry per-level
//! tables and tiling indices into the hardware mode registers; GFX9
//! collapses everything into a swizzle mode plus unified pitch fields.

use bitflags::bitflags;

/// Texel formats the transfer engine cares about, reduced to block
/// geometry and per-aspect selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    R8Unorm,
    R8g8Unorm,
    R8g8b8a8Unorm,
    R16g16b16a16Sfloat,
    R32g32b32a32Sfloat,
    Bc1RgbaUnorm,
    Bc3Unorm,
    D16Unorm,
    X8D24Unorm,
    D32Sfloat,
    S8Uint,
    D24UnormS8Uint,
    D32SfloatS8Uint,
}

impl Format {
    /// Bytes per texel block.
    pub fn block_size(self) -> u32 {
        match self {
            Format::R8Unorm | Format::S8Uint => 1,
            Format::R8g8Unorm | Format::D16Unorm => 2,
            Format::R8g8b8a8Unorm | Format::X8D24Unorm | Format::D32Sfloat => 4,
            Format::R16g16b16a16Sfloat | Format::Bc1RgbaUnorm => 8,
            Format::R32g32b32a32Sfloat | Format::Bc3Unorm => 16,
            Format::D24UnormS8Uint => 4,
            Format::D32SfloatS8Uint => 8,
        }
    }

    pub fn block_width(self) -> u32 {
        match self {
            Format::Bc1RgbaUnorm | Format::Bc3Unorm => 4,
            _ => 1,
        }
    }

    pub fn block_height(self) -> u32 {
        self.block_width()
    }

    pub fn is_depth_or_stencil(self) -> bool {
        matches!(
            self,
            Format::D16Unorm
                | Format::X8D24Unorm
                | Format::D32Sfloat
                | Format::S8Uint
                | Format::D24UnormS8Uint
                | Format::D32SfloatS8Uint
        )
    }

    /// The format of just the depth aspect.
    pub fn depth_only(self) -> Format {
        match self {
            Format::D24UnormS8Uint => Format::X8D24Unorm,
            Format::D32SfloatS8Uint => Format::D32Sfloat,
            other => other,
        }
    }

    /// The format of just the stencil aspect.
    pub fn stencil_only(self) -> Format {
        match self {
            Format::D24UnormS8Uint | Format::D32SfloatS8Uint | Format::S8Uint => Format::S8Uint,
            other => other,
        }
    }
}

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct ImageAspectFlags: u32 {
        const COLOR = 1 << 0;
        const DEPTH = 1 << 1;
        const STENCIL = 1 << 2;
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Offset3D {
    pub x: u32,
    pub y: u32,
    pub z: u32,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Extent3D {
    pub width: u32,
    pub height: u32,
    pub depth: u32,
}

#[derive(Debug, Clone, Copy)]
pub struct SubresourceLayers {
    pub aspect_mask: ImageAspectFlags,
    pub mip_level: u32,
    pub base_array_layer: u32,
    pub layer_count: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageType {
    Type1D,
    Type2D,
    Type3D,
}

/// Per-level surface mode on the legacy layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SurfMode {
    LinearGeneral,
    LinearAligned,
    Tiled1D,
    Tiled2D,
}

/// One mip level of a legacy (GFX6-8) surface.
#[derive(Debug, Clone, Copy)]
pub struct LegacyLevel {
    /// Byte offset of the level from the image base address.
    pub offset: u64,
    /// Row pitch in blocks.
    pub nblk_x: u32,
    /// Slice size in dwords.
    pub slice_size_dw: u32,
    pub mode: SurfMode,
}

#[derive(Debug, Clone)]
pub struct LegacySurface {
    pub level: Vec<LegacyLevel>,
    /// Separate stencil mip chain; empty when the format has no stencil.
    pub stencil_level: Vec<LegacyLevel>,
    /// Per-level index into the tile-mode register array.
    pub tiling_index: Vec<u8>,
    pub stencil_tiling_index: Vec<u8>,
    /// Index into the macro-tile mode register array.
    pub macro_tile_index: u8,
    pub tile_split: u32,
}

#[derive(Debug, Clone)]
pub struct Gfx9Surface {
    pub swizzle_mode: u8,
    pub epitch: u32,
    /// Pitch in elements, shared by all levels.
    pub surf_pitch: u32,
    /// Slice size in bytes.
    pub surf_slice_size: u64,
    /// Per-mip byte offsets; only meaningful for linear surfaces.
    pub offset: Vec<u64>,
}

#[derive(Debug, Clone)]
pub enum SurfaceLayout {
    Legacy(LegacySurface),
    Gfx9(Gfx9Surface),
}

#[derive(Debug, Clone)]
pub struct Surface {
    /// Block dimensions of the surface format.
    pub blk_w: u32,
    pub blk_h: u32,
    /// Bytes per element.
    pub bpe: u32,
    pub is_linear: bool,
    pub tile_swizzle: u8,
    /// Total backing size in bytes.
    pub surf_size: u64,
    pub layout: SurfaceLayout,
}

impl Surface {
    pub fn legacy(&self) -> &LegacySurface {
        match &self.layout {
            SurfaceLayout::Legacy(s) => s,
            SurfaceLayout::Gfx9(_) => panic!("legacy surface layout expected"),
        }
    }

    pub fn gfx9(&self) -> &Gfx9Surface {
        match &self.layout {
            SurfaceLayout::Gfx9(s) => s,
            SurfaceLayout::Legacy(_) => panic!("gfx9 surface layout expected"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Image {
    pub ty: ImageType,
    pub format: Format,
    pub width: u32,
    pub height: u32,
    pub depth: u32,
    pub levels: u32,
    /// Base GPU virtual address of the bound memory.
    pub va: u64,
    pub surface: Surface,
}

#[derive(Debug, Clone, Copy)]
pub struct Buffer {
    pub va: u64,
    pub offset: u64,
    pub size: u64,
}

impl Buffer {
    #[inline]
    pub fn gpu_va(&self) -> u64 {
        self.va + self.offset
    }
}

#[derive(Debug, Clone, Copy)]
pub struct BufferCopy {
    pub src_offset: u64,
    pub dst_offset: u64,
    pub size: u64,
}

#[derive(Debug, Clone, Copy)]
pub struct BufferImageCopy {
    pub buffer_offset: u64,
    /// In texels; 0 means tightly packed (the copy width).
    pub buffer_row_length: u32,
    /// In texels; 0 means tightly packed (the copy height).
    pub buffer_image_height: u32,
    pub image_subresource: SubresourceLayers,
    pub image_offset: Offset3D,
    pub image_extent: Extent3D,
}

#[derive(Debug, Clone, Copy)]
pub struct ImageCopy {
    pub src_subresource: SubresourceLayers,
    pub src_offset: Offset3D,
    pub dst_subresource: SubresourceLayers,
    pub dst_offset: Offset3D,
    pub extent: Extent3D,
}
