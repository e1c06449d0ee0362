//! Byte-opcode encoders shared by GFX7 through GFX9.
//!
//! The sub-window and tiled encoders here are the GFX8/GFX9 forms; GFX7
//! reaches them only through the split-loop variants in `cik`. Field
//! widths and minus-one encodings differ per generation exactly where
//! the hardware does, so near-duplicate branches below are intentional.

use crate::cmd_buffer::{CmdBuffer, RecordError};
use crate::device::{DeviceInfo, GfxLevel};
use crate::geometry::{minify_as_blocks, ImageBufferInfo, ImageImageInfo, PerImageInfo};
use crate::pkt::{
    log2u, sdma_pkt, SDMA_CONST_FILL_DWORDS, SDMA_COPY_MAX_SIZE, SDMA_FILL_MAX_SIZE, SDMA_OP_CONST_FILL,
    SDMA_OP_COPY, SDMA_OP_WRITE, SDMA_SUBOP_COPY_LINEAR, SDMA_SUBOP_COPY_LINEAR_SUB_WINDOW,
    SDMA_SUBOP_COPY_T2T_SUB_WINDOW, SDMA_SUBOP_COPY_TILED_SUB_WINDOW, SDMA_SUBOP_WRITE_LINEAR,
};
use crate::surface::{Image, ImageType, SurfMode};
use crate::workarounds::{
    coalesced_tail_width, linear_window_in_bounds, z_alignment,
};

/// Tile-description word for the sub-window packets.
pub(super) fn encode_tile_info(dev: &DeviceInfo, image: &Image, level: u32, set_bpp: bool) -> u32 {
    if dev.gfx_level >= GfxLevel::Gfx9 {
        encode_tile_info_gfx9(image)
    } else {
        encode_tile_info_legacy(dev, image, level, set_bpp)
    }
}

fn encode_tile_info_legacy(dev: &DeviceInfo, image: &Image, level: u32, set_bpp: bool) -> u32 {
    let surf = image.surface.legacy();
    let tile_mode = dev.tile_mode(surf.tiling_index[level as usize]);
    let macro_mode = dev.macrotile_mode(surf.macro_tile_index);

    (if set_bpp { log2u(image.surface.bpe) } else { 0 })
        | ((tile_mode.array_mode() as u32) << 3)
        | (tile_mode.micro_tile_mode_new_raw() << 8)
        // Non-depth modes have no tile split set.
        | (log2u(surf.tile_split >> 6) << 11)
        | (macro_mode.bank_width() << 15)
        | (macro_mode.bank_height() << 18)
        | (macro_mode.num_banks() << 21)
        | (macro_mode.macro_tile_aspect() << 24)
        | (tile_mode.pipe_config() << 26)
}

fn encode_tile_info_gfx9(image: &Image) -> u32 {
    let surf = image.surface.gfx9();
    log2u(image.surface.bpe)
        | ((surf.swizzle_mode as u32) << 3)
        | ((if image.ty == ImageType::Type3D { 2 } else { 1 }) << 9)
        | (surf.epitch << 16)
}

pub(super) fn legacy_per_image_layout(image: &Image, is_stencil: bool, info: &mut PerImageInfo) {
    let surf = image.surface.legacy();
    let base_level = if is_stencil {
        &surf.stencil_level[info.mip_level as usize]
    } else {
        &surf.level[info.mip_level as usize]
    };
    let lvl_is_2d_surf = base_level.mode == SurfMode::Tiled2D;

    info.va = image.va + base_level.offset;
    if lvl_is_2d_surf {
        info.va |= (image.surface.tile_swizzle as u64) << 8;
    }
    info.pitch = base_level.nblk_x;
    info.slice_pitch = base_level.slice_size_dw * 4 / image.surface.bpe;
}

pub(super) fn gfx9_per_image_layout(image: &Image, _is_stencil: bool, info: &mut PerImageInfo) {
    let surf = image.surface.gfx9();
    info.va = image.va;
    info.pitch = surf.surf_pitch;
    info.slice_pitch = (surf.surf_slice_size / u64::from(image.surface.bpe)) as u32;
    if image.surface.is_linear {
        info.va += surf.offset[info.mip_level as usize];
    }
}

pub(super) fn emit_copy_buffer(
    cmd: &mut CmdBuffer<'_>,
    src_va: u64,
    dst_va: u64,
    copy_size: u64,
) -> u64 {
    let gfx9 = cmd.device.info.gfx_level >= GfxLevel::Gfx9;
    let mut bytes_to_copy = copy_size.min(SDMA_COPY_MAX_SIZE);

    // The microcode switches between byte and dword copies on its own;
    // keeping chunk splits dword-aligned lets it stay in dword mode.
    if dst_va % 4 == 0 && src_va % 4 == 0 && copy_size >= 4 {
        bytes_to_copy &= !3;
    }

    cmd.cs.reserve(7);
    cmd.cs
        .emit(sdma_pkt(SDMA_OP_COPY, SDMA_SUBOP_COPY_LINEAR, 0));
    if gfx9 {
        cmd.cs.emit(bytes_to_copy as u32 - 1);
    } else {
        cmd.cs.emit(bytes_to_copy as u32);
    }
    cmd.cs.emit(0);
    cmd.cs.emit(src_va as u32);
    cmd.cs.emit((src_va >> 32) as u32);
    cmd.cs.emit(dst_va as u32);
    cmd.cs.emit((dst_va >> 32) as u32);

    bytes_to_copy
}

const WRITE_HDR_DW: usize = 4;

pub(super) fn emit_update_buffer(cmd: &mut CmdBuffer<'_>, dst_va: u64, data: &[u8]) {
    assert_eq!(data.len() % 4, 0, "update payload must be whole dwords");
    let gfx9 = cmd.device.info.gfx_level >= GfxLevel::Gfx9;
    let data_dw: Vec<u32> = bytemuck::pod_collect_to_vec(data);

    let mut dst_va = dst_va;
    let mut left = &data_dw[..];
    loop {
        let can_dw = cmd
            .cs
            .max_dw()
            .saturating_sub(cmd.cs.cdw() + WRITE_HDR_DW);
        if can_dw == 0 {
            cmd.cs.reserve(left.len() + WRITE_HDR_DW);
            continue;
        }
        let this_dw = left.len().min(can_dw);

        cmd.cs.reserve(this_dw + WRITE_HDR_DW);
        cmd.cs
            .emit(sdma_pkt(SDMA_OP_WRITE, SDMA_SUBOP_WRITE_LINEAR, 0));
        cmd.cs.emit(dst_va as u32);
        cmd.cs.emit((dst_va >> 32) as u32);
        if gfx9 {
            cmd.cs.emit(this_dw as u32 - 1);
        } else {
            cmd.cs.emit(this_dw as u32);
        }
        cmd.cs.emit_array(&left[..this_dw]);

        left = &left[this_dw..];
        dst_va += 4 * this_dw as u64;
        if left.is_empty() {
            break;
        }
        cmd.cs.reserve(left.len() + WRITE_HDR_DW);
    }
}

pub(super) fn emit_fill_buffer(
    cmd: &mut CmdBuffer<'_>,
    dst_va: u64,
    fill_size: u64,
    value: u32,
) -> u64 {
    let gfx9 = cmd.device.info.gfx_level >= GfxLevel::Gfx9;
    let size = fill_size.min(SDMA_FILL_MAX_SIZE) as u32;

    cmd.cs.reserve(5);
    cmd.cs
        .emit(sdma_pkt(SDMA_OP_CONST_FILL, 0, SDMA_CONST_FILL_DWORDS));
    cmd.cs.emit(dst_va as u32);
    cmd.cs.emit((dst_va >> 32) as u32);
    cmd.cs.emit(value);
    if gfx9 {
        cmd.cs.emit(size - 1);
    } else {
        cmd.cs.emit(size);
    }
    u64::from(size)
}

pub(super) fn emit_nop(cmd: &mut CmdBuffer<'_>) {
    cmd.cs.reserve(1);
    cmd.cs.emit(0);
}

pub(super) fn copy_one_lin_to_lin(cmd: &mut CmdBuffer<'_>, info: &ImageBufferInfo, buf2img: bool) {
    let img = &info.image;
    let buf = &info.buf;

    let src_va = if buf2img { buf.va } else { img.va };
    let dst_va = if buf2img { img.va } else { buf.va };

    let img_xy = img.offset.x | (img.offset.y << 16);
    let img_z_pitch = img.offset.z | ((img.pitch - 1) << 16);
    let buf_z_pitch = (buf.pitch - 1) << 16;

    let src_xy = if buf2img { 0 } else { img_xy };
    let dst_xy = if buf2img { img_xy } else { 0 };
    let src_z_pitch = if buf2img { buf_z_pitch } else { img_z_pitch };
    let dst_z_pitch = if buf2img { img_z_pitch } else { buf_z_pitch };
    let src_slice_pitch = if buf2img { buf.slice_pitch } else { img.slice_pitch } - 1;
    let dst_slice_pitch = if buf2img { img.slice_pitch } else { buf.slice_pitch } - 1;

    cmd.cs.reserve(13);
    cmd.cs.emit(
        sdma_pkt(SDMA_OP_COPY, SDMA_SUBOP_COPY_LINEAR_SUB_WINDOW, 0) | (log2u(img.bpp) << 29),
    );
    cmd.cs.emit(src_va as u32);
    cmd.cs.emit((src_va >> 32) as u32);
    cmd.cs.emit(src_xy);
    cmd.cs.emit(src_z_pitch);
    cmd.cs.emit(src_slice_pitch);
    cmd.cs.emit(dst_va as u32);
    cmd.cs.emit((dst_va >> 32) as u32);
    cmd.cs.emit(dst_xy);
    cmd.cs.emit(dst_z_pitch);
    cmd.cs.emit(dst_slice_pitch);
    cmd.cs
        .emit((info.extent.width - 1) | ((info.extent.height - 1) << 16));
    cmd.cs.emit(info.extent.depth - 1);
}

pub(super) fn copy_one_lin_to_tiled(
    cmd: &mut CmdBuffer<'_>,
    info: &ImageBufferInfo,
    image: &Image,
    buf2img: bool,
) {
    let dev = cmd.device;
    let img = &info.image;
    let buf = &info.buf;

    let copy_width = crate::geometry::div_round_up(info.extent.width, image.surface.blk_w);
    let copy_height = crate::geometry::div_round_up(info.extent.height, image.surface.blk_h);

    let mut dword0 = sdma_pkt(SDMA_OP_COPY, SDMA_SUBOP_COPY_TILED_SUB_WINDOW, 0)
        | if buf2img { 0 } else { 1 << 31 };

    let mut dword4 = img.offset.z;
    let dword5;
    if dev.info.gfx_level >= GfxLevel::Gfx9 {
        dword4 |= (image.width - 1) << 16;
        dword5 = (image.height - 1) | ((image.depth - 1) << 16);
        dword0 |= (image.levels - 1) << 20;
        dword0 |= img.mip_level << 24;
    } else {
        let pitch_tile_max = img.pitch / 8 - 1;
        let slice_tile_max = img.slice_pitch / 64 - 1;
        dword4 |= pitch_tile_max << 16;
        dword5 = slice_tile_max;
    }

    cmd.cs.reserve(14);
    cmd.cs.emit(dword0);
    cmd.cs.emit(img.va as u32);
    cmd.cs.emit((img.va >> 32) as u32);
    cmd.cs.emit(img.offset.x | (img.offset.y << 16));
    cmd.cs.emit(dword4);
    cmd.cs.emit(dword5);
    cmd.cs
        .emit(encode_tile_info(&dev.info, image, img.mip_level, true));
    cmd.cs.emit(buf.va as u32);
    cmd.cs.emit((buf.va >> 32) as u32);
    cmd.cs.emit(0); // buffer x,y
    cmd.cs.emit((buf.pitch - 1) << 16);
    cmd.cs.emit(buf.slice_pitch - 1);
    cmd.cs
        .emit((copy_width - 1) | ((copy_height - 1) << 16));
    cmd.cs.emit(info.extent.depth - 1);
}

pub(super) fn copy_image_lin_to_lin(cmd: &mut CmdBuffer<'_>, info: &ImageImageInfo) {
    cmd.cs.reserve(13);
    cmd.cs.emit(
        sdma_pkt(SDMA_OP_COPY, SDMA_SUBOP_COPY_LINEAR_SUB_WINDOW, 0)
            | (log2u(info.src.bpp) << 29),
    );
    cmd.cs.emit(info.src.va as u32);
    cmd.cs.emit((info.src.va >> 32) as u32);
    cmd.cs
        .emit(info.src.offset.x | (info.src.offset.y << 16));
    cmd.cs
        .emit(info.src.offset.z | ((info.src.pitch - 1) << 16));
    cmd.cs.emit(info.src.slice_pitch - 1);
    cmd.cs.emit(info.dst.va as u32);
    cmd.cs.emit((info.dst.va >> 32) as u32);
    cmd.cs
        .emit(info.dst.offset.x | (info.dst.offset.y << 16));
    cmd.cs
        .emit(info.dst.offset.z | ((info.dst.pitch - 1) << 16));
    cmd.cs.emit(info.dst.slice_pitch - 1);
    cmd.cs
        .emit((info.extent.width - 1) | ((info.extent.height - 1) << 16));
    cmd.cs.emit(info.extent.depth - 1);
}

/// Splits an image-image copy into its linear and tiled roles.
pub(super) struct LinTilRoles<'r> {
    pub lin_info: &'r PerImageInfo,
    pub til_info: &'r PerImageInfo,
    pub lin_image: &'r Image,
    pub til_image: &'r Image,
    pub src_is_linear: bool,
}

pub(super) fn lin_til_roles<'r>(
    info: &'r ImageImageInfo,
    src_image: &'r Image,
    dst_image: &'r Image,
) -> LinTilRoles<'r> {
    let src_is_linear = src_image.surface.is_linear;
    LinTilRoles {
        lin_info: if src_is_linear { &info.src } else { &info.dst },
        til_info: if src_is_linear { &info.dst } else { &info.src },
        lin_image: if src_is_linear { src_image } else { dst_image },
        til_image: if src_is_linear { dst_image } else { src_image },
        src_is_linear,
    }
}

pub(super) fn copy_image_lin_to_tiled(
    cmd: &mut CmdBuffer<'_>,
    info: &ImageImageInfo,
    src_image: &Image,
    dst_image: &Image,
) {
    let dev = cmd.device;
    let roles = lin_til_roles(info, src_image, dst_image);
    let (lin_info, til_info) = (roles.lin_info, roles.til_info);

    let lin_width = minify_as_blocks(
        roles.lin_image.width,
        lin_info.mip_level,
        roles.lin_image.surface.blk_w,
    );
    let til_width = minify_as_blocks(
        roles.til_image.width,
        til_info.mip_level,
        roles.til_image.surface.blk_w,
    );

    let bpp = lin_info.bpp;
    let xalign = (4 / bpp).max(1);
    let copy_width =
        crate::geometry::div_round_up(info.extent.width, roles.til_image.surface.blk_w);
    let copy_height =
        crate::geometry::div_round_up(info.extent.height, roles.til_image.surface.blk_h);
    let copy_depth = info.extent.depth;

    let copy_width_aligned = coalesced_tail_width(
        copy_width,
        xalign,
        lin_info.offset.x,
        lin_width,
        lin_info.pitch,
        til_info.offset.x,
        til_width,
        til_info.pitch,
    );

    if dev.info.gfx_level < GfxLevel::Gfx9 {
        let ok = linear_window_in_bounds(
            &dev.info,
            roles.til_image,
            til_info,
            roles.lin_image,
            lin_info,
            copy_width,
            copy_height,
            copy_depth,
            bpp,
        );
        if !ok {
            cmd.record_error(RecordError::OutOfDeviceMemory);
            return;
        }
    }

    let mut dword0 = sdma_pkt(SDMA_OP_COPY, SDMA_SUBOP_COPY_TILED_SUB_WINDOW, 0)
        | if roles.src_is_linear { 0 } else { 1 << 31 };

    let mut dword4 = til_info.offset.z;
    let dword5;
    if dev.info.gfx_level >= GfxLevel::Gfx9 {
        dword4 |= (roles.til_image.width - 1) << 16;
        dword5 = (roles.til_image.height - 1) | ((roles.til_image.depth - 1) << 16);
        dword0 |= (roles.til_image.levels - 1) << 20;
        dword0 |= til_info.mip_level << 24;
    } else {
        assert!(til_info.pitch % 8 == 0);
        assert!(til_info.slice_pitch % 64 == 0);
        let pitch_tile_max = til_info.pitch / 8 - 1;
        let slice_tile_max = til_info.slice_pitch / 64 - 1;
        dword4 |= pitch_tile_max << 16;
        dword5 = slice_tile_max;
    }

    cmd.cs.reserve(14);
    cmd.cs.emit(dword0);
    cmd.cs.emit(til_info.va as u32);
    cmd.cs.emit((til_info.va >> 32) as u32);
    cmd.cs
        .emit(til_info.offset.x | (til_info.offset.y << 16));
    cmd.cs.emit(dword4);
    cmd.cs.emit(dword5);
    cmd.cs.emit(encode_tile_info(
        &dev.info,
        roles.til_image,
        til_info.mip_level,
        true,
    ));
    cmd.cs.emit(lin_info.va as u32);
    cmd.cs.emit((lin_info.va >> 32) as u32);
    cmd.cs
        .emit(lin_info.offset.x | (lin_info.offset.y << 16));
    cmd.cs
        .emit(lin_info.offset.z | ((lin_info.pitch - 1) << 16));
    cmd.cs.emit(lin_info.slice_pitch - 1);
    if dev.info.gfx_level == GfxLevel::Gfx7 {
        cmd.cs.emit(copy_width_aligned | (copy_height << 16));
        cmd.cs.emit(copy_depth);
    } else {
        cmd.cs
            .emit((copy_width_aligned - 1) | ((copy_height - 1) << 16));
        cmd.cs.emit(copy_depth - 1);
    }
}

/// The t2t packet wants 8-aligned extents; a copy ending at both
/// surfaces' edge may widen into the invisible remainder.
pub(super) fn t2t_coalesced(
    copy: u32,
    src_off: u32,
    src_dim: u32,
    dst_off: u32,
    dst_dim: u32,
) -> u32 {
    if copy % 8 != 0 && src_off + copy == src_dim && dst_off + copy == dst_dim {
        crate::geometry::align_up(copy, 8)
    } else {
        copy
    }
}

pub(super) fn copy_image_tiled(
    cmd: &mut CmdBuffer<'_>,
    info: &ImageImageInfo,
    src_image: &Image,
    dst_image: &Image,
) {
    let dev = cmd.device;

    let src_width = minify_as_blocks(
        src_image.width,
        info.src.mip_level,
        src_image.surface.blk_w,
    );
    let dst_width = minify_as_blocks(
        dst_image.width,
        info.dst.mip_level,
        dst_image.surface.blk_w,
    );
    let src_height = minify_as_blocks(
        src_image.height,
        info.src.mip_level,
        src_image.surface.blk_h,
    );
    let dst_height = minify_as_blocks(
        dst_image.height,
        info.dst.mip_level,
        dst_image.surface.blk_h,
    );

    let copy_width = crate::geometry::div_round_up(info.extent.width, src_image.surface.blk_w);
    let copy_height = crate::geometry::div_round_up(info.extent.height, src_image.surface.blk_h);

    let copy_width_aligned =
        t2t_coalesced(copy_width, info.src.offset.x, src_width, info.dst.offset.x, dst_width);
    let copy_height_aligned =
        t2t_coalesced(copy_height, info.src.offset.y, src_height, info.dst.offset.y, dst_height);

    let mut dword4 = info.src.offset.z;
    let mut dword10 = info.dst.offset.z;
    let (dword5, dword11);
    if dev.info.gfx_level >= GfxLevel::Gfx9 {
        dword4 |= (src_image.width - 1) << 16;
        dword5 = (src_image.height - 1) | ((src_image.depth - 1) << 16);
        dword10 |= (dst_image.width - 1) << 16;
        dword11 = (dst_image.height - 1) | ((dst_image.depth - 1) << 16);
    } else {
        dword4 |= (info.src.pitch / 8 - 1) << 16;
        dword5 = info.src.slice_pitch / 64 - 1;
        dword10 |= (info.dst.pitch / 8 - 1) << 16;
        dword11 = info.dst.slice_pitch / 64 - 1;
    }

    cmd.cs.reserve(15);
    cmd.cs
        .emit(sdma_pkt(SDMA_OP_COPY, SDMA_SUBOP_COPY_T2T_SUB_WINDOW, 0));
    cmd.cs.emit(info.src.va as u32);
    cmd.cs.emit((info.src.va >> 32) as u32);
    cmd.cs
        .emit(info.src.offset.x | (info.src.offset.y << 16));
    cmd.cs.emit(dword4);
    cmd.cs.emit(dword5);
    cmd.cs
        .emit(encode_tile_info(&dev.info, src_image, info.src.mip_level, true));
    cmd.cs.emit(info.dst.va as u32);
    cmd.cs.emit((info.dst.va >> 32) as u32);
    cmd.cs
        .emit(info.dst.offset.x | (info.dst.offset.y << 16));
    cmd.cs.emit(dword10);
    cmd.cs.emit(dword11);
    cmd.cs
        .emit(encode_tile_info(&dev.info, dst_image, info.dst.mip_level, false));
    match dev.info.gfx_level {
        GfxLevel::Gfx7 => {
            cmd.cs
                .emit(copy_width_aligned | (copy_height_aligned << 16));
            cmd.cs.emit(info.extent.depth);
        }
        GfxLevel::Gfx9 => {
            cmd.cs
                .emit((copy_width_aligned - 1) | ((copy_height_aligned - 1) << 16));
            cmd.cs.emit(info.extent.depth - 1);
        }
        _ => {
            cmd.cs
                .emit((copy_width_aligned - 8) | ((copy_height_aligned - 8) << 16));
            cmd.cs.emit(info.extent.depth - 1);
        }
    }
}

pub(super) fn legacy_use_scanline_t2t(
    dev: &DeviceInfo,
    info: &ImageImageInfo,
    src_image: &Image,
    dst_image: &Image,
) -> bool {
    let src_tile_index = src_image.surface.legacy().tiling_index[info.src.mip_level as usize];
    let dst_tile_index = dst_image.surface.legacy().tiling_index[info.dst.mip_level as usize];

    if src_tile_index != dst_tile_index {
        return true;
    }

    let align = z_alignment(dev.tile_mode(src_tile_index).array_mode());
    !(info.src.offset.z % align == 0
        && info.dst.offset.z % align == 0
        && info.extent.depth % align == 0)
}

/// The t2t packet cannot express mip-level counts on this generation,
/// so the direct path is never safe to pick.
pub(super) fn gfx9_use_scanline_t2t() -> bool {
    true
}
