//! GFX6 encoders.
//!
//! The oldest engine uses a four-bit-command header with a 20-bit count
//! and has an address-shift bug that corrupts copies whose width is a
//! multiple of a bpp-dependent value, so every windowed copy iterates
//! over partial windows. Its 16K row limit also silently drops the last
//! line of a copy that ends exactly on the limit.

use crate::cmd_buffer::CmdBuffer;
use crate::geometry::{minify, ImageBufferInfo, ImageImageInfo, PerImageInfo};
use crate::pkt::{
    log2u, si_pkt, SI_DMA_CONST_FILL, SI_DMA_COPY, SI_DMA_COPY_BYTE_ALIGNED,
    SI_DMA_COPY_DWORD_ALIGNED, SI_DMA_COPY_L2T_PARTIAL, SI_DMA_COPY_LINEAR_PARTIAL,
    SI_DMA_COPY_T2T_PARTIAL, SI_DMA_FILL_MAX_DWORDS, SI_DMA_NOP, SI_DMA_WRITE,
};
use crate::surface::{Extent3D, Image, ImageType, Offset3D};
use crate::workarounds::{clamp_last_line, next_partial_window};

fn linear_base_addr(info: &PerImageInfo, offset: Offset3D) -> u64 {
    info.va
        + u64::from(offset.z) * u64::from(info.slice_pitch) * u64::from(info.bpp)
        + u64::from(offset.y) * u64::from(info.pitch) * u64::from(info.bpp)
        + u64::from(offset.x) * u64::from(info.bpp)
}

pub(super) fn emit_copy_buffer(
    cmd: &mut CmdBuffer<'_>,
    src_va: u64,
    dst_va: u64,
    copy_size: u64,
) -> u64 {
    // The count field loses up to 7 dwords depending on the source
    // address alignment within its 32-byte window.
    let max_transfer = (1u64 << 20) - 1 - ((src_va & 0x1c) >> 2);
    let use_dword = dst_va % 4 == 0 && src_va % 4 == 0 && copy_size >= 4;

    let bytes_to_copy;
    cmd.cs.reserve(5);
    if use_dword {
        let dwords_to_copy = (copy_size / 4).min(max_transfer);
        bytes_to_copy = dwords_to_copy * 4;
        cmd.cs.emit(si_pkt(
            SI_DMA_COPY,
            SI_DMA_COPY_DWORD_ALIGNED,
            dwords_to_copy as u32,
        ));
    } else {
        bytes_to_copy = copy_size.min(max_transfer);
        cmd.cs.emit(si_pkt(
            SI_DMA_COPY,
            SI_DMA_COPY_BYTE_ALIGNED,
            bytes_to_copy as u32,
        ));
    }
    cmd.cs.emit(dst_va as u32);
    cmd.cs.emit(src_va as u32);
    cmd.cs.emit((dst_va >> 32) as u32);
    cmd.cs.emit((src_va >> 32) as u32);

    bytes_to_copy
}

const WRITE_HDR_DW: usize = 3;

pub(super) fn emit_update_buffer(cmd: &mut CmdBuffer<'_>, dst_va: u64, data: &[u8]) {
    assert_eq!(data.len() % 4, 0, "update payload must be whole dwords");
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
        cmd.cs.emit(si_pkt(SI_DMA_WRITE, 0, this_dw as u32));
        cmd.cs.emit(dst_va as u32);
        cmd.cs.emit(((dst_va >> 32) & 0xff) as u32);
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
    let size = fill_size.min(SI_DMA_FILL_MAX_DWORDS * 4) as u32;

    cmd.cs.reserve(4);
    cmd.cs.emit(si_pkt(SI_DMA_CONST_FILL, 0, size / 4));
    cmd.cs.emit(dst_va as u32);
    cmd.cs.emit(value);
    cmd.cs.emit((((dst_va >> 32) & 0xff) as u32) << 16);
    u64::from(size)
}

pub(super) fn emit_nop(cmd: &mut CmdBuffer<'_>) {
    cmd.cs.reserve(1);
    cmd.cs.emit(si_pkt(SI_DMA_NOP, 0, 0));
}

pub(super) fn copy_one_lin_to_lin(cmd: &mut CmdBuffer<'_>, info: &ImageBufferInfo, buf2img: bool) {
    let img = &info.image;
    let buf = &info.buf;

    let src_pitch = if buf2img { img.pitch } else { buf.pitch };
    let dst_pitch = if buf2img { buf.pitch } else { img.pitch };
    let src_slice_pitch = if buf2img { img.slice_pitch } else { buf.slice_pitch };
    let dst_slice_pitch = if buf2img { buf.slice_pitch } else { img.slice_pitch };

    let adjusted = match clamp_last_line(&[img.offset.y], info.extent) {
        Some(e) => e,
        None => return,
    };

    let mut total_width_copied = 0;
    while total_width_copied < adjusted.width {
        let (next_extent, next_offset) =
            next_partial_window(adjusted, img.offset, img.bpp, total_width_copied);

        let this_img_va = linear_base_addr(img, next_offset);
        let this_buf_va = buf.va + u64::from(total_width_copied) * u64::from(img.bpp);
        let this_src_va = if buf2img { this_buf_va } else { this_img_va };
        let this_dst_va = if buf2img { this_img_va } else { this_buf_va };

        cmd.cs.reserve(9);
        cmd.cs
            .emit(si_pkt(SI_DMA_COPY, SI_DMA_COPY_LINEAR_PARTIAL, 0));
        cmd.cs.emit(this_src_va as u32);
        cmd.cs
            .emit((((this_src_va >> 32) & 0xff) as u32) | (src_pitch << 13));
        cmd.cs.emit(src_slice_pitch);
        cmd.cs.emit(this_dst_va as u32);
        cmd.cs
            .emit((((this_dst_va >> 32) & 0xff) as u32) | (dst_pitch << 13));
        cmd.cs.emit(dst_slice_pitch);
        cmd.cs.emit(next_extent.width | (next_extent.height << 16));
        cmd.cs.emit(next_extent.depth | (img.bpp << 29));

        total_width_copied += next_extent.width;
    }
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

    let surf = image.surface.legacy();
    let tile_mode = dev.info.tile_mode(surf.tiling_index[img.mip_level as usize]);

    let array_mode = tile_mode.array_mode() as u32;
    let pipe_config = tile_mode.pipe_config();
    let mt = tile_mode.micro_tile_mode_raw();
    let macro_mode = dev.info.macrotile_mode(surf.macro_tile_index);
    let bank_h = macro_mode.bank_height();
    let bank_w = macro_mode.bank_width();
    let mt_aspect = macro_mode.macro_tile_aspect();
    let nbanks = macro_mode.num_banks();

    let pitch_tile_max = img.pitch / 8 - 1;
    let slice_tile_max = img.slice_pitch / 64 - 1;
    let tile_split = log2u(surf.tile_split >> 6);
    let height = minify(image.height, img.mip_level);

    let adjusted = match clamp_last_line(&[img.offset.y], info.extent) {
        Some(e) => e,
        None => return,
    };

    let mut total_width_copied = 0;
    while total_width_copied < adjusted.width {
        let (next_extent, next_offset) =
            next_partial_window(adjusted, img.offset, img.bpp, total_width_copied);
        let this_lin_va = buf.va + u64::from(total_width_copied) * u64::from(img.bpp);

        let mut tile_info0 = if buf2img { 0 } else { 1 << 31 };
        tile_info0 |= log2u(img.bpp) << 24;
        tile_info0 |= (array_mode << 27) | (bank_h << 21) | (bank_w << 18);
        tile_info0 |= mt_aspect << 16;

        let tile_info4 = next_offset.y | (tile_split << 21) | (nbanks << 25) | (mt << 27);

        cmd.cs.reserve(12);
        cmd.cs
            .emit(si_pkt(SI_DMA_COPY, SI_DMA_COPY_L2T_PARTIAL, 0));
        cmd.cs.emit((img.va >> 8) as u32);
        cmd.cs.emit(tile_info0);
        cmd.cs.emit(pitch_tile_max | ((height - 1) << 16));
        cmd.cs.emit(slice_tile_max | (pipe_config << 26));
        cmd.cs.emit(next_offset.x | (next_offset.z << 18));
        cmd.cs.emit(tile_info4);
        cmd.cs.emit((this_lin_va & 0xffff_fffc) as u32);
        cmd.cs
            .emit((((this_lin_va >> 32) & 0xff) as u32) | ((buf.pitch * img.bpp) << 13));
        cmd.cs.emit(buf.slice_pitch * img.bpp);
        cmd.cs.emit(next_extent.width | (next_extent.height << 16));
        cmd.cs.emit(next_extent.depth);

        total_width_copied += next_extent.width;
    }
}

pub(super) fn copy_image_lin_to_lin(cmd: &mut CmdBuffer<'_>, info: &ImageImageInfo) {
    let adjusted = match clamp_last_line(&[info.src.offset.y, info.dst.offset.y], info.extent) {
        Some(e) => e,
        None => return,
    };

    let mut total_width_copied = 0;
    while total_width_copied < adjusted.width {
        let (next_extent, src_offset) =
            next_partial_window(adjusted, info.src.offset, info.src.bpp, total_width_copied);
        let (_, dst_offset) =
            next_partial_window(adjusted, info.dst.offset, info.dst.bpp, total_width_copied);

        let this_src_va = linear_base_addr(&info.src, src_offset);
        let this_dst_va = linear_base_addr(&info.dst, dst_offset);

        cmd.cs.reserve(9);
        cmd.cs
            .emit(si_pkt(SI_DMA_COPY, SI_DMA_COPY_LINEAR_PARTIAL, 0));
        cmd.cs.emit(this_src_va as u32);
        cmd.cs.emit(
            (((this_src_va >> 32) & 0xff) as u32) | ((info.src.pitch * info.src.bpp) << 13),
        );
        cmd.cs.emit(info.src.slice_pitch * info.src.bpp);
        cmd.cs.emit(this_dst_va as u32);
        cmd.cs.emit(
            (((this_dst_va >> 32) & 0xff) as u32) | ((info.dst.pitch * info.dst.bpp) << 13),
        );
        cmd.cs.emit(info.dst.slice_pitch * info.dst.bpp);
        cmd.cs.emit(next_extent.width | (next_extent.height << 16));
        cmd.cs.emit(next_extent.depth | (log2u(info.dst.bpp) << 29));

        total_width_copied += next_extent.width;
    }
}

pub(super) fn copy_image_lin_to_tiled(
    cmd: &mut CmdBuffer<'_>,
    info: &ImageImageInfo,
    src_image: &Image,
    dst_image: &Image,
) {
    let dev = cmd.device;
    let src_is_linear = src_image.surface.is_linear;
    let lin_info = if src_is_linear { &info.src } else { &info.dst };
    let til_info = if src_is_linear { &info.dst } else { &info.src };
    let til_image = if src_is_linear { dst_image } else { src_image };

    let surf = til_image.surface.legacy();
    let tile_mode = dev.info.tile_mode(surf.tiling_index[til_info.mip_level as usize]);

    let array_mode = tile_mode.array_mode() as u32;
    let pipe_config = tile_mode.pipe_config();
    let mt = tile_mode.micro_tile_mode_raw();
    let macro_mode = dev.info.macrotile_mode(surf.macro_tile_index);
    let bank_h = macro_mode.bank_height();
    let bank_w = macro_mode.bank_width();
    let mt_aspect = macro_mode.macro_tile_aspect();
    let nbanks = macro_mode.num_banks();

    let pitch_tile_max = til_info.pitch / 8 - 1;
    let slice_tile_max = til_info.slice_pitch / 64 - 1;
    let tile_split = log2u(surf.tile_split >> 6);
    let height = minify(til_image.height, til_info.mip_level);

    let adjusted = match clamp_last_line(&[info.src.offset.y, info.dst.offset.y], info.extent) {
        Some(e) => e,
        None => return,
    };

    let mut total_width_copied = 0;
    while total_width_copied < adjusted.width {
        let (next_extent, lin_offset) =
            next_partial_window(adjusted, lin_info.offset, lin_info.bpp, total_width_copied);
        let (_, til_offset) =
            next_partial_window(adjusted, til_info.offset, til_info.bpp, total_width_copied);

        let this_lin_va = linear_base_addr(lin_info, lin_offset);

        let mut tile_info0 = if src_is_linear { 0 } else { 1 << 31 };
        tile_info0 |= log2u(til_info.bpp) << 24;
        tile_info0 |= (array_mode << 27) | (bank_h << 21) | (bank_w << 18);
        tile_info0 |= mt_aspect << 16;

        let tile_info4 = til_offset.y | (tile_split << 21) | (nbanks << 25) | (mt << 27);

        cmd.cs.reserve(12);
        cmd.cs
            .emit(si_pkt(SI_DMA_COPY, SI_DMA_COPY_L2T_PARTIAL, 0));
        cmd.cs.emit((til_info.va >> 8) as u32);
        cmd.cs.emit(tile_info0);
        cmd.cs.emit(pitch_tile_max | ((height - 1) << 16));
        cmd.cs.emit(slice_tile_max | (pipe_config << 26));
        cmd.cs.emit(til_offset.x | (til_offset.z << 18));
        cmd.cs.emit(tile_info4);
        cmd.cs.emit((this_lin_va & 0xffff_fffc) as u32);
        cmd.cs
            .emit((((this_lin_va >> 32) & 0xff) as u32) | ((lin_info.pitch * lin_info.bpp) << 13));
        cmd.cs.emit(lin_info.slice_pitch * lin_info.bpp);
        cmd.cs.emit(next_extent.width | (next_extent.height << 16));
        cmd.cs.emit(next_extent.depth);

        total_width_copied += next_extent.width;
    }
}

pub(super) fn copy_image_tiled(
    cmd: &mut CmdBuffer<'_>,
    info: &ImageImageInfo,
    src_image: &Image,
    dst_image: &Image,
) {
    let dev = cmd.device;

    let src_pitch_tile_max = info.src.pitch / 8 - 1;
    let src_slice_tile_max = info.src.slice_pitch / 64 - 1;
    let dst_pitch_tile_max = info.dst.pitch / 8 - 1;
    let dst_slice_tile_max = info.dst.slice_pitch / 64 - 1;

    let tile_mode = dev.info.tile_mode(
        src_image.surface.legacy().tiling_index[info.src.mip_level as usize],
    );
    let array_mode = tile_mode.array_mode() as u32;
    let pipe_config = tile_mode.pipe_config();
    let mt = tile_mode.micro_tile_mode_raw();
    let macro_mode = dev
        .info
        .macrotile_mode(src_image.surface.legacy().macro_tile_index);
    let bank_h = macro_mode.bank_height();
    let bank_w = macro_mode.bank_width();
    let mt_aspect = macro_mode.macro_tile_aspect();
    let nbanks = macro_mode.num_banks();
    let tile_split = log2u(dst_image.surface.legacy().tile_split >> 6);

    let src_height = minify(src_image.height, info.src.mip_level);
    let dst_height = minify(dst_image.height, info.dst.mip_level);

    let info0 = (tile_split << 3)
        | (nbanks << 7)
        | (mt << 9)
        | (mt_aspect << 16)
        | (bank_w << 18)
        | (bank_h << 21)
        | (log2u(info.src.bpp) << 24)
        | (array_mode << 27);

    let adjusted = match clamp_last_line(&[info.src.offset.y, info.dst.offset.y], info.extent) {
        Some(e) => e,
        None => return,
    };

    let mut total_width_copied = 0;
    while total_width_copied < adjusted.width {
        let (next_extent, _) =
            next_partial_window(adjusted, info.src.offset, info.src.bpp, total_width_copied);

        let xinfo1 = (info.dst.offset.x + total_width_copied)
            | ((info.src.offset.x + total_width_copied) << 16);
        let yinfo1 = info.dst.offset.y | (info.src.offset.y << 16);
        let zinfo2 = info.dst.offset.z | (info.src.offset.z << 16);

        cmd.cs.reserve(13);
        cmd.cs
            .emit(si_pkt(SI_DMA_COPY, SI_DMA_COPY_T2T_PARTIAL, 0));
        cmd.cs.emit((info.src.va >> 8) as u32);
        cmd.cs
            .emit(src_pitch_tile_max | ((src_height - 1) << 16));
        cmd.cs.emit(src_slice_tile_max | (pipe_config << 26));
        cmd.cs.emit((info.dst.va >> 8) as u32);
        cmd.cs
            .emit(dst_pitch_tile_max | ((dst_height - 1) << 16));
        cmd.cs.emit(dst_slice_tile_max | (pipe_config << 26));
        cmd.cs.emit(info0);
        cmd.cs.emit(xinfo1);
        cmd.cs.emit(yinfo1);
        cmd.cs.emit(zinfo2);
        cmd.cs.emit(next_extent.width | (next_extent.height << 16));
        cmd.cs.emit(next_extent.depth);

        total_width_copied += next_extent.width;
    }
}

pub(super) fn use_scanline_t2t(
    info: &ImageImageInfo,
    src_image: &Image,
    dst_image: &Image,
) -> bool {
    let src_tile_index = src_image.surface.legacy().tiling_index[info.src.mip_level as usize];
    let dst_tile_index = dst_image.surface.legacy().tiling_index[info.dst.mip_level as usize];

    if src_tile_index != dst_tile_index {
        return true;
    }

    // If the height-limit workaround would drop a line, scanline copies
    // preserve the full region instead.
    let adjusted: Option<Extent3D> =
        clamp_last_line(&[info.src.offset.y, info.dst.offset.y], info.extent);
    match adjusted {
        None => return true,
        Some(e) if e.height != info.extent.height => return true,
        Some(_) => {}
    }

    // Copying 2D into 3D with mismatched slices corrupts on this
    // engine.
    if src_image.ty == ImageType::Type2D
        && dst_image.ty == ImageType::Type3D
        && info.dst.offset.z > 0
        && info.dst.offset.z != info.src.offset.z
    {
        return true;
    }
    false
}
