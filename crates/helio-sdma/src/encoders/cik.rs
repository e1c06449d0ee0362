//! GFX7 sub-window encoders.
//!
//! Same packet shapes as the shared GFX8/GFX9 forms, but the extent
//! fields are raw (no minus-one encoding) and any dimension hitting the
//! 16K field limit must be partitioned into multiple sub-transfers.

use crate::cmd_buffer::{CmdBuffer, RecordError};
use crate::geometry::{div_round_up, minify_as_blocks, ImageBufferInfo, ImageImageInfo};
use crate::pkt::{
    log2u, sdma_pkt, MAX_DIM, SDMA_OP_COPY, SDMA_SUBOP_COPY_LINEAR_SUB_WINDOW,
    SDMA_SUBOP_COPY_T2T_SUB_WINDOW, SDMA_SUBOP_COPY_TILED_SUB_WINDOW,
};
use crate::surface::Image;
use crate::workarounds::{coalesced_tail_width, limit_split, linear_window_in_bounds};

use super::common::{encode_tile_info, lin_til_roles, t2t_coalesced};

pub(super) fn copy_one_lin_to_lin(cmd: &mut CmdBuffer<'_>, info: &ImageBufferInfo, buf2img: bool) {
    let img = &info.image;
    let buf = &info.buf;

    let src_va = if buf2img { buf.va } else { img.va };
    let dst_va = if buf2img { img.va } else { buf.va };

    let img_z_pitch = img.offset.z | ((img.pitch - 1) << 16);
    let buf_z_pitch = (buf.pitch - 1) << 16;
    let src_z_pitch = if buf2img { buf_z_pitch } else { img_z_pitch };
    let dst_z_pitch = if buf2img { img_z_pitch } else { buf_z_pitch };
    let src_slice_pitch = if buf2img { buf.slice_pitch } else { img.slice_pitch } - 1;
    let dst_slice_pitch = if buf2img { img.slice_pitch } else { buf.slice_pitch } - 1;

    let split = limit_split(info.extent);
    for x in 0..split.num_x {
        for y in 0..split.num_y {
            let img_xy = (img.offset.x + x * split.width)
                | ((img.offset.y + y * split.height) << 16);
            let buf_xy = (x * split.width) | ((y * split.height) << 16);
            let src_xy = if buf2img { buf_xy } else { img_xy };
            let dst_xy = if buf2img { img_xy } else { buf_xy };

            cmd.cs.reserve(13);
            cmd.cs.emit(
                sdma_pkt(SDMA_OP_COPY, SDMA_SUBOP_COPY_LINEAR_SUB_WINDOW, 0)
                    | (log2u(img.bpp) << 29),
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
            cmd.cs.emit(split.width | (split.height << 16));
            cmd.cs.emit(info.extent.depth);
        }
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

    let mut copy_width = div_round_up(info.extent.width, image.surface.blk_w);
    let mut copy_height = div_round_up(info.extent.height, image.surface.blk_h);

    let dword0 = sdma_pkt(SDMA_OP_COPY, SDMA_SUBOP_COPY_TILED_SUB_WINDOW, 0)
        | if buf2img { 0 } else { 1 << 31 };

    let pitch_tile_max = img.pitch / 8 - 1;
    let slice_tile_max = img.slice_pitch / 64 - 1;
    let dword4 = img.offset.z | (pitch_tile_max << 16);
    let dword5 = slice_tile_max;

    let mut num_x_xfers = 1;
    let mut num_y_xfers = 1;
    if copy_width == MAX_DIM {
        num_x_xfers += 1;
        copy_width /= 2;
    }
    // An image bottom edge landing exactly on the limit needs its last
    // line transferred separately.
    if img.offset.y + copy_height == MAX_DIM && copy_height > 1 {
        num_y_xfers += 1;
        copy_height -= 1;
    }

    for x in 0..num_x_xfers {
        for y in 0..num_y_xfers {
            let img_xy = (img.offset.x + x * copy_width)
                | ((img.offset.y + y * copy_height) << 16);
            let buf_xy = (x * copy_width) | ((y * copy_height) << 16);

            cmd.cs.reserve(14);
            cmd.cs.emit(dword0);
            cmd.cs.emit(img.va as u32);
            cmd.cs.emit((img.va >> 32) as u32);
            cmd.cs.emit(img_xy);
            cmd.cs.emit(dword4);
            cmd.cs.emit(dword5);
            cmd.cs
                .emit(encode_tile_info(&dev.info, image, img.mip_level, true));
            cmd.cs.emit(buf.va as u32);
            cmd.cs.emit((buf.va >> 32) as u32);
            cmd.cs.emit(buf_xy);
            cmd.cs.emit((buf.pitch - 1) << 16);
            cmd.cs.emit(buf.slice_pitch - 1);
            cmd.cs
                .emit(copy_width | ((if y == 0 { copy_height } else { 1 }) << 16));
            cmd.cs.emit(info.extent.depth);
        }
    }
}

pub(super) fn copy_image_lin_to_lin(cmd: &mut CmdBuffer<'_>, info: &ImageImageInfo) {
    let split = limit_split(info.extent);
    for x in 0..split.num_x {
        for y in 0..split.num_y {
            let src_xy = (info.src.offset.x + x * split.width)
                | ((info.src.offset.y + y * split.height) << 16);
            let dst_xy = (info.dst.offset.x + x * split.width)
                | ((info.dst.offset.y + y * split.height) << 16);

            cmd.cs.reserve(13);
            cmd.cs.emit(
                sdma_pkt(SDMA_OP_COPY, SDMA_SUBOP_COPY_LINEAR_SUB_WINDOW, 0)
                    | (log2u(info.src.bpp) << 29),
            );
            cmd.cs.emit(info.src.va as u32);
            cmd.cs.emit((info.src.va >> 32) as u32);
            cmd.cs.emit(src_xy);
            cmd.cs
                .emit(info.src.offset.z | ((info.src.pitch - 1) << 16));
            cmd.cs.emit(info.src.slice_pitch - 1);
            cmd.cs.emit(info.dst.va as u32);
            cmd.cs.emit((info.dst.va >> 32) as u32);
            cmd.cs.emit(dst_xy);
            cmd.cs
                .emit(info.dst.offset.z | ((info.dst.pitch - 1) << 16));
            cmd.cs.emit(info.dst.slice_pitch - 1);
            cmd.cs.emit(split.width | (split.height << 16));
            cmd.cs.emit(info.extent.depth);
        }
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

    assert!(til_info.pitch % 8 == 0);
    assert!(til_info.slice_pitch % 64 == 0);

    let bpp = lin_info.bpp;
    let xalign = (4 / bpp).max(1);
    let copy_width = div_round_up(info.extent.width, roles.til_image.surface.blk_w);
    let mut copy_height = div_round_up(info.extent.height, roles.til_image.surface.blk_h);
    let copy_depth = info.extent.depth;

    let mut copy_width_aligned = coalesced_tail_width(
        copy_width,
        xalign,
        lin_info.offset.x,
        lin_width,
        lin_info.pitch,
        til_info.offset.x,
        til_width,
        til_info.pitch,
    );

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

    let dword0 = sdma_pkt(SDMA_OP_COPY, SDMA_SUBOP_COPY_TILED_SUB_WINDOW, 0)
        | if roles.src_is_linear { 0 } else { 1 << 31 };

    let pitch_tile_max = til_info.pitch / 8 - 1;
    let slice_tile_max = til_info.slice_pitch / 64 - 1;
    let dword4 = til_info.offset.z | (pitch_tile_max << 16);
    let dword5 = slice_tile_max;

    let mut num_x_xfers = 1;
    let mut num_y_xfers = 1;
    // A width at the field limit sheds an 8-pixel column into a second
    // transfer; the linear window stays put, only the tiled x advances.
    if copy_width_aligned == MAX_DIM {
        copy_width_aligned -= 8;
        num_x_xfers += 1;
    }
    if til_info.offset.y + copy_height == MAX_DIM && copy_height > 1 {
        num_y_xfers += 1;
        copy_height -= 1;
    }

    for x in 0..num_x_xfers {
        for y in 0..num_y_xfers {
            let til_xy = (til_info.offset.x + x * copy_width_aligned)
                | ((til_info.offset.y + y * copy_height) << 16);
            let lin_xy = lin_info.offset.x | (lin_info.offset.y << 16);

            cmd.cs.reserve(14);
            cmd.cs.emit(dword0);
            cmd.cs.emit(til_info.va as u32);
            cmd.cs.emit((til_info.va >> 32) as u32);
            cmd.cs.emit(til_xy);
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
            cmd.cs.emit(lin_xy);
            cmd.cs
                .emit(lin_info.offset.z | ((lin_info.pitch - 1) << 16));
            cmd.cs.emit(lin_info.slice_pitch - 1);
            cmd.cs.emit(
                (if x == 0 { copy_width_aligned } else { 8 })
                    | ((if y == 0 { copy_height } else { 1 }) << 16),
            );
            cmd.cs.emit(copy_depth);
        }
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

    let copy_width = div_round_up(info.extent.width, src_image.surface.blk_w);
    let copy_height = div_round_up(info.extent.height, src_image.surface.blk_h);

    let mut copy_width_aligned =
        t2t_coalesced(copy_width, info.src.offset.x, src_width, info.dst.offset.x, dst_width);
    let mut copy_height_aligned =
        t2t_coalesced(copy_height, info.src.offset.y, src_height, info.dst.offset.y, dst_height);

    let dword4 = info.src.offset.z | ((info.src.pitch / 8 - 1) << 16);
    let dword5 = info.src.slice_pitch / 64 - 1;
    let dword10 = info.dst.offset.z | ((info.dst.pitch / 8 - 1) << 16);
    let dword11 = info.dst.slice_pitch / 64 - 1;

    let num_x_xfers = 1;
    let mut num_y_xfers = 1;
    if copy_width_aligned == MAX_DIM {
        copy_width_aligned -= 1;
    }
    if info.dst.offset.y + copy_height_aligned == MAX_DIM && copy_height_aligned > 1 {
        num_y_xfers += 1;
        copy_height_aligned -= 1;
    }

    for x in 0..num_x_xfers {
        for y in 0..num_y_xfers {
            let src_xy = (info.src.offset.x + x * copy_width_aligned)
                | ((info.src.offset.y + y * copy_height_aligned) << 16);
            let dst_xy = (info.dst.offset.x + x * copy_width_aligned)
                | ((info.dst.offset.y + y * copy_height_aligned) << 16);

            cmd.cs.reserve(15);
            cmd.cs
                .emit(sdma_pkt(SDMA_OP_COPY, SDMA_SUBOP_COPY_T2T_SUB_WINDOW, 0));
            cmd.cs.emit(info.src.va as u32);
            cmd.cs.emit((info.src.va >> 32) as u32);
            cmd.cs.emit(src_xy);
            cmd.cs.emit(dword4);
            cmd.cs.emit(dword5);
            cmd.cs.emit(encode_tile_info(
                &dev.info,
                src_image,
                info.src.mip_level,
                true,
            ));
            cmd.cs.emit(info.dst.va as u32);
            cmd.cs.emit((info.dst.va >> 32) as u32);
            cmd.cs.emit(dst_xy);
            cmd.cs.emit(dword10);
            cmd.cs.emit(dword11);
            cmd.cs.emit(encode_tile_info(
                &dev.info,
                dst_image,
                info.dst.mip_level,
                false,
            ));
            cmd.cs.emit(
                copy_width_aligned | ((if y == 0 { copy_height_aligned } else { 1 }) << 16),
            );
            cmd.cs.emit(info.extent.depth);
        }
    }
}
