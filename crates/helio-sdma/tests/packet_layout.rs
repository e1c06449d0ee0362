//! Golden dword sequences for one packet of each encoding family.

mod common;

use common::{buffer, device, gfx9_image, linear_image, tiled_image};
use helio_sdma::pkt::{
    sdma_pkt, si_pkt, SDMA_OP_COPY, SDMA_SUBOP_COPY_LINEAR_SUB_WINDOW,
    SDMA_SUBOP_COPY_TILED_SUB_WINDOW, SI_DMA_CONST_FILL, SI_DMA_COPY, SI_DMA_COPY_LINEAR_PARTIAL,
    SI_DMA_COPY_T2T_PARTIAL,
};
use helio_sdma::surface::{
    BufferImageCopy, Extent3D, ImageAspectFlags, ImageCopy, Offset3D, SubresourceLayers,
};
use helio_sdma::{CmdBuffer, GfxLevel};
use pretty_assertions::assert_eq;

fn layers() -> SubresourceLayers {
    SubresourceLayers {
        aspect_mask: ImageAspectFlags::COLOR,
        mip_level: 0,
        base_array_layer: 0,
        layer_count: 1,
    }
}

#[test]
fn gfx8_linear_sub_window_golden() {
    let dev = device(GfxLevel::Gfx8);
    let mut cmd = CmdBuffer::new(&dev, 64);
    let buf = buffer(0x1000_0000, 0x10000);
    let img = linear_image(64, 64, 4, 0x2000_0000);

    let region = BufferImageCopy {
        buffer_offset: 256,
        buffer_row_length: 32,
        buffer_image_height: 16,
        image_subresource: layers(),
        image_offset: Offset3D { x: 4, y: 8, z: 0 },
        image_extent: Extent3D {
            width: 16,
            height: 8,
            depth: 1,
        },
    };
    cmd.copy_buffer_to_image(&buf, &img, &[region]);

    assert_eq!(
        cmd.cs.dwords(),
        &[
            sdma_pkt(SDMA_OP_COPY, SDMA_SUBOP_COPY_LINEAR_SUB_WINDOW, 0) | (2 << 29),
            0x1000_0100,    // buffer va lo
            0,              // buffer va hi
            0,              // buffer x,y
            31 << 16,       // buffer pitch - 1
            511,            // buffer slice pitch - 1
            0x2000_0000,    // image va lo
            0,              // image va hi
            4 | (8 << 16),  // image x,y
            63 << 16,       // image z, pitch - 1
            4095,           // image slice pitch - 1
            15 | (7 << 16), // extent - 1
            0,              // depth - 1
        ]
    );
}

#[test]
fn gfx7_extents_are_raw_where_gfx8_is_minus_one() {
    let buf = buffer(0x1000_0000, 0x10000);
    let img = linear_image(64, 64, 4, 0x2000_0000);
    let region = BufferImageCopy {
        buffer_offset: 0,
        buffer_row_length: 0,
        buffer_image_height: 0,
        image_subresource: layers(),
        image_offset: Offset3D::default(),
        image_extent: Extent3D {
            width: 16,
            height: 4,
            depth: 1,
        },
    };

    let dev7 = device(GfxLevel::Gfx7);
    let mut cmd7 = CmdBuffer::new(&dev7, 64);
    cmd7.copy_buffer_to_image(&buf, &img, &[region]);
    let dw7 = cmd7.cs.dwords();
    assert_eq!(dw7.len(), 13);
    assert_eq!(dw7[11], 16 | (4 << 16));
    assert_eq!(dw7[12], 1);

    let dev8 = device(GfxLevel::Gfx8);
    let mut cmd8 = CmdBuffer::new(&dev8, 64);
    cmd8.copy_buffer_to_image(&buf, &img, &[region]);
    let dw8 = cmd8.cs.dwords();
    assert_eq!(dw8.len(), 13);
    assert_eq!(dw8[11], 15 | (3 << 16));
    assert_eq!(dw8[12], 0);
}

#[test]
fn gfx9_tiled_sub_window_fields() {
    let dev = device(GfxLevel::Gfx9);
    let mut cmd = CmdBuffer::new(&dev, 64);
    let buf = buffer(0x1000_0000, 0x10000);
    let img = gfx9_image(64, 64, 4, 0x2000_0000, false);

    let region = BufferImageCopy {
        buffer_offset: 0,
        buffer_row_length: 0,
        buffer_image_height: 0,
        image_subresource: layers(),
        image_offset: Offset3D::default(),
        image_extent: Extent3D {
            width: 16,
            height: 16,
            depth: 1,
        },
    };
    cmd.copy_buffer_to_image(&buf, &img, &[region]);

    let dw = cmd.cs.dwords();
    assert_eq!(dw.len(), 14);
    // Mip chain fields live in the header on this generation.
    assert_eq!(dw[0], sdma_pkt(SDMA_OP_COPY, SDMA_SUBOP_COPY_TILED_SUB_WINDOW, 0));
    assert_eq!(dw[4], 63 << 16);
    assert_eq!(dw[5], 63);
    // bpp log2, swizzle mode, 2D dimension, epitch.
    assert_eq!(dw[6], 2 | (9 << 3) | (1 << 9) | (63 << 16));
    assert_eq!(dw[12], 15 | (15 << 16));
    assert_eq!(dw[13], 0);
}

#[test]
fn gfx6_fill_golden() {
    let dev = device(GfxLevel::Gfx6);
    let mut cmd = CmdBuffer::new(&dev, 64);
    let dst = buffer(0x12_3456_7800, 256);

    cmd.fill_buffer(&dst, 0, 64, 0x55);

    assert_eq!(
        cmd.cs.dwords(),
        &[
            si_pkt(SI_DMA_CONST_FILL, 0, 16),
            0x3456_7800,
            0x55,
            0x12 << 16,
        ]
    );
}

#[test]
fn gfx6_linear_partial_golden() {
    let dev = device(GfxLevel::Gfx6);
    let mut cmd = CmdBuffer::new(&dev, 64);
    let buf = buffer(0x1000_0000, 0x10000);
    let img = linear_image(64, 64, 4, 0x3000_0000);

    let region = BufferImageCopy {
        buffer_offset: 0,
        buffer_row_length: 0,
        buffer_image_height: 0,
        image_subresource: layers(),
        image_offset: Offset3D::default(),
        image_extent: Extent3D {
            width: 16,
            height: 4,
            depth: 1,
        },
    };
    cmd.copy_buffer_to_image(&buf, &img, &[region]);

    // The engine wants the destination pitch in the source slot and vice
    // versa on this path; pitches are in elements here.
    assert_eq!(
        cmd.cs.dwords(),
        &[
            si_pkt(SI_DMA_COPY, SI_DMA_COPY_LINEAR_PARTIAL, 0),
            0x1000_0000,    // buffer (source) va lo
            64 << 13,       // va hi | image pitch
            4096,           // image slice pitch
            0x3000_0000,    // image (destination) va lo
            16 << 13,       // va hi | buffer pitch
            64,             // buffer slice pitch
            16 | (4 << 16), // extent
            1 | (4 << 29),  // depth | bpp
        ]
    );
}

#[test]
fn gfx6_tiled_pair_golden() {
    let dev = device(GfxLevel::Gfx6);
    let mut cmd = CmdBuffer::new(&dev, 64);
    let src = tiled_image(64, 64, 4, 0x1000_0000, 8);
    let dst = tiled_image(64, 64, 4, 0x2000_0000, 8);

    let region = ImageCopy {
        src_subresource: layers(),
        src_offset: Offset3D::default(),
        dst_subresource: layers(),
        dst_offset: Offset3D::default(),
        extent: Extent3D {
            width: 16,
            height: 16,
            depth: 1,
        },
    };
    cmd.copy_image(&src, &dst, &[region]);

    // tile_split 0, nbanks 2, micro mode 1, aspect 1, bank_w 0,
    // bank_h 1, bpp log2 2, array mode 4.
    let info0 = (2 << 7) | (1 << 9) | (1 << 16) | (1 << 21) | (2 << 24) | (4 << 27);
    assert_eq!(
        cmd.cs.dwords(),
        &[
            si_pkt(SI_DMA_COPY, SI_DMA_COPY_T2T_PARTIAL, 0),
            0x0010_0000,     // src va >> 8
            7 | (63 << 16),  // src pitch_tile_max | height - 1
            63 | (2 << 26),  // src slice_tile_max | pipe config
            0x0020_0000,     // dst va >> 8
            7 | (63 << 16),
            63 | (2 << 26),
            info0,
            0, // x offsets
            0, // y offsets
            0, // z offsets
            16 | (16 << 16),
            1,
        ]
    );
}
