mod common;

use common::{buffer, device};
use helio_cs::CmdStream;
use helio_sdma::pkt::{
    sdma_pkt, si_pkt, SDMA_CONST_FILL_DWORDS, SDMA_OP_CONST_FILL, SDMA_OP_COPY, SDMA_OP_WRITE,
    SDMA_SUBOP_COPY_LINEAR, SDMA_SUBOP_WRITE_LINEAR, SI_DMA_CONST_FILL, SI_DMA_COPY,
    SI_DMA_COPY_BYTE_ALIGNED, SI_DMA_COPY_DWORD_ALIGNED, SI_DMA_WRITE,
};
use helio_sdma::{CmdBuffer, GfxLevel};
use pretty_assertions::assert_eq;

#[test]
fn one_mib_fill_is_a_single_packet_on_gfx8() {
    let dev = device(GfxLevel::Gfx8);
    let mut cmd = CmdBuffer::new(&dev, 64);
    let dst = buffer(0x1_0000_0000, 1 << 20);

    cmd.fill_buffer(&dst, 0, 1 << 20, 0xdead_beef);

    let dw = cmd.cs.dwords();
    assert_eq!(dw.len(), 5);
    assert_eq!(dw[0], sdma_pkt(SDMA_OP_CONST_FILL, 0, SDMA_CONST_FILL_DWORDS));
    assert_eq!(dw[1], 0);
    assert_eq!(dw[2], 1);
    assert_eq!(dw[3], 0xdead_beef);
    assert_eq!(dw[4], 1 << 20);
}

#[test]
fn gfx9_fill_count_is_minus_one() {
    let dev = device(GfxLevel::Gfx9);
    let mut cmd = CmdBuffer::new(&dev, 64);
    let dst = buffer(0x1_0000_0000, 1 << 20);

    cmd.fill_buffer(&dst, 0, 1 << 20, 0);

    let dw = cmd.cs.dwords();
    assert_eq!(dw.len(), 5);
    assert_eq!(dw[4], (1 << 20) - 1);
}

#[test]
fn one_mib_fill_splits_into_sixteen_packets_on_gfx6() {
    let dev = device(GfxLevel::Gfx6);
    let mut cmd = CmdBuffer::new(&dev, 64);
    let dst = buffer(0x1_0000_0000, 1 << 20);

    cmd.fill_buffer(&dst, 0, 1 << 20, 0x55);

    let dw = cmd.cs.dwords();
    assert_eq!(dw.len(), 16 * 4);
    for pkt in 0..16 {
        assert_eq!(dw[pkt * 4], si_pkt(SI_DMA_CONST_FILL, 0, 0x4000));
        // Each packet covers 0x4000 dwords.
        assert_eq!(dw[pkt * 4 + 1], (pkt as u32) * 0x1_0000);
        assert_eq!(dw[pkt * 4 + 2], 0x55);
    }
}

#[test]
fn fill_size_is_truncated_to_dwords() {
    let dev = device(GfxLevel::Gfx8);
    let mut cmd = CmdBuffer::new(&dev, 64);
    let dst = buffer(0x1000, 64);

    cmd.fill_buffer(&dst, 0, 10, 0);

    let dw = cmd.cs.dwords();
    assert_eq!(dw.len(), 5);
    assert_eq!(dw[4], 8);
}

#[test]
fn aligned_copies_stay_in_dword_mode() {
    let dev = device(GfxLevel::Gfx8);
    let mut cmd = CmdBuffer::new(&dev, 64);
    let src = buffer(0x1000, 64);
    let dst = buffer(0x2000, 64);

    // 10 bytes: an 8-byte dword chunk, then a 2-byte tail.
    cmd.copy_buffer(
        &src,
        &dst,
        &[helio_sdma::surface::BufferCopy {
            src_offset: 0,
            dst_offset: 0,
            size: 10,
        }],
    );

    let dw = cmd.cs.dwords();
    assert_eq!(dw.len(), 14);
    assert_eq!(dw[0], sdma_pkt(SDMA_OP_COPY, SDMA_SUBOP_COPY_LINEAR, 0));
    assert_eq!(dw[1], 8);
    assert_eq!(dw[3], 0x1000);
    assert_eq!(dw[5], 0x2000);
    assert_eq!(dw[8], 2);
    assert_eq!(dw[10], 0x1008);
    assert_eq!(dw[12], 0x2008);
}

#[test]
fn gfx9_copy_count_is_minus_one() {
    let dev = device(GfxLevel::Gfx9);
    let mut cmd = CmdBuffer::new(&dev, 64);
    let src = buffer(0x1000, 64);
    let dst = buffer(0x2000, 64);

    cmd.copy_buffer(
        &src,
        &dst,
        &[helio_sdma::surface::BufferCopy {
            src_offset: 0,
            dst_offset: 0,
            size: 16,
        }],
    );

    let dw = cmd.cs.dwords();
    assert_eq!(dw.len(), 7);
    assert_eq!(dw[1], 15);
}

#[test]
fn gfx6_copy_emits_destination_first() {
    let dev = device(GfxLevel::Gfx6);
    let mut cmd = CmdBuffer::new(&dev, 64);
    let src = buffer(0x12_0000_1000, 64);
    let dst = buffer(0x34_0000_2000, 64);

    cmd.copy_buffer(
        &src,
        &dst,
        &[helio_sdma::surface::BufferCopy {
            src_offset: 0,
            dst_offset: 0,
            size: 16,
        }],
    );

    let dw = cmd.cs.dwords();
    assert_eq!(dw.len(), 5);
    assert_eq!(dw[0], si_pkt(SI_DMA_COPY, SI_DMA_COPY_DWORD_ALIGNED, 4));
    assert_eq!(dw[1], 0x2000);
    assert_eq!(dw[2], 0x1000);
    assert_eq!(dw[3], 0x34);
    assert_eq!(dw[4], 0x12);
}

#[test]
fn gfx6_unaligned_copy_uses_the_byte_encoding() {
    let dev = device(GfxLevel::Gfx6);
    let mut cmd = CmdBuffer::new(&dev, 64);
    let src = buffer(0x1001, 64);
    let dst = buffer(0x2000, 64);

    cmd.copy_buffer(
        &src,
        &dst,
        &[helio_sdma::surface::BufferCopy {
            src_offset: 0,
            dst_offset: 0,
            size: 10,
        }],
    );

    let dw = cmd.cs.dwords();
    assert_eq!(dw.len(), 5);
    assert_eq!(dw[0], si_pkt(SI_DMA_COPY, SI_DMA_COPY_BYTE_ALIGNED, 10));
}

#[test]
fn update_buffer_chunks_at_stream_capacity() {
    let dev = device(GfxLevel::Gfx8);
    let mut cmd = CmdBuffer::with_stream(&dev, CmdStream::new(8));
    let dst = buffer(0x4000, 64);
    let data: Vec<u8> = (0u8..32).collect();

    cmd.update_buffer(&dst, 0, &data);

    let dw = cmd.cs.dwords();
    // The first window fits 4 payload dwords; the stream grows and the
    // remaining 4 land in a second packet at the advanced address.
    assert_eq!(dw.len(), 16);
    assert_eq!(dw[0], sdma_pkt(SDMA_OP_WRITE, SDMA_SUBOP_WRITE_LINEAR, 0));
    assert_eq!(dw[1], 0x4000);
    assert_eq!(dw[3], 4);
    assert_eq!(dw[4], u32::from_le_bytes([0, 1, 2, 3]));
    assert_eq!(dw[8], sdma_pkt(SDMA_OP_WRITE, SDMA_SUBOP_WRITE_LINEAR, 0));
    assert_eq!(dw[9], 0x4000 + 16);
    assert_eq!(dw[11], 4);
    assert_eq!(dw[12], u32::from_le_bytes([16, 17, 18, 19]));
}

#[test]
fn gfx9_update_count_is_minus_one() {
    let dev = device(GfxLevel::Gfx9);
    let mut cmd = CmdBuffer::new(&dev, 64);
    let dst = buffer(0x4000, 64);

    cmd.update_buffer(&dst, 0, &[0u8; 12]);

    let dw = cmd.cs.dwords();
    assert_eq!(dw.len(), 7);
    assert_eq!(dw[3], 2);
}

#[test]
fn gfx6_update_header_is_three_dwords() {
    let dev = device(GfxLevel::Gfx6);
    let mut cmd = CmdBuffer::new(&dev, 64);
    let dst = buffer(0x12_0000_4000, 64);

    cmd.update_buffer(&dst, 0, &[0xaau8; 12]);

    let dw = cmd.cs.dwords();
    assert_eq!(dw.len(), 6);
    assert_eq!(dw[0], si_pkt(SI_DMA_WRITE, 0, 3));
    assert_eq!(dw[1], 0x4000);
    assert_eq!(dw[2], 0x12);
    assert_eq!(dw[3], 0xaaaa_aaaa);
}

#[test]
fn empty_update_emits_nothing() {
    let dev = device(GfxLevel::Gfx8);
    let mut cmd = CmdBuffer::new(&dev, 64);
    let dst = buffer(0x4000, 64);

    cmd.update_buffer(&dst, 0, &[]);

    assert_eq!(cmd.cs.dwords().len(), 0);
}
