//! Wire-format constants and header builders for both DMA packet
//! encodings.
//!
//! GFX7 through GFX9 share a byte-opcode header layout; GFX6 uses the
//! older four-bit-command layout with a 20-bit count field.

/// GFX7+ opcodes.
pub const SDMA_OP_NOP: u32 = 0x0;
pub const SDMA_OP_COPY: u32 = 0x1;
pub const SDMA_OP_WRITE: u32 = 0x2;
pub const SDMA_OP_CONST_FILL: u32 = 0xb;

/// GFX7+ sub-opcodes.
pub const SDMA_SUBOP_COPY_LINEAR: u32 = 0x0;
pub const SDMA_SUBOP_COPY_LINEAR_SUB_WINDOW: u32 = 0x4;
pub const SDMA_SUBOP_COPY_TILED_SUB_WINDOW: u32 = 0x5;
pub const SDMA_SUBOP_COPY_T2T_SUB_WINDOW: u32 = 0x6;
pub const SDMA_SUBOP_WRITE_LINEAR: u32 = 0x0;

/// Constant-fill header bits 31:30 = 2 selects a 4-byte fill pattern.
pub const SDMA_CONST_FILL_DWORDS: u32 = 0x8000;

/// Largest linear-copy byte count, rounded down to keep chunk splits
/// dword-aligned.
pub const SDMA_COPY_MAX_SIZE: u64 = 0x3f_ff00;

/// Largest constant-fill byte count on GFX7+ (22-bit field, dword
/// granular).
pub const SDMA_FILL_MAX_SIZE: u64 = ((1 << 22) - 1) & !3;

/// Hardware limit on any sub-window copy dimension.
pub const MAX_DIM: u32 = 1 << 14;

/// GFX7+ packet header: 16-bit op-specific field, sub-opcode, opcode.
#[inline]
pub const fn sdma_pkt(op: u32, sub_op: u32, n: u32) -> u32 {
    ((n & 0xffff) << 16) | ((sub_op & 0xff) << 8) | (op & 0xff)
}

/// GFX6 commands.
pub const SI_DMA_COPY: u32 = 0x3;
pub const SI_DMA_WRITE: u32 = 0x4;
pub const SI_DMA_CONST_FILL: u32 = 0xd;
pub const SI_DMA_NOP: u32 = 0xf;

/// GFX6 copy sub-commands.
pub const SI_DMA_COPY_DWORD_ALIGNED: u32 = 0x00;
pub const SI_DMA_COPY_BYTE_ALIGNED: u32 = 0x40;
pub const SI_DMA_COPY_LINEAR_PARTIAL: u32 = 0x41;
pub const SI_DMA_COPY_L2T_PARTIAL: u32 = 0x49;
pub const SI_DMA_COPY_T2T_PARTIAL: u32 = 0x4d;

/// Largest constant-fill dword count per GFX6 packet.
pub const SI_DMA_FILL_MAX_DWORDS: u64 = 1 << 14;

/// GFX6 packet header: 4-bit command, 8-bit sub-command, 20-bit count.
#[inline]
pub const fn si_pkt(cmd: u32, sub: u32, n: u32) -> u32 {
    ((cmd & 0xf) << 28) | ((sub & 0xff) << 20) | (n & 0xf_ffff)
}

/// Floor log2 with `log2u(0) == 0`, matching the hardware field
/// conventions for zero tile splits.
#[inline]
pub const fn log2u(v: u32) -> u32 {
    31 - (v | 1).leading_zeros()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_field_packing() {
        assert_eq!(
            sdma_pkt(SDMA_OP_COPY, SDMA_SUBOP_COPY_LINEAR_SUB_WINDOW, 0),
            0x0000_0401
        );
        assert_eq!(
            sdma_pkt(SDMA_OP_CONST_FILL, 0, SDMA_CONST_FILL_DWORDS),
            0x8000_000b
        );
        assert_eq!(si_pkt(SI_DMA_NOP, 0, 0), 0xf000_0000);
        assert_eq!(si_pkt(SI_DMA_COPY, SI_DMA_COPY_BYTE_ALIGNED, 0x1234), 0x3400_1234);
    }

    #[test]
    fn limits_are_dword_granular() {
        assert_eq!(SDMA_COPY_MAX_SIZE % 4, 0);
        assert_eq!(SDMA_FILL_MAX_SIZE, 0x3f_fffc);
    }
}
