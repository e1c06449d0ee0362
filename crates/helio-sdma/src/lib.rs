//! DMA-engine transfer packet emission for four GPU generations.
//!
//! Lowers generation-agnostic buffer/image transfer requests into the
//! hardware DMA engine's packet stream. Two wire encodings are covered:
//! the original four-bit-opcode format (GFX6) and the byte-opcode format
//! shared by GFX7 through GFX9, each with its own per-generation quirks
//! and hardware-bug workarounds.
//!
//! Entry points live on [`CmdBuffer`]; the per-generation encoders sit
//! behind the [`TransferFns`] dispatch table selected once per
//! [`Device`].

pub mod cmd_buffer;
pub mod device;
pub mod encoders;
pub mod geometry;
pub mod pkt;
pub mod surface;
pub mod transfer;
pub mod workarounds;

pub use cmd_buffer::{CmdBuffer, RecordError};
pub use device::{Device, DeviceInfo, GfxLevel, StagingAllocator};
pub use encoders::{for_gfx_level, TransferFns};
