//! Per-generation packet encoder tables.
//!
//! Each hardware generation gets one [`TransferFns`] implementation,
//! selected exactly once at device creation. The orchestrator carries
//! no generation conditionals; everything goes through this seam.
//!
//! GFX7 through GFX9 share the byte-opcode encoders in [`common`], with
//! GFX7 taking the dimension-limit split variants in [`cik`]. GFX6 has
//! its own wire format and partial-window iteration in [`si`].

mod cik;
mod common;
mod si;

use crate::cmd_buffer::CmdBuffer;
use crate::device::{DeviceInfo, GfxLevel};
use crate::geometry::{ImageBufferInfo, ImageImageInfo, PerImageInfo};
use crate::surface::Image;

pub trait TransferFns: Sync {
    /// Emits one linear copy packet for up to `size` bytes and returns
    /// the bytes actually covered; the caller loops on the remainder.
    fn emit_copy_buffer(&self, cmd: &mut CmdBuffer<'_>, src_va: u64, dst_va: u64, size: u64)
        -> u64;

    /// Embeds `data` literally into the command stream, chunked by the
    /// stream's remaining capacity. `data.len()` must be a multiple of
    /// four.
    fn emit_update_buffer(&self, cmd: &mut CmdBuffer<'_>, dst_va: u64, data: &[u8]);

    /// Emits one constant-fill packet for up to `size` bytes and
    /// returns the bytes actually covered.
    fn emit_fill_buffer(&self, cmd: &mut CmdBuffer<'_>, dst_va: u64, size: u64, value: u32)
        -> u64;

    fn copy_buffer_image_l2l(&self, cmd: &mut CmdBuffer<'_>, info: &ImageBufferInfo, buf2img: bool);

    fn copy_buffer_image_l2t(
        &self,
        cmd: &mut CmdBuffer<'_>,
        info: &ImageBufferInfo,
        image: &Image,
        buf2img: bool,
    );

    fn copy_image_l2l(
        &self,
        cmd: &mut CmdBuffer<'_>,
        info: &ImageImageInfo,
        src_image: &Image,
        dst_image: &Image,
    );

    fn copy_image_l2t(
        &self,
        cmd: &mut CmdBuffer<'_>,
        info: &ImageImageInfo,
        src_image: &Image,
        dst_image: &Image,
    );

    fn copy_image_t2t(
        &self,
        cmd: &mut CmdBuffer<'_>,
        info: &ImageImageInfo,
        src_image: &Image,
        dst_image: &Image,
    );

    /// In-stream synchronization no-op.
    fn emit_nop(&self, cmd: &mut CmdBuffer<'_>);

    /// Fills in the layout-derived fields (va, pitch, slice pitch) of a
    /// per-image info whose request-derived fields are already set.
    fn per_image_layout(&self, image: &Image, is_stencil: bool, info: &mut PerImageInfo);

    /// Whether a tiled-to-tiled copy must fall back to the scanline
    /// staging strategy instead of the direct t2t packet.
    fn use_scanline_t2t(
        &self,
        dev: &DeviceInfo,
        info: &ImageImageInfo,
        src_image: &Image,
        dst_image: &Image,
    ) -> bool;
}

struct Sdma10;
struct Sdma20;
struct Sdma24;
struct Sdma40;

static SDMA10: Sdma10 = Sdma10;
static SDMA20: Sdma20 = Sdma20;
static SDMA24: Sdma24 = Sdma24;
static SDMA40: Sdma40 = Sdma40;

/// Selects the encoder table for a hardware generation.
pub fn for_gfx_level(level: GfxLevel) -> &'static dyn TransferFns {
    match level {
        GfxLevel::Gfx6 => &SDMA10,
        GfxLevel::Gfx7 => &SDMA20,
        GfxLevel::Gfx8 => &SDMA24,
        GfxLevel::Gfx9 => &SDMA40,
    }
}

impl TransferFns for Sdma10 {
    fn emit_copy_buffer(
        &self,
        cmd: &mut CmdBuffer<'_>,
        src_va: u64,
        dst_va: u64,
        size: u64,
    ) -> u64 {
        si::emit_copy_buffer(cmd, src_va, dst_va, size)
    }

    fn emit_update_buffer(&self, cmd: &mut CmdBuffer<'_>, dst_va: u64, data: &[u8]) {
        si::emit_update_buffer(cmd, dst_va, data)
    }

    fn emit_fill_buffer(
        &self,
        cmd: &mut CmdBuffer<'_>,
        dst_va: u64,
        size: u64,
        value: u32,
    ) -> u64 {
        si::emit_fill_buffer(cmd, dst_va, size, value)
    }

    fn copy_buffer_image_l2l(
        &self,
        cmd: &mut CmdBuffer<'_>,
        info: &ImageBufferInfo,
        buf2img: bool,
    ) {
        si::copy_one_lin_to_lin(cmd, info, buf2img)
    }

    fn copy_buffer_image_l2t(
        &self,
        cmd: &mut CmdBuffer<'_>,
        info: &ImageBufferInfo,
        image: &Image,
        buf2img: bool,
    ) {
        si::copy_one_lin_to_tiled(cmd, info, image, buf2img)
    }

    fn copy_image_l2l(
        &self,
        cmd: &mut CmdBuffer<'_>,
        info: &ImageImageInfo,
        _src_image: &Image,
        _dst_image: &Image,
    ) {
        si::copy_image_lin_to_lin(cmd, info)
    }

    fn copy_image_l2t(
        &self,
        cmd: &mut CmdBuffer<'_>,
        info: &ImageImageInfo,
        src_image: &Image,
        dst_image: &Image,
    ) {
        si::copy_image_lin_to_tiled(cmd, info, src_image, dst_image)
    }

    fn copy_image_t2t(
        &self,
        cmd: &mut CmdBuffer<'_>,
        info: &ImageImageInfo,
        src_image: &Image,
        dst_image: &Image,
    ) {
        si::copy_image_tiled(cmd, info, src_image, dst_image)
    }

    fn emit_nop(&self, cmd: &mut CmdBuffer<'_>) {
        si::emit_nop(cmd)
    }

    fn per_image_layout(&self, image: &Image, is_stencil: bool, info: &mut PerImageInfo) {
        common::legacy_per_image_layout(image, is_stencil, info)
    }

    fn use_scanline_t2t(
        &self,
        _dev: &DeviceInfo,
        info: &ImageImageInfo,
        src_image: &Image,
        dst_image: &Image,
    ) -> bool {
        si::use_scanline_t2t(info, src_image, dst_image)
    }
}

impl TransferFns for Sdma20 {
    fn emit_copy_buffer(
        &self,
        cmd: &mut CmdBuffer<'_>,
        src_va: u64,
        dst_va: u64,
        size: u64,
    ) -> u64 {
        common::emit_copy_buffer(cmd, src_va, dst_va, size)
    }

    fn emit_update_buffer(&self, cmd: &mut CmdBuffer<'_>, dst_va: u64, data: &[u8]) {
        common::emit_update_buffer(cmd, dst_va, data)
    }

    fn emit_fill_buffer(
        &self,
        cmd: &mut CmdBuffer<'_>,
        dst_va: u64,
        size: u64,
        value: u32,
    ) -> u64 {
        common::emit_fill_buffer(cmd, dst_va, size, value)
    }

    fn copy_buffer_image_l2l(
        &self,
        cmd: &mut CmdBuffer<'_>,
        info: &ImageBufferInfo,
        buf2img: bool,
    ) {
        cik::copy_one_lin_to_lin(cmd, info, buf2img)
    }

    fn copy_buffer_image_l2t(
        &self,
        cmd: &mut CmdBuffer<'_>,
        info: &ImageBufferInfo,
        image: &Image,
        buf2img: bool,
    ) {
        cik::copy_one_lin_to_tiled(cmd, info, image, buf2img)
    }

    fn copy_image_l2l(
        &self,
        cmd: &mut CmdBuffer<'_>,
        info: &ImageImageInfo,
        _src_image: &Image,
        _dst_image: &Image,
    ) {
        cik::copy_image_lin_to_lin(cmd, info)
    }

    fn copy_image_l2t(
        &self,
        cmd: &mut CmdBuffer<'_>,
        info: &ImageImageInfo,
        src_image: &Image,
        dst_image: &Image,
    ) {
        cik::copy_image_lin_to_tiled(cmd, info, src_image, dst_image)
    }

    fn copy_image_t2t(
        &self,
        cmd: &mut CmdBuffer<'_>,
        info: &ImageImageInfo,
        src_image: &Image,
        dst_image: &Image,
    ) {
        cik::copy_image_tiled(cmd, info, src_image, dst_image)
    }

    fn emit_nop(&self, cmd: &mut CmdBuffer<'_>) {
        common::emit_nop(cmd)
    }

    fn per_image_layout(&self, image: &Image, is_stencil: bool, info: &mut PerImageInfo) {
        common::legacy_per_image_layout(image, is_stencil, info)
    }

    fn use_scanline_t2t(
        &self,
        dev: &DeviceInfo,
        info: &ImageImageInfo,
        src_image: &Image,
        dst_image: &Image,
    ) -> bool {
        common::legacy_use_scanline_t2t(dev, info, src_image, dst_image)
    }
}

impl TransferFns for Sdma24 {
    fn emit_copy_buffer(
        &self,
        cmd: &mut CmdBuffer<'_>,
        src_va: u64,
        dst_va: u64,
        size: u64,
    ) -> u64 {
        common::emit_copy_buffer(cmd, src_va, dst_va, size)
    }

    fn emit_update_buffer(&self, cmd: &mut CmdBuffer<'_>, dst_va: u64, data: &[u8]) {
        common::emit_update_buffer(cmd, dst_va, data)
    }

    fn emit_fill_buffer(
        &self,
        cmd: &mut CmdBuffer<'_>,
        dst_va: u64,
        size: u64,
        value: u32,
    ) -> u64 {
        common::emit_fill_buffer(cmd, dst_va, size, value)
    }

    fn copy_buffer_image_l2l(
        &self,
        cmd: &mut CmdBuffer<'_>,
        info: &ImageBufferInfo,
        buf2img: bool,
    ) {
        common::copy_one_lin_to_lin(cmd, info, buf2img)
    }

    fn copy_buffer_image_l2t(
        &self,
        cmd: &mut CmdBuffer<'_>,
        info: &ImageBufferInfo,
        image: &Image,
        buf2img: bool,
    ) {
        common::copy_one_lin_to_tiled(cmd, info, image, buf2img)
    }

    fn copy_image_l2l(
        &self,
        cmd: &mut CmdBuffer<'_>,
        info: &ImageImageInfo,
        _src_image: &Image,
        _dst_image: &Image,
    ) {
        common::copy_image_lin_to_lin(cmd, info)
    }

    fn copy_image_l2t(
        &self,
        cmd: &mut CmdBuffer<'_>,
        info: &ImageImageInfo,
        src_image: &Image,
        dst_image: &Image,
    ) {
        common::copy_image_lin_to_tiled(cmd, info, src_image, dst_image)
    }

    fn copy_image_t2t(
        &self,
        cmd: &mut CmdBuffer<'_>,
        info: &ImageImageInfo,
        src_image: &Image,
        dst_image: &Image,
    ) {
        common::copy_image_tiled(cmd, info, src_image, dst_image)
    }

    fn emit_nop(&self, cmd: &mut CmdBuffer<'_>) {
        common::emit_nop(cmd)
    }

    fn per_image_layout(&self, image: &Image, is_stencil: bool, info: &mut PerImageInfo) {
        common::legacy_per_image_layout(image, is_stencil, info)
    }

    fn use_scanline_t2t(
        &self,
        dev: &DeviceInfo,
        info: &ImageImageInfo,
        src_image: &Image,
        dst_image: &Image,
    ) -> bool {
        common::legacy_use_scanline_t2t(dev, info, src_image, dst_image)
    }
}

impl TransferFns for Sdma40 {
    fn emit_copy_buffer(
        &self,
        cmd: &mut CmdBuffer<'_>,
        src_va: u64,
        dst_va: u64,
        size: u64,
    ) -> u64 {
        common::emit_copy_buffer(cmd, src_va, dst_va, size)
    }

    fn emit_update_buffer(&self, cmd: &mut CmdBuffer<'_>, dst_va: u64, data: &[u8]) {
        common::emit_update_buffer(cmd, dst_va, data)
    }

    fn emit_fill_buffer(
        &self,
        cmd: &mut CmdBuffer<'_>,
        dst_va: u64,
        size: u64,
        value: u32,
    ) -> u64 {
        common::emit_fill_buffer(cmd, dst_va, size, value)
    }

    fn copy_buffer_image_l2l(
        &self,
        cmd: &mut CmdBuffer<'_>,
        info: &ImageBufferInfo,
        buf2img: bool,
    ) {
        common::copy_one_lin_to_lin(cmd, info, buf2img)
    }

    fn copy_buffer_image_l2t(
        &self,
        cmd: &mut CmdBuffer<'_>,
        info: &ImageBufferInfo,
        image: &Image,
        buf2img: bool,
    ) {
        common::copy_one_lin_to_tiled(cmd, info, image, buf2img)
    }

    fn copy_image_l2l(
        &self,
        cmd: &mut CmdBuffer<'_>,
        info: &ImageImageInfo,
        _src_image: &Image,
        _dst_image: &Image,
    ) {
        common::copy_image_lin_to_lin(cmd, info)
    }

    fn copy_image_l2t(
        &self,
        cmd: &mut CmdBuffer<'_>,
        info: &ImageImageInfo,
        src_image: &Image,
        dst_image: &Image,
    ) {
        common::copy_image_lin_to_tiled(cmd, info, src_image, dst_image)
    }

    fn copy_image_t2t(
        &self,
        cmd: &mut CmdBuffer<'_>,
        info: &ImageImageInfo,
        src_image: &Image,
        dst_image: &Image,
    ) {
        common::copy_image_tiled(cmd, info, src_image, dst_image)
    }

    fn emit_nop(&self, cmd: &mut CmdBuffer<'_>) {
        common::emit_nop(cmd)
    }

    fn per_image_layout(&self, image: &Image, is_stencil: bool, info: &mut PerImageInfo) {
        common::gfx9_per_image_layout(image, is_stencil, info)
    }

    fn use_scanline_t2t(
        &self,
        _dev: &DeviceInfo,
        _info: &ImageImageInfo,
        _src_image: &Image,
        _dst_image: &Image,
    ) -> bool {
        common::gfx9_use_scanline_t2t()
    }
}
