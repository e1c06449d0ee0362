//! Transfer command recording.
//!
//! These entry points classify each request (linear or tiled on either
//! side), derive the geometry, and drive the device's packet encoder
//! table. The encoders never see more than one region at a time, and
//! the partial-emit buffer operations are looped here until the whole
//! range is covered.

use crate::cmd_buffer::CmdBuffer;
use crate::geometry::{aspect_format, buffer_image_info, image_copy_info};
use crate::surface::{
    Buffer, BufferCopy, BufferImageCopy, Extent3D, Image, ImageCopy, ImageType, Offset3D,
    SubresourceLayers,
};

/// Scanline staging buffer size: one maximal row of 4-byte texels.
const TRANSFER_TEMP_BYTES: u64 = 128 * 1024 * 4;

impl CmdBuffer<'_> {
    pub fn copy_buffer(&mut self, src: &Buffer, dst: &Buffer, regions: &[BufferCopy]) {
        let fns = self.device.transfer_fns();
        for region in regions {
            let mut src_va = src.gpu_va() + region.src_offset;
            let mut dst_va = dst.gpu_va() + region.dst_offset;
            let mut remaining = region.size;
            while remaining > 0 {
                let copied = fns.emit_copy_buffer(self, src_va, dst_va, remaining);
                src_va += copied;
                dst_va += copied;
                remaining -= copied;
            }
        }
    }

    /// Fills `size` bytes at `dst_offset` with a repeating dword.
    /// `size` is truncated to dword granularity.
    pub fn fill_buffer(&mut self, dst: &Buffer, dst_offset: u64, size: u64, value: u32) {
        let fns = self.device.transfer_fns();
        let mut dst_va = dst.gpu_va() + dst_offset;
        let mut remaining = size & !3;
        while remaining > 0 {
            let filled = fns.emit_fill_buffer(self, dst_va, remaining, value);
            dst_va += filled;
            remaining -= filled;
        }
    }

    /// Embeds `data` into the command stream as inline-write packets.
    /// `data.len()` must be a multiple of four.
    pub fn update_buffer(&mut self, dst: &Buffer, dst_offset: u64, data: &[u8]) {
        if data.is_empty() {
            return;
        }
        let fns = self.device.transfer_fns();
        fns.emit_update_buffer(self, dst.gpu_va() + dst_offset, data);
    }

    pub fn copy_buffer_to_image(
        &mut self,
        buf: &Buffer,
        image: &Image,
        regions: &[BufferImageCopy],
    ) {
        for region in regions {
            self.copy_buffer_image(buf, image, region, true);
        }
    }

    pub fn copy_image_to_buffer(
        &mut self,
        image: &Image,
        buf: &Buffer,
        regions: &[BufferImageCopy],
    ) {
        for region in regions {
            self.copy_buffer_image(buf, image, region, false);
        }
    }

    fn copy_buffer_image(
        &mut self,
        buf: &Buffer,
        image: &Image,
        region: &BufferImageCopy,
        buf2img: bool,
    ) {
        let fns = self.device.transfer_fns();
        let info = buffer_image_info(fns, buf, image, region);
        if image.surface.is_linear {
            fns.copy_buffer_image_l2l(self, &info, buf2img);
        } else {
            fns.copy_buffer_image_l2t(self, &info, image, buf2img);
        }
    }

    pub fn copy_image(&mut self, src_image: &Image, dst_image: &Image, regions: &[ImageCopy]) {
        let fns = self.device.transfer_fns();
        for region in regions {
            let info = image_copy_info(fns, src_image, dst_image, region);
            match (src_image.surface.is_linear, dst_image.surface.is_linear) {
                (true, true) => fns.copy_image_l2l(self, &info, src_image, dst_image),
                (true, false) | (false, true) => {
                    fns.copy_image_l2t(self, &info, src_image, dst_image)
                }
                (false, false) => {
                    if fns.use_scanline_t2t(&self.device.info, &info, src_image, dst_image) {
                        self.copy_image_t2t_scanline(src_image, dst_image, region);
                    } else {
                        fns.copy_image_t2t(self, &info, src_image, dst_image);
                    }
                }
            }
        }
    }

    fn transfer_temp_buffer(&mut self) -> Buffer {
        if let Some(temp) = self.transfer_temp {
            return temp;
        }
        let temp = self.device.alloc_staging(TRANSFER_TEMP_BYTES, 4096);
        self.transfer_temp = Some(temp);
        temp
    }

    /// Tiled-to-tiled copy through a linear staging buffer, one row
    /// chunk at a time, for region shapes the direct t2t packet cannot
    /// express. A nop fences each staging hop against the next.
    fn copy_image_t2t_scanline(
        &mut self,
        src_image: &Image,
        dst_image: &Image,
        region: &ImageCopy,
    ) {
        let fns = self.device.transfer_fns();
        let temp = self.transfer_temp_buffer();

        let bpp = aspect_format(src_image.format, region.src_subresource.aspect_mask).block_size();
        let extent = Extent3D {
            width: region.extent.width,
            height: region.extent.height,
            depth: if src_image.ty == ImageType::Type3D {
                region.extent.depth
            } else {
                region.src_subresource.layer_count
            },
        };

        let copy_size_dwords = (temp.size / 4).min(u64::from(extent.width * bpp) / 4) as u32;
        let copy_size_pixels = (copy_size_dwords * 4 / bpp).max(1);

        for slice in 0..extent.depth {
            for y in 0..extent.height {
                let mut x = 0;
                while x < extent.width {
                    let width = copy_size_pixels.min(extent.width - x);

                    let src_region = BufferImageCopy {
                        buffer_offset: 0,
                        buffer_row_length: 0,
                        buffer_image_height: 0,
                        image_subresource: SubresourceLayers {
                            aspect_mask: region.src_subresource.aspect_mask,
                            mip_level: region.src_subresource.mip_level,
                            base_array_layer: if src_image.ty == ImageType::Type3D {
                                0
                            } else {
                                region.src_subresource.base_array_layer + slice
                            },
                            layer_count: 1,
                        },
                        image_offset: Offset3D {
                            x: region.src_offset.x + x,
                            y: region.src_offset.y + y,
                            z: if src_image.ty == ImageType::Type3D {
                                region.src_offset.z + slice
                            } else {
                                0
                            },
                        },
                        image_extent: Extent3D {
                            width,
                            height: 1,
                            depth: 1,
                        },
                    };
                    let dst_region = BufferImageCopy {
                        image_subresource: SubresourceLayers {
                            aspect_mask: region.dst_subresource.aspect_mask,
                            mip_level: region.dst_subresource.mip_level,
                            base_array_layer: if dst_image.ty == ImageType::Type3D {
                                0
                            } else {
                                region.dst_subresource.base_array_layer + slice
                            },
                            layer_count: 1,
                        },
                        image_offset: Offset3D {
                            x: region.dst_offset.x + x,
                            y: region.dst_offset.y + y,
                            z: if dst_image.ty == ImageType::Type3D {
                                region.dst_offset.z + slice
                            } else {
                                0
                            },
                        },
                        ..src_region
                    };

                    let to_temp = buffer_image_info(fns, &temp, src_image, &src_region);
                    fns.copy_buffer_image_l2t(self, &to_temp, src_image, false);
                    fns.emit_nop(self);

                    let from_temp = buffer_image_info(fns, &temp, dst_image, &dst_region);
                    fns.copy_buffer_image_l2t(self, &from_temp, dst_image, true);
                    fns.emit_nop(self);

                    x += width;
                }
            }
        }
    }
}
