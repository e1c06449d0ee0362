//! Per-transfer geometry derivation.
//!
//! Pure math mapping a region plus a surface description onto the
//! address/pitch/extent values the packet encoders consume. The
//! layout-specific leg (legacy level tables vs. unified pitch fields)
//! goes through the dispatch table's `per_image_layout`.

use crate::encoders::TransferFns;
use crate::surface::{
    Buffer, BufferImageCopy, Extent3D, Format, Image, ImageAspectFlags, ImageCopy, ImageType,
    Offset3D, SubresourceLayers,
};

#[inline]
pub fn div_round_up(a: u32, b: u32) -> u32 {
    (a + b - 1) / b
}

#[inline]
pub fn align_up(v: u32, a: u32) -> u32 {
    div_round_up(v, a) * a
}

#[inline]
pub fn minify(dim: u32, level: u32) -> u32 {
    (dim >> level).max(1)
}

/// Minified dimension in format blocks.
pub fn minify_as_blocks(dim: u32, level: u32, blk: u32) -> u32 {
    div_round_up(minify(dim, level), blk)
}

/// Address/pitch view of one image sub-resource.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PerImageInfo {
    pub va: u64,
    /// Bytes per block of the aspect-resolved format.
    pub bpp: u32,
    /// Row pitch in elements.
    pub pitch: u32,
    /// Slice pitch in elements.
    pub slice_pitch: u32,
    pub mip_level: u32,
    pub offset: Offset3D,
}

/// Address/pitch view of the buffer side of a buffer-image copy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PerBufferInfo {
    pub va: u64,
    /// Row pitch in blocks.
    pub pitch: u32,
    /// Slice pitch in blocks.
    pub slice_pitch: u32,
}

#[derive(Debug, Clone, Copy)]
pub struct ImageImageInfo {
    pub src: PerImageInfo,
    pub dst: PerImageInfo,
    pub extent: Extent3D,
}

#[derive(Debug, Clone, Copy)]
pub struct ImageBufferInfo {
    pub image: PerImageInfo,
    pub buf: PerBufferInfo,
    pub extent: Extent3D,
}

/// Resolves a combined format down to the aspect being transferred.
pub fn aspect_format(format: Format, aspect_mask: ImageAspectFlags) -> Format {
    if aspect_mask.contains(ImageAspectFlags::DEPTH) {
        format.depth_only()
    } else if aspect_mask.contains(ImageAspectFlags::STENCIL) {
        format.stencil_only()
    } else {
        format
    }
}

pub fn per_image_info(
    fns: &dyn TransferFns,
    image: &Image,
    subres: &SubresourceLayers,
    offset: Offset3D,
) -> PerImageInfo {
    let format = aspect_format(image.format, subres.aspect_mask);
    let mut info = PerImageInfo {
        va: 0,
        bpp: format.block_size(),
        pitch: 0,
        slice_pitch: 0,
        mip_level: subres.mip_level,
        offset,
    };
    // Array layers address the third axis on non-3D images.
    if image.ty != ImageType::Type3D {
        info.offset.z = subres.base_array_layer;
    }
    fns.per_image_layout(
        image,
        subres.aspect_mask == ImageAspectFlags::STENCIL,
        &mut info,
    );
    info
}

pub fn image_copy_info(
    fns: &dyn TransferFns,
    src_image: &Image,
    dst_image: &Image,
    region: &ImageCopy,
) -> ImageImageInfo {
    let src = per_image_info(fns, src_image, &region.src_subresource, region.src_offset);
    let dst = per_image_info(fns, dst_image, &region.dst_subresource, region.dst_offset);

    let mut extent = region.extent;
    if src_image.ty != ImageType::Type3D {
        extent.depth = region.src_subresource.layer_count;
    }
    ImageImageInfo { src, dst, extent }
}

pub fn buffer_info(
    region: &BufferImageCopy,
    buf: &Buffer,
    block_width: u32,
    block_height: u32,
) -> PerBufferInfo {
    let mut row_length = region.buffer_row_length;
    let mut image_height = region.buffer_image_height;

    if row_length == 0 {
        row_length = region.image_extent.width;
    }
    if image_height == 0 {
        image_height = region.image_extent.height;
    }

    let pitch = row_length / block_width;
    PerBufferInfo {
        va: buf.gpu_va() + region.buffer_offset,
        pitch,
        slice_pitch: pitch * image_height / block_height,
    }
}

pub fn buffer_image_info(
    fns: &dyn TransferFns,
    buf: &Buffer,
    image: &Image,
    region: &BufferImageCopy,
) -> ImageBufferInfo {
    let img = per_image_info(
        fns,
        image,
        &region.image_subresource,
        region.image_offset,
    );
    let buf = buffer_info(region, buf, image.surface.blk_w, image.surface.blk_h);

    let mut extent = region.image_extent;
    if image.ty != ImageType::Type3D {
        extent.depth = region.image_subresource.layer_count;
    }
    ImageBufferInfo {
        image: img,
        buf,
        extent,
    }
}
