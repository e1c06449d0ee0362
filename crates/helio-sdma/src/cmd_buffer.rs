//! Command buffer recording state.

use helio_cs::CmdStream;
use thiserror::Error;

use crate::device::Device;
use crate::surface::Buffer;

/// Deferred recording failures. The first error sticks; the buffer can
/// keep recording but must not be submitted.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum RecordError {
    #[error("out of device memory")]
    OutOfDeviceMemory,
}

pub struct CmdBuffer<'a> {
    pub device: &'a Device,
    pub cs: CmdStream,
    record_result: Result<(), RecordError>,
    /// Scratch buffer for scanline tiled copies, allocated on first use
    /// and reused for the lifetime of the command buffer.
    pub(crate) transfer_temp: Option<Buffer>,
}

impl<'a> CmdBuffer<'a> {
    pub fn new(device: &'a Device, ib_dw: usize) -> Self {
        Self {
            device,
            cs: CmdStream::new(ib_dw),
            record_result: Ok(()),
            transfer_temp: None,
        }
    }

    pub fn with_stream(device: &'a Device, cs: CmdStream) -> Self {
        Self {
            device,
            cs,
            record_result: Ok(()),
            transfer_temp: None,
        }
    }

    pub fn record_result(&self) -> Result<(), RecordError> {
        self.record_result
    }

    /// Records a deferred failure; the first one wins.
    pub(crate) fn record_error(&mut self, err: RecordError) {
        if self.record_result.is_ok() {
            self.record_result = Err(err);
        }
    }
}
