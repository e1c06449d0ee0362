//! Append-only DMA command stream with an explicit reserve-then-emit
//! protocol.
//!
//! Packet encoders must call [`CmdStream::reserve`] with the exact dword
//! count of the packet they are about to emit before the first
//! [`CmdStream::emit`]. The stream grows its window on reservation up to
//! a hard limit; a reservation that cannot be satisfied is a logic error
//! in the caller's capacity pre-computation and panics. Emitting past
//! the reservation watermark is caught in debug builds.

/// A bounded, append-only stream of 32-bit command words.
pub struct CmdStream {
    buf: Vec<u32>,
    /// Current window size in dwords. Grows on demand up to `limit_dw`.
    max_dw: usize,
    limit_dw: usize,
    /// High-water mark of all reservations so far, in dwords from the
    /// start of the stream. `emit` may not push past it.
    reserved: usize,
}

impl CmdStream {
    /// A stream with an initial window of `ib_dw` dwords and no hard
    /// growth limit.
    pub fn new(ib_dw: usize) -> Self {
        Self::with_limit(ib_dw, usize::MAX)
    }

    /// A stream whose window may grow, but never past `limit_dw`.
    pub fn with_limit(ib_dw: usize, limit_dw: usize) -> Self {
        assert!(ib_dw <= limit_dw);
        Self {
            buf: Vec::with_capacity(ib_dw),
            max_dw: ib_dw,
            limit_dw,
            reserved: 0,
        }
    }

    /// Reserves space for `n` more dwords, growing the window if needed.
    ///
    /// Panics if the stream cannot grow enough to hold them; running out
    /// of command space mid-packet is unrecoverable.
    pub fn reserve(&mut self, n: usize) {
        let needed = self.buf.len() + n;
        assert!(
            needed <= self.limit_dw,
            "command stream overflow: need {needed} dwords, limit {}",
            self.limit_dw
        );
        if needed > self.max_dw {
            self.max_dw = needed.max(self.max_dw * 2).min(self.limit_dw);
        }
        if needed > self.reserved {
            self.reserved = needed;
        }
    }

    #[inline]
    pub fn emit(&mut self, dw: u32) {
        debug_assert!(
            self.buf.len() < self.reserved,
            "emit without a covering reservation (cdw {}, reserved {})",
            self.buf.len(),
            self.reserved
        );
        self.buf.push(dw);
    }

    #[inline]
    pub fn emit_array(&mut self, dws: &[u32]) {
        for &dw in dws {
            self.emit(dw);
        }
    }

    /// Current dword count.
    #[inline]
    pub fn cdw(&self) -> usize {
        self.buf.len()
    }

    /// Current window size in dwords.
    #[inline]
    pub fn max_dw(&self) -> usize {
        self.max_dw
    }

    /// Dwords still available in the window without growing it.
    #[inline]
    pub fn remaining_dw(&self) -> usize {
        self.max_dw - self.buf.len()
    }

    pub fn dwords(&self) -> &[u32] {
        &self.buf
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn reserve_then_emit_appends() {
        let mut cs = CmdStream::new(16);
        cs.reserve(3);
        cs.emit(0xdead_beef);
        cs.emit_array(&[1, 2]);
        assert_eq!(cs.cdw(), 3);
        assert_eq!(cs.remaining_dw(), 13);
        assert_eq!(cs.dwords(), &[0xdead_beef, 1, 2]);
    }

    #[test]
    fn reservations_accumulate_across_packets() {
        let mut cs = CmdStream::new(8);
        cs.reserve(2);
        cs.emit_array(&[0, 0]);
        cs.reserve(2);
        cs.emit_array(&[1, 1]);
        assert_eq!(cs.cdw(), 4);
    }

    #[test]
    fn window_grows_on_reservation() {
        let mut cs = CmdStream::new(4);
        cs.reserve(3);
        cs.emit_array(&[0, 0, 0]);
        assert_eq!(cs.max_dw(), 4);
        cs.reserve(6);
        assert!(cs.max_dw() >= 9);
        cs.emit_array(&[1; 6]);
        assert_eq!(cs.cdw(), 9);
    }

    #[test]
    #[should_panic(expected = "command stream overflow")]
    fn reservation_past_hard_limit_panics() {
        let mut cs = CmdStream::with_limit(4, 4);
        cs.reserve(5);
    }

    #[test]
    #[should_panic(expected = "command stream overflow")]
    fn growth_is_capped_by_limit() {
        let mut cs = CmdStream::with_limit(4, 6);
        cs.reserve(3);
        cs.emit_array(&[0, 0, 0]);
        cs.reserve(4);
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "without a covering reservation")]
    fn emit_past_watermark_panics_in_debug() {
        let mut cs = CmdStream::new(16);
        cs.reserve(1);
        cs.emit(0);
        cs.emit(0);
    }
}
