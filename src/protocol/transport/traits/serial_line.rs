//! Minimal abstraction for a line-oriented serial link to an SLCAN adapter.
//! Lets the library plug into any driver (desktop serial port, USB CDC on an
//! MCU, in-memory test double) without owning the port itself.
use futures_util::Future;

/// Contract to exchange `\r`-terminated SLCAN lines asynchronously.
pub trait SerialLine {
    type Error: core::fmt::Debug;
    /// Write one complete line. `line` already ends with the `\r` terminator.
    fn write_line<'a>(
        &'a mut self,
        line: &'a [u8],
    ) -> impl Future<Output = Result<(), Self::Error>> + 'a;
    /// Read the next line into `buffer`, terminator included, and return its
    /// length. Lines longer than `buffer` are truncated.
    fn read_line<'a>(
        &'a mut self,
        buffer: &'a mut [u8],
    ) -> impl Future<Output = Result<usize, Self::Error>> + 'a;
}
