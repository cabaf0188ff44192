//! Low-level components dedicated to ASCII hex digits inside SLCAN lines.
//! Every SLCAN field (identifier, DLC, payload bytes) is a fixed run of hex
//! digits, so the reader/writer pair works with a digit cursor rather than a
//! byte cursor.
use crate::error::{HexReaderError, HexWriterError};

const UPPER_DIGITS: &[u8; 16] = b"0123456789ABCDEF";

/// Value of a single ASCII hex digit, `None` for anything else.
#[inline]
pub fn digit_value(byte: u8) -> Option<u8> {
    match byte {
        b'0'..=b'9' => Some(byte - b'0'),
        b'A'..=b'F' => Some(byte - b'A' + 10),
        b'a'..=b'f' => Some(byte - b'a' + 10),
        _ => None,
    }
}

/// Upper-case ASCII digit for the low nibble of `value`.
#[inline]
pub fn nibble_digit(value: u8) -> u8 {
    UPPER_DIGITS[(value & 0x0F) as usize]
}

/// Reader that parses hex digit runs from a `&[u8]` without copies.
pub struct HexReader<'a> {
    /// Source line (typically one SLCAN frame without terminator).
    buffer: &'a [u8],
    /// Index of the next byte to consume.
    cursor: usize,
}

impl<'a> HexReader<'a> {
    /// Create a reader positioned at the start of the provided buffer.
    pub fn new(buffer: &'a [u8]) -> Self {
        Self { buffer, cursor: 0 }
    }

    /// Current position in bytes from the start of the line.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Bytes left after the cursor.
    pub fn remaining(&self) -> usize {
        self.buffer.len() - self.cursor
    }

    /// Read `num_digits` hex digits (most significant first) into a `u32`.
    /// `num_digits` must stay in the [1, 8] range.
    pub fn read_digits(&mut self, num_digits: u8) -> Result<u32, HexReaderError> {
        if !(1..=8).contains(&num_digits) {
            return Err(HexReaderError::TooLongForType {
                max: 8,
                asked: num_digits,
            });
        }

        let end = self.cursor + num_digits as usize;
        if end > self.buffer.len() {
            return Err(HexReaderError::OutOfBounds {
                asked: num_digits as usize,
                available: self.remaining(),
            });
        }

        let mut result: u32 = 0;
        for position in self.cursor..end {
            let found = self.buffer[position];
            let value =
                digit_value(found).ok_or(HexReaderError::InvalidDigit { position, found })?;
            result = (result << 4) | value as u32;
        }

        self.cursor = end;
        Ok(result)
    }

    /// Read one digit.
    pub fn read_nibble(&mut self) -> Result<u8, HexReaderError> {
        self.read_digits(1).map(|val| val as u8)
    }

    /// Read one byte rendered as two digits.
    pub fn read_u8(&mut self) -> Result<u8, HexReaderError> {
        self.read_digits(2).map(|val| val as u8)
    }

    /// Read a 16-bit value rendered as four digits, most significant first.
    pub fn read_u16(&mut self) -> Result<u16, HexReaderError> {
        self.read_digits(4).map(|val| val as u16)
    }

    /// Read a 32-bit value rendered as eight digits, most significant first.
    pub fn read_u32(&mut self) -> Result<u32, HexReaderError> {
        self.read_digits(8)
    }

    /// Fill `out` with consecutive two-digit bytes.
    pub fn read_bytes(&mut self, out: &mut [u8]) -> Result<(), HexReaderError> {
        for slot in out.iter_mut() {
            *slot = self.read_u8()?;
        }
        Ok(())
    }

    /// Consume one raw (non-hex) byte such as a frame marker.
    pub fn read_raw(&mut self) -> Result<u8, HexReaderError> {
        let byte = *self
            .buffer
            .get(self.cursor)
            .ok_or(HexReaderError::OutOfBounds {
                asked: 1,
                available: 0,
            })?;
        self.cursor += 1;
        Ok(byte)
    }
}

//==================================================================================HEXWRITER

/// Writer rendering values as upper-case hex digits into a `&mut [u8]`.
pub struct HexWriter<'a> {
    /// Target buffer (typically the SLCAN line under construction).
    buffer: &'a mut [u8],
    /// Number of bytes written so far.
    cursor: usize,
}

impl<'a> HexWriter<'a> {
    /// Create a writer positioned at the start of the buffer.
    pub fn new(buffer: &'a mut [u8]) -> Self {
        Self { buffer, cursor: 0 }
    }

    /// Number of bytes written (final line length once done).
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    fn reserve(&mut self, asked: usize) -> Result<usize, HexWriterError> {
        let available = self.buffer.len() - self.cursor;
        if asked > available {
            return Err(HexWriterError::OutOfBounds { asked, available });
        }
        let start = self.cursor;
        self.cursor += asked;
        Ok(start)
    }

    /// Write the low `num_digits` nibbles of `value`, zero padded, most significant first.
    pub fn write_digits(&mut self, value: u32, num_digits: u8) -> Result<(), HexWriterError> {
        if !(1..=8).contains(&num_digits) {
            return Err(HexWriterError::TooLongForType {
                max: 8,
                asked: num_digits,
            });
        }

        let start = self.reserve(num_digits as usize)?;
        for i in 0..num_digits as usize {
            let shift = 4 * (num_digits as usize - 1 - i);
            self.buffer[start + i] = nibble_digit((value >> shift) as u8);
        }
        Ok(())
    }

    /// Write one digit.
    pub fn write_nibble(&mut self, value: u8) -> Result<(), HexWriterError> {
        self.write_digits(value as u32, 1)
    }

    /// Write one byte as two digits, high nibble first.
    pub fn write_u8(&mut self, value: u8) -> Result<(), HexWriterError> {
        self.write_digits(value as u32, 2)
    }

    /// Write a 32-bit value as eight digits.
    pub fn write_u32(&mut self, value: u32) -> Result<(), HexWriterError> {
        self.write_digits(value, 8)
    }

    /// Write every byte of `bytes` as a two-digit pair.
    pub fn write_bytes(&mut self, bytes: &[u8]) -> Result<(), HexWriterError> {
        for byte in bytes {
            self.write_u8(*byte)?;
        }
        Ok(())
    }

    /// Copy one raw byte (frame marker, command letter).
    pub fn write_raw(&mut self, byte: u8) -> Result<(), HexWriterError> {
        let start = self.reserve(1)?;
        self.buffer[start] = byte;
        Ok(())
    }
}
