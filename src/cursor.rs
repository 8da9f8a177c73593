//! Low-level view of a message while it is being parsed: a byte buffer,
//! a position, and an endianness tag.
//!
//! All reads are bounds-checked. Running out of bytes is the recoverable
//! [`Error::IncompleteBuffer`]; a non-zero padding byte is the fatal
//! [`Error::InvalidPacket`]. The cursor holds no checkpoint: after an
//! incomplete read, re-parse the whole message from its start.

use byteorder::{BigEndian, ByteOrder, LittleEndian};

use crate::align::padding;
use crate::error::{Error, Result};

/// First byte of every message: `l` for little-endian payloads.
pub const LITTLE_ENDIAN_TAG: u8 = b'l';
/// First byte of every message: `B` for big-endian payloads.
pub const BIG_ENDIAN_TAG: u8 = b'B';

/// Byte order of one message. Each message carries its own tag, so this is
/// a runtime property, not a compile-time one.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Endianness {
    Little,
    Big,
}

impl Endianness {
    /// Decode the tag byte at the start of a message.
    pub fn from_tag(tag: u8) -> Result<Endianness> {
        match tag {
            LITTLE_ENDIAN_TAG => Ok(Endianness::Little),
            BIG_ENDIAN_TAG => Ok(Endianness::Big),
            other => Err(Error::InvalidPacket(format!(
                "incorrect endianness tag {:?}",
                other as char
            ))),
        }
    }

    pub fn tag(self) -> u8 {
        match self {
            Endianness::Little => LITTLE_ENDIAN_TAG,
            Endianness::Big => BIG_ENDIAN_TAG,
        }
    }

    /// The byte order this process writes by default.
    pub fn native() -> Endianness {
        if cfg!(target_endian = "big") {
            Endianness::Big
        } else {
            Endianness::Little
        }
    }
}

/// A byte buffer with a read position and an endianness.
pub struct RawCursor<'a> {
    data: &'a [u8],
    pos: usize,
    endianness: Endianness,
}

macro_rules! read_fixed {
    ($name:ident, $ty:ty, $width:expr, $le:path, $be:path) => {
        pub fn $name(&mut self) -> Result<$ty> {
            self.align($width)?;
            let bytes = self.read($width)?;
            Ok(match self.endianness {
                Endianness::Little => $le(bytes),
                Endianness::Big => $be(bytes),
            })
        }
    };
}

impl<'a> RawCursor<'a> {
    pub fn new(data: &'a [u8], endianness: Endianness) -> RawCursor<'a> {
        RawCursor {
            data,
            pos: 0,
            endianness,
        }
    }

    pub fn endianness(&self) -> Endianness {
        self.endianness
    }

    /// Bytes consumed so far.
    pub fn pos(&self) -> usize {
        self.pos
    }

    pub fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    /// Fail with the recoverable incomplete-buffer condition unless `len`
    /// more bytes are available.
    pub fn want(&self, len: usize) -> Result<()> {
        if self.pos + len > self.data.len() {
            return Err(Error::IncompleteBuffer);
        }
        Ok(())
    }

    pub fn read(&mut self, len: usize) -> Result<&'a [u8]> {
        self.want(len)?;
        let ret = &self.data[self.pos..self.pos + len];
        self.pos += len;
        Ok(ret)
    }

    /// Skip to the next multiple of `alignment`. Every skipped pad byte
    /// must be NUL; the sender controls them, so anything else means a
    /// corrupt packet.
    pub fn align(&mut self, alignment: usize) -> Result<()> {
        let pad = padding(self.pos, alignment);
        if pad == 0 {
            return Ok(());
        }
        let bytes = self.read(pad)?;
        if bytes.iter().any(|b| *b != 0) {
            return Err(Error::InvalidPacket(
                "alignment bytes are not NUL".into(),
            ));
        }
        Ok(())
    }

    pub fn read_u8(&mut self) -> Result<u8> {
        Ok(self.read(1)?[0])
    }

    read_fixed!(read_u16, u16, 2, LittleEndian::read_u16, BigEndian::read_u16);
    read_fixed!(read_i16, i16, 2, LittleEndian::read_i16, BigEndian::read_i16);
    read_fixed!(read_u32, u32, 4, LittleEndian::read_u32, BigEndian::read_u32);
    read_fixed!(read_i32, i32, 4, LittleEndian::read_i32, BigEndian::read_i32);
    read_fixed!(read_u64, u64, 8, LittleEndian::read_u64, BigEndian::read_u64);
    read_fixed!(read_i64, i64, 8, LittleEndian::read_i64, BigEndian::read_i64);
    read_fixed!(read_f64, f64, 8, LittleEndian::read_f64, BigEndian::read_f64);
}
