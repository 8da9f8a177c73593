//! Conversion of wire bytes into values, driven by a type signature.

use std::str;

use log::trace;

use crate::cursor::{Endianness, RawCursor};
use crate::error::{Error, Result};
use crate::types::{parse_signature, Type, MAX_ARRAY_BYTES, MAX_VARIANT_DEPTH};
use crate::value::{valid_object_path, Array, Plain, Value};

/// Walks a byte buffer according to a signature and produces values.
///
/// The unmarshaller is a one-shot consumer: feed it a buffer positioned at
/// the start of the data, call [`unmarshall`](Self::unmarshall) or
/// [`unmarshall_exact`](Self::unmarshall_exact) once per signature, and ask
/// [`consumed`](Self::consumed) how far it got so the read buffer can be
/// trimmed. On [`Error::IncompleteBuffer`] the caller waits for more bytes
/// and retries the whole message with a fresh unmarshaller; nothing is
/// checkpointed across that signal.
pub struct PacketUnmarshaller<'a> {
    cursor: RawCursor<'a>,
}

impl<'a> PacketUnmarshaller<'a> {
    pub fn new(buffer: &'a [u8], endianness: Endianness) -> PacketUnmarshaller<'a> {
        PacketUnmarshaller {
            cursor: RawCursor::new(buffer, endianness),
        }
    }

    /// Bytes consumed so far; tells the caller how much of its read buffer
    /// this message used.
    pub fn consumed(&self) -> usize {
        self.cursor.pos()
    }

    /// Align to the 8-byte boundary that separates the header from the
    /// body. Only the message envelope needs this.
    pub fn align_body(&mut self) -> Result<()> {
        self.cursor.align(8)
    }

    /// Unmarshal one value per single complete type in `signature`,
    /// producing plain values (maps for dict arrays, no type tags).
    ///
    /// `len` is the declared byte length of the data, when the caller
    /// knows it; the whole span must already be buffered.
    pub fn unmarshall(
        &mut self,
        signature: &str,
        len: Option<usize>,
    ) -> Result<Vec<Plain>> {
        let values = self.unmarshall_exact(signature, len)?;
        Ok(values.iter().map(Value::to_plain).collect())
    }

    /// Like [`unmarshall`](Self::unmarshall), but keeps the exact types.
    pub fn unmarshall_exact(
        &mut self,
        signature: &str,
        len: Option<usize>,
    ) -> Result<Vec<Value>> {
        if let Some(len) = len {
            self.cursor.want(len)?;
        }
        let types = parse_signature(signature)?;
        types
            .iter()
            .map(|typ| self.parse_value(typ, 0))
            .collect()
    }

    fn parse_value(&mut self, typ: &Type, variant_depth: usize) -> Result<Value> {
        trace!("parse {} at {}", typ.name(), self.cursor.pos());
        match typ {
            Type::Byte => Ok(Value::Byte(self.cursor.read_u8()?)),
            Type::Boolean => match self.cursor.read_u32()? {
                0 => Ok(Value::Boolean(false)),
                1 => Ok(Value::Boolean(true)),
                other => Err(Error::InvalidPacket(format!(
                    "BOOLEAN must be 0 or 1, found {}",
                    other
                ))),
            },
            Type::Int16 => Ok(Value::Int16(self.cursor.read_i16()?)),
            Type::UInt16 => Ok(Value::UInt16(self.cursor.read_u16()?)),
            Type::Int32 => Ok(Value::Int32(self.cursor.read_i32()?)),
            Type::UInt32 => Ok(Value::UInt32(self.cursor.read_u32()?)),
            Type::Int64 => Ok(Value::Int64(self.cursor.read_i64()?)),
            Type::UInt64 => Ok(Value::UInt64(self.cursor.read_u64()?)),
            Type::Double => Ok(Value::Double(self.cursor.read_f64()?)),
            Type::UnixFd => Ok(Value::UnixFd(self.cursor.read_u32()?)),
            Type::String => {
                let bytes = self.read_string_body()?;
                let s = validate_utf8(bytes)?;
                if s.contains('\0') {
                    return Err(Error::InvalidPacket(
                        "STRING contains NUL".into(),
                    ));
                }
                Ok(Value::String(s.to_owned()))
            }
            Type::ObjectPath => {
                let bytes = self.read_string_body()?;
                let s = validate_utf8(bytes)?;
                if !valid_object_path(s) {
                    return Err(Error::InvalidPacket(format!(
                        "{:?} is not a valid OBJECT_PATH",
                        s
                    )));
                }
                Ok(Value::ObjectPath(s.to_owned()))
            }
            Type::Signature => {
                let s = self.read_signature_body()?;
                parse_signature(&s).map_err(|e| {
                    Error::InvalidPacket(format!("bad SIGNATURE value: {}", e))
                })?;
                Ok(Value::Signature(s))
            }
            Type::Array(elem) => {
                self.cursor.align(4)?;
                let byte_len = self.cursor.read_u32()? as usize;
                if byte_len >= MAX_ARRAY_BYTES {
                    return Err(Error::InvalidPacket(format!(
                        "ARRAY body of {} bytes reaches the {}-byte limit",
                        byte_len, MAX_ARRAY_BYTES
                    )));
                }
                // elements pad from here even when there are none
                self.cursor.align(elem.alignment())?;
                self.cursor.want(byte_len)?;

                let start = self.cursor.pos();
                let mut items = Vec::new();
                while self.cursor.pos() - start < byte_len {
                    items.push(self.parse_value(elem, variant_depth)?);
                }
                if self.cursor.pos() - start != byte_len {
                    return Err(Error::InvalidPacket(format!(
                        "ARRAY elements overran the declared {} bytes",
                        byte_len
                    )));
                }
                Ok(Value::Array(Array::new((**elem).clone(), items)?))
            }
            Type::Struct(members) => {
                self.cursor.align(8)?;
                let values = members
                    .iter()
                    .map(|member| self.parse_value(member, variant_depth))
                    .collect::<Result<Vec<Value>>>()?;
                Ok(Value::Struct(values))
            }
            Type::DictEntry(key_type, value_type) => {
                self.cursor.align(8)?;
                let key = self.parse_value(key_type, variant_depth)?;
                let value = self.parse_value(value_type, variant_depth)?;
                Ok(Value::DictEntry(Box::new(key), Box::new(value)))
            }
            Type::Variant => {
                if variant_depth >= MAX_VARIANT_DEPTH {
                    return Err(Error::InvalidPacket(format!(
                        "VARIANTs nested too deep, max is {}",
                        MAX_VARIANT_DEPTH
                    )));
                }
                let sig = self.read_signature_body()?;
                let types = parse_signature(&sig).map_err(|e| {
                    Error::InvalidPacket(format!("bad VARIANT signature: {}", e))
                })?;
                if types.len() != 1 {
                    return Err(Error::InvalidPacket(format!(
                        "VARIANT signature must describe 1 value, {} found",
                        types.len()
                    )));
                }
                let child = self.parse_value(&types[0], variant_depth + 1)?;
                Ok(Value::Variant(Box::new(child)))
            }
        }
    }

    /// UINT32 length prefix, then the bytes, then a mandatory NUL.
    fn read_string_body(&mut self) -> Result<&'a [u8]> {
        let len = self.cursor.read_u32()? as usize;
        let bytes = self.cursor.read(len)?;
        if self.cursor.read(1)?[0] != 0 {
            return Err(Error::InvalidPacket(
                "STRING is not NUL-terminated".into(),
            ));
        }
        Ok(bytes)
    }

    /// BYTE length prefix, then the bytes, then a mandatory NUL.
    fn read_signature_body(&mut self) -> Result<String> {
        let len = self.cursor.read_u8()? as usize;
        let bytes = self.cursor.read(len)?;
        if self.cursor.read(1)?[0] != 0 {
            return Err(Error::InvalidPacket(
                "SIGNATURE is not NUL-terminated".into(),
            ));
        }
        Ok(validate_utf8(bytes)?.to_owned())
    }
}

fn validate_utf8(bytes: &[u8]) -> Result<&str> {
    str::from_utf8(bytes)
        .map_err(|_| Error::InvalidPacket("string is not in UTF-8".into()))
}
