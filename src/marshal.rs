//! Conversion of values into wire bytes.

use byteorder::{BigEndian, ByteOrder, LittleEndian};
use log::trace;

use crate::align::padding;
use crate::cursor::Endianness;
use crate::error::{Error, Result};
use crate::types::{Type, MAX_ARRAY_BYTES};
use crate::value::{Plain, Value};

/// Accumulates an in-progress byte packet.
///
/// Alignment is always computed against the *absolute* position — the
/// initial offset plus what has been written — so a sub-marshaller started
/// in the middle of an outer packet pads exactly as the outer buffer
/// requires. Array lengths are reserved and patched once the body size is
/// known.
pub struct PacketMarshaller {
    packet: Vec<u8>,
    offset: usize,
    endianness: Endianness,
}

macro_rules! write_fixed {
    ($name:ident, $ty:ty, $width:expr, $le:path, $be:path) => {
        fn $name(&mut self, value: $ty) {
            self.align($width);
            let start = self.packet.len();
            self.packet.resize(start + $width, 0);
            match self.endianness {
                Endianness::Little => $le(&mut self.packet[start..], value),
                Endianness::Big => $be(&mut self.packet[start..], value),
            }
        }
    };
}

impl PacketMarshaller {
    pub fn new(endianness: Endianness) -> PacketMarshaller {
        PacketMarshaller {
            packet: Vec::new(),
            offset: 0,
            endianness,
        }
    }

    /// A fresh marshaller whose position continues from where this one is,
    /// for marshalling nested data that will be appended verbatim.
    fn sub(&self) -> PacketMarshaller {
        PacketMarshaller {
            packet: Vec::new(),
            offset: self.absolute_len(),
            endianness: self.endianness,
        }
    }

    pub fn endianness(&self) -> Endianness {
        self.endianness
    }

    /// The bytes accumulated so far.
    pub fn packet(&self) -> &[u8] {
        &self.packet
    }

    pub fn into_packet(self) -> Vec<u8> {
        self.packet
    }

    fn absolute_len(&self) -> usize {
        self.offset + self.packet.len()
    }

    /// Pad with NUL bytes to the next multiple of `alignment`.
    pub fn align(&mut self, alignment: usize) {
        let pad = padding(self.absolute_len(), alignment);
        let len = self.packet.len();
        self.packet.resize(len + pad, 0);
    }

    write_fixed!(write_u16, u16, 2, LittleEndian::write_u16, BigEndian::write_u16);
    write_fixed!(write_i16, i16, 2, LittleEndian::write_i16, BigEndian::write_i16);
    write_fixed!(write_u32, u32, 4, LittleEndian::write_u32, BigEndian::write_u32);
    write_fixed!(write_i32, i32, 4, LittleEndian::write_i32, BigEndian::write_i32);
    write_fixed!(write_u64, u64, 8, LittleEndian::write_u64, BigEndian::write_u64);
    write_fixed!(write_i64, i64, 8, LittleEndian::write_i64, BigEndian::write_i64);
    write_fixed!(write_f64, f64, 8, LittleEndian::write_f64, BigEndian::write_f64);

    /// Type-check `value` against `typ` and append it.
    pub fn append(&mut self, typ: &Type, value: &Plain) -> Result<()> {
        let exact = Value::make_typed(typ, value.clone())?;
        self.append_value(&exact)
    }

    /// Append an exact value at its own type.
    pub fn append_value(&mut self, value: &Value) -> Result<()> {
        trace!("append {} at {}", value.typ().name(), self.absolute_len());
        match value {
            Value::Byte(v) => self.packet.push(*v),
            Value::Boolean(v) => self.write_u32(u32::from(*v)),
            Value::Int16(v) => self.write_i16(*v),
            Value::UInt16(v) => self.write_u16(*v),
            Value::Int32(v) => self.write_i32(*v),
            Value::UInt32(v) => self.write_u32(*v),
            Value::Int64(v) => self.write_i64(*v),
            Value::UInt64(v) => self.write_u64(*v),
            Value::Double(v) => self.write_f64(*v),
            Value::UnixFd(v) => self.write_u32(*v),
            Value::String(s) | Value::ObjectPath(s) => self.write_string(s),
            Value::Signature(s) => self.write_signature(s),
            Value::Array(array) => {
                self.align(4);
                let size_idx = self.packet.len();
                // reserved, patched below once the body size is known
                self.packet.extend_from_slice(&[0, 0, 0, 0]);

                // elements pad from here even when there are none
                self.align(array.elem_type().alignment());
                let body_start = self.packet.len();
                for item in array.items() {
                    self.append_value(item)?;
                }

                let body_len = self.packet.len() - body_start;
                if body_len >= MAX_ARRAY_BYTES {
                    return Err(Error::TypeMismatch(format!(
                        "ARRAY body of {} bytes reaches the {}-byte limit",
                        body_len, MAX_ARRAY_BYTES
                    )));
                }
                let patch = &mut self.packet[size_idx..size_idx + 4];
                match self.endianness {
                    Endianness::Little => {
                        LittleEndian::write_u32(patch, body_len as u32)
                    }
                    Endianness::Big => BigEndian::write_u32(patch, body_len as u32),
                }
            }
            Value::Struct(members) => {
                self.align(8);
                for member in members {
                    self.append_value(member)?;
                }
            }
            Value::DictEntry(key, entry_value) => {
                self.align(8);
                self.append_value(key)?;
                self.append_value(entry_value)?;
            }
            Value::Variant(child) => {
                let member_sig = child.typ().to_string();
                self.write_signature(&member_sig);
                // a fresh sub-marshaller keyed to the outer position keeps
                // the member's alignment correct in context
                let mut sub = self.sub();
                sub.append_value(child)?;
                let bytes = sub.into_packet();
                self.packet.extend_from_slice(&bytes);
            }
        }
        Ok(())
    }

    /// UINT32 length, the bytes, a trailing NUL.
    fn write_string(&mut self, s: &str) {
        self.write_u32(s.len() as u32);
        self.packet.extend_from_slice(s.as_bytes());
        self.packet.push(0);
    }

    /// BYTE length, the bytes, a trailing NUL.
    fn write_signature(&mut self, s: &str) {
        self.packet.push(s.len() as u8);
        self.packet.extend_from_slice(s.as_bytes());
        self.packet.push(0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::parse_single_signature;
    use crate::unmarshal::PacketUnmarshaller;
    use crate::value::Array;
    use std::collections::HashMap;
    use test_log::test;

    use crate::cursor::Endianness::{Big, Little};

    fn marshal(endianness: Endianness, sig: &str, value: Plain) -> Result<Vec<u8>> {
        let typ = parse_single_signature(sig)?;
        let mut marshaller = PacketMarshaller::new(endianness);
        marshaller.append(&typ, &value)?;
        Ok(marshaller.into_packet())
    }

    #[test]
    fn shorts_follow_the_byte_order() -> Result<()> {
        let typ = parse_single_signature("q")?;

        let mut little = PacketMarshaller::new(Little);
        little.append(&typ, &1u16.into())?;
        little.append(&typ, &2u16.into())?;
        assert_eq!(little.packet(), &[0x01, 0x00, 0x02, 0x00]);

        let mut big = PacketMarshaller::new(Big);
        big.append(&typ, &1u16.into())?;
        big.append(&typ, &2u16.into())?;
        assert_eq!(big.packet(), &[0x00, 0x01, 0x00, 0x02]);
        Ok(())
    }

    #[test]
    fn scalars_align_before_writing() -> Result<()> {
        let mut marshaller = PacketMarshaller::new(Little);
        marshaller.append(&Type::Byte, &7u8.into())?;
        marshaller.append(&Type::Double, &1.0.into())?;
        assert_eq!(
            marshaller.packet(),
            &[
                7, // byte
                0, 0, 0, 0, 0, 0, 0, // padding(8)
                0, 0, 0, 0, 0, 0, 0xf0, 0x3f, // double 1.0
            ]
        );
        Ok(())
    }

    #[test]
    fn strings() -> Result<()> {
        assert_eq!(
            marshal(Little, "s", "Hi".into())?,
            vec![
                2, 0, 0, 0, // 2 byte string
                72, 105, 0, // "Hi" plus terminating null
            ]
        );
        assert_eq!(
            marshal(Big, "s", "Hi".into())?,
            vec![0, 0, 0, 2, 72, 105, 0]
        );
        Ok(())
    }

    #[test]
    fn arrays_reserve_and_patch_their_length() -> Result<()> {
        let value = Plain::List(vec![1i32.into(), 2i32.into(), 3i32.into(), 4i32.into()]);
        assert_eq!(
            marshal(Little, "ai", value)?,
            vec![
                16, 0, 0, 0, // 16 bytes of array
                1, 0, 0, 0, //
                2, 0, 0, 0, //
                3, 0, 0, 0, //
                4, 0, 0, 0,
            ]
        );
        Ok(())
    }

    #[test]
    fn empty_arrays_still_pad_for_their_element() -> Result<()> {
        // an empty at still pads to the 8-byte element boundary
        assert_eq!(
            marshal(Little, "at", Plain::List(vec![]))?,
            vec![0, 0, 0, 0, 0, 0, 0, 0]
        );
        Ok(())
    }

    #[test]
    fn array_of_structs_pads_between_items() -> Result<()> {
        let value = Plain::List(vec![
            Plain::List(vec![1u16.into(), 2u16.into()]),
            Plain::List(vec![3u16.into(), 4u16.into()]),
        ]);
        assert_eq!(
            marshal(Little, "a(qq)", value)?,
            vec![
                0x0C, 0, 0, 0, // body size
                0, 0, 0, 0, // padding(8)
                1, 0, 2, 0, // item
                0, 0, 0, 0, // padding(8)
                3, 0, 4, 0, // item
            ]
        );
        Ok(())
    }

    #[test]
    fn variants_carry_their_member_signature() -> Result<()> {
        let mut marshaller = PacketMarshaller::new(Little);
        marshaller.append_value(&Value::Variant(Box::new(Value::Byte(255))))?;
        assert_eq!(
            marshaller.packet(),
            &[
                1, b'y', 0, // signature "y"
                255, // the member
            ]
        );

        // the member aligns against the outer position, not a fresh zero
        let mut marshaller = PacketMarshaller::new(Little);
        marshaller.append_value(&Value::Variant(Box::new(Value::UInt32(1))))?;
        assert_eq!(
            marshaller.packet(),
            &[
                1, b'u', 0, // signature "u"
                0,    // padding(4)
                1, 0, 0, 0, // the member
            ]
        );
        Ok(())
    }

    #[test]
    fn dicts_marshal_as_entry_arrays() -> Result<()> {
        // a single entry keeps the expected bytes deterministic
        let mut map = HashMap::new();
        map.insert(Plain::Str("a".into()), Plain::Int(2));
        assert_eq!(
            marshal(Little, "a{sq}", Plain::Map(map))?,
            vec![
                8, 0, 0, 0, // 8 bytes of array
                0, 0, 0, 0, // padding(8) before the entry
                1, 0, 0, 0, // key string is 1 byte
                97, 0, // "a" with terminating null
                2, 0, // value
            ]
        );
        Ok(())
    }

    #[test]
    fn nil_is_fatal() {
        assert!(matches!(
            marshal(Little, "s", Plain::Nil),
            Err(Error::TypeMismatch(_))
        ));
        assert!(matches!(
            marshal(Little, "ai", Plain::Nil),
            Err(Error::TypeMismatch(_))
        ));
    }

    #[test]
    fn struct_arity_mismatch_is_fatal() {
        let err = marshal(
            Little,
            "(qq)",
            Plain::List(vec![1u16.into(), 2u16.into(), 3u16.into()]),
        )
        .unwrap_err();
        match err {
            Error::TypeMismatch(msg) => {
                assert!(msg.contains("2 members"), "{}", msg)
            }
            other => panic!("expected a type mismatch, got {:?}", other),
        }
    }

    #[test]
    fn maps_need_dict_arrays() {
        assert!(matches!(
            marshal(Little, "ai", Plain::Map(HashMap::new())),
            Err(Error::TypeMismatch(_))
        ));
    }

    #[test]
    fn alignment_invariant() -> Result<()> {
        // whatever was written before, a value starts on its own boundary
        for (sig, value, alignment) in vec![
            ("q", Plain::Int(1), 2),
            ("u", Plain::Int(1), 4),
            ("t", Plain::Int(1), 8),
            ("d", Plain::Float(1.0), 8),
            ("s", Plain::Str("x".into()), 4),
            ("ai", Plain::List(vec![]), 4),
            ("(y)", Plain::List(vec![Plain::Int(1)]), 8),
        ] {
            for lead in 0..3usize {
                let typ = parse_single_signature(sig)?;
                let mut marshaller = PacketMarshaller::new(Little);
                for _ in 0..lead {
                    marshaller.append(&Type::Byte, &Plain::Int(0))?;
                }
                let before = marshaller.packet().len();
                marshaller.append(&typ, &value)?;
                let padded = crate::align::align_up(before, alignment);
                // everything between is NUL padding
                assert!(marshaller.packet()[before..padded]
                    .iter()
                    .all(|b| *b == 0));
            }
        }
        Ok(())
    }

    #[test]
    fn round_trips_in_both_modes_and_endiannesses() -> Result<()> {
        let mut map = HashMap::new();
        map.insert(Plain::Str("one".into()), Plain::Int(1));
        map.insert(Plain::Str("two".into()), Plain::Int(2));

        let cases: Vec<(&str, Plain)> = vec![
            ("y", Plain::Int(255)),
            ("b", Plain::Boolean(true)),
            ("b", Plain::Boolean(false)),
            ("n", Plain::Int(-32_768)),
            ("q", Plain::Int(65_535)),
            ("i", Plain::Int(-1)),
            ("u", Plain::Int(4_294_967_295)),
            ("x", Plain::Int(i128::from(i64::MIN))),
            ("t", Plain::Int(i128::from(u64::MAX))),
            ("d", Plain::Float(3.14)),
            ("h", Plain::Int(5)),
            ("s", Plain::Str("unicode ☃".into())),
            ("o", Plain::Str("/org/freedesktop/DBus".into())),
            ("g", Plain::Str("a{sv}".into())),
            ("ai", Plain::List(vec![1i32.into(), 2i32.into(), 3i32.into()])),
            ("aai", Plain::List(vec![
                Plain::List(vec![1i32.into()]),
                Plain::List(vec![2i32.into(), 3i32.into()]),
            ])),
            ("a{sq}", Plain::Map(map)),
            (
                "(sd(sd))",
                Plain::List(vec![
                    "Hi".into(),
                    0.2.into(),
                    Plain::List(vec!["Hello".into(), 8.3.into()]),
                ]),
            ),
            ("v", Plain::Int(42)),
            ("av", Plain::List(vec![1i32.into(), "x".into()])),
        ];

        for (sig, value) in cases {
            for endianness in [Little, Big].iter().copied() {
                let typ = parse_single_signature(sig)?;
                let exact = Value::make_typed(&typ, value.clone())?;

                let mut marshaller = PacketMarshaller::new(endianness);
                marshaller.append_value(&exact)?;
                let bytes = marshaller.into_packet();

                let mut unmarshaller = PacketUnmarshaller::new(&bytes, endianness);
                let plains = unmarshaller.unmarshall(sig, Some(bytes.len()))?;
                assert_eq!(
                    plains,
                    vec![exact.to_plain()],
                    "plain round-trip of {:?} ({:?})",
                    sig,
                    endianness
                );
                assert_eq!(unmarshaller.consumed(), bytes.len());

                let mut unmarshaller = PacketUnmarshaller::new(&bytes, endianness);
                let exacts = unmarshaller.unmarshall_exact(sig, Some(bytes.len()))?;
                assert_eq!(
                    exacts,
                    vec![exact.clone()],
                    "exact round-trip of {:?} ({:?})",
                    sig,
                    endianness
                );
            }
        }
        Ok(())
    }

    #[test]
    fn exact_empty_arrays_keep_their_element_type() -> Result<()> {
        let empty = Value::Array(Array::new(Type::UInt64, vec![])?);
        let mut marshaller = PacketMarshaller::new(Little);
        marshaller.append_value(&empty)?;
        let bytes = marshaller.into_packet();

        let mut unmarshaller = PacketUnmarshaller::new(&bytes, Little);
        let back = unmarshaller.unmarshall_exact("at", None)?;
        assert_eq!(back, vec![empty]);
        Ok(())
    }
}
