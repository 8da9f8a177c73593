//! The two value models of the codec.
//!
//! [`Value`] is the exact representation: every instance knows its precise
//! wire type, down to the element type of an empty array. [`Plain`] is the
//! lossy counterpart: native booleans, integers, floats, strings, lists and
//! maps with no type tag attached. Unmarshalling can produce either;
//! marshalling accepts plain values together with a [`Type`] and converts
//! them through [`Value::make_typed`].

use std::collections::HashMap;
use std::hash::{Hash, Hasher};

use log::trace;

use crate::error::{Error, Result};
use crate::types::{parse_signature, Type};

/// A homogeneous sequence. Keeps the element type explicitly so that empty
/// arrays still marshal with the right signature.
#[derive(Clone, Debug)]
pub struct Array {
    elem: Type,
    items: Vec<Value>,
}

impl Array {
    /// Build an array of `elem` values. Every item must have exactly that
    /// type.
    pub fn new(elem: Type, items: Vec<Value>) -> Result<Array> {
        for item in &items {
            let got = item.typ();
            if got != elem {
                return Err(Error::TypeMismatch(format!(
                    "ARRAY of {} cannot hold a {}",
                    elem,
                    got
                )));
            }
        }
        Ok(Array { elem, items })
    }

    pub fn elem_type(&self) -> &Type {
        &self.elem
    }

    pub fn items(&self) -> &[Value] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// An exact, explicitly typed D-Bus value.
#[derive(Clone, Debug)]
pub enum Value {
    Byte(u8),
    Boolean(bool),
    Int16(i16),
    UInt16(u16),
    Int32(i32),
    UInt32(u32),
    Int64(i64),
    UInt64(u64),
    Double(f64),
    UnixFd(u32),
    String(String),
    ObjectPath(String),
    Signature(String),
    Array(Array),
    Struct(Vec<Value>),
    /// Key/value pair; appears only as an array element on the wire.
    DictEntry(Box<Value>, Box<Value>),
    /// Boxes exactly one value of any type.
    Variant(Box<Value>),
}

impl Value {
    /// The precise wire type of this value.
    pub fn typ(&self) -> Type {
        match self {
            Value::Byte(_) => Type::Byte,
            Value::Boolean(_) => Type::Boolean,
            Value::Int16(_) => Type::Int16,
            Value::UInt16(_) => Type::UInt16,
            Value::Int32(_) => Type::Int32,
            Value::UInt32(_) => Type::UInt32,
            Value::Int64(_) => Type::Int64,
            Value::UInt64(_) => Type::UInt64,
            Value::Double(_) => Type::Double,
            Value::UnixFd(_) => Type::UnixFd,
            Value::String(_) => Type::String,
            Value::ObjectPath(_) => Type::ObjectPath,
            Value::Signature(_) => Type::Signature,
            Value::Array(array) => Type::Array(Box::new(array.elem.clone())),
            Value::Struct(members) => {
                Type::Struct(members.iter().map(Value::typ).collect())
            }
            Value::DictEntry(key, value) => {
                Type::DictEntry(Box::new(key.typ()), Box::new(value.typ()))
            }
            Value::Variant(_) => Type::Variant,
        }
    }

    /// Strip the type tags: the lossy, native view of this value.
    ///
    /// An array of dict entries collapses into a map, a variant unwraps to
    /// its member, and all integer widths widen into one plain integer.
    pub fn to_plain(&self) -> Plain {
        match self {
            Value::Byte(v) => Plain::Int(i128::from(*v)),
            Value::Boolean(v) => Plain::Boolean(*v),
            Value::Int16(v) => Plain::Int(i128::from(*v)),
            Value::UInt16(v) => Plain::Int(i128::from(*v)),
            Value::Int32(v) => Plain::Int(i128::from(*v)),
            Value::UInt32(v) => Plain::Int(i128::from(*v)),
            Value::Int64(v) => Plain::Int(i128::from(*v)),
            Value::UInt64(v) => Plain::Int(i128::from(*v)),
            Value::Double(v) => Plain::Float(*v),
            Value::UnixFd(v) => Plain::Int(i128::from(*v)),
            Value::String(s) | Value::ObjectPath(s) | Value::Signature(s) => {
                Plain::Str(s.clone())
            }
            Value::Array(array) => {
                if matches!(array.elem, Type::DictEntry(..)) {
                    let map = array
                        .items
                        .iter()
                        .map(|item| match item {
                            Value::DictEntry(key, value) => {
                                (key.to_plain(), value.to_plain())
                            }
                            // Array::new and the unmarshaller only put
                            // entries into a dict-typed array
                            other => unreachable!(
                                "dict array holding a {}",
                                other.typ()
                            ),
                        })
                        .collect();
                    Plain::Map(map)
                } else {
                    Plain::List(array.items.iter().map(Value::to_plain).collect())
                }
            }
            Value::Struct(members) => {
                Plain::List(members.iter().map(Value::to_plain).collect())
            }
            Value::DictEntry(key, value) => {
                Plain::List(vec![key.to_plain(), value.to_plain()])
            }
            Value::Variant(child) => child.to_plain(),
        }
    }

    /// Construct an exact value of `typ` from a plain one, validating
    /// everything the wire format demands: integer ranges, string
    /// contents, object-path and signature grammar, container arity.
    pub fn make_typed(typ: &Type, value: Plain) -> Result<Value> {
        if let Plain::Nil = value {
            return Err(Error::TypeMismatch(format!(
                "nil cannot be marshalled as {}",
                typ.name()
            )));
        }

        match typ {
            Type::Byte => Ok(Value::Byte(int_in_range(typ, &value, 0, 255)? as u8)),
            Type::Boolean => match value {
                Plain::Boolean(v) => Ok(Value::Boolean(v)),
                other => Err(mismatch(typ, &other)),
            },
            Type::Int16 => Ok(Value::Int16(
                int_in_range(typ, &value, i128::from(i16::MIN), i128::from(i16::MAX))? as i16,
            )),
            Type::UInt16 => Ok(Value::UInt16(
                int_in_range(typ, &value, 0, i128::from(u16::MAX))? as u16,
            )),
            Type::Int32 => Ok(Value::Int32(
                int_in_range(typ, &value, i128::from(i32::MIN), i128::from(i32::MAX))? as i32,
            )),
            Type::UInt32 => Ok(Value::UInt32(
                int_in_range(typ, &value, 0, i128::from(u32::MAX))? as u32,
            )),
            Type::Int64 => Ok(Value::Int64(
                int_in_range(typ, &value, i128::from(i64::MIN), i128::from(i64::MAX))? as i64,
            )),
            Type::UInt64 => Ok(Value::UInt64(
                int_in_range(typ, &value, 0, i128::from(u64::MAX))? as u64,
            )),
            Type::UnixFd => Ok(Value::UnixFd(
                int_in_range(typ, &value, 0, i128::from(u32::MAX))? as u32,
            )),
            Type::Double => match value {
                Plain::Float(v) => Ok(Value::Double(v)),
                Plain::Int(v) => Ok(Value::Double(v as f64)),
                other => Err(mismatch(typ, &other)),
            },
            Type::String => match value {
                Plain::Str(s) => {
                    if s.contains('\0') {
                        return Err(Error::TypeMismatch(
                            "STRING must not contain NUL".into(),
                        ));
                    }
                    Ok(Value::String(s))
                }
                other => Err(mismatch(typ, &other)),
            },
            Type::ObjectPath => match value {
                Plain::Str(s) => {
                    if !valid_object_path(&s) {
                        return Err(Error::TypeMismatch(format!(
                            "{:?} is not a valid object path",
                            s
                        )));
                    }
                    Ok(Value::ObjectPath(s))
                }
                other => Err(mismatch(typ, &other)),
            },
            Type::Signature => match value {
                Plain::Str(s) => {
                    parse_signature(&s).map_err(|e| {
                        Error::TypeMismatch(format!("bad SIGNATURE value: {}", e))
                    })?;
                    Ok(Value::Signature(s))
                }
                other => Err(mismatch(typ, &other)),
            },
            Type::Array(elem) => match value {
                Plain::List(items) => {
                    let typed = items
                        .into_iter()
                        .map(|item| Value::make_typed(elem, item))
                        .collect::<Result<Vec<Value>>>()?;
                    Ok(Value::Array(Array::new((**elem).clone(), typed)?))
                }
                Plain::Map(map) => {
                    let (key_type, value_type) = match &**elem {
                        Type::DictEntry(k, v) => (k, v),
                        other => {
                            return Err(Error::TypeMismatch(format!(
                                "a map needs an ARRAY of DICT_ENTRY, not of {}",
                                other.name()
                            )))
                        }
                    };
                    let typed = map
                        .into_iter()
                        .map(|(k, v)| {
                            Ok(Value::DictEntry(
                                Box::new(Value::make_typed(key_type, k)?),
                                Box::new(Value::make_typed(value_type, v)?),
                            ))
                        })
                        .collect::<Result<Vec<Value>>>()?;
                    Ok(Value::Array(Array::new((**elem).clone(), typed)?))
                }
                other => Err(mismatch(typ, &other)),
            },
            Type::Struct(members) => match value {
                Plain::List(items) => {
                    if items.len() != members.len() {
                        return Err(Error::TypeMismatch(format!(
                            "STRUCT has {} members but {} elements were given",
                            members.len(),
                            items.len()
                        )));
                    }
                    let typed = members
                        .iter()
                        .zip(items)
                        .map(|(member, item)| Value::make_typed(member, item))
                        .collect::<Result<Vec<Value>>>()?;
                    Ok(Value::Struct(typed))
                }
                other => Err(mismatch(typ, &other)),
            },
            Type::DictEntry(key_type, value_type) => match value {
                Plain::List(mut items) => {
                    if items.len() != 2 {
                        return Err(Error::TypeMismatch(format!(
                            "DICT_ENTRY has 2 members but {} elements were given",
                            items.len()
                        )));
                    }
                    let value = items.pop().expect("length checked above");
                    let key = items.pop().expect("length checked above");
                    Ok(Value::DictEntry(
                        Box::new(Value::make_typed(key_type, key)?),
                        Box::new(Value::make_typed(value_type, value)?),
                    ))
                }
                other => Err(mismatch(typ, &other)),
            },
            Type::Variant => {
                let member_type = infer_variant_type(&value);
                trace!("variant member type inferred as {}", member_type);
                Ok(Value::Variant(Box::new(Value::make_typed(
                    &member_type,
                    value,
                )?)))
            }
        }
    }

    /// Loose equality: compare the unwrapped plain values, ignoring the
    /// exact wire types. `UInt32(7)` loosely equals `Int64(7)`.
    pub fn loose_eq(&self, other: &Value) -> bool {
        self.to_plain() == other.to_plain()
    }
}

// Strict equality, usable as hash-key equality: types and wrapped values
// must match exactly. Doubles compare by bit pattern so that values can
// serve as dict keys.
impl PartialEq for Value {
    fn eq(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Byte(a), Value::Byte(b)) => a == b,
            (Value::Boolean(a), Value::Boolean(b)) => a == b,
            (Value::Int16(a), Value::Int16(b)) => a == b,
            (Value::UInt16(a), Value::UInt16(b)) => a == b,
            (Value::Int32(a), Value::Int32(b)) => a == b,
            (Value::UInt32(a), Value::UInt32(b)) => a == b,
            (Value::Int64(a), Value::Int64(b)) => a == b,
            (Value::UInt64(a), Value::UInt64(b)) => a == b,
            (Value::Double(a), Value::Double(b)) => a.to_bits() == b.to_bits(),
            (Value::UnixFd(a), Value::UnixFd(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::ObjectPath(a), Value::ObjectPath(b)) => a == b,
            (Value::Signature(a), Value::Signature(b)) => a == b,
            (Value::Array(a), Value::Array(b)) => {
                a.elem == b.elem && a.items == b.items
            }
            (Value::Struct(a), Value::Struct(b)) => a == b,
            (Value::DictEntry(ak, av), Value::DictEntry(bk, bv)) => {
                ak == bk && av == bv
            }
            (Value::Variant(a), Value::Variant(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for Value {}

impl Hash for Value {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_u8(self.typ().code());
        match self {
            Value::Byte(v) => v.hash(state),
            Value::Boolean(v) => v.hash(state),
            Value::Int16(v) => v.hash(state),
            Value::UInt16(v) => v.hash(state),
            Value::Int32(v) => v.hash(state),
            Value::UInt32(v) => v.hash(state),
            Value::Int64(v) => v.hash(state),
            Value::UInt64(v) => v.hash(state),
            Value::Double(v) => state.write_u64(v.to_bits()),
            Value::UnixFd(v) => v.hash(state),
            Value::String(s) | Value::ObjectPath(s) | Value::Signature(s) => {
                s.hash(state)
            }
            Value::Array(array) => {
                array.elem.hash(state);
                array.items.hash(state);
            }
            Value::Struct(members) => members.hash(state),
            Value::DictEntry(key, value) => {
                key.hash(state);
                value.hash(state);
            }
            Value::Variant(child) => child.hash(state),
        }
    }
}

/// A plain native value with no wire type attached.
#[derive(Clone, Debug)]
pub enum Plain {
    /// Absence. Never marshallable, but it exists so the variant type
    /// inference can treat it the way the protocol heuristic does.
    Nil,
    Boolean(bool),
    /// One integer category wide enough for every wire integer type.
    Int(i128),
    Float(f64),
    Str(String),
    List(Vec<Plain>),
    Map(HashMap<Plain, Plain>),
}

impl PartialEq for Plain {
    fn eq(&self, other: &Plain) -> bool {
        match (self, other) {
            (Plain::Nil, Plain::Nil) => true,
            (Plain::Boolean(a), Plain::Boolean(b)) => a == b,
            (Plain::Int(a), Plain::Int(b)) => a == b,
            (Plain::Float(a), Plain::Float(b)) => a.to_bits() == b.to_bits(),
            (Plain::Str(a), Plain::Str(b)) => a == b,
            (Plain::List(a), Plain::List(b)) => a == b,
            (Plain::Map(a), Plain::Map(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for Plain {}

impl Hash for Plain {
    fn hash<H: Hasher>(&self, state: &mut H) {
        match self {
            Plain::Nil => state.write_u8(0),
            Plain::Boolean(v) => {
                state.write_u8(1);
                v.hash(state);
            }
            Plain::Int(v) => {
                state.write_u8(2);
                v.hash(state);
            }
            Plain::Float(v) => {
                state.write_u8(3);
                state.write_u64(v.to_bits());
            }
            Plain::Str(s) => {
                state.write_u8(4);
                s.hash(state);
            }
            Plain::List(items) => {
                state.write_u8(5);
                items.hash(state);
            }
            Plain::Map(map) => {
                // wire keys are always basic, so a map never actually keys
                // another map; length is enough here
                state.write_u8(6);
                state.write_usize(map.len());
            }
        }
    }
}

impl From<bool> for Plain {
    fn from(v: bool) -> Plain {
        Plain::Boolean(v)
    }
}

impl From<f64> for Plain {
    fn from(v: f64) -> Plain {
        Plain::Float(v)
    }
}

impl From<&str> for Plain {
    fn from(v: &str) -> Plain {
        Plain::Str(v.to_owned())
    }
}

impl From<String> for Plain {
    fn from(v: String) -> Plain {
        Plain::Str(v)
    }
}

impl From<Vec<Plain>> for Plain {
    fn from(v: Vec<Plain>) -> Plain {
        Plain::List(v)
    }
}

macro_rules! plain_from_int {
    ($($t:ty),*) => {
        $(impl From<$t> for Plain {
            fn from(v: $t) -> Plain {
                Plain::Int(i128::from(v))
            }
        })*
    };
}

plain_from_int!(u8, i16, u16, i32, u32, i64, u64);

/// The wire type a bare value gets when it is put into a variant with no
/// type given. This heuristic is part of the public contract: peers depend
/// on it, so it stays exactly as the protocol implementations agreed on it,
/// debatable defaults included.
///
/// - nil and booleans become BOOLEAN
/// - floats become DOUBLE
/// - integers become INT32 when they fit, INT64 otherwise (never a
///   byte or 16-bit type)
/// - strings become STRING
/// - lists always become `av`, maps always become `a{sv}`
pub fn infer_variant_type(value: &Plain) -> Type {
    match value {
        Plain::Nil | Plain::Boolean(_) => Type::Boolean,
        Plain::Float(_) => Type::Double,
        Plain::Int(v) => {
            if *v >= i128::from(i32::MIN) && *v <= i128::from(i32::MAX) {
                Type::Int32
            } else {
                Type::Int64
            }
        }
        Plain::Str(_) => Type::String,
        Plain::List(_) => Type::Array(Box::new(Type::Variant)),
        Plain::Map(_) => Type::Array(Box::new(Type::DictEntry(
            Box::new(Type::String),
            Box::new(Type::Variant),
        ))),
    }
}

/// `/`, or one or more `/`-separated segments of `[A-Za-z0-9_]+`.
pub fn valid_object_path(path: &str) -> bool {
    if path == "/" {
        return true;
    }
    match path.strip_prefix('/') {
        None => false,
        Some(rest) => rest.split('/').all(|segment| {
            !segment.is_empty()
                && segment
                    .bytes()
                    .all(|b| b.is_ascii_alphanumeric() || b == b'_')
        }),
    }
}

fn mismatch(typ: &Type, value: &Plain) -> Error {
    Error::TypeMismatch(format!(
        "cannot make a {} from {:?}",
        typ.name(),
        value
    ))
}

fn int_in_range(typ: &Type, value: &Plain, min: i128, max: i128) -> Result<i128> {
    let v = match value {
        Plain::Int(v) => *v,
        other => return Err(mismatch(typ, other)),
    };
    if v < min || v > max {
        return Err(Error::OutOfRange {
            value: v,
            type_name: typ.name(),
        });
    }
    Ok(v)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::types::parse_single_signature;
    use test_log::test;

    fn typed(sig: &str, value: Plain) -> Result<Value> {
        Value::make_typed(&parse_single_signature(sig)?, value)
    }

    #[test]
    fn integer_ranges() -> Result<()> {
        let ok = typed("q", Plain::Int(42))?;
        assert_eq!(ok, Value::UInt16(42));
        assert_eq!(ok.to_plain(), Plain::Int(42));

        assert_eq!(
            typed("q", Plain::Int(70_000)),
            Err(Error::OutOfRange {
                value: 70_000,
                type_name: "UINT16"
            })
        );
        assert!(typed("y", Plain::Int(256)).is_err());
        assert!(typed("y", Plain::Int(-1)).is_err());
        assert!(typed("n", Plain::Int(-32_769)).is_err());
        assert_eq!(typed("n", Plain::Int(-32_768))?, Value::Int16(-32_768));
        assert!(typed("u", Plain::Int(-1)).is_err());
        assert_eq!(
            typed("t", Plain::Int(i128::from(u64::MAX)))?,
            Value::UInt64(u64::MAX)
        );
        assert!(typed("t", Plain::Int(i128::from(u64::MAX) + 1)).is_err());
        Ok(())
    }

    #[test]
    fn nil_is_always_a_type_error() {
        for sig in ["y", "b", "s", "ai", "(i)", "v"].iter() {
            assert!(
                matches!(typed(sig, Plain::Nil), Err(Error::TypeMismatch(_))),
                "nil should not make a {:?}",
                sig
            );
        }
    }

    #[test]
    fn strings_validate() -> Result<()> {
        assert_eq!(typed("s", "hi".into())?, Value::String("hi".into()));
        assert!(typed("s", Plain::Str("em\0bedded".into())).is_err());

        assert_eq!(
            typed("o", "/org/freedesktop/DBus".into())?,
            Value::ObjectPath("/org/freedesktop/DBus".into())
        );
        assert!(typed("o", "not/a/path".into()).is_err());

        assert_eq!(typed("g", "a{sv}".into())?, Value::Signature("a{sv}".into()));
        assert!(typed("g", "a{".into()).is_err());
        Ok(())
    }

    #[test]
    fn object_path_grammar() {
        assert!(valid_object_path("/"));
        assert!(valid_object_path("/org"));
        assert!(valid_object_path("/org/freedesktop/DBus_1"));
        assert!(!valid_object_path(""));
        assert!(!valid_object_path("org"));
        assert!(!valid_object_path("/org/"));
        assert!(!valid_object_path("/org//x"));
        assert!(!valid_object_path("/org/free-desktop"));
    }

    #[test]
    fn struct_arity_is_checked() -> Result<()> {
        let ok = typed("(qq)", Plain::List(vec![1u16.into(), 2u16.into()]))?;
        assert_eq!(ok, Value::Struct(vec![Value::UInt16(1), Value::UInt16(2)]));

        let err = typed(
            "(qq)",
            Plain::List(vec![1u16.into(), 2u16.into(), 3u16.into()]),
        )
        .unwrap_err();
        match err {
            Error::TypeMismatch(msg) => {
                assert!(msg.contains("2 members"), "{}", msg);
                assert!(msg.contains("3 elements"), "{}", msg);
            }
            other => panic!("expected a type mismatch, got {:?}", other),
        }
        Ok(())
    }

    #[test]
    fn arrays_are_homogeneous() {
        assert!(Array::new(
            Type::UInt16,
            vec![Value::UInt16(1), Value::UInt32(2)]
        )
        .is_err());
        assert!(Array::new(Type::UInt16, vec![]).is_ok());
    }

    #[test]
    fn maps_need_dict_arrays() -> Result<()> {
        let mut map = HashMap::new();
        map.insert(Plain::Str("k".into()), Plain::Int(1));

        let ok = typed("a{si}", Plain::Map(map.clone()))?;
        assert_eq!(ok.to_plain(), {
            let mut expected = HashMap::new();
            expected.insert(Plain::Str("k".into()), Plain::Int(1));
            Plain::Map(expected)
        });

        assert!(matches!(
            typed("ai", Plain::Map(map)),
            Err(Error::TypeMismatch(_))
        ));
        Ok(())
    }

    #[test]
    fn variant_inference_heuristic() {
        assert_eq!(infer_variant_type(&Plain::Nil), Type::Boolean);
        assert_eq!(infer_variant_type(&true.into()), Type::Boolean);
        assert_eq!(infer_variant_type(&42i32.into()), Type::Int32);
        assert_eq!(infer_variant_type(&3_000_000_000i64.into()), Type::Int64);
        assert_eq!(infer_variant_type(&5_000_000_000i64.into()), Type::Int64);
        assert_eq!(infer_variant_type(&3.14.into()), Type::Double);
        assert_eq!(infer_variant_type(&"foo".into()), Type::String);
        assert_eq!(
            infer_variant_type(&Plain::List(vec![1i32.into()])),
            Type::Array(Box::new(Type::Variant))
        );
        assert_eq!(
            infer_variant_type(&Plain::Map(HashMap::new())),
            Type::Array(Box::new(Type::DictEntry(
                Box::new(Type::String),
                Box::new(Type::Variant)
            )))
        );
    }

    #[test]
    fn variants_box_their_member() -> Result<()> {
        let v = typed("v", 42i32.into())?;
        assert_eq!(v, Value::Variant(Box::new(Value::Int32(42))));
        assert_eq!(v.typ(), Type::Variant);
        assert_eq!(v.to_plain(), Plain::Int(42));
        Ok(())
    }

    #[test]
    fn strict_vs_loose_equality() {
        let exact = Value::UInt32(7);
        let wider = Value::Int64(7);
        assert_ne!(exact, wider);
        assert!(exact.loose_eq(&wider));

        let boxed = Value::Variant(Box::new(Value::UInt32(7)));
        assert_ne!(exact, boxed);
        assert!(exact.loose_eq(&boxed));
    }

    #[test]
    fn dict_arrays_collapse_to_maps() -> Result<()> {
        let entry_type =
            Type::DictEntry(Box::new(Type::Byte), Box::new(Type::UInt16));
        let array = Array::new(
            entry_type,
            vec![
                Value::DictEntry(Box::new(Value::Byte(1)), Box::new(Value::UInt16(2))),
                Value::DictEntry(Box::new(Value::Byte(3)), Box::new(Value::UInt16(4))),
            ],
        )?;

        let mut expected = HashMap::new();
        expected.insert(Plain::Int(1), Plain::Int(2));
        expected.insert(Plain::Int(3), Plain::Int(4));
        assert_eq!(Value::Array(array).to_plain(), Plain::Map(expected));
        Ok(())
    }
}
