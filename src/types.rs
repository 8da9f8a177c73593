//! The D-Bus type-signature grammar.
//!
//! A signature string such as `"a{sv}"` decomposes into a sequence of
//! single complete types, each represented here as a [`Type`] tree node.
//! [`parse_signature`] is the only way to build a `Type` from untrusted
//! input; it enforces the grammar, the 255-byte signature limit and the
//! container nesting limit.

use std::fmt;

use crate::error::{Error, Result};

/// On-wire length limit for a signature, including nested ones.
pub const MAX_SIGNATURE_BYTES: usize = 255;

/// Combined nesting limit for ARRAY, STRUCT and DICT_ENTRY containers.
pub const MAX_CONTAINER_DEPTH: usize = 32;

/// An ARRAY body may not reach 64 MiB.
pub const MAX_ARRAY_BYTES: usize = 67_108_864;

/// How deep VARIANTs may nest inside VARIANTs before unmarshalling gives up.
pub const MAX_VARIANT_DEPTH: usize = 64;

/// One single complete type from a signature.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Type {
    Byte,
    Boolean,
    Int16,
    UInt16,
    Int32,
    UInt32,
    Int64,
    UInt64,
    Double,
    String,
    ObjectPath,
    Signature,
    UnixFd,
    Variant,
    /// Homogeneous sequence; the boxed type is the element type.
    Array(Box<Type>),
    /// Heterogeneous fixed-arity tuple, at least one member.
    Struct(Vec<Type>),
    /// Key/value pair; only ever the element type of an [`Type::Array`].
    DictEntry(Box<Type>, Box<Type>),
}

impl Type {
    /// The byte boundary values of this type start on.
    pub fn alignment(&self) -> usize {
        match self {
            Type::Byte | Type::Signature | Type::Variant => 1,
            Type::Int16 | Type::UInt16 => 2,
            Type::Boolean
            | Type::Int32
            | Type::UInt32
            | Type::UnixFd
            | Type::String
            | Type::ObjectPath
            | Type::Array(_) => 4,
            Type::Int64
            | Type::UInt64
            | Type::Double
            | Type::Struct(_)
            | Type::DictEntry(..) => 8,
        }
    }

    /// The signature type code. STRUCT and DICT_ENTRY answer with their
    /// reserved codes `r` and `e`, which never appear in a signature.
    pub fn code(&self) -> u8 {
        match self {
            Type::Byte => b'y',
            Type::Boolean => b'b',
            Type::Int16 => b'n',
            Type::UInt16 => b'q',
            Type::Int32 => b'i',
            Type::UInt32 => b'u',
            Type::Int64 => b'x',
            Type::UInt64 => b't',
            Type::Double => b'd',
            Type::String => b's',
            Type::ObjectPath => b'o',
            Type::Signature => b'g',
            Type::UnixFd => b'h',
            Type::Variant => b'v',
            Type::Array(_) => b'a',
            Type::Struct(_) => b'r',
            Type::DictEntry(..) => b'e',
        }
    }

    /// Protocol name of the type, for diagnostics.
    pub fn name(&self) -> &'static str {
        match self {
            Type::Byte => "BYTE",
            Type::Boolean => "BOOLEAN",
            Type::Int16 => "INT16",
            Type::UInt16 => "UINT16",
            Type::Int32 => "INT32",
            Type::UInt32 => "UINT32",
            Type::Int64 => "INT64",
            Type::UInt64 => "UINT64",
            Type::Double => "DOUBLE",
            Type::String => "STRING",
            Type::ObjectPath => "OBJECT_PATH",
            Type::Signature => "SIGNATURE",
            Type::UnixFd => "UNIX_FD",
            Type::Variant => "VARIANT",
            Type::Array(_) => "ARRAY",
            Type::Struct(_) => "STRUCT",
            Type::DictEntry(..) => "DICT_ENTRY",
        }
    }

    /// Basic types are the fixed-size and string-like scalars; only they
    /// may key a dict entry.
    pub fn is_basic(&self) -> bool {
        !matches!(
            self,
            Type::Variant | Type::Array(_) | Type::Struct(_) | Type::DictEntry(..)
        )
    }

    /// Fixed types occupy a constant number of bytes on the wire.
    pub fn is_fixed(&self) -> bool {
        self.is_basic()
            && !matches!(self, Type::String | Type::ObjectPath | Type::Signature)
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Type::Array(child) => write!(f, "a{}", child),
            Type::Struct(members) => {
                write!(f, "(")?;
                for member in members {
                    write!(f, "{}", member)?;
                }
                write!(f, ")")
            }
            Type::DictEntry(key, value) => write!(f, "{{{}{}}}", key, value),
            other => write!(f, "{}", other.code() as char),
        }
    }
}

/// Render a type sequence back into a signature string.
pub fn signature_of(types: &[Type]) -> String {
    types.iter().map(|t| t.to_string()).collect()
}

/// Parse a signature into its single complete types, one [`Type`] each.
pub fn parse_signature(signature: &str) -> Result<Vec<Type>> {
    if signature.len() > MAX_SIGNATURE_BYTES {
        return Err(Error::InvalidSignature(format!(
            "signature of {} bytes exceeds the {}-byte limit",
            signature.len(),
            MAX_SIGNATURE_BYTES
        )));
    }

    let mut parser = Parser {
        signature,
        bytes: signature.as_bytes(),
        idx: 0,
        depth: 0,
    };

    let mut types = Vec::new();
    while let Some(c) = parser.next_code() {
        types.push(parser.parse_one(c, false)?);
    }
    Ok(types)
}

/// Parse a signature that must contain exactly one single complete type.
pub fn parse_single_signature(signature: &str) -> Result<Type> {
    let mut types = parse_signature(signature)?;
    if types.len() != 1 {
        return Err(Error::InvalidSignature(format!(
            "expected exactly 1 complete type in {:?}, found {}",
            signature,
            types.len()
        )));
    }
    Ok(types.remove(0))
}

struct Parser<'a> {
    signature: &'a str,
    bytes: &'a [u8],
    idx: usize,
    depth: usize,
}

impl<'a> Parser<'a> {
    fn next_code(&mut self) -> Option<u8> {
        let c = self.bytes.get(self.idx).copied();
        self.idx += 1;
        c
    }

    fn enter_container(&mut self) -> Result<()> {
        self.depth += 1;
        if self.depth > MAX_CONTAINER_DEPTH {
            return Err(Error::InvalidSignature(format!(
                "{:?} nests containers deeper than {} levels",
                self.signature, MAX_CONTAINER_DEPTH
            )));
        }
        Ok(())
    }

    /// Parse the single complete type starting with code `c`.
    /// `in_array` is true only when `c` directly follows an `a`, the one
    /// place a dict entry is allowed.
    fn parse_one(&mut self, c: u8, in_array: bool) -> Result<Type> {
        match c {
            b'y' => Ok(Type::Byte),
            b'b' => Ok(Type::Boolean),
            b'n' => Ok(Type::Int16),
            b'q' => Ok(Type::UInt16),
            b'i' => Ok(Type::Int32),
            b'u' => Ok(Type::UInt32),
            b'x' => Ok(Type::Int64),
            b't' => Ok(Type::UInt64),
            b'd' => Ok(Type::Double),
            b's' => Ok(Type::String),
            b'o' => Ok(Type::ObjectPath),
            b'g' => Ok(Type::Signature),
            b'h' => Ok(Type::UnixFd),
            b'v' => Ok(Type::Variant),
            b'a' => {
                self.enter_container()?;
                let child_code = self.next_code().ok_or_else(|| {
                    Error::InvalidSignature(format!(
                        "ARRAY in {:?} is missing its element type",
                        self.signature
                    ))
                })?;
                let child = self.parse_one(child_code, true)?;
                self.depth -= 1;
                Ok(Type::Array(Box::new(child)))
            }
            b'(' => {
                self.enter_container()?;
                let mut members = Vec::new();
                loop {
                    match self.next_code() {
                        None => {
                            return Err(Error::InvalidSignature(format!(
                                "unterminated STRUCT in {:?}",
                                self.signature
                            )))
                        }
                        Some(b')') => break,
                        Some(code) => members.push(self.parse_one(code, false)?),
                    }
                }
                if members.is_empty() {
                    return Err(Error::InvalidSignature(format!(
                        "empty STRUCT in {:?}",
                        self.signature
                    )));
                }
                self.depth -= 1;
                Ok(Type::Struct(members))
            }
            b'{' => {
                if !in_array {
                    return Err(Error::InvalidSignature(format!(
                        "DICT_ENTRY in {:?} is only allowed as an array element",
                        self.signature
                    )));
                }
                self.enter_container()?;
                let mut members = Vec::new();
                loop {
                    match self.next_code() {
                        None => {
                            return Err(Error::InvalidSignature(format!(
                                "unterminated DICT_ENTRY in {:?}",
                                self.signature
                            )))
                        }
                        Some(b'}') => break,
                        Some(code) => members.push(self.parse_one(code, false)?),
                    }
                }
                if members.len() != 2 {
                    return Err(Error::InvalidSignature(format!(
                        "DICT_ENTRY in {:?} has {} members, exactly 2 required",
                        self.signature,
                        members.len()
                    )));
                }
                let value = members.pop().expect("length checked above");
                let key = members.pop().expect("length checked above");
                if !key.is_basic() {
                    return Err(Error::InvalidSignature(format!(
                        "DICT_ENTRY key in {:?} must be a basic type, got {}",
                        self.signature,
                        key.name()
                    )));
                }
                self.depth -= 1;
                Ok(Type::DictEntry(Box::new(key), Box::new(value)))
            }
            other => Err(Error::InvalidSignature(format!(
                "unknown type code {:?} in {:?}",
                other as char, self.signature
            ))),
        }
    }
}
