//! A codec for the DBus wire format.
//!
//! The goal of this crate is the binary plumbing of the [DBus] protocol and
//! nothing else: the type-signature grammar, an exact (typed) and a plain
//! (native) value model, the packet marshaller and unmarshaller, and the
//! message envelope with its header fields and serial numbers. Actually
//! moving the bytes — sockets, authentication, dispatching calls to
//! objects — is outside of the scope of this crate and belongs to the
//! connection layer sitting on top of it.
//!
//! The split between the layers is deliberately narrow. A connection
//! hands us bytes and a signature, we hand back values
//! ([`PacketUnmarshaller`]); it hands us values, we hand back bytes
//! ([`PacketMarshaller`]); and [`Message`] wraps both directions of the
//! envelope. When a read buffer ends mid-message the unmarshalling
//! functions return [`Error::IncompleteBuffer`], which is the one error a
//! caller is supposed to catch: buffer more bytes and try the same message
//! again. Everything else — bad padding, bad booleans, signatures that do
//! not parse, values out of range — is final and reported with a specific
//! error.
//!
//! Values come in two flavors. [`Value`] is exact: it knows its wire type
//! precisely, down to the element type of an empty array, and is what the
//! protocol itself needs. [`Plain`] is the lossy native view — integers,
//! strings, lists, maps — convenient at the application boundary.
//! [`Value::make_typed`] converts plain to exact against a [`Type`] and is
//! where all value validation lives; [`Value::to_plain`] goes the other
//! way.
//!
//! [DBus]: https://www.freedesktop.org/wiki/Software/dbus/

mod align;
pub mod cursor;
pub mod error;
pub mod marshal;
pub mod message;
pub mod types;
pub mod unmarshal;
pub mod value;

pub use cursor::{Endianness, RawCursor};
pub use error::{Error, Result};
pub use marshal::PacketMarshaller;
pub use message::{HeaderFlags, Message, MessageType, SerialSource};
pub use types::{parse_signature, parse_single_signature, signature_of, Type};
pub use unmarshal::PacketUnmarshaller;
pub use value::{infer_variant_type, valid_object_path, Array, Plain, Value};
