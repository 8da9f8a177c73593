//! The message envelope: a fixed header, a header-fields array, and a
//! marshalled body, as exchanged with the bus.

use std::sync::atomic::{AtomicU32, Ordering};

use bitflags::bitflags;
use log::warn;

use crate::cursor::Endianness;
use crate::error::{Error, Result};
use crate::marshal::PacketMarshaller;
use crate::types::{signature_of, Type};
use crate::unmarshal::PacketUnmarshaller;
use crate::value::{Array, Plain, Value};

/// Signature of the fixed header plus the header-fields array.
pub const MESSAGE_SIGNATURE: &str = "yyyyuua(yv)";

/// The one protocol version this codec speaks.
pub const PROTOCOL_VERSION: u8 = 1;

/// Reserved for a connection's own local endpoint; sending to it is a
/// caller error.
pub const LOCAL_PATH: &str = "/org/freedesktop/DBus/Local";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum MessageType {
    Invalid = 0,
    MethodCall = 1,
    MethodReturn = 2,
    Error = 3,
    Signal = 4,
}

impl MessageType {
    fn from_raw(raw: u8) -> Result<MessageType> {
        match raw {
            0 => Ok(MessageType::Invalid),
            1 => Ok(MessageType::MethodCall),
            2 => Ok(MessageType::MethodReturn),
            3 => Ok(MessageType::Error),
            4 => Ok(MessageType::Signal),
            other => Err(Error::InvalidPacket(format!(
                "unknown message type {}",
                other
            ))),
        }
    }
}

bitflags! {
    /// Header flag bitmask. Unknown bits from a peer are dropped.
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub struct HeaderFlags: u8 {
        const NO_REPLY_EXPECTED = 0x1;
        const NO_AUTO_START = 0x2;
    }
}

/// Header field codes, with the value type each carries.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
enum FieldCode {
    Path = 1,        // o
    Interface = 2,   // s
    Member = 3,      // s
    ErrorName = 4,   // s
    ReplySerial = 5, // u
    Destination = 6, // s
    Sender = 7,      // s
    Signature = 8,   // g
}

impl FieldCode {
    fn from_raw(raw: u8) -> Option<FieldCode> {
        match raw {
            1 => Some(FieldCode::Path),
            2 => Some(FieldCode::Interface),
            3 => Some(FieldCode::Member),
            4 => Some(FieldCode::ErrorName),
            5 => Some(FieldCode::ReplySerial),
            6 => Some(FieldCode::Destination),
            7 => Some(FieldCode::Sender),
            8 => Some(FieldCode::Signature),
            _ => None,
        }
    }
}

/// Allocates message serials for one connection.
///
/// Serials start at 1 (0 is not a valid serial) and increase monotonically;
/// the atomic increment keeps them unique when several senders share the
/// connection. Tests construct their own source to get deterministic
/// numbering.
#[derive(Debug)]
pub struct SerialSource {
    next: AtomicU32,
}

impl SerialSource {
    pub fn new() -> SerialSource {
        SerialSource {
            next: AtomicU32::new(1),
        }
    }

    pub fn next_serial(&self) -> u32 {
        self.next.fetch_add(1, Ordering::SeqCst)
    }
}

impl Default for SerialSource {
    fn default() -> SerialSource {
        SerialSource::new()
    }
}

/// Any message that travels over the bus.
///
/// Constructed with a freshly allocated serial, populated either by the
/// caller or by [`Message::unmarshall_buffer`], and turned into bytes with
/// [`Message::marshall`]. Once sent a message is not expected to change.
#[derive(Clone, Debug, PartialEq)]
pub struct Message {
    pub message_type: MessageType,
    pub flags: HeaderFlags,
    pub protocol: u8,
    pub serial: u32,
    pub path: Option<String>,
    pub interface: Option<String>,
    pub member: Option<String>,
    pub error_name: Option<String>,
    pub reply_serial: Option<u32>,
    pub destination: Option<String>,
    pub sender: Option<String>,
    pub body: Vec<Value>,
}

impl Message {
    /// An empty message of the given type with a fresh serial.
    pub fn new(message_type: MessageType, serials: &SerialSource) -> Message {
        let flags = match message_type {
            MessageType::MethodReturn | MessageType::Error => {
                HeaderFlags::NO_REPLY_EXPECTED
            }
            _ => HeaderFlags::empty(),
        };
        Message {
            message_type,
            flags,
            protocol: PROTOCOL_VERSION,
            serial: serials.next_serial(),
            path: None,
            interface: None,
            member: None,
            error_name: None,
            reply_serial: None,
            destination: None,
            sender: None,
            body: Vec::new(),
        }
    }

    pub fn method_call(
        destination: impl Into<String>,
        path: impl Into<String>,
        interface: impl Into<String>,
        member: impl Into<String>,
        serials: &SerialSource,
    ) -> Message {
        let mut message = Message::new(MessageType::MethodCall, serials);
        message.destination = Some(destination.into());
        message.path = Some(path.into());
        message.interface = Some(interface.into());
        message.member = Some(member.into());
        message
    }

    pub fn signal(
        path: impl Into<String>,
        interface: impl Into<String>,
        member: impl Into<String>,
        serials: &SerialSource,
    ) -> Message {
        let mut message = Message::new(MessageType::Signal, serials);
        message.path = Some(path.into());
        message.interface = Some(interface.into());
        message.member = Some(member.into());
        message
    }

    /// A reply to `original`: inherits its serial as the reply serial and
    /// its sender as the destination.
    pub fn method_return(original: &Message, serials: &SerialSource) -> Message {
        let mut message = Message::new(MessageType::MethodReturn, serials);
        message.reply_to(original);
        message
    }

    /// An error reply to `original`.
    pub fn error(
        error_name: impl Into<String>,
        original: &Message,
        serials: &SerialSource,
    ) -> Message {
        let mut message = Message::new(MessageType::Error, serials);
        message.error_name = Some(error_name.into());
        message.reply_to(original);
        message
    }

    /// Correlate this message with the one it answers.
    pub fn reply_to(&mut self, original: &Message) -> &mut Message {
        self.reply_serial = Some(original.serial);
        self.destination = original.sender.clone();
        self
    }

    /// Append an exact value to the body.
    pub fn add_param(&mut self, value: Value) -> &mut Message {
        self.body.push(value);
        self
    }

    /// Append a plain value at the given type.
    pub fn add_typed(&mut self, typ: &Type, value: Plain) -> Result<&mut Message> {
        self.body.push(Value::make_typed(typ, value)?);
        Ok(self)
    }

    /// The body signature, derived from the body values.
    pub fn signature(&self) -> String {
        let types: Vec<Type> = self.body.iter().map(Value::typ).collect();
        signature_of(&types)
    }

    /// Marshal in this process's native byte order.
    pub fn marshall(&self) -> Result<Vec<u8>> {
        self.marshall_as(Endianness::native())
    }

    /// Marshal the message: fixed header, header fields, 8-byte alignment,
    /// body.
    pub fn marshall_as(&self, endianness: Endianness) -> Result<Vec<u8>> {
        if self.path.as_deref() == Some(LOCAL_PATH) {
            return Err(Error::InvalidDestination(format!(
                "{} is reserved and cannot be messaged",
                LOCAL_PATH
            )));
        }

        // the body goes first so the header can carry its length; it
        // starts 8-aligned, so offset zero pads identically
        let mut body = PacketMarshaller::new(endianness);
        for value in &self.body {
            body.append_value(value)?;
        }
        let body_bytes = body.into_packet();

        let mut marshaller = PacketMarshaller::new(endianness);
        marshaller.append_value(&Value::Byte(endianness.tag()))?;
        marshaller.append_value(&Value::Byte(self.message_type as u8))?;
        marshaller.append_value(&Value::Byte(self.flags.bits()))?;
        marshaller.append_value(&Value::Byte(self.protocol))?;
        marshaller.append_value(&Value::UInt32(body_bytes.len() as u32))?;
        marshaller.append_value(&Value::UInt32(self.serial))?;
        marshaller.append_value(&Value::Array(self.header_fields()?))?;
        marshaller.align(8);

        let mut packet = marshaller.into_packet();
        packet.extend_from_slice(&body_bytes);
        Ok(packet)
    }

    fn header_fields(&self) -> Result<Array> {
        let mut fields = Vec::new();

        if let Some(path) = &self.path {
            // validate the path on the way out
            let value = Value::make_typed(&Type::ObjectPath, Plain::Str(path.clone()))?;
            fields.push(field_entry(FieldCode::Path, value));
        }
        if let Some(interface) = &self.interface {
            fields.push(field_entry(
                FieldCode::Interface,
                Value::String(interface.clone()),
            ));
        }
        if let Some(member) = &self.member {
            fields.push(field_entry(FieldCode::Member, Value::String(member.clone())));
        }
        if let Some(error_name) = &self.error_name {
            fields.push(field_entry(
                FieldCode::ErrorName,
                Value::String(error_name.clone()),
            ));
        }
        if let Some(reply_serial) = self.reply_serial {
            fields.push(field_entry(
                FieldCode::ReplySerial,
                Value::UInt32(reply_serial),
            ));
        }
        if let Some(destination) = &self.destination {
            fields.push(field_entry(
                FieldCode::Destination,
                Value::String(destination.clone()),
            ));
        }
        // SENDER is the bus daemon's to fill in, never the client's

        let signature = self.signature();
        if !signature.is_empty() {
            fields.push(field_entry(
                FieldCode::Signature,
                Value::Signature(signature),
            ));
        }

        Array::new(field_entry_type(), fields)
    }

    /// Unmarshal one message from the front of `buf`, tolerant of either
    /// endianness. Returns the message and how many bytes it occupied so
    /// the caller can trim its read buffer.
    pub fn unmarshall_buffer(buf: &[u8]) -> Result<(Message, usize)> {
        if buf.is_empty() {
            return Err(Error::IncompleteBuffer);
        }
        let endianness = Endianness::from_tag(buf[0])?;
        let mut unmarshaller = PacketUnmarshaller::new(buf, endianness);

        let header = unmarshaller.unmarshall_exact(MESSAGE_SIGNATURE, None)?;
        let mut header = header.into_iter();
        let _endian_tag = expect_byte(header.next())?;
        let message_type = MessageType::from_raw(expect_byte(header.next())?)?;
        let flags = HeaderFlags::from_bits_truncate(expect_byte(header.next())?);
        let protocol = expect_byte(header.next())?;
        if protocol != PROTOCOL_VERSION {
            return Err(Error::InvalidPacket(format!(
                "unsupported protocol version {}",
                protocol
            )));
        }
        let body_len = expect_u32(header.next())? as usize;
        let serial = expect_u32(header.next())?;
        let fields = match header.next() {
            Some(Value::Array(array)) => array,
            _ => return Err(Error::InvalidPacket("malformed fixed header".into())),
        };

        let mut message = Message {
            message_type,
            flags,
            protocol,
            serial,
            path: None,
            interface: None,
            member: None,
            error_name: None,
            reply_serial: None,
            destination: None,
            sender: None,
            body: Vec::new(),
        };
        let mut signature = String::new();

        for entry in fields.items() {
            let (code, value) = split_field_entry(entry)?;
            let code = match FieldCode::from_raw(code) {
                Some(code) => code,
                None => {
                    // fields we do not know are fine to skip
                    warn!("ignoring unknown header field {}", code);
                    continue;
                }
            };
            match (code, value) {
                (FieldCode::Path, Value::ObjectPath(s)) => message.path = Some(s),
                (FieldCode::Interface, Value::String(s)) => {
                    message.interface = Some(s)
                }
                (FieldCode::Member, Value::String(s)) => message.member = Some(s),
                (FieldCode::ErrorName, Value::String(s)) => {
                    message.error_name = Some(s)
                }
                (FieldCode::ReplySerial, Value::UInt32(s)) => {
                    message.reply_serial = Some(s)
                }
                (FieldCode::Destination, Value::String(s)) => {
                    message.destination = Some(s)
                }
                (FieldCode::Sender, Value::String(s)) => message.sender = Some(s),
                (FieldCode::Signature, Value::Signature(s)) => signature = s,
                (code, value) => {
                    return Err(Error::InvalidPacket(format!(
                        "header field {:?} cannot hold a {}",
                        code,
                        value.typ().name()
                    )))
                }
            }
        }

        unmarshaller.align_body()?;
        if body_len > 0 {
            if signature.is_empty() {
                return Err(Error::InvalidPacket(
                    "message has a body but no SIGNATURE field".into(),
                ));
            }
            let body_start = unmarshaller.consumed();
            message.body = unmarshaller.unmarshall_exact(&signature, Some(body_len))?;
            if unmarshaller.consumed() - body_start != body_len {
                return Err(Error::InvalidPacket(format!(
                    "body signature {:?} did not span the declared {} bytes",
                    signature, body_len
                )));
            }
        }

        Ok((message, unmarshaller.consumed()))
    }
}

fn field_entry(code: FieldCode, value: Value) -> Value {
    Value::Struct(vec![
        Value::Byte(code as u8),
        Value::Variant(Box::new(value)),
    ])
}

fn field_entry_type() -> Type {
    Type::Struct(vec![Type::Byte, Type::Variant])
}

fn split_field_entry(entry: &Value) -> Result<(u8, Value)> {
    if let Value::Struct(members) = entry {
        if let [Value::Byte(code), Value::Variant(value)] = members.as_slice() {
            return Ok((*code, (**value).clone()));
        }
    }
    Err(Error::InvalidPacket("malformed header field".into()))
}

fn expect_byte(value: Option<Value>) -> Result<u8> {
    match value {
        Some(Value::Byte(v)) => Ok(v),
        _ => Err(Error::InvalidPacket("malformed fixed header".into())),
    }
}

fn expect_u32(value: Option<Value>) -> Result<u32> {
    match value {
        Some(Value::UInt32(v)) => Ok(v),
        _ => Err(Error::InvalidPacket("malformed fixed header".into())),
    }
}
