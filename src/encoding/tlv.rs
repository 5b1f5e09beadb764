//! NDN-TLV primitives.
//!
//! ```text
//! TLV       = TLV-TYPE TLV-LENGTH TLV-VALUE
//! VAR-NUMBER: < 253      -> 1 byte
//!             253 + u16  -> 3 bytes
//!             254 + u32  -> 5 bytes
//!             255 + u64  -> 9 bytes
//! NonNegativeInteger: 1, 2, 4 or 8 bytes, big-endian
//! ```

use crate::error::{constants, PacketError, Result};

/// TLV type codes used by Data packets
pub mod types {
    pub const IMPLICIT_SHA256_DIGEST_COMPONENT: u64 = 0x01;
    pub const DATA: u64 = 0x06;
    pub const NAME: u64 = 0x07;
    pub const GENERIC_NAME_COMPONENT: u64 = 0x08;
    pub const META_INFO: u64 = 0x14;
    pub const CONTENT: u64 = 0x15;
    pub const SIGNATURE_INFO: u64 = 0x16;
    pub const SIGNATURE_VALUE: u64 = 0x17;
    pub const CONTENT_TYPE: u64 = 0x18;
    pub const FRESHNESS_PERIOD: u64 = 0x19;
    pub const FINAL_BLOCK_ID: u64 = 0x1A;
    pub const SIGNATURE_TYPE: u64 = 0x1B;
    pub const KEY_LOCATOR: u64 = 0x1C;
    pub const KEY_DIGEST: u64 = 0x1D;
}

/// Unrecognized elements of a critical type must not be skipped
pub fn is_critical(tlv_type: u64) -> bool {
    tlv_type <= 31 || tlv_type % 2 == 1
}

pub fn write_var_number(out: &mut Vec<u8>, n: u64) {
    if n < 253 {
        out.push(n as u8);
    } else if n <= u16::MAX as u64 {
        out.push(253);
        out.extend_from_slice(&(n as u16).to_be_bytes());
    } else if n <= u32::MAX as u64 {
        out.push(254);
        out.extend_from_slice(&(n as u32).to_be_bytes());
    } else {
        out.push(255);
        out.extend_from_slice(&n.to_be_bytes());
    }
}

/// Append a complete TLV element
pub fn write_tlv(out: &mut Vec<u8>, tlv_type: u64, value: &[u8]) {
    write_var_number(out, tlv_type);
    write_var_number(out, value.len() as u64);
    out.extend_from_slice(value);
}

/// Shortest NonNegativeInteger encoding of `n`
pub fn non_negative_integer(n: u64) -> Vec<u8> {
    if n <= u8::MAX as u64 {
        vec![n as u8]
    } else if n <= u16::MAX as u64 {
        (n as u16).to_be_bytes().to_vec()
    } else if n <= u32::MAX as u64 {
        (n as u32).to_be_bytes().to_vec()
    } else {
        n.to_be_bytes().to_vec()
    }
}

pub fn write_non_negative_integer_tlv(out: &mut Vec<u8>, tlv_type: u64, n: u64) {
    write_tlv(out, tlv_type, &non_negative_integer(n));
}

pub fn read_non_negative_integer(value: &[u8]) -> Result<u64> {
    match value.len() {
        1 => Ok(value[0] as u64),
        2 => Ok(u16::from_be_bytes([value[0], value[1]]) as u64),
        4 => Ok(u32::from_be_bytes([value[0], value[1], value[2], value[3]]) as u64),
        8 => {
            let mut bytes = [0u8; 8];
            bytes.copy_from_slice(value);
            Ok(u64::from_be_bytes(bytes))
        }
        _ => Err(PacketError::DecodeError(
            constants::ERR_BAD_NON_NEGATIVE_INTEGER.into(),
        )),
    }
}

/// One decoded element; offsets are absolute within the outermost input
#[derive(Debug, Clone, Copy)]
pub struct TlvElement<'a> {
    pub tlv_type: u64,
    pub value: &'a [u8],
    /// Offset of the first TLV-TYPE byte
    pub begin: usize,
    /// Offset of the first TLV-VALUE byte
    pub value_begin: usize,
    /// Offset one past the last TLV-VALUE byte
    pub end: usize,
}

/// Bounded reader over a TLV-encoded buffer
#[derive(Debug, Clone)]
pub struct TlvDecoder<'a> {
    input: &'a [u8],
    position: usize,
    base: usize,
}

impl<'a> TlvDecoder<'a> {
    pub fn new(input: &'a [u8]) -> Self {
        Self {
            input,
            position: 0,
            base: 0,
        }
    }

    /// Decoder over the value of `element`, keeping absolute offsets
    pub fn nested(element: &TlvElement<'a>) -> Self {
        Self {
            input: element.value,
            position: 0,
            base: element.value_begin,
        }
    }

    /// Absolute offset of the next unread byte
    pub fn offset(&self) -> usize {
        self.base + self.position
    }

    pub fn is_empty(&self) -> bool {
        self.position >= self.input.len()
    }

    pub fn read_var_number(&mut self) -> Result<u64> {
        let first = *self
            .input
            .get(self.position)
            .ok_or(PacketError::Truncated(constants::ERR_TRUNCATED_VAR_NUMBER))?;
        let width = match first {
            253 => 2,
            254 => 4,
            255 => 8,
            n => {
                self.position += 1;
                return Ok(n as u64);
            }
        };
        let start = self.position + 1;
        let bytes = self
            .input
            .get(start..start + width)
            .ok_or(PacketError::Truncated(constants::ERR_TRUNCATED_VAR_NUMBER))?;
        self.position = start + width;
        read_non_negative_integer(bytes)
    }

    /// Type of the next element without consuming it
    pub fn peek_type(&self) -> Result<Option<u64>> {
        if self.is_empty() {
            return Ok(None);
        }
        let mut probe = self.clone();
        probe.read_var_number().map(Some)
    }

    pub fn read_element(&mut self) -> Result<TlvElement<'a>> {
        let begin = self.offset();
        let tlv_type = self.read_var_number()?;
        let length = self.read_var_number()?;
        let length = usize::try_from(length)
            .map_err(|_| PacketError::Truncated(constants::ERR_TRUNCATED_VALUE))?;

        let value_start = self.position;
        let value_end = value_start
            .checked_add(length)
            .filter(|&end| end <= self.input.len())
            .ok_or(PacketError::Truncated(constants::ERR_TRUNCATED_VALUE))?;
        self.position = value_end;

        Ok(TlvElement {
            tlv_type,
            value: &self.input[value_start..value_end],
            begin,
            value_begin: self.base + value_start,
            end: self.base + value_end,
        })
    }

    /// Read the next element, which must have type `expected`
    pub fn read_expected(&mut self, expected: u64) -> Result<TlvElement<'a>> {
        let element = self.read_element()?;
        if element.tlv_type != expected {
            return Err(PacketError::UnexpectedTlvType {
                expected,
                actual: element.tlv_type,
            });
        }
        Ok(element)
    }

    /// Read the next element if it has type `tlv_type`
    pub fn read_optional(&mut self, tlv_type: u64) -> Result<Option<TlvElement<'a>>> {
        if self.peek_type()? == Some(tlv_type) {
            self.read_element().map(Some)
        } else {
            Ok(None)
        }
    }

    /// Skip unrecognized non-critical elements until the next element of a
    /// type in `wanted` or the end of input
    pub fn skip_until(&mut self, wanted: &[u64]) -> Result<()> {
        while let Some(next) = self.peek_type()? {
            if wanted.contains(&next) {
                break;
            }
            if is_critical(next) {
                return Err(PacketError::UnrecognizedCriticalType(next));
            }
            self.read_element()?;
        }
        Ok(())
    }
}
