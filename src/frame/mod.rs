// Serial link framing for the CAN bridge
//
// Wire format: 0x7E start-of-frame, then a byte-stuffed body. Any body byte
// equal to 0x7E or 0x7D is sent as 0x7D followed by the byte XOR 0x20.
// Unstuffed body: two meta bytes packing an 11-bit address, an RTR flag and
// a 4-bit data length, then the data bytes, then one CRC byte.

use nom::bytes::complete::take;
use nom::{IResult, Parser};
use thiserror::Error;

pub const START_OF_FRAME: u8 = 0x7E;
pub const ESCAPE: u8 = 0x7D;
const ESCAPE_XOR: u8 = 0x20;

/// Meta bytes hold a 4-bit length, so a frame carries at most 15 data bytes
pub const MAX_DATA_LEN: usize = 15;

/// Highest valid 11-bit address
pub const MAX_ADDRESS: u16 = 0x7FF;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FrameError {
    #[error("Address {0:#X} does not fit in 11 bits")]
    AddressRange(u16),

    #[error("Frame data is {0} bytes; the length field holds at most {MAX_DATA_LEN}")]
    Oversize(usize),
}

pub type Result<T> = std::result::Result<T, FrameError>;

/// One link-layer frame: 11-bit address, RTR flag, up to 15 data bytes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    pub address: u16,
    pub rtr: bool,
    pub data: Vec<u8>,

    /// Trailing CRC byte as received. Carried but not verified.
    /// TODO: verify once the bridge firmware settles on a polynomial.
    pub crc: u8,
}

impl Frame {
    pub fn new(address: u16, rtr: bool, data: Vec<u8>) -> Result<Self> {
        if address > MAX_ADDRESS {
            return Err(FrameError::AddressRange(address));
        }
        if data.len() > MAX_DATA_LEN {
            return Err(FrameError::Oversize(data.len()));
        }
        Ok(Self {
            address,
            rtr,
            data,
            crc: 0,
        })
    }

    /// Serialize to wire bytes: start-of-frame plus the stuffed body
    pub fn to_wire(&self) -> Vec<u8> {
        let meta0 = (self.address >> 3) as u8;
        let meta1 = (((self.address & 0x07) as u8) << 5)
            | if self.rtr { 0x10 } else { 0x00 }
            | self.data.len() as u8;

        let mut wire = vec![START_OF_FRAME];
        for &raw in [meta0, meta1]
            .iter()
            .chain(self.data.iter())
            .chain(std::iter::once(&self.crc))
        {
            if raw == START_OF_FRAME || raw == ESCAPE {
                wire.push(ESCAPE);
                wire.push(raw ^ ESCAPE_XOR);
            } else {
                wire.push(raw);
            }
        }
        wire
    }
}

/// Parse an unstuffed frame body
fn parse_body(input: &[u8]) -> IResult<&[u8], Frame> {
    let (input, meta) = take(2usize).parse(input)?;
    let address = ((meta[0] as u16) << 3) | ((meta[1] as u16) >> 5);
    let rtr = meta[1] & 0x10 != 0;
    let len = (meta[1] & 0x0F) as usize;

    let (input, data) = take(len).parse(input)?;
    let (input, crc) = take(1usize).parse(input)?;
    let crc = crc[0];

    Ok((
        input,
        Frame {
            address,
            rtr,
            data: data.to_vec(),
            crc,
        },
    ))
}

/// Streaming deframer: feed wire bytes, collect complete frames
///
/// Bytes between a completed frame and the next start-of-frame are
/// discarded, matching the bridge. A start-of-frame mid-body restarts the
/// frame, so a corrupted tail costs one frame, never sync.
#[derive(Debug, Default)]
pub struct Deframer {
    in_frame: bool,
    escaped: bool,
    body: Vec<u8>,
}

impl Deframer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Push one wire byte; returns a frame when it completes one
    pub fn push(&mut self, wire_byte: u8) -> Option<Frame> {
        if wire_byte == START_OF_FRAME {
            self.in_frame = true;
            self.escaped = false;
            self.body.clear();
            return None;
        }

        if !self.in_frame {
            return None;
        }

        if wire_byte == ESCAPE {
            self.escaped = true;
            return None;
        }

        let raw = if self.escaped {
            self.escaped = false;
            wire_byte ^ ESCAPE_XOR
        } else {
            wire_byte
        };
        self.body.push(raw);

        if self.body.len() < 2 {
            return None;
        }

        let data_len = (self.body[1] & 0x0F) as usize;
        if self.body.len() < 2 + data_len + 1 {
            return None;
        }

        self.in_frame = false;
        match parse_body(&self.body) {
            Ok((_, frame)) => Some(frame),
            // unreachable once the body is complete, but never panic on
            // wire input
            Err(_) => None,
        }
    }

    /// Push a run of wire bytes, collecting every completed frame
    pub fn extend(&mut self, wire_bytes: &[u8]) -> Vec<Frame> {
        wire_bytes.iter().filter_map(|&b| self.push(b)).collect()
    }
}
