// Offset-addressed element access for packet payloads

use super::types::{Endianness, FieldType};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WireError {
    #[error("buffer overrun: field needs bytes {offset}..{end} but buffer holds {len}", end = .offset + .width)]
    BufferOverrun {
        offset: usize,
        width: usize,
        len: usize,
    },
}

pub type Result<T> = std::result::Result<T, WireError>;

/// Borrow the `width` bytes at `offset`, or report the overrun
fn slice_at(buffer: &[u8], offset: usize, width: usize) -> Result<&[u8]> {
    if offset + width > buffer.len() {
        return Err(WireError::BufferOverrun {
            offset,
            width,
            len: buffer.len(),
        });
    }
    Ok(&buffer[offset..offset + width])
}

fn slice_at_mut(buffer: &mut [u8], offset: usize, width: usize) -> Result<&mut [u8]> {
    if offset + width > buffer.len() {
        return Err(WireError::BufferOverrun {
            offset,
            width,
            len: buffer.len(),
        });
    }
    Ok(&mut buffer[offset..offset + width])
}

/// Read one fixed-width field at `offset`, honoring the format's endianness
///
/// All values widen losslessly into f64 (the widest field is 32 bits).
pub fn read_field(
    buffer: &[u8],
    offset: usize,
    ty: FieldType,
    endian: Endianness,
) -> Result<f64> {
    let bytes = slice_at(buffer, offset, ty.width())?;

    let value = match ty {
        FieldType::U8 | FieldType::Bitfield => bytes[0] as f64,
        FieldType::I8 => bytes[0] as i8 as f64,
        FieldType::U16 => {
            let raw = [bytes[0], bytes[1]];
            if endian.is_big() {
                u16::from_be_bytes(raw) as f64
            } else {
                u16::from_le_bytes(raw) as f64
            }
        }
        FieldType::I16 => {
            let raw = [bytes[0], bytes[1]];
            if endian.is_big() {
                i16::from_be_bytes(raw) as f64
            } else {
                i16::from_le_bytes(raw) as f64
            }
        }
        FieldType::U32 => {
            let raw = [bytes[0], bytes[1], bytes[2], bytes[3]];
            if endian.is_big() {
                u32::from_be_bytes(raw) as f64
            } else {
                u32::from_le_bytes(raw) as f64
            }
        }
        FieldType::I32 => {
            let raw = [bytes[0], bytes[1], bytes[2], bytes[3]];
            if endian.is_big() {
                i32::from_be_bytes(raw) as f64
            } else {
                i32::from_le_bytes(raw) as f64
            }
        }
        FieldType::F32 => {
            let raw = [bytes[0], bytes[1], bytes[2], bytes[3]];
            if endian.is_big() {
                f32::from_be_bytes(raw) as f64
            } else {
                f32::from_le_bytes(raw) as f64
            }
        }
    };

    Ok(value)
}

/// Write one fixed-width field at `offset`, honoring the format's endianness
///
/// Integer types truncate toward zero and saturate at their bounds; f32
/// narrows with the usual rounding.
pub fn write_field(
    buffer: &mut [u8],
    offset: usize,
    ty: FieldType,
    endian: Endianness,
    value: f64,
) -> Result<()> {
    let dest = slice_at_mut(buffer, offset, ty.width())?;

    match ty {
        FieldType::U8 | FieldType::Bitfield => dest[0] = value as u8,
        FieldType::I8 => dest[0] = (value as i8) as u8,
        FieldType::U16 => {
            let raw = value as u16;
            dest.copy_from_slice(&if endian.is_big() {
                raw.to_be_bytes()
            } else {
                raw.to_le_bytes()
            });
        }
        FieldType::I16 => {
            let raw = value as i16;
            dest.copy_from_slice(&if endian.is_big() {
                raw.to_be_bytes()
            } else {
                raw.to_le_bytes()
            });
        }
        FieldType::U32 => {
            let raw = value as u32;
            dest.copy_from_slice(&if endian.is_big() {
                raw.to_be_bytes()
            } else {
                raw.to_le_bytes()
            });
        }
        FieldType::I32 => {
            let raw = value as i32;
            dest.copy_from_slice(&if endian.is_big() {
                raw.to_be_bytes()
            } else {
                raw.to_le_bytes()
            });
        }
        FieldType::F32 => {
            let raw = value as f32;
            dest.copy_from_slice(&if endian.is_big() {
                raw.to_be_bytes()
            } else {
                raw.to_le_bytes()
            });
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_u16_endianness() {
        let be = [0x12, 0x34];
        assert_eq!(
            read_field(&be, 0, FieldType::U16, Endianness::Big).unwrap(),
            0x1234 as f64
        );

        let le = [0x34, 0x12];
        assert_eq!(
            read_field(&le, 0, FieldType::U16, Endianness::Little).unwrap(),
            0x1234 as f64
        );

        let mut out = [0u8; 2];
        write_field(&mut out, 0, FieldType::U16, Endianness::Big, 0x1234 as f64).unwrap();
        assert_eq!(out, be);
        write_field(&mut out, 0, FieldType::U16, Endianness::Little, 0x1234 as f64).unwrap();
        assert_eq!(out, le);
    }

    #[test]
    fn test_i8_twos_complement() {
        assert_eq!(
            read_field(&[0xFF], 0, FieldType::I8, Endianness::Big).unwrap(),
            -1.0
        );
        assert_eq!(
            read_field(&[0x80], 0, FieldType::I8, Endianness::Big).unwrap(),
            -128.0
        );
        assert_eq!(
            read_field(&[0x7F], 0, FieldType::I8, Endianness::Big).unwrap(),
            127.0
        );

        let mut out = [0u8; 1];
        write_field(&mut out, 0, FieldType::I8, Endianness::Big, -1.0).unwrap();
        assert_eq!(out, [0xFF]);
    }

    #[test]
    fn test_i16_negative() {
        let be = [0xFF, 0xFE];
        assert_eq!(
            read_field(&be, 0, FieldType::I16, Endianness::Big).unwrap(),
            -2.0
        );

        let mut out = [0u8; 2];
        write_field(&mut out, 0, FieldType::I16, Endianness::Big, -2.0).unwrap();
        assert_eq!(out, be);
    }

    #[test]
    fn test_i32_round_trip() {
        let mut buf = [0u8; 4];
        write_field(&mut buf, 0, FieldType::I32, Endianness::Little, -123456.0).unwrap();
        assert_eq!(
            read_field(&buf, 0, FieldType::I32, Endianness::Little).unwrap(),
            -123456.0
        );
    }

    #[test]
    fn test_f32_round_trip() {
        let mut buf = [0u8; 4];
        write_field(&mut buf, 0, FieldType::F32, Endianness::Big, 2.5).unwrap();
        assert_eq!(
            read_field(&buf, 0, FieldType::F32, Endianness::Big).unwrap(),
            2.5
        );

        // 1.0f32 big-endian is a known bit pattern
        assert_eq!(buf.len(), 4);
        write_field(&mut buf, 0, FieldType::F32, Endianness::Big, 1.0).unwrap();
        assert_eq!(buf, [0x3F, 0x80, 0x00, 0x00]);
    }

    #[test]
    fn test_unsigned_never_negative() {
        assert_eq!(
            read_field(&[0xFF], 0, FieldType::U8, Endianness::Big).unwrap(),
            255.0
        );
        assert_eq!(
            read_field(&[0xFF, 0xFF, 0xFF, 0xFF], 0, FieldType::U32, Endianness::Big).unwrap(),
            u32::MAX as f64
        );
    }

    #[test]
    fn test_offset_addressing() {
        let buf = [0x00, 0x00, 0x12, 0x34];
        assert_eq!(
            read_field(&buf, 2, FieldType::U16, Endianness::Big).unwrap(),
            0x1234 as f64
        );
    }

    #[test]
    fn test_buffer_overrun() {
        let buf = [0x12];
        let err = read_field(&buf, 0, FieldType::U16, Endianness::Big).unwrap_err();
        assert_eq!(
            err,
            WireError::BufferOverrun {
                offset: 0,
                width: 2,
                len: 1
            }
        );

        let mut out = [0u8; 3];
        assert!(write_field(&mut out, 2, FieldType::U32, Endianness::Big, 0.0).is_err());
    }
}
