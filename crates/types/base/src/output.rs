use alloy_primitives::{Address, I256, U256};

/// Errors raised while encoding or decoding the fixed-layout output buffer.
#[derive(Debug, thiserror::Error)]
pub enum OutputError {
    /// Declared widths must be byte-aligned and within a 256-bit word.
    #[error("unsupported output width: {bits} bits")]
    UnsupportedWidth { bits: u16 },
    /// A value that does not fit its declared width fails cleanly; it is
    /// never truncated.
    #[error("value {value} exceeds its declared {bits}-bit output slot")]
    WidthOverflow { bits: u16, value: String },
    /// The buffer being decoded does not match the declared layout size.
    #[error("output buffer holds {got} bytes, layout declares {expected}")]
    LengthMismatch { expected: usize, got: usize },
}

/// The declared shape of one output slot, fixing its byte width and how the
/// bytes are interpreted by the downstream decoder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Deserialize, serde::Serialize)]
pub enum OutputShape {
    /// 160-bit address, 20 bytes.
    Address,
    /// Unsigned big-endian integer of the given bit width.
    Uint { bits: u16 },
    /// Signed two's-complement big-endian integer of the given bit width.
    Int { bits: u16 },
}

impl OutputShape {
    pub fn byte_len(&self) -> Result<usize, OutputError> {
        match *self {
            OutputShape::Address => Ok(20),
            OutputShape::Uint { bits } | OutputShape::Int { bits } => {
                if bits == 0 || bits > 256 || bits % 8 != 0 {
                    return Err(OutputError::UnsupportedWidth { bits });
                }
                Ok(usize::from(bits) / 8)
            }
        }
    }
}

/// A typed value revealed as part of the query's public output.
#[derive(Debug, Clone, PartialEq, Eq, serde::Deserialize, serde::Serialize)]
pub enum OutputValue {
    Address(Address),
    Uint { bits: u16, value: U256 },
    Int { bits: u16, value: I256 },
}

impl OutputValue {
    pub fn shape(&self) -> OutputShape {
        match *self {
            OutputValue::Address(_) => OutputShape::Address,
            OutputValue::Uint { bits, .. } => OutputShape::Uint { bits },
            OutputValue::Int { bits, .. } => OutputShape::Int { bits },
        }
    }

    /// Append the value's big-endian fixed-size slot to `buf`.
    fn write_be(&self, buf: &mut Vec<u8>) -> Result<(), OutputError> {
        let len = self.shape().byte_len()?;
        match self {
            OutputValue::Address(addr) => buf.extend_from_slice(addr.as_slice()),
            OutputValue::Uint { bits, value } => {
                if *bits < 256 && *value >= (U256::ONE << usize::from(*bits)) {
                    return Err(OutputError::WidthOverflow {
                        bits: *bits,
                        value: value.to_string(),
                    });
                }
                buf.extend_from_slice(&value.to_be_bytes::<32>()[32 - len..]);
            }
            OutputValue::Int { bits, value } => {
                if *bits < 256 {
                    let bound = I256::ONE << usize::from(*bits - 1);
                    if *value < -bound || *value >= bound {
                        return Err(OutputError::WidthOverflow {
                            bits: *bits,
                            value: value.to_string(),
                        });
                    }
                }
                // Two's-complement truncation is lossless once the range
                // check above has passed.
                buf.extend_from_slice(&value.to_be_bytes::<32>()[32 - len..]);
            }
        }
        Ok(())
    }
}

/// Serialize an ordered sequence of typed values into the single
/// fixed-layout output buffer, each value occupying a big-endian slot sized
/// to its declared width, concatenated in declaration order.
///
/// The resulting byte offsets are the wire contract with the downstream
/// on-chain decoder; changing the declared order or widths is a breaking
/// change for every consumer.
pub fn encode(values: &[OutputValue]) -> Result<Vec<u8>, OutputError> {
    let mut buf = Vec::with_capacity(values.len() * 32);
    for value in values {
        value.write_be(&mut buf)?;
    }
    Ok(buf)
}

/// Decode an output buffer back into typed values given the declared layout.
pub fn decode(shapes: &[OutputShape], bytes: &[u8]) -> Result<Vec<OutputValue>, OutputError> {
    let expected = shapes
        .iter()
        .map(OutputShape::byte_len)
        .sum::<Result<usize, _>>()?;
    if bytes.len() != expected {
        return Err(OutputError::LengthMismatch {
            expected,
            got: bytes.len(),
        });
    }

    let mut offset = 0;
    let mut values = Vec::with_capacity(shapes.len());
    for shape in shapes {
        let len = shape.byte_len()?;
        let slot = &bytes[offset..offset + len];
        offset += len;
        values.push(match *shape {
            OutputShape::Address => OutputValue::Address(Address::from_slice(slot)),
            OutputShape::Uint { bits } => OutputValue::Uint {
                bits,
                value: U256::from_be_slice(slot),
            },
            OutputShape::Int { bits } => {
                let negative = slot[0] & 0x80 != 0;
                let mut word = if negative { [0xffu8; 32] } else { [0u8; 32] };
                word[32 - len..].copy_from_slice(slot);
                OutputValue::Int {
                    bits,
                    value: I256::from_be_bytes(word),
                }
            }
        });
    }
    Ok(values)
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::address;

    #[test]
    fn encode_concatenates_in_declaration_order() {
        let holder = address!("A0b86991c6218b36c1d19D4a2e9Eb0cE3606eB48");
        let values = [
            OutputValue::Address(holder),
            OutputValue::Uint {
                bits: 248,
                value: U256::from(150_000_000u64),
            },
            OutputValue::Uint {
                bits: 64,
                value: U256::from(19_000_000u64),
            },
        ];
        let bytes = encode(&values).unwrap();
        assert_eq!(bytes.len(), 20 + 31 + 8);
        assert_eq!(&bytes[..20], holder.as_slice());
        // uint-248 slot starts right after the address, big-endian.
        assert_eq!(
            U256::from_be_slice(&bytes[20..51]),
            U256::from(150_000_000u64)
        );
        assert_eq!(
            u64::from_be_bytes(bytes[51..59].try_into().unwrap()),
            19_000_000
        );
    }

    #[test]
    fn oversized_value_is_rejected_not_truncated() {
        let values = [OutputValue::Uint {
            bits: 64,
            value: U256::from(1u8) << 64usize,
        }];
        assert!(matches!(
            encode(&values),
            Err(OutputError::WidthOverflow { bits: 64, .. })
        ));
    }

    #[test]
    fn signed_round_trip_preserves_sign() {
        let values = [
            OutputValue::Int {
                bits: 248,
                value: I256::try_from(-123_456_789i64).unwrap(),
            },
            OutputValue::Int {
                bits: 64,
                value: I256::try_from(42i64).unwrap(),
            },
        ];
        let bytes = encode(&values).unwrap();
        let shapes = [OutputShape::Int { bits: 248 }, OutputShape::Int { bits: 64 }];
        assert_eq!(decode(&shapes, &bytes).unwrap(), values);
    }

    #[test]
    fn signed_out_of_range_is_rejected() {
        let bound = I256::ONE << 63usize;
        assert!(matches!(
            encode(&[OutputValue::Int {
                bits: 64,
                value: bound,
            }]),
            Err(OutputError::WidthOverflow { bits: 64, .. })
        ));
        assert!(encode(&[OutputValue::Int {
            bits: 64,
            value: -bound,
        }])
        .is_ok());
    }

    #[test]
    fn misaligned_width_is_unsupported() {
        assert!(matches!(
            encode(&[OutputValue::Uint {
                bits: 7,
                value: U256::ZERO,
            }]),
            Err(OutputError::UnsupportedWidth { bits: 7 })
        ));
    }
}
