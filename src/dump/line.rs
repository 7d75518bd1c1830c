use crate::types::{errors::FrameError, frame::Frame};

// Examples:
// (1637164800.123456) can0 18FEF100 [8] 00 11 22 33 44 55 66 77
// (1637164800.123456) can0 18FEF100 [8] 00,11,22,33,44,55,66,77
// (1637164800.123456) can0 18FEF100#0011223344556677
/// Parses one candump-style line into a [`Frame`].
///
/// Layout: `(timestamp) interface identifier [dlc] b0 .. b7`. Parentheses around the
/// timestamp and the `[dlc]` token are optional; data bytes may be separated by spaces,
/// commas or both. The compact `identifier#hexdata` form is accepted as well.
pub fn parse(line: &str) -> Result<Frame, FrameError> {
    // split line by whitespaces
    let parts: Vec<&str> = line.split_whitespace().collect();
    if parts.len() < 3 {
        return Err(FrameError::FieldCount {
            found: parts.len(),
            expected: 3,
        });
    }

    let ts_token: &str = parts[0].trim_start_matches('(').trim_end_matches(')');
    let timestamp: f64 = match ts_token.parse::<f64>() {
        Ok(value) if value.is_finite() => value,
        _ => {
            return Err(FrameError::Timestamp {
                token: parts[0].to_string(),
            });
        }
    };

    // compact form: id#data
    if let Some((id_token, data_token)) = parts[2].split_once('#') {
        let identifier: u32 = parse_identifier(id_token)?;
        let data: Vec<u8> = parse_packed_bytes(data_token)?;
        return Frame::from_identifier(timestamp, identifier, &data);
    }

    let identifier: u32 = parse_identifier(parts[2])?;

    // optional "[8]" length marker
    let mut rest: &[&str] = &parts[3..];
    if let Some(first) = rest.first()
        && first.starts_with('[')
    {
        rest = &rest[1..];
    }

    let mut data: Vec<u8> = Vec::with_capacity(8);
    for token in rest.iter().flat_map(|t| t.split(',')).filter(|t| !t.is_empty()) {
        data.push(parse_byte(token)?);
    }

    Frame::from_identifier(timestamp, identifier, &data)
}

fn parse_identifier(token: &str) -> Result<u32, FrameError> {
    let trimmed: &str = token.trim_end_matches(['x', 'X']);
    if trimmed.is_empty() || trimmed.len() > 8 {
        return Err(FrameError::Identifier {
            token: token.to_string(),
        });
    }
    u32::from_str_radix(trimmed, 16).map_err(|_| FrameError::Identifier {
        token: token.to_string(),
    })
}

fn parse_byte(token: &str) -> Result<u8, FrameError> {
    if token.len() > 2 {
        return Err(FrameError::DataByte {
            token: token.to_string(),
        });
    }
    u8::from_str_radix(token, 16).map_err(|_| FrameError::DataByte {
        token: token.to_string(),
    })
}

fn parse_packed_bytes(text: &str) -> Result<Vec<u8>, FrameError> {
    if text.len() % 2 != 0 || !text.is_ascii() {
        return Err(FrameError::DataByte {
            token: text.to_string(),
        });
    }
    (0..text.len())
        .step_by(2)
        .map(|i| parse_byte(&text[i..i + 2]))
        .collect()
}
