use crate::network::packet::cursor::FrameCursor;
use crate::network::packet::skip::{SkipReason, ETHERNET_HEADER_LEN, PORTS_LEN};

/// TCP/UDPヘッダー先頭4バイトのポート番号の組。どちらのプロトコルでも同じ位置にある。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransportPorts {
    pub source: u16,
    pub destination: u16,
}

impl TransportPorts {
    pub fn decode(cursor: &mut FrameCursor<'_>) -> Result<Self, SkipReason> {
        let too_short = SkipReason::TooShortForPorts {
            length: cursor.frame_len(),
            required: cursor.offset() + PORTS_LEN,
        };
        if cursor.remaining() < PORTS_LEN {
            return Err(too_short);
        }

        let source = cursor.read_u16_be().ok_or(too_short)?;
        let destination = cursor.read_u16_be().ok_or(too_short)?;

        Ok(Self { source, destination })
    }
}

pub fn decode_transport_ports(
    frame: &[u8],
    ip_header_length: usize,
) -> Result<TransportPorts, SkipReason> {
    let offset = ETHERNET_HEADER_LEN.checked_add(ip_header_length);
    let required = offset.and_then(|offset| offset.checked_add(PORTS_LEN));
    match (offset, required) {
        (Some(offset), Some(_)) if offset <= frame.len() => {
            TransportPorts::decode(&mut FrameCursor::at(frame, offset))
        }
        _ => Err(SkipReason::TooShortForPorts {
            length: frame.len(),
            required: required.unwrap_or(usize::MAX),
        }),
    }
}
