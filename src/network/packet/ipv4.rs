use crate::network::packet::cursor::FrameCursor;
use crate::network::packet::ethernet::decode_ethernet;
use crate::network::packet::skip::{SkipReason, IPV4_MAX_HEADER_LEN, IPV4_MIN_HEADER_LEN};
use std::net::Ipv4Addr;

pub const PROTOCOL_TCP: u8 = 6;
pub const PROTOCOL_UDP: u8 = 17;

// 0                   1                   2                   3
// 0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1
// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
// |Version|  IHL  |Type of Service|          Total Length         |
// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
// |         Identification        |Flags|      Fragment Offset    |
// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
// |  Time to Live |    Protocol   |         Header Checksum       |
// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
// |                       Source Address                          |
// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
// |                    Destination Address                        |
// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IPv4Header {
    /// バイト単位のヘッダー長 (IHL * 4)
    pub header_length: usize,
    pub protocol: u8,
    pub source: Ipv4Addr,
    pub destination: Ipv4Addr,
}

impl IPv4Header {
    /// カーソルはイーサネットヘッダーの直後を指していること。
    /// 成功するとオプションを含めたヘッダー全体を読み飛ばす。
    pub fn decode(cursor: &mut FrameCursor<'_>) -> Result<Self, SkipReason> {
        let length = cursor.frame_len();
        let fixed = match cursor.peek(IPV4_MIN_HEADER_LEN) {
            Some(bytes) => bytes,
            None => {
                return Err(SkipReason::TooShortForIPv4 {
                    length,
                    required: cursor.offset() + IPV4_MIN_HEADER_LEN,
                })
            }
        };

        // 下位4ビットが32ビットワード単位のヘッダー長
        let header_length = (fixed[0] & 0x0f) as usize * 4;
        if !(IPV4_MIN_HEADER_LEN..=IPV4_MAX_HEADER_LEN).contains(&header_length)
            || header_length > cursor.remaining()
        {
            return Err(SkipReason::InvalidIPv4HeaderLength {
                header_length,
                length,
            });
        }

        let protocol = fixed[9];
        let source = Ipv4Addr::new(fixed[12], fixed[13], fixed[14], fixed[15]);
        let destination = Ipv4Addr::new(fixed[16], fixed[17], fixed[18], fixed[19]);

        cursor.advance(header_length);

        Ok(Self {
            header_length,
            protocol,
            source,
            destination,
        })
    }

    pub fn carries_ports(&self) -> bool {
        matches!(self.protocol, PROTOCOL_TCP | PROTOCOL_UDP)
    }
}

/// イーサネットフレーム全体を受け取り、IPv4ヘッダーとトランスポート層の開始オフセットを返す
pub fn decode_ipv4(frame: &[u8]) -> Result<(IPv4Header, usize), SkipReason> {
    let (_, offset) = decode_ethernet(frame)?;
    let mut cursor = FrameCursor::at(frame, offset);
    let header = IPv4Header::decode(&mut cursor)?;
    Ok((header, cursor.offset()))
}
