use crate::network::packet::cursor::FrameCursor;
use crate::network::packet::skip::{SkipReason, ETHERNET_HEADER_LEN};
use pnet::util::MacAddr;

pub const ETHERTYPE_IPV4: u16 = 0x0800;

// +-----------------+-----------------+-----------+
// | Destination MAC |   Source MAC    | EtherType |
// |     6 bytes     |     6 bytes     |  2 bytes  |
// +-----------------+-----------------+-----------+
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EthernetHeader {
    pub destination: MacAddr,
    pub source: MacAddr,
    pub ethertype: u16,
}

impl EthernetHeader {
    pub fn new(destination: MacAddr, source: MacAddr, ethertype: u16) -> Self {
        Self {
            destination,
            source,
            ethertype,
        }
    }

    pub fn decode(cursor: &mut FrameCursor<'_>) -> Result<Self, SkipReason> {
        let too_short = SkipReason::TooShortForEthernet {
            length: cursor.frame_len(),
            required: cursor.offset() + ETHERNET_HEADER_LEN,
        };
        if cursor.remaining() < ETHERNET_HEADER_LEN {
            return Err(too_short);
        }

        let destination = cursor.read_array::<6>().ok_or(too_short)?;
        let source = cursor.read_array::<6>().ok_or(too_short)?;
        let ethertype = cursor.read_u16_be().ok_or(too_short)?;

        Ok(Self::new(mac_from_bytes(destination), mac_from_bytes(source), ethertype))
    }

    pub fn is_ipv4(&self) -> bool {
        self.ethertype == ETHERTYPE_IPV4
    }
}

pub fn mac_from_bytes(b: [u8; 6]) -> MacAddr {
    MacAddr::new(b[0], b[1], b[2], b[3], b[4], b[5])
}

/// フレーム先頭のイーサネットヘッダーを読み、次の層の開始オフセットと共に返す
pub fn decode_ethernet(frame: &[u8]) -> Result<(EthernetHeader, usize), SkipReason> {
    let mut cursor = FrameCursor::new(frame);
    let header = EthernetHeader::decode(&mut cursor)?;
    Ok((header, cursor.offset()))
}
