use crate::network::packet::cursor::FrameCursor;
use crate::network::packet::ethernet::EthernetHeader;
use crate::network::packet::ipv4::IPv4Header;
use crate::network::packet::ports::TransportPorts;
use crate::network::packet::{DecodedFrame, EthernetPayload, IPv4Payload, LinkLayer, RawFrame};
use log::debug;

/// 生フレームを層ごとに順にデコードする。失敗しない。
/// どこかの層で読めなくなった場合は、そこまでの結果と理由を持った DecodedFrame を返す。
pub fn decode(frame: &RawFrame) -> DecodedFrame {
    let link = decode_link(&frame.data);

    let decoded = DecodedFrame {
        timestamp: frame.timestamp,
        length: frame.len(),
        link,
    };

    if let Some(reason) = decoded.skip_reason() {
        debug!("デコードを途中で打ち切りました: {}", reason);
    }

    decoded
}

fn decode_link(data: &[u8]) -> LinkLayer {
    let mut cursor = FrameCursor::new(data);

    // イーサネットヘッダーの解析
    let header = match EthernetHeader::decode(&mut cursor) {
        Ok(header) => header,
        Err(reason) => return LinkLayer::Undecoded(reason),
    };

    // ネットワーク層の解析
    let payload = if header.is_ipv4() {
        match IPv4Header::decode(&mut cursor) {
            Ok(ipv4) => {
                let payload = decode_ipv4_payload(&ipv4, &mut cursor);
                EthernetPayload::IPv4 { header: ipv4, payload }
            }
            Err(reason) => EthernetPayload::Undecoded(reason),
        }
    } else {
        EthernetPayload::Other(header.ethertype)
    };

    LinkLayer::Ethernet { header, payload }
}

fn decode_ipv4_payload(header: &IPv4Header, cursor: &mut FrameCursor<'_>) -> IPv4Payload {
    if !header.carries_ports() {
        return IPv4Payload::Other(header.protocol);
    }

    // トランスポート層の解析
    match TransportPorts::decode(cursor) {
        Ok(ports) => IPv4Payload::TcpUdp(ports),
        Err(reason) => IPv4Payload::Undecoded(reason),
    }
}
