pub mod cursor;
pub mod ethernet;
pub mod ipv4;
pub mod ports;
pub mod skip;

use crate::network::packet::ethernet::EthernetHeader;
use crate::network::packet::ipv4::IPv4Header;
use crate::network::packet::ports::TransportPorts;
use crate::network::packet::skip::SkipReason;
use chrono::{DateTime, Local};

/// 1回の受信で得た生フレーム
#[derive(Debug, Clone)]
pub struct RawFrame {
    pub data: Vec<u8>,
    pub timestamp: DateTime<Local>,
}

impl RawFrame {
    pub fn new(data: Vec<u8>, timestamp: DateTime<Local>) -> Self {
        Self { data, timestamp }
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedFrame {
    pub timestamp: DateTime<Local>,
    pub length: usize,
    pub link: LinkLayer,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkLayer {
    Ethernet {
        header: EthernetHeader,
        payload: EthernetPayload,
    },
    Undecoded(SkipReason),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EthernetPayload {
    IPv4 {
        header: IPv4Header,
        payload: IPv4Payload,
    },
    // IPv4のEtherTypeだがヘッダーを読めなかった
    Undecoded(SkipReason),
    Other(u16),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IPv4Payload {
    TcpUdp(TransportPorts),
    Undecoded(SkipReason),
    Other(u8),
}

impl DecodedFrame {
    pub fn ethernet(&self) -> Option<&EthernetHeader> {
        match &self.link {
            LinkLayer::Ethernet { header, .. } => Some(header),
            LinkLayer::Undecoded(_) => None,
        }
    }

    pub fn ipv4(&self) -> Option<&IPv4Header> {
        match &self.link {
            LinkLayer::Ethernet {
                payload: EthernetPayload::IPv4 { header, .. },
                ..
            } => Some(header),
            _ => None,
        }
    }

    pub fn ports(&self) -> Option<&TransportPorts> {
        match &self.link {
            LinkLayer::Ethernet {
                payload:
                    EthernetPayload::IPv4 {
                        payload: IPv4Payload::TcpUdp(ports),
                        ..
                    },
                ..
            } => Some(ports),
            _ => None,
        }
    }

    /// 最も深くデコードできた層の次で止まった理由。完全にデコードできた場合は None。
    pub fn skip_reason(&self) -> Option<SkipReason> {
        match &self.link {
            LinkLayer::Undecoded(reason) => Some(*reason),
            LinkLayer::Ethernet { payload, .. } => match payload {
                EthernetPayload::Undecoded(reason) => Some(*reason),
                EthernetPayload::Other(ethertype) => Some(SkipReason::UnsupportedEthertype {
                    ethertype: *ethertype,
                    length: self.length,
                }),
                EthernetPayload::IPv4 { payload, .. } => match payload {
                    IPv4Payload::TcpUdp(_) => None,
                    IPv4Payload::Undecoded(reason) => Some(*reason),
                    IPv4Payload::Other(protocol) => Some(SkipReason::UnsupportedProtocol {
                        protocol: *protocol,
                        length: self.length,
                    }),
                },
            },
        }
    }
}
