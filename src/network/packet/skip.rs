use thiserror::Error;

pub const ETHERNET_HEADER_LEN: usize = 14;
pub const IPV4_MIN_HEADER_LEN: usize = 20;
pub const IPV4_MAX_HEADER_LEN: usize = 60;
pub const PORTS_LEN: usize = 4;

/// デコードできた層より深い層を扱えなかった理由。キャプチャは止めない。
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    #[error("イーサネットヘッダーに対してフレームが短すぎます (len={length}, need={required})")]
    TooShortForEthernet { length: usize, required: usize },

    #[error("未対応のEtherTypeです (ethertype=0x{ethertype:04x}, len={length})")]
    UnsupportedEthertype { ethertype: u16, length: usize },

    #[error("IPv4ヘッダーに対してフレームが短すぎます (len={length}, need={required})")]
    TooShortForIPv4 { length: usize, required: usize },

    #[error("IPv4ヘッダー長が不正です (ihl={header_length}, len={length})")]
    InvalidIPv4HeaderLength { header_length: usize, length: usize },

    #[error("未対応のトランスポートプロトコルです (proto={protocol}, len={length})")]
    UnsupportedProtocol { protocol: u8, length: usize },

    #[error("ポート番号に対してフレームが短すぎます (len={length}, need={required})")]
    TooShortForPorts { length: usize, required: usize },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layer {
    Ethernet,
    IPv4,
    Transport,
}

impl SkipReason {
    pub fn layer(&self) -> Layer {
        match self {
            SkipReason::TooShortForEthernet { .. } => Layer::Ethernet,
            SkipReason::UnsupportedEthertype { .. }
            | SkipReason::TooShortForIPv4 { .. }
            | SkipReason::InvalidIPv4HeaderLength { .. } => Layer::IPv4,
            SkipReason::UnsupportedProtocol { .. } | SkipReason::TooShortForPorts { .. } => {
                Layer::Transport
            }
        }
    }

    pub fn frame_len(&self) -> usize {
        match *self {
            SkipReason::TooShortForEthernet { length, .. }
            | SkipReason::UnsupportedEthertype { length, .. }
            | SkipReason::TooShortForIPv4 { length, .. }
            | SkipReason::InvalidIPv4HeaderLength { length, .. }
            | SkipReason::UnsupportedProtocol { length, .. }
            | SkipReason::TooShortForPorts { length, .. } => length,
        }
    }

    /// 長さ不足の場合に必要だったバイト数
    pub fn required_len(&self) -> Option<usize> {
        match *self {
            SkipReason::TooShortForEthernet { required, .. }
            | SkipReason::TooShortForIPv4 { required, .. }
            | SkipReason::TooShortForPorts { required, .. } => Some(required),
            _ => None,
        }
    }
}
