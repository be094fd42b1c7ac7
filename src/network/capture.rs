use crate::core::config::CaptureConfig;
use crate::core::error::{SnifferError, SnifferResult};
use crate::network::packet::RawFrame;
use log::{debug, info};
use pnet::datalink::{self, Channel, DataLinkReceiver, NetworkInterface};
use std::io::ErrorKind;

/// 生フレームの供給元
pub trait FrameSource {
    fn interface_name(&self) -> &str;

    /// 次のフレームを待つ。ポーリング間隔内に何も届かなければ `Ok(None)`。
    fn receive(&mut self) -> SnifferResult<Option<RawFrame>>;

    /// ハンドルを解放する。二回目以降は何もしない。
    fn close(&mut self);
}

pub struct PacketCapture {
    interface: NetworkInterface,
    buffer_size: usize,
    rx: Option<Box<dyn DataLinkReceiver>>,
}

impl PacketCapture {
    /// インターフェースをリンク層・全プロトコルで開く
    pub fn open(config: &CaptureConfig) -> SnifferResult<Self> {
        let interface = datalink::interfaces()
            .into_iter()
            .find(|iface| iface.name == config.interface)
            .ok_or_else(|| SnifferError::InterfaceNotFound(config.interface.clone()))?;

        let channel_config = datalink::Config {
            read_buffer_size: config.buffer_size,
            read_timeout: Some(config.poll_interval()),
            promiscuous: config.promiscuous,
            ..Default::default()
        };

        let rx = match datalink::channel(&interface, channel_config) {
            Ok(Channel::Ethernet(_, rx)) => rx,
            Ok(_) => return Err(SnifferError::UnsupportedChannel(interface.name.clone())),
            Err(e) if e.kind() == ErrorKind::PermissionDenied => {
                return Err(SnifferError::PermissionDenied {
                    interface: interface.name.clone(),
                    source: e,
                })
            }
            Err(e) => return Err(SnifferError::Capture(e)),
        };

        info!(
            "インターフェース {} を開きました (buffer={}, promiscuous={})",
            interface.name, config.buffer_size, config.promiscuous
        );

        Ok(Self {
            interface,
            buffer_size: config.buffer_size,
            rx: Some(rx),
        })
    }
}

impl FrameSource for PacketCapture {
    fn interface_name(&self) -> &str {
        &self.interface.name
    }

    fn receive(&mut self) -> SnifferResult<Option<RawFrame>> {
        let rx = match self.rx.as_mut() {
            Some(rx) => rx,
            None => {
                return Err(SnifferError::Capture(std::io::Error::new(
                    ErrorKind::NotConnected,
                    "キャプチャハンドルは既に閉じられています",
                )))
            }
        };

        match rx.next() {
            Ok(packet) => {
                let len = packet.len().min(self.buffer_size);
                Ok(Some(RawFrame::new(packet[..len].to_vec(), chrono::Local::now())))
            }
            Err(e)
                if matches!(
                    e.kind(),
                    ErrorKind::TimedOut | ErrorKind::WouldBlock | ErrorKind::Interrupted
                ) =>
            {
                Ok(None)
            }
            Err(e) => Err(SnifferError::Capture(e)),
        }
    }

    fn close(&mut self) {
        if self.rx.take().is_some() {
            debug!("インターフェース {} のキャプチャハンドルを解放しました", self.interface.name);
        }
    }
}

impl Drop for PacketCapture {
    fn drop(&mut self) {
        self.close();
    }
}
