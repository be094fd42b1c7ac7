use crate::network::packet::{DecodedFrame, EthernetPayload, LinkLayer};
use chrono::{DateTime, Local};
use std::io::{self, Write};

const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// 整形済みの行の出力先
pub trait FrameSink {
    fn emit(&mut self, line: &str) -> io::Result<()>;
}

/// 1行ずつ標準出力に書き出す。行ごとにフラッシュする。
pub struct StdoutSink {
    stdout: io::Stdout,
}

impl StdoutSink {
    pub fn new() -> Self {
        Self { stdout: io::stdout() }
    }
}

impl FrameSink for StdoutSink {
    fn emit(&mut self, line: &str) -> io::Result<()> {
        let mut out = self.stdout.lock();
        writeln!(out, "{}", line)?;
        out.flush()
    }
}

impl FrameSink for Vec<String> {
    fn emit(&mut self, line: &str) -> io::Result<()> {
        self.push(line.to_string());
        Ok(())
    }
}

pub fn format_timestamp(timestamp: &DateTime<Local>) -> String {
    timestamp.format(TIMESTAMP_FORMAT).to_string()
}

pub fn format_banner(interface: &str, timestamp: &DateTime<Local>) -> String {
    format!(
        "[{}] {} でキャプチャを開始します (CTRL+C で終了)",
        format_timestamp(timestamp),
        interface
    )
}

/// デコード結果を1行にする
pub fn format_frame(frame: &DecodedFrame) -> String {
    let ts = format_timestamp(&frame.timestamp);

    let (ethernet, payload) = match &frame.link {
        LinkLayer::Ethernet { header, payload } => (header, payload),
        LinkLayer::Undecoded(reason) => {
            let required = reason.required_len().unwrap_or(0);
            return format!("{} runt frame len={} need={}", ts, frame.length, required);
        }
    };

    match payload {
        EthernetPayload::IPv4 { header, .. } => {
            let ports = match frame.ports() {
                Some(ports) => format!(" ports {}->{}", ports.source, ports.destination),
                None => String::new(),
            };
            format!(
                "{} {} -> {} IPv4 {} -> {} proto={}{}",
                ts,
                ethernet.source,
                ethernet.destination,
                header.source,
                header.destination,
                header.protocol,
                ports
            )
        }
        EthernetPayload::Undecoded(_) | EthernetPayload::Other(_) => format!(
            "{} {} -> {} ethertype=0x{:04x} len={}",
            ts, ethernet.source, ethernet.destination, ethernet.ethertype, frame.length
        ),
    }
}
