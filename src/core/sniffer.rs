use crate::core::cancel::CancellationToken;
use crate::core::error::{SnifferError, SnifferResult};
use crate::network::capture::FrameSource;
use crate::network::decode::decode;
use crate::report::{format_banner, format_frame, FrameSink};
use log::{debug, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnifferState {
    Idle,
    Capturing,
    Draining,
    Closed,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CaptureStats {
    pub frames: u64,
    pub ipv4: u64,
    pub with_ports: u64,
    pub skipped: u64,
}

/// 受信 → デコード → 整形 → 出力 を1フレームずつ繰り返す
pub struct Sniffer<S: FrameSource, W: FrameSink> {
    source: S,
    sink: W,
    cancel: CancellationToken,
    state: SnifferState,
    stats: CaptureStats,
}

impl<S: FrameSource, W: FrameSink> Sniffer<S, W> {
    pub fn new(source: S, sink: W, cancel: CancellationToken) -> Self {
        Self {
            source,
            sink,
            cancel,
            state: SnifferState::Idle,
            stats: CaptureStats::default(),
        }
    }

    pub fn state(&self) -> SnifferState {
        self.state
    }

    /// 停止要求かキャプチャエラーまで実行する。
    /// どちらの場合もハンドルは必ず一度だけ閉じる。
    pub fn run(&mut self) -> SnifferResult<CaptureStats> {
        // Closed は終端。二度目の呼び出しでは何もしない
        if self.state != SnifferState::Idle {
            debug!("既に実行済みのため開始しません: {:?}", self.state);
            return Ok(self.stats);
        }

        let result = self.capture();

        self.transition(SnifferState::Draining);
        self.source.close();
        self.transition(SnifferState::Closed);

        info!(
            "キャプチャを終了しました: frames={} ipv4={} ports={} skipped={}",
            self.stats.frames, self.stats.ipv4, self.stats.with_ports, self.stats.skipped
        );

        result.map(|_| self.stats)
    }

    fn capture(&mut self) -> SnifferResult<()> {
        let banner = format_banner(self.source.interface_name(), &chrono::Local::now());
        self.sink.emit(&banner).map_err(SnifferError::Output)?;
        self.transition(SnifferState::Capturing);

        while !self.cancel.is_cancelled() {
            let frame = match self.source.receive()? {
                Some(frame) => frame,
                None => continue,
            };

            let decoded = decode(&frame);
            self.stats.frames += 1;
            if decoded.ipv4().is_some() {
                self.stats.ipv4 += 1;
            }
            if decoded.ports().is_some() {
                self.stats.with_ports += 1;
            }
            if decoded.ethernet().is_none() {
                self.stats.skipped += 1;
            }

            self.sink.emit(&format_frame(&decoded)).map_err(SnifferError::Output)?;
        }

        Ok(())
    }

    fn transition(&mut self, next: SnifferState) {
        debug!("状態遷移: {:?} -> {:?}", self.state, next);
        self.state = next;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::network::packet::RawFrame;
    use std::collections::VecDeque;
    use std::io;

    enum Step {
        Frame(Vec<u8>),
        Idle,
        // 受信待ちの間に割り込みが届いた
        InterruptWhileBlocked,
        // フレーム受信と同時に割り込みが届いた
        FrameThenInterrupt(Vec<u8>),
        Fail,
    }

    struct ScriptedSource {
        steps: VecDeque<Step>,
        cancel: CancellationToken,
        receives: usize,
        closes: usize,
    }

    impl ScriptedSource {
        fn new(steps: Vec<Step>, cancel: &CancellationToken) -> Self {
            Self {
                steps: steps.into(),
                cancel: cancel.clone(),
                receives: 0,
                closes: 0,
            }
        }
    }

    impl FrameSource for ScriptedSource {
        fn interface_name(&self) -> &str {
            "test0"
        }

        fn receive(&mut self) -> SnifferResult<Option<RawFrame>> {
            assert_eq!(self.closes, 0, "閉じた後に受信された");
            self.receives += 1;
            match self.steps.pop_front() {
                Some(Step::Frame(data)) => Ok(Some(RawFrame::new(data, chrono::Local::now()))),
                Some(Step::Idle) => Ok(None),
                Some(Step::InterruptWhileBlocked) => {
                    self.cancel.cancel();
                    Ok(None)
                }
                Some(Step::FrameThenInterrupt(data)) => {
                    self.cancel.cancel();
                    Ok(Some(RawFrame::new(data, chrono::Local::now())))
                }
                Some(Step::Fail) => Err(SnifferError::Capture(io::Error::new(
                    io::ErrorKind::Other,
                    "device gone",
                ))),
                None => {
                    self.cancel.cancel();
                    Ok(None)
                }
            }
        }

        fn close(&mut self) {
            self.closes += 1;
        }
    }

    struct BrokenSink;

    impl FrameSink for BrokenSink {
        fn emit(&mut self, _line: &str) -> io::Result<()> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))
        }
    }

    fn ipv4_udp_frame() -> Vec<u8> {
        let mut frame = vec![0u8; 12];
        frame.extend_from_slice(&[0x08, 0x00, 0x45]);
        frame.extend_from_slice(&[0u8; 8]);
        frame.push(17);
        frame.extend_from_slice(&[0u8; 2]);
        frame.extend_from_slice(&[10, 0, 0, 1, 10, 0, 0, 2]);
        frame.extend_from_slice(&[0x00, 0x35, 0xd4, 0x31]);
        frame
    }

    #[test]
    fn test_interrupt_while_blocked_closes_once() {
        let cancel = CancellationToken::new();
        let source = ScriptedSource::new(vec![Step::Idle, Step::InterruptWhileBlocked], &cancel);
        let mut sniffer = Sniffer::new(source, Vec::<String>::new(), cancel);

        let stats = sniffer.run().unwrap();

        assert_eq!(stats, CaptureStats::default());
        assert_eq!(sniffer.source.closes, 1);
        assert_eq!(sniffer.source.receives, 2);
        assert_eq!(sniffer.state(), SnifferState::Closed);
        // バナーのみ
        assert_eq!(sniffer.sink.len(), 1);
        assert!(sniffer.sink[0].contains("test0"));
    }

    #[test]
    fn test_in_flight_frame_is_drained() {
        let cancel = CancellationToken::new();
        let source = ScriptedSource::new(
            vec![
                Step::Frame(vec![0u8; 5]),
                Step::FrameThenInterrupt(ipv4_udp_frame()),
                Step::Frame(vec![0u8; 60]),
            ],
            &cancel,
        );
        let mut sniffer = Sniffer::new(source, Vec::<String>::new(), cancel);

        let stats = sniffer.run().unwrap();

        assert_eq!(sniffer.source.receives, 2);
        assert_eq!(sniffer.source.closes, 1);
        assert_eq!(sniffer.sink.len(), 3);
        assert!(sniffer.sink[1].ends_with("runt frame len=5 need=14"));
        assert!(sniffer.sink[2].ends_with("IPv4 10.0.0.1 -> 10.0.0.2 proto=17 ports 53->54321"));
        assert_eq!(
            stats,
            CaptureStats {
                frames: 2,
                ipv4: 1,
                with_ports: 1,
                skipped: 1,
            }
        );
    }

    #[test]
    fn test_second_run_does_not_restart() {
        let cancel = CancellationToken::new();
        let source = ScriptedSource::new(vec![Step::Frame(ipv4_udp_frame())], &cancel);
        let mut sniffer = Sniffer::new(source, Vec::<String>::new(), cancel);

        let first = sniffer.run().unwrap();
        let second = sniffer.run().unwrap();

        assert_eq!(first, second);
        assert_eq!(sniffer.source.closes, 1);
        assert_eq!(sniffer.source.receives, 2);
        assert_eq!(sniffer.state(), SnifferState::Closed);
        let banners = sniffer.sink.iter().filter(|line| line.contains("CTRL+C")).count();
        assert_eq!(banners, 1);
        assert_eq!(sniffer.sink.len(), 2);
    }

    #[test]
    fn test_cancelled_before_start_never_receives() {
        let cancel = CancellationToken::new();
        cancel.cancel();
        let source = ScriptedSource::new(vec![Step::Frame(vec![0u8; 60])], &cancel);
        let mut sniffer = Sniffer::new(source, Vec::<String>::new(), cancel);

        sniffer.run().unwrap();

        assert_eq!(sniffer.source.receives, 0);
        assert_eq!(sniffer.source.closes, 1);
    }

    #[test]
    fn test_capture_error_propagates_after_close() {
        let cancel = CancellationToken::new();
        let source = ScriptedSource::new(vec![Step::Frame(ipv4_udp_frame()), Step::Fail], &cancel);
        let mut sniffer = Sniffer::new(source, Vec::<String>::new(), cancel);

        let result = sniffer.run();

        assert!(matches!(result, Err(SnifferError::Capture(_))));
        assert_eq!(sniffer.source.closes, 1);
        assert_eq!(sniffer.state(), SnifferState::Closed);
        assert_eq!(sniffer.sink.len(), 2);
    }

    #[test]
    fn test_sink_failure_stops_capture() {
        let cancel = CancellationToken::new();
        let source = ScriptedSource::new(vec![Step::Frame(ipv4_udp_frame())], &cancel);
        let mut sniffer = Sniffer::new(source, BrokenSink, cancel);

        let result = sniffer.run();

        assert!(matches!(result, Err(SnifferError::Output(_))));
        assert_eq!(sniffer.source.receives, 0);
        assert_eq!(sniffer.source.closes, 1);
    }

    #[test]
    fn test_lines_keep_arrival_order() {
        let cancel = CancellationToken::new();
        let lens = [60usize, 64, 70, 80];
        let steps = lens
            .iter()
            .map(|&len| {
                let mut frame = vec![0u8; len];
                frame[12] = 0x86;
                frame[13] = 0xdd;
                Step::Frame(frame)
            })
            .collect();
        let source = ScriptedSource::new(steps, &cancel);
        let mut sniffer = Sniffer::new(source, Vec::<String>::new(), cancel);

        let stats = sniffer.run().unwrap();

        assert_eq!(stats.frames, 4);
        for (line, len) in sniffer.sink[1..].iter().zip(lens) {
            assert!(line.ends_with(&format!("ethertype=0x86dd len={}", len)), "{}", line);
        }
    }
}
