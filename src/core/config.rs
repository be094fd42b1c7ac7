use crate::core::SnifferError;
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const DEFAULT_INTERFACE: &str = "eth0";
// フレームを切り詰めずに受信できるサイズ
pub const DEFAULT_BUFFER_SIZE: usize = 65535;
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 500;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Configuration {
    pub capture: CaptureConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaptureConfig {
    pub interface: String,
    pub buffer_size: usize,
    pub poll_interval_ms: u64,
    pub promiscuous: bool,
}

impl CaptureConfig {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            interface: DEFAULT_INTERFACE.to_string(),
            buffer_size: DEFAULT_BUFFER_SIZE,
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
            promiscuous: true,
        }
    }
}

impl Configuration {
    pub fn from_env() -> Result<Self, SnifferError> {
        dotenv::dotenv().ok();

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// 任意のキー参照関数から設定を組み立てる。未設定のキーはデフォルト値になる。
    pub fn from_lookup<F>(lookup: F) -> Result<Self, SnifferError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let interface = lookup("NETWORK_INTERFACE")
            .map(|v| v.trim().to_string())
            .unwrap_or_else(|| DEFAULT_INTERFACE.to_string());
        if interface.is_empty() {
            return Err(SnifferError::Config("NETWORK_INTERFACEが空です".to_string()));
        }

        let buffer_size = match lookup("CAPTURE_BUFFER_SIZE") {
            Some(v) => v
                .trim()
                .parse::<usize>()
                .map_err(|e| SnifferError::Config(format!("無効なバッファサイズ: {}", e)))?,
            None => DEFAULT_BUFFER_SIZE,
        };
        if buffer_size == 0 {
            return Err(SnifferError::Config(
                "CAPTURE_BUFFER_SIZEは1以上である必要があります".to_string(),
            ));
        }

        let poll_interval_ms = match lookup("CAPTURE_POLL_INTERVAL_MS") {
            Some(v) => v
                .trim()
                .parse::<u64>()
                .map_err(|e| SnifferError::Config(format!("無効なポーリング間隔: {}", e)))?,
            None => DEFAULT_POLL_INTERVAL_MS,
        };
        if poll_interval_ms == 0 {
            return Err(SnifferError::Config(
                "CAPTURE_POLL_INTERVAL_MSは1以上である必要があります".to_string(),
            ));
        }

        let promiscuous = match lookup("CAPTURE_PROMISCUOUS") {
            Some(v) => v
                .trim()
                .parse::<bool>()
                .map_err(|e| SnifferError::Config(format!("無効なプロミスキャス設定: {}", e)))?,
            None => true,
        };

        Ok(Configuration {
            capture: CaptureConfig {
                interface,
                buffer_size,
                poll_interval_ms,
                promiscuous,
            },
        })
    }

    #[cfg(test)]
    pub fn for_testing() -> Self {
        Self {
            capture: CaptureConfig {
                interface: "lo".to_string(),
                ..CaptureConfig::default()
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_when_unset() {
        let config = Configuration::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(config.capture, CaptureConfig::default());
        assert_eq!(config.capture.interface, "eth0");
        assert_eq!(config.capture.buffer_size, 65535);
        assert_eq!(config.capture.poll_interval(), Duration::from_millis(500));
    }

    #[test]
    fn test_values_are_read() {
        let config = Configuration::from_lookup(lookup_from(&[
            ("NETWORK_INTERFACE", "wlan0"),
            ("CAPTURE_BUFFER_SIZE", "2048"),
            ("CAPTURE_POLL_INTERVAL_MS", "100"),
            ("CAPTURE_PROMISCUOUS", "false"),
        ]))
        .unwrap();

        assert_eq!(config.capture.interface, "wlan0");
        assert_eq!(config.capture.buffer_size, 2048);
        assert_eq!(config.capture.poll_interval_ms, 100);
        assert!(!config.capture.promiscuous);
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        for pairs in [
            [("CAPTURE_BUFFER_SIZE", "abc")],
            [("CAPTURE_BUFFER_SIZE", "0")],
            [("CAPTURE_POLL_INTERVAL_MS", "0")],
            [("CAPTURE_PROMISCUOUS", "maybe")],
            [("NETWORK_INTERFACE", "  ")],
        ] {
            let result = Configuration::from_lookup(lookup_from(&pairs));
            assert!(matches!(result, Err(SnifferError::Config(_))), "{:?}", pairs);
        }
    }
}
