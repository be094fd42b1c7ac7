use thiserror::Error;

#[derive(Error, Debug)]
pub enum SnifferError {
    #[error("設定エラー: {0}")]
    Config(String),

    #[error("ロガーのセットアップに失敗しました: {0}")]
    Logger(String),

    #[error("シグナルハンドラの登録に失敗しました: {0}")]
    Signal(String),

    #[error("インターフェース {0} が見つかりません")]
    InterfaceNotFound(String),

    #[error("インターフェース {interface} の生キャプチャ権限がありません (要 CAP_NET_RAW): {source}")]
    PermissionDenied {
        interface: String,
        source: std::io::Error,
    },

    #[error("インターフェース {0} は未サポートのチャネルタイプです")]
    UnsupportedChannel(String),

    #[error("キャプチャエラー: {0}")]
    Capture(#[from] std::io::Error),

    #[error("出力エラー: {0}")]
    Output(std::io::Error),
}

pub type SnifferResult<T> = Result<T, SnifferError>;
