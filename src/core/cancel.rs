use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// キャプチャループの停止要求。シグナルハンドラから立て、ループ側は各反復の先頭で確認する。
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
}

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}
