use env_logger::{Builder, Env, Target};
use std::io::Write;

/// 診断ログは標準エラーへ出す。標準出力はフレームの出力先として空けておく。
pub fn setup_logger() -> Result<(), log::SetLoggerError> {
    // RUST_LOG が未設定なら info
    Builder::from_env(Env::default().default_filter_or("info"))
        // タイムスタンプ付きのフォーマット
        .format(|buf, record| {
            writeln!(
                buf,
                "{} [{}] {} - {}",
                chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
                record.level(),
                record.target(),
                record.args()
            )
        })
        .target(Target::Stderr)
        .try_init()
}
