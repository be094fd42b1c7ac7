use std::process::ExitCode;

use link_sniffer::core::{CancellationToken, Configuration, Sniffer, SnifferError};
use link_sniffer::network::PacketCapture;
use link_sniffer::report::StdoutSink;
use link_sniffer::setup_logger::setup_logger;
use log::error;

fn main() -> ExitCode {
    if let Err(e) = setup_logger() {
        eprintln!("{}", SnifferError::Logger(e.to_string()));
        return ExitCode::FAILURE;
    }

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<(), SnifferError> {
    let config = Configuration::from_env()?;

    // CTRL+C で停止要求を出す
    let cancel = CancellationToken::new();
    let handler_token = cancel.clone();
    ctrlc::set_handler(move || handler_token.cancel())
        .map_err(|e| SnifferError::Signal(e.to_string()))?;

    let capture = PacketCapture::open(&config.capture)?;

    let mut sniffer = Sniffer::new(capture, StdoutSink::new(), cancel);
    sniffer.run()?;

    Ok(())
}
