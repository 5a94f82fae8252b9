//! `winnow-send` — dial a winnow receiver and send a chaffed message.
//!
//! Thin CLI wrapper around [`winnow_core::Sender`]; owns argument parsing,
//! stdin reading, and the TCP dial. Connection establishment is left to
//! this binary so the core itself stays transport-agnostic.

use std::io::Read;
use std::process::ExitCode;

use clap::Parser;
use tokio::net::TcpStream;

use winnow_core::{Sender, DEFAULT_NUM_CHAFF};

#[derive(Parser, Debug)]
#[command(about = "Send a message through the winnowing/chaffing core")]
struct Args {
    /// Host and port of the receiver.
    #[arg(long, default_value = "localhost:9876")]
    peer: String,

    /// Shared secret (required).
    #[arg(long)]
    secret: String,

    /// Message to send; stdin is read to EOF if omitted.
    #[arg(long)]
    message: Option<String>,

    /// Chaff packets emitted per real packet.
    #[arg(long, default_value_t = DEFAULT_NUM_CHAFF)]
    num_chaff: u32,
}

#[tokio::main]
async fn main() -> ExitCode {
    env_logger::init();
    let args = Args::parse();

    let message = match args.message {
        Some(m) => m.into_bytes(),
        None => {
            let mut buf = Vec::new();
            if let Err(err) = std::io::stdin().read_to_end(&mut buf) {
                log::error!("unable to read from stdin: {err}");
                return ExitCode::FAILURE;
            }
            buf
        }
    };

    match send(&args.peer, args.secret.as_bytes(), &message, args.num_chaff).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log::error!("failed to send message: {err}");
            ExitCode::FAILURE
        }
    }
}

async fn send(
    peer: &str,
    secret: &[u8],
    message: &[u8],
    num_chaff: u32,
) -> Result<(), Box<dyn std::error::Error>> {
    let stream = TcpStream::connect(peer).await?;
    stream.set_nodelay(true).ok();

    let mut sender = Sender::with_num_chaff(secret.to_vec(), stream, num_chaff);
    sender.write(message);
    sender.close().await?;

    log::info!("sent {} bytes to {peer} ({num_chaff} chaff/packet)", message.len());
    Ok(())
}
