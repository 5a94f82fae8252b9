//! `winnow-receive` — listen for winnow senders and print recovered messages.
//!
//! Thin CLI wrapper around [`winnow_core::Receiver`]; owns argument
//! parsing and the TCP listen loop, mirroring the original reference's
//! one-goroutine-per-connection shape with `tokio::spawn`.

use std::process::ExitCode;

use clap::Parser;
use tokio::net::TcpListener;

use winnow_core::Receiver;

#[derive(Parser, Debug)]
#[command(about = "Receive and winnow messages sent through the core")]
struct Args {
    /// Host and port to listen on.
    #[arg(long, default_value = "0.0.0.0:9876")]
    listen: String,

    /// Shared secret (required).
    #[arg(long)]
    secret: String,
}

#[tokio::main]
async fn main() -> ExitCode {
    env_logger::init();
    let args = Args::parse();

    let listener = match TcpListener::bind(&args.listen).await {
        Ok(listener) => listener,
        Err(err) => {
            log::error!("failed to bind {}: {err}", args.listen);
            return ExitCode::FAILURE;
        }
    };
    log::info!("listening on {}", args.listen);

    loop {
        let (stream, peer_addr) = match listener.accept().await {
            Ok(conn) => conn,
            Err(err) => {
                log::error!("failed to accept connection: {err}");
                continue;
            }
        };

        let secret = args.secret.clone().into_bytes();
        tokio::spawn(async move {
            let receiver = Receiver::new(secret, stream);
            match receiver.read_all().await {
                Ok(message) => {
                    log::info!("recovered {} bytes from {peer_addr}", message.len());
                    println!("{}", String::from_utf8_lossy(&message));
                }
                Err(err) => log::error!("error reading from {peer_addr}: {err}"),
            }
        });
    }
}
