use crate::driver::Status;
use crate::events::AppEvent;
use async_channel::Sender;
use dwell::hand::FrameInput;
use parking_lot::RwLock;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::UnixListener;

#[derive(Debug, Clone, PartialEq)]
pub enum Request {
    Frame(Box<FrameInput>),
    Reload,
    Status,
    Shutdown,
    Ignored,
}

/// One line of the feed protocol: a JSON frame or a bare command word.
pub fn parse_line(line: &str) -> Result<Request, serde_json::Error> {
    match line.trim() {
        "" => Ok(Request::Ignored),
        "reload" => Ok(Request::Reload),
        "status" => Ok(Request::Status),
        "shutdown" => Ok(Request::Shutdown),
        s if s.starts_with('{') => serde_json::from_str(s).map(|f| Request::Frame(Box::new(f))),
        _ => Ok(Request::Ignored),
    }
}

pub async fn run_server(socket_path: PathBuf, tx: Sender<AppEvent>, status: Arc<RwLock<Status>>) {
    // Cleanup old socket if it exists
    if std::fs::metadata(&socket_path).is_ok() {
        let _ = std::fs::remove_file(&socket_path);
    }

    let listener = match UnixListener::bind(&socket_path) {
        Ok(l) => l,
        Err(e) => {
            log::error!("Failed to bind unix socket {}: {}", socket_path.display(), e);
            return;
        }
    };
    log::info!("Listening for input frames on {}", socket_path.display());

    loop {
        match listener.accept().await {
            Ok((stream, _)) => {
                let tx = tx.clone();
                let status = status.clone();
                tokio::spawn(async move {
                    let (read_half, mut write_half) = stream.into_split();
                    let mut lines = BufReader::new(read_half).lines();

                    while let Ok(Some(line)) = lines.next_line().await {
                        let event = match parse_line(&line) {
                            Ok(Request::Frame(frame)) => AppEvent::Frame(*frame),
                            Ok(Request::Reload) => AppEvent::ConfigReload,
                            Ok(Request::Shutdown) => AppEvent::Shutdown,
                            Ok(Request::Status) => {
                                let snapshot = status.read().clone();
                                match serde_json::to_string(&snapshot) {
                                    Ok(json) => {
                                        let reply = format!("{}\n", json);
                                        if write_half.write_all(reply.as_bytes()).await.is_err() {
                                            break;
                                        }
                                    }
                                    Err(e) => log::error!("Failed to encode status: {}", e),
                                }
                                continue;
                            }
                            Ok(Request::Ignored) => continue,
                            Err(e) => {
                                log::warn!("Malformed frame: {}", e);
                                continue;
                            }
                        };
                        if tx.send(event).await.is_err() {
                            break;
                        }
                    }
                });
            }
            Err(e) => {
                log::error!("Failed to accept connection: {}", e);
            }
        }
    }
}
