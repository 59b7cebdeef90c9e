use crate::driver::Status;
use crate::events::AppEvent;
use async_channel::Sender;
use parking_lot::RwLock;
use std::path::PathBuf;
use std::sync::Arc;
use std::thread;
use tokio::runtime::Runtime;

pub fn start_background_services(
    tx: Sender<AppEvent>,
    socket_path: PathBuf,
    status: Arc<RwLock<Status>>,
) {
    thread::spawn(move || {
        let rt = match Runtime::new() {
            Ok(rt) => rt,
            Err(e) => {
                log::error!("Failed to create Tokio runtime: {}", e);
                let _ = tx.send_blocking(AppEvent::Shutdown);
                return;
            }
        };

        rt.block_on(async move {
            {
                let tx = tx.clone();
                tokio::spawn(async move {
                    crate::sys::server::run_server(socket_path, tx, status).await;
                });
            }

            {
                let tx = tx.clone();
                tokio::spawn(async move {
                    crate::config::run_async_watcher(tx).await;
                });
            }

            std::future::pending::<()>().await;
        });
    });
}
