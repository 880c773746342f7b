//! Runtime orchestration.
//!
//! [`WeftRuntime`] owns everything with a lifecycle: the file sources, the
//! HTTP gateway and the root shutdown token. Assembly is explicit; the
//! caller constructs channels, binds handlers, builds sources and the
//! gateway, and hands the lifecycled pieces to the runtime:
//!
//! ```rust,ignore
//! let config = ConfigLoader::new().load()?;
//! let mut runtime = WeftRuntime::from_config(config);
//!
//! runtime.add_source(source);
//! runtime.set_gateway(gateway);
//!
//! runtime.run().await?;
//! ```

use std::future::Future;

use tokio::signal;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

use weft_file::FileSource;
use weft_http::HttpGateway;

use crate::config::WeftConfig;
use crate::error::{RuntimeError, RuntimeResult};
use crate::logging;

/// The runtime that drives sources and the gateway until shutdown.
pub struct WeftRuntime {
    config: WeftConfig,
    sources: Vec<FileSource>,
    gateway: Option<HttpGateway>,
    shutdown: CancellationToken,
}

impl WeftRuntime {
    /// Creates a runtime from configuration.
    ///
    /// Initializes logging from the configuration (first initialization
    /// wins, so embedding callers may install their own subscriber first).
    pub fn from_config(config: WeftConfig) -> Self {
        logging::init_from_config(&config.logging);

        info!(
            level = config.logging.level.as_str(),
            format = ?config.logging.format,
            "runtime initialized from configuration"
        );

        Self {
            config,
            sources: Vec::new(),
            gateway: None,
            shutdown: CancellationToken::new(),
        }
    }

    /// Returns a reference to the configuration.
    pub fn config(&self) -> &WeftConfig {
        &self.config
    }

    /// Returns a handle to the root shutdown token.
    pub fn shutdown_token(&self) -> CancellationToken {
        self.shutdown.clone()
    }

    /// Adds a file source to be driven by [`run`](Self::run).
    pub fn add_source(&mut self, source: FileSource) {
        self.sources.push(source);
    }

    /// Sets the HTTP gateway to be served by [`run`](Self::run).
    pub fn set_gateway(&mut self, gateway: HttpGateway) {
        self.gateway = Some(gateway);
    }

    /// Runs until Ctrl+C or SIGTERM, then shuts everything down.
    pub async fn run(self) -> RuntimeResult<()> {
        self.run_until(wait_for_shutdown()).await
    }

    /// Runs until `shutdown` resolves (or the gateway fails), then cancels
    /// the token and joins every spawned task.
    pub async fn run_until<F>(mut self, shutdown: F) -> RuntimeResult<()>
    where
        F: Future<Output = ()>,
    {
        let token = self.shutdown.clone();

        let mut source_tasks: Vec<JoinHandle<()>> = Vec::new();
        for source in self.sources.drain(..) {
            source_tasks.push(tokio::spawn(source.run(token.child_token())));
        }

        let gateway_task = self
            .gateway
            .take()
            .map(|gateway| tokio::spawn(gateway.serve(token.child_token())));

        info!(
            sources = source_tasks.len(),
            gateway = gateway_task.is_some(),
            "runtime started"
        );

        let shutdown = std::pin::pin!(shutdown);
        let run_result = match gateway_task {
            Some(mut task) => {
                tokio::select! {
                    _ = shutdown => {
                        info!("shutdown requested");
                        token.cancel();
                        match task.await {
                            Ok(result) => result.map_err(RuntimeError::from),
                            Err(e) => Err(RuntimeError::Task(e.to_string())),
                        }
                    }
                    result = &mut task => {
                        // The gateway ended before shutdown was requested;
                        // bring the sources down with it.
                        warn!("gateway exited early, shutting down");
                        token.cancel();
                        match result {
                            Ok(inner) => inner.map_err(RuntimeError::from),
                            Err(e) => Err(RuntimeError::Task(e.to_string())),
                        }
                    }
                }
            }
            None => {
                shutdown.await;
                info!("shutdown requested");
                token.cancel();
                Ok(())
            }
        };

        for task in source_tasks {
            if let Err(e) = task.await {
                error!(error = %e, "source task ended abnormally");
            }
        }

        info!("runtime stopped");
        run_result
    }
}

/// Waits for Ctrl+C or SIGTERM.
async fn wait_for_shutdown() {
    #[cfg(unix)]
    {
        let mut sigterm = signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to register SIGTERM handler");

        tokio::select! {
            _ = signal::ctrl_c() => {
                info!("Received Ctrl+C, shutting down");
            }
            _ = sigterm.recv() => {
                info!("Received SIGTERM, shutting down");
            }
        }
    }

    #[cfg(not(unix))]
    {
        signal::ctrl_c().await.expect("Failed to listen for Ctrl+C");
        info!("Received Ctrl+C, shutting down");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;
    use std::sync::Arc;
    use std::time::Duration;
    use weft_core::{Channel, Message, handler_fn};
    use weft_file::FileEntry;

    #[tokio::test]
    async fn test_run_until_drives_sources_and_stops() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("a.txt"), "hello").unwrap();

        let log: Arc<Mutex<Vec<String>>> = Arc::new(Mutex::new(Vec::new()));
        let channel = Channel::new("files");
        {
            let log = Arc::clone(&log);
            channel.bind(handler_fn(move |message: Message<FileEntry>| {
                let log = Arc::clone(&log);
                async move {
                    log.lock().push(message.payload().file_name().into_owned());
                    Ok(None)
                }
            }));
        }

        let source = FileSource::builder()
            .directory(dir.path())
            .pattern("*.txt")
            .period(Duration::from_millis(20))
            .output(channel)
            .build()
            .unwrap();

        let mut runtime = WeftRuntime::from_config(WeftConfig::default());
        runtime.add_source(source);

        runtime
            .run_until(tokio::time::sleep(Duration::from_millis(150)))
            .await
            .unwrap();

        assert_eq!(*log.lock(), vec!["a.txt"]);
    }

    #[tokio::test]
    async fn test_external_cancel_stops_the_runtime() {
        let runtime = WeftRuntime::from_config(WeftConfig::default());
        let token = runtime.shutdown_token();

        let trigger = async move {
            tokio::time::sleep(Duration::from_millis(10)).await;
            token.cancel();
        };

        // No sources, no gateway: run_until returns once the future does.
        runtime.run_until(trigger).await.unwrap();
    }
}
