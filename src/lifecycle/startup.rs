//! Startup orchestration.
//!
//! # Responsibilities
//! - Build the dispatcher snapshot from a validated configuration
//! - Spawn the serial completion queue
//! - Assemble the resource loader adapter
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal
//! - Must run inside the tokio runtime (the completion queue is a task)

use std::sync::Arc;
use tokio::task::JoinHandle;

use crate::config::InterceptorConfig;
use crate::dispatch::{Dispatcher, SharedDispatcher};
use crate::loader::{ResourceLoaderAdapter, SerialExecutor};
use crate::registry::RegistryError;

/// Everything the binary needs to serve requests.
pub struct Core {
    pub shared: SharedDispatcher,
    pub adapter: ResourceLoaderAdapter,
    pub completion_worker: JoinHandle<()>,
}

/// Initialize the interception core for `config`.
pub fn initialize(config: &InterceptorConfig) -> Result<Core, RegistryError> {
    let dispatcher = Dispatcher::from_config(config)?;
    tracing::info!(
        marker = %dispatcher.codec().marker(),
        master_url = %dispatcher.registry().master_url(),
        playlists = dispatcher.registry().len(),
        "Dispatcher ready"
    );

    let shared = SharedDispatcher::new(dispatcher);
    let (executor, completion_worker) = SerialExecutor::spawn();
    let adapter = ResourceLoaderAdapter::new(shared.clone(), Arc::new(executor))
        .with_malformed_url_error_code(config.interceptor.malformed_url_error_code);

    Ok(Core {
        shared,
        adapter,
        completion_worker,
    })
}
