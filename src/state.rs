//! Process-wide collaborators, initialized once at startup and injected into
//! route handlers. Nothing here is ambient global state.

use std::sync::Arc;

use anyhow::Context;

use crate::config::AppConfig;
use crate::mailer::{Mailer, SmtpMailer};
use crate::store::{DocumentStore, MemoryStore};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub store: Arc<dyn DocumentStore>,
    pub mailer: Arc<dyn Mailer>,
}

impl AppState {
    /// Wire up the production collaborators: the SMTP transport and the
    /// in-process document store.
    pub fn new(config: AppConfig) -> anyhow::Result<Self> {
        let mailer = SmtpMailer::new(config.mail.clone())
            .context("failed to build SMTP transport")?;
        Ok(Self {
            config: Arc::new(config),
            store: Arc::new(MemoryStore::new()),
            mailer: Arc::new(mailer),
        })
    }

    /// Assemble a state from explicit collaborators. Used by tests to slot in
    /// a recording mailer.
    pub fn with_parts(
        config: AppConfig,
        store: Arc<dyn DocumentStore>,
        mailer: Arc<dyn Mailer>,
    ) -> Self {
        Self {
            config: Arc::new(config),
            store,
            mailer,
        }
    }
}
