use tracing::{debug, warn};

use crate::application::{
    ports::{Prompter, ServerStore},
    services::wizard::Wizard,
};
use crate::domain::ServerConfig;
use crate::error::SdkResult;

/// Read-only queries over the configured servers.
pub struct ServerService {
    store: Box<dyn ServerStore>,
    prompter: Box<dyn Prompter>,
}

impl ServerService {
    pub fn new(store: Box<dyn ServerStore>, prompter: Box<dyn Prompter>) -> Self {
        Self { store, prompter }
    }

    pub fn info(&self, server_id: Option<&str>) -> SdkResult<ServerConfig> {
        let server_id = Wizard::new(self.prompter.as_ref())
            .existing_server_or_prompt(server_id, self.store.as_ref())?;
        self.store.load(&server_id)
    }

    /// All servers, most recently modified first. Servers whose
    /// configuration cannot be read are skipped.
    pub fn list(&self) -> SdkResult<Vec<ServerConfig>> {
        let ids = self.store.list()?;
        debug!(count = ids.len(), "Listing servers");

        Ok(ids
            .iter()
            .filter_map(|id| match self.store.load(id) {
                Ok(server) => Some(server),
                Err(e) => {
                    warn!(server_id = %id, error = %e, "Skipping unreadable server");
                    None
                }
            })
            .collect())
    }
}
