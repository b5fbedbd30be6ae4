//! Engine-level commands behind the transport and the CLI.

use std::sync::Arc;

use shopgrade_core::errors::Result;

use super::preview::{DiffPreviewHandler, PreviewOutcome, PreviewRequest};
use super::publish::{PublishResponse, UpgradePublisher};
use super::runner::CommandRunner;
use crate::config::EngineConfig;

/// The two operator actions
#[derive(Debug, Clone)]
pub enum EngineCommand {
    /// Read-only diff preview for one shop
    PreviewDiff(PreviewRequest),
    /// Lock and rebuild one shop; `body` is the raw request body
    PublishUpgrade { shop_id: String, body: Vec<u8> },
}

/// Result of applying an engine command
#[derive(Debug, Clone)]
pub enum EngineCommandResult {
    Preview(PreviewOutcome),
    Publish(PublishResponse),
}

impl EngineCommandResult {
    pub fn status(&self) -> u16 {
        match self {
            EngineCommandResult::Preview(outcome) => outcome.status(),
            EngineCommandResult::Publish(response) => response.status(),
        }
    }

    pub fn body(&self) -> serde_json::Value {
        match self {
            EngineCommandResult::Preview(outcome) => outcome.body(),
            EngineCommandResult::Publish(response) => response.body(),
        }
    }
}

/// Preview handler and publisher wired from one configuration
#[derive(Debug)]
pub struct Engine {
    preview: DiffPreviewHandler,
    publisher: UpgradePublisher,
}

impl Engine {
    pub fn new(config: EngineConfig, runner: Arc<dyn CommandRunner>) -> Self {
        Self {
            preview: DiffPreviewHandler::new(config.layout(), config.guard()),
            publisher: UpgradePublisher::new(config, runner),
        }
    }

    pub fn preview(&self) -> &DiffPreviewHandler {
        &self.preview
    }

    pub fn publisher(&self) -> &UpgradePublisher {
        &self.publisher
    }

    /// Apply one command
    ///
    /// # Errors
    ///
    /// Only hard preview failures; publish failures are carried in
    /// [`PublishResponse::Failed`].
    pub fn apply(&self, cmd: EngineCommand) -> Result<EngineCommandResult> {
        match cmd {
            EngineCommand::PreviewDiff(request) => {
                self.preview.handle(&request).map(EngineCommandResult::Preview)
            }
            EngineCommand::PublishUpgrade { shop_id, body } => Ok(EngineCommandResult::Publish(
                self.publisher.handle(&shop_id, &body),
            )),
        }
    }
}
