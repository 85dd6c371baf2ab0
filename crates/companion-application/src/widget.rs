//! Widget lifecycle.

use crate::session_controller::SessionController;
use companion_core::chat::ChatRepository;
use companion_core::config::WidgetConfig;
use companion_core::error::{CompanionError, Result};
use companion_infrastructure::InMemoryChatRepository;
use std::sync::Arc;

/// One embedded widget instance.
///
/// Holds the configuration and, between `init` and `destroy`, the session.
/// The session state lives exactly as long as the widget is initialized.
pub struct CompanionWidget {
    config: WidgetConfig,
    session: Option<SessionController>,
}

impl CompanionWidget {
    /// Creates an uninitialized widget with the default configuration.
    pub fn new() -> Self {
        Self {
            config: WidgetConfig::default(),
            session: None,
        }
    }

    /// Initializes the widget with a fresh session.
    ///
    /// # Errors
    ///
    /// - `Config` if `config` does not validate
    /// - `InvalidState` if the widget is already initialized
    pub fn init(
        &mut self,
        config: WidgetConfig,
        repository: Arc<dyn ChatRepository>,
    ) -> Result<()> {
        if self.session.is_some() {
            return Err(CompanionError::invalid_state("widget is already initialized"));
        }
        config.validate()?;

        self.session = Some(SessionController::new(repository, &config));
        tracing::info!(api_base_url = %config.api_base_url, "Widget initialized");
        self.config = config;
        Ok(())
    }

    /// Initializes the widget over an empty in-memory chat history.
    pub fn init_in_memory(&mut self, config: WidgetConfig) -> Result<()> {
        self.init(config, Arc::new(InMemoryChatRepository::new()))
    }

    /// Tears the session down. Returns `false` if there was nothing to
    /// destroy.
    pub fn destroy(&mut self) -> bool {
        let destroyed = self.session.take().is_some();
        if destroyed {
            tracing::info!("Widget destroyed");
        }
        destroyed
    }

    pub fn is_initialized(&self) -> bool {
        self.session.is_some()
    }

    pub fn get_config(&self) -> WidgetConfig {
        self.config.clone()
    }

    /// Replaces the configuration. A live session picks up the new policy
    /// settings immediately; its selection and active chat are kept.
    pub fn update_config(&mut self, config: WidgetConfig) -> Result<()> {
        config.validate()?;
        if let Some(session) = self.session.as_mut() {
            session.apply_config(&config);
        }
        tracing::debug!(?config, "Widget config updated");
        self.config = config;
        Ok(())
    }

    pub fn session(&self) -> Result<&SessionController> {
        self.session.as_ref().ok_or_else(not_initialized)
    }

    pub fn session_mut(&mut self) -> Result<&mut SessionController> {
        self.session.as_mut().ok_or_else(not_initialized)
    }
}

impl Default for CompanionWidget {
    fn default() -> Self {
        Self::new()
    }
}

fn not_initialized() -> CompanionError {
    CompanionError::invalid_state("widget is not initialized")
}
