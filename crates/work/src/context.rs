//! Application context.
//!
//! The one place user preferences live. Readers take a snapshot or subscribe;
//! every change goes through [`AppContext::update`], which persists before
//! notifying.

use fynkr_core::{Settings, UserProfile};
use fynkr_storage::{keys, load_document, save_document, KvStore};
use tokio::sync::watch;
use tracing::info;
use crate::Result;

/// Shared settings with change notification.
pub struct AppContext<S: KvStore> {
    store: S,
    settings: watch::Sender<Settings>,
}

impl<S: KvStore> AppContext<S> {
    /// Load stored settings, defaults if none.
    pub async fn load(store: S) -> Self {
        let settings: Settings = load_document(&store, keys::SETTINGS).await;
        let (settings, _) = watch::channel(settings);
        Self { store, settings }
    }

    /// Current settings.
    pub fn snapshot(&self) -> Settings {
        self.settings.borrow().clone()
    }

    /// Receive every committed change.
    pub fn subscribe(&self) -> watch::Receiver<Settings> {
        self.settings.subscribe()
    }

    /// Apply `change`, persist, then publish. Subscribers see nothing if the
    /// write fails.
    pub async fn update<F>(&mut self, change: F) -> Result<Settings>
    where
        F: FnOnce(&mut Settings),
    {
        let mut next = self.snapshot();
        change(&mut next);
        save_document(&mut self.store, keys::SETTINGS, &next).await?;
        self.settings.send_replace(next.clone());
        Ok(next)
    }

    /// Flip dark mode; returns the new value.
    pub async fn toggle_dark_mode(&mut self) -> Result<bool> {
        let settings = self.update(|s| s.dark_mode = !s.dark_mode).await?;
        info!(dark_mode = settings.dark_mode, "theme changed");
        Ok(settings.dark_mode)
    }

    /// Set or clear the signed-in freelancer.
    pub async fn set_current_user(&mut self, user: Option<UserProfile>) -> Result<Settings> {
        self.update(|s| s.current_user = user).await
    }
}
