//! Client invitations.
//!
//! Sending is a staged simulation: each stage waits for its configured delay
//! and is reported on a watch channel so a UI can show a progress line.
//! Nothing is stored until every stage has completed.

use std::sync::LazyLock;
use std::time::Duration;
use chrono::Utc;
use fynkr_core::{
    AccessLevel, ClientInvitation, InvitationId, InvitationStatus, ValidationError,
    INVITE_VALIDITY_DAYS,
};
use fynkr_storage::{keys, load_collection, save_collection, KvStore};
use regex::Regex;
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};
use crate::{Result, WorkError};

/// One `@` with something on both sides and no whitespace.
static EMAIL_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^@\s]+@[^@\s]+$").expect("email pattern compiles"));

/// Form input for a new invitation.
#[derive(Debug, Clone, Default)]
pub struct InviteRequest {
    /// Required
    pub client_name: String,
    /// Required; must look like `name@host`
    pub client_email: String,
    /// Required
    pub project_name: String,
    /// Optional note shown to the client
    pub message: String,
    /// What the client may do in the shared view
    pub access_level: AccessLevel,
}

impl InviteRequest {
    /// Check required fields and the email shape.
    pub fn validate(&self) -> std::result::Result<(), ValidationError> {
        for (field, value) in [
            ("client name", &self.client_name),
            ("client email", &self.client_email),
            ("project name", &self.project_name),
        ] {
            if value.trim().is_empty() {
                return Err(ValidationError::Required { field });
            }
        }

        let email = self.client_email.trim();
        if !EMAIL_PATTERN.is_match(email) {
            return Err(ValidationError::InvalidEmail(email.to_string()));
        }
        Ok(())
    }
}

/// Where a send is up to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InviteStage {
    /// No send in flight.
    Idle,
    /// Validating and assembling the invitation.
    Preparing,
    /// Building the access link.
    GeneratingLink,
    /// Delivering the email.
    Sending,
    /// Stored and delivered.
    Sent,
    /// Aborted before anything was stored.
    Cancelled,
}

impl std::fmt::Display for InviteStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            InviteStage::Idle => "Idle",
            InviteStage::Preparing => "Preparing invitation...",
            InviteStage::GeneratingLink => "Generating secure access link...",
            InviteStage::Sending => "Sending email invitation...",
            InviteStage::Sent => "Invitation sent",
            InviteStage::Cancelled => "Invitation cancelled",
        })
    }
}

/// Simulated duration of each send stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InviteTimings {
    /// Delay of [`InviteStage::Preparing`]
    pub preparing: Duration,
    /// Delay of [`InviteStage::GeneratingLink`]
    pub generating_link: Duration,
    /// Delay of [`InviteStage::Sending`]
    pub sending: Duration,
}

impl Default for InviteTimings {
    fn default() -> Self {
        Self {
            preparing: Duration::from_millis(1000),
            generating_link: Duration::from_millis(1000),
            sending: Duration::from_millis(1500),
        }
    }
}

impl InviteTimings {
    /// Every stage completes immediately.
    pub fn instant() -> Self {
        Self {
            preparing: Duration::ZERO,
            generating_link: Duration::ZERO,
            sending: Duration::ZERO,
        }
    }
}

/// Sends and lists client invitations.
pub struct InvitationService<S: KvStore> {
    store: S,
    base_url: String,
    timings: InviteTimings,
    stage: watch::Sender<InviteStage>,
}

impl<S: KvStore> InvitationService<S> {
    /// Create a service issuing links under `base_url`.
    pub fn new(store: S, base_url: impl Into<String>) -> Self {
        let (stage, _) = watch::channel(InviteStage::Idle);
        Self {
            store,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            timings: InviteTimings::default(),
            stage,
        }
    }

    /// Override stage delays.
    pub fn with_timings(mut self, timings: InviteTimings) -> Self {
        self.timings = timings;
        self
    }

    /// Watch the stage of the current send.
    pub fn subscribe(&self) -> watch::Receiver<InviteStage> {
        self.stage.subscribe()
    }

    /// Stored invitations, oldest first.
    pub async fn list(&self) -> Vec<ClientInvitation> {
        load_collection(&self.store, keys::CLIENT_INVITATIONS).await
    }

    /// Validate, run the send stages, then store the invitation.
    ///
    /// Cancelling during any stage stores nothing and returns
    /// [`WorkError::Cancelled`].
    pub async fn send(&mut self, request: InviteRequest, cancel: &CancellationToken) -> Result<ClientInvitation> {
        request.validate()?;

        let stages = [
            (InviteStage::Preparing, self.timings.preparing),
            (InviteStage::GeneratingLink, self.timings.generating_link),
            (InviteStage::Sending, self.timings.sending),
        ];
        for (stage, delay) in stages {
            self.stage.send_replace(stage);
            debug!(%stage, "invite stage");
            tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    self.stage.send_replace(InviteStage::Cancelled);
                    info!(client = %request.client_name, "invitation cancelled");
                    return Err(WorkError::Cancelled);
                }
                _ = tokio::time::sleep(delay) => {}
            }
        }

        let id = InvitationId::new();
        let invited_at = Utc::now();
        let invitation = ClientInvitation {
            id,
            client_name: request.client_name.trim().to_string(),
            client_email: request.client_email.trim().to_string(),
            project_name: request.project_name.trim().to_string(),
            message: request.message,
            access_level: request.access_level,
            status: InvitationStatus::Sent,
            invited_at,
            invite_link: format!("{}/client/{}", self.base_url, id.to_string().to_lowercase()),
            expires_at: invited_at + chrono::Duration::days(INVITE_VALIDITY_DAYS),
            email_sent: true,
        };

        let mut invitations: Vec<ClientInvitation> = self.list().await;
        invitations.push(invitation.clone());
        if let Err(e) = save_collection(&mut self.store, keys::CLIENT_INVITATIONS, &invitations).await {
            self.stage.send_replace(InviteStage::Idle);
            return Err(e.into());
        }

        self.stage.send_replace(InviteStage::Sent);
        info!(invitation_id = %invitation.id, client = %invitation.client_name, "invitation sent");
        Ok(invitation)
    }
}

/// Suggested invitation text. Missing names are left as placeholders.
pub fn sample_message(client_name: &str, project_name: &str) -> String {
    let client = non_blank(client_name).unwrap_or("[Client Name]");
    let project = non_blank(project_name).unwrap_or("[Project Name]");
    format!(
        "Hi {client},\n\n\
         I've set up a professional dashboard where you can track the real-time progress of your {project} project.\n\n\
         You'll be able to see:\n\
         - Task completion status\n\
         - Project milestones\n\
         - Live deployment links\n\
         - Payment schedules\n\n\
         This keeps you informed every step of the way!\n\n\
         Best regards,\n\
         Your Fynkr Team"
    )
}

fn non_blank(value: &str) -> Option<&str> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then_some(trimmed)
}
