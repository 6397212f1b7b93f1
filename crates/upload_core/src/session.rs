//! Per-page session state: the current candidate and the page elements that
//! react to selection, drag-and-drop and submission.

use crate::alerts::{Alert, AlertBoard, AlertId, AlertLevel};
use crate::candidate::UploadCandidate;
use crate::client::{
    ClassificationClient, ClassificationFailure, ClassificationResult, HttpTransport, Transport,
};
use crate::config::ClientConfig;
use crate::gate::{self, Inspection, ValidationVerdict};
use crate::preview::{Preview, PreviewSlot, PreviewTask};
use std::time::Instant;

pub const SUBMIT_LABEL: &str = "Classify";
pub const BUSY_LABEL: &str = "Analyzing...";

/// Which optional element roles the page provides. Missing roles make the
/// matching feedback a silent no-op.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageLayout {
    pub alert_container: bool,
    pub preview_slot: bool,
    pub submit_control: bool,
}

impl Default for PageLayout {
    fn default() -> Self {
        Self {
            alert_container: true,
            preview_slot: true,
            submit_control: true,
        }
    }
}

impl PageLayout {
    /// A page with none of the optional elements.
    pub fn bare() -> Self {
        Self {
            alert_container: false,
            preview_slot: false,
            submit_control: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitControl {
    pub label: String,
    pub disabled: bool,
}

impl Default for SubmitControl {
    fn default() -> Self {
        Self {
            label: SUBMIT_LABEL.to_string(),
            disabled: false,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SubmitError {
    #[error("no accepted file selected")]
    NoAcceptedCandidate,
    #[error(transparent)]
    Classification(#[from] ClassificationFailure),
}

#[derive(Debug)]
pub struct PageSession<T: Transport = HttpTransport> {
    client: ClassificationClient<T>,
    candidate: Option<UploadCandidate>,
    alerts: Option<AlertBoard>,
    preview: Option<PreviewSlot>,
    pending_preview: Option<PreviewTask>,
    submit: Option<SubmitControl>,
    drop_hover: bool,
    form_loading: bool,
}

impl PageSession<HttpTransport> {
    pub fn from_config(config: &ClientConfig, layout: PageLayout) -> Self {
        let client = ClassificationClient::new(config.base_url.clone());
        Self::new(client, layout, AlertBoard::new(config.alert_ttl()))
    }
}

impl<T: Transport> PageSession<T> {
    pub fn new(client: ClassificationClient<T>, layout: PageLayout, alerts: AlertBoard) -> Self {
        Self {
            client,
            candidate: None,
            alerts: layout.alert_container.then_some(alerts),
            preview: layout.preview_slot.then(PreviewSlot::default),
            pending_preview: None,
            submit: layout.submit_control.then(SubmitControl::default),
            drop_hover: false,
            form_loading: false,
        }
    }

    pub fn client(&self) -> &ClassificationClient<T> {
        &self.client
    }

    /// The accepted candidate awaiting submission, if any.
    pub fn candidate(&self) -> Option<&UploadCandidate> {
        self.candidate.as_ref()
    }

    /// Run a newly picked file through the gate. Accepted files replace the
    /// current candidate; rejected ones clear it and raise an alert.
    pub fn select_file(&mut self, candidate: UploadCandidate, now: Instant) -> ValidationVerdict {
        let Inspection { verdict, preview } = gate::inspect(&candidate);
        if let Some(stale) = self.pending_preview.take() {
            stale.abort();
        }
        match verdict {
            ValidationVerdict::Accepted => {
                tracing::info!(
                    file = candidate.file_name(),
                    size = candidate.byte_len(),
                    "candidate accepted"
                );
                self.candidate = Some(candidate);
                self.pending_preview = preview;
            }
            ValidationVerdict::Rejected(reason) => {
                self.candidate = None;
                self.show_alert(AlertLevel::Danger, reason.message(), now);
            }
        }
        verdict
    }

    /// Handle a drop onto the upload area. Only the first file counts;
    /// an empty drop changes nothing but the hover state.
    pub fn drop_files(
        &mut self,
        files: Vec<UploadCandidate>,
        now: Instant,
    ) -> Option<ValidationVerdict> {
        self.drop_hover = false;
        let first = files.into_iter().next()?;
        Some(self.select_file(first, now))
    }

    pub fn drag_over(&mut self) {
        self.drop_hover = true;
    }

    pub fn drag_leave(&mut self) {
        self.drop_hover = false;
    }

    pub fn is_drop_hover(&self) -> bool {
        self.drop_hover
    }

    /// Wait for the pending preview and render it into the slot when the
    /// page has one.
    pub async fn settle_preview(&mut self) -> Option<Preview> {
        let task = self.pending_preview.take()?;
        let preview = task.wait().await?;
        if let Some(slot) = self.preview.as_mut() {
            slot.show(&preview);
        }
        Some(preview)
    }

    pub fn preview_slot(&self) -> Option<&PreviewSlot> {
        self.preview.as_ref()
    }

    /// Feedback for the page's own form post: the submit control shows a
    /// busy label and locks. The post itself does not go through the client.
    pub fn submit_form(&mut self) -> bool {
        match self.submit.as_mut() {
            Some(control) => {
                control.label = BUSY_LABEL.to_string();
                control.disabled = true;
                self.form_loading = true;
                true
            }
            None => false,
        }
    }

    pub fn submit_control(&self) -> Option<&SubmitControl> {
        self.submit.as_ref()
    }

    pub fn is_form_loading(&self) -> bool {
        self.form_loading
    }

    /// Classify the current candidate. Never sends a file the gate did not accept.
    pub async fn classify_current(&self) -> Result<ClassificationResult, SubmitError> {
        let candidate = self
            .candidate
            .as_ref()
            .ok_or(SubmitError::NoAcceptedCandidate)?;
        Ok(self.client.classify(candidate).await?)
    }

    pub fn show_alert(
        &mut self,
        level: AlertLevel,
        message: impl Into<String>,
        now: Instant,
    ) -> Option<AlertId> {
        let board = self.alerts.as_mut()?;
        Some(board.push(level, message, now))
    }

    pub fn dismiss_alert(&mut self, id: AlertId) -> bool {
        self.alerts.as_mut().is_some_and(|b| b.dismiss(id))
    }

    pub fn expire_alerts(&mut self, now: Instant) -> usize {
        self.alerts.as_mut().map_or(0, |b| b.expire(now))
    }

    pub fn alerts(&self, now: Instant) -> Vec<&Alert> {
        match &self.alerts {
            Some(board) => board.visible(now).collect(),
            None => Vec::new(),
        }
    }
}
