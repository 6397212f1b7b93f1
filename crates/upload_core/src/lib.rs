//! Upload validation and classification client for the poultry disease
//! classifier web page.
//!
//! A [`PageSession`] holds the state of one page: the file the user picked,
//! the alerts on screen and the preview slot. Files pass through the
//! validation gate ([`gate::validate`]) before a [`ClassificationClient`] may
//! post them to `{base_url}/api/classify`.

pub mod alerts;
pub mod candidate;
pub mod client;
pub mod config;
pub mod gate;
pub mod preview;
pub mod session;

pub use alerts::{Alert, AlertBoard, AlertId, AlertLevel};
pub use candidate::{Content, UploadCandidate};
pub use client::{
    ClassificationClient, ClassificationFailure, ClassificationResult, HttpTransport, Transport,
    TransportError, TransportResponse,
};
pub use config::ClientConfig;
pub use gate::{
    ACCEPTED_MEDIA_TYPES, Inspection, MAX_UPLOAD_BYTES, RejectReason, ValidationVerdict, check,
    inspect, validate,
};
pub use preview::{Preview, PreviewSlot, PreviewTask};
pub use session::{PageLayout, PageSession, SubmitControl, SubmitError};
