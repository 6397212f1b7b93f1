//! Client-side validation in front of the classification endpoint.

use crate::candidate::UploadCandidate;
use crate::preview::{self, PreviewTask};
use serde::{Deserialize, Serialize};

/// Declared media types accepted for upload. Matched exactly, case-sensitive.
pub const ACCEPTED_MEDIA_TYPES: [&str; 4] = ["image/png", "image/jpeg", "image/jpg", "image/gif"];

/// Upload ceiling in bytes (16 MiB, inclusive).
pub const MAX_UPLOAD_BYTES: u64 = 16 * 1024 * 1024;

/// Why a candidate was turned away.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RejectReason {
    InvalidType,
    TooLarge,
}

impl RejectReason {
    /// Message shown to the user for this rejection.
    pub fn message(self) -> &'static str {
        match self {
            RejectReason::InvalidType => {
                "Invalid file type. Please upload PNG, JPG, JPEG, or GIF files."
            }
            RejectReason::TooLarge => "File too large. Please upload files smaller than 16MB.",
        }
    }
}

/// Outcome of validating a candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "verdict", content = "reason", rename_all = "snake_case")]
pub enum ValidationVerdict {
    Accepted,
    Rejected(RejectReason),
}

impl ValidationVerdict {
    pub fn is_accepted(&self) -> bool {
        matches!(self, ValidationVerdict::Accepted)
    }

    pub fn reason(&self) -> Option<RejectReason> {
        match self {
            ValidationVerdict::Accepted => None,
            ValidationVerdict::Rejected(reason) => Some(*reason),
        }
    }
}

/// Pure validation over the declared facts of a file. Type is checked
/// before size, so a file failing both reports `InvalidType`.
pub fn check(media_type: &str, byte_len: u64) -> ValidationVerdict {
    if !ACCEPTED_MEDIA_TYPES.contains(&media_type) {
        return ValidationVerdict::Rejected(RejectReason::InvalidType);
    }
    if byte_len > MAX_UPLOAD_BYTES {
        return ValidationVerdict::Rejected(RejectReason::TooLarge);
    }
    ValidationVerdict::Accepted
}

pub fn validate(candidate: &UploadCandidate) -> ValidationVerdict {
    check(candidate.media_type(), candidate.byte_len())
}

/// Verdict plus the preview started for an accepted candidate.
#[derive(Debug)]
pub struct Inspection {
    pub verdict: ValidationVerdict,
    /// Present only when the candidate was accepted and a runtime was
    /// available to read it. Its outcome never affects `verdict`.
    pub preview: Option<PreviewTask>,
}

/// Validate a candidate and, on acceptance, start reading it into a preview.
pub fn inspect(candidate: &UploadCandidate) -> Inspection {
    let verdict = validate(candidate);
    let preview = match verdict {
        ValidationVerdict::Accepted => preview::spawn(candidate.clone()),
        ValidationVerdict::Rejected(reason) => {
            tracing::debug!(
                file = candidate.file_name(),
                media_type = candidate.media_type(),
                size = candidate.byte_len(),
                ?reason,
                "candidate rejected"
            );
            None
        }
    };
    Inspection { verdict, preview }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("image/png")]
    #[case("image/jpeg")]
    #[case("image/jpg")]
    #[case("image/gif")]
    fn accepted_types_within_limit_pass(#[case] media_type: &str) {
        assert_eq!(check(media_type, 0), ValidationVerdict::Accepted);
        assert_eq!(check(media_type, 1024), ValidationVerdict::Accepted);
        assert_eq!(check(media_type, MAX_UPLOAD_BYTES), ValidationVerdict::Accepted);
    }

    #[rstest]
    #[case("image/PNG")]
    #[case("IMAGE/JPEG")]
    #[case("image/webp")]
    #[case("image/bmp")]
    #[case("application/pdf")]
    #[case("")]
    #[case(" image/png")]
    fn other_types_are_invalid_regardless_of_size(#[case] media_type: &str) {
        for size in [0, 10, MAX_UPLOAD_BYTES, MAX_UPLOAD_BYTES + 1, u64::MAX] {
            assert_eq!(
                check(media_type, size),
                ValidationVerdict::Rejected(RejectReason::InvalidType)
            );
        }
    }

    #[rstest]
    #[case(MAX_UPLOAD_BYTES + 1)]
    #[case(32 * 1024 * 1024)]
    #[case(u64::MAX)]
    fn oversized_accepted_type_is_too_large(#[case] size: u64) {
        assert_eq!(
            check("image/gif", size),
            ValidationVerdict::Rejected(RejectReason::TooLarge)
        );
    }

    #[test]
    fn boundary_uses_real_buffer_length() {
        let exact = UploadCandidate::from_bytes(
            "big.png",
            "image/png",
            vec![0u8; MAX_UPLOAD_BYTES as usize],
        );
        assert!(validate(&exact).is_accepted());

        let over = UploadCandidate::from_bytes(
            "bigger.png",
            "image/png",
            vec![0u8; MAX_UPLOAD_BYTES as usize + 1],
        );
        assert_eq!(validate(&over).reason(), Some(RejectReason::TooLarge));
    }

    #[test]
    fn verdict_serializes_with_wire_reason_names() -> anyhow::Result<()> {
        let rejected = ValidationVerdict::Rejected(RejectReason::TooLarge);
        assert_eq!(
            serde_json::to_value(rejected)?,
            serde_json::json!({"verdict": "rejected", "reason": "too_large"})
        );
        assert_eq!(
            serde_json::to_value(ValidationVerdict::Accepted)?,
            serde_json::json!({"verdict": "accepted"})
        );
        assert_eq!(
            serde_json::to_value(RejectReason::InvalidType)?,
            serde_json::json!("invalid_type")
        );
        Ok(())
    }

    #[test]
    fn inspect_without_runtime_skips_preview() {
        let c = UploadCandidate::from_bytes("a.png", "image/png", vec![1u8]);
        let inspection = inspect(&c);
        assert!(inspection.verdict.is_accepted());
        assert!(inspection.preview.is_none());
    }

    #[tokio::test]
    async fn inspect_rejection_never_starts_preview() {
        let c = UploadCandidate::from_bytes("a.txt", "text/plain", vec![1u8]);
        let inspection = inspect(&c);
        assert_eq!(inspection.verdict.reason(), Some(RejectReason::InvalidType));
        assert!(inspection.preview.is_none());
    }

    #[tokio::test]
    async fn inspect_acceptance_yields_preview() {
        let c = UploadCandidate::from_bytes("a.gif", "image/gif", b"GIF89a".to_vec());
        let inspection = inspect(&c);
        assert!(inspection.verdict.is_accepted());
        let preview = inspection
            .preview
            .expect("preview task should start")
            .wait()
            .await
            .expect("in-memory read should succeed");
        assert_eq!(preview.data_url, "data:image/gif;base64,R0lGODlh");
    }
}
