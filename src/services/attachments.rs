//! Survey attachment capture: a session-owned upload queue and the
//! permission -> location -> upload flow as an explicit state machine.

use crate::error::{AppError, Result};
use crate::geometry::Geofence;
use crate::models::Coordinates;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use tokio_util::sync::CancellationToken;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttachmentMetadata {
    pub file_name: String,
    pub content_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub captured_at: Option<Coordinates>,
}

/// Attachment storage. Returns the URL of the stored file.
#[async_trait]
pub trait FileUploader: Send + Sync {
    async fn upload_file(&self, bytes: &[u8], metadata: &AttachmentMetadata) -> Result<String>;
}

#[derive(Debug, Clone)]
pub struct UploadTask {
    pub id: u64,
    pub bytes: Vec<u8>,
    pub metadata: AttachmentMetadata,
    pub attempts: u32,
}

#[derive(Debug, Default)]
pub struct DrainReport {
    /// (task id, stored URL)
    pub uploaded: Vec<(u64, String)>,
    /// (task id, error message); these tasks stay queued.
    pub failed: Vec<(u64, String)>,
    pub cancelled: bool,
}

/// Pending uploads of one capture session. Owned by that session, never shared.
#[derive(Debug, Default)]
pub struct UploadQueue {
    pending: VecDeque<UploadTask>,
    next_id: u64,
}

impl UploadQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn enqueue(&mut self, bytes: Vec<u8>, metadata: AttachmentMetadata) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        self.pending.push_back(UploadTask {
            id,
            bytes,
            metadata,
            attempts: 0,
        });
        id
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn pending_ids(&self) -> Vec<u64> {
        self.pending.iter().map(|task| task.id).collect()
    }

    /// Uploads every task queued at call time, in order. Failed tasks go back
    /// to the end of the queue for the next drain. Stops between tasks once
    /// `cancel` fires; the remaining tasks stay queued.
    pub async fn drain(
        &mut self,
        uploader: &dyn FileUploader,
        cancel: &CancellationToken,
    ) -> DrainReport {
        let mut report = DrainReport::default();
        let mut retry = Vec::new();

        for _ in 0..self.pending.len() {
            if cancel.is_cancelled() {
                report.cancelled = true;
                break;
            }
            let Some(mut task) = self.pending.pop_front() else {
                break;
            };
            task.attempts += 1;

            match uploader.upload_file(&task.bytes, &task.metadata).await {
                Ok(url) => {
                    tracing::debug!(task_id = task.id, url = %url, "Attachment uploaded");
                    report.uploaded.push((task.id, url));
                }
                Err(e) => {
                    tracing::warn!(
                        task_id = task.id,
                        attempts = task.attempts,
                        error = %e,
                        "Attachment upload failed, keeping it queued"
                    );
                    report.failed.push((task.id, e.to_string()));
                    retry.push(task);
                }
            }
        }

        self.pending.extend(retry);
        report
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CaptureState {
    Idle,
    RequestingPermission,
    FetchingLocation,
    Uploading { location: Coordinates },
    Done { location: Coordinates },
    Failed { reason: String },
}

#[derive(Debug, Clone, PartialEq)]
pub enum CaptureEvent {
    Start,
    PermissionGranted,
    PermissionDenied,
    LocationFixed(Coordinates),
    LocationUnavailable(String),
    UploadsFinished,
    UploadFailed(String),
    Reset,
}

/// Check-in / capture flow for one surveyor session.
///
/// `Idle -> RequestingPermission -> FetchingLocation -> Uploading -> Done`,
/// with `Failed` reachable from every active state. A location fix outside
/// the assigned geofence fails the flow.
#[derive(Debug, Clone)]
pub struct CaptureFlow {
    state: CaptureState,
    geofence: Option<Geofence>,
}

impl CaptureFlow {
    pub fn new(geofence: Option<Geofence>) -> Self {
        CaptureFlow {
            state: CaptureState::Idle,
            geofence,
        }
    }

    pub fn state(&self) -> &CaptureState {
        &self.state
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self.state, CaptureState::Done { .. } | CaptureState::Failed { .. })
    }

    /// Applies an event. Invalid transitions leave the state untouched.
    pub fn advance(&mut self, event: CaptureEvent) -> Result<&CaptureState> {
        let next = match (&self.state, event) {
            (_, CaptureEvent::Reset) => CaptureState::Idle,
            (CaptureState::Idle, CaptureEvent::Start) => CaptureState::RequestingPermission,
            (CaptureState::RequestingPermission, CaptureEvent::PermissionGranted) => {
                CaptureState::FetchingLocation
            }
            (CaptureState::RequestingPermission, CaptureEvent::PermissionDenied) => {
                CaptureState::Failed {
                    reason: "Location permission denied".to_string(),
                }
            }
            (CaptureState::FetchingLocation, CaptureEvent::LocationFixed(location)) => {
                match &self.geofence {
                    Some(fence) if !fence.contains(&location) => CaptureState::Failed {
                        reason: format!("Location {} is outside the assigned area", location),
                    },
                    _ => CaptureState::Uploading { location },
                }
            }
            (CaptureState::FetchingLocation, CaptureEvent::LocationUnavailable(reason)) => {
                CaptureState::Failed { reason }
            }
            (CaptureState::Uploading { location }, CaptureEvent::UploadsFinished) => {
                CaptureState::Done {
                    location: *location,
                }
            }
            (CaptureState::Uploading { .. }, CaptureEvent::UploadFailed(reason)) => {
                CaptureState::Failed { reason }
            }
            (state, event) => {
                return Err(AppError::InvalidTransition(format!(
                    "{:?} does not accept {:?}",
                    state, event
                )));
            }
        };

        tracing::debug!(from = ?self.state, to = ?next, "Capture state transition");
        self.state = next;
        Ok(&self.state)
    }
}
