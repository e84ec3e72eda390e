use async_trait::async_trait;
use tracing::info;

use crate::sync::RecordSynchronizer;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Permission {
    Granted,
    Denied,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PickResult {
    Picked { uri: String },
    Cancelled,
}

/// Platform media services: permission prompt, photo library, camera.
#[async_trait]
pub trait MediaService: Send + Sync {
    async fn request_media_access(&self) -> Permission;
    async fn pick_image(&self) -> PickResult;
    async fn capture_image(&self) -> PickResult;
}

/// How a capture step ended. Neither `Denied` nor `Cancelled` is an error;
/// the add flow simply does not advance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CaptureOutcome {
    Selected(String),
    Denied,
    Cancelled,
}

impl CaptureOutcome {
    pub fn is_selected(&self) -> bool {
        matches!(self, CaptureOutcome::Selected(_))
    }
}

/// Drives the media service on behalf of one screen and feeds the chosen
/// photo into that screen's draft.
pub struct CaptureFlow<M> {
    media: M,
}

impl<M: MediaService> CaptureFlow<M> {
    pub fn new(media: M) -> Self {
        Self { media }
    }

    pub fn media(&self) -> &M {
        &self.media
    }

    /// Asks for library access before the add form opens. `true` means the
    /// form may be shown.
    pub async fn begin(&self, screen: &RecordSynchronizer) -> bool {
        match self.media.request_media_access().await {
            Permission::Granted => true,
            Permission::Denied => {
                info!(
                    target: "keepsake",
                    event = "capture_denied",
                    table = screen.schema().table,
                    step = "begin"
                );
                false
            }
        }
    }

    /// Picks an existing photo from the library.
    pub async fn choose_image(&self, screen: &RecordSynchronizer) -> CaptureOutcome {
        let result = self.media.pick_image().await;
        self.apply(screen, "choose", result).await
    }

    /// Takes a new photo. Access is requested again because the camera
    /// result lands in the library.
    pub async fn take_image(&self, screen: &RecordSynchronizer) -> CaptureOutcome {
        if self.media.request_media_access().await == Permission::Denied {
            info!(
                target: "keepsake",
                event = "capture_denied",
                table = screen.schema().table,
                step = "take"
            );
            return CaptureOutcome::Denied;
        }
        let result = self.media.capture_image().await;
        self.apply(screen, "take", result).await
    }

    async fn apply(
        &self,
        screen: &RecordSynchronizer,
        step: &'static str,
        result: PickResult,
    ) -> CaptureOutcome {
        match result {
            PickResult::Picked { uri } => {
                screen.attach_media(uri.clone()).await;
                CaptureOutcome::Selected(uri)
            }
            PickResult::Cancelled => {
                info!(
                    target: "keepsake",
                    event = "capture_cancelled",
                    table = screen.schema().table,
                    step
                );
                CaptureOutcome::Cancelled
            }
        }
    }
}

/// A media service with a fixed answer: always grants access and hands back
/// the same reference, or cancels when there is none.
#[derive(Debug, Clone, Default)]
pub struct PresetMedia {
    uri: Option<String>,
}

impl PresetMedia {
    pub fn new(uri: impl Into<String>) -> Self {
        Self {
            uri: Some(uri.into()),
        }
    }

    pub fn cancelling() -> Self {
        Self { uri: None }
    }

    fn result(&self) -> PickResult {
        match &self.uri {
            Some(uri) => PickResult::Picked { uri: uri.clone() },
            None => PickResult::Cancelled,
        }
    }
}

#[async_trait]
impl MediaService for PresetMedia {
    async fn request_media_access(&self) -> Permission {
        Permission::Granted
    }

    async fn pick_image(&self) -> PickResult {
        self.result()
    }

    async fn capture_image(&self) -> PickResult {
        self.result()
    }
}
