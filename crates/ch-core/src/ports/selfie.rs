use async_trait::async_trait;

use crate::attendance::SelfieRef;
use crate::ids::{MeetingId, MemberId};

/// Camera pipeline used to confirm an attendance with a selfie.
#[async_trait]
pub trait SelfieCapturePort: Send + Sync {
    /// Returns `None` when the member dismissed the camera.
    async fn capture(
        &self,
        meeting_id: &MeetingId,
        member_id: &MemberId,
    ) -> anyhow::Result<Option<SelfieRef>>;
}
