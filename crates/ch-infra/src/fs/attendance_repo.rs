//! File-based attendance record repository.

use std::path::PathBuf;

use async_trait::async_trait;
use tracing::debug;

use ch_core::attendance::AttendanceRecord;
use ch_core::ids::{MeetingId, MemberId};
use ch_core::ports::AttendanceRepositoryPort;

use super::json_store::JsonFileStore;

pub const DEFAULT_ATTENDANCE_FILE: &str = "attendance.json";

pub struct FileAttendanceRepository {
    store: JsonFileStore<Vec<AttendanceRecord>>,
}

impl FileAttendanceRepository {
    pub fn new(file_path: PathBuf) -> Self {
        Self {
            store: JsonFileStore::new(file_path),
        }
    }

    pub fn with_defaults(base_dir: PathBuf) -> Self {
        Self::new(base_dir.join(DEFAULT_ATTENDANCE_FILE))
    }
}

#[async_trait]
impl AttendanceRepositoryPort for FileAttendanceRepository {
    /// One record per member and meeting; a later save overwrites.
    async fn save(&self, record: &AttendanceRecord) -> anyhow::Result<()> {
        self.store
            .update(|all| {
                all.retain(|r| {
                    !(r.meeting_id == record.meeting_id && r.member_id == record.member_id)
                });
                all.push(record.clone());
            })
            .await?;
        debug!(
            meeting_id = %record.meeting_id,
            member_id = %record.member_id,
            "attendance record saved"
        );
        Ok(())
    }

    async fn find(
        &self,
        meeting_id: &MeetingId,
        member_id: &MemberId,
    ) -> anyhow::Result<Option<AttendanceRecord>> {
        Ok(self
            .store
            .load()
            .await?
            .into_iter()
            .find(|r| &r.meeting_id == meeting_id && &r.member_id == member_id))
    }

    async fn list_for_meeting(&self, meeting_id: &MeetingId) -> anyhow::Result<Vec<AttendanceRecord>> {
        let mut records: Vec<_> = self
            .store
            .load()
            .await?
            .into_iter()
            .filter(|r| &r.meeting_id == meeting_id)
            .collect();
        records.sort_by_key(|r| r.marked_at);
        Ok(records)
    }
}
