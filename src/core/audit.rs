//! Deletion audit log - Snapshots of deleted sessions, kept for a limited time.
//!
//! Every session deletion appends one entry describing what was removed. The log
//! is advisory: writing it may fail without blocking the deletion, and entries
//! older than [`LOG_RETENTION_DAYS`] are purged by an externally scheduled call to
//! [`purge_expired_logs`].

use crate::{
    core::session::SessionSummary,
    entities::{DeletionLog, deletion_log},
    errors::Result,
};
use chrono::{DateTime, Duration, Utc};
use sea_orm::{QueryOrder, Set, prelude::*};

/// Default number of days a deletion log entry is kept.
pub const LOG_RETENTION_DAYS: i64 = 7;

/// Outcome of a purge run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PurgeResult {
    /// Number of entries removed
    pub deleted_count: u64,
    /// Timestamp of the oldest entry still present, if any
    pub oldest_remaining_log: Option<DateTime<Utc>>,
}

/// Rough device class derived from a user agent string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceKind {
    /// Phones
    Mobile,
    /// Tablets
    Tablet,
    /// Anything else that sent a user agent
    Desktop,
    /// No user agent was recorded
    Unknown,
}

impl DeviceKind {
    /// Classifies a user agent. Mobile markers win over tablet markers.
    #[must_use]
    pub fn from_user_agent(user_agent: Option<&str>) -> Self {
        match user_agent {
            None => Self::Unknown,
            Some(ua) if ua.contains("Mobile") || ua.contains("Android") => Self::Mobile,
            Some(ua) if ua.contains("iPad") || ua.contains("Tablet") => Self::Tablet,
            Some(_) => Self::Desktop,
        }
    }

    /// Display label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Mobile => "Mobile",
            Self::Tablet => "Tablet",
            Self::Desktop => "Desktop",
            Self::Unknown => "-",
        }
    }
}

/// Appends a log entry describing `summary`, which is about to be deleted.
pub async fn record_deletion(
    db: &DatabaseConnection,
    summary: &SessionSummary,
    user_agent: Option<&str>,
) -> Result<deletion_log::Model> {
    let entry = deletion_log::ActiveModel {
        deleted_session_id: Set(summary.session.id),
        nama_penimbang: Set(summary.session.pic_name.clone()),
        pemilik_barang: Set(summary.session.owner_name.clone()),
        total_berat_kg: Set(summary.total_weight),
        deleted_at: Set(Utc::now()),
        user_agent: Set(user_agent.map(str::to_string)),
        ..Default::default()
    };

    entry.insert(db).await.map_err(Into::into)
}

/// All log entries, newest first.
pub async fn get_activity_logs(db: &DatabaseConnection) -> Result<Vec<deletion_log::Model>> {
    DeletionLog::find()
        .order_by_desc(deletion_log::Column::DeletedAt)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Removes entries older than `retention_days` relative to `now`.
pub async fn purge_expired_logs(
    db: &DatabaseConnection,
    now: DateTime<Utc>,
    retention_days: i64,
) -> Result<PurgeResult> {
    let cutoff = now - Duration::days(retention_days);
    let deleted = DeletionLog::delete_many()
        .filter(deletion_log::Column::DeletedAt.lt(cutoff))
        .exec(db)
        .await?;

    let oldest_remaining_log = DeletionLog::find()
        .order_by_asc(deletion_log::Column::DeletedAt)
        .one(db)
        .await?
        .map(|entry| entry.deleted_at);

    tracing::info!(
        "Purged {} deletion log entries older than {}",
        deleted.rows_affected,
        cutoff
    );

    Ok(PurgeResult {
        deleted_count: deleted.rows_affected,
        oldest_remaining_log,
    })
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::float_cmp)]
    use super::*;
    use crate::test_utils::*;

    async fn insert_log(db: &DatabaseConnection, deleted_at: DateTime<Utc>) -> Result<deletion_log::Model> {
        deletion_log::ActiveModel {
            deleted_session_id: Set(Uuid::new_v4()),
            nama_penimbang: Set("Budi".to_string()),
            pemilik_barang: Set("CV Maju".to_string()),
            total_berat_kg: Set(1.0),
            deleted_at: Set(deleted_at),
            user_agent: Set(None),
            ..Default::default()
        }
        .insert(db)
        .await
        .map_err(Into::into)
    }

    #[test]
    fn test_device_kind_from_user_agent() {
        assert_eq!(DeviceKind::from_user_agent(None), DeviceKind::Unknown);
        assert_eq!(
            DeviceKind::from_user_agent(Some("Mozilla/5.0 (Linux; Android 14) Mobile Safari")),
            DeviceKind::Mobile
        );
        assert_eq!(
            DeviceKind::from_user_agent(Some("Mozilla/5.0 (iPad; CPU OS 17_0)")),
            DeviceKind::Tablet
        );
        assert_eq!(
            DeviceKind::from_user_agent(Some("Mozilla/5.0 (X11; Linux x86_64)")),
            DeviceKind::Desktop
        );
        assert_eq!(DeviceKind::Unknown.label(), "-");
    }

    #[tokio::test]
    async fn test_record_deletion_snapshots_session() -> Result<()> {
        let db = setup_test_db().await?;
        let pp = create_test_category(&db, "PP KOTOR").await?;
        let summary = create_test_session(&db, date(2025, 12, 1), &[(pp.id, 2.5), (pp.id, 1.5)]).await?;

        let entry = record_deletion(&db, &summary, Some("curl/8.0")).await?;
        assert_eq!(entry.deleted_session_id, summary.session.id);
        assert_eq!(entry.total_berat_kg, 4.0);
        assert_eq!(entry.user_agent.as_deref(), Some("curl/8.0"));
        Ok(())
    }

    #[tokio::test]
    async fn test_activity_logs_newest_first() -> Result<()> {
        let db = setup_test_db().await?;
        let now = Utc::now();
        let older = insert_log(&db, now - Duration::days(2)).await?;
        let newer = insert_log(&db, now - Duration::hours(1)).await?;

        let logs = get_activity_logs(&db).await?;
        assert_eq!(logs.len(), 2);
        assert_eq!(logs[0].id, newer.id);
        assert_eq!(logs[1].id, older.id);
        Ok(())
    }

    #[tokio::test]
    async fn test_purge_removes_only_expired_entries() -> Result<()> {
        let db = setup_test_db().await?;
        let now = Utc::now();
        insert_log(&db, now - Duration::days(10)).await?;
        insert_log(&db, now - Duration::days(8)).await?;
        let recent = insert_log(&db, now - Duration::days(6)).await?;
        insert_log(&db, now).await?;

        let result = purge_expired_logs(&db, now, LOG_RETENTION_DAYS).await?;
        assert_eq!(result.deleted_count, 2);
        assert_eq!(result.oldest_remaining_log, Some(recent.deleted_at));
        assert_eq!(get_activity_logs(&db).await?.len(), 2);

        let again = purge_expired_logs(&db, now, LOG_RETENTION_DAYS).await?;
        assert_eq!(again.deleted_count, 0);
        Ok(())
    }

    #[tokio::test]
    async fn test_purge_empty_log() -> Result<()> {
        let db = setup_test_db().await?;
        let result = purge_expired_logs(&db, Utc::now(), LOG_RETENTION_DAYS).await?;
        assert_eq!(result.deleted_count, 0);
        assert_eq!(result.oldest_remaining_log, None);
        Ok(())
    }
}
