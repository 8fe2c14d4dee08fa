/// All entity primary keys are UUID v4.
///
/// Clients may pre-generate a project id before upload completes (idempotent
/// retry), so ids cannot be database serials.
pub type DbId = uuid::Uuid;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;
