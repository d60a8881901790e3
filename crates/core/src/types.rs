/// All primary keys are PostgreSQL `UUID`s generated by the application.
///
/// User ids double as the subject identifier carried in access tokens.
pub type DbId = uuid::Uuid;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;
