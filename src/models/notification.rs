//! Notification log models.
//!
//! Every welcome message the notifier attempts leaves one row here, whether
//! delivery succeeded or not.

use chrono::NaiveDateTime;
use diesel::AsExpression;
use diesel::FromSqlRow;
use diesel::deserialize::{self, FromSql};
use diesel::pg::Pg;
use diesel::prelude::*;
use diesel::serialize::{self, Output, ToSql};
use diesel::sql_types::Text;
use serde::{Deserialize, Serialize};
use std::io::Write;

/// Status of a notification log entry
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    utoipa::ToSchema,
    AsExpression,
    FromSqlRow,
)]
#[diesel(sql_type = Text)]
#[serde(rename_all = "lowercase")]
pub enum NotificationStatus {
    Pending,
    Sent,
    Failed,
}

impl diesel::query_builder::QueryId for NotificationStatus {
    type QueryId = NotificationStatus;
    const HAS_STATIC_QUERY_ID: bool = false;
}

impl ToSql<Text, Pg> for NotificationStatus {
    fn to_sql<'b>(&'b self, out: &mut Output<'b, '_, Pg>) -> serialize::Result {
        let s = match self {
            NotificationStatus::Pending => "pending",
            NotificationStatus::Sent => "sent",
            NotificationStatus::Failed => "failed",
        };
        out.write_all(s.as_bytes())?;
        Ok(serialize::IsNull::No)
    }
}

impl FromSql<Text, Pg> for NotificationStatus {
    fn from_sql(
        bytes: <Pg as diesel::backend::Backend>::RawValue<'_>,
    ) -> deserialize::Result<Self> {
        let s = <String as FromSql<Text, Pg>>::from_sql(bytes)?;
        match s.as_str() {
            "pending" => Ok(NotificationStatus::Pending),
            "sent" => Ok(NotificationStatus::Sent),
            "failed" => Ok(NotificationStatus::Failed),
            _ => Err(format!("Unrecognized notification_status: {}", s).into()),
        }
    }
}

/// NotificationLog query model for SELECT operations
#[derive(Debug, Queryable, Selectable, Serialize, Clone)]
#[diesel(table_name = crate::schema::notification_logs)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct NotificationLog {
    pub id: i64,
    pub account_id: Option<i32>,
    pub provider: String,
    pub message: String,
    pub status: NotificationStatus,
    pub error_message: Option<String>,
    pub sent_at: NaiveDateTime,
}

/// NewNotificationLog insert model for INSERT operations
#[derive(Debug, Insertable, Clone)]
#[diesel(table_name = crate::schema::notification_logs)]
pub struct NewNotificationLog {
    pub account_id: Option<i32>,
    pub provider: String,
    pub message: String,
    pub status: NotificationStatus,
    pub error_message: Option<String>,
}
