use chrono::{NaiveDate, NaiveDateTime};
use diesel::deserialize::{self, FromSql};
use diesel::pg::Pg;
use diesel::prelude::*;
use diesel::serialize::{self, Output, ToSql};
use diesel::sql_types::Text;
use diesel::{AsExpression, FromSqlRow};
use serde::{Deserialize, Serialize};
use std::io::Write;

/// Who a notice is addressed to
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
pub enum NoticeAudience {
    All,
    Faculty,
    Student,
}

impl diesel::query_builder::QueryId for NoticeAudience {
    type QueryId = NoticeAudience;
    const HAS_STATIC_QUERY_ID: bool = false;
}

impl ToSql<Text, Pg> for NoticeAudience {
    fn to_sql<'b>(&'b self, out: &mut Output<'b, '_, Pg>) -> serialize::Result {
        let s = match self {
            NoticeAudience::All => "all",
            NoticeAudience::Faculty => "faculty",
            NoticeAudience::Student => "student",
        };
        out.write_all(s.as_bytes())?;
        Ok(serialize::IsNull::No)
    }
}

impl FromSql<Text, Pg> for NoticeAudience {
    fn from_sql(
        bytes: <Pg as diesel::backend::Backend>::RawValue<'_>,
    ) -> deserialize::Result<Self> {
        let s = <String as FromSql<Text, Pg>>::from_sql(bytes)?;
        match s.as_str() {
            "all" => Ok(NoticeAudience::All),
            "faculty" => Ok(NoticeAudience::Faculty),
            "student" => Ok(NoticeAudience::Student),
            _ => Err(format!("Unrecognized notice_for: {}", s).into()),
        }
    }
}

#[derive(Debug, Clone, Queryable, Selectable, Serialize)]
#[diesel(table_name = crate::schema::notices)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Notice {
    pub id: i32,
    pub topic: String,
    pub content: String,
    pub notice_date: NaiveDate,
    pub author: String,
    pub notice_for: NoticeAudience,
    pub created_at: NaiveDateTime,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = crate::schema::notices)]
pub struct NewNotice {
    pub topic: String,
    pub content: String,
    pub notice_date: NaiveDate,
    pub author: String,
    pub notice_for: NoticeAudience,
}
