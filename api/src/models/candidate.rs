use chrono::NaiveDateTime;
use diesel::prelude::*;
use serde::Serialize;

#[derive(Queryable, Selectable, Debug, Serialize, Clone)]
#[diesel(table_name = crate::schema::pending_candidates)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct PendingCandidate {
    pub id: i32,
    pub url: String,
    pub title: String,
    pub snippet: Option<String>,
    pub source_name: Option<String>,
    pub region: Option<String>,
    pub used: bool,
    pub created_at: NaiveDateTime,
}

#[derive(Insertable, Debug)]
#[diesel(table_name = crate::schema::pending_candidates)]
pub struct NewPendingCandidate {
    pub url: String,
    pub title: String,
    pub snippet: Option<String>,
    pub source_name: Option<String>,
    pub region: Option<String>,
}
