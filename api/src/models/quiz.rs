use chrono::NaiveDateTime;
use diesel::prelude::*;
use serde::Serialize;

#[derive(Queryable, Selectable, Debug, Serialize, Clone)]
#[diesel(table_name = crate::schema::quiz_results)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct QuizResult {
    pub id: i32,
    pub email: Option<String>,
    pub answers: serde_json::Value,
    pub score: i32,
    pub created_at: NaiveDateTime,
}

#[derive(Insertable, Debug)]
#[diesel(table_name = crate::schema::quiz_results)]
pub struct NewQuizResult {
    pub email: Option<String>,
    pub answers: serde_json::Value,
    pub score: i32,
}
