use chrono::NaiveDateTime;
use diesel::prelude::*;
use serde::Serialize;

#[derive(Queryable, Selectable, Debug, Serialize, Clone)]
#[diesel(table_name = crate::schema::subscribers)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Subscriber {
    pub id: i32,
    pub email: String,
    pub locale: String,
    pub consent: bool,
    pub confirmed: bool,
    pub display_boost: i32,
    pub created_at: NaiveDateTime,
}

#[derive(Insertable, Debug)]
#[diesel(table_name = crate::schema::subscribers)]
pub struct NewSubscriber {
    pub email: String,
    pub locale: String,
    pub consent: bool,
    pub confirmed: bool,
    pub display_boost: i32,
}
