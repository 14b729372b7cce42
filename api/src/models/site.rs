use chrono::NaiveDateTime;
use diesel::prelude::*;
use serde::Serialize;

#[derive(Queryable, Selectable, Debug, Serialize, Clone)]
#[diesel(table_name = crate::schema::preferred_sites)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct PreferredSite {
    pub id: i32,
    pub domain: String,
    pub name: String,
    pub active: bool,
    pub created_at: NaiveDateTime,
}

#[derive(Insertable, Debug)]
#[diesel(table_name = crate::schema::preferred_sites)]
pub struct NewPreferredSite {
    pub domain: String,
    pub name: String,
    pub active: bool,
}
