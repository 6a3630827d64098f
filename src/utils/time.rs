use chrono::{DateTime, Datelike, NaiveDate, Utc};

pub fn now() -> DateTime<Utc> {
    Utc::now()
}

pub fn today() -> NaiveDate {
    now().date_naive()
}

pub fn current_year() -> i32 {
    now().year()
}
