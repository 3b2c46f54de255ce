use chrono::NaiveDate;

pub fn parse_date_any(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(s, "%Y/%m/%d"))
        .ok()
}

pub fn today() -> NaiveDate {
    chrono::Utc::now().date_naive()
}

pub fn iso(d: &NaiveDate) -> String {
    d.format("%Y-%m-%d").to_string()
}
