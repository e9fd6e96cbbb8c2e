//! 时间工具函数
//!
//! 所有日期→时间戳转换统一在 API handler 层完成，
//! repository 层只接收 `i64` Unix millis。

use chrono::{DateTime, NaiveDate, Utc};

use super::{AppError, AppResult};

/// 当前时间 Unix millis
pub fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}

/// 解析日期字符串 (YYYY-MM-DD)
pub fn parse_date(date: &str) -> AppResult<NaiveDate> {
    NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .map_err(|_| AppError::validation(format!("Invalid date format: {}", date)))
}

/// 日期开始 (00:00:00 UTC) → Unix millis
pub fn day_start_millis(date: NaiveDate) -> i64 {
    date.and_hms_opt(0, 0, 0)
        .map(|naive| naive.and_utc().timestamp_millis())
        .unwrap_or(0)
}

/// 日期结束 → 次日 00:00:00 的 Unix millis
///
/// 返回次日零点时间戳，调用方使用 `< end` (不含) 语义。
pub fn day_end_millis(date: NaiveDate) -> i64 {
    let next_day = date.succ_opt().unwrap_or(date);
    day_start_millis(next_day)
}

/// Unix millis → 日期字符串 (YYYY-MM-DD)
pub fn millis_to_date_string(millis: i64) -> String {
    DateTime::<Utc>::from_timestamp_millis(millis)
        .map(|dt| dt.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| "unknown date".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_valid_date() {
        let d = parse_date("2026-03-15").unwrap();
        assert_eq!(d.to_string(), "2026-03-15");
    }

    #[test]
    fn parse_invalid_date_fails() {
        assert!(parse_date("15/03/2026").is_err());
        assert!(parse_date("not-a-date").is_err());
    }

    #[test]
    fn day_bounds_are_half_open() {
        let d = parse_date("2026-03-15").unwrap();
        let start = day_start_millis(d);
        let end = day_end_millis(d);
        assert_eq!(end - start, 24 * 3600 * 1000);
    }

    #[test]
    fn millis_round_trip_to_date_string() {
        let d = parse_date("2026-03-15").unwrap();
        let start = day_start_millis(d);
        assert_eq!(millis_to_date_string(start), "2026-03-15");
        // last millisecond of the day is still the same date
        assert_eq!(millis_to_date_string(day_end_millis(d) - 1), "2026-03-15");
    }
}
