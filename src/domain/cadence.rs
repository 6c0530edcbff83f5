use chrono::{DateTime, Duration, Utc};

/// Computes the due date of the next message from the series origin and the
/// number of messages already sent. The first three messages go out 7 days
/// apart (offsets 0, 7, 14), every message after that 15 days apart
/// (offsets 21, 36, 51, ...). Operates on absolute instants.
pub fn next_message_date(start_date: DateTime<Utc>, message_count: u32) -> DateTime<Utc> {
    if message_count < 3 {
        start_date + Duration::days(i64::from(message_count) * 7)
    } else {
        let days_after_third_message = i64::from(message_count - 3) * 15;
        start_date + Duration::days(21 + days_after_third_message)
    }
}
