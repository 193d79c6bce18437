use chrono::{DateTime, Datelike, NaiveDate, TimeZone, Utc};
use chrono_tz::Tz;
use time::{Date, Month, OffsetDateTime, UtcOffset};

pub fn localized_datetime(time: OffsetDateTime, tz: Tz) -> DateTime<Tz> {
    let utc = time.to_offset(UtcOffset::UTC);
    let seconds = utc.unix_timestamp();
    let nanos: u32 = utc.nanosecond();
    let datetime_utc = DateTime::<Utc>::from_timestamp(seconds, nanos)
        .or_else(|| DateTime::<Utc>::from_timestamp(seconds, 0))
        .unwrap_or_default();
    tz.from_utc_datetime(&datetime_utc.naive_utc())
}

pub fn localized_date(time: OffsetDateTime, tz: Tz) -> Date {
    let localized = localized_datetime(time, tz);
    let month = Month::try_from(localized.month() as u8).unwrap_or(Month::January);
    let day = u8::try_from(localized.day()).unwrap_or(1);
    Date::from_calendar_date(localized.year(), month, day).unwrap_or(Date::MIN)
}

/// The UTC instant at which `date` begins in `tz`.
///
/// When local midnight falls into a DST gap the first valid instant of the day is used.
pub fn start_of_local_day(date: Date, tz: Tz) -> OffsetDateTime {
    let naive_date = NaiveDate::from_ymd_opt(
        date.year(),
        u8::from(date.month()).into(),
        date.day().into(),
    )
    .unwrap_or_default();

    let local = (0..24)
        .filter_map(|hour| naive_date.and_hms_opt(hour, 0, 0))
        .find_map(|naive| tz.from_local_datetime(&naive).earliest());

    let timestamp = match local {
        Some(datetime) => datetime.timestamp(),
        None => naive_date
            .and_hms_opt(0, 0, 0)
            .map(|naive| naive.and_utc().timestamp())
            .unwrap_or_default(),
    };

    OffsetDateTime::from_unix_timestamp(timestamp).unwrap_or(OffsetDateTime::UNIX_EPOCH)
}
