use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, de::Error};

/// Accepts RFC 3339, naive date-times (read as UTC) and plain `YYYY-MM-DD`
/// dates (midnight UTC).
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(dt.and_utc());
        }
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc())
}

fn parse_or_error<E: Error>(raw: &str) -> Result<DateTime<Utc>, E> {
    parse_timestamp(raw).ok_or_else(|| E::custom(format!("invalid timestamp `{raw}`")))
}

pub(crate) fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_or_error(&raw)
}

/// `null`, a missing field and an empty string all mean "no timestamp".
pub(crate) fn deserialize_optional<'de, D>(
    deserializer: D,
) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<String>::deserialize(deserializer)? {
        Some(raw) if !raw.trim().is_empty() => parse_or_error(&raw).map(Some),
        _ => Ok(None),
    }
}

/// For partial updates: the outer `Some` marks the field as present, so
/// `null` (or `""`) clears the value while an absent field leaves it alone.
pub(crate) fn deserialize_patch<'de, D>(
    deserializer: D,
) -> Result<Option<Option<DateTime<Utc>>>, D::Error>
where
    D: Deserializer<'de>,
{
    deserialize_optional(deserializer).map(Some)
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::parse_timestamp;

    #[test]
    fn timestamp_formats() {
        let expected = Utc.with_ymd_and_hms(2024, 1, 3, 9, 15, 0).unwrap();
        assert_eq!(parse_timestamp("2024-01-03T09:15:00Z"), Some(expected));
        assert_eq!(parse_timestamp("2024-01-03T10:15:00+01:00"), Some(expected));
        assert_eq!(parse_timestamp("2024-01-03T09:15:00"), Some(expected));
        assert_eq!(parse_timestamp("2024-01-03 09:15:00"), Some(expected));
        assert_eq!(parse_timestamp("03/01/2024"), None);
    }

    #[test]
    fn plain_date_is_midnight_utc() {
        assert_eq!(
            parse_timestamp("2024-05-01"),
            Some(Utc.with_ymd_and_hms(2024, 5, 1, 0, 0, 0).unwrap())
        );
    }
}
