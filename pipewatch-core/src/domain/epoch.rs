//! Serde helpers for provider timestamps
//!
//! The provider encodes instants as (possibly fractional) seconds since the
//! Unix epoch.

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Deserializer, Serializer, de::Error};

pub fn serialize<S>(instant: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_f64(instant.timestamp_millis() as f64 / 1000.0)
}

pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let seconds = f64::deserialize(deserializer)?;
    from_seconds(seconds)
        .ok_or_else(|| D::Error::custom(format!("timestamp out of range: {seconds}")))
}

fn from_seconds(seconds: f64) -> Option<DateTime<Utc>> {
    if !seconds.is_finite() {
        return None;
    }
    let millis = (seconds * 1000.0).round() as i64;
    Utc.timestamp_millis_opt(millis).single()
}

/// Same encoding for optional fields
pub mod option {
    use chrono::{DateTime, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(instant: &Option<DateTime<Utc>>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match instant {
            Some(instant) => super::serialize(instant, serializer),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        struct Wrapper(#[serde(with = "super")] DateTime<Utc>);

        let wrapper = Option::<Wrapper>::deserialize(deserializer)?;
        Ok(wrapper.map(|Wrapper(instant)| instant))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fractional_seconds_are_preserved_to_the_millisecond() {
        let instant = from_seconds(1_711_929_600.25).unwrap();
        assert_eq!(instant.timestamp(), 1_711_929_600);
        assert_eq!(instant.timestamp_subsec_millis(), 250);
    }

    #[test]
    fn test_non_finite_seconds_are_rejected() {
        assert!(from_seconds(f64::NAN).is_none());
        assert!(from_seconds(f64::INFINITY).is_none());
    }
}
