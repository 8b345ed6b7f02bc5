//! The token stored in the auth cookie and how it is serialized.

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

mod datetime_format {
    //! Serializes a [time::OffsetDateTime] with a fixed width hour.
    //!
    //! The default serializer writes midnight as "0:00:00.0", which the
    //! matching deserializer then rejects because it expects two digit hours.
    use serde::{Deserialize, Deserializer, Serializer};
    use time::{
        OffsetDateTime, format_description::BorrowedFormatItem, macros::format_description,
    };

    /// e.g. "2025-10-01 00:00:00.0 +00:00:00".
    const DATE_TIME_FORMAT: &[BorrowedFormatItem] = format_description!(
        "[year]-[month]-[day] [hour]:[minute]:[second].[subsecond] [offset_hour \
             sign:mandatory]:[offset_minute]:[offset_second]"
    );

    pub fn serialize<S>(date_time: &OffsetDateTime, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let formatted = date_time
            .format(DATE_TIME_FORMAT)
            .map_err(serde::ser::Error::custom)?;
        serializer.serialize_str(&formatted)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<OffsetDateTime, D::Error>
    where
        D: Deserializer<'de>,
    {
        let text = String::deserialize(deserializer)?;
        OffsetDateTime::parse(&text, DATE_TIME_FORMAT).map_err(serde::de::Error::custom)
    }
}

/// Proof of a successful log in, valid until `expires_at`.
///
/// There is a single shared passphrase, so the token carries no user.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct Token {
    #[serde(
        serialize_with = "datetime_format::serialize",
        deserialize_with = "datetime_format::deserialize"
    )]
    pub expires_at: OffsetDateTime,
}

impl Token {
    /// Whether the token is still valid at `now`.
    pub fn is_valid_at(&self, now: OffsetDateTime) -> bool {
        now < self.expires_at
    }
}

#[cfg(test)]
mod tests {
    use time::{Duration, macros::datetime};

    use super::Token;

    #[test]
    fn serialises_token() {
        let token = Token {
            expires_at: datetime!(2025-10-21 03:54:00 UTC),
        };

        let got = serde_json::to_string(&token).unwrap();

        assert_eq!(got, r#"{"expires_at":"2025-10-21 03:54:00.0 +00:00:00"}"#);
    }

    #[test]
    fn deserialises_token_expiring_at_midnight() {
        let want = Token {
            expires_at: datetime!(2025-10-25 00:00:00 UTC),
        };

        let got: Token =
            serde_json::from_str(r#"{"expires_at":"2025-10-25 00:00:00.0 +00:00:00"}"#).unwrap();

        assert_eq!(got, want);
    }

    #[test]
    fn expires_at_its_expiry_time() {
        let expires_at = datetime!(2025-10-25 12:00:00 UTC);
        let token = Token { expires_at };

        assert!(token.is_valid_at(expires_at - Duration::seconds(1)));
        assert!(!token.is_valid_at(expires_at));
    }
}
