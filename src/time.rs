//! Epoch-millisecond timestamps
//!
//! The backend and the persisted cart slot exchange instants as integer milliseconds since the
//! Unix epoch. These helpers plug [`Timestamp`] into that representation for serde.

use jiff::Timestamp;
use serde::{Deserialize, Deserializer, Serializer, de::Error as _};

/// Serialize a [`Timestamp`] as epoch milliseconds.
///
/// # Errors
///
/// Returns the serializer's error.
pub fn serialize<S: Serializer>(timestamp: &Timestamp, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_i64(timestamp.as_millisecond())
}

/// Deserialize a [`Timestamp`] from epoch milliseconds.
///
/// # Errors
///
/// Returns an error if the value is not an integer or is outside the supported range.
pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Timestamp, D::Error> {
    let millis = i64::deserialize(deserializer)?;

    Timestamp::from_millisecond(millis).map_err(D::Error::custom)
}

/// Optional variant of the epoch-millisecond representation.
pub mod option {
    use jiff::Timestamp;
    use serde::{Deserialize, Deserializer, Serializer, de::Error as _};

    /// Serialize an optional [`Timestamp`] as epoch milliseconds or `null`.
    ///
    /// # Errors
    ///
    /// Returns the serializer's error.
    #[expect(
        clippy::ref_option,
        reason = "serde `with` modules receive a reference to the field"
    )]
    pub fn serialize<S: Serializer>(
        timestamp: &Option<Timestamp>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match timestamp {
            Some(timestamp) => serializer.serialize_some(&timestamp.as_millisecond()),
            None => serializer.serialize_none(),
        }
    }

    /// Deserialize an optional [`Timestamp`] from epoch milliseconds or `null`.
    ///
    /// # Errors
    ///
    /// Returns an error if the value is present but out of range.
    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<Timestamp>, D::Error> {
        Option::<i64>::deserialize(deserializer)?
            .map(Timestamp::from_millisecond)
            .transpose()
            .map_err(D::Error::custom)
    }
}
