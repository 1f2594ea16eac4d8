pub mod auth;
pub mod booking;
pub mod chat;
pub mod event;
pub mod gallery;
pub mod inquiry;
pub mod invoice;
pub mod user;

use chrono::Utc;
use thiserror::Error;

/// Current wall-clock time as epoch milliseconds, the unit of every stored timestamp.
pub fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}

#[derive(Debug, Error)]
#[error("unknown {kind} '{value}'")]
pub struct ParseEnumError {
    pub kind: &'static str,
    pub value: String,
}

/// Implements `FromStr`, `Display`, serde and sqlx text encoding for a closed
/// set of snake_case literals.
macro_rules! text_enum {
    ($name:ident, $kind:literal, { $($variant:ident => $lit:literal),+ $(,)? }) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
        #[serde(rename_all = "snake_case")]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $lit),+
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl std::str::FromStr for $name {
            type Err = $crate::domain::models::ParseEnumError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($lit => Ok($name::$variant),)+
                    other => Err($crate::domain::models::ParseEnumError {
                        kind: $kind,
                        value: other.to_string(),
                    }),
                }
            }
        }

        impl<DB: sqlx::Database> sqlx::Type<DB> for $name
        where
            String: sqlx::Type<DB>,
        {
            fn type_info() -> DB::TypeInfo {
                <String as sqlx::Type<DB>>::type_info()
            }

            fn compatible(ty: &DB::TypeInfo) -> bool {
                <String as sqlx::Type<DB>>::compatible(ty)
            }
        }

        impl<'r, DB: sqlx::Database> sqlx::Decode<'r, DB> for $name
        where
            String: sqlx::Decode<'r, DB>,
        {
            fn decode(
                value: <DB as sqlx::Database>::ValueRef<'r>,
            ) -> Result<Self, sqlx::error::BoxDynError> {
                let raw = <String as sqlx::Decode<'r, DB>>::decode(value)?;
                Ok(raw.parse::<$name>()?)
            }
        }

        impl<'q, DB: sqlx::Database> sqlx::Encode<'q, DB> for $name
        where
            String: sqlx::Encode<'q, DB>,
        {
            fn encode_by_ref(
                &self,
                buf: &mut <DB as sqlx::Database>::ArgumentBuffer<'q>,
            ) -> Result<sqlx::encode::IsNull, sqlx::error::BoxDynError> {
                <String as sqlx::Encode<'q, DB>>::encode(self.as_str().to_string(), buf)
            }
        }
    };
}

pub(crate) use text_enum;

text_enum!(EventType, "event type", {
    SoundBath => "sound_bath",
    DjParty => "dj_party",
    SilentDisco => "silent_disco",
    YogaSeminar => "yoga_seminar",
    MeditationSeminar => "meditation_seminar",
    AlbumRelease => "album_release",
    ArtGallery => "art_gallery",
    CorporateEvent => "corporate_event",
    PrivateEvent => "private_event",
});

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn event_type_round_trips_through_its_literal() {
        for ty in EventType::ALL {
            assert_eq!(ty.as_str().parse::<EventType>().unwrap(), *ty);
        }
    }

    #[test]
    fn empty_literal_is_rejected() {
        let err = "".parse::<EventType>().unwrap_err();
        assert_eq!(err.value, "");
        assert_eq!(err.kind, "event type");
    }

    #[test]
    fn serde_uses_snake_case_literals() {
        let json = serde_json::to_string(&EventType::SilentDisco).unwrap();
        assert_eq!(json, "\"silent_disco\"");
    }
}
