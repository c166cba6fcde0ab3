use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// A short-code → target-URL mapping.
///
/// `created_at` and `expires_at` are immutable after creation; `clicks` is
/// only ever incremented by the click pipeline.
#[derive(Debug, Clone)]
pub struct ShortUrl {
    pub code: String,
    pub target: String,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    pub validity_minutes: i64,
    pub clicks: u64,
}

impl ShortUrl {
    /// Build a fresh mapping whose validity window starts now.
    pub fn new(code: String, target: String, validity_minutes: i64) -> Self {
        let created_at = Utc::now();
        ShortUrl {
            code,
            target,
            created_at,
            expires_at: created_at + Duration::minutes(validity_minutes),
            validity_minutes,
            clicks: 0,
        }
    }

    /// Whether the mapping still resolves at `now`.
    ///
    /// Expiry is a resolvable-state flag, not a deletion: expired mappings
    /// stay queryable so callers can tell "expired" from "never existed".
    pub fn is_live(&self, now: DateTime<Utc>) -> bool {
        now < self.expires_at
    }
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct SerializableShortUrl {
    pub shortcode: String,
    #[serde(rename = "originalUrl")]
    pub original_url: String,
    #[serde(rename = "createdAt")]
    pub created_at: String,
    #[serde(rename = "expiresAt")]
    pub expires_at: String,
    #[serde(rename = "validityMinutes")]
    pub validity_minutes: i64,
    #[serde(default)]
    pub clicks: u64,
}

impl From<&ShortUrl> for SerializableShortUrl {
    fn from(url: &ShortUrl) -> Self {
        SerializableShortUrl {
            shortcode: url.code.clone(),
            original_url: url.target.clone(),
            created_at: url.created_at.to_rfc3339(),
            expires_at: url.expires_at.to_rfc3339(),
            validity_minutes: url.validity_minutes,
            clicks: url.clicks,
        }
    }
}

impl TryFrom<SerializableShortUrl> for ShortUrl {
    type Error = chrono::ParseError;

    fn try_from(s: SerializableShortUrl) -> std::result::Result<Self, Self::Error> {
        let created_at = DateTime::parse_from_rfc3339(&s.created_at)?.with_timezone(&Utc);
        let expires_at = DateTime::parse_from_rfc3339(&s.expires_at)?.with_timezone(&Utc);
        Ok(ShortUrl {
            code: s.shortcode,
            target: s.original_url,
            created_at,
            expires_at,
            validity_minutes: s.validity_minutes,
            clicks: s.clicks,
        })
    }
}
