use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Deserializer};

/// A single story returned by the news API.
///
/// Items have no stable identifier; screens address them by position.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
pub struct NewsItem {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub title: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub content: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub image_url: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub created_at: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub source_url: String,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

impl NewsItem {
    /// Publication date as `DD-MM-YYYY`.
    ///
    /// Accepts RFC 3339 and the common naive layouts the API emits. Anything
    /// else is returned verbatim rather than hidden.
    pub fn display_date(&self) -> String {
        let raw = self.created_at.trim();
        if raw.is_empty() {
            return String::new();
        }

        if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
            return dt.format("%d-%m-%Y").to_string();
        }

        const NAIVE_LAYOUTS: &[&str] = &[
            "%Y-%m-%dT%H:%M:%S%.f",
            "%Y-%m-%d %H:%M:%S%.f",
            "%Y-%m-%dT%H:%M:%S",
            "%Y-%m-%d %H:%M:%S",
        ];
        for layout in NAIVE_LAYOUTS {
            if let Ok(dt) = NaiveDateTime::parse_from_str(raw, layout) {
                return dt.format("%d-%m-%Y").to_string();
            }
        }

        if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
            return date.format("%d-%m-%Y").to_string();
        }

        raw.to_string()
    }

    /// Host part of the image URL, used as a placeholder where the
    /// terminal cannot draw the image itself.
    pub fn image_host(&self) -> Option<String> {
        url::Url::parse(&self.image_url)
            .ok()
            .and_then(|u| u.host_str().map(str::to_string))
    }
}
