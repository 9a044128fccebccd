use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer};

/// A single search result record.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Hit {
    #[serde(rename = "objectID")]
    pub object_id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub author: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub url: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub num_comments: i32,
    #[serde(default, deserialize_with = "null_as_default")]
    pub points: i32,
    #[serde(default)]
    pub created_at_i: Option<i64>,
}

impl Hit {
    /// Relative age like "3 hours ago", empty when the record carries no timestamp.
    pub fn time_ago(&self, now: DateTime<Utc>) -> String {
        let Some(created) = self.created_at_i.and_then(|ts| DateTime::from_timestamp(ts, 0)) else {
            return String::new();
        };

        let secs = (now - created).num_seconds().max(0);
        let (value, unit) = match secs {
            s if s < 60 => return "just now".to_string(),
            s if s < 3600 => (s / 60, "minute"),
            s if s < 86_400 => (s / 3600, "hour"),
            s if s < 2_592_000 => (s / 86_400, "day"),
            s if s < 31_536_000 => (s / 2_592_000, "month"),
            s => (s / 31_536_000, "year"),
        };

        if value == 1 {
            format!("1 {} ago", unit)
        } else {
            format!("{} {}s ago", value, unit)
        }
    }
}

/// One fetch's worth of hits, or the accumulated hits of every fetch for a query.
///
/// This is also the wire shape of a search response; fields other than `hits`
/// and `page` are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Page {
    #[serde(default)]
    pub hits: Vec<Hit>,
    #[serde(default)]
    pub page: u32,
}

// Algolia sends explicit nulls for missing titles/urls (comments, polls).
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
pub(crate) fn hit(id: &str, title: &str, author: &str, num_comments: i32, points: i32) -> Hit {
    Hit {
        object_id: id.to_string(),
        title: title.to_string(),
        author: author.to_string(),
        url: format!("https://example.com/{}", id),
        num_comments,
        points,
        created_at_i: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_search_response_and_ignores_extra_fields() {
        let body = r#"{
            "hits": [
                {"objectID": "1", "title": "Redux", "author": "dan", "url": "https://redux.js.org",
                 "num_comments": 12, "points": 99, "created_at_i": 1700000000, "_tags": ["story"]},
                {"objectID": "2", "title": null, "author": "pg", "url": null,
                 "num_comments": null, "points": null}
            ],
            "page": 3,
            "nbPages": 50,
            "hitsPerPage": 100
        }"#;

        let page: Page = serde_json::from_str(body).unwrap();
        assert_eq!(page.page, 3);
        assert_eq!(page.hits.len(), 2);
        assert_eq!(page.hits[0].object_id, "1");
        assert_eq!(page.hits[0].points, 99);
        assert_eq!(page.hits[0].created_at_i, Some(1_700_000_000));
        assert_eq!(page.hits[1].title, "");
        assert_eq!(page.hits[1].url, "");
        assert_eq!(page.hits[1].num_comments, 0);
    }

    #[test]
    fn missing_object_id_is_rejected() {
        let body = r#"{"hits": [{"title": "no id"}], "page": 0}"#;
        assert!(serde_json::from_str::<Page>(body).is_err());
    }

    #[test]
    fn time_ago_formats_relative_age() {
        let now = DateTime::from_timestamp(1_700_000_000, 0).unwrap();
        let mut item = hit("1", "t", "a", 0, 0);
        assert_eq!(item.time_ago(now), "");

        item.created_at_i = Some(1_700_000_000 - 30);
        assert_eq!(item.time_ago(now), "just now");

        item.created_at_i = Some(1_700_000_000 - 3600);
        assert_eq!(item.time_ago(now), "1 hour ago");

        item.created_at_i = Some(1_700_000_000 - 3 * 86_400);
        assert_eq!(item.time_ago(now), "3 days ago");
    }
}
