//! Happiness report ratings (v1 only).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::client::HelpScoutClient;
use crate::envelope::ApiVersion;
use crate::error::{HelpScoutError, Result};
use crate::models::format_timestamp;
use crate::pagination::{Limit, QueryParams};
use crate::traits::{List, Resource};

/// A customer's rating of a reply.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Rating {
    /// Conversation id.
    pub id: u64,

    /// Conversation number.
    #[serde(default)]
    pub number: Option<u64>,

    /// "email", "chat" or "phone".
    #[serde(rename = "type", default)]
    pub conversation_type: Option<String>,

    #[serde(rename = "threadid", default)]
    pub thread_id: Option<u64>,

    #[serde(default)]
    pub thread_created_at: Option<DateTime<Utc>>,

    /// 1 (Great), 2 (Okay) or 3 (Not Good).
    #[serde(default)]
    pub rating_id: Option<u8>,

    /// Label for `rating_id`.
    #[serde(default)]
    pub rating: Option<String>,

    #[serde(default)]
    pub rating_customer_id: Option<u64>,

    #[serde(default)]
    pub rating_comments: Option<String>,

    #[serde(default)]
    pub rating_created_at: Option<DateTime<Utc>>,

    #[serde(default)]
    pub rating_customer_name: Option<String>,

    #[serde(default)]
    pub rating_user_id: Option<u64>,

    #[serde(default)]
    pub rating_user_name: Option<String>,
}

/// Label for a rating id.
pub fn rating_label(rating_id: u8) -> Option<&'static str> {
    match rating_id {
        1 => Some("Great"),
        2 => Some("Okay"),
        3 => Some("Not Good"),
        _ => None,
    }
}

/// Report window and rating filter.
#[derive(Debug, Clone, Copy, Default)]
pub struct RatingQuery {
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
    /// Rating id to filter on; 0 means all ratings.
    pub rating: u8,
}

impl Resource for Rating {
    const NAME: &'static str = "rating";

    fn from_item(item: Value) -> Result<Self> {
        let mut rating: Self = serde_json::from_value(item)?;
        if rating.rating.is_none() {
            rating.rating = rating.rating_id.and_then(rating_label).map(str::to_string);
        }
        Ok(rating)
    }
}

impl List for Rating {
    type Query = RatingQuery;

    fn collection_path(client: &HelpScoutClient, _query: &RatingQuery) -> Result<String> {
        match client.api_version() {
            ApiVersion::V1 => Ok("reports/happiness/ratings".to_string()),
            ApiVersion::V2 => Err(HelpScoutError::validation(
                "happiness ratings are only available on the v1 API",
            )),
        }
    }

    fn query_params(_client: &HelpScoutClient, query: &RatingQuery) -> QueryParams {
        QueryParams::new()
            .with_opt("start", query.start.map(format_timestamp))
            .with_opt("end", query.end.map(format_timestamp))
            .with("rating", query.rating)
    }
}

/// Fetch every rating in the report window.
pub async fn get_ratings(
    client: &HelpScoutClient,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    rating: u8,
) -> Result<Vec<Rating>> {
    let query = RatingQuery {
        start: Some(start),
        end: Some(end),
        rating,
    };
    Rating::list(client, &query, Limit::Unlimited).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    fn sample(rating_id: u8) -> Value {
        json!({
            "number": 59504,
            "id": 1545009,
            "type": "email",
            "threadid": 2952132,
            "threadCreatedAt": "2015-01-14T15:09:39Z",
            "ratingId": rating_id,
            "ratingCustomerId": 449122,
            "ratingComments": "",
            "ratingCreatedAt": "2015-01-14T15:10:40Z",
            "ratingCustomerName": "john@example.com",
            "ratingUserId": 4,
            "ratingUserName": "John Smith"
        })
    }

    #[test]
    fn test_rating_label_falls_back_to_id_lookup() {
        assert_eq!(Rating::from_item(sample(2)).unwrap().rating.as_deref(), Some("Okay"));
        assert_eq!(Rating::from_item(sample(1)).unwrap().rating.as_deref(), Some("Great"));
        assert_eq!(Rating::from_item(sample(3)).unwrap().rating.as_deref(), Some("Not Good"));
        assert_eq!(Rating::from_item(sample(9)).unwrap().rating, None);
    }

    #[test]
    fn test_explicit_label_wins() {
        let mut item = sample(1);
        item["rating"] = json!("Custom");
        assert_eq!(Rating::from_item(item).unwrap().rating.as_deref(), Some("Custom"));
    }

    #[test]
    fn test_report_params() {
        let client = HelpScoutClient::v1("k").unwrap();
        let query = RatingQuery {
            start: Utc.with_ymd_and_hms(2016, 2, 25, 0, 0, 0).single(),
            end: Utc.with_ymd_and_hms(2016, 2, 29, 0, 0, 0).single(),
            rating: 0,
        };

        assert_eq!(
            Rating::query_params(&client, &query).query_string().unwrap(),
            "start=2016-02-25T00:00:00Z&end=2016-02-29T00:00:00Z&rating=0"
        );
    }

    #[test]
    fn test_v2_client_is_rejected() {
        let client = HelpScoutClient::v2("id", "secret").unwrap();
        assert!(matches!(
            Rating::collection_path(&client, &RatingQuery::default()),
            Err(HelpScoutError::Validation(_))
        ));
    }
}
