use serde::{Deserialize, Serialize};

/// A listing from one of the fixed reference sources
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReferenceRecord {
    pub id: String,
    pub name: String,
    pub rating: f64,
    #[serde(rename = "numberOfReviews")]
    pub number_of_reviews: u32,
    pub price: String,
    #[serde(rename = "bookingInfo")]
    pub booking_info: String,
}

impl ReferenceRecord {
    pub fn new(
        id: &str,
        name: &str,
        rating: f64,
        number_of_reviews: u32,
        price: &str,
        booking_info: &str,
    ) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            rating,
            number_of_reviews,
            price: price.to_string(),
            booking_info: booking_info.to_string(),
        }
    }
}

/// A merged, scored listing as synthesized by the completion model
///
/// The service forwards the model's JSON untouched; this type is the typed
/// view of one element for library callers and fixtures.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultItem {
    pub name: String,
    pub rating: f64,
    pub price: serde_json::Value,
    #[serde(rename = "bookingInfo")]
    pub booking_info: String,
    #[serde(rename = "neptuneScore")]
    pub neptune_score: u8,
}
