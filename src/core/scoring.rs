/// Weight of the rating component
pub const RATING_WEIGHT: f64 = 70.0;
/// Weight of the review-count component
pub const REVIEWS_WEIGHT: f64 = 30.0;
/// Review count that earns the full review weight
pub const REVIEWS_SATURATION: f64 = 200.0;

/// Calculate the Neptune score (0-100) for a rating and review count
///
/// Scoring formula:
/// score = round(
///     (rating / 5) * 70 +              # Quality signal
///     (numberOfReviews / 200) * 30     # Popularity signal
/// )
///
/// The model is asked to apply this formula itself. Locally it only renders
/// the worked example in the prompt and builds fixtures.
pub fn neptune_score(rating: f64, number_of_reviews: u32) -> u8 {
    let raw = (rating / 5.0) * RATING_WEIGHT
        + (number_of_reviews as f64 / REVIEWS_SATURATION) * REVIEWS_WEIGHT;

    if raw.is_nan() {
        return 0;
    }

    raw.round().clamp(0.0, 100.0) as u8
}
