/// Priority Combiner
///
/// Blends the best bucket's mean engagement and topical relevance with the
/// account's learned weights.
use crate::models::ModelParams;
use crate::utils::{clip, round_to};

/// `w_e · clip(engagement) + w_r · clip(relevance)`, rounded to 2 decimals.
///
/// Weights are clipped to `[0, 1]`; the result is kept in `[0, 1]` since a
/// manual override may leave the weights summing slightly above 1.
pub fn combine(params: &ModelParams, mean_engagement: f64, top_relevance: f64) -> f64 {
    let w_e = clip(params.w_engagement, 0.0, 1.0);
    let w_r = clip(params.w_relevance, 0.0, 1.0);

    let blended = w_e * clip(mean_engagement, 0.0, 1.0) + w_r * clip(top_relevance, 0.0, 1.0);

    round_to(clip(blended, 0.0, 1.0), 2)
}
