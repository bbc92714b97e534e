use serde::{Deserialize, Serialize};

use crate::error::{HubError, Result};

pub const MIN_RATING: f64 = 1.0;
pub const MAX_RATING: f64 = 5.0;

/// A rating and optional comment left on a recipe by one user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawReview")]
pub struct Review {
    rating: f64,
    comment: String,
    reviewer: String,
}

impl Review {
    /// Rating must lie in `[1.0, 5.0]`.
    pub fn new(rating: f64, comment: impl Into<String>, reviewer: impl Into<String>) -> Result<Self> {
        if !(MIN_RATING..=MAX_RATING).contains(&rating) {
            return Err(HubError::Validation(format!(
                "Rating must be between {} and {}, got {}",
                MIN_RATING, MAX_RATING, rating
            )));
        }

        let reviewer = reviewer.into();
        if reviewer.trim().is_empty() {
            return Err(HubError::Argument("Reviewer must not be empty".to_string()));
        }

        Ok(Self {
            rating,
            comment: comment.into(),
            reviewer,
        })
    }

    pub fn rating(&self) -> f64 {
        self.rating
    }

    pub fn comment(&self) -> &str {
        &self.comment
    }

    pub fn reviewer(&self) -> &str {
        &self.reviewer
    }

    pub fn has_comment(&self) -> bool {
        !self.comment.trim().is_empty()
    }
}

/// Wire form, checked by `Review::new` before use.
#[derive(Deserialize)]
struct RawReview {
    rating: f64,
    #[serde(default)]
    comment: String,
    reviewer: String,
}

impl TryFrom<RawReview> for Review {
    type Error = HubError;

    fn try_from(raw: RawReview) -> Result<Self> {
        Review::new(raw.rating, raw.comment, raw.reviewer)
    }
}
