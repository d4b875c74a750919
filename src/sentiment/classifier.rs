use crate::models::SentimentLabel;

/// Scores above this are positive.
pub const POSITIVE_THRESHOLD: f64 = 0.2;
/// Scores below this are negative.
pub const NEGATIVE_THRESHOLD: f64 = -0.2;

/// A natural-language polarity model: maps text to a score in `[-1.0, 1.0]`.
pub trait PolarityScorer {
    type Error;

    fn polarity(&self, text: &str) -> Result<f64, Self::Error>;
}

/// Label `text` with the scorer's polarity. Both thresholds are exclusive,
/// so a score of exactly 0.2 or -0.2 is neutral. Scorer errors are returned as-is.
pub fn classify<S>(scorer: &S, text: &str) -> Result<SentimentLabel, S::Error>
where
    S: PolarityScorer + ?Sized,
{
    let polarity = scorer.polarity(text)?;
    Ok(label_for(polarity))
}

fn label_for(polarity: f64) -> SentimentLabel {
    if polarity > POSITIVE_THRESHOLD {
        SentimentLabel::Positive
    } else if polarity < NEGATIVE_THRESHOLD {
        SentimentLabel::Negative
    } else {
        SentimentLabel::Neutral
    }
}
