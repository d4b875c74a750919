use super::classifier::{classify, PolarityScorer};
use crate::models::{SentimentExamples, SentimentLabel, SentimentReport, SentimentSummary};

const MAX_EXAMPLES: usize = 3;

/// Classify every comment and build the percentage breakdown plus examples.
pub fn summarize<S, I, T>(scorer: &S, comments: I) -> Result<SentimentReport, S::Error>
where
    S: PolarityScorer + ?Sized,
    I: IntoIterator<Item = T>,
    T: AsRef<str>,
{
    let mut labeled = Vec::new();
    for comment in comments {
        let text = comment.as_ref();
        let label = classify(scorer, text)?;
        labeled.push((text.to_string(), label));
    }
    Ok(SentimentReport::from_labeled(labeled))
}

impl SentimentReport {
    /// Aggregate already classified comments. An empty input yields all-zero buckets.
    pub fn from_labeled<I>(labeled: I) -> Self
    where
        I: IntoIterator<Item = (String, SentimentLabel)>,
    {
        let mut counts = [0usize; 3];
        let mut examples = SentimentExamples::default();
        let mut total = 0usize;

        for (text, label) in labeled {
            total += 1;
            match label {
                SentimentLabel::Positive => {
                    counts[0] += 1;
                    if examples.positive.len() < MAX_EXAMPLES {
                        examples.positive.push(text);
                    }
                }
                SentimentLabel::Neutral => counts[1] += 1,
                SentimentLabel::Negative => {
                    counts[2] += 1;
                    if examples.negative.len() < MAX_EXAMPLES {
                        examples.negative.push(text);
                    }
                }
            }
        }

        if total == 0 {
            return SentimentReport::default();
        }

        let summary = SentimentSummary {
            positive: percentage(counts[0], total),
            neutral: percentage(counts[1], total),
            negative: percentage(counts[2], total),
        };

        SentimentReport {
            summary,
            examples,
            total,
        }
    }
}

fn percentage(count: usize, total: usize) -> f64 {
    let raw = count as f64 / total as f64 * 100.0;
    // Halves go to the even neighbour: 6.25 -> 6.2
    (raw * 10.0).round_ties_even() / 10.0
}
