use serde::{Deserialize, Serialize};

/// Raw channel counters; a field is `None` when the platform withholds it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelStats {
    pub subscriber_count: Option<u64>,
    pub view_count: Option<u64>,
    pub video_count: Option<u64>,
}

/// Render an optional counter for display.
pub fn format_count(value: Option<u64>) -> String {
    match value {
        None => "hidden".to_string(),
        Some(n) => {
            let digits = n.to_string();
            let mut out = String::with_capacity(digits.len() + digits.len() / 3);
            for (i, c) in digits.chars().enumerate() {
                if i > 0 && (digits.len() - i) % 3 == 0 {
                    out.push(',');
                }
                out.push(c);
            }
            out
        }
    }
}

impl ChannelStats {
    pub fn subscribers_label(&self) -> String {
        format_count(self.subscriber_count)
    }

    pub fn views_label(&self) -> String {
        format_count(self.view_count)
    }

    pub fn videos_label(&self) -> String {
        format_count(self.video_count)
    }
}
