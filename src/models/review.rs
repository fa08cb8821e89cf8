use serde::{Deserialize, Serialize};

/// Structured verdict requested from the model as JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewScore {
    pub score: u8,
    pub summary: String,
    #[serde(default)]
    pub concerns: Vec<String>,
}

impl ReviewScore {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 10;

    pub fn is_valid(&self) -> bool {
        (Self::MIN..=Self::MAX).contains(&self.score)
    }

    pub fn to_markdown(&self) -> String {
        let mut output = format!(
            "### Review Score: {}/{}\n\n{}\n",
            self.score,
            Self::MAX,
            self.summary.trim()
        );

        if !self.concerns.is_empty() {
            output.push_str("\n**Concerns**\n\n");
            for concern in &self.concerns {
                output.push_str(&format!("- {}\n", concern.trim()));
            }
        }

        output
    }
}

/// What a run managed to write back.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ReviewOutcome {
    pub description_updated: bool,
    pub review_posted: bool,
    pub code_comments_posted: bool,
    pub score: Option<ReviewScore>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_score_markdown_lists_concerns() {
        let score = ReviewScore {
            score: 7,
            summary: "Solid change.".to_string(),
            concerns: vec!["Missing test for error path".to_string()],
        };
        let md = score.to_markdown();
        assert!(md.starts_with("### Review Score: 7/10"));
        assert!(md.contains("- Missing test for error path"));
    }

    #[test]
    fn test_score_range() {
        let mut score = ReviewScore {
            score: 0,
            summary: String::new(),
            concerns: Vec::new(),
        };
        assert!(!score.is_valid());
        score.score = 10;
        assert!(score.is_valid());
        score.score = 11;
        assert!(!score.is_valid());
    }
}
