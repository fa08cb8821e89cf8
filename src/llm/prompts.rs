pub const SYSTEM_PROMPT: &str =
    "You are an experienced Technical Lead and code reviewer. You read unified diffs carefully \
     and give precise, actionable feedback in Markdown.";

const DIFF_PLACEHOLDER: &str = "{diff}";

/// Exact answer of the review pass when it finds nothing worth reporting.
pub const EMPTY_REVIEW_MARKER: &str = "EMPTY_CODE_REVIEW";

const SUMMARY_TEMPLATE: &str = r#"Summarize the pull request below for its description.

Add a section called "Changes Summary" with a short bulleted description of the overall changes. Keep each bullet to one short, plain sentence.

Add a section called "Changes Walkthrough" with a Markdown table of two columns: **Section** and **Changes Summary**.
- **Section** groups related changes under a short label such as "Validation", "Data Model", "API", "Services" or "Tests".
- **Changes Summary** names the file (file name only, in backticks) followed by 1-3 sentences using verbs like "added", "updated" or "removed". Use a bulleted list when one file has several changes.

Be concise. Use emojis only to flag critical changes.

Changes:
{diff}
"#;

const REVIEW_TEMPLATE: &str = r#"Review the changes of this pull request. The changes are given as a unified git diff.

- Only review lines that were added, edited or removed (lines starting with '+' or '-'). Ignore unchanged context lines.
- Report potential bugs and critical issues first, then security, performance and best-practice concerns.
- Do not repeat the same remark for identical lines, and ignore missing newlines at end of file.
- For each finding give, as a numbered item: the function name, then bullets with the existing snippet, the feedback, and a suggested replacement snippet.
- Use Markdown, with backticks for code.
- If there are no bugs or critical issues, answer exactly EMPTY_CODE_REVIEW.

Changes:
{diff}
"#;

const CODE_COMMENTS_TEMPLATE: &str = r#"Write documentation comments for the functions in the diff below that do not already have them, using the convention of the language (rustdoc, Javadoc, JSDoc, docstrings, ...). Skip functions that are already documented. If no undocumented functions are found, say so in one sentence.

Changes:
{diff}
"#;

const SCORE_TEMPLATE: &str = r#"Rate the overall quality of the pull request below.

Respond with a single JSON object and nothing else, matching this schema:
{
    "score": integer from 1 (unmergeable) to 10 (exemplary),
    "summary": "one or two sentences justifying the score",
    "concerns": ["short description of each issue that lowered the score"]
}

Changes:
{diff}
"#;

/// Analysis passes the reviewer can run over a diff.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptKind {
    Summary,
    Review,
    CodeComments,
    Score,
}

impl PromptKind {
    pub fn template(&self) -> &'static str {
        match self {
            PromptKind::Summary => SUMMARY_TEMPLATE,
            PromptKind::Review => REVIEW_TEMPLATE,
            PromptKind::CodeComments => CODE_COMMENTS_TEMPLATE,
            PromptKind::Score => SCORE_TEMPLATE,
        }
    }

    pub fn temperature(&self) -> f32 {
        match self {
            PromptKind::Summary | PromptKind::CodeComments => 0.2,
            PromptKind::Review => 0.3,
            PromptKind::Score => 0.0,
        }
    }

    pub fn wants_json(&self) -> bool {
        matches!(self, PromptKind::Score)
    }

    pub fn label(&self) -> &'static str {
        match self {
            PromptKind::Summary => "summary",
            PromptKind::Review => "review",
            PromptKind::CodeComments => "code comments",
            PromptKind::Score => "score",
        }
    }

    pub fn render(&self, diff: &str) -> String {
        self.template().replacen(DIFF_PLACEHOLDER, diff, 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [PromptKind; 4] = [
        PromptKind::Summary,
        PromptKind::Review,
        PromptKind::CodeComments,
        PromptKind::Score,
    ];

    #[test]
    fn test_every_template_embeds_diff_once() {
        for kind in ALL {
            assert_eq!(kind.template().matches(DIFF_PLACEHOLDER).count(), 1, "{:?}", kind);
            let prompt = kind.render("+fn added() {}");
            assert!(prompt.contains("+fn added() {}"));
            assert!(!prompt.contains(DIFF_PLACEHOLDER));
        }
    }

    #[test]
    fn test_diff_containing_placeholder_is_left_alone() {
        let prompt = PromptKind::Review.render("+let s = \"{diff}\";");
        assert!(prompt.ends_with("+let s = \"{diff}\";\n"));
    }

    #[test]
    fn test_only_score_wants_json() {
        assert!(PromptKind::Score.wants_json());
        assert!(!PromptKind::Summary.wants_json());
        assert_eq!(PromptKind::Score.temperature(), 0.0);
    }

    #[test]
    fn test_review_template_names_empty_marker() {
        assert!(PromptKind::Review.template().contains(EMPTY_REVIEW_MARKER));
    }
}
