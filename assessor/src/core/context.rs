//! Selector context with bounded validator feedback
//!
//! The base context is never cut. Feedback from rejected iterations is
//! appended newest-last; when the total would exceed the character budget the
//! oldest feedback is dropped first, and a lone newest entry is truncated to
//! whatever room remains.

const FEEDBACK_PREFIX: &str = "\n\nVALIDATOR FEEDBACK: ";
const FEEDBACK_SUFFIX: &str = "\nPlease address these concerns in your assessment.";

/// Render the feedback-free context for one (perspective, country) pair
pub fn base_context(focus: &str, profile: &str, host_country: &str, features: &[String]) -> String {
    format!(
        "{focus}\n\n\
         PROFILE DATA:\n{profile}\n\n\
         HOST COUNTRY: {host_country}\n\n\
         AVAILABLE FEATURES IN THIS PROFILE: {}\n\n\
         Please provide your assessment following the guidelines above.",
        features.join(", ")
    )
}

fn char_len(text: &str) -> usize {
    text.chars().count()
}

fn feedback_block(feedback: &str) -> String {
    format!("{FEEDBACK_PREFIX}{feedback}{FEEDBACK_SUFFIX}")
}

/// Base context plus the feedback carried between iterations
#[derive(Debug, Clone)]
pub struct FeedbackContext {
    base: String,
    feedback: Vec<String>,
    max_chars: usize,
}

impl FeedbackContext {
    pub fn new(base: String, max_chars: usize) -> Self {
        Self {
            base,
            feedback: Vec::new(),
            max_chars,
        }
    }

    pub fn push_feedback(&mut self, feedback: impl Into<String>) {
        self.feedback.push(feedback.into());
    }

    /// Context text within `max(base length, max_chars)` characters
    pub fn render(&self) -> String {
        let budget = self.max_chars.saturating_sub(char_len(&self.base));
        let mut used = 0;
        let mut kept: Vec<String> = Vec::new();

        for feedback in self.feedback.iter().rev() {
            let block = feedback_block(feedback);
            let block_len = char_len(&block);
            if used + block_len > budget {
                break;
            }
            used += block_len;
            kept.push(block);
        }

        if kept.is_empty() {
            if let Some(newest) = self.feedback.last() {
                let frame = char_len(FEEDBACK_PREFIX) + char_len(FEEDBACK_SUFFIX);
                if budget > frame {
                    let truncated: String = newest.chars().take(budget - frame).collect();
                    kept.push(feedback_block(&truncated));
                }
            }
        }

        let mut rendered = self.base.clone();
        for block in kept.iter().rev() {
            rendered.push_str(block);
        }
        rendered
    }
}
