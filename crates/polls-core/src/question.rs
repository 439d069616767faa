use crate::error::{PollsError, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const MAX_TEXT_LEN: usize = 200;

// ---------------------------------------------------------------------------
// Question
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    pub id: u64,
    pub question_text: String,
    pub pub_date: DateTime<Utc>,
}

impl Question {
    /// Published within the 24 hours before `now`.
    pub fn was_published_recently(&self, now: DateTime<Utc>) -> bool {
        crate::policy::is_recent(self, now)
    }

    /// `pub_date` is at or before `now`.
    pub fn is_published(&self, now: DateTime<Utc>) -> bool {
        self.pub_date <= now
    }
}

// ---------------------------------------------------------------------------
// Choice
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Choice {
    pub id: u64,
    pub question_id: u64,
    pub choice_text: String,
    pub votes: u32,
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// Question and choice text must be non-blank and at most 200 characters.
pub fn validate_text(text: &str) -> Result<()> {
    if text.trim().is_empty() || text.chars().count() > MAX_TEXT_LEN {
        return Err(PollsError::InvalidText(text.to_string()));
    }
    Ok(())
}
