//! Question visibility and ordering.
//!
//! A question is *visible* once its `pub_date` is at or before the current
//! instant, and *recent* while `now - pub_date` lies in `[0, 24h)`. Listing
//! order is newest `pub_date` first, ties broken by id (highest first), so the
//! same store contents always produce the same sequence.

use crate::error::{PollsError, Result};
use crate::question::Question;
use crate::store::QuestionStore;
use chrono::{DateTime, Duration, Utc};

/// Width of the "recently published" window.
fn recent_window() -> Duration {
    Duration::hours(24)
}

/// All questions published at or before `now`, newest first.
pub fn list_visible(store: &dyn QuestionStore, now: DateTime<Utc>) -> Result<Vec<Question>> {
    let mut visible: Vec<Question> = store
        .find_all_questions()?
        .into_iter()
        .filter(|q| q.is_published(now))
        .collect();
    sort_newest_first(&mut visible);
    Ok(visible)
}

/// Order by `pub_date` descending, then `id` descending.
pub fn sort_newest_first(questions: &mut [Question]) {
    questions.sort_by(|a, b| b.pub_date.cmp(&a.pub_date).then_with(|| b.id.cmp(&a.id)));
}

/// True iff `0 <= now - pub_date < 24h`.
pub fn is_recent(question: &Question, now: DateTime<Utc>) -> bool {
    let age = now - question.pub_date;
    age >= Duration::zero() && age < recent_window()
}

/// Load a question only if it exists and is published.
///
/// A missing id and an unpublished one both yield `QuestionNotFound(id)`.
pub fn get_visible_by_id(
    store: &dyn QuestionStore,
    id: u64,
    now: DateTime<Utc>,
) -> Result<Question> {
    match store.find_question_by_id(id) {
        Ok(q) if q.is_published(now) => Ok(q),
        Ok(_) | Err(PollsError::QuestionNotFound(_)) => Err(PollsError::QuestionNotFound(id)),
        Err(e) => Err(e),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
