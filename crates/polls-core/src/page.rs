//! Rendering contexts for the three poll pages.
//!
//! Each builder is a read-only mapping from (store, id, now) to a context.
//! Detail and results share the visibility lookup, so an unpublished question
//! fails exactly like a missing one.

use crate::error::Result;
use crate::policy;
use crate::question::{Choice, Question};
use crate::store::QuestionStore;
use chrono::{DateTime, Utc};
use serde::Serialize;

// ---------------------------------------------------------------------------
// Index
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
pub struct IndexEntry {
    #[serde(flatten)]
    pub question: Question,
    pub was_published_recently: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct IndexContext {
    pub question_list: Vec<IndexEntry>,
    /// No visible questions; the page shows its empty-state message.
    pub empty: bool,
}

pub fn index_context(store: &dyn QuestionStore, now: DateTime<Utc>) -> Result<IndexContext> {
    let question_list: Vec<IndexEntry> = policy::list_visible(store, now)?
        .into_iter()
        .map(|question| IndexEntry {
            was_published_recently: policy::is_recent(&question, now),
            question,
        })
        .collect();

    tracing::debug!(count = question_list.len(), "built index context");
    Ok(IndexContext {
        empty: question_list.is_empty(),
        question_list,
    })
}

// ---------------------------------------------------------------------------
// Detail
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
pub struct DetailContext {
    pub question: Question,
    pub choices: Vec<Choice>,
}

pub fn detail_context(
    store: &dyn QuestionStore,
    question_id: u64,
    now: DateTime<Utc>,
) -> Result<DetailContext> {
    let question = policy::get_visible_by_id(store, question_id, now)?;
    let choices = store.find_choices_for_question(question.id)?;

    tracing::debug!(question_id, choices = choices.len(), "built detail context");
    Ok(DetailContext { question, choices })
}

// ---------------------------------------------------------------------------
// Results
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChoiceResult {
    pub choice_id: u64,
    pub choice_text: String,
    pub votes: u32,
}

#[derive(Debug, Clone, Serialize)]
pub struct ResultsContext {
    pub question: Question,
    pub results: Vec<ChoiceResult>,
    pub total_votes: u64,
}

pub fn results_context(
    store: &dyn QuestionStore,
    question_id: u64,
    now: DateTime<Utc>,
) -> Result<ResultsContext> {
    let question = policy::get_visible_by_id(store, question_id, now)?;
    let results: Vec<ChoiceResult> = store
        .find_choices_for_question(question.id)?
        .into_iter()
        .map(|c| ChoiceResult {
            choice_id: c.id,
            choice_text: c.choice_text,
            votes: c.votes,
        })
        .collect();
    let total_votes = results.iter().map(|r| u64::from(r.votes)).sum();

    tracing::debug!(question_id, total_votes, "built results context");
    Ok(ResultsContext {
        question,
        results,
        total_votes,
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
