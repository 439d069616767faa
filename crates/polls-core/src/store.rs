//! Question and choice persistence.
//!
//! `QuestionStore` is the read interface the policy and page controllers
//! consume. `QuestionDb` implements it on top of redb and adds the
//! administrative write path.
//!
//! # Table design
//!
//! ```text
//! QUESTIONS  u64 id                                  -> JSON Question
//! CHOICES    [ question_id: u64 BE | choice_id: u64 BE ] -> JSON Choice
//! META       "next_question_id" | "next_choice_id"   -> u64
//! ```
//!
//! Choice keys put the owning question id in the high bytes, so a single
//! range scan returns one question's choices in creation order.

use std::path::Path;

use redb::{Database, ReadableTable, TableDefinition};

use crate::error::{PollsError, Result};
use crate::question::{validate_text, Choice, Question};
use chrono::{DateTime, Utc};

// ---------------------------------------------------------------------------
// QuestionStore
// ---------------------------------------------------------------------------

/// Read access to questions and their choices.
pub trait QuestionStore: Send + Sync {
    /// Every question, in no particular order.
    fn find_all_questions(&self) -> Result<Vec<Question>>;

    /// `QuestionNotFound` when no question has this id.
    fn find_question_by_id(&self, id: u64) -> Result<Question>;

    /// Choices of one question in creation order. Empty for unknown ids.
    fn find_choices_for_question(&self, question_id: u64) -> Result<Vec<Choice>>;
}

// ---------------------------------------------------------------------------
// Table definitions
// ---------------------------------------------------------------------------

const QUESTIONS: TableDefinition<u64, &[u8]> = TableDefinition::new("questions");
const CHOICES: TableDefinition<&[u8], &[u8]> = TableDefinition::new("choices");
const META: TableDefinition<&str, u64> = TableDefinition::new("meta");

const NEXT_QUESTION_ID: &str = "next_question_id";
const NEXT_CHOICE_ID: &str = "next_choice_id";

// ---------------------------------------------------------------------------
// Key helpers
// ---------------------------------------------------------------------------

fn choice_key(question_id: u64, choice_id: u64) -> [u8; 16] {
    let mut key = [0u8; 16];
    key[..8].copy_from_slice(&question_id.to_be_bytes());
    key[8..].copy_from_slice(&choice_id.to_be_bytes());
    key
}

/// Inclusive key bounds covering every choice of `question_id`.
fn choice_bounds(question_id: u64) -> ([u8; 16], [u8; 16]) {
    (choice_key(question_id, 0), choice_key(question_id, u64::MAX))
}

fn store_err(e: impl std::fmt::Display) -> PollsError {
    PollsError::Store(e.to_string())
}

/// Bump a counter in META and return the new value. Ids start at 1.
fn next_id(meta: &mut redb::Table<'_, &'static str, u64>, counter: &str) -> Result<u64> {
    let current = meta
        .get(counter)
        .map_err(store_err)?
        .map(|g| g.value())
        .unwrap_or(0);
    let id = current + 1;
    meta.insert(counter, id).map_err(store_err)?;
    Ok(id)
}

// ---------------------------------------------------------------------------
// QuestionDb
// ---------------------------------------------------------------------------

/// redb-backed question store.
pub struct QuestionDb {
    db: Database,
}

impl QuestionDb {
    /// Open or create the database at `path`, creating all tables.
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            crate::io::ensure_dir(parent)?;
        }
        let db = Database::create(path).map_err(store_err)?;
        let wt = db.begin_write().map_err(store_err)?;
        wt.open_table(QUESTIONS).map_err(store_err)?;
        wt.open_table(CHOICES).map_err(store_err)?;
        wt.open_table(META).map_err(store_err)?;
        wt.commit().map_err(store_err)?;
        Ok(Self { db })
    }

    /// Insert a new question and return it with its assigned id.
    pub fn create_question(
        &self,
        question_text: impl Into<String>,
        pub_date: DateTime<Utc>,
    ) -> Result<Question> {
        let question_text = question_text.into();
        validate_text(&question_text)?;

        let wt = self.db.begin_write().map_err(store_err)?;
        let question = {
            let mut meta = wt.open_table(META).map_err(store_err)?;
            let id = next_id(&mut meta, NEXT_QUESTION_ID)?;
            let question = Question {
                id,
                question_text,
                pub_date,
            };
            let value = serde_json::to_vec(&question)?;
            let mut questions = wt.open_table(QUESTIONS).map_err(store_err)?;
            questions
                .insert(id, value.as_slice())
                .map_err(store_err)?;
            question
        };
        wt.commit().map_err(store_err)?;

        tracing::debug!(id = question.id, "created question");
        Ok(question)
    }

    /// Attach a choice to an existing question.
    ///
    /// Fails with `QuestionNotFound` if the question does not exist; the check
    /// and the insert share one write transaction.
    pub fn add_choice(
        &self,
        question_id: u64,
        choice_text: impl Into<String>,
        votes: u32,
    ) -> Result<Choice> {
        let choice_text = choice_text.into();
        validate_text(&choice_text)?;

        let wt = self.db.begin_write().map_err(store_err)?;
        let choice = {
            let questions = wt.open_table(QUESTIONS).map_err(store_err)?;
            if questions.get(question_id).map_err(store_err)?.is_none() {
                return Err(PollsError::QuestionNotFound(question_id));
            }

            let mut meta = wt.open_table(META).map_err(store_err)?;
            let id = next_id(&mut meta, NEXT_CHOICE_ID)?;
            let choice = Choice {
                id,
                question_id,
                choice_text,
                votes,
            };
            let value = serde_json::to_vec(&choice)?;
            let mut choices = wt.open_table(CHOICES).map_err(store_err)?;
            choices
                .insert(choice_key(question_id, id).as_slice(), value.as_slice())
                .map_err(store_err)?;
            choice
        };
        wt.commit().map_err(store_err)?;

        tracing::debug!(question_id, id = choice.id, "added choice");
        Ok(choice)
    }

    /// Delete a question together with all of its choices.
    ///
    /// Returns the number of choices removed.
    pub fn delete_question(&self, id: u64) -> Result<usize> {
        let wt = self.db.begin_write().map_err(store_err)?;
        let removed = {
            let mut questions = wt.open_table(QUESTIONS).map_err(store_err)?;
            if questions.remove(id).map_err(store_err)?.is_none() {
                return Err(PollsError::QuestionNotFound(id));
            }

            let mut choices = wt.open_table(CHOICES).map_err(store_err)?;
            let (lower, upper) = choice_bounds(id);
            let keys: Vec<Vec<u8>> = choices
                .range(lower.as_slice()..=upper.as_slice())
                .map_err(store_err)?
                .map(|entry| entry.map(|(k, _)| k.value().to_vec()))
                .collect::<std::result::Result<_, _>>()
                .map_err(store_err)?;
            for key in &keys {
                choices.remove(key.as_slice()).map_err(store_err)?;
            }
            keys.len()
        };
        wt.commit().map_err(store_err)?;

        tracing::debug!(id, choices = removed, "deleted question");
        Ok(removed)
    }
}

impl QuestionStore for QuestionDb {
    fn find_all_questions(&self) -> Result<Vec<Question>> {
        let rt = self.db.begin_read().map_err(store_err)?;
        let table = rt.open_table(QUESTIONS).map_err(store_err)?;

        let mut result = Vec::new();
        for entry in table.iter().map_err(store_err)? {
            let (_, v) = entry.map_err(store_err)?;
            let question: Question = serde_json::from_slice(v.value())?;
            result.push(question);
        }
        Ok(result)
    }

    fn find_question_by_id(&self, id: u64) -> Result<Question> {
        let rt = self.db.begin_read().map_err(store_err)?;
        let table = rt.open_table(QUESTIONS).map_err(store_err)?;
        let question = match table.get(id).map_err(store_err)? {
            Some(v) => serde_json::from_slice(v.value())?,
            None => return Err(PollsError::QuestionNotFound(id)),
        };
        Ok(question)
    }

    fn find_choices_for_question(&self, question_id: u64) -> Result<Vec<Choice>> {
        let rt = self.db.begin_read().map_err(store_err)?;
        let table = rt.open_table(CHOICES).map_err(store_err)?;

        let (lower, upper) = choice_bounds(question_id);
        let mut result = Vec::new();
        for entry in table
            .range(lower.as_slice()..=upper.as_slice())
            .map_err(store_err)?
        {
            let (_, v) = entry.map_err(store_err)?;
            let choice: Choice = serde_json::from_slice(v.value())?;
            result.push(choice);
        }
        Ok(result)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
