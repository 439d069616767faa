use crate::output::{print_json, print_table};
use anyhow::Context;
use chrono::{DateTime, Utc};
use clap::Subcommand;
use polls_core::{policy, store::QuestionStore};
use std::path::Path;

#[derive(Subcommand)]
pub enum QuestionSubcommand {
    /// Create a new question
    Create {
        /// Question text
        text: String,
        /// Publish time as RFC 3339 (default: now). A future time hides the
        /// question until then.
        #[arg(long, value_name = "RFC3339")]
        published_at: Option<DateTime<Utc>>,
    },
    /// List questions, newest first
    List {
        /// Include questions that are not published yet
        #[arg(long)]
        all: bool,
    },
    /// Show a question with its choices and vote counts
    Show { id: u64 },
    /// Delete a question and all of its choices
    Delete { id: u64 },
}

pub fn run(root: &Path, subcmd: QuestionSubcommand, json: bool) -> anyhow::Result<()> {
    match subcmd {
        QuestionSubcommand::Create { text, published_at } => {
            create(root, &text, published_at.unwrap_or_else(Utc::now), json)
        }
        QuestionSubcommand::List { all } => list(root, all, json),
        QuestionSubcommand::Show { id } => show(root, id, json),
        QuestionSubcommand::Delete { id } => delete(root, id, json),
    }
}

fn create(root: &Path, text: &str, pub_date: DateTime<Utc>, json: bool) -> anyhow::Result<()> {
    let db = super::open_db(root)?;
    let question = db
        .create_question(text, pub_date)
        .context("failed to create question")?;

    if json {
        print_json(&question)?;
    } else {
        println!("Created question {}: {}", question.id, question.question_text);
        if !question.is_published(Utc::now()) {
            println!("  Unpublished until {}", question.pub_date.to_rfc3339());
        }
    }
    Ok(())
}

fn list(root: &Path, all: bool, json: bool) -> anyhow::Result<()> {
    let db = super::open_db(root)?;
    let now = Utc::now();
    let questions = if all {
        let mut qs = db.find_all_questions().context("failed to list questions")?;
        policy::sort_newest_first(&mut qs);
        qs
    } else {
        policy::list_visible(&db, now).context("failed to list questions")?
    };

    if json {
        let items: Vec<serde_json::Value> = questions
            .iter()
            .map(|q| {
                serde_json::json!({
                    "id": q.id,
                    "question_text": q.question_text,
                    "pub_date": q.pub_date,
                    "published": q.is_published(now),
                    "was_published_recently": q.was_published_recently(now),
                })
            })
            .collect();
        print_json(&items)?;
        return Ok(());
    }

    if questions.is_empty() {
        println!("No questions.");
        return Ok(());
    }

    let rows: Vec<Vec<String>> = questions
        .iter()
        .map(|q| {
            let status = if !q.is_published(now) {
                "SCHEDULED"
            } else if q.was_published_recently(now) {
                "NEW"
            } else {
                ""
            };
            vec![
                q.id.to_string(),
                q.pub_date.format("%Y-%m-%d %H:%M:%S UTC").to_string(),
                status.to_string(),
                q.question_text.clone(),
            ]
        })
        .collect();
    print_table(&["ID", "PUBLISHED", "STATUS", "QUESTION"], rows);
    Ok(())
}

/// Administrative view: scheduled questions are shown too.
fn show(root: &Path, id: u64, json: bool) -> anyhow::Result<()> {
    let db = super::open_db(root)?;
    let question = db
        .find_question_by_id(id)
        .with_context(|| format!("question {id} not found"))?;
    let choices = db
        .find_choices_for_question(id)
        .with_context(|| format!("failed to load choices for question {id}"))?;
    let total_votes: u64 = choices.iter().map(|c| u64::from(c.votes)).sum();

    if json {
        print_json(&serde_json::json!({
            "question": question,
            "choices": choices,
            "total_votes": total_votes,
        }))?;
        return Ok(());
    }

    println!("Question {}: {}", question.id, question.question_text);
    println!("Published: {}", question.pub_date.to_rfc3339());
    println!("Votes:     {total_votes}");
    if choices.is_empty() {
        println!("  (no choices)");
        return Ok(());
    }
    let rows: Vec<Vec<String>> = choices
        .iter()
        .map(|c| vec![c.id.to_string(), c.votes.to_string(), c.choice_text.clone()])
        .collect();
    print_table(&["ID", "VOTES", "CHOICE"], rows);
    Ok(())
}

fn delete(root: &Path, id: u64, json: bool) -> anyhow::Result<()> {
    let db = super::open_db(root)?;
    let removed = db
        .delete_question(id)
        .with_context(|| format!("failed to delete question {id}"))?;

    if json {
        print_json(&serde_json::json!({
            "id": id,
            "choices_removed": removed,
        }))?;
    } else {
        println!("Deleted question {id} ({removed} choices).");
    }
    Ok(())
}
