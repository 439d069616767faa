use crate::output::print_json;
use anyhow::Context;
use clap::Subcommand;
use std::path::Path;

#[derive(Subcommand)]
pub enum ChoiceSubcommand {
    /// Add a choice to a question
    Add {
        question_id: u64,
        /// Choice text
        text: String,
        /// Initial vote tally
        #[arg(long, default_value = "0")]
        votes: u32,
    },
}

pub fn run(root: &Path, subcmd: ChoiceSubcommand, json: bool) -> anyhow::Result<()> {
    match subcmd {
        ChoiceSubcommand::Add {
            question_id,
            text,
            votes,
        } => add(root, question_id, &text, votes, json),
    }
}

fn add(root: &Path, question_id: u64, text: &str, votes: u32, json: bool) -> anyhow::Result<()> {
    let db = super::open_db(root)?;
    let choice = db
        .add_choice(question_id, text, votes)
        .with_context(|| format!("failed to add choice to question {question_id}"))?;

    if json {
        print_json(&choice)?;
    } else {
        println!(
            "Added choice {} to question {}: {}",
            choice.id, choice.question_id, choice.choice_text
        );
    }
    Ok(())
}
