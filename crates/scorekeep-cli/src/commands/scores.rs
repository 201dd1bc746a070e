//! Score commands
//!
//! Usage:
//!   scorekeep add <NAME> <VALUE>
//!   scorekeep list [--json]
//!   scorekeep show <ID>
//!   scorekeep edit <ID> <NAME> <VALUE>
//!   scorekeep remove <ID>
//!
//! Every mutation re-reads the full list afterwards and prints it, so the
//! output always reflects what is stored.

use clap::Args;
use scorekeep_core::errors::{ExError, ExErrorKind};
use scorekeep_core::{Score, ScoreDraft, ScoreId};
use scorekeep_store::{SchemaOutcome, ScoreStore, StoreConfig};
use std::path::Path;

type CommandResult = Result<(), Box<dyn std::error::Error>>;

#[derive(Debug, Args)]
pub struct AddArgs {
    /// Name the score is recorded under
    pub name: String,

    /// Integer score value
    #[arg(allow_hyphen_values = true)]
    pub value: String,
}

#[derive(Debug, Args)]
pub struct ListArgs {
    /// Print the list as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Args)]
pub struct ShowArgs {
    /// Id of the score
    pub id: ScoreId,
}

#[derive(Debug, Args)]
pub struct EditArgs {
    /// Id of the score to change
    pub id: ScoreId,

    /// New name
    pub name: String,

    /// New integer score value
    #[arg(allow_hyphen_values = true)]
    pub value: String,
}

#[derive(Debug, Args)]
pub struct RemoveArgs {
    /// Id of the score to remove
    pub id: ScoreId,
}

/// Execute add
pub fn add(db: &Path, args: AddArgs) -> CommandResult {
    // Validate before touching the database
    let draft = ScoreDraft::parse(args.name, &args.value)?;

    let store = open_store(db)?;
    let score = store.create(&draft)?;
    println!("✓ Added #{} {}", score.id, score);

    print_table(&store.list()?);
    store.close()?;
    Ok(())
}

/// Execute list
pub fn list(db: &Path, args: ListArgs) -> CommandResult {
    let store = open_store(db)?;
    let scores = store.list()?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&scores)?);
    } else {
        print_table(&scores);
    }

    store.close()?;
    Ok(())
}

/// Execute show
pub fn show(db: &Path, args: ShowArgs) -> CommandResult {
    let store = open_store(db)?;
    let score = store.get(args.id)?.ok_or_else(|| not_found(args.id))?;
    println!("{}", row(&score));
    store.close()?;
    Ok(())
}

/// Execute edit
pub fn edit(db: &Path, args: EditArgs) -> CommandResult {
    let draft = ScoreDraft::parse(args.name, &args.value)?;

    let store = open_store(db)?;
    let score = store
        .update(args.id, &draft)?
        .ok_or_else(|| not_found(args.id))?;
    println!("✓ Updated #{} {}", score.id, score);

    print_table(&store.list()?);
    store.close()?;
    Ok(())
}

/// Execute remove
pub fn remove(db: &Path, args: RemoveArgs) -> CommandResult {
    let store = open_store(db)?;
    if !store.delete(args.id)? {
        return Err(not_found(args.id).into());
    }
    println!("✓ Removed #{}", args.id);

    print_table(&store.list()?);
    store.close()?;
    Ok(())
}

fn open_store(db: &Path) -> Result<ScoreStore, ExError> {
    tracing::debug!(db = %db.display(), "opening score store");
    let store = ScoreStore::open(&StoreConfig::file(db).with_create_parent_dirs(true))?;
    match store.schema_outcome() {
        SchemaOutcome::Rebuilt {
            from,
            to,
            discarded_rows,
        } => eprintln!(
            "warning: schema changed from version {} to {}; {} stored score(s) were discarded",
            from, to, discarded_rows
        ),
        SchemaOutcome::Repaired {
            version,
            discarded_rows,
        } => eprintln!(
            "warning: scores table did not match schema version {} and was recreated; {} stored score(s) were discarded",
            version, discarded_rows
        ),
        SchemaOutcome::Created { .. } | SchemaOutcome::Current { .. } => {}
    }
    Ok(store)
}

fn not_found(id: ScoreId) -> ExError {
    ExError::new(ExErrorKind::NotFound)
        .with_entity_id(id.to_string())
        .with_message("No score with this id")
}

fn row(score: &Score) -> String {
    format!("{}\t{}\t{}", score.id, score.name, score.value)
}

fn print_table(scores: &[Score]) {
    if scores.is_empty() {
        println!("(no scores)");
        return;
    }
    for score in scores {
        println!("{}", row(score));
    }
}
