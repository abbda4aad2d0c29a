//! CLI probe for scripture core.
//!
//! # Responsibility
//! - Verify `scripture_core` linkage without the Flutter runtime.
//! - Run retrieval calls against the environment-configured sources.
//!
//! Usage:
//! - `scripture_cli` prints ping and version.
//! - `scripture_cli versions`
//! - `scripture_cli books <bible_id>`
//! - `scripture_cli chapters <bible_id> <book_id>`
//! - `scripture_cli text <bible_id> <chapter_id>`
//! - `scripture_cli clear-cache`

use scripture_core::{build_reader, open_db, ScriptureConfig, ScriptureService};
use std::process::ExitCode;

const USAGE: &str = "usage: scripture_cli [versions | books <bible_id> | chapters <bible_id> <book_id> | text <bible_id> <chapter_id> | clear-cache]";

fn main() -> ExitCode {
    let args: Vec<String> = std::env::args().skip(1).collect();
    if args.is_empty() {
        println!("scripture_core ping={}", scripture_core::ping());
        println!("scripture_core version={}", scripture_core::core_version());
        return ExitCode::SUCCESS;
    }

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            eprintln!("{message}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: &[String]) -> Result<(), String> {
    let config = ScriptureConfig::from_env().map_err(|err| err.to_string())?;
    let reader = build_reader(&config);
    let conn = open_db(config.resolved_db_path()).map_err(|err| err.to_string())?;
    let service = ScriptureService::new(&conn, config, reader);

    match args.iter().map(String::as_str).collect::<Vec<_>>().as_slice() {
        ["versions"] => {
            for version in service.get_bible_versions() {
                println!(
                    "{}\t{}\t{}\t{}",
                    version.id,
                    version.abbreviation,
                    version.source.as_str(),
                    version.name
                );
            }
        }
        ["books", bible_id] => {
            for book in service.get_books(bible_id) {
                println!("{}\t{}", book.id, book.name);
            }
        }
        ["chapters", bible_id, book_id] => {
            for chapter in service.get_chapters(bible_id, book_id) {
                println!("{}\t{}", chapter.id, chapter.reference);
            }
        }
        ["text", bible_id, chapter_id] => {
            let content = service.get_chapter_text(bible_id, chapter_id);
            println!("{}", content.content);
        }
        ["clear-cache"] => service.clear_cache(),
        _ => return Err(USAGE.to_string()),
    }
    Ok(())
}
