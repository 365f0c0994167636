use std::io::{self, IsTerminal, Read};
use std::path::Path;

use satchel_core::db::{NoteRepository, SqliteNoteRepository};

use crate::commands::common::open_database;
use crate::error::CliError;

pub fn run_add(content: &[String], db_path: &Path) -> Result<(), CliError> {
    let text = gather_content(content)?;
    let (title, body) = split_first_line(&text);

    let db = open_database(db_path)?;
    let repo = SqliteNoteRepository::new(db.connection());
    let note = repo.create(title, body)?;
    println!("Created note {}", note.id);
    Ok(())
}

/// Joined argument words, or piped stdin when no arguments were given
fn gather_content(content: &[String]) -> Result<String, CliError> {
    let joined = content.join(" ").trim().to_string();
    if !joined.is_empty() {
        return Ok(joined);
    }

    let mut stdin = io::stdin();
    if stdin.is_terminal() {
        return Err(CliError::EmptyContent);
    }

    let mut piped = String::new();
    stdin.read_to_string(&mut piped)?;
    let piped = piped.trim().to_string();
    if piped.is_empty() {
        return Err(CliError::EmptyContent);
    }
    Ok(piped)
}

/// First line becomes the title, the rest is the body
fn split_first_line(text: &str) -> (&str, &str) {
    text.split_once('\n').unwrap_or((text, ""))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_split_first_line() {
        assert_eq!(split_first_line("only title"), ("only title", ""));
        assert_eq!(split_first_line("title\nbody\nmore"), ("title", "body\nmore"));
    }
}
