//! # Error Suggestions
//!
//! Helpers that turn failures into messages telling the user what went
//! wrong AND how to fix it. Fatal errors additionally carry the contents of
//! the shipped `hint.txt`, which points at the project's documentation.

use std::fs;
use std::path::Path;

use log::debug;

use crate::context::{Environment, RunContext};

/// Environment names accepted by `--env`.
const ENVIRONMENTS: [&str; 4] = ["prod", "dev", "local", "build"];

/// Attach the hint file to a fatal error.
///
/// The primary error is always kept; a missing hint file only drops the
/// extra text.
pub fn fatal(error: crate::error::Error, ctx: &RunContext) -> anyhow::Error {
    match read_hint(&ctx.hint_file()) {
        Some(hint) => anyhow::anyhow!("{error}\n\n{hint}"),
        None => anyhow::Error::new(error),
    }
}

/// Read the hint text, or `None` if it is absent or empty.
pub fn read_hint(path: &Path) -> Option<String> {
    match fs::read_to_string(path) {
        Ok(text) if !text.trim().is_empty() => Some(text.trim_end().to_string()),
        Ok(_) => None,
        Err(e) => {
            debug!("No hint available at {}: {}", path.display(), e);
            None
        }
    }
}

/// Warning for an `--env` value that selects no known environment.
///
/// Returns `None` when the value is known.
pub fn unknown_environment(value: &str) -> Option<String> {
    if ENVIRONMENTS.contains(&value) {
        return None;
    }
    let did_you_mean = find_similar(value, &ENVIRONMENTS)
        .map(|s| format!("\nhint: Did you mean '{s}'?"))
        .unwrap_or_default();
    Some(format!(
        "Unknown environment '{value}', using '{fallback}'{did_you_mean}\n\
         hint: Valid environments are: {envs}",
        fallback = Environment::Production,
        envs = ENVIRONMENTS.join(", ")
    ))
}

/// Message shown when the per-user settings file could not be created.
pub fn local_config_missing(path: &Path) -> String {
    format!(
        "The local config file {path} does not exist\n\
         hint: Run again with --manage-host=true to let Vagrant manage /etc/hosts\n\
         hint: Run again with --manage-host=false to leave host entries alone",
        path = path.display()
    )
}

/// Find a similar string from a list of candidates using edit distance.
///
/// Returns Some(candidate) if a close match is found (edit distance <= 2).
fn find_similar<'a>(input: &str, candidates: &[&'a str]) -> Option<&'a str> {
    candidates
        .iter()
        .filter_map(|&candidate| {
            let distance = edit_distance(input, candidate);
            if distance <= 2 && distance < input.len() {
                Some((candidate, distance))
            } else {
                None
            }
        })
        .min_by_key(|(_, distance)| *distance)
        .map(|(candidate, _)| candidate)
}

/// Calculate the Levenshtein edit distance between two strings.
fn edit_distance(a: &str, b: &str) -> usize {
    let a_chars: Vec<char> = a.chars().collect();
    let b_chars: Vec<char> = b.chars().collect();
    let (a_len, b_len) = (a_chars.len(), b_chars.len());

    if a_len == 0 {
        return b_len;
    }
    if b_len == 0 {
        return a_len;
    }

    // Single rolling row
    let mut row: Vec<usize> = (0..=b_len).collect();
    for i in 1..=a_len {
        let mut diagonal = row[0];
        row[0] = i;
        for j in 1..=b_len {
            let cost = usize::from(a_chars[i - 1] != b_chars[j - 1]);
            let next = (row[j] + 1).min(row[j - 1] + 1).min(diagonal + cost);
            diagonal = row[j];
            row[j] = next;
        }
    }
    row[b_len]
}
