// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Replay command - run a script of topology edits and route computations
//!
//! Script directives, one per line (`#` starts a comment):
//!
//! ```text
//! route            # recompute from the default source
//! route B          # recompute from B
//! add F: A:3 C:2   # new router F linked to A and C
//! del B            # remove router B and its links
//! unlink A C       # remove the A - C link (also `unlink AC`)
//! relations        # dump the adjacency
//! ```

use super::render::{self, Output};
use super::route::{compute, run_json};
use super::RunArgs;
use crate::config::Config;
use crate::error::TopologyError;
use crate::lsa;
use crate::mutate::{EdgeEdit, Mutation, NodeEdit};
use crate::session::Session;
use crate::types::Label;
use anyhow::{bail, Context, Result};
use serde_json::json;
use std::fs;
use std::path::Path;
use tracing::{info, warn};

/// One script step
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Directive {
    /// Change the topology
    Mutate(Mutation),
    /// Recompute routes, optionally from another source
    Route(Option<Label>),
    /// Print the adjacency dump
    Relations,
}

fn script_error(line: usize, message: impl Into<String>) -> TopologyError {
    TopologyError::Parse {
        line,
        message: message.into(),
    }
}

/// Parse one script line; `None` for blanks and comments
pub fn parse_directive(text: &str, line: usize) -> Result<Option<Directive>, TopologyError> {
    let text = text.split('#').next().unwrap_or_default().trim();
    if text.is_empty() {
        return Ok(None);
    }
    let (word, rest) = text.split_once(char::is_whitespace).unwrap_or((text, ""));
    let args: Vec<&str> = rest.split_whitespace().collect();

    let directive = match word.to_lowercase().as_str() {
        "route" | "run" => match args.as_slice() {
            [] => Directive::Route(None),
            [source] => Directive::Route(Some((*source).to_string())),
            _ => return Err(script_error(line, "usage: route [source]")),
        },
        "relations" => Directive::Relations,
        "add" => {
            let record = lsa::parse_record(rest, line)?
                .ok_or_else(|| script_error(line, "usage: add <router> [neighbour:cost ...]"))?;
            Directive::Mutate(
                NodeEdit::Add {
                    label: record.label,
                    links: record.links,
                }
                .into(),
            )
        }
        "del" | "delete" => match args.as_slice() {
            [label] => Directive::Mutate(
                NodeEdit::Delete {
                    label: (*label).to_string(),
                }
                .into(),
            ),
            _ => return Err(script_error(line, "usage: del <router>")),
        },
        "unlink" => {
            let (a, b) = match args.as_slice() {
                [a, b] => ((*a).to_string(), (*b).to_string()),
                // two single-character routers written together, e.g. `AB`
                [pair] if pair.chars().count() == 2 => {
                    let mut chars = pair.chars();
                    let a = chars.next().map(String::from).unwrap_or_default();
                    let b = chars.next().map(String::from).unwrap_or_default();
                    (a, b)
                }
                _ => return Err(script_error(line, "usage: unlink <a> <b>")),
            };
            Directive::Mutate(EdgeEdit { a, b }.into())
        }
        other => return Err(script_error(line, format!("unknown directive '{other}'"))),
    };
    Ok(Some(directive))
}

/// Parse a whole script, keeping line numbers
pub fn parse_script(text: &str) -> Result<Vec<(usize, Directive)>, TopologyError> {
    text.lines()
        .enumerate()
        .filter_map(|(i, line)| {
            parse_directive(line, i + 1)
                .map(|d| d.map(|d| (i + 1, d)))
                .transpose()
        })
        .collect()
}

/// Run the replay command.
///
/// A failed edit or route request is reported and the script continues;
/// edits are all-or-nothing so the topology stays consistent. The command
/// fails at the end if any step failed.
pub fn run(
    topology: &Path,
    script: &Path,
    args: &RunArgs,
    config: &Config,
    output: Output,
) -> Result<()> {
    let text = fs::read_to_string(script)
        .with_context(|| format!("Failed to read {}", script.display()))?;
    let steps = parse_script(&text).with_context(|| format!("Failed to parse {}", script.display()))?;
    let default_source = args.source.clone().or_else(|| config.source.clone());
    let mode = args.mode(config);
    let mut session = Session::new(lsa::load(topology, args.load_options(config))?);

    info!("Replaying {} step(s) from {}", steps.len(), script.display());
    let mut failures = 0usize;
    let mut documents = Vec::new();

    for (line, directive) in steps {
        match directive {
            Directive::Mutate(mutation) => match session.apply(&mutation) {
                Ok(outcome) => {
                    if output.json {
                        documents.push(json!({ "line": line, "applied": outcome }));
                    } else {
                        println!("{outcome}");
                    }
                }
                Err(err) => {
                    failures += 1;
                    warn!("Line {}: {}", line, err);
                    report_failure(&mut documents, line, &err.to_string(), output);
                }
            },
            Directive::Route(source) => {
                let Some(source) = source.or_else(|| default_source.clone()) else {
                    failures += 1;
                    warn!("Line {}: no source router given", line);
                    report_failure(&mut documents, line, "no source router given and no default source", output);
                    continue;
                };
                match compute(&mut session, &source, mode, output) {
                    Ok(run) => {
                        if output.json {
                            documents.push(json!({ "line": line, "run": run_json(run) }));
                        } else {
                            print!("{}", render::route_table(&run.tree, output.color));
                        }
                    }
                    Err(err) => {
                        failures += 1;
                        warn!("Line {}: {:#}", line, err);
                        report_failure(&mut documents, line, &format!("{err:#}"), output);
                    }
                }
            }
            Directive::Relations => {
                if output.json {
                    documents.push(json!({ "line": line, "relations": session.relations() }));
                } else {
                    print!("{}", render::relations(&session.relations()));
                }
            }
        }
    }

    if output.json {
        println!("{}", serde_json::to_string_pretty(&documents)?);
    }
    if failures > 0 {
        bail!("{failures} step(s) failed");
    }
    Ok(())
}

fn report_failure(documents: &mut Vec<serde_json::Value>, line: usize, message: &str, output: Output) {
    if output.json {
        documents.push(json!({ "line": line, "error": message }));
    } else {
        println!("Error on line {line}: {message}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_add() {
        let directive = parse_directive("add F: A:3 C:2", 1).unwrap().unwrap();
        assert_eq!(
            directive,
            Directive::Mutate(Mutation::Node(NodeEdit::Add {
                label: "F".into(),
                links: vec![("A".into(), 3), ("C".into(), 2)],
            }))
        );
    }

    #[test]
    fn test_parse_unlink_forms() {
        let expected = Directive::Mutate(Mutation::Edge(EdgeEdit {
            a: "A".into(),
            b: "C".into(),
        }));
        assert_eq!(parse_directive("unlink A C", 1).unwrap().unwrap(), expected);
        assert_eq!(parse_directive("unlink AC", 1).unwrap().unwrap(), expected);
        assert!(parse_directive("unlink ABC", 1).is_err());
    }

    #[test]
    fn test_parse_script_skips_comments() {
        let steps = parse_script("# setup\nroute\n\ndel B # gone\nroute C\nrelations\n").unwrap();
        let lines: Vec<_> = steps.iter().map(|(line, _)| *line).collect();
        assert_eq!(lines, vec![2, 4, 5, 6]);
        assert_eq!(steps[2].1, Directive::Route(Some("C".into())));
    }

    #[test]
    fn test_unknown_directive() {
        let err = parse_script("route\nfly A\n").unwrap_err();
        assert!(matches!(err, TopologyError::Parse { line: 2, .. }));
    }
}
