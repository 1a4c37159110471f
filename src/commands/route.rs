// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Route command - compute shortest paths from one router

use super::render::{self, Output};
use super::RunArgs;
use crate::config::Config;
use crate::lsa;
use crate::route::Route;
use crate::session::Session;
use crate::spf::SpfRun;
use crate::types::Mode;
use anyhow::{Context, Result};
use serde_json::json;
use std::path::Path;
use tracing::info;

/// Run the route command
pub fn run(topology: &Path, args: &RunArgs, config: &Config, output: Output) -> Result<()> {
    let source = args.source(config)?;
    let mode = args.mode(config);
    let mut session = Session::new(lsa::load(topology, args.load_options(config))?);

    info!("Computing routes from {} ({} mode)", source, mode);
    let run = compute(&mut session, &source, mode, output)?;

    if output.json {
        println!("{}", serde_json::to_string_pretty(&run_json(run))?);
    } else {
        print!("{}", render::route_table(&run.tree, output.color));
    }
    Ok(())
}

/// Run the engine; in incremental text mode discoveries print as they happen
pub(crate) fn compute<'s>(
    session: &'s mut Session,
    source: &str,
    mode: Mode,
    output: Output,
) -> Result<&'s SpfRun> {
    let run = if mode == Mode::Incremental && !output.json {
        session.run_with(source, |event| {
            println!("{}", render::discovery_line(event, output.color));
        })
    } else {
        session.run(source, mode)
    };
    run.with_context(|| format!("Cannot compute routes from {source}"))
}

/// JSON document for a run
pub(crate) fn run_json(run: &SpfRun) -> serde_json::Value {
    let routes: Vec<_> = run
        .tree
        .routes()
        .into_iter()
        .map(|(destination, route)| match route {
            Some(Route { hops, cost, .. }) => json!({
                "destination": destination,
                "reachable": true,
                "path": hops,
                "cost": cost,
            }),
            None => json!({
                "destination": destination,
                "reachable": false,
            }),
        })
        .collect();

    json!({
        "source": run.tree.source(),
        "mode": run.mode,
        "discoveries": run.discoveries,
        "routes": routes,
    })
}
