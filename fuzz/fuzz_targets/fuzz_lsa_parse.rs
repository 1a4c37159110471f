// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2026 Jonathan D.A. Jewell
#![no_main]

use libfuzzer_sys::fuzz_target;
use linkstate::lsa::{self, LoadOptions};
use linkstate::spf;
use linkstate::types::Mode;

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    let Ok(topology) = lsa::parse(text, LoadOptions::default()) else {
        return;
    };
    // anything that loads must be routable from every router
    for source in topology.vertices() {
        let run = spf::compute(&topology, source, Mode::Incremental).unwrap();
        assert_eq!(run.tree.distance(source), Some(0));
    }
});
