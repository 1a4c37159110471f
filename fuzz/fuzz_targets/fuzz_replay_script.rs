// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2026 Jonathan D.A. Jewell
#![no_main]

use libfuzzer_sys::fuzz_target;
use linkstate::commands::replay::{parse_script, Directive};
use linkstate::lsa::{self, LoadOptions};
use linkstate::Session;

const SEED: &str = "A: B:1\nB: A:1 C:2\nC: B:2\n";

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    let Ok(steps) = parse_script(text) else {
        return;
    };
    let Ok(topology) = lsa::parse(SEED, LoadOptions::default()) else {
        return;
    };
    let mut session = Session::new(topology);
    for (_, directive) in steps {
        if let Directive::Mutate(mutation) = directive {
            let _ = session.apply(&mutation);
        }
    }
    // every surviving link must still be seen from both ends
    for relation in session.relations() {
        for link in &relation.links {
            let back = session.topology().links_of(&link.target).unwrap();
            assert!(back.iter().any(|l| l.target == relation.label && l.cost == link.cost));
        }
    }
});
