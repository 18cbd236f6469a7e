//! Fuzz target for `KmerTable::ingest`.
//!
//! The first byte picks the maximum k-mer length and the counting mode; the
//! rest is treated as one sequence line.

#![no_main]

use findkmers::kmer::{CountMode, MaxK};
use findkmers::table::{substring_count, KmerTable};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Some((&selector, line)) = data.split_first() else {
        return;
    };
    if line.len() > 512 {
        return;
    }

    let max_k = MaxK::clamped(i64::from(selector & 0x0f));
    let mode = if selector & 0x80 == 0 {
        CountMode::Aggregate
    } else {
        CountMode::Positional
    };

    let mut table = KmerTable::new(max_k, mode);
    let added = table.ingest(line);

    // Only one line, so every distinct key was new
    assert_eq!(added, table.len());

    let total: u64 = table.sorted().iter().map(|(_, record)| record.total()).sum();
    assert_eq!(total, substring_count(line.len(), max_k) as u64);

    for (kmer, record) in table.sorted() {
        assert!(
            (1..=max_k.get()).contains(&kmer.len()),
            "key of length {} outside 1..={}",
            kmer.len(),
            max_k
        );
        if mode == CountMode::Positional {
            assert!(record.values().len() <= line.len());
        }
    }
});
