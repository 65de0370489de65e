#![no_main]

use libfuzzer_sys::fuzz_target;
use recolor_core::Mapping;

// First half is a TSV mapping, second half the text it is applied to
fuzz_target!(|data: &[u8]| {
    if data.is_empty() {
        return;
    }

    let input = String::from_utf8_lossy(data);
    let split = input
        .char_indices()
        .nth(input.chars().count() / 2)
        .map_or(input.len(), |(i, _)| i);
    let (table, text) = input.split_at(split);

    let Ok(mapping) = Mapping::from_tsv_str(table) else {
        return;
    };

    let applied = mapping.apply(text);
    assert_eq!(applied.counts.len(), mapping.len());
    if applied.total() == 0 {
        assert_eq!(applied.text, text);
    }

    let reparsed = Mapping::from_tsv_str(&mapping.to_tsv()).expect("serialized mapping parses");
    assert_eq!(reparsed, mapping);
});
