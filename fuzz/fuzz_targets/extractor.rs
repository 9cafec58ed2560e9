#![no_main]

use libfuzzer_sys::fuzz_target;

use listing_scout::extractor::extract_on;
use listing_scout::reduce::{CoercionPolicy, Reducer};

fuzz_target!(|data: &[u8]| {
    let html = String::from_utf8_lossy(data);
    let date = chrono::NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();

    // Neither stage may panic on arbitrary markup
    let records = extract_on(&html, "https://www.amazon.com", date);
    if let Ok(reducer) = Reducer::new(0.75, CoercionPolicy::SkipWithWarning) {
        let _ = reducer.reduce(records);
    }
});
