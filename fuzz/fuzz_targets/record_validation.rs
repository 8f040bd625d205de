#![no_main]

//! Fuzz target for record validation.
//!
//! Feeds arbitrary request bodies and query strings through every record
//! validator. Validation must reject or accept, never panic, and anything
//! accepted must convert to a storable document.

use std::collections::HashMap;

use libfuzzer_sys::fuzz_target;
use outbound_core::{
    Campaign, ColdCallerMatchInput, CopywritingInput, IntentSignal, LaunchInput, Lead, ListQuery,
    MeetingRequest, PersonaWorkshopInput, Record,
};
use serde_json::Value;

fuzz_target!(|data: &[u8]| {
    if let Ok(value) = serde_json::from_slice::<Value>(data) {
        check::<Lead>(&value);
        check::<IntentSignal>(&value);
        check::<Campaign>(&value);
        check::<MeetingRequest>(&value);
        check::<PersonaWorkshopInput>(&value);
        check::<CopywritingInput>(&value);
        check::<ColdCallerMatchInput>(&value);
        check::<LaunchInput>(&value);
    }

    if let Ok(text) = std::str::from_utf8(data) {
        let params: HashMap<String, String> = text
            .split('&')
            .filter_map(|pair| pair.split_once('='))
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect();
        if let Ok(query) = ListQuery::parse(params) {
            let _ = query.filter_value("tag");
        }
    }
});

fn check<T: Record>(value: &Value) {
    match T::validate(value) {
        Ok(record) => {
            assert!(record.to_document().is_ok());
        },
        Err(err) => {
            assert!(!err.violations().is_empty());
        },
    }
}
