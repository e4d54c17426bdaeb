use std::collections::HashMap;

use crate::common::types::{CanonicalRecord, IdentityKey};

/// Collapse records sharing an identity key.
///
/// Later records replace earlier ones with the same key, but the slot keeps
/// the position where that key was first seen.
pub fn deduplicate(records: &[CanonicalRecord]) -> Vec<CanonicalRecord> {
    let mut slots: HashMap<IdentityKey, usize> = HashMap::with_capacity(records.len());
    let mut out: Vec<CanonicalRecord> = Vec::with_capacity(records.len());

    for record in records {
        match slots.get(&record.identity_key()) {
            Some(&idx) => out[idx] = record.clone(),
            None => {
                slots.insert(record.identity_key(), out.len());
                out.push(record.clone());
            }
        }
    }

    out
}
