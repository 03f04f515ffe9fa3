//! Upsert batch preparation.
//!
//! Records missing their token key or ecosystem key cannot be written and
//! are filtered out before the batch transaction opens.

use crate::model::TokenRecord;

/// A validated batch, borrowing the accepted records in input order.
#[derive(Debug)]
pub struct PreparedBatch<'a> {
    accepted: Vec<&'a TokenRecord>,
    submitted: usize,
}

impl<'a> PreparedBatch<'a> {
    /// Split `records` into writable records and a dropped count.
    pub fn new(records: &'a [TokenRecord]) -> Self {
        let accepted = records
            .iter()
            .filter(|record| record.key().is_some() && record.ecosystem_key().is_some())
            .collect();
        Self {
            accepted,
            submitted: records.len(),
        }
    }

    /// Records to write, in input order.
    pub fn accepted(&self) -> &[&'a TokenRecord] {
        &self.accepted
    }

    /// Number of records passed in.
    pub fn submitted(&self) -> usize {
        self.submitted
    }

    /// Number of records filtered out for a missing key.
    pub fn dropped(&self) -> usize {
        self.submitted - self.accepted.len()
    }

    /// Whether no record survived filtering.
    pub fn is_empty(&self) -> bool {
        self.accepted.is_empty()
    }
}
