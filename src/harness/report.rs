/*!
 * Stress Reports
 */

use crate::core::types::{Identity, Variant};
use serde::Serialize;
use std::collections::BTreeSet;
use std::fmt;
use uuid::Uuid;

/// Outcome of one stress run
#[derive(Debug, Clone, Serialize)]
pub struct StressReport {
    pub run_id: Uuid,
    pub variant: Option<Variant>,
    pub threads: usize,
    pub calls: usize,
    pub distinct_identities: usize,
    pub first_identity: Option<Identity>,
    #[serde(skip)]
    pub identities: Vec<Identity>,
    pub constructions: Option<usize>,
    pub torn_reads: usize,
    pub panicked_threads: usize,
    pub elapsed_us: u64,
}

impl StressReport {
    pub(crate) fn new(run_id: Uuid, threads: usize, identities: Vec<Identity>) -> Self {
        let distinct: BTreeSet<Identity> = identities.iter().copied().collect();
        Self {
            run_id,
            variant: None,
            threads,
            calls: identities.len(),
            distinct_identities: distinct.len(),
            first_identity: identities.first().copied(),
            identities,
            constructions: None,
            torn_reads: 0,
            panicked_threads: 0,
            elapsed_us: 0,
        }
    }

    pub fn with_variant(mut self, variant: Variant) -> Self {
        self.variant = Some(variant);
        self
    }

    pub fn with_constructions(mut self, constructions: usize) -> Self {
        self.constructions = Some(constructions);
        self
    }

    /// Every call from every thread returned the same object
    pub fn is_unique(&self) -> bool {
        self.distinct_identities == 1 && self.panicked_threads == 0
    }

    /// The constructor ran exactly once, if a count was recorded
    pub fn constructed_once(&self) -> bool {
        self.constructions.map_or(true, |count| count == 1)
    }

    /// Unique, constructed once, and no reader saw a partial instance
    pub fn is_clean(&self) -> bool {
        self.is_unique() && self.constructed_once() && self.torn_reads == 0
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

impl fmt::Display for StressReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let variant = self.variant.map_or("ad-hoc", Variant::name);
        write!(
            f,
            "{variant}: {} calls on {} threads, {} distinct instance(s)",
            self.calls, self.threads, self.distinct_identities
        )?;
        if let Some(count) = self.constructions {
            write!(f, ", {count} construction(s)")?;
        }
        if self.torn_reads > 0 {
            write!(f, ", {} torn read(s)", self.torn_reads)?;
        }
        if self.panicked_threads > 0 {
            write!(f, ", {} panicked thread(s)", self.panicked_threads)?;
        }
        Ok(())
    }
}
