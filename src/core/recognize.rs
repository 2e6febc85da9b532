//! Product recognition: a small set of metadata fingerprint rules deciding
//! whether a file belongs to the product family a mapper handles. Pure
//! predicate; opens no files.
use crate::io::source::ProductMetadata;

#[derive(Debug, Clone, Copy)]
pub enum Expect {
    Equals(&'static str),
    Contains(&'static str),
}

#[derive(Debug, Clone, Copy)]
pub struct MetadataRule {
    pub key: &'static str,
    pub expect: Expect,
}

impl MetadataRule {
    pub const fn equals(key: &'static str, value: &'static str) -> Self {
        Self {
            key,
            expect: Expect::Equals(value),
        }
    }

    pub const fn contains(key: &'static str, value: &'static str) -> Self {
        Self {
            key,
            expect: Expect::Contains(value),
        }
    }

    fn holds(&self, metadata: &ProductMetadata) -> bool {
        match (metadata.get(self.key), self.expect) {
            (Some(v), Expect::Equals(expected)) => v == expected,
            (Some(v), Expect::Contains(expected)) => v.contains(expected),
            (None, _) => false,
        }
    }
}

/// Ordered conjunction of fingerprint rules. All rules must hold; a missing
/// key is a definitive reject.
#[derive(Debug, Clone)]
pub struct Recognizer {
    rules: Vec<MetadataRule>,
}

impl Recognizer {
    pub fn new(rules: Vec<MetadataRule>) -> Self {
        Self { rules }
    }

    pub fn recognize(&self, metadata: &ProductMetadata) -> bool {
        self.rules.iter().all(|rule| rule.holds(metadata))
    }
}
