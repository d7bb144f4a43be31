// Job matching core: similarity primitives, stored-record normalization and
// the ranking engine. Pure and synchronous; no I/O happens in here.

use std::collections::BTreeSet;

pub mod normalizer;
pub mod ranking;
pub mod similarity;

/// Fixed-length semantic vector produced by the embedding service.
pub type Embedding = Vec<f64>;

/// Case-sensitive skill tags. Ordered so serialized output is stable.
pub type SkillSet = BTreeSet<String>;
