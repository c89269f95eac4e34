//! One module per column type. All share the same contract: a group of
//! transcriptions in, exactly one `Reconciliation` out, even for an
//! all-blank group.

pub mod numeric;
pub mod same;
pub mod select;
pub mod text;
