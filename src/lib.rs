//! Purpose: Layered key/value configuration store backed by plain text files.
//! Exports: `core` (text codec, list codec, typed values, sections, the layered store, errors).
//! Role: Single source of truth for settings; callers read and mutate through `core::store::Config`.
//! Invariants: Reads resolve local-tier-first; serialization is a pure read of current state.
//! Invariants: The store holds no streams, locks, or background state between calls.
pub mod core;
