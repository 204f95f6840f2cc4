//! Request extractors.

mod identity;
