//! Command handlers.

pub(crate) mod copy;
