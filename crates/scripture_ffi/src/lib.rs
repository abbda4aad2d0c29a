//! Flutter-facing bindings for scripture core.

pub mod api;
