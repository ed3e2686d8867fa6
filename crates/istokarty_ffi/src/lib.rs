//! Flutter-facing bridge for the IstoKarty core.

pub mod api;
