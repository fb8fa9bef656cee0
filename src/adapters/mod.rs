// Adapters layer: concrete implementations of the domain ports (http backend, in-memory view)
// plus the writers used to export results.

pub mod http;
pub mod output;
pub mod view;
