// Third-party integration settings of a project.
//
// Thin resource binding over the generic `Transport`: validate identifiers,
// format the path, delegate, decode.

pub mod client;
pub mod types;

pub use client::IntegrationsClient;
