//! Backend scan service boundary
//!
//! Everything that actually scans lives behind one HTTP surface:
//! `POST {base_url}/scan/{kind}` with a JSON `{"domain": ...}` body.

mod client;

pub use client::{BackendClient, ScanSuccess};
