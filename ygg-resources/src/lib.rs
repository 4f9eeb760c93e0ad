//! ygg-resources - Yggdrasil public resource catalog
//!
//! Reads the `services.md` document of the Yggdrasil website, turns its
//! heading hierarchy into a typed tree and writes that tree as JSON.
//!
//! The stages are independent:
//! 1. **Acquire**: fetch the document lines ([`acquire`])
//! 2. **Parse**: build the resource tree ([`catalog`])
//! 3. **Present**: serialize and write it ([`presenter`])

#![deny(unsafe_code)]
#![cfg_attr(all(not(debug_assertions), not(test)), deny(clippy::all))]
#![cfg_attr(all(not(debug_assertions), not(test)), deny(clippy::pedantic))]
// Allow some pedantic lints that are too strict for this project
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::enum_variant_names)]

pub mod acquire;
pub mod catalog;
pub mod presenter;
pub mod settings;
