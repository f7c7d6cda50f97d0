//! docsite - static documentation sites with a scroll-synced table of contents
//!
//! Markdown pages are rendered with anchored headings. Each page gets an
//! "On this page" panel listing its h2-h4 sections, and the panel highlights
//! the section currently under the fixed header while the reader scrolls.

#![deny(unsafe_code)]
#![cfg_attr(all(not(debug_assertions), not(test)), deny(clippy::all))]
#![cfg_attr(all(not(debug_assertions), not(test)), deny(clippy::pedantic))]
// Allow some pedantic lints that are too strict for this project
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::enum_variant_names)]

// Table of contents derivation and scroll sync
pub mod heading;
pub mod layout;
pub mod observer;
pub mod page;
pub mod registry;
pub mod slug;
pub mod toc;
pub mod tracker;

// Site model and HTML output
pub mod config;
pub mod export;
pub mod html;
pub mod pipeline;
pub mod render;
pub mod site;
pub mod templates;

pub use heading::{extract_headings, HeadingDescriptor, HeadingLevel};
pub use page::{on_navigate, PageView};
pub use registry::SectionRegistry;
pub use slug::slugify;
pub use toc::TocPanel;
pub use tracker::{ScrollSyncState, ScrollSyncTracker};
