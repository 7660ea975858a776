//! Report documents for coalition performance analytics.
//!
//! Builders turn statistics and narrative text into a [`ReportDocument`];
//! [`render_html`] lays it out as a printable page. Rasterizing that page to
//! PDF is left to the caller.

pub mod document;
pub mod html;
mod network;
mod subject;

pub use document::*;
pub use html::{html_escape, render_html};
pub use network::{network_document, NETWORK_REPORT_TITLE};
pub use subject::{subject_document, SUBJECT_REPORT_TITLE};
