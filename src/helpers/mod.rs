//! Low-level readers shared by the spreadsheet formats.

pub(crate) mod xml;
pub(crate) mod zip;
