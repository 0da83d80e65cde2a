//! Importers that turn third-party contact exports into [`ContactRecord`]s.
//!
//! Each importer reads one upload body (Google People JSON, an Apple `.vcf`,
//! a LinkedIn connections CSV, or a Facebook data export) and keeps only
//! entries with at least a name or an email address. An upload that yields
//! no contacts is not an error; a body the parser cannot read at all is.

pub mod error;
pub mod facebook;
pub mod google;
pub mod linkedin;
pub mod vcard;

use kindred_core::contact::ContactRecord;
use serde::{Deserialize, Serialize};

pub use crate::error::{Error, Result};

/// Which external system produced an import payload. Determines the parser.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImportSource {
  Google,
  Vcard,
  Linkedin,
  Facebook,
}

impl ImportSource {
  pub fn as_str(&self) -> &'static str {
    match self {
      Self::Google => "google",
      Self::Vcard => "vcard",
      Self::Linkedin => "linkedin",
      Self::Facebook => "facebook",
    }
  }
}

impl std::str::FromStr for ImportSource {
  type Err = Error;

  fn from_str(s: &str) -> Result<Self> {
    match s {
      "google" => Ok(Self::Google),
      "vcard" | "vcf" => Ok(Self::Vcard),
      "linkedin" => Ok(Self::Linkedin),
      "facebook" => Ok(Self::Facebook),
      other => Err(Error::UnknownSource(other.to_string())),
    }
  }
}

/// Parse an import body with the parser for `source`.
pub fn parse_contacts(
  source: ImportSource,
  body: &[u8],
) -> Result<Vec<ContactRecord>> {
  let text = std::str::from_utf8(body)?;
  match source {
    ImportSource::Google => google::parse(text),
    ImportSource::Vcard => Ok(vcard::parse(text)),
    ImportSource::Linkedin => Ok(linkedin::parse(text)),
    ImportSource::Facebook => facebook::parse(text),
  }
}

#[cfg(test)]
mod tests {
  use std::str::FromStr;

  use super::*;

  #[test]
  fn source_names_round_trip() {
    for source in [
      ImportSource::Google,
      ImportSource::Vcard,
      ImportSource::Linkedin,
      ImportSource::Facebook,
    ] {
      assert_eq!(ImportSource::from_str(source.as_str()).unwrap(), source);
    }
  }

  #[test]
  fn vcf_is_an_alias_for_vcard() {
    assert_eq!(
      ImportSource::from_str("vcf").unwrap(),
      ImportSource::Vcard
    );
  }

  #[test]
  fn unknown_source_is_rejected() {
    assert!(matches!(
      ImportSource::from_str("orkut"),
      Err(Error::UnknownSource(_))
    ));
  }

  #[test]
  fn non_utf8_body_is_rejected() {
    let result = parse_contacts(ImportSource::Vcard, &[0xff, 0xfe, 0x00]);
    assert!(matches!(result, Err(Error::NotUtf8(_))));
  }
}
