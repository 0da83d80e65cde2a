//! Facebook data-export importer.
//!
//! Facebook's export format varies by vintage, so this reads loose
//! [`serde_json::Value`]s instead of a fixed schema: the body may be a
//! single object or an array, and most fields have more than one historical
//! spelling.

use kindred_core::contact::{ContactRecord, PartialDate};
use serde_json::Value;

use crate::Result;

pub fn parse(text: &str) -> Result<Vec<ContactRecord>> {
  let json: Value = serde_json::from_str(text)?;
  let items: Vec<&Value> = match &json {
    Value::Array(items) => items.iter().collect(),
    other => vec![other],
  };
  Ok(items.into_iter().filter_map(item_to_record).collect())
}

fn item_to_record(item: &Value) -> Option<ContactRecord> {
  let full_name = string_field(item, "name")
    .or_else(|| {
      let first = string_field(item, "first_name")?;
      let last = string_field(item, "last_name")?;
      Some(format!("{first} {last}"))
    })
    .or_else(|| string_field(item, "displayName"));

  let emails: Vec<String> = string_field(item, "email")
    .or_else(|| string_field(item, "contact_email"))
    .into_iter()
    .collect();

  let birthday =
    string_field(item, "birthday").and_then(|s| parse_birthday(&s));

  let urls: Vec<String> = string_field(item, "profileUrl")
    .or_else(|| string_field(item, "url"))
    .or_else(|| string_field(item, "link"))
    .into_iter()
    .collect();

  let record = ContactRecord {
    full_name,
    emails,
    birthday,
    urls,
    ..Default::default()
  };
  record.has_minimum_data().then_some(record)
}

fn string_field(item: &Value, key: &str) -> Option<String> {
  item
    .get(key)?
    .as_str()
    .map(str::to_string)
    .filter(|s| !s.is_empty())
}

/// `MM/DD/YYYY` (US-locale exports) or `YYYY-MM-DD`.
fn parse_birthday(value: &str) -> Option<PartialDate> {
  let (year, month, day) = if value.contains('/') {
    let parts: Vec<&str> = value.split('/').collect();
    let [month, day, year] = parts[..] else {
      return None;
    };
    (year, month, day)
  } else if value.contains('-') {
    let parts: Vec<&str> = value.split('-').collect();
    let [year, month, day] = parts[..] else {
      return None;
    };
    (year, month, day)
  } else {
    return None;
  };

  Some(PartialDate {
    year:  year.parse().ok(),
    month: month.parse().ok(),
    day:   day.parse().ok(),
  })
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn reads_an_export_array() {
    let json = r#"[
      {
        "name": "Jane Doe",
        "email": "jane@acmecorp.com",
        "birthday": "04/12/1985",
        "profileUrl": "https://facebook.com/janedoe"
      },
      {
        "first_name": "John",
        "last_name": "Roe",
        "contact_email": "john@example.com",
        "birthday": "1990-06-15"
      }
    ]"#;

    let contacts = parse(json).unwrap();
    assert_eq!(contacts.len(), 2);

    assert_eq!(contacts[0].full_name.as_deref(), Some("Jane Doe"));
    assert_eq!(
      contacts[0].birthday,
      Some(PartialDate {
        year:  Some(1985),
        month: Some(4),
        day:   Some(12),
      })
    );
    assert_eq!(contacts[0].urls, vec!["https://facebook.com/janedoe"]);

    assert_eq!(contacts[1].full_name.as_deref(), Some("John Roe"));
    assert_eq!(contacts[1].emails, vec!["john@example.com"]);
    assert_eq!(
      contacts[1].birthday,
      Some(PartialDate {
        year:  Some(1990),
        month: Some(6),
        day:   Some(15),
      })
    );
  }

  #[test]
  fn a_single_object_is_one_contact() {
    let contacts =
      parse(r#"{ "displayName": "Solo", "link": "https://fb.com/solo" }"#)
        .unwrap();
    assert_eq!(contacts.len(), 1);
    assert_eq!(contacts[0].full_name.as_deref(), Some("Solo"));
    assert_eq!(contacts[0].urls, vec!["https://fb.com/solo"]);
  }

  #[test]
  fn entries_without_name_or_email_are_dropped() {
    let contacts = parse(r#"[{ "birthday": "01/01/2000" }]"#).unwrap();
    assert!(contacts.is_empty());
  }

  #[test]
  fn unparseable_birthdays_are_ignored() {
    let contacts =
      parse(r#"[{ "name": "No Date", "birthday": "sometime" }]"#).unwrap();
    assert!(contacts[0].birthday.is_none());
  }

  #[test]
  fn invalid_json_is_an_error() {
    assert!(parse("<html>").is_err());
  }
}
