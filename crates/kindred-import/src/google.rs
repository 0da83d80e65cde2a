//! Google People API importer.
//!
//! Accepts either a raw `people.connections.list` response (an object with a
//! `connections` array) or a bare array of person objects. Field selection
//! follows the People API convention: the entry whose metadata is marked
//! `primary` wins, falling back to the first entry.

use kindred_core::contact::{ContactRecord, PartialDate};
use serde::Deserialize;

use crate::Result;

#[derive(Deserialize)]
#[serde(untagged)]
enum Payload {
  Response { connections: Vec<Person> },
  People(Vec<Person>),
}

#[derive(Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct Person {
  names:           Vec<Name>,
  email_addresses: Vec<ValueField>,
  birthdays:       Vec<Birthday>,
  genders:         Vec<ValueField>,
  urls:            Vec<ValueField>,
  photos:          Vec<Photo>,
}

#[derive(Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct Name {
  display_name: Option<String>,
  metadata:     FieldMetadata,
}

#[derive(Default, Deserialize)]
#[serde(default)]
struct FieldMetadata {
  primary: bool,
}

#[derive(Default, Deserialize)]
#[serde(default)]
struct ValueField {
  value: Option<String>,
}

#[derive(Default, Deserialize)]
#[serde(default)]
struct Birthday {
  date: Option<DateParts>,
}

#[derive(Default, Deserialize)]
#[serde(default)]
struct DateParts {
  year:  Option<i32>,
  month: Option<u32>,
  day:   Option<u32>,
}

#[derive(Default, Deserialize)]
#[serde(default)]
struct Photo {
  url:      Option<String>,
  metadata: FieldMetadata,
}

pub fn parse(text: &str) -> Result<Vec<ContactRecord>> {
  let payload: Payload = serde_json::from_str(text)?;
  let people = match payload {
    Payload::Response { connections } => connections,
    Payload::People(people) => people,
  };
  Ok(people.into_iter().filter_map(person_to_record).collect())
}

fn person_to_record(person: Person) -> Option<ContactRecord> {
  let Person {
    names,
    email_addresses,
    birthdays,
    genders,
    urls,
    photos,
  } = person;

  let full_name = names
    .iter()
    .find(|n| n.metadata.primary)
    .and_then(|n| n.display_name.clone())
    .or_else(|| names.first().and_then(|n| n.display_name.clone()));

  let emails: Vec<String> = email_addresses
    .into_iter()
    .filter_map(|e| e.value)
    .filter(|v| !v.is_empty())
    .collect();

  let birthday = birthdays
    .first()
    .and_then(|b| b.date.as_ref())
    .map(|d| PartialDate {
      year:  d.year,
      month: d.month,
      day:   d.day,
    })
    .filter(|d| !d.is_empty());

  let gender = genders.into_iter().find_map(|g| g.value);

  let urls: Vec<String> = urls
    .into_iter()
    .filter_map(|u| u.value)
    .filter(|v| !v.is_empty())
    .collect();

  let photo_url = photos
    .iter()
    .find(|p| p.metadata.primary)
    .and_then(|p| p.url.clone())
    .or_else(|| photos.first().and_then(|p| p.url.clone()));

  let record = ContactRecord {
    full_name,
    emails,
    birthday,
    gender,
    urls,
    photo_url,
    ..Default::default()
  };
  record.has_minimum_data().then_some(record)
}
