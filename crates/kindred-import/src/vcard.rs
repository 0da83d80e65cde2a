//! Apple/iCloud vCard importer.
//!
//! A deliberately small reading of vCard 3.0/4.0: only `FN`, `EMAIL` and
//! `BDAY` are mapped. Folded continuation lines are joined first (RFC 6350
//! §3.2), property parameters are dropped, and a year-omitted `BDAY` such as
//! `--04-12` becomes a [`PartialDate`] without a year.

use kindred_core::contact::{ContactRecord, PartialDate};

/// Parse a `.vcf` body. Cards without a name or email are dropped; malformed
/// lines are skipped rather than failing the whole file.
pub fn parse(text: &str) -> Vec<ContactRecord> {
  let mut contacts = Vec::new();
  let mut current: Option<ContactRecord> = None;

  for line in unfold_lines(text) {
    let Some((name, value)) = split_property(&line) else {
      continue;
    };
    match name.as_str() {
      "BEGIN" if value.eq_ignore_ascii_case("VCARD") => {
        current = Some(ContactRecord::default());
      }
      "END" if value.eq_ignore_ascii_case("VCARD") => {
        if let Some(record) = current.take()
          && record.has_minimum_data()
        {
          contacts.push(record);
        }
      }
      "FN" => {
        if let Some(record) = current.as_mut()
          && !value.trim().is_empty()
        {
          record.full_name = Some(value.trim().to_string());
        }
      }
      "EMAIL" => {
        if let Some(record) = current.as_mut() {
          let email = value.trim();
          if !email.is_empty() {
            record.emails.push(email.to_string());
          }
        }
      }
      "BDAY" => {
        if let Some(record) = current.as_mut() {
          record.birthday = parse_bday(value.trim());
        }
      }
      _ => {}
    }
  }

  contacts
}

/// Join continuation lines: a line starting with a space or tab extends the
/// previous one, minus the leading whitespace character.
fn unfold_lines(text: &str) -> Vec<String> {
  let mut lines: Vec<String> = Vec::new();
  for raw in text.lines() {
    if let Some(rest) =
      raw.strip_prefix(' ').or_else(|| raw.strip_prefix('\t'))
    {
      if let Some(last) = lines.last_mut() {
        last.push_str(rest);
      }
    } else if !raw.is_empty() {
      lines.push(raw.to_string());
    }
  }
  lines
}

/// Split a content line into (uppercased property name, value). Parameters
/// between the name and the colon are discarded, as is any group prefix
/// (`item1.EMAIL` reads as `EMAIL`). Colons inside double quotes do not end
/// the name part.
fn split_property(line: &str) -> Option<(String, &str)> {
  let mut in_quotes = false;
  let mut colon = None;
  for (i, c) in line.char_indices() {
    match c {
      '"' => in_quotes = !in_quotes,
      ':' if !in_quotes => {
        colon = Some(i);
        break;
      }
      _ => {}
    }
  }
  let colon = colon?;

  let name_part = &line[..colon];
  let name_token = name_part.split(';').next().unwrap_or(name_part);
  let name = match name_token.find('.') {
    Some(dot) => name_token[dot + 1..].to_uppercase(),
    None => name_token.to_uppercase(),
  };
  Some((name, &line[colon + 1..]))
}

/// `YYYY-MM-DD`, `YYYYMMDD`, `--MM-DD` or `--MMDD`.
fn parse_bday(value: &str) -> Option<PartialDate> {
  if let Some(rest) = value.strip_prefix("--") {
    let (month, day) = match rest.split_once('-') {
      Some(pair) => pair,
      None if rest.len() == 4 => rest.split_at(2),
      None => return None,
    };
    return Some(PartialDate {
      year:  None,
      month: month.parse().ok(),
      day:   day.parse().ok(),
    });
  }

  let parts: Vec<&str> = value.split('-').collect();
  if let [year, month, day] = parts[..] {
    return Some(PartialDate {
      year:  year.parse().ok(),
      month: month.parse().ok(),
      day:   day.parse().ok(),
    });
  }

  if value.len() == 8 && value.bytes().all(|b| b.is_ascii_digit()) {
    let (year, rest) = value.split_at(4);
    let (month, day) = rest.split_at(2);
    return Some(PartialDate {
      year:  year.parse().ok(),
      month: month.parse().ok(),
      day:   day.parse().ok(),
    });
  }

  None
}
