//! LinkedIn connections CSV importer.
//!
//! LinkedIn's export schema has drifted over the years, so columns are found
//! by name: an exact header match first, then the first header containing
//! the wanted word case-insensitively ("Email Address" serves as "Email").
//! Rows are split with quote awareness, since exported names and companies
//! may contain commas.

use kindred_core::contact::ContactRecord;

pub fn parse(text: &str) -> Vec<ContactRecord> {
  let mut lines = text.lines().filter(|l| !l.trim().is_empty());
  let Some(header_line) = lines.next() else {
    return Vec::new();
  };
  let headers = split_csv_row(header_line);

  let name_col = find_column(&headers, "Name");
  let email_col = find_column(&headers, "Email");
  let url_col = find_column(&headers, "URL");

  let mut contacts = Vec::new();
  for line in lines {
    let cells = split_csv_row(line);

    let record = ContactRecord {
      full_name: cell(&cells, name_col),
      emails: cell(&cells, email_col).into_iter().collect(),
      urls: cell(&cells, url_col).into_iter().collect(),
      ..Default::default()
    };
    if record.has_minimum_data() {
      contacts.push(record);
    }
  }
  contacts
}

fn find_column(headers: &[String], want: &str) -> Option<usize> {
  headers.iter().position(|h| h.as_str() == want).or_else(|| {
    let want = want.to_lowercase();
    headers
      .iter()
      .position(|h| h.to_lowercase().contains(&want))
  })
}

fn cell(cells: &[String], index: Option<usize>) -> Option<String> {
  let value = cells.get(index?)?.trim();
  (!value.is_empty()).then(|| value.to_string())
}

/// Split one CSV row on commas, honoring double quotes. A doubled quote
/// inside a quoted cell unescapes to a single quote.
fn split_csv_row(line: &str) -> Vec<String> {
  let mut cells = Vec::new();
  let mut cell = String::new();
  let mut in_quotes = false;
  let mut chars = line.chars().peekable();

  while let Some(c) = chars.next() {
    match c {
      '"' if in_quotes && chars.peek() == Some(&'"') => {
        cell.push('"');
        chars.next();
      }
      '"' => in_quotes = !in_quotes,
      ',' if !in_quotes => cells.push(std::mem::take(&mut cell)),
      _ => cell.push(c),
    }
  }
  cells.push(cell);

  cells.into_iter().map(|c| c.trim().to_string()).collect()
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn name_email_and_url_columns_are_mapped() {
    let csv = "Name,Email,Company,URL\n\
               Jane Doe,jane@acmecorp.com,Acme Corp,https://linkedin.com/in/janedoe\n\
               John Roe,john@example.com,,\n";

    let contacts = parse(csv);
    assert_eq!(contacts.len(), 2);
    assert_eq!(contacts[0].full_name.as_deref(), Some("Jane Doe"));
    assert_eq!(contacts[0].emails, vec!["jane@acmecorp.com"]);
    assert_eq!(
      contacts[0].urls,
      vec!["https://linkedin.com/in/janedoe"]
    );
    assert!(contacts[1].urls.is_empty());
  }

  #[test]
  fn header_lookup_falls_back_to_substring() {
    let csv = "First Name,Last Name,Email Address,Connected On\n\
               Jane,Doe,jane@acmecorp.com,2021-02-03\n";

    let contacts = parse(csv);
    assert_eq!(contacts.len(), 1);
    // "First Name" is the first header containing "name".
    assert_eq!(contacts[0].full_name.as_deref(), Some("Jane"));
    assert_eq!(contacts[0].emails, vec!["jane@acmecorp.com"]);
  }

  #[test]
  fn quoted_cells_keep_their_commas() {
    let csv = "Name,Email\n\"Doe, Jane\",jane@acmecorp.com\n";
    let contacts = parse(csv);
    assert_eq!(contacts[0].full_name.as_deref(), Some("Doe, Jane"));
  }

  #[test]
  fn doubled_quotes_unescape() {
    let csv = "Name,Email\n\"Jane \"\"JD\"\" Doe\",jane@acmecorp.com\n";
    let contacts = parse(csv);
    assert_eq!(contacts[0].full_name.as_deref(), Some("Jane \"JD\" Doe"));
  }

  #[test]
  fn rows_without_name_or_email_are_dropped() {
    let csv = "Name,Email,URL\n,,https://example.com\n";
    assert!(parse(csv).is_empty());
  }

  #[test]
  fn header_only_or_empty_input_yields_nothing() {
    assert!(parse("Name,Email\n").is_empty());
    assert!(parse("").is_empty());
  }
}
