use std::collections::{HashMap, HashSet};

use csv::ReaderBuilder;
use serde::Serialize;

use super::model::NewContact;
use super::phone::normalize_phone;

/// Header aliases accepted for each column, matched case- and
/// diacritic-insensitively.
const NAME_ALIASES: &[&str] = &["nombre", "name", "first", "nombres"];
const SURNAME_ALIASES: &[&str] = &["apellido", "apellidos", "last", "surname"];
const PHONE_ALIASES: &[&str] = &["telefono", "tel", "phone", "celular", "whatsapp"];

#[derive(Debug, thiserror::Error)]
pub enum ImportError {
    #[error("could not parse the file as CSV: {0}")]
    Malformed(#[from] csv::Error),
}

/// Result counters reported back to the operator after an import.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportSummary {
    /// Rows with a usable phone number.
    pub read: usize,
    pub added: usize,
    pub skipped_in_file: usize,
    pub skipped_existing: usize,
    pub errors: usize,
}

impl ImportSummary {
    /// Summary for a file that could not be parsed at all.
    pub fn failed() -> Self {
        Self {
            errors: 1,
            ..Self::default()
        }
    }
}

/// Parse a contacts CSV into candidate contacts. Header names are matched
/// against the alias lists above; rows without a usable phone are dropped.
pub fn parse_contacts_csv(bytes: &[u8]) -> Result<Vec<NewContact>, ImportError> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(bytes);

    let headers: Vec<String> = reader.headers()?.iter().map(fold_header).collect();

    let mut contacts = Vec::new();
    for record in reader.records() {
        let record = record?;
        let row: HashMap<&str, &str> = headers
            .iter()
            .map(String::as_str)
            .zip(record.iter())
            .collect();

        let phone = normalize_phone(pick(&row, PHONE_ALIASES));
        if phone.is_empty() {
            continue;
        }

        contacts.push(NewContact {
            first_name: pick(&row, NAME_ALIASES).trim().to_string(),
            last_name: pick(&row, SURNAME_ALIASES).trim().to_string(),
            phone,
        });
    }

    Ok(contacts)
}

/// Split parsed contacts into the net-new ones and duplicate counts:
/// first against earlier rows of the same file, then against the phones
/// already known to the store. Both comparisons use normalized phones.
pub fn dedupe(
    parsed: Vec<NewContact>,
    known_phones: &HashSet<String>,
) -> (Vec<NewContact>, usize, usize) {
    let mut seen = HashSet::new();
    let mut fresh = Vec::new();
    let mut skipped_in_file = 0;
    let mut skipped_existing = 0;

    for contact in parsed {
        if !seen.insert(contact.phone.clone()) {
            skipped_in_file += 1;
            continue;
        }
        if known_phones.contains(&contact.phone) {
            skipped_existing += 1;
            continue;
        }
        fresh.push(contact);
    }

    (fresh, skipped_in_file, skipped_existing)
}

/// Lowercase a header and fold the diacritics that show up in Spanish
/// spreadsheets, so `Teléfono` matches `telefono`.
fn fold_header(raw: &str) -> String {
    raw.trim()
        .to_lowercase()
        .chars()
        .map(|c| match c {
            'á' | 'à' | 'â' | 'ä' => 'a',
            'é' | 'è' | 'ê' | 'ë' => 'e',
            'í' | 'ì' | 'î' | 'ï' => 'i',
            'ó' | 'ò' | 'ô' | 'ö' => 'o',
            'ú' | 'ù' | 'û' | 'ü' => 'u',
            'ñ' => 'n',
            _ => c,
        })
        .collect()
}

fn pick<'a>(row: &HashMap<&str, &'a str>, aliases: &[&str]) -> &'a str {
    aliases
        .iter()
        .find_map(|alias| row.get(alias).copied())
        .unwrap_or("")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn known(phones: &[&str]) -> HashSet<String> {
        phones.iter().map(|p| p.to_string()).collect()
    }

    #[test]
    fn parses_canonical_headers() {
        let csv = "nombre,apellido,telefono\nAna,Gutiérrez,+59170012345\nLuis,Rojas,70012346\n";
        let parsed = parse_contacts_csv(csv.as_bytes()).unwrap();

        assert_eq!(parsed.len(), 2);
        assert_eq!(parsed[0].first_name, "Ana");
        assert_eq!(parsed[0].phone, "59170012345");
        assert_eq!(parsed[1].phone, "70012346");
    }

    #[test]
    fn accepts_header_aliases_with_case_and_diacritics() {
        let csv = "Name,Surname,Teléfono\nMaría,López,+54 911 5555 0000\n";
        let parsed = parse_contacts_csv(csv.as_bytes()).unwrap();

        assert_eq!(parsed.len(), 1);
        assert_eq!(parsed[0].first_name, "María");
        assert_eq!(parsed[0].last_name, "López");
        assert_eq!(parsed[0].phone, "549115550000");
    }

    #[test]
    fn drops_rows_without_a_usable_phone() {
        let csv = "nombre,telefono\nAna,+59170012345\nSinTelefono,\nOtro,n/a\n";
        let parsed = parse_contacts_csv(csv.as_bytes()).unwrap();

        assert_eq!(parsed.len(), 1);
        assert_eq!(parsed[0].first_name, "Ana");
    }

    #[test]
    fn duplicate_phones_in_file_keep_first_occurrence() {
        let csv = "nombre,telefono\nAna,+59170012345\nAnita,591 700 12345\nLuis,70012346\n";
        let parsed = parse_contacts_csv(csv.as_bytes()).unwrap();
        let (fresh, in_file, existing) = dedupe(parsed, &known(&[]));

        assert_eq!(fresh.len(), 2);
        assert_eq!(fresh[0].first_name, "Ana");
        assert_eq!(in_file, 1);
        assert_eq!(existing, 0);
    }

    #[test]
    fn phones_already_known_are_skipped() {
        let csv = "nombre,telefono\nAna,+59170012345\nLuis,70012346\n";
        let parsed = parse_contacts_csv(csv.as_bytes()).unwrap();
        let (fresh, in_file, existing) = dedupe(parsed, &known(&["59170012345"]));

        assert_eq!(fresh.len(), 1);
        assert_eq!(fresh[0].first_name, "Luis");
        assert_eq!(in_file, 0);
        assert_eq!(existing, 1);
    }

    #[test]
    fn repeated_known_phone_counts_once_existing_then_in_file() {
        let csv = "nombre,telefono\nAna,+59170012345\nAnita,59170012345\n";
        let parsed = parse_contacts_csv(csv.as_bytes()).unwrap();
        let (fresh, in_file, existing) = dedupe(parsed, &known(&["59170012345"]));

        assert!(fresh.is_empty());
        assert_eq!(in_file, 1);
        assert_eq!(existing, 1);
    }

    #[test]
    fn invalid_utf8_is_malformed() {
        let bytes = [b'n', b'o', b'm', 0xff, 0xfe, b'\n'];
        assert!(parse_contacts_csv(&bytes).is_err());
    }
}
