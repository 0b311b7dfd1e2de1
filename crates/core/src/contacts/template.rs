/// Example rows shipped in the downloadable import template. The first row
/// doubles as documentation of the expected `+<country code>` format.
const TEMPLATE_ROWS: &[(&str, &str, &str)] = &[
    ("Ejemplo", "Principal", "+59165258002"),
    ("Ana", "Gutiérrez", "+59170012345"),
    ("Luis", "Rojas", "70012346"),
    ("María", "López", "+54 911 5555 0000"),
    ("Carlos", "", "70012347"),
];

pub const TEMPLATE_FILE_NAME: &str = "plantilla_contactos.csv";

/// Render the import template as CSV bytes.
pub fn template_csv() -> Vec<u8> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer
        .write_record(["nombre", "apellido", "telefono"])
        .expect("writing to a Vec cannot fail");
    for (first_name, last_name, phone) in TEMPLATE_ROWS {
        writer
            .write_record([*first_name, *last_name, *phone])
            .expect("writing to a Vec cannot fail");
    }
    writer
        .into_inner()
        .expect("writing to a Vec cannot fail")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contacts::import::parse_contacts_csv;

    #[test]
    fn template_imports_cleanly() {
        let bytes = template_csv();
        let parsed = parse_contacts_csv(&bytes).unwrap();

        assert_eq!(parsed.len(), TEMPLATE_ROWS.len());
        assert_eq!(parsed[0].phone, "59165258002");
        assert_eq!(parsed[3].phone, "549115550000");
        assert_eq!(parsed[4].last_name, "");
    }
}
