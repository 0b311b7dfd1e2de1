use crate::contacts::model::Contact;

/// Substitute the operator-facing template variables into a message body.
/// The variables are the ones editors already know: `{nombre}`,
/// `{apellido}` and `{nombreCompleto}`. Unknown placeholders are left
/// untouched.
pub fn render_template(template: &str, contact: &Contact) -> String {
    template
        .replace("{nombre}", &contact.first_name)
        .replace("{apellido}", &contact.last_name)
        .replace("{nombreCompleto}", &contact.full_name())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use uuid::Uuid;

    fn contact(first: &str, last: &str) -> Contact {
        Contact {
            id: Uuid::new_v4(),
            first_name: first.to_string(),
            last_name: last.to_string(),
            phone: "59170012345".to_string(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn substitutes_known_variables() {
        let c = contact("Ana", "Gutiérrez");
        assert_eq!(render_template("Hola {nombre}!", &c), "Hola Ana!");
        assert_eq!(
            render_template("{nombreCompleto} ({apellido})", &c),
            "Ana Gutiérrez (Gutiérrez)"
        );
    }

    #[test]
    fn repeated_variables_are_all_replaced() {
        let c = contact("Ana", "");
        assert_eq!(
            render_template("{nombre} y {nombre}", &c),
            "Ana y Ana"
        );
    }

    #[test]
    fn full_name_has_no_trailing_space_when_surname_is_empty() {
        let c = contact("Carlos", "");
        assert_eq!(render_template("{nombreCompleto}", &c), "Carlos");
    }

    #[test]
    fn unknown_placeholders_stay_literal() {
        let c = contact("Ana", "Gutiérrez");
        assert_eq!(
            render_template("Hola {nombre}, tu código es {codigo}", &c),
            "Hola Ana, tu código es {codigo}"
        );
    }
}
