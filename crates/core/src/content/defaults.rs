use chrono::Utc;

use super::model::*;

/// The document the store seeds on first load, before any admin edit.
pub fn default_content() -> LandingContent {
    LandingContent {
        id: LANDING_DOC_ID.to_string(),
        logo: LogoConfig {
            text: "Mi Empresa".to_string(),
            show_image: false,
            image_url: Some(String::new()),
        },
        banner: BannerContent {
            title: "Bienvenido a Nuestra Plataforma".to_string(),
            subtitle: "La solución perfecta para tu negocio".to_string(),
            image_url: String::new(),
            cta_text: "Comenzar Ahora".to_string(),
            cta_link: "#contacto".to_string(),
        },
        stats: StatsSection {
            enabled: true,
            stats: vec![
                stat("1", "10K+", "Clientes Felices", "👥"),
                stat("2", "99%", "Satisfacción", "⭐"),
                stat("3", "24/7", "Soporte", "💬"),
                stat("4", "50+", "Países", "🌍"),
            ],
        },
        features: vec![
            feature("1", "Fácil de Usar", "Interfaz intuitiva diseñada para todos", "🚀"),
            feature("2", "Rápido y Confiable", "Rendimiento optimizado garantizado", "⚡"),
            feature("3", "Soporte 24/7", "Siempre disponibles para ayudarte", "💬"),
        ],
        products: ProductsSection {
            enabled: false,
            title: "Nuestros Planes".to_string(),
            subtitle: "Elige el plan perfecto para tu negocio".to_string(),
            products: vec![
                product(
                    "1",
                    "Básico",
                    "Perfecto para empezar",
                    "$29/mes",
                    &["5 Usuarios", "10GB Almacenamiento", "Soporte Email"],
                    false,
                    "Hola, estoy interesado en el plan Básico",
                ),
                product(
                    "2",
                    "Pro",
                    "Para equipos en crecimiento",
                    "$79/mes",
                    &[
                        "Usuarios Ilimitados",
                        "100GB Almacenamiento",
                        "Soporte Prioritario",
                        "API Access",
                    ],
                    true,
                    "Hola, estoy interesado en el plan Pro",
                ),
                product(
                    "3",
                    "Enterprise",
                    "Para grandes empresas",
                    "Personalizado",
                    &[
                        "Todo de Pro",
                        "Almacenamiento Ilimitado",
                        "Soporte 24/7",
                        "Gestor Dedicado",
                    ],
                    false,
                    "Hola, estoy interesado en el plan Enterprise",
                ),
            ],
        },
        testimonials: vec![Testimonial {
            id: "1".to_string(),
            name: "Juan Pérez".to_string(),
            role: "CEO, Empresa XYZ".to_string(),
            content: "Esta plataforma transformó completamente nuestro negocio.".to_string(),
            avatar_url: None,
            rating: 5,
        }],
        cta: CtaSection {
            title: "¿Listo para empezar?".to_string(),
            description: "Únete a miles de empresas que ya confían en nosotros".to_string(),
            button_text: "Contactar Ahora".to_string(),
            button_link: "#contacto".to_string(),
            background_image_url: None,
        },
        footer: FooterContent {
            company_name: "Mi Empresa".to_string(),
            description: "Innovación y excelencia desde 2025".to_string(),
            email: "info@miempresa.com".to_string(),
            phone: "+34 900 000 000".to_string(),
            address: "Calle Principal 123, Madrid, España".to_string(),
            social_links: SocialLinks {
                facebook: Some("https://facebook.com".to_string()),
                twitter: Some("https://twitter.com".to_string()),
                instagram: Some("https://instagram.com".to_string()),
                linkedin: Some("https://linkedin.com".to_string()),
            },
        },
        contact_form: Some(default_contact_form()),
        updated_at: Utc::now(),
    }
}

fn default_contact_form() -> ContactFormConfig {
    ContactFormConfig {
        enabled: true,
        title: "Contáctanos".to_string(),
        subtitle: "Estamos aquí para ayudarte. Envíanos un mensaje y te responderemos pronto."
            .to_string(),
        button_text: "Enviar Mensaje".to_string(),
        success_message: "¡Gracias por contactarnos! Te responderemos pronto.".to_string(),
        fields: vec![
            ContactFormField {
                id: "1".to_string(),
                name: "nombre".to_string(),
                label: "Nombre completo".to_string(),
                field_type: ContactFieldType::Text,
                placeholder: Some("Juan Pérez".to_string()),
                required: true,
                options: None,
                order: 1,
            },
            ContactFormField {
                id: "2".to_string(),
                name: "email".to_string(),
                label: "Correo electrónico".to_string(),
                field_type: ContactFieldType::Email,
                placeholder: Some("juan@ejemplo.com".to_string()),
                required: true,
                options: None,
                order: 2,
            },
            ContactFormField {
                id: "3".to_string(),
                name: "telefono".to_string(),
                label: "Teléfono".to_string(),
                field_type: ContactFieldType::Tel,
                placeholder: Some("+34 600 000 000".to_string()),
                required: false,
                options: None,
                order: 3,
            },
            ContactFormField {
                id: "4".to_string(),
                name: "asunto".to_string(),
                label: "Asunto".to_string(),
                field_type: ContactFieldType::Select,
                placeholder: Some("Selecciona un asunto".to_string()),
                required: true,
                options: Some(vec![
                    "Consulta general".to_string(),
                    "Soporte técnico".to_string(),
                    "Ventas".to_string(),
                    "Partnership".to_string(),
                    "Otro".to_string(),
                ]),
                order: 4,
            },
            ContactFormField {
                id: "5".to_string(),
                name: "mensaje".to_string(),
                label: "Mensaje".to_string(),
                field_type: ContactFieldType::Textarea,
                placeholder: Some("Escribe tu mensaje aquí...".to_string()),
                required: true,
                options: None,
                order: 5,
            },
        ],
    }
}

fn stat(id: &str, value: &str, label: &str, icon: &str) -> StatItem {
    StatItem {
        id: id.to_string(),
        value: value.to_string(),
        label: label.to_string(),
        icon: icon.to_string(),
    }
}

fn feature(id: &str, title: &str, description: &str, icon: &str) -> Feature {
    Feature {
        id: id.to_string(),
        title: title.to_string(),
        description: description.to_string(),
        icon: icon.to_string(),
        image_url: None,
    }
}

fn product(
    id: &str,
    name: &str,
    description: &str,
    price: &str,
    features: &[&str],
    highlighted: bool,
    whatsapp_message: &str,
) -> Product {
    Product {
        id: id.to_string(),
        name: name.to_string(),
        description: description.to_string(),
        price: price.to_string(),
        image_url: None,
        features: features.iter().map(|f| f.to_string()).collect(),
        highlighted,
        whatsapp: Some(ProductWhatsapp {
            enabled: false,
            phone_number: String::new(),
            message: whatsapp_message.to_string(),
        }),
    }
}
