use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Fixed id of the singleton landing document.
pub const LANDING_DOC_ID: &str = "main";

/// The landing-page content document. Stored wholesale as one JSONB value
/// and overwritten on every admin save — last writer wins.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LandingContent {
    pub id: String,
    pub logo: LogoConfig,
    pub banner: BannerContent,
    pub stats: StatsSection,
    pub features: Vec<Feature>,
    pub products: ProductsSection,
    pub testimonials: Vec<Testimonial>,
    pub cta: CtaSection,
    pub footer: FooterContent,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact_form: Option<ContactFormConfig>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogoConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    pub text: String,
    pub show_image: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BannerContent {
    pub title: String,
    pub subtitle: String,
    pub image_url: String,
    pub cta_text: String,
    pub cta_link: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsSection {
    pub enabled: bool,
    pub stats: Vec<StatItem>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatItem {
    pub id: String,
    pub value: String,
    pub label: String,
    pub icon: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Feature {
    pub id: String,
    pub title: String,
    pub description: String,
    pub icon: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductsSection {
    pub enabled: bool,
    pub title: String,
    pub subtitle: String,
    pub products: Vec<Product>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: String,
    pub name: String,
    pub description: String,
    pub price: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    pub features: Vec<String>,
    #[serde(default)]
    pub highlighted: bool,
    /// Per-product "contact us on WhatsApp" button.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub whatsapp: Option<ProductWhatsapp>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductWhatsapp {
    pub enabled: bool,
    pub phone_number: String,
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Testimonial {
    pub id: String,
    pub name: String,
    pub role: String,
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
    pub rating: u8,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CtaSection {
    pub title: String,
    pub description: String,
    pub button_text: String,
    pub button_link: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background_image_url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FooterContent {
    pub company_name: String,
    pub description: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub social_links: SocialLinks,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SocialLinks {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub facebook: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub twitter: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instagram: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub linkedin: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactFormConfig {
    pub enabled: bool,
    pub title: String,
    pub subtitle: String,
    pub button_text: String,
    pub success_message: String,
    pub fields: Vec<ContactFormField>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactFormField {
    pub id: String,
    pub name: String,
    pub label: String,
    #[serde(rename = "type")]
    pub field_type: ContactFieldType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
    pub required: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<String>>,
    pub order: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContactFieldType {
    Text,
    Email,
    Tel,
    Textarea,
    Select,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_round_trips_through_json() {
        let content = crate::content::defaults::default_content();
        let value = serde_json::to_value(&content).unwrap();

        assert_eq!(value["id"], LANDING_DOC_ID);
        assert_eq!(value["contactForm"]["fields"][0]["type"], "text");

        let back: LandingContent = serde_json::from_value(value).unwrap();
        assert_eq!(back.features.len(), content.features.len());
        assert_eq!(back.banner.cta_link, content.banner.cta_link);
    }
}
