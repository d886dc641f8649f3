//! Builder patterns for creating test data programmatically.

#![allow(dead_code)]

use campaigner::mapping::ContactField;
use campaigner::template::{
    CarouselCard, HeaderKind, Template, TemplateButton, TemplateComponent,
};

/// Builder for creating `Template` instances.
pub struct TemplateBuilder {
    id: String,
    name: String,
    language: String,
    category: String,
    components: Vec<TemplateComponent>,
}

impl TemplateBuilder {
    pub fn new(id: &str, name: &str) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            language: "en".to_string(),
            category: "MARKETING".to_string(),
            components: Vec::new(),
        }
    }

    pub fn text_header(mut self, text: &str) -> Self {
        self.components.push(TemplateComponent::Header {
            format: HeaderKind::Text,
            text: Some(text.to_string()),
            media_id: None,
        });
        self
    }

    pub fn media_header(mut self, format: HeaderKind) -> Self {
        self.components.push(TemplateComponent::Header {
            format,
            text: None,
            media_id: None,
        });
        self
    }

    pub fn body(mut self, text: &str) -> Self {
        self.components.push(TemplateComponent::Body {
            text: text.to_string(),
        });
        self
    }

    pub fn url_button(mut self, text: &str, url: &str) -> Self {
        self.components.push(TemplateComponent::Buttons {
            buttons: vec![TemplateButton::Url {
                text: text.to_string(),
                url: url.to_string(),
            }],
        });
        self
    }

    /// Adds a carousel with `cards` image cards; `inherited` indices get a
    /// pre-existing media id.
    pub fn carousel(mut self, cards: usize, inherited: &[usize]) -> Self {
        let cards = (0..cards)
            .map(|i| CarouselCard {
                header_format: HeaderKind::Image,
                body_text: None,
                media_id: inherited
                    .contains(&i)
                    .then(|| format!("inherited-media-{}", i)),
            })
            .collect();
        self.components.push(TemplateComponent::Carousel { cards });
        self
    }

    pub fn build(self) -> Template {
        Template {
            id: self.id,
            name: self.name,
            language: self.language,
            category: self.category,
            components: self.components,
        }
    }
}

/// The standard contact fields every organization starts with.
pub fn default_contact_fields() -> Vec<ContactField> {
    vec![
        ContactField {
            key: "phone".to_string(),
            label: "Phone number".to_string(),
            required: true,
        },
        ContactField {
            key: "fullname".to_string(),
            label: "Full name".to_string(),
            required: false,
        },
        ContactField {
            key: "email".to_string(),
            label: "Email".to_string(),
            required: false,
        },
    ]
}

/// Builds CSV text from a header row and data rows.
pub fn csv_text(headers: &[&str], rows: &[&[&str]]) -> String {
    let mut out = headers.join(",");
    out.push('\n');
    for row in rows {
        out.push_str(&row.join(","));
        out.push('\n');
    }
    out
}
