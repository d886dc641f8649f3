use regex::Regex;

use super::schema::{
    ParamSlot, Template, TemplateButton, TemplateComponent, TemplateSchema,
};

/// Pattern for `{{token}}` placeholders in template text.
const PLACEHOLDER_PATTERN: &str = r"\{\{\s*([A-Za-z0-9_.\-]+)\s*\}\}";

/// Derives a [`TemplateSchema`] from a template's structured components.
///
/// Extraction is pure and idempotent: the same template input always yields
/// the same schema.
pub struct SchemaExtractor {
    placeholder: Regex,
}

impl SchemaExtractor {
    pub fn new() -> Self {
        Self {
            // Compiled once per extractor, pattern is a checked constant.
            placeholder: Regex::new(PLACEHOLDER_PATTERN).expect("placeholder pattern is valid"),
        }
    }

    /// Extracts the ordered parameter schema from a template.
    pub fn extract(&self, template: &Template) -> TemplateSchema {
        let mut schema = TemplateSchema::empty();

        for component in &template.components {
            match component {
                TemplateComponent::Header { format, text, .. } => {
                    schema.header_kind = *format;
                    if format.is_media() {
                        // Implicit single slot, value is a media handle.
                        schema.header_slots = vec![ParamSlot::positional()];
                    } else if let Some(text) = text {
                        schema.header_slots = self.text_slots(text);
                    }
                }
                TemplateComponent::Body { text } => {
                    schema.body_slots = self.text_slots(text);
                }
                TemplateComponent::Footer { .. } => {}
                TemplateComponent::Buttons { buttons } => {
                    schema.button_slots = self.button_slots(buttons);
                }
                TemplateComponent::Carousel { cards } => {
                    schema.carousel_cards = cards.len();
                }
            }
        }

        schema
    }

    /// Scans text for placeholder tokens and builds the slot list.
    ///
    /// A template uses named parameters if any token is non-numeric;
    /// otherwise slots are purely positional. Repeated tokens reuse the
    /// same slot, so order of first appearance is what counts.
    fn text_slots(&self, text: &str) -> Vec<ParamSlot> {
        let tokens = self.unique_tokens(text);
        let named = tokens.iter().any(|t| !t.chars().all(|c| c.is_ascii_digit()));

        tokens
            .into_iter()
            .map(|token| {
                if named {
                    ParamSlot::named(token)
                } else {
                    ParamSlot::positional()
                }
            })
            .collect()
    }

    /// Button slots come only from URL buttons whose URL contains
    /// placeholders, and from copy-code buttons (always exactly one slot).
    fn button_slots(&self, buttons: &[TemplateButton]) -> Vec<ParamSlot> {
        let mut slots = Vec::new();
        for button in buttons {
            match button {
                TemplateButton::Url { url, .. } => {
                    slots.extend(self.text_slots(url));
                }
                TemplateButton::CopyCode { .. } => {
                    slots.push(ParamSlot::positional());
                }
                TemplateButton::QuickReply { .. } | TemplateButton::PhoneNumber { .. } => {}
            }
        }
        slots
    }

    fn unique_tokens(&self, text: &str) -> Vec<String> {
        let mut tokens: Vec<String> = Vec::new();
        for capture in self.placeholder.captures_iter(text) {
            let token = capture[1].to_string();
            if !tokens.contains(&token) {
                tokens.push(token);
            }
        }
        tokens
    }
}

impl Default for SchemaExtractor {
    fn default() -> Self {
        Self::new()
    }
}

/// Convenience wrapper constructing a one-shot extractor.
pub fn extract_schema(template: &Template) -> TemplateSchema {
    SchemaExtractor::new().extract(template)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::template::schema::{CarouselCard, HeaderKind};

    fn template(components: Vec<TemplateComponent>) -> Template {
        Template {
            id: "tpl-1".to_string(),
            name: "test".to_string(),
            language: "en".to_string(),
            category: "MARKETING".to_string(),
            components,
        }
    }

    #[test]
    fn test_positional_body_slots() {
        let t = template(vec![TemplateComponent::Body {
            text: "Hello {{1}}, your code is {{2}}".to_string(),
        }]);
        let schema = extract_schema(&t);
        assert_eq!(schema.body_slots.len(), 2);
        assert!(schema.body_slots.iter().all(|s| s.name.is_none()));
    }

    #[test]
    fn test_named_body_slots() {
        let t = template(vec![TemplateComponent::Body {
            text: "Hello {{name}}, your code is {{code}}".to_string(),
        }]);
        let schema = extract_schema(&t);
        assert_eq!(schema.body_slots.len(), 2);
        assert_eq!(schema.body_slots[0].name.as_deref(), Some("name"));
        assert_eq!(schema.body_slots[1].name.as_deref(), Some("code"));
    }

    #[test]
    fn test_repeated_token_yields_one_slot() {
        let t = template(vec![TemplateComponent::Body {
            text: "Hi {{name}}, yes you, {{name}}!".to_string(),
        }]);
        let schema = extract_schema(&t);
        assert_eq!(schema.body_slots.len(), 1);
    }

    #[test]
    fn test_media_header_is_implicit_single_slot() {
        let t = template(vec![
            TemplateComponent::Header {
                format: HeaderKind::Image,
                text: None,
                media_id: None,
            },
            TemplateComponent::Body {
                text: "No params here".to_string(),
            },
        ]);
        let schema = extract_schema(&t);
        assert_eq!(schema.header_kind, HeaderKind::Image);
        assert_eq!(schema.header_slots.len(), 1);
        assert!(schema.body_slots.is_empty());
    }

    #[test]
    fn test_text_header_placeholders() {
        let t = template(vec![TemplateComponent::Header {
            format: HeaderKind::Text,
            text: Some("Order {{1}}".to_string()),
            media_id: None,
        }]);
        let schema = extract_schema(&t);
        assert_eq!(schema.header_kind, HeaderKind::Text);
        assert_eq!(schema.header_slots.len(), 1);
    }

    #[test]
    fn test_button_slots() {
        let t = template(vec![TemplateComponent::Buttons {
            buttons: vec![
                TemplateButton::QuickReply {
                    text: "Stop".to_string(),
                },
                TemplateButton::Url {
                    text: "Track".to_string(),
                    url: "https://example.com/orders/{{1}}".to_string(),
                },
                TemplateButton::CopyCode { example: None },
                TemplateButton::Url {
                    text: "Home".to_string(),
                    url: "https://example.com/".to_string(),
                },
            ],
        }]);
        let schema = extract_schema(&t);
        // URL with placeholder: 1 slot, copy-code: 1 slot, others: none.
        assert_eq!(schema.button_slots.len(), 2);
    }

    #[test]
    fn test_carousel_cards() {
        let t = template(vec![TemplateComponent::Carousel {
            cards: vec![
                CarouselCard {
                    header_format: HeaderKind::Image,
                    body_text: None,
                    media_id: None,
                },
                CarouselCard {
                    header_format: HeaderKind::Image,
                    body_text: None,
                    media_id: Some("existing-media".to_string()),
                },
                CarouselCard {
                    header_format: HeaderKind::Image,
                    body_text: None,
                    media_id: None,
                },
            ],
        }]);
        let schema = extract_schema(&t);
        assert_eq!(schema.carousel_cards, 3);
    }

    #[test]
    fn test_extraction_is_idempotent() {
        let t = template(vec![TemplateComponent::Body {
            text: "Hi {{name}}".to_string(),
        }]);
        let extractor = SchemaExtractor::new();
        assert_eq!(extractor.extract(&t), extractor.extract(&t));
    }
}
