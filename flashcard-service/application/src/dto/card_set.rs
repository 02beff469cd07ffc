use serde::Deserialize;
use validator::Validate;

/// Client-supplied card set. Identifiers are always assigned by the server,
/// so any `id` fields in the body are ignored.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CardSetPayload {
    #[serde(default)]
    #[validate(length(max = 256))]
    pub name: String,
    #[serde(default)]
    #[validate(length(max = 2048))]
    pub cover_image: String,
    #[serde(default)]
    #[validate(nested)]
    pub cards: Vec<CardPayload>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct CardPayload {
    #[serde(default)]
    #[validate(length(max = 256))]
    pub word: String,
    #[serde(default)]
    #[validate(length(max = 2048))]
    pub image: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ignores_client_ids() {
        let payload: CardSetPayload = serde_json::from_str(
            r#"{"id":"x","name":"Fruit","coverImage":"c.png","cards":[{"id":"y","word":"apple","image":"a.png"}]}"#,
        )
        .expect("payload parses");

        assert_eq!(payload.name, "Fruit");
        assert_eq!(payload.cover_image, "c.png");
        assert_eq!(payload.cards.len(), 1);
        assert_eq!(payload.cards[0].word, "apple");
    }

    #[test]
    fn missing_fields_default_to_empty() {
        let payload: CardSetPayload = serde_json::from_str("{}").expect("payload parses");
        assert!(payload.name.is_empty());
        assert!(payload.cards.is_empty());
        assert!(payload.validate().is_ok());
    }

    #[test]
    fn nested_cards_are_validated() {
        let payload = CardSetPayload {
            cards: vec![CardPayload {
                word: "w".repeat(300),
                image: String::new(),
            }],
            ..CardSetPayload::default()
        };
        assert!(payload.validate().is_err());
    }
}
