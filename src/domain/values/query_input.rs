use crate::domain::error::DomainError;
use std::fmt;

/// Exactly one way of describing what to search for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryInput {
    /// Base64 image payload, optionally wrapped in a data URI.
    InlineImage(String),
    /// Direct image URL or a content page that embeds one.
    ImageUrl(String),
    /// Free text phrase, embedded with the text entry point.
    Text(String),
}

impl QueryInput {
    /// Build a query from the three optional request fields.
    ///
    /// Blank strings count as absent. Anything other than exactly one
    /// populated field is rejected instead of silently picking one.
    pub fn from_fields(
        image: Option<String>,
        image_url: Option<String>,
        query: Option<String>,
    ) -> Result<Self, DomainError> {
        let image = image.filter(|s| !s.trim().is_empty());
        let image_url = image_url.filter(|s| !s.trim().is_empty());
        let query = query.filter(|s| !s.trim().is_empty());

        match (image, image_url, query) {
            (Some(data), None, None) => Ok(QueryInput::InlineImage(data)),
            (None, Some(url), None) => Ok(QueryInput::ImageUrl(url.trim().to_string())),
            (None, None, Some(text)) => Ok(QueryInput::Text(text.trim().to_string())),
            (None, None, None) => Err(DomainError::InvalidInput(
                "No valid input provided: set one of image, imageUrl or query".into(),
            )),
            _ => Err(DomainError::InvalidInput(
                "Ambiguous input: set only one of image, imageUrl or query".into(),
            )),
        }
    }

    /// Short label for the input shape, used in logs.
    pub fn shape(&self) -> &'static str {
        match self {
            QueryInput::InlineImage(_) => "inline_image",
            QueryInput::ImageUrl(_) => "image_url",
            QueryInput::Text(_) => "text",
        }
    }
}

impl fmt::Display for QueryInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QueryInput::InlineImage(data) => write!(f, "inline image ({} chars)", data.len()),
            QueryInput::ImageUrl(url) => write!(f, "image url {url}"),
            QueryInput::Text(text) => write!(f, "text \"{text}\""),
        }
    }
}
