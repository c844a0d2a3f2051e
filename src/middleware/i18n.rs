// src/middleware/i18n.rs

use axum::extract::FromRequestParts;
use axum::http::{header, request::Parts, HeaderMap};

use crate::common::i18n::DEFAULT_LANG;

// Idioma da resposta, vindo do Accept-Language
#[derive(Debug, Clone)]
pub struct Locale(pub String);

impl Default for Locale {
    fn default() -> Self {
        Locale(DEFAULT_LANG.to_string())
    }
}

impl Locale {
    pub fn from_headers(headers: &HeaderMap) -> Self {
        headers
            .get(header::ACCEPT_LANGUAGE)
            .and_then(|header_value| header_value.to_str().ok())
            .and_then(|header_str| {
                accept_language::parse(header_str)
                    .first() // Pega o idioma preferido (ex: "pt-BR")
                    .map(|tag| {
                        // "pt-BR" -> "pt"
                        tag.split('-').next().unwrap_or(tag.as_str()).to_lowercase()
                    })
            })
            .map(Locale)
            .unwrap_or_default()
    }
}

impl<S> FromRequestParts<S> for Locale
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Locale::from_headers(&parts.headers))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::ACCEPT_LANGUAGE, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn picks_the_preferred_language_prefix() {
        assert_eq!(Locale::from_headers(&headers("en-US,en;q=0.9,pt;q=0.5")).0, "en");
        assert_eq!(Locale::from_headers(&headers("pt-BR")).0, "pt");
    }

    #[test]
    fn missing_header_falls_back_to_portuguese() {
        assert_eq!(Locale::from_headers(&HeaderMap::new()).0, "pt");
    }
}
