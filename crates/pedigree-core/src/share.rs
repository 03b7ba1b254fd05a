//! Deep links: reading the startup query and building share URLs.

use url::form_urlencoded;

use crate::horse::HorseId;

/// Parameters read once at startup from a page URL's query string.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StartupQuery {
    /// Horse to open directly in the detail view.
    pub id: Option<HorseId>,
    /// Set only by the literal `shared=true`.
    pub shared: bool,
}

impl StartupQuery {
    /// Parse a query string, with or without its leading `?`.
    ///
    /// Values are URL-decoded. The first non-empty `id` wins.
    pub fn parse(query: &str) -> Self {
        let query = query.trim_start_matches('?');
        let mut parsed = Self::default();

        for (key, value) in form_urlencoded::parse(query.as_bytes()) {
            match key.as_ref() {
                "id" if parsed.id.is_none() && !value.is_empty() => {
                    parsed.id = Some(HorseId::new(value.into_owned()));
                }
                "shared" => parsed.shared = value == "true",
                _ => {}
            }
        }

        parsed
    }

    /// Query for opening `id` as a read-only shared view.
    pub fn shared(id: HorseId) -> Self {
        Self {
            id: Some(id),
            shared: true,
        }
    }
}

/// Share URL for a horse: `<origin>/?id=<encoded id>&shared=true`.
pub fn share_url(origin: &str, id: &HorseId) -> String {
    format!("{}{}", origin.trim_end_matches('/'), page_link("/", id, true))
}

/// Origin-relative link to `path` for a horse, e.g. `/tree?id=7`.
pub fn page_link(path: &str, id: &HorseId, shared: bool) -> String {
    let mut query = form_urlencoded::Serializer::new(String::new());
    query.append_pair("id", id.as_str());
    if shared {
        query.append_pair("shared", "true");
    }
    format!("{}?{}", path, query.finish())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shared_requires_literal_true() {
        assert!(!StartupQuery::parse("id=1&shared=TRUE").shared);
        assert!(!StartupQuery::parse("id=1&shared=1").shared);
        assert!(StartupQuery::parse("?id=1&shared=true").shared);
    }

    #[test]
    fn test_page_link() {
        let id = HorseId::new("7");
        assert_eq!(page_link("/tree", &id, false), "/tree?id=7");
        assert_eq!(page_link("/", &id, true), "/?id=7&shared=true");
    }

    #[test]
    fn test_empty_id_ignored() {
        assert_eq!(StartupQuery::parse("id=&shared=true").id, None);
    }
}
