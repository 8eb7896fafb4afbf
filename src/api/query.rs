use url::form_urlencoded;

/// Accumulates optional query parameters and appends them to a path.
#[derive(Debug, Default)]
pub(crate) struct QueryString {
    pairs: Vec<(&'static str, String)>,
}

impl QueryString {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push(&mut self, key: &'static str, value: impl ToString) {
        self.pairs.push((key, value.to_string()));
    }

    pub(crate) fn push_opt(&mut self, key: &'static str, value: Option<impl ToString>) {
        if let Some(value) = value {
            self.push(key, value);
        }
    }

    /// `path` unchanged when no parameters were pushed, `path?k=v&..`
    /// otherwise, with values percent-encoded.
    pub(crate) fn append_to(&self, path: &str) -> String {
        if self.pairs.is_empty() {
            return path.to_string();
        }

        let mut query = form_urlencoded::Serializer::new(String::new());
        for (key, value) in &self.pairs {
            query.append_pair(key, value);
        }
        format!("{}?{}", path, query.finish())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_query_leaves_path_alone() {
        let query = QueryString::new();
        assert_eq!(query.append_to("/scans"), "/scans");
    }

    #[test]
    fn parameters_are_appended_and_encoded() {
        let mut query = QueryString::new();
        query.push("region", "US");
        query.push_opt("status", Some("completed"));
        query.push_opt("limit", None::<u32>);
        query.push("q", "acme & co");

        assert_eq!(
            query.append_to("/scans"),
            "/scans?region=US&status=completed&q=acme+%26+co"
        );
    }
}
