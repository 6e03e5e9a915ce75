use mockito::{mock, Matcher, Mock};

/// Mocked HTTP endpoints, alive as long as this struct is.
pub struct MockWebserver {
    _mocks: Vec<Mock>,
}

impl MockWebserver {
    pub fn from_text_with_query(path: &str, query: Matcher, text: &str) -> Self {
        Self { _mocks: Vec::new() }.with_text(path, query, text)
    }

    pub fn from_json_with_query(path: &str, query: Matcher, json_string: &str) -> Self {
        Self {
            _mocks: vec![mock("GET", path)
                .match_query(query)
                .with_header("content-type", "application/json")
                .with_body(json_string)
                .create()],
        }
    }

    pub fn from_status(path: &str, status: usize) -> Self {
        Self { _mocks: Vec::new() }.with_status(path, Matcher::Any, status)
    }

    /// Answer `GET` requests matching `query` with `text`.
    pub fn with_text(mut self, path: &str, query: Matcher, text: &str) -> Self {
        self._mocks.push(
            mock("GET", path)
                .match_query(query)
                .with_body(text)
                .create(),
        );
        self
    }

    /// Answer `GET` requests matching `query` with an empty body and `status`.
    pub fn with_status(mut self, path: &str, query: Matcher, status: usize) -> Self {
        self._mocks.push(
            mock("GET", path)
                .match_query(query)
                .with_status(status)
                .create(),
        );
        self
    }

    pub fn webserver_root_url(&self) -> String {
        mockito::server_url()
    }
}
