/*
 * Responsibility
 * - リクエストから引数になり得る値 (query / form body / JSON body) を保持する
 * - HTTP を経由しない呼び出し (内部呼び出し・テスト) からも組み立てられる
 */
use serde_json::{Map, Value};

use super::argument::Location;

#[derive(Debug, Clone, Default)]
pub struct RequestArgs {
    query: Vec<(String, String)>,
    form: Vec<(String, String)>,
    json: Option<Map<String, Value>>,
}

/// A raw value before type conversion.
#[derive(Debug, Clone, Copy)]
pub(super) enum Raw<'a> {
    Text(&'a str),
    Json(&'a Value),
}

fn parse_pairs(input: &[u8]) -> Vec<(String, String)> {
    ::url::form_urlencoded::parse(input)
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect()
}

impl RequestArgs {
    pub fn new() -> Self {
        Self::default()
    }

    /// `a=1&b=2` (without the leading `?`).
    pub fn with_query(mut self, query_string: &str) -> Self {
        self.query.extend(parse_pairs(query_string.as_bytes()));
        self
    }

    /// `application/x-www-form-urlencoded` body.
    pub fn with_form(mut self, body: &[u8]) -> Self {
        self.form.extend(parse_pairs(body));
        self
    }

    pub fn with_json(mut self, body: Map<String, Value>) -> Self {
        self.json = Some(body);
        self
    }

    /// Every field the client sent, tagged with where it was sent.
    pub(super) fn fields(&self) -> impl Iterator<Item = (Location, &str)> + '_ {
        let json = self
            .json
            .iter()
            .flat_map(|j| j.keys())
            .map(|k| (Location::Json, k.as_str()));
        let query = self.query.iter().map(|(k, _)| (Location::Query, k.as_str()));
        let form = self.form.iter().map(|(k, _)| (Location::Form, k.as_str()));

        json.chain(query).chain(form)
    }

    /// All raw values for `name`, in lookup order (JSON, query, form).
    pub(super) fn lookup(&self, name: &str, location: Location) -> Vec<Raw<'_>> {
        let mut out = Vec::new();

        if location.includes(Location::Json)
            && let Some(value) = self.json.as_ref().and_then(|j| j.get(name))
        {
            out.push(Raw::Json(value));
        }
        if location.includes(Location::Query) {
            out.extend(
                self.query
                    .iter()
                    .filter(|(k, _)| k == name)
                    .map(|(_, v)| Raw::Text(v.as_str())),
            );
        }
        if location.includes(Location::Form) {
            out.extend(
                self.form
                    .iter()
                    .filter(|(k, _)| k == name)
                    .map(|(_, v)| Raw::Text(v.as_str())),
            );
        }

        out
    }
}
