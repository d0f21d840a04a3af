/*
 * Responsibility
 * - 1 つの引数の宣言 (名前・型・場所・必須・default・choices など)
 * - raw 値 → 型付き JSON 値への変換とエラー文言の決定
 */
use serde_json::Value;

use super::args::{Raw, RequestArgs};

/// Where an argument may be read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Location {
    Query,
    Form,
    Json,
    /// JSON body, then query string, then form body.
    #[default]
    Any,
}

impl Location {
    pub(super) fn includes(self, other: Location) -> bool {
        self == Location::Any || self == other
    }

    fn describe(self) -> &'static str {
        match self {
            Location::Query => "the query string",
            Location::Form => "the post body",
            Location::Json => "the JSON body",
            Location::Any => "the JSON body or the post body or the query string",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ArgKind {
    #[default]
    Str,
    Int,
    Bool,
    /// Any JSON value as-is (query/form text becomes a string).
    Json,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Action {
    /// Keep the first value found.
    #[default]
    Store,
    /// Keep every value found, as an array.
    Append,
}

#[derive(Debug, Clone)]
pub struct Argument {
    name: String,
    dest: Option<String>,
    kind: ArgKind,
    location: Location,
    action: Action,
    required: bool,
    default: Option<Value>,
    store_missing: bool,
    nullable: bool,
    choices: Vec<Value>,
    help: Option<String>,
}

/// Outcome of reading one argument from a request.
#[derive(Debug, PartialEq)]
pub(super) enum Parsed {
    Found(Value),
    Missing(Value),
    Invalid(String),
}

impl Argument {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            dest: None,
            kind: ArgKind::default(),
            location: Location::default(),
            action: Action::default(),
            required: false,
            default: None,
            store_missing: true,
            nullable: true,
            choices: Vec::new(),
            help: None,
        }
    }

    pub fn kind(mut self, kind: ArgKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn location(mut self, location: Location) -> Self {
        self.location = location;
        self
    }

    pub fn dest(mut self, dest: impl Into<String>) -> Self {
        self.dest = Some(dest.into());
        self
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn default_value(mut self, value: impl Into<Value>) -> Self {
        self.default = Some(value.into());
        self
    }

    pub fn store_missing(mut self, store: bool) -> Self {
        self.store_missing = store;
        self
    }

    pub fn nullable(mut self, nullable: bool) -> Self {
        self.nullable = nullable;
        self
    }

    pub fn append(mut self) -> Self {
        self.action = Action::Append;
        self
    }

    pub fn choices<I, V>(mut self, choices: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.choices = choices.into_iter().map(Into::into).collect();
        self
    }

    /// Replaces the error text. `{error_msg}` is substituted with the original one.
    pub fn help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn dest_name(&self) -> &str {
        self.dest.as_deref().unwrap_or(&self.name)
    }

    pub(super) fn stores_missing(&self) -> bool {
        self.store_missing
    }

    /// Whether a field sent in `location` is consumed by this argument.
    pub(super) fn reads_from(&self, location: Location) -> bool {
        self.location.includes(location)
    }

    fn error(&self, error_msg: String) -> String {
        match &self.help {
            Some(help) => help.replace("{error_msg}", &error_msg),
            None => error_msg,
        }
    }

    pub(super) fn parse(&self, args: &RequestArgs) -> Parsed {
        let raws = args.lookup(&self.name, self.location);

        if raws.is_empty() {
            if self.required {
                return Parsed::Invalid(self.error(format!(
                    "Missing required parameter in {}",
                    self.location.describe()
                )));
            }
            return Parsed::Missing(self.default.clone().unwrap_or(Value::Null));
        }

        let selected = match self.action {
            Action::Store => &raws[..1],
            Action::Append => &raws[..],
        };

        let mut values = Vec::with_capacity(selected.len());
        for raw in selected {
            match self.convert(*raw).and_then(|v| self.check_choice(v)) {
                Ok(v) => values.push(v),
                Err(msg) => return Parsed::Invalid(self.error(msg)),
            }
        }

        match self.action {
            Action::Store => Parsed::Found(values.swap_remove(0)),
            Action::Append => Parsed::Found(Value::Array(values)),
        }
    }

    fn check_choice(&self, value: Value) -> Result<Value, String> {
        if self.choices.is_empty() || value.is_null() || self.choices.contains(&value) {
            return Ok(value);
        }
        Err(format!("{} is not a valid choice", display(&value)))
    }

    fn convert(&self, raw: Raw<'_>) -> Result<Value, String> {
        if let Raw::Json(Value::Null) = raw {
            return if self.nullable {
                Ok(Value::Null)
            } else {
                Err("must not be null".to_string())
            };
        }

        match self.kind {
            ArgKind::Str => match raw {
                Raw::Text(s) => Ok(Value::String(s.to_string())),
                Raw::Json(Value::String(s)) => Ok(Value::String(s.clone())),
                Raw::Json(Value::Number(n)) => Ok(Value::String(n.to_string())),
                Raw::Json(Value::Bool(b)) => Ok(Value::String(b.to_string())),
                Raw::Json(v) => Err(format!("{v} is not a valid string")),
            },
            ArgKind::Int => {
                let parsed = match raw {
                    Raw::Text(s) => s.trim().parse::<i64>().ok(),
                    Raw::Json(Value::Number(n)) => n.as_i64(),
                    Raw::Json(Value::String(s)) => s.trim().parse::<i64>().ok(),
                    Raw::Json(_) => None,
                };
                parsed
                    .map(Value::from)
                    .ok_or_else(|| format!("{} is not a valid integer", raw_display(raw)))
            }
            ArgKind::Json => Ok(match raw {
                Raw::Text(s) => Value::String(s.to_string()),
                Raw::Json(v) => v.clone(),
            }),
            ArgKind::Bool => {
                let parsed = match raw {
                    Raw::Json(Value::Bool(b)) => Some(*b),
                    Raw::Text(s) => parse_bool(s),
                    Raw::Json(Value::String(s)) => parse_bool(s),
                    Raw::Json(Value::Number(n)) => match n.as_i64() {
                        Some(1) => Some(true),
                        Some(0) => Some(false),
                        _ => None,
                    },
                    Raw::Json(_) => None,
                };
                parsed
                    .map(Value::Bool)
                    .ok_or_else(|| format!("{} is not a valid boolean", raw_display(raw)))
            }
        }
    }
}

fn parse_bool(s: &str) -> Option<bool> {
    match s.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}

fn display(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn raw_display(raw: Raw<'_>) -> String {
    match raw {
        Raw::Text(s) => s.to_string(),
        Raw::Json(v) => display(v),
    }
}
