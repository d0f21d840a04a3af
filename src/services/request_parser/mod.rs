//! Declarative request-argument parsing.
//!
//! A `RequestParser` holds a list of `Argument` declarations. `parse_args`
//! validates every one of them against a `RequestArgs`, collects all
//! per-argument failures into a single 400, and in strict mode also rejects
//! fields that no argument reads from the location they were sent in.
//!
//! ```ignore
//! let ns = RequestParser::new()
//!     .add_argument(Argument::new("page").kind(ArgKind::Int).default_value(1))
//!     .add_argument(Argument::new("per_page").kind(ArgKind::Int).default_value(20))
//!     .parse_args(&args, true)?;
//! ```

mod args;
mod argument;
mod namespace;

use serde_json::{Map, Value};

use crate::error::AppError;

pub use args::RequestArgs;
pub use argument::{ArgKind, Argument, Location};
pub use namespace::Namespace;

use argument::Parsed;

#[derive(Debug, Clone, Default)]
pub struct RequestParser {
    args: Vec<Argument>,
}

impl RequestParser {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_argument(mut self, arg: Argument) -> Self {
        self.args.push(arg);
        self
    }

    pub fn parse_args(&self, req: &RequestArgs, strict: bool) -> Result<Namespace, AppError> {
        let mut namespace = Namespace::default();
        let mut errors = Map::new();

        for arg in &self.args {
            match arg.parse(req) {
                Parsed::Found(value) => namespace.insert(arg.dest_name(), value),
                Parsed::Missing(value) => {
                    if arg.stores_missing() {
                        namespace.insert(arg.dest_name(), value);
                    }
                }
                Parsed::Invalid(msg) => {
                    errors.insert(arg.name().to_string(), Value::String(msg));
                }
            }
        }

        if !errors.is_empty() {
            return Err(AppError::invalid_fields(errors));
        }

        if strict {
            // a field only counts as consumed in a location its argument reads from
            let unknown: Map<String, Value> = req
                .fields()
                .filter(|(location, name)| {
                    !self
                        .args
                        .iter()
                        .any(|arg| arg.name() == *name && arg.reads_from(*location))
                })
                .map(|(_, name)| (name.to_string(), Value::String("unknown argument".into())))
                .collect();

            if !unknown.is_empty() {
                tracing::debug!(fields = ?unknown.keys().collect::<Vec<_>>(), "unknown arguments");
                return Err(AppError::invalid_fields(unknown));
            }
        }

        Ok(namespace)
    }
}
