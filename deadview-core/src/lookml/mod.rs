//! LookML reader.
//!
//! Turns LookML text into the nested mapping the extractors consume:
//!
//! - named blocks (`view: orders { ... }`) are collected into plural lists
//!   (`"views": [{"name": "orders", ...}]`), as are `explore`, `join`,
//!   `dimension` and the other repeatable block types
//! - `sql`-style values (`sql`, `sql_*`, `*_sql`, `html`, `expression*`) are
//!   kept verbatim up to their closing `;;`
//! - `[a, b]` lists become arrays; repeated lists under one key are concatenated
//!
//! No LookML semantics are checked here.
//!
//! # Example
//!
//! ```
//! use deadview_core::lookml::parse_lookml;
//!
//! let parsed = parse_lookml("explore: orders { from: orders_view }").unwrap();
//! assert_eq!(parsed["explores"][0]["from"], "orders_view");
//! ```

mod lexer;
mod parser;

use std::fmt;

use serde_json::Value;

/// Syntax error with the 1-indexed position where it was detected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntaxError {
    pub message: String,
    pub line: usize,
    pub column: usize,
}

impl SyntaxError {
    pub(crate) fn new(message: impl Into<String>, line: usize, column: usize) -> Self {
        Self {
            message: message.into(),
            line,
            column,
        }
    }
}

impl fmt::Display for SyntaxError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} at line {}, column {}", self.message, self.line, self.column)
    }
}

impl std::error::Error for SyntaxError {}

/// Parse a LookML document into a JSON object.
pub fn parse_lookml(content: &str) -> Result<Value, SyntaxError> {
    parser::Parser::new(content).parse_document()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_document() {
        let value = parse_lookml("# nothing here\n").unwrap();
        assert!(value.as_object().unwrap().is_empty());
    }

    #[test]
    fn test_syntax_error_display() {
        let err = parse_lookml("view: orders {").unwrap_err();
        assert_eq!(err.line, 1);
        assert!(err.to_string().contains("line 1"));
    }

    #[test]
    fn test_model_file() {
        let value = parse_lookml(
            r#"
connection: "warehouse"
include: "/views/**/*.view.lkml"

datagroup: nightly {
  sql_trigger: SELECT CURRENT_DATE ;;
  max_cache_age: "24 hours"
}

explore: orders {
  view_name: orders
  join: customers {
    type: left_outer
    sql_on: ${orders.customer_id} = ${customers.id} ;;
    relationship: many_to_one
  }
  join: returned_items {
    from: order_items
    sql_on: ${returned_items.order_id} = ${orders.id} ;;
  }
}
"#,
        )
        .unwrap();

        assert_eq!(value["connection"], "warehouse");
        assert_eq!(value["datagroups"][0]["name"], "nightly");
        let explore = &value["explores"][0];
        assert_eq!(explore["view_name"], "orders");
        assert_eq!(explore["joins"].as_array().unwrap().len(), 2);
        assert_eq!(explore["joins"][1]["from"], "order_items");
    }
}
