//! Recursive-descent parser turning LookML tokens into a `serde_json::Value`.

use serde_json::{Map, Value};

use super::lexer::{Lexer, Token, TokenKind};
use super::SyntaxError;

/// Block keys whose occurrences are collected into a plural list
/// (`view` → `views`) even when the block carries no name.
const PLURAL_BLOCK_KEYS: &[&str] = &[
    "access_filter",
    "access_grant",
    "action",
    "aggregate_table",
    "allowed_value",
    "assert",
    "column",
    "constant",
    "datagroup",
    "derived_column",
    "dimension",
    "dimension_group",
    "explore",
    "filter",
    "form_param",
    "join",
    "link",
    "map_layer",
    "measure",
    "named_value_format",
    "option",
    "param",
    "parameter",
    "query",
    "set",
    "test",
    "user_attribute_param",
    "view",
    "when",
];

/// Scalar keys that may repeat at one level (`include: "a"`, `include: "b"`).
const PLURAL_SCALAR_KEYS: &[&str] = &["include"];

/// Keys whose value is raw text terminated by `;;`.
fn is_expression_key(key: &str) -> bool {
    key == "sql"
        || key.starts_with("sql_")
        || key.ends_with("_sql")
        || key == "html"
        || key.starts_with("expression")
}

fn plural_key(key: &str) -> String {
    if key.ends_with('s') {
        key.to_string()
    } else {
        format!("{}s", key)
    }
}

pub(crate) struct Parser {
    lexer: Lexer,
    peeked: Option<Token>,
}

impl Parser {
    pub(crate) fn new(input: &str) -> Self {
        Self {
            lexer: Lexer::new(input),
            peeked: None,
        }
    }

    fn peek_kind(&mut self) -> Result<&TokenKind, SyntaxError> {
        let tok = match self.peeked.take() {
            Some(tok) => tok,
            None => self.lexer.next_token()?,
        };
        Ok(&self.peeked.insert(tok).kind)
    }

    fn next(&mut self) -> Result<Token, SyntaxError> {
        match self.peeked.take() {
            Some(tok) => Ok(tok),
            None => self.lexer.next_token(),
        }
    }

    fn unexpected(kind: &TokenKind, line: usize, column: usize, context: &str) -> SyntaxError {
        let found = match kind {
            TokenKind::Literal(s) => format!("'{}'", s),
            TokenKind::Quoted(s) => format!("\"{}\"", s),
            TokenKind::Colon => "':'".to_string(),
            TokenKind::Comma => "','".to_string(),
            TokenKind::LBrace => "'{'".to_string(),
            TokenKind::RBrace => "'}'".to_string(),
            TokenKind::LBracket => "'['".to_string(),
            TokenKind::RBracket => "']'".to_string(),
            TokenKind::End => "end of file".to_string(),
        };
        SyntaxError::new(format!("unexpected {} {}", found, context), line, column)
    }

    /// Parse a whole document.
    pub(crate) fn parse_document(&mut self) -> Result<Value, SyntaxError> {
        let map = self.parse_pairs(false)?;
        Ok(Value::Object(map))
    }

    /// Parse `key: value` pairs until end of input (top level) or a closing brace.
    fn parse_pairs(&mut self, in_block: bool) -> Result<Map<String, Value>, SyntaxError> {
        let mut map = Map::new();
        loop {
            let Token { kind, line, column } = self.next()?;
            let key = match kind {
                TokenKind::End if !in_block => return Ok(map),
                TokenKind::RBrace if in_block => return Ok(map),
                TokenKind::Literal(key) => key,
                other => {
                    return Err(Self::unexpected(&other, line, column, "where a key was expected"))
                }
            };
            self.expect_colon(&key)?;
            self.parse_value_into(&mut map, key)?;
        }
    }

    fn expect_colon(&mut self, key: &str) -> Result<(), SyntaxError> {
        let Token { kind, line, column } = self.next()?;
        if kind == TokenKind::Colon {
            Ok(())
        } else {
            Err(Self::unexpected(&kind, line, column, &format!("after key '{}'", key)))
        }
    }

    fn parse_value_into(&mut self, map: &mut Map<String, Value>, key: String) -> Result<(), SyntaxError> {
        if is_expression_key(&key) && self.peeked.is_none() {
            let expr = self.lexer.read_expression()?;
            insert(map, key, Value::String(expr), false);
            return Ok(());
        }

        let Token { kind, line, column } = self.next()?;
        match kind {
            TokenKind::LBrace => {
                let block = self.parse_pairs(true)?;
                let plural = PLURAL_BLOCK_KEYS.contains(&key.as_str());
                insert(map, key, Value::Object(block), plural);
            }
            TokenKind::LBracket => {
                let list = self.parse_list()?;
                insert(map, key, list, false);
            }
            TokenKind::Literal(word) | TokenKind::Quoted(word) => {
                if *self.peek_kind()? == TokenKind::LBrace {
                    self.next()?;
                    let mut block = Map::new();
                    block.insert("name".to_string(), Value::String(word));
                    block.extend(self.parse_pairs(true)?);
                    insert(map, key, Value::Object(block), true);
                } else {
                    let plural = PLURAL_SCALAR_KEYS.contains(&key.as_str());
                    insert(map, key, Value::String(word), plural);
                }
            }
            other => {
                let context = format!("as value of '{}'", key);
                return Err(Self::unexpected(&other, line, column, &context));
            }
        }
        Ok(())
    }

    /// Parse list items after `[`. Items are scalars or `key: value` pairs.
    fn parse_list(&mut self) -> Result<Value, SyntaxError> {
        let mut items = Vec::new();
        let mut pairs = Map::new();
        loop {
            let Token { kind, line, column } = self.next()?;
            match kind {
                TokenKind::RBracket => break,
                TokenKind::Literal(word) | TokenKind::Quoted(word) => {
                    if *self.peek_kind()? == TokenKind::Colon {
                        self.next()?;
                        let value = self.next()?;
                        match value.kind {
                            TokenKind::Literal(v) | TokenKind::Quoted(v) => {
                                pairs.insert(word, Value::String(v));
                            }
                            other => {
                                return Err(Self::unexpected(
                                    &other,
                                    value.line,
                                    value.column,
                                    "in list pair",
                                ))
                            }
                        }
                    } else {
                        items.push(Value::String(word));
                    }
                }
                other => return Err(Self::unexpected(&other, line, column, "in list")),
            }

            let sep = self.next()?;
            match sep.kind {
                TokenKind::Comma => continue,
                TokenKind::RBracket => break,
                other => {
                    return Err(Self::unexpected(
                        &other,
                        sep.line,
                        sep.column,
                        "where ',' or ']' was expected",
                    ))
                }
            }
        }

        if !pairs.is_empty() {
            items.push(Value::Object(pairs));
        }
        Ok(Value::Array(items))
    }
}

/// Store a parsed value, collecting plural keys and concatenating repeated lists.
fn insert(map: &mut Map<String, Value>, key: String, value: Value, plural: bool) {
    if plural {
        let entry = map
            .entry(plural_key(&key))
            .or_insert_with(|| Value::Array(Vec::new()));
        if let Value::Array(list) = entry {
            list.push(value);
        } else {
            *entry = Value::Array(vec![value]);
        }
        return;
    }

    if let Value::Array(more) = value {
        if let Some(Value::Array(existing)) = map.get_mut(&key) {
            existing.extend(more);
        } else {
            map.insert(key, Value::Array(more));
        }
        return;
    }
    map.insert(key, value);
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn parse(input: &str) -> Value {
        Parser::new(input).parse_document().unwrap()
    }

    #[test]
    fn test_named_blocks_become_plural_lists() {
        let value = parse(
            r#"
view: orders {
  sql_table_name: public.orders ;;
  dimension: id { type: number }
}
view: users {}
"#,
        );
        assert_eq!(value["views"][0]["name"], "orders");
        assert_eq!(value["views"][0]["sql_table_name"], "public.orders");
        assert_eq!(value["views"][0]["dimensions"][0]["name"], "id");
        assert_eq!(value["views"][1]["name"], "users");
    }

    #[test]
    fn test_anonymous_block() {
        let value = parse(
            r#"
view: order_facts {
  derived_table: {
    sql: SELECT * FROM ${orders.SQL_TABLE_NAME} ;;
  }
}
"#,
        );
        assert_eq!(
            value["views"][0]["derived_table"]["sql"],
            "SELECT * FROM ${orders.SQL_TABLE_NAME}"
        );
    }

    #[test]
    fn test_explore_with_joins() {
        let value = parse(
            r#"
explore: orders {
  from: orders_view
  join: users {
    sql_on: ${orders.user_id} = ${users.id} ;;
    relationship: many_to_one
  }
}
"#,
        );
        assert_eq!(
            value,
            json!({
                "explores": [{
                    "name": "orders",
                    "from": "orders_view",
                    "joins": [{
                        "name": "users",
                        "sql_on": "${orders.user_id} = ${users.id}",
                        "relationship": "many_to_one"
                    }]
                }]
            })
        );
    }

    #[test]
    fn test_lists_and_repeated_includes() {
        let value = parse(
            r#"
include: "/views/*.view.lkml"
include: "/explores/*.explore.lkml"
view: child {
  extends: [base, audit]
  extends: [extra]
}
"#,
        );
        assert_eq!(
            value["includes"],
            json!(["/views/*.view.lkml", "/explores/*.explore.lkml"])
        );
        assert_eq!(value["views"][0]["extends"], json!(["base", "audit", "extra"]));
    }

    #[test]
    fn test_list_of_pairs() {
        let value = parse(r#"explore: e { always_filter: { filters: [orders.status: "complete",] } }"#);
        assert_eq!(
            value["explores"][0]["always_filter"]["filters"],
            json!([{ "orders.status": "complete" }])
        );
    }

    #[test]
    fn test_anonymous_plural_block_has_no_name() {
        let value = parse("explore: { from: orders }");
        assert_eq!(value["explores"][0], json!({ "from": "orders" }));
    }

    #[test]
    fn test_unclosed_block_is_error() {
        let err = Parser::new("view: orders {\n  dimension: id {\n").parse_document().unwrap_err();
        assert!(err.message.contains("end of file"));
    }

    #[test]
    fn test_missing_colon_is_error() {
        let err = Parser::new("view orders {}").parse_document().unwrap_err();
        assert_eq!(err.line, 1);
        assert_eq!(err.column, 6);
    }
}
