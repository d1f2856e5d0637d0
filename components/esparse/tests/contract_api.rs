//! Contract tests for the esparse API
//!
//! These tests verify the public entry points, their option handling and the
//! ESTree JSON shape of their results.

use esparse::ast::{Expression, LiteralValue, Node, Statement};
use esparse::{
    parse, parse_module, parse_script, parse_with_delegate, tokenize, ErrorKind, NodeMut, Options,
    ParseError, Program, SourceType, TokenKind, TokenList,
};
use serde_json::json;

// =============================================================================
// Entry points
// =============================================================================

#[test]
fn test_parse_script_returns_program() {
    let result: Result<Program, ParseError> = parse_script("var x = 1;", Options::default());
    let program = result.unwrap();
    assert_eq!(program.body.len(), 1);
    assert_eq!(program.source_type, SourceType::Script);
}

#[test]
fn test_parse_module_returns_program() {
    let program = parse_module("export const x = 1;", Options::default()).unwrap();
    assert_eq!(program.source_type, SourceType::Module);
    assert_eq!(program.body[0].type_name(), "ExportNamedDeclaration");
}

#[test]
fn test_parse_uses_source_type_option() {
    let options = Options::new().with_source_type(SourceType::Module);
    assert!(parse("import x from 'm';", options).is_ok());
    assert!(parse("import x from 'm';", Options::default()).is_err());
}

#[test]
fn test_tokenize_returns_token_list() {
    let list: TokenList<esparse::Token> = tokenize("a = 1", Options::default()).unwrap();
    let kinds: Vec<TokenKind> = list.tokens.iter().map(|token| token.kind).collect();
    assert_eq!(
        kinds,
        vec![TokenKind::Identifier, TokenKind::Punctuator, TokenKind::NumericLiteral]
    );
    assert!(list.comments.is_none());
    assert!(list.errors.is_none());
}

#[test]
fn test_parse_with_delegate_sees_program_last() {
    let mut seen = Vec::new();
    parse_with_delegate("f(1, 2)", Options::default(), &mut |node: NodeMut<'_>| {
        seen.push(node.type_name())
    })
    .unwrap();
    assert_eq!(seen.last(), Some(&"Program"));
    assert_eq!(seen.iter().filter(|name| **name == "Literal").count(), 2);
}

#[test]
fn test_parse_with_delegate_delivers_before_a_later_error() {
    let mut seen = Vec::new();
    let result = parse_with_delegate("first();\nsecond(", Options::default(), &mut |node: NodeMut<'_>| {
        seen.push(node.type_name())
    });
    assert!(result.is_err());
    assert_eq!(seen, vec!["Identifier", "CallExpression", "ExpressionStatement"]);
}

#[test]
fn test_large_integer_literal_serializes_as_integer() {
    let program = parse_script("9007199254740993;", Options::default()).unwrap();
    let json = serde_json::to_value(&program).unwrap();
    let value = &json["body"][0]["expression"]["value"];
    assert!(value.is_i64());
    // the nearest double below the written value
    assert_eq!(value, &json!(9_007_199_254_740_992i64));
}

// =============================================================================
// Errors
// =============================================================================

#[test]
fn test_error_shape() {
    let error = parse_script("var x = ;", Options::default()).unwrap_err();
    assert_eq!(error.kind, ErrorKind::SyntaxError);
    assert_eq!(error.description, "Unexpected token ;");
    assert_eq!(error.message, "Line 1: Unexpected token ;");
    assert_eq!(error.index, 8);
    assert_eq!(error.line_number, 1);
    assert_eq!(error.column, 8);

    let json = serde_json::to_value(&error).unwrap();
    assert_eq!(json["lineNumber"], 1);
    assert_eq!(json["description"], "Unexpected token ;");
    assert_eq!(error.to_string(), "Line 1: Unexpected token ;");
}

#[test]
fn test_error_on_later_line() {
    let error = parse_script("a;\nb;\n  c d;", Options::default()).unwrap_err();
    assert_eq!(error.line_number, 3);
    assert_eq!(error.column, 4);
    assert_eq!(error.index, 10);
}

#[test]
fn test_lexical_error_kind() {
    let error = parse_script("'unterminated", Options::default()).unwrap_err();
    assert_eq!(error.kind, ErrorKind::LexicalError);
}

// =============================================================================
// Options
// =============================================================================

#[test]
fn test_range_and_loc_serialization() {
    let options = Options::new().with_range(true).with_loc(true).with_source("input.js");
    let program = parse_script("a\n  + b", options).unwrap();
    let json = serde_json::to_value(&program).unwrap();
    let expression = &json["body"][0]["expression"];
    assert_eq!(expression["type"], "BinaryExpression");
    assert_eq!(expression["range"], json!([0, 7]));
    assert_eq!(
        expression["loc"],
        json!({
            "start": {"line": 1, "column": 0},
            "end": {"line": 2, "column": 5},
            "source": "input.js"
        })
    );
}

#[test]
fn test_location_fields_absent_by_default() {
    let json = serde_json::to_value(parse_script("a", Options::default()).unwrap()).unwrap();
    assert!(json.get("range").is_none());
    assert!(json["body"][0].get("loc").is_none());
    assert!(json.get("tokens").is_none());
    assert!(json.get("comments").is_none());
    assert!(json.get("errors").is_none());
}

#[test]
fn test_raw_option() {
    let program = parse_script("x = 0x10", Options::new().with_raw(true)).unwrap();
    let json = serde_json::to_value(&program).unwrap();
    let literal = &json["body"][0]["expression"]["right"];
    assert_eq!(literal["value"], 16);
    assert_eq!(literal["raw"], "0x10");

    let json = serde_json::to_value(parse_script("x = 0x10", Options::default()).unwrap()).unwrap();
    assert!(json["body"][0]["expression"]["right"].get("raw").is_none());
}

#[test]
fn test_tokens_option() {
    let program = parse_script("let a = /x/g", Options::new().with_tokens(true)).unwrap();
    let json = serde_json::to_value(&program).unwrap();
    let types: Vec<&str> = json["tokens"]
        .as_array()
        .unwrap()
        .iter()
        .map(|token| token["type"].as_str().unwrap())
        .collect();
    assert_eq!(types, vec!["Identifier", "Identifier", "Punctuator", "RegularExpression"]);
    assert_eq!(json["tokens"][3]["regex"], json!({"pattern": "x", "flags": "g"}));
}

#[test]
fn test_options_from_json() {
    let options = Options::from_json(r#"{"sourceType": "module", "range": true}"#).unwrap();
    let program = parse("export default 1", options).unwrap();
    let json = serde_json::to_value(&program).unwrap();
    assert_eq!(json["sourceType"], "module");
    assert_eq!(json["range"], json!([0, 16]));
}

// =============================================================================
// Tree shape
// =============================================================================

#[test]
fn test_estree_shape_of_function() {
    let program = parse_script("function add(a, b = 1) { return a + b; }", Options::default()).unwrap();
    let json = serde_json::to_value(&program).unwrap();
    assert_eq!(
        json["body"][0],
        json!({
            "type": "FunctionDeclaration",
            "id": {"type": "Identifier", "name": "add"},
            "params": [
                {"type": "Identifier", "name": "a"},
                {
                    "type": "AssignmentPattern",
                    "left": {"type": "Identifier", "name": "b"},
                    "right": {"type": "Literal", "value": 1}
                }
            ],
            "body": {
                "type": "BlockStatement",
                "body": [{
                    "type": "ReturnStatement",
                    "argument": {
                        "type": "BinaryExpression",
                        "operator": "+",
                        "left": {"type": "Identifier", "name": "a"},
                        "right": {"type": "Identifier", "name": "b"}
                    }
                }]
            },
            "generator": false,
            "expression": false,
            "async": false
        })
    );
}

#[test]
fn test_directive_field() {
    let program = parse_script("'use strict'; 'other'", Options::default()).unwrap();
    let json = serde_json::to_value(&program).unwrap();
    assert_eq!(json["body"][0]["directive"], "use strict");
    assert_eq!(json["body"][1]["directive"], "other");
}

#[test]
fn test_bigint_literal() {
    let program = parse_script("0x1Fn", Options::default()).unwrap();
    let Statement::Expression(stmt) = &program.body[0] else {
        panic!("expected expression statement");
    };
    let Expression::Literal(literal) = &stmt.expression else {
        panic!("expected literal");
    };
    assert_eq!(literal.bigint.as_deref(), Some("31"));
    assert!(matches!(&literal.value, LiteralValue::BigInt(value) if value.to_string() == "31"));
    let json = serde_json::to_value(literal).unwrap();
    assert_eq!(json["value"], serde_json::Value::Null);
}

#[test]
fn test_hashbang_is_skipped() {
    let program = parse_script("#!/usr/bin/env node\nrun();", Options::default()).unwrap();
    assert_eq!(program.body.len(), 1);
}

// =============================================================================
// Logging
// =============================================================================

#[test]
fn test_parse_under_trace_subscriber() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new("esparse=trace"))
        .with_test_writer()
        .try_init();
    let options = Options::new().with_tolerant(true).with_attach_comment(true);
    let program = parse_script("// c\na b;\nc;", options).unwrap();
    assert_eq!(program.errors.as_ref().map(Vec::len), Some(1));
    assert_eq!(program.body.len(), 1);
}
