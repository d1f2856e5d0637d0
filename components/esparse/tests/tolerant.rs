//! Tolerant-mode recovery through the public API.

use esparse::ast::Node;
use esparse::{parse_module, parse_script, Options};

fn tolerant() -> Options {
    Options::new().with_tolerant(true)
}

#[test]
fn test_errors_present_and_empty_for_valid_input() {
    let program = parse_script("var a = 1;", tolerant()).unwrap();
    assert_eq!(program.errors, Some(Vec::new()));
    let json = serde_json::to_value(&program).unwrap();
    assert_eq!(json["errors"], serde_json::json!([]));
}

#[test]
fn test_recovers_at_statement_boundaries() {
    let program = parse_script("a b;\nvar = 2;\nok();", tolerant()).unwrap();
    let errors = program.errors.as_ref().unwrap();
    assert_eq!(errors.len(), 2);
    assert_eq!(errors[0].line_number, 1);
    assert_eq!(errors[1].line_number, 2);
    assert_eq!(errors[1].description, "Unexpected token =");
    let types: Vec<_> = program.body.iter().map(|stmt| stmt.type_name()).collect();
    assert_eq!(types, vec!["ExpressionStatement"]);
}

#[test]
fn test_soft_errors_keep_the_node() {
    let program = parse_script("'use strict'; with (a) {}", tolerant()).unwrap();
    let errors = program.errors.as_ref().unwrap();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].description, "Strict mode code may not include a with statement");
    assert_eq!(program.body[1].type_name(), "WithStatement");

    let program = parse_script("return 1;", tolerant()).unwrap();
    assert_eq!(program.errors.as_ref().map(Vec::len), Some(1));
    assert_eq!(program.body[0].type_name(), "ReturnStatement");
}

#[test]
fn test_recovery_inside_blocks() {
    let program = parse_script("function f() { a b; return 1; }\ng();", tolerant()).unwrap();
    assert_eq!(program.errors.as_ref().map(Vec::len), Some(1));
    assert_eq!(program.body.len(), 2);
    let json = serde_json::to_value(&program).unwrap();
    let inner = &json["body"][0]["body"]["body"];
    assert_eq!(inner.as_array().map(Vec::len), Some(1));
    assert_eq!(inner[0]["type"], "ReturnStatement");
}

#[test]
fn test_lexical_errors_are_skipped() {
    let program = parse_script("x = 1;\n@@\ny = 2;", tolerant()).unwrap();
    assert!(!program.errors.as_ref().unwrap().is_empty());
    assert_eq!(statement_summary(&program), vec!["x=", "y="]);
}

fn statement_summary(program: &esparse::Program) -> Vec<String> {
    let json = serde_json::to_value(program).unwrap();
    json["body"]
        .as_array()
        .unwrap()
        .iter()
        .map(|stmt| match stmt["expression"]["type"].as_str() {
            Some("CallExpression") => format!("{}()", stmt["expression"]["callee"]["name"].as_str().unwrap()),
            Some("AssignmentExpression") => format!("{}=", stmt["expression"]["left"]["name"].as_str().unwrap()),
            _ => stmt["type"].as_str().unwrap().to_string(),
        })
        .collect()
}

#[test]
fn test_next_line_survives_error_in_call_arguments() {
    let program = parse_script("x = 1;\nfoo(;\nbar();", tolerant()).unwrap();
    let errors = program.errors.as_ref().unwrap();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].index, 11);
    assert_eq!(statement_summary(&program), vec!["x=", "bar()"]);
}

#[test]
fn test_next_line_survives_error_in_class_body() {
    let program = parse_script("class A { x y }\nz();", tolerant()).unwrap();
    assert_eq!(program.errors.as_ref().map(Vec::len), Some(1));
    assert_eq!(statement_summary(&program), vec!["z()"]);

    // the class body brace does not close the enclosing block
    let program = parse_script("{ class A { x y }\nz(); }\nw();", tolerant()).unwrap();
    assert_eq!(program.errors.as_ref().map(Vec::len), Some(1));
    assert_eq!(statement_summary(&program), vec!["BlockStatement", "w()"]);
    let json = serde_json::to_value(&program).unwrap();
    assert_eq!(json["body"][0]["body"][0]["expression"]["callee"]["name"], "z");
}

#[test]
fn test_identifier_after_line_break_starts_a_statement() {
    let program = parse_script("}\nx", tolerant()).unwrap();
    assert_eq!(program.errors.as_ref().map(Vec::len), Some(1));
    assert_eq!(statement_summary(&program), vec!["ExpressionStatement"]);

    let program = parse_script("a = (1 +\n)\nb = 2;", tolerant()).unwrap();
    assert_eq!(program.errors.as_ref().map(Vec::len), Some(1));
    assert_eq!(statement_summary(&program), vec!["b="]);
}

#[test]
fn test_failed_expect_does_not_swallow_next_line() {
    let program = parse_script("if (a {\n}\nok();", tolerant()).unwrap();
    assert!(!program.errors.as_ref().unwrap().is_empty());
    let summary = statement_summary(&program);
    assert_eq!(summary.last().map(String::as_str), Some("ok()"));
}

#[test]
fn test_module_declarations_in_script_are_tolerated() {
    let program = parse_script("import a from 'a';", tolerant()).unwrap();
    let errors = program.errors.as_ref().unwrap();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].index, 0);
    assert_eq!(program.body[0].type_name(), "ImportDeclaration");

    let program = parse_module("import a from 'a';", tolerant()).unwrap();
    assert_eq!(program.errors, Some(Vec::new()));
}

#[test]
fn test_unterminated_input_reports_end_of_input() {
    let program = parse_script("f(", tolerant()).unwrap();
    let errors = program.errors.unwrap();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].description, "Unexpected end of input");
    assert_eq!(errors[0].index, 2);
}
