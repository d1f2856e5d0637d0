//! Error message catalogue.
//!
//! Placeholders `%0`, `%1` are substituted by [`format`].

pub const BAD_GETTER_ARITY: &str = "Getter must not have any formal parameters";
pub const BAD_SETTER_ARITY: &str = "Setter must have exactly one formal parameter";
pub const BAD_SETTER_REST_PARAMETER: &str = "Setter function argument must not be a rest parameter";
pub const CONSTRUCTOR_IS_ASYNC: &str = "Class constructor may not be an async method";
pub const CONSTRUCTOR_SPECIAL_METHOD: &str = "Class constructor may not be an accessor";
pub const DECLARATION_MISSING_INITIALIZER: &str = "Missing initializer in %0 declaration";
pub const DEFAULT_REST_PARAMETER: &str = "Unexpected token =";
pub const DUPLICATE_BINDING: &str = "Duplicate binding %0";
pub const DUPLICATE_CONSTRUCTOR: &str = "A class may only have one constructor";
pub const DUPLICATE_PROTO_PROPERTY: &str = "Duplicate __proto__ fields are not allowed in object literals";
pub const FOR_IN_OF_LOOP_INITIALIZER: &str = "%0 loop variable declaration may not have an initializer.";
pub const GENERATOR_IN_LEGACY_CONTEXT: &str =
    "Generator declarations are not allowed in legacy contexts";
pub const ILLEGAL_BREAK: &str = "Illegal break statement";
pub const ILLEGAL_CONTINUE: &str = "Illegal continue statement";
pub const ILLEGAL_CONTINUE_TARGET: &str =
    "Illegal continue statement: '%0' does not denote an iteration statement";
pub const ILLEGAL_EXPORT_DECLARATION: &str = "Unexpected token";
pub const ILLEGAL_IMPORT_DECLARATION: &str = "Unexpected token";
pub const ILLEGAL_LANGUAGE_MODE_DIRECTIVE: &str =
    "Illegal 'use strict' directive in function with non-simple parameter list";
pub const ILLEGAL_RETURN: &str = "Illegal return statement";
pub const INVALID_ESCAPED_RESERVED_WORD: &str = "Keyword must not contain escaped characters";
pub const INVALID_HEX_ESCAPE_SEQUENCE: &str = "Invalid hexadecimal escape sequence";
pub const INVALID_LHS_IN_ASSIGNMENT: &str = "Invalid left-hand side in assignment";
pub const INVALID_LHS_IN_FOR_IN: &str = "Invalid left-hand side in for-in";
pub const INVALID_LHS_IN_FOR_LOOP: &str = "Invalid left-hand side in for-loop";
pub const INVALID_MODULE_SPECIFIER: &str = "Unexpected token";
pub const INVALID_REG_EXP: &str = "Invalid regular expression";
pub const INVALID_REG_EXP_FLAGS: &str = "Invalid regular expression flags";
pub const INVALID_REG_EXP_PATTERN: &str = "Invalid regular expression: /%0/: %1";
pub const JSX_EMPTY_ATTRIBUTE_EXPRESSION: &str =
    "JSX attributes must only be assigned a non-empty expression";
pub const JSX_MISMATCHED_CLOSING_TAG: &str = "Expected corresponding JSX closing tag for %0";
pub const LET_IN_LEXICAL_BINDING: &str = "let is disallowed as a lexically bound name";
pub const MISSING_FROM_CLAUSE: &str = "Unexpected token";
pub const MIXED_COALESCE: &str =
    "Nullish coalescing cannot be mixed with || or && without parentheses";
pub const MULTIPLE_DEFAULTS_IN_SWITCH: &str = "More than one default clause in switch statement";
pub const NEWLINE_AFTER_THROW: &str = "Illegal newline after throw";
pub const NO_AS_AFTER_IMPORT_NAMESPACE: &str = "Unexpected token";
pub const NO_CATCH_OR_FINALLY: &str = "Missing catch or finally after try";
pub const NUMERIC_SEPARATOR: &str = "Numeric separators are not supported";
pub const PARAMETER_AFTER_REST_PARAMETER: &str = "Rest parameter must be last formal parameter";
pub const REDECLARATION: &str = "%0 '%1' has already been declared";
pub const STATIC_PROTOTYPE: &str = "Classes may not have static property named prototype";
pub const STRICT_CATCH_VARIABLE: &str = "Catch variable may not be eval or arguments in strict mode";
pub const STRICT_DELETE: &str = "Delete of an unqualified identifier in strict mode.";
pub const STRICT_FUNCTION: &str =
    "In strict mode code, functions can only be declared at top level or inside a block";
pub const STRICT_FUNCTION_NAME: &str = "Function name may not be eval or arguments in strict mode";
pub const STRICT_LHS_ASSIGNMENT: &str = "Assignment to eval or arguments is not allowed in strict mode";
pub const STRICT_LHS_POSTFIX: &str =
    "Postfix increment/decrement may not have eval or arguments operand in strict mode";
pub const STRICT_LHS_PREFIX: &str =
    "Prefix increment/decrement may not have eval or arguments operand in strict mode";
pub const STRICT_MODE_WITH: &str = "Strict mode code may not include a with statement";
pub const STRICT_OCTAL_LITERAL: &str = "Octal literals are not allowed in strict mode.";
pub const STRICT_PARAM_DUPE: &str = "Strict mode function may not have duplicate parameter names";
pub const STRICT_PARAM_NAME: &str = "Parameter name eval or arguments is not allowed in strict mode";
pub const STRICT_RESERVED_WORD: &str = "Use of future reserved word in strict mode";
pub const STRICT_VAR_NAME: &str = "Variable name may not be eval or arguments in strict mode";
pub const TEMPLATE_OCTAL_LITERAL: &str = "Octal literals are not allowed in template strings.";
pub const UNEXPECTED_EOS: &str = "Unexpected end of input";
pub const UNEXPECTED_IDENTIFIER: &str = "Unexpected identifier";
pub const UNEXPECTED_NUMBER: &str = "Unexpected number";
pub const UNEXPECTED_RESERVED: &str = "Unexpected reserved word";
pub const UNEXPECTED_STRING: &str = "Unexpected string";
pub const UNEXPECTED_SUPER: &str = "'super' keyword unexpected here";
pub const UNEXPECTED_TEMPLATE: &str = "Unexpected quasi %0";
pub const UNEXPECTED_TOKEN: &str = "Unexpected token %0";
pub const UNEXPECTED_TOKEN_ILLEGAL: &str = "Unexpected token ILLEGAL";
pub const UNKNOWN_LABEL: &str = "Undefined label '%0'";
pub const UNTERMINATED_REG_EXP: &str = "Invalid regular expression: missing /";

/// Substitute `%0`, `%1`, ... in `template` with `args`.
pub fn format(template: &str, args: &[&str]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut chars = template.chars().peekable();
    while let Some(ch) = chars.next() {
        if ch == '%' {
            if let Some(index) = chars.peek().and_then(|d| d.to_digit(10)) {
                chars.next();
                out.push_str(args.get(index as usize).copied().unwrap_or(""));
                continue;
            }
        }
        out.push(ch);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_substitutes_positional_args() {
        assert_eq!(format(UNEXPECTED_TOKEN, &["<"]), "Unexpected token <");
        assert_eq!(
            format(REDECLARATION, &["Label", "a"]),
            "Label 'a' has already been declared"
        );
    }

    #[test]
    fn test_format_leaves_plain_text() {
        assert_eq!(format(ILLEGAL_BREAK, &[]), "Illegal break statement");
        assert_eq!(format("100%", &[]), "100%");
    }
}
