//! Abstract Syntax Tree node definitions.
//!
//! Every node is its own struct serialized with an ESTree `type` tag equal to
//! its name. Grammar categories ([`Statement`], [`Expression`], [`Pattern`],
//! ...) are enums over boxed nodes and serialize transparently. Every node
//! carries a [`NodeMeta`] with its span and the optional `range`, `loc` and
//! attached comments.

use crate::options::SourceType;
use crate::token::{RegexParts, Token};
use crate::visit::{VisitMut, Walk, WalkField};
use core_types::{Location, ParseError, Range, Span};
use num_bigint::BigInt;
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

/// Metadata shared by every node.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeMeta {
    /// Start and end positions, always tracked
    #[serde(skip)]
    pub span: Span,
    /// Byte range, when requested
    #[serde(skip_serializing_if = "Option::is_none")]
    pub range: Option<Range>,
    /// Line/column location, when requested
    #[serde(skip_serializing_if = "Option::is_none")]
    pub loc: Option<Location>,
    /// Comments directly before the node
    #[serde(skip_serializing_if = "Option::is_none")]
    pub leading_comments: Option<Vec<Comment>>,
    /// Comments directly after the node
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trailing_comments: Option<Vec<Comment>>,
    /// Comments inside an otherwise empty container
    #[serde(skip_serializing_if = "Option::is_none")]
    pub inner_comments: Option<Vec<Comment>>,
}

/// Access to the metadata and ESTree type of any node or node category.
pub trait Node {
    /// Metadata of the node.
    fn meta(&self) -> &NodeMeta;
    /// Mutable metadata of the node.
    fn meta_mut(&mut self) -> &mut NodeMeta;
    /// ESTree `type` of the node.
    fn type_name(&self) -> &'static str;
}

/// `//` or `/* */`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum CommentKind {
    /// `// ...`
    Line,
    /// `/* ... */`
    Block,
}

/// A source comment.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Comment {
    /// `Line` or `Block`
    #[serde(rename = "type")]
    pub kind: CommentKind,
    /// Text without delimiters
    pub value: String,
    /// Start and end positions
    #[serde(skip)]
    pub span: Span,
    /// Byte range, when requested
    #[serde(skip_serializing_if = "Option::is_none")]
    pub range: Option<Range>,
    /// Line/column location, when requested
    #[serde(skip_serializing_if = "Option::is_none")]
    pub loc: Option<Location>,
}

macro_rules! node {
    (
        $(#[$attr:meta])*
        pub struct $name:ident $(as $tag:literal)? {
            $( $(#[$fattr:meta])* pub $field:ident : $ty:ty ),* $(,)?
        }
    ) => {
        $(#[$attr])*
        #[derive(Debug, Clone, PartialEq, Serialize)]
        #[serde(tag = "type", rename_all = "camelCase")]
        $(#[serde(rename = $tag)])?
        pub struct $name {
            $( $(#[$fattr])* pub $field: $ty, )*
            /// Span, location and comments
            #[serde(flatten)]
            pub meta: NodeMeta,
        }

        impl Node for $name {
            fn meta(&self) -> &NodeMeta {
                &self.meta
            }
            fn meta_mut(&mut self) -> &mut NodeMeta {
                &mut self.meta
            }
            fn type_name(&self) -> &'static str {
                node!(@tag $name $($tag)?)
            }
        }

        impl Walk for $name {
            fn walk_children(&mut self, _visitor: &mut dyn VisitMut) {
                $( WalkField::walk_field(&mut self.$field, _visitor); )*
            }
        }
    };
    (@tag $name:ident $tag:literal) => { $tag };
    (@tag $name:ident) => { stringify!($name) };
}

macro_rules! node_enum {
    (
        $(#[$attr:meta])*
        pub enum $name:ident {
            $( $(#[$vattr:meta])* $variant:ident($ty:ty) ),* $(,)?
        }
    ) => {
        $(#[$attr])*
        #[derive(Debug, Clone, PartialEq, Serialize)]
        #[serde(untagged)]
        pub enum $name {
            $( $(#[$vattr])* $variant($ty), )*
        }

        impl Node for $name {
            fn meta(&self) -> &NodeMeta {
                match self {
                    $( $name::$variant(node) => node.meta(), )*
                }
            }
            fn meta_mut(&mut self) -> &mut NodeMeta {
                match self {
                    $( $name::$variant(node) => node.meta_mut(), )*
                }
            }
            fn type_name(&self) -> &'static str {
                match self {
                    $( $name::$variant(node) => node.type_name(), )*
                }
            }
        }

        impl Walk for $name {
            fn walk_children(&mut self, visitor: &mut dyn VisitMut) {
                match self {
                    $( $name::$variant(node) => node.walk_children(visitor), )*
                }
            }
        }
    };
}

macro_rules! operator_enum {
    (
        $(#[$attr:meta])*
        pub enum $name:ident { $( $(#[$vattr:meta])* $variant:ident => $text:literal ),* $(,)? }
    ) => {
        $(#[$attr])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq)]
        pub enum $name {
            $( $(#[$vattr])* $variant, )*
        }

        impl $name {
            /// Source spelling of the operator.
            pub fn as_str(&self) -> &'static str {
                match self {
                    $( $name::$variant => $text, )*
                }
            }

            /// Operator spelled `text`, if any.
            pub fn from_token(text: &str) -> Option<Self> {
                match text {
                    $( $text => Some($name::$variant), )*
                    _ => None,
                }
            }
        }

        impl Serialize for $name {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(self.as_str())
            }
        }

        impl WalkField for $name {
            fn walk_field(&mut self, _visitor: &mut dyn VisitMut) {}
        }
    };
}

// ---------------------------------------------------------------------------
// Program
// ---------------------------------------------------------------------------

node! {
    /// The root of every parse.
    pub struct Program {
        /// Top-level statements
        pub body: Vec<Statement>,
        /// `script` or `module`
        pub source_type: SourceType,
        /// All comments, when `comment` is on
        #[serde(skip_serializing_if = "Option::is_none")]
        pub comments: Option<Vec<Comment>>,
        /// All tokens, when `tokens` is on
        #[serde(skip_serializing_if = "Option::is_none")]
        pub tokens: Option<Vec<Token>>,
        /// Tolerated errors, present in tolerant mode
        #[serde(skip_serializing_if = "Option::is_none")]
        pub errors: Option<Vec<ParseError>>,
    }
}

// ---------------------------------------------------------------------------
// Categories
// ---------------------------------------------------------------------------

node_enum! {
    /// Statements and declarations that may appear in a statement list.
    pub enum Statement {
        Block(Box<BlockStatement>),
        Break(Box<BreakStatement>),
        Continue(Box<ContinueStatement>),
        Debugger(Box<DebuggerStatement>),
        DoWhile(Box<DoWhileStatement>),
        Empty(Box<EmptyStatement>),
        Expression(Box<ExpressionStatement>),
        For(Box<ForStatement>),
        ForIn(Box<ForInStatement>),
        ForOf(Box<ForOfStatement>),
        If(Box<IfStatement>),
        Labeled(Box<LabeledStatement>),
        Return(Box<ReturnStatement>),
        Switch(Box<SwitchStatement>),
        Throw(Box<ThrowStatement>),
        Try(Box<TryStatement>),
        While(Box<WhileStatement>),
        With(Box<WithStatement>),
        VariableDeclaration(Box<VariableDeclaration>),
        FunctionDeclaration(Box<FunctionDeclaration>),
        ClassDeclaration(Box<ClassDeclaration>),
        ImportDeclaration(Box<ImportDeclaration>),
        ExportNamedDeclaration(Box<ExportNamedDeclaration>),
        ExportDefaultDeclaration(Box<ExportDefaultDeclaration>),
        ExportAllDeclaration(Box<ExportAllDeclaration>),
    }
}

node_enum! {
    /// Declarations that may follow `export`.
    pub enum Declaration {
        Variable(Box<VariableDeclaration>),
        Function(Box<FunctionDeclaration>),
        Class(Box<ClassDeclaration>),
    }
}

impl From<Declaration> for Statement {
    fn from(declaration: Declaration) -> Self {
        match declaration {
            Declaration::Variable(node) => Statement::VariableDeclaration(node),
            Declaration::Function(node) => Statement::FunctionDeclaration(node),
            Declaration::Class(node) => Statement::ClassDeclaration(node),
        }
    }
}

node_enum! {
    /// Expressions.
    pub enum Expression {
        Identifier(Box<Identifier>),
        Literal(Box<Literal>),
        This(Box<ThisExpression>),
        Super(Box<Super>),
        Array(Box<ArrayExpression>),
        Object(Box<ObjectExpression>),
        Function(Box<FunctionExpression>),
        ArrowFunction(Box<ArrowFunctionExpression>),
        Class(Box<ClassExpression>),
        TaggedTemplate(Box<TaggedTemplateExpression>),
        TemplateLiteral(Box<TemplateLiteral>),
        Member(Box<MemberExpression>),
        Call(Box<CallExpression>),
        New(Box<NewExpression>),
        Chain(Box<ChainExpression>),
        Import(Box<ImportExpression>),
        MetaProperty(Box<MetaProperty>),
        Update(Box<UpdateExpression>),
        Unary(Box<UnaryExpression>),
        Binary(Box<BinaryExpression>),
        Logical(Box<LogicalExpression>),
        Conditional(Box<ConditionalExpression>),
        Yield(Box<YieldExpression>),
        Await(Box<AwaitExpression>),
        Assignment(Box<AssignmentExpression>),
        Sequence(Box<SequenceExpression>),
        JSXElement(Box<JSXElement>),
        JSXFragment(Box<JSXFragment>),
        /// Parenthesized parameter list awaiting `=>`; never left in a finished tree
        #[doc(hidden)]
        ArrowParameterPlaceholder(Box<ArrowParameterPlaceholder>),
    }
}

node_enum! {
    /// Binding and assignment targets.
    pub enum Pattern {
        Identifier(Box<Identifier>),
        Object(Box<ObjectPattern>),
        Array(Box<ArrayPattern>),
        Rest(Box<RestElement>),
        Assignment(Box<AssignmentPattern>),
        Member(Box<MemberExpression>),
    }
}

node_enum! {
    /// An argument or array element: an expression or a spread.
    pub enum ArgumentListElement {
        Expression(Expression),
        Spread(Box<SpreadElement>),
    }
}

node_enum! {
    /// Entry of an object literal.
    pub enum ObjectExpressionProperty {
        Property(Box<Property>),
        Spread(Box<SpreadElement>),
    }
}

node_enum! {
    /// Entry of an object pattern.
    pub enum ObjectPatternProperty {
        Property(Box<AssignmentProperty>),
        Rest(Box<RestElement>),
    }
}

node_enum! {
    /// Body of an arrow function.
    pub enum ArrowBody {
        Block(Box<BlockStatement>),
        Expression(Expression),
    }
}

node_enum! {
    /// Initializer clause of a `for` statement.
    pub enum ForInit {
        VariableDeclaration(Box<VariableDeclaration>),
        Expression(Expression),
    }
}

node_enum! {
    /// Left side of `for-in` / `for-of`.
    pub enum ForInLeft {
        VariableDeclaration(Box<VariableDeclaration>),
        Pattern(Pattern),
    }
}

node_enum! {
    /// Specifier of an import declaration.
    pub enum ImportDeclarationSpecifier {
        Named(Box<ImportSpecifier>),
        Default(Box<ImportDefaultSpecifier>),
        Namespace(Box<ImportNamespaceSpecifier>),
    }
}

node_enum! {
    /// What `export default` exports.
    pub enum ExportDefaultValue {
        Function(Box<FunctionDeclaration>),
        Class(Box<ClassDeclaration>),
        Expression(Expression),
    }
}

// ---------------------------------------------------------------------------
// Operators and kinds
// ---------------------------------------------------------------------------

operator_enum! {
    /// Binary operators.
    pub enum BinaryOperator {
        Equal => "==",
        NotEqual => "!=",
        StrictEqual => "===",
        StrictNotEqual => "!==",
        LessThan => "<",
        LessThanEqual => "<=",
        GreaterThan => ">",
        GreaterThanEqual => ">=",
        LeftShift => "<<",
        RightShift => ">>",
        UnsignedRightShift => ">>>",
        Add => "+",
        Subtract => "-",
        Multiply => "*",
        Divide => "/",
        Modulo => "%",
        Exponent => "**",
        BitwiseOr => "|",
        BitwiseXor => "^",
        BitwiseAnd => "&",
        In => "in",
        Instanceof => "instanceof",
    }
}

operator_enum! {
    /// Short-circuit operators.
    pub enum LogicalOperator {
        Or => "||",
        And => "&&",
        NullishCoalescing => "??",
    }
}

operator_enum! {
    /// Prefix operators producing a UnaryExpression.
    pub enum UnaryOperator {
        Minus => "-",
        Plus => "+",
        Not => "!",
        BitwiseNot => "~",
        Typeof => "typeof",
        Void => "void",
        Delete => "delete",
    }
}

operator_enum! {
    /// `++` / `--`.
    pub enum UpdateOperator {
        Increment => "++",
        Decrement => "--",
    }
}

operator_enum! {
    /// Assignment operators.
    pub enum AssignmentOperator {
        Assign => "=",
        AddAssign => "+=",
        SubtractAssign => "-=",
        MultiplyAssign => "*=",
        DivideAssign => "/=",
        ModuloAssign => "%=",
        ExponentAssign => "**=",
        LeftShiftAssign => "<<=",
        RightShiftAssign => ">>=",
        UnsignedRightShiftAssign => ">>>=",
        BitwiseOrAssign => "|=",
        BitwiseXorAssign => "^=",
        BitwiseAndAssign => "&=",
    }
}

operator_enum! {
    /// `var`, `let` or `const`.
    pub enum VariableKind {
        Var => "var",
        Let => "let",
        Const => "const",
    }
}

operator_enum! {
    /// Kind of an object literal property.
    pub enum PropertyKind {
        Init => "init",
        Get => "get",
        Set => "set",
    }
}

operator_enum! {
    /// Kind of a class method.
    pub enum MethodKind {
        Constructor => "constructor",
        Method => "method",
        Get => "get",
        Set => "set",
    }
}

// ---------------------------------------------------------------------------
// Literals and identifiers
// ---------------------------------------------------------------------------

node! {
    /// An identifier reference or binding.
    pub struct Identifier {
        /// Decoded name
        pub name: String,
    }
}

/// Compiled form of a regular expression literal.
#[derive(Debug, Clone)]
pub struct RegexValue(pub regex::Regex);

impl PartialEq for RegexValue {
    fn eq(&self, other: &Self) -> bool {
        self.0.as_str() == other.0.as_str()
    }
}

/// Value of a [`Literal`].
#[derive(Debug, Clone, PartialEq)]
pub enum LiteralValue {
    /// `null`
    Null,
    /// `true` / `false`
    Boolean(bool),
    /// Numeric literal
    Number(f64),
    /// String literal (cooked)
    String(String),
    /// Regular expression; `None` when the host engine cannot represent it
    RegExp(Option<RegexValue>),
    /// BigInt literal
    BigInt(BigInt),
}

impl Serialize for LiteralValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        // 2^63 and 2^64
        const I64_END: f64 = 9_223_372_036_854_775_808.0;
        const U64_END: f64 = 18_446_744_073_709_551_616.0;
        match self {
            LiteralValue::Null | LiteralValue::BigInt(_) | LiteralValue::RegExp(None) => {
                serializer.serialize_unit()
            }
            LiteralValue::Boolean(value) => serializer.serialize_bool(*value),
            LiteralValue::Number(value) => {
                if value.fract() != 0.0 || !value.is_finite() {
                    serializer.serialize_f64(*value)
                } else if value.abs() < I64_END {
                    serializer.serialize_i64(*value as i64)
                } else if *value > 0.0 && *value < U64_END {
                    serializer.serialize_u64(*value as u64)
                } else {
                    serializer.serialize_f64(*value)
                }
            }
            LiteralValue::String(value) => serializer.serialize_str(value),
            LiteralValue::RegExp(Some(_)) => serializer.serialize_map(Some(0))?.end(),
        }
    }
}

node! {
    /// A literal value.
    pub struct Literal {
        /// Evaluated value
        pub value: LiteralValue,
        /// Source text, when `raw` is on
        #[serde(skip_serializing_if = "Option::is_none")]
        pub raw: Option<String>,
        /// Pattern and flags of a regular expression literal
        #[serde(skip_serializing_if = "Option::is_none")]
        pub regex: Option<RegexParts>,
        /// Decimal digits of a BigInt literal
        #[serde(skip_serializing_if = "Option::is_none")]
        pub bigint: Option<String>,
    }
}

node! {
    /// `this`
    pub struct ThisExpression {}
}

node! {
    /// `super` as a callee or member object.
    pub struct Super {}
}

// ---------------------------------------------------------------------------
// Expressions
// ---------------------------------------------------------------------------

node! {
    /// `[a, , ...b]`
    pub struct ArrayExpression {
        /// Elements; `None` for holes
        pub elements: Vec<Option<ArgumentListElement>>,
    }
}

node! {
    /// `{ a: 1, ...b }`
    pub struct ObjectExpression {
        /// Properties in source order
        pub properties: Vec<ObjectExpressionProperty>,
    }
}

node! {
    /// Property of an object literal.
    pub struct Property {
        /// Key; any expression when `computed`
        pub key: Expression,
        /// Key written in brackets
        pub computed: bool,
        /// Value, or the method/accessor function
        pub value: Expression,
        /// `init`, `get` or `set`
        pub kind: PropertyKind,
        /// Method shorthand `a() {}`
        pub method: bool,
        /// Shorthand `{ a }`
        pub shorthand: bool,
    }
}

node! {
    /// `...argument` in calls, arrays and object literals.
    pub struct SpreadElement {
        /// Spread operand
        pub argument: Expression,
    }
}

node! {
    /// `function` expression.
    pub struct FunctionExpression {
        /// Optional name
        pub id: Option<Identifier>,
        /// Formal parameters
        pub params: Vec<Pattern>,
        /// Function body
        pub body: BlockStatement,
        /// `function*`
        pub generator: bool,
        /// Always false for non-arrow functions
        pub expression: bool,
        /// `async function`
        #[serde(rename = "async")]
        pub is_async: bool,
    }
}

node! {
    /// `(a, b) => body`
    pub struct ArrowFunctionExpression {
        /// Always `None`
        pub id: Option<Identifier>,
        /// Formal parameters
        pub params: Vec<Pattern>,
        /// Block or concise body
        pub body: ArrowBody,
        /// Always false
        pub generator: bool,
        /// Body is an expression rather than a block
        pub expression: bool,
        /// `async` arrow
        #[serde(rename = "async")]
        pub is_async: bool,
    }
}

node! {
    /// `class` expression.
    pub struct ClassExpression {
        /// Optional name
        pub id: Option<Identifier>,
        /// `extends` clause
        pub super_class: Option<Expression>,
        /// Members
        pub body: ClassBody,
    }
}

node! {
    /// Member list of a class.
    pub struct ClassBody {
        /// Methods in source order
        pub body: Vec<MethodDefinition>,
    }
}

node! {
    /// Class method, accessor or constructor.
    pub struct MethodDefinition {
        /// Method name; any expression when `computed`
        pub key: Expression,
        /// Key written in brackets
        pub computed: bool,
        /// The method's function
        pub value: FunctionExpression,
        /// `constructor`, `method`, `get` or `set`
        pub kind: MethodKind,
        /// `static` member
        #[serde(rename = "static")]
        pub is_static: bool,
    }
}

node! {
    /// ``tag`text` ``
    pub struct TaggedTemplateExpression {
        /// Tag function
        pub tag: Expression,
        /// Template
        pub quasi: TemplateLiteral,
    }
}

node! {
    /// `` `a${b}c` ``
    pub struct TemplateLiteral {
        /// Text pieces; always one more than `expressions`
        pub quasis: Vec<TemplateElement>,
        /// Substitutions
        pub expressions: Vec<Expression>,
    }
}

/// Cooked and raw text of a template piece.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TemplateElementValue {
    /// Text with escapes applied
    pub cooked: Option<String>,
    /// Text as written
    pub raw: String,
}

node! {
    /// A text piece of a template literal.
    pub struct TemplateElement {
        /// Cooked and raw text
        pub value: TemplateElementValue,
        /// Last piece
        pub tail: bool,
    }
}

node! {
    /// `a.b`, `a[b]`, `a?.b`
    pub struct MemberExpression {
        /// Property written in brackets
        pub computed: bool,
        /// Object (may be `super`)
        pub object: Expression,
        /// Property name or computed expression
        pub property: Expression,
        /// Reached through `?.`
        pub optional: bool,
    }
}

node! {
    /// `f(a)`, `f?.(a)`, `super(a)`
    pub struct CallExpression {
        /// Callee (may be `super`)
        pub callee: Expression,
        /// Arguments
        pub arguments: Vec<ArgumentListElement>,
        /// Called through `?.`
        pub optional: bool,
    }
}

node! {
    /// `new C(a)`
    pub struct NewExpression {
        /// Constructor
        pub callee: Expression,
        /// Arguments
        pub arguments: Vec<ArgumentListElement>,
    }
}

node! {
    /// Wrapper around an optional chain `a?.b.c`.
    pub struct ChainExpression {
        /// The outermost member or call of the chain
        pub expression: Expression,
    }
}

node! {
    /// Dynamic `import(source)`.
    pub struct ImportExpression {
        /// Module specifier expression
        pub source: Expression,
    }
}

node! {
    /// `new.target` or `import.meta`
    pub struct MetaProperty {
        /// `new` or `import`
        #[serde(rename = "meta")]
        pub meta_name: Identifier,
        /// `target` or `meta`
        pub property: Identifier,
    }
}

node! {
    /// `++a`, `a--`
    pub struct UpdateExpression {
        /// `++` or `--`
        pub operator: UpdateOperator,
        /// Target
        pub argument: Expression,
        /// Operator precedes the operand
        pub prefix: bool,
    }
}

node! {
    /// `!a`, `typeof a`, ...
    pub struct UnaryExpression {
        /// Operator
        pub operator: UnaryOperator,
        /// Operand
        pub argument: Expression,
        /// Always true
        pub prefix: bool,
    }
}

node! {
    /// `a + b`
    pub struct BinaryExpression {
        /// Operator
        pub operator: BinaryOperator,
        /// Left operand
        pub left: Expression,
        /// Right operand
        pub right: Expression,
    }
}

node! {
    /// `a && b`, `a || b`, `a ?? b`
    pub struct LogicalExpression {
        /// Operator
        pub operator: LogicalOperator,
        /// Left operand
        pub left: Expression,
        /// Right operand
        pub right: Expression,
    }
}

node! {
    /// `test ? consequent : alternate`
    pub struct ConditionalExpression {
        /// Condition
        pub test: Expression,
        /// Value when true
        pub consequent: Expression,
        /// Value when false
        pub alternate: Expression,
    }
}

node! {
    /// `yield a`, `yield* a`
    pub struct YieldExpression {
        /// Yielded value
        pub argument: Option<Expression>,
        /// `yield*`
        pub delegate: bool,
    }
}

node! {
    /// `await a`
    pub struct AwaitExpression {
        /// Awaited value
        pub argument: Expression,
    }
}

node! {
    /// `a = b`, `a += b`, `[a] = b`
    pub struct AssignmentExpression {
        /// Operator
        pub operator: AssignmentOperator,
        /// Target
        pub left: Pattern,
        /// Value
        pub right: Expression,
    }
}

node! {
    /// `a, b`
    pub struct SequenceExpression {
        /// Expressions in order
        pub expressions: Vec<Expression>,
    }
}

node! {
    /// Parenthesized parameter list seen before `=>`.
    pub struct ArrowParameterPlaceholder {
        /// Parameters as parsed
        pub params: Vec<Pattern>,
        /// Preceded by `async`
        #[serde(rename = "async")]
        pub is_async: bool,
    }
}

// ---------------------------------------------------------------------------
// Patterns
// ---------------------------------------------------------------------------

node! {
    /// `{ a, b: c, ...d }` as a target.
    pub struct ObjectPattern {
        /// Properties in source order
        pub properties: Vec<ObjectPatternProperty>,
    }
}

node! {
    /// Property of an object pattern.
    pub struct AssignmentProperty as "Property" {
        /// Key; any expression when `computed`
        pub key: Expression,
        /// Key written in brackets
        pub computed: bool,
        /// Target
        pub value: Pattern,
        /// Always `init`
        pub kind: PropertyKind,
        /// Always false
        pub method: bool,
        /// Shorthand `{ a }`
        pub shorthand: bool,
    }
}

node! {
    /// `[a, , b]` as a target.
    pub struct ArrayPattern {
        /// Elements; `None` for holes
        pub elements: Vec<Option<Pattern>>,
    }
}

node! {
    /// `...a` as a target.
    pub struct RestElement {
        /// Target
        pub argument: Pattern,
    }
}

node! {
    /// `a = 1` as a target with a default.
    pub struct AssignmentPattern {
        /// Target
        pub left: Pattern,
        /// Default value
        pub right: Expression,
    }
}

// ---------------------------------------------------------------------------
// Statements
// ---------------------------------------------------------------------------

node! {
    /// `{ ... }`
    pub struct BlockStatement {
        /// Statements in order
        pub body: Vec<Statement>,
    }
}

node! {
    /// `break label;`
    pub struct BreakStatement {
        /// Optional target label
        pub label: Option<Identifier>,
    }
}

node! {
    /// `continue label;`
    pub struct ContinueStatement {
        /// Optional target label
        pub label: Option<Identifier>,
    }
}

node! {
    /// `debugger;`
    pub struct DebuggerStatement {}
}

node! {
    /// `do body while (test);`
    pub struct DoWhileStatement {
        /// Loop body
        pub body: Statement,
        /// Condition
        pub test: Expression,
    }
}

node! {
    /// `;`
    pub struct EmptyStatement {}
}

node! {
    /// An expression used as a statement.
    pub struct ExpressionStatement {
        /// The expression
        pub expression: Expression,
        /// Raw text of a directive prologue entry
        #[serde(skip_serializing_if = "Option::is_none")]
        pub directive: Option<String>,
    }
}

node! {
    /// `for (init; test; update) body`
    pub struct ForStatement {
        /// Initializer
        pub init: Option<ForInit>,
        /// Condition
        pub test: Option<Expression>,
        /// Update expression
        pub update: Option<Expression>,
        /// Loop body
        pub body: Statement,
    }
}

node! {
    /// `for (left in right) body`
    pub struct ForInStatement {
        /// Loop variable or target
        pub left: ForInLeft,
        /// Object
        pub right: Expression,
        /// Loop body
        pub body: Statement,
    }
}

node! {
    /// `for (left of right) body`
    pub struct ForOfStatement {
        /// Loop variable or target
        pub left: ForInLeft,
        /// Iterable
        pub right: Expression,
        /// Loop body
        pub body: Statement,
        /// `for await`
        #[serde(rename = "await")]
        pub is_await: bool,
    }
}

node! {
    /// `if (test) consequent else alternate`
    pub struct IfStatement {
        /// Condition
        pub test: Expression,
        /// Taken branch
        pub consequent: Statement,
        /// `else` branch
        pub alternate: Option<Statement>,
    }
}

node! {
    /// `label: body`
    pub struct LabeledStatement {
        /// Label
        pub label: Identifier,
        /// Labeled statement
        pub body: Statement,
    }
}

node! {
    /// `return argument;`
    pub struct ReturnStatement {
        /// Returned value
        pub argument: Option<Expression>,
    }
}

node! {
    /// `switch (discriminant) { cases }`
    pub struct SwitchStatement {
        /// Switched value
        pub discriminant: Expression,
        /// Clauses in order
        pub cases: Vec<SwitchCase>,
    }
}

node! {
    /// `case test:` or `default:` with its statements.
    pub struct SwitchCase {
        /// `None` for `default`
        pub test: Option<Expression>,
        /// Statements of the clause
        pub consequent: Vec<Statement>,
    }
}

node! {
    /// `throw argument;`
    pub struct ThrowStatement {
        /// Thrown value
        pub argument: Expression,
    }
}

node! {
    /// `try block catch finalizer`
    pub struct TryStatement {
        /// Protected block
        pub block: BlockStatement,
        /// `catch` clause
        pub handler: Option<CatchClause>,
        /// `finally` block
        pub finalizer: Option<BlockStatement>,
    }
}

node! {
    /// `catch (param) body`
    pub struct CatchClause {
        /// Binding; `None` for `catch {}`
        pub param: Option<Pattern>,
        /// Handler body
        pub body: BlockStatement,
    }
}

node! {
    /// `while (test) body`
    pub struct WhileStatement {
        /// Condition
        pub test: Expression,
        /// Loop body
        pub body: Statement,
    }
}

node! {
    /// `with (object) body`
    pub struct WithStatement {
        /// Scope object
        pub object: Expression,
        /// Body
        pub body: Statement,
    }
}

// ---------------------------------------------------------------------------
// Declarations
// ---------------------------------------------------------------------------

node! {
    /// `var`/`let`/`const` declaration.
    pub struct VariableDeclaration {
        /// Declarators in order
        pub declarations: Vec<VariableDeclarator>,
        /// Keyword used
        pub kind: VariableKind,
    }
}

node! {
    /// `id = init` inside a variable declaration.
    pub struct VariableDeclarator {
        /// Binding
        pub id: Pattern,
        /// Initializer
        pub init: Option<Expression>,
    }
}

node! {
    /// `function` declaration.
    pub struct FunctionDeclaration {
        /// Name; `None` only under `export default`
        pub id: Option<Identifier>,
        /// Formal parameters
        pub params: Vec<Pattern>,
        /// Function body
        pub body: BlockStatement,
        /// `function*`
        pub generator: bool,
        /// Always false
        pub expression: bool,
        /// `async function`
        #[serde(rename = "async")]
        pub is_async: bool,
    }
}

node! {
    /// `class` declaration.
    pub struct ClassDeclaration {
        /// Name; `None` only under `export default`
        pub id: Option<Identifier>,
        /// `extends` clause
        pub super_class: Option<Expression>,
        /// Members
        pub body: ClassBody,
    }
}

// ---------------------------------------------------------------------------
// Modules
// ---------------------------------------------------------------------------

node! {
    /// `import ... from 'source'`
    pub struct ImportDeclaration {
        /// Imported bindings
        pub specifiers: Vec<ImportDeclarationSpecifier>,
        /// Module specifier
        pub source: Literal,
    }
}

node! {
    /// `{ imported as local }`
    pub struct ImportSpecifier {
        /// Local binding
        pub local: Identifier,
        /// Exported name in the source module
        pub imported: Identifier,
    }
}

node! {
    /// `import local from ...`
    pub struct ImportDefaultSpecifier {
        /// Local binding
        pub local: Identifier,
    }
}

node! {
    /// `import * as local from ...`
    pub struct ImportNamespaceSpecifier {
        /// Local binding
        pub local: Identifier,
    }
}

node! {
    /// `export { a as b }`, `export var a`, `export { a } from 'm'`
    pub struct ExportNamedDeclaration {
        /// Exported declaration
        pub declaration: Option<Declaration>,
        /// Exported names
        pub specifiers: Vec<ExportSpecifier>,
        /// Re-export source
        pub source: Option<Literal>,
    }
}

node! {
    /// `local as exported`
    pub struct ExportSpecifier {
        /// Local name
        pub local: Identifier,
        /// Exported name
        pub exported: Identifier,
    }
}

node! {
    /// `export default ...`
    pub struct ExportDefaultDeclaration {
        /// Exported declaration or expression
        pub declaration: ExportDefaultValue,
    }
}

node! {
    /// `export * from 'm'`, `export * as ns from 'm'`
    pub struct ExportAllDeclaration {
        /// Module specifier
        pub source: Literal,
        /// Namespace name
        pub exported: Option<Identifier>,
    }
}

// ---------------------------------------------------------------------------
// JSX
// ---------------------------------------------------------------------------

node! {
    /// `<a b="c">children</a>`
    pub struct JSXElement {
        /// Opening tag
        pub opening_element: JSXOpeningElement,
        /// Children
        pub children: Vec<JSXChild>,
        /// Closing tag; `None` when self-closing
        pub closing_element: Option<JSXClosingElement>,
    }
}

node! {
    /// `<a b="c">` or `<a/>`
    pub struct JSXOpeningElement {
        /// Tag name
        pub name: JSXElementName,
        /// `/>`
        pub self_closing: bool,
        /// Attributes in order
        pub attributes: Vec<JSXAttributeItem>,
    }
}

node! {
    /// `</a>`
    pub struct JSXClosingElement {
        /// Tag name
        pub name: JSXElementName,
    }
}

node! {
    /// `<>children</>`
    pub struct JSXFragment {
        /// `<>`
        pub opening_fragment: JSXOpeningFragment,
        /// Children
        pub children: Vec<JSXChild>,
        /// `</>`
        pub closing_fragment: JSXClosingFragment,
    }
}

node! {
    /// `<>`
    pub struct JSXOpeningFragment {}
}

node! {
    /// `</>`
    pub struct JSXClosingFragment {}
}

node! {
    /// A name inside a tag.
    pub struct JSXIdentifier {
        /// Name, may contain `-`
        pub name: String,
    }
}

node! {
    /// `ns:name`
    pub struct JSXNamespacedName {
        /// Namespace
        pub namespace: JSXIdentifier,
        /// Local name
        pub name: JSXIdentifier,
    }
}

node! {
    /// `a.b.c` as a tag name.
    pub struct JSXMemberExpression {
        /// Object part
        pub object: JSXMemberObject,
        /// Last name
        pub property: JSXIdentifier,
    }
}

node! {
    /// `name="value"`
    pub struct JSXAttribute {
        /// Attribute name
        pub name: JSXAttributeName,
        /// Value; `None` for bare attributes
        pub value: Option<JSXAttributeValue>,
    }
}

node! {
    /// `{...argument}` in a tag.
    pub struct JSXSpreadAttribute {
        /// Spread operand
        pub argument: Expression,
    }
}

node! {
    /// `{expression}`
    pub struct JSXExpressionContainer {
        /// Contained expression or empty marker
        pub expression: JSXExpressionKind,
    }
}

node! {
    /// Nothing between `{` and `}`.
    pub struct JSXEmptyExpression {}
}

node! {
    /// Text between tags.
    pub struct JSXText {
        /// Text with character references decoded
        pub value: String,
        /// Text as written
        pub raw: String,
    }
}

node_enum! {
    /// Tag name.
    pub enum JSXElementName {
        Identifier(Box<JSXIdentifier>),
        Namespaced(Box<JSXNamespacedName>),
        Member(Box<JSXMemberExpression>),
    }
}

node_enum! {
    /// Object of a JSX member name.
    pub enum JSXMemberObject {
        Identifier(Box<JSXIdentifier>),
        Member(Box<JSXMemberExpression>),
    }
}

node_enum! {
    /// Attribute name.
    pub enum JSXAttributeName {
        Identifier(Box<JSXIdentifier>),
        Namespaced(Box<JSXNamespacedName>),
    }
}

node_enum! {
    /// Attribute or spread attribute.
    pub enum JSXAttributeItem {
        Attribute(Box<JSXAttribute>),
        Spread(Box<JSXSpreadAttribute>),
    }
}

node_enum! {
    /// Attribute value.
    pub enum JSXAttributeValue {
        Literal(Box<Literal>),
        ExpressionContainer(Box<JSXExpressionContainer>),
        Element(Box<JSXElement>),
        Fragment(Box<JSXFragment>),
    }
}

node_enum! {
    /// Contents of an expression container.
    pub enum JSXExpressionKind {
        Expression(Expression),
        Empty(Box<JSXEmptyExpression>),
    }
}

node_enum! {
    /// Child of an element or fragment.
    pub enum JSXChild {
        Text(Box<JSXText>),
        ExpressionContainer(Box<JSXExpressionContainer>),
        Element(Box<JSXElement>),
        Fragment(Box<JSXFragment>),
    }
}

impl Expression {
    /// Name of an identifier expression.
    pub fn as_identifier_name(&self) -> Option<&str> {
        match self {
            Expression::Identifier(id) => Some(&id.name),
            _ => None,
        }
    }
}

impl Pattern {
    /// Names bound by this pattern, in source order.
    pub fn bound_names<'p>(&'p self, names: &mut Vec<&'p str>) {
        match self {
            Pattern::Identifier(id) => names.push(&id.name),
            Pattern::Object(object) => {
                for property in &object.properties {
                    match property {
                        ObjectPatternProperty::Property(p) => p.value.bound_names(names),
                        ObjectPatternProperty::Rest(rest) => rest.argument.bound_names(names),
                    }
                }
            }
            Pattern::Array(array) => {
                for element in array.elements.iter().flatten() {
                    element.bound_names(names);
                }
            }
            Pattern::Rest(rest) => rest.argument.bound_names(names),
            Pattern::Assignment(assign) => assign.left.bound_names(names),
            Pattern::Member(_) => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn ident(name: &str) -> Identifier {
        Identifier {
            name: name.to_string(),
            meta: NodeMeta::default(),
        }
    }

    #[test]
    fn test_node_serializes_type_tag() {
        let json = serde_json::to_value(ident("x")).unwrap();
        assert_eq!(json, json!({"type": "Identifier", "name": "x"}));
    }

    #[test]
    fn test_category_is_transparent() {
        let expr = Expression::Identifier(Box::new(ident("y")));
        assert_eq!(expr.type_name(), "Identifier");
        let json = serde_json::to_value(&expr).unwrap();
        assert_eq!(json["type"], "Identifier");
    }

    #[test]
    fn test_renamed_node_tag() {
        let property = AssignmentProperty {
            key: Expression::Identifier(Box::new(ident("a"))),
            computed: false,
            value: Pattern::Identifier(Box::new(ident("a"))),
            kind: PropertyKind::Init,
            method: false,
            shorthand: true,
            meta: NodeMeta::default(),
        };
        assert_eq!(property.type_name(), "Property");
        let json = serde_json::to_value(&property).unwrap();
        assert_eq!(json["type"], "Property");
        assert_eq!(json["kind"], "init");
    }

    #[test]
    fn test_range_and_loc_only_when_set() {
        let mut id = ident("z");
        id.meta.range = Some(Range::new(0, 1));
        let json = serde_json::to_value(&id).unwrap();
        assert_eq!(json["range"], json!([0, 1]));
        assert!(json.get("loc").is_none());
        assert!(json.get("leadingComments").is_none());
    }

    #[test]
    fn test_literal_value_serialization() {
        let number = |n: f64| serde_json::to_value(LiteralValue::Number(n)).unwrap();
        assert_eq!(number(42.0), json!(42));
        assert_eq!(number(1.5), json!(1.5));
        assert_eq!(number(-0.0), json!(0));
        assert_eq!(number(2f64.powi(53) + 2.0), json!(9_007_199_254_740_994i64));
        assert_eq!(number(1e18), json!(1_000_000_000_000_000_000i64));
        assert_eq!(number(1e19), json!(10_000_000_000_000_000_000u64));
        assert!(number(1e300).is_f64());
        assert_eq!(serde_json::to_value(LiteralValue::RegExp(None)).unwrap(), json!(null));
        let regex = regex::Regex::new("a").unwrap();
        assert_eq!(
            serde_json::to_value(LiteralValue::RegExp(Some(RegexValue(regex)))).unwrap(),
            json!({})
        );
        assert_eq!(
            serde_json::to_value(LiteralValue::BigInt(BigInt::from(5))).unwrap(),
            json!(null)
        );
    }

    #[test]
    fn test_operator_round_trip() {
        assert_eq!(BinaryOperator::from_token("instanceof"), Some(BinaryOperator::Instanceof));
        assert_eq!(AssignmentOperator::from_token(">>>="), Some(AssignmentOperator::UnsignedRightShiftAssign));
        assert_eq!(LogicalOperator::NullishCoalescing.as_str(), "??");
        assert_eq!(UnaryOperator::from_token("++"), None);
    }

    #[test]
    fn test_bound_names() {
        let pattern = Pattern::Array(Box::new(ArrayPattern {
            elements: vec![
                Some(Pattern::Identifier(Box::new(ident("a")))),
                None,
                Some(Pattern::Rest(Box::new(RestElement {
                    argument: Pattern::Identifier(Box::new(ident("b"))),
                    meta: NodeMeta::default(),
                }))),
            ],
            meta: NodeMeta::default(),
        }));
        let mut names = Vec::new();
        pattern.bound_names(&mut names);
        assert_eq!(names, vec!["a", "b"]);
    }
}
