//! Recursive-descent parser for preprocessed effect tokens

use std::collections::HashSet;

use crate::ast::{
    Annotation, BaseType, BinaryOp, Expr, Item, Literal, Qualifiers, ResourceDecl, TechniqueDecl,
    TranslationUnit, TypeSpec, UnaryOp, VariableDecl,
};
use crate::diagnostic::{Diagnostic, Location};
use crate::lexer::{Token, TokenKind};

/// Parse a preprocessed token stream, returning the tree and any warnings
pub fn parse(tokens: Vec<Token>) -> Result<(TranslationUnit, Vec<Diagnostic>), Diagnostic> {
    let mut parser = Parser::new(tokens);
    let unit = parser.translation_unit()?;
    Ok((unit, parser.warnings))
}

/// Storage and interpolation keywords accepted before a declaration
const QUALIFIERS: &[&str] = &[
    "uniform", "static", "const", "extern", "volatile", "precise", "groupshared", "shared", "inline",
    "nointerpolation", "noperspective", "linear", "centroid", "sample", "in", "out", "inout",
    "row_major", "column_major", "snorm", "unorm",
];

/// Numeric type name prefixes; longer names first where one prefixes another
const NUMERIC_TYPES: &[(&str, BaseType)] = &[
    ("min16float", BaseType::Float),
    ("min10float", BaseType::Float),
    ("min16uint", BaseType::Uint),
    ("min16int", BaseType::Int),
    ("min12int", BaseType::Int),
    ("double", BaseType::Float),
    ("float", BaseType::Float),
    ("half", BaseType::Float),
    ("dword", BaseType::Uint),
    ("uint", BaseType::Uint),
    ("bool", BaseType::Bool),
    ("int", BaseType::Int),
];

pub struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    struct_names: HashSet<String>,
    warnings: Vec<Diagnostic>,
}

impl Parser {
    pub fn new(tokens: Vec<Token>) -> Self {
        Self {
            tokens,
            pos: 0,
            struct_names: HashSet::new(),
            warnings: Vec::new(),
        }
    }

    pub fn translation_unit(&mut self) -> Result<TranslationUnit, Diagnostic> {
        Ok(TranslationUnit {
            items: self.items(false)?,
        })
    }

    pub fn warnings(&self) -> &[Diagnostic] {
        &self.warnings
    }

    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn peek_punct(&self) -> Option<&'static str> {
        match self.peek()?.kind {
            TokenKind::Punct(p) => Some(p),
            _ => None,
        }
    }

    fn at_punct(&self, p: &str) -> bool {
        self.peek().is_some_and(|t| t.is_punct(p))
    }

    fn at_ident(&self, name: &str) -> bool {
        self.peek().is_some_and(|t| t.is_ident(name))
    }

    fn accept_punct(&mut self, p: &str) -> bool {
        if self.at_punct(p) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn expect_punct(&mut self, p: &str) -> Result<(), Diagnostic> {
        if self.accept_punct(p) {
            Ok(())
        } else {
            Err(self.unexpected(&format!("'{p}'")))
        }
    }

    fn expect_ident(&mut self) -> Result<(String, Location), Diagnostic> {
        match self.peek() {
            Some(Token {
                kind: TokenKind::Ident(name),
                location,
                ..
            }) => {
                let result = (name.clone(), location.clone());
                self.pos += 1;
                Ok(result)
            }
            _ => Err(self.unexpected("identifier")),
        }
    }

    fn location(&self) -> Location {
        self.peek()
            .or(self.tokens.last())
            .map(|t| t.location.clone())
            .unwrap_or_else(|| Location::new("<input>", 0))
    }

    fn unexpected(&self, expected: &str) -> Diagnostic {
        match self.peek() {
            Some(token) => Diagnostic::error(
                token.location.clone(),
                format!("syntax error: unexpected '{token}', expected {expected}"),
            ),
            None => Diagnostic::error(
                self.location(),
                format!("syntax error: unexpected end of file, expected {expected}"),
            ),
        }
    }

    /// Skip a bracketed group starting at the current `open` token
    fn skip_balanced(&mut self, open: &str, close: &str) -> Result<(), Diagnostic> {
        let start = self.location();
        self.expect_punct(open)?;
        let mut depth = 1usize;
        while depth > 0 {
            let Some(token) = self.tokens.get(self.pos) else {
                return Err(Diagnostic::error(start, format!("syntax error: unmatched '{open}'")));
            };
            if token.is_punct(open) {
                depth += 1;
            } else if token.is_punct(close) {
                depth -= 1;
            }
            self.pos += 1;
        }
        Ok(())
    }

    fn items(&mut self, nested: bool) -> Result<Vec<Item>, Diagnostic> {
        let mut items = Vec::new();
        loop {
            match self.peek() {
                None if nested => return Err(self.unexpected("'}'")),
                None => break,
                Some(token) if nested && token.is_punct("}") => break,
                _ => {}
            }

            if self.accept_punct(";") {
                continue;
            }
            if self.at_punct("[") {
                // Attributes such as [numthreads(8, 8, 1)]
                self.skip_balanced("[", "]")?;
                continue;
            }
            if self.at_ident("namespace") {
                items.push(self.namespace()?);
            } else if self.at_ident("struct") {
                items.push(self.struct_decl()?);
            } else if self.at_ident("technique") {
                items.push(Item::Technique(self.technique()?));
            } else {
                items.extend(self.declaration()?);
            }
        }
        Ok(items)
    }

    fn namespace(&mut self) -> Result<Item, Diagnostic> {
        self.pos += 1;
        let (name, location) = self.expect_ident()?;
        self.expect_punct("{")?;
        let items = self.items(true)?;
        self.expect_punct("}")?;
        Ok(Item::Namespace { name, items, location })
    }

    fn struct_decl(&mut self) -> Result<Item, Diagnostic> {
        self.pos += 1;
        let (name, location) = self.expect_ident()?;
        self.struct_names.insert(name.clone());
        if self.at_punct("{") {
            self.skip_balanced("{", "}")?;
        }
        // Declarators after the body are not tracked
        while !self.accept_punct(";") {
            if self.peek().is_none() {
                return Err(self.unexpected("';'"));
            }
            self.pos += 1;
        }
        Ok(Item::Struct { name, location })
    }

    fn technique(&mut self) -> Result<TechniqueDecl, Diagnostic> {
        self.pos += 1;
        let (name, location) = self.expect_ident()?;
        let annotations = if self.at_punct("<") {
            self.annotations()?
        } else {
            Vec::new()
        };

        let start = self.location();
        self.expect_punct("{")?;
        let mut depth = 1usize;
        let mut passes = 0;
        while depth > 0 {
            let Some(token) = self.tokens.get(self.pos) else {
                return Err(Diagnostic::error(start, "syntax error: unmatched '{'"));
            };
            if token.is_punct("{") {
                depth += 1;
            } else if token.is_punct("}") {
                depth -= 1;
            } else if depth == 1 && token.is_ident("pass") {
                passes += 1;
            }
            self.pos += 1;
        }

        Ok(TechniqueDecl {
            name,
            annotations,
            passes,
            location,
        })
    }

    fn qualifiers(&mut self) -> Qualifiers {
        let mut qualifiers = Qualifiers::default();
        while let Some(word) = self.peek().and_then(Token::ident) {
            if !QUALIFIERS.contains(&word) {
                break;
            }
            match word {
                "uniform" => qualifiers.uniform = true,
                "static" => qualifiers.is_static = true,
                "const" => qualifiers.is_const = true,
                _ => {}
            }
            self.pos += 1;
        }
        qualifiers
    }

    fn declaration(&mut self) -> Result<Vec<Item>, Diagnostic> {
        let qualifiers = self.qualifiers();
        let Some(ty) = self.parse_type()? else {
            return Err(self.unexpected("type"));
        };
        let (mut name, mut location) = self.expect_ident()?;

        if self.at_punct("(") {
            self.skip_balanced("(", ")")?;
            if self.accept_punct(":") {
                self.expect_ident()?;
            }
            if self.at_punct("{") {
                self.skip_balanced("{", "}")?;
            } else {
                self.expect_punct(";")?;
            }
            return Ok(vec![Item::Function { name, location }]);
        }

        if ty.is_resource() {
            return Ok(vec![Item::Resource(self.resource(ty, name, location)?)]);
        }

        let mut items = Vec::new();
        loop {
            let array_dims = self.array_dims()?;
            let semantic = self.semantic()?;
            let annotations = if self.at_punct("<") {
                self.annotations()?
            } else {
                Vec::new()
            };
            let initializer = if self.accept_punct("=") {
                Some(self.initializer()?)
            } else {
                None
            };
            items.push(Item::Variable(VariableDecl {
                name,
                ty: ty.clone(),
                qualifiers,
                array_dims,
                semantic,
                annotations,
                initializer,
                location,
            }));
            if !self.accept_punct(",") {
                break;
            }
            (name, location) = self.expect_ident()?;
        }
        self.expect_punct(";")?;
        Ok(items)
    }

    fn resource(&mut self, ty: TypeSpec, name: String, location: Location) -> Result<ResourceDecl, Diagnostic> {
        self.array_dims()?;
        self.semantic()?;
        let annotations = if self.at_punct("<") {
            self.annotations()?
        } else {
            Vec::new()
        };
        if self.at_punct("{") {
            self.skip_balanced("{", "}")?;
        }
        self.expect_punct(";")?;
        Ok(ResourceDecl {
            name,
            ty,
            annotations,
            location,
        })
    }

    fn array_dims(&mut self) -> Result<Vec<Option<Expr>>, Diagnostic> {
        let mut dims = Vec::new();
        while self.accept_punct("[") {
            if self.accept_punct("]") {
                dims.push(None);
            } else {
                dims.push(Some(self.expression()?));
                self.expect_punct("]")?;
            }
        }
        Ok(dims)
    }

    fn semantic(&mut self) -> Result<Option<String>, Diagnostic> {
        if !self.accept_punct(":") {
            return Ok(None);
        }
        let (semantic, _) = self.expect_ident()?;
        if self.at_punct("(") {
            // register(t0), packoffset(c0)
            self.skip_balanced("(", ")")?;
        }
        Ok(Some(semantic))
    }

    fn annotations(&mut self) -> Result<Vec<Annotation>, Diagnostic> {
        self.expect_punct("<")?;
        let mut annotations = Vec::new();
        while !self.accept_punct(">") {
            if self.peek().is_none() {
                return Err(self.unexpected("'>'"));
            }

            let save = self.pos;
            let type_location = self.location();
            let typed = self.parse_type()?.is_some() && self.peek().is_some_and(|t| t.ident().is_some());
            if typed {
                self.warnings
                    .push(Diagnostic::warning(type_location, "type of annotation ignored"));
            } else {
                self.pos = save;
            }

            let (name, location) = self.expect_ident()?;
            self.expect_punct("=")?;
            let value = self.unary()?;
            self.expect_punct(";")?;
            annotations.push(Annotation { name, value, location });
        }
        Ok(annotations)
    }

    fn initializer(&mut self) -> Result<Expr, Diagnostic> {
        if !self.accept_punct("{") {
            return self.expression();
        }
        let mut elements = Vec::new();
        loop {
            if self.accept_punct("}") {
                break;
            }
            elements.push(self.initializer()?);
            if !self.accept_punct(",") {
                self.expect_punct("}")?;
                break;
            }
        }
        Ok(Expr::InitList(elements))
    }

    pub fn expression(&mut self) -> Result<Expr, Diagnostic> {
        let condition = self.binary(1)?;
        if !self.accept_punct("?") {
            return Ok(condition);
        }
        let then = self.expression()?;
        self.expect_punct(":")?;
        let otherwise = self.expression()?;
        Ok(Expr::Ternary(Box::new(condition), Box::new(then), Box::new(otherwise)))
    }

    fn binary(&mut self, min_precedence: u8) -> Result<Expr, Diagnostic> {
        let mut lhs = self.unary()?;
        while let Some((op, precedence)) = self.peek_punct().and_then(BinaryOp::from_punct) {
            if precedence < min_precedence {
                break;
            }
            self.pos += 1;
            let rhs = self.binary(precedence + 1)?;
            lhs = Expr::Binary(op, Box::new(lhs), Box::new(rhs));
        }
        Ok(lhs)
    }

    fn unary(&mut self) -> Result<Expr, Diagnostic> {
        let op = match self.peek_punct() {
            Some("-") => Some(UnaryOp::Neg),
            Some("+") => Some(UnaryOp::Plus),
            Some("!") => Some(UnaryOp::Not),
            Some("~") => Some(UnaryOp::BitNot),
            _ => None,
        };
        if let Some(op) = op {
            self.pos += 1;
            return Ok(Expr::Unary(op, Box::new(self.unary()?)));
        }

        if self.at_punct("(") {
            let save = self.pos;
            self.pos += 1;
            if let Some(ty) = self.parse_type()? {
                if self.accept_punct(")") {
                    return Ok(Expr::Cast(ty, Box::new(self.unary()?)));
                }
            }
            self.pos = save;
        }

        self.postfix()
    }

    fn postfix(&mut self) -> Result<Expr, Diagnostic> {
        let mut expr = self.primary()?;
        loop {
            if self.accept_punct(".") {
                let (member, _) = self.expect_ident()?;
                expr = Expr::Member(Box::new(expr), member);
            } else if self.accept_punct("[") {
                let index = self.expression()?;
                self.expect_punct("]")?;
                expr = Expr::Index(Box::new(expr), Box::new(index));
            } else {
                break;
            }
        }
        Ok(expr)
    }

    fn primary(&mut self) -> Result<Expr, Diagnostic> {
        if let Some(ty) = self.parse_type()? {
            let args = self.call_args()?;
            return Ok(Expr::Construct(ty, args));
        }

        let Some(token) = self.peek() else {
            return Err(self.unexpected("expression"));
        };
        let literal = match &token.kind {
            TokenKind::Int { value, unsigned } => Some(Literal::Int {
                value: *value,
                unsigned: *unsigned,
            }),
            TokenKind::Float(v) => Some(Literal::Float(*v)),
            TokenKind::Ident(name) if name == "true" => Some(Literal::Bool(true)),
            TokenKind::Ident(name) if name == "false" => Some(Literal::Bool(false)),
            _ => None,
        };
        if let Some(literal) = literal {
            self.pos += 1;
            return Ok(Expr::Literal(literal));
        }

        if let TokenKind::Str(first) = &token.kind {
            // Adjacent string literals concatenate
            let mut text = first.clone();
            self.pos += 1;
            while let Some(TokenKind::Str(next)) = self.peek().map(|t| &t.kind) {
                text.push_str(next);
                self.pos += 1;
            }
            return Ok(Expr::Literal(Literal::String(text)));
        }

        if self.accept_punct("(") {
            let inner = self.expression()?;
            self.expect_punct(")")?;
            return Ok(inner);
        }

        // Leading `::` refers to the global namespace
        self.accept_punct("::");
        if !self.peek().is_some_and(|t| t.ident().is_some()) {
            return Err(self.unexpected("expression"));
        }
        let (mut name, _) = self.expect_ident()?;
        while self.accept_punct("::") {
            let (part, _) = self.expect_ident()?;
            name = format!("{name}::{part}");
        }
        if self.at_punct("(") {
            let args = self.call_args()?;
            return Ok(Expr::Call(name, args));
        }
        Ok(Expr::Ident(name))
    }

    fn call_args(&mut self) -> Result<Vec<Expr>, Diagnostic> {
        self.expect_punct("(")?;
        let mut args = Vec::new();
        if self.accept_punct(")") {
            return Ok(args);
        }
        loop {
            args.push(self.expression()?);
            if !self.accept_punct(",") {
                self.expect_punct(")")?;
                return Ok(args);
            }
        }
    }

    fn parse_type(&mut self) -> Result<Option<TypeSpec>, Diagnostic> {
        let Some(name) = self.peek().and_then(Token::ident).map(str::to_string) else {
            return Ok(None);
        };

        if let Some(ty) = builtin_type(&name) {
            self.pos += 1;
            if ty.is_resource() && self.at_punct("<") {
                // Element type of texture2D<float4> and friends
                while !self.accept_punct(">") {
                    if self.peek().is_none() {
                        return Err(self.unexpected("'>'"));
                    }
                    self.pos += 1;
                }
            }
            return Ok(Some(ty));
        }

        match name.as_str() {
            "vector" | "matrix" => {
                self.pos += 1;
                let is_matrix = name == "matrix";
                if !self.accept_punct("<") {
                    let cols = if is_matrix { 4 } else { 1 };
                    return Ok(Some(TypeSpec {
                        base: BaseType::Float,
                        rows: 4,
                        cols,
                    }));
                }
                let (element, _) = self.expect_ident()?;
                let base = numeric_type(&element)
                    .filter(TypeSpec::is_scalar)
                    .map(|t| t.base)
                    .ok_or_else(|| self.unexpected("scalar type"))?;
                self.expect_punct(",")?;
                let rows = self.template_dimension()?;
                let cols = if is_matrix {
                    self.expect_punct(",")?;
                    self.template_dimension()?
                } else {
                    1
                };
                self.expect_punct(">")?;
                Ok(Some(TypeSpec { base, rows, cols }))
            }
            _ if self.struct_names.contains(&name) => {
                self.pos += 1;
                Ok(Some(TypeSpec::scalar(BaseType::Struct)))
            }
            _ => Ok(None),
        }
    }

    fn template_dimension(&mut self) -> Result<u8, Diagnostic> {
        match self.peek().map(|t| &t.kind) {
            Some(TokenKind::Int { value, .. }) if (1..=4).contains(value) => {
                let dim = *value as u8;
                self.pos += 1;
                Ok(dim)
            }
            _ => Err(self.unexpected("dimension between 1 and 4")),
        }
    }
}

fn builtin_type(name: &str) -> Option<TypeSpec> {
    let base = match name {
        "void" => BaseType::Void,
        "string" => BaseType::String,
        "texture" | "texture1D" | "texture2D" | "texture3D" => BaseType::Texture,
        "sampler" | "sampler1D" | "sampler2D" | "sampler3D" => BaseType::Sampler,
        "storage" | "storage1D" | "storage2D" | "storage3D" => BaseType::Storage,
        _ => return numeric_type(name),
    };
    Some(TypeSpec::scalar(base))
}

/// Parse `float`, `int3`, `float4x4` style names
fn numeric_type(name: &str) -> Option<TypeSpec> {
    let (base, dims) = NUMERIC_TYPES
        .iter()
        .find_map(|(prefix, base)| name.strip_prefix(prefix).map(|rest| (*base, rest)))?;
    let dim = |b: u8| (b'1'..=b'4').contains(&b).then(|| b - b'0');
    let (rows, cols) = match dims.as_bytes() {
        [] => (1, 1),
        [n] => (dim(*n)?, 1),
        [r, b'x', c] => (dim(*r)?, dim(*c)?),
        _ => return None,
    };
    Some(TypeSpec { base, rows, cols })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::tokenize;

    fn parse_source(source: &str) -> (TranslationUnit, Vec<Diagnostic>) {
        parse(tokenize(source, "test.fx").unwrap()).unwrap()
    }

    fn variables(unit: &TranslationUnit) -> Vec<&VariableDecl> {
        unit.items
            .iter()
            .filter_map(|item| match item {
                Item::Variable(v) => Some(v),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_numeric_type_names() {
        assert_eq!(numeric_type("float"), Some(TypeSpec::scalar(BaseType::Float)));
        assert_eq!(
            numeric_type("int3"),
            Some(TypeSpec {
                base: BaseType::Int,
                rows: 3,
                cols: 1
            })
        );
        assert_eq!(numeric_type("float4x4").map(|t| (t.rows, t.cols)), Some((4, 4)));
        assert_eq!(numeric_type("uint").map(|t| t.base), Some(BaseType::Uint));
        assert_eq!(numeric_type("integer"), None);
        assert_eq!(numeric_type("float5"), None);
    }

    #[test]
    fn test_annotated_uniform() {
        let (unit, warnings) = parse_source(
            r#"uniform float Strength < ui_type = "slider"; ui_min = 0.0; ui_max = 10; ui_label = "Str" "ength"; > = 1.5;"#,
        );
        assert!(warnings.is_empty());
        let vars = variables(&unit);
        assert_eq!(vars.len(), 1);
        let v = vars[0];
        assert_eq!(v.name, "Strength");
        assert!(v.qualifiers.uniform);
        assert!(v.ty.is_scalar());
        assert_eq!(v.annotations.len(), 4);
        assert_eq!(v.annotations[3].value, Expr::Literal(Literal::String("Strength".to_string())));
        assert_eq!(v.initializer, Some(Expr::Literal(Literal::Float(1.5))));
    }

    #[test]
    fn test_negative_annotation_and_typed_annotation() {
        let (unit, warnings) = parse_source("int Offset < int ui_min = -5; ui_max = 5; >;");
        assert_eq!(warnings.len(), 1);
        let v = variables(&unit)[0];
        assert_eq!(v.annotations[0].name, "ui_min");
        assert!(matches!(v.annotations[0].value, Expr::Unary(UnaryOp::Neg, _)));
    }

    #[test]
    fn test_multiple_declarators_and_arrays() {
        let (unit, _) = parse_source("static const float A = 1.0, B = A * 2.0; uniform float3 Tint[2] : COLOR;");
        let vars = variables(&unit);
        assert_eq!(vars.len(), 3);
        assert!(vars[0].qualifiers.is_static && vars[0].qualifiers.is_const);
        assert_eq!(vars[1].name, "B");
        assert_eq!(vars[2].array_dims.len(), 1);
        assert_eq!(vars[2].semantic.as_deref(), Some("COLOR"));
    }

    #[test]
    fn test_functions_structs_resources_skipped() {
        let source = r#"
            struct VSOut { float4 pos : SV_Position; float2 uv : TEXCOORD; };
            texture BackBufferTex : COLOR;
            texture NoiseTex < source = "noise.png"; > { Width = 64; Height = 64; };
            sampler BackBuffer { Texture = BackBufferTex; };
            float4 Sample(VSOut i) : SV_Target { if (i.uv.x > 0.5) { return 1; } return 0; }
            void PostProcessVS(in uint id : SV_VertexID, out float4 position : SV_Position);
            [numthreads(8, 8, 1)] void CS() {}
            VSOut gOut;
        "#;
        let (unit, _) = parse_source(source);
        let kinds: Vec<&str> = unit
            .items
            .iter()
            .map(|item| match item {
                Item::Struct { .. } => "struct",
                Item::Resource(_) => "resource",
                Item::Function { .. } => "function",
                Item::Variable(_) => "variable",
                Item::Technique(_) => "technique",
                Item::Namespace { .. } => "namespace",
            })
            .collect();
        assert_eq!(
            kinds,
            ["struct", "resource", "resource", "resource", "function", "function", "function", "variable"]
        );
        let Item::Variable(v) = &unit.items[7] else { panic!() };
        assert_eq!(v.ty.base, BaseType::Struct);
    }

    #[test]
    fn test_technique() {
        let (unit, _) = parse_source(
            r#"technique Bloom < ui_tooltip = "Glow"; > { pass Down { VertexShader = VS; } pass { PixelShader = PS; } }"#,
        );
        let Item::Technique(t) = &unit.items[0] else { panic!() };
        assert_eq!(t.name, "Bloom");
        assert_eq!(t.passes, 2);
        assert_eq!(t.annotations.len(), 1);
    }

    #[test]
    fn test_namespace() {
        let (unit, _) = parse_source("namespace Clarity { uniform float Radius = 1.0; namespace Inner { int Depth; } }");
        let Item::Namespace { name, items, .. } = &unit.items[0] else { panic!() };
        assert_eq!(name, "Clarity");
        assert_eq!(items.len(), 2);
    }

    #[test]
    fn test_expressions() {
        let (unit, _) = parse_source(
            "static const float X = (float)2 * -(3 + 1) > 1 ? float(1) : max(2, 3); uniform float2 V = { 1, 2.0, };",
        );
        let vars = variables(&unit);
        match vars[0].initializer.as_ref().unwrap() {
            Expr::Ternary(cond, then, otherwise) => {
                assert!(matches!(**cond, Expr::Binary(BinaryOp::Gt, _, _)));
                assert!(matches!(**then, Expr::Construct(_, _)));
                assert!(matches!(**otherwise, Expr::Call(ref name, _) if name == "max"));
            }
            other => panic!("unexpected {other:?}"),
        }
        assert!(matches!(vars[1].initializer, Some(Expr::InitList(ref items)) if items.len() == 2));
    }

    #[test]
    fn test_operator_precedence() {
        let (unit, _) = parse_source("static const int X = 1 + 2 * 3;");
        let init = variables(&unit)[0].initializer.clone().unwrap();
        let Expr::Binary(BinaryOp::Add, _, rhs) = init else { panic!() };
        assert!(matches!(*rhs, Expr::Binary(BinaryOp::Mul, _, _)));
    }

    #[test]
    fn test_qualified_identifier() {
        let (unit, _) = parse_source("static const float Y = Clarity::Radius + ::Global;");
        let init = variables(&unit)[0].initializer.clone().unwrap();
        let Expr::Binary(_, lhs, rhs) = init else { panic!() };
        assert_eq!(*lhs, Expr::Ident("Clarity::Radius".to_string()));
        assert_eq!(*rhs, Expr::Ident("Global".to_string()));
    }

    #[test]
    fn test_syntax_errors() {
        for source in [
            "uniform float;",
            "uniform float X",
            "uniform float X < ui_min = 0 >;",
            "namespace A { uniform float X;",
            "float4 PS() { return 0;",
            "technique T { pass {",
            "42;",
        ] {
            let err = parse(tokenize(source, "test.fx").unwrap()).unwrap_err();
            assert!(err.message.starts_with("syntax error"), "{source}: {}", err.message);
        }
    }
}
