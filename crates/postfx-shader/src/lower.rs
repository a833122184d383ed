//! Lowering of the syntax tree to an effect module
//!
//! The module keeps only what the parameter extractor needs: every uniform,
//! the scalar uniforms whose values are known at compile time (spec
//! constants) with their annotations folded to constants, and the texture and
//! technique names.

use std::collections::{HashMap, HashSet};
use std::fmt;

use crate::ast::{BaseType, BinaryOp, Expr, Item, Literal, TranslationUnit, TypeSpec, UnaryOp, VariableDecl};
use crate::diagnostic::{Diagnostic, Location};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScalarType {
    Bool,
    Int,
    Uint,
    Float,
}

impl ScalarType {
    pub fn is_floating_point(self) -> bool {
        self == ScalarType::Float
    }

    pub fn is_boolean(self) -> bool {
        self == ScalarType::Bool
    }

    fn of(ty: &TypeSpec) -> Option<Self> {
        if !ty.is_scalar() {
            return None;
        }
        match ty.base {
            BaseType::Bool => Some(ScalarType::Bool),
            BaseType::Int => Some(ScalarType::Int),
            BaseType::Uint => Some(ScalarType::Uint),
            BaseType::Float => Some(ScalarType::Float),
            _ => None,
        }
    }
}

/// A compile-time value
#[derive(Debug, Clone, PartialEq)]
pub enum Constant {
    Bool(bool),
    Int(i32),
    Uint(u32),
    Float(f32),
    String(String),
    /// Components of a vector or matrix constructor; scalar views use the first
    Vector(Vec<Constant>),
}

impl Constant {
    pub fn as_f32(&self) -> f32 {
        match self {
            Constant::Bool(b) => f32::from(u8::from(*b)),
            Constant::Int(i) => *i as f32,
            Constant::Uint(u) => *u as f32,
            Constant::Float(f) => *f,
            Constant::String(_) => 0.0,
            Constant::Vector(v) => v.first().map_or(0.0, Constant::as_f32),
        }
    }

    /// Integer view; floats truncate toward zero
    pub fn as_i32(&self) -> i32 {
        match self {
            Constant::Bool(b) => i32::from(*b),
            Constant::Int(i) => *i,
            Constant::Uint(u) => *u as i32,
            Constant::Float(f) => *f as i32,
            Constant::String(_) => 0,
            Constant::Vector(v) => v.first().map_or(0, Constant::as_i32),
        }
    }

    pub fn as_u32(&self) -> u32 {
        match self {
            Constant::Bool(b) => u32::from(*b),
            Constant::Int(i) => *i as u32,
            Constant::Uint(u) => *u,
            Constant::Float(f) => *f as u32,
            Constant::String(_) => 0,
            Constant::Vector(v) => v.first().map_or(0, Constant::as_u32),
        }
    }

    pub fn as_bool(&self) -> bool {
        match self {
            Constant::Bool(b) => *b,
            Constant::Int(i) => *i != 0,
            Constant::Uint(u) => *u != 0,
            Constant::Float(f) => *f != 0.0,
            Constant::String(s) => !s.is_empty(),
            Constant::Vector(v) => v.first().is_some_and(Constant::as_bool),
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Constant::String(s) => Some(s),
            _ => None,
        }
    }

    /// Convert to the representation of `ty`
    pub fn coerce(&self, ty: ScalarType) -> Constant {
        match ty {
            ScalarType::Bool => Constant::Bool(self.as_bool()),
            ScalarType::Int => Constant::Int(self.as_i32()),
            ScalarType::Uint => Constant::Uint(self.as_u32()),
            ScalarType::Float => Constant::Float(self.as_f32()),
        }
    }

    fn scalar_type(&self) -> Option<ScalarType> {
        match self {
            Constant::Bool(_) => Some(ScalarType::Bool),
            Constant::Int(_) => Some(ScalarType::Int),
            Constant::Uint(_) => Some(ScalarType::Uint),
            Constant::Float(_) => Some(ScalarType::Float),
            Constant::String(_) | Constant::Vector(_) => None,
        }
    }
}

impl fmt::Display for Constant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Constant::Bool(v) => write!(f, "{v}"),
            Constant::Int(v) => write!(f, "{v}"),
            Constant::Uint(v) => write!(f, "{v}u"),
            Constant::Float(v) => write!(f, "{v}"),
            Constant::String(v) => write!(f, "{v:?}"),
            Constant::Vector(v) => {
                let parts: Vec<String> = v.iter().map(ToString::to_string).collect();
                write!(f, "{{{}}}", parts.join(", "))
            }
        }
    }
}

/// An annotation folded to a constant
#[derive(Debug, Clone, PartialEq)]
pub struct AnnotationValue {
    pub name: String,
    pub value: Constant,
}

fn find<'a>(annotations: &'a [AnnotationValue], name: &str) -> Option<&'a Constant> {
    annotations.iter().find(|a| a.name == name).map(|a| &a.value)
}

/// Any global uniform variable
#[derive(Debug, Clone, PartialEq)]
pub struct Uniform {
    pub name: String,
    pub ty: TypeSpec,
    pub annotations: Vec<AnnotationValue>,
}

/// A scalar uniform with a compile-time initializer
#[derive(Debug, Clone, PartialEq)]
pub struct SpecConstant {
    pub name: String,
    pub ty: ScalarType,
    /// Initializer already converted to `ty`
    pub initializer: Constant,
    pub annotations: Vec<AnnotationValue>,
}

impl SpecConstant {
    pub fn annotation(&self, name: &str) -> Option<&Constant> {
        find(&self.annotations, name)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Technique {
    pub name: String,
    pub passes: usize,
    pub annotations: Vec<AnnotationValue>,
}

/// The lowered effect
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Module {
    pub uniforms: Vec<Uniform>,
    pub spec_constants: Vec<SpecConstant>,
    pub textures: Vec<String>,
    pub techniques: Vec<Technique>,
}

impl Module {
    pub fn spec_constant(&self, name: &str) -> Option<&SpecConstant> {
        self.spec_constants.iter().find(|c| c.name == name)
    }
}

/// Lower a parsed effect to a module
pub fn lower(unit: &TranslationUnit) -> Result<Module, Diagnostic> {
    let mut lowering = Lowering::default();
    lowering.items(&unit.items)?;
    Ok(lowering.module)
}

#[derive(Default)]
struct Lowering {
    module: Module,
    /// Folded `static const` values by qualified name
    constants: HashMap<String, Constant>,
    /// Qualified names of every global variable seen so far
    declared: HashSet<String>,
    namespaces: Vec<String>,
}

impl Lowering {
    fn items(&mut self, items: &[Item]) -> Result<(), Diagnostic> {
        for item in items {
            match item {
                Item::Namespace { name, items, .. } => {
                    self.namespaces.push(name.clone());
                    let result = self.items(items);
                    self.namespaces.pop();
                    result?;
                }
                Item::Variable(decl) => self.variable(decl)?,
                Item::Resource(resource) if resource.ty.base == BaseType::Texture => {
                    let name = self.qualify(&resource.name);
                    self.module.textures.push(name);
                }
                Item::Technique(technique) => {
                    let technique = Technique {
                        name: self.qualify(&technique.name),
                        passes: technique.passes,
                        annotations: self.annotations(&technique.annotations)?,
                    };
                    self.module.techniques.push(technique);
                }
                Item::Resource(_) | Item::Function { .. } | Item::Struct { .. } => {}
            }
        }
        Ok(())
    }

    fn qualify(&self, name: &str) -> String {
        if self.namespaces.is_empty() {
            name.to_string()
        } else {
            format!("{}::{}", self.namespaces.join("::"), name)
        }
    }

    fn variable(&mut self, decl: &VariableDecl) -> Result<(), Diagnostic> {
        let name = self.qualify(&decl.name);
        if !self.declared.insert(name.clone()) {
            return Err(Diagnostic::error(decl.location.clone(), format!("redefinition of '{name}'")));
        }
        let scalar = ScalarType::of(&decl.ty).filter(|_| decl.array_dims.is_empty());

        if decl.qualifiers.is_static {
            if let (true, Some(ty), Some(init)) = (decl.qualifiers.is_const, scalar, &decl.initializer) {
                // Static constants that do not fold are simply unavailable to later expressions
                match self.eval(init) {
                    Ok(value) => {
                        self.constants.insert(name, value.coerce(ty));
                    }
                    Err(reason) => log::trace!("static const '{}' not folded: {}", name, reason),
                }
            }
            return Ok(());
        }
        if !decl.ty.is_numeric() {
            return Ok(());
        }

        let annotations = self.annotations(&decl.annotations)?;
        if let (Some(ty), Some(init)) = (scalar, &decl.initializer) {
            let value = self.eval(init).map_err(|reason| {
                Diagnostic::error(
                    decl.location.clone(),
                    format!("initializer of uniform '{name}' must be a literal expression ({reason})"),
                )
            })?;
            self.module.spec_constants.push(SpecConstant {
                name: name.clone(),
                ty,
                initializer: value.coerce(ty),
                annotations: annotations.clone(),
            });
        }
        self.module.uniforms.push(Uniform {
            name,
            ty: decl.ty.clone(),
            annotations,
        });
        Ok(())
    }

    fn annotations(&self, annotations: &[crate::ast::Annotation]) -> Result<Vec<AnnotationValue>, Diagnostic> {
        annotations
            .iter()
            .map(|a| {
                let value = self.eval(&a.value).map_err(|reason| annotation_error(&a.location, &a.name, &reason))?;
                Ok(AnnotationValue {
                    name: a.name.clone(),
                    value,
                })
            })
            .collect()
    }

    fn lookup(&self, name: &str) -> Option<&Constant> {
        (0..=self.namespaces.len()).rev().find_map(|depth| {
            let key = if depth == 0 {
                name.to_string()
            } else {
                format!("{}::{}", self.namespaces[..depth].join("::"), name)
            };
            self.constants.get(&key)
        })
    }

    /// Fold a constant expression
    fn eval(&self, expr: &Expr) -> Result<Constant, String> {
        match expr {
            Expr::Literal(literal) => Ok(match literal {
                Literal::Bool(b) => Constant::Bool(*b),
                Literal::Int { value, unsigned: true } => Constant::Uint(*value as u32),
                Literal::Int { value, unsigned: false } => Constant::Int(*value as i32),
                Literal::Float(f) => Constant::Float(*f as f32),
                Literal::String(s) => Constant::String(s.clone()),
            }),
            Expr::Ident(name) => self
                .lookup(name)
                .cloned()
                .ok_or_else(|| format!("'{name}' is not a constant")),
            Expr::Unary(op, operand) => unary(*op, self.eval(operand)?),
            Expr::Binary(op, lhs, rhs) => binary(*op, self.eval(lhs)?, self.eval(rhs)?),
            Expr::Ternary(condition, then, otherwise) => {
                if self.eval(condition)?.as_bool() {
                    self.eval(then)
                } else {
                    self.eval(otherwise)
                }
            }
            Expr::Cast(ty, operand) => {
                let value = self.eval(operand)?;
                scalar_of(ty, &value)
            }
            Expr::Construct(ty, args) if !ty.is_scalar() => self.construct(ty, args),
            Expr::Construct(ty, args) => match args.as_slice() {
                [single] => {
                    let value = self.eval(single)?;
                    scalar_of(ty, &value)
                }
                _ => Err("constructor does not take exactly one argument".to_string()),
            },
            Expr::InitList(elements) => match elements.as_slice() {
                [single] => self.eval(single),
                _ => Err("initializer list is not a scalar constant".to_string()),
            },
            Expr::Call(name, _) => Err(format!("call to '{name}' is not a constant expression")),
            Expr::Member(..) | Expr::Index(..) => Err("not a constant expression".to_string()),
        }
    }

    /// Fold `float3(a, b, c)`-style constructors, flattening vector arguments
    fn construct(&self, ty: &TypeSpec, args: &[Expr]) -> Result<Constant, String> {
        let component = ScalarType::of(&TypeSpec::scalar(ty.base)).ok_or("constructor of a non-numeric type")?;
        let mut components = Vec::new();
        for arg in args {
            match self.eval(arg)? {
                Constant::String(_) => return Err("strings cannot be converted".to_string()),
                Constant::Vector(values) => components.extend(values),
                value => components.push(value),
            }
        }
        let expected = usize::from(ty.rows) * usize::from(ty.cols);
        if components.len() != expected {
            return Err(format!(
                "constructor expects {expected} components, got {}",
                components.len()
            ));
        }
        Ok(Constant::Vector(
            components.iter().map(|c| c.coerce(component)).collect(),
        ))
    }
}

fn scalar_of(ty: &TypeSpec, value: &Constant) -> Result<Constant, String> {
    match (ScalarType::of(ty), value) {
        (_, Constant::String(_)) => Err("strings cannot be converted".to_string()),
        (Some(scalar), value) => Ok(value.coerce(scalar)),
        (None, _) => Err("vector and matrix values are not scalar constants".to_string()),
    }
}

fn annotation_error(location: &Location, name: &str, reason: &str) -> Diagnostic {
    Diagnostic::error(
        location.clone(),
        format!("value of annotation '{name}' must be a literal expression ({reason})"),
    )
}

fn unary(op: UnaryOp, value: Constant) -> Result<Constant, String> {
    if value.scalar_type().is_none() {
        return Err("operator requires a scalar operand".to_string());
    }
    Ok(match op {
        UnaryOp::Plus => value,
        UnaryOp::Neg => match value {
            Constant::Float(f) => Constant::Float(-f),
            Constant::Uint(u) => Constant::Uint(u.wrapping_neg()),
            other => Constant::Int(other.as_i32().wrapping_neg()),
        },
        UnaryOp::Not => Constant::Bool(!value.as_bool()),
        UnaryOp::BitNot => match value {
            Constant::Uint(u) => Constant::Uint(!u),
            Constant::Float(_) => return Err("'~' cannot be applied to a float".to_string()),
            other => Constant::Int(!other.as_i32()),
        },
    })
}

/// Common type of two operands: float > uint > int, booleans act as int
fn promote(a: ScalarType, b: ScalarType) -> ScalarType {
    use ScalarType::*;
    match (a, b) {
        (Float, _) | (_, Float) => Float,
        (Uint, _) | (_, Uint) => Uint,
        _ => Int,
    }
}

fn binary(op: BinaryOp, lhs: Constant, rhs: Constant) -> Result<Constant, String> {
    let (Some(lt), Some(rt)) = (lhs.scalar_type(), rhs.scalar_type()) else {
        return Err("operator requires scalar operands".to_string());
    };

    match op {
        BinaryOp::And => return Ok(Constant::Bool(lhs.as_bool() && rhs.as_bool())),
        BinaryOp::Or => return Ok(Constant::Bool(lhs.as_bool() || rhs.as_bool())),
        _ => {}
    }

    match promote(lt, rt) {
        ScalarType::Float => {
            let (a, b) = (lhs.as_f32(), rhs.as_f32());
            if op.is_comparison() {
                return Ok(Constant::Bool(compare(op, a, b)));
            }
            Ok(Constant::Float(match op {
                BinaryOp::Add => a + b,
                BinaryOp::Sub => a - b,
                BinaryOp::Mul => a * b,
                BinaryOp::Div => a / b,
                BinaryOp::Rem => a % b,
                _ => return Err("bitwise operator cannot be applied to a float".to_string()),
            }))
        }
        ScalarType::Uint => {
            let (a, b) = (lhs.as_u32(), rhs.as_u32());
            if op.is_comparison() {
                return Ok(Constant::Bool(compare(op, a, b)));
            }
            integer_op(op, a, b).map(Constant::Uint)
        }
        ScalarType::Int | ScalarType::Bool => {
            let (a, b) = (lhs.as_i32(), rhs.as_i32());
            if op.is_comparison() {
                return Ok(Constant::Bool(compare(op, a, b)));
            }
            integer_op(op, a, b).map(Constant::Int)
        }
    }
}

fn compare<T: PartialOrd>(op: BinaryOp, a: T, b: T) -> bool {
    match op {
        BinaryOp::Lt => a < b,
        BinaryOp::Gt => a > b,
        BinaryOp::Le => a <= b,
        BinaryOp::Ge => a >= b,
        BinaryOp::Eq => a == b,
        _ => a != b,
    }
}

trait Wrapping: Copy {
    fn add(self, rhs: Self) -> Self;
    fn sub(self, rhs: Self) -> Self;
    fn mul(self, rhs: Self) -> Self;
    fn div(self, rhs: Self) -> Option<Self>;
    fn rem(self, rhs: Self) -> Option<Self>;
    fn shl(self, rhs: Self) -> Self;
    fn shr(self, rhs: Self) -> Self;
    fn and(self, rhs: Self) -> Self;
    fn xor(self, rhs: Self) -> Self;
    fn or(self, rhs: Self) -> Self;
}

macro_rules! impl_wrapping {
    ($($t:ty),*) => {$(
        impl Wrapping for $t {
            fn add(self, rhs: Self) -> Self { self.wrapping_add(rhs) }
            fn sub(self, rhs: Self) -> Self { self.wrapping_sub(rhs) }
            fn mul(self, rhs: Self) -> Self { self.wrapping_mul(rhs) }
            fn div(self, rhs: Self) -> Option<Self> { (rhs != 0).then(|| self.wrapping_div(rhs)) }
            fn rem(self, rhs: Self) -> Option<Self> { (rhs != 0).then(|| self.wrapping_rem(rhs)) }
            fn shl(self, rhs: Self) -> Self { self.wrapping_shl(rhs as u32) }
            fn shr(self, rhs: Self) -> Self { self.wrapping_shr(rhs as u32) }
            fn and(self, rhs: Self) -> Self { self & rhs }
            fn xor(self, rhs: Self) -> Self { self ^ rhs }
            fn or(self, rhs: Self) -> Self { self | rhs }
        }
    )*};
}

impl_wrapping!(i32, u32);

fn integer_op<T: Wrapping>(op: BinaryOp, a: T, b: T) -> Result<T, String> {
    Ok(match op {
        BinaryOp::Add => a.add(b),
        BinaryOp::Sub => a.sub(b),
        BinaryOp::Mul => a.mul(b),
        BinaryOp::Div => a.div(b).ok_or("division by zero")?,
        BinaryOp::Rem => a.rem(b).ok_or("division by zero")?,
        BinaryOp::Shl => a.shl(b),
        BinaryOp::Shr => a.shr(b),
        BinaryOp::BitAnd => a.and(b),
        BinaryOp::BitXor => a.xor(b),
        BinaryOp::BitOr => a.or(b),
        _ => return Err("unsupported operator".to_string()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::tokenize;
    use crate::parser::parse;

    fn lower_source(source: &str) -> Result<Module, Diagnostic> {
        let (unit, _) = parse(tokenize(source, "test.fx").unwrap()).unwrap();
        lower(&unit)
    }

    #[test]
    fn test_spec_constant_from_literal() {
        let module = lower_source("uniform float Strength < ui_min = 0; ui_max = 10; > = 2;").unwrap();
        assert_eq!(module.uniforms.len(), 1);
        let c = module.spec_constant("Strength").unwrap();
        assert_eq!(c.ty, ScalarType::Float);
        assert_eq!(c.initializer, Constant::Float(2.0));
        assert_eq!(c.annotation("ui_min"), Some(&Constant::Int(0)));
        assert_eq!(c.annotation("ui_max"), Some(&Constant::Int(10)));
    }

    #[test]
    fn test_uniform_without_initializer_is_not_spec_constant() {
        let module = lower_source("uniform float Timer < source = \"timer\"; >; uniform float3 Tint = float3(1, 0, 0);").unwrap();
        assert_eq!(module.uniforms.len(), 2);
        assert!(module.spec_constants.is_empty());
    }

    #[test]
    fn test_static_const_folding() {
        let module = lower_source(
            "static const int Base = 4; static const float Scale = Base * 0.5; uniform float Radius = Scale + 1; uniform int Steps = Base << 1;",
        )
        .unwrap();
        assert_eq!(module.spec_constant("Radius").unwrap().initializer, Constant::Float(3.0));
        assert_eq!(module.spec_constant("Steps").unwrap().initializer, Constant::Int(8));
        // Statics are not uniforms
        assert_eq!(module.uniforms.len(), 2);
    }

    #[test]
    fn test_initializer_coerced_to_declared_type() {
        let module = lower_source("uniform int Count = 2.9; uniform bool Enabled = 1; uniform uint Mask = 0xff;").unwrap();
        assert_eq!(module.spec_constant("Count").unwrap().initializer, Constant::Int(2));
        assert_eq!(module.spec_constant("Enabled").unwrap().initializer, Constant::Bool(true));
        assert_eq!(module.spec_constant("Mask").unwrap().initializer, Constant::Uint(255));
    }

    #[test]
    fn test_namespaced_names() {
        let module = lower_source(
            "namespace Clarity { static const float K = 2.0; uniform float Radius = K; texture Blur { Width = 1; }; technique Sharpen { pass {} } }",
        )
        .unwrap();
        assert!(module.spec_constant("Clarity::Radius").is_some());
        assert_eq!(module.textures, ["Clarity::Blur"]);
        assert_eq!(module.techniques[0].name, "Clarity::Sharpen");
        assert_eq!(module.techniques[0].passes, 1);
    }

    #[test]
    fn test_non_constant_annotation_is_error() {
        let err = lower_source("uniform float X < ui_max = Unknown; > = 1.0;").unwrap_err();
        assert!(err.message.contains("annotation 'ui_max'"));
    }

    #[test]
    fn test_non_constant_initializer_is_error() {
        let err = lower_source("uniform float X = sqrt(2.0);").unwrap_err();
        assert!(err.message.contains("uniform 'X'"));
    }

    #[test]
    fn test_constant_expressions() {
        let module = lower_source(
            "uniform float A = -(1 + 2) * 2; uniform bool B = 3 > 2 && !false; uniform int C = true ? 7 % 4 : 0; uniform float D = (float)5 / 2;",
        )
        .unwrap();
        assert_eq!(module.spec_constant("A").unwrap().initializer, Constant::Float(-6.0));
        assert_eq!(module.spec_constant("B").unwrap().initializer, Constant::Bool(true));
        assert_eq!(module.spec_constant("C").unwrap().initializer, Constant::Int(3));
        assert_eq!(module.spec_constant("D").unwrap().initializer, Constant::Float(2.5));
    }

    #[test]
    fn test_vector_annotations() {
        let module = lower_source(
            "uniform float2 PingPong < source = \"pingpong\"; step = float2(1, 2); >;\n\
             uniform float3 Tint < ui_min = float3(0, 0, 0); ui_max = float3(float2(1, 1), 2); > = float3(1, 1, 1);\n\
             uniform float Strength < ui_max = float2(4, 8); > = 0.5;",
        )
        .unwrap();
        assert_eq!(module.uniforms.len(), 3);
        let step = find(&module.uniforms[0].annotations, "step").unwrap();
        assert_eq!(step, &Constant::Vector(vec![Constant::Float(1.0), Constant::Float(2.0)]));
        let max = find(&module.uniforms[1].annotations, "ui_max").unwrap();
        assert_eq!(max.to_string(), "{1, 1, 2}");

        assert_eq!(module.spec_constants.len(), 1);
        let strength = module.spec_constant("Strength").unwrap();
        assert_eq!(strength.annotation("ui_max").unwrap().as_f32(), 4.0);
    }

    #[test]
    fn test_vector_constructor_arity() {
        let err = lower_source("uniform float3 Tint < ui_min = float3(0, 0); >;").unwrap_err();
        assert!(err.message.contains("expects 3 components, got 2"));
    }

    #[test]
    fn test_uniform_redefinition() {
        let err = lower_source("uniform float A = 0.5; uniform float A = 0.7;").unwrap_err();
        assert!(err.message.contains("redefinition of 'A'"));
        assert!(lower_source("uniform float A = 0.5; namespace Other { uniform float A = 0.7; }").is_ok());
    }

    #[test]
    fn test_integer_division_by_zero() {
        assert!(lower_source("uniform int X = 1 / 0;").is_err());
    }

    #[test]
    fn test_string_annotations_concatenate() {
        let module = lower_source("uniform int Mode < ui_items = \"Off\\0\" \"On\\0\"; > = 0;").unwrap();
        let items = module.spec_constant("Mode").unwrap().annotation("ui_items").unwrap();
        assert_eq!(items.as_str(), Some("Off\0On\0"));
    }

    #[test]
    fn test_constant_conversions() {
        assert_eq!(Constant::Float(-2.7).as_i32(), -2);
        assert_eq!(Constant::Int(3).as_f32(), 3.0);
        assert!(!Constant::Uint(0).as_bool());
        assert_eq!(Constant::Bool(true).coerce(ScalarType::Float), Constant::Float(1.0));
    }
}
