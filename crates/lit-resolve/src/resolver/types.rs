//! The type system: a tagged sum rather than the source's parsed strings
//! (see SPEC_FULL.md's redesign notes), plus the textual signature codec
//! still needed at two boundaries: externals registered by signature
//! string, and the `Display` impl used in diagnostics.

use std::fmt;

/// Every type a Lit expression or declaration can carry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Type {
    Int,
    Double,
    Bool,
    Char,
    String,
    Void,
    /// Compatible with every other type in both directions.
    Any,
    /// Propagates from a failed resolution; also compatible with
    /// everything, so one failure doesn't cascade into a dozen more.
    Error,
    Function(Box<FunctionType>),
    /// An instance of class `name` (what a variable of that type holds).
    ClassInstance(String),
    /// The type of the class itself — what `ClassName` evaluates to as an
    /// expression, and a constructor call's callee type.
    ClassMeta(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionType {
    pub parameters: Vec<Type>,
    pub return_type: Type,
}

impl Type {
    pub fn function(parameters: Vec<Type>, return_type: Type) -> Type {
        Type::Function(Box::new(FunctionType { parameters, return_type }))
    }

    /// Type-name comparison per the signature codec's two rules: `any` (and,
    /// per this implementation's resolution of the source's open question,
    /// `error`) is compatible with everything; `int`/`double` widen into
    /// each other; otherwise structural equality — recursing into function
    /// parameter/return types and comparing classes by name.
    pub fn is_compatible_with(&self, other: &Type) -> bool {
        match (self, other) {
            (Type::Any, _) | (_, Type::Any) => true,
            (Type::Error, _) | (_, Type::Error) => true,
            (Type::Int, Type::Double) | (Type::Double, Type::Int) => true,
            (Type::Function(a), Type::Function(b)) => {
                a.parameters.len() == b.parameters.len()
                    && a.parameters.iter().zip(b.parameters.iter()).all(|(x, y)| x.is_compatible_with(y))
                    && a.return_type.is_compatible_with(&b.return_type)
            }
            _ => self == other,
        }
    }

    /// Strict equality used for field-initializer-vs-declared-type checks,
    /// which this implementation keeps stricter than `is_compatible_with`
    /// (per SPEC_FULL.md's Open Question resolution: a `double` initializer
    /// for a declared `int` field is rejected, not widened).
    pub fn is_exactly(&self, other: &Type) -> bool {
        self == other
    }

    pub fn class_name(&self) -> Option<&str> {
        match self {
            Type::ClassInstance(name) | Type::ClassMeta(name) => Some(name),
            _ => None,
        }
    }

    pub fn is_class_meta_named(&self, name: &str) -> bool {
        matches!(self, Type::ClassMeta(n) if n == name)
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Type::Int => write!(f, "int"),
            Type::Double => write!(f, "double"),
            Type::Bool => write!(f, "bool"),
            Type::Char => write!(f, "char"),
            Type::String => write!(f, "String"),
            Type::Void => write!(f, "void"),
            Type::Any => write!(f, "any"),
            Type::Error => write!(f, "error"),
            Type::Function(function_type) => {
                write!(f, "function<")?;
                for parameter in &function_type.parameters {
                    write!(f, "{parameter}, ")?;
                }
                write!(f, "{}>", function_type.return_type)
            }
            Type::ClassInstance(name) => write!(f, "{name}"),
            Type::ClassMeta(name) => write!(f, "Class<{name}>"),
        }
    }
}

/// Parses a textual signature produced by [`Type`]'s `Display` impl back
/// into a `Type`. Exists for the externals table (host-registered natives
/// are described by signature string, per SPEC_FULL.md Part A §6) and to
/// exercise the round-trip testable property; the resolver itself never
/// needs to re-parse a `Type` it already holds.
pub fn parse_signature(signature: &str) -> Option<Type> {
    let mut cursor = SignatureCursor::new(signature);
    cursor.parse_type()
}

/// Explicit tokenizer cursor, replacing the source's file-scope `last_string`
/// / `had_template` globals (SPEC_FULL.md Part A §9, "Global mutable state")
/// so multiple signature walks can't collide.
struct SignatureCursor<'a> {
    remaining: &'a str,
}

impl<'a> SignatureCursor<'a> {
    fn new(input: &'a str) -> Self {
        Self { remaining: input.trim() }
    }

    fn parse_type(&mut self) -> Option<Type> {
        let input = self.remaining;
        if let Some(rest) = input.strip_prefix("function<") {
            let (inside, after) = split_matching_angle(rest)?;
            self.remaining = after;
            let mut tokens = tokenize_top_level_commas(inside);
            if tokens.is_empty() {
                return None;
            }
            let return_token = tokens.pop().unwrap();
            let mut parameters = Vec::with_capacity(tokens.len());
            for token in tokens {
                parameters.push(SignatureCursor::new(token.trim()).parse_type()?);
            }
            let return_type = SignatureCursor::new(return_token.trim()).parse_type()?;
            return Some(Type::function(parameters, return_type));
        }

        if let Some(rest) = input.strip_prefix("Class<") {
            let (inside, after) = split_matching_angle(rest)?;
            self.remaining = after;
            return Some(Type::ClassMeta(inside.trim().to_string()));
        }

        let head: String = input.chars().take_while(|c| *c != '<' && *c != ',' && *c != '>').collect();
        let head = head.trim();
        self.remaining = &input[head.len()..];
        Some(match head {
            "int" => Type::Int,
            "double" => Type::Double,
            "bool" => Type::Bool,
            "char" => Type::Char,
            "String" => Type::String,
            "void" => Type::Void,
            "any" => Type::Any,
            "error" => Type::Error,
            other => Type::ClassInstance(other.to_string()),
        })
    }
}

/// Splits `text` at the `>` matching the `<` that was already consumed,
/// tracking nesting depth so embedded `function<...>`/`Class<...>` tokens
/// survive intact. Returns `(inside, after)`.
fn split_matching_angle(text: &str) -> Option<(&str, &str)> {
    let mut depth = 1usize;
    for (index, ch) in text.char_indices() {
        match ch {
            '<' => depth += 1,
            '>' => {
                depth -= 1;
                if depth == 0 {
                    return Some((&text[..index], &text[index + 1..]));
                }
            }
            _ => {}
        }
    }
    None
}

/// Splits `text` on top-level commas, preserving commas nested inside `<...>`.
fn tokenize_top_level_commas(text: &str) -> Vec<&str> {
    let mut tokens = Vec::new();
    let mut depth = 0usize;
    let mut start = 0usize;
    for (index, ch) in text.char_indices() {
        match ch {
            '<' => depth += 1,
            '>' => depth = depth.saturating_sub(1),
            ',' if depth == 0 => {
                tokens.push(text[start..index].trim());
                start = index + 1;
            }
            _ => {}
        }
    }
    let last = text[start..].trim();
    if !last.is_empty() {
        tokens.push(last);
    }
    tokens
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn any_is_compatible_both_directions() {
        assert!(Type::Any.is_compatible_with(&Type::Int));
        assert!(Type::Int.is_compatible_with(&Type::Any));
    }

    #[test]
    fn int_and_double_are_compatible() {
        assert!(Type::Int.is_compatible_with(&Type::Double));
        assert!(Type::Double.is_compatible_with(&Type::Int));
    }

    #[test]
    fn int_and_bool_are_not_compatible() {
        assert!(!Type::Int.is_compatible_with(&Type::Bool));
    }

    #[test]
    fn error_suppresses_cascades() {
        assert!(Type::Error.is_compatible_with(&Type::Bool));
        assert!(Type::ClassInstance("Foo".into()).is_compatible_with(&Type::Error));
    }

    #[test]
    fn empty_parameter_list_round_trips() {
        let ty = Type::function(vec![], Type::Int);
        assert_eq!(ty.to_string(), "function<int>");
        assert_eq!(parse_signature(&ty.to_string()), Some(ty));
    }

    #[test]
    fn signature_round_trips_with_nested_function_argument() {
        let callback = Type::function(vec![Type::Int], Type::Bool);
        let ty = Type::function(vec![Type::String, callback], Type::Void);
        let text = ty.to_string();
        assert_eq!(parse_signature(&text), Some(ty));
    }

    #[test]
    fn class_meta_round_trips() {
        let ty = Type::ClassMeta("Animal".into());
        assert_eq!(ty.to_string(), "Class<Animal>");
        assert_eq!(parse_signature(&ty.to_string()), Some(ty));
    }
}
