//! Structural type trees for documented signatures.
//!
//! Signatures such as `(a -> b) -> List a -> List b` are parsed into a [`Type`] tree,
//! canonicalized with [`normalize`], and then compared by the scorers in
//! [`crate::search::scoring`].

mod normalize;
mod parser;

pub use normalize::{RESERVED_VARIABLES, VariableMapping, canonical_label, normalize};
pub use parser::{parse, try_parse};

use serde::{Deserialize, Serialize};
use std::fmt;

/// A type constructor together with the module that defines it.
///
/// `home` is empty when the author wrote an unqualified name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct QualifiedName {
    pub home: String,
    pub name: String,
}

impl QualifiedName {
    pub fn new(home: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            home: home.into(),
            name: name.into(),
        }
    }

    /// Split dotted text: the last segment becomes `name`, the prefix `home`.
    ///
    /// - `Int` → home `""`, name `Int`
    /// - `Json.Decode.Decoder` → home `Json.Decode`, name `Decoder`
    pub fn parse(text: &str) -> Self {
        match text.rsplit_once('.') {
            Some((home, name)) => Self::new(home, name),
            None => Self::new("", text),
        }
    }

    /// The zero-argument unit constructor `()`.
    pub fn unit() -> Self {
        Self::new("", "()")
    }
}

impl fmt::Display for QualifiedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.home.is_empty() {
            f.write_str(&self.name)
        } else {
            write!(f, "{}.{}", self.home, self.name)
        }
    }
}

/// A parsed type signature.
///
/// Curried arrows are flattened: `a -> b -> c` is a single [`Type::Function`] with
/// parameters `[a, b]` and result `c`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Type {
    Function { params: Vec<Type>, result: Box<Type> },
    Variable { name: String },
    Apply { name: QualifiedName, args: Vec<Type> },
    Tuple { elements: Vec<Type> },
    Record {
        fields: Vec<(String, Type)>,
        extension: Option<String>,
    },
}

impl Type {
    pub fn var(name: impl Into<String>) -> Self {
        Self::Variable { name: name.into() }
    }

    /// Apply a (possibly dotted) constructor name to arguments.
    pub fn apply(name: &str, args: Vec<Type>) -> Self {
        Self::Apply {
            name: QualifiedName::parse(name),
            args,
        }
    }

    pub fn function(params: Vec<Type>, result: Type) -> Self {
        Self::Function {
            params,
            result: Box::new(result),
        }
    }

    /// Rendering used inside an argument position: functions and applied
    /// constructors get parentheses.
    fn fmt_atom(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Function { .. } => write!(f, "({})", self),
            Self::Apply { args, .. } if !args.is_empty() => write!(f, "({})", self),
            _ => write!(f, "{}", self),
        }
    }
}

impl fmt::Display for Type {
    /// Renders with unqualified constructor names, e.g. `(a -> b) -> List a -> List b`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Function { params, result } => {
                for param in params {
                    match param {
                        Self::Function { .. } => write!(f, "({})", param)?,
                        _ => write!(f, "{}", param)?,
                    }
                    f.write_str(" -> ")?;
                }
                match result.as_ref() {
                    Self::Function { .. } => write!(f, "({})", result),
                    _ => write!(f, "{}", result),
                }
            }
            Self::Variable { name } => f.write_str(name),
            Self::Apply { name, args } => {
                f.write_str(&name.name)?;
                for arg in args {
                    f.write_str(" ")?;
                    arg.fmt_atom(f)?;
                }
                Ok(())
            }
            Self::Tuple { elements } => {
                f.write_str("(")?;
                for (i, element) in elements.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}", element)?;
                }
                f.write_str(")")
            }
            Self::Record { fields, extension } => {
                if fields.is_empty() && extension.is_none() {
                    return f.write_str("{}");
                }
                f.write_str("{ ")?;
                if let Some(extension) = extension {
                    write!(f, "{} | ", extension)?;
                }
                for (i, (label, tipe)) in fields.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{} : {}", label, tipe)?;
                }
                f.write_str(" }")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert2::check;
    use rstest::rstest;

    #[rstest]
    #[case("Int", "", "Int")]
    #[case("Json.Decode.Decoder", "Json.Decode", "Decoder")]
    #[case("Maybe.Maybe", "Maybe", "Maybe")]
    fn test_qualified_name_parse(#[case] input: &str, #[case] home: &str, #[case] name: &str) {
        let qualified = QualifiedName::parse(input);
        check!(qualified.home == home);
        check!(qualified.name == name);
        check!(qualified.to_string() == input);
    }

    #[rstest]
    #[case("(a -> b) -> List a -> List b")]
    #[case("Dict comparable (Maybe v) -> Int")]
    #[case("(a, b) -> a")]
    #[case("{ r | name : String, age : Int } -> ()")]
    #[case("{} -> Int")]
    fn test_display_reparses_to_same_tree(#[case] signature: &str) {
        let tipe = parse(signature);
        check!(tipe.to_string() == signature);
        check!(parse(&tipe.to_string()) == tipe);
    }

    #[test]
    fn test_display_of_parenthesized_result() {
        check!(parse("a -> (b -> c)").to_string() == "a -> b -> c");
    }

    #[test]
    fn test_display_drops_home() {
        let tipe = parse("Json.Decode.Decoder a -> Maybe.Maybe a");
        check!(tipe.to_string() == "Decoder a -> Maybe a");
    }
}
