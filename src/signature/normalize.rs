//! Canonical renaming of free type variables.
//!
//! Two signatures that differ only in the author's choice of variable names
//! normalize to the same tree: `x -> y -> x` and `a -> b -> a` both become
//! `a -> b -> a`.

use super::Type;

/// Constrained variable names that keep their meaning and are never renamed.
pub const RESERVED_VARIABLES: [&str; 2] = ["number", "comparable"];

/// Label for the k-th newly seen variable (0-indexed).
///
/// The letter cycles through `a..z` and repeats once more per lap:
/// `a, b, …, z, aa, bb, …, zz, aaa, …`.
pub fn canonical_label(k: usize) -> String {
    // k % 26 < 26 so the cast cannot truncate
    #[allow(clippy::cast_possible_truncation)]
    let letter = char::from(b'a' + (k % 26) as u8);
    std::iter::repeat_n(letter, k / 26 + 1).collect()
}

/// Ordered original-name → canonical-name mapping for one normalization call.
#[derive(Debug, Clone)]
pub struct VariableMapping {
    pairs: Vec<(String, String)>,
    fresh: usize,
}

impl Default for VariableMapping {
    fn default() -> Self {
        Self::new()
    }
}

impl VariableMapping {
    /// A mapping seeded with the reserved names mapped to themselves.
    pub fn new() -> Self {
        Self {
            pairs: RESERVED_VARIABLES
                .iter()
                .map(|name| ((*name).to_string(), (*name).to_string()))
                .collect(),
            fresh: 0,
        }
    }

    /// Build the mapping for `tipe` by visiting its variables in traversal order.
    pub fn build(tipe: &Type) -> Self {
        let mut mapping = Self::new();
        mapping.visit(tipe);
        mapping
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(original, _)| original == name)
            .map(|(_, canonical)| canonical.as_str())
    }

    /// Pairs in insertion order, reserved seeds first.
    pub fn pairs(&self) -> impl Iterator<Item = (&str, &str)> {
        self.pairs.iter().map(|(a, b)| (a.as_str(), b.as_str()))
    }

    fn insert(&mut self, name: &str) {
        if self.get(name).is_none() {
            self.pairs
                .push((name.to_string(), canonical_label(self.fresh)));
            self.fresh += 1;
        }
    }

    fn visit(&mut self, tipe: &Type) {
        match tipe {
            Type::Function { params, result } => {
                for param in params {
                    self.visit(param);
                }
                self.visit(result);
            }
            Type::Variable { name } => self.insert(name),
            Type::Apply { args, .. } => {
                for arg in args {
                    self.visit(arg);
                }
            }
            Type::Tuple { elements } => {
                for element in elements {
                    self.visit(element);
                }
            }
            // the extension variable is left alone
            Type::Record { fields, .. } => {
                for (_, field) in fields {
                    self.visit(field);
                }
            }
        }
    }

    fn rewrite(&self, tipe: &Type) -> Type {
        match tipe {
            Type::Function { params, result } => Type::Function {
                params: params.iter().map(|p| self.rewrite(p)).collect(),
                result: Box::new(self.rewrite(result)),
            },
            Type::Variable { name } => Type::Variable {
                name: self.get(name).unwrap_or(name.as_str()).to_string(),
            },
            Type::Apply { name, args } => Type::Apply {
                name: name.clone(),
                args: args.iter().map(|a| self.rewrite(a)).collect(),
            },
            Type::Tuple { elements } => Type::Tuple {
                elements: elements.iter().map(|e| self.rewrite(e)).collect(),
            },
            Type::Record { fields, extension } => Type::Record {
                fields: fields
                    .iter()
                    .map(|(label, field)| (label.clone(), self.rewrite(field)))
                    .collect(),
                extension: extension.clone(),
            },
        }
    }
}

/// Rename every free variable of `tipe` to its canonical label.
pub fn normalize(tipe: &Type) -> Type {
    VariableMapping::build(tipe).rewrite(tipe)
}
