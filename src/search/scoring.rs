//! Structural comparison of type trees.
//!
//! Two independent metrics are provided. [`similarity`] is higher-is-better and is the
//! default ranking function; [`distance`] is lower-is-better. A session ranks with
//! exactly one of them, selected by [`Metric`].

use crate::signature::Type;
use serde::{Deserialize, Serialize};

/// Score for identical names.
const EXACT_MATCH: i32 = 10;
/// Score for names where one contains the other.
const PARTIAL_MATCH: i32 = 1;
/// Score for a variable instantiated to a nullary constructor.
const INSTANTIATION: i32 = 1;

/// Penalty between two unrelated variable names.
const VARIABLE_MISMATCH: i32 = 5;
/// Penalty between two unrelated constructor names.
const NAME_MISMATCH: i32 = 2;
/// Penalty per missing/extra parameter, and for applications of different arity.
const ARITY_MISMATCH: i32 = 10;
/// Penalty for structurally unrelated types.
pub(crate) const SHAPE_MISMATCH: i32 = 100;

/// The ranking function used by a session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Metric {
    #[default]
    Similarity,
    Distance,
}

fn name_similarity(a: &str, b: &str) -> i32 {
    if a == b {
        EXACT_MATCH
    } else if a.contains(b) || b.contains(a) {
        PARTIAL_MATCH
    } else {
        0
    }
}

fn name_distance(a: &str, b: &str, mismatch: i32) -> i32 {
    if a == b {
        0
    } else if a.contains(b) || b.contains(a) {
        1
    } else {
        mismatch
    }
}

fn same_shape(a: &Type, b: &Type) -> bool {
    std::mem::discriminant(a) == std::mem::discriminant(b)
}

#[derive(Clone, Copy)]
enum Side {
    Left,
    Right,
}

/// Variables of each side bound to the subtree they were first compared against.
#[derive(Default)]
struct Bindings<'a> {
    left: Vec<(&'a str, &'a Type)>,
    right: Vec<(&'a str, &'a Type)>,
}

impl<'a> Bindings<'a> {
    fn side(&mut self, side: Side) -> &mut Vec<(&'a str, &'a Type)> {
        match side {
            Side::Left => &mut self.left,
            Side::Right => &mut self.right,
        }
    }

    /// A variable meeting a non-variable subtree below the root.
    ///
    /// The first meeting binds the variable (credited only for nullary
    /// constructors); later meetings score as an exact match when they agree with
    /// that binding.
    fn instantiate(&mut self, side: Side, variable: &'a str, concrete: &'a Type) -> i32 {
        let bound = self.side(side);
        match bound.iter().find(|(name, _)| *name == variable) {
            Some((_, previous)) if *previous == concrete => EXACT_MATCH,
            Some(_) => 0,
            None => {
                bound.push((variable, concrete));
                match concrete {
                    Type::Apply { args, .. } if args.is_empty() => INSTANTIATION,
                    _ => 0,
                }
            }
        }
    }

    fn compare(&mut self, a: &'a Type, b: &'a Type) -> i32 {
        match (a, b) {
            (
                Type::Function {
                    params: params_a,
                    result: result_a,
                },
                Type::Function {
                    params: params_b,
                    result: result_b,
                },
            ) => {
                if params_a.len() != params_b.len() {
                    return 0;
                }
                let params: i32 = params_a
                    .iter()
                    .zip(params_b)
                    .map(|(x, y)| self.compare(x, y))
                    .sum();
                params + self.compare(result_a, result_b)
            }
            (Type::Variable { name: x }, Type::Variable { name: y }) => name_similarity(x, y),
            (
                Type::Apply {
                    name: name_a,
                    args: args_a,
                },
                Type::Apply {
                    name: name_b,
                    args: args_b,
                },
            ) => {
                if args_a.len() != args_b.len() {
                    return 0;
                }
                let args: i32 = args_a
                    .iter()
                    .zip(args_b)
                    .map(|(x, y)| self.compare(x, y))
                    .sum();
                name_similarity(&name_a.name, &name_b.name) + args
            }
            (Type::Tuple { elements: xs }, Type::Tuple { elements: ys }) => {
                xs.iter().zip(ys).map(|(x, y)| self.compare(x, y)).sum()
            }
            (Type::Variable { name }, concrete) => self.instantiate(Side::Left, name, concrete),
            (concrete, Type::Variable { name }) => self.instantiate(Side::Right, name, concrete),
            _ => 0,
        }
    }
}

/// How alike two types are; higher is better and 0 means no match.
///
/// Differently shaped roots never match. Below the root, a type variable facing a
/// concrete subtree is treated as an instantiation of that variable.
pub fn similarity(a: &Type, b: &Type) -> i32 {
    if !same_shape(a, b) {
        return 0;
    }
    Bindings::default().compare(a, b)
}

/// How far apart two types are; lower is better and 0 means identical.
pub fn distance(a: &Type, b: &Type) -> i32 {
    match (a, b) {
        (
            Type::Function {
                params: params_a,
                result: result_a,
            },
            Type::Function {
                params: params_b,
                result: result_b,
            },
        ) => {
            if params_a.len() != params_b.len() {
                let missing = params_a.len().abs_diff(params_b.len());
                return ARITY_MISMATCH.saturating_mul(i32::try_from(missing).unwrap_or(i32::MAX));
            }
            let params: i32 = params_a
                .iter()
                .zip(params_b)
                .map(|(x, y)| distance(x, y))
                .sum();
            params + distance(result_a, result_b)
        }
        (Type::Variable { name: x }, Type::Variable { name: y }) => {
            name_distance(x, y, VARIABLE_MISMATCH)
        }
        (
            Type::Apply {
                name: name_a,
                args: args_a,
            },
            Type::Apply {
                name: name_b,
                args: args_b,
            },
        ) => {
            if args_a.is_empty() && args_b.is_empty() {
                name_distance(&name_a.name, &name_b.name, NAME_MISMATCH)
            } else if args_a.len() == args_b.len() {
                let args: i32 = args_a.iter().zip(args_b).map(|(x, y)| distance(x, y)).sum();
                name_distance(&name_a.home, &name_b.home, NAME_MISMATCH)
                    + name_distance(&name_a.name, &name_b.name, NAME_MISMATCH)
                    + args
            } else {
                ARITY_MISMATCH
            }
        }
        (Type::Tuple { elements: xs }, Type::Tuple { elements: ys }) => {
            xs.iter().zip(ys).map(|(x, y)| distance(x, y)).sum()
        }
        _ => SHAPE_MISMATCH,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::signature::{normalize, parse};
    use assert2::check;
    use rstest::rstest;

    fn sim(a: &str, b: &str) -> i32 {
        similarity(&parse(a), &parse(b))
    }

    fn dist(a: &str, b: &str) -> i32 {
        distance(&parse(a), &parse(b))
    }

    #[rstest]
    #[case("a", "a", 10)]
    #[case("a", "ab", 1)]
    #[case("a", "b", 0)]
    #[case("Int", "Int", 10)]
    #[case("Int", "Integer", 1)]
    #[case("Int", "Float", 0)]
    #[case("a -> b", "a -> b", 20)]
    #[case("a -> b -> c", "a -> b", 0)]
    #[case("a -> b -> c", "a -> (b -> c)", 30)]
    #[case("Maybe a", "Maybe a", 20)]
    #[case("Maybe a", "Result a b", 0)]
    #[case("Maybe Int", "Maybe Float", 10)]
    #[case("(a, b)", "(a, b, c)", 20)]
    #[case("{ x : Int }", "{ x : Int }", 0)]
    #[case("a", "Int", 0)]
    #[case("Int", "a -> a", 0)]
    fn test_similarity(#[case] a: &str, #[case] b: &str, #[case] expected: i32) {
        check!(sim(a, b) == expected);
    }

    #[rstest]
    #[case("a -> a", "Int -> Int", 11)]
    #[case("a -> a", "List a -> a", 10)]
    #[case("a -> a", "Int -> String", 1)]
    #[case("List a -> List a", "List Int -> List Int", 31)]
    fn test_similarity_instantiates_nested_variables(
        #[case] a: &str,
        #[case] b: &str,
        #[case] expected: i32,
    ) {
        check!(sim(a, b) == expected);
    }

    #[rstest]
    #[case("a -> b -> a", "Int -> String -> Int")]
    #[case("List a -> Maybe b", "List (Maybe a) -> Maybe Int")]
    #[case("(a, Int)", "(String, b)")]
    #[case("Dict k v", "Dict String (List v)")]
    #[case("Maybe a", "Result a b")]
    #[case("a", "Int")]
    #[case("a -> b", "(a, b)")]
    fn test_similarity_is_symmetric(#[case] a: &str, #[case] b: &str) {
        check!(sim(a, b) == sim(b, a));
    }

    #[rstest]
    #[case("a", "b", 5)]
    #[case("a", "ab", 1)]
    #[case("Int", "Float", 2)]
    #[case("Int", "Integer", 1)]
    #[case("a -> b -> c", "a -> b", 10)]
    #[case("a -> b -> c -> d", "a -> b", 20)]
    #[case("Maybe a", "Result a b", 10)]
    #[case("Maybe a", "Maybe b", 5)]
    #[case("Maybe.Maybe a", "Maybe a", 1)]
    #[case("(a, b)", "(a, c)", 5)]
    #[case("a", "Int", 100)]
    #[case("{ x : Int }", "{ x : Int }", 100)]
    fn test_distance(#[case] a: &str, #[case] b: &str, #[case] expected: i32) {
        check!(dist(a, b) == expected);
    }

    #[rstest]
    #[case("a")]
    #[case("Int")]
    #[case("(a -> b) -> List a -> List b")]
    #[case("Dict.Dict comparable (Maybe v)")]
    #[case("(Int, String, a)")]
    fn test_distance_to_self_is_zero(#[case] signature: &str) {
        let tipe = normalize(&parse(signature));
        check!(distance(&tipe, &tipe) == 0);
    }

    #[test]
    fn test_metric_deserializes_lowercase() {
        #[derive(Deserialize)]
        struct Wrapper {
            metric: Metric,
        }
        let wrapper: Wrapper = toml::from_str("metric = \"distance\"").unwrap();
        check!(wrapper.metric == Metric::Distance);
    }
}
