//! Grammar trees for compound units
//!
//! A parsed unit becomes a tree of `GrammarNode`s: products fold right into
//! `Times`, powered tokens become `Power`, prefixed tokens the locale has no
//! direct pattern for become `Prefix`, and quotients become `Per`. Grammar
//! resolution then assigns every unit a case and plural category from the
//! locale's compound rules.

use mensura_locale::{CompoundKind, GrammaticalCase, GrammaticalFeatures, PluralCategory};
use mensura_units::parse::{ParsedUnit, Token};
use mensura_units::prefix;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "node", rename_all = "snake_case")]
pub enum GrammarNode {
    Unit { name: String },
    Times { left: Box<GrammarNode>, right: Box<GrammarNode> },
    Power { power: String, inner: Box<GrammarNode> },
    Prefix { prefix: String, inner: Box<GrammarNode> },
    /// An empty numerator ("per_second") has no left side
    Per { numerator: Option<Box<GrammarNode>>, denominator: Box<GrammarNode> },
}

/// Case and plural category assigned to a node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Features {
    pub case: GrammaticalCase,
    pub plural: PluralCategory,
}

impl GrammarNode {
    pub fn unit(name: impl Into<String>) -> Self {
        GrammarNode::Unit { name: name.into() }
    }

    /// Build the tree. `known` reports whether the locale has patterns for a
    /// name; such names are kept whole instead of being split into prefix
    /// and unit.
    pub fn from_parsed(parsed: &ParsedUnit, known: &dyn Fn(&str) -> bool) -> Self {
        let numerator = fold_times(parsed.numerator(), known);
        match parsed {
            ParsedUnit::Product(_) => numerator.unwrap_or_else(|| GrammarNode::unit("")),
            ParsedUnit::Per { denominator, .. } => GrammarNode::Per {
                numerator: numerator.map(Box::new),
                denominator: Box::new(fold_times(denominator, known).unwrap_or_else(|| GrammarNode::unit(""))),
            },
        }
    }

    /// Flatten into `(unit name, features)` pairs in reading order, resolving
    /// features from the top-level case and plural category.
    pub fn resolve(&self, features: &GrammaticalFeatures, top: Features) -> Vec<(String, Features)> {
        let mut out = Vec::new();
        self.resolve_into(features, top, &mut out);
        out
    }

    fn resolve_into(&self, rules: &GrammaticalFeatures, at: Features, out: &mut Vec<(String, Features)>) {
        match self {
            GrammarNode::Unit { name } => out.push((name.clone(), at)),
            GrammarNode::Times { left, right } => {
                let [l, r] = operand_features(rules, CompoundKind::Times, at);
                left.resolve_into(rules, l, out);
                right.resolve_into(rules, r, out);
            }
            GrammarNode::Power { power, inner } => {
                let [p, i] = operand_features(rules, CompoundKind::Power, at);
                out.push((power.clone(), p));
                inner.resolve_into(rules, i, out);
            }
            GrammarNode::Prefix { prefix, inner } => {
                let [p, i] = operand_features(rules, CompoundKind::Prefix, at);
                out.push((prefix.clone(), p));
                inner.resolve_into(rules, i, out);
            }
            GrammarNode::Per { numerator, denominator } => {
                let [n, d] = operand_features(rules, CompoundKind::Per, at);
                if let Some(numerator) = numerator {
                    numerator.resolve_into(rules, n, out);
                }
                denominator.resolve_into(rules, d, out);
            }
        }
    }
}

/// Left and right operand features of a compound
pub fn operand_features(rules: &GrammaticalFeatures, kind: CompoundKind, at: Features) -> [Features; 2] {
    let cases = rules.case.get(kind);
    let plurals = rules.plural.get(kind);
    [0, 1].map(|i| Features {
        case: cases[i].resolve(at.case),
        plural: plurals[i].resolve(at.plural),
    })
}

/// [a, b, c] -> Times(a, Times(b, c))
fn fold_times(tokens: &[Token], known: &dyn Fn(&str) -> bool) -> Option<GrammarNode> {
    let mut nodes: Vec<GrammarNode> = tokens.iter().map(|t| token_node(&t.name, known)).collect();
    let mut tree = nodes.pop()?;
    while let Some(left) = nodes.pop() {
        tree = GrammarNode::Times {
            left: Box::new(left),
            right: Box::new(tree),
        };
    }
    Some(tree)
}

fn token_node(name: &str, known: &dyn Fn(&str) -> bool) -> GrammarNode {
    if known(name) {
        return GrammarNode::unit(name);
    }
    if let Some((marker, rest)) = name.split_once('_') {
        if let Some(exp) = prefix::power_exponent(marker) {
            let power = prefix::power_name(exp).unwrap_or(marker);
            return GrammarNode::Power {
                power: power.to_string(),
                inner: Box::new(token_node(rest, known)),
            };
        }
    }
    if let Some((p, rest)) = prefix::split_prefix(name, |r| known(r)) {
        return GrammarNode::Prefix {
            prefix: p.name.to_string(),
            inner: Box::new(token_node(rest, known)),
        };
    }
    GrammarNode::unit(name)
}
