//! Substitution templates such as "{0} meters" or "{0} per {1}"

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// One piece of a template
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    Literal(String),
    Placeholder(usize),
}

/// A parsed substitution template
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Template {
    segments: Vec<Segment>,
}

impl Template {
    /// Parse a template. A `{n}` with a decimal index is a placeholder;
    /// any other brace is literal text.
    pub fn parse(source: &str) -> Self {
        let mut segments = Vec::new();
        let mut literal = String::new();
        let mut rest = source;

        while let Some(open) = rest.find('{') {
            let after = &rest[open + 1..];
            let placeholder = after
                .find('}')
                .and_then(|close| after[..close].parse::<usize>().ok().map(|index| (index, close)));

            match placeholder {
                Some((index, close)) => {
                    literal.push_str(&rest[..open]);
                    if !literal.is_empty() {
                        segments.push(Segment::Literal(std::mem::take(&mut literal)));
                    }
                    segments.push(Segment::Placeholder(index));
                    rest = &after[close + 1..];
                }
                None => {
                    literal.push_str(&rest[..=open]);
                    rest = after;
                }
            }
        }
        literal.push_str(rest);
        if !literal.is_empty() {
            segments.push(Segment::Literal(literal));
        }

        Template { segments }
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn has_placeholder(&self) -> bool {
        self.segments.iter().any(|s| matches!(s, Segment::Placeholder(_)))
    }

    /// Substitute `args[n]` for each `{n}`. Missing arguments render empty.
    pub fn substitute(&self, args: &[&str]) -> String {
        let mut out = String::new();
        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => out.push_str(text),
                Segment::Placeholder(index) => {
                    if let Some(arg) = args.get(*index) {
                        out.push_str(arg);
                    }
                }
            }
        }
        out
    }

    /// The literal text with placeholders removed and whitespace trimmed,
    /// e.g. "{0} meters" gives "meters".
    pub fn literal_text(&self) -> String {
        let text: String = self
            .segments
            .iter()
            .filter_map(|s| match s {
                Segment::Literal(text) => Some(text.as_str()),
                Segment::Placeholder(_) => None,
            })
            .collect();
        text.trim().to_string()
    }

    /// Replace the unit text of a single-placeholder template, keeping the
    /// placeholder and the separator next to it. "{0} meters" with
    /// "kilometers" gives "{0} kilometers".
    pub fn with_unit_text(&self, text: &str) -> Template {
        let position = self.segments.iter().position(|s| matches!(s, Segment::Placeholder(_)));
        let placeholder_first = match position {
            Some(0) => true,
            Some(_) => false,
            None => return Template::parse(text),
        };

        let spaced = self.segments.iter().any(|s| match s {
            Segment::Literal(literal) => literal.starts_with(char::is_whitespace) || literal.ends_with(char::is_whitespace),
            Segment::Placeholder(_) => false,
        });
        let separator = self
            .segments
            .iter()
            .find_map(|s| match s {
                Segment::Literal(literal) if placeholder_first => literal.chars().next().filter(|c| c.is_whitespace()),
                Segment::Literal(literal) => literal.chars().last().filter(|c| c.is_whitespace()),
                Segment::Placeholder(_) => None,
            })
            .map(|c| c.to_string())
            .unwrap_or_else(|| if spaced { " ".to_string() } else { String::new() });

        let segments = if placeholder_first {
            vec![Segment::Placeholder(0), Segment::Literal(format!("{}{}", separator, text))]
        } else {
            vec![Segment::Literal(format!("{}{}", text, separator)), Segment::Placeholder(0)]
        };
        Template { segments }
    }

    /// Merge a prefix or power template ("kilo{0}", "square {0}") onto unit
    /// text. When the prefix joins the unit without whitespace the unit text
    /// is lower-cased so the pair reads as one word.
    pub fn adjoin(&self, unit_text: &str) -> String {
        let mut out = String::new();
        for (i, segment) in self.segments.iter().enumerate() {
            match segment {
                Segment::Literal(text) => out.push_str(text),
                Segment::Placeholder(_) => {
                    let joined_before = i > 0
                        && matches!(&self.segments[i - 1], Segment::Literal(t) if !t.ends_with(char::is_whitespace));
                    if joined_before {
                        out.push_str(&unit_text.to_lowercase());
                    } else {
                        out.push_str(unit_text);
                    }
                }
            }
        }
        out.trim().to_string()
    }
}

impl fmt::Display for Template {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => write!(f, "{}", text)?,
                Segment::Placeholder(index) => write!(f, "{{{}}}", index)?,
            }
        }
        Ok(())
    }
}

impl Serialize for Template {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Template {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Ok(Template::parse(&s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_and_substitute() {
        let t = Template::parse("{0} per {1}");
        assert_eq!(t.segments().len(), 3);
        assert_eq!(t.substitute(&["5 meters", "second"]), "5 meters per second");
    }

    #[test]
    fn test_literal_braces_survive() {
        let t = Template::parse("{x} {0}");
        assert_eq!(t.substitute(&["1"]), "{x} 1");
    }

    #[test]
    fn test_literal_text() {
        assert_eq!(Template::parse("{0} meters").literal_text(), "meters");
        assert_eq!(Template::parse("hour").literal_text(), "hour");
        assert!(!Template::parse("hour").has_placeholder());
    }

    #[test]
    fn test_with_unit_text() {
        let t = Template::parse("{0} meters");
        assert_eq!(t.with_unit_text("kilometers").to_string(), "{0} kilometers");

        let t = Template::parse("{0}m");
        assert_eq!(t.with_unit_text("km").to_string(), "{0}km");

        let t = Template::parse("Quadrat {0}");
        assert_eq!(t.with_unit_text("x").to_string(), "x {0}");
    }

    #[test]
    fn test_adjoin() {
        assert_eq!(Template::parse("kilo{0}").adjoin("meters"), "kilometers");
        assert_eq!(Template::parse("Quadrat{0}").adjoin("Meter"), "Quadratmeter");
        assert_eq!(Template::parse("square {0}").adjoin("meters"), "square meters");
        assert_eq!(Template::parse("{0}²").adjoin("m"), "m²");
    }
}
