//! Literal key resolution shared by every dialect.
//!
//! Each dialect lowers the first argument of a translation call into a
//! [`KeyShape`]; [`KeyShape::candidates`] then enumerates the concrete keys
//! the argument can evaluate to. This is a static approximation: shapes we
//! cannot evaluate contribute nothing instead of failing.

/// The statically understood form of a translation key argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyShape {
    /// A string literal.
    Literal(String),
    /// `cond ? a : b` in scripts, `(if cond a b)` in templates.
    Conditional {
        consequent: Box<KeyShape>,
        alternate: Box<KeyShape>,
    },
    /// `(concat a b ...)`: every part is appended in order.
    Concat(Vec<KeyShape>),
    /// Anything we cannot evaluate (variables, calls, numbers, ...).
    Unknown,
}

impl KeyShape {
    pub fn literal(value: impl Into<String>) -> Self {
        Self::Literal(value.into())
    }

    pub fn conditional(consequent: KeyShape, alternate: KeyShape) -> Self {
        Self::Conditional {
            consequent: Box::new(consequent),
            alternate: Box::new(alternate),
        }
    }

    /// All concrete strings this shape can produce.
    ///
    /// A `Concat` yields the cartesian product of its parts, and nothing at
    /// all as soon as one part has no candidate.
    pub fn candidates(&self) -> Vec<String> {
        match self {
            KeyShape::Literal(value) => vec![value.clone()],
            KeyShape::Conditional {
                consequent,
                alternate,
            } => {
                let mut keys = consequent.candidates();
                keys.extend(alternate.candidates());
                keys
            }
            KeyShape::Concat(parts) => {
                let mut keys = vec![String::new()];
                for part in parts {
                    let fragments = part.candidates();
                    if fragments.is_empty() {
                        return Vec::new();
                    }
                    keys = keys
                        .iter()
                        .flat_map(|prefix| {
                            fragments
                                .iter()
                                .map(move |fragment| format!("{}{}", prefix, fragment))
                        })
                        .collect();
                }
                keys
            }
            KeyShape::Unknown => Vec::new(),
        }
    }
}
