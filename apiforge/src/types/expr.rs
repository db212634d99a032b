//! Declared type expressions (`Map<String, List<Order>>`)

/// A raw type name with its generic arguments
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeExpr {
    /// Raw name as written, possibly qualified
    pub raw: String,
    /// Generic arguments
    pub arguments: Vec<TypeExpr>,
}

impl TypeExpr {
    /// Parse a declared type
    ///
    /// Parsing is lenient: an unbalanced `<` takes the rest of the input as
    /// its argument list. Wildcards reduce to their bound, a bare `?` to the
    /// root object class.
    #[must_use]
    pub fn parse(input: &str) -> Self {
        let input = strip_wildcard(input.trim());

        let Some(open) = input.find('<') else {
            return Self {
                raw: input.to_string(),
                arguments: Vec::new(),
            };
        };

        let close = input.rfind('>').filter(|close| *close > open).unwrap_or(input.len());
        let inner = &input[open + 1..close];

        Self {
            raw: input[..open].trim().to_string(),
            arguments: split_top_level(inner)
                .into_iter()
                .filter(|part| !part.trim().is_empty())
                .map(Self::parse)
                .collect(),
        }
    }
}

fn strip_wildcard(input: &str) -> &str {
    if input == "?" {
        return "java.lang.Object";
    }
    input
        .strip_prefix("? extends ")
        .or_else(|| input.strip_prefix("? super "))
        .map_or(input, str::trim)
}

fn split_top_level(inner: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;

    for (index, ch) in inner.char_indices() {
        match ch {
            '<' => depth += 1,
            '>' => depth = depth.saturating_sub(1),
            ',' if depth == 0 => {
                parts.push(&inner[start..index]);
                start = index + 1;
            }
            _ => {}
        }
    }
    parts.push(&inner[start..]);
    parts
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(name: &str) -> TypeExpr {
        TypeExpr {
            raw: name.to_string(),
            arguments: Vec::new(),
        }
    }

    #[test]
    fn test_parse_simple() {
        assert_eq!(TypeExpr::parse(" Long "), raw("Long"));
    }

    #[test]
    fn test_parse_nested() {
        let parsed = TypeExpr::parse("Map<String, List<com.x.Order>>");
        assert_eq!(parsed.raw, "Map");
        assert_eq!(parsed.arguments.len(), 2);
        assert_eq!(parsed.arguments[0], raw("String"));
        assert_eq!(parsed.arguments[1].raw, "List");
        assert_eq!(parsed.arguments[1].arguments, vec![raw("com.x.Order")]);
    }

    #[test]
    fn test_parse_wildcards() {
        let parsed = TypeExpr::parse("List<? extends Number>");
        assert_eq!(parsed.arguments, vec![raw("Number")]);
        let parsed = TypeExpr::parse("Set<?>");
        assert_eq!(parsed.arguments, vec![raw("java.lang.Object")]);
    }

    #[test]
    fn test_parse_unbalanced() {
        let parsed = TypeExpr::parse("List<Order");
        assert_eq!(parsed.raw, "List");
        assert_eq!(parsed.arguments, vec![raw("Order")]);
    }

    #[test]
    fn test_parse_empty_arguments() {
        let parsed = TypeExpr::parse("List<>");
        assert_eq!(parsed.raw, "List");
        assert!(parsed.arguments.is_empty());
    }
}
