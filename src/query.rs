use super::*;

/// Structured lookup rule for the target side of one field synchronization.
///
/// The original mechanism interpolated attribute values into a CSS selector
/// string; here the rule is explicit data evaluated with plain
/// attribute-equality checks, so attribute content can never change the
/// shape of the query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum FieldQuery {
    Input {
        name: String,
        // The target's `type` attribute must equal the source's, with
        // both-absent counting as equal.
        input_type: Option<String>,
        // When present, narrows a radio/checkbox group to the one option
        // carrying the same `value` attribute.
        value: Option<String>,
    },
    Textarea {
        name: String,
    },
}

impl FieldQuery {
    pub(crate) fn matches(&self, element: &Element) -> bool {
        match self {
            Self::Input {
                name,
                input_type,
                value,
            } => {
                element.tag_name.eq_ignore_ascii_case("input")
                    && element.attrs.get("name").map(String::as_str) == Some(name.as_str())
                    && element.attrs.get("type") == input_type.as_ref()
                    && value
                        .as_ref()
                        .is_none_or(|expected| element.attrs.get("value") == Some(expected))
            }
            Self::Textarea { name } => {
                element.tag_name.eq_ignore_ascii_case("textarea")
                    && element.attrs.get("name").map(String::as_str) == Some(name.as_str())
            }
        }
    }

    /// First matching element among the container's descendants, in document
    /// order. Further matches are deliberately ignored.
    pub(crate) fn find_first(&self, dom: &Dom, container: NodeId) -> Option<NodeId> {
        let mut candidates = Vec::new();
        dom.collect_descendant_elements(container, &mut candidates);
        candidates
            .into_iter()
            .find(|node| dom.element(*node).is_some_and(|element| self.matches(element)))
    }
}

impl fmt::Display for FieldQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Input {
                name,
                input_type,
                value,
            } => {
                match input_type {
                    Some(kind) => write!(f, "input[type={kind}]")?,
                    None => write!(f, "input:not([type])")?,
                }
                write!(f, "[name={name}]")?;
                if let Some(value) = value {
                    write!(f, "[value={value}]")?;
                }
                Ok(())
            }
            Self::Textarea { name } => write!(f, "textarea[name={name}]"),
        }
    }
}
