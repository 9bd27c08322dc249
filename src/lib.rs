//! Deterministic, browser-free synchronization of a prefixed "screen" form
//! into its "print" rendering, driven entirely in-process for tests.

use std::collections::HashMap;
use std::error::Error as StdError;
use std::fmt;

mod dom_tree;
mod form_controls;
mod html;
mod query;
mod sync;


pub(crate) use query::FieldQuery;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    HtmlParse(String),
    ContainerNotFound(String),
    ElementNotFound(String),
    EmptyPrefix,
    Dom(String),
    TypeMismatch {
        id: String,
        expected: String,
        actual: String,
    },
    AssertionFailed {
        id: String,
        expected: String,
        actual: String,
    },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::HtmlParse(msg) => write!(f, "html parse error: {msg}"),
            Self::ContainerNotFound(id) => write!(f, "sync container not found: #{id}"),
            Self::ElementNotFound(id) => write!(f, "element not found: #{id}"),
            Self::EmptyPrefix => write!(f, "sync prefix must not be empty"),
            Self::Dom(msg) => write!(f, "dom error: {msg}"),
            Self::TypeMismatch {
                id,
                expected,
                actual,
            } => write!(
                f,
                "type mismatch for #{id}: expected {expected}, actual {actual}"
            ),
            Self::AssertionFailed {
                id,
                expected,
                actual,
            } => write!(
                f,
                "assertion failed for #{id}: expected {expected}, actual {actual}"
            ),
        }
    }
}

impl StdError for Error {}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct NodeId(pub(crate) usize);

#[derive(Debug, Clone)]
pub(crate) enum NodeType {
    Document,
    Element(Element),
    Text(String),
}

#[derive(Debug, Clone)]
pub(crate) struct Node {
    pub(crate) parent: Option<NodeId>,
    pub(crate) children: Vec<NodeId>,
    pub(crate) node_type: NodeType,
}

// `value` and `checked` hold the live control state. It starts from the
// parsed attributes but diverges as soon as the document is interacted with;
// the attributes themselves stay as parsed.
#[derive(Debug, Clone)]
pub(crate) struct Element {
    pub(crate) tag_name: String,
    pub(crate) attrs: HashMap<String, String>,
    pub(crate) value: String,
    pub(crate) checked: bool,
    pub(crate) disabled: bool,
    pub(crate) readonly: bool,
}

#[derive(Debug, Clone)]
pub(crate) struct Dom {
    pub(crate) nodes: Vec<Node>,
    pub(crate) root: NodeId,
    pub(crate) id_index: HashMap<String, Vec<NodeId>>,
}

/// A parsed document holding a screen form and its print rendering, with the
/// one-directional field synchronizer and a small interaction surface for
/// driving live control state from tests.
pub struct FormDocument {
    dom: Dom,
    warnings: Vec<String>,
    warn_to_stderr: bool,
}

impl FormDocument {
    pub fn from_html(html: &str) -> Result<Self> {
        let dom = html::parse_html(html)?;
        Ok(Self {
            dom,
            warnings: Vec::new(),
            warn_to_stderr: true,
        })
    }

    pub fn take_warnings(&mut self) -> Vec<String> {
        std::mem::take(&mut self.warnings)
    }

    pub fn set_warn_stderr(&mut self, enabled: bool) {
        self.warn_to_stderr = enabled;
    }

    pub fn type_text(&mut self, id: &str, text: &str) -> Result<()> {
        let target = self.node_by_id(id)?;
        if self.dom.disabled(target) {
            return Ok(());
        }
        if self.dom.readonly(target) {
            return Ok(());
        }

        let tag = self
            .dom
            .tag_name(target)
            .unwrap_or_default()
            .to_ascii_lowercase();
        if tag != "input" && tag != "textarea" {
            return Err(Error::TypeMismatch {
                id: id.to_string(),
                expected: "input or textarea".into(),
                actual: tag,
            });
        }

        self.dom.set_value(target, text)
    }

    pub fn set_checked(&mut self, id: &str, checked: bool) -> Result<()> {
        let target = self.node_by_id(id)?;
        if self.dom.disabled(target) {
            return Ok(());
        }

        let tag = self
            .dom
            .tag_name(target)
            .unwrap_or_default()
            .to_ascii_lowercase();
        if tag != "input" {
            return Err(Error::TypeMismatch {
                id: id.to_string(),
                expected: "input[type=checkbox|radio]".into(),
                actual: tag,
            });
        }

        let kind = self
            .dom
            .attr(target, "type")
            .unwrap_or_default()
            .to_ascii_lowercase();
        if kind != "checkbox" && kind != "radio" {
            return Err(Error::TypeMismatch {
                id: id.to_string(),
                expected: "input[type=checkbox|radio]".into(),
                actual: format!("input[type={kind}]"),
            });
        }

        self.dom.set_checked(target, checked)
    }

    pub fn select_option(&mut self, id: &str, value: &str) -> Result<()> {
        let target = self.node_by_id(id)?;
        if self.dom.disabled(target) {
            return Ok(());
        }

        let tag = self
            .dom
            .tag_name(target)
            .unwrap_or_default()
            .to_ascii_lowercase();
        if tag != "select" {
            return Err(Error::TypeMismatch {
                id: id.to_string(),
                expected: "select".into(),
                actual: tag,
            });
        }

        self.dom.set_select_value(target, value)
    }

    pub fn value(&self, id: &str) -> Result<String> {
        let target = self.node_by_id(id)?;
        self.dom.value(target)
    }

    pub fn checked(&self, id: &str) -> Result<bool> {
        let target = self.node_by_id(id)?;
        self.dom.checked(target)
    }

    pub fn assert_value(&self, id: &str, expected: &str) -> Result<()> {
        let actual = self.value(id)?;
        if actual != expected {
            return Err(Error::AssertionFailed {
                id: id.to_string(),
                expected: expected.to_string(),
                actual,
            });
        }
        Ok(())
    }

    pub fn assert_checked(&self, id: &str, expected: bool) -> Result<()> {
        let actual = self.checked(id)?;
        if actual != expected {
            return Err(Error::AssertionFailed {
                id: id.to_string(),
                expected: expected.to_string(),
                actual: actual.to_string(),
            });
        }
        Ok(())
    }

    pub(crate) fn node_by_id(&self, id: &str) -> Result<NodeId> {
        self.dom
            .by_id(id)
            .ok_or_else(|| Error::ElementNotFound(id.to_string()))
    }

    pub(crate) fn warn_line(&mut self, line: String) {
        if self.warn_to_stderr {
            eprintln!("{line}");
        }
        self.warnings.push(line);
    }
}
