//! Inline style declarations.
//!
//! A deliberately small reader/writer for `style="..."` attributes and
//! stylesheet declaration blocks. It splits on `;` outside parentheses and
//! quotes (so `url(data:...;base64,...)` survives), keeps declaration order,
//! and tracks `!important` so rewrites preserve the author's priority.

use kuchiki::NodeRef;

use super::node_util::{attr, remove_attr, set_attr};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyleDeclaration {
    /// Lowercased property name
    pub name: String,
    pub value: String,
    pub important: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InlineStyle {
    declarations: Vec<StyleDeclaration>,
}

impl InlineStyle {
    /// Parse a declaration list such as `color: red; font-size: 12px !important`
    pub fn parse(css: &str) -> Self {
        let declarations = split_declarations(css)
            .into_iter()
            .filter_map(|raw| {
                let (name, value) = raw.split_once(':')?;
                let name = name.trim().to_ascii_lowercase();
                if name.is_empty() {
                    return None;
                }
                let (value, important) = strip_important(value.trim());
                Some(StyleDeclaration {
                    name,
                    value: value.to_string(),
                    important,
                })
            })
            .collect();
        Self { declarations }
    }

    /// Read the `style` attribute of an element (empty for non-elements)
    pub fn of(node: &NodeRef) -> Self {
        attr(node, "style")
            .map(|css| Self::parse(&css))
            .unwrap_or_default()
    }

    /// Write the declarations back to the element's `style` attribute.
    ///
    /// An empty declaration list removes the attribute.
    pub fn write_to(&self, node: &NodeRef) {
        if self.declarations.is_empty() {
            remove_attr(node, "style");
        } else {
            set_attr(node, "style", self.to_css());
        }
    }

    /// Value of the last declaration for `name`, ignoring empty values
    pub fn get(&self, name: &str) -> Option<&str> {
        self.find(name)
            .map(|decl| decl.value.as_str())
            .filter(|value| !value.is_empty())
    }

    pub fn is_important(&self, name: &str) -> bool {
        self.find(name).is_some_and(|decl| decl.important)
    }

    /// Set a property, keeping the priority it already had
    pub fn set(&mut self, name: &str, value: impl Into<String>) {
        let important = self.is_important(name);
        self.set_with_priority(name, value, important);
    }

    /// Set a property with an explicit priority
    pub fn set_with_priority(&mut self, name: &str, value: impl Into<String>, important: bool) {
        let name = name.to_ascii_lowercase();
        let value = value.into();
        // later duplicates would shadow the one we rewrite
        let mut seen = false;
        self.declarations.retain_mut(|decl| {
            if decl.name != name {
                return true;
            }
            if seen {
                return false;
            }
            seen = true;
            true
        });
        match self.declarations.iter_mut().find(|decl| decl.name == name) {
            Some(decl) => {
                decl.value = value;
                decl.important = important;
            }
            None => self.declarations.push(StyleDeclaration {
                name,
                value,
                important,
            }),
        }
    }

    pub fn remove(&mut self, name: &str) {
        let name = name.to_ascii_lowercase();
        self.declarations.retain(|decl| decl.name != name);
    }

    pub fn is_empty(&self) -> bool {
        self.declarations.is_empty()
    }

    pub fn declarations(&self) -> &[StyleDeclaration] {
        &self.declarations
    }

    pub fn to_css(&self) -> String {
        self.declarations
            .iter()
            .map(|decl| {
                if decl.important {
                    format!("{}: {} !important", decl.name, decl.value)
                } else {
                    format!("{}: {}", decl.name, decl.value)
                }
            })
            .collect::<Vec<_>>()
            .join("; ")
    }

    fn find(&self, name: &str) -> Option<&StyleDeclaration> {
        self.declarations
            .iter()
            .rev()
            .find(|decl| decl.name.eq_ignore_ascii_case(name))
    }
}

fn strip_important(value: &str) -> (&str, bool) {
    if let Some(bang) = value.rfind('!') {
        let flag = value[bang + 1..].trim();
        if flag.eq_ignore_ascii_case("important") {
            return (value[..bang].trim_end(), true);
        }
    }
    (value, false)
}

/// Split on `;` that are not inside parentheses or quotes
fn split_declarations(css: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut quote: Option<char> = None;
    let mut start = 0;
    for (idx, ch) in css.char_indices() {
        match (quote, ch) {
            (Some(q), c) if c == q => quote = None,
            (Some(_), _) => {}
            (None, '"' | '\'') => quote = Some(ch),
            (None, '(') => depth += 1,
            (None, ')') => depth = depth.saturating_sub(1),
            (None, ';') if depth == 0 => {
                parts.push(&css[start..idx]);
                start = idx + 1;
            }
            _ => {}
        }
    }
    parts.push(&css[start..]);
    parts
        .into_iter()
        .filter(|part| !part.trim().is_empty())
        .collect()
}
