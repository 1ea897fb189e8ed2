// Element selectors for UI snapshots
//
// A small CSS-like subset that covers how SceneGraph trees are usually
// addressed:
//
//   Label                      tag
//   *                          any element
//   #title                     name="title"
//   [focused="true"]           attribute equals
//   [text*="Movie"]            attribute contains
//   [bounds]                   attribute present
//   HomeScene Label#title      descendant combinator

use std::fmt;
use std::iter::Peekable;
use std::str::{Chars, FromStr};

use crate::error::CoreError;

use super::node::UiNode;

#[derive(Debug, Clone, PartialEq, Eq)]
enum AttrTest {
    Exists,
    Equals(String),
    Contains(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct AttrCondition {
    name: String,
    test: AttrTest,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Compound {
    tag: Option<String>,
    conditions: Vec<AttrCondition>,
}

impl Compound {
    fn matches(&self, node: &UiNode) -> bool {
        if self.tag.as_deref().is_some_and(|t| t != node.tag) {
            return false;
        }
        self.conditions.iter().all(|c| {
            let value = node.attribute(&c.name);
            match &c.test {
                AttrTest::Exists => value.is_some(),
                AttrTest::Equals(expected) => value == Some(expected.as_str()),
                AttrTest::Contains(needle) => value.is_some_and(|v| v.contains(needle.as_str())),
            }
        })
    }
}

/// Parsed element selector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selector {
    source: String,
    compounds: Vec<Compound>,
}

impl Selector {
    pub fn parse(input: &str) -> Result<Self, CoreError> {
        let invalid = |reason: &str| CoreError::InvalidSelector {
            selector: input.to_owned(),
            reason: reason.to_owned(),
        };

        let mut chars = input.trim().chars().peekable();
        let mut compounds = Vec::new();
        loop {
            while chars.next_if(|c| c.is_whitespace()).is_some() {}
            if chars.peek().is_none() {
                break;
            }
            compounds.push(parse_compound(&mut chars).map_err(|r| invalid(&r))?);
        }

        if compounds.is_empty() {
            return Err(invalid("empty selector"));
        }
        Ok(Self {
            source: input.trim().to_owned(),
            compounds,
        })
    }

    /// First match in document order.
    pub fn find<'a>(&self, root: &'a UiNode) -> Option<&'a UiNode> {
        let mut found = None;
        self.walk(root, &mut Vec::new(), &mut |n| {
            found = Some(n);
            false
        });
        found
    }

    /// Every match in document order.
    pub fn find_all<'a>(&self, root: &'a UiNode) -> Vec<&'a UiNode> {
        let mut found = Vec::new();
        self.walk(root, &mut Vec::new(), &mut |n| {
            found.push(n);
            true
        });
        found
    }

    /// Depth-first walk; `visit` returns `false` to stop early.
    fn walk<'a>(
        &self,
        node: &'a UiNode,
        ancestors: &mut Vec<&'a UiNode>,
        visit: &mut dyn FnMut(&'a UiNode) -> bool,
    ) -> bool {
        if self.matches(node, ancestors) && !visit(node) {
            return false;
        }
        ancestors.push(node);
        for child in &node.children {
            if !self.walk(child, ancestors, visit) {
                ancestors.pop();
                return false;
            }
        }
        ancestors.pop();
        true
    }

    /// Right-to-left match; greedy is exact for descendant-only chains.
    fn matches(&self, node: &UiNode, ancestors: &[&UiNode]) -> bool {
        let Some((last, rest)) = self.compounds.split_last() else {
            return false;
        };
        if !last.matches(node) {
            return false;
        }
        let mut remaining = ancestors.iter().rev();
        rest.iter()
            .rev()
            .all(|compound| remaining.any(|a| compound.matches(a)))
    }
}

impl FromStr for Selector {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

// ── Parser ──────────────────────────────────────────────────────────

fn is_ident_char(c: char) -> bool {
    c.is_alphanumeric() || matches!(c, '_' | '-' | ':' | '.')
}

fn read_ident(chars: &mut Peekable<Chars<'_>>) -> String {
    let mut ident = String::new();
    while let Some(c) = chars.next_if(|c| is_ident_char(*c)) {
        ident.push(c);
    }
    ident
}

fn skip_ws(chars: &mut Peekable<Chars<'_>>) {
    while chars.next_if(|c| c.is_whitespace()).is_some() {}
}

fn parse_compound(chars: &mut Peekable<Chars<'_>>) -> Result<Compound, String> {
    let mut compound = Compound {
        tag: None,
        conditions: Vec::new(),
    };
    let mut universal = false;

    if chars.next_if_eq(&'*').is_some() {
        universal = true;
    } else {
        let tag = read_ident(chars);
        if !tag.is_empty() {
            compound.tag = Some(tag);
        }
    }

    loop {
        match chars.peek().copied() {
            Some('#') => {
                chars.next();
                let name = read_ident(chars);
                if name.is_empty() {
                    return Err("expected a name after '#'".into());
                }
                compound.conditions.push(AttrCondition {
                    name: "name".into(),
                    test: AttrTest::Equals(name),
                });
            }
            Some('[') => {
                chars.next();
                compound.conditions.push(parse_attribute(chars)?);
            }
            None => break,
            Some(c) if c.is_whitespace() => break,
            Some(c) => return Err(format!("unexpected character '{c}'")),
        }
    }

    if compound.tag.is_none() && compound.conditions.is_empty() && !universal {
        return Err("expected a tag, '*', '#name' or '[attribute]'".into());
    }
    Ok(compound)
}

fn parse_attribute(chars: &mut Peekable<Chars<'_>>) -> Result<AttrCondition, String> {
    skip_ws(chars);
    let name = read_ident(chars);
    if name.is_empty() {
        return Err("expected an attribute name after '['".into());
    }
    skip_ws(chars);

    let test = match chars.next() {
        Some(']') => return Ok(AttrCondition { name, test: AttrTest::Exists }),
        Some('=') => AttrTest::Equals(parse_value(chars)?),
        Some('*') if chars.next_if_eq(&'=').is_some() => AttrTest::Contains(parse_value(chars)?),
        Some(c) => return Err(format!("unexpected character '{c}' in attribute test")),
        None => return Err("unterminated '['".into()),
    };

    skip_ws(chars);
    if chars.next_if_eq(&']').is_none() {
        return Err("expected ']'".into());
    }
    Ok(AttrCondition { name, test })
}

fn parse_value(chars: &mut Peekable<Chars<'_>>) -> Result<String, String> {
    skip_ws(chars);
    let mut value = String::new();
    match chars.peek().copied() {
        Some(quote @ ('"' | '\'')) => {
            chars.next();
            loop {
                match chars.next() {
                    Some(c) if c == quote => return Ok(value),
                    Some(c) => value.push(c),
                    None => return Err("unterminated quoted value".into()),
                }
            }
        }
        _ => {
            while let Some(c) = chars.next_if(|c| *c != ']') {
                value.push(c);
            }
            Ok(value.trim_end().to_owned())
        }
    }
}
