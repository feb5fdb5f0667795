// Copyright 2019 The xmlwalk Developers
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//   http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Serialization of element subtrees back to XML text.

use crate::util::escape_xml;
use std::fmt::{self, Write};
use sxd_document::dom::{ChildOfElement, Element};

const XML_NAMESPACE: &str = "http://www.w3.org/XML/1998/namespace";

/// Namespace bindings already declared in the written output.
#[derive(Clone, Default)]
struct Scope {
    default_ns: Option<String>,
    prefixes: Vec<(String, String)>,
}

impl Scope {
    fn lookup(&self, prefix: &str) -> Option<&str> {
        if prefix == "xml" {
            return Some(XML_NAMESPACE);
        }
        self.prefixes
            .iter()
            .rev()
            .find(|(p, _)| p == prefix)
            .map(|(_, uri)| uri.as_str())
    }

    /// A prefix currently bound to `uri`, if any.
    fn prefix_for(&self, uri: &str) -> Option<String> {
        if uri == XML_NAMESPACE {
            return Some("xml".to_string());
        }
        self.prefixes
            .iter()
            .rev()
            .map(|(p, _)| p)
            .find(|p| self.lookup(p) == Some(uri))
            .cloned()
    }

    fn bind(&mut self, prefix: &str, uri: &str) {
        self.prefixes.push((prefix.to_string(), uri.to_string()));
    }
}

/// Write `element` and its descendants to `out`.
///
/// Namespace declarations are added wherever the written text would
/// otherwise not bind an element or attribute to its namespace.
pub(crate) fn write_element<W: Write>(out: &mut W, element: Element) -> fmt::Result {
    write_scoped(out, element, &Scope::default())
}

fn write_scoped<W: Write>(out: &mut W, element: Element, parent: &Scope) -> fmt::Result {
    let mut scope = parent.clone();
    // (prefix, uri), no prefix for the default namespace
    let mut declarations: Vec<(Option<String>, String)> = Vec::new();

    let name = element.name();
    let element_prefix = match (name.namespace_uri(), element.preferred_prefix()) {
        (Some(uri), Some(prefix)) => {
            if scope.lookup(prefix) != Some(uri) {
                scope.bind(prefix, uri);
                declarations.push((Some(prefix.to_string()), uri.to_string()));
            }
            Some(prefix.to_string())
        }
        (Some(uri), None) => {
            if scope.default_ns.as_deref() != Some(uri) {
                scope.default_ns = Some(uri.to_string());
                declarations.push((None, uri.to_string()));
            }
            None
        }
        (None, _) => {
            if scope.default_ns.is_some() {
                scope.default_ns = None;
                declarations.push((None, String::new()));
            }
            None
        }
    };

    let mut attributes = element.attributes();
    attributes.sort_by(|a, b| {
        let (a, b) = (a.name(), b.name());
        (a.local_part(), a.namespace_uri()).cmp(&(b.local_part(), b.namespace_uri()))
    });
    let mut written = Vec::with_capacity(attributes.len());
    for attribute in &attributes {
        let prefix = match attribute.name().namespace_uri() {
            None => None,
            Some(uri) => Some(attribute_prefix(
                &mut scope,
                &mut declarations,
                attribute.preferred_prefix(),
                uri,
            )),
        };
        written.push((prefix, attribute.name().local_part(), attribute.value()));
    }

    out.write_char('<')?;
    write_qualified(out, element_prefix.as_deref(), name.local_part())?;
    for (prefix, uri) in &declarations {
        match prefix {
            Some(prefix) => write!(out, r#" xmlns:{}="{}""#, prefix, escape_xml(uri, true))?,
            None => write!(out, r#" xmlns="{}""#, escape_xml(uri, true))?,
        }
    }
    for (prefix, local, value) in written {
        out.write_char(' ')?;
        write_qualified(out, prefix.as_deref(), local)?;
        write!(out, r#"="{}""#, escape_xml(value, true))?;
    }

    let children = element.children();
    if children.is_empty() {
        return out.write_str("/>");
    }
    out.write_char('>')?;

    for child in children {
        match child {
            ChildOfElement::Element(e) => write_scoped(out, e, &scope)?,
            ChildOfElement::Text(t) => out.write_str(&escape_xml(t.text(), false))?,
            ChildOfElement::Comment(c) => write!(out, "<!--{}-->", c.text())?,
            ChildOfElement::ProcessingInstruction(pi) => match pi.value() {
                Some(value) => write!(out, "<?{} {}?>", pi.target(), value)?,
                None => write!(out, "<?{}?>", pi.target())?,
            },
        }
    }

    out.write_str("</")?;
    write_qualified(out, element_prefix.as_deref(), name.local_part())?;
    out.write_char('>')
}

/// Picks the prefix for a namespaced attribute, declaring it if needed.
///
/// Attributes never use the default namespace, so one is generated when
/// neither the preferred prefix nor an existing binding can be used.
fn attribute_prefix(
    scope: &mut Scope,
    declarations: &mut Vec<(Option<String>, String)>,
    preferred: Option<&str>,
    uri: &str,
) -> String {
    if let Some(prefix) = preferred {
        if scope.lookup(prefix) == Some(uri) {
            return prefix.to_string();
        }
    }
    if let Some(prefix) = scope.prefix_for(uri) {
        return prefix;
    }
    let prefix = match preferred {
        Some(prefix) if scope.lookup(prefix).is_none() => prefix.to_string(),
        _ => (0..)
            .map(|n| format!("ns{}", n))
            .find(|p| scope.lookup(p).is_none())
            .unwrap_or_default(),
    };
    scope.bind(&prefix, uri);
    declarations.push((Some(prefix.clone()), uri.to_string()));
    prefix
}

fn write_qualified<W: Write>(out: &mut W, prefix: Option<&str>, local: &str) -> fmt::Result {
    match prefix {
        Some(prefix) => write!(out, "{}:{}", prefix, local),
        None => out.write_str(local),
    }
}

#[cfg(test)]
mod tests {
    use crate::document::XmlDocument;

    fn roundtrip(xml: &str) -> String {
        let doc = XmlDocument::parse(xml).unwrap();
        doc.root_element().unwrap().to_string()
    }

    #[test]
    fn empty_and_nested_elements() {
        assert_eq!(roundtrip("<a><b/><c>text</c></a>"), "<a><b/><c>text</c></a>");
    }

    #[test]
    fn escapes_text_and_attributes() {
        assert_eq!(
            roundtrip(r#"<a title="&quot;x&quot; &lt; y">1 &lt; 2</a>"#),
            r#"<a title="&quot;x&quot; &lt; y">1 &lt; 2</a>"#
        );
    }

    #[test]
    fn comments_and_instructions() {
        assert_eq!(
            roundtrip("<a><!-- note --><?render fast?></a>"),
            "<a><!-- note --><?render fast?></a>"
        );
    }

    #[test]
    fn default_namespace_declared_once() {
        assert_eq!(
            roundtrip(r#"<a xmlns="urn:x"><b/></a>"#),
            r#"<a xmlns="urn:x"><b/></a>"#
        );
    }

    #[test]
    fn default_namespace_undeclared() {
        let written = roundtrip(r#"<a xmlns="urn:x"><b xmlns=""/></a>"#);
        assert_eq!(written, r#"<a xmlns="urn:x"><b xmlns=""/></a>"#);

        let doc = XmlDocument::parse(&written).unwrap();
        let b = doc.root_element().unwrap().child_at(0).unwrap();
        assert_eq!(b.namespace(), None);
    }

    #[test]
    fn prefixed_attribute_declares_its_namespace() {
        let doc = XmlDocument::parse(r#"<c xmlns:x="urn:extra"><book x:rating="5"/></c>"#).unwrap();
        let book = doc.root_element().unwrap().child_at(0).unwrap();
        let written = book.to_string();
        assert_eq!(written, r#"<book xmlns:x="urn:extra" x:rating="5"/>"#);

        let reparsed = XmlDocument::parse(&written).unwrap();
        let book = reparsed.root_element().unwrap();
        assert_eq!(
            book.value_for_attribute_in_namespace("rating", "urn:extra"),
            Some("5")
        );
    }

    #[test]
    fn attribute_prefix_declared_once_per_subtree() {
        let doc = XmlDocument::parse(
            r#"<c xmlns:x="urn:extra"><shelf x:id="1"><book x:rating="5"/></shelf></c>"#,
        )
        .unwrap();
        let shelf = doc.root_element().unwrap().child_at(0).unwrap();
        assert_eq!(
            shelf.to_string(),
            r#"<shelf xmlns:x="urn:extra" x:id="1"><book x:rating="5"/></shelf>"#
        );
    }
}
