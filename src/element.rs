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

//! Elements of a parsed document.

use crate::document::XmlDocument;
use crate::reader::parse_date;
use crate::search::Searching;
use crate::writer;
use chrono::{DateTime, FixedOffset};
use std::collections::BTreeMap;
use std::fmt;
use sxd_document::dom::{self, ChildOfElement, ParentOfChild};
use sxd_document::QName;
use sxd_xpath::nodeset::Node;

/// An element node, borrowed from its document.
#[derive(Clone, Copy)]
pub struct XmlElement<'d> {
    document: &'d XmlDocument,
    element: dom::Element<'d>,
}

impl<'d> XmlElement<'d> {
    pub(crate) fn new(document: &'d XmlDocument, element: dom::Element<'d>) -> Self {
        XmlElement { document, element }
    }

    pub(crate) fn dom(&self) -> dom::Element<'d> {
        self.element
    }

    /// The document containing this element.
    pub fn document(&self) -> &'d XmlDocument {
        self.document
    }

    /// The local name of the element.
    pub fn tag(&self) -> &'d str {
        self.element.name().local_part()
    }

    /// The namespace URI of the element, if it is in one.
    pub fn namespace(&self) -> Option<&'d str> {
        self.element.name().namespace_uri()
    }

    /// All attributes of the element, keyed by local name.
    pub fn attributes(&self) -> BTreeMap<&'d str, &'d str> {
        self.element
            .attributes()
            .into_iter()
            .map(|a| (a.name().local_part(), a.value()))
            .collect()
    }

    /// The value of the attribute `name` that is in no namespace.
    pub fn value_for_attribute(&self, name: &str) -> Option<&'d str> {
        self.element.attribute_value(QName::new(name))
    }

    pub fn value_for_attribute_in_namespace(&self, name: &str, namespace: &str) -> Option<&'d str> {
        self.element
            .attribute_value(QName::with_namespace_uri(Some(namespace), name))
    }

    /// The parent element, `None` for the document element.
    pub fn parent(&self) -> Option<XmlElement<'d>> {
        match self.element.parent()? {
            ParentOfChild::Element(parent) => Some(XmlElement::new(self.document, parent)),
            ParentOfChild::Root(_) => None,
        }
    }

    /// The child elements in document order.
    ///
    /// Text, comments and processing instructions are skipped.
    pub fn children(&self) -> Vec<XmlElement<'d>> {
        self.element
            .children()
            .into_iter()
            .filter_map(|child| match child {
                ChildOfElement::Element(e) => Some(XmlElement::new(self.document, e)),
                _ => None,
            })
            .collect()
    }

    pub fn previous_sibling(&self) -> Option<XmlElement<'d>> {
        let siblings = self.parent()?.children();
        let position = siblings.iter().position(|s| s == self)?;
        position.checked_sub(1).map(|i| siblings[i])
    }

    pub fn next_sibling(&self) -> Option<XmlElement<'d>> {
        let siblings = self.parent()?.children();
        let position = siblings.iter().position(|s| s == self)?;
        siblings.get(position + 1).copied()
    }

    pub fn first_child_with_tag(&self, tag: &str) -> Option<XmlElement<'d>> {
        self.children().into_iter().find(|c| c.tag() == tag)
    }

    pub fn first_child_with_tag_in_namespace(
        &self,
        tag: &str,
        namespace: &str,
    ) -> Option<XmlElement<'d>> {
        self.children()
            .into_iter()
            .find(|c| c.tag() == tag && c.namespace() == Some(namespace))
    }

    pub fn children_with_tag(&self, tag: &str) -> Vec<XmlElement<'d>> {
        self.children()
            .into_iter()
            .filter(|c| c.tag() == tag)
            .collect()
    }

    pub fn children_with_tag_in_namespace(&self, tag: &str, namespace: &str) -> Vec<XmlElement<'d>> {
        self.children()
            .into_iter()
            .filter(|c| c.tag() == tag && c.namespace() == Some(namespace))
            .collect()
    }

    /// Whether the element has no text content besides whitespace.
    pub fn is_blank(&self) -> bool {
        self.string_value().trim().is_empty()
    }

    /// The text content of the element and all its descendants.
    pub fn string_value(&self) -> String {
        Node::Element(self.element).string_value()
    }

    /// The text content parsed as a number, `None` if it isn't one.
    pub fn number_value(&self) -> Option<f64> {
        self.string_value()
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|n| n.is_finite())
    }

    /// The text content parsed as an ISO 8601 date, `None` if it isn't one.
    pub fn date_value(&self) -> Option<DateTime<FixedOffset>> {
        parse_date(&self.string_value()).ok()
    }

    /// The child element at `index`.
    pub fn child_at(&self, index: usize) -> Option<XmlElement<'d>> {
        self.children().get(index).copied()
    }

    /// Shorthand for `value_for_attribute`.
    pub fn get(&self, key: &str) -> Option<&'d str> {
        self.value_for_attribute(key)
    }
}

impl<'d> Searching<'d> for XmlElement<'d> {
    fn document(self) -> &'d XmlDocument {
        self.document
    }

    fn anchor(self) -> Node<'d> {
        Node::Element(self.element)
    }
}

impl<'d> PartialEq for XmlElement<'d> {
    fn eq(&self, other: &Self) -> bool {
        self.element == other.element
    }
}

impl<'d> fmt::Debug for XmlElement<'d> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("XmlElement")
            .field("tag", &self.tag())
            .field("namespace", &self.namespace())
            .field("attributes", &self.attributes())
            .finish()
    }
}

impl<'d> fmt::Display for XmlElement<'d> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writer::write_element(f, self.element)
    }
}
