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

//! Conversion of XPath results into Rust values.

use crate::document::XmlDocument;
use crate::element::XmlElement;
use crate::errors::{XmlErrorKind, XmlResult};
use chrono::{DateTime, FixedOffset, NaiveDate, TimeZone};
use sxd_xpath::nodeset::{Node, Nodeset};
use sxd_xpath::Value;

/// A value that can be read from the result of an XPath query.
pub trait FromXml<'d>
where
    Self: Sized,
{
    /// Read an instance of `Self` from the provided `evaluation`.
    ///
    /// The exact semantics of when this fails or succeeds are implementor
    /// defined. However for `Option<T>` a best effort approach should
    /// be followed, returning `Ok(None)` in absence of a value instead of
    /// an error.
    fn from_xml(evaluation: &Evaluation<'d>) -> XmlResult<Self>;
}

/// The result of evaluating an XPath expression against a document.
pub struct Evaluation<'d> {
    document: &'d XmlDocument,
    xpath: String,
    value: Value<'d>,
}

impl<'d> Evaluation<'d> {
    pub(crate) fn new(document: &'d XmlDocument, xpath: String, value: Value<'d>) -> Self {
        Evaluation {
            document,
            xpath,
            value,
        }
    }

    /// The evaluated expression, for diagnostics.
    pub fn xpath(&self) -> &str {
        &self.xpath
    }

    pub fn value(&self) -> &Value<'d> {
        &self.value
    }

    /// The selected nodes in document order, empty for non node-set results.
    pub fn nodes(&self) -> Vec<Node<'d>> {
        match self.value {
            Value::Nodeset(ref nodeset) => nodeset.document_order(),
            _ => Vec::new(),
        }
    }

    /// The selected element nodes in document order.
    pub fn elements(&self) -> Vec<XmlElement<'d>> {
        self.nodes()
            .into_iter()
            .filter_map(|node| match node {
                Node::Element(element) => Some(XmlElement::new(self.document, element)),
                _ => None,
            })
            .collect()
    }

    /// The string value of the result.
    ///
    /// For node-sets this is the string value of the first node in
    /// document order, `None` if the node-set is empty.
    pub fn string(&self) -> Option<String> {
        match self.value {
            Value::Nodeset(ref nodeset) => nodeset.document_order_first().map(|n| n.string_value()),
            Value::String(ref s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            Value::Boolean(b) => Some(b.to_string()),
        }
    }

    fn single(&self, node: Node<'d>) -> Evaluation<'d> {
        let mut nodeset = Nodeset::new();
        nodeset.add(node);
        Evaluation::new(self.document, self.xpath.clone(), Value::Nodeset(nodeset))
    }

    fn not_found(&self) -> XmlErrorKind {
        XmlErrorKind::NodeNotFound(self.xpath.clone())
    }
}

impl<'d> FromXml<'d> for String {
    fn from_xml(evaluation: &Evaluation<'d>) -> XmlResult<Self> {
        evaluation.string().ok_or_else(|| evaluation.not_found().into())
    }
}

impl<'d> FromXml<'d> for Option<String> {
    fn from_xml(evaluation: &Evaluation<'d>) -> XmlResult<Self> {
        Ok(evaluation.string().filter(|s| !s.is_empty()))
    }
}

impl<'d, T> FromXml<'d> for Vec<T>
where
    T: FromXml<'d>,
{
    fn from_xml(evaluation: &Evaluation<'d>) -> XmlResult<Self> {
        match evaluation.value {
            Value::Nodeset(_) => evaluation
                .nodes()
                .into_iter()
                .map(|node| T::from_xml(&evaluation.single(node)))
                .collect(),
            _ => Ok(vec![T::from_xml(evaluation)?]),
        }
    }
}

impl<'d> FromXml<'d> for XmlElement<'d> {
    fn from_xml(evaluation: &Evaluation<'d>) -> XmlResult<Self> {
        Option::<XmlElement<'d>>::from_xml(evaluation)?.ok_or_else(|| evaluation.not_found().into())
    }
}

impl<'d> FromXml<'d> for Option<XmlElement<'d>> {
    fn from_xml(evaluation: &Evaluation<'d>) -> XmlResult<Self> {
        Ok(evaluation.elements().into_iter().next())
    }
}

impl<'d> FromXml<'d> for DateTime<FixedOffset> {
    fn from_xml(evaluation: &Evaluation<'d>) -> XmlResult<Self> {
        parse_date(&String::from_xml(evaluation)?)
    }
}

impl<'d> FromXml<'d> for Option<DateTime<FixedOffset>> {
    fn from_xml(evaluation: &Evaluation<'d>) -> XmlResult<Self> {
        Option::<String>::from_xml(evaluation)?
            .map(|s| parse_date(&s))
            .transpose()
    }
}

macro_rules! from_parse_str {
    ( $( $type:ty ),* ) => {
        $(
            impl<'d> FromXml<'d> for $type {
                fn from_xml(evaluation: &Evaluation<'d>) -> XmlResult<Self> {
                    let s = String::from_xml(evaluation)?;
                    Ok(s.trim().parse::<$type>()?)
                }
            }

            impl<'d> FromXml<'d> for Option<$type> {
                fn from_xml(evaluation: &Evaluation<'d>) -> XmlResult<Self> {
                    match Option::<String>::from_xml(evaluation)? {
                        Some(s) => Ok(Some(s.trim().parse::<$type>()?)),
                        None => Ok(None),
                    }
                }
            }
        )*
    }
}

from_parse_str!(f32, f64, u8, u16, u32, u64, i8, i16, i32, i64, bool);

/// Parse an ISO 8601 date-time. A bare date is taken as midnight UTC.
pub(crate) fn parse_date(s: &str) -> XmlResult<DateTime<FixedOffset>> {
    let s = s.trim();
    if let Ok(date) = DateTime::parse_from_rfc3339(s) {
        return Ok(date);
    }
    if let Ok(date) = DateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%z") {
        return Ok(date);
    }
    let midnight = NaiveDate::parse_from_str(s, "%Y-%m-%d")?
        .and_hms_opt(0, 0, 0)
        .ok_or_else(|| XmlErrorKind::MissingValue(format!("time of day for '{}'", s)))?;
    let utc = FixedOffset::east_opt(0)
        .ok_or_else(|| XmlErrorKind::MissingValue("UTC offset".into()))?;
    Ok(utc.from_utc_datetime(&midnight))
}
