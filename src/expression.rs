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

//! XPath expression convenience typing.
//!
//! Provides a way to pass both pre-parsed and unparsed expressions
//! as parameter to the query methods.

use crate::css;
use crate::errors::{XmlErrorKind, XmlResult};
use crate::util::MaybeOwned;
use std::borrow::Cow;
use std::fmt;
use sxd_xpath::{Factory, XPath};

/// An XPath expression that can be evaluated on documents.
///
/// `From` implementations exist so you can pass strings as XPath
/// expressions directly. However for better performance in repeated
/// evaluation of the same XPath expression, you should use the module level
/// function `expression::parse` so it will be parsed exactly once.
#[derive(Debug)]
pub struct XPathExpression<'a>(Repr<'a>);

/// Parse an expression in advance, this can be useful
/// if you want to avoid an XPath expression being parsed
/// on every invocation.
pub fn parse(xpath_expr: &str) -> XmlResult<XPathExpression<'static>> {
    let xpath = parse_xpath(xpath_expr)?;
    Ok(XPathExpression(Repr::Parsed {
        xpath: MaybeOwned::Owned(xpath),
        source: Some(Cow::Owned(xpath_expr.to_string())),
    }))
}

#[derive(Debug)]
enum Repr<'a> {
    Parsed {
        xpath: MaybeOwned<'a, XPath>,
        source: Option<Cow<'a, str>>,
    },
    Unparsed(Cow<'a, str>),
}

impl<'a> XPathExpression<'a> {
    /// Translate a CSS selector into an (unparsed) XPath expression.
    pub fn from_css(selector: &str) -> XmlResult<XPathExpression<'static>> {
        css::to_xpath(selector).map(|x| XPathExpression(Repr::Unparsed(Cow::Owned(x))))
    }

    pub(crate) fn parsed(&self) -> XmlResult<MaybeOwned<'_, XPath>> {
        match self.0 {
            Repr::Parsed { ref xpath, .. } => Ok(xpath.reborrow()),
            Repr::Unparsed(ref s) => parse_xpath(s).map(MaybeOwned::Owned),
        }
    }

    /// The source text of the expression, if it is known.
    pub fn source(&self) -> Option<&str> {
        match self.0 {
            Repr::Parsed { ref source, .. } => source.as_deref(),
            Repr::Unparsed(ref s) => Some(s),
        }
    }
}

impl<'a> fmt::Display for XPathExpression<'a> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match (self.source(), &self.0) {
            (Some(s), _) => f.write_str(s),
            (None, Repr::Parsed { xpath, .. }) => write!(f, "{:?}", &**xpath),
            (None, Repr::Unparsed(s)) => f.write_str(s),
        }
    }
}

impl From<XPath> for XPathExpression<'static> {
    fn from(xpath: XPath) -> Self {
        XPathExpression(Repr::Parsed {
            xpath: MaybeOwned::Owned(xpath),
            source: None,
        })
    }
}

impl<'a> From<&'a XPath> for XPathExpression<'a> {
    fn from(xpath: &'a XPath) -> Self {
        XPathExpression(Repr::Parsed {
            xpath: MaybeOwned::Borrowed(xpath),
            source: None,
        })
    }
}

impl<'a> From<&'a str> for XPathExpression<'a> {
    fn from(s: &'a str) -> Self {
        XPathExpression(Repr::Unparsed(Cow::Borrowed(s)))
    }
}

impl<'a> From<&'a String> for XPathExpression<'a> {
    fn from(s: &'a String) -> Self {
        XPathExpression(Repr::Unparsed(Cow::Borrowed(s.as_str())))
    }
}

impl<'a> From<String> for XPathExpression<'a> {
    fn from(s: String) -> Self {
        XPathExpression(Repr::Unparsed(Cow::Owned(s)))
    }
}

impl<'a> From<&'a XPathExpression<'a>> for XPathExpression<'a> {
    fn from(x: &'a XPathExpression<'a>) -> Self {
        match x.0 {
            Repr::Parsed {
                ref xpath,
                ref source,
            } => XPathExpression(Repr::Parsed {
                xpath: xpath.reborrow(),
                source: source.as_deref().map(Cow::Borrowed),
            }),
            Repr::Unparsed(ref s) => XPathExpression(Repr::Unparsed(Cow::Borrowed(&**s))),
        }
    }
}

fn parse_xpath(xpath_expr: &str) -> XmlResult<XPath> {
    Factory::new()
        .build(xpath_expr)?
        .ok_or_else(|| XmlErrorKind::EmptyXPath(xpath_expr.to_string()).into())
}
