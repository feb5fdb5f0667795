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

//! XPath and CSS queries on documents and elements.

use crate::document::XmlDocument;
use crate::element::XmlElement;
use crate::errors::XmlResult;
use crate::expression::XPathExpression;
use crate::reader::{Evaluation, FromXml};
use std::ops::ControlFlow;
use sxd_xpath::nodeset::Node;
use tracing::debug;

/// Queries anchored at a node of a document.
///
/// Implemented for `&XmlDocument`, where queries start at the document
/// root, and for `XmlElement`, where relative expressions and all CSS
/// selectors start at the element.
pub trait Searching<'d>: Copy {
    /// The document queried.
    fn document(self) -> &'d XmlDocument;

    /// The context node of relative expressions.
    fn anchor(self) -> Node<'d>;

    /// Evaluate an XPath expression with the document's namespace context.
    fn evaluate<'x>(self, xpath: impl Into<XPathExpression<'x>>) -> XmlResult<Evaluation<'d>> {
        let expr = xpath.into();
        let parsed = expr.parsed()?;
        let context = self.document().context().xpath_context();
        let value = parsed.evaluate(&context, self.anchor())?;
        debug!(xpath = %expr, "evaluated xpath expression");
        Ok(Evaluation::new(self.document(), expr.to_string(), value))
    }

    /// Read the result of the XPath expression into a value of type `T`.
    fn read<'x, T>(self, xpath: impl Into<XPathExpression<'x>>) -> XmlResult<T>
    where
        T: FromXml<'d>,
    {
        T::from_xml(&self.evaluate(xpath)?)
    }

    /// All elements selected by the XPath expression, in document order.
    ///
    /// Selected nodes which aren't elements, like attributes or text, are
    /// skipped.
    fn xpath<'x>(self, xpath: impl Into<XPathExpression<'x>>) -> XmlResult<Vec<XmlElement<'d>>> {
        Ok(self.evaluate(xpath)?.elements())
    }

    /// Call `f` with every element selected by the XPath expression and its
    /// index, until `f` breaks.
    fn enumerate_elements_with_xpath<'x, F>(
        self,
        xpath: impl Into<XPathExpression<'x>>,
        mut f: F,
    ) -> XmlResult<()>
    where
        F: FnMut(XmlElement<'d>, usize) -> ControlFlow<()>,
    {
        for (index, element) in self.xpath(xpath)?.into_iter().enumerate() {
            if f(element, index).is_break() {
                break;
            }
        }
        Ok(())
    }

    fn first_child_with_xpath<'x>(
        self,
        xpath: impl Into<XPathExpression<'x>>,
    ) -> XmlResult<Option<XmlElement<'d>>> {
        Ok(self.xpath(xpath)?.into_iter().next())
    }

    /// All descendant elements matching the CSS selector, in document order.
    fn css(self, selector: &str) -> XmlResult<Vec<XmlElement<'d>>> {
        self.xpath(XPathExpression::from_css(selector)?)
    }

    fn enumerate_elements_with_css<F>(self, selector: &str, f: F) -> XmlResult<()>
    where
        F: FnMut(XmlElement<'d>, usize) -> ControlFlow<()>,
    {
        self.enumerate_elements_with_xpath(XPathExpression::from_css(selector)?, f)
    }

    fn first_child_with_css(self, selector: &str) -> XmlResult<Option<XmlElement<'d>>> {
        self.first_child_with_xpath(XPathExpression::from_css(selector)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::XmlErrorKind;
    use crate::expression;

    const XML: &str = r#"<?xml version="1.0"?>
<library xmlns="urn:books">
    <shelf name="fiction">
        <book lang="en">Neuromancer</book>
        <book lang="de">Der Process</book>
    </shelf>
    <shelf name="poetry">
        <book>Leaves of Grass</book>
    </shelf>
</library>"#;

    const PLAIN: &str = r#"<?xml version="1.0"?>
<root>
    <a id="first" class="x y"><b>1</b><b>2</b></a>
    <a><b>3</b><c/></a>
</root>"#;

    fn texts(elements: &[XmlElement]) -> Vec<String> {
        elements.iter().map(|e| e.string_value()).collect()
    }

    #[test]
    fn xpath_on_document() {
        let doc = XmlDocument::parse(PLAIN).unwrap();
        assert_eq!(texts(&doc.xpath("//b").unwrap()), vec!["1", "2", "3"]);
        assert_eq!(doc.xpath("//a/@id").unwrap().len(), 0);
        assert!(doc.xpath("//b[").is_err());
    }

    #[test]
    fn xpath_relative_to_element() {
        let doc = XmlDocument::parse(PLAIN).unwrap();
        let second = doc.root_element().unwrap().child_at(1).unwrap();
        assert_eq!(texts(&second.xpath("b").unwrap()), vec!["3"]);
        assert_eq!(texts(&second.xpath("//b").unwrap()), vec!["1", "2", "3"]);
        assert_eq!(second.first_child_with_xpath("c").unwrap().unwrap().tag(), "c");
        assert!(second.first_child_with_xpath("d").unwrap().is_none());
    }

    #[test]
    fn enumerate_stops_on_break() {
        let doc = XmlDocument::parse(PLAIN).unwrap();
        let mut seen = Vec::new();
        doc.enumerate_elements_with_xpath("//b", |element, index| {
            seen.push((index, element.string_value()));
            if index == 1 {
                ControlFlow::Break(())
            } else {
                ControlFlow::Continue(())
            }
        })
        .unwrap();
        assert_eq!(seen, vec![(0, "1".to_string()), (1, "2".to_string())]);
    }

    #[test]
    fn css_queries() {
        let doc = XmlDocument::parse(PLAIN).unwrap();
        assert_eq!(texts(&doc.css("a > b").unwrap()), vec!["1", "2", "3"]);
        assert_eq!(texts(&doc.css("#first b:last-child").unwrap()), vec!["2"]);
        assert_eq!(texts(&doc.css("a.y b").unwrap()), vec!["1", "2"]);
        assert_eq!(doc.css("b + c").unwrap().len(), 1);
        assert_eq!(doc.first_child_with_css("a:not([id])").unwrap().unwrap().children().len(), 2);

        let mut count = 0;
        doc.enumerate_elements_with_css("b", |_, _| {
            count += 1;
            ControlFlow::Continue(())
        })
        .unwrap();
        assert_eq!(count, 3);
    }

    #[test]
    fn css_relative_to_element() {
        let doc = XmlDocument::parse(PLAIN).unwrap();
        let first = doc.root_element().unwrap().child_at(0).unwrap();
        assert_eq!(texts(&first.css("b").unwrap()), vec!["1", "2"]);
        assert!(first.css("a").unwrap().is_empty());
    }

    #[test]
    fn css_word_match_with_empty_value() {
        let doc = XmlDocument::parse(r#"<r><a class=""/><a/><a class="x"/></r>"#).unwrap();
        assert!(doc.css(r#"a[class~=""]"#).unwrap().is_empty());
        assert_eq!(doc.css("a[class~=x]").unwrap().len(), 1);
    }

    #[test]
    fn invalid_css() {
        let doc = XmlDocument::parse(PLAIN).unwrap();
        let err = doc.css("a >").unwrap_err();
        match *err.kind() {
            XmlErrorKind::InvalidSelector(..) => {}
            ref other => panic!("unexpected error kind: {:?}", other),
        }
    }

    #[test]
    fn namespaced_queries() {
        let mut doc = XmlDocument::parse(XML).unwrap();
        assert!(doc.xpath("//book").unwrap().is_empty());

        doc.set_namespace("b", "urn:books");
        assert_eq!(doc.xpath("//b:book").unwrap().len(), 3);
        assert_eq!(texts(&doc.css("b|shelf[name=poetry] > b|book").unwrap()), vec!["Leaves of Grass"]);
        assert_eq!(
            doc.read::<Vec<String>>("//b:book/@lang").unwrap(),
            vec!["en".to_string(), "de".to_string()]
        );
    }

    #[test]
    fn preparsed_expression() {
        let doc = XmlDocument::parse(PLAIN).unwrap();
        let expr = expression::parse("b").unwrap();
        let counts: Vec<usize> = doc
            .root_element()
            .unwrap()
            .children()
            .into_iter()
            .map(|a| a.xpath(&expr).unwrap().len())
            .collect();
        assert_eq!(counts, vec![2, 1]);
    }
}
