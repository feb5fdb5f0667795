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

//! Parsed XML documents.

use crate::context::Context;
use crate::element::XmlElement;
use crate::errors::{XmlError, XmlErrorKind, XmlResult};
use crate::search::Searching;
use crate::writer;
use std::fmt;
use sxd_document::dom::{self, ChildOfRoot};
use sxd_document::parser::parse as sxd_parse;
use sxd_document::Package;
use sxd_xpath::nodeset::Node;
use tracing::debug;

const DEFAULT_VERSION: &str = "1.0";
const DEFAULT_ENCODING: &str = "UTF-8";

/// An XML document, owning its tree.
///
/// Elements borrow from the document they were found in, the document
/// therefore has to outlive every `XmlElement` obtained from it.
pub struct XmlDocument {
    package: Package,
    context: Context,
    version: String,
    encoding: String,
}

impl XmlDocument {
    /// Parse a document from its text.
    pub fn parse(xml: &str) -> XmlResult<Self> {
        let xml = xml.trim_start_matches('\u{feff}');
        let package = sxd_parse(xml)
            .map_err(|e| XmlError::from(XmlErrorKind::ParseXml(format!("{:?}", e))))?;

        let has_root = package
            .as_document()
            .root()
            .children()
            .iter()
            .any(|child| matches!(child, ChildOfRoot::Element(_)));
        if !has_root {
            return Err(XmlErrorKind::ParseXml("document has no root element".into()).into());
        }

        let (version, encoding) = declaration(xml);
        debug!(
            version = version.unwrap_or(DEFAULT_VERSION),
            encoding = encoding.unwrap_or(DEFAULT_ENCODING),
            "parsed xml document"
        );

        Ok(XmlDocument {
            package,
            context: Context::default(),
            version: version.unwrap_or(DEFAULT_VERSION).to_string(),
            encoding: encoding.unwrap_or(DEFAULT_ENCODING).to_string(),
        })
    }

    /// Parse a document from raw data.
    ///
    /// UTF-8 is assumed unless the data starts with a UTF-16 byte order mark.
    pub fn from_bytes(data: &[u8]) -> XmlResult<Self> {
        match data {
            [0xff, 0xfe, rest @ ..] => Self::parse(&decode_utf16(rest, u16::from_le_bytes)?),
            [0xfe, 0xff, rest @ ..] => Self::parse(&decode_utf16(rest, u16::from_be_bytes)?),
            _ => {
                let data = data.strip_prefix(&[0xef, 0xbb, 0xbf]).unwrap_or(data);
                let xml = std::str::from_utf8(data).map_err(|e| {
                    XmlError::from(XmlErrorKind::InvalidEncoding(format!("invalid UTF-8: {}", e)))
                })?;
                Self::parse(xml)
            }
        }
    }

    /// The XML version from the declaration, `1.0` if there is none.
    pub fn version(&self) -> &str {
        &self.version
    }

    /// The encoding from the declaration, `UTF-8` if there is none.
    pub fn encoding(&self) -> &str {
        &self.encoding
    }

    pub fn context(&self) -> &Context {
        &self.context
    }

    /// Register a namespace prefix for use in queries on this document.
    pub fn set_namespace(&mut self, prefix: &str, uri: &str) {
        self.context.set_namespace(prefix, uri);
    }

    /// The document element.
    pub fn root_element(&self) -> Option<XmlElement<'_>> {
        self.dom()
            .root()
            .children()
            .into_iter()
            .find_map(|child| match child {
                ChildOfRoot::Element(element) => Some(XmlElement::new(self, element)),
                _ => None,
            })
    }

    pub(crate) fn dom(&self) -> dom::Document<'_> {
        self.package.as_document()
    }
}

impl<'d> Searching<'d> for &'d XmlDocument {
    fn document(self) -> &'d XmlDocument {
        self
    }

    fn anchor(self) -> Node<'d> {
        Node::Root(self.dom().root())
    }
}

impl fmt::Debug for XmlDocument {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("XmlDocument")
            .field("version", &self.version)
            .field("encoding", &self.encoding)
            .field("root", &self.root_element().map(|e| e.tag()))
            .finish()
    }
}

impl fmt::Display for XmlDocument {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(
            f,
            r#"<?xml version="{}" encoding="{}"?>"#,
            self.version, self.encoding
        )?;
        match self.root_element() {
            Some(root) => writer::write_element(f, root.dom()),
            None => Ok(()),
        }
    }
}

fn decode_utf16(data: &[u8], word: fn([u8; 2]) -> u16) -> XmlResult<String> {
    if data.len() % 2 != 0 {
        return Err(XmlErrorKind::InvalidEncoding("truncated UTF-16 data".into()).into());
    }
    let units = data.chunks_exact(2).map(|pair| word([pair[0], pair[1]]));
    char::decode_utf16(units)
        .collect::<Result<String, _>>()
        .map_err(|e| XmlErrorKind::InvalidEncoding(format!("invalid UTF-16: {}", e)).into())
}

/// Extracts version and encoding from the XML declaration, if any.
fn declaration(xml: &str) -> (Option<&str>, Option<&str>) {
    let rest = match xml.strip_prefix("<?xml") {
        Some(rest) if rest.starts_with(char::is_whitespace) => rest,
        _ => return (None, None),
    };
    let decl = match rest.find("?>") {
        Some(end) => &rest[..end],
        None => return (None, None),
    };
    (
        pseudo_attribute(decl, "version"),
        pseudo_attribute(decl, "encoding"),
    )
}

fn pseudo_attribute<'a>(decl: &'a str, name: &str) -> Option<&'a str> {
    for (start, _) in decl.match_indices(name) {
        let rest = decl[start + name.len()..].trim_start();
        let rest = match rest.strip_prefix('=') {
            Some(rest) => rest.trim_start(),
            None => continue,
        };
        let quote = match rest.chars().next() {
            Some(q @ '"') | Some(q @ '\'') => q,
            _ => continue,
        };
        let value = &rest[1..];
        if let Some(end) = value.find(quote) {
            return Some(&value[..end]);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn declaration_values() {
        let doc = XmlDocument::parse(
            r#"<?xml version="1.1" encoding='ISO-8859-1'?><root/>"#,
        )
        .unwrap();
        assert_eq!(doc.version(), "1.1");
        assert_eq!(doc.encoding(), "ISO-8859-1");
    }

    #[test]
    fn declaration_defaults() {
        let doc = XmlDocument::parse("<root/>").unwrap();
        assert_eq!(doc.version(), "1.0");
        assert_eq!(doc.encoding(), "UTF-8");
        assert_eq!(doc.root_element().unwrap().tag(), "root");
    }

    #[test]
    fn malformed_document() {
        let err = XmlDocument::parse("<root><child></root>").unwrap_err();
        match *err.kind() {
            XmlErrorKind::ParseXml(_) => {}
            ref other => panic!("unexpected error kind: {:?}", other),
        }
    }

    #[test]
    fn bytes_with_utf8_bom() {
        let mut data = vec![0xef, 0xbb, 0xbf];
        data.extend_from_slice(br#"<?xml version="1.0"?><root>caf&#233;</root>"#);
        let doc = XmlDocument::from_bytes(&data).unwrap();
        assert_eq!(doc.root_element().unwrap().string_value(), "café");
    }

    #[test]
    fn bytes_utf16() {
        let text = "<root>hi</root>";
        let mut le = vec![0xff, 0xfe];
        let mut be = vec![0xfe, 0xff];
        for unit in text.encode_utf16() {
            le.extend_from_slice(&unit.to_le_bytes());
            be.extend_from_slice(&unit.to_be_bytes());
        }
        for data in &[le, be] {
            let doc = XmlDocument::from_bytes(data).unwrap();
            assert_eq!(doc.root_element().unwrap().string_value(), "hi");
        }
    }

    #[test]
    fn bytes_invalid() {
        let err = XmlDocument::from_bytes(&[b'<', 0xc3, 0x28]).unwrap_err();
        match *err.kind() {
            XmlErrorKind::InvalidEncoding(_) => {}
            ref other => panic!("unexpected error kind: {:?}", other),
        }
    }

    #[test]
    fn display_writes_declaration() {
        let doc = XmlDocument::parse(r#"<root a="1"><b>x &amp; y</b></root>"#).unwrap();
        assert_eq!(
            doc.to_string(),
            "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<root a=\"1\"><b>x &amp; y</b></root>"
        );
    }
}
