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

//! Errors used in this crate.
//! We are using `error-chain` so if you are using it too you can just add a link for this crate's
//! errors.

use std::error::Error;

error_chain! {
    types {
        XmlError, XmlErrorKind, ResultExt, XmlResult;
    }

    foreign_links {
        Io(::std::io::Error);
        Xpath(::sxd_xpath::Error);
        XpathParse(::sxd_xpath::ParserError);
        XpathExecution(::sxd_xpath::ExecutionError);
    }

    errors {
        /// The document could not be parsed.
        /// The String variant contains the parser's diagnostic.
        ParseXml(info: String) {
            description("XML document could not be parsed.")
            display("XML document could not be parsed: {}", info)
        }

        /// The raw data was not in an encoding we can decode.
        InvalidEncoding(info: String) {
            description("XML data is not in a supported encoding.")
            display("XML data is not in a supported encoding: {}", info)
        }

        /// A CSS selector could not be translated to XPath.
        InvalidSelector(selector: String, reason: String) {
            description("Invalid CSS selector.")
            display("Invalid CSS selector '{}': {}", selector, reason)
        }

        /// XPath expression failed to evaluate to a value.
        /// The String variant contains a copy of the XPath expression.
        NodeNotFound(xpath: String) {
            description("XPath expression didn't yield a node.")
            display("XPath expression '{}' failed to find a node.", xpath)
        }

        /// The XPath expression was empty.
        EmptyXPath(xpath: String) {
            description("XPath expression is empty.")
            display("XPath expression '{}' is empty.", xpath)
        }

        /// Conversion from XML failed,
        /// used for custom failures in `FromXml` implementations.
        FromXmlError(err: Box<dyn Error + Send>) {
            description("Conversion from XML failed.")
            display("Conversion from XML failed: {}", err)
        }

        MissingValue(info: String) {
            description("A required value was missing in the document.")
            display("A required value was missing from the document: {}", info)
        }
    }
}

macro_rules! from_xml_error {
    ( $( $type:ty );* ; ) => {
        $(
            impl From<$type> for XmlError {
                fn from(err: $type) -> XmlError {
                    XmlErrorKind::FromXmlError(Box::new(err)).into()
                }
            }
        )*
    }
}

from_xml_error!(
    ::std::str::ParseBoolError;
    ::std::num::ParseIntError;
    ::std::num::ParseFloatError;
    ::chrono::ParseError;
);
