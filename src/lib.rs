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

//! Walk and query XML documents with XPath and CSS selectors.
//!
//! This crate is mostly a wrapper around the crates
//! [sxd_document](https://github.com/shepmaster/sxd-document) and
//! [sxd_xpath](https://github.com/shepmaster/sxd-xpath). CSS selectors are
//! translated to XPath expressions before evaluation.
//!
//! # Examples
//! ```
//! use std::ops::ControlFlow;
//! use xmlwalk::{Searching, XmlDocument};
//!
//! let xml = r#"<?xml version="1.0"?>
//! <nutrition>
//!   <daily-values><total-fat units="g">65</total-fat></daily-values>
//!   <food><name>Avocado Dip</name><serving units="g">29</serving></food>
//! </nutrition>"#;
//!
//! let document = XmlDocument::parse(xml).unwrap();
//! let root = document.root_element().unwrap();
//! assert_eq!(root.tag(), "nutrition");
//!
//! let fat = root.child_at(0).unwrap().child_at(0).unwrap();
//! assert_eq!(fat.number_value(), Some(65.0));
//! assert_eq!(fat.value_for_attribute("units"), Some("g"));
//!
//! let mut names = Vec::new();
//! document
//!     .enumerate_elements_with_xpath("//food/name", |element, _| {
//!         names.push(element.string_value());
//!         ControlFlow::Continue(())
//!     })
//!     .unwrap();
//! assert_eq!(names, vec!["Avocado Dip".to_string()]);
//!
//! let servings = document.css("food > serving[units]").unwrap();
//! assert_eq!(servings[0].to_string(), r#"<serving units="g">29</serving>"#);
//!
//! let serving: f64 = document.read("//food/serving").unwrap();
//! assert_eq!(serving, 29.0);
//! ```

#[macro_use]
extern crate error_chain;

pub mod errors;
pub use self::errors::{XmlError, XmlErrorKind, XmlResult};

pub mod context;
pub use self::context::Context;

pub mod css;

pub mod document;
pub use self::document::XmlDocument;

pub mod element;
pub use self::element::XmlElement;

pub mod expression;
pub use self::expression::XPathExpression;

pub mod reader;
pub use self::reader::{Evaluation, FromXml};

pub mod search;
pub use self::search::Searching;

pub mod nutrition;

mod util;
mod writer;
