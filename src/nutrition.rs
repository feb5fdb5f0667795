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

//! Reading the daily values table of a nutrition document.
//!
//! The document element's first child holds one element per nutrient, the
//! amount as text and the unit in a `units` attribute:
//!
//! ```xml
//! <nutrition>
//!   <daily-values>
//!     <total-fat units="g">65</total-fat>
//!   </daily-values>
//! </nutrition>
//! ```

use crate::document::XmlDocument;
use crate::element::XmlElement;
use crate::errors::{XmlErrorKind, XmlResult};
use std::fmt;
use tracing::trace;

/// The recommended daily amount of one nutrient.
#[derive(Clone, Debug, PartialEq)]
pub struct DailyValue<'d> {
    pub nutrient: &'d str,
    pub amount: f64,
    pub unit: &'d str,
}

impl<'d> DailyValue<'d> {
    /// Read a daily value from a nutrient element.
    pub fn from_element(element: XmlElement<'d>) -> XmlResult<Self> {
        let nutrient = element.tag();
        let amount = element.number_value().ok_or_else(|| {
            XmlErrorKind::MissingValue(format!("numeric amount of <{}>", nutrient))
        })?;
        let unit = element.value_for_attribute("units").ok_or_else(|| {
            XmlErrorKind::MissingValue(format!("'units' attribute of <{}>", nutrient))
        })?;
        trace!(nutrient, amount, unit, "read daily value");
        Ok(DailyValue {
            nutrient,
            amount,
            unit,
        })
    }
}

impl<'d> fmt::Display for DailyValue<'d> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "- {}{} {}", self.amount, self.unit, self.nutrient)
    }
}

/// The daily values listed in the first child of the document element.
///
/// A document without such a child has no daily values.
pub fn daily_values(document: &XmlDocument) -> XmlResult<Vec<DailyValue<'_>>> {
    let table = match document.root_element().and_then(|root| root.child_at(0)) {
        Some(table) => table,
        None => return Ok(Vec::new()),
    };
    table
        .children()
        .into_iter()
        .map(DailyValue::from_element)
        .collect()
}
