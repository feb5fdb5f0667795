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

//! Query configuration shared by a document and its elements.

use std::collections::BTreeMap;
use sxd_xpath::Context as XpathContext;

/// Namespace prefixes available to XPath and CSS queries.
///
/// XPath 1.0 has no notion of a default namespace, so elements in a
/// namespace can only be selected through a prefix registered here.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Context {
    namespaces: BTreeMap<String, String>,
}

impl Context {
    pub fn new() -> Self {
        Context::default()
    }

    /// Register `prefix` as an alias for the namespace `uri`, replacing any
    /// previous registration of the prefix.
    pub fn set_namespace(&mut self, prefix: &str, uri: &str) {
        self.namespaces.insert(prefix.to_string(), uri.to_string());
    }

    pub fn namespace(&self, prefix: &str) -> Option<&str> {
        self.namespaces.get(prefix).map(String::as_str)
    }

    pub fn namespaces(&self) -> impl Iterator<Item = (&str, &str)> {
        self.namespaces
            .iter()
            .map(|(prefix, uri)| (prefix.as_str(), uri.as_str()))
    }

    pub(crate) fn xpath_context<'d>(&self) -> XpathContext<'d> {
        let mut context = XpathContext::new();
        for (prefix, uri) in self.namespaces() {
            context.set_namespace(prefix, uri);
        }
        context
    }
}
