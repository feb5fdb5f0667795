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

use std::ops::Deref;

/// Either an owned value or a borrow of one, for types that can't be
/// cloned and therefore don't fit into a `Cow`.
#[derive(Debug)]
pub(crate) enum MaybeOwned<'a, T: 'a> {
    Owned(T),
    Borrowed(&'a T),
}

impl<'a, T> Deref for MaybeOwned<'a, T> {
    type Target = T;

    fn deref(&self) -> &T {
        match *self {
            MaybeOwned::Owned(ref v) => v,
            MaybeOwned::Borrowed(v) => v,
        }
    }
}

impl<'a, T> MaybeOwned<'a, T> {
    /// Borrow the held value, whichever way it is held.
    pub fn reborrow(&self) -> MaybeOwned<'_, T> {
        MaybeOwned::Borrowed(&**self)
    }
}

/// Escape text for use in XML character data or attribute values.
pub(crate) fn escape_xml(s: &str, quote: bool) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' if quote => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}
