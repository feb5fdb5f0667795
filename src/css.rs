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

//! Translation of CSS selectors into XPath 1.0 expressions.
//!
//! Selectors are never matched directly, they are rewritten into an XPath
//! expression relative to the context node and evaluated by `sxd_xpath`.
//! The resulting expression selects descendants of the context node, so
//! `food > name` becomes `.//food/name`.

use crate::errors::{XmlErrorKind, XmlResult};
use tracing::trace;

/// Translate a CSS selector (or a comma separated group of selectors) into
/// an equivalent XPath expression.
pub fn to_xpath(selector: &str) -> XmlResult<String> {
    let xpath = Parser::new(selector).selector_group()?;
    trace!(selector, xpath = %xpath, "translated css selector");
    Ok(xpath)
}

#[derive(Clone, Copy, Debug, PartialEq)]
enum Combinator {
    Descendant,
    Child,
    Adjacent,
    Sibling,
}

/// A compound selector: a name test and the conditions applied to it.
struct Compound {
    name: String,
    conditions: Vec<String>,
}

impl Compound {
    fn step(&self) -> String {
        let mut step = self.name.clone();
        for condition in &self.conditions {
            step.push('[');
            step.push_str(condition);
            step.push(']');
        }
        step
    }
}

struct Parser<'s> {
    selector: &'s str,
    chars: Vec<char>,
    pos: usize,
}

impl<'s> Parser<'s> {
    fn new(selector: &'s str) -> Self {
        Parser {
            selector,
            chars: selector.chars().collect(),
            pos: 0,
        }
    }

    fn error<T>(&self, reason: impl Into<String>) -> XmlResult<T> {
        Err(XmlErrorKind::InvalidSelector(self.selector.to_string(), reason.into()).into())
    }

    fn unexpected<T>(&self) -> XmlResult<T> {
        match self.peek() {
            Some(c) => self.error(format!("unexpected '{}' at offset {}", c, self.pos)),
            None => self.error("unexpected end of selector"),
        }
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek();
        if c.is_some() {
            self.pos += 1;
        }
        c
    }

    fn eat(&mut self, c: char) -> bool {
        if self.peek() == Some(c) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn expect(&mut self, c: char) -> XmlResult<()> {
        if self.eat(c) {
            Ok(())
        } else {
            self.unexpected()
        }
    }

    /// Skips whitespace, returns whether there was any.
    fn skip_whitespace(&mut self) -> bool {
        let start = self.pos;
        while self.peek().map_or(false, char::is_whitespace) {
            self.pos += 1;
        }
        self.pos != start
    }

    fn selector_group(&mut self) -> XmlResult<String> {
        let mut alternatives = Vec::new();
        loop {
            alternatives.push(self.complex()?);
            if self.eat(',') {
                continue;
            }
            if self.peek().is_none() {
                break;
            }
            return self.unexpected();
        }
        Ok(alternatives.join(" | "))
    }

    fn combinator(&mut self) -> Option<Combinator> {
        let combinator = match self.peek()? {
            '>' => Combinator::Child,
            '+' => Combinator::Adjacent,
            '~' => Combinator::Sibling,
            _ => return None,
        };
        self.pos += 1;
        Some(combinator)
    }

    fn complex(&mut self) -> XmlResult<String> {
        self.skip_whitespace();
        if self.peek().is_none() || self.peek() == Some(',') {
            return self.error("empty selector");
        }

        let mut xpath = String::from(".");
        let mut combinator = self.combinator().unwrap_or(Combinator::Descendant);
        loop {
            self.skip_whitespace();
            let compound = self.compound()?;
            match combinator {
                Combinator::Descendant => xpath.push_str("//"),
                Combinator::Child => xpath.push('/'),
                Combinator::Adjacent => xpath.push_str("/following-sibling::*[1]/self::"),
                Combinator::Sibling => xpath.push_str("/following-sibling::"),
            }
            xpath.push_str(&compound.step());

            let spaced = self.skip_whitespace();
            combinator = match self.peek() {
                None | Some(',') => break,
                _ => match self.combinator() {
                    Some(c) => c,
                    None if spaced => Combinator::Descendant,
                    None => return self.unexpected(),
                },
            };
        }
        Ok(xpath)
    }

    fn compound(&mut self) -> XmlResult<Compound> {
        let name = self.type_selector()?;
        let mut compound = Compound {
            name: name.clone().unwrap_or_else(|| "*".to_string()),
            conditions: Vec::new(),
        };

        loop {
            match self.peek() {
                Some('#') => {
                    self.bump();
                    let id = self.ident()?;
                    compound.conditions.push(format!("@id={}", literal(&id)));
                }
                Some('.') => {
                    self.bump();
                    let class = self.ident()?;
                    compound.conditions.push(contains_word("@class", &class));
                }
                Some('[') => {
                    self.bump();
                    let condition = self.attribute()?;
                    compound.conditions.push(condition);
                }
                Some(':') => {
                    self.bump();
                    let condition = self.pseudo()?;
                    compound.conditions.push(condition);
                }
                _ => break,
            }
        }

        if name.is_none() && compound.conditions.is_empty() {
            return self.unexpected();
        }
        Ok(compound)
    }

    /// Parses `tag`, `*` or `prefix|tag`, if present.
    fn type_selector(&mut self) -> XmlResult<Option<String>> {
        let first = if self.eat('*') {
            "*".to_string()
        } else if self.peek().map_or(false, is_ident_start) {
            self.ident()?
        } else {
            return Ok(None);
        };

        if self.peek() == Some('|') && self.chars.get(self.pos + 1) != Some(&'=') {
            self.bump();
            let local = if self.eat('*') {
                "*".to_string()
            } else {
                self.ident()?
            };
            if first == "*" {
                return Ok(Some(local));
            }
            return Ok(Some(format!("{}:{}", first, local)));
        }
        Ok(Some(first))
    }

    fn ident(&mut self) -> XmlResult<String> {
        let start = self.pos;
        while self.peek().map_or(false, is_ident_char) {
            self.pos += 1;
        }
        if start == self.pos || !is_ident_start(self.chars[start]) {
            self.pos = start;
            return self.unexpected();
        }
        Ok(self.chars[start..self.pos].iter().collect())
    }

    /// Parses the inside of `[...]`, the opening bracket already consumed.
    fn attribute(&mut self) -> XmlResult<String> {
        self.skip_whitespace();
        let mut name = self.ident()?;
        if self.peek() == Some('|') && self.chars.get(self.pos + 1) != Some(&'=') {
            self.bump();
            name = format!("{}:{}", name, self.ident()?);
        }
        let attr = format!("@{}", name);
        self.skip_whitespace();

        if self.eat(']') {
            return Ok(attr);
        }

        let operator = match self.peek() {
            Some('=') => {
                self.bump();
                '='
            }
            Some(c) if "~|^$*".contains(c) => {
                self.bump();
                self.expect('=')?;
                c
            }
            _ => return self.unexpected(),
        };
        self.skip_whitespace();
        let value = self.value()?;
        self.skip_whitespace();
        self.expect(']')?;

        let condition = match operator {
            '=' => format!("{}={}", attr, literal(&value)),
            '~' if value.is_empty() || value.contains(char::is_whitespace) => "false()".to_string(),
            '~' => contains_word(&attr, &value),
            '|' => format!(
                "{a}={v} or starts-with({a}, {p})",
                a = attr,
                v = literal(&value),
                p = literal(&format!("{}-", value))
            ),
            _ if value.is_empty() => "false()".to_string(),
            '^' => format!("starts-with({}, {})", attr, literal(&value)),
            '$' => format!(
                "substring({a}, string-length({a}) - {n}) = {v}",
                a = attr,
                n = value.chars().count() - 1,
                v = literal(&value)
            ),
            _ => format!("contains({}, {})", attr, literal(&value)),
        };
        Ok(condition)
    }

    fn value(&mut self) -> XmlResult<String> {
        match self.peek() {
            Some(quote @ '"') | Some(quote @ '\'') => {
                self.bump();
                let start = self.pos;
                while let Some(c) = self.bump() {
                    if c == quote {
                        return Ok(self.chars[start..self.pos - 1].iter().collect());
                    }
                }
                self.error("unterminated string")
            }
            _ => {
                let start = self.pos;
                while self.peek().map_or(false, is_ident_char) {
                    self.pos += 1;
                }
                if start == self.pos {
                    return self.unexpected();
                }
                Ok(self.chars[start..self.pos].iter().collect())
            }
        }
    }

    /// Parses a pseudo-class, the colon already consumed.
    fn pseudo(&mut self) -> XmlResult<String> {
        let name = self.ident()?.to_ascii_lowercase();
        let condition = match name.as_str() {
            "first-child" => "not(preceding-sibling::*)".to_string(),
            "last-child" => "not(following-sibling::*)".to_string(),
            "only-child" => "not(preceding-sibling::*) and not(following-sibling::*)".to_string(),
            "empty" => "not(*) and not(text())".to_string(),
            "nth-child" => {
                let argument = self.argument()?;
                match argument.trim() {
                    "odd" => "count(preceding-sibling::*) mod 2 = 0".to_string(),
                    "even" => "count(preceding-sibling::*) mod 2 = 1".to_string(),
                    n => match n.parse::<u32>() {
                        Ok(n) if n > 0 => format!("count(preceding-sibling::*) = {}", n - 1),
                        _ => return self.error(format!("unsupported :nth-child argument '{}'", n)),
                    },
                }
            }
            "not" => {
                self.expect('(')?;
                self.skip_whitespace();
                let inner = self.compound()?;
                self.skip_whitespace();
                self.expect(')')?;
                format!("not(self::{})", inner.step())
            }
            _ => return self.error(format!("unsupported pseudo-class ':{}'", name)),
        };
        Ok(condition)
    }

    fn argument(&mut self) -> XmlResult<String> {
        self.expect('(')?;
        let start = self.pos;
        while let Some(c) = self.bump() {
            if c == ')' {
                return Ok(self.chars[start..self.pos - 1].iter().collect());
            }
        }
        self.error("unterminated argument list")
    }
}

fn is_ident_start(c: char) -> bool {
    c.is_alphabetic() || c == '_'
}

fn is_ident_char(c: char) -> bool {
    c.is_alphanumeric() || c == '-' || c == '_'
}

fn contains_word(attr: &str, word: &str) -> String {
    format!(
        "contains(concat(' ', normalize-space({}), ' '), {})",
        attr,
        literal(&format!(" {} ", word))
    )
}

/// Quote a string as an XPath literal.
fn literal(s: &str) -> String {
    if !s.contains('\'') {
        format!("'{}'", s)
    } else if !s.contains('"') {
        format!("\"{}\"", s)
    } else {
        let parts: Vec<String> = s.split('\'').map(|p| format!("'{}'", p)).collect();
        format!("concat({})", parts.join(", \"'\", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn css(s: &str) -> String {
        to_xpath(s).unwrap()
    }

    #[test]
    fn type_selectors() {
        assert_eq!(css("food"), ".//food");
        assert_eq!(css("*"), ".//*");
        assert_eq!(css("n|food"), ".//n:food");
        assert_eq!(css("*|food"), ".//food");
    }

    #[test]
    fn combinators() {
        assert_eq!(css("nutrition food name"), ".//nutrition//food//name");
        assert_eq!(css("food > name"), ".//food/name");
        assert_eq!(css("food>name"), ".//food/name");
        assert_eq!(css("name + mfr"), ".//name/following-sibling::*[1]/self::mfr");
        assert_eq!(css("name ~ serving"), ".//name/following-sibling::serving");
        assert_eq!(css("> food"), "./food");
    }

    #[test]
    fn id_and_class() {
        assert_eq!(css("#main"), ".//*[@id='main']");
        assert_eq!(
            css("food.organic"),
            ".//food[contains(concat(' ', normalize-space(@class), ' '), ' organic ')]"
        );
    }

    #[test]
    fn attributes() {
        assert_eq!(css("food > serving[units]"), ".//food/serving[@units]");
        assert_eq!(css("serving[units=g]"), ".//serving[@units='g']");
        assert_eq!(css(r#"serving[units="g"]"#), ".//serving[@units='g']");
        assert_eq!(css("a[href^='http']"), ".//a[starts-with(@href, 'http')]");
        assert_eq!(css("a[href*=x]"), ".//a[contains(@href, 'x')]");
        assert_eq!(
            css("a[href$='.xml']"),
            ".//a[substring(@href, string-length(@href) - 3) = '.xml']"
        );
        assert_eq!(
            css("a[lang|=en]"),
            ".//a[@lang='en' or starts-with(@lang, 'en-')]"
        );
        assert_eq!(css("a[href^='']"), ".//a[false()]");
        assert_eq!(css(r#"a[class~=""]"#), ".//a[false()]");
        assert_eq!(css("a[class~='x y']"), ".//a[false()]");
    }

    #[test]
    fn pseudo_classes() {
        assert_eq!(css("food:first-child"), ".//food[not(preceding-sibling::*)]");
        assert_eq!(css("food:last-child"), ".//food[not(following-sibling::*)]");
        assert_eq!(
            css("food:nth-child(3)"),
            ".//food[count(preceding-sibling::*) = 2]"
        );
        assert_eq!(css("food:not([units])"), ".//food[not(self::*[@units])]");
        assert_eq!(css("food:empty"), ".//food[not(*) and not(text())]");
    }

    #[test]
    fn groups() {
        assert_eq!(css("name, mfr"), ".//name | .//mfr");
    }

    #[test]
    fn literal_quoting() {
        assert_eq!(literal("plain"), "'plain'");
        assert_eq!(literal("it's"), "\"it's\"");
        assert_eq!(literal(r#"it's "x""#), r#"concat('it', "'", 's "x"')"#);
    }

    #[test]
    fn invalid_selectors() {
        for selector in &["", "food >", "food[", "food[units", "a,,b", ":hover", "food:nth-child(x)", "a!"] {
            let err = to_xpath(selector).unwrap_err();
            match *err.kind() {
                XmlErrorKind::InvalidSelector(ref s, _) => assert_eq!(s, selector),
                ref other => panic!("unexpected error kind: {:?}", other),
            }
        }
    }
}
