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

use std::ops::ControlFlow;
use xmlwalk::nutrition::daily_values;
use xmlwalk::{Searching, XmlDocument};

const NUTRITION_XML: &[u8] = include_bytes!("../resources/nutrition.xml");

fn document() -> XmlDocument {
    XmlDocument::from_bytes(NUTRITION_XML).unwrap()
}

#[test]
fn root_element() {
    let doc = document();
    assert_eq!(doc.version(), "1.0");
    assert_eq!(doc.encoding(), "UTF-8");
    assert_eq!(doc.root_element().unwrap().tag(), "nutrition");
}

#[test]
fn daily_values_table() {
    let doc = document();
    let lines: Vec<String> = daily_values(&doc)
        .unwrap()
        .iter()
        .map(|v| v.to_string())
        .collect();
    assert_eq!(
        lines,
        vec![
            "- 65g total-fat",
            "- 20g saturated-fat",
            "- 300mg cholesterol",
            "- 2400mg sodium",
            "- 300g carb",
            "- 25g fiber",
            "- 50g protein",
        ]
    );
}

#[test]
fn food_names_by_xpath() {
    let doc = document();
    let mut printed = Vec::new();
    doc.enumerate_elements_with_xpath("//food/name", |element, _| {
        printed.push(element.to_string());
        ControlFlow::Continue(())
    })
    .unwrap();
    assert_eq!(
        printed,
        vec![
            "<name>Avocado Dip</name>",
            "<name>Bagels, New York Style</name>",
            "<name>Beef Frankfurter, Quarter Pound</name>",
            "<name>Chicken Pot Pie</name>",
            "<name>Cole Slaw</name>",
        ]
    );
}

#[test]
fn servings_by_css() {
    let doc = document();
    let servings: Vec<String> = doc
        .css("food > serving[units]")
        .unwrap()
        .iter()
        .map(|e| e.to_string())
        .collect();
    assert_eq!(servings.len(), 5);
    assert_eq!(servings[0], r#"<serving units="g">29</serving>"#);
    assert_eq!(servings[4], r#"<serving units=" cup">1.5</serving>"#);
}

#[test]
fn css_and_xpath_agree() {
    let doc = document();
    assert_eq!(
        doc.css("food > serving[units]").unwrap(),
        doc.xpath("//food/serving[@units]").unwrap()
    );
    assert_eq!(
        doc.css("food:first-child").unwrap(),
        doc.xpath("//food[not(preceding-sibling::*)]").unwrap()
    );
}

#[test]
fn walking_a_food() {
    let doc = document();
    let dip = doc.first_child_with_css("food").unwrap().unwrap();

    assert_eq!(dip.first_child_with_tag("mfr").unwrap().string_value(), "Sunnydale");
    let calories = dip.first_child_with_tag("calories").unwrap();
    assert!(calories.is_blank());
    assert_eq!(calories.get("total"), Some("110"));

    let vitamins = dip.first_child_with_tag("vitamins").unwrap();
    assert_eq!(vitamins.children().len(), 2);
    assert_eq!(vitamins.next_sibling().unwrap().tag(), "minerals");

    let bagels = dip.next_sibling().unwrap();
    assert_eq!(bagels.read::<String>("name").unwrap(), "Bagels, New York Style");
    assert_eq!(bagels.read::<u32>("sodium").unwrap(), 510);
    assert_eq!(doc.read::<f64>("sum(//food/protein)").unwrap(), 36.0);
}
