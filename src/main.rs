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

//! Walks the bundled nutrition document: prints the daily values table and
//! the elements matched by an XPath expression and a CSS selector.

use clap::Parser;
use error_chain::ChainedError;
use std::fs;
use std::ops::ControlFlow;
use std::path::PathBuf;
use std::process;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;
use xmlwalk::errors::ResultExt;
use xmlwalk::nutrition::daily_values;
use xmlwalk::{Searching, XmlDocument, XmlResult};

const NUTRITION_XML: &str = include_str!("../resources/nutrition.xml");

#[derive(Parser, Debug)]
#[command(name = "xmlwalk", version, about = "Walk and query an XML document")]
struct Cli {
    /// Read this document instead of the bundled nutrition.xml.
    #[arg(long, value_name = "PATH")]
    file: Option<PathBuf>,

    /// XPath expression whose matching elements are printed.
    #[arg(long, default_value = "//food/name")]
    xpath: String,

    /// CSS selector whose matching elements are printed.
    #[arg(long, default_value = "food > serving[units]")]
    css: String,
}

fn main() {
    init_tracing();
    let cli = Cli::parse();

    if let Err(err) = run(&cli) {
        eprintln!("{}", err.display_chain());
        process::exit(1);
    }
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn run(cli: &Cli) -> XmlResult<()> {
    let data = match cli.file {
        Some(ref path) => {
            fs::read(path).chain_err(|| format!("Missing resource: {}", path.display()))?
        }
        None => NUTRITION_XML.as_bytes().to_vec(),
    };
    debug!(bytes = data.len(), "loaded document");

    let document = XmlDocument::from_bytes(&data).chain_err(|| "Could not parse document")?;
    if let Some(root) = document.root_element() {
        info!(version = document.version(), encoding = document.encoding(), "document loaded");
        println!("{}", root.tag());
    }

    for value in daily_values(&document)? {
        println!("{}", value);
    }

    document.enumerate_elements_with_xpath(cli.xpath.as_str(), |element, _| {
        println!("{}", element);
        ControlFlow::Continue(())
    })?;

    document.enumerate_elements_with_css(&cli.css, |element, _| {
        println!("{}", element);
        ControlFlow::Continue(())
    })?;

    Ok(())
}
