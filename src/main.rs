//! clipmark - Clip a web page into a Markdown note

use std::fs;
use std::io::{self, Read};
use std::process::ExitCode;

use clap::Parser;

use clipmark::util::decode_html;
use clipmark::{Note, Property, TypeRegistry};

#[derive(Parser)]
#[command(name = "clipmark")]
#[command(version, about = "Clip a web page into a Markdown note", long_about = None)]
#[command(after_help = "EXAMPLES:
    clipmark page.html                          Convert a saved page
    curl -s URL | clipmark -u URL -             Convert from stdin
    clipmark -p tags=web,clip -t types.json page.html")]
struct Cli {
    /// HTML file, or `-` for stdin
    #[arg(value_name = "INPUT")]
    input: String,

    /// Source URL, also written as the `url` property
    #[arg(short, long)]
    url: Option<String>,

    /// Note property as NAME=VALUE (repeatable, kept in order)
    #[arg(short, long = "property", value_name = "N=V")]
    properties: Vec<String>,

    /// JSON property-type registry
    #[arg(short, long, value_name = "FILE")]
    types: Option<String>,

    /// Print only the Markdown body
    #[arg(long)]
    body_only: bool,
}

fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();

    match clip(&cli) {
        Ok(content) => {
            println!("{content}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn read_input(input: &str) -> io::Result<Vec<u8>> {
    if input == "-" {
        let mut bytes = Vec::new();
        io::stdin().read_to_end(&mut bytes)?;
        Ok(bytes)
    } else {
        fs::read(input)
    }
}

fn clip(cli: &Cli) -> clipmark::Result<String> {
    let bytes = read_input(&cli.input)?;
    let html = decode_html(&bytes);

    let mut properties = Vec::new();
    if let Some(url) = &cli.url {
        properties.push(Property::new("url", url.as_str()));
    }
    for pair in &cli.properties {
        properties.push(Property::parse_pair(pair)?);
    }

    let registry = match &cli.types {
        Some(path) => TypeRegistry::from_path(path)?,
        None => TypeRegistry::new(),
    };

    let note = Note::clip(&html, &properties, &registry);
    if cli.body_only {
        Ok(note.body)
    } else {
        Ok(note.content())
    }
}
