//! Command-line interface for geomarkup.

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use console::style;

use crate::config::{Verbosity, KMLNS};
use crate::error::{GeomarkupError, Result};
use crate::kml::{create_kml_registry, find_class, Kml};
use crate::registry::{
    DecodeContext, EncodeOptions, Registry, UnknownEnumPolicy, XmlClass, XmlObject,
};

/// Geomarkup - Decode and encode KML documents through the attribute registry.
#[derive(Parser)]
#[command(name = "geomarkup")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Decode a KML document and encode it again.
    Roundtrip {
        /// KML file to read
        file: PathBuf,

        /// Omit malformed values instead of failing
        #[arg(short, long)]
        lenient: bool,

        /// Decimal precision hint passed to encoders
        #[arg(short, long)]
        precision: Option<usize>,

        /// Amount of optional content to emit
        #[arg(long, value_enum, default_value_t = Verbosity::Normal)]
        verbosity: Verbosity,

        /// Write the result to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Indent the output
        #[arg(long)]
        pretty: bool,
    },

    /// Show the resolved descriptors of a class.
    Describe {
        /// Class name (e.g., Placemark)
        class: String,
    },
}

/// Run the CLI.
pub fn run() -> Result<()> {
    let cli = Cli::parse();
    let registry = create_kml_registry();

    match cli.command {
        Commands::Roundtrip {
            file,
            lenient,
            precision,
            verbosity,
            output,
            pretty,
        } => roundtrip_command(
            &registry,
            &file,
            lenient,
            EncodeOptions::new(precision, verbosity),
            output.as_deref(),
            pretty,
        ),
        Commands::Describe { class } => describe_command(&registry, &class),
    }
}

/// Execute the roundtrip command.
fn roundtrip_command(
    registry: &Registry,
    file: &Path,
    lenient: bool,
    options: EncodeOptions,
    output: Option<&Path>,
    pretty: bool,
) -> Result<()> {
    let xml = std::fs::read_to_string(file)?;

    // Lenient runs also drop unknown enumeration values
    let ctx = if lenient {
        DecodeContext::new(KMLNS, false).with_unknown_enum(UnknownEnumPolicy::Omit)
    } else {
        DecodeContext::new(KMLNS, true)
    };
    let kml = Kml::parse_with(registry, &xml, ctx)?;
    let encoded = kml.to_xml_string(registry, &options, pretty);

    match output {
        Some(path) => {
            std::fs::write(path, &encoded)?;
            println!(
                "{} {} feature(s)",
                style("Decoded").bold(),
                style(kml.features.len()).cyan()
            );
            println!("{} {}", style("Saved to:").green().bold(), path.display());
        }
        None => println!("{encoded}"),
    }

    Ok(())
}

/// Execute the describe command.
fn describe_command(registry: &Registry, name: &str) -> Result<()> {
    let class = find_class(name).ok_or_else(|| GeomarkupError::UnknownClass(name.to_string()))?;

    println!("{}", style(ancestry_line(class)).bold());
    for line in describe_lines(registry, class) {
        println!("  {line}");
    }

    Ok(())
}

/// Ancestor chain rendered as `Base > ... > Class`.
fn ancestry_line(class: &'static XmlClass) -> String {
    let names: Vec<_> = class.ancestry().iter().map(|ancestor| ancestor.name).collect();
    names.join(" > ")
}

/// One line per resolved descriptor: attribute, node name, kind and codec.
fn describe_lines(registry: &Registry, class: &'static XmlClass) -> Vec<String> {
    registry
        .resolve(class)
        .into_iter()
        .map(|item| {
            format!(
                "{:<18} {:<18} {:<32} {}",
                item.attr_name,
                item.node_name.unwrap_or("-"),
                item.kind.to_string(),
                item.codec.name
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kml::{ICON, SNIPPET};

    #[test]
    fn test_cli_parse_roundtrip() {
        let cli = Cli::parse_from(["geomarkup", "roundtrip", "doc.kml"]);

        let Commands::Roundtrip {
            file,
            lenient,
            precision,
            verbosity,
            output,
            pretty,
        } = cli.command
        else {
            panic!("expected roundtrip");
        };
        assert_eq!(file, PathBuf::from("doc.kml"));
        assert!(!lenient);
        assert!(precision.is_none());
        assert_eq!(verbosity, Verbosity::Normal);
        assert!(output.is_none());
        assert!(!pretty);
    }

    #[test]
    fn test_cli_parse_roundtrip_with_options() {
        let cli = Cli::parse_from([
            "geomarkup",
            "roundtrip",
            "doc.kml",
            "--lenient",
            "--precision",
            "6",
            "--verbosity",
            "verbose",
            "--pretty",
        ]);

        let Commands::Roundtrip {
            lenient,
            precision,
            verbosity,
            pretty,
            ..
        } = cli.command
        else {
            panic!("expected roundtrip");
        };
        assert!(lenient);
        assert_eq!(precision, Some(6));
        assert_eq!(verbosity, Verbosity::Verbose);
        assert!(pretty);
    }

    #[test]
    fn test_cli_parse_describe() {
        let cli = Cli::parse_from(["geomarkup", "describe", "Placemark"]);

        let Commands::Describe { class } = cli.command else {
            panic!("expected describe");
        };
        assert_eq!(class, "Placemark");
    }

    #[test]
    fn test_ancestry_line() {
        assert_eq!(ancestry_line(&ICON), "_BaseObject > Link > Icon");
        assert_eq!(ancestry_line(&SNIPPET), "Snippet");
    }

    #[test]
    fn test_describe_lines() {
        let registry = create_kml_registry();
        let lines = describe_lines(&registry, &SNIPPET);

        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("text "));
        assert!(lines[0].ends_with("node_text"));
        assert!(lines[1].contains("maxLines"));
        assert!(lines[1].ends_with("int_attribute"));
    }

    #[test]
    fn test_describe_unknown_class() {
        let registry = create_kml_registry();
        let result = describe_command(&registry, "Polygon");
        assert!(matches!(result, Err(GeomarkupError::UnknownClass(name)) if name == "Polygon"));
    }
}
