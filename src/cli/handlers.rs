//! Command handlers for the notemeta CLI.

use anyhow::{Context, Result};
use walkdir::WalkDir;

use crate::cli::output::{DocumentListing, Output, OutputFormat};
use crate::cli::{ExtractArgs, ScanArgs};
use crate::domain::MetadataType;
use crate::extract::resolve;
use crate::infra::read_document;

pub fn handle_extract(args: &ExtractArgs) -> Result<()> {
    let ty: MetadataType = args.metadata_type.parse()?;
    let extractor = resolve(ty)?;

    let content = read_document(&args.file)
        .with_context(|| format!("failed to read {}", args.file.display()))?;
    let raw = extractor.extract_raw(&content);

    if args.raw {
        match args.format {
            OutputFormat::Human => {
                for unit in &raw {
                    println!("{unit}");
                }
            }
            OutputFormat::Json => {
                let out = Output::new(&raw);
                println!("{}", serde_json::to_string_pretty(&out)?);
            }
        }
        return Ok(());
    }

    let mapping = extractor.parse(&raw);
    match args.format {
        OutputFormat::Human => {
            if mapping.is_empty() {
                println!("No {ty} metadata found.");
            } else {
                for (key, value) in &mapping {
                    println!("{key}: {}", serde_json::to_string(value)?);
                }
            }
        }
        OutputFormat::Json => {
            let out = Output::new(&mapping);
            println!("{}", serde_json::to_string_pretty(&out)?);
        }
    }
    Ok(())
}

pub fn handle_scan(args: &ScanArgs) -> Result<()> {
    let ty: MetadataType = args.metadata_type.parse()?;
    let extractor = resolve(ty)?;

    let mut listings: Vec<DocumentListing> = Vec::new();
    for entry in WalkDir::new(&args.dir).sort_by_file_name() {
        let entry = entry.with_context(|| format!("failed to walk {}", args.dir.display()))?;
        if !entry.file_type().is_file()
            || entry.path().extension().and_then(|ext| ext.to_str()) != Some("md")
        {
            continue;
        }

        let content = match read_document(entry.path()) {
            Ok(content) => content,
            Err(err) => {
                eprintln!("warning: skipping {}: {err}", entry.path().display());
                continue;
            }
        };

        let mapping = extractor.parse(&extractor.extract_raw(&content));
        listings.push(DocumentListing {
            path: entry.path().display().to_string(),
            keys: mapping.keys().cloned().collect(),
        });
    }

    match args.format {
        OutputFormat::Human => {
            for listing in &listings {
                if listing.keys.is_empty() {
                    println!("{} (no metadata)", listing.path);
                } else {
                    println!("{}: {}", listing.path, listing.keys.join(", "));
                }
            }
        }
        OutputFormat::Json => {
            let out = Output::new(&listings);
            println!("{}", serde_json::to_string_pretty(&out)?);
        }
    }
    Ok(())
}
