use shared_types::*;
use std::fs;
use std::path::Path;
use ts_rs::TS;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Generate TypeScript definitions for API types
    let mut types = Vec::new();

    // Contact types
    types.push(clean_type(Contact::export_to_string()?));
    types.push(clean_type(LegacyContact::export_to_string()?));
    types.push(clean_type(ContactPayload::export_to_string()?));
    types.push(clean_type(BackendCreateContact::export_to_string()?));
    types.push(clean_type(BackendUpdateContact::export_to_string()?));

    // Invitation types
    types.push(clean_type(InvitationRequest::export_to_string()?));

    types.push(clean_type(ErrorResponse::export_to_string()?));

    let output_dir = Path::new("../web/src/api-types");
    fs::create_dir_all(output_dir)?;

    let output_path = output_dir.join("types.ts");
    let output = types.join("\n\n");

    fs::write(&output_path, output)?;
    println!("Generated TypeScript types in {}", output_path.display());

    Ok(())
}

fn clean_type(mut type_def: String) -> String {
    type_def.retain(|c| c != '\r');

    // Everything lands in one file, so cross-type imports are dropped too.
    let filtered: Vec<&str> = type_def
        .lines()
        .filter(|line| {
            let trimmed = line.trim();
            !trimmed.starts_with("import type")
                && !trimmed.starts_with("// This file was generated")
                && !trimmed.starts_with("/* This file was generated")
        })
        .collect();

    let result = filtered.join("\n").trim().to_string();
    if result.is_empty() {
        result
    } else {
        format!("{}\n", result)
    }
}
