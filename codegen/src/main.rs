//! Record codec generator.
//!
//! Reads Rust schema files of record struct declarations and emits a
//! `<input>_wire.rs` next to each, containing the cleaned structs and
//! specialized `WireRecord` impls. Existing output files are only
//! overwritten when `--force` is given, so hand edits are never lost
//! silently.
//!
//! ```text
//! dynawire-codegen [--force] schema.rs [schema2.rs ...]
//! ```

mod emit;
mod model;

use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};

fn main() -> ExitCode {
    let mut force = false;
    let mut files = Vec::new();
    for arg in std::env::args().skip(1) {
        if arg == "--force" {
            force = true;
        } else {
            files.push(PathBuf::from(arg));
        }
    }

    if files.is_empty() {
        eprintln!("usage: dynawire-codegen [--force] schema.rs [schema2.rs ...]");
        return ExitCode::FAILURE;
    }

    let mut failed = false;
    for file in &files {
        match process_file(file, force) {
            Ok(clean) => failed |= !clean,
            Err(err) => {
                eprintln!("{}: {err:#}", file.display());
                failed = true;
            }
        }
    }

    if failed {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

/// Generate output for one schema file. Returns `false` when the file
/// was processed with errors (skipped records or refused overwrite).
fn process_file(path: &Path, force: bool) -> Result<bool> {
    let input_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();

    eprintln!("parsing {}", path.display());
    let source =
        fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;
    let schema = model::parse_schema(&source)?;
    let generated = emit::generate(&schema, &input_name)?;

    for error in &generated.errors {
        eprintln!("{input_name}: {error}");
    }

    let Some(code) = generated.code else {
        eprintln!("{input_name}: no records to generate");
        return Ok(generated.errors.is_empty());
    };

    let output = output_path(path);
    if output.exists() && !force {
        eprintln!(
            "{} already exists, pass --force to overwrite",
            output.display()
        );
        return Ok(false);
    }

    fs::write(&output, code)
        .with_context(|| format!("failed to write {}", output.display()))?;
    eprintln!("wrote {}", output.display());

    Ok(generated.errors.is_empty())
}

fn output_path(input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default();
    input.with_file_name(format!("{stem}_wire.rs"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_should_place_output_next_to_input() {
        assert_eq!(
            output_path(Path::new("src/model.rs")),
            PathBuf::from("src/model_wire.rs")
        );
    }

    #[test]
    fn test_should_refuse_overwrite_without_force() {
        let dir = std::env::temp_dir().join("dynawire-codegen-overwrite-test");
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).unwrap();

        let schema = dir.join("point.rs");
        fs::write(&schema, "pub struct Point {\n    pub x: i64,\n}\n").unwrap();

        let output = dir.join("point_wire.rs");
        fs::write(&output, "// hand edited\n").unwrap();

        // Without --force the existing output must survive untouched.
        assert!(!process_file(&schema, false).unwrap());
        assert_eq!(fs::read_to_string(&output).unwrap(), "// hand edited\n");

        // With --force it is regenerated.
        assert!(process_file(&schema, true).unwrap());
        let regenerated = fs::read_to_string(&output).unwrap();
        assert!(regenerated.contains("impl WireRecord for Point"));

        let _ = fs::remove_dir_all(&dir);
    }
}
