use anyhow::Result;
use cgcl_asset::{mesh::obj, surface};
use log::{debug, warn};
use std::{
    ffi::OsStr,
    fs, io,
    path::{Path, PathBuf},
};
use structopt::StructOpt;
use walkdir::WalkDir;

/// Converts every OBJ and Bezier patch file below a folder into meshes.
#[derive(StructOpt, Debug)]
#[structopt(name = "cgcl_asset")]
struct CliArgs {
    /// Folder holding the source assets
    #[structopt(parse(from_os_str))]
    input: PathBuf,
    /// Folder receiving the converted meshes, mirroring the input layout
    #[structopt(short = "o", long = "output", parse(from_os_str))]
    output: PathBuf,
    /// Output debug info
    #[structopt(short = "v", long = "verbose")]
    verbose: bool,
}

#[derive(thiserror::Error, Debug)]
enum CliError {
    #[error("Input folder does not exist: {}", .0.display())]
    MissingInput(PathBuf),
    #[error("Could not create output folder {}: {source}", .path.display())]
    OutputFolder {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

fn main() -> Result<()> {
    let args = CliArgs::from_args();

    let default_level = if args.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();

    if !args.input.is_dir() {
        return Err(CliError::MissingInput(args.input).into());
    }

    let entries = WalkDir::new(&args.input)
        .into_iter()
        .filter_map(|entry| entry.map_err(|err| warn!("Skipping entry: {}", err)).ok())
        .filter(|entry| entry.file_type().is_file());

    for entry in entries {
        let path = entry.path();
        let relative = path.strip_prefix(&args.input)?;
        let target_dir = match relative.parent() {
            Some(parent) => args.output.join(parent),
            None => args.output.clone(),
        };
        fs::create_dir_all(&target_dir).map_err(|source| CliError::OutputFolder {
            path: target_dir.clone(),
            source,
        })?;

        convert(path, &target_dir)?;
    }

    Ok(())
}

fn convert(path: &Path, target_dir: &Path) -> Result<()> {
    let extension = path
        .extension()
        .and_then(OsStr::to_str)
        .map(str::to_ascii_lowercase);

    match extension.as_deref() {
        Some("obj") => obj::process(path, target_dir),
        Some("bez") => surface::process(path, target_dir),
        Some("toml") => {
            debug!("Ignored asset meta file: {}", path.display());
            Ok(())
        }
        _ => {
            warn!("Could not handle file: {}", path.display());
            Ok(())
        }
    }
}
