//! Rubicon CLI - Command-line tool for AC6 design and save-slot user data.
//!
//! This is the main entry point for the Rubicon command-line application.
//! It operates on user-data files that have already been unpacked from the
//! save archive; archive packing itself is handled by external tooling.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use rayon::prelude::*;

use rubicon::prelude::*;

/// Rubicon - Armored Core VI design and save-slot tool
#[derive(Parser)]
#[command(name = "rubicon")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Decrypt an encrypted user-data file
    Decrypt {
        /// Path to the encrypted user-data file
        #[arg(short, long)]
        input: PathBuf,

        /// Output path (defaults to overwriting the input)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Encrypt a decrypted user-data file
    Encrypt {
        /// Path to the decrypted user-data file
        #[arg(short, long)]
        input: PathBuf,

        /// Output path (defaults to overwriting the input)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// List the presets stored in user-data containers
    List {
        /// User-data files to list
        #[arg(required = true)]
        inputs: Vec<PathBuf>,

        /// Treat the inputs as already decrypted
        #[arg(long)]
        decrypted: bool,
    },

    /// Extract every preset's design into standalone .design files
    ExtractDesigns {
        /// User-data files to extract from
        #[arg(required = true)]
        inputs: Vec<PathBuf>,

        /// Output directory
        #[arg(short, long)]
        output: PathBuf,

        /// Treat the inputs as already decrypted
        #[arg(long)]
        decrypted: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Decrypt { input, output } => {
            cmd_decrypt(&input, output.as_deref())?;
        }
        Commands::Encrypt { input, output } => {
            cmd_encrypt(&input, output.as_deref())?;
        }
        Commands::List { inputs, decrypted } => {
            cmd_list(&inputs, decrypted)?;
        }
        Commands::ExtractDesigns {
            inputs,
            output,
            decrypted,
        } => {
            cmd_extract_designs(&inputs, &output, decrypted)?;
        }
    }

    Ok(())
}

fn cmd_decrypt(input: &Path, output: Option<&Path>) -> Result<()> {
    let data = fs::read(input).context("Failed to read input file")?;
    let plaintext = crypto::decrypt(&data).context("Failed to decrypt user data")?;

    let target = output.unwrap_or(input);
    fs::write(target, plaintext).context("Failed to write output file")?;
    println!("Decrypted {} -> {}", input.display(), target.display());

    Ok(())
}

fn cmd_encrypt(input: &Path, output: Option<&Path>) -> Result<()> {
    let data = fs::read(input).context("Failed to read input file")?;
    let ciphertext = crypto::encrypt(&data).context("Failed to encrypt user data")?;

    let target = output.unwrap_or(input);
    fs::write(target, ciphertext).context("Failed to write output file")?;
    println!("Encrypted {} -> {}", input.display(), target.display());

    Ok(())
}

fn cmd_list(inputs: &[PathBuf], decrypted: bool) -> Result<()> {
    for input in inputs {
        let container = load_container(input, decrypted)?;
        println!("{}: {} presets", input.display(), container.presets().len());

        for (index, preset) in container.presets().iter().enumerate() {
            let design = preset
                .design()
                .with_context(|| format!("Failed to parse design {index}"))?;
            let saved = preset
                .timestamp()
                .to_datetime()
                .map(|dt| dt.format("%Y-%m-%d %H:%M:%S").to_string())
                .unwrap_or_else(|| "?".to_string());

            println!(
                "  [{index:2}] tab {} {saved} {} // {}",
                preset.category(),
                design.ac_name,
                design.data_name
            );
        }
    }

    Ok(())
}

fn cmd_extract_designs(inputs: &[PathBuf], output: &Path, decrypted: bool) -> Result<()> {
    fs::create_dir_all(output).context("Failed to create output directory")?;

    let start = Instant::now();
    // Containers are independent of each other; scan them in parallel.
    let written: usize = inputs
        .par_iter()
        .map(|input| extract_from_container(input, output, decrypted))
        .collect::<Result<Vec<_>>>()?
        .into_iter()
        .sum();

    println!("Extracted {} designs in {:?}", written, start.elapsed());

    Ok(())
}

fn extract_from_container(input: &Path, output: &Path, decrypted: bool) -> Result<usize> {
    let container = load_container(input, decrypted)?;
    let stem = input
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "USER_DATA".to_string());

    let mut written = 0;
    for (index, preset) in container.presets().iter().enumerate() {
        let design = preset
            .design()
            .with_context(|| format!("Failed to parse design {index} in {}", input.display()))?;

        let file_name = sanitize_file_name(&format!(
            "{}_{} - {stem}[{index}].design",
            design.data_name.replace(' ', "_"),
            design.ac_name.replace(' ', "_"),
        ));
        fs::write(output.join(&file_name), design.to_bytes())
            .with_context(|| format!("Failed to write {file_name}"))?;

        println!("Extracted: {file_name}");
        written += 1;
    }

    Ok(written)
}

fn load_container(input: &Path, decrypted: bool) -> Result<SaveContainer> {
    let data = fs::read(input)
        .with_context(|| format!("Failed to read user data: {}", input.display()))?;
    let plaintext = if decrypted {
        data
    } else {
        crypto::decrypt(&data)
            .with_context(|| format!("Failed to decrypt user data: {}", input.display()))?
    };

    SaveContainer::decode(&plaintext)
        .with_context(|| format!("Failed to decode container: {}", input.display()))
}

fn sanitize_file_name(name: &str) -> String {
    name.chars()
        .filter(|c| c.is_alphanumeric() || matches!(c, '_' | '-' | '[' | ']' | '.' | ' '))
        .collect()
}
