//! Reading inputs, linking them and writing the results

use anyhow::{Context, Result};
use autolinker_lib::Linker;
use std::fs;
use std::io::{self, Read, Write};
use std::path::PathBuf;

/// Where a fragment is read from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    Stdin,
    File(PathBuf),
}

impl Input {
    /// `-` stands for standard input
    pub fn from_arg(path: PathBuf) -> Self {
        if path.as_os_str() == "-" {
            Input::Stdin
        } else {
            Input::File(path)
        }
    }

    pub fn display_name(&self) -> String {
        match self {
            Input::Stdin => "<stdin>".to_string(),
            Input::File(path) => path.display().to_string(),
        }
    }

    fn read(&self) -> Result<Vec<u8>> {
        match self {
            Input::Stdin => {
                let mut buf = Vec::new();
                io::stdin().read_to_end(&mut buf).context("Failed to read stdin")?;
                Ok(buf)
            }
            Input::File(path) => fs::read(path).with_context(|| format!("Failed to read {}", path.display())),
        }
    }
}

/// Where linked output goes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputMode {
    Stdout,
    /// Rewrite each file; stdin input still goes to stdout
    InPlace,
    File(PathBuf),
}

/// One linked input
#[derive(Debug)]
pub struct Processed {
    pub input: Input,
    pub output: Vec<u8>,
    pub changed: bool,
}

pub fn process_input(linker: &Linker, input: &Input) -> Result<Processed> {
    let original = input.read()?;
    let output = linker.linkify_bytes(&original).into_owned();
    let changed = output != original;
    log::debug!(
        "{}: {}",
        input.display_name(),
        if changed { "links inserted" } else { "unchanged" }
    );
    Ok(Processed {
        input: input.clone(),
        output,
        changed,
    })
}

/// Process every input, keeping results in input order
#[cfg(feature = "parallel")]
pub fn process_all(linker: &Linker, inputs: &[Input]) -> Vec<Result<Processed>> {
    use rayon::prelude::*;

    inputs.par_iter().map(|input| process_input(linker, input)).collect()
}

/// Process every input, keeping results in input order
#[cfg(not(feature = "parallel"))]
pub fn process_all(linker: &Linker, inputs: &[Input]) -> Vec<Result<Processed>> {
    inputs.iter().map(|input| process_input(linker, input)).collect()
}

pub fn write_output<W: Write>(processed: &Processed, mode: &OutputMode, stdout: &mut W) -> Result<()> {
    match (mode, &processed.input) {
        (OutputMode::InPlace, Input::File(path)) => {
            if processed.changed {
                fs::write(path, &processed.output).with_context(|| format!("Failed to write {}", path.display()))?;
            }
        }
        (OutputMode::File(path), _) => {
            fs::write(path, &processed.output).with_context(|| format!("Failed to write {}", path.display()))?;
        }
        (OutputMode::Stdout, _) | (OutputMode::InPlace, Input::Stdin) => {
            stdout.write_all(&processed.output).context("Failed to write to stdout")?;
        }
    }
    Ok(())
}
