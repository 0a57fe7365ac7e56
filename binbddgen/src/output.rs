//! Where generated skeletons go.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// Destination for one generated skeleton.
#[derive(Debug, Clone, Copy)]
pub enum Sink<'a> {
    /// Print to stdout.
    Stdout,
    /// Write to an explicitly named file.
    File(&'a Path),
    /// Write to a file named after the input: `<stem><suffix>`, next to the
    /// input or inside `out_dir`.
    Inferred {
        out_dir: Option<&'a Path>,
        suffix: &'a str,
    },
}

/// Derive the output file name for an input document.
///
/// `login.feature` with suffix `.h` becomes `login.h`; with suffix `Test.h`
/// it becomes `loginTest.h`.
pub fn inferred_path(input: &Path, out_dir: Option<&Path>, suffix: &str) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let name = format!("{}{}", stem, suffix);
    match out_dir {
        Some(dir) => dir.join(name),
        None => input.with_file_name(name),
    }
}

/// Write a skeleton to its sink. Returns the path written, if any.
pub fn write_text_output(
    output: &str,
    sink: Sink<'_>,
    input_file: Option<&Path>,
) -> io::Result<Option<PathBuf>> {
    let path = match sink {
        Sink::Stdout => {
            let stdout = io::stdout();
            let mut handle = stdout.lock();
            handle.write_all(output.as_bytes())?;
            // Ensure output ends with newline
            if !output.ends_with('\n') {
                handle.write_all(b"\n")?;
            }
            return Ok(None);
        }
        Sink::File(path) => path.to_path_buf(),
        Sink::Inferred { out_dir, suffix } => {
            let Some(input_path) = input_file else {
                return Err(io::Error::new(
                    io::ErrorKind::InvalidInput,
                    "--write requires an input file",
                ));
            };
            if let Some(dir) = out_dir {
                fs::create_dir_all(dir)?;
            }
            inferred_path(input_path, out_dir, suffix)
        }
    };

    if let Some(input_path) = input_file {
        if same_file(&path, input_path) {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("refusing to overwrite input {}", input_path.display()),
            ));
        }
    }

    fs::write(&path, output)?;
    tracing::info!(path = %path.display(), "wrote skeleton");
    Ok(Some(path))
}

/// Compare resolved paths when both exist, so `./x.feature` and
/// `x.feature` are the same file.
fn same_file(a: &Path, b: &Path) -> bool {
    match (fs::canonicalize(a), fs::canonicalize(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => a == b,
    }
}
