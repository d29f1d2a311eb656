use std::{
    io::{self, Write},
    path::{Path, PathBuf},
};

use tracing::debug;

use crate::error::{Result, SubstError};

/// Where the substituted text goes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Destination {
    Stdout,
    File(PathBuf),
}

impl From<Option<PathBuf>> for Destination {
    fn from(path: Option<PathBuf>) -> Self {
        path.map_or(Self::Stdout, Self::File)
    }
}

/// Emit `content` to `dest`.
///
/// `status` receives the content itself plus a newline for
/// [`Destination::Stdout`], or a one-line confirmation naming the file
/// otherwise.
pub fn write_output(dest: &Destination, content: &[u8], status: &mut dyn Write) -> Result<()> {
    let stdout_err = |source: io::Error| SubstError::Write {
        path: PathBuf::from("<stdout>"),
        source,
    };

    match dest {
        Destination::Stdout => print_line(status, content).map_err(stdout_err),
        Destination::File(path) => {
            write_file(path, content).map_err(|source| SubstError::Write {
                path: path.clone(),
                source,
            })?;
            debug!(path = %path.display(), bytes = content.len(), "wrote output");
            writeln!(status, "Data has been written to {}", path.display()).map_err(stdout_err)
        },
    }
}

fn print_line(out: &mut dyn Write, content: &[u8]) -> io::Result<()> {
    out.write_all(content)?;
    out.write_all(b"\n")?;
    out.flush()
}

fn write_file(path: &Path, content: &[u8]) -> io::Result<()> {
    let mut opts = std::fs::OpenOptions::new();
    opts.write(true).create(true).truncate(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        opts.mode(0o644);
    }
    let mut file = opts.open(path)?;
    file.write_all(content)?;
    file.flush()
}
