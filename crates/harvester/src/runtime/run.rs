//! Run — decode each source and write messages as JSON lines.

use std::fmt;
use std::fs::File;
use std::io::{self, BufRead, BufReader, Write};
use std::path::PathBuf;

use tracing::{info, warn};

use crate::conf::{ContainersConfig, HarvesterConfig};
use crate::reader::{LineReader, RawReader};
use crate::stream::{DecodeError, Decoder};

/// Where raw records come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    File(PathBuf),
    Stdin,
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Source::File(path) => write!(f, "{}", path.display()),
            Source::Stdin => f.write_str("<stdin>"),
        }
    }
}

/// Explicit file arguments win, then configured containers, then stdin.
pub fn sources(args: &[String], containers: &ContainersConfig) -> Vec<Source> {
    if !args.is_empty() {
        return args.iter().map(|a| Source::File(PathBuf::from(a))).collect();
    }
    if !containers.ids.is_empty() {
        return containers.log_paths().into_iter().map(Source::File).collect();
    }
    vec![Source::Stdin]
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct HarvestStats {
    pub messages: u64,
    pub parse_errors: u64,
    pub bytes: u64,
    /// Source bytes read, including any dropped at end of stream
    pub offset: u64,
}

/// Drain `decoder`, writing one JSON object per message.
///
/// Records that failed to parse are logged and written as read.
/// Returns at end of stream or on the first upstream failure.
pub fn harvest<R, W>(decoder: &mut Decoder<R>, out: &mut W) -> io::Result<HarvestStats>
where
    R: RawReader,
    W: Write,
{
    let mut stats = HarvestStats::default();

    for item in decoder {
        let message = match item {
            Ok(message) => message,
            Err(DecodeError::Message { message, source }) => {
                warn!(error = %source, "failed to parse log record");
                stats.parse_errors += 1;
                *message
            }
            Err(DecodeError::Upstream(e)) => return Err(e),
            Err(DecodeError::EndOfStream) => break,
        };

        serde_json::to_writer(&mut *out, &message)?;
        out.write_all(b"\n")?;
        stats.messages += 1;
        stats.bytes += message.bytes as u64;
    }

    out.flush()?;
    Ok(stats)
}

fn harvest_reader<B, W>(reader: B, containers: &ContainersConfig, out: &mut W) -> io::Result<HarvestStats>
where
    B: BufRead,
    W: Write,
{
    let reader = LineReader::new(reader).with_max_line_bytes(containers.max_line_bytes);
    let mut decoder = Decoder::from_config(reader, containers);
    let mut stats = harvest(&mut decoder, out)?;
    stats.offset = decoder.get_ref().offset();
    Ok(stats)
}

/// Decode every source in turn into `out`.
pub fn run_sources<W: Write>(
    sources: &[Source],
    containers: &ContainersConfig,
    out: &mut W,
) -> io::Result<HarvestStats> {
    let mut total = HarvestStats::default();

    for source in sources {
        info!(source = %source, "harvesting");
        let stats = match source {
            Source::File(path) => {
                let file = File::open(path).map_err(|e| {
                    io::Error::new(e.kind(), format!("opening {}: {}", path.display(), e))
                })?;
                harvest_reader(BufReader::new(file), containers, out)?
            }
            Source::Stdin => harvest_reader(io::stdin().lock(), containers, out)?,
        };
        info!(
            source = %source,
            messages = stats.messages,
            parse_errors = stats.parse_errors,
            bytes = stats.bytes,
            offset = stats.offset,
            "finished"
        );

        total.messages += stats.messages;
        total.parse_errors += stats.parse_errors;
        total.bytes += stats.bytes;
        total.offset += stats.offset;
    }

    Ok(total)
}

pub fn run(config: &HarvesterConfig, args: &[String]) -> Result<(), Box<dyn std::error::Error>> {
    let sources = sources(args, &config.containers);
    let stdout = io::stdout();
    let mut out = io::BufWriter::new(stdout.lock());

    let total = run_sources(&sources, &config.containers, &mut out)?;
    info!(
        sources = sources.len(),
        messages = total.messages,
        parse_errors = total.parse_errors,
        "done"
    );
    Ok(())
}
