/// hz – static Huffman compression tool.
///
/// Works similar to gzip:
///   hz file.txt          → compress to file.txt.hz (removes original)
///   hz -d file.txt.hz    → decompress to file.txt (removes original)
///   hz -c file.txt       → compress to stdout
///   hz -k file.txt       → keep original after compress
///   hz -l file.txt.hz    → list info about compressed file
///   cat file | hz        → compress stdin to stdout
///   cat file | hz -d     → decompress stdin to stdout
use std::env;
use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use std::process::{self, ExitCode};

use log::{debug, LevelFilter, Log, Metadata, Record};

use hz::container::Format;
use hz::file;
use hz::frequency::get_frequency;
use hz::pipeline::{self, CompressOptions};

/// Writes log records to stderr as `hz: level: message`.
struct StderrLogger;

impl Log for StderrLogger {
    fn enabled(&self, metadata: &Metadata<'_>) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record<'_>) {
        if self.enabled(record.metadata()) {
            let level = record.level().as_str().to_ascii_lowercase();
            eprintln!("hz: {level}: {}", record.args());
        }
    }

    fn flush(&self) {}
}

static LOGGER: StderrLogger = StderrLogger;

fn init_logging(opts: &Opts) {
    let level = if opts.verbose {
        LevelFilter::Debug
    } else if opts.quiet {
        LevelFilter::Error
    } else {
        LevelFilter::Warn
    };
    if log::set_logger(&LOGGER).is_ok() {
        log::set_max_level(level);
    }
}

fn usage() {
    eprintln!("hz - static Huffman compression tool");
    eprintln!();
    eprintln!("Usage: hz [OPTIONS] [FILE]...");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  -d, --decompress   Decompress mode");
    eprintln!("  -c, --stdout       Write to stdout (don't remove original)");
    eprintln!("  -k, --keep         Keep original file");
    eprintln!("  -f, --force        Overwrite existing output files");
    eprintln!("  -l, --list         List info about compressed file");
    eprintln!("  --legacy           Write the header-less legacy container");
    eprintln!("  --verify           Decompress after compressing and compare");
    eprintln!("  -q, --quiet        Suppress warnings");
    eprintln!("  -v, --verbose      Verbose output");
    eprintln!("  -h, --help         Show this help");
    eprintln!();
    eprintln!("If no FILE is given, reads from stdin and writes to stdout.");
    eprintln!("Compressed files use the .hz extension.");
}

#[derive(Debug, Default)]
struct Opts {
    decompress: bool,
    to_stdout: bool,
    keep: bool,
    force: bool,
    list: bool,
    verbose: bool,
    quiet: bool,
    options: CompressOptions,
    files: Vec<String>,
}

fn parse_args() -> Opts {
    let mut opts = Opts::default();

    for arg in env::args().skip(1) {
        match arg.as_str() {
            "-d" | "--decompress" | "--uncompress" => opts.decompress = true,
            "-c" | "--stdout" | "--to-stdout" => opts.to_stdout = true,
            "-k" | "--keep" => opts.keep = true,
            "-f" | "--force" => opts.force = true,
            "-l" | "--list" => opts.list = true,
            "-v" | "--verbose" => opts.verbose = true,
            "-q" | "--quiet" => opts.quiet = true,
            "--legacy" => opts.options.format = Format::Legacy,
            "--verify" => opts.options.verify = true,
            "-h" | "--help" => {
                usage();
                process::exit(0);
            }
            // Handle combined short flags like -dc, -kv, etc.
            s if s.starts_with('-') && !s.starts_with("--") && s.len() > 2 => {
                for ch in s[1..].chars() {
                    match ch {
                        'd' => opts.decompress = true,
                        'c' => opts.to_stdout = true,
                        'k' => opts.keep = true,
                        'f' => opts.force = true,
                        'l' => opts.list = true,
                        'v' => opts.verbose = true,
                        'q' => opts.quiet = true,
                        _ => {
                            eprintln!("hz: unknown flag '-{ch}'");
                            process::exit(1);
                        }
                    }
                }
            }
            s if s.starts_with("--") => {
                eprintln!("hz: unknown option '{s}'");
                process::exit(1);
            }
            _ => opts.files.push(arg.clone()),
        }
    }

    opts
}

/// Determine the output filename for compression.
fn compress_output_path(input: &str) -> PathBuf {
    PathBuf::from(format!("{input}.hz"))
}

/// Determine the output filename for decompression.
fn decompress_output_path(input: &str) -> Option<PathBuf> {
    let path = Path::new(input);
    match path.extension().and_then(|e| e.to_str()) {
        Some("hz") => Some(path.with_extension("")),
        _ => None,
    }
}

fn list_file(path: &str, data: &[u8]) -> Result<(), String> {
    let summary = pipeline::inspect(data).map_err(|e| format!("{path}: {e}"))?;
    let kind = match summary.format {
        Format::Hz => "hz",
        Format::Legacy => "legacy",
    };
    println!(
        "{:>12} {:>12} {:5.1}% {:>7} {:8} {}",
        summary.original_len,
        summary.compressed_len,
        summary.ratio(),
        summary.entries,
        kind,
        path,
    );
    Ok(())
}

fn check_overwrite(opts: &Opts, out_path: &Path) -> Result<(), String> {
    if out_path.exists() && !opts.force {
        return Err(format!(
            "{} already exists; use -f to overwrite",
            out_path.display()
        ));
    }
    Ok(())
}

fn process_compress(opts: &Opts, path: &str) -> Result<(), String> {
    if opts.to_stdout {
        let data = fs::read(path).map_err(|e| format!("{path}: {e}"))?;
        let output = pipeline::compress_with_options(&data, &opts.options)
            .map_err(|e| format!("{path}: {e}"))?;
        return io::stdout()
            .write_all(&output)
            .map_err(|e| format!("stdout: {e}"));
    }

    let out_path = compress_output_path(path);
    check_overwrite(opts, &out_path)?;

    let data = fs::read(path).map_err(|e| format!("{path}: {e}"))?;
    let out_size = file::compress_to_file(&data, &out_path, &opts.options)
        .map_err(|e| format!("{path}: {e}"))?;

    if opts.verbose {
        let in_size = data.len() as u64;
        let ratio = if in_size > 0 {
            (out_size as f64 / in_size as f64) * 100.0
        } else {
            0.0
        };
        eprintln!("{path}: {ratio:.1}% ({in_size} → {out_size} bytes)");
        debug!(
            "{path}: entropy {:.3} bits/byte",
            get_frequency(&data).entropy()
        );
    }

    if !opts.keep {
        fs::remove_file(path).map_err(|e| format!("{path}: cannot remove: {e}"))?;
    }
    Ok(())
}

fn process_decompress(opts: &Opts, path: &str) -> Result<(), String> {
    if opts.to_stdout {
        let data = fs::read(path).map_err(|e| format!("{path}: {e}"))?;
        let output = pipeline::decompress(&data).map_err(|e| format!("{path}: {e}"))?;
        return io::stdout()
            .write_all(&output)
            .map_err(|e| format!("stdout: {e}"));
    }

    let out_path =
        decompress_output_path(path).ok_or_else(|| format!("{path}: unknown suffix -- ignored"))?;
    check_overwrite(opts, &out_path)?;

    let out_size =
        file::decompress_file(Path::new(path), &out_path).map_err(|e| format!("{path}: {e}"))?;

    if opts.verbose {
        let in_size = fs::metadata(path).map(|m| m.len()).unwrap_or(0);
        eprintln!("{path}: {in_size} → {out_size} bytes");
    }

    if !opts.keep {
        fs::remove_file(path).map_err(|e| format!("{path}: cannot remove: {e}"))?;
    }
    Ok(())
}

fn process_stdin_stdout(opts: &Opts) -> Result<(), String> {
    let mut input = Vec::new();
    io::stdin()
        .read_to_end(&mut input)
        .map_err(|e| format!("stdin: {e}"))?;

    let output = if opts.decompress {
        pipeline::decompress(&input)
    } else {
        pipeline::compress_with_options(&input, &opts.options)
    }
    .map_err(|e| format!("stdin: {e}"))?;

    let mut stdout = io::stdout().lock();
    stdout
        .write_all(&output)
        .and_then(|_| stdout.flush())
        .map_err(|e| format!("stdout: {e}"))
}

fn run() -> Result<(), ()> {
    let opts = parse_args();
    init_logging(&opts);
    let mut had_error = false;

    if opts.files.is_empty() {
        if opts.list {
            eprintln!("hz: -l requires a file argument");
            return Err(());
        }
        if let Err(e) = process_stdin_stdout(&opts) {
            eprintln!("hz: {e}");
            return Err(());
        }
        return Ok(());
    }

    if opts.list {
        println!(
            "{:>12} {:>12} {:>6} {:>7} {:8} name",
            "original", "compressed", "ratio", "codes", "type"
        );
        for path in &opts.files {
            let result = fs::read(path)
                .map_err(|e| format!("{path}: {e}"))
                .and_then(|data| list_file(path, &data));
            if let Err(e) = result {
                eprintln!("hz: {e}");
                had_error = true;
            }
        }
        return if had_error { Err(()) } else { Ok(()) };
    }

    for path in &opts.files {
        let result = if path == "-" {
            process_stdin_stdout(&opts)
        } else if opts.decompress {
            process_decompress(&opts, path)
        } else {
            process_compress(&opts, path)
        };

        if let Err(e) = result {
            eprintln!("hz: {e}");
            had_error = true;
        }
    }

    if had_error {
        Err(())
    } else {
        Ok(())
    }
}

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(()) => ExitCode::FAILURE,
    }
}
