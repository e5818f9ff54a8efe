// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use std::path::PathBuf;
use std::process;

use pico_args::Arguments;

const HELP: &str = "\
flatgrad replaces SVG linearGradient fills with solid colors and converts the result to PDF.

USAGE:
  flatgrad [OPTIONS]

OPTIONS:
  -h, --help                        Prints help information
  -V, --version                     Prints version information

  --input PATH                      Input SVG path
                                    [default: Graphs-Screenshot.svg]
  --output-svg PATH                 Output SVG path
                                    [default: newSVG.svg]
  --output-pdf PATH                 Output PDF path
                                    [default: Graphs-Screenshot.pdf]

EXIT STATUS:
  0                                 Success
  1                                 Any other failure, including PDF conversion
  2                                 Input file doesn't exist
  3                                 Input is not a well-formed SVG
";

#[derive(Debug)]
struct Args {
    input: PathBuf,
    output_svg: PathBuf,
    output_pdf: PathBuf,
}

fn collect_args() -> Result<Args, pico_args::Error> {
    let mut input = Arguments::from_env();

    if input.contains(["-h", "--help"]) {
        print!("{}", HELP);
        process::exit(0);
    }

    if input.contains(["-V", "--version"]) {
        println!("{}", env!("CARGO_PKG_VERSION"));
        process::exit(0);
    }

    let args = Args {
        input: input
            .opt_value_from_os_str("--input", parse_path)?
            .unwrap_or_else(|| PathBuf::from("Graphs-Screenshot.svg")),
        output_svg: input
            .opt_value_from_os_str("--output-svg", parse_path)?
            .unwrap_or_else(|| PathBuf::from("newSVG.svg")),
        output_pdf: input
            .opt_value_from_os_str("--output-pdf", parse_path)?
            .unwrap_or_else(|| PathBuf::from("Graphs-Screenshot.pdf")),
    };

    let remaining = input.finish();
    if !remaining.is_empty() {
        return Err(pico_args::Error::ArgumentParsingFailed {
            cause: format!("unexpected arguments: {:?}", remaining),
        });
    }

    Ok(args)
}

fn parse_path(s: &std::ffi::OsStr) -> Result<PathBuf, &'static str> {
    Ok(s.into())
}

fn main() {
    if let Ok(()) = log::set_logger(&LOGGER) {
        log::set_max_level(log::LevelFilter::Info);
    }

    let args = match collect_args() {
        Ok(v) => v,
        Err(e) => {
            log::error!("{}.", e);
            process::exit(1);
        }
    };

    if let Err(e) = process(&args) {
        log::error!("{}.", e);
        process::exit(e.exit_code());
    }
}

fn process(args: &Args) -> Result<(), flatgrad::Error> {
    flatgrad::process_svg(&args.input, &args.output_svg, &mut flatgrad::LogReporter)?;
    log::info!("Wrote: {}", args.output_svg.display());

    flatgrad::render::svg_to_pdf(&args.output_svg, &args.output_pdf)?;
    log::info!("Wrote: {}", args.output_pdf.display());

    Ok(())
}

/// A simple stderr logger.
static LOGGER: SimpleLogger = SimpleLogger;
struct SimpleLogger;
impl log::Log for SimpleLogger {
    fn enabled(&self, metadata: &log::Metadata) -> bool {
        metadata.level() <= log::LevelFilter::Info
    }

    fn log(&self, record: &log::Record) {
        if self.enabled(record.metadata()) {
            let args = record.args();

            match record.level() {
                log::Level::Error => eprintln!("Error: {}", args),
                log::Level::Warn => eprintln!("Warning: {}", args),
                log::Level::Info => eprintln!("Info: {}", args),
                log::Level::Debug => eprintln!("Debug: {}", args),
                log::Level::Trace => eprintln!("Trace: {}", args),
            }
        }
    }

    fn flush(&self) {}
}
