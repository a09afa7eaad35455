#![forbid(unsafe_code)]
use std::{env, ffi, io};

use tstlzw::{decode, encode, Config, DEFAULT_CODESIZE, MAX_CODESIZE, MIN_CODESIZE};

fn main() -> CodingResult {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"))
        .target(env_logger::Target::Stderr)
        .init();

    CodingResult::catch_panic(|| {
        let flags = Flags::from_args(env::args_os());
        run_coding(flags)
    })
}

fn run_coding(flags: Flags) -> Result<(), io::Error> {
    let config = Config::new(flags.code_size)?;
    log::debug!("{:?} with {} bit codes", flags.operation, config.code_size());

    let input = io::BufReader::with_capacity(1 << 26, io::stdin());
    let out = io::stdout();
    let out = out.lock();

    match flags.operation {
        Operation::Compress => {
            let mut encoder = encode::Encoder::new(config);
            encoder.into_stream(out).encode_all(input).status
        }
        Operation::Expand => {
            let mut decoder = decode::Decoder::new(config);
            decoder.into_stream(out).decode_all(input).status
        }
    }
}

struct Flags {
    operation: Operation,
    code_size: u8,
}

#[derive(Debug)]
enum Operation {
    Compress,
    Expand,
}

fn command() -> clap::Command<'static> {
    clap::Command::new("lzw")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Compress 7-bit text from stdin to stdout with LZW")
        .arg(
            clap::Arg::new("code_size")
                .short('w')
                .long("word-bits")
                .takes_value(true)
                .value_parser(clap::value_parser!(u8).range(
                    i64::from(MIN_CODESIZE)..=i64::from(MAX_CODESIZE),
                )),
        )
        .arg(
            clap::Arg::new("operation")
                .help("'-' to compress, '+' to expand")
                .required(true)
                .value_parser(["-", "+"]),
        )
}

impl Flags {
    /// Parse the arguments, exiting with a usage message on anything unexpected.
    fn from_args(args: impl Iterator<Item = ffi::OsString>) -> Self {
        let matches = command().get_matches_from(args);

        let operation = match matches.get_one::<String>("operation").map(String::as_str) {
            Some("-") => Operation::Compress,
            Some("+") => Operation::Expand,
            _ => unreachable!("unparsed operation"),
        };

        let code_size = matches
            .get_one::<u8>("code_size")
            .copied()
            .unwrap_or(DEFAULT_CODESIZE);

        Flags {
            operation,
            code_size,
        }
    }
}

enum CodingResult {
    Ok,
    Err(io::Error),
    Panic,
}

impl CodingResult {
    fn catch_panic(op: fn() -> Result<(), io::Error>) -> Self {
        std::panic::catch_unwind(|| match op() {
            Ok(()) => CodingResult::Ok,
            Err(err) => CodingResult::Err(err),
        })
        .unwrap_or(CodingResult::Panic)
    }
}

impl std::process::Termination for CodingResult {
    fn report(self) -> std::process::ExitCode {
        match self {
            CodingResult::Ok => std::process::ExitCode::SUCCESS,
            CodingResult::Err(err) => {
                eprintln!("{}", err);
                std::process::ExitCode::FAILURE
            }
            CodingResult::Panic => {
                eprintln!(
                    "The process failed irrecoverably! This should never happen and is a bug."
                );
                std::process::ExitCode::from(128)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::command;

    #[test]
    fn accepts_both_operations() {
        assert!(command().try_get_matches_from(["lzw", "-"]).is_ok());
        assert!(command().try_get_matches_from(["lzw", "+"]).is_ok());
        assert!(command().try_get_matches_from(["lzw", "-w", "12", "+"]).is_ok());
    }

    #[test]
    fn rejects_other_arguments() {
        assert!(command().try_get_matches_from(["lzw"]).is_err());
        assert!(command().try_get_matches_from(["lzw", "x"]).is_err());
        assert!(command().try_get_matches_from(["lzw", "-w", "30", "-"]).is_err());
    }
}
