// The CLI driver: parse the command line, tokenize every clue in the
// input file, and print a JSON report of the resulting token streams
// or the first error encountered.
use std::io::{self, Write};
use std::process;
use std::time::Instant;

use serde::Serialize;

use regex_crossword_tokenizer::{command_line, logger, utils, SolverError, Token, Tokenizer};

#[derive(Serialize)]
enum CliOutput {
    Success(Vec<Vec<Token>>),
    Error(SolverError),
}

/// Tokenize one clue line fully, turning a tokenizer `Invalid` into a
/// `RegexParse` error naming the offending byte position.
fn tokenize_line(line: &str) -> Result<Vec<Token>, SolverError> {
    let mut tokenizer = Tokenizer::new(line);
    let mut tokens = Vec::new();

    loop {
        let token = tokenizer.consume();

        if token.is_end() {
            return Ok(tokens);
        }

        if let Token::Invalid(message) = &token {
            return Err(SolverError::RegexParse {
                message: message.clone(),
                regex: line.to_string(),
                position: tokenizer.position(),
            });
        }

        tokens.push(token);
    }
}

/// Tokenize every non-blank line of `input_filepath`, one clue per
/// line. Stops at the first line that fails to tokenize.
fn tokenize_input_file(input_filepath: &str) -> Result<Vec<Vec<Token>>, SolverError> {
    let contents = std::fs::read_to_string(input_filepath)
        .map_err(|e| SolverError::InputFile(format!("{}: {e}", utils::quoted(input_filepath))))?;

    utils::split_into_lines(&contents)
        .iter()
        .enumerate()
        .filter(|(_, line)| !utils::has_only_whitespace(line))
        .map(|(i, line)| {
            tokenize_line(line).map_err(|e| SolverError::InputFileAt {
                path: input_filepath.to_string(),
                line: i + 1,
                source_line: line.clone(),
                message: e.to_string(),
            })
        })
        .collect()
}

/// Returns `Ok(true)` on success (including a bare `--help`/`--version`),
/// `Ok(false)` if tokenization failed, or `Err` for a command-line or
/// I/O failure that happens before any JSON can be printed.
fn throwing_main() -> Result<bool, SolverError> {
    let args: Vec<String> = std::env::args().collect();
    command_line::parse(&args)?;

    logger::init();

    if command_line::help_is_requested() {
        print!("{}", command_line::print_usage());
        return Ok(true);
    }

    if command_line::version_is_requested() {
        print!("{}", command_line::print_version());
        return Ok(true);
    }

    let log_filepath = command_line::log_filepath();
    if !log_filepath.is_empty() {
        logger::set_log_filepath(&log_filepath)?;
    }

    let input_filepath = command_line::input_filepath();
    let start = Instant::now();
    let result = tokenize_input_file(&input_filepath);
    let elapsed = start.elapsed();
    let succeeded = result.is_ok();

    let output = match result {
        Ok(token_lines) => CliOutput::Success(token_lines),
        Err(e) => CliOutput::Error(e),
    };

    match serde_json::to_string_pretty(&output) {
        Ok(json) => println!("{json}"),
        Err(e) => {
            let message = format!("Internal error: failed to serialize output: {e}\n");
            io::stderr().write_all(message.as_bytes()).ok();
            process::exit(1);
        }
    }

    utils::print_verbose_message(
        &mut io::stderr(),
        format!(
            "tokenized {} in {:.3}s",
            utils::quoted(&input_filepath),
            elapsed.as_secs_f64()
        ),
    );

    Ok(succeeded)
}

fn main() {
    match throwing_main() {
        Ok(true) => {}
        Ok(false) => process::exit(1),
        Err(e) => {
            eprintln!("{e}");
            process::exit(1);
        }
    }
}
