// Command-line option parsing and the process-wide settings it
// produces.
//
// `Settings` is the explicit owner of the parsed values; `parse()`
// stores the result behind a `lazy_static`-declared global so the rest
// of the crate (and, in tests, `reset_to_defaults()`) can reach it
// without threading a `&Settings` through every call.
use std::sync::Mutex;

use lazy_static::lazy_static;

use crate::error::SolverError;
use crate::optimizations::{OptimizationKind, RegexOptimizations};
use crate::utils;

const NUM_SOLUTIONS_TO_FIND_DEFAULT: u32 = 2;

#[derive(Debug, Clone)]
pub struct Settings {
    program_path: String,
    help_is_requested: bool,
    version_is_requested: bool,
    is_verbose: bool,
    input_filepath: String,
    log_filepath: String,
    num_solutions_to_find: u32,
    optimize_concatenations: bool,
    optimize_groups: bool,
    optimize_unions: bool,
    was_parsed: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            program_path: String::new(),
            help_is_requested: false,
            version_is_requested: false,
            is_verbose: false,
            input_filepath: String::new(),
            log_filepath: String::new(),
            num_solutions_to_find: NUM_SOLUTIONS_TO_FIND_DEFAULT,
            optimize_concatenations: true,
            optimize_groups: true,
            optimize_unions: true,
            was_parsed: false,
        }
    }
}

impl Settings {
    fn parse(args: &[String]) -> Result<Self, SolverError> {
        let mut settings = Settings::default();

        let mut it = args.iter();
        settings.program_path = it
            .next()
            .cloned()
            .ok_or_else(|| SolverError::CommandLine("missing program name".to_string()))?;

        let rest: Vec<&String> = it.collect();
        let mut idx = 0;

        if let Some(first) = rest.first() {
            if is_help_option(first) {
                idx += 1;
                settings.help_is_requested = true;
                check_no_more_arguments(&rest[idx..])?;
                settings.was_parsed = true;
                return Ok(settings);
            }

            if is_version_option(first) {
                idx += 1;
                settings.version_is_requested = true;
                check_no_more_arguments(&rest[idx..])?;
                settings.was_parsed = true;
                return Ok(settings);
            }
        }

        while idx < rest.len() && is_option(rest[idx]) {
            let option = rest[idx];
            idx += 1;

            if utils::starts_with(option, "--log") {
                settings.log_filepath = parse_log_option(option)?;
            } else if option == "--no-concat-optim" {
                settings.optimize_concatenations = false;
            } else if option == "--no-group-optim" {
                settings.optimize_groups = false;
            } else if option == "--no-optim" {
                settings.optimize_concatenations = false;
                settings.optimize_groups = false;
                settings.optimize_unions = false;
            } else if option == "--no-union-optim" {
                settings.optimize_unions = false;
            } else if utils::starts_with(option, "--stop-after") {
                settings.num_solutions_to_find = parse_stop_after_option(option)?;
            } else if option == "--verbose" || option == "-v" {
                settings.is_verbose = true;
            } else {
                return Err(SolverError::CommandLine(format!(
                    "unrecognized option: {}",
                    utils::quoted(option)
                )));
            }
        }

        if idx == rest.len() {
            return Err(SolverError::CommandLine("missing arguments".to_string()));
        }

        settings.input_filepath = rest[idx].clone();
        idx += 1;
        check_no_more_arguments(&rest[idx..])?;

        settings.was_parsed = true;
        Ok(settings)
    }

    /// Unlike the other accessors, this one is also used to print
    /// usage/error hints when parsing itself failed, so it does not
    /// require a successful `parse()` first.
    pub fn program_path(&self) -> &str {
        &self.program_path
    }

    pub fn help_is_requested(&self) -> bool {
        debug_assert!(self.was_parsed);
        self.help_is_requested
    }

    pub fn version_is_requested(&self) -> bool {
        debug_assert!(self.was_parsed);
        self.version_is_requested
    }

    pub fn is_verbose(&self) -> bool {
        debug_assert!(self.was_parsed);
        self.is_verbose
    }

    pub fn input_filepath(&self) -> &str {
        debug_assert!(self.was_parsed);
        &self.input_filepath
    }

    pub fn log_filepath(&self) -> &str {
        debug_assert!(self.was_parsed);
        &self.log_filepath
    }

    pub fn num_solutions_to_find(&self) -> u32 {
        debug_assert!(self.was_parsed);
        self.num_solutions_to_find
    }

    pub fn regex_optimizations(&self) -> RegexOptimizations {
        debug_assert!(self.was_parsed);
        let mut optimizations = RegexOptimizations::all();
        optimizations.set(OptimizationKind::Concatenations, self.optimize_concatenations);
        optimizations.set(OptimizationKind::Groups, self.optimize_groups);
        optimizations.set(OptimizationKind::Unions, self.optimize_unions);
        optimizations
    }
}

fn is_help_option(arg: &str) -> bool {
    arg == "--help" || arg == "-h"
}

fn is_version_option(arg: &str) -> bool {
    arg == "--version"
}

fn is_option(arg: &str) -> bool {
    utils::starts_with(arg, "-")
}

fn parse_value_option(option: &str, specifier: &str) -> Result<String, SolverError> {
    debug_assert!(utils::starts_with(option, specifier));

    if option.len() == specifier.len() || option.as_bytes()[specifier.len()] != b'=' {
        return Err(SolverError::CommandLine(format!(
            "missing '=' after {}",
            utils::quoted(specifier)
        )));
    }

    let value = &option[specifier.len() + 1..];

    if value.is_empty() {
        return Err(SolverError::CommandLine(format!(
            "missing value after {}",
            utils::quoted(&format!("{specifier}="))
        )));
    }

    Ok(value.to_string())
}

fn parse_log_option(option: &str) -> Result<String, SolverError> {
    let log_filepath = parse_value_option(option, "--log")?;
    check_log_option(&log_filepath)?;
    Ok(log_filepath)
}

fn parse_stop_after_option(option: &str) -> Result<u32, SolverError> {
    let specifier = "--stop-after";
    let value = parse_value_option(option, specifier)?;

    if value == "-1" {
        return Ok(u32::MAX);
    }

    let n = utils::string_to_unsigned::<u32>(&value).ok_or_else(|| {
        SolverError::CommandLine(format!("invalid value for {}", utils::quoted(specifier)))
    })?;

    if n == 0 {
        return Err(SolverError::CommandLine(format!(
            "value for {} must not be 0",
            utils::quoted(specifier)
        )));
    }

    Ok(n)
}

fn check_log_option(log_filepath: &str) -> Result<(), SolverError> {
    debug_assert!(!log_filepath.is_empty());

    if !cfg!(feature = "logging") {
        return Err(SolverError::CommandLine(
            "Logging is not enabled.\nRebuild the program with the 'logging' feature enabled\nin order to use option '--log'.\n"
                .to_string(),
        ));
    }

    if log_filepath != "-" && utils::filesystem_entity_exists(log_filepath) {
        return Err(SolverError::CommandLine(format!(
            "log file {} already exists",
            utils::quoted(log_filepath)
        )));
    }

    Ok(())
}

fn check_no_more_arguments(remaining: &[&String]) -> Result<(), SolverError> {
    if remaining.is_empty() {
        Ok(())
    } else {
        Err(SolverError::CommandLine("extra arguments".to_string()))
    }
}

lazy_static! {
    static ref SETTINGS: Mutex<Settings> = Mutex::new(Settings::default());
}

/// Parse `args` (including the program name at index 0) and install the
/// result as the process-wide settings.
///
/// The program name is recorded even if parsing later fails, so that an
/// error arising from a bad option can still be rendered with an
/// accurate `meta_usage()` hint.
pub fn parse(args: &[String]) -> Result<(), SolverError> {
    if let Some(program_path) = args.first() {
        SETTINGS.lock().unwrap().program_path = program_path.clone();
    }

    let settings = Settings::parse(args)?;
    *SETTINGS.lock().unwrap() = settings;
    Ok(())
}

pub fn help_is_requested() -> bool {
    SETTINGS.lock().unwrap().help_is_requested()
}

pub fn version_is_requested() -> bool {
    SETTINGS.lock().unwrap().version_is_requested()
}

pub fn is_verbose() -> bool {
    SETTINGS.lock().unwrap().is_verbose()
}

pub fn input_filepath() -> String {
    SETTINGS.lock().unwrap().input_filepath().to_string()
}

pub fn log_filepath() -> String {
    SETTINGS.lock().unwrap().log_filepath().to_string()
}

pub fn num_solutions_to_find() -> u32 {
    SETTINGS.lock().unwrap().num_solutions_to_find()
}

pub fn regex_optimizations() -> RegexOptimizations {
    SETTINGS.lock().unwrap().regex_optimizations()
}

/// Used by unit tests, and by the CLI driver before parsing.
pub fn reset_to_defaults() {
    *SETTINGS.lock().unwrap() = Settings::default();
}

pub fn meta_usage() -> String {
    let program_path = SETTINGS.lock().unwrap().program_path().to_string();
    format!(
        "For information on command line usage:\n    {program_path} --help\n"
    )
}

pub fn print_usage() -> String {
    let settings = SETTINGS.lock().unwrap();
    let program_path = settings.program_path().to_string();
    let default_num_solutions = NUM_SOLUTIONS_TO_FIND_DEFAULT;
    drop(settings);

    format!(
        "\n\
         USAGE:\n\
         \x20\x20\x20\x20{program_path} <option>* <input file>\n\
         or:\n\
         \x20\x20\x20\x20{program_path} --help     Print this screen and exit.\n\
         \x20\x20\x20\x20{program_path} -h         Same as '--help'.\n\
         or:\n\
         \x20\x20\x20\x20{program_path} --version  Print the version and exit.\n\
         \n\
         with <option> one of:\n\
         \n\
         \x20\x20\x20\x20--log=<log file>   For this option to work, the program must be built\n\
         \x20\x20\x20\x20                   with the 'logging' feature enabled,\n\
         \x20\x20\x20\x20                   and <log file> must not already exist.\n\
         \x20\x20\x20\x20                   If <log file> is '-', the log is printed to the console.\n\
         \x20\x20\x20\x20--no-concat-optim  Disable concatenation optimization\n\
         \x20\x20\x20\x20                   (concatenations are optimized by default).\n\
         \x20\x20\x20\x20--no-group-optim   Disable group optimization\n\
         \x20\x20\x20\x20                   (groups are optimized by default).\n\
         \x20\x20\x20\x20--no-union-optim   Disable union optimization\n\
         \x20\x20\x20\x20                   (unions are optimized by default).\n\
         \x20\x20\x20\x20--no-optim         Same as\n\
         \x20\x20\x20\x20                   '--no-concat-optim --no-group-optim --no-union-optim'.\n\
         \x20\x20\x20\x20--stop-after=<n>   Stop after <n> solutions have been found.\n\
         \x20\x20\x20\x20                   If <n> is -1, all solutions are to be found.\n\
         \x20\x20\x20\x20                   Default is {default_num_solutions}.\n\
         \x20\x20\x20\x20-v                 Same as '--verbose'.\n\
         \x20\x20\x20\x20--verbose          Verbose information includes timing results.\n\
         \n\
         EXAMPLES:\n\
         \x20\x20\x20\x20{program_path} MIT.input.txt\n\
         \x20\x20\x20\x20{program_path} --log=MIT.log --no-concat-optim MIT.input.txt\n\
         \n\
         \x20\x20\x20\x20See directory 'grid_tests' for example input files.\n\n"
    )
}

pub fn print_version() -> String {
    "\n    Regex Crossword Tokenizer, version 0.1.0\n\n".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    // These exercise `Settings::parse` directly rather than the
    // process-wide `parse()`/`reset_to_defaults()` pair, so that tests
    // running concurrently on separate threads don't trip over each
    // other's global state.

    fn args(strs: &[&str]) -> Vec<String> {
        strs.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn no_arguments_is_an_error() {
        assert!(Settings::parse(&args(&["program"])).is_err());
    }

    #[test]
    fn help_and_extra_argument_is_an_error() {
        assert!(Settings::parse(&args(&["program", "--help", "foo"])).is_err());
    }

    #[test]
    fn help_sets_the_flag() {
        let settings = Settings::parse(&args(&["program", "--help"])).unwrap();
        assert!(settings.help_is_requested());
    }

    #[test]
    fn help_abbreviated() {
        let settings = Settings::parse(&args(&["program", "-h"])).unwrap();
        assert!(settings.help_is_requested());
    }

    #[test]
    fn help_and_version_are_not_default() {
        let settings = Settings::parse(&args(&["program", "input_file"])).unwrap();
        assert!(!settings.help_is_requested());
        assert!(!settings.version_is_requested());
    }

    #[test]
    fn verbose_without_input_file_is_an_error() {
        assert!(Settings::parse(&args(&["program", "--verbose"])).is_err());
    }

    #[test]
    fn verbose_is_recognized() {
        let settings = Settings::parse(&args(&["program", "--verbose", "input_file"])).unwrap();
        assert!(settings.is_verbose());
    }

    #[test]
    fn verbose_abbreviated() {
        let settings = Settings::parse(&args(&["program", "-v", "input_file"])).unwrap();
        assert!(settings.is_verbose());
    }

    #[test]
    fn invalid_option_is_an_error() {
        assert!(Settings::parse(&args(&["program", "--foo", "input_file"])).is_err());
    }

    #[test]
    fn stop_after_minus_one_means_unbounded() {
        let settings =
            Settings::parse(&args(&["program", "--stop-after=-1", "input_file"])).unwrap();
        assert_eq!(settings.num_solutions_to_find(), u32::MAX);
    }

    #[test]
    fn stop_after_zero_is_rejected() {
        assert!(Settings::parse(&args(&["program", "--stop-after=0", "input_file"])).is_err());
    }

    #[test]
    fn stop_after_without_equals_is_rejected() {
        assert!(Settings::parse(&args(&["program", "--stop-after", "input_file"])).is_err());
    }

    #[test]
    fn no_optim_disables_all_three() {
        let settings = Settings::parse(&args(&["program", "--no-optim", "input_file"])).unwrap();
        let opts = settings.regex_optimizations();
        assert!(!opts.optimize_concatenations());
        assert!(!opts.optimize_groups());
        assert!(!opts.optimize_unions());
    }

    #[test]
    fn log_option_is_rejected_without_the_logging_feature() {
        if !cfg!(feature = "logging") {
            assert!(Settings::parse(&args(&["program", "--log=out.log", "input_file"])).is_err());
        }
    }

    #[test]
    fn reset_to_defaults_restores_the_global_settings() {
        parse(&args(&["program", "--verbose", "input_file"])).unwrap();
        reset_to_defaults();
        assert!(!is_verbose());
    }
}
