use clap::Parser;
use colored::Colorize;

use autograder_maker::error::NiceError;
use autograder_maker::opt::Opt;
use autograder_maker_format::{generate, validate_file, ValidationResult};

fn print_findings(result: &ValidationResult) {
    for warning in &result.warnings {
        eprintln!("{}: {}", "Warning".bright_yellow().bold(), warning);
    }
    for error in &result.errors {
        eprintln!("{}: {}", "Error".bright_red().bold(), error);
    }
}

fn main() {
    let opt = Opt::parse();
    opt.logger.enable_log();

    if opt.validate_only {
        let result = validate_file(&opt.config).nice_unwrap();
        print_findings(&result);
        if !result.is_valid {
            std::process::exit(1);
        }
        println!("{}", "Configuration is valid".bright_green().bold());
    } else {
        let outcome = generate(&opt.config, &opt.output).nice_unwrap();
        print_findings(&outcome.validation);
        match outcome.archive {
            Some(path) => println!(
                "{} {}",
                "Bundle written to".bright_green().bold(),
                path.display()
            ),
            None => std::process::exit(1),
        }
    }
}
