//! Password generation command
//!
//! Starts from the generator defaults in settings and applies any flags.

use clap::Args;

use crate::config::Settings;
use crate::error::VaultResult;
use crate::generator::{generate, GeneratorOptions};

/// Arguments for `vault generate`
#[derive(Args, Debug, Default)]
pub struct GenerateArgs {
    /// Password length
    #[arg(short, long)]
    pub length: Option<usize>,
    /// Include uppercase letters
    #[arg(long, overrides_with = "no_upper")]
    pub upper: bool,
    /// Leave out uppercase letters
    #[arg(long, overrides_with = "upper")]
    pub no_upper: bool,
    /// Include lowercase letters
    #[arg(long, overrides_with = "no_lower")]
    pub lower: bool,
    /// Leave out lowercase letters
    #[arg(long, overrides_with = "lower")]
    pub no_lower: bool,
    /// Include digits
    #[arg(long, overrides_with = "no_numbers")]
    pub numbers: bool,
    /// Leave out digits
    #[arg(long, overrides_with = "numbers")]
    pub no_numbers: bool,
    /// Include symbols
    #[arg(long, overrides_with = "no_symbols")]
    pub symbols: bool,
    /// Leave out symbols
    #[arg(long, overrides_with = "symbols")]
    pub no_symbols: bool,
    /// Leave out look-alike characters (0 O 1 l I)
    #[arg(long, overrides_with = "allow_ambiguous")]
    pub exclude_ambiguous: bool,
    /// Allow look-alike characters (0 O 1 l I)
    #[arg(long, overrides_with = "exclude_ambiguous")]
    pub allow_ambiguous: bool,
    /// Number of passwords to generate
    #[arg(short, long, default_value = "1")]
    pub count: usize,
    /// Print the estimated entropy to stderr
    #[arg(short, long)]
    pub entropy: bool,
}

impl GenerateArgs {
    /// Apply the flags on top of `defaults`
    ///
    /// Each class can be switched on or off for this run; unflagged classes
    /// keep their default.
    pub fn options(&self, defaults: &GeneratorOptions) -> GeneratorOptions {
        GeneratorOptions {
            length: self.length.unwrap_or(defaults.length),
            include_upper: toggle(defaults.include_upper, self.upper, self.no_upper),
            include_lower: toggle(defaults.include_lower, self.lower, self.no_lower),
            include_numbers: toggle(defaults.include_numbers, self.numbers, self.no_numbers),
            include_symbols: toggle(defaults.include_symbols, self.symbols, self.no_symbols),
            exclude_ambiguous: toggle(
                defaults.exclude_ambiguous,
                self.exclude_ambiguous,
                self.allow_ambiguous,
            ),
        }
    }
}

fn toggle(default: bool, on: bool, off: bool) -> bool {
    match (on, off) {
        (true, _) => true,
        (_, true) => false,
        _ => default,
    }
}

/// Handle `vault generate`
pub fn handle_generate(settings: &Settings, args: &GenerateArgs) -> VaultResult<()> {
    let options = args.options(&settings.generator);

    for _ in 0..args.count {
        println!("{}", generate(&options)?);
    }

    if args.entropy {
        eprintln!(
            "~{:.0} bits of entropy per password ({} characters from {} symbols)",
            options.entropy_bits(),
            options.length,
            options.alphabet().len()
        );
    }

    Ok(())
}
