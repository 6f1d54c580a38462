//! RSA toy CLI
//!
//! Thin front-end over the engine: every command builds a [`Session`] from the
//! configuration plus flags and prints what the engine returns.

use std::path::PathBuf;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use tracing_subscriber::EnvFilter;

use rsa_toy::rsa::keygen::DEFAULT_PRIME_BITS;
use rsa_toy::rsa::{
    decrypt_block, encrypt_block, gcd, is_prime, mod_inverse, validate_prime_pair, Precision,
    PrimePair, Progress,
};
use rsa_toy::util::file_ops;
use rsa_toy::{Config, Session};

/// Educational RSA: toy keys and a letter/space/punctuation codec
#[derive(Parser)]
#[command(name = "rsa-toy")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Configuration file path
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(flatten)]
    keys: KeyArgs,

    /// Use arbitrary-precision arithmetic
    #[arg(long, global = true)]
    large_numbers: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Overrides for the configured key parameters
#[derive(Args)]
struct KeyArgs {
    /// First prime
    #[arg(short, long, global = true)]
    p: Option<u64>,

    /// Second prime
    #[arg(short, long, global = true)]
    q: Option<u64>,

    /// Public exponent
    #[arg(short, long, global = true)]
    e: Option<u64>,
}

#[derive(Subcommand)]
enum Commands {
    /// Derive n, φ(n) and d and show the calculation steps
    Keys,

    /// Check the prime pair without deriving keys
    Validate,

    /// Pick a random prime pair and derive keys from it
    Generate {
        /// Size of each prime in bits
        #[arg(short, long, default_value_t = DEFAULT_PRIME_BITS)]
        bits: u32,
    },

    /// Encrypt a text message
    Encrypt {
        /// Message text (read from --input when omitted)
        text: Option<String>,

        /// Read the message from a file
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Map . , ! ? ; to 27-31
        #[arg(long)]
        punctuation: bool,

        /// Save the result to a file
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Print each "value → encrypted" step
        #[arg(long)]
        trace: bool,
    },

    /// Decrypt space-separated cipher numbers
    Decrypt {
        /// Cipher numbers, e.g. "01 32 27 01 08" (read from --input when omitted)
        cipher: Option<String>,

        /// Read the cipher text from a file
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Map 27-31 back to . , ! ? ;
        #[arg(long)]
        punctuation: bool,

        /// Save the result to a file
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Print each "value → decrypted" step
        #[arg(long)]
        trace: bool,
    },

    /// Export the derived keys as JSON
    Export {
        /// Destination file
        path: PathBuf,
    },

    /// Import keys from JSON, re-deriving them from p, q and e
    Import {
        /// Key file
        path: PathBuf,
    },

    /// Run the built-in engine checks
    Selftest,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => Config::load(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => Config::load_or_default()?,
    };
    config.validate()?;

    // Initialize logging
    let level = if cli.verbose { "debug" } else { config.logging.level.as_str() };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let mut session = Session::new(&config);
    let primes = session.primes();
    session.set_primes(cli.keys.p.unwrap_or(primes.p), cli.keys.q.unwrap_or(primes.q));
    if let Some(e) = cli.keys.e {
        session.set_exponent(e);
    }
    if cli.large_numbers {
        session.set_use_large_numbers(true);
    }

    match cli.command {
        Commands::Keys => show_keys(&mut session)?,
        Commands::Validate => validate(&session),
        Commands::Generate { bits } => {
            let pair = session.generate_primes(bits)?;
            println!("Generated primes:\np = {}\nq = {}", pair.p, pair.q);
            show_keys(&mut session)?;
        }
        Commands::Encrypt {
            text,
            input,
            punctuation,
            output,
            trace,
        } => {
            let text = read_input(text, input)?;
            let report = with_progress(trace, |observer| session.encrypt(&text, punctuation, observer))?;
            emit(&report.to_string(), output)?;
        }
        Commands::Decrypt {
            cipher,
            input,
            punctuation,
            output,
            trace,
        } => {
            let cipher = read_input(cipher, input)?;
            let report = with_progress(trace, |observer| session.decrypt(&cipher, punctuation, observer))?;
            emit(&report.to_string(), output)?;
        }
        Commands::Export { path } => {
            let keys = session.calculate_keys()?;
            file_ops::export_keys(&path, &keys)?;
            println!("Keys exported to {}", path.display());
        }
        Commands::Import { path } => {
            let record = file_ops::import_record(&path)
                .with_context(|| format!("invalid key file {}", path.display()))?;
            session.load_record(&record)?;
            println!("Keys imported from {}", path.display());
            show_keys(&mut session)?;
        }
        Commands::Selftest => selftest()?,
    }

    Ok(())
}

fn show_keys(session: &mut Session) -> anyhow::Result<()> {
    let keys = session.calculate_keys()?;
    let assessment = keys.security();

    println!("n = {}", keys.n);
    println!("φ(n) = {}", keys.phi);
    println!("d = {}", keys.d);
    println!("Security Level: {}", assessment.level);
    println!("Entropy bits: ~{:.1} bits", assessment.entropy_bits);
    println!();
    println!("{}", keys.details(session.precision()));
    Ok(())
}

fn validate(session: &Session) {
    let PrimePair { p, q } = session.primes();
    let validation = session.validate();

    if validation.errors.is_empty() && validation.warnings.is_empty() {
        println!("✓ Both {p} and {q} are valid primes!\nNo security issues detected.");
    } else if !validation.errors.is_empty() {
        println!("✗ Critical issues:\n{}", validation.errors.join("\n"));
    } else {
        println!("✓ Primes are valid but:\n{}", validation.warnings.join("\n"));
    }
}

fn read_input(inline: Option<String>, input: Option<PathBuf>) -> anyhow::Result<String> {
    match (inline, input) {
        (Some(text), _) => Ok(text),
        (None, Some(path)) => Ok(file_ops::read_text(&path)?),
        (None, None) => anyhow::bail!("no input: pass text or --input <FILE>"),
    }
}

fn emit(content: &str, output: Option<PathBuf>) -> anyhow::Result<()> {
    println!("{content}");
    if let Some(path) = output {
        file_ops::save_result(&path, content)?;
        println!("Result saved to {}", path.display());
    }
    Ok(())
}

/// Run a block operation with a progress bar, printing trace lines when asked
fn with_progress<T>(
    show_trace: bool,
    run: impl FnOnce(Option<&mut dyn FnMut(&Progress)>) -> rsa_toy::RsaResult<T>,
) -> anyhow::Result<T> {
    let bar = ProgressBar::new(100);
    bar.set_style(
        ProgressStyle::default_bar()
            .template("[{wide_bar:.cyan/blue}] {pos}%")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("#>-"),
    );

    let mut observer = |progress: &Progress| {
        bar.set_position(u64::from(progress.percent));
        if let Some(line) = progress.trace.as_deref().filter(|_| show_trace) {
            bar.println(line);
        }
    };

    let result = run(Some(&mut observer));
    bar.finish_and_clear();
    Ok(result?)
}

fn selftest() -> anyhow::Result<()> {
    println!("Running RSA engine self test...\n");

    println!("Test 1: Prime number validation");
    anyhow::ensure!(is_prime(3) && !is_prime(4) && is_prime(11), "prime test failed");
    println!("✓ Passed\n");

    println!("Test 2: GCD calculation");
    anyhow::ensure!(gcd(20, 3) == 1 && gcd(12, 8) == 4, "gcd test failed");
    println!("✓ Passed\n");

    println!("Test 3: Modular inverse");
    anyhow::ensure!(mod_inverse(3, 20)? == 7, "modular inverse test failed");
    println!("✓ Passed\n");

    println!("Test 4: 'A CAB' example");
    let plain = [1u64, 32, 3, 1, 2];
    let expected = [1u64, 32, 27, 1, 8];
    for (m, c) in plain.iter().zip(expected) {
        let enc = encrypt_block(*m, 3, 33, Precision::Native)?;
        anyhow::ensure!(enc == c, "expected {c}, got {enc}");
    }
    println!("✓ Encryption passed");
    for (c, m) in expected.iter().zip(plain) {
        let dec = decrypt_block(*c, 7, 33, Precision::Native)?;
        anyhow::ensure!(dec == m, "expected {m}, got {dec}");
    }
    println!("✓ Decryption passed\n");

    println!("Test 5: Security validation");
    anyhow::ensure!(!validate_prime_pair(3, 3).is_valid(), "p == q must be rejected");
    anyhow::ensure!(validate_prime_pair(3, 11).is_valid(), "(3, 11) must be accepted");
    println!("✓ Passed\n");

    println!("{}", "=".repeat(50));
    println!("All tests passed successfully! ✓");
    Ok(())
}
