//! CLI for RSA small private exponent vulnerability analysis

use anyhow::Result;
use clap::{Parser, Subcommand};
use serde::Serialize;
use smalld::attack::{Attack, AttackError, AttackResult, WienerAttack};
use smalld::key::{PublicKey, PublicKeyInput};
use smalld::provider::load_keys;
use std::process::ExitCode;
use std::time::Instant;

#[derive(Parser)]
#[command(name = "smalld")]
#[command(about = "RSA small private exponent vulnerability analysis")]
struct Cli {
    #[command(subcommand)]
    command: Command,

    #[arg(long, global = true)]
    json: bool,
}

#[derive(Subcommand)]
enum Command {
    /// Run Wiener's attack on a single public key
    Attack {
        /// Public exponent e (decimal)
        e: String,

        /// Modulus N (decimal)
        n: String,

        #[arg(long, help = "Print continued-fraction diagnostics to stderr")]
        verbose: bool,
    },

    /// Run the attack over every key in a JSON, CSV or bin_size dataset file
    Analyze {
        #[arg(default_value = "-")]
        input: String,

        #[arg(long, help = "Print continued-fraction diagnostics to stderr")]
        verbose: bool,
    },
}

// Exit codes: 0 success, 2 usage or invalid input, 3 no solution,
// 4 divisibility inconsistency, 5 verification failure. clap itself
// exits with 2 on usage errors.
fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::from(2)
        }
    }
}

fn run(cli: Cli) -> Result<ExitCode> {
    match cli.command {
        Command::Attack { e, n, verbose } => run_attack(&e, &n, verbose, cli.json),
        Command::Analyze { input, verbose } => run_analyze(&input, verbose, cli.json),
    }
}

#[derive(Serialize)]
struct AttackOutput {
    status: String,
    p: Option<String>,
    q: Option<String>,
    d: Option<String>,
    verified: bool,
    elapsed_us: u64,
    error: Option<String>,
}

fn run_attack(e_text: &str, n_text: &str, verbose: bool, json: bool) -> Result<ExitCode> {
    let key = PublicKey::try_from(PublicKeyInput {
        e: e_text.to_string(),
        n: n_text.to_string(),
        d: None,
    })?;

    let attack = WienerAttack::new(verbose);
    let started = Instant::now();
    let outcome = attack.run(&key);
    let elapsed_us = started.elapsed().as_micros() as u64;

    match outcome {
        Ok(result) => {
            if json {
                let output = AttackOutput {
                    status: "recovered".to_string(),
                    p: Some(result.p.to_string()),
                    q: Some(result.q.to_string()),
                    d: Some(result.d.to_string()),
                    verified: result.verified,
                    elapsed_us,
                    error: None,
                };
                println!("{}", serde_json::to_string_pretty(&output)?);
            } else {
                println!("Wiener attack successful!");
                println!("p = {}", result.p);
                println!("q = {}", result.q);
                println!("d = {}", result.d);
                println!("Time (us) = {elapsed_us}");
            }
            Ok(ExitCode::SUCCESS)
        }
        Err(err) => {
            if json {
                let output = AttackOutput {
                    status: attack_error_status(&err).to_string(),
                    p: None,
                    q: None,
                    d: None,
                    verified: false,
                    elapsed_us,
                    error: Some(err.to_string()),
                };
                println!("{}", serde_json::to_string_pretty(&output)?);
            } else {
                eprintln!("Wiener attack failed: {err}");
            }
            Ok(attack_error_exit_code(&err))
        }
    }
}

fn attack_error_exit_code(err: &AttackError) -> ExitCode {
    match err {
        AttackError::NoSolutionFound => ExitCode::from(3),
        AttackError::DivisibilityInconsistency => ExitCode::from(4),
        AttackError::VerificationFailed { .. } => ExitCode::from(5),
    }
}

fn attack_error_status(err: &AttackError) -> &'static str {
    match err {
        AttackError::NoSolutionFound => "no-solution",
        AttackError::DivisibilityInconsistency => "divisibility-inconsistency",
        AttackError::VerificationFailed { .. } => "verification-failed",
    }
}

#[derive(Serialize)]
struct AnalyzeReport {
    keys: Vec<KeyReport>,
    summary: SummaryOutput,
}

#[derive(Serialize)]
struct KeyReport {
    index: usize,
    status: String,
    p: Option<String>,
    q: Option<String>,
    d: Option<String>,
    expected_d: Option<String>,
    elapsed_us: u64,
    error: Option<String>,
}

#[derive(Serialize)]
struct SummaryOutput {
    total_keys: usize,
    keys_recovered: usize,
    mismatches: usize,
}

fn run_analyze(input: &str, verbose: bool, json: bool) -> Result<ExitCode> {
    let keys = load_keys(input)?;
    let attack = WienerAttack::new(verbose);

    let mut reports = Vec::new();
    let mut keys_recovered = 0;
    let mut mismatches = 0;

    // every key is an independent attack run; nothing carries over
    for (index, key) in keys.iter().enumerate() {
        let started = Instant::now();
        let outcome = attack.run(key);
        let elapsed_us = started.elapsed().as_micros() as u64;

        let report = match outcome {
            Ok(result) => {
                keys_recovered += 1;
                let status = match &key.expected_d {
                    Some(expected) if *expected == result.d => "ok",
                    Some(_) => {
                        mismatches += 1;
                        "mismatch"
                    }
                    None => "recovered",
                };
                key_report(index, status, Some(&result), key, elapsed_us, None)
            }
            Err(err) => {
                let status = if key.expected_d.is_some() {
                    mismatches += 1;
                    "mismatch"
                } else {
                    attack_error_status(&err)
                };
                key_report(index, status, None, key, elapsed_us, Some(err.to_string()))
            }
        };
        reports.push(report);
    }

    let report = AnalyzeReport {
        keys: reports,
        summary: SummaryOutput {
            total_keys: keys.len(),
            keys_recovered,
            mismatches,
        },
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print!("{}", format_analyze_text(&report));
    }
    Ok(ExitCode::SUCCESS)
}

fn key_report(
    index: usize,
    status: &str,
    result: Option<&AttackResult>,
    key: &PublicKey,
    elapsed_us: u64,
    error: Option<String>,
) -> KeyReport {
    KeyReport {
        index: index + 1,
        status: status.to_string(),
        p: result.map(|r| r.p.to_string()),
        q: result.map(|r| r.q.to_string()),
        d: result.map(|r| r.d.to_string()),
        expected_d: key.expected_d.as_ref().map(|d| d.to_string()),
        elapsed_us,
        error,
    }
}

fn format_analyze_text(report: &AnalyzeReport) -> String {
    let mut output = String::new();
    output.push_str(&format!("Analyzed {} keys\n\n", report.summary.total_keys));

    for key in &report.keys {
        output.push_str(&format!("Key #{}\n", key.index));
        output.push_str(&format!("  Status: {}\n", key.status));
        if let (Some(p), Some(q), Some(d)) = (&key.p, &key.q, &key.d) {
            output.push_str(&format!("  p = {p}\n"));
            output.push_str(&format!("  q = {q}\n"));
            output.push_str(&format!("  d = {d}\n"));
        }
        if let Some(expected) = &key.expected_d {
            output.push_str(&format!("  Expected d = {expected}\n"));
        }
        if let Some(error) = &key.error {
            output.push_str(&format!("  Reason: {error}\n"));
        }
        output.push_str(&format!("  Time (us) = {}\n", key.elapsed_us));
        output.push('\n');
    }

    output.push_str(&format!(
        "Recovered {} of {} keys ({} mismatches)\n",
        report.summary.keys_recovered, report.summary.total_keys, report.summary.mismatches
    ));
    output
}
