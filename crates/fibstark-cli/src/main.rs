// crates/fibstark-cli/src/main.rs

#![forbid(unsafe_code)]
#![deny(
    rust_2018_idioms,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    clippy::todo
)]

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use fibstark_crypto::{Blake3Hash, HashFunction, HashKind, Sha3Hash};
use fibstark_stark::{
    field::FIB_FIELD,
    io::{read_domain_parameters, read_proof_auto, write_domain_parameters, write_proof_auto},
    prover::prove_parameters_with_config,
    prove_with_config, verify, DomainParameters, ProverConfig,
};
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(
    name = "fibstark",
    about = "FibSTARK prover/verifier",
    long_about = "FibSTARK prover/verifier.\n\nProves knowledge of the 1023-row Fibonacci-square trace ending in 2338775057 with a FRI-based STARK.",
    version = env!("CARGO_PKG_VERSION"),
    disable_help_subcommand = true
)]
struct Cli {
    #[command(subcommand)]
    cmd: Cmd,
}

#[derive(Subcommand, Debug)]
enum Cmd {
    /// Run the whole pipeline once and print diagnostics
    Run {
        /// Optional prover config (TOML)
        #[arg(long)]
        config: Option<PathBuf>,

        /// Number of queries (overrides config)
        #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
        queries: Option<u32>,

        /// Hash: blake3 | sha3 (overrides config)
        #[arg(long)]
        hash: Option<HashKind>,
    },

    /// Generate domain parameters and write them as JSON
    Params {
        /// Output path for the parameters record
        #[arg(long, default_value = "params.json")]
        out: PathBuf,

        /// Hash used for the evaluation commitment
        #[arg(long, default_value_t = HashKind::Blake3)]
        hash: HashKind,
    },

    /// Produce a proof
    Prove {
        /// Optional prover config (TOML)
        #[arg(long)]
        config: Option<PathBuf>,

        /// Number of queries (overrides config)
        #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
        queries: Option<u32>,

        /// Hash: blake3 | sha3 (overrides config)
        #[arg(long)]
        hash: Option<HashKind>,

        /// Start from persisted domain parameters instead of regenerating
        #[arg(long)]
        params: Option<PathBuf>,

        /// Output path for the proof (CBOR/JSON)
        #[arg(long, default_value = "proof.cbor")]
        out: PathBuf,
    },

    /// Verify a proof
    Verify {
        /// Input path to the proof (CBOR/JSON)
        #[arg(long)]
        proof: PathBuf,

        /// Expected number of queries
        #[arg(long, default_value_t = 3, value_parser = clap::value_parser!(u32).range(1..))]
        queries: u32,

        /// Expected hash; taken from the proof when absent
        #[arg(long)]
        hash: Option<HashKind>,
    },
}

fn main() -> Result<()> {
    init_tracing();

    let cli = Cli::parse();
    match cli.cmd {
        Cmd::Run {
            config,
            queries,
            hash,
        } => run(&load_config(config.as_deref(), queries, hash)?),

        Cmd::Params { out, hash } => params(&out, hash),

        Cmd::Prove {
            config,
            queries,
            hash,
            params,
            out,
        } => prove(
            &load_config(config.as_deref(), queries, hash)?,
            params.as_deref(),
            &out,
        ),

        Cmd::Verify {
            proof,
            queries,
            hash,
        } => verify_file(&proof, queries as usize, hash),
    }
}

/// Initialize tracing with an env-driven filter (default INFO).
fn init_tracing() {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let fmt_layer = fmt::layer().with_target(false).with_level(true).compact();

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init();
}

/// Config file (or defaults), then flag overrides.
fn load_config(
    path: Option<&Path>,
    queries: Option<u32>,
    hash: Option<HashKind>,
) -> Result<ProverConfig> {
    let mut cfg = match path {
        Some(p) => ProverConfig::load(p).with_context(|| format!("loading config {}", p.display()))?,
        None => ProverConfig::default(),
    };
    if let Some(q) = queries {
        cfg.num_queries = q as usize;
    }
    if let Some(h) = hash {
        cfg.hash = h;
    }
    cfg.validate().context("invalid prover config")?;
    Ok(cfg)
}

fn generate(hash: HashKind) -> Result<DomainParameters> {
    fn with<H: HashFunction>() -> Result<DomainParameters> {
        let (params, channel) = DomainParameters::generate::<H>(&FIB_FIELD)
            .context("generating domain parameters")?;
        println!("trace length:          {}", params.trace.len());
        println!("g (order 1024):        {}", params.g);
        println!("h (order 8192):        {}", params.h);
        println!("evaluation commitment: {}", hex_root(&params));
        println!("channel state:         {}", channel.state_hex());
        Ok(params)
    }
    match hash {
        HashKind::Blake3 => with::<Blake3Hash>(),
        HashKind::Sha3 => with::<Sha3Hash>(),
    }
}

fn hex_root(params: &DomainParameters) -> String {
    hex::encode(params.evaluation_root)
}

fn run(cfg: &ProverConfig) -> Result<()> {
    info!(queries = cfg.num_queries, hash = %cfg.hash, "running pipeline");
    let params = generate(cfg.hash)?;
    let proof = prove_parameters_with_config(&params, cfg).context("proving")?;
    verify(&proof, cfg.num_queries).context("verifying the fresh proof")?;
    println!("fri layers:            {}", proof.fri_roots.len());
    println!("final constant:        {}", proof.final_constant);
    println!("transcript entries:    {}", proof.transcript.len());
    println!("OK: proof verified");
    Ok(())
}

fn params(out: &Path, hash: HashKind) -> Result<()> {
    info!(out = %out.display(), %hash, "generating domain parameters");
    let params = generate(hash)?;
    write_domain_parameters(out, &params)
        .with_context(|| format!("writing domain parameters to {}", out.display()))?;
    println!("Wrote {}", out.display());
    Ok(())
}

fn prove(cfg: &ProverConfig, params: Option<&Path>, out: &Path) -> Result<()> {
    info!(queries = cfg.num_queries, hash = %cfg.hash, out = %out.display(), "proving");
    let proof = match params {
        Some(path) => {
            let params = read_domain_parameters(path, &FIB_FIELD)
                .with_context(|| format!("reading domain parameters from {}", path.display()))?;
            prove_parameters_with_config(&params, cfg)
                .with_context(|| format!("proving from {}", path.display()))?
        }
        None => prove_with_config(&FIB_FIELD, cfg).context("proving")?,
    };

    write_proof_auto(out, &proof)
        .with_context(|| format!("writing proof to {}", out.display()))?;
    println!(
        "Proved with {} ({} queries, {} FRI layers), wrote {}",
        proof.hash,
        proof.queries.len(),
        proof.fri_roots.len(),
        out.display()
    );
    Ok(())
}

fn verify_file(path: &Path, queries: usize, hash: Option<HashKind>) -> Result<()> {
    info!(proof = %path.display(), queries, "verifying proof");
    let proof = read_proof_auto(path)
        .with_context(|| format!("reading proof from {}", path.display()))?;
    if let Some(h) = hash {
        if proof.hash != h.as_str() {
            bail!("proof was made with {}, expected {h}", proof.hash);
        }
    }
    verify(&proof, queries).context("verification failed")?;
    println!("OK: proof verified");
    Ok(())
}
