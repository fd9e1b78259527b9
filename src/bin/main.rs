//! PKCS#7 / CMS verifier CLI
//!
//! Verifies the signers of DER or PEM encoded PKCS#7 containers against a
//! set of trusted certificates, extracts embedded content and manages the
//! verifier configuration file.

use clap::{Parser, Subcommand};
use miette::{bail, Context, IntoDiagnostic, Result};
use openssl::cms::CmsContentInfo;
use pkcs7_verifier::{
    algorithm_name, ConfigManager, MemoryTrustStore, Pkcs7Container, VerifierConfiguration,
    VerifyWorkflow,
};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "pkcs7-verify")]
#[command(about = "Verify PKCS#7 / CMS signed-data containers against trusted certificates")]
#[command(long_about = "
pkcs7-verify - PKCS#7 / CMS signature verification

EXAMPLES:
    # Verify against a trusted signer certificate
    pkcs7-verify verify message.p7m --trust signer.pem

    # Require every signer to verify, using trusted certificates from config
    pkcs7-verify verify message.p7m --all

    # Extract the signed content
    pkcs7-verify content message.p7m -o message.txt

    # Show container structure
    pkcs7-verify info message.p7m

ENVIRONMENT VARIABLES:
    RUST_LOG        Logging level (debug, info, warn, error)
")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Verify the signers of a PKCS#7 container
    Verify {
        /// PKCS#7 file (DER or PEM)
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Trusted certificate file (PEM bundle or DER); repeatable
        #[arg(short, long, value_name = "CERT")]
        trust: Vec<PathBuf>,

        /// Configuration file (defaults to the user config, if present)
        #[arg(short, long, value_name = "PATH")]
        config: Option<PathBuf>,

        /// Require every signer to verify
        #[arg(long)]
        all: bool,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },

    /// Extract the embedded content of a data or signed-data container
    Content {
        /// PKCS#7 file (DER or PEM)
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Output file (defaults to stdout)
        #[arg(short, long, value_name = "OUT")]
        output: Option<PathBuf>,
    },

    /// Show content type, signers and embedded certificates
    Info {
        /// PKCS#7 file (DER or PEM)
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },

    /// Configuration management
    #[command(subcommand)]
    Config(ConfigCommands),
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// Show current configuration
    Show,

    /// Create default configuration file
    Init,

    /// Set a configuration value
    Set {
        /// Configuration key
        key: String,
        /// Configuration value
        value: String,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Verify {
            file,
            trust,
            config,
            all,
            verbose,
        } => {
            // `verbose = true` in the config also enables debug logging.
            let config = load_configuration(config.as_deref())?;
            init_logging(verbose || config.verbose);
            handle_verify_command(&file, &trust, &config, all)
        }
        Commands::Content { file, output } => {
            init_logging(false);
            handle_content_command(&file, output.as_deref())
        }
        Commands::Info { file } => {
            init_logging(false);
            handle_info_command(&file)
        }
        Commands::Config(config_cmd) => {
            init_logging(false);
            handle_config_command(config_cmd)
        }
    }
}

fn init_logging(verbose: bool) {
    let default_filter = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();
}

fn handle_verify_command(
    file: &Path,
    trust: &[PathBuf],
    config: &VerifierConfiguration,
    require_all: bool,
) -> Result<()> {
    let mut store = MemoryTrustStore::from_config(config).into_diagnostic()?;
    for cert_path in trust {
        store
            .load_file(cert_path, &[])
            .into_diagnostic()
            .wrap_err_with(|| {
                format!("Failed to load trusted certificate {}", cert_path.display())
            })?;
    }
    if store.is_empty() {
        log::warn!("No trusted certificates configured; no signer can verify");
    }

    let workflow = VerifyWorkflow::new(store)
        .require_all_signers(require_all || config.require_all_signers);
    let blob = read_container(file)?;
    let report = workflow.run(&blob).into_diagnostic()?;

    println!("Content type: {}", report.content_type);
    println!("Signers: {}", report.signer_count);
    for signer in &report.verified {
        println!(
            "  [{}] verified: {}",
            signer.index,
            signer.auth.identity().unwrap_or("<unnamed>")
        );
        let groups: Vec<_> = signer.auth.groups().collect();
        if !groups.is_empty() {
            println!("       groups: {}", groups.join(", "));
        }
    }
    for rejection in &report.rejections {
        println!("  [{}] rejected: {}", rejection.index, rejection.reason);
    }

    if !workflow.accepts(&report) {
        bail!(
            "Verification failed: {} of {} signer(s) verified",
            report.verified.len(),
            report.signer_count
        );
    }
    println!("Verification succeeded");
    Ok(())
}

fn handle_content_command(file: &Path, output: Option<&Path>) -> Result<()> {
    let blob = read_container(file)?;
    let container = Pkcs7Container::load(&blob).into_diagnostic()?;
    let Some(content) = container.content() else {
        bail!(
            "No content available in {} container",
            container.content_type()
        );
    };

    if let Some(output_path) = output {
        std::fs::write(output_path, &content)
            .into_diagnostic()
            .wrap_err_with(|| format!("Failed to write {}", output_path.display()))?;
        println!("Wrote {} bytes to {}", content.len(), output_path.display());
    } else {
        use std::io::Write;
        std::io::stdout().write_all(&content).into_diagnostic()?;
    }
    Ok(())
}

fn handle_info_command(file: &Path) -> Result<()> {
    let blob = read_container(file)?;
    let container = Pkcs7Container::load(&blob).into_diagnostic()?;

    println!("Content type: {}", container.content_type());
    if let Some(content) = container.content() {
        println!("Content length: {} bytes", content.len());
    }

    println!("Signers: {}", container.signer_count());
    for (index, signer) in container.signers().enumerate() {
        match signer.identity() {
            Ok(identity) => println!("  [{index}] {identity}"),
            Err(e) => println!("  [{index}] {e}"),
        }
        println!(
            "       digest {}, signature {}",
            algorithm_name(signer.digest_algorithm()),
            algorithm_name(signer.signature_algorithm())
        );
    }

    let certificates = container.certificates();
    println!("Certificates: {}", certificates.len());
    for cert in certificates {
        println!(
            "  {} (serial {})",
            cert.tbs_certificate.subject,
            hex::encode(cert.tbs_certificate.serial_number.as_bytes())
        );
    }
    Ok(())
}

fn handle_config_command(config_cmd: ConfigCommands) -> Result<()> {
    let config_manager = ConfigManager::new().into_diagnostic()?;

    match config_cmd {
        ConfigCommands::Show => match config_manager.load() {
            Ok(config) => {
                println!("Current Configuration:");
                println!("  Trusted certificates: {}", config.trusted_certificates.len());
                for entry in &config.trusted_certificates {
                    println!("    {} [{}]", entry.path.display(), entry.groups.join(", "));
                }
                println!("  Require all signers: {}", config.require_all_signers);
                println!("  Verbose: {}", config.verbose);
                println!(
                    "  Configuration file: {}",
                    config_manager.config_path().display()
                );
            }
            Err(_) => {
                println!("No configuration file found. Use 'config init' to create one.");
            }
        },

        ConfigCommands::Init => {
            config_manager.load_or_create_default().into_diagnostic()?;
            println!(
                "Configuration initialized: {}",
                config_manager.config_path().display()
            );
        }

        ConfigCommands::Set { key, value } => {
            config_manager
                .update_value(&key, &value)
                .into_diagnostic()?;
            println!("Configuration updated: {key} = {value}");
        }
    }

    Ok(())
}

/// Explicit config path must load; the default path is optional.
fn load_configuration(path: Option<&Path>) -> Result<VerifierConfiguration> {
    if let Some(path) = path {
        return ConfigManager::with_path(path).load().into_diagnostic();
    }
    let manager = ConfigManager::new().into_diagnostic()?;
    if manager.config_path().exists() {
        manager.load().into_diagnostic()
    } else {
        Ok(VerifierConfiguration::default())
    }
}

fn read_container(path: &Path) -> Result<Vec<u8>> {
    let bytes = std::fs::read(path)
        .into_diagnostic()
        .wrap_err_with(|| format!("Failed to read {}", path.display()))?;
    match decode_pem(&bytes) {
        Some(der) => der.wrap_err_with(|| format!("Invalid PEM in {}", path.display())),
        None => Ok(bytes),
    }
}

/// DER of a PEM armored `PKCS7` or `CMS` block, `None` if `bytes` is not PEM.
fn decode_pem(bytes: &[u8]) -> Option<Result<Vec<u8>>> {
    let is_pem = bytes
        .windows(b"-----BEGIN".len())
        .any(|w| w == b"-----BEGIN");
    if !is_pem {
        return None;
    }
    Some(
        CmsContentInfo::from_pem(bytes)
            .and_then(|cms| cms.to_der())
            .into_diagnostic(),
    )
}
