use clap::{Parser, Subcommand};
use colored::Colorize;
use std::path::PathBuf;

use studio_api_tester::{report, runner, utils::config::HarnessConfig};

#[derive(Parser)]
#[command(name = "studio-api-tester")]
#[command(version = "0.1.0")]
#[command(about = "REST API integration testing CLI for the studio backend", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run scenario groups against the backend
    Run {
        /// Backend base URL; `/api` is appended automatically
        #[arg(short, long)]
        base_url: Option<String>,

        /// Output directory for reports
        #[arg(short, long, default_value = "./output")]
        output: PathBuf,

        /// Run only the named scenario groups
        /// (auth, health, cms, applications, otp, bookings)
        #[arg(short, long, value_delimiter = ',')]
        scenario: Option<Vec<String>>,

        /// Admin login email
        #[arg(long)]
        admin_email: Option<String>,

        /// Admin login password
        #[arg(long)]
        admin_password: Option<String>,

        /// Per-request timeout in seconds
        #[arg(long, default_value = "10")]
        timeout: u64,

        /// Also write a JUnit XML report
        #[arg(long, default_value = "false")]
        junit: bool,
    },

    /// Generate report from persisted test results
    Report {
        /// Path to test results JSON
        results: PathBuf,

        /// Output format (json, junit)
        #[arg(short, long, default_value = "json")]
        format: String,

        /// Output file path
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            base_url,
            output,
            scenario,
            admin_email,
            admin_password,
            timeout,
            junit,
        } => {
            let mut config = HarnessConfig::default();
            if let Some(base_url) = base_url {
                config.base_url = base_url;
            }
            if let Some(admin_email) = admin_email {
                config.admin_email = admin_email;
            }
            if let Some(admin_password) = admin_password {
                config.admin_password = admin_password;
            }
            config.request_timeout_ms = timeout * 1000;
            config.output_dir = output;

            println!(
                "{} Testing against: {}",
                "▶".green().bold(),
                config.base_url.cyan()
            );
            println!(
                "  Output: {}",
                config.output_dir.display().to_string().cyan()
            );
            if let Some(ref names) = scenario {
                println!("  Scenarios: {}", names.join(", ").yellow());
            }
            if junit {
                println!("  JUnit: {}", "Enabled".green());
            }

            let all_passed = runner::run_scenarios(&config, scenario, junit).await?;
            if !all_passed {
                std::process::exit(1);
            }
        }

        Commands::Report {
            results,
            format,
            output,
        } => {
            println!(
                "{} Generating {} report from: {}",
                "📊".to_string().blue(),
                format.cyan(),
                results.display()
            );
            report::generate_report(&results, &format, output.as_deref()).await?;
        }
    }

    Ok(())
}
