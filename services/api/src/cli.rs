use crate::report::{run_talent_report, run_vehicle_report, TalentReportArgs, VehicleReportArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use hr_admin::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "HR Admin",
    about = "Serve the HR administration API or print reports from exported collections",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Print a report from a JSON export
    Report {
        #[command(subcommand)]
        command: ReportCommand,
    },
}

#[derive(Subcommand, Debug)]
enum ReportCommand {
    /// Maintenance and log book totals for one vehicle or the whole fleet
    Vehicles(VehicleReportArgs),
    /// Recruiting dashboard figures
    Talent(TalentReportArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Report {
            command: ReportCommand::Vehicles(args),
        } => run_vehicle_report(args),
        Command::Report {
            command: ReportCommand::Talent(args),
        } => run_talent_report(args),
    }
}
