use std::path::PathBuf;

use clap::Parser;

use crate::report::ReportFormat;

#[derive(Parser, Debug)]
#[command(
    name = "dep-licenses",
    about = "Report the licenses and provenance of a module's third-party dependencies",
    version
)]
pub struct Cli {
    /// Build targets whose dependencies are audited (e.g. `./...`)
    #[arg(value_name = "TARGET")]
    pub targets: Vec<String>,

    /// Report format
    #[arg(long, default_value = "json", value_name = "FORMAT")]
    pub format: ReportFormat,

    /// Also write every license file to DIR/<repository>/<file>
    #[arg(long = "licenses-dir", alias = "licenses_dir", value_name = "DIR")]
    pub licenses_dir: Option<PathBuf>,

    /// Config file [default: ./.dep-licenses/config.toml, fallback ~/.config/dep-licenses/config.toml]
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Directory dependency ids are resolved under (repeatable) [default: $GOPATH/src]
    #[arg(long = "source-root", value_name = "DIR")]
    pub source_roots: Vec<PathBuf>,

    /// Log resolution details to stderr
    #[arg(short, long)]
    pub verbose: bool,

    /// Hide the progress bar
    #[arg(short, long)]
    pub quiet: bool,
}
