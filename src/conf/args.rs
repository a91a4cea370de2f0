use clap::Parser;

use crate::conf::external::ExternalConfig;
use crate::DynError;

#[derive(Parser, Debug)]
#[clap(name = "cqli")]
#[clap(version = "0.1")]
#[clap(about = "An interpreter for the CQL tabular query language", long_about = None)]
pub struct CliArgs {
    /// CQL script to run; starts the interactive prompt when omitted
    pub script: Option<String>,

    /// Yaml config file to use for default values
    /// command line options still override conf values
    #[clap(short, long)]
    conf: Option<String>,

    /// Output destination for command results ("-" means stdout)
    #[clap(short, long)]
    pub output: Option<String>,

    /// Interactive prompt string
    #[clap(short, long)]
    pub prompt: Option<String>,
}

impl CliArgs {
    pub fn get_external_conf(&self) -> Result<ExternalConfig, DynError> {
        if self.conf.is_some() {
            let pc = ExternalConfig::from_yaml_file(self.conf.as_ref().unwrap().as_str())?;
            Ok(pc)
        } else {
            Ok(ExternalConfig::empty())
        }
    }
}
