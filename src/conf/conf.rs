use std::fs;
use std::io::{self, BufWriter};

use crate::conf::args::CliArgs;
use crate::conf::external::{ExternalConfig, PreloadTable};
use crate::{DynBoxWrite, DynError};

const DEFAULT_PROMPT: &str = "cql> ";

/// The effective configuration: CLI flags merged over YAML defaults.
#[derive(Debug)]
pub struct Conf {
    script: Option<String>,
    output: Option<String>,
    prompt: String,
    preload: Vec<PreloadTable>,
}

impl Conf {
    pub fn new(args: CliArgs, external: ExternalConfig) -> Conf {
        Conf {
            script: args.script,
            output: args.output.or(external.output),
            prompt: args
                .prompt
                .or(external.prompt)
                .unwrap_or_else(|| DEFAULT_PROMPT.to_string()),
            preload: external.preload.unwrap_or_default(),
        }
    }

    pub fn script(&self) -> Option<&str> {
        self.script.as_deref()
    }

    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    pub fn preload(&self) -> &[PreloadTable] {
        &self.preload
    }

    pub fn get_outp(&self) -> Result<DynBoxWrite, DynError> {
        let writer: DynBoxWrite = match &self.output {
            None => Box::new(BufWriter::new(io::stdout())),
            Some(filename) => {
                if filename == "-" {
                    Box::new(BufWriter::new(io::stdout()))
                } else {
                    Box::new(BufWriter::new(fs::File::create(filename)?))
                }
            }
        };
        Ok(writer)
    }
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::*;

    #[test]
    fn args_override_external_values() {
        let args = CliArgs::parse_from(["cqli", "--prompt", "mine> "]);
        let external = ExternalConfig {
            output: Some("out.txt".to_string()),
            prompt: Some("theirs> ".to_string()),
            preload: None,
        };
        let conf = Conf::new(args, external);
        assert_eq!(conf.prompt(), "mine> ");
        // nothing on the command line, so the yaml value stands
        assert_eq!(conf.output.as_deref(), Some("out.txt"));
    }

    #[test]
    fn defaults_apply_when_nothing_is_set() {
        let args = CliArgs::parse_from(["cqli"]);
        let conf = Conf::new(args, ExternalConfig::empty());
        assert_eq!(conf.prompt(), DEFAULT_PROMPT);
        assert!(conf.script().is_none());
        assert!(conf.preload().is_empty());
    }

    #[test]
    fn script_comes_from_the_positional_argument() {
        let args = CliArgs::parse_from(["cqli", "run.cql"]);
        let conf = Conf::new(args, ExternalConfig::empty());
        assert_eq!(conf.script(), Some("run.cql"));
    }
}
