use std::fs;
use std::io::BufReader;

use serde::{Deserialize, Serialize};

use crate::DynError;

/// A table imported into the session before any input runs.
#[derive(Debug, PartialEq, Serialize, Deserialize, Clone)]
pub struct PreloadTable {
    pub name: String,
    pub file: String,
}

/// Defaults loaded from a YAML file; every field is optional and the
/// command line overrides whatever is set here.
#[derive(Debug, PartialEq, Serialize, Deserialize)]
pub struct ExternalConfig {
    pub output: Option<String>,
    pub prompt: Option<String>,
    pub preload: Option<Vec<PreloadTable>>,
}

impl ExternalConfig {
    pub fn from_yaml_file(fname: &str) -> Result<ExternalConfig, DynError> {
        let rdr = BufReader::new(fs::File::open(fname)?);
        match serde_yaml::from_reader(rdr) {
            Ok(pc) => Ok(pc),
            Err(e) => Err(Box::new(e)),
        }
    }

    pub fn empty() -> Self {
        Self {
            output: None,
            prompt: None,
            preload: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_yaml_fields() {
        let yaml = "\
prompt: \"cql>> \"
preload:
  - name: estacoes
    file: estacoes.csv
";
        let conf: ExternalConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(conf.prompt.as_deref(), Some("cql>> "));
        assert_eq!(conf.output, None);
        let preload = conf.preload.unwrap();
        assert_eq!(preload.len(), 1);
        assert_eq!(preload[0].name, "estacoes");
        assert_eq!(preload[0].file, "estacoes.csv");
    }

    #[test]
    fn from_yaml_file_reads_a_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("conf.yml");
        std::fs::write(&path, "output: out.txt\n").unwrap();
        let conf = ExternalConfig::from_yaml_file(path.to_str().unwrap()).unwrap();
        assert_eq!(conf.output.as_deref(), Some("out.txt"));
    }
}
