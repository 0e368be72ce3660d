//! Run environment for projection models.
//!
//! A run is described by an envelope holding the model input and where the
//! output goes:
//!
//! ```json
//! {
//!   "input": { "n_days": 90, "market_share": 0.2 },
//!   "output": { "spec": "filesystem", "dir": "out" }
//! }
//! ```
//!
//! The same envelope can be written as TOML with `[input]` and `[output]`
//! tables. Without a filesystem output, tables are written to stdout.

use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, info};

#[derive(Debug, thiserror::Error)]
pub enum EnvironmentError {
    #[error("i/o error: {0}")]
    Io(#[from] io::Error),

    #[error("invalid JSON envelope: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid TOML envelope: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("failed to write table: {0}")]
    Csv(#[from] csv::Error),

    #[error("no input envelope was provided")]
    EmptyInput,

    #[error("input does not match the model's parameters: {source}")]
    Input {
        #[source]
        source: serde_json::Error,
    },
}

pub struct RunEnvironment<I = ()> {
    input_json: serde_json::Map<String, Value>,
    pub input: I,
    output: Value,
}

impl RunEnvironment {
    pub fn from_json(data: Value) -> Self {
        let input_json = data
            .get("input")
            .and_then(|v| v.as_object())
            .cloned()
            .unwrap_or_default();

        let output = data.get("output").cloned().unwrap_or(Value::Null);

        Self {
            input_json,
            input: (),
            output,
        }
    }

    pub fn from_reader(mut reader: impl Read) -> Result<Self, EnvironmentError> {
        let mut raw = String::new();
        reader.read_to_string(&mut raw)?;
        if raw.trim().is_empty() {
            return Err(EnvironmentError::EmptyInput);
        }
        let data: Value = serde_json::from_str(&raw)?;
        Ok(Self::from_json(data))
    }

    pub fn from_stdin() -> Result<Self, EnvironmentError> {
        Self::from_reader(io::stdin().lock())
    }

    pub fn from_toml_str(raw: &str) -> Result<Self, EnvironmentError> {
        if raw.trim().is_empty() {
            return Err(EnvironmentError::EmptyInput);
        }
        let table: toml::Table = toml::from_str(raw)?;
        Ok(Self::from_json(serde_json::to_value(table)?))
    }

    /// Reads an envelope from disk, as TOML when the file ends in `.toml`
    /// and as JSON otherwise.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, EnvironmentError> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path)?;
        debug!(path = %path.display(), "read run envelope");
        if path.extension().is_some_and(|ext| ext == "toml") {
            Self::from_toml_str(&raw)
        } else {
            Self::from_reader(raw.as_bytes())
        }
    }

    pub fn with_input_type<I: DeserializeOwned>(
        self,
    ) -> Result<RunEnvironment<I>, EnvironmentError> {
        let input_value = Value::Object(self.input_json.clone());
        let input = serde_json::from_value(input_value)
            .map_err(|source| EnvironmentError::Input { source })?;
        Ok(RunEnvironment {
            input_json: self.input_json,
            input,
            output: self.output,
        })
    }
}

impl<I: DeserializeOwned> RunEnvironment<I> {
    /// Loads the envelope from `path`, or from stdin when no path is given.
    pub fn load(path: Option<&Path>) -> Result<Self, EnvironmentError> {
        let env = match path {
            Some(path) => RunEnvironment::<()>::from_path(path)?,
            None => RunEnvironment::<()>::from_stdin()?,
        };
        env.with_input_type()
    }
}

impl<I> RunEnvironment<I> {
    pub fn input_json(&self) -> &serde_json::Map<String, Value> {
        &self.input_json
    }

    pub fn output_dir(&self) -> Option<PathBuf> {
        let output = &self.output;

        if output.get("spec").and_then(|v| v.as_str()) == Some("filesystem") {
            return output
                .get("dir")
                .and_then(|v| v.as_str())
                .map(PathBuf::from);
        }

        // Profiled output: the "default" profile wins, otherwise the first one.
        let profile = output
            .get("profile")
            .and_then(|v| v.as_object())
            .and_then(|profiles| profiles.get("default").or_else(|| profiles.values().next()))?;
        if profile.get("spec").and_then(|v| v.as_str()) == Some("filesystem") {
            return profile
                .get("dir")
                .and_then(|v| v.as_str())
                .map(PathBuf::from);
        }

        None
    }

    fn sink(&self, filename: &str) -> Result<Box<dyn Write>, EnvironmentError> {
        match self.output_dir() {
            Some(dir) => {
                fs::create_dir_all(&dir)?;
                let path = dir.join(filename);
                info!(path = %path.display(), "writing output");
                Ok(Box::new(fs::File::create(path)?))
            }
            None => Ok(Box::new(io::stdout())),
        }
    }

    pub fn write(&self, filename: &str, data: &[u8]) -> Result<(), EnvironmentError> {
        let mut sink = self.sink(filename)?;
        sink.write_all(data)?;
        sink.flush()?;
        Ok(())
    }

    /// Writes `rows` as CSV with a header taken from the row type's fields.
    pub fn write_table<R: Serialize>(
        &self,
        filename: &str,
        rows: &[R],
    ) -> Result<(), EnvironmentError> {
        let mut wtr = csv::Writer::from_writer(self.sink(filename)?);
        for row in rows {
            wtr.serialize(row)?;
        }
        wtr.flush()?;
        debug!(filename, rows = rows.len(), "wrote table");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use serde_json::json;

    #[derive(Deserialize, Debug, PartialEq)]
    struct Params {
        n_days: usize,
        #[serde(default)]
        market_share: Option<f64>,
    }

    #[test]
    fn test_from_json_basic() {
        let data = json!({
            "input": { "n_days": 90, "market_share": 0.2 },
            "output": { "spec": "filesystem", "dir": "/tmp/output" }
        });
        let env = RunEnvironment::from_json(data);
        assert_eq!(env.input_json().get("n_days").unwrap().as_u64(), Some(90));
        assert_eq!(env.output_dir(), Some(PathBuf::from("/tmp/output")));
    }

    #[test]
    fn test_with_input_type() {
        let env = RunEnvironment::from_json(json!({ "input": { "n_days": 30 } }))
            .with_input_type::<Params>()
            .unwrap();
        assert_eq!(
            env.input,
            Params {
                n_days: 30,
                market_share: None
            }
        );
    }

    #[test]
    fn test_with_input_type_mismatch() {
        let result = RunEnvironment::from_json(json!({ "input": { "n_days": "many" } }))
            .with_input_type::<Params>();
        assert!(matches!(result, Err(EnvironmentError::Input { .. })));
    }

    #[test]
    fn test_from_toml() {
        let env = RunEnvironment::from_toml_str(
            r#"
            [input]
            n_days = 45
            market_share = 0.3

            [output]
            spec = "filesystem"
            dir = "/tmp/toml-out"
            "#,
        )
        .unwrap()
        .with_input_type::<Params>()
        .unwrap();
        assert_eq!(env.input.n_days, 45);
        assert_eq!(env.input.market_share, Some(0.3));
        assert_eq!(env.output_dir(), Some(PathBuf::from("/tmp/toml-out")));
    }

    #[test]
    fn test_empty_input() {
        assert!(matches!(
            RunEnvironment::from_reader("  \n".as_bytes()),
            Err(EnvironmentError::EmptyInput)
        ));
        assert!(matches!(
            RunEnvironment::from_toml_str(""),
            Err(EnvironmentError::EmptyInput)
        ));
        assert!(matches!(
            RunEnvironment::from_reader("{not json".as_bytes()),
            Err(EnvironmentError::Json(_))
        ));
    }

    #[test]
    fn test_output_dir_profiled() {
        let env = RunEnvironment::from_json(json!({
            "output": {
                "profile": {
                    "default": { "spec": "filesystem", "dir": "/tmp/profiled" }
                }
            }
        }));
        assert_eq!(env.output_dir(), Some(PathBuf::from("/tmp/profiled")));
    }

    #[test]
    fn test_output_dir_none() {
        let env = RunEnvironment::from_json(json!({ "output": { "spec": "stdout" } }));
        assert_eq!(env.output_dir(), None);
        assert!(RunEnvironment::from_json(json!({})).input_json().is_empty());
    }

    #[test]
    fn test_write_table_to_dir() {
        #[derive(Serialize)]
        struct Row {
            day: usize,
            icu: f64,
        }

        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("nested");
        let env = RunEnvironment::from_json(json!({
            "output": { "spec": "filesystem", "dir": out.to_str().unwrap() }
        }));
        env.write_table(
            "census.csv",
            &[Row { day: 0, icu: 0.0 }, Row { day: 1, icu: 2.5 }],
        )
        .unwrap();

        let written = fs::read_to_string(out.join("census.csv")).unwrap();
        assert_eq!(written, "day,icu\n0,0.0\n1,2.5\n");
    }

    #[test]
    fn test_write_bytes_to_profiled_dir() {
        let dir = tempfile::tempdir().unwrap();
        let env = RunEnvironment::from_json(json!({
            "output": {
                "profile": {
                    "default": { "spec": "filesystem", "dir": dir.path().to_str().unwrap() }
                }
            }
        }));
        env.write("summary.txt", b"Rt of 2.71\n").unwrap();
        assert_eq!(
            fs::read_to_string(dir.path().join("summary.txt")).unwrap(),
            "Rt of 2.71\n"
        );
    }

    #[test]
    fn test_from_path_picks_format() {
        let dir = tempfile::tempdir().unwrap();
        let toml_path = dir.path().join("scenario.toml");
        fs::write(&toml_path, "[input]\nn_days = 12\n").unwrap();
        let json_path = dir.path().join("scenario.json");
        fs::write(&json_path, r#"{"input": {"n_days": 13}}"#).unwrap();

        let from_toml = RunEnvironment::<Params>::load(Some(toml_path.as_path())).unwrap();
        let from_json = RunEnvironment::<Params>::load(Some(json_path.as_path())).unwrap();
        assert_eq!(from_toml.input.n_days, 12);
        assert_eq!(from_json.input.n_days, 13);
    }
}
