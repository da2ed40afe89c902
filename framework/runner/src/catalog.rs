use std::path::{Component, Path};

use anyhow::bail;
use rand::Rng;

/// A named operation profile: the endpoint to hit, the fixture files it needs and the scalar
/// parameters it takes. Immutable once the catalog is built.
#[derive(Debug, Clone)]
pub struct Scenario {
    pub name: String,
    pub endpoint: String,
    pub files: Vec<String>,
    pub params: Vec<(String, String)>,
}

impl Scenario {
    pub fn new(name: &str, endpoint: &str, files: &[&str], params: &[(&str, &str)]) -> Self {
        Self {
            name: name.to_string(),
            endpoint: endpoint.to_string(),
            files: files.iter().map(|f| f.to_string()).collect(),
            params: params
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        }
    }
}

/// The fixed table of scenarios a run draws from.
#[derive(Debug, Clone)]
pub struct ScenarioCatalog {
    scenarios: Vec<Scenario>,
}

impl ScenarioCatalog {
    /// Build the catalog, rejecting structurally malformed fixture file references.
    ///
    /// Whether the files actually exist is checked at submission time, so a missing file shows
    /// up as failed requests rather than a startup error.
    pub fn new(scenarios: Vec<Scenario>) -> anyhow::Result<Self> {
        if scenarios.is_empty() {
            bail!("A scenario catalog must contain at least one scenario");
        }
        for scenario in &scenarios {
            for file in &scenario.files {
                validate_file_reference(&scenario.name, file)?;
            }
        }
        Ok(Self { scenarios })
    }

    pub fn scenarios(&self) -> &[Scenario] {
        &self.scenarios
    }

    /// Pick a scenario uniformly at random, each scenario equally likely.
    pub fn pick<R: Rng>(&self, rng: &mut R) -> &Scenario {
        &self.scenarios[rng.gen_range(0..self.scenarios.len())]
    }
}

fn validate_file_reference(scenario: &str, file: &str) -> anyhow::Result<()> {
    if file.is_empty() {
        bail!("Scenario '{scenario}' references an empty fixture file name");
    }
    let path = Path::new(file);
    if path.is_absolute() {
        bail!("Scenario '{scenario}' references an absolute fixture path: {file}");
    }
    if path.components().any(|c| matches!(c, Component::ParentDir)) {
        bail!("Scenario '{scenario}' references a fixture path outside the fixture directory: {file}");
    }
    Ok(())
}
