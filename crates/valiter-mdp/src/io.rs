use std::{fs, path::Path};

use serde::{Serialize, de::DeserializeOwned};

use crate::{CompiledMdp, GridWorldConfig, MdpError, MdpSpec};

fn read_yaml<T: DeserializeOwned>(path: impl AsRef<Path>) -> Result<T, MdpError> {
    let yaml = fs::read_to_string(path)?;
    Ok(serde_yaml::from_str(&yaml)?)
}

fn write_yaml<T: Serialize>(path: impl AsRef<Path>, value: &T) -> Result<(), MdpError> {
    let yaml = serde_yaml::to_string(value)?;
    fs::write(path, yaml)?;
    Ok(())
}

/// Load a tabular MDP spec from YAML on disk.
pub fn load_yaml(path: impl AsRef<Path>) -> Result<MdpSpec, MdpError> {
    read_yaml(path)
}

/// Load and compile a tabular MDP from a YAML file.
pub fn compile_yaml(path: impl AsRef<Path>) -> Result<CompiledMdp, MdpError> {
    let spec = load_yaml(path)?;
    spec.compile()
}

/// Serialize and write a tabular MDP spec to YAML.
pub fn save_yaml(path: impl AsRef<Path>, spec: &MdpSpec) -> Result<(), MdpError> {
    write_yaml(path, spec)
}

/// Load a grid-world description from YAML on disk.
pub fn load_grid_yaml(path: impl AsRef<Path>) -> Result<GridWorldConfig, MdpError> {
    let config: GridWorldConfig = read_yaml(path)?;
    config.validate()?;
    Ok(config)
}
