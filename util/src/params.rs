//! Generic parameters functions

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use serde::de::DeserializeOwned;
use std::fs::read_to_string;
use std::path::Path;
use thiserror::Error;
use toml;

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// An error that occurs during loading of a parameter file.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("The software root environment variable (FUZZY_TRUCK_ROOT) is not set")]
    SwRootNotSet,

    #[error("Cannot load the parmeter file: {0}")]
    FileLoadError(std::io::Error),

    #[error("Cannot read the parameter file: {0}")]
    DeserialiseError(toml::de::Error),
}

// ---------------------------------------------------------------------------
// PUBLIC FUNCTIONS
// ---------------------------------------------------------------------------

/// Load a parameter file
///
/// The file path is relative to the "<sw_root>/params" directory
pub fn load<P>(param_file_path: &str) -> Result<P, LoadError>
where
    P: DeserializeOwned,
{
    // Get the params dir
    let mut path = crate::host::get_sw_root().map_err(|_| LoadError::SwRootNotSet)?;
    path.push("params");
    path.push(param_file_path);

    load_path(path)
}

/// Load a parameter file from an explicit path.
pub fn load_path<P, Q>(path: Q) -> Result<P, LoadError>
where
    P: DeserializeOwned,
    Q: AsRef<Path>,
{
    // Load the file into a string
    let params_str = read_to_string(path).map_err(LoadError::FileLoadError)?;

    from_str(params_str.as_str())
}

/// Parse parameters from a TOML string.
pub fn from_str<P>(params_str: &str) -> Result<P, LoadError>
where
    P: DeserializeOwned,
{
    toml::from_str(params_str).map_err(LoadError::DeserialiseError)
}

#[cfg(test)]
mod test {
    use super::*;
    use serde::Deserialize;

    #[derive(Deserialize)]
    struct DummyParams {
        speed: f64,
        rate: u32,
    }

    #[test]
    fn test_from_str() -> Result<(), LoadError> {
        let p: DummyParams = from_str("speed = 1.5\nrate = 3")?;

        assert_eq!(p.speed, 1.5);
        assert_eq!(p.rate, 3);

        Ok(())
    }

    #[test]
    fn test_from_str_invalid() {
        assert!(matches!(
            from_str::<DummyParams>("speed = \"fast\"\nrate = 3"),
            Err(LoadError::DeserialiseError(_))
        ));
        assert!(matches!(
            load_path::<DummyParams, _>("does/not/exist.toml"),
            Err(LoadError::FileLoadError(_))
        ));
    }
}
