use quire_error::ext::{NoContextResultExt, ResultExt};
use quire_error::{Context, Error, Result};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error)]
#[error("Failed to load .env file")]
pub struct LoadDotenvError;

/// Loads the nearest `.env` file from the current directory
/// or any of its ancestors.
pub fn load_dotenv() -> Result<PathBuf, LoadDotenvError> {
    let current_dir = std::env::current_dir().change_context(LoadDotenvError)?;
    let path = find_dotenv(&current_dir)
        .change_context(LoadDotenvError)
        .attach_printable("could not find `.env` file to load")?;

    dotenvy::from_path(&path)
        .change_context(LoadDotenvError)
        .attach_printable_lazy(|| {
            format!(
                "could not load environment variables with {}",
                path.display()
            )
        })?;

    Ok(path)
}

pub fn find_dotenv(directory: &Path) -> Result<PathBuf> {
    // non-recursive way of finding .env files
    for ancestor in directory.ancestors() {
        let candidate = ancestor.join(".env");
        match std::fs::metadata(&candidate) {
            Ok(metadata) if metadata.is_file() => return Ok(candidate),
            Err(error) if error.kind() != std::io::ErrorKind::NotFound => {
                return Err(error)
                    .attach_printable(format!(
                        "failed to load metadata for {}",
                        candidate.display()
                    ))
                    .erase_context();
            }
            _ => {}
        };
    }

    let error = std::io::Error::new(std::io::ErrorKind::NotFound, "cannot find `.env` file");
    Err(error).erase_context()
}

#[derive(Debug, Error)]
#[error("Could not get value of an environment variable")]
pub struct VarError;

#[track_caller]
pub fn var(key: &str) -> Result<String> {
    match std::env::var(key) {
        Ok(n) => Ok(n),
        Err(error) => Err(make_var_error(key, error)),
    }
}

#[track_caller]
pub fn var_opt(key: &str) -> Result<Option<String>> {
    match std::env::var(key) {
        Ok(n) if n.trim().is_empty() => Ok(None),
        Ok(n) => Ok(Some(n)),
        Err(std::env::VarError::NotPresent) => Ok(None),
        Err(error) => Err(make_var_error(key, error)),
    }
}

#[track_caller]
pub fn var_opt_parsed<T: FromStr>(key: &str) -> Result<Option<T>>
where
    T::Err: Context,
{
    let Some(value) = var_opt(key)? else {
        return Ok(None);
    };
    match value.parse() {
        Ok(n) => Ok(Some(n)),
        Err(error) => Err(error)
            .change_context(VarError)
            .attach_printable_lazy(|| format!("could not parse value of {key:?}"))
            .erase_context(),
    }
}

fn make_var_error(key: &str, error: std::env::VarError) -> Error {
    match error {
        std::env::VarError::NotPresent => {
            Error::unknown_generic(VarError).attach_printable(format!("{key:?} is missing"))
        }
        err @ std::env::VarError::NotUnicode(..) => Error::unknown_generic(err)
            .change_context_slient(VarError)
            .attach_printable(format!("{key:?} has an invalid UTF-8 value")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_dotenv() {
        let root = tempfile::tempdir().unwrap();
        let nested = root.path().join("a/b/c");
        std::fs::create_dir_all(&nested).unwrap();

        assert!(find_dotenv(&nested).is_err());

        std::fs::write(root.path().join("a/.env"), "__QUIRE_TEST__=hi!").unwrap();
        assert_eq!(find_dotenv(&nested).unwrap(), root.path().join("a/.env"));

        std::fs::write(nested.join(".env"), "__QUIRE_TEST__=bye!").unwrap();
        assert_eq!(find_dotenv(&nested).unwrap(), nested.join(".env"));
    }

    #[test]
    fn test_var_opt_parsed() {
        std::env::set_var("__QUIRE_TEST_PORT__", "8081");
        assert_eq!(
            var_opt_parsed::<u16>("__QUIRE_TEST_PORT__").unwrap(),
            Some(8081)
        );

        std::env::set_var("__QUIRE_TEST_PORT__", "eighty");
        assert!(var_opt_parsed::<u16>("__QUIRE_TEST_PORT__").is_err());

        std::env::remove_var("__QUIRE_TEST_PORT__");
        assert_eq!(var_opt_parsed::<u16>("__QUIRE_TEST_PORT__").unwrap(), None);
    }
}
