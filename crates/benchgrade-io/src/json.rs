use std::{
    fs::File,
    io::{BufRead, BufReader},
    path::Path,
};

use serde::de::DeserializeOwned;

use crate::error::IoError;

fn open(path: &Path) -> Result<BufReader<File>, IoError> {
    if !path.exists() {
        return Err(IoError::FileDoesNotExist(path.to_path_buf()));
    }
    Ok(BufReader::new(File::open(path)?))
}

/// Read a JSON document and deserialize it into `T`.
///
/// # Arguments
///
/// * `path` - The path to the json file.
pub fn read_json<T: DeserializeOwned>(path: impl AsRef<Path>) -> Result<T, IoError> {
    let path = path.as_ref();
    log::info!("loading {} ...", path.display());
    let value = serde_json::from_reader(open(path)?)?;
    log::info!("{} loaded", path.display());
    Ok(value)
}

/// Read a file with one JSON document per line. Blank lines are skipped.
pub fn read_jsonl<T: DeserializeOwned>(path: impl AsRef<Path>) -> Result<Vec<T>, IoError> {
    read_lines(path)?
        .iter()
        .filter(|line| !line.trim().is_empty())
        .map(|line| serde_json::from_str(line.trim()).map_err(IoError::from))
        .collect()
}

/// Read every line of a text file, without line terminators.
pub fn read_lines(path: impl AsRef<Path>) -> Result<Vec<String>, IoError> {
    let lines = open(path.as_ref())?
        .lines()
        .collect::<Result<Vec<_>, _>>()?;
    Ok(lines)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    #[derive(Debug, serde::Deserialize)]
    struct Question {
        pids: Vec<String>,
        flag: Option<u32>,
    }

    #[test]
    fn test_read_json() -> Result<(), Box<dyn std::error::Error>> {
        let mut file = tempfile::NamedTempFile::new()?;
        write!(file, r#"{{"p1": [0.5, 1.0], "p2": []}}"#)?;

        let data: HashMap<String, Vec<f64>> = read_json(file.path())?;
        assert_eq!(data["p1"], vec![0.5, 1.0]);
        assert!(data["p2"].is_empty());
        Ok(())
    }

    #[test]
    fn test_read_jsonl() -> Result<(), Box<dyn std::error::Error>> {
        let mut file = tempfile::NamedTempFile::new()?;
        writeln!(file, r#"{{"pids": ["a", "b"]}}"#)?;
        writeln!(file)?;
        writeln!(file, r#"{{"pids": ["c"], "flag": 0}}"#)?;

        let questions: Vec<Question> = read_jsonl(file.path())?;
        assert_eq!(questions.len(), 2);
        assert_eq!(questions[0].pids, vec!["a", "b"]);
        assert_eq!(questions[0].flag, None);
        assert_eq!(questions[1].flag, Some(0));
        Ok(())
    }

    #[test]
    fn test_missing_file() {
        let res: Result<Vec<String>, _> = read_lines("/definitely/not/here.txt");
        assert!(matches!(res, Err(IoError::FileDoesNotExist(_))));
    }
}
