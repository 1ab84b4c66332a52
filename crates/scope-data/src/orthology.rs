//! Loading ortholog and synonym tables from a directory of TSV files.
//!
//! File names select the table:
//!
//! - `<source>_to_<target>.tsv`: `source_gene<TAB>target_gene<TAB>identity`
//! - `<species>_synonyms.tsv`: `literal<TAB>canonical`
//!
//! Species are given by code (`hsap`, `mmus`, `dmel`). Blank lines and lines
//! starting with `#` are skipped. Other files in the directory are ignored.

use csv::{ReaderBuilder, StringRecord, Trim};
use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};

use scope_core::{Error, Ortholog, OrthologyTables, Result, Species, SpeciesPair, SynonymTable};

const EXTENSION: &str = "tsv";
const SYNONYMS_SUFFIX: &str = "_synonyms";
const PAIR_SEPARATOR: &str = "_to_";

/// What a file in the orthology directory holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TableFile {
    Orthologs(SpeciesPair),
    Synonyms(Species),
}

impl TableFile {
    fn classify(path: &Path) -> Option<Self> {
        if path.extension()?.to_str()? != EXTENSION {
            return None;
        }
        let stem = path.file_stem()?.to_str()?;
        if let Some(code) = stem.strip_suffix(SYNONYMS_SUFFIX) {
            return Species::from_code(code).map(Self::Synonyms);
        }
        let (source, target) = stem.split_once(PAIR_SEPARATOR)?;
        Some(Self::Orthologs(SpeciesPair::new(
            Species::from_code(source)?,
            Species::from_code(target)?,
        )))
    }
}

/// Load every recognised table in `dir`.
///
/// Files are read in name order so repeated loads are identical.
///
/// # Errors
///
/// Returns [`Error::Io`] when the directory or a table cannot be read and
/// [`Error::InvalidData`] naming the file and line of a malformed row.
pub fn load_dir(dir: &Path) -> Result<OrthologyTables> {
    let mut paths: Vec<PathBuf> = std::fs::read_dir(dir)?
        .map(|entry| entry.map(|e| e.path()))
        .collect::<std::io::Result<_>>()?;
    paths.sort();

    let mut tables = OrthologyTables::new();
    for path in paths {
        match TableFile::classify(&path) {
            Some(TableFile::Orthologs(pair)) => {
                let count = load_orthologs(&path, pair, &mut tables)?;
                log::info!("Loaded {} orthologs for {} from {}", count, pair, path.display());
            }
            Some(TableFile::Synonyms(species)) => {
                let table = load_synonyms(&path)?;
                log::info!(
                    "Loaded {} {} synonyms from {}",
                    table.len(),
                    species,
                    path.display()
                );
                tables.set_synonyms(species, table);
            }
            None => log::debug!("Skipping {}", path.display()),
        }
    }
    Ok(tables)
}

/// Read one ortholog table into `tables`, returning the number of rows.
pub fn load_orthologs(path: &Path, pair: SpeciesPair, tables: &mut OrthologyTables) -> Result<usize> {
    let mut count = 0;
    for_each_row(path, |(source, target, identity): (String, String, f64)| {
        tables.add_ortholog(pair, source, Ortholog::new(target, identity));
        count += 1;
    })?;
    Ok(count)
}

/// Read one synonym table.
pub fn load_synonyms(path: &Path) -> Result<SynonymTable> {
    let mut table = SynonymTable::new();
    for_each_row(path, |(literal, canonical): (String, String)| {
        table.insert(literal, canonical);
    })?;
    Ok(table)
}

/// Deserialize each data row of a headerless TSV file and feed it to `row`.
fn for_each_row<T, F>(path: &Path, mut row: F) -> Result<()>
where
    T: DeserializeOwned,
    F: FnMut(T),
{
    let mut reader = ReaderBuilder::new()
        .delimiter(b'\t')
        .has_headers(false)
        .comment(Some(b'#'))
        .flexible(true)
        .trim(Trim::All)
        .from_path(path)
        .map_err(|e| table_error(path, e))?;

    let mut record = StringRecord::new();
    while reader
        .read_record(&mut record)
        .map_err(|e| table_error(path, e))?
    {
        let line = record.position().map_or(0, csv::Position::line);
        let value = record
            .deserialize(None)
            .map_err(|e| malformed(path, line, &e.to_string()))?;
        row(value);
    }
    Ok(())
}

fn table_error(path: &Path, err: csv::Error) -> Error {
    let line = err.position().map_or(0, csv::Position::line);
    let reason = err.to_string();
    match err.into_kind() {
        csv::ErrorKind::Io(io) => Error::Io(io),
        _ => malformed(path, line, &reason),
    }
}

fn malformed(path: &Path, line: u64, reason: &str) -> Error {
    Error::InvalidData(format!("{}:{}: {}", path.display(), line, reason))
}

#[cfg(test)]
mod tests {
    use super::*;
    use scope_core::OrthologProvider;
    use tempfile::TempDir;

    const HSAP_DMEL: SpeciesPair = SpeciesPair::new(Species::Hsap, Species::Dmel);

    fn write(dir: &TempDir, name: &str, content: &str) {
        std::fs::write(dir.path().join(name), content).unwrap();
    }

    #[test]
    fn test_classify_file_names() {
        assert_eq!(
            TableFile::classify(Path::new("/o/hsap_to_dmel.tsv")),
            Some(TableFile::Orthologs(HSAP_DMEL))
        );
        assert_eq!(
            TableFile::classify(Path::new("/o/dmel_synonyms.tsv")),
            Some(TableFile::Synonyms(Species::Dmel))
        );
        assert_eq!(TableFile::classify(Path::new("/o/hsap_to_dmel.csv")), None);
        assert_eq!(TableFile::classify(Path::new("/o/drer_to_dmel.tsv")), None);
        assert_eq!(TableFile::classify(Path::new("/o/README.md")), None);
    }

    #[test]
    fn test_load_dir() {
        let dir = TempDir::new().unwrap();
        write(
            &dir,
            "hsap_to_dmel.tsv",
            "# source\ttarget\tidentity\nBRAT\tbrat\t97.5\n\nTRIM3\tbrat\t45\nTRIM3\twech\t31\n",
        );
        write(&dir, "dmel_synonyms.tsv", "brat\tbrat\nCG10719\tbrat\n");
        write(&dir, "notes.txt", "not a table");

        let tables = load_dir(dir.path()).unwrap();
        assert_eq!(tables.pairs(), vec![HSAP_DMEL]);
        assert_eq!(tables.source_genes(HSAP_DMEL), vec!["BRAT", "TRIM3"]);
        assert_eq!(
            tables.orthologs(HSAP_DMEL, "TRIM3"),
            vec![Ortholog::new("brat", 45.0), Ortholog::new("wech", 31.0)]
        );
        let synonyms = tables.synonyms(Species::Dmel).unwrap();
        assert_eq!(synonyms.canonical("CG10719"), Some("brat"));
    }

    #[test]
    fn test_windows_line_endings() {
        let dir = TempDir::new().unwrap();
        write(&dir, "mmus_to_dmel.tsv", "Trim3\tbrat\t44.0\r\n");
        let tables = load_dir(dir.path()).unwrap();
        let pair = SpeciesPair::new(Species::Mmus, Species::Dmel);
        assert_eq!(tables.orthologs(pair, "Trim3"), vec![Ortholog::new("brat", 44.0)]);
    }

    #[test]
    fn test_missing_column_names_file_and_line() {
        let dir = TempDir::new().unwrap();
        write(&dir, "hsap_to_dmel.tsv", "# header\nBRAT\tbrat\n");
        let err = load_dir(dir.path()).unwrap_err();

        let message = err.to_string();
        assert!(matches!(err, Error::InvalidData(_)));
        assert!(message.contains("hsap_to_dmel.tsv:2"), "{message}");
    }

    #[test]
    fn test_non_numeric_identity() {
        let dir = TempDir::new().unwrap();
        write(&dir, "hsap_to_dmel.tsv", "BRAT\tbrat\t97.5\nTRIM3\tbrat\thigh\n");
        let err = load_dir(dir.path()).unwrap_err();

        let message = err.to_string();
        assert!(matches!(err, Error::InvalidData(_)));
        assert!(message.contains("hsap_to_dmel.tsv:2"), "{message}");
    }

    #[test]
    fn test_fields_are_trimmed() {
        let dir = TempDir::new().unwrap();
        write(&dir, "dmel_synonyms.tsv", "# literal\tcanonical\n CG10719 \t brat\n");
        let tables = load_dir(dir.path()).unwrap();
        let synonyms = tables.synonyms(Species::Dmel).unwrap();
        assert_eq!(synonyms.canonical("CG10719"), Some("brat"));
        assert_eq!(synonyms.len(), 1);
    }

    #[test]
    fn test_missing_directory() {
        let dir = TempDir::new().unwrap();
        let err = load_dir(&dir.path().join("absent")).unwrap_err();
        assert!(matches!(err, Error::Io(_)));
    }
}
