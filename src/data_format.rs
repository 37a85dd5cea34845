//! Reading and writing of `.data` dataset files.
//!
//! Two tab-separated layouts are supported:
//!
//!  - `Layout::TimeRows`: a `Time` header with the variable names, then one row per sampled
//!    state (`t`, followed by the values). Consecutive series are separated by a blank line.
//!  - `Layout::SeriesColumns`: the time-series import layout of BNFinder. The header is `net`
//!    followed by one `s<j>:t<i>` label per sample (series `j`, time `i`, both starting at 1),
//!    then one row per variable.
//!
//! Reading detects the layout from the first header cell.

use crate::biodivine_std::bitvector::BitVector;
use crate::sampling::{Dataset, DatasetMetadata};
use crate::{Error, State};
use lazy_static::lazy_static;
use regex::Regex;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use std::str::FromStr;

/// Arrangement of samples in a `.data` file.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub enum Layout {
    #[default]
    TimeRows,
    SeriesColumns,
}

impl FromStr for Layout {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim() {
            "time-rows" => Ok(Layout::TimeRows),
            "series-columns" => Ok(Layout::SeriesColumns),
            _ => Err(Error::Configuration(format!(
                "Unknown layout `{}` (expected `time-rows` or `series-columns`).",
                value
            ))),
        }
    }
}

lazy_static! {
    static ref SERIES_COLUMN: Regex = Regex::new(r"^s(\d+):t(\d+)$").unwrap();
}

/// Write `dataset` into a new file at `path` (overwriting an existing one).
pub fn write_dataset(path: &Path, dataset: &Dataset, layout: Layout) -> Result<(), Error> {
    let file = File::create(path).map_err(|e| Error::io(path, e))?;
    let mut writer = BufWriter::new(file);
    write_to(&mut writer, dataset, layout).map_err(|e| Error::io(path, e))?;
    writer.flush().map_err(|e| Error::io(path, e))
}

/// Write `dataset` in the given layout.
pub fn write_to<W: Write>(writer: &mut W, dataset: &Dataset, layout: Layout) -> std::io::Result<()> {
    match layout {
        Layout::TimeRows => {
            writeln!(writer, "Time\t{}", dataset.variables().join("\t"))?;
            for (i, series) in dataset.series().iter().enumerate() {
                if i > 0 {
                    writeln!(writer)?;
                }
                for (t, state) in series.iter().enumerate() {
                    writeln!(writer, "{}\t{}", t, state_values(state).join("\t"))?;
                }
            }
        }
        Layout::SeriesColumns => {
            let mut header = vec!["net".to_string()];
            for (j, series) in dataset.series().iter().enumerate() {
                for t in 0..series.len() {
                    header.push(format!("s{}:t{}", j + 1, t + 1));
                }
            }
            writeln!(writer, "{}", header.join("\t"))?;
            for (var, name) in dataset.variables().iter().enumerate() {
                let mut row = vec![name.clone()];
                for series in dataset.series() {
                    for state in series {
                        row.push(bit(state.get(var)).to_string());
                    }
                }
                writeln!(writer, "{}", row.join("\t"))?;
            }
        }
    }
    Ok(())
}

/// Read a dataset file. The file name has to follow the `DatasetMetadata` naming scheme.
pub fn read_dataset(path: &Path) -> Result<Dataset, Error> {
    let file_name = path
        .file_name()
        .and_then(|it| it.to_str())
        .ok_or_else(|| Error::Parse(format!("Invalid dataset path `{}`.", path.display())))?;
    let metadata = DatasetMetadata::from_file_name(file_name).map_err(Error::Parse)?;
    let content = std::fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
    let (variables, series) = read_series(&content)
        .map_err(|e| Error::Parse(format!("Invalid dataset `{}`: {}", path.display(), e)))?;
    let mut dataset = Dataset::new(metadata, variables)
        .map_err(|e| Error::Parse(format!("Invalid dataset `{}`: {}", path.display(), e)))?;
    for s in series {
        dataset
            .push(s)
            .map_err(|e| Error::Parse(format!("Invalid dataset `{}`: {}", path.display(), e)))?;
    }
    Ok(dataset)
}

/// Read variable names and series from the content of a `.data` file in either layout.
pub fn read_series(content: &str) -> Result<(Vec<String>, Vec<Vec<State>>), String> {
    let mut lines = content.lines().enumerate().skip_while(|(_, l)| l.trim().is_empty());
    let (_, header) = lines.next().ok_or("Missing header.")?;
    let header = header.trim_end().split('\t').collect::<Vec<_>>();
    match header[0].trim() {
        "Time" => read_time_rows(&header, lines),
        "net" => read_series_columns(&header, lines),
        other => Err(format!("Unknown header `{}`.", other)),
    }
}

/// **(internal)** Read the body of a `Layout::TimeRows` file.
fn read_time_rows<'a, I>(header: &[&str], lines: I) -> Result<(Vec<String>, Vec<Vec<State>>), String>
where
    I: Iterator<Item = (usize, &'a str)>,
{
    let variables = header[1..].iter().map(|it| it.to_string()).collect::<Vec<_>>();
    check_state_size(variables.len())?;
    let mut result = Vec::new();
    let mut current: Vec<State> = Vec::new();
    for (line_number, line) in lines {
        if line.trim().is_empty() {
            if !current.is_empty() {
                result.push(std::mem::take(&mut current));
            }
            continue;
        }
        let cells = line.trim_end().split('\t').collect::<Vec<_>>();
        if cells.len() != variables.len() + 1 {
            return Err(format!(
                "Line {}: expected {} values, found {}.",
                line_number + 1,
                variables.len(),
                cells.len() - 1
            ));
        }
        let time = cells[0]
            .trim()
            .parse::<usize>()
            .map_err(|e| format!("Line {}: invalid time `{}`: {}", line_number + 1, cells[0], e))?;
        if time != current.len() {
            return Err(format!(
                "Line {}: expected time {}, found {}.",
                line_number + 1,
                current.len(),
                time
            ));
        }
        let mut state = State::empty(variables.len());
        for (i, cell) in cells[1..].iter().enumerate() {
            state.set(i, parse_bit(cell).map_err(|e| format!("Line {}: {}", line_number + 1, e))?);
        }
        current.push(state);
    }
    if !current.is_empty() {
        result.push(current);
    }
    Ok((variables, result))
}

/// **(internal)** Read the body of a `Layout::SeriesColumns` file.
fn read_series_columns<'a, I>(
    header: &[&str],
    lines: I,
) -> Result<(Vec<String>, Vec<Vec<State>>), String>
where
    I: Iterator<Item = (usize, &'a str)>,
{
    // For every column, the series it belongs to.
    let mut column_series = Vec::new();
    let mut series_lengths: Vec<usize> = Vec::new();
    for label in &header[1..] {
        let captures = SERIES_COLUMN
            .captures(label.trim())
            .ok_or_else(|| format!("Invalid column label `{}`.", label))?;
        let series = captures[1].parse::<usize>().map_err(|e| e.to_string())?;
        let time = captures[2].parse::<usize>().map_err(|e| e.to_string())?;
        if series == series_lengths.len() + 1 {
            series_lengths.push(0);
        }
        if series != series_lengths.len() || time != series_lengths[series - 1] + 1 {
            return Err(format!("Unexpected column `{}`.", label));
        }
        series_lengths[series - 1] += 1;
        column_series.push(series - 1);
    }

    let mut variables = Vec::new();
    let mut rows = Vec::new();
    for (line_number, line) in lines {
        if line.trim().is_empty() {
            continue;
        }
        let cells = line.trim_end().split('\t').collect::<Vec<_>>();
        if cells.len() != header.len() {
            return Err(format!(
                "Line {}: expected {} values, found {}.",
                line_number + 1,
                header.len() - 1,
                cells.len() - 1
            ));
        }
        variables.push(cells[0].trim().to_string());
        let values = cells[1..]
            .iter()
            .map(|cell| parse_bit(cell))
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| format!("Line {}: {}", line_number + 1, e))?;
        rows.push(values);
    }
    check_state_size(variables.len())?;

    let mut result = series_lengths
        .iter()
        .map(|len| Vec::with_capacity(*len))
        .collect::<Vec<Vec<State>>>();
    for (column, series) in column_series.iter().enumerate() {
        let values = rows.iter().map(|row| row[column]).collect::<Vec<_>>();
        result[*series].push(State::from(values));
    }
    Ok((variables, result))
}

/// **(internal)** Fail if states of `num_vars` values cannot be represented.
fn check_state_size(num_vars: usize) -> Result<(), String> {
    if num_vars > State::max_length() {
        Err(format!(
            "Datasets with {} variables are not supported (at most {}).",
            num_vars,
            State::max_length()
        ))
    } else {
        Ok(())
    }
}

fn parse_bit(cell: &str) -> Result<bool, String> {
    match cell.trim() {
        "0" => Ok(false),
        "1" => Ok(true),
        other => Err(format!("Invalid value `{}`.", other)),
    }
}

fn bit(value: bool) -> u8 {
    u8::from(value)
}

fn state_values(state: &State) -> Vec<String> {
    state.values().into_iter().map(|v| bit(v).to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::{read_dataset, read_series, write_dataset, write_to, Layout};
    use crate::dynamics::UpdateMode;
    use crate::sampling::{Dataset, DatasetMetadata};
    use crate::{Error, State};
    use pretty_assertions::assert_eq;
    use std::str::FromStr;

    fn small_dataset() -> Dataset {
        let metadata = DatasetMetadata {
            num_vars: 2,
            steps: 3,
            stride: 1,
            ntraj: 2,
            mode: UpdateMode::Synchronous,
        };
        let mut dataset = Dataset::new(metadata, vec!["a".to_string(), "b".to_string()]).unwrap();
        dataset
            .push(vec![
                State::from(vec![false, false]),
                State::from(vec![true, true]),
                State::from(vec![false, false]),
            ])
            .unwrap();
        dataset
            .push(vec![
                State::from(vec![false, true]),
                State::from(vec![false, true]),
                State::from(vec![false, true]),
            ])
            .unwrap();
        dataset
    }

    fn to_string(dataset: &Dataset, layout: Layout) -> String {
        let mut buffer = Vec::new();
        write_to(&mut buffer, dataset, layout).unwrap();
        String::from_utf8(buffer).unwrap()
    }

    #[test]
    fn write_time_rows() {
        let expected = "Time\ta\tb\n0\t0\t0\n1\t1\t1\n2\t0\t0\n\n0\t0\t1\n1\t0\t1\n2\t0\t1\n";
        assert_eq!(expected, to_string(&small_dataset(), Layout::TimeRows));
    }

    #[test]
    fn write_series_columns() {
        let expected = "net\ts1:t1\ts1:t2\ts1:t3\ts2:t1\ts2:t2\ts2:t3\n\
        a\t0\t1\t0\t0\t0\t0\n\
        b\t0\t1\t0\t1\t1\t1\n";
        assert_eq!(expected, to_string(&small_dataset(), Layout::SeriesColumns));
    }

    #[test]
    fn read_both_layouts() {
        let dataset = small_dataset();
        for layout in [Layout::TimeRows, Layout::SeriesColumns] {
            let (variables, series) = read_series(&to_string(&dataset, layout)).unwrap();
            assert_eq!(dataset.variables(), variables.as_slice());
            assert_eq!(dataset.series(), series.as_slice());
        }
    }

    #[test]
    fn read_invalid_content() {
        assert!(read_series("").is_err());
        assert!(read_series("Gene\tS0\n").is_err());
        assert!(read_series("Time\ta\n0\t2\n").is_err());
        assert!(read_series("Time\ta\n1\t0\n").is_err());
        assert!(read_series("Time\ta\tb\n0\t0\n").is_err());
        assert!(read_series("net\ts1:t2\na\t0\n").is_err());
        assert!(read_series("net\ts1:t1\na\t0\t1\n").is_err());
        assert!(Layout::from_str("columns").is_err());
    }

    #[test]
    fn file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let dataset = small_dataset();
        let path = dir.path().join(dataset.metadata().file_name());
        for layout in [Layout::TimeRows, Layout::SeriesColumns] {
            write_dataset(&path, &dataset, layout).unwrap();
            assert_eq!(dataset, read_dataset(&path).unwrap());
        }
        let unnamed = dir.path().join("dataset.data");
        write_dataset(&unnamed, &dataset, Layout::TimeRows).unwrap();
        assert!(matches!(read_dataset(&unnamed), Err(Error::Parse(_))));
        let missing = dir.path().join("missing").join(dataset.metadata().file_name());
        assert!(matches!(
            write_dataset(&missing, &dataset, Layout::TimeRows),
            Err(Error::Io { .. })
        ));
    }
}
