use crate::distance::{compute_all, DistanceMetric, DistanceResult};
use crate::{BooleanNetwork, Error, RegulatoryGraph};
use std::path::Path;

/// Load a network structure from a `.bnet` or `.sif` file.
///
/// For `.sif` files, `variables` (if given) are the variables of the resulting graph, so that
/// variables without any regulation are not lost.
pub fn load_structure(path: &Path, variables: Option<&[String]>) -> Result<RegulatoryGraph, Error> {
    match path.extension().and_then(|it| it.to_str()) {
        Some("bnet") => Ok(BooleanNetwork::try_from_file(path)?.as_graph().clone()),
        Some("sif") => {
            let content = std::fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
            RegulatoryGraph::try_from_sif(&content, variables)
                .map_err(|e| Error::Parse(format!("Invalid structure `{}`: {}", path.display(), e)))
        }
        _ => Err(Error::Parse(format!(
            "Unknown structure format: `{}`.",
            path.display()
        ))),
    }
}

/// Compare the inferred structure at `inferred` with the ground-truth model at `truth`.
///
/// Networks are identified by their file names (without extension) in the results.
pub fn score_structure(
    truth: &Path,
    inferred: &Path,
    metrics: &[DistanceMetric],
) -> Result<Vec<DistanceResult>, Error> {
    let truth_graph = load_structure(truth, None)?;
    let variables = truth_graph.variable_names();
    let inferred_graph = load_structure(inferred, Some(&variables))?;
    compute_all(
        &file_id(truth),
        &truth_graph,
        &file_id(inferred),
        &inferred_graph,
        metrics,
    )
}

fn file_id(path: &Path) -> String {
    path.file_stem()
        .and_then(|it| it.to_str())
        .unwrap_or("unknown")
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::{load_structure, score_structure};
    use crate::distance::DistanceMetric;
    use crate::Error;

    #[test]
    fn score_inferred_structure() {
        let dir = tempfile::tempdir().unwrap();
        let truth = dir.path().join("toggle.bnet");
        std::fs::write(&truth, "targets, factors\na, !b\nb, !a\nc, a\n").unwrap();
        let inferred = dir.path().join("inferred.sif");
        std::fs::write(&inferred, "b\t+\ta\na\t-\tb\n").unwrap();

        // `c` has no regulation in the inferred network, but is still aligned.
        let results = score_structure(&truth, &inferred, &DistanceMetric::ALL).unwrap();
        assert_eq!("toggle", results[0].truth_id);
        assert_eq!("inferred", results[0].inferred_id);
        assert!((results[0].value - 1.0 / 9.0).abs() < 1e-9);
        assert!((results[1].value - 1.0 / 3.0).abs() < 1e-9);

        let same = score_structure(&truth, &truth, &[DistanceMetric::StructuralHamming]).unwrap();
        assert_eq!(0.0, same[0].value);
    }

    #[test]
    fn invalid_structures() {
        let dir = tempfile::tempdir().unwrap();
        let truth = dir.path().join("truth.bnet");
        std::fs::write(&truth, "targets, factors\na, !b\nb, !a\n").unwrap();
        let unknown = dir.path().join("inferred.sif");
        std::fs::write(&unknown, "a\t+\tx\n").unwrap();
        assert!(matches!(
            score_structure(&truth, &unknown, &DistanceMetric::ALL),
            Err(Error::Parse(_))
        ));
        let other = dir.path().join("other.bnet");
        std::fs::write(&other, "targets, factors\na, !b\nb, !a\nc, c\n").unwrap();
        assert!(matches!(
            score_structure(&truth, &other, &DistanceMetric::ALL),
            Err(Error::Alignment(_))
        ));
        assert!(matches!(
            load_structure(&dir.path().join("net.txt"), None),
            Err(Error::Parse(_))
        ));
    }
}
