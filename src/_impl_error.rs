use crate::Error;
use std::path::Path;

impl Error {
    /// Wrap an I/O failure together with the path it concerns.
    pub fn io<P: AsRef<Path>>(path: P, source: std::io::Error) -> Error {
        Error::Io {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    /// True for errors which abort a whole experiment run.
    ///
    /// Simulation, alignment and parse errors only affect one trajectory, comparison or model.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Error::Configuration(_) | Error::Io { .. })
    }

    /// Short name of the error class, used in run summaries.
    pub fn class_name(&self) -> &'static str {
        match self {
            Error::Configuration(_) => "ConfigurationError",
            Error::Simulation(_) => "SimulationError",
            Error::Alignment(_) => "AlignmentError",
            Error::Io { .. } => "IOError",
            Error::Parse(_) => "ParseError",
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::Error;

    #[test]
    fn test_error_classes() {
        let io = Error::io(
            "BN_data/x.data",
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        );
        assert!(io.is_fatal());
        assert_eq!("IOError", io.class_name());
        assert!(io.to_string().contains("BN_data/x.data"));
        assert!(Error::Configuration("stride".to_string()).is_fatal());
        assert!(!Error::Simulation("empty".to_string()).is_fatal());
        assert!(!Error::Alignment("names".to_string()).is_fatal());
        assert!(!Error::Parse("line".to_string()).is_fatal());
    }
}
