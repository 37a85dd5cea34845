use crate::Error;
use std::fmt::Display;
use std::str::FromStr;

/// Command line flags of the form `--name value`.
///
/// Only the names given to `Flags::parse` are accepted. Lists are comma separated.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Flags {
    values: Vec<(String, String)>,
}

impl Flags {
    /// Parse `args` (without the program name).
    pub fn parse<I>(args: I, known: &[&str]) -> Result<Flags, Error>
    where
        I: IntoIterator<Item = String>,
    {
        let mut values: Vec<(String, String)> = Vec::new();
        let mut args = args.into_iter();
        while let Some(arg) = args.next() {
            let Some(name) = arg.strip_prefix("--") else {
                return Err(Error::Configuration(format!("Unexpected argument `{}`.", arg)));
            };
            if !known.contains(&name) {
                return Err(Error::Configuration(format!("Unknown flag `{}`.", arg)));
            }
            if values.iter().any(|(n, _)| n == name) {
                return Err(Error::Configuration(format!("Flag `{}` given twice.", arg)));
            }
            let value = args
                .next()
                .ok_or_else(|| Error::Configuration(format!("Missing value of `{}`.", arg)))?;
            values.push((name.to_string(), value));
        }
        Ok(Flags { values })
    }

    /// The raw value of a flag.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.values
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    /// The value of a flag, converted using `FromStr`.
    pub fn value<T>(&self, name: &str) -> Result<Option<T>, Error>
    where
        T: FromStr,
        T::Err: Display,
    {
        self.get(name)
            .map(|value| parse_value(name, value))
            .transpose()
    }

    /// A comma separated list of values.
    pub fn list<T>(&self, name: &str) -> Result<Option<Vec<T>>, Error>
    where
        T: FromStr,
        T::Err: Display,
    {
        self.get(name)
            .map(|value| {
                value
                    .split(',')
                    .filter(|it| !it.trim().is_empty())
                    .map(|it| parse_value(name, it.trim()))
                    .collect::<Result<Vec<T>, Error>>()
            })
            .transpose()
    }
}

fn parse_value<T>(name: &str, value: &str) -> Result<T, Error>
where
    T: FromStr,
    T::Err: Display,
{
    value.parse::<T>().map_err(|e| {
        Error::Configuration(format!("Invalid value `{}` of `--{}`: {}", value, name, e))
    })
}

#[cfg(test)]
mod tests {
    use super::Flags;
    use crate::dynamics::UpdateMode;
    use crate::Error;

    fn args(line: &str) -> Vec<String> {
        line.split_whitespace().map(|it| it.to_string()).collect()
    }

    #[test]
    fn parse_flags() {
        let flags = Flags::parse(
            args("--nodes 5,8 --modes sync,async --seed 7"),
            &["nodes", "modes", "seed", "out"],
        )
        .unwrap();
        assert_eq!(Some(vec![5usize, 8]), flags.list("nodes").unwrap());
        assert_eq!(
            Some(vec![UpdateMode::Synchronous, UpdateMode::Asynchronous]),
            flags.list("modes").unwrap()
        );
        assert_eq!(Some(7u64), flags.value("seed").unwrap());
        assert_eq!(None, flags.get("out"));
        assert!(matches!(
            flags.value::<f64>("nodes"),
            Err(Error::Configuration(_))
        ));
    }

    #[test]
    fn invalid_flags() {
        let known = ["nodes"];
        assert!(Flags::parse(args("--bogus 1"), &known).is_err());
        assert!(Flags::parse(args("nodes 1"), &known).is_err());
        assert!(Flags::parse(args("--nodes"), &known).is_err());
        assert!(Flags::parse(args("--nodes 1 --nodes 2"), &known).is_err());
        assert_eq!(Flags::default(), Flags::parse(Vec::new(), &known).unwrap());
    }
}
