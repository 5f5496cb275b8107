use std::{collections::HashMap, fmt::Display, str::FromStr};

use anyhow::Context;

/// Command-line words split into bare values (`file.txt`, `-show`) and
/// `key=value` pairs (`-extent=20`).
#[derive(Debug)]
pub struct ArgVals {
    pub simple_vals: Vec<String>,
    pub mapped_vals: HashMap<String, String>,
}

impl ArgVals {
    pub fn from_args<I: IntoIterator<Item = String>>(args: I) -> Self {
        let mut simple_vals = vec![];
        let mut mapped_vals = HashMap::default();
        for arg in args {
            let parts = arg.split('=').collect::<Vec<_>>();
            if parts.len() == 2 {
                mapped_vals.insert(parts[0].to_string(), parts[1].to_string());
            } else {
                simple_vals.push(arg);
            }
        }
        Self {
            simple_vals,
            mapped_vals,
        }
    }

    pub fn len(&self) -> usize {
        self.simple_vals.len() + self.mapped_vals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The `i`th bare value that is not a `-flag`.
    pub fn get_symbol(&self, i: usize) -> Option<&str> {
        self.simple_vals
            .iter()
            .filter(|v| !v.starts_with('-'))
            .nth(i)
            .map(|v| v.as_str())
    }

    pub fn has_flag(&self, flag: &str) -> bool {
        self.simple_vals.iter().any(|v| v == flag)
    }

    pub fn get_value<T>(&self, key: &str) -> anyhow::Result<Option<T>>
    where
        T: FromStr,
        T::Err: Display,
    {
        self.mapped_vals
            .get(key)
            .map(|v| {
                v.parse::<T>()
                    .map_err(|e| anyhow::Error::msg(e.to_string()))
                    .with_context(|| format!("Error in {key}={v}"))
            })
            .transpose()
    }
}

impl Default for ArgVals {
    fn default() -> Self {
        Self::from_args(std::env::args().skip(1))
    }
}

#[cfg(test)]
mod tests {
    use super::ArgVals;

    fn args(words: &[&str]) -> ArgVals {
        ArgVals::from_args(words.iter().map(|w| w.to_string()))
    }

    #[test]
    fn test_split() {
        let a = args(&["obstacles.txt", "-show", "-extent=12", "-start=B-3", "a=b=c"]);
        assert_eq!(a.len(), 5);
        assert_eq!(a.get_symbol(0), Some("obstacles.txt"));
        assert_eq!(a.get_symbol(1), Some("a=b=c"));
        assert!(a.has_flag("-show"));
        assert!(!a.has_flag("-steps"));
        assert_eq!(a.get_value::<u64>("-extent").unwrap(), Some(12));
        assert_eq!(a.get_value::<String>("-start").unwrap(), Some("B-3".to_string()));
        assert_eq!(a.get_value::<u64>("-radius").unwrap(), None);
    }

    #[test]
    fn test_bad_value() {
        let a = args(&["-extent=twelve"]);
        let err = a.get_value::<u64>("-extent").unwrap_err();
        assert!(format!("{err:#}").contains("-extent=twelve"));
        assert!(args(&[]).is_empty());
    }
}
