//! Sibling-file discovery: the sub-products of one observation are spread
//! over several files whose names share a fixed date/identifier substring.
use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::error::{Error, Result};

/// A candidate file belonging to the same observation as the recognized one.
#[derive(Debug, Clone, PartialEq)]
pub struct Sibling {
    pub path: PathBuf,
    /// Frequency code for products split per channel, `None` otherwise.
    pub frequency: Option<u32>,
}

/// How a mapper derives the sibling set from the recognized file's name.
#[derive(Debug, Clone)]
pub enum SiblingPattern {
    /// Single-file products: the recognized file is its own sibling set.
    SelfOnly,
    /// Hold the first `prefix_len` characters of the file name constant and
    /// accept every directory entry sharing them, the input file included.
    SharedPrefix { prefix_len: usize },
    /// Substitute each known zero-padded two-digit frequency code into the
    /// fixed `range` of the file name and keep the paths that exist.
    FrequencySplice {
        start: usize,
        end: usize,
        frequencies: &'static [u32],
    },
}

impl SiblingPattern {
    /// Ordered candidate list. Prefix matches are sorted by name so the
    /// result does not depend on directory enumeration order; frequency
    /// products follow the configured frequency order.
    pub fn discover(&self, path: &Path) -> Result<Vec<Sibling>> {
        match self {
            SiblingPattern::SelfOnly => Ok(vec![Sibling {
                path: path.to_path_buf(),
                frequency: None,
            }]),
            SiblingPattern::SharedPrefix { prefix_len } => {
                let (dir, name) = split_path(path)?;
                let prefix = prefix_of(&name, *prefix_len);
                debug!("sibling mask: {}*", prefix);
                let mut names: Vec<String> = fs::read_dir(dir)?
                    .filter_map(|entry| entry.ok())
                    .filter_map(|entry| entry.file_name().into_string().ok())
                    .filter(|candidate| candidate.starts_with(prefix))
                    .collect();
                names.sort();
                Ok(names
                    .into_iter()
                    .map(|candidate| Sibling {
                        path: dir.join(candidate),
                        frequency: None,
                    })
                    .collect())
            }
            SiblingPattern::FrequencySplice {
                start,
                end,
                frequencies,
            } => {
                let (dir, name) = split_path(path)?;
                if name.len() < *end
                    || !name.is_char_boundary(*start)
                    || !name.is_char_boundary(*end)
                {
                    warn!("file name does not fit the frequency splice: {}", name);
                    return Ok(Vec::new());
                }
                let mut siblings = Vec::new();
                for &freq in *frequencies {
                    let candidate = format!("{}{:02}{}", &name[..*start], freq, &name[*end..]);
                    let candidate_path = dir.join(candidate);
                    if candidate_path.exists() {
                        siblings.push(Sibling {
                            path: candidate_path,
                            frequency: Some(freq),
                        });
                    }
                }
                Ok(siblings)
            }
        }
    }
}

fn split_path(path: &Path) -> Result<(&Path, String)> {
    let dir = path.parent().unwrap_or_else(|| Path::new("."));
    let name = path
        .file_name()
        .and_then(|n| n.to_str())
        .map(str::to_string)
        .ok_or_else(|| Error::InvalidArgument {
            arg: "path",
            value: path.display().to_string(),
        })?;
    Ok((dir, name))
}

/// First `len` characters of `name`, or the whole name when shorter.
pub fn prefix_of(name: &str, len: usize) -> &str {
    match name.char_indices().nth(len) {
        Some((idx, _)) => &name[..idx],
        None => name,
    }
}
