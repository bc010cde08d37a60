use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::{errors::RpqError, path::PathExpr};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Query {
    pub subject: String,
    pub path: String,
    pub target: String,
}

impl Query {
    pub fn new<S, P, T>(subject: S, path: P, target: T) -> Self
    where
        S: Into<String>,
        P: Into<String>,
        T: Into<String>,
    {
        Self {
            subject: subject.into(),
            path: path.into(),
            target: target.into(),
        }
    }

    pub fn from_line(line: &str) -> Result<Self, RpqError> {
        let mut parts = line.rsplitn(3, ',');
        let target = parts.next().unwrap_or("");
        let path = parts.next().unwrap_or("");
        let subject = parts.next().unwrap_or("");
        if subject.is_empty() || path.is_empty() || target.is_empty() {
            return Err(RpqError::invalid_query(format!(
                "expected <subject>,<path>,<target>, got {line:?}"
            )));
        }
        Ok(Self::new(subject, path, target))
    }

    pub fn tree(&self) -> PathExpr {
        PathExpr::parse(&self.path)
    }
}

impl FromStr for Query {
    type Err = RpqError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Query::from_line(s)
    }
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{},{}", self.subject, self.path, self.target)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QueryMode {
    #[default]
    Lenient,
    Strict,
}
