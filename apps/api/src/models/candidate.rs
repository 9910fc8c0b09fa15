use serde::{Deserialize, Serialize};

/// Candidate identity printed on the report.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CandidateSummary {
    pub id: String,
    pub name: String,
}

/// Candidate record as the backend returns it. Older records only carry
/// `firstName`/`lastName`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CandidateRecord {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
}

impl CandidateRecord {
    pub(crate) fn into_summary(self, id: &str) -> CandidateSummary {
        let name = match self.name.filter(|n| !n.trim().is_empty()) {
            Some(name) => name.trim().to_string(),
            None => [self.first_name, self.last_name]
                .into_iter()
                .flatten()
                .map(|part| part.trim().to_string())
                .filter(|part| !part.is_empty())
                .collect::<Vec<_>>()
                .join(" "),
        };

        CandidateSummary {
            id: id.to_string(),
            name,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_prefers_full_name() {
        let record: CandidateRecord =
            serde_json::from_str(r#"{"name": " Ana Pérez ", "firstName": "X"}"#).unwrap();
        assert_eq!(record.into_summary("3").name, "Ana Pérez");
    }

    #[test]
    fn test_summary_joins_first_and_last_name() {
        let record: CandidateRecord =
            serde_json::from_str(r#"{"firstName": "Luis", "lastName": "Gómez"}"#).unwrap();
        let summary = record.into_summary("9");
        assert_eq!(summary.id, "9");
        assert_eq!(summary.name, "Luis Gómez");
    }
}
