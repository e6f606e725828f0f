use crate::dto::HealthRes;

/// Simple health service shared by the HTTP API and the CLI
///
/// Reports liveness together with the number of asset records loaded at start-up, so an
/// empty or truncated source table is visible from monitoring.
#[derive(Clone, Default)]
pub struct HealthService;

impl HealthService {
    /// Builds the health response for a store holding `record_count` records.
    ///
    /// # Returns
    /// A `HealthRes` that is `ok` when at least one record is loaded.
    pub fn check_health(record_count: usize) -> HealthRes {
        if record_count == 0 {
            HealthRes {
                ok: false,
                message: "GUIA is alive but the asset table is empty".into(),
                records: 0,
            }
        } else {
            HealthRes {
                ok: true,
                message: "GUIA is alive".into(),
                records: record_count,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_health_reports_record_count() {
        let res = HealthService::check_health(12);
        assert!(res.ok);
        assert_eq!(res.records, 12);
    }

    #[test]
    fn test_health_empty_table_is_not_ok() {
        assert!(!HealthService::check_health(0).ok);
    }
}
