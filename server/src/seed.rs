//! Demo data for local development.

use products_hr::{Employee, EmployeeError, EmployeeResult, EmployeeService};
use tracing::{info, warn};

pub const DEMO_EMPLOYEES: &[(&str, &str, &str)] = &[
    ("Todimu", "Isewon", "todimu@gmail.com"),
    ("Lani", "Isewon", "lani@gmail.com"),
    ("Ada", "Lovelace", "ada@example.com"),
];

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SeedReport {
    pub created: usize,
    pub skipped: usize,
}

/// Create every demo employee through the service. Emails that already
/// exist are skipped, so the command can be re-run safely.
pub async fn seed_demo(service: &EmployeeService) -> EmployeeResult<SeedReport> {
    let mut report = SeedReport::default();
    for (first, last, email) in DEMO_EMPLOYEES {
        match service.create(Employee::new(*first, *last, *email)).await {
            Ok(saved) => {
                info!(employee_id = saved.id, email, "seeded employee");
                report.created += 1;
            }
            Err(EmployeeError::DuplicateResource { email }) => {
                warn!(%email, "employee already present; skipping");
                report.skipped += 1;
            }
            Err(err) => return Err(err),
        }
    }
    Ok(report)
}
