//! CLI command for `wheelwright doctor`
//!
//! Prints the findings of [`run_doctor`] and fails when a required program
//! is missing.

use std::path::Path;

use anyhow::Result;

use crate::cli::output::{
    is_json, is_quiet, print_detail, print_info, print_success, print_warning, status,
};
use crate::core::doctor::{run_doctor, DoctorReport, Readiness, Requirement, ToolCheck};

/// Execute the doctor command
pub async fn execute(project_dir: Option<&Path>) -> Result<()> {
    let report = run_doctor(project_dir);
    let readiness = report.readiness();

    if is_json() {
        let json = serde_json::json!({
            "status": match readiness {
                Readiness::Ready => "success",
                Readiness::Degraded => "warning",
                Readiness::Blocked => "error",
            },
            "checks": report.checks.iter().map(|c| serde_json::json!({
                "name": c.name,
                "passed": c.passed(),
                "required": c.requirement == Requirement::Required,
                "program": c.found.as_ref().map(|f| &f.program),
                "path": c.found.as_ref().map(|f| &f.path),
                "version": c.found.as_ref().map(|f| &f.version),
                "suggestion": (!c.passed()).then_some(&c.suggestion),
            })).collect::<Vec<_>>(),
            "config_issues": report.config_issues,
            "cpus": num_cpus::get(),
        });
        println!("{}", serde_json::to_string_pretty(&json).unwrap_or_default());
    } else if is_quiet() {
        for check in report.blocking() {
            eprintln!("{} Missing required: {}", status::ERROR, check.name);
        }
    } else {
        print_human(&report, readiness);
    }

    if readiness == Readiness::Blocked {
        anyhow::bail!("Required build dependencies are missing");
    }
    Ok(())
}

fn print_check(check: &ToolCheck) {
    let optional = match check.requirement {
        Requirement::Required => "",
        Requirement::Optional => " [optional]",
    };
    match check.found {
        Some(ref found) => println!(
            "  {} {} ({} {}){optional}",
            status::SUCCESS,
            check.name,
            found.program,
            found.version
        ),
        None => {
            println!("  {} {}{optional}", status::ERROR, check.name);
            print_detail(&format!("  tried: {}", check.candidates.join(", ")));
        }
    }
}

fn print_human(report: &DoctorReport, readiness: Readiness) {
    print_info("Checking native build dependencies...");
    print_detail(&format!("{} CPU(s) available for compile jobs", num_cpus::get()));
    println!();

    for check in &report.checks {
        print_check(check);
    }

    if !report.config_issues.is_empty() {
        println!();
        print_warning("Configuration issues:");
        for issue in &report.config_issues {
            print_detail(&format!("• {issue}"));
        }
    }

    println!();
    let summary = format!("{}/{} checks passed", report.passed_count(), report.checks.len());
    match readiness {
        Readiness::Ready => print_success(&summary),
        Readiness::Degraded => {
            print_warning(&summary);
            for check in report.checks.iter().filter(|c| !c.passed()) {
                print_detail(&format!("• {}: {}", check.name, check.suggestion));
            }
        }
        Readiness::Blocked => {
            println!("{} {summary}", status::ERROR);
            for check in report.blocking() {
                print_detail(&format!("• {}: {}", check.name, check.suggestion));
            }
        }
    }
}
