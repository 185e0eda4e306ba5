//! `jobroute catalog` command - departments, operations and templates in effect

use console::style;
use miette::{IntoDiagnostic, Result};

use crate::cli::helpers::Workspace;
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::catalog::{Department, ProcessCatalog};

#[derive(clap::Args, Debug)]
pub struct CatalogArgs {
    /// Only list templates
    #[arg(long, conflicts_with = "departments")]
    pub templates: bool,

    /// Only list departments and operations
    #[arg(long)]
    pub departments: bool,
}

pub fn run(args: CatalogArgs, global: &GlobalOpts) -> Result<()> {
    let ws = Workspace::open(global)?;
    let catalog = ws.catalog()?;

    match ws.format(global) {
        OutputFormat::Json => {
            let value = to_json(&catalog)?;
            println!("{}", serde_json::to_string_pretty(&value).into_diagnostic()?);
        }
        OutputFormat::Yaml => {
            print!("{}", serde_yml::to_string(&to_json(&catalog)?).into_diagnostic()?);
        }
        _ => {
            if !args.templates {
                print_departments(&catalog);
            }
            if !args.departments {
                if !args.templates {
                    println!();
                }
                print_templates(&catalog)?;
            }
        }
    }
    Ok(())
}

fn to_json(catalog: &ProcessCatalog) -> Result<serde_json::Value> {
    let departments: Vec<serde_json::Value> = Department::ALL
        .iter()
        .map(|d| {
            serde_json::json!({
                "key": d.key(),
                "name": d.to_string(),
                "operations": catalog.operations(*d),
            })
        })
        .collect();

    let templates = catalog
        .templates()
        .iter()
        .map(|t| -> Result<serde_json::Value> {
            let steps: Vec<serde_json::Value> = catalog
                .resolve_template(t)?
                .into_iter()
                .map(|s| {
                    serde_json::json!({
                        "department": s.department.key(),
                        "operation": s.operation,
                        "hours": s.hours,
                    })
                })
                .collect();
            Ok(serde_json::json!({
                "name": t.name,
                "description": t.description,
                "steps": steps,
            }))
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(serde_json::json!({ "departments": departments, "templates": templates }))
}

fn print_departments(catalog: &ProcessCatalog) {
    println!("{}", style("Departments").bold());
    for (i, department) in Department::ALL.iter().enumerate() {
        println!(
            "  {}. {} {}",
            i + 1,
            style(department).yellow(),
            style(format!("({})", department.key())).dim()
        );
        for (j, operation) in catalog.operations(*department).iter().enumerate() {
            println!("       {}. {}", j + 1, operation);
        }
    }
}

fn print_templates(catalog: &ProcessCatalog) -> Result<()> {
    println!("{}", style("Templates").bold());
    for template in catalog.templates() {
        let steps = catalog.resolve_template(template)?;
        let hours: f64 = steps.iter().map(|s| s.hours).sum();
        println!(
            "  {} {} step(s), {:.1} h",
            style(&template.name).cyan(),
            steps.len(),
            hours
        );
        if let Some(description) = &template.description {
            println!("    {}", style(description).dim());
        }
        for step in &steps {
            println!(
                "    {:<18} {:<20} {:>5.1} h",
                step.department.to_string(),
                step.operation,
                step.hours
            );
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_json_lists_reference_data() {
        let value = to_json(&ProcessCatalog::reference()).unwrap();
        assert_eq!(value["departments"][1]["key"], "machining");
        assert_eq!(value["departments"][1]["operations"][1], "5-axis mill");
        assert_eq!(value["templates"][0]["name"], "standard");
        assert_eq!(value["templates"][0]["steps"][1]["operation"], "Programming");
        assert_eq!(value["templates"][0]["steps"][3]["operation"], "Black Oxyde");
    }
}
