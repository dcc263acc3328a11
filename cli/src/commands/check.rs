use anyhow::Result;
use authz::types::Decision;
use colored::*;
use serde_json::json;

/// Evaluate one decision with structural containment and print it
pub fn execute(role: &str, action: &str, resource: &str, caller: &str, format: &str) -> Result<()> {
    let decision = authz::evaluate_str(role, action, resource, caller)?;

    match format {
        "json" => {
            let mut output = json!({
                "role": role,
                "action": action,
                "resource": resource,
                "caller": caller,
            });
            if let (Some(fields), serde_json::Value::Object(decision)) =
                (output.as_object_mut(), serde_json::to_value(decision)?)
            {
                fields.extend(decision);
            }
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        _ => print_decision_text(role, action, resource, caller, decision),
    }

    Ok(())
}

fn print_decision_text(role: &str, action: &str, resource: &str, caller: &str, decision: Decision) {
    println!(
        "{} {} {} on {} as {}",
        "Request:".bold(),
        role,
        action,
        resource,
        caller
    );

    let rendered = decision.to_string();
    let rendered = match decision {
        Decision::Allow => rendered.green().bold(),
        Decision::Deny(_) => rendered.red().bold(),
    };
    println!("{} {}", "Decision:".bold(), rendered);
}
