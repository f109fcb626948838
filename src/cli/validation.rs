use crate::cli::args::CliArgs;

pub fn validate(args: &CliArgs) -> Result<(), String> {
    if let Some(timeout) = args.timeout {
        if timeout == 0 {
            return Err("invalid timeout, expected positive integer".to_string());
        }
    }
    if let Some(validity) = args.link_validity {
        if validity <= 0 {
            return Err("invalid link-validity, expected positive integer".to_string());
        }
    }
    if let Some(raw) = args.output_format.as_deref() {
        if crate::output::OutputFormat::parse(raw).is_none() {
            return Err(format!("invalid --format '{raw}', expected html or json"));
        }
    }
    let lists = [
        ("--ai-type", &args.ai_type),
        ("--business-line", &args.business_line),
        ("--function", &args.function),
    ];
    for (flag, values) in lists {
        crate::utils::parse_criteria_values(values)
            .map_err(|e| format!("invalid {flag}: {e}"))?;
    }
    Ok(())
}
