use crate::cli::ConvertArgs;
use crate::error::Result;
use crate::operation::Operation;

pub fn handle_convert(operation: Operation, args: &ConvertArgs) -> Result<()> {
    let report = operation.run(&args.input, &args.output)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!(
            "Converted {} prompt{}: {} -> {} (version {}, {})",
            report.prompts,
            if report.prompts == 1 { "" } else { "s" },
            report.input.display(),
            report.output.display(),
            report.version,
            report.format
        );
    }

    Ok(())
}
