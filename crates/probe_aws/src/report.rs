use probe_core::FlowReport;

/// Prints the human-readable outcome of one pass to stdout. Diagnostics go
/// to the tracing/stderr stream; this is the confirmation the user reads.
pub fn print_report(report: &FlowReport) {
    if report.provisioned.already_existed() {
        println!("{} already exists", report.resource);
    } else {
        println!("{} created", report.resource);
    }

    match &report.read_error {
        Some(error) => println!("records unavailable: {error}"),
        None => {
            println!("records ({}):", report.records.len());
            for record in &report.records {
                println!("* {record}");
            }
        }
    }
}
