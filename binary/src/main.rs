use std::{process::ExitCode, time::Instant};

use xes_convert::{
    convert::{ColumnMapping, ConvertOptions},
    convert_csv_to_log,
    event_log::{constants::ACTIVITY_NAME, EventLogClassifier},
    export_xes_event_log_to_file_path,
};

fn main() -> ExitCode {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let (input, output, case_col, activity_col, ts_col) = match args.as_slice() {
        [input, output, case_col, activity_col, ts_col, ..] => {
            (input, output, case_col, activity_col, ts_col)
        }
        _ => {
            eprintln!(
                "Usage: binary <input.csv> <output.xes[.gz]> <case-column> <activity-column> <timestamp-column> [delimiter]"
            );
            return ExitCode::FAILURE;
        }
    };
    let delimiter = args.get(5).and_then(|d| d.bytes().next()).unwrap_or(b',');

    let data = match std::fs::read(input) {
        Ok(data) => data,
        Err(e) => {
            eprintln!("Could not read {input}: {e}");
            return ExitCode::FAILURE;
        }
    };

    let mapping = ColumnMapping::new(case_col, activity_col, ts_col);
    let options = ConvertOptions {
        delimiter,
        classifiers: vec![EventLogClassifier::new("Event Name", vec![ACTIVITY_NAME])],
        ..ConvertOptions::default()
    };

    let now = Instant::now();
    let log = match convert_csv_to_log(&data, &mapping, &options) {
        Ok(log) => log,
        Err(e) => {
            eprintln!("Conversion failed: {e}");
            return ExitCode::FAILURE;
        }
    };
    println!(
        "Converted {} cases ({} events) in {:#?}",
        log.traces.len(),
        log.traces.iter().map(|t| t.events.len()).sum::<usize>(),
        now.elapsed()
    );

    if let Err(e) = export_xes_event_log_to_file_path(&log, output) {
        eprintln!("Could not write {output}: {e}");
        return ExitCode::FAILURE;
    }
    println!("Wrote {output}");
    ExitCode::SUCCESS
}
