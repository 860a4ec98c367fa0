use crate::job::JobResult;
use std::io::{self, Write};

pub const HEADER: &str = "file,name,kind,status,points,peak_at,peak_value,energy,elapsed_ms,error";

pub fn write<W: Write>(writer: &mut W, results: &[JobResult]) -> io::Result<()> {
    writeln!(writer, "{}", HEADER)?;

    for r in results {
        let (peak_at, peak_value) = match r.peak {
            Some(peak) => (peak.at.to_string(), peak.value.to_string()),
            None => (String::new(), String::new()),
        };
        let energy = r.energy.map(|e| e.to_string()).unwrap_or_default();

        writeln!(
            writer,
            "{},{},{},{},{},{},{},{},{},{}",
            escape(&r.file_path),
            escape(&r.name),
            r.kind,
            r.status,
            r.points,
            peak_at,
            peak_value,
            energy,
            r.elapsed_ms,
            escape(r.error.as_deref().unwrap_or("")),
        )?;
    }

    writer.flush()
}

/// Quote a field when it holds a comma, quote or line break.
fn escape(field: &str) -> String {
    if field.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}
