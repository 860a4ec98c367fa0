use crate::job::JobResult;
use std::io::{self, Write};

pub fn write<W: Write>(writer: &mut W, results: &[JobResult]) -> io::Result<()> {
    serde_json::to_writer_pretty(&mut *writer, results)?;
    writeln!(writer)?;
    writer.flush()
}
