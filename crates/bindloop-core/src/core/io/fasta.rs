use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FastaRecord {
    pub header: String,
    pub sequence: String,
}

impl FastaRecord {
    pub fn new(header: impl Into<String>, sequence: impl Into<String>) -> Self {
        Self {
            header: header.into(),
            sequence: sequence.into(),
        }
    }
}

/// Reads FASTA records; wrapped sequence lines are concatenated.
///
/// Sequence lines appearing before the first header are collected under an empty header.
pub fn read_from(reader: impl BufRead) -> io::Result<Vec<FastaRecord>> {
    let mut records: Vec<FastaRecord> = Vec::new();
    for line in reader.lines() {
        let line = line?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if let Some(header) = line.strip_prefix('>') {
            records.push(FastaRecord::new(header.trim(), ""));
        } else {
            match records.last_mut() {
                Some(record) => record.sequence.push_str(line),
                None => records.push(FastaRecord::new("", line)),
            }
        }
    }
    Ok(records)
}

pub fn read_path(path: impl AsRef<Path>) -> io::Result<Vec<FastaRecord>> {
    read_from(BufReader::new(File::open(path)?))
}

pub fn write_to(records: &[FastaRecord], writer: &mut impl Write) -> io::Result<()> {
    for record in records {
        writeln!(writer, ">{}", record.header)?;
        writeln!(writer, "{}", record.sequence)?;
    }
    Ok(())
}

pub fn write_path(records: &[FastaRecord], path: impl AsRef<Path>) -> io::Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    write_to(records, &mut writer)?;
    writer.flush()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_multiline_records() {
        let text = ">first, score=1.2\nMKV\nLLA\n\n>second\nGGS:TT\n";
        let records = read_from(text.as_bytes()).unwrap();
        assert_eq!(
            records,
            vec![
                FastaRecord::new("first, score=1.2", "MKVLLA"),
                FastaRecord::new("second", "GGS:TT"),
            ]
        );
    }

    #[test]
    fn sequence_before_header_is_kept() {
        let records = read_from("MKV\n>a\nG\n".as_bytes()).unwrap();
        assert_eq!(records[0], FastaRecord::new("", "MKV"));
        assert_eq!(records.len(), 2);
    }

    #[test]
    fn write_then_read_preserves_records() {
        let records = vec![
            FastaRecord::new("Round_1_seq_1", "AAA:BBB:CCC"),
            FastaRecord::new("Round_1_seq_2", "AAA:BBB:DDD"),
        ];
        let mut buffer = Vec::new();
        write_to(&records, &mut buffer).unwrap();
        assert_eq!(
            String::from_utf8(buffer.clone()).unwrap(),
            ">Round_1_seq_1\nAAA:BBB:CCC\n>Round_1_seq_2\nAAA:BBB:DDD\n"
        );
        assert_eq!(read_from(buffer.as_slice()).unwrap(), records);
    }
}
