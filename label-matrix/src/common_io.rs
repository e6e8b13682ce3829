use flate2::read::GzDecoder;
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

/// Open a buffered reader over a plain or gzipped text file
pub fn open_buf_reader(input_file: &str) -> anyhow::Result<Box<dyn BufRead>> {
    let ext = file_ext(input_file).unwrap_or_default();
    let file = File::open(input_file)?;

    if ext.as_ref() == "gz" {
        let decoder = GzDecoder::new(file);
        Ok(Box::new(BufReader::new(decoder)))
    } else {
        Ok(Box::new(BufReader::new(file)))
    }
}

/// Read every line of the input file into memory
///
/// * `input_file` - file name, either gzipped or not
pub fn read_lines(input_file: &str) -> anyhow::Result<Vec<Box<str>>> {
    let buf = open_buf_reader(input_file)?;
    let mut lines = vec![];
    for x in buf.lines() {
        lines.push(x?.into_boxed_str());
    }
    Ok(lines)
}

/// Write every line into the output file
///
/// * `lines` - vector of lines
/// * `output_file` - output file name
pub fn write_lines(lines: &[Box<str>], output_file: &str) -> anyhow::Result<()> {
    let mut buf = BufWriter::new(File::create(output_file)?);
    for line in lines {
        buf.write_all(line.as_bytes())?;
        buf.write_all(b"\n")?;
    }
    buf.flush()?;
    Ok(())
}

/// Take the base name of a file path, stripping directories and extension
pub fn basename(file_path: &str) -> anyhow::Result<Box<str>> {
    Path::new(file_path)
        .file_stem()
        .and_then(|x| x.to_str())
        .map(Box::from)
        .ok_or(anyhow::anyhow!("failed to parse the file name: {}", file_path))
}

/// Take the extension of a file path if there is one
pub fn file_ext(file_path: &str) -> Option<Box<str>> {
    Path::new(file_path)
        .extension()
        .and_then(|x| x.to_str())
        .map(Box::from)
}

/// Create the parent directory of an output path if it does not exist
pub fn ensure_parent_dir(file_path: &str) -> anyhow::Result<()> {
    if let Some(parent) = Path::new(file_path).parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}
