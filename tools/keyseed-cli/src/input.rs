//! Keyword input parsing

use std::io::Read;

/// Read one keyword per record
///
/// Input is plain lines or a delimited file (`;` or `,`, sniffed from the
/// first non-blank line); only the first column is kept. Quoted fields may
/// contain the delimiter. Blank records are skipped.
pub fn read_keyword_lines<R: Read>(mut reader: R) -> csv::Result<Vec<String>> {
    let mut content = String::new();
    reader.read_to_string(&mut content)?;

    let mut records = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .delimiter(sniff_delimiter(&content))
        .from_reader(content.as_bytes());

    let mut keywords = Vec::new();
    for record in records.records() {
        let record = record?;
        if let Some(first) = record.get(0).filter(|field| !field.is_empty()) {
            keywords.push(first.to_string());
        }
    }
    Ok(keywords)
}

/// `;` unless the first non-blank line only uses `,` outside quotes
fn sniff_delimiter(content: &str) -> u8 {
    let first = content.lines().find(|line| !line.trim().is_empty());
    let Some(line) = first else {
        return b';';
    };

    let mut quoted = false;
    let (mut semicolons, mut commas) = (0, 0);
    for c in line.chars() {
        match c {
            '"' => quoted = !quoted,
            ';' if !quoted => semicolons += 1,
            ',' if !quoted => commas += 1,
            _ => {}
        }
    }
    if commas > 0 && semicolons == 0 {
        b','
    } else {
        b';'
    }
}
