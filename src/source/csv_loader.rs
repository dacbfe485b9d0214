use crate::error::PipelineError;
use crate::models::RawTable;
use csv::ReaderBuilder;
use std::fs;
use std::path::Path;

const UTF8_BOM: &[u8] = b"\xef\xbb\xbf";

/// 根据表头行猜测分隔符 (';' 或 ',')
fn sniff_delimiter(content: &[u8]) -> u8 {
    let header = content.split(|&b| b == b'\n').next().unwrap_or_default();
    let count = |sep: u8| header.iter().filter(|&&b| b == sep).count();
    if count(b';') > count(b',') {
        b';'
    } else {
        b','
    }
}

/// 单元格解码：优先 UTF-8，否则按 Latin-1 (Excel 导出的 Windows-1252 报表)
fn decode_cell(bytes: &[u8]) -> String {
    match std::str::from_utf8(bytes) {
        Ok(text) => text.to_string(),
        Err(_) => bytes.iter().map(|&b| b as char).collect(),
    }
}

/// 从 CSV 字节读取原始表；编码按单元格处理，不因个别字节失败整批
pub fn read_table_bytes(content: &[u8]) -> Result<RawTable, PipelineError> {
    let content = content.strip_prefix(UTF8_BOM).unwrap_or(content);
    let mut reader = ReaderBuilder::new()
        .delimiter(sniff_delimiter(content))
        .flexible(true)
        .from_reader(content);

    let headers: Vec<String> = reader
        .byte_headers()?
        .iter()
        .map(|h| decode_cell(h).trim().to_string())
        .collect();

    let mut rows = Vec::new();
    for record in reader.byte_records() {
        let record = record?;
        rows.push(record.iter().map(decode_cell).collect());
    }

    Ok(RawTable::new(headers, rows))
}

/// 从 CSV 文本读取原始表
pub fn read_table(content: &str) -> Result<RawTable, PipelineError> {
    read_table_bytes(content.as_bytes())
}

/// 从本地文件读取原始表
pub fn load_table(path: &Path) -> Result<RawTable, PipelineError> {
    let start = std::time::Instant::now();
    let content = fs::read(path)?;
    let table = read_table_bytes(&content)?;
    tracing::info!(
        "Loaded {} rows x {} columns from {} in {:?}",
        table.len(),
        table.headers.len(),
        path.display(),
        start.elapsed()
    );
    Ok(table)
}
