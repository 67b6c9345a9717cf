use clap::ValueEnum;

/// Output GTiff compression
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum Compression {
    #[default]
    None,
    Deflate,
    Lzw,
    Zstd,
}

impl Compression {
    pub fn as_gdal_str(&self) -> &'static str {
        match self {
            Compression::None => "NONE",
            Compression::Deflate => "DEFLATE",
            Compression::Lzw => "LZW",
            Compression::Zstd => "ZSTD",
        }
    }
}

/// GTiff creation options; uncompressed output gets none so the driver defaults apply
pub fn creation_options(compression: Compression) -> Vec<String> {
    match compression {
        Compression::None => Vec::new(),
        other => vec![format!("COMPRESS={}", other.as_gdal_str())],
    }
}
