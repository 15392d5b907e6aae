//! Extension-driven file type inference.

use crate::domain::FileType;

/// Extensions the explorer treats as "known" when deciding whether a rename
/// deserves the unrecognized-extension advisory. Independent of the lookup
/// table used by [`infer_type`].
pub const SUPPORTED_EXTENSIONS: &[&str] = &[
    "txt", "md", "doc", "docx", "pdf", "rtf", "jpg", "jpeg", "png", "gif", "bmp", "xlsx", "xls",
    "csv", "mp3", "wav", "ogg", "m4a", "exe", "zip", "sys", "mp4", "mov", "avi", "mkv", "html",
    "css", "js", "ts", "json", "py", "java", "ppt", "pptx",
];

/// Lowercased text after the last `.`, or `None` when the name has no dot.
pub fn extension(name: &str) -> Option<String> {
    name.rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
}

/// Maps a name to its semantic type. `None` means the name carries no
/// extension at all; an extension outside the table yields `Unknown`.
pub fn infer_type(name: &str) -> Option<FileType> {
    let ext = extension(name)?;
    let file_type = match ext.as_str() {
        "jpg" | "jpeg" | "png" | "gif" | "bmp" => FileType::Image,
        "txt" | "md" | "doc" | "docx" | "rtf" => FileType::Text,
        "pdf" => FileType::Pdf,
        "mp4" | "mov" | "avi" | "mkv" => FileType::Video,
        "html" | "css" | "js" | "ts" | "json" | "py" | "java" => FileType::Code,
        "ppt" | "pptx" => FileType::Presentation,
        "xlsx" | "xls" | "csv" => FileType::Spreadsheet,
        "mp3" | "wav" | "ogg" | "m4a" => FileType::Audio,
        "exe" | "msi" | "app" | "bat" | "sh" => FileType::App,
        "zip" | "rar" | "7z" | "tar" | "gz" => FileType::Archive,
        "sys" | "dll" | "ini" | "cfg" => FileType::System,
        _ => FileType::Unknown,
    };
    Some(file_type)
}

/// Type a non-folder node takes after being named `name`.
pub fn resolve_file_type(name: &str) -> FileType {
    infer_type(name).unwrap_or(FileType::Unknown)
}

pub fn is_supported_extension(ext: &str) -> bool {
    SUPPORTED_EXTENSIONS
        .iter()
        .any(|supported| supported.eq_ignore_ascii_case(ext))
}

/// The extension of `name` when it is non-empty and not on the supported list.
pub fn unrecognized_extension(name: &str) -> Option<String> {
    extension(name).filter(|ext| !ext.is_empty() && !is_supported_extension(ext))
}
