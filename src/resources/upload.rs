use crate::constants::upload as upload_constants;
use crate::errors::ToolError;
use crate::resources::endpoints::EndpointSpec;
use crate::services::gateway::{ApiTransport, MultipartFile, RequestOptions};
use crate::services::logger::Logger;
use crate::services::validation::Validation;
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};

/// Fixed extension table. Unknown extensions fall back to octet-stream.
pub fn media_type_for(extension: &str) -> &'static str {
    match extension.to_lowercase().as_str() {
        "md" => "text/markdown",
        "txt" => "text/plain",
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "pdf" => "application/pdf",
        "doc" => "application/msword",
        "docx" => "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        "xls" => "application/vnd.ms-excel",
        "xlsx" => "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
        "ppt" => "application/vnd.ms-powerpoint",
        "pptx" => "application/vnd.openxmlformats-officedocument.presentationml.presentation",
        "zip" => "application/zip",
        "mp4" => "video/mp4",
        "mp3" => "audio/mpeg",
        _ => upload_constants::FALLBACK_MEDIA_TYPE,
    }
}

/// The remote's field naming for the upload id varies across deployments;
/// each location is tried in a fixed priority order and the first present
/// value wins.
pub fn extract_upload_id(envelope: &Value) -> Option<String> {
    let candidates = [
        envelope.pointer("/data/id"),
        envelope.get("id"),
        envelope.get("signed_id"),
        envelope.pointer("/data/attributes/signed_id"),
    ];
    candidates
        .into_iter()
        .flatten()
        .find_map(|value| value.as_str().map(|s| s.to_string()))
}

/// Same fallback pattern for the public URL of the stored file.
pub fn extract_upload_url(envelope: &Value) -> Option<String> {
    let candidates = [
        envelope.pointer("/data/attributes/url"),
        envelope.get("url"),
        envelope.pointer("/data/url"),
    ];
    candidates
        .into_iter()
        .flatten()
        .find_map(|value| value.as_str().map(|s| s.to_string()))
}

fn resolve_source_path(file_path: &str) -> Result<PathBuf, ToolError> {
    let candidate = Path::new(file_path);
    if candidate.is_absolute() {
        return Ok(candidate.to_path_buf());
    }
    let cwd = std::env::current_dir()
        .map_err(|err| ToolError::io(format!("Cannot resolve working directory: {}", err)))?;
    Ok(cwd.join(candidate))
}

/// Resolves the source file, infers its media type, and posts it as a
/// multipart envelope with the bracketed `data[type]` / `data[attributes][file]`
/// field names the DAM endpoint parses.
pub async fn upload(
    transport: &dyn ApiTransport,
    logger: &Logger,
    validation: &Validation,
    spec: &EndpointSpec,
    args: &Value,
) -> Result<Value, ToolError> {
    let file_path =
        validation.ensure_string(args.get("file_path").unwrap_or(&Value::Null), "file_path", true)?;
    let resource_type = validation
        .ensure_optional_string(args.get("type"), "type", true)?
        .unwrap_or_else(|| upload_constants::DEFAULT_RESOURCE_TYPE.to_string());
    let override_name = validation.ensure_optional_string(args.get("name"), "name", true)?;

    let absolute = resolve_source_path(&file_path)?;
    let metadata = match tokio::fs::metadata(&absolute).await {
        Ok(metadata) => metadata,
        Err(_) => {
            return Err(ToolError::io(format!(
                "File not found: {}",
                absolute.display()
            )))
        }
    };
    if !metadata.is_file() {
        return Err(ToolError::io(format!(
            "Path is not a file: {}",
            absolute.display()
        )));
    }

    let file_name = match override_name {
        Some(name) => name,
        None => absolute
            .file_name()
            .map(|name| name.to_string_lossy().to_string())
            .ok_or_else(|| {
                ToolError::invalid_params(format!(
                    "Cannot derive a file name from {}",
                    absolute.display()
                ))
            })?,
    };

    let bytes = tokio::fs::read(&absolute)
        .await
        .map_err(|err| ToolError::io(format!("Failed to read {}: {}", absolute.display(), err)))?;
    let size = bytes.len();

    let extension = Path::new(&file_name)
        .extension()
        .and_then(|ext| ext.to_str())
        .unwrap_or_default();
    let media_type = media_type_for(extension);

    logger.debug(
        &format!("uploading {} ({} bytes, {})", file_name, size, media_type),
        None,
    );

    let multipart = MultipartFile {
        type_name: spec
            .envelope_type
            .unwrap_or(upload_constants::DAM_FILES_TYPE)
            .to_string(),
        file_name: file_name.clone(),
        content_type: media_type.to_string(),
        bytes,
    };
    let envelope = transport
        .issue(
            spec.path,
            spec.method(),
            RequestOptions {
                multipart: Some(multipart),
                ..Default::default()
            },
        )
        .await?;

    let mut out = Map::new();
    out.insert("success".to_string(), Value::Bool(true));
    if let Some(id) = extract_upload_id(&envelope) {
        out.insert("id".to_string(), Value::String(id));
    }
    out.insert("name".to_string(), Value::String(file_name));
    out.insert("type".to_string(), Value::String(resource_type));
    out.insert("size".to_string(), Value::Number(size.into()));
    out.insert(
        "mime_type".to_string(),
        Value::String(media_type.to_string()),
    );
    if let Some(url) = extract_upload_url(&envelope) {
        out.insert("url".to_string(), Value::String(url));
    }
    out.insert("full_response".to_string(), envelope);
    Ok(Value::Object(out))
}
