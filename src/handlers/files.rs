// src/handlers/files.rs

use axum::{
    extract::{Multipart, Query, State},
    http::{header, HeaderName, StatusCode},
    response::IntoResponse,
};
use mime_guess::mime;
use serde::Deserialize;
use utoipa::IntoParams;

use crate::{
    common::error::{invalid_field, ApiError, AppError},
    config::AppState,
    middleware::i18n::Locale,
};

/// Primeiro campo `file` do formulário: (nome original, bytes).
pub(crate) async fn read_upload(multipart: &mut Multipart) -> Result<(String, Vec<u8>), AppError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|_| invalid_field("file", "validation.required"))?
    {
        if field.name() != Some("file") {
            continue;
        }
        let filename = field.file_name().unwrap_or("file").to_string();
        let bytes = field
            .bytes()
            .await
            .map_err(|_| invalid_field("file", "validation.required"))?;
        if bytes.is_empty() {
            break;
        }
        return Ok((filename, bytes.to_vec()));
    }
    Err(invalid_field("file", "validation.required"))
}

/// Imagens (exceto SVG) e PDF podem abrir no navegador; o resto vira download.
fn is_inline_safe(content_type: &mime::Mime) -> bool {
    (content_type.type_() == mime::IMAGE && content_type.subtype() != mime::SVG)
        || *content_type == mime::APPLICATION_PDF
}

/// Nome de download: último segmento do caminho, sem o prefixo de timestamp.
fn download_name(path: &str) -> String {
    let name = path.rsplit('/').next().unwrap_or(path);
    let name = match name.split_once('_') {
        Some((stamp, rest)) if !rest.is_empty() && stamp.chars().all(|c| c.is_ascii_digit()) => rest,
        _ => name,
    };
    name.chars()
        .map(|c| if c.is_ascii_graphic() && c != '"' && c != '\\' { c } else { '_' })
        .collect()
}

fn download_headers(path: &str) -> [(HeaderName, String); 3] {
    let content_type = mime_guess::from_path(path).first_or_octet_stream();
    let disposition = if is_inline_safe(&content_type) { "inline" } else { "attachment" };
    [
        (header::CONTENT_TYPE, content_type.essence_str().to_string()),
        (
            header::CONTENT_DISPOSITION,
            format!("{}; filename=\"{}\"", disposition, download_name(path)),
        ),
        (header::X_CONTENT_TYPE_OPTIONS, "nosniff".to_string()),
    ]
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct FileQuery {
    /// Token da URL assinada
    pub token: String,
}

// GET /api/files?token= (público: o token é a autorização)
#[utoipa::path(
    get,
    path = "/api/files",
    tag = "Files",
    params(FileQuery),
    responses(
        (status = 200, description = "Conteúdo do arquivo"),
        (status = 401, description = "Token expirado ou inválido"),
        (status = 404, description = "Arquivo não encontrado")
    )
)]
pub async fn download_file(
    State(app_state): State<AppState>,
    locale: Locale,
    Query(query): Query<FileQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let path = app_state
        .storage
        .verify_token(&query.token)
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    let bytes = app_state
        .storage
        .read(&path)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, download_headers(&path), bytes))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn header_value(headers: &[(HeaderName, String); 3], name: HeaderName) -> &str {
        headers
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, v)| v.as_str())
            .unwrap()
    }

    #[test]
    fn html_uploads_are_forced_to_download() {
        let headers = download_headers("incidents/h1/1700000000123_evil.html");

        assert_eq!(header_value(&headers, header::CONTENT_TYPE), "text/html");
        assert_eq!(
            header_value(&headers, header::CONTENT_DISPOSITION),
            "attachment; filename=\"evil.html\""
        );
        assert_eq!(header_value(&headers, header::X_CONTENT_TYPE_OPTIONS), "nosniff");
    }

    #[test]
    fn images_and_pdf_open_inline_but_svg_does_not() {
        let photo = download_headers("lost-items/h1/1700000000123_mala.jpg");
        assert!(header_value(&photo, header::CONTENT_DISPOSITION).starts_with("inline;"));

        let report = download_headers("incidents/h1/1700000000123_laudo.pdf");
        assert!(header_value(&report, header::CONTENT_DISPOSITION).starts_with("inline;"));

        let drawing = download_headers("incidents/h1/1700000000123_planta.svg");
        assert!(header_value(&drawing, header::CONTENT_DISPOSITION).starts_with("attachment;"));
        assert_eq!(header_value(&drawing, header::X_CONTENT_TYPE_OPTIONS), "nosniff");
    }

    #[test]
    fn download_name_cannot_break_the_header() {
        assert_eq!(download_name("incidents/h1/1700000000123_a\"b c.txt"), "a_b_c.txt");
        assert_eq!(download_name("incidents/h1/notes_2026.txt"), "notes_2026.txt");
    }
}
