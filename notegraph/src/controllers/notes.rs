//! Notes REST API.
//!
//! JSON endpoints expose the parsed cache and note content; the `/api/raw`
//! endpoints return the same plain-text rows as the CLI, with query
//! parameters mirroring the CLI options.

use actix_web::{web, HttpResponse, Responder};
use serde::{Deserialize, Serialize};

use crate::notes::error::NoteError;
use crate::notes::file_ops;
use crate::notes::parser::Note;
use crate::notes::query::{
    self, LinkDirection, ListOptions, NoteFilter, Row, SortOrder, TitlePrefix,
};
use crate::AppState;

#[derive(Debug, Serialize)]
struct NoteResponse {
    #[serde(flatten)]
    note: Note,
    #[serde(rename = "Path")]
    path: String,
    #[serde(rename = "Content")]
    content: String,
}

#[derive(Debug, Deserialize)]
struct NotePost {
    #[serde(rename = "Content", default)]
    content: String,
}

fn error_response(err: &NoteError) -> HttpResponse {
    let body = serde_json::json!({ "error": err.to_string() });
    match err {
        NoteError::NotFound(_) => HttpResponse::NotFound().json(body),
        NoteError::EmptyContent => HttpResponse::BadRequest().json(body),
        NoteError::ReadOnly => HttpResponse::Forbidden().json(body),
        NoteError::Io(_) | NoteError::InvalidFilename(_) => {
            log::error!("request failed: {}", err);
            HttpResponse::InternalServerError().json(body)
        }
    }
}

fn bad_request(message: &str) -> HttpResponse {
    HttpResponse::BadRequest().json(serde_json::json!({ "error": message }))
}

fn plain_rows(rows: Vec<Row>) -> HttpResponse {
    let mut body = rows
        .iter()
        .map(|r| r.to_string())
        .collect::<Vec<_>>()
        .join("\n");
    if !body.is_empty() {
        body.push('\n');
    }
    HttpResponse::Ok()
        .content_type("text/plain; charset=utf-8")
        .body(body)
}

fn note_response(state: &AppState, filename: &str) -> Result<NoteResponse, NoteError> {
    let snapshot = state.cache.snapshot();
    let note = snapshot
        .get(filename)
        .cloned()
        .ok_or_else(|| NoteError::NotFound(filename.to_string()))?;

    let path = state.cache.notes_dir().join(filename);
    let content = file_ops::read_note(&path)?;

    Ok(NoteResponse {
        note,
        path: path.to_string_lossy().to_string(),
        content,
    })
}

/// Full cache keyed by filename
async fn list_notes(state: web::Data<AppState>) -> impl Responder {
    let snapshot = state.cache.snapshot();
    HttpResponse::Ok().json(&*snapshot)
}

async fn get_note(state: web::Data<AppState>, path: web::Path<String>) -> impl Responder {
    let filename = path.into_inner();
    match note_response(&state, &filename) {
        Ok(resp) => HttpResponse::Ok().json(resp),
        Err(e) => error_response(&e),
    }
}

/// Overwrite a note's content and rebuild the cache, so the response and
/// all subsequent reads see the new link structure.
async fn update_note(
    state: web::Data<AppState>,
    path: web::Path<String>,
    body: web::Json<NotePost>,
) -> impl Responder {
    let filename = path.into_inner();
    if let Err(e) = state.cache.update_content(&filename, &body.content) {
        return error_response(&e);
    }
    match note_response(&state, &filename) {
        Ok(resp) => HttpResponse::Ok().json(resp),
        Err(e) => error_response(&e),
    }
}

// --- Raw (CLI-formatted) queries ---

#[derive(Debug, Deserialize)]
struct RawListQuery {
    labels: Option<bool>,
    orphans: Option<bool>,
    sort: Option<String>,
    prefix: Option<String>,
}

async fn raw_list(
    state: web::Data<AppState>,
    params: web::Query<RawListQuery>,
) -> impl Responder {
    let params = params.into_inner();

    let labels = params.labels.unwrap_or(false);
    let orphans = params.orphans.unwrap_or(false);
    if labels && orphans {
        return bad_request("labels and orphans are mutually exclusive");
    }

    let sort = match params.sort.as_deref() {
        None | Some("") => SortOrder::None,
        Some("ctime") => SortOrder::Ctime,
        Some("mtime") => SortOrder::Mtime,
        Some("alpha") => SortOrder::Title,
        Some(other) => return bad_request(&format!("unrecognized sort: {}", other)),
    };
    let prefix = match params.prefix.as_deref() {
        None | Some("") => TitlePrefix::None,
        Some("ctime") => TitlePrefix::Ctime,
        Some("mtime") => TitlePrefix::Mtime,
        Some("label") => TitlePrefix::Label,
        Some(other) => return bad_request(&format!("unrecognized prefix: {}", other)),
    };
    let opts = ListOptions {
        sort,
        filter: if labels {
            NoteFilter::Labels
        } else if orphans {
            NoteFilter::Orphans
        } else {
            NoteFilter::None
        },
        prefix,
    };

    let snapshot = state.cache.snapshot();
    plain_rows(query::list(&snapshot, &opts))
}

#[derive(Debug, Deserialize)]
struct RawLinksQuery {
    filename: Option<String>,
    outgoing: Option<bool>,
    incoming: Option<bool>,
    dangling: Option<bool>,
}

async fn raw_links(
    state: web::Data<AppState>,
    params: web::Query<RawLinksQuery>,
) -> impl Responder {
    let params = params.into_inner();

    let outgoing = params.outgoing.unwrap_or(false);
    let incoming = params.incoming.unwrap_or(false);
    let dangling = params.dangling.unwrap_or(false);

    if outgoing && incoming {
        return bad_request("outgoing and incoming are mutually exclusive");
    }
    if dangling && (outgoing || incoming || params.filename.is_some()) {
        return bad_request("dangling cannot be combined with a filename or direction");
    }
    if (outgoing || incoming) && params.filename.is_none() {
        return bad_request("filename not specified");
    }

    let snapshot = state.cache.snapshot();
    let rows = if let Some(filename) = &params.filename {
        let direction = if outgoing {
            LinkDirection::Outgoing
        } else if incoming {
            LinkDirection::Incoming
        } else {
            LinkDirection::Both
        };
        match query::links_for(&snapshot, filename, direction) {
            Ok(rows) => rows,
            Err(e) => return error_response(&e),
        }
    } else if dangling {
        query::dangling_links(&snapshot)
    } else {
        query::all_links(&snapshot)
    };

    plain_rows(rows)
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/notes")
            .route("", web::get().to(list_notes))
            .route("/{filename}", web::get().to(get_note))
            .route("/{filename}", web::post().to(update_note)),
    );
    cfg.service(
        web::scope("/api/raw")
            .route("/list", web::get().to(raw_list))
            .route("/links", web::get().to(raw_links)),
    );
}
