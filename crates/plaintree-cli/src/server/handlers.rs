//! Request handling
//!
//! One entry point per route plus `respond`, which drives a request from
//! raw path to response: decode, split revision from sub-path, resolve the
//! revision to a root hash, run the single-pass walk, emit.

use axum::{body::Body, extract::State, http::Response};
use axum::http::Uri;
use percent_encoding::percent_decode_str;
use plaintree::{resolve, PathTarget, Resolved, WalkError};

use super::emit;
use super::mime::content_type_for;
use super::AppState;

pub async fn serve_root(State(state): State<AppState>) -> Response<Body> {
    refs_page(&state)
}

pub async fn serve_path(State(state): State<AppState>, uri: Uri) -> Response<Body> {
    respond(&state, uri.path()).await
}

fn refs_page(state: &AppState) -> Response<Body> {
    let branches = match state.refs.branches() {
        Ok(refs) => refs,
        Err(e) => {
            tracing::error!("Failed to list branches: {}", e);
            return emit::internal_error();
        }
    };
    let tags = match state.refs.tags() {
        Ok(refs) => refs,
        Err(e) => {
            tracing::error!("Failed to list tags: {}", e);
            return emit::internal_error();
        }
    };
    emit::refs_response(&branches, &tags)
}

/// Handle one request path and produce the full response
pub async fn respond(state: &AppState, raw_path: &str) -> Response<Body> {
    let decoded = match percent_decode_str(raw_path).decode_utf8() {
        Ok(path) => path.into_owned(),
        Err(_) => return emit::bad_request("Invalid path encoding"),
    };

    let had_trailing_slash = decoded.ends_with('/');
    let trimmed = decoded.trim_matches('/');

    let Some(target) = PathTarget::parse(trimmed) else {
        return refs_page(state);
    };

    let root = match state.refs.resolve(&target.revision) {
        Ok(Some(hash)) => hash,
        Ok(None) => {
            tracing::debug!("Unknown revision: {}", target.revision);
            return emit::not_found();
        }
        Err(e) => {
            tracing::error!("Failed to resolve revision {}: {}", target.revision, e);
            return emit::internal_error();
        }
    };

    match resolve(&state.store, &root, &target.target).await {
        Ok(Resolved::File { name, hash, .. }) => {
            let data = match state.store.get(&hash).await {
                Ok(Some(data)) => data,
                Ok(None) => {
                    tracing::warn!("Dangling file link for {}: {}", decoded, plaintree::to_hex(&hash));
                    return emit::not_found();
                }
                Err(e) => {
                    tracing::error!("Store error serving {}: {}", decoded, e);
                    return emit::internal_error();
                }
            };
            let content_type = content_type_for(&state.mime_types, &name, &data);
            emit::file_response(&content_type, &hash, data)
        }
        Ok(Resolved::Directory { path, hash, entries }) => {
            if !had_trailing_slash && state.ensure_trailing_slash {
                return emit::redirect_with_slash(&decoded);
            }
            emit::listing_response(&path, &hash, &entries)
        }
        Ok(Resolved::NotFound) => {
            tracing::debug!("Not found: {}", decoded);
            emit::not_found()
        }
        Err(WalkError::MissingObject(hash)) => {
            tracing::warn!("Missing object resolving {}: {}", decoded, hash);
            emit::not_found()
        }
        Err(e) => {
            tracing::error!("Walk failed for {}: {}", decoded, e);
            emit::internal_error()
        }
    }
}
