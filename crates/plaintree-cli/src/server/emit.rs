//! HTTP response construction
//!
//! Builds the three terminal responses of a resolved request (file bytes,
//! directory listing, 404) plus the trailing-slash redirect and the
//! revision index page shown at "/".

use axum::{
    body::Body,
    http::{header, Response, StatusCode},
};
use plaintree::{to_hex, Hash, ListingEntry};

use super::html::{escape_html, escape_url_path};

fn page(title: &str, body: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html>\n<head><title>{}</title></head>\n<body>\n<h1>{}</h1>\n{}</body>\n</html>\n",
        title, title, body
    )
}

pub fn not_found() -> Response<Body> {
    Response::builder()
        .status(StatusCode::NOT_FOUND)
        .header(header::CONTENT_TYPE, "text/html")
        .body(Body::from(page("Not found", "<p>Not found</p>\n")))
        .unwrap()
}

pub fn bad_request(msg: &str) -> Response<Body> {
    Response::builder()
        .status(StatusCode::BAD_REQUEST)
        .header(header::CONTENT_TYPE, "text/html")
        .body(Body::from(page(
            "Bad request",
            &format!("<p>{}</p>\n", escape_html(msg)),
        )))
        .unwrap()
}

pub fn internal_error() -> Response<Body> {
    Response::builder()
        .status(StatusCode::INTERNAL_SERVER_ERROR)
        .header(header::CONTENT_TYPE, "text/html")
        .body(Body::from(page("Error", "<p>Internal error</p>\n")))
        .unwrap()
}

/// 301 to the slash-terminated form of the same path, so relative links
/// inside the listing resolve against the directory itself
pub fn redirect_with_slash(raw_path: &str) -> Response<Body> {
    let location = format!("{}/", escape_url_path(raw_path));
    Response::builder()
        .status(StatusCode::MOVED_PERMANENTLY)
        .header(header::LOCATION, location)
        .body(Body::empty())
        .unwrap()
}

/// Serve file content. The ETag is the content hash itself: the address
/// never changes meaning, so the validator is exact.
pub fn file_response(content_type: &str, hash: &Hash, data: Vec<u8>) -> Response<Body> {
    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, content_type)
        .header(header::CONTENT_LENGTH, data.len())
        .header(header::ETAG, to_hex(hash))
        .body(Body::from(data))
        .unwrap()
}

/// Directory listing for the tree at `sub_path` ("" for the revision root).
/// Entries arrive in walk order; directories get a trailing '/' so the
/// relative href lands back on a slash-terminated URL.
pub fn listing_response(sub_path: &str, hash: &Hash, entries: &[ListingEntry]) -> Response<Body> {
    let title = if sub_path.is_empty() {
        "/".to_string()
    } else {
        format!("/{}/", sub_path)
    };

    let mut body = String::from("<ul>\n");
    if !sub_path.is_empty() {
        body.push_str("<li><a href=\"../\">../</a></li>\n");
    }
    for entry in entries {
        let display = if entry.mode.is_dir() {
            format!("{}/", entry.name)
        } else {
            entry.name.clone()
        };
        body.push_str(&format!(
            "<li><a href=\"{}\">{}</a></li>\n",
            escape_url_path(&display),
            escape_html(&display)
        ));
    }
    body.push_str("</ul>\n");

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, "text/html")
        .header(header::ETAG, to_hex(hash))
        .body(Body::from(page(&escape_html(&title), &body)))
        .unwrap()
}

/// Index page at "/": every branch and tag, linking into its tree
pub fn refs_response(
    branches: &[(String, Hash)],
    tags: &[(String, Hash)],
) -> Response<Body> {
    let mut body = String::new();

    let mut section = |heading: &str, refs: &[(String, Hash)]| {
        if refs.is_empty() {
            return;
        }
        body.push_str(&format!("<h2>{}</h2>\n<ul>\n", heading));
        for (name, hash) in refs {
            body.push_str(&format!(
                "<li><a href=\"/{}/\">{}</a> <code>{}</code></li>\n",
                escape_url_path(name),
                escape_html(name),
                to_hex(hash)
            ));
        }
        body.push_str("</ul>\n");
    };
    section("Branches", branches);
    section("Tags", tags);

    if body.is_empty() {
        body.push_str("<p>No refs</p>\n");
    }

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, "text/html")
        .body(Body::from(page("Refs", &body)))
        .unwrap()
}

#[cfg(test)]
mod tests {
    use super::*;
    use plaintree::EntryMode;

    async fn body_string(response: Response<Body>) -> String {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[test]
    fn test_redirect_location() {
        let response = redirect_with_slash("/main/docs");
        assert_eq!(response.status(), StatusCode::MOVED_PERMANENTLY);
        assert_eq!(
            response.headers().get(header::LOCATION).unwrap(),
            "/main/docs/"
        );
    }

    #[test]
    fn test_redirect_escapes_location() {
        let response = redirect_with_slash("/main/my docs");
        assert_eq!(
            response.headers().get(header::LOCATION).unwrap(),
            "/main/my%20docs/"
        );
    }

    #[tokio::test]
    async fn test_file_response_headers() {
        let hash = [1u8; 32];
        let response = file_response("text/plain", &hash, b"hello".to_vec());

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers().get(header::CONTENT_TYPE).unwrap(),
            "text/plain"
        );
        assert_eq!(response.headers().get(header::CONTENT_LENGTH).unwrap(), "5");
        assert_eq!(
            response.headers().get(header::ETAG).unwrap(),
            &to_hex(&hash)
        );
        assert_eq!(body_string(response).await, "hello");
    }

    #[tokio::test]
    async fn test_listing_has_parent_link_and_dir_slash() {
        let entries = vec![
            ListingEntry {
                name: "img".to_string(),
                mode: EntryMode::Directory,
            },
            ListingEntry {
                name: "readme.txt".to_string(),
                mode: EntryMode::Regular,
            },
        ];
        let body = body_string(listing_response("docs", &[2u8; 32], &entries)).await;

        assert!(body.contains("<title>/docs/</title>"));
        assert!(body.contains("<a href=\"../\">../</a>"));
        assert!(body.contains("<a href=\"img/\">img/</a>"));
        assert!(body.contains("<a href=\"readme.txt\">readme.txt</a>"));
    }

    #[tokio::test]
    async fn test_root_listing_has_no_parent_link() {
        let body = body_string(listing_response("", &[2u8; 32], &[])).await;
        assert!(body.contains("<title>/</title>"));
        assert!(!body.contains("../"));
    }

    #[tokio::test]
    async fn test_listing_escapes_names() {
        let entries = vec![ListingEntry {
            name: "a<b>.txt".to_string(),
            mode: EntryMode::Regular,
        }];
        let body = body_string(listing_response("docs", &[2u8; 32], &entries)).await;
        assert!(body.contains("a&lt;b&gt;.txt"));
        assert!(!body.contains("<b>.txt"));
    }

    #[tokio::test]
    async fn test_refs_page() {
        let branches = vec![("main".to_string(), [3u8; 32])];
        let tags = vec![("v1.0".to_string(), [4u8; 32])];
        let body = body_string(refs_response(&branches, &tags)).await;

        assert!(body.contains("<h2>Branches</h2>"));
        assert!(body.contains("<a href=\"/main/\">main</a>"));
        assert!(body.contains("<h2>Tags</h2>"));
        assert!(body.contains("v1.0"));
    }

    #[tokio::test]
    async fn test_refs_page_empty() {
        let body = body_string(refs_response(&[], &[])).await;
        assert!(body.contains("No refs"));
    }

    #[tokio::test]
    async fn test_not_found() {
        let response = not_found();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
