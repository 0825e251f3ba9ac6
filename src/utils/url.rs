use axum::http::{header, HeaderMap, Uri};

/// `scheme://host` of the incoming request, or the configured override.
pub fn request_base_url(headers: &HeaderMap, uri: &Uri, configured: Option<&str>) -> String {
    if let Some(base) = configured {
        return base.to_string();
    }

    let scheme = headers
        .get("x-forwarded-proto")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .or_else(|| uri.scheme_str().map(str::to_string))
        .unwrap_or_else(|| "http".to_string());

    let host = headers
        .get(header::HOST)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
        .or_else(|| uri.authority().map(|a| a.to_string()))
        .unwrap_or_else(|| "localhost".to_string());

    format!("{}://{}", scheme, host)
}

pub fn book_location(base_url: &str, id: &str) -> String {
    format!("{}/api/v1/books/{}", base_url, id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn uses_host_header() {
        let mut headers = HeaderMap::new();
        headers.insert(header::HOST, HeaderValue::from_static("localhost:4567"));

        let base = request_base_url(&headers, &Uri::from_static("/books"), None);
        assert_eq!(base, "http://localhost:4567");
        assert_eq!(book_location(&base, "42"), "http://localhost:4567/api/v1/books/42");
    }

    #[test]
    fn honours_forwarded_proto() {
        let mut headers = HeaderMap::new();
        headers.insert(header::HOST, HeaderValue::from_static("books.example.com"));
        headers.insert("x-forwarded-proto", HeaderValue::from_static("https, http"));

        let base = request_base_url(&headers, &Uri::from_static("/books"), None);
        assert_eq!(base, "https://books.example.com");
    }

    #[test]
    fn falls_back_to_absolute_uri() {
        let uri = Uri::from_static("https://catalog.internal:8443/books");
        assert_eq!(
            request_base_url(&HeaderMap::new(), &uri, None),
            "https://catalog.internal:8443"
        );
    }

    #[test]
    fn configured_base_wins() {
        let mut headers = HeaderMap::new();
        headers.insert(header::HOST, HeaderValue::from_static("10.0.0.7"));

        let base = request_base_url(&headers, &Uri::from_static("/"), Some("https://books.example.com"));
        assert_eq!(base, "https://books.example.com");
    }
}
