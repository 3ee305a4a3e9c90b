//! Documentation page: `GET /`.

use axum::response::Html;

const DOCS_PAGE: &str = r#"<!DOCTYPE html>
<html>
<head>
    <title>Sneaker API Documentation</title>
    <style>
        body { font-family: Arial, sans-serif; margin: 40px; }
        code { background: #f4f4f4; padding: 2px 5px; border-radius: 3px; }
        .endpoint { margin: 20px 0; padding: 20px; border: 1px solid #ddd; }
    </style>
</head>
<body>
    <h1>Sneaker API Documentation</h1>
    <div class="endpoint">
        <h2>Single Page Search</h2>
        <p>Endpoint: <code>/api/search</code></p>
        <p>Method: <code>GET</code></p>
        <p>Parameters:</p>
        <ul>
            <li><code>token</code> (required): your API token</li>
            <li><code>query</code> (required): search term</li>
            <li><code>page</code> (optional): page number, default 1</li>
            <li><code>limit</code> (optional): results per page, default 100</li>
        </ul>
        <p>Returns the upstream page as-is, with the upstream status code.</p>
        <p>Example:</p>
        <code>GET /api/search?token=your-token&amp;query=nike&amp;page=1&amp;limit=100</code>
    </div>
    <div class="endpoint">
        <h2>All Pages Search</h2>
        <p>Endpoint: <code>/api/search/all</code></p>
        <p>Method: <code>GET</code></p>
        <p>Parameters:</p>
        <ul>
            <li><code>token</code> (required): your API token</li>
            <li><code>query</code> (required): search term</li>
        </ul>
        <p>Fetches every page (100 results each) and returns
        <code>shoe_name</code>, <code>count</code>, <code>total_items</code>
        and the combined <code>results</code>.</p>
        <p>Example:</p>
        <code>GET /api/search/all?token=your-token&amp;query=nike</code>
    </div>
</body>
</html>
"#;

/// `GET /`
///
/// Static HTML describing the two search endpoints. No token required.
pub async fn index() -> Html<&'static str> {
    Html(DOCS_PAGE)
}
