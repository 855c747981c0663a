use vercel_runtime::{Body, Response};

const CORS_HEADERS: [(&str, &str); 4] = [
    ("Access-Control-Allow-Origin", "*"),
    ("Access-Control-Allow-Methods", "POST,OPTIONS"),
    ("Access-Control-Allow-Headers", "Content-Type,Authorization,x-api-key"),
    ("Access-Control-Max-Age", "86400"),
];

pub fn add_cors(mut resp: Response<Body>) -> Response<Body> {
    let h = resp.headers_mut();
    for (name, value) in CORS_HEADERS {
        if let Ok(value) = value.parse() {
            h.insert(name, value);
        }
    }
    resp
}
