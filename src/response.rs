use crate::param::*;

use bytes::Bytes;
use chrono::prelude::*;
use log::error;

/// 一个完整构建好的 HTTP 响应。
///
/// `headers` 只保存处理器给出的额外头部，默认头部和强制头部在 `as_bytes` 时合并。
#[derive(Debug, Clone)]
pub struct Response {
    status_code: u16,
    information: String,
    headers: Vec<(String, String)>,
    content: Bytes,
    date: DateTime<Utc>,
}

impl Response {
    pub fn new() -> Self {
        Self {
            status_code: 200,
            information: "OK".to_string(),
            headers: Vec::new(),
            content: Bytes::new(),
            date: Utc::now(),
        }
    }

    /// 状态码必须存在于状态码表中，否则属于代码编写错误，直接终止。
    pub fn set_code(&mut self, code: u16) -> &mut Self {
        self.status_code = code;
        self.information = match STATUS_CODES.get(&code) {
            Some(&reason) => reason.to_string(),
            None => {
                error!("非法的状态码：{}。这条错误说明代码编写出现了错误。", code);
                panic!("非法的状态码：{}", code);
            }
        };
        self
    }

    pub fn set_header(&mut self, key: &str, value: &str) -> &mut Self {
        upsert(&mut self.headers, key, value);
        self
    }

    pub fn set_content(&mut self, content: impl Into<Bytes>) -> &mut Self {
        self.content = content.into();
        self
    }

    pub fn set_date(&mut self, date: DateTime<Utc>) -> &mut Self {
        self.date = date;
        self
    }

    fn from_status_code(code: u16) -> Self {
        let mut response = Self::new();
        response.set_code(code);
        let body = format!("<h1>{} {}</h1>", code, response.information);
        response.set_content(body);
        response
    }

    pub fn response_400() -> Self {
        Self::from_status_code(400)
    }

    pub fn response_403() -> Self {
        Self::from_status_code(403)
    }

    pub fn response_404() -> Self {
        Self::from_status_code(404)
    }

    pub fn response_405() -> Self {
        let mut response = Self::from_status_code(405);
        response.set_header("Allow", &HttpRequestMethod::allow_header());
        response
    }

    pub fn response_500() -> Self {
        Self::from_status_code(500)
    }

    /// 合并后的头部列表：默认头部 -> 额外头部 -> `Date`/`Content-Length`/`Connection`。
    ///
    /// 同名键覆盖时保留原来的位置。
    pub fn merged_headers(&self) -> Vec<(String, String)> {
        let mut merged: Vec<(String, String)> = DEFAULT_HEADERS
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        for (key, value) in &self.headers {
            upsert(&mut merged, key, value);
        }
        upsert(&mut merged, "Date", &format_date(&self.date));
        upsert(&mut merged, "Content-Length", &self.content.len().to_string());
        upsert(&mut merged, "Connection", "close");
        merged
    }

    pub fn as_bytes(&self) -> Vec<u8> {
        let mut header = format!(
            "HTTP/1.1 {} {} {}",
            self.status_code, self.information, CRLF
        );
        for (key, value) in self.merged_headers() {
            header.push_str(&key);
            header.push_str(": ");
            header.push_str(&value);
            header.push_str(CRLF);
        }
        header.push_str(CRLF);

        [header.as_bytes(), self.content.as_ref()].concat()
    }
}

impl Default for Response {
    fn default() -> Self {
        Self::new()
    }
}

impl Response {
    pub fn status_code(&self) -> u16 {
        self.status_code
    }

    pub fn information(&self) -> &str {
        &self.information
    }

    pub fn content(&self) -> &Bytes {
        &self.content
    }

    pub fn header(&self, key: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

fn upsert(headers: &mut Vec<(String, String)>, key: &str, value: &str) {
    match headers.iter_mut().find(|(k, _)| k == key) {
        Some(entry) => entry.1 = value.to_string(),
        None => headers.push((key.to_string(), value.to_string())),
    }
}

/// RFC 1123 格式的 GMT 时间，例如 `Sun, 06 Nov 1994 08:49:37 GMT`
fn format_date(date: &DateTime<Utc>) -> String {
    date.format("%a, %d %b %Y %H:%M:%S GMT").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn fixed_date() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(1994, 11, 6, 8, 49, 37).unwrap()
    }

    #[test]
    fn test_format_date() {
        assert_eq!(format_date(&fixed_date()), "Sun, 06 Nov 1994 08:49:37 GMT");
    }

    #[test]
    fn test_response_new() {
        let response = Response::new();

        assert_eq!(response.status_code(), 200);
        assert_eq!(response.information(), "OK");
        assert!(response.content().is_empty());
    }

    #[test]
    fn test_as_bytes_exact_layout() {
        let mut response = Response::new();
        response.set_content("Hello").set_date(fixed_date());

        let expected = "HTTP/1.1 200 OK \r\n\
                        Server: tinyhttpd\r\n\
                        Content-Type: text/html\r\n\
                        Date: Sun, 06 Nov 1994 08:49:37 GMT\r\n\
                        Content-Length: 5\r\n\
                        Connection: close\r\n\
                        \r\n\
                        Hello";
        assert_eq!(String::from_utf8(response.as_bytes()).unwrap(), expected);
    }

    #[test]
    fn test_extra_header_overrides_default_in_place() {
        let mut response = Response::new();
        response.set_header("Content-Type", "image/png").set_header("X-Extra", "1");

        let keys: Vec<String> = response.merged_headers().into_iter().map(|(k, _)| k).collect();
        assert_eq!(
            keys,
            ["Server", "Content-Type", "X-Extra", "Date", "Content-Length", "Connection"]
        );
        assert_eq!(response.merged_headers()[1].1, "image/png");
    }

    #[test]
    fn test_forced_headers_cannot_be_overridden() {
        let mut response = Response::new();
        response
            .set_header("Content-Length", "999")
            .set_header("Connection", "keep-alive")
            .set_content("abc");

        let merged = response.merged_headers();
        let get = |key: &str| merged.iter().find(|(k, _)| k == key).map(|(_, v)| v.clone());
        assert_eq!(get("Content-Length"), Some("3".to_string()));
        assert_eq!(get("Connection"), Some("close".to_string()));
    }

    #[test]
    fn test_status_code_setter() {
        for (code, expected_info) in [
            (200, "OK"),
            (201, "Created"),
            (204, "No Content"),
            (400, "Bad Request"),
            (403, "Forbidden"),
            (404, "Not Found"),
            (405, "Method Not Allowed"),
            (500, "Internal Server Error"),
            (501, "Not Implemented"),
        ] {
            let mut response = Response::new();
            response.set_code(code);
            assert_eq!(response.status_code(), code);
            assert_eq!(response.information(), expected_info);
        }
    }

    #[test]
    #[should_panic(expected = "非法的状态码")]
    fn test_unknown_status_code_is_fatal() {
        Response::new().set_code(999);
    }

    #[test]
    fn test_error_responses() {
        for (response, body) in [
            (Response::response_400(), "<h1>400 Bad Request</h1>"),
            (Response::response_403(), "<h1>403 Forbidden</h1>"),
            (Response::response_404(), "<h1>404 Not Found</h1>"),
            (Response::response_405(), "<h1>405 Method Not Allowed</h1>"),
            (Response::response_500(), "<h1>500 Internal Server Error</h1>"),
        ] {
            assert_eq!(response.content().as_ref(), body.as_bytes());
        }
        assert_eq!(Response::response_404().header("Allow"), None);
        assert_eq!(
            Response::response_405().header("Allow"),
            Some("GET, POST, PUT, DELETE")
        );
    }

    #[test]
    fn test_binary_content_is_preserved() {
        let mut response = Response::new();
        response.set_content(vec![0u8, 159, 146, 150]);
        let bytes = response.as_bytes();
        assert!(bytes.ends_with(&[0u8, 159, 146, 150]));
    }
}
